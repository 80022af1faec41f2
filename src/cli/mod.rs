//! CLI module for the partner API
//!
//! - `serve`: run the HTTP server
//! - `sign`: compute a signature header, for partners testing their clients

pub mod serve;
pub mod sign;

use clap::{Parser, Subcommand};

/// Partner API - signed, paginated access to orders and shipments
#[derive(Parser)]
#[command(name = "partner-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Print the signature header for a request
    Sign(sign::SignArgs),
}
