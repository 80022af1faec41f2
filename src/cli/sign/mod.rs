//! Sign command - prints the signature header a partner request needs

use chrono::Utc;
use clap::Args;

use crate::domain::auth::SignatureHeader;

#[derive(Args)]
pub struct SignArgs {
    /// Partner secret; read from the environment to keep it out of shell history
    #[arg(long, env = "PARTNER_SECRET", hide_env_values = true)]
    pub secret: String,

    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Path including the query string, exactly as it will be sent
    #[arg(long)]
    pub path: String,

    #[arg(long, default_value = "")]
    pub body: String,

    /// Unix seconds; defaults to now
    #[arg(long)]
    pub timestamp: Option<i64>,
}

pub fn run(args: SignArgs) -> anyhow::Result<()> {
    println!("{}", header_for(&args));
    Ok(())
}

fn header_for(args: &SignArgs) -> SignatureHeader {
    let timestamp = args.timestamp.unwrap_or_else(|| Utc::now().timestamp());

    SignatureHeader::sign(
        args.secret.as_bytes(),
        timestamp,
        &args.method.to_ascii_uppercase(),
        &args.path,
        args.body.as_bytes(),
    )
}
