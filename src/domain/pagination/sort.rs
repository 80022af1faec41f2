//! Sort keys for keyset pagination

use std::fmt::Debug;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Direction of a listing; applies to the sort field and the id tiebreak alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::validation(format!(
                "Invalid sort order '{}'. Expected 'asc' or 'desc'",
                other
            ))),
        }
    }
}

/// Type of value a sort field produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKind {
    #[serde(rename = "ts")]
    Timestamp,
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "str")]
    Text,
}

impl std::fmt::Display for SortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timestamp => write!(f, "timestamp"),
            Self::Integer => write!(f, "integer"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Value of a record's sort field
///
/// Values of the same kind order naturally; the codec guarantees a decoded
/// cursor has the kind of the sort field it is used with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Timestamp(DateTime<Utc>),
    Integer(i64),
    Text(String),
}

impl SortValue {
    pub fn kind(&self) -> SortKind {
        match self {
            Self::Timestamp(_) => SortKind::Timestamp,
            Self::Integer(_) => SortKind::Integer,
            Self::Text(_) => SortKind::Text,
        }
    }
}

/// A resource's sortable field
pub trait SortField: Copy + Debug + Send + Sync + FromStr<Err = DomainError> + 'static {
    /// Public name as accepted in the `sort` query parameter
    fn as_str(self) -> &'static str;

    /// Column the field is stored in
    fn column(self) -> &'static str;

    fn kind(self) -> SortKind;
}
