use lookout_common::{LookoutError, Result};
use std::fmt;

/// Message shown when the user submits nothing but whitespace.
pub const EMPTY_QUERY: &str = "Search query cannot be empty";

/// A trimmed, non-empty search query.
///
/// Percent-encoding happens once, when the query is written into the request
/// URL; the value held here is the plain text the user typed.
///
/// ```
/// use lookout_web::Query;
///
/// let q = Query::parse("  rust async  ").unwrap();
/// assert_eq!(q.as_str(), "rust async");
/// assert!(Query::parse(" \t ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LookoutError::InvalidQuery(EMPTY_QUERY.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_queries_are_rejected() {
        for raw in ["", "   ", "\n\t "] {
            match Query::parse(raw) {
                Err(LookoutError::InvalidQuery(msg)) => assert_eq!(msg, EMPTY_QUERY),
                other => panic!("expected invalid query for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn inner_whitespace_is_kept() {
        let q = Query::parse("\tterminal  browsers \n").unwrap();
        assert_eq!(q.to_string(), "terminal  browsers");
    }
}
