//! Plain-text rendering of a [`ResultSet`] for the interactive console.
use crate::ResultSet;
use std::io::{self, Write};

pub const NO_RESULTS: &str = "No results found";

const RULE_WIDTH: usize = 40;

/// Write every result as a numbered block, or [`NO_RESULTS`] when empty.
///
/// ```
/// use lookout_web::{ResultSet, SearchResult, render::write_results};
///
/// let set = ResultSet::new([SearchResult {
///     title: "w3m".into(),
///     link: "https://w3m.sourceforge.net/".into(),
///     snippet: None,
/// }]);
/// let mut out = Vec::new();
/// write_results(&mut out, &set).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("\n1. w3m\nURL: https://w3m.sourceforge.net/\n"));
/// ```
pub fn write_results<W: Write>(out: &mut W, results: &ResultSet) -> io::Result<()> {
    if results.is_empty() {
        return writeln!(out, "{NO_RESULTS}");
    }

    let rule = "-".repeat(RULE_WIDTH);
    for (i, item) in results.iter().enumerate() {
        writeln!(out, "\n{}. {}", i + 1, item.title)?;
        writeln!(out, "URL: {}", item.link)?;
        if let Some(snippet) = &item.snippet {
            writeln!(out, "Description: {snippet}")?;
        }
        writeln!(out, "{rule}")?;
    }
    Ok(())
}
