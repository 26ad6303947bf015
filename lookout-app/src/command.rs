use std::num::IntErrorKind;

/// What the user typed at the query prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    Quit,              // quit (any case)
    Search(String),    // anything else, validated later
}

/// What the user typed at the result-selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Back,               // back (any case)
    Open(usize),        // 1-based, within range
    OutOfRange(i128),   // saturated when too long to represent
    NotANumber(String),
}

pub fn parse_query_input(input: &str) -> QueryInput {
    if input.trim().eq_ignore_ascii_case("quit") {
        QueryInput::Quit
    } else {
        QueryInput::Search(input.to_string())
    }
}

pub fn parse_selection(input: &str, count: usize) -> Selection {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("back") {
        return Selection::Back;
    }
    match trimmed.parse::<i128>() {
        Ok(n) if n >= 1 && n <= count as i128 => Selection::Open(n as usize),
        Ok(n) => Selection::OutOfRange(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Selection::OutOfRange(i128::MAX),
            IntErrorKind::NegOverflow => Selection::OutOfRange(i128::MIN),
            _ => Selection::NotANumber(trimmed.to_string()),
        },
    }
}
