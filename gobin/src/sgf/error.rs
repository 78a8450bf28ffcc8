use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedEof,
    /// A `[` without its closing `]`.
    UnterminatedValue { pos: usize },
    UnexpectedChar { found: char, pos: usize },
    InvalidKey { key: String, pos: usize },
    UnknownKey { key: String, pos: usize },
    MissingValue { key: String, pos: usize },
    InvalidCoordinate(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEof => write!(f, "unexpected end of input"),
            ParseError::UnterminatedValue { pos } => {
                write!(f, "value opened at position {pos} is never closed")
            }
            ParseError::UnexpectedChar { found, pos } => {
                write!(f, "unexpected '{found}' at position {pos}")
            }
            ParseError::InvalidKey { key, pos } => {
                write!(f, "invalid property key '{key}' at position {pos}")
            }
            ParseError::UnknownKey { key, pos } => {
                write!(f, "unknown property key '{key}' at position {pos}")
            }
            ParseError::MissingValue { key, pos } => {
                write!(f, "property {key} at position {pos} has no value")
            }
            ParseError::InvalidCoordinate(s) => write!(f, "invalid coordinate: {s}"),
        }
    }
}

impl std::error::Error for ParseError {}
