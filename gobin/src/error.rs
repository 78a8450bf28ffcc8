use std::fmt;

use crate::sgf::ParseError;

/// Why the board refused a stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    Occupied,
    Suicide,
    KoViolation,
    NotOnBoard,
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMove::Occupied => write!(f, "point is occupied"),
            IllegalMove::NotOnBoard => write!(f, "not on board"),
            IllegalMove::Suicide => write!(f, "suicide"),
            IllegalMove::KoViolation => write!(f, "ko violation"),
        }
    }
}

impl std::error::Error for IllegalMove {}

/// A binary move log that cannot be decoded or replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptLog {
    OddLength(usize),
    ReservedBits { record: usize, value: u16 },
    OffBoard { record: usize, x: u8, y: u8 },
    MalformedPass { record: usize, value: u16 },
    /// A play or setup turn without a point.
    MissingPoint { record: usize },
    IllegalSetup { record: usize, reason: IllegalMove },
    IllegalReplay { ply: usize, reason: IllegalMove },
}

impl fmt::Display for CorruptLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorruptLog::OddLength(len) => {
                write!(f, "log length {len} is not a multiple of the record size")
            }
            CorruptLog::ReservedBits { record, value } => {
                write!(f, "record {record} ({value:#06x}) has reserved bits set")
            }
            CorruptLog::OffBoard { record, x, y } => {
                write!(f, "record {record} lies off the board at ({x}, {y})")
            }
            CorruptLog::MalformedPass { record, value } => {
                write!(f, "record {record} ({value:#06x}) is a malformed pass")
            }
            CorruptLog::MissingPoint { record } => {
                write!(f, "record {record} has no point")
            }
            CorruptLog::IllegalSetup { record, reason } => {
                write!(f, "setup stone in record {record} cannot be placed: {reason}")
            }
            CorruptLog::IllegalReplay { ply, reason } => {
                write!(f, "ply {ply} cannot be replayed: {reason}")
            }
        }
    }
}

impl std::error::Error for CorruptLog {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorruptLog::IllegalSetup { reason, .. } | CorruptLog::IllegalReplay { reason, .. } => {
                Some(reason)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Parse(ParseError),
    /// The record is not a 19×19 Go game.
    FormatMismatch {
        property: &'static str,
        value: String,
    },
    IllegalMove(IllegalMove),
    OutOfRange {
        ply: usize,
        plies: usize,
    },
    CorruptLog(CorruptLog),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "parse error: {e}"),
            Error::FormatMismatch { property, value } => {
                write!(f, "format mismatch: {property}[{value}]")
            }
            Error::IllegalMove(e) => write!(f, "illegal move: {e}"),
            Error::OutOfRange { ply, plies } => {
                write!(f, "ply {ply} out of range for a game of {plies} plies")
            }
            Error::CorruptLog(e) => write!(f, "corrupt log: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::IllegalMove(e) => Some(e),
            Error::CorruptLog(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<IllegalMove> for Error {
    fn from(e: IllegalMove) -> Self {
        Error::IllegalMove(e)
    }
}

impl From<CorruptLog> for Error {
    fn from(e: CorruptLog) -> Self {
        Error::CorruptLog(e)
    }
}
