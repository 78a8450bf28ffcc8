use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use std::ops::Neg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Stone {
    Black = 0,
    White = 1,
}

impl Stone {
    /// The color bit of a binary move record.
    pub fn from_bit(bit: bool) -> Self {
        if bit { Stone::White } else { Stone::Black }
    }

    pub fn bit(self) -> bool {
        self == Stone::White
    }

    pub fn opp(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// SGF property letter for a move of this color.
    pub fn letter(self) -> &'static str {
        match self {
            Stone::Black => "B",
            Stone::White => "W",
        }
    }

    /// Board glyph used by the text dump.
    pub fn glyph(self) -> char {
        match self {
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }
}

impl Neg for Stone {
    type Output = Self;

    fn neg(self) -> Self {
        self.opp()
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => write!(f, "Black"),
            Stone::White => write!(f, "White"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_bit() {
        assert_eq!(Stone::from_bit(false), Stone::Black);
        assert_eq!(Stone::from_bit(true), Stone::White);
        assert!(!Stone::Black.bit());
        assert!(Stone::White.bit());
    }

    #[test]
    fn opponent() {
        assert_eq!(Stone::Black.opp(), Stone::White);
        assert_eq!(-Stone::White, Stone::Black);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Stone::White).unwrap(), "1");
        let s: Stone = serde_json::from_str("0").unwrap();
        assert_eq!(s, Stone::Black);
    }
}
