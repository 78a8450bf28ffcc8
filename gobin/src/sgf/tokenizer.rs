use super::error::ParseError;
use super::keys;

/// A property key and its bracketed values, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub values: Vec<String>,
    /// Byte offset of the key in the input.
    pub offset: usize,
    /// False once the first game tree or variation has been closed.
    pub main_line: bool,
}

impl Property {
    pub fn value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }
}

/// Lazy scanner over the properties of a game record.
///
/// Tree structure is flattened: `(`, `)` and `;` are separators. The
/// iterator stops for good after the first error. Cloning a fresh
/// tokenizer, or calling [`Tokenizer::restart`], replays the sequence.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    bytes: &'a [u8],
    pos: usize,
    closed: bool,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            bytes: input.as_bytes(),
            pos: 0,
            closed: false,
            failed: false,
        }
    }

    pub fn restart(&mut self) {
        self.pos = 0;
        self.closed = false;
        self.failed = false;
    }

    /// Skip to the next property and report whether it is still on the
    /// main line. Lets a caller stop before a side variation is scanned.
    pub fn on_main_line(&mut self) -> bool {
        self.skip_separators();
        !self.closed
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'(' | b';' => self.pos += 1,
                b')' => {
                    self.closed = true;
                    self.pos += 1;
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    // Property = Key Value+
    fn property(&mut self) -> Result<Property, ParseError> {
        let offset = self.pos;
        let key = self.key()?;
        if !keys::is_known(&key) {
            return Err(ParseError::UnknownKey { key, pos: offset });
        }

        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'[') {
                values.push(self.value()?);
            } else {
                break;
            }
        }

        if values.is_empty() {
            return match self.peek() {
                None => Err(ParseError::UnexpectedEof),
                Some(_) => Err(ParseError::MissingValue { key, pos: offset }),
            };
        }

        Ok(Property {
            key,
            values,
            offset,
            main_line: !self.closed,
        })
    }

    fn key(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        if self.pos == start {
            return match self.peek() {
                None => Err(ParseError::UnexpectedEof),
                Some(b) => Err(ParseError::UnexpectedChar {
                    found: b as char,
                    pos: start,
                }),
            };
        }

        let key = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        if !key.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ParseError::InvalidKey { key, pos: start });
        }
        Ok(key)
    }

    // Value = '[' text ']' with '\' escaping the next byte
    fn value(&mut self) -> Result<String, ParseError> {
        let open = self.pos;
        self.advance();
        let mut value = Vec::new();
        loop {
            match self.advance() {
                None => return Err(ParseError::UnterminatedValue { pos: open }),
                Some(b'\\') => match self.advance() {
                    None => return Err(ParseError::UnterminatedValue { pos: open }),
                    // Soft line break
                    Some(b'\n') => {
                        if self.peek() == Some(b'\r') {
                            self.pos += 1;
                        }
                    }
                    Some(b'\r') => {
                        if self.peek() == Some(b'\n') {
                            self.pos += 1;
                        }
                    }
                    Some(b) => value.push(b),
                },
                Some(b']') => break,
                Some(b) => value.push(b),
            }
        }
        Ok(String::from_utf8_lossy(&value).into_owned())
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Property, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_separators();
        self.peek()?;

        let result = self.property();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}
