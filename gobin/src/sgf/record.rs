use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::stone::Stone;
use crate::turn::Turn;
use crate::{BOARD_SIZE, Point};

use super::error::ParseError;
use super::keys;
use super::tokenizer::Tokenizer;

/// Game-info properties carried along with a converted record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub komi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RecordMeta {
    /// False for games whose record flags them as damaged, or that ended on
    /// time or by resignation rather than being played out.
    pub fn is_clean(&self) -> bool {
        let comment = self.comment.as_deref().unwrap_or("").to_lowercase();
        let result = self.result.as_deref().unwrap_or("").to_lowercase();
        !(comment.contains("illegal")
            || comment.contains("corrupt")
            || result.contains("time")
            || result.contains("resign")
            || result.ends_with("+r")
            || result.ends_with("+t"))
    }
}

/// The main line of a 19×19 Go record, ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub meta: RecordMeta,
    pub turns: Vec<Turn>,
}

impl Record {
    /// Tokenize `input` and collect its setup stones and moves.
    ///
    /// Fails with `FormatMismatch` when `GM` is not 1 or `SZ` is not 19,
    /// and for setup properties that a flat log cannot hold: `AE`, or
    /// `AB`/`AW` once play has started. Only the first game's main line is
    /// read.
    pub fn parse(input: &str) -> Result<Record, Error> {
        let mut meta = RecordMeta::default();
        let mut turns: Vec<Turn> = Vec::new();

        let mut tokens = Tokenizer::new(input);
        while tokens.on_main_line() {
            let Some(prop) = tokens.next() else {
                break;
            };
            let prop = prop?;
            let value = prop.value();
            match prop.key.as_str() {
                "GM" => {
                    if value.trim() != "1" {
                        return Err(Error::FormatMismatch {
                            property: "GM",
                            value: value.to_string(),
                        });
                    }
                }
                "SZ" => {
                    if value.trim() != BOARD_SIZE.to_string() {
                        return Err(Error::FormatMismatch {
                            property: "SZ",
                            value: value.to_string(),
                        });
                    }
                }
                "PB" => meta.black_name = Some(value.to_string()),
                "PW" => meta.white_name = Some(value.to_string()),
                "BR" => meta.black_rank = Some(value.to_string()),
                "WR" => meta.white_rank = Some(value.to_string()),
                "EV" => meta.event = Some(value.to_string()),
                "DT" => meta.date = Some(value.to_string()),
                "KM" => meta.komi = Some(value.to_string()),
                "RE" => meta.result = Some(value.to_string()),
                "GC" => meta.comment = Some(value.to_string()),
                "AE" => {
                    return Err(Error::FormatMismatch {
                        property: "AE",
                        value: value.to_string(),
                    });
                }
                key if keys::is_setup(key) => {
                    if turns.iter().any(Turn::is_ply) {
                        return Err(Error::FormatMismatch {
                            property: if key == "AB" { "AB" } else { "AW" },
                            value: value.to_string(),
                        });
                    }
                    let stone = color_of(key);
                    for point in parse_point_list(&prop.values)? {
                        turns.push(Turn::setup(stone, point));
                    }
                }
                key if keys::is_move(key) => {
                    let stone = color_of(key);
                    match parse_move(value)? {
                        Some(point) => turns.push(Turn::play(stone, point)),
                        None => turns.push(Turn::pass(stone)),
                    }
                }
                _ => {}
            }
        }

        Ok(Record { meta, turns })
    }
}

fn color_of(key: &str) -> Stone {
    if key.ends_with('W') {
        Stone::White
    } else {
        Stone::Black
    }
}

fn letter_to_coord(ch: u8, s: &str) -> Result<u8, ParseError> {
    match ch {
        b'a'..=b's' => Ok(ch - b'a'),
        _ => Err(ParseError::InvalidCoordinate(s.to_string())),
    }
}

/// Parse a two-letter coordinate like "cd" into `(2, 3)` as `(x, y)`.
pub fn parse_point(s: &str) -> Result<Point, ParseError> {
    match s.as_bytes() {
        [x, y] => Ok((letter_to_coord(*x, s)?, letter_to_coord(*y, s)?)),
        _ => Err(ParseError::InvalidCoordinate(s.to_string())),
    }
}

/// Parse a move value. The empty value and the legacy `tt` both mean pass.
pub fn parse_move(s: &str) -> Result<Option<Point>, ParseError> {
    let s = s.trim();
    if s.is_empty() || s == "tt" {
        return Ok(None);
    }
    parse_point(s).map(Some)
}

/// Parse setup values, expanding compressed rectangles like `aa:cc`.
pub fn parse_point_list(values: &[String]) -> Result<Vec<Point>, ParseError> {
    let mut points = Vec::new();
    for val in values {
        let val = val.trim();
        if val.is_empty() {
            continue;
        }
        if let Some((from, to)) = val.split_once(':') {
            let (x1, y1) = parse_point(from)?;
            let (x2, y2) = parse_point(to)?;
            for y in y1.min(y2)..=y1.max(y2) {
                for x in x1.min(x2)..=x1.max(x2) {
                    points.push((x, y));
                }
            }
        } else {
            points.push(parse_point(val)?);
        }
    }
    Ok(points)
}
