//! Binary move logs: one big-endian `u16` per turn, no header.
//!
//! ```text
//! bit  15 14 13 | 12   | 11   | 10    | 9..5 | 4..0
//!      reserved | pass | move | color | y    | x
//! ```
//!
//! `move=0, pass=0` is a setup stone, `move=1, pass=0` a played stone and
//! `move=1, pass=1` a pass with zero coordinates. Color 0 is Black.

use std::fmt::Write as _;

use crate::error::{CorruptLog, Error};
use crate::sgf::Record;
use crate::stone::Stone;
use crate::turn::{Move, Turn};
use crate::{BOARD_SIZE, Point};

pub const RECORD_BYTES: usize = 2;

/// Revision of the bit layout above. Layout 1 had no pass bit, so a pass
/// could not be told apart from a setup stone on the origin.
pub const LAYOUT_VERSION: u8 = 2;

const COORD_MASK: u16 = 0x1f;
const Y_SHIFT: u16 = 5;
const COLOR_BIT: u16 = 1 << 10;
const MOVE_BIT: u16 = 1 << 11;
const PASS_BIT: u16 = 1 << 12;
const RESERVED_MASK: u16 = 0xe000;

fn on_board((x, y): Point) -> bool {
    (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE
}

/// Encode a single turn, or `None` if its point is missing or off the board.
pub fn encode_turn(turn: &Turn) -> Option<u16> {
    let color = if turn.stone.bit() { COLOR_BIT } else { 0 };
    let value = match turn.kind {
        Move::Pass => PASS_BIT | MOVE_BIT,
        Move::Play | Move::Setup => {
            let point = turn.pos.filter(|&p| on_board(p))?;
            let coords = (point.1 as u16) << Y_SHIFT | point.0 as u16;
            if turn.kind == Move::Play {
                MOVE_BIT | coords
            } else {
                coords
            }
        }
    };
    Some(value | color)
}

/// Decode record number `index` of a log.
pub fn decode_record(value: u16, index: usize) -> Result<Turn, CorruptLog> {
    if value & RESERVED_MASK != 0 {
        return Err(CorruptLog::ReservedBits {
            record: index,
            value,
        });
    }

    let stone = Stone::from_bit(value & COLOR_BIT != 0);
    let x = (value & COORD_MASK) as u8;
    let y = ((value >> Y_SHIFT) & COORD_MASK) as u8;

    if value & PASS_BIT != 0 {
        if value & MOVE_BIT == 0 || x != 0 || y != 0 {
            return Err(CorruptLog::MalformedPass {
                record: index,
                value,
            });
        }
        return Ok(Turn::pass(stone));
    }

    if !on_board((x, y)) {
        return Err(CorruptLog::OffBoard { record: index, x, y });
    }

    if value & MOVE_BIT != 0 {
        Ok(Turn::play(stone, (x, y)))
    } else {
        Ok(Turn::setup(stone, (x, y)))
    }
}

pub fn encode(turns: &[Turn]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(turns.len() * RECORD_BYTES);
    for (i, turn) in turns.iter().enumerate() {
        let value = encode_turn(turn).ok_or(match turn.pos {
            Some((x, y)) => CorruptLog::OffBoard { record: i, x, y },
            None => CorruptLog::MissingPoint { record: i },
        })?;
        out.extend_from_slice(&value.to_be_bytes());
    }
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Turn>, Error> {
    if bytes.len() % RECORD_BYTES != 0 {
        return Err(CorruptLog::OddLength(bytes.len()).into());
    }
    bytes
        .chunks_exact(RECORD_BYTES)
        .enumerate()
        .map(|(i, pair)| decode_record(u16::from_be_bytes([pair[0], pair[1]]), i))
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Parse a textual record and encode its main line.
pub fn encode_record(input: &str) -> Result<Vec<u8>, Error> {
    let record = Record::parse(input)?;
    encode(&record.turns)
}

/// Number of plies (plays and passes) in a log.
pub fn plies(turns: &[Turn]) -> usize {
    turns.iter().filter(|t| t.is_ply()).count()
}

fn sgf_point((x, y): Point) -> String {
    let mut s = String::with_capacity(2);
    s.push((b'a' + x) as char);
    s.push((b'a' + y) as char);
    s
}

/// Render decoded turns as a minimal game record.
pub fn to_sgf(turns: &[Turn]) -> String {
    let mut out = format!("(;GM[1]FF[4]SZ[{BOARD_SIZE}]");

    for stone in [Stone::Black, Stone::White] {
        let points: Vec<String> = turns
            .iter()
            .filter(|t| t.is_setup() && t.stone == stone)
            .filter_map(|t| t.pos.map(sgf_point))
            .collect();
        if !points.is_empty() {
            let _ = write!(out, "A{}", stone.letter());
            for p in points {
                let _ = write!(out, "[{p}]");
            }
        }
    }
    out.push('\n');

    for turn in turns.iter().filter(|t| t.is_ply()) {
        let value = turn.pos.filter(|_| turn.is_play()).map(sgf_point);
        let _ = writeln!(out, ";{}[{}]", turn.stone.letter(), value.unwrap_or_default());
    }
    out.push_str(")\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_move_example() {
        let value = encode_turn(&Turn::play(Stone::White, (3, 4))).unwrap();
        assert_eq!(value, 3203);
        let bytes = encode(&[Turn::play(Stone::White, (3, 4))]).unwrap();
        assert_eq!(bytes, [0x0c, 0x83]);
    }

    #[test]
    fn black_pass_example() {
        let bytes = encode(&[Turn::pass(Stone::Black)]).unwrap();
        let value = u16::from_be_bytes([bytes[0], bytes[1]]);
        assert_ne!(value & PASS_BIT, 0);
        assert_eq!(value & COLOR_BIT, 0);
        assert_eq!(value & (COORD_MASK | COORD_MASK << Y_SHIFT), 0);
        assert_eq!(bytes, [0x18, 0x00]);
    }

    #[test]
    fn setup_stone_has_no_move_bit() {
        let value = encode_turn(&Turn::setup(Stone::Black, (3, 3))).unwrap();
        assert_eq!(value, 32 * 3 + 3);
    }

    #[test]
    fn round_trip_every_turn() {
        let mut turns = vec![Turn::pass(Stone::Black), Turn::pass(Stone::White)];
        for stone in [Stone::Black, Stone::White] {
            for y in 0..BOARD_SIZE as u8 {
                for x in 0..BOARD_SIZE as u8 {
                    turns.push(Turn::play(stone, (x, y)));
                    turns.push(Turn::setup(stone, (x, y)));
                }
            }
        }
        let bytes = encode(&turns).unwrap();
        assert_eq!(bytes.len(), turns.len() * RECORD_BYTES);
        assert_eq!(decode(&bytes).unwrap(), turns);
    }

    #[test]
    fn rejects_off_board_turns() {
        assert_eq!(
            encode(&[Turn::play(Stone::Black, (0, 0)), Turn::play(Stone::Black, (19, 2))]),
            Err(Error::CorruptLog(CorruptLog::OffBoard {
                record: 1,
                x: 19,
                y: 2
            }))
        );
    }

    #[test]
    fn rejects_turns_without_a_point() {
        let pointless = Turn {
            kind: Move::Setup,
            stone: Stone::White,
            pos: None,
        };
        assert_eq!(
            encode(&[Turn::pass(Stone::Black), pointless]),
            Err(Error::CorruptLog(CorruptLog::MissingPoint { record: 1 }))
        );
    }

    #[test]
    fn odd_length_is_corrupt() {
        assert_eq!(
            decode(&[0x0c, 0x83, 0x00]),
            Err(Error::CorruptLog(CorruptLog::OddLength(3)))
        );
    }

    #[test]
    fn off_board_record_is_corrupt() {
        // x = 19
        let value: u16 = MOVE_BIT | 19;
        assert_eq!(
            decode(&value.to_be_bytes()),
            Err(Error::CorruptLog(CorruptLog::OffBoard {
                record: 0,
                x: 19,
                y: 0
            }))
        );
    }

    #[test]
    fn reserved_bits_are_corrupt() {
        assert!(matches!(
            decode(&[0x80, 0x00]),
            Err(Error::CorruptLog(CorruptLog::ReservedBits { .. }))
        ));
    }

    #[test]
    fn pass_with_coordinates_is_corrupt() {
        let value: u16 = PASS_BIT | MOVE_BIT | 3;
        assert!(matches!(
            decode(&value.to_be_bytes()),
            Err(Error::CorruptLog(CorruptLog::MalformedPass { .. }))
        ));
        let value: u16 = PASS_BIT;
        assert!(matches!(
            decode(&value.to_be_bytes()),
            Err(Error::CorruptLog(CorruptLog::MalformedPass { .. }))
        ));
    }

    #[test]
    fn empty_log() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn encode_record_checks_format() {
        let bytes = encode_record("(;GM[1]SZ[19];B[dd];W[])").unwrap();
        assert_eq!(bytes.len(), 4);
        assert!(matches!(
            encode_record("(;GM[1]SZ[13];B[dd])"),
            Err(Error::FormatMismatch { property: "SZ", .. })
        ));
    }

    #[test]
    fn counts_plies() {
        let turns = [
            Turn::setup(Stone::Black, (3, 3)),
            Turn::play(Stone::White, (15, 15)),
            Turn::pass(Stone::Black),
        ];
        assert_eq!(plies(&turns), 2);
    }

    #[test]
    fn renders_sgf() {
        let turns = [
            Turn::setup(Stone::Black, (3, 3)),
            Turn::setup(Stone::Black, (15, 15)),
            Turn::play(Stone::White, (15, 3)),
            Turn::pass(Stone::Black),
        ];
        let sgf = to_sgf(&turns);
        assert_eq!(sgf, "(;GM[1]FF[4]SZ[19]AB[dd][pp]\n;W[pd]\n;B[]\n)\n");
        let reparsed = Record::parse(&sgf).unwrap();
        assert_eq!(reparsed.turns, turns);
    }
}
