//! Feature planes for move prediction.
//!
//! A position is seen from the side to move and encoded as
//! [`PLANE_COUNT`] binary 19×19 planes, indexed `[plane][y][x]`.
//! Bucketed features use eight consecutive planes for the values
//! 1, 2, .., 7 and "more than 7".

use std::fmt;

use crate::codec;
use crate::error::{CorruptLog, Error, IllegalMove};
use crate::goban::Goban;
use crate::stone::Stone;
use crate::turn::Turn;
use crate::{BOARD_SIZE, CELLS, Point};

pub const PLANE_COUNT: usize = 49;

/// Label of a pass: one past the last board point.
pub const PASS: usize = CELLS;

pub const OWN: usize = 0;
pub const OPPONENT: usize = 1;
pub const EMPTY: usize = 2;
pub const ONES: usize = 3;
pub const TURNS_SINCE: usize = 4;
pub const OWN_LIBERTIES: usize = 12;
pub const OPPONENT_LIBERTIES: usize = 20;
pub const CAPTURE_SIZE: usize = 28;
pub const SELF_ATARI_SIZE: usize = 36;
pub const LEGAL: usize = 44;
pub const ZEROS: usize = 45;
pub const BLACK_TO_MOVE: usize = 46;
// Reserved, always zero.
pub const LADDER_CAPTURE: usize = 47;
pub const LADDER_ESCAPE: usize = 48;

/// An occupancy grid indexed `[y][x]`; any non-zero cell holds a stone.
pub type Grid = [[u8; BOARD_SIZE]; BOARD_SIZE];

fn bucket(n: usize) -> Option<usize> {
    match n {
        0 => None,
        1..=7 => Some(n - 1),
        _ => Some(7),
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Planes(Box<[Grid; PLANE_COUNT]>);

impl Planes {
    fn zeros() -> Self {
        Planes(Box::new([[[0; BOARD_SIZE]; BOARD_SIZE]; PLANE_COUNT]))
    }

    fn set(&mut self, plane: usize, (x, y): Point) {
        self.0[plane][y as usize][x as usize] = 1;
    }

    pub fn plane(&self, plane: usize) -> &Grid {
        &self.0[plane]
    }

    pub fn get(&self, plane: usize, (x, y): Point) -> u8 {
        self.0[plane][y as usize][x as usize]
    }

    /// Number of set points on a plane.
    pub fn count(&self, plane: usize) -> usize {
        self.0[plane]
            .iter()
            .flatten()
            .filter(|&&v| v != 0)
            .count()
    }

    /// All planes as one contiguous `PLANE_COUNT * 361` buffer.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_flattened().as_flattened()
    }
}

impl fmt::Debug for Planes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<usize> = (0..PLANE_COUNT).map(|k| self.count(k)).collect();
        f.debug_struct("Planes").field("counts", &counts).finish()
    }
}

/// One training example: the position before ply `n` and the move played there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub planes: Planes,
    /// `19 * y + x` of the labeled move, or [`PASS`].
    pub label: usize,
    pub to_move: Stone,
    /// Plies in the whole log.
    pub plies: usize,
}

pub fn label_of(turn: &Turn) -> usize {
    match turn.pos {
        Some((x, y)) if turn.is_play() => y as usize * BOARD_SIZE + x as usize,
        _ => PASS,
    }
}

/// Build the board after all setup stones and the first `until_ply` plies.
pub fn replay(turns: &[Turn], until_ply: usize) -> Result<Goban, Error> {
    let mut goban = Goban::new();

    for (record, turn) in turns.iter().enumerate().filter(|(_, t)| t.is_setup()) {
        goban
            .apply(turn)
            .map_err(|reason| CorruptLog::IllegalSetup { record, reason })?;
    }

    for (ply, turn) in turns
        .iter()
        .filter(|t| t.is_ply())
        .take(until_ply)
        .enumerate()
    {
        goban
            .apply(turn)
            .map_err(|reason| CorruptLog::IllegalReplay { ply, reason })?;
    }

    Ok(goban)
}

/// Replay a binary log up to `until_ply` and encode the position with the
/// move played at `until_ply` as its label.
pub fn extract(raw: &[u8], until_ply: usize) -> Result<Sample, Error> {
    let turns = codec::decode(raw)?;
    let plies = codec::plies(&turns);
    let Some(next) = turns.iter().filter(|t| t.is_ply()).nth(until_ply) else {
        return Err(Error::OutOfRange {
            ply: until_ply,
            plies,
        });
    };

    let goban = replay(&turns, until_ply)?;
    let to_move = next.stone;

    Ok(Sample {
        planes: planes(&goban, to_move),
        label: label_of(next),
        to_move,
        plies,
    })
}

/// Encode a position given as two occupancy grids. No move history is
/// known, so the turns-since planes stay empty.
pub fn extract_from_position(own: &Grid, opp: &Grid, to_move: Stone) -> Result<Planes, Error> {
    let mut goban = Goban::new();
    for y in 0..BOARD_SIZE {
        for x in 0..BOARD_SIZE {
            let point = (x as u8, y as u8);
            match (own[y][x] != 0, opp[y][x] != 0) {
                (true, true) => return Err(IllegalMove::Occupied.into()),
                (true, false) => goban.place_setup(to_move, point)?,
                (false, true) => goban.place_setup(to_move.opp(), point)?,
                (false, false) => {}
            }
        }
    }
    goban.set_to_move(to_move);
    Ok(planes(&goban, to_move))
}

/// Encode `goban` from the point of view of `to_move`.
pub fn planes(goban: &Goban, to_move: Stone) -> Planes {
    let mut planes = Planes::zeros();

    for y in 0..BOARD_SIZE as u8 {
        for x in 0..BOARD_SIZE as u8 {
            let p = (x, y);
            match goban.stone_at(p) {
                Some(stone) => {
                    let (color, liberties) = if stone == to_move {
                        (OWN, OWN_LIBERTIES)
                    } else {
                        (OPPONENT, OPPONENT_LIBERTIES)
                    };
                    planes.set(color, p);
                    if let Some(b) = goban.turns_since(p).and_then(bucket) {
                        planes.set(TURNS_SINCE + b, p);
                    }
                    if let Some(b) = bucket(goban.liberties(p)) {
                        planes.set(liberties + b, p);
                    }
                }
                None => {
                    planes.set(EMPTY, p);
                    if let Ok(placement) = goban.analyze(to_move, p) {
                        planes.set(LEGAL, p);
                        if let Some(b) = bucket(placement.captures) {
                            planes.set(CAPTURE_SIZE + b, p);
                        }
                        if placement.liberties == 1 {
                            if let Some(b) = bucket(placement.group_size) {
                                planes.set(SELF_ATARI_SIZE + b, p);
                            }
                        }
                    }
                }
            }

            planes.set(ONES, p);
            if to_move == Stone::Black {
                planes.set(BLACK_TO_MOVE, p);
            }
        }
    }

    planes
}
