use serde::{Deserialize, Serialize};

use crate::Point;
use crate::stone::Stone;

/// A point that `illegal` may not play on for exactly one turn after a single-stone capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ko {
    pub pos: Point,
    pub illegal: Stone,
}

impl Ko {
    pub fn forbids(&self, stone: Stone, point: Point) -> bool {
        self.pos == point && self.illegal == stone
    }
}
