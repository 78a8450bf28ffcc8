pub mod codec;
pub mod error;
pub mod features;
pub mod goban;
pub mod ko;
pub mod sgf;
pub mod stone;
pub mod turn;

pub type Point = (u8, u8);

pub const BOARD_SIZE: usize = 19;
pub const CELLS: usize = BOARD_SIZE * BOARD_SIZE;

pub use error::{CorruptLog, Error, IllegalMove};
pub use features::{PLANE_COUNT, PASS, Planes, Sample, extract, extract_from_position};
pub use goban::{Goban, Placement};
pub use ko::Ko;
pub use sgf::{Record, RecordMeta};
pub use stone::Stone;
pub use turn::{Move, Turn};
