mod error;
mod keys;
mod record;
mod tokenizer;

pub use error::ParseError;
pub use keys::is_known;
pub use record::{Record, RecordMeta, parse_move, parse_point, parse_point_list};
pub use tokenizer::{Property, Tokenizer};
