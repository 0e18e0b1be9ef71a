pub mod models;
pub mod source;

pub use models::{DIGIT_SLOTS, DrawRecord, POSITION_COUNT, Position, RawDraw};
pub use source::{CsvSource, DrawSource};
