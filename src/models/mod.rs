pub mod outcome;
pub mod segment;
pub mod timecode;

pub use outcome::*;
pub use segment::*;
pub use timecode::*;
