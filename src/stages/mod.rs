pub mod chunk;
pub mod parse;
pub mod realign;
pub mod verify;

pub use chunk::*;
pub use parse::*;
pub use realign::*;
pub use verify::*;
