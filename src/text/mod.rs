pub mod equivalence;
pub mod tokenize;

pub use equivalence::*;
pub use tokenize::*;
