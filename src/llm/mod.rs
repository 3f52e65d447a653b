pub mod cleanup;
pub mod client;
pub mod prompts;

pub use cleanup::*;
pub use client::*;
pub use prompts::*;
