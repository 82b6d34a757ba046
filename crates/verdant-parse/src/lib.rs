//! Parser front-end: language assignment, input decoding, included ranges,
//! timeouts and cancellation around a pluggable grammar engine.

mod engine;
mod error;
mod input;
mod interrupt;
mod parser;

pub use engine::{EngineOutcome, GrammarEngine, Language, Suspended};
pub use error::{Error, HaltReason, Result};
pub use input::{InputEncoding, SourceChar, SourceText};
pub use interrupt::Interrupt;
pub use parser::{Parser, ParserOptions};

/// Newest table format version this crate understands.
pub const LANGUAGE_VERSION: u32 = 14;
/// Oldest table format version this crate still accepts.
pub const MIN_COMPATIBLE_LANGUAGE_VERSION: u32 = 13;

#[cfg(test)]
mod tests;
