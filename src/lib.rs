pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod parser;
pub mod recognizer;

pub use error_handling::{GrammarError, GrammarResult};
pub use grammar::Grammar;
pub use recognizer::{full_table, is_derived, RecognitionTable};
