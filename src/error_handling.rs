use std::path::PathBuf;
use std::fmt::Display;

use thiserror::Error as ThisError;

pub trait ErrorType: Display + PartialEq {}

// Everything the grammar and the recogniser can reject
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum GrammarError {
    #[error("symbol `{0}` is already registered")]
    DuplicateSymbol(char),
    #[error("`{0}` is not a valid symbol for its class (non-terminals are uppercase, terminals lowercase)")]
    InvalidClassification(char),
    #[error("`{0}` is not a registered non-terminal")]
    UnknownNonTerminal(char),
    #[error("`{0}` is used in a production but was never registered")]
    UnknownSymbol(char),
    #[error("`{0}` is not in Chomsky Normal Form (expected two non-terminals or one terminal)")]
    MalformedProduction(String),
    #[error("production `{head}::={rhs}` already exists")]
    DuplicateProduction { head: char, rhs: String },
    #[error("`{0}` in the word is not a registered terminal")]
    UnknownTerminalInWord(char),
    #[error("the grammar has no productions")]
    EmptyGrammar,
    #[error("the grammar has no start symbol")]
    NoStartSymbol,
    #[error("the start symbol is already set to `{0}`")]
    StartSymbolAlreadySet(char),
    #[error("the empty word cannot be derived by a CNF grammar")]
    EmptyWord,
}

impl ErrorType for GrammarError {}

pub type GrammarResult<T> = std::result::Result<T, GrammarError>;

#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

pub type Errors<T> = Vec<Error<T>>;
