/*
    This module is for storing and validating CNF grammars
*/

mod productions;
mod symbols;

use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::GrammarResult;
pub use productions::{ProductionIndex, Rhs};
pub use symbols::{Symbol, SymbolRegistry};

/// A grammar in Chomsky Normal Form, built up one call at a time.
///
/// Every mutator validates its input against what has already been added
/// and leaves the grammar untouched when it fails.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Grammar {
    symbols: SymbolRegistry,
    productions: ProductionIndex,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_nonterminal(&mut self, symbol: char) -> GrammarResult<()> {
        self.symbols.add_nonterminal(symbol)
    }

    pub fn add_terminal(&mut self, symbol: char) -> GrammarResult<()> {
        self.symbols.add_terminal(symbol)
    }

    pub fn set_start_symbol(&mut self, symbol: char) -> GrammarResult<()> {
        self.symbols.set_start_symbol(symbol)
    }

    pub fn add_production(&mut self, nonterminal: char, rhs: &str) -> GrammarResult<()> {
        self.productions.add_production(&self.symbols, nonterminal, rhs)
    }

    pub fn start_symbol(&self) -> Option<char> {
        self.symbols.start_symbol()
    }

    pub fn symbols(&self) -> &SymbolRegistry {
        &self.symbols
    }

    pub fn productions(&self) -> &ProductionIndex {
        &self.productions
    }

    /// Renders the productions of one non-terminal as `A::=BC|a`, or an
    /// empty string if it has none.
    pub fn productions_text(&self, nonterminal: char) -> String {
        let alternatives = self.productions.productions_of(nonterminal);
        if alternatives.is_empty() {
            return String::new();
        }

        format!("{}::={}", nonterminal, alternatives.iter().join("|"))
    }

    // Concatenation of every non-terminal's productions, in registration order
    pub fn grammar_text(&self) -> String {
        self.symbols.nonterminals().iter()
            .map(|&nonterminal| self.productions_text(nonterminal))
            .collect()
    }

    pub fn reset(&mut self) {
        self.productions.clear();
        self.symbols.reset();
    }
}

// One rule per line, in the same notation the loader reads
impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines = self.symbols.nonterminals().iter()
            .map(|&nonterminal| self.productions_text(nonterminal))
            .filter(|line| !line.is_empty());

        write!(f, "{}", lines.format("\n"))
    }
}
