use std::collections::HashSet;

use tracing::debug;

use crate::error_handling::{GrammarError, GrammarResult};

// The base unit in a grammar rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
}

impl Symbol {
    /// Works out which class a character belongs to, if any.
    pub fn classify(c: char) -> Option<Symbol> {
        if c.is_uppercase() {
            Some(Symbol::Nonterminal(c))
        } else if c.is_lowercase() {
            Some(Symbol::Terminal(c))
        } else {
            None
        }
    }
}

/// The two alphabets of a grammar and its start symbol.
///
/// Symbols are kept in registration order as well as in a set, so rendering
/// is deterministic while lookups stay O(1).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolRegistry {
    nonterminals: Vec<char>,
    terminals: Vec<char>,
    known: HashSet<Symbol>,
    start_symbol: Option<char>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unregistered(&self, symbol: char) -> GrammarResult<()> {
        if self.is_nonterminal(symbol) || self.is_terminal(symbol) {
            return Err(GrammarError::DuplicateSymbol(symbol));
        }
        Ok(())
    }

    pub fn add_nonterminal(&mut self, symbol: char) -> GrammarResult<()> {
        self.check_unregistered(symbol)?;
        if !symbol.is_uppercase() {
            return Err(GrammarError::InvalidClassification(symbol));
        }

        self.nonterminals.push(symbol);
        self.known.insert(Symbol::Nonterminal(symbol));
        debug!(%symbol, "registered non-terminal");
        Ok(())
    }

    pub fn add_terminal(&mut self, symbol: char) -> GrammarResult<()> {
        self.check_unregistered(symbol)?;
        if !symbol.is_lowercase() {
            return Err(GrammarError::InvalidClassification(symbol));
        }

        self.terminals.push(symbol);
        self.known.insert(Symbol::Terminal(symbol));
        debug!(%symbol, "registered terminal");
        Ok(())
    }

    // A second call is rejected rather than overwriting the first choice
    pub fn set_start_symbol(&mut self, symbol: char) -> GrammarResult<()> {
        if !self.is_nonterminal(symbol) {
            return Err(GrammarError::UnknownNonTerminal(symbol));
        }
        if let Some(current) = self.start_symbol {
            return Err(GrammarError::StartSymbolAlreadySet(current));
        }

        self.start_symbol = Some(symbol);
        debug!(%symbol, "set start symbol");
        Ok(())
    }

    pub fn start_symbol(&self) -> Option<char> {
        self.start_symbol
    }

    pub fn is_nonterminal(&self, symbol: char) -> bool {
        self.known.contains(&Symbol::Nonterminal(symbol))
    }

    pub fn is_terminal(&self, symbol: char) -> bool {
        self.known.contains(&Symbol::Terminal(symbol))
    }

    pub fn nonterminals(&self) -> &[char] {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &[char] {
        &self.terminals
    }

    pub fn reset(&mut self) {
        self.nonterminals.clear();
        self.terminals.clear();
        self.known.clear();
        self.start_symbol = None;
    }
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn classify_symbols() {
        let chars = vec!['S', 'a', 'Ñ', 'ß', '1', '|'];
        let answers = vec![
            Some(Symbol::Nonterminal('S')),
            Some(Symbol::Terminal('a')),
            Some(Symbol::Nonterminal('Ñ')),
            Some(Symbol::Terminal('ß')),
            None,
            None
        ];

        for (c, answer) in zip(chars, answers) {
            assert_eq!(Symbol::classify(c), answer);
        }
    }

    #[test]
    fn add_normal_symbols() {
        let mut registry = SymbolRegistry::new();
        registry.add_nonterminal('S').unwrap();
        registry.add_nonterminal('A').unwrap();
        registry.add_terminal('a').unwrap();

        assert_eq!(registry.nonterminals(), &['S', 'A']);
        assert_eq!(registry.terminals(), &['a']);
        assert!(registry.is_nonterminal('S'));
        assert!(!registry.is_terminal('S'));
        assert!(!registry.is_nonterminal('a'));
    }

    #[test]
    fn reject_misclassified_symbols() {
        let mut registry = SymbolRegistry::new();

        assert_eq!(registry.add_nonterminal('s'), Err(GrammarError::InvalidClassification('s')));
        assert_eq!(registry.add_nonterminal('1'), Err(GrammarError::InvalidClassification('1')));
        assert_eq!(registry.add_terminal('A'), Err(GrammarError::InvalidClassification('A')));
        assert_eq!(registry.add_terminal(' '), Err(GrammarError::InvalidClassification(' ')));
        assert_eq!(registry, SymbolRegistry::new());
    }

    #[test]
    fn reject_duplicate_symbols() {
        let mut registry = SymbolRegistry::new();
        registry.add_nonterminal('S').unwrap();
        registry.add_terminal('a').unwrap();
        let before = registry.clone();

        assert_eq!(registry.add_nonterminal('S'), Err(GrammarError::DuplicateSymbol('S')));
        assert_eq!(registry.add_terminal('a'), Err(GrammarError::DuplicateSymbol('a')));
        // Already taken by the other class
        assert_eq!(registry.add_terminal('S'), Err(GrammarError::DuplicateSymbol('S')));
        assert_eq!(registry, before);
    }

    #[test]
    fn start_symbol_rules() {
        let mut registry = SymbolRegistry::new();
        registry.add_nonterminal('S').unwrap();
        registry.add_nonterminal('A').unwrap();
        registry.add_terminal('a').unwrap();

        assert_eq!(registry.set_start_symbol('B'), Err(GrammarError::UnknownNonTerminal('B')));
        assert_eq!(registry.set_start_symbol('a'), Err(GrammarError::UnknownNonTerminal('a')));
        assert_eq!(registry.start_symbol(), None);

        registry.set_start_symbol('S').unwrap();
        assert_eq!(registry.set_start_symbol('A'), Err(GrammarError::StartSymbolAlreadySet('S')));
        assert_eq!(registry.start_symbol(), Some('S'));
    }

    #[test]
    fn reset_registry() {
        let mut registry = SymbolRegistry::new();
        registry.add_nonterminal('S').unwrap();
        registry.add_terminal('a').unwrap();
        registry.set_start_symbol('S').unwrap();

        registry.reset();
        assert_eq!(registry, SymbolRegistry::new());
        registry.add_nonterminal('S').unwrap();
        registry.set_start_symbol('S').unwrap();
    }
}
