use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use tracing::debug;

use super::symbols::SymbolRegistry;
use crate::error_handling::{GrammarError, GrammarResult};

static NO_PRODUCERS: BTreeSet<char> = BTreeSet::new();

/// The right-hand side of a CNF production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rhs {
    Binary(char, char),
    Terminal(char),
}

impl Rhs {
    /// Checks the shape of a right-hand side without looking at any registry.
    pub fn parse(rhs: &str) -> GrammarResult<Rhs> {
        let malformed = || GrammarError::MalformedProduction(rhs.to_string());
        let chars: Vec<char> = rhs.chars().collect();

        match chars[..] {
            [left, right] if left.is_uppercase() && right.is_uppercase() => Ok(Rhs::Binary(left, right)),
            [terminal] if terminal.is_lowercase() => Ok(Rhs::Terminal(terminal)),
            _ => Err(malformed()),
        }
    }
}

impl Display for Rhs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rhs::Binary(left, right) => write!(f, "{}{}", left, right),
            Rhs::Terminal(terminal) => write!(f, "{}", terminal),
        }
    }
}

/// CNF productions, indexed both ways.
///
/// `forward` lists the right-hand sides of each non-terminal in insertion
/// order and `inverse` maps every right-hand side back to its producers.
/// Both encode the same facts, so `add_production` is the only mutator.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProductionIndex {
    forward: HashMap<char, Vec<Rhs>>,
    inverse: HashMap<Rhs, BTreeSet<char>>,
    count: usize,
}

impl ProductionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_production(&mut self, symbols: &SymbolRegistry, head: char, rhs: &str) -> GrammarResult<()> {
        // Shape first, so malformed rules are reported the same way whatever
        // has been registered
        let rhs = Rhs::parse(rhs)?;

        if !symbols.is_nonterminal(head) {
            return Err(GrammarError::UnknownNonTerminal(head));
        }
        match rhs {
            Rhs::Binary(left, right) => {
                if let Some(&missing) = [left, right].iter().find(|&&s| !symbols.is_nonterminal(s)) {
                    return Err(GrammarError::UnknownSymbol(missing));
                }
            }
            Rhs::Terminal(terminal) => {
                if !symbols.is_terminal(terminal) {
                    return Err(GrammarError::UnknownSymbol(terminal));
                }
            }
        }

        if self.productions_of(head).contains(&rhs) {
            return Err(GrammarError::DuplicateProduction { head, rhs: rhs.to_string() });
        }

        self.forward.entry(head).or_default().push(rhs);
        self.inverse.entry(rhs).or_default().insert(head);
        self.count += 1;
        debug!(%head, %rhs, "added production");
        Ok(())
    }

    pub fn productions_of(&self, head: char) -> &[Rhs] {
        self.forward.get(&head).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nonterminals_producing(&self, rhs: &Rhs) -> &BTreeSet<char> {
        self.inverse.get(rhs).unwrap_or(&NO_PRODUCERS)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.inverse.clear();
        self.count = 0;
    }
}
