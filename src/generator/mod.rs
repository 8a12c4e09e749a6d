/*
    This module generates random words of a grammar's language
*/

use std::collections::HashMap;

use rand::prelude::*;
use thiserror::Error as ThisError;
use tracing::debug;

use crate::error_handling::ErrorType;
use crate::grammar::{Grammar, Rhs};

#[derive(Debug, PartialEq, ThisError)]
pub enum GenerateError {
    #[error("the grammar has no start symbol")]
    NoStartSymbol,
    // No finite word can be derived from this nonterminal
    #[error("`{0}` does not derive any word")]
    Unproductive(char),
    #[error("`{symbol}` needs a derivation of depth {needed}, but the limit is {max_depth}")]
    DepthTooSmall { symbol: char, needed: usize, max_depth: usize },
}

impl ErrorType for GenerateError {}

pub type GenResult = Result<String, GenerateError>;

type Heights = HashMap<char, usize>;

fn rule_height(rhs: &Rhs, heights: &Heights) -> Option<usize> {
    match rhs {
        Rhs::Terminal(_) => Some(1),
        Rhs::Binary(left, right) => Some(1 + heights.get(left)?.max(heights.get(right)?)),
    }
}

// The height of the shallowest derivation tree of each nonterminal.
// Unproductive nonterminals are missing from the map.
fn min_heights(grammar: &Grammar) -> Heights {
    let mut heights = Heights::new();

    loop {
        let mut changed = false;
        for &nonterminal in grammar.symbols().nonterminals() {
            let best = grammar.productions().productions_of(nonterminal).iter()
                .filter_map(|rhs| rule_height(rhs, &heights))
                .min();

            if let Some(height) = best {
                if heights.get(&nonterminal).map_or(true, |&old| height < old) {
                    heights.insert(nonterminal, height);
                    changed = true;
                }
            }
        }

        if !changed {
            return heights;
        }
    }
}

/// Generates a random word derived from the start symbol, using derivation
/// trees no deeper than `max_depth`.
pub fn generate(grammar: &Grammar, max_depth: usize, rng: &mut impl Rng) -> GenResult {
    let start = grammar.start_symbol().ok_or(GenerateError::NoStartSymbol)?;
    generate_with_override(grammar, start, max_depth, rng)
}

// Generates a word from the given nonterminal instead of the start symbol
pub fn generate_with_override(grammar: &Grammar, start: char, max_depth: usize, rng: &mut impl Rng) -> GenResult {
    let heights = min_heights(grammar);
    let needed = *heights.get(&start).ok_or(GenerateError::Unproductive(start))?;
    if needed > max_depth {
        return Err(GenerateError::DepthTooSmall { symbol: start, needed, max_depth });
    }

    let mut word = String::new();
    generate_nonterminal(grammar, &heights, start, max_depth, rng, &mut word)?;
    debug!(%start, %word, "generated word");
    return Ok(word);
}

fn generate_nonterminal(
    grammar: &Grammar,
    heights: &Heights,
    nonterminal: char,
    depth: usize,
    rng: &mut impl Rng,
    word: &mut String
) -> Result<(), GenerateError> {
    // Only rules that can still finish within the remaining depth
    let candidates: Vec<&Rhs> = grammar.productions().productions_of(nonterminal).iter()
        .filter(|rhs| rule_height(rhs, heights).is_some_and(|height| height <= depth))
        .collect();

    match candidates.choose(rng) {
        Some(Rhs::Terminal(terminal)) => word.push(*terminal),
        Some(Rhs::Binary(left, right)) => {
            generate_nonterminal(grammar, heights, *left, depth - 1, rng, word)?;
            generate_nonterminal(grammar, heights, *right, depth - 1, rng, word)?;
        }
        None => return Err(GenerateError::Unproductive(nonterminal)),
    }

    Ok(())
}
