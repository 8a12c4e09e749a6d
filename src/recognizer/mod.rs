/*
    This module decides membership with the Cocke-Younger-Kasami algorithm
*/

use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::error_handling::{GrammarError, GrammarResult};
use crate::grammar::{Grammar, Rhs};

// The non-terminals deriving one substring of the word
pub type Cell = BTreeSet<char>;

/// The triangular table built for one word.
///
/// `cell(start, span)` holds the non-terminals deriving the
/// `span + 1` characters beginning at `start`, so `cell(0, len - 1)` is the
/// only cell covering the whole word.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionTable {
    word: Vec<char>,
    start_symbol: char,
    cells: Vec<Vec<Cell>>,
}

impl RecognitionTable {
    pub fn word(&self) -> String {
        self.word.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.word.len()
    }

    // Never true for a table that came out of `full_table`
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    pub fn cell(&self, start: usize, span: usize) -> Option<&Cell> {
        self.cells.get(start)?.get(span)
    }

    /// Every cell with its `(start, span)` coordinates, row by row.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> {
        self.cells.iter().enumerate().flat_map(|(start, row)| {
            row.iter().enumerate().map(move |(span, cell)| ((start, span), cell))
        })
    }

    pub fn whole_word(&self) -> &Cell {
        &self.cells[0][self.len() - 1]
    }

    pub fn is_derived(&self) -> bool {
        self.whole_word().contains(&self.start_symbol)
    }
}

fn format_cell(cell: &Cell) -> String {
    format!("{{{}}}", cell.iter().join(","))
}

// Shortest spans first, one line per span length
impl Display for RecognitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "word: {}", self.word())?;
        for span in 0..self.len() {
            let row = (0..self.len() - span).map(|start| format_cell(&self.cells[start][span]));
            write!(f, "\n{}: {}", span + 1, row.format(" "))?;
        }
        Ok(())
    }
}

// Returns the start symbol and the characters of the word once the query is
// known to make sense for this grammar
fn check_query(grammar: &Grammar, word: &str) -> GrammarResult<(char, Vec<char>)> {
    if grammar.productions().is_empty() {
        return Err(GrammarError::EmptyGrammar);
    }
    let start_symbol = grammar.start_symbol().ok_or(GrammarError::NoStartSymbol)?;
    if word.is_empty() {
        return Err(GrammarError::EmptyWord);
    }

    let word: Vec<char> = word.chars().collect();
    if let Some(&unknown) = word.iter().find(|&&c| !grammar.symbols().is_terminal(c)) {
        return Err(GrammarError::UnknownTerminalInWord(unknown));
    }

    Ok((start_symbol, word))
}

/// Builds the whole recognition table for `word`.
pub fn full_table(grammar: &Grammar, word: &str) -> GrammarResult<RecognitionTable> {
    let (start_symbol, word) = check_query(grammar, word)?;
    let productions = grammar.productions();
    let n = word.len();

    let mut cells: Vec<Vec<Cell>> = (0..n).map(|start| vec![Cell::new(); n - start]).collect();

    for (start, &terminal) in word.iter().enumerate() {
        cells[start][0] = productions.nonterminals_producing(&Rhs::Terminal(terminal)).clone();
    }

    for span in 1..n {
        for start in 0..n - span {
            let mut derived = Cell::new();
            // Every split point contributes, an early match must not stop the search
            for split in 0..span {
                let left = &cells[start][split];
                let right = &cells[start + split + 1][span - split - 1];
                for (&b, &c) in left.iter().cartesian_product(right.iter()) {
                    derived.extend(productions.nonterminals_producing(&Rhs::Binary(b, c)));
                }
            }
            trace!(start, span, cell = %format_cell(&derived), "filled cell");
            cells[start][span] = derived;
        }
    }

    Ok(RecognitionTable { word, start_symbol, cells })
}

/// Whether the grammar's start symbol derives `word`.
pub fn is_derived(grammar: &Grammar, word: &str) -> GrammarResult<bool> {
    let table = full_table(grammar, word)?;
    let derived = table.is_derived();
    debug!(word, derived, "checked membership");
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn build_grammar(nonterminals: &str, terminals: &str, start: char, rules: &[(char, &str)]) -> Grammar {
        let mut grammar = Grammar::new();
        for nonterminal in nonterminals.chars() {
            grammar.add_nonterminal(nonterminal).unwrap();
        }
        for terminal in terminals.chars() {
            grammar.add_terminal(terminal).unwrap();
        }
        grammar.set_start_symbol(start).unwrap();
        for (head, rhs) in rules {
            grammar.add_production(*head, rhs).unwrap();
        }
        grammar
    }

    fn ab_grammar() -> Grammar {
        build_grammar("SAB", "ab", 'S', &[('S', "AB"), ('A', "a"), ('B', "b")])
    }

    // The usual textbook example
    fn textbook_grammar() -> Grammar {
        build_grammar("SABC", "ab", 'S', &[
            ('S', "AB"), ('S', "BC"),
            ('A', "BA"), ('A', "a"),
            ('B', "CC"), ('B', "b"),
            ('C', "AB"), ('C', "a")
        ])
    }

    fn cell_of(symbols: &str) -> Cell {
        symbols.chars().collect()
    }

    #[test]
    fn simple_membership() {
        let grammar = ab_grammar();
        let words = vec!["ab", "ba", "a", "b", "abab", "aab"];
        let answers = vec![true, false, false, false, false, false];

        for (word, answer) in zip(words, answers) {
            assert_eq!(is_derived(&grammar, word), Ok(answer), "word `{}`", word);
        }
    }

    #[test]
    fn textbook_membership() {
        let grammar = textbook_grammar();
        let words = vec!["baaba", "ab", "ba", "aab", "bbb", "aaaaa"];
        let answers = vec![true, true, true, false, false, true];

        for (word, answer) in zip(words, answers) {
            assert_eq!(is_derived(&grammar, word), Ok(answer), "word `{}`", word);
        }
    }

    #[test]
    fn textbook_table() {
        let table = full_table(&textbook_grammar(), "baaba").unwrap();
        // Indexed by span, then start
        let rows = vec![
            vec!["B", "AC", "AC", "B", "AC"],
            vec!["AS", "B", "CS", "AS"],
            vec!["", "B", "B"],
            vec!["", "ACS"],
            vec!["ACS"]
        ];

        for (span, row) in rows.into_iter().enumerate() {
            for (start, symbols) in row.into_iter().enumerate() {
                assert_eq!(table.cell(start, span), Some(&cell_of(symbols)), "cell ({}, {})", start, span);
            }
        }
        assert_eq!(table.whole_word(), &cell_of("ACS"));
        assert!(table.is_derived());
    }

    #[test]
    fn table_shape() {
        let grammar = textbook_grammar();

        for word in ["a", "ab", "bab", "baaba", "abababab"] {
            let table = full_table(&grammar, word).unwrap();
            let n = word.len();

            assert_eq!(table.len(), n);
            assert_eq!(table.word(), word);
            assert_eq!(table.cells().count(), n * (n + 1) / 2);
            assert!(table.cells().all(|((start, span), _)| start + span < n));
            assert_eq!(table.cell(0, n - 1), Some(table.whole_word()));
            assert_eq!(table.cell(1, n - 1), None);
            assert_eq!(table.cell(0, n), None);
        }
    }

    #[test]
    fn needs_every_split_point() {
        // Only the split after `ab` derives `abc`
        let grammar = build_grammar("SABCY", "abc", 'S', &[
            ('S', "YC"), ('Y', "AB"),
            ('A', "a"), ('B', "b"), ('C', "c")
        ]);
        assert_eq!(is_derived(&grammar, "abc"), Ok(true));

        // `abcd` reaches S through two different splits, XY and ZD
        let grammar = build_grammar("SABCDXYZ", "abcd", 'S', &[
            ('S', "XY"), ('S', "ZD"),
            ('X', "AB"), ('Y', "CD"), ('Z', "XC"),
            ('A', "a"), ('B', "b"), ('C', "c"), ('D', "d")
        ]);
        let table = full_table(&grammar, "abcd").unwrap();
        assert_eq!(table.cell(0, 1), Some(&cell_of("X")));
        assert_eq!(table.cell(2, 1), Some(&cell_of("Y")));
        assert_eq!(table.cell(0, 2), Some(&cell_of("Z")));
        assert_eq!(table.whole_word(), &cell_of("S"));
        assert!(table.is_derived());
    }

    #[test]
    fn query_preconditions() {
        let mut grammar = Grammar::new();
        assert_eq!(is_derived(&grammar, "a"), Err(GrammarError::EmptyGrammar));

        grammar.add_nonterminal('S').unwrap();
        grammar.add_terminal('a').unwrap();
        assert_eq!(is_derived(&grammar, "a"), Err(GrammarError::EmptyGrammar));

        grammar.add_production('S', "a").unwrap();
        assert_eq!(is_derived(&grammar, "a"), Err(GrammarError::NoStartSymbol));
        assert_eq!(full_table(&grammar, "a"), Err(GrammarError::NoStartSymbol));

        grammar.set_start_symbol('S').unwrap();
        assert_eq!(is_derived(&grammar, "a"), Ok(true));
    }

    #[test]
    fn reject_bad_words() {
        let grammar = ab_grammar();

        assert_eq!(is_derived(&grammar, ""), Err(GrammarError::EmptyWord));
        assert_eq!(is_derived(&grammar, "c"), Err(GrammarError::UnknownTerminalInWord('c')));
        assert_eq!(is_derived(&grammar, "abc"), Err(GrammarError::UnknownTerminalInWord('c')));
        // Non-terminals are not part of the input alphabet
        assert_eq!(is_derived(&grammar, "aB"), Err(GrammarError::UnknownTerminalInWord('B')));
        assert_eq!(full_table(&grammar, ""), Err(GrammarError::EmptyWord));
    }

    #[test]
    fn reset_then_query() {
        let mut grammar = ab_grammar();
        grammar.reset();

        assert_eq!(is_derived(&grammar, "ab"), Err(GrammarError::EmptyGrammar));
    }

    #[test]
    fn concurrent_queries() {
        let grammar = textbook_grammar();

        std::thread::scope(|scope| {
            let first = scope.spawn(|| is_derived(&grammar, "baaba"));
            let second = scope.spawn(|| is_derived(&grammar, "aab"));

            assert_eq!(first.join().unwrap(), Ok(true));
            assert_eq!(second.join().unwrap(), Ok(false));
        });
    }

    #[test]
    fn display_table() {
        let table = full_table(&textbook_grammar(), "bab").unwrap();

        assert_eq!(table.to_string(), "word: bab\n1: {B} {A,C} {B}\n2: {A,S} {C,S}\n3: {C,S}");
    }
}
