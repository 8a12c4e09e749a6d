/*
    This module loads CNF grammar files
*/

mod lexer;

use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error as ThisError;
use tracing::debug;

use crate::error_handling::*;
use crate::grammar::{Grammar, Symbol};
use lexer::*;

#[derive(Debug, ThisError)]
pub enum LoadErrorType {
    // A line which should contain a rule does not
    #[error("Expected `::=` after the nonterminal")]
    MissingDefine,
    // A rule has several `::=`
    #[error("Unexpected `::=` encountered")]
    UnexpectedDefine,
    // A colon that is not part of `::=`
    #[error("Malformed `::=`")]
    MalformedDefine,
    // The user starts a rule line with something other than one nonterminal
    #[error("Rules must start with a single uppercase nonterminal")]
    MissingHead,
    // Nothing between two `|`, or nothing after `::=`
    #[error("Empty alternative")]
    EmptyAlternative,
    // Neither an uppercase nor a lowercase letter
    #[error("`{0}` is neither a nonterminal (uppercase) nor a terminal (lowercase)")]
    InvalidSymbol(char),
    #[error("The file does not contain any rule")]
    EmptyFile,
    // A blank line got too deep into the parser. The file readers drop blank
    // lines first, so only direct callers of `parse_line` can hit this
    #[error("Blank line encountered in rule parser (this is a problem with the loader, not the grammar)")]
    UnexpectedBlankLine,
    // The grammar itself refused the rule
    #[error("{0}")]
    Grammar(GrammarError),
    // There was an issue with reading a file
    #[error("File error: {0}")]
    FileError(std::io::Error),
}

impl ErrorType for LoadErrorType {}

impl PartialEq for LoadErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadErrorType::FileError(a), LoadErrorType::FileError(b)) => a.kind() == b.kind(),
            (LoadErrorType::InvalidSymbol(a), LoadErrorType::InvalidSymbol(b)) => a == b,
            (LoadErrorType::Grammar(a), LoadErrorType::Grammar(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

pub type LoadError = Error<LoadErrorType>;
pub type LoadErrors = Errors<LoadErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> LoadError {
    LoadError {
        location: Location {
            file,
            line: 0
        },
        error: LoadErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, LoadErrorType>;
pub type LineResult<T> = std::result::Result<T, LoadError>;
pub type FileResult<T> = std::result::Result<T, LoadErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    head: char,
    alternatives: Vec<String>,
    location: Location
}

fn check_symbols(symbols: &str) -> Result<()> {
    match symbols.chars().find(|&c| Symbol::classify(c).is_none()) {
        Some(c) => Err(LoadErrorType::InvalidSymbol(c)),
        None => Ok(())
    }
}

// Adjacent symbol runs belong to the same alternative, so `C C` reads as `CC`
fn parse_alternative(tokens: &[Token]) -> Result<String> {
    let alternative: String = tokens.iter().map(|t| match t {
        Token::Define => Err(LoadErrorType::UnexpectedDefine),
        Token::Or => Err(LoadErrorType::EmptyAlternative),
        Token::Symbols(s) => Ok(s.as_str())
    }).collect::<Result<String>>()?;

    if alternative.is_empty() {
        return Err(LoadErrorType::EmptyAlternative);
    }
    check_symbols(&alternative)?;

    Ok(alternative)
}

fn parse_alternatives(tokens: &[Token]) -> Result<Vec<String>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_head(token: Option<&Token>) -> Result<char> {
    let symbols = match token {
        Some(Token::Symbols(s)) => Ok(s),
        Some(_) => Err(LoadErrorType::MissingHead),
        None => Err(LoadErrorType::UnexpectedBlankLine)
    }?;

    match symbols.chars().exactly_one() {
        Ok(head) if head.is_uppercase() => Ok(head),
        _ => Err(LoadErrorType::MissingHead)
    }
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let head = parse_head(tokens.first())?;

    if tokens.get(1) != Some(&Token::Define) {
        return Err(LoadErrorType::MissingDefine)
    }

    let alternatives = parse_alternatives(&tokens[2..])?;

    return Ok(Rule {
        head,
        alternatives,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| LoadError { location, error })
}

fn is_rule_line(line: &String) -> bool {
    let line = line.trim_start();
    !line.is_empty() && !line.starts_with(';')
}

// Numbers the lines (from 1) and drops blanks and comments, keeping any
// read errors so they get reported
fn rule_lines(lines: impl Iterator<Item = LineResult<String>>) -> impl Iterator<Item = (usize, LineResult<String>)> {
    lines
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

fn parse_lines(lines: impl Iterator<Item = LineResult<String>>, path: &Path) -> FileResult<Vec<Rule>> {
    let parsed_lines = rule_lines(lines).map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: path.to_path_buf(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(rules)
}

// Every symbol gets declared the first time it shows up
fn declare_symbols(grammar: &mut Grammar, rules: &[Rule]) -> GrammarResult<()> {
    let used = rules.iter()
        .flat_map(|rule| std::iter::once(rule.head).chain(rule.alternatives.iter().flat_map(|a| a.chars())))
        .unique();

    for c in used {
        match Symbol::classify(c) {
            Some(Symbol::Nonterminal(c)) => grammar.add_nonterminal(c)?,
            Some(Symbol::Terminal(c)) => grammar.add_terminal(c)?,
            None => return Err(GrammarError::InvalidClassification(c))
        }
    }

    Ok(())
}

fn grammar_from_rules(rules: Vec<Rule>, start: Option<char>, path: &Path) -> FileResult<Grammar> {
    let file_error = |error| vec![LoadError {
        location: Location { file: path.to_path_buf(), line: 0 },
        error
    }];

    let first_head = rules.first().map(|rule| rule.head).ok_or_else(|| file_error(LoadErrorType::EmptyFile))?;

    let mut grammar = Grammar::new();
    declare_symbols(&mut grammar, &rules).map_err(|e| file_error(LoadErrorType::Grammar(e)))?;
    grammar.set_start_symbol(start.unwrap_or(first_head))
        .map_err(|e| file_error(LoadErrorType::Grammar(e)))?;

    let mut errors = Vec::new();
    for rule in rules {
        for alternative in &rule.alternatives {
            if let Err(e) = grammar.add_production(rule.head, alternative) {
                errors.push(LoadError {
                    location: rule.location.clone(),
                    error: LoadErrorType::Grammar(e)
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    debug!(
        path = %path.display(),
        nonterminals = grammar.symbols().nonterminals().len(),
        terminals = grammar.symbols().terminals().len(),
        productions = grammar.productions().len(),
        "loaded grammar"
    );
    return Ok(grammar);
}

/// Loads a grammar from a file with one `A ::= BC | a` rule per line.
///
/// The start symbol is `start` if given, otherwise the head of the first rule.
/// All the errors found are reported, each with the line it comes from.
pub fn parse_file(path: &Path, start: Option<char>) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    let lines = std::io::BufReader::new(file)
        .lines()
        .map(|line| line.map_err(|e| io_error(e, path.to_path_buf())));

    let rules = parse_lines(lines, path)?;
    grammar_from_rules(rules, start, path)
}

// Same as `parse_file`, for grammars that are already in memory
pub fn parse_str(text: &str, start: Option<char>) -> FileResult<Grammar> {
    let path = Path::new("<string>");
    let rules = parse_lines(text.lines().map(|line| Ok(line.to_string())), path)?;
    grammar_from_rules(rules, start, path)
}
