use itertools::{Itertools, PeekingNext};

use super::{LoadErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Define,
    Or,
    Symbols(String)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '|' || c == ':'
}

pub fn lex_define(line: &mut impl Iterator<Item = char>) -> Result<Token> {
    // `::=` is the only thing that may start with a colon
    let define: String = line.take(3).collect();
    if define != "::=" {
        return Err(LoadErrorType::MalformedDefine);
    }

    Ok(Token::Define)
}

pub fn lex_symbols(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    Ok(Token::Symbols(line.peeking_take_while(|&c| !is_separator(c)).collect()))
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == ':' {
            tokens.push(lex_define(&mut line_chars)?);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if !c.is_whitespace() {
            tokens.push(lex_symbols(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    return Ok(tokens);
}
