use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar, one `A ::= BC | a` rule per line
    pub file: PathBuf,

    /// Words to check against the grammar
    pub words: Vec<String>,

    /// Start symbol (default: head of the first rule in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<char>,

    /// Print the recognition table of every word
    #[arg(short, long)]
    pub table: bool,

    /// Amount of random words to generate (default: none)
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub generate: Option<u32>,

    /// Deepest derivation tree used for generated words
    #[arg(long, value_name = "DEPTH", default_value_t = 8)]
    pub max_depth: usize,

    /// Seed for reproducible generated words
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8
}
