mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::prelude::*;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use cyk::{generator, parser, recognizer};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // Results go to stdout, so logs stay on stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let grammar = match parser::parse_file(&cli.file, cli.start) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            bail!("could not load {} ({} errors)", cli.file.display(), errors.len());
        }
    };
    info!(path = %cli.file.display(), "loaded grammar\n{}", grammar);

    for word in &cli.words {
        let table = recognizer::full_table(&grammar, word)
            .with_context(|| format!("cannot check `{}`", word))?;

        println!("{}: {}", word, if table.is_derived() { "yes" } else { "no" });
        if cli.table {
            println!("{}", table);
        }
    }

    if let Some(amount) = cli.generate {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        };

        for _ in 0..amount {
            println!("{}", generator::generate(&grammar, cli.max_depth, &mut rng)?);
        }
    }

    Ok(())
}
