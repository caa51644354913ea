use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use thiserror::Error;

use strand_compiler::{format_schema, parse_schema, tokenize_schema};
use strand_compiler::{FormatError, LexError, ParseError};

#[derive(Parser)]
#[command(name = "strand")]
#[command(about = "Parse, format, or inspect Strand schema files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a `.schema` file (reads stdin when no file is given)
    Format {
        /// Input `.schema` file
        input: Option<PathBuf>,

        /// Rewrite the input file in place instead of printing to stdout
        #[arg(short, long)]
        write: bool,
    },

    /// Dump the token stream or the parsed AST of a `.schema` file
    Debug {
        /// Input `.schema` file
        input: PathBuf,

        /// Pipeline stage to dump
        #[arg(long, value_enum, default_value = "tokens")]
        stage: Stage,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Stage {
    Tokens,
    Ast,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("--write requires a file argument")]
    WriteWithoutFile,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Format { input, write } => {
            let text = match input {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    if *write {
                        return Err(CliError::WriteWithoutFile);
                    }
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let schema = parse_schema(&text)?;
            let formatted = format_schema(&schema)?;

            match (input, write) {
                (Some(path), true) => fs::write(path, &formatted)?,
                _ => print!("{}", formatted),
            }
            Ok(())
        }

        Commands::Debug { input, stage } => {
            let text = fs::read_to_string(input)?;
            match stage {
                Stage::Tokens => {
                    for token in tokenize_schema(&text)? {
                        println!(
                            "({}:{}) {:?} {:?}",
                            token.line, token.col, token.kind, token.text
                        );
                    }
                }
                Stage::Ast => {
                    let schema = parse_schema(&text)?;
                    println!("{}", serde_json::to_string_pretty(&schema)?);
                }
            }
            Ok(())
        }
    }
}
