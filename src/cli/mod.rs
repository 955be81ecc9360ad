//! Command-line interface for the quix front end.
//!
//! ## Commands
//!
//! - `lex <file>` - Dump raw tokens
//! - `prep <file>` - Dump tokens after preprocessing
//! - `parse <file>` - Print the AST as JSON
//! - `mangle <file>` - Print the symbol of every top-level binding
//! - `demangle <symbol>...` - Decode symbols back into declarations
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// prints the message and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// Already formatted for display
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Exit code 1.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Front end for the quix language
#[derive(Parser, Debug)]
#[command(name = "quixcc")]
#[command(version = VERSION)]
#[command(about = "Front end for the quix language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dump raw tokens, one per line
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Keep comments as tokens
        #[arg(long)]
        comments: bool,
    },

    /// Dump tokens after macro expansion and imports
    Prep {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Extra directory searched for imports
        #[arg(short = 'I', value_name = "DIR")]
        include: Vec<PathBuf>,
        /// Static value readable through `@static`
        #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_static)]
        statics: Vec<(String, String)>,
    },

    /// Parse a file and print its AST as JSON
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Skip the preprocessor
        #[arg(long = "no-prep")]
        no_prep: bool,
        /// Fold constant subexpressions before printing
        #[arg(long)]
        fold: bool,
        #[arg(short = 'I', value_name = "DIR")]
        include: Vec<PathBuf>,
        #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_static)]
        statics: Vec<(String, String)>,
    },

    /// Print the mangled symbol of every top-level var/let/const
    Mangle {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Decode mangled symbols
    Demangle {
        #[arg(value_name = "SYMBOL", required = true)]
        symbols: Vec<String>,
    },
}

fn parse_static(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run(cli: Cli) {
    match execute(cli) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Lex { file, comments } => commands::lex_file(&file, comments),
        Command::Prep { file, include, statics } => commands::prep_file(&file, include, statics),
        Command::Parse {
            file,
            no_prep,
            fold,
            include,
            statics,
        } => {
            let config = commands::job_config(include, statics)
                .with_preprocess(!no_prep)
                .with_fold_constants(fold);
            commands::parse_file(&file, config)
        }
        Command::Mangle { file } => commands::mangle_file(&file),
        Command::Demangle { symbols } => commands::demangle_symbols(&symbols),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["quixcc", "lex", "main.q"]).unwrap();
        assert!(matches!(cli.command, Command::Lex { comments: false, .. }));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_prep_flags() {
        let cli = Cli::try_parse_from(["quixcc", "prep", "main.q", "-I", "inc", "-I", "lib", "-D", "arch=x86_64"]).unwrap();
        if let Command::Prep { include, statics, .. } = cli.command {
            assert_eq!(include, vec![PathBuf::from("inc"), PathBuf::from("lib")]);
            assert_eq!(statics, vec![("arch".to_string(), "x86_64".to_string())]);
        } else {
            panic!("Expected Prep command");
        }
    }

    #[test]
    fn test_cli_rejects_bad_static() {
        assert!(Cli::try_parse_from(["quixcc", "prep", "main.q", "-D", "=1"]).is_err());
        assert!(Cli::try_parse_from(["quixcc", "prep", "main.q", "-D", "novalue"]).is_err());
    }

    #[test]
    fn test_cli_parse_parse() {
        let cli = Cli::try_parse_from(["quixcc", "-v", "parse", "main.q", "--no-prep", "--fold"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Parse { no_prep: true, fold: true, .. }));
    }

    #[test]
    fn test_cli_parse_demangle() {
        let cli = Cli::try_parse_from(["quixcc", "demangle", "_ZJ0l1xi", "_ZJ0c1yd"]).unwrap();
        if let Command::Demangle { symbols } = cli.command {
            assert_eq!(symbols.len(), 2);
        } else {
            panic!("Expected Demangle command");
        }
        assert!(Cli::try_parse_from(["quixcc", "demangle"]).is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["quixcc"]).is_err());
    }
}
