//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// Inspect options mappings against the stock options classes
#[derive(Parser, Debug)]
#[command(name = "opts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Validate a mapping against a class
    ///
    /// Reads JSON, or YAML for `.yaml`/`.yml` files. Use `-` for stdin.
    ///
    /// Examples:
    ///   opts check case.json
    ///   opts check ulimit.yaml --class ULimitOpts
    Check {
        /// Input file, or `-` for stdin
        input: String,

        /// Class of the input mapping
        #[arg(short, long, default_value = "Options")]
        class: String,
    },

    /// Print the section at a dotted path as JSON
    ///
    /// Examples:
    ///   opts section case.json RunControl.aflr3
    ///   opts section case.json RunMatrix.Definitions
    Section {
        /// Input file, or `-` for stdin
        input: String,

        /// Dotted section path, `.` for the root
        path: String,

        /// Class of the input mapping
        #[arg(short, long, default_value = "Options")]
        class: String,
    },

    /// Print the value of one option as JSON
    ///
    /// Unset options print their default, or `null` when there is none.
    ///
    /// Examples:
    ///   opts get case.json RunControl PhaseIters --phase 2
    ///   opts get case.json RunMatrix.Definitions.mach Format
    Get {
        /// Input file, or `-` for stdin
        input: String,

        /// Dotted section path, `.` for the root
        path: String,

        /// Option name or alias
        key: String,

        /// Phase index; the last element is used past the end
        #[arg(short, long)]
        phase: Option<i64>,

        /// Class of the input mapping
        #[arg(short, long, default_value = "Options")]
        class: String,
    },

    /// Print the documentation of a class as Markdown
    Doc {
        /// Class name
        class: String,
    },

    /// List the registered classes
    Classes,
}
