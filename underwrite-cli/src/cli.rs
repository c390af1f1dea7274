//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use underwrite_fields::MatchStrategy;

/// Template matching strategy as a command-line value.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatcherArg {
    /// One hash lookup on the normalized key shape
    Signature,
    /// Ordered scan of compiled templates
    Scan,
}

impl From<MatcherArg> for MatchStrategy {
    fn from(arg: MatcherArg) -> Self {
        match arg {
            MatcherArg::Signature => MatchStrategy::Signature,
            MatcherArg::Scan => MatchStrategy::Scan,
        }
    }
}

/// Underwrite - data dictionary inspector
///
/// Resolves field definitions, option lists and the navigation tree of an
/// insurance application record against its data dictionary.
#[derive(Parser, Debug)]
#[command(name = "underwrite")]
#[command(version)]
#[command(about = "Inspect an underwrite data dictionary")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Dictionary directory (overrides configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub dictionary: Option<PathBuf>,

    /// Fail on invalid or duplicate dictionary definitions
    #[arg(long, global = true)]
    pub strict: bool,

    /// Load only the dictionary directory, without the built-in definitions
    #[arg(long, global = true)]
    pub no_builtin: bool,

    /// Template matching strategy (overrides configuration)
    #[arg(long, global = true, value_enum)]
    pub matcher: Option<MatcherArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the dictionary and report what it contains
    Check,
    /// Show the definition that applies to a data key
    Resolve {
        /// Concrete data key, e.g. auto.vehicles[0].vin
        key: String,
        /// Output as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// Show the effective options of a choice field for a record
    Options {
        /// Data key of the field
        key: String,
        /// Application record (JSON or YAML)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
    },
    /// Show the group tree for a record
    Groups {
        /// Application record (JSON or YAML)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
    },
    /// List every value of a record with its label, group and visibility
    Describe {
        /// Application record (JSON or YAML)
        #[arg(long, value_name = "FILE")]
        data: PathBuf,
        /// Include values whose field is hidden by a visibility rule
        #[arg(short, long)]
        all: bool,
    },
}
