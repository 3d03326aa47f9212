//! Command line argument parsing for the termweave CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::credential::FUNCTIONAL_CHECK_MODEL;
use crate::embedding::Device;
use crate::expansion::SemanticMode;

/// termweave - expand search terms with synonyms and embedding similarity
#[derive(Parser, Debug, Clone)]
#[command(name = "termweave")]
#[command(about = "Expand search terms with synonym tables and embedding similarity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TermweaveArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TermweaveArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Expand one or more terms
    Expand(ExpandArgs),

    /// Show the table entry for a term
    Lookup(LookupArgs),

    /// List the synonym table
    Synonyms(SynonymsArgs),

    /// Check an OpenAI API key
    #[command(name = "check-key")]
    CheckKey(CheckKeyArgs),
}

/// Arguments for expanding terms
#[derive(Parser, Debug, Clone)]
pub struct ExpandArgs {
    /// Terms to expand
    #[arg(value_name = "TERMS", required = true)]
    pub terms: Vec<String>,

    /// Expander configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Synonym file (JSON) merged on top of the defaults
    #[arg(short, long, value_name = "SYNONYM_FILE")]
    pub synonyms: Option<PathBuf>,

    /// Embedding model id
    #[arg(short, long)]
    pub model: Option<String>,

    /// Compute device for the embedding model
    #[arg(long)]
    pub device: Option<Device>,

    /// Minimum cosine similarity for semantic matches (0.0-1.0)
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Leave the input term out of the results
    #[arg(long)]
    pub no_original: bool,

    /// Also match table keys contained in (or containing) the term
    #[arg(long)]
    pub substring: bool,

    /// When the embedding similarity pass runs
    #[arg(long, value_name = "MODE")]
    pub semantic: Option<SemanticArg>,

    /// Show how each term was found
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for a table lookup
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Term to look up
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Synonym file (JSON) merged on top of the defaults
    #[arg(short, long, value_name = "SYNONYM_FILE")]
    pub synonyms: Option<PathBuf>,

    /// Don't load the built-in synonyms
    #[arg(long)]
    pub no_defaults: bool,
}

/// Arguments for listing the synonym table
#[derive(Parser, Debug, Clone)]
pub struct SynonymsArgs {
    /// Synonym file (JSON) merged on top of the defaults
    #[arg(short, long, value_name = "SYNONYM_FILE")]
    pub synonyms: Option<PathBuf>,

    /// Don't load the built-in synonyms
    #[arg(long)]
    pub no_defaults: bool,
}

/// Arguments for checking an API key
#[derive(Parser, Debug, Clone)]
pub struct CheckKeyArgs {
    /// API key to check
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API root of an OpenAI-compatible service
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// After a valid key, send one embedding request to confirm the API works
    #[arg(long)]
    pub functional: bool,

    /// Model used by the --functional request
    #[arg(long, value_name = "MODEL", default_value = FUNCTIONAL_CHECK_MODEL)]
    pub functional_model: String,
}

/// Semantic pass selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticArg {
    /// Only when the table has no match
    Fallback,
    /// Always, in addition to table matches
    Always,
    /// Never
    Off,
}

impl From<SemanticArg> for SemanticMode {
    fn from(arg: SemanticArg) -> Self {
        match arg {
            SemanticArg::Fallback => SemanticMode::Fallback,
            SemanticArg::Always => SemanticMode::Always,
            SemanticArg::Off => SemanticMode::Disabled,
        }
    }
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
