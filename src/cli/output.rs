//! Output formatting for CLI commands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TermweaveArgs};
use crate::credential::CredentialStatus;
use crate::error::Result;
use crate::expansion::Expansion;

/// Result structure for an `expand` run.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpansionResults {
    pub inputs: Vec<TermExpansion>,
    /// Sorted union over every input.
    pub union: Vec<String>,
    /// Embedding model in use, if any.
    pub model: Option<String>,
}

/// Expansion of a single input term.
#[derive(Debug, Serialize, Deserialize)]
pub struct TermExpansion {
    pub term: String,
    pub expansions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Expansion>>,
}

/// Result structure for a table lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub term: String,
    pub found: bool,
    pub expansions: Vec<String>,
}

/// A listing of the synonym table.
#[derive(Debug, Serialize, Deserialize)]
pub struct SynonymListing {
    pub total_keys: usize,
    pub entries: Vec<SynonymEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SynonymEntry {
    pub term: String,
    pub expansions: Vec<String>,
}

/// Result structure for an API key check.
#[derive(Debug, Serialize)]
pub struct KeyCheckResult {
    pub base_url: String,
    #[serde(flatten)]
    pub status: CredentialStatus,
    /// Outcome of the follow-up embedding request, when one was made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functional: Option<CredentialStatus>,
}

impl fmt::Display for ExpansionResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            writeln!(f, "{}:", input.term)?;
            match &input.details {
                Some(details) => {
                    for detail in details {
                        writeln!(
                            f,
                            "  {:<30} {:<10} {:.3}  (via {})",
                            detail.term,
                            format!("{:?}", detail.expansion_type).to_lowercase(),
                            detail.confidence,
                            detail.source
                        )?;
                    }
                }
                None => {
                    for term in &input.expansions {
                        writeln!(f, "  {term}")?;
                    }
                }
            }
            if input.expansions.is_empty() {
                writeln!(f, "  (no expansions)")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for LookupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.found {
            return writeln!(f, "'{}' is not in the synonym table", self.term);
        }
        writeln!(f, "{}: {}", self.term, self.expansions.join(", "))
    }
}

impl fmt::Display for SynonymListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.term, entry.expansions.join(", "))?;
        }
        writeln!(f, "{} terms", self.total_keys)
    }
}

impl fmt::Display for KeyCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status)?;
        match &self.functional {
            Some(CredentialStatus::Valid) => writeln!(f, "API is fully functional"),
            Some(status) => writeln!(
                f,
                "API key is valid but there was an error with the API: {status}"
            ),
            None => Ok(()),
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + fmt::Display>(
    message: &str,
    result: &T,
    args: &TermweaveArgs,
) -> Result<()> {
    print!("{}", render_result(message, result, args)?);
    Ok(())
}

/// Render a result in the specified format.
pub fn render_result<T: Serialize + fmt::Display>(
    message: &str,
    result: &T,
    args: &TermweaveArgs,
) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => Ok(render_human(message, result, args)),
        OutputFormat::Json => render_json(result, args),
    }
}

fn render_human<T: fmt::Display>(message: &str, result: &T, args: &TermweaveArgs) -> String {
    if args.verbosity() > 1 {
        format!("{message}\n\n{result}")
    } else {
        result.to_string()
    }
}

fn render_json<T: Serialize>(result: &T, args: &TermweaveArgs) -> Result<String> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(format!("{json}\n"))
}
