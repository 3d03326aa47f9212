//! Command implementations for the termweave CLI.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::ExitCode;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::credential::{CredentialChecker, CredentialStatus};
use crate::error::Result;
use crate::expansion::{ExpanderConfig, MatchMode, TermExpander};
use crate::synonym::{SynonymTable, default_synonyms, normalize_term};

/// Execute a CLI command.
///
/// Async commands run on a current-thread Tokio runtime; the returned exit
/// code is non-zero when the command ran but reported a failure.
pub fn execute_command(args: TermweaveArgs) -> Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match &args.command {
        Command::Expand(expand_args) => runtime.block_on(expand_terms(expand_args, &args)),
        Command::Lookup(lookup_args) => lookup_term(lookup_args, &args),
        Command::Synonyms(synonyms_args) => list_synonyms(synonyms_args, &args),
        Command::CheckKey(check_args) => runtime.block_on(check_key(check_args, &args)),
    }
}

/// Resolve the expander configuration: file first, then flags.
pub fn expander_config(args: &ExpandArgs) -> Result<ExpanderConfig> {
    let mut config = match &args.config {
        Some(path) => ExpanderConfig::load_from_file(path)?,
        None => ExpanderConfig::default(),
    };

    if let Some(path) = &args.synonyms {
        config.synonyms_file = Some(path.clone());
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(device) = args.device {
        config.device = device;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if args.no_original {
        config.include_original = false;
    }
    if args.substring {
        config.match_mode = MatchMode::Substring;
    }
    if let Some(semantic) = args.semantic {
        config.semantic_mode = semantic.into();
    }

    Ok(config)
}

/// Expand every input term.
async fn expand_terms(args: &ExpandArgs, cli_args: &TermweaveArgs) -> Result<ExitCode> {
    let config = expander_config(args)?;
    info!(
        "Building expander with model '{}' (threshold {})",
        config.model, config.threshold
    );
    let expander = TermExpander::from_config(&config).await?;
    let results = expansion_results(&expander, &args.terms, args.detailed).await;

    output_result("Expanded terms", &results, cli_args)?;
    Ok(ExitCode::SUCCESS)
}

/// Expand each term once; the union is taken from the per-term results.
async fn expansion_results(
    expander: &TermExpander,
    terms: &[String],
    detailed: bool,
) -> ExpansionResults {
    let mut inputs = Vec::with_capacity(terms.len());
    for term in terms {
        let details = expander.expand_detailed(term).await;
        let expansions = details.iter().map(|d| d.term.clone()).collect();
        inputs.push(TermExpansion {
            term: term.clone(),
            expansions,
            details: detailed.then_some(details),
        });
    }

    let union: BTreeSet<String> = inputs
        .iter()
        .flat_map(|input| input.expansions.iter().cloned())
        .collect();

    ExpansionResults {
        inputs,
        union: union.into_iter().collect(),
        model: expander.embedder_name().map(str::to_string),
    }
}

/// Load the table used by `lookup` and `synonyms`.
fn load_table(synonyms_file: Option<&Path>, no_defaults: bool) -> Result<SynonymTable> {
    let mut table = if no_defaults {
        SynonymTable::new()
    } else {
        default_synonyms()
    };

    if let Some(path) = synonyms_file {
        info!("Loading synonyms from: {}", path.display());
        table.merge_table(&SynonymTable::load_from_file(path)?);
    }

    Ok(table)
}

/// Show the table entry for a term.
fn lookup_term(args: &LookupArgs, cli_args: &TermweaveArgs) -> Result<ExitCode> {
    let table = load_table(args.synonyms.as_deref(), args.no_defaults)?;
    let result = lookup_entry(&table, &args.term);
    output_result("Synonym lookup", &result, cli_args)?;
    Ok(ExitCode::SUCCESS)
}

fn lookup_entry(table: &SynonymTable, term: &str) -> LookupResult {
    LookupResult {
        term: normalize_term(term),
        found: table.contains(term),
        expansions: table.lookup(term).to_vec(),
    }
}

/// List every entry of the table.
fn list_synonyms(args: &SynonymsArgs, cli_args: &TermweaveArgs) -> Result<ExitCode> {
    let table = load_table(args.synonyms.as_deref(), args.no_defaults)?;

    let listing = SynonymListing {
        total_keys: table.len(),
        entries: table
            .iter()
            .map(|(term, expansions)| SynonymEntry {
                term: term.to_string(),
                expansions: expansions.to_vec(),
            })
            .collect(),
    };

    output_result("Synonym table", &listing, cli_args)?;
    Ok(ExitCode::SUCCESS)
}

/// Check an API key and exit non-zero unless it is valid and, with
/// `--functional`, the follow-up request succeeds.
async fn check_key(args: &CheckKeyArgs, cli_args: &TermweaveArgs) -> Result<ExitCode> {
    let checker = match &args.base_url {
        Some(base_url) => CredentialChecker::with_base_url(base_url.as_str()),
        None => CredentialChecker::new(),
    };

    info!("Testing API key against {}", checker.base_url());
    let status = checker.check(args.api_key.as_deref()).await;

    let functional = if args.functional && status.is_valid() {
        info!("Testing API functionality with '{}'", args.functional_model);
        Some(
            checker
                .check_functional(args.api_key.as_deref(), &args.functional_model)
                .await,
        )
    } else {
        None
    };

    let valid = status.is_valid() && functional.as_ref().is_none_or(CredentialStatus::is_valid);

    let result = KeyCheckResult {
        base_url: checker.base_url().to_string(),
        status,
        functional,
    };
    output_result("API key check", &result, cli_args)?;

    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
