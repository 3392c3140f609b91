//! Migration pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Discover**: list the reglament files, one per service
//! 2. **Scan**: collect the rejection reasons and criteria of each reglament
//! 3. **Resolve**: fill in record identifiers from the dictionaries
//! 4. **Assemble**: render every service into one PL/pgSQL script
//! 5. **Output**: write the script and fingerprint it
//!
//! Failures confined to one reglament or one dictionary are recorded on the
//! service and noted in the script; only discovery and output are fatal.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use reglament_dictionary::{DictionarySource, locate_dictionary, resolve_dictionary};
use reglament_ingest::{ReglamentFile, discover_reglaments, scan_reglament_file};
use reglament_model::{DictionaryKind, PendingLookups, ServiceStats};
use reglament_sql::{ScriptBuilder, ScriptOptions, ServiceSection, script_digest, write_script};

/// Inputs and outputs of a `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub reglaments_dir: PathBuf,
    pub dictionaries_dir: PathBuf,
    pub output: PathBuf,
    pub script: ScriptOptions,
    /// Assemble and summarize without writing the script.
    pub dry_run: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            reglaments_dir: PathBuf::from("reglaments"),
            dictionaries_dir: PathBuf::from("dictionaries"),
            output: PathBuf::from("script_to_add_rejection_reasons.sql"),
            script: ScriptOptions::default(),
            dry_run: false,
        }
    }
}

/// What happened to one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOutcome {
    pub service: String,
    pub path: PathBuf,
    pub stats: ServiceStats,
    /// Dictionary files that were consulted, as `path (scope)`.
    pub dictionaries: Vec<String>,
    pub errors: Vec<String>,
}

/// Result of a `generate` run, also written as the JSON run report.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub output: PathBuf,
    pub written: bool,
    pub sha256: String,
    pub totals: ServiceStats,
    pub services: Vec<ServiceOutcome>,
    #[serde(skip)]
    pub script: String,
}

impl GenerateResult {
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.services.iter().flat_map(|outcome| {
            outcome
                .errors
                .iter()
                .map(move |error| (outcome.service.as_str(), error.as_str()))
        })
    }

    pub fn has_errors(&self) -> bool {
        self.services.iter().any(|outcome| !outcome.errors.is_empty())
    }
}

// ============================================================================
// Stages 2-3: Scan and resolve
// ============================================================================

/// A service ready for script assembly.
#[derive(Debug, Clone)]
pub struct PreparedService {
    pub section: ServiceSection,
    pub dictionaries: Vec<String>,
    pub errors: Vec<String>,
}

/// Scan one reglament and resolve its lookups.
///
/// Never fails: problems are returned as errors and as notes on the section.
pub fn prepare_service(file: &ReglamentFile, dictionaries_dir: &Path) -> PreparedService {
    let span = info_span!("service", service = %file.service);
    let _guard = span.enter();

    let mut section = ServiceSection::new(file.service.clone(), file.path.clone());
    let mut dictionaries = Vec::new();
    let mut errors = Vec::new();

    section.lookups = match scan_reglament_file(&file.path) {
        Ok(lookups) => lookups,
        Err(error) => {
            warn!(path = %file.path.display(), %error, "reglament skipped");
            section.notes.push(format!("reglament skipped: {error}"));
            errors.push(error.to_string());
            PendingLookups::default()
        }
    };

    for kind in DictionaryKind::ALL {
        if section.lookups.pending_for(kind) == 0 {
            debug!(dictionary = %kind, "nothing pending, dictionary not consulted");
            continue;
        }
        match resolve_dictionary(dictionaries_dir, &file.service, kind, &mut section.lookups) {
            Ok(resolution) => {
                section
                    .notes
                    .push(format!("{kind} from {}", resolution.source));
                dictionaries.push(resolution.source.to_string());
            }
            Err(error) => {
                warn!(dictionary = %kind, %error, "dictionary resolution failed");
                section.notes.push(format!("{kind} not resolved: {error}"));
                errors.push(error.to_string());
            }
        }
    }

    PreparedService {
        section,
        dictionaries,
        errors,
    }
}

// ============================================================================
// Full run
// ============================================================================

/// Run every stage and return the assembled script with its outcomes.
pub fn run_generate(config: &GenerateConfig) -> Result<GenerateResult> {
    let start = Instant::now();
    let files = discover_reglaments(&config.reglaments_dir).with_context(|| {
        format!(
            "discover reglaments in {}",
            config.reglaments_dir.display()
        )
    })?;
    info!(
        reglaments = files.len(),
        root = %config.reglaments_dir.display(),
        "reglaments discovered"
    );

    let mut builder = ScriptBuilder::new(config.script.clone());
    let mut services = Vec::with_capacity(files.len());
    for file in &files {
        let prepared = prepare_service(file, &config.dictionaries_dir);
        let stats = builder.push_service(&prepared.section);
        services.push(ServiceOutcome {
            service: file.service.clone(),
            path: file.path.clone(),
            stats,
            dictionaries: prepared.dictionaries,
            errors: prepared.errors,
        });
    }

    let totals = builder.totals();
    let script = builder.finish();
    let sha256 = script_digest(&script);

    let written = if config.dry_run {
        info!(path = %config.output.display(), "dry run, script not written");
        false
    } else {
        write_script(&config.output, &script)
            .with_context(|| format!("write script {}", config.output.display()))?;
        true
    };

    info!(
        services = services.len(),
        entries = totals.entries(),
        unresolved = totals.unresolved,
        elapsed = ?start.elapsed(),
        "generation complete"
    );

    Ok(GenerateResult {
        output: config.output.clone(),
        written,
        sha256,
        totals,
        services,
        script,
    })
}

/// Write the run report as pretty-printed JSON.
pub fn write_report(path: &Path, result: &GenerateResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("serialize run report")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("write run report {}", path.display()))?;
    info!(path = %path.display(), "run report written");
    Ok(())
}

// ============================================================================
// Service listing
// ============================================================================

/// A discovered reglament with the dictionaries that would serve it.
#[derive(Debug, Clone)]
pub struct ServicePlan {
    pub service: String,
    pub path: PathBuf,
    pub dictionaries: Vec<(DictionaryKind, Option<DictionarySource>)>,
}

/// List the services under `reglaments_dir` without scanning them.
pub fn plan_services(reglaments_dir: &Path, dictionaries_dir: &Path) -> Result<Vec<ServicePlan>> {
    let files = discover_reglaments(reglaments_dir)
        .with_context(|| format!("discover reglaments in {}", reglaments_dir.display()))?;
    Ok(files
        .into_iter()
        .map(|file| {
            let dictionaries = DictionaryKind::ALL
                .into_iter()
                .map(|kind| (kind, locate_dictionary(dictionaries_dir, &file.service, kind)))
                .collect();
            ServicePlan {
                service: file.service,
                path: file.path,
                dictionaries,
            }
        })
        .collect())
}
