//! CLI command implementations
//!
//! Mutating commands follow one sequence:
//! 1. Load and verify the state file
//! 2. Apply the operation (fail-closed in the core)
//! 3. Write the state file back
//!
//! Nothing is written when step 2 fails.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::config::Config;
use crate::identity::{DocumentIdentity, Environment};
use crate::observability::{Logger, ObservationScope};
use crate::store::StateFile;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct CommandContext {
    config: Config,
    state: StateFile,
}

impl CommandContext {
    pub fn new(config: Config, state_path: Option<PathBuf>) -> Self {
        let path = state_path.unwrap_or_else(|| config.state_path());
        let state = StateFile::new(path, config.fsync);
        Self { config, state }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state_path(&self) -> &Path {
        self.state.path()
    }

    fn environment(&self) -> Environment {
        Environment::system(&self.config.auto_revision_label).0
    }

    fn load(&self) -> CliResult<DocumentIdentity> {
        load_document(&self.state, self.environment())
    }

    fn store(&self, doc: &DocumentIdentity) -> CliResult<()> {
        self.state.write(&doc.to_manifest())?;
        Ok(())
    }
}

fn load_document(state: &StateFile, env: Environment) -> CliResult<DocumentIdentity> {
    if !state.exists() {
        return Err(CliError::not_initialized(state.path()));
    }
    let manifest = state.read()?;
    Ok(DocumentIdentity::from_manifest(&manifest, env)?)
}

/// Parse arguments, run the command and print its response.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let config = Config::load_or_default(cli.config.as_deref())?;
    Logger::set_threshold(config.severity());
    let ctx = CommandContext::new(config, cli.state);

    match run_command(&ctx, cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run one command and return its response payload.
pub fn run_command(ctx: &CommandContext, cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Init { force } => init(ctx, force),
        Command::Open => mutate(ctx, "OPEN", |doc| {
            doc.begin_session();
            Ok(())
        }),
        Command::Save => mutate(ctx, "SAVE", |doc| Ok(doc.adjust_history_on_save()?)),
        Command::AutoRevision { mode } => mutate(ctx, "AUTO_REVISION", |doc| {
            Ok(doc.set_auto_revisioning(mode.is_on())?)
        }),
        Command::MarkRevisions { mode } => mutate(ctx, "MARK_REVISIONS", |doc| {
            doc.set_mark_revisions(mode.is_on());
            Ok(())
        }),
        Command::ShowRevisions { mode } => mutate(ctx, "SHOW_REVISIONS", |doc| {
            doc.set_show_revisions(mode.is_on());
            Ok(())
        }),
        Command::AddRevision {
            id,
            description,
            version,
        } => mutate(ctx, "ADD_REVISION", |doc| {
            let version = version.unwrap_or_else(|| doc.version());
            let now = doc.environment().clock.now();
            Ok(doc.add_revision(id, description.as_deref(), now, version)?)
        }),
        Command::PurgeHistory => mutate(ctx, "PURGE_HISTORY", |doc| {
            doc.purge_history();
            Ok(())
        }),
        Command::History => Ok(history_json(&ctx.load()?)),
        Command::Revisions => Ok(revisions_json(&ctx.load()?)),
        Command::Show => Ok(summary_json(&ctx.load()?)),
        Command::Nearest { version, greater } => {
            let doc = ctx.load()?;
            Ok(json!({
                "version": version,
                "greater": greater,
                "revision_id": doc.find_nearest_auto_revision_id(version, !greater),
            }))
        }
        Command::Related { other } => related(ctx, &other),
    }
}

/// Create a fresh document identity.
fn init(ctx: &CommandContext, force: bool) -> CliResult<Value> {
    if ctx.state.exists() && !force {
        return Err(CliError::already_initialized(ctx.state_path()));
    }

    let scope = ObservationScope::new("INIT");
    let doc = match DocumentIdentity::new(ctx.environment()) {
        Ok(doc) => doc,
        Err(e) => {
            scope.fail(&e);
            return Err(e.into());
        }
    };
    ctx.store(&doc)?;
    scope.complete_with_fields(&[("uuid", doc.doc_uuid_string().as_str())]);

    Ok(summary_json(&doc))
}

/// Load, apply `op`, store. The state file is untouched if `op` fails.
fn mutate(
    ctx: &CommandContext,
    name: &str,
    op: impl FnOnce(&mut DocumentIdentity) -> CliResult<()>,
) -> CliResult<Value> {
    let mut doc = ctx.load()?;
    let path = ctx.state_path().display().to_string();
    let scope = ObservationScope::with_fields(name, &[("path", path.as_str())]);

    if let Err(e) = op(&mut doc) {
        scope.complete_with_fields(&[("outcome", "rejected"), ("code", e.code_str())]);
        return Err(e);
    }

    ctx.store(&doc)?;
    scope.complete_with_fields(&[("version", doc.version().to_string().as_str())]);
    Ok(summary_json(&doc))
}

fn related(ctx: &CommandContext, other: &Path) -> CliResult<Value> {
    let doc = ctx.load()?;
    let other_state = StateFile::new(other, ctx.config.fsync);
    let other_doc = load_document(&other_state, ctx.environment())?;

    Ok(json!({
        "related": doc.are_documents_related(&other_doc),
        "histories_equal": doc.are_document_histories_equal(&other_doc),
        "uuid": doc.doc_uuid_string(),
        "other_uuid": other_doc.doc_uuid_string(),
    }))
}

fn summary_json(doc: &DocumentIdentity) -> Value {
    json!({
        "uuid": doc.doc_uuid_string(),
        "version": doc.version(),
        "history_count": doc.history_count(),
        "revision_count": doc.revisions().len(),
        "highest_revision_id": doc.highest_revision_id(),
        "auto_revisioning": doc.is_auto_revisioning(),
        "mark_revisions": doc.is_marking_revisions(),
        "show_revisions": doc.is_showing_revisions(),
        "show_revision_id": doc.show_revision_id(),
        "last_opened_time": doc.last_opened_time(),
        "last_saved_time": doc.last_saved_time(),
    })
}

fn history_json(doc: &DocumentIdentity) -> Value {
    let entries: Vec<Value> = doc
        .history()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            json!({
                "index": i,
                "id": v.id(),
                "uuid": v.uid().to_string(),
                "start_time": v.start_time(),
                "save_time": v.time(),
                "edit_time_secs": v.edit_time(),
                "auto_revision": v.is_auto_revisioned(),
            })
        })
        .collect();
    Value::Array(entries)
}

fn revisions_json(doc: &DocumentIdentity) -> Value {
    let entries: Vec<Value> = doc
        .revisions()
        .iter()
        .map(|r| {
            json!({
                "id": r.id(),
                "description": r.description(),
                "start_time": r.start_time(),
                "version": r.version(),
            })
        })
        .collect();
    Value::Array(entries)
}
