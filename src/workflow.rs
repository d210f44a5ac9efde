//! Sequential commit workflow orchestration.
//!
//! Sequences the repository checks, staging, message parsing, the optional
//! remote rewrite, the version decision, confirmation and the commit/tag/push
//! side effects. The first failing step short-circuits the remainder.

use crate::config::{Config, TagConfig};
use crate::domain::{CommitMessage, Version, VersionBump};
use crate::error::{AutoCommitError, Result};
use crate::git_ops::GitRepo;
use crate::{manifest, rewrite, ui};

/// Workflow inputs, decoupled from the clap argument struct so the workflow
/// can be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowArgs {
    /// Raw commit description from the command line
    pub description: String,

    /// Stage all working tree changes before committing
    pub stage_all: bool,

    /// Force a major bump regardless of commit type
    pub force_major: bool,

    /// Update the configured version file before committing
    pub write_version: bool,

    /// Create and push an annotated tag when a bump was decided
    pub create_tag: bool,
}

/// How a workflow run ended. All three are successful terminations.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// A commit was created and pushed
    Committed {
        title: String,
        tag: Option<String>,
    },
    /// Nothing was staged, so there was nothing to do
    NothingToCommit,
    /// The user declined at the confirmation prompt
    Cancelled,
}

/// Versioning decisions for one commit, computed before any side effect.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitPlan {
    pub current_version: Version,
    pub new_version: Option<Version>,
    pub tag_name: Option<String>,
    /// Latest tag that could not be parsed as a version; the caller reports it
    pub ignored_tag: Option<String>,
}

/// Derive the version plan from the parsed message and the latest tag.
///
/// A missing tag, or one that does not parse as a version, counts as version
/// 0.0.0; the malformed tag is carried in the plan for the caller to report,
/// never treated as an error. A `None` bump decision propagates as "no new
/// version, no tag".
pub fn plan_commit(
    message: &CommitMessage,
    latest_tag: Option<&str>,
    force_major: bool,
    tag_config: &TagConfig,
) -> CommitPlan {
    let (current_version, ignored_tag) = match latest_tag {
        Some(tag) => match Version::parse_tag(tag) {
            Some(version) => (version, None),
            None => (Version::ZERO, Some(tag.to_string())),
        },
        None => (Version::ZERO, None),
    };

    let bump = VersionBump::decide(message.commit_type(), force_major);
    let new_version = bump.map(|b| current_version.bump(b));
    let tag_name = new_version.map(|v| tag_config.format(&v.to_string()));

    CommitPlan {
        current_version,
        new_version,
        tag_name,
        ignored_tag,
    }
}

/// Run the full workflow against an open repository.
///
/// `confirm` supplies the interactive yes/no answer; `main` passes
/// [ui::confirm_action], tests pass a canned answer.
pub fn run(
    repo: &GitRepo,
    args: &WorkflowArgs,
    config: &Config,
    confirm: impl Fn(&str) -> Result<bool>,
) -> Result<WorkflowOutcome> {
    repo.identity()?;

    ui::display_status(&format!(
        "Syncing with remote '{}'...",
        config.remote.name
    ));
    repo.pull(&config.remote.name)?;

    if args.stage_all {
        repo.stage_all()?;
    }

    let files = repo.staged_files()?;
    if files.is_empty() {
        ui::display_status("Nothing to commit");
        return Ok(WorkflowOutcome::NothingToCommit);
    }

    // Parse before any further side effect so a bad description fails fast
    let raw = args.description.trim();
    let parsed = CommitMessage::parse(raw)
        .map_err(|e| AutoCommitError::validation(e.to_string()))?;

    let diff = match repo.staged_diff() {
        Ok(diff) => diff,
        Err(e) => {
            ui::display_warning(&format!(
                "Could not build the staged diff ({}); sending the description alone",
                e
            ));
            String::new()
        }
    };
    let revised = rewrite::revise_commit_message(raw, &diff, &config.rewrite);
    let message = CommitMessage::parse(&revised).unwrap_or(parsed);

    let latest_tag = repo.latest_tag()?;
    let plan = plan_commit(&message, latest_tag.as_deref(), args.force_major, &config.tag);
    if let Some(tag) = plan.ignored_tag.as_deref() {
        ui::display_warning(&format!(
            "Cannot parse tag '{}' as a version; assuming 0.0.0",
            tag
        ));
    }

    ui::display_commit_summary(
        &message,
        &files,
        &plan.current_version,
        plan.new_version.as_ref(),
    );

    if !confirm("Proceed with commit?")? {
        repo.unstage_all()?;
        ui::display_status("Commit cancelled; staged changes were reset");
        return Ok(WorkflowOutcome::Cancelled);
    }

    if args.write_version {
        if let Some(new_version) = plan.new_version.as_ref() {
            // Resolve against the repository root, not the process cwd, so the
            // written file is the same one stage_path records in the index
            let version_path = repo.workdir()?.join(&config.version_file.path);
            manifest::write_version(&version_path, new_version)?;
            repo.stage_path(&config.version_file.path)?;
            ui::display_success(&format!(
                "Updated {} to {}",
                config.version_file.path, new_version
            ));
        }
    }

    let title = message.commit_title();
    let body = message.commit_body();
    repo.commit(&title, body.as_deref())?;
    ui::display_success(&format!("Committed: {}", title));

    repo.push(&config.remote.name)?;
    ui::display_success(&format!("Pushed to '{}'", config.remote.name));

    let mut pushed_tag = None;
    if args.create_tag {
        if let Some(tag_name) = plan.tag_name.as_ref() {
            repo.create_tag(tag_name, &title)?;
            repo.push_tag(tag_name, &config.remote.name)?;
            ui::display_success(&format!("Published tag {}", tag_name));
            pushed_tag = Some(tag_name.clone());
        }
    }

    Ok(WorkflowOutcome::Committed {
        title,
        tag: pushed_tag,
    })
}
