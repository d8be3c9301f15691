use crate::column::Column;
use crate::model::{ColumnRecord, FilterRecord, SessionConfig};
use crate::session::{ControllerOptions, EditColumnController, ReportContext, SlugClient};
use crate::text_summary::build_text_summary;
use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "column-editor",
    version,
    about = "Open a report column edit session and report whether it can be saved"
)]
pub struct Cli {
    /// URL of the slug suggestion endpoint
    #[arg(long)]
    pub slug_endpoint: String,

    /// JSON file with the available filter definitions
    #[arg(long)]
    pub filters: Option<PathBuf>,

    /// JSON file describing the enclosing report
    #[arg(long)]
    pub report_context: Option<PathBuf>,

    /// Existing column (JSON) to edit; a new column is created when omitted
    #[arg(long)]
    pub column: Option<PathBuf>,

    /// Set the column title
    #[arg(long)]
    pub title: Option<String>,

    /// Set the column slug
    #[arg(long)]
    pub slug: Option<String>,

    /// Set the column width
    #[arg(long)]
    pub width: Option<u32>,

    /// Use the first slug suggestion when the column has no slug
    #[arg(long)]
    pub suggest_slug: bool,

    /// Timeout for slug suggestion requests
    #[arg(long, default_value = "10s")]
    pub timeout: humantime::Duration,

    /// Print the session as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Exit with an error when the column is not valid
    #[arg(long)]
    pub require_valid: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Build a `SessionConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> SessionConfig {
    SessionConfig {
        slug_endpoint: args.slug_endpoint.clone(),
        request_timeout: Duration::from(args.timeout),
        user_agent: format!("column-editor/{}", env!("CARGO_PKG_VERSION")),
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Build the controller from CLI inputs without opening a session.
pub(crate) fn build_controller(args: &Cli) -> Result<EditColumnController> {
    let cfg = build_config(args);
    let available_filters: Vec<FilterRecord> = match args.filters.as_deref() {
        Some(path) => load_json(path)?,
        None => Vec::new(),
    };
    let report_context: serde_json::Value = match args.report_context.as_deref() {
        Some(path) => load_json(path)?,
        None => serde_json::Value::Null,
    };
    info!(filters = available_filters.len(), "loaded filter catalog");
    Ok(EditColumnController::new(ControllerOptions {
        slug_client: SlugClient::new(&cfg)?,
        report_context: ReportContext::fixed(report_context),
        available_filters,
    }))
}

/// Apply title/slug/width overrides to the open column.
pub(crate) fn apply_edits(args: &Cli, controller: &mut EditColumnController) {
    let Some(column) = controller.column_mut() else {
        return;
    };
    if let Some(title) = args.title.as_deref() {
        column.set_title(title);
    }
    if let Some(slug) = args.slug.as_deref() {
        column.set_slug(slug);
    }
    if let Some(width) = args.width {
        column.set_width(width);
    }
}

fn fill_suggested_slug(controller: &mut EditColumnController) {
    let Some(first) = controller.slug_options().first().cloned() else {
        return;
    };
    if let Some(column) = controller.column_mut() {
        if column.slug().is_empty() {
            info!(slug = %first, "using suggested slug");
            column.set_slug(first);
        }
    }
}

/// Open a session, apply edits, wait for slug suggestions, and print the result.
pub async fn run(args: Cli) -> Result<()> {
    let mut controller = build_controller(&args)?;

    match args.column.as_deref() {
        Some(path) => {
            let record: ColumnRecord = load_json(path)?;
            controller.set(&Column::new(record, None));
        }
        None => controller.set_new(),
    }
    apply_edits(&args, &mut controller);
    controller.settle().await;
    if args.suggest_slug {
        fill_suggested_slug(&mut controller);
    }

    if args.json {
        let out = serde_json::to_string_pretty(&controller.report())?;
        println!("{out}");
    } else {
        for line in build_text_summary(&controller).lines {
            println!("{line}");
        }
    }

    if args.require_valid && !controller.is_column_valid() {
        return Err(anyhow::anyhow!(
            "column is not valid: both title and slug are required"
        ));
    }
    Ok(())
}
