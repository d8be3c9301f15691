//! Text summary builder for CLI output.
//!
//! Formats the state of an edit session as human-readable lines for text mode.

use crate::column::Column;
use crate::session::EditColumnController;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary of the session's mode, column, suggestions and validity.
pub(crate) fn build_text_summary(controller: &EditColumnController) -> TextSummary {
    let mut lines = vec![format!("Mode: {}", controller.mode().as_str())];

    if let Some(column) = controller.column() {
        lines.push(format!("Title: {}", or_dash(column.title())));
        lines.push(format!("Slug: {}", or_dash(column.slug())));
        lines.push(format!("Width: {}", column.width()));

        if column.applied_filters().is_empty() {
            lines.push("Filters: -".to_string());
        } else {
            lines.push("Filters:".to_string());
        }
        for (i, applied) in column.applied_filters().iter().enumerate() {
            let label = match column.filter_definition(i) {
                Some(def) => format!("{} ({})", def.name(), def.filter_type()),
                None => "<unresolved>".to_string(),
            };
            match applied.value() {
                Some(value) => lines.push(format!("  {}. {label} = {value}", i + 1)),
                None => lines.push(format!("  {}. {label}", i + 1)),
            }
        }

        if let Some(old) = controller.old_column() {
            // Both sides go through the same catalog so bound filters flatten alike.
            let before = Column::new(old.clone(), column.catalog()).unwrap();
            let modified = column.unwrap() != before;
            lines.push(format!("Modified: {}", if modified { "yes" } else { "no" }));
        }
    }

    if controller.slug_options().is_empty() {
        lines.push("Slug suggestions: -".to_string());
    } else {
        lines.push(format!(
            "Slug suggestions: {}",
            controller.slug_options().join(", ")
        ));
    }

    lines.push(format!(
        "Valid: {}",
        if controller.is_column_valid() {
            "yes"
        } else {
            "no (save disabled)"
        }
    ));

    TextSummary { lines }
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}
