//! Outline serializer - task list tree to canonical Markdown text

use anyhow::{Context, Result};
use std::path::Path;

use crate::task::TaskList;

/// One level of nesting in the canonical output. The parser accepts a
/// tab as well; output always uses the four-space form.
const INDENT: &str = "    ";

/// Render a task list as outline text.
///
/// The output carries the title heading, one blank line, then each task
/// with its notes and subtasks, and ends with exactly one trailing
/// newline. Nothing is ever emitted deeper than task -> subtask.
pub fn render(list: &TaskList) -> String {
    let mut out = format!("# {}\n\n", list.title);

    for task in &list.tasks {
        out.push_str(&format!("- [{}] {}\n", task.status.mark(), task.title));
        push_notes(&mut out, task.notes.as_deref());

        for child in &task.children {
            out.push_str(&format!(
                "{INDENT}- [{}] {}\n",
                child.status.mark(),
                child.title
            ));
            push_notes(&mut out, child.notes.as_deref());
        }
    }

    out
}

/// Render a task list to a file.
pub fn save_to_file(list: &TaskList, path: &Path) -> Result<()> {
    std::fs::write(path, render(list))
        .with_context(|| format!("Failed to write outline to {:?}", path))
}

fn push_notes(out: &mut String, notes: Option<&str>) {
    let Some(notes) = notes else { return };
    if notes.is_empty() {
        return;
    }
    for line in notes.split('\n') {
        out.push_str(&format!("{INDENT}{line}\n"));
    }
}
