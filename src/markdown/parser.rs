//! Outline parser - Markdown text to a task list tree

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

use crate::task::{Task, TaskList, TaskStatus};

use super::UNTITLED_LIST;

/// Parse an outline document into a task list.
///
/// Blank lines carry no meaning, and lines matching no recognized form
/// are silently dropped. The format supports exactly one level of
/// nesting; an indented line that is not a valid subtask line is note
/// text for whichever task is currently open.
pub fn parse(content: &str) -> TaskList {
    let title_re = Regex::new(r"^# (.*)").unwrap();
    let task_re = Regex::new(r"^- \[( |x|X)\] (.*)").unwrap();
    let subtask_re = Regex::new(r"^(    |\t)- \[( |x|X)\] (.*)").unwrap();
    let note_re = Regex::new(r"^(    |\t)(.*)").unwrap();

    let mut title = UNTITLED_LIST.to_string();
    let mut title_set = false;
    let mut tasks: Vec<Task> = Vec::new();
    // The current task is always the last one pushed; this flag tracks
    // whether a subtask is open under it.
    let mut subtask_open = false;

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }

        // Only the first title line counts; later ones are dropped
        if let Some(caps) = title_re.captures(line) {
            if !title_set {
                title = caps[1].trim().to_string();
                title_set = true;
            }
            continue;
        }

        if let Some(caps) = task_re.captures(line) {
            tasks.push(Task::new(caps[2].trim(), TaskStatus::from_mark(&caps[1])));
            subtask_open = false;
            continue;
        }

        if let Some(caps) = subtask_re.captures(line) {
            // A subtask before any task line has nothing to attach to
            if let Some(task) = tasks.last_mut() {
                task.children
                    .push(Task::new(caps[3].trim(), TaskStatus::from_mark(&caps[2])));
                subtask_open = true;
            }
            continue;
        }

        if let Some(caps) = note_re.captures(line) {
            let rest = caps.get(2).map_or("", |m| m.as_str());
            // A remainder still shaped like a checkbox marker is a
            // malformed task line; drop it rather than absorb it as text
            if rest.starts_with("- [") {
                continue;
            }
            let target = match tasks.last_mut() {
                Some(task) if subtask_open => task.children.last_mut(),
                Some(task) => Some(task),
                None => None,
            };
            if let Some(target) = target {
                match &mut target.notes {
                    Some(notes) => {
                        notes.push('\n');
                        notes.push_str(rest);
                    }
                    None => target.notes = Some(rest.to_string()),
                }
            }
        }
    }

    TaskList {
        id: None,
        title,
        tasks,
    }
}

/// Parse an outline document from a file.
pub fn load_from_file(path: &Path) -> Result<TaskList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read outline from {:?}", path))?;
    Ok(parse(&content))
}
