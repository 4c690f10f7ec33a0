//! Task data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion state of a task, matching the Tasks API wire values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Not yet completed
    #[default]
    NeedsAction,
    /// Checked off
    Completed,
}

impl TaskStatus {
    /// Parse a checkbox mark (` `, `x`, or `X`).
    pub fn from_mark(mark: &str) -> Self {
        if mark.eq_ignore_ascii_case("x") {
            Self::Completed
        } else {
            Self::NeedsAction
        }
    }

    /// The checkbox mark used on output (always lowercase).
    pub fn mark(&self) -> char {
        match self {
            Self::Completed => 'x',
            Self::NeedsAction => ' ',
        }
    }

    /// The wire string used by the Tasks API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsAction => "needsAction",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the two-level task hierarchy.
///
/// Titles act as the matching key during reconciliation, so sibling-set
/// title collisions are ambiguous and only the last-indexed match wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Remote identifier; absent for local tasks not yet created remotely
    #[serde(default)]
    pub id: Option<String>,

    /// Display title, the cross-tree identity key
    pub title: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Free-text notes; may span multiple lines
    #[serde(default)]
    pub notes: Option<String>,

    /// Remote parent reference; informational only once the tree is built
    #[serde(default)]
    pub parent: Option<String>,

    /// Direct subtasks. The outline format supports exactly one level of
    /// nesting, so children never carry children of their own.
    #[serde(default)]
    pub children: Vec<Task>,
}

impl Task {
    /// Create a task with no id, notes, or children.
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            status,
            ..Default::default()
        }
    }
}

/// Root container: a titled, ordered sequence of top-level tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    /// Remote identifier, assigned by the store
    #[serde(default)]
    pub id: Option<String>,

    /// List title
    pub title: String,

    /// Top-level tasks in document order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Create an empty list.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}
