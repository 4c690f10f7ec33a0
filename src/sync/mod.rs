//! Reconciliation engine and the export/import orchestration on top of it
//!
//! Sync is a one-directional mirror: the local tree wins, and titles are
//! the only cross-tree identity key. Renaming a task locally is therefore
//! indistinguishable from deleting the old title and creating a new one.

use anyhow::{bail, Context, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use crate::markdown;
use crate::remote::RemoteStore;
use crate::task::{Task, TaskList};

/// File extension recognized as an outline document.
const OUTLINE_EXT: &str = "md";

/// Make the remote list identified by `remote_list_id` match `local`.
///
/// Remote tasks whose titles appear nowhere in the local tree are
/// deleted first (children before their parent); the remaining local
/// tasks are then updated or created in document order. Store-assigned
/// ids are written back into `local` so children can be created under a
/// just-created parent. Delete failures are reported as warnings and the
/// pass continues; a create or update failure aborts the run with no
/// rollback.
pub async fn reconcile(
    local: &mut TaskList,
    remote_list_id: &str,
    store: &impl RemoteStore,
) -> Result<()> {
    let remote_tasks = store.get_tasks(remote_list_id).await?;

    // Title index across both remote levels. A duplicate title keeps
    // only the last entry indexed.
    let mut remote_by_title: HashMap<String, Task> = HashMap::new();
    for task in &remote_tasks {
        remote_by_title.insert(task.title.clone(), task.clone());
        for child in &task.children {
            remote_by_title.insert(child.title.clone(), child.clone());
        }
    }

    let mut local_titles: HashSet<String> = HashSet::new();
    for task in &local.tasks {
        local_titles.insert(task.title.clone());
        for child in &task.children {
            local_titles.insert(child.title.clone());
        }
    }

    // Deletion pass, children before their parent
    for task in &remote_tasks {
        for child in &task.children {
            if !local_titles.contains(&child.title) {
                delete_remote(store, remote_list_id, child, "subtask").await;
            }
        }
        if !local_titles.contains(&task.title) {
            delete_remote(store, remote_list_id, task, "task").await;
        }
    }

    // Create/update pass in local document order
    for task in &mut local.tasks {
        let parent_id = sync_task(store, remote_list_id, &remote_by_title, task, "").await?;
        for child in &mut task.children {
            sync_task(store, remote_list_id, &remote_by_title, child, &parent_id).await?;
        }
    }

    Ok(())
}

async fn delete_remote(store: &impl RemoteStore, list_id: &str, task: &Task, kind: &str) {
    let Some(id) = task.id.as_deref() else { return };
    debug!("Deleting {kind} '{}' ({id})", task.title);
    if let Err(err) = store.delete_task(list_id, id).await {
        eprintln!("Warning: failed to delete {kind} '{}': {err}", task.title);
    }
}

/// Update or create one local task and return its resolved remote id.
async fn sync_task(
    store: &impl RemoteStore,
    list_id: &str,
    remote_by_title: &HashMap<String, Task>,
    local: &mut Task,
    parent_id: &str,
) -> Result<String> {
    if let Some(remote) = remote_by_title.get(&local.title) {
        // Matched by title: push local status and notes onto the remote
        // entry, absent notes included (they clear the remote field)
        let mut task = remote.clone();
        task.status = local.status;
        task.notes = local.notes.clone();
        let updated = store
            .update_task(list_id, &task)
            .await
            .with_context(|| format!("Failed to update task '{}'", local.title))?;
        local.id = updated.id;
    } else {
        let created = store
            .create_task(list_id, local, parent_id)
            .await
            .with_context(|| format!("Failed to create task '{}'", local.title))?;
        local.id = created.id;
    }

    local
        .id
        .clone()
        .with_context(|| format!("Remote store returned no id for task '{}'", local.title))
}

/// Export remote lists as outline documents.
///
/// A directory target (an existing directory, or any path without the
/// `.md` extension) receives one file per list, optionally filtered to a
/// single named list. A `.md` file target requires `list_name` and
/// receives exactly that list.
pub async fn export_lists(
    store: &impl RemoteStore,
    output_path: &Path,
    list_name: Option<&str>,
) -> Result<()> {
    let remote_lists = store
        .list_tasklists()
        .await
        .context("Failed to get tasklists")?;

    let single_file = !output_path.is_dir()
        && output_path
            .extension()
            .is_some_and(|ext| ext == OUTLINE_EXT);

    if !single_file {
        if !output_path.exists() {
            std::fs::create_dir_all(output_path)
                .with_context(|| format!("Failed to create directory {:?}", output_path))?;
        }

        for list in remote_lists {
            if let Some(name) = list_name {
                if list.title != name {
                    continue;
                }
            }
            let list = fetch_list(store, list).await?;
            let file_path = output_path.join(format!("{}.{OUTLINE_EXT}", filename_for(&list.title)));
            markdown::save_to_file(&list, &file_path)?;
            println!("Exported '{}' to {}", list.title, file_path.display());
        }
        return Ok(());
    }

    let Some(name) = list_name else {
        bail!("list-name must be specified when exporting to a single file");
    };
    let Some(list) = remote_lists.into_iter().find(|l| l.title == name) else {
        bail!("Task list '{name}' not found on Google Tasks");
    };
    let list = fetch_list(store, list).await?;
    markdown::save_to_file(&list, output_path)?;
    println!("Exported '{}' to {}", list.title, output_path.display());
    Ok(())
}

async fn fetch_list(store: &impl RemoteStore, list: TaskList) -> Result<TaskList> {
    let id = list
        .id
        .clone()
        .with_context(|| format!("Remote list '{}' has no id", list.title))?;
    let tasks = store
        .get_tasks(&id)
        .await
        .with_context(|| format!("Failed to get tasks for list {}", list.title))?;
    Ok(TaskList { tasks, ..list })
}

/// Import outline documents into remote lists.
///
/// A directory imports every `.md` file it contains; each document syncs
/// to the remote list matching its title, created when absent. A single
/// file may override the target title with `list_name`, and falls back
/// to the filename stem when the document carries no real title.
pub async fn import_files(
    store: &impl RemoteStore,
    input_path: &Path,
    list_name: Option<&str>,
) -> Result<()> {
    let remote_lists = store
        .list_tasklists()
        .await
        .context("Failed to get tasklists")?;
    let mut lists_by_title: HashMap<String, TaskList> = remote_lists
        .into_iter()
        .map(|list| (list.title.clone(), list))
        .collect();

    if !input_path.exists() {
        bail!("File or directory not found: {:?}", input_path);
    }

    if input_path.is_dir() {
        let entries = std::fs::read_dir(input_path)
            .with_context(|| format!("Failed to read directory {:?}", input_path))?;
        let mut paths: Vec<_> = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        paths.sort();

        for path in paths {
            if path.is_dir() || path.extension().is_none_or(|ext| ext != OUTLINE_EXT) {
                continue;
            }
            let mut local = markdown::load_from_file(&path)?;
            let target_title = local.title.clone();
            import_one(store, &mut lists_by_title, &mut local, target_title, &path).await?;
        }
        return Ok(());
    }

    let mut local = markdown::load_from_file(input_path)?;
    let target_title = target_title_for(&local.title, list_name, input_path);
    import_one(store, &mut lists_by_title, &mut local, target_title, input_path).await
}

async fn import_one(
    store: &impl RemoteStore,
    lists_by_title: &mut HashMap<String, TaskList>,
    local: &mut TaskList,
    target_title: String,
    source: &Path,
) -> Result<()> {
    let target = match lists_by_title.get(&target_title) {
        Some(existing) => {
            println!(
                "Syncing {} to existing list '{}'...",
                source.display(),
                target_title
            );
            existing.clone()
        }
        None => {
            let created = store
                .create_tasklist(&target_title)
                .await
                .context("Failed to create tasklist")?;
            println!(
                "Created new list '{}' and syncing from {}...",
                target_title,
                source.display()
            );
            lists_by_title.insert(target_title.clone(), created.clone());
            created
        }
    };

    let list_id = target
        .id
        .as_deref()
        .with_context(|| format!("Remote list '{}' has no id", target_title))?;
    reconcile(local, list_id, store)
        .await
        .with_context(|| format!("Failed to sync tasklist '{target_title}'"))?;
    println!("Successfully imported {}", source.display());
    Ok(())
}

/// Reduce a list title to a safe file stem.
fn filename_for(title: &str) -> String {
    let name: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let name = name.trim_end();
    if name.is_empty() {
        "untitled-list".to_string()
    } else {
        name.to_string()
    }
}

/// Title of the remote list an imported document should land in: the
/// explicit override first, then the document title, then the filename
/// stem when the document has no real title of its own.
fn target_title_for(doc_title: &str, override_name: Option<&str>, path: &Path) -> String {
    let title = override_name.unwrap_or(doc_title);
    if !title.is_empty() && title != markdown::UNTITLED_LIST {
        return title.to_string();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| title.to_string())
}
