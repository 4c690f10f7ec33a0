//! Integration tests for the export/import orchestration over the
//! file-system surface, against a mock store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use mdtasks::remote::{RemoteError, RemoteStore};
use mdtasks::sync;
use mdtasks::task::{Task, TaskList, TaskStatus};

#[derive(Default)]
struct MockStore {
    lists: Vec<TaskList>,
    tasks_by_list: HashMap<String, Vec<Task>>,
    created_lists: Mutex<Vec<String>>,
    created_tasks: Mutex<Vec<(String, String)>>, // (list id, title)
    next_id: Mutex<u32>,
}

impl MockStore {
    fn with_lists(lists: Vec<(&str, &str)>) -> Self {
        Self {
            lists: lists
                .into_iter()
                .map(|(id, title)| {
                    let mut list = TaskList::new(title);
                    list.id = Some(id.to_string());
                    list
                })
                .collect(),
            ..Default::default()
        }
    }

    fn add_task(&mut self, list_id: &str, task: Task) {
        self.tasks_by_list
            .entry(list_id.to_string())
            .or_default()
            .push(task);
    }

    fn created_lists(&self) -> Vec<String> {
        self.created_lists.lock().unwrap().clone()
    }

    fn created_tasks(&self) -> Vec<(String, String)> {
        self.created_tasks.lock().unwrap().clone()
    }

    fn assign_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("list-{next}")
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    async fn list_tasklists(&self) -> Result<Vec<TaskList>, RemoteError> {
        Ok(self.lists.clone())
    }

    async fn get_tasks(&self, list_id: &str) -> Result<Vec<Task>, RemoteError> {
        Ok(self.tasks_by_list.get(list_id).cloned().unwrap_or_default())
    }

    async fn create_tasklist(&self, title: &str) -> Result<TaskList, RemoteError> {
        self.created_lists.lock().unwrap().push(title.to_string());
        let mut list = TaskList::new(title);
        list.id = Some(self.assign_id());
        Ok(list)
    }

    async fn create_task(
        &self,
        list_id: &str,
        task: &Task,
        _parent_id: &str,
    ) -> Result<Task, RemoteError> {
        self.created_tasks
            .lock()
            .unwrap()
            .push((list_id.to_string(), task.title.clone()));
        let mut created = task.clone();
        created.id = Some(format!("task-{}", task.title));
        Ok(created)
    }

    async fn update_task(&self, _list_id: &str, task: &Task) -> Result<Task, RemoteError> {
        if task.id.is_none() {
            return Err(RemoteError::MissingTaskId);
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, _list_id: &str, _task_id: &str) -> Result<(), RemoteError> {
        Ok(())
    }
}

fn sample_store() -> MockStore {
    let mut store = MockStore::with_lists(vec![("w", "Work"), ("h", "Home")]);
    let mut report = Task::new("Write report", TaskStatus::NeedsAction);
    report.notes = Some("due Friday".to_string());
    store.add_task("w", report);
    store.add_task("h", Task::new("Water plants", TaskStatus::Completed));
    store
}

#[tokio::test]
async fn test_export_directory_writes_one_file_per_list() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();

    sync::export_lists(&store, dir.path(), None).await.unwrap();

    let work = std::fs::read_to_string(dir.path().join("Work.md")).unwrap();
    assert_eq!(work, "# Work\n\n- [ ] Write report\n    due Friday\n");

    let home = std::fs::read_to_string(dir.path().join("Home.md")).unwrap();
    assert_eq!(home, "# Home\n\n- [x] Water plants\n");
}

#[tokio::test]
async fn test_export_directory_filters_by_list_name() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();

    sync::export_lists(&store, dir.path(), Some("Work"))
        .await
        .unwrap();

    assert!(dir.path().join("Work.md").exists());
    assert!(!dir.path().join("Home.md").exists());
}

#[tokio::test]
async fn test_export_creates_missing_directory() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("exports");

    sync::export_lists(&store, &target, None).await.unwrap();

    assert!(target.join("Work.md").exists());
}

#[tokio::test]
async fn test_export_single_file_requires_list_name() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();

    let err = sync::export_lists(&store, &dir.path().join("out.md"), None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("list-name must be specified"));
}

#[tokio::test]
async fn test_export_single_file_writes_named_list() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("work.md");

    sync::export_lists(&store, &target, Some("Work"))
        .await
        .unwrap();

    let content = std::fs::read_to_string(&target).unwrap();
    assert_eq!(content, "# Work\n\n- [ ] Write report\n    due Friday\n");
}

#[tokio::test]
async fn test_export_unknown_list_name_fails() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();

    let err = sync::export_lists(&store, &dir.path().join("out.md"), Some("Nope"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("'Nope' not found"));
}

#[tokio::test]
async fn test_export_sanitizes_filenames() {
    let mut store = MockStore::with_lists(vec![("q", "Q4 / Plans?")]);
    store.add_task("q", Task::new("Ship it", TaskStatus::NeedsAction));
    let dir = tempfile::tempdir().unwrap();

    sync::export_lists(&store, dir.path(), None).await.unwrap();

    assert!(dir.path().join("Q4  Plans.md").exists());
}

#[tokio::test]
async fn test_import_file_creates_list_from_document_title() {
    let store = MockStore::default();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("anything.md");
    std::fs::write(&file, "# Groceries\n\n- [ ] Milk\n- [x] Bread\n").unwrap();

    sync::import_files(&store, &file, None).await.unwrap();

    assert_eq!(store.created_lists(), vec!["Groceries".to_string()]);
    assert_eq!(
        store.created_tasks(),
        vec![
            ("list-1".to_string(), "Milk".to_string()),
            ("list-1".to_string(), "Bread".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_import_file_syncs_into_existing_list() {
    let store = MockStore::with_lists(vec![("g", "Groceries")]);
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("groceries.md");
    std::fs::write(&file, "# Groceries\n\n- [ ] Milk\n").unwrap();

    sync::import_files(&store, &file, None).await.unwrap();

    assert!(store.created_lists().is_empty());
    assert_eq!(
        store.created_tasks(),
        vec![("g".to_string(), "Milk".to_string())]
    );
}

#[tokio::test]
async fn test_import_untitled_document_uses_filename_stem() {
    let store = MockStore::default();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("todo.md");
    std::fs::write(&file, "- [ ] A\n").unwrap();

    sync::import_files(&store, &file, None).await.unwrap();

    assert_eq!(store.created_lists(), vec!["todo".to_string()]);
}

#[tokio::test]
async fn test_import_list_name_overrides_document_title() {
    let store = MockStore::default();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("todo.md");
    std::fs::write(&file, "# Ignored Title\n\n- [ ] A\n").unwrap();

    sync::import_files(&store, &file, Some("Custom"))
        .await
        .unwrap();

    assert_eq!(store.created_lists(), vec!["Custom".to_string()]);
}

#[tokio::test]
async fn test_import_directory_picks_up_outline_files_only() {
    let store = MockStore::default();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("alpha.md"), "# Alpha\n\n- [ ] A\n").unwrap();
    std::fs::write(dir.path().join("beta.md"), "# Beta\n\n- [ ] B\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not an outline").unwrap();

    sync::import_files(&store, dir.path(), None).await.unwrap();

    let mut created = store.created_lists();
    created.sort();
    assert_eq!(created, vec!["Alpha".to_string(), "Beta".to_string()]);
}

#[tokio::test]
async fn test_import_missing_path_fails_before_any_mutation() {
    let store = MockStore::default();

    let err = sync::import_files(&store, std::path::Path::new("/nonexistent/tasks.md"), None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not found"));
    assert!(store.created_lists().is_empty());
    assert!(store.created_tasks().is_empty());
}
