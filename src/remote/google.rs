//! Google Tasks REST client
//!
//! Thin wrapper over the v1 endpoints used by the sync engine. Calls are
//! sequential; list endpoints paginate with the API's pageToken cursor.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::task::{Task, TaskList, TaskStatus};

use super::{RemoteError, RemoteStore, Result};

const BASE_URL: &str = "https://tasks.googleapis.com/tasks/v1";

/// Page size for list endpoints; the API caps at 100.
const MAX_RESULTS: &str = "100";

/// Client for the Google Tasks API, authenticated with a bearer token
/// obtained from [`super::auth::authenticate`].
pub struct GoogleTasksClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GoogleTasksClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent("mdtasks").build()?;
        Ok(Self {
            http,
            base_url: BASE_URL.to_string(),
            access_token: access_token.into(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        context: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await?;
        Ok(Self::check(context, response).await?.json::<T>().await?)
    }

    async fn check(context: &'static str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Api {
            context,
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TasklistsPage {
    #[serde(default)]
    items: Vec<RawTasklist>,
    #[serde(default, rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTasklist {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct TasksPage {
    #[serde(default)]
    items: Vec<RawTask>,
    #[serde(default, rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTask {
    id: String,
    title: String,
    status: Option<String>,
    notes: Option<String>,
    parent: Option<String>,
    position: Option<String>,
    deleted: bool,
}

#[async_trait]
impl RemoteStore for GoogleTasksClient {
    async fn list_tasklists(&self) -> Result<Vec<TaskList>> {
        let url = format!("{}/users/@me/lists", self.base_url);
        let mut lists = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("maxResults", MAX_RESULTS)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: TasklistsPage = self.get_json("Fetching tasklists", &url, &query).await?;
            lists.extend(page.items.into_iter().map(|raw| TaskList {
                id: Some(raw.id),
                title: raw.title,
                tasks: Vec::new(),
            }));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(lists)
    }

    async fn get_tasks(&self, list_id: &str) -> Result<Vec<Task>> {
        let url = format!("{}/lists/{}/tasks", self.base_url, list_id);
        let mut raw = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("maxResults", MAX_RESULTS), ("showHidden", "true")];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: TasksPage = self.get_json("Fetching tasks", &url, &query).await?;
            raw.extend(page.items);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(build_hierarchy(raw))
    }

    async fn create_tasklist(&self, title: &str) -> Result<TaskList> {
        let url = format!("{}/users/@me/lists", self.base_url);
        debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "title": title }))
            .send()
            .await?;
        let raw: RawTasklist = Self::check("Creating tasklist", response)
            .await?
            .json()
            .await?;
        Ok(TaskList {
            id: Some(raw.id),
            title: raw.title,
            tasks: Vec::new(),
        })
    }

    async fn create_task(&self, list_id: &str, task: &Task, parent_id: &str) -> Result<Task> {
        let url = format!("{}/lists/{}/tasks", self.base_url, list_id);
        debug!("POST {url}");
        let mut request = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&create_body(task));
        if !parent_id.is_empty() {
            request = request.query(&[("parent", parent_id)]);
        }
        let raw: RawTask = Self::check("Creating task", request.send().await?)
            .await?
            .json()
            .await?;

        let mut created = task.clone();
        created.id = Some(raw.id);
        if raw.parent.is_some() {
            created.parent = raw.parent;
        }
        Ok(created)
    }

    async fn update_task(&self, list_id: &str, task: &Task) -> Result<Task> {
        let id = match task.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => return Err(RemoteError::MissingTaskId),
        };
        let url = format!("{}/lists/{}/tasks/{}", self.base_url, list_id, id);
        debug!("PATCH {url}");
        // Patch rather than replace so unspecified fields keep their
        // remote values
        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.access_token)
            .json(&update_body(task))
            .send()
            .await?;
        let raw: RawTask = Self::check("Updating task", response).await?.json().await?;

        let mut updated = task.clone();
        updated.id = Some(raw.id);
        Ok(updated)
    }

    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<()> {
        let url = format!("{}/lists/{}/tasks/{}", self.base_url, list_id, task_id);
        debug!("DELETE {url}");
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::check("Deleting task", response).await?;
        Ok(())
    }
}

fn create_body(task: &Task) -> Value {
    let mut body = json!({
        "title": task.title,
        "status": task.status.as_str(),
    });
    if let Some(notes) = &task.notes {
        body["notes"] = json!(notes);
    }
    body
}

/// Body for PATCH. Absent notes serialize as an explicit null so the
/// remote field is cleared instead of left at its previous value.
fn update_body(task: &Task) -> Value {
    json!({
        "title": task.title,
        "status": task.status.as_str(),
        "notes": task.notes,
    })
}

/// Rebuild the two-level hierarchy from the flat task listing.
///
/// Deleted entries are dropped. A task whose parent is not among the
/// fetched top-level tasks is lifted to the root. Roots and children are
/// ordered by the store's position metadata.
fn build_hierarchy(raw: Vec<RawTask>) -> Vec<Task> {
    let top_level_ids: HashSet<String> = raw
        .iter()
        .filter(|t| !t.deleted && t.parent.is_none())
        .map(|t| t.id.clone())
        .collect();

    let mut positions: HashMap<String, String> = HashMap::new();
    let mut roots: Vec<Task> = Vec::new();
    let mut pending: Vec<(String, Task)> = Vec::new();

    for item in raw {
        if item.deleted {
            continue;
        }
        positions.insert(item.id.clone(), item.position.clone().unwrap_or_default());

        let status = match item.status.as_deref() {
            Some("completed") => TaskStatus::Completed,
            _ => TaskStatus::NeedsAction,
        };
        let parent = item.parent.clone();
        let task = Task {
            id: Some(item.id),
            title: item.title,
            status,
            notes: item.notes.filter(|n| !n.is_empty()),
            parent: item.parent,
            children: Vec::new(),
        };

        match parent {
            Some(parent_id) if top_level_ids.contains(&parent_id) => {
                pending.push((parent_id, task));
            }
            _ => roots.push(task),
        }
    }

    let mut children_by_parent: HashMap<String, Vec<Task>> = HashMap::new();
    for (parent_id, child) in pending {
        children_by_parent.entry(parent_id).or_default().push(child);
    }

    roots.sort_by(|a, b| position_of(&positions, a).cmp(position_of(&positions, b)));
    for root in &mut roots {
        if let Some(mut children) = root
            .id
            .as_deref()
            .and_then(|id| children_by_parent.remove(id))
        {
            children.sort_by(|a, b| position_of(&positions, a).cmp(position_of(&positions, b)));
            root.children = children;
        }
    }

    roots
}

fn position_of<'a>(positions: &'a HashMap<String, String>, task: &Task) -> &'a str {
    task.id
        .as_deref()
        .and_then(|id| positions.get(id))
        .map(String::as_str)
        .unwrap_or("")
}
