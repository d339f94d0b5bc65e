use crate::utils::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Case-insensitive match on the three recognized names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Canonical todo record. Serialized camelCase at the HTTP boundary;
/// persistence goes through [`TodoRow`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/todos`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<serde_json::Value>,
}

/// Body of `PUT /api/todos/:id`. `dueDate: null` and an absent `dueDate`
/// are different requests.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<serde_json::Value>>,
    pub completed: Option<bool>,
}

fn present<'de, D>(d: D) -> std::result::Result<Option<Option<serde_json::Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<serde_json::Value>::deserialize(d).map(Some)
}

/// Lenient due-date parsing. Anything unparseable yields `None`.
pub fn parse_due_date(raw: &serde_json::Value) -> Option<DateTime<Utc>> {
    match raw {
        serde_json::Value::String(s) => parse_date_str(s),
        serde_json::Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

pub fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    // Date-only strings are midnight UTC.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::Validation(
            "Title must be less than 100 characters".into(),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> AppResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::Validation(
            "Description must be less than 500 characters".into(),
        ));
    }
    Ok(())
}

/// Validated and normalized input for a new todo.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
        }
    }

    pub fn from_request(req: CreateTodo) -> AppResult<Self> {
        let title = req.title.unwrap_or_default();
        validate_title(&title)?;
        let description = req.description.unwrap_or_default();
        validate_description(&description)?;

        Ok(Self {
            title,
            description,
            priority: req
                .priority
                .as_deref()
                .and_then(Priority::parse)
                .unwrap_or_default(),
            due_date: req.due_date.as_ref().and_then(parse_due_date),
        })
    }

    pub fn into_todo(self, id: String, now: DateTime<Utc>) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            due_date: self.due_date,
            completed: false,
            created_at: now,
            updated_at: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DueDateChange {
    #[default]
    Unchanged,
    Clear,
    Set(DateTime<Utc>),
}

/// Normalized partial update. `None` fields keep their prior value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: DueDateChange,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn from_request(req: UpdateTodo) -> AppResult<Self> {
        if let Some(title) = &req.title {
            validate_title(title)?;
        }
        if let Some(description) = &req.description {
            validate_description(description)?;
        }

        // An unrecognized priority leaves the stored one alone.
        let priority = req.priority.as_deref().and_then(Priority::parse);

        let due_date = match req.due_date {
            None => DueDateChange::Unchanged,
            Some(None) => DueDateChange::Clear,
            Some(Some(raw)) => match parse_due_date(&raw) {
                Some(dt) => DueDateChange::Set(dt),
                None => DueDateChange::Unchanged,
            },
        };

        Ok(Self {
            title: req.title,
            description: req.description,
            priority,
            due_date,
            completed: req.completed,
        })
    }

    pub fn toggle(current: &Todo) -> Self {
        Self {
            completed: Some(!current.completed),
            ..Self::default()
        }
    }

    pub fn apply(&self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        match self.due_date {
            DueDateChange::Unchanged => {}
            DueDateChange::Clear => todo.due_date = None,
            DueDateChange::Set(dt) => todo.due_date = Some(dt),
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        todo.updated_at = Some(now);
    }

    /// PostgREST patch body holding only the fields that change.
    pub fn to_row_patch(&self, now: DateTime<Utc>) -> serde_json::Value {
        let mut body = serde_json::json!({ "updated_at": now.to_rfc3339() });
        if let Some(title) = &self.title {
            body["title"] = serde_json::Value::String(title.clone());
        }
        if let Some(description) = &self.description {
            body["description"] = serde_json::Value::String(description.clone());
        }
        if let Some(priority) = self.priority {
            body["priority"] = serde_json::Value::String(priority.as_str().to_string());
        }
        match self.due_date {
            DueDateChange::Unchanged => {}
            DueDateChange::Clear => body["due_date"] = serde_json::Value::Null,
            DueDateChange::Set(dt) => body["due_date"] = serde_json::Value::String(dt.to_rfc3339()),
        }
        if let Some(completed) = self.completed {
            body["completed"] = serde_json::Value::Bool(completed);
        }
        body
    }
}

/// Row shape of the `todos` table.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TodoRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            priority: row
                .priority
                .as_deref()
                .and_then(Priority::parse)
                .unwrap_or_default(),
            due_date: row.due_date.as_deref().and_then(parse_date_str),
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Todo> for TodoRow {
    fn from(todo: &Todo) -> Self {
        TodoRow {
            id: todo.id.clone(),
            title: todo.title.clone(),
            description: Some(todo.description.clone()),
            priority: Some(todo.priority.as_str().to_string()),
            due_date: todo.due_date.map(|d| d.to_rfc3339()),
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}
