use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    migrate::MigrateDatabase, query, query_as, query_scalar, sqlite::SqlitePoolOptions, Pool,
    Sqlite,
};

use crate::error::StoreError;
use crate::model::Todo;
use crate::schema::{FilterOptions, NewTodo, UpdateTodoSchema};

const CREATE_TODOS_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    completed BOOLEAN NOT NULL DEFAULT 0,
    priority TEXT NOT NULL DEFAULT 'medium',
    category TEXT NOT NULL DEFAULT 'General',
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);"#;

const TODO_COLUMNS: &str =
    "id, title, description, completed, priority, category, due_date, created_at, updated_at";

/// Persistence boundary for Todo records. Handlers only talk to this
/// trait, so the filter and stats logic can be tested against the
/// in-memory backend without a database.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Matching records, newest-created first.
    async fn list(&self, filter: &FilterOptions) -> Result<Vec<Todo>, StoreError>;
    async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError>;
    async fn create(&self, new: NewTodo) -> Result<Todo, StoreError>;
    /// Applies the patch and refreshes `updated_at`. `None` if the id
    /// does not resolve.
    async fn update(&self, id: i64, patch: &UpdateTodoSchema) -> Result<Option<Todo>, StoreError>;
    /// Removes the record and returns it. `None` if the id does not
    /// resolve.
    async fn delete(&self, id: i64) -> Result<Option<Todo>, StoreError>;
    /// Distinct category values currently in use, sorted.
    async fn categories(&self) -> Result<Vec<String>, StoreError>;
}

/// Sqlite-backed store used in production.
pub struct SqliteTodoStore {
    pool: Pool<Sqlite>,
}

impl SqliteTodoStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `db_url` and ensure the todos
    /// table exists.
    pub async fn connect(db_url: &str) -> Result<Self, StoreError> {
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            tracing::info!(db_url, "creating database");
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(db_url)
            .await?;

        query(CREATE_TODOS_TABLE).execute(&pool).await?;
        tracing::info!(db_url, "database ready");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn list(&self, filter: &FilterOptions) -> Result<Vec<Todo>, StoreError> {
        let mut sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE 1 = 1");
        if filter.category.is_some() {
            sql.push_str(" AND LOWER(category) = LOWER(?)");
        }
        if filter.priority.is_some() {
            sql.push_str(" AND priority = ?");
        }
        if filter.completed.is_some() {
            sql.push_str(" AND completed = ?");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut q = query_as::<_, Todo>(&sql);
        if let Some(category) = &filter.category {
            q = q.bind(category);
        }
        if let Some(priority) = &filter.priority {
            q = q.bind(priority);
        }
        if let Some(completed) = filter.completed {
            q = q.bind(completed);
        }

        let todos = q.fetch_all(&self.pool).await?;
        Ok(todos)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let todo = query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn create(&self, new: NewTodo) -> Result<Todo, StoreError> {
        let now = Utc::now();
        let todo = query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, description, completed, priority, category, due_date, created_at, updated_at) \
             VALUES (?, ?, 0, ?, ?, ?, ?, ?) RETURNING {TODO_COLUMNS}"
        ))
        .bind(new.title)
        .bind(new.description)
        .bind(new.priority)
        .bind(new.category)
        .bind(new.due_date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = todo.id, "todo created");
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: &UpdateTodoSchema) -> Result<Option<Todo>, StoreError> {
        let Some(mut todo) = self.get(id).await? else {
            return Ok(None);
        };

        patch.apply(&mut todo);
        todo.updated_at = Utc::now();

        query(
            "UPDATE todos SET title = ?, description = ?, completed = ?, priority = ?, \
             category = ?, due_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.priority)
        .bind(&todo.category)
        .bind(todo.due_date)
        .bind(todo.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(todo))
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let Some(todo) = self.get(id).await? else {
            return Ok(None);
        };

        query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(id, "todo deleted");
        Ok(Some(todo))
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let categories =
            query_scalar::<_, String>("SELECT DISTINCT category FROM todos ORDER BY category")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }
}

/// In-memory store backed by a plain Vec; tests use it to exercise
/// handlers without sqlite.
#[derive(Default)]
pub struct MemTodoStore {
    inner: Mutex<MemInner>,
}

#[derive(Default)]
struct MemInner {
    todos: Vec<Todo>,
    next_id: i64,
}

impl MemTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemTodoStore {
    async fn list(&self, filter: &FilterOptions) -> Result<Vec<Todo>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut todos: Vec<Todo> = inner
            .todos
            .iter()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.todos.iter().find(|todo| todo.id == id).cloned())
    }

    async fn create(&self, new: NewTodo) -> Result<Todo, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: inner.next_id,
            title: new.title,
            description: new.description,
            completed: false,
            priority: new.priority,
            category: new.category,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
        };
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: &UpdateTodoSchema) -> Result<Option<Todo>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(todo) = inner.todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(None);
        };
        patch.apply(todo);
        todo.updated_at = Utc::now();
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(index) = inner.todos.iter().position(|todo| todo.id == id) else {
            return Ok(None);
        };
        Ok(Some(inner.todos.remove(index)))
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut categories: Vec<String> = Vec::new();
        for todo in &inner.todos {
            if !categories.contains(&todo.category) {
                categories.push(todo.category.clone());
            }
        }
        categories.sort();
        Ok(categories)
    }
}
