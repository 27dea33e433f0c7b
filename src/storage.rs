//! The storage module provides database operations for storing and retrieving
//! blog projects and their posts using SQLite.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::convert::TryFrom;
use std::sync::{Arc, Mutex};

use crate::Theme;
use crate::profile::StyleProfile;

const PROJECT_COLUMNS: &str = "id, name, description, website_purpose, html_file_path, \
    css_file_path, hosted_css_filename, hosted_js_filename, style_profile, theme, \
    blog_template, post_template, created_at";

const POST_COLUMNS: &str =
    "id, project_id, title, raw_content, html_content, meta_description, created_at, updated_at";

/// Storage provides database operations for blog projects and posts.
pub struct Storage {
    /// The underlying SQLite connection wrapped in Arc<Mutex<>> to make it thread-safe
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Creates a new Storage instance with a database at the specified path.
    ///
    /// # Arguments
    ///
    /// * `database_path` - Path where the database file should be created or opened
    ///
    /// # Returns
    ///
    /// Returns a new Storage instance on success, or an error if database creation fails
    ///
    /// # Errors
    ///
    /// Returns an error if database creation fails
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Unable to open database: {database_path}"))?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Initializes the database schema with the projects and posts tables if they don't exist.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
                PRAGMA foreign_keys = ON;
                CREATE TABLE IF NOT EXISTS projects (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    description TEXT NULL,
                    website_purpose TEXT NULL,
                    html_file_path TEXT NULL,
                    css_file_path TEXT NULL,
                    hosted_css_filename TEXT NULL,
                    hosted_js_filename TEXT NULL,
                    style_profile TEXT NULL,
                    theme TEXT NOT NULL DEFAULT 'default',
                    blog_template TEXT NULL,
                    post_template TEXT NULL,
                    created_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS posts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    raw_content TEXT NOT NULL,
                    html_content TEXT NOT NULL,
                    meta_description TEXT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
            "#,
        )?;

        Ok(())
    }

    /// Creates an empty project.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name of the project
    /// * `description` - Optional free-text description
    ///
    /// # Returns
    ///
    /// Returns the id of the new project
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn create_project(&self, name: &str, description: Option<&str>) -> Result<i64> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        conn.execute(
            "INSERT INTO projects (name, description, created_at) VALUES (?1, ?2, ?3)",
            params![name, description, Utc::now().timestamp()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Returns every project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a stored row is malformed
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id ASC"
        ))?;
        let rows: Result<Vec<ProjectRow>, rusqlite::Error> =
            stmt.query_map([], ProjectRow::from_row)?.collect();

        rows?.into_iter().map(Project::try_from).collect()
    }

    /// Gets a project by id.
    ///
    /// # Arguments
    ///
    /// * `id` - The project id to look up
    ///
    /// # Returns
    ///
    /// Returns the project if found, None if not found
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or the stored row is malformed
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
        ))?;
        let project_row = stmt
            .query_row([id], ProjectRow::from_row)
            .optional()
            .map_err(|e| anyhow::anyhow!("Unable to fetch project row: {e}"))?;

        project_row.map(Project::try_from).transpose()
    }

    /// Stores every mutable project field.
    ///
    /// # Arguments
    ///
    /// * `project` - The project to persist; its `id` selects the row
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be serialized or database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn update_project(&self, project: &Project) -> Result<()> {
        let style_profile = project
            .style_profile
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("Unable to serialize style profile")?;

        let conn = self.conn.lock().expect("Storage mutex poisoned");
        conn.execute(
            "UPDATE projects SET name = ?1, description = ?2, website_purpose = ?3,
                html_file_path = ?4, css_file_path = ?5, hosted_css_filename = ?6,
                hosted_js_filename = ?7, style_profile = ?8, theme = ?9,
                blog_template = ?10, post_template = ?11
             WHERE id = ?12",
            params![
                project.name,
                project.description,
                project.website_purpose,
                project.html_file_path,
                project.css_file_path,
                project.hosted_css_filename,
                project.hosted_js_filename,
                style_profile,
                project.theme.as_str(),
                project.blog_template,
                project.post_template,
                project.id
            ],
        )?;

        Ok(())
    }

    /// Removes a project together with its posts.
    ///
    /// # Returns
    ///
    /// Returns `true` if a project was removed
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn delete_project(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let deleted = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Adds a post to a project.
    ///
    /// # Arguments
    ///
    /// * `post` - The new post; both timestamps are set to now
    ///
    /// # Returns
    ///
    /// Returns the id of the new post
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails, including an unknown project id
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn insert_post(&self, post: &NewPost) -> Result<i64> {
        let now = Utc::now().timestamp();
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        conn.execute(
            "INSERT INTO posts (project_id, title, raw_content, html_content, meta_description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                post.project_id,
                post.title,
                post.raw_content,
                post.html_content,
                post.meta_description,
                now
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Gets a post by id.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or the stored row is malformed
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"))?;
        let post_row = stmt
            .query_row([id], PostRow::from_row)
            .optional()
            .map_err(|e| anyhow::anyhow!("Unable to fetch post row: {e}"))?;

        post_row.map(Post::try_from).transpose()
    }

    /// Returns the posts of a project in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a stored row is malformed
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn list_posts(&self, project_id: i64) -> Result<Vec<Post>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE project_id = ?1 ORDER BY created_at ASC, id ASC"
        ))?;
        let rows: Result<Vec<PostRow>, rusqlite::Error> =
            stmt.query_map([project_id], PostRow::from_row)?.collect();

        rows?.into_iter().map(Post::try_from).collect()
    }

    /// Replaces a post's editable fields and bumps its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn update_post(&self, post: &Post) -> Result<()> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        conn.execute(
            "UPDATE posts SET title = ?1, raw_content = ?2, html_content = ?3,
                meta_description = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                post.title,
                post.raw_content,
                post.html_content,
                post.meta_description,
                Utc::now().timestamp(),
                post.id
            ],
        )?;

        Ok(())
    }

    /// Removes a post.
    ///
    /// # Returns
    ///
    /// Returns `true` if a post was removed
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn delete_post(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

/// Represents a project stored in the database
#[derive(Debug)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website_purpose: Option<String>,
    pub html_file_path: Option<String>,
    pub css_file_path: Option<String>,
    pub hosted_css_filename: Option<String>,
    pub hosted_js_filename: Option<String>,
    pub style_profile: Option<String>,
    pub theme: String,
    pub blog_template: Option<String>,
    pub post_template: Option<String>,
    pub created_at: i64,
}

impl ProjectRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            website_purpose: row.get(3)?,
            html_file_path: row.get(4)?,
            css_file_path: row.get(5)?,
            hosted_css_filename: row.get(6)?,
            hosted_js_filename: row.get(7)?,
            style_profile: row.get(8)?,
            theme: row.get(9)?,
            blog_template: row.get(10)?,
            post_template: row.get(11)?,
            created_at: row.get(12)?,
        })
    }
}

/// Represents domain Project
#[derive(Debug, Clone)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website_purpose: Option<String>,
    pub html_file_path: Option<String>,
    pub css_file_path: Option<String>,
    pub hosted_css_filename: Option<String>,
    pub hosted_js_filename: Option<String>,
    pub style_profile: Option<StyleProfile>,
    pub theme: Theme,
    pub blog_template: Option<String>,
    pub post_template: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = anyhow::Error;

    fn try_from(project_row: ProjectRow) -> Result<Self> {
        let style_profile: Option<StyleProfile> = project_row
            .style_profile
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .context("Unable to parse style profile from database")?;

        Ok(Project {
            id: project_row.id,
            name: project_row.name,
            description: project_row.description,
            website_purpose: project_row.website_purpose,
            html_file_path: project_row.html_file_path,
            css_file_path: project_row.css_file_path,
            hosted_css_filename: project_row.hosted_css_filename,
            hosted_js_filename: project_row.hosted_js_filename,
            style_profile,
            theme: project_row
                .theme
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?,
            blog_template: project_row.blog_template,
            post_template: project_row.post_template,
            created_at: DateTime::from_timestamp_secs(project_row.created_at)
                .context("Unable to initialize created_at from database")?,
        })
    }
}

/// Represents a post stored in the database
#[derive(Debug)]
pub struct PostRow {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub raw_content: String,
    pub html_content: String,
    pub meta_description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PostRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            title: row.get(2)?,
            raw_content: row.get(3)?,
            html_content: row.get(4)?,
            meta_description: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

/// Represents domain Post
#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub raw_content: String,
    /// Formatted fragment, or a complete document if it contains `<html`.
    pub html_content: String,
    pub meta_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a post that is not stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub project_id: i64,
    pub title: String,
    pub raw_content: String,
    pub html_content: String,
    pub meta_description: Option<String>,
}

impl TryFrom<PostRow> for Post {
    type Error = anyhow::Error;

    fn try_from(post_row: PostRow) -> Result<Self> {
        Ok(Post {
            id: post_row.id,
            project_id: post_row.project_id,
            title: post_row.title,
            raw_content: post_row.raw_content,
            html_content: post_row.html_content,
            meta_description: post_row.meta_description,
            created_at: DateTime::from_timestamp_secs(post_row.created_at)
                .context("Unable to initialize created_at from database")?,
            updated_at: DateTime::from_timestamp_secs(post_row.updated_at)
                .context("Unable to initialize updated_at from database")?,
        })
    }
}
