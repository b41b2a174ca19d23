use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::Deserialize;

use crate::config::Settings;
use crate::db::{self, SqliteStore};
use crate::listview::ListViewController;
use crate::mock;
use crate::records::{Announcement, ClassInfo, Grade, Resource};
use crate::shell::ClassShell;
use crate::store::{Backend, MemoryStore};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Mounted page state. `None` means the page is not open.
#[derive(Debug, Default)]
pub struct Pages {
    pub announcements: Option<ListViewController<Announcement>>,
    pub lecturer_resources: Option<ListViewController<Resource>>,
    pub student_resources: Option<ListViewController<Resource>>,
    pub grades: Option<ListViewController<Grade>>,
}

pub struct AppState {
    pub settings: Settings,
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub memory: MemoryStore,
    pub classes: Vec<ClassInfo>,
    pub pages: Pages,
    pub class_shell: Option<ClassShell>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let memory = if settings.seeds_mock() {
            MemoryStore::seeded()
        } else {
            MemoryStore::default()
        };
        Self {
            settings,
            workspace: None,
            db: None,
            memory,
            classes: mock::classes(),
            pages: Pages::default(),
            class_shell: None,
        }
    }

    /// Switches the record store to the workspace database. Open pages are
    /// unmounted since their records came from the previous store.
    pub fn open_workspace(&mut self, path: &Path) -> anyhow::Result<()> {
        let conn = db::open_db(path)?;
        if self.settings.seeds_mock() && db::seed_once(&conn)? {
            tracing::info!(workspace = %path.display(), "seeded new workspace");
        }
        self.db = Some(conn);
        self.workspace = Some(path.to_path_buf());
        self.pages = Pages::default();
        Ok(())
    }

    pub fn backend_kind(&self) -> &'static str {
        if self.db.is_some() {
            "sqlite"
        } else {
            "memory"
        }
    }

    /// Borrows the active store alongside the page state.
    pub fn split(&mut self) -> (Backend<'_>, &mut Pages) {
        let backend = match self.db.as_ref() {
            Some(conn) => Backend::Sqlite(SqliteStore::new(conn)),
            None => Backend::Memory(&mut self.memory),
        };
        (backend, &mut self.pages)
    }
}
