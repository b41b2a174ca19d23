use crate::db::{SqlRecord, SqliteStore};
use crate::error::PortalError;
use crate::listview::ListRecord;
use crate::mock;
use crate::records::{Announcement, Grade, Resource};

/// Data-access collaborator a page consumes. Implementations decide the
/// transport; the controller only sees these four calls.
pub trait RecordStore<R: ListRecord> {
    fn list(&self) -> Result<Vec<R>, PortalError>;
    fn create(&mut self, record: R) -> Result<R, PortalError>;
    fn update(&mut self, id: &str, patch: R::Patch) -> Result<R, PortalError>;
    fn delete(&mut self, id: &str) -> Result<(), PortalError>;
}

/// In-process store standing in for a remote data service.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub announcements: Vec<Announcement>,
    pub resources: Vec<Resource>,
    pub grades: Vec<Grade>,
}

impl MemoryStore {
    pub fn seeded() -> Self {
        Self {
            announcements: mock::announcements(),
            resources: mock::resources(),
            grades: mock::grades(),
        }
    }
}

/// Maps a record type to its collection inside [`MemoryStore`].
pub trait MemoryTable: ListRecord + Sized {
    fn table(store: &MemoryStore) -> &Vec<Self>;
    fn table_mut(store: &mut MemoryStore) -> &mut Vec<Self>;
}

impl MemoryTable for Announcement {
    fn table(store: &MemoryStore) -> &Vec<Self> {
        &store.announcements
    }
    fn table_mut(store: &mut MemoryStore) -> &mut Vec<Self> {
        &mut store.announcements
    }
}

impl MemoryTable for Resource {
    fn table(store: &MemoryStore) -> &Vec<Self> {
        &store.resources
    }
    fn table_mut(store: &mut MemoryStore) -> &mut Vec<Self> {
        &mut store.resources
    }
}

impl MemoryTable for Grade {
    fn table(store: &MemoryStore) -> &Vec<Self> {
        &store.grades
    }
    fn table_mut(store: &mut MemoryStore) -> &mut Vec<Self> {
        &mut store.grades
    }
}

impl<R: MemoryTable> RecordStore<R> for MemoryStore {
    fn list(&self) -> Result<Vec<R>, PortalError> {
        Ok(R::table(self).clone())
    }

    fn create(&mut self, record: R) -> Result<R, PortalError> {
        let table = R::table_mut(self);
        if table.iter().any(|r| r.id() == record.id()) {
            return Err(PortalError::validation("id", "already exists"));
        }
        table.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, id: &str, patch: R::Patch) -> Result<R, PortalError> {
        let slot = R::table_mut(self)
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| PortalError::not_found(R::KIND, id))?;
        // Patch a copy so a rejected field leaves the stored record intact.
        let mut next = slot.clone();
        next.apply_patch(patch)?;
        *slot = next.clone();
        Ok(next)
    }

    fn delete(&mut self, id: &str) -> Result<(), PortalError> {
        let table = R::table_mut(self);
        let Some(pos) = table.iter().position(|r| r.id() == id) else {
            return Err(PortalError::not_found(R::KIND, id));
        };
        table.remove(pos);
        Ok(())
    }
}

/// The store the process currently talks to.
pub enum Backend<'a> {
    Memory(&'a mut MemoryStore),
    Sqlite(SqliteStore<'a>),
}

impl<R: MemoryTable + SqlRecord> RecordStore<R> for Backend<'_> {
    fn list(&self) -> Result<Vec<R>, PortalError> {
        match self {
            Backend::Memory(m) => RecordStore::<R>::list(&**m),
            Backend::Sqlite(s) => RecordStore::<R>::list(s),
        }
    }

    fn create(&mut self, record: R) -> Result<R, PortalError> {
        match self {
            Backend::Memory(m) => RecordStore::<R>::create(&mut **m, record),
            Backend::Sqlite(s) => RecordStore::<R>::create(s, record),
        }
    }

    fn update(&mut self, id: &str, patch: R::Patch) -> Result<R, PortalError> {
        match self {
            Backend::Memory(m) => RecordStore::<R>::update(&mut **m, id, patch),
            Backend::Sqlite(s) => RecordStore::<R>::update(s, id, patch),
        }
    }

    fn delete(&mut self, id: &str) -> Result<(), PortalError> {
        match self {
            Backend::Memory(m) => RecordStore::<R>::delete(&mut **m, id),
            Backend::Sqlite(s) => RecordStore::<R>::delete(s, id),
        }
    }
}
