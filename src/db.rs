use std::collections::HashMap;
use std::sync::Mutex;

use crate::uuid::UuidGenerator;

/// Errors surfaced by a [`DatabaseManager`].
///
/// `FirstIndexNonExistant`/`SecondIndexNonExistant` are part of the
/// documented error surface but unreachable under the auto-materialising
/// swap policy this implementation chose (see DESIGN.md) — swapping an
/// unmaterialised id materialises it instead of failing.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    FirstIndexNonExistant,
    SecondIndexNonExistant,
    ManagerClosed,
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::FirstIndexNonExistant => write!(f, "first index non-existant"),
            DbError::SecondIndexNonExistant => write!(f, "second index non-existant"),
            DbError::ManagerClosed => write!(f, "manager is closed"),
        }
    }
}

impl std::error::Error for DbError {}

/// A single logical database. Physical storage and key-level operations
/// are out of scope for this crate (see spec §1); only enough surface to
/// satisfy `DatabaseManager::get`'s return type is provided.
pub trait Database: Send + Sync {
    /// The UUID-style name this logical database resolved to.
    fn name(&self) -> &str;
}

struct NamedDatabase {
    name: String,
}

impl Database for NamedDatabase {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Resolves logical database ids (as used by SELECT/SWAPDB) to physical
/// databases. Out of scope for this crate is the file-backed persistence
/// the full system uses (see spec §1/§6); this in-memory stand-in
/// implements the same narrow interface so the dispatcher's built-in
/// commands have something real to call.
pub trait DatabaseManager: Send + Sync {
    fn get(&self, id: i64) -> Result<Box<dyn Database>, DbError>;
    fn swap(&self, a: i64, b: i64) -> Result<(), DbError>;
    fn close(&self) -> Result<(), DbError>;
}

pub struct InMemoryDatabaseManager {
    generator: Box<dyn UuidGenerator>,
    databases: Mutex<Option<HashMap<i64, String>>>,
}

impl InMemoryDatabaseManager {
    pub fn new(generator: Box<dyn UuidGenerator>) -> InMemoryDatabaseManager {
        InMemoryDatabaseManager {
            generator,
            databases: Mutex::new(Some(HashMap::new())),
        }
    }

    /// Returns the name for `id`, materialising one via the UUID
    /// generator if this is the first time `id` has been seen.
    fn materialise(
        databases: &mut HashMap<i64, String>,
        generator: &dyn UuidGenerator,
        id: i64,
    ) -> String {
        databases
            .entry(id)
            .or_insert_with(|| generator.generate_time_counter())
            .clone()
    }
}

impl DatabaseManager for InMemoryDatabaseManager {
    fn get(&self, id: i64) -> Result<Box<dyn Database>, DbError> {
        let mut guard = self.databases.lock().unwrap();
        let databases = guard.as_mut().ok_or(DbError::ManagerClosed)?;
        let name = Self::materialise(databases, self.generator.as_ref(), id);
        Ok(Box::new(NamedDatabase { name }))
    }

    fn swap(&self, a: i64, b: i64) -> Result<(), DbError> {
        let mut guard = self.databases.lock().unwrap();
        let databases = guard.as_mut().ok_or(DbError::ManagerClosed)?;
        // Materialise both sides first (a missing logical database is not
        // an error — the manager auto-materialises it) then swap names.
        let name_a = Self::materialise(databases, self.generator.as_ref(), a);
        let name_b = Self::materialise(databases, self.generator.as_ref(), b);
        databases.insert(a, name_b);
        databases.insert(b, name_a);
        Ok(())
    }

    fn close(&self) -> Result<(), DbError> {
        let mut guard = self.databases.lock().unwrap();
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uuid::TimeCounterGenerator;

    fn manager() -> InMemoryDatabaseManager {
        InMemoryDatabaseManager::new(Box::new(TimeCounterGenerator::new()))
    }

    #[test]
    fn get_materialises_a_database_on_first_access() {
        let m = manager();
        let db = m.get(5).unwrap();
        assert_eq!(db.name().len(), 36);
    }

    #[test]
    fn get_is_stable_across_calls() {
        let m = manager();
        let first = m.get(3).unwrap().name().to_string();
        let second = m.get(3).unwrap().name().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn swap_exchanges_materialised_names() {
        let m = manager();
        let a_before = m.get(5).unwrap().name().to_string();
        let b_before = m.get(6).unwrap().name().to_string();
        m.swap(5, 6).unwrap();
        assert_eq!(m.get(5).unwrap().name(), b_before);
        assert_eq!(m.get(6).unwrap().name(), a_before);
    }

    #[test]
    fn swap_auto_materialises_unmaterialised_ids() {
        let m = manager();
        assert!(m.swap(10, 11).is_ok());
    }

    #[test]
    fn operations_fail_once_closed() {
        let m = manager();
        m.close().unwrap();
        assert_eq!(m.get(1).unwrap_err(), DbError::ManagerClosed);
        assert_eq!(m.swap(1, 2).unwrap_err(), DbError::ManagerClosed);
    }
}
