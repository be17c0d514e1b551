#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use calbridge_common::testing::TempDir;
use calbridge_core::{MethodResult, ResultHandle};
use calbridge_domain::{AccessLevel, Reply};
use calbridge_infra::database::{DbManager, SqliteCalendarStore};

/// Temporary calendar store that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestStore {
    pub manager: Arc<DbManager>,
    pub store: Arc<SqliteCalendarStore>,
    _temp_dir: TempDir,
}

impl TestStore {
    /// Create a migrated store with no calendars.
    pub fn new() -> Self {
        let temp_dir = TempDir::new("infra-test").expect("temp dir should be created");
        let db_path = temp_dir.path().join("calendar.db");

        let manager = Arc::new(DbManager::new(&db_path, 2).expect("db manager should be created"));
        manager.run_migrations().expect("migrations should run");
        let store = Arc::new(SqliteCalendarStore::new(Arc::clone(&manager)));

        Self { manager, store, _temp_dir: temp_dir }
    }

    /// Seed a calendar and return its id.
    pub fn calendar(&self, name: &str, access: AccessLevel) -> i64 {
        self.store
            .insert_calendar(name, access, "tester@example.com")
            .expect("calendar should be inserted")
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Reply sink collecting deliveries.
#[derive(Default)]
pub struct CollectingResult {
    replies: Mutex<Vec<Reply>>,
}

impl CollectingResult {
    pub fn handle() -> (Arc<Self>, ResultHandle) {
        let sink = Arc::new(Self::default());
        let handle = ResultHandle::new(sink.clone());
        (sink, handle)
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }
}

impl MethodResult for CollectingResult {
    fn deliver(&self, reply: Reply) {
        self.replies.lock().unwrap().push(reply);
    }
}
