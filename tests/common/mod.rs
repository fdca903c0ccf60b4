//! Shared fixtures for the integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use pantry_orders::db::{DbPool, establish_connection_pool};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Throwaway sqlite database, migrated on creation and deleted on drop.
///
/// Each test passes its own file name so tests can run in parallel without
/// stepping on each other's data.
pub struct TestDb {
    path: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(path: &str) -> Self {
        // A leftover file from a crashed run would leak state into this one.
        std::fs::remove_file(path).ok();

        let pool = establish_connection_pool(path).expect("sqlite pool");
        {
            let mut conn = pool.get().expect("sqlite connection");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("run migrations");
        }

        Self {
            path: path.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-shm", "-wal"] {
            std::fs::remove_file(format!("{}{suffix}", self.path)).ok();
        }
    }
}
