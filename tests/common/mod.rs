use std::path::PathBuf;

use client_records::db::{
    ConnectionOptions, DbPool, establish_connection_pool, establish_connection_pool_with,
};
use client_records::repository::DieselRepository;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database living in a temporary directory.
///
/// The directory and the database file are removed when the value drops.
pub struct TestDb {
    _dir: TempDir,
    path: PathBuf,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("utf-8 temp path").to_string();

        let pool = establish_connection_pool(&url).expect("build pool");
        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    #[allow(dead_code)]
    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// A second pool over the same file, without WAL, sized to one connection.
    #[allow(dead_code)]
    pub fn single_connection_pool(&self) -> DbPool {
        let options = ConnectionOptions {
            enable_wal: false,
            busy_timeout: None,
        };
        establish_connection_pool_with(self.path.to_str().expect("utf-8 temp path"), options, 1)
            .expect("build pool")
    }
}
