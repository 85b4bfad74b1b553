mod schema;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{BudgetTargets, CostCategory, SpendRecord};

/// Blob keys. Three independent entries; each one is a JSON document.
pub(crate) const RECORDS_KEY: &str = "spend_records";
pub(crate) const TARGETS_KEY: &str = "category_targets";
pub(crate) const CATEGORY_MAP_KEY: &str = "category_mappings";

/// Key-value blob store backing the dataset, budget targets, and learned
/// category mappings. Callers treat write failures as non-fatal: the
/// in-memory state stays authoritative for the session.
pub(crate) struct Store {
    conn: Connection,
}

impl Store {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open data store: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set store pragmas")?;
        let store = Self { conn };
        store.migrate().context("Store migration failed")?;
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Raw key-value access ──────────────────────────────────

    pub(crate) fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub(crate) fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO blobs (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    pub(crate) fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM blobs WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ── Record collection ─────────────────────────────────────

    pub(crate) fn load_records(&self) -> Result<Vec<SpendRecord>> {
        match self.get(RECORDS_KEY)? {
            Some(json) => serde_json::from_str(&json).context("Stored record data is corrupt"),
            None => Ok(Vec::new()),
        }
    }

    pub(crate) fn save_records(&self, records: &[SpendRecord]) -> Result<()> {
        let json = serde_json::to_string(records).context("Failed to serialize records")?;
        self.set(RECORDS_KEY, &json)
    }

    pub(crate) fn clear_records(&self) -> Result<()> {
        self.remove(RECORDS_KEY)
    }

    // ── Budget targets ────────────────────────────────────────

    pub(crate) fn load_targets(&self) -> Result<BudgetTargets> {
        match self.get(TARGETS_KEY)? {
            Some(json) => serde_json::from_str(&json).context("Stored target data is corrupt"),
            None => Ok(BudgetTargets::default()),
        }
    }

    pub(crate) fn save_targets(&self, targets: &BudgetTargets) -> Result<()> {
        let json = serde_json::to_string(targets).context("Failed to serialize targets")?;
        self.set(TARGETS_KEY, &json)
    }

    // ── Learned category mappings ─────────────────────────────

    pub(crate) fn load_category_mappings(&self) -> Result<HashMap<String, CostCategory>> {
        match self.get(CATEGORY_MAP_KEY)? {
            Some(json) => serde_json::from_str(&json).context("Stored category map is corrupt"),
            None => Ok(HashMap::new()),
        }
    }

    pub(crate) fn save_category_mappings(
        &self,
        mappings: &HashMap<String, CostCategory>,
    ) -> Result<()> {
        let json = serde_json::to_string(mappings).context("Failed to serialize category map")?;
        self.set(CATEGORY_MAP_KEY, &json)
    }
}
