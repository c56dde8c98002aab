// ============================================================================
// WardrobeDb — Embedded Database (redb)
// ============================================================================
// Optional persistence for the wardrobe between sessions.
// Default path: ~/.pandaroux/wardrobe.redb (override via PANDAROUX_DB_PATH)
// ============================================================================

pub mod types;

pub use types::{StoredItem, WardrobeDbStats};

use anyhow::{anyhow, Result};
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{Item, ItemId};
use crate::wardrobe::WardrobeStore;

const WARDROBE: TableDefinition<&str, &[u8]> = TableDefinition::new("wardrobe");

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "PANDAROUX_DB_PATH";

fn item_key(item_id: ItemId) -> String {
    format!("wardrobe:{}", item_id)
}

/// Resolve the database path: explicit, then env var, then ~/.pandaroux
pub fn resolve_db_path(path: Option<&str>) -> Result<PathBuf> {
    if let Some(p) = path {
        return Ok(PathBuf::from(p));
    }
    if let Ok(env_path) = std::env::var(DB_PATH_ENV) {
        return Ok(PathBuf::from(env_path));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
    let dir = home.join(".pandaroux");
    std::fs::create_dir_all(&dir)
        .map_err(|e| anyhow!("Failed to create .pandaroux directory: {}", e))?;
    Ok(dir.join("wardrobe.redb"))
}

/// Embedded database holding the persisted wardrobe
pub struct WardrobeDb {
    db: Database,
    path: PathBuf,
}

impl WardrobeDb {
    /// Open (or create) the database. See `resolve_db_path` for the lookup order.
    pub fn open(path: Option<&str>) -> Result<Self> {
        let db_path = resolve_db_path(path)?;
        info!("Opening wardrobe database at: {}", db_path.display());

        let db = Database::create(&db_path)
            .map_err(|e| anyhow!("Failed to open database: {}", e))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(WARDROBE)
                .map_err(|e| anyhow!("Failed to create wardrobe table: {}", e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit init: {}", e))?;

        Ok(Self { db, path: db_path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist an item unless it is already stored. Returns whether it was new.
    pub fn save_item(&self, item: &Item) -> Result<bool> {
        item.validate()?;
        let key = item_key(item.id);

        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        let inserted;
        {
            let mut table = write_txn.open_table(WARDROBE)
                .map_err(|e| anyhow!("Failed to open wardrobe table: {}", e))?;

            if table.get(key.as_str())
                .map_err(|e| anyhow!("Failed to get item: {}", e))?
                .is_some()
            {
                inserted = false;
            } else {
                let position = next_position(&table)?;
                let record = StoredItem {
                    item: item.clone(),
                    position,
                    added_at: chrono::Utc::now().timestamp(),
                };
                let value = bincode::serialize(&record)
                    .map_err(|e| anyhow!("Failed to serialize item: {}", e))?;
                table.insert(key.as_str(), value.as_slice())
                    .map_err(|e| anyhow!("Failed to insert item: {}", e))?;
                inserted = true;
            }
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit: {}", e))?;

        if inserted {
            debug!("Stored wardrobe item: {}", item.id);
        }
        Ok(inserted)
    }

    pub fn remove_item(&self, item_id: ItemId) -> Result<bool> {
        let key = item_key(item_id);

        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        let removed;
        {
            let mut table = write_txn.open_table(WARDROBE)
                .map_err(|e| anyhow!("Failed to open wardrobe table: {}", e))?;
            removed = table.remove(key.as_str())
                .map_err(|e| anyhow!("Failed to remove item: {}", e))?
                .is_some();
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit delete: {}", e))?;

        if removed {
            debug!("Deleted wardrobe item: {}", item_id);
        }
        Ok(removed)
    }

    /// All stored records, in insertion order
    pub fn list_records(&self) -> Result<Vec<StoredItem>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn.open_table(WARDROBE)
            .map_err(|e| anyhow!("Failed to open wardrobe table: {}", e))?;

        let mut records = Vec::new();
        let iter = table.range::<&str>(..)
            .map_err(|e| anyhow!("Failed to iterate wardrobe: {}", e))?;
        for entry in iter {
            let (_key, value) = entry.map_err(|e| anyhow!("Failed to read entry: {}", e))?;
            let record: StoredItem = bincode::deserialize(value.value())
                .map_err(|e| anyhow!("Failed to deserialize item: {}", e))?;
            records.push(record);
        }
        records.sort_by_key(|r| r.position);
        Ok(records)
    }

    /// Rebuild an in-memory store from disk
    pub fn load_store(&self) -> Result<WardrobeStore> {
        let records = self.list_records()?;
        info!("Loaded {} wardrobe items", records.len());
        Ok(WardrobeStore::from_items(records.into_iter().map(|r| r.item)))
    }

    /// Make the database mirror `store` exactly, keeping its order
    pub fn replace_all(&self, store: &WardrobeStore) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let previous: HashMap<ItemId, i64> = self
            .list_records()?
            .into_iter()
            .map(|r| (r.item.id, r.added_at))
            .collect();

        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn.open_table(WARDROBE)
                .map_err(|e| anyhow!("Failed to open wardrobe table: {}", e))?;
            table.retain(|_, _| false)
                .map_err(|e| anyhow!("Failed to clear wardrobe table: {}", e))?;

            for (position, item) in store.items().iter().enumerate() {
                item.validate()?;
                let record = StoredItem {
                    item: item.clone(),
                    position: position as u64,
                    added_at: previous.get(&item.id).copied().unwrap_or(now),
                };
                let value = bincode::serialize(&record)
                    .map_err(|e| anyhow!("Failed to serialize item: {}", e))?;
                table.insert(item_key(item.id).as_str(), value.as_slice())
                    .map_err(|e| anyhow!("Failed to insert item: {}", e))?;
            }
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit: {}", e))?;

        info!("Saved {} wardrobe items", store.count());
        Ok(())
    }

    pub fn stats(&self) -> Result<WardrobeDbStats> {
        let records = self.list_records()?;

        let mut category_counts = HashMap::new();
        for record in &records {
            *category_counts
                .entry(record.item.category_id.as_str().to_string())
                .or_insert(0usize) += 1;
        }

        Ok(WardrobeDbStats {
            total_items: records.len(),
            category_counts,
            oldest_added_at: records.iter().map(|r| r.added_at).min(),
            newest_added_at: records.iter().map(|r| r.added_at).max(),
        })
    }
}

fn next_position(table: &redb::Table<'_, &'static str, &'static [u8]>) -> Result<u64> {
    let mut next = 0;
    let iter = table.range::<&str>(..)
        .map_err(|e| anyhow!("Failed to iterate wardrobe: {}", e))?;
    for entry in iter {
        let (_key, value) = entry.map_err(|e| anyhow!("Failed to read entry: {}", e))?;
        let record: StoredItem = bincode::deserialize(value.value())
            .map_err(|e| anyhow!("Failed to deserialize item: {}", e))?;
        next = next.max(record.position + 1);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{sample_item, CategoryId};

    fn temp_db() -> (tempfile::TempDir, WardrobeDb) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wardrobe.redb");
        let db = WardrobeDb::open(path.to_str()).unwrap();
        (dir, db)
    }

    #[test]
    fn test_save_is_idempotent_and_ordered() {
        let (_dir, db) = temp_db();
        assert!(db.save_item(&sample_item(30, CategoryId::Tops)).unwrap());
        assert!(db.save_item(&sample_item(10, CategoryId::Shoes)).unwrap());
        assert!(!db.save_item(&sample_item(30, CategoryId::Tops)).unwrap());

        let store = db.load_store().unwrap();
        let ids: Vec<u64> = store.items().iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![30, 10]);
    }

    #[test]
    fn test_remove_item() {
        let (_dir, db) = temp_db();
        db.save_item(&sample_item(1, CategoryId::Tops)).unwrap();
        assert!(db.remove_item(ItemId(1)).unwrap());
        assert!(!db.remove_item(ItemId(1)).unwrap());
        assert!(db.load_store().unwrap().is_empty());
    }

    #[test]
    fn test_replace_all_round_trip() {
        let (dir, db) = temp_db();
        db.save_item(&sample_item(99, CategoryId::Bottoms)).unwrap();

        let store = WardrobeStore::from_items(vec![
            sample_item(2, CategoryId::Headwear),
            sample_item(1, CategoryId::Tops),
        ]);
        db.replace_all(&store).unwrap();
        drop(db);

        let reopened = WardrobeDb::open(dir.path().join("wardrobe.redb").to_str()).unwrap();
        let loaded = reopened.load_store().unwrap();
        assert_eq!(loaded.items(), store.items());

        let stats = reopened.stats().unwrap();
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.category_counts.get("headwear"), Some(&1));
        assert!(stats.oldest_added_at.is_some());
    }

    #[test]
    fn test_save_rejects_invalid_item() {
        let (_dir, db) = temp_db();
        let mut item = sample_item(5, CategoryId::Tops);
        item.carbon_impact_kg = Some(-3.0);
        assert!(db.save_item(&item).is_err());
        assert_eq!(db.stats().unwrap().total_items, 0);
    }
}
