use crate::domain::leaderboard::RankEntry;
use crate::domain::ports::{CasOutcome, LeaderboardStore, RoomStore, Versioned};
use crate::domain::room::Room;
use crate::error::{QuizError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Column Family for storing versioned room documents.
pub const CF_ROOMS: &str = "rooms";
/// Column Family for storing per-game leaderboards.
pub const CF_LEADERBOARDS: &str = "leaderboards";

/// A persistent store implementation using RocksDB.
///
/// Rooms and leaderboards live in separate Column Families, JSON encoded.
/// RocksDB has no conditional put, so `compare_and_swap` serializes its
/// read-check-write through a process-wide mutex shared by all clones.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    swap_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("rooms" and "leaderboards") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_rooms = ColumnFamilyDescriptor::new(CF_ROOMS, Options::default());
        let cf_leaderboards = ColumnFamilyDescriptor::new(CF_LEADERBOARDS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_rooms, cf_leaderboards])?;

        Ok(Self {
            db: Arc::new(db),
            swap_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            QuizError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn read_json<T: DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(&cf, key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(&cf, key.as_bytes(), bytes)?;
        Ok(())
    }

    fn swap_room(
        &self,
        room_id: &str,
        expected: Option<u64>,
        next: Option<Room>,
    ) -> Result<CasOutcome> {
        let _guard = self.swap_lock.lock().map_err(|_| {
            QuizError::InternalError(Box::new(std::io::Error::other(
                "RocksDB swap lock poisoned",
            )))
        })?;

        let current: Option<Versioned<Room>> = self.read_json(CF_ROOMS, room_id)?;
        let current = current.map(|doc| doc.version);
        if current != expected {
            return Ok(CasOutcome::Conflict);
        }

        match next {
            Some(room) => {
                let version = current.map_or(1, |v| v + 1);
                self.write_json(CF_ROOMS, room_id, &Versioned { version, value: room })?;
            }
            None => {
                let cf = self.cf(CF_ROOMS)?;
                self.db.delete_cf(&cf, room_id.as_bytes())?;
            }
        }
        Ok(CasOutcome::Committed)
    }
}

#[async_trait]
impl RoomStore for RocksDBStore {
    async fn load(&self, room_id: &str) -> Result<Option<Versioned<Room>>> {
        self.read_json(CF_ROOMS, room_id)
    }

    async fn compare_and_swap(
        &self,
        room_id: &str,
        expected: Option<u64>,
        next: Option<Room>,
    ) -> Result<CasOutcome> {
        self.swap_room(room_id, expected, next)
    }
}

#[async_trait]
impl LeaderboardStore for RocksDBStore {
    async fn get(&self, game: &str) -> Result<Vec<RankEntry>> {
        let ranks: Option<Vec<RankEntry>> = self.read_json(CF_LEADERBOARDS, game)?;
        Ok(ranks.unwrap_or_default())
    }

    async fn put(&self, game: &str, ranks: Vec<RankEntry>) -> Result<()> {
        self.write_json(CF_LEADERBOARDS, game, &ranks)
    }
}
