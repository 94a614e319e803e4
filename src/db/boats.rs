use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::BoatRecord;

/// Slot holding the JSON array of every boat record.
pub const BOATS_KEY: &str = "boats";
/// Slot where an unreadable `boats` payload is parked before reseeding.
pub const QUARANTINE_KEY: &str = "boats.corrupt";

/// Load/save seam between the record book and wherever records live.
pub trait BoatRepository {
    /// Return the stored collection. An absent slot is seeded with
    /// [`BoatRecord::seed`] and the seed is written back before returning.
    fn load_or_seed(&self) -> Result<Vec<BoatRecord>>;

    /// Overwrite the stored collection with `boats`.
    fn save(&self, boats: &[BoatRecord]) -> Result<()>;
}

/// Repository backed by the `kv_store` table.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Park the unreadable payload and start over from the seed.
    fn recover(&self, raw: &str) -> Result<Vec<BoatRecord>> {
        self.write_slot(QUARANTINE_KEY, raw)?;
        let seeded = vec![BoatRecord::seed()];
        self.save(&seeded)?;
        Ok(seeded)
    }
}

impl BoatRepository for SqliteRepository {
    fn load_or_seed(&self) -> Result<Vec<BoatRecord>> {
        let Some(raw) = self.read_slot(BOATS_KEY)? else {
            info!("no stored boat records, seeding example record");
            let seeded = vec![BoatRecord::seed()];
            self.save(&seeded)?;
            return Ok(seeded);
        };

        match serde_json::from_str::<Vec<BoatRecord>>(&raw) {
            Ok(boats) => {
                debug!(count = boats.len(), "loaded boat records");
                Ok(boats)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    quarantine = QUARANTINE_KEY,
                    "stored boat records are unreadable, falling back to seed"
                );
                self.recover(&raw)
            }
        }
    }

    fn save(&self, boats: &[BoatRecord]) -> Result<()> {
        let payload = serde_json::to_string(boats)?;
        self.write_slot(BOATS_KEY, &payload)?;
        debug!(count = boats.len(), "saved boat records");
        Ok(())
    }
}
