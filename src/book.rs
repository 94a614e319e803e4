//! In-memory record collection. Every mutation is written through the
//! repository before it is allowed to stick; if the write fails the change is
//! undone so what the user sees always matches what is on disk.

use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::db::BoatRepository;
use crate::error::{Error, Result};
use crate::models::{date_stamp, BoatRecord, BoatSubmission};

pub struct BoatBook {
    boats: Vec<BoatRecord>,
    repository: Box<dyn BoatRepository>,
}

impl BoatBook {
    /// Load (or seed) the collection through `repository`.
    pub fn open(repository: Box<dyn BoatRepository>) -> Result<Self> {
        let boats = repository.load_or_seed()?;
        Ok(Self { boats, repository })
    }

    pub fn boats(&self) -> &[BoatRecord] {
        &self.boats
    }

    pub fn len(&self) -> usize {
        self.boats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boats.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BoatRecord> {
        self.boats.iter().find(|boat| boat.id == id)
    }

    /// Append a new record built from `submission`. The id is derived from
    /// `now` in milliseconds and bumped until it is unused.
    pub fn create(
        &mut self,
        submission: BoatSubmission,
        now: DateTime<Local>,
    ) -> Result<BoatRecord> {
        let stamp = date_stamp(now.date_naive());
        let record = BoatRecord {
            id: self.next_id(now.timestamp_millis()),
            details: submission.details,
            created_at: stamp.clone(),
            updated_at: stamp,
        };

        self.boats.push(record.clone());
        if let Err(err) = self.persist() {
            self.boats.pop();
            return Err(err);
        }
        info!(id = %record.id, owner = %record.details.owner_name, "created boat record");
        Ok(record)
    }

    /// Replace the editable fields of `id`, keeping its id and creation date.
    pub fn update(&mut self, id: &str, submission: BoatSubmission) -> Result<BoatRecord> {
        let index = self.position(id)?;
        let existing = &self.boats[index];
        let updated = BoatRecord {
            id: existing.id.clone(),
            details: submission.details,
            created_at: existing.created_at.clone(),
            updated_at: submission.updated_at,
        };

        let previous = std::mem::replace(&mut self.boats[index], updated.clone());
        if let Err(err) = self.persist() {
            self.boats[index] = previous;
            return Err(err);
        }
        info!(id = %updated.id, "updated boat record");
        Ok(updated)
    }

    /// Remove exactly the record with `id`.
    pub fn delete(&mut self, id: &str) -> Result<BoatRecord> {
        let index = self.position(id)?;
        let removed = self.boats.remove(index);
        if let Err(err) = self.persist() {
            self.boats.insert(index, removed);
            return Err(err);
        }
        info!(id = %removed.id, owner = %removed.details.owner_name, "deleted boat record");
        Ok(removed)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.boats
            .iter()
            .position(|boat| boat.id == id)
            .ok_or_else(|| Error::RecordNotFound { id: id.to_string() })
    }

    fn next_id(&self, millis: i64) -> String {
        let mut candidate = millis;
        while self.boats.iter().any(|boat| boat.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    fn persist(&self) -> Result<()> {
        self.repository.save(&self.boats).inspect_err(|err| {
            error!(error = %err, "failed to persist boat records");
        })
    }
}
