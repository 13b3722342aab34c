// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed durable outbox.
//!
//! The [`Outbox`] stores deferred writes until the sync loop confirms their
//! delivery. Payload metadata is kept as JSON; attachment bytes are kept as
//! BLOBs in a side table so they survive restarts without bloating payloads.
//!
//! Entry rows are immutable. Delivery progress, failure counts and
//! quarantine state live in side tables keyed by entry id and are removed
//! together with the entry.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::clock::{ClockSource, SystemClock};
use crate::entry::{EntryId, EntryPayload, EntryProgress, OutboxEntry, QuarantinedEntry};
use crate::error::{Error, Result};

/// SQL schema for the outbox database.
pub const SCHEMA: &str = r#"
-- Deferred writes, replayed in (created_at, id) order
CREATE TABLE IF NOT EXISTS outbox (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    payload TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- Attachment bytes, one row per slot
CREATE TABLE IF NOT EXISTS outbox_files (
    entry_id INTEGER NOT NULL,
    slot INTEGER NOT NULL,
    content BLOB NOT NULL,
    PRIMARY KEY (entry_id, slot),
    FOREIGN KEY (entry_id) REFERENCES outbox(id) ON DELETE CASCADE
);

-- Server-assigned record id of a partially delivered composite entry
CREATE TABLE IF NOT EXISTS outbox_progress (
    entry_id INTEGER PRIMARY KEY,
    record_id TEXT NOT NULL,
    FOREIGN KEY (entry_id) REFERENCES outbox(id) ON DELETE CASCADE
);

-- Attachment slots already uploaded
CREATE TABLE IF NOT EXISTS outbox_uploads (
    entry_id INTEGER NOT NULL,
    slot INTEGER NOT NULL,
    PRIMARY KEY (entry_id, slot),
    FOREIGN KEY (entry_id) REFERENCES outbox(id) ON DELETE CASCADE
);

-- Permanent (non-transient) failure counts
CREATE TABLE IF NOT EXISTS outbox_failures (
    entry_id INTEGER PRIMARY KEY,
    count INTEGER NOT NULL,
    last_error TEXT NOT NULL,
    FOREIGN KEY (entry_id) REFERENCES outbox(id) ON DELETE CASCADE
);

-- Entries withheld from replay
CREATE TABLE IF NOT EXISTS outbox_quarantine (
    entry_id INTEGER PRIMARY KEY,
    reason TEXT NOT NULL,
    quarantined_at INTEGER NOT NULL,
    FOREIGN KEY (entry_id) REFERENCES outbox(id) ON DELETE CASCADE
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_outbox_kind_created ON outbox(kind, created_at);
CREATE INDEX IF NOT EXISTS idx_outbox_order ON outbox(created_at, id);
"#;

const SELECT_ENTRY: &str = "SELECT id, kind, payload, created_at FROM outbox";

/// Run schema creation on a connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Raw row before attachment bytes are joined in.
struct EntryRow {
    id: EntryId,
    kind: String,
    payload: String,
    created_at: i64,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        payload: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Durable queue of pending outbox entries.
pub struct Outbox {
    /// The underlying SQLite connection.
    conn: Connection,
    clock: Box<dyn ClockSource>,
}

impl Outbox {
    /// Open an outbox at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_clock(path, Box::new(SystemClock))
    }

    /// Open an outbox with a custom clock source.
    pub fn open_with_clock(path: &Path, clock: Box<dyn ClockSource>) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL so listings never block an enqueue from another process
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;

        run_migrations(&conn)?;
        Ok(Outbox { conn, clock })
    }

    /// Open an in-memory outbox (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with_clock(Box::new(SystemClock))
    }

    /// Open an in-memory outbox with a custom clock source (for testing).
    pub fn open_in_memory_with_clock(clock: Box<dyn ClockSource>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        run_migrations(&conn)?;
        Ok(Outbox { conn, clock })
    }

    /// Append a new entry stamped with the current time.
    ///
    /// The entry and all of its attachment bytes are committed in a single
    /// transaction before the id is returned.
    pub fn enqueue(&mut self, payload: &EntryPayload) -> Result<EntryId> {
        let created_at = self.clock.now_ms() as i64;
        let json = serde_json::to_string(payload)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO outbox (kind, payload, created_at) VALUES (?1, ?2, ?3)",
            params![payload.kind().as_str(), json, created_at],
        )?;
        let id = tx.last_insert_rowid();

        for (slot, attachment) in payload.attachments().into_iter().enumerate() {
            tx.execute(
                "INSERT INTO outbox_files (entry_id, slot, content) VALUES (?1, ?2, ?3)",
                params![id, slot as i64, attachment.content],
            )?;
        }
        tx.commit()?;

        Ok(id)
    }

    /// All pending entries in replay order.
    ///
    /// Quarantined entries are not included.
    pub fn list_pending(&self) -> Result<Vec<OutboxEntry>> {
        let sql = format!(
            "{SELECT_ENTRY}
             WHERE id NOT IN (SELECT entry_id FROM outbox_quarantine)
             ORDER BY created_at ASC, id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(|row| self.hydrate(row)).collect()
    }

    /// Get a single entry by id, quarantined or not.
    pub fn get(&self, id: EntryId) -> Result<Option<OutboxEntry>> {
        let sql = format!("{SELECT_ENTRY} WHERE id = ?1");
        let row = self.conn.query_row(&sql, params![id], read_row).optional()?;
        row.map(|row| self.hydrate(row)).transpose()
    }

    /// Delete an entry and everything attached to it.
    ///
    /// Removing an id that does not exist is a no-op.
    pub fn remove(&self, id: EntryId) -> Result<()> {
        self.conn.execute("DELETE FROM outbox WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Number of pending (non-quarantined) entries.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM outbox
             WHERE id NOT IN (SELECT entry_id FROM outbox_quarantine)",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Check if there are no pending entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Delivery progress recorded for an entry.
    pub fn progress(&self, id: EntryId) -> Result<EntryProgress> {
        let record_id: Option<String> = self
            .conn
            .query_row(
                "SELECT record_id FROM outbox_progress WHERE entry_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        let mut stmt = self
            .conn
            .prepare("SELECT slot FROM outbox_uploads WHERE entry_id = ?1 ORDER BY slot")?;
        let uploaded_slots = stmt
            .query_map(params![id], |row| row.get::<_, i64>(0))?
            .map(|slot| slot.map(|s| s as usize))
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(EntryProgress { record_id, uploaded_slots })
    }

    /// Remember the server-assigned record id of a composite entry.
    pub fn record_created(&self, id: EntryId, record_id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO outbox_progress (entry_id, record_id) VALUES (?1, ?2)",
            params![id, record_id],
        )?;
        Ok(())
    }

    /// Remember that an attachment slot of an entry was uploaded.
    pub fn record_uploaded(&self, id: EntryId, slot: usize) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO outbox_uploads (entry_id, slot) VALUES (?1, ?2)",
            params![id, slot as i64],
        )?;
        Ok(())
    }

    /// Count a permanent failure for an entry and return the new total.
    pub fn record_permanent_failure(&self, id: EntryId, message: &str) -> Result<u32> {
        self.conn.execute(
            "INSERT INTO outbox_failures (entry_id, count, last_error) VALUES (?1, 1, ?2)
             ON CONFLICT(entry_id) DO UPDATE
             SET count = count + 1, last_error = excluded.last_error",
            params![id, message],
        )?;
        let count: i64 = self.conn.query_row(
            "SELECT count FROM outbox_failures WHERE entry_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    /// Withhold an entry from replay until it is restored.
    pub fn quarantine(&self, id: EntryId, reason: &str) -> Result<()> {
        let changed = self.conn.execute(
            "INSERT OR REPLACE INTO outbox_quarantine (entry_id, reason, quarantined_at)
             SELECT id, ?2, ?3 FROM outbox WHERE id = ?1",
            params![id, reason, self.clock.now_ms() as i64],
        )?;
        if changed == 0 {
            return Err(Error::EntryNotFound(id));
        }
        Ok(())
    }

    /// All quarantined entries, in their original replay order.
    pub fn list_quarantined(&self) -> Result<Vec<QuarantinedEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT o.id, o.kind, o.payload, o.created_at,
                    q.reason, q.quarantined_at, COALESCE(f.count, 0)
             FROM outbox_quarantine q
             JOIN outbox o ON o.id = q.entry_id
             LEFT JOIN outbox_failures f ON f.entry_id = q.entry_id
             ORDER BY o.created_at ASC, o.id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let entry = read_row(row)?;
                let reason: String = row.get(4)?;
                let quarantined_at: i64 = row.get(5)?;
                let failures: i64 = row.get(6)?;
                Ok((entry, reason, quarantined_at, failures))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(row, reason, quarantined_at, failures)| {
                Ok(QuarantinedEntry {
                    entry: self.hydrate(row)?,
                    reason,
                    failures: failures as u32,
                    quarantined_at: quarantined_at as u64,
                })
            })
            .collect()
    }

    /// Put a quarantined entry back into the queue at its original position.
    ///
    /// The failure count is reset.
    pub fn restore(&mut self, id: EntryId) -> Result<()> {
        let tx = self.conn.transaction()?;
        let changed =
            tx.execute("DELETE FROM outbox_quarantine WHERE entry_id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::EntryNotFound(id));
        }
        tx.execute("DELETE FROM outbox_failures WHERE entry_id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    /// Turn a raw row into an entry, joining attachment bytes back in.
    fn hydrate(&self, row: EntryRow) -> Result<OutboxEntry> {
        let mut payload: EntryPayload = serde_json::from_str(&row.payload).map_err(|e| {
            Error::CorruptedData(format!("invalid payload for entry {}: {}", row.id, e))
        })?;
        if payload.kind().as_str() != row.kind {
            return Err(Error::CorruptedData(format!(
                "entry {} has kind '{}' but payload '{}'",
                row.id,
                row.kind,
                payload.kind()
            )));
        }

        let mut stmt = self
            .conn
            .prepare_cached("SELECT slot, content FROM outbox_files WHERE entry_id = ?1")?;
        let blobs = stmt
            .query_map(params![row.id], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, Vec<u8>>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut attachments = payload.attachments_mut();
        if blobs.len() != attachments.len() {
            return Err(Error::CorruptedData(format!(
                "entry {} expects {} file(s) but {} are stored",
                row.id,
                attachments.len(),
                blobs.len()
            )));
        }
        for (slot, content) in blobs {
            let attachment = attachments.get_mut(slot as usize).ok_or_else(|| {
                Error::CorruptedData(format!("entry {} has stray file slot {}", row.id, slot))
            })?;
            attachment.content = content;
        }

        Ok(OutboxEntry { id: row.id, payload, created_at: row.created_at as u64 })
    }
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
