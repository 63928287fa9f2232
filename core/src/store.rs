//! SQLite persistence for simulated games.
//!
//! RULE: Only store.rs talks to the database. The clock core never
//! persists anything; the simulation driver calls these methods.

use rusqlite::{params, Connection, OptionalExtension};
use crate::{
    error::ClockResult,
    event::EventLogEntry,
    types::PlayIndex,
};

pub struct GameStore {
    conn: Connection,
}

impl GameStore {
    /// Open (or create) the game database at `path`.
    pub fn open(path: &str) -> ClockResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: readers don't block the writer.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ClockResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ClockResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Game ───────────────────────────────────────────────────

    pub fn insert_game(
        &self,
        game_id: &str,
        seed: u64,
        preset: &str,
        version: &str,
        started_at: &str,
    ) -> ClockResult<()> {
        self.conn.execute(
            "INSERT INTO game (game_id, seed, preset, version, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![game_id, seed as i64, preset, version, started_at],
        )?;
        Ok(())
    }

    pub fn game_seed(&self, game_id: &str) -> ClockResult<Option<u64>> {
        let seed = self
            .conn
            .query_row(
                "SELECT seed FROM game WHERE game_id = ?1",
                params![game_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(seed.map(|s| s as u64))
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> ClockResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (game_id, play_index, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.game_id,
                entry.play_index as i64,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_game(&self, game_id: &str) -> ClockResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, game_id, play_index, event_type, payload
             FROM event_log WHERE game_id = ?1
             ORDER BY id ASC",
            params![game_id],
        )
    }

    pub fn events_for_play(&self, game_id: &str, play_index: PlayIndex) -> ClockResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, game_id, play_index, event_type, payload
             FROM event_log WHERE game_id = ?1 AND play_index = ?2
             ORDER BY id ASC",
            params![game_id, play_index as i64],
        )
    }

    pub fn event_count(&self, game_id: &str) -> ClockResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE game_id = ?1",
            params![game_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn query_events(&self, sql: &str, args: impl rusqlite::Params) -> ClockResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt.query_map(args, |row| {
            Ok(EventLogEntry {
                id:         Some(row.get(0)?),
                game_id:    row.get(1)?,
                play_index: row.get::<_, i64>(2)? as u64,
                event_type: row.get(3)?,
                payload:    row.get(4)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, game_id: &str, play_index: PlayIndex, state_json: &str) -> ClockResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot (game_id, play_index, state_json) VALUES (?1, ?2, ?3)",
            params![game_id, play_index as i64, state_json],
        )?;
        Ok(())
    }

    /// Most recent snapshot for the game, by insertion order.
    pub fn latest_snapshot(&self, game_id: &str) -> ClockResult<Option<(PlayIndex, String)>> {
        let result = self
            .conn
            .query_row(
                "SELECT play_index, state_json FROM snapshot
                 WHERE game_id = ?1
                 ORDER BY id DESC LIMIT 1",
                params![game_id],
                |row| Ok((row.get::<_, i64>(0)? as u64, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(result)
    }

    pub fn snapshot_count(&self, game_id: &str) -> ClockResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM snapshot WHERE game_id = ?1",
            params![game_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
