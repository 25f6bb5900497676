// Game record store over a single durable namespace

use crate::backend::Backend;
use crate::filter::{self, Filter};
use crate::models::{Game, GameFormData, Platform, Status, now};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Namespace key used when none is configured
pub const DEFAULT_NAMESPACE: &str = "gamevault-games";

/// A mutation was applied in memory but is not durably saved
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to serialize game records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to persist game records: {0:#}")]
    Persist(eyre::Report),
}

/// Sole authority over the durable record set.
///
/// Every mutation loads the whole set, applies one change, and writes the whole
/// set back. Nothing is cached between calls.
pub struct Store<B> {
    backend: B,
}

impl<B: Backend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ========================================================================
    // Namespace I/O
    // ========================================================================

    /// Full current record set.
    ///
    /// An absent, unreadable, or corrupt slot yields an empty set; the cause is
    /// logged and never returned. Duplicate ids keep their first occurrence.
    pub fn load(&self) -> Vec<Game> {
        let raw = match self.backend.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = ?e, "Failed to read game records, treating as empty");
                return Vec::new();
            }
        };

        let games: Vec<Game> = match serde_json::from_str(&raw) {
            Ok(games) => games,
            Err(e) => {
                warn!(error = ?e, "Failed to parse game records, treating as empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let total = games.len();
        let games: Vec<Game> = games.into_iter().filter(|g| seen.insert(g.id.clone())).collect();
        if games.len() != total {
            warn!(dropped = total - games.len(), "Dropped game records with duplicate ids");
        }

        debug!(count = games.len(), "Loaded game records");
        games
    }

    /// Serialize and overwrite the entire namespace
    pub fn persist(&mut self, games: &[Game]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(games).map_err(|e| {
            warn!(error = ?e, "Failed to serialize game records");
            StoreError::Serialize(e)
        })?;

        self.backend.persist(&payload).map_err(|e| {
            warn!(error = ?e, count = games.len(), "Failed to persist game records");
            StoreError::Persist(e)
        })?;

        debug!(count = games.len(), "Persisted game records");
        Ok(())
    }

    /// Current backend revision, `None` if the slot is absent or unreadable
    pub fn revision(&self) -> Option<i64> {
        match self.backend.revision() {
            Ok(rev) => rev,
            Err(e) => {
                warn!(error = ?e, "Failed to read namespace revision");
                None
            }
        }
    }

    /// Fresh id of the form `game-<uuid v7>`, re-rolled until it is not in `existing`
    pub fn generate_id(existing: &[Game]) -> String {
        loop {
            let id = format!("game-{}", uuid::Uuid::now_v7());
            if !existing.iter().any(|g| g.id == id) {
                return id;
            }
            debug!(id = %id, "Generated id collides, re-rolling");
        }
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Create a record with a fresh id and `date_added = now`.
    ///
    /// `Err` means the record was not durably saved.
    pub fn create(&mut self, data: GameFormData) -> Result<Game, StoreError> {
        let mut games = self.load();

        let game = Game::from_form(Self::generate_id(&games), now(), data);
        games.push(game.clone());
        self.persist(&games)?;

        info!(id = %game.id, title = %game.title, "Created game");
        Ok(game)
    }

    /// Replace every field except `id` and `date_added`.
    ///
    /// `Ok(None)` when no record has `id`; nothing is written in that case.
    pub fn update(&mut self, id: &str, data: GameFormData) -> Result<Option<Game>, StoreError> {
        let mut games = self.load();

        let Some(slot) = games.iter_mut().find(|g| g.id == id) else {
            debug!(id, "Update target not found");
            return Ok(None);
        };

        let updated = Game::from_form(slot.id.clone(), slot.date_added, data);
        *slot = updated.clone();
        self.persist(&games)?;

        info!(id, "Updated game");
        Ok(Some(updated))
    }

    /// Remove the record with `id`. `Ok(false)` (and no write) when none matched.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let games = self.load();
        let before = games.len();

        let remaining: Vec<Game> = games.into_iter().filter(|g| g.id != id).collect();
        if remaining.len() == before {
            debug!(id, "Delete target not found");
            return Ok(false);
        }

        self.persist(&remaining)?;

        info!(id, "Deleted game");
        Ok(true)
    }

    pub fn get_one(&self, id: &str) -> Option<Game> {
        self.load().into_iter().find(|g| g.id == id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Games matching every filter
    pub fn list(&self, filters: &[Filter]) -> Vec<Game> {
        filter::apply(&self.load(), filters)
    }

    pub fn filter_by_status(&self, status: Status) -> Vec<Game> {
        self.list(&[Filter::Status(status)])
    }

    pub fn filter_by_platform(&self, platform: Platform) -> Vec<Game> {
        self.list(&[Filter::Platform(platform)])
    }

    /// Case-insensitive substring search over title, developer, and genre
    pub fn search(&self, query: &str) -> Vec<Game> {
        self.list(&[Filter::Search(query.to_string())])
    }
}
