// Editor/view surface over the store

use crate::backend::Backend;
use crate::filter::{self, Filter};
use crate::models::{Game, Platform, Status};
use crate::stats::CatalogStats;
use crate::store::{Store, StoreError};
use crate::validation::{self, GameForm, ValidationErrors};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("game not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Search and filter state of the table view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewFilter {
    pub search: String,
    pub status: Option<Status>,
    pub platform: Option<Platform>,
}

impl ViewFilter {
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if !self.search.is_empty() {
            filters.push(Filter::Search(self.search.clone()));
        }
        if let Some(status) = self.status {
            filters.push(Filter::Status(status));
        }
        if let Some(platform) = self.platform {
            filters.push(Filter::Platform(platform));
        }
        filters
    }
}

/// In-memory view of the catalog that routes every change through the store.
///
/// Input is validated before the store is touched, and the view state only
/// changes when the store reports success.
pub struct Catalog<B> {
    store: Store<B>,
    games: Vec<Game>,
    filter: ViewFilter,
    seen_revision: Option<i64>,
}

impl<B: Backend> Catalog<B> {
    pub fn open(store: Store<B>) -> Self {
        let mut catalog = Self {
            store,
            games: Vec::new(),
            filter: ViewFilter::default(),
            seen_revision: None,
        };
        catalog.refresh();
        catalog
    }

    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<B> {
        &mut self.store
    }

    /// Every game currently held by the view
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Games passing the current search, status, and platform filters
    pub fn visible(&self) -> Vec<Game> {
        filter::apply(&self.games, &self.filter.filters())
    }

    pub fn find(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn view_filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filter.search = query.into();
    }

    pub fn set_status_filter(&mut self, status: Option<Status>) {
        self.filter.status = status;
    }

    pub fn set_platform_filter(&mut self, platform: Option<Platform>) {
        self.filter.platform = platform;
    }

    pub fn clear_filters(&mut self) {
        self.filter = ViewFilter::default();
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_games(&self.games)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn add(&mut self, form: &GameForm) -> Result<Game, CatalogError> {
        let data = validation::validate(form)?;
        let before = self.store.revision();
        let game = self.store.create(data)?;

        self.after_write(before, |games| games.push(game.clone()));
        Ok(game)
    }

    pub fn edit(&mut self, id: &str, form: &GameForm) -> Result<Game, CatalogError> {
        let data = validation::validate(form)?;
        let before = self.store.revision();
        let Some(game) = self.store.update(id, data)? else {
            // The store may know the game is gone before the view does
            self.after_write(before, |_| {});
            return Err(CatalogError::NotFound(id.to_string()));
        };

        self.after_write(before, |games| match games.iter_mut().find(|g| g.id == game.id) {
            Some(slot) => *slot = game.clone(),
            None => games.push(game.clone()),
        });
        Ok(game)
    }

    /// `Ok(false)` when no such game exists
    pub fn remove(&mut self, id: &str) -> Result<bool, CatalogError> {
        let before = self.store.revision();
        let removed = self.store.delete(id)?;

        self.after_write(before, |games| {
            if removed {
                games.retain(|g| g.id != id);
            }
        });
        Ok(removed)
    }

    // ========================================================================
    // External changes
    // ========================================================================

    /// Reload the view state from the store
    pub fn refresh(&mut self) {
        self.games = self.store.load();
        self.seen_revision = self.store.revision();
        debug!(count = self.games.len(), "Catalog refreshed");
    }

    /// Reload only if the namespace changed since the view last saw it.
    ///
    /// Returns whether a reload happened.
    pub fn refresh_if_changed(&mut self) -> bool {
        let current = self.store.revision();
        if current == self.seen_revision {
            return false;
        }
        info!(?current, seen = ?self.seen_revision, "Namespace changed externally, reloading");
        self.refresh();
        true
    }

    /// Bring the view up to date after a store call that started at revision `before`.
    ///
    /// The store's read-modify-write absorbs whatever another writer saved since
    /// the view last loaded, so a stale view reloads in full instead of patching
    /// in only its own change.
    fn after_write(&mut self, before: Option<i64>, apply: impl FnOnce(&mut Vec<Game>)) {
        if before != self.seen_revision {
            info!(?before, seen = ?self.seen_revision, "Namespace changed before write, reloading");
            self.refresh();
            return;
        }
        apply(&mut self.games);
        self.seen_revision = self.store.revision();
    }
}
