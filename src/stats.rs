// Derived statistics over a record set

use crate::models::{Game, Status};
use std::collections::BTreeMap;

/// Summary numbers shown above the catalog table
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub total: usize,
    /// Every status is present, with zero for unused ones
    pub by_status: BTreeMap<Status, usize>,
    /// Mean rating over rated games only, rounded to one decimal
    pub average_rating: Option<f64>,
}

impl CatalogStats {
    pub fn from_games(games: &[Game]) -> Self {
        let mut by_status: BTreeMap<Status, usize> = Status::ALL.into_iter().map(|s| (s, 0)).collect();
        for game in games {
            *by_status.entry(game.status).or_insert(0) += 1;
        }

        let ratings: Vec<f64> = games.iter().filter_map(|g| g.rating).map(f64::from).collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            Some((mean * 10.0).round() / 10.0)
        };

        Self {
            total: games.len(),
            by_status,
            average_rating,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn completed(&self) -> usize {
        self.count(Status::Completed)
    }

    pub fn in_progress(&self) -> usize {
        self.count(Status::InProgress)
    }

    pub fn new_games(&self) -> usize {
        self.count(Status::New)
    }
}
