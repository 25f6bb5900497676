// Query filtering over game records

use crate::models::{Game, Platform, Status};

/// Predicate over a single game
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact status match
    Status(Status),
    /// Exact platform match
    Platform(Platform),
    /// Case-insensitive substring of title, developer, or genre
    Search(String),
}

impl Filter {
    pub fn matches(&self, game: &Game) -> bool {
        match self {
            Filter::Status(status) => game.status == *status,
            Filter::Platform(platform) => game.platform == *platform,
            Filter::Search(query) => {
                let query = query.to_lowercase();
                [&game.title, &game.developer, &game.genre]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            }
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Status(s) => write!(f, "status = {}", s),
            Filter::Platform(p) => write!(f, "platform = {}", p),
            Filter::Search(q) => write!(f, "search LIKE %{}%", q),
        }
    }
}

/// Keep the games matching every filter. No filters keeps everything.
pub fn apply<'a, I>(games: I, filters: &[Filter]) -> Vec<Game>
where
    I: IntoIterator<Item = &'a Game>,
{
    games
        .into_iter()
        .filter(|game| filters.iter().all(|f| f.matches(game)))
        .cloned()
        .collect()
}
