// Form validation in front of the store

use crate::models::{GameFormData, Platform, Status};
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_RELEASE_YEAR: i64 = 1970;
pub const TITLE_MAX: usize = 100;
pub const GENRE_MAX: usize = 50;
pub const DEVELOPER_MAX: usize = 100;
pub const NOTES_MAX: usize = 500;

/// Raw, unvalidated form input.
///
/// Enumerations arrive as text and numbers with a wider type than the record
/// holds, so out-of-range input can be reported instead of failing to parse.
/// `None` means the field was omitted, which is distinct from an invalid value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameForm {
    pub title: String,
    pub platform: String,
    pub genre: String,
    pub release_year: i64,
    pub developer: String,
    pub status: Option<String>,
    pub rating: Option<i64>,
    pub playtime_hours: Option<f64>,
    pub completion_percentage: Option<f64>,
    pub notes: Option<String>,
}

impl GameForm {
    /// Prefill a form from validated data (used when editing an existing record)
    pub fn from_data(data: &GameFormData) -> Self {
        Self {
            title: data.title.clone(),
            platform: data.platform.to_string(),
            genre: data.genre.clone(),
            release_year: i64::from(data.release_year),
            developer: data.developer.clone(),
            status: Some(data.status.to_string()),
            rating: data.rating.map(i64::from),
            playtime_hours: data.playtime_hours,
            completion_percentage: data.completion_percentage,
            notes: data.notes.clone(),
        }
    }
}

/// One message per violated field, keyed by the field's wire name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
        write!(f, "invalid game: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate against the current calendar year
pub fn validate(form: &GameForm) -> Result<GameFormData, ValidationErrors> {
    validate_at(form, Utc::now().year())
}

/// Validate with an explicit "current year" bounding `releaseYear`
pub fn validate_at(form: &GameForm, current_year: i32) -> Result<GameFormData, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_text(&mut errors, "title", "Title", &form.title, TITLE_MAX);
    check_text(&mut errors, "genre", "Genre", &form.genre, GENRE_MAX);
    check_text(&mut errors, "developer", "Developer", &form.developer, DEVELOPER_MAX);

    let platform = match form.platform.parse::<Platform>() {
        Ok(p) => Some(p),
        Err(_) => {
            errors.add("platform", format!("Platform must be one of: {}", join(&Platform::ALL)));
            None
        }
    };

    let status = match form.status.as_deref() {
        None => Some(Status::default()),
        Some(raw) => match raw.parse::<Status>() {
            Ok(s) => Some(s),
            Err(_) => {
                errors.add("status", format!("Status must be one of: {}", join(&Status::ALL)));
                None
            }
        },
    };

    let max_year = i64::from(current_year) + 2;
    if form.release_year < MIN_RELEASE_YEAR {
        errors.add("releaseYear", format!("Release year must be at least {}", MIN_RELEASE_YEAR));
    } else if form.release_year > max_year {
        errors.add("releaseYear", format!("Release year cannot be later than {}", max_year));
    }

    if let Some(rating) = form.rating {
        if rating < 1 {
            errors.add("rating", "Rating must be at least 1");
        } else if rating > 10 {
            errors.add("rating", "Rating must be at most 10");
        }
    }

    if let Some(hours) = form.playtime_hours {
        if !hours.is_finite() {
            errors.add("playtimeHours", "Playtime must be a number");
        } else if hours < 0.0 {
            errors.add("playtimeHours", "Playtime cannot be negative");
        }
    }

    if let Some(pct) = form.completion_percentage {
        if !pct.is_finite() {
            errors.add("completionPercentage", "Completion must be a number");
        } else if pct < 0.0 {
            errors.add("completionPercentage", "Completion must be at least 0%");
        } else if pct > 100.0 {
            errors.add("completionPercentage", "Completion must be at most 100%");
        }
    }

    if form.notes.as_ref().is_some_and(|n| n.chars().count() > NOTES_MAX) {
        errors.add("notes", format!("Notes must be at most {} characters", NOTES_MAX));
    }

    match (platform, status) {
        (Some(platform), Some(status)) if errors.is_empty() => Ok(GameFormData {
            title: form.title.clone(),
            platform,
            genre: form.genre.clone(),
            // Range-checked above, fits in i32
            release_year: form.release_year as i32,
            developer: form.developer.clone(),
            status,
            rating: form.rating.map(|r| r as u8),
            playtime_hours: form.playtime_hours,
            completion_percentage: form.completion_percentage,
            notes: form.notes.clone().filter(|n| !n.is_empty()),
        }),
        _ => Err(errors),
    }
}

fn check_text(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str, max: usize) {
    // No trimming: a whitespace-only value is non-empty
    if value.is_empty() {
        errors.add(field, format!("{} is required", label));
    } else if value.chars().count() > max {
        errors.add(field, format!("{} must be at most {} characters", label, max));
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}
