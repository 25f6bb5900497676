// Data models for GameVault

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cataloged game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub title: String,
    pub platform: Platform,
    pub genre: String,
    pub release_year: i32,
    pub developer: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playtime_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<f64>,
    #[serde(with = "iso_millis")]
    pub date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Game {
    /// Build a record from validated form data and an identity.
    ///
    /// `id` and `date_added` are never part of the form; creation supplies fresh
    /// values and updates carry over the existing ones.
    pub fn from_form(id: String, date_added: DateTime<Utc>, data: GameFormData) -> Self {
        Self {
            id,
            title: data.title,
            platform: data.platform,
            genre: data.genre,
            release_year: data.release_year,
            developer: data.developer,
            status: data.status,
            rating: data.rating,
            playtime_hours: data.playtime_hours,
            completion_percentage: data.completion_percentage,
            date_added,
            notes: data.notes,
        }
    }

    /// The form-editable part of this record
    pub fn form_data(&self) -> GameFormData {
        GameFormData {
            title: self.title.clone(),
            platform: self.platform,
            genre: self.genre.clone(),
            release_year: self.release_year,
            developer: self.developer.clone(),
            status: self.status,
            rating: self.rating,
            playtime_hours: self.playtime_hours,
            completion_percentage: self.completion_percentage,
            notes: self.notes.clone(),
        }
    }
}

/// Validated input for creating or replacing a game.
///
/// Produced by [`crate::validation::validate`]; the store trusts it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct GameFormData {
    pub title: String,
    pub platform: Platform,
    pub genre: String,
    pub release_year: i32,
    pub developer: String,
    pub status: Status,
    pub rating: Option<u8>,
    pub playtime_hours: Option<f64>,
    pub completion_percentage: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "PS5")]
    Ps5,
    Xbox,
    #[serde(rename = "Nintendo Switch")]
    NintendoSwitch,
    #[serde(rename = "PC")]
    Pc,
    Mobile,
    Other,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Ps5,
        Platform::Xbox,
        Platform::NintendoSwitch,
        Platform::Pc,
        Platform::Mobile,
        Platform::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ps5 => "PS5",
            Platform::Xbox => "Xbox",
            Platform::NintendoSwitch => "Nintendo Switch",
            Platform::Pc => "PC",
            Platform::Mobile => "Mobile",
            Platform::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| loose_eq(p.as_str(), s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
    Abandoned,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::New,
        Status::InProgress,
        Status::Completed,
        Status::OnHold,
        Status::Abandoned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "New",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::OnHold => "On Hold",
            Status::Abandoned => "Abandoned",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|st| loose_eq(st.as_str(), s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Returned when a string names no platform or status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

/// Case-insensitive match that treats `-` and `_` as spaces ("in-progress" == "In Progress")
fn loose_eq(canonical: &str, input: &str) -> bool {
    let normalize = |s: &str| -> String {
        s.trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect::<String>()
            .to_lowercase()
    };
    normalize(canonical) == normalize(input)
}

/// Current time truncated to the millisecond precision the namespace stores
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

// ISO-8601 with millisecond precision, e.g. 2024-03-01T12:30:00.000Z
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
