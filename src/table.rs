// Terminal rendering for the catalog

use crate::models::{Game, Status};
use crate::stats::CatalogStats;
use colored::{ColoredString, Colorize};

const HEADERS: [&str; 8] = ["Title", "Platform", "Genre", "Developer", "Status", "Rating", "Progress", "Id"];

/// Five stars, one filled per two rating points
pub fn stars(rating: Option<u8>) -> String {
    match rating {
        None => "No rating".to_string(),
        Some(r) => {
            let filled = usize::from(r / 2).min(5);
            format!("{}{} ({}/10)", "★".repeat(filled), "☆".repeat(5 - filled), r)
        }
    }
}

pub fn progress(completion: Option<f64>) -> String {
    match completion {
        None => "—".to_string(),
        Some(pct) => format!("{}%", format_number(pct)),
    }
}

/// Whole numbers without a trailing `.0`
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn status_color(status: Status, text: &str) -> ColoredString {
    match status {
        Status::New => text.normal(),
        Status::InProgress => text.yellow(),
        Status::Completed => text.green(),
        Status::OnHold => text.blue(),
        Status::Abandoned => text.red(),
    }
}

fn row(game: &Game) -> [String; 8] {
    [
        format!("{} ({})", game.title, game.release_year),
        game.platform.to_string(),
        game.genre.clone(),
        game.developer.clone(),
        game.status.to_string(),
        stars(game.rating),
        progress(game.completion_percentage),
        game.id.clone(),
    ]
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Table of `visible` games with a "N of M" footer
pub fn render_table(visible: &[Game], total: usize) -> String {
    if total == 0 {
        return format!(
            "{}\nStart building your collection by adding your first game.\n",
            "No games yet".bold()
        );
    }
    if visible.is_empty() {
        return format!("No games match your filters.\n0 of {}\n", total);
    }

    let rows: Vec<[String; 8]> = visible.iter().map(row).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w).bold().to_string())
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    for (game, cells) in visible.iter().zip(&rows) {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = pad(cell, w);
                match i {
                    4 => status_color(game.status, &padded).to_string(),
                    7 => padded.dimmed().to_string(),
                    _ => padded,
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    out.push_str(&format!("{} of {}\n", visible.len(), total));
    out
}

/// Every field of a single game
pub fn render_game(game: &Game) -> String {
    let mut lines = vec![
        format!("{} ({})", game.title.bold(), game.release_year),
        format!("  Id:          {}", game.id),
        format!("  Platform:    {}", game.platform),
        format!("  Genre:       {}", game.genre),
        format!("  Developer:   {}", game.developer),
        format!("  Status:      {}", status_color(game.status, game.status.as_str())),
        format!("  Rating:      {}", stars(game.rating)),
        format!(
            "  Playtime:    {}",
            game.playtime_hours
                .map(|h| format!("{}h", format_number(h)))
                .unwrap_or_else(|| "—".to_string())
        ),
        format!("  Progress:    {}", progress(game.completion_percentage)),
        format!("  Added:       {}", game.date_added.format("%Y-%m-%d %H:%M UTC")),
    ];
    if let Some(notes) = &game.notes {
        lines.push(format!("  Notes:       {}", notes));
    }
    lines.join("\n") + "\n"
}

pub fn render_stats(stats: &CatalogStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<16}{}\n", "Total Games", stats.total));
    for status in Status::ALL {
        out.push_str(&format!("{:<16}{}\n", status.as_str(), stats.count(status)));
    }
    let average = match stats.average_rating {
        Some(avg) => format!("{}/10", format_number(avg)),
        None => "—".to_string(),
    };
    out.push_str(&format!("{:<16}{}\n", "Avg Rating", average));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Platform, now};

    fn game(title: &str, rating: Option<u8>, completion: Option<f64>) -> Game {
        Game {
            id: format!("game-{}", title.to_lowercase()),
            title: title.to_string(),
            platform: Platform::NintendoSwitch,
            genre: "Adventure".to_string(),
            release_year: 2017,
            developer: "Nintendo".to_string(),
            status: Status::InProgress,
            rating,
            playtime_hours: Some(12.5),
            completion_percentage: completion,
            date_added: now(),
            notes: Some("Shrines left: 40".to_string()),
        }
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(None), "No rating");
        assert_eq!(stars(Some(7)), "★★★☆☆ (7/10)");
        assert_eq!(stars(Some(10)), "★★★★★ (10/10)");
        assert_eq!(stars(Some(1)), "☆☆☆☆☆ (1/10)");
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(None), "—");
        assert_eq!(progress(Some(50.0)), "50%");
        assert_eq!(progress(Some(33.5)), "33.5%");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(render_table(&[], 0).contains("No games yet"));
        assert!(render_table(&[], 3).contains("0 of 3"));
    }

    #[test]
    fn test_table_lists_visible_games() {
        let games = vec![game("Zelda", Some(9), Some(60.0)), game("Mario", None, None)];
        let out = render_table(&games, 5);

        assert!(out.contains("Zelda (2017)"));
        assert!(out.contains("Mario (2017)"));
        assert!(out.contains("Nintendo Switch"));
        assert!(out.contains("★★★★☆ (9/10)"));
        assert!(out.contains("60%"));
        assert!(out.contains("game-zelda"));
        assert!(out.ends_with("2 of 5\n"));
    }

    #[test]
    fn test_render_game_includes_optionals() {
        let out = render_game(&game("Zelda", Some(9), None));
        assert!(out.contains("12.5h"));
        assert!(out.contains("Shrines left: 40"));
        assert!(out.contains("Progress:    —"));
    }

    #[test]
    fn test_render_stats() {
        let games = vec![game("Zelda", Some(8), None), game("Mario", Some(7), None)];
        let out = render_stats(&CatalogStats::from_games(&games));

        assert!(out.contains("Total Games     2"));
        assert!(out.contains("In Progress     2"));
        assert!(out.contains("Avg Rating      7.5/10"));
    }
}
