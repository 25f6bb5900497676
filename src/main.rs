use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::Result;
use gamevault::{
    BackendKind, Catalog, CatalogError, Config, FileConfig, GameForm, Platform, Status, Store, table,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "gamevault")]
#[command(about = "GameVault - your personal game collection")]
#[command(version)]
struct Cli {
    /// YAML config file (default: <config dir>/gamevault/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the catalog (overrides GAMEVAULT_STORE_PATH and config)
    #[arg(short, long, global = true)]
    store_path: Option<PathBuf>,

    /// Storage backend (overrides GAMEVAULT_BACKEND and config)
    #[arg(short, long, value_enum, global = true)]
    backend: Option<BackendKind>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a game to the catalog
    Add(AddArgs),

    /// Edit a game; omitted fields keep their current value
    Edit {
        id: String,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete a game
    Delete { id: String },

    /// Show every field of one game
    Show { id: String },

    /// List games, optionally filtered
    List {
        /// Case-insensitive match on title, developer, or genre
        #[arg(long)]
        search: Option<String>,

        #[arg(long, value_parser = parse_status)]
        status: Option<Status>,

        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,
    },

    /// Collection summary
    Stats,
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    title: String,

    /// PS5, Xbox, "Nintendo Switch", PC, Mobile, Other
    #[arg(long)]
    platform: String,

    #[arg(long)]
    genre: String,

    #[arg(long = "year", alias = "release-year", allow_negative_numbers = true)]
    release_year: i64,

    #[arg(long)]
    developer: String,

    /// New, "In Progress", Completed, "On Hold", Abandoned (default: New)
    #[arg(long)]
    status: Option<String>,

    /// 1-10
    #[arg(long, allow_negative_numbers = true)]
    rating: Option<i64>,

    #[arg(long = "playtime", allow_negative_numbers = true)]
    playtime_hours: Option<f64>,

    /// 0-100
    #[arg(long = "completion", allow_negative_numbers = true)]
    completion_percentage: Option<f64>,

    #[arg(long)]
    notes: Option<String>,
}

impl AddArgs {
    fn into_form(self) -> GameForm {
        GameForm {
            title: self.title,
            platform: self.platform,
            genre: self.genre,
            release_year: self.release_year,
            developer: self.developer,
            status: self.status,
            rating: self.rating,
            playtime_hours: self.playtime_hours,
            completion_percentage: self.completion_percentage,
            notes: self.notes,
        }
    }
}

#[derive(Args)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    platform: Option<String>,

    #[arg(long)]
    genre: Option<String>,

    #[arg(long = "year", alias = "release-year", allow_negative_numbers = true)]
    release_year: Option<i64>,

    #[arg(long)]
    developer: Option<String>,

    #[arg(long)]
    status: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    rating: Option<i64>,

    #[arg(long = "playtime", allow_negative_numbers = true)]
    playtime_hours: Option<f64>,

    #[arg(long = "completion", allow_negative_numbers = true)]
    completion_percentage: Option<f64>,

    #[arg(long)]
    notes: Option<String>,

    /// Remove optional fields (comma separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    clear: Vec<ClearField>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClearField {
    Rating,
    Playtime,
    Completion,
    Notes,
}

impl EditArgs {
    fn apply(self, form: &mut GameForm) {
        if let Some(v) = self.title {
            form.title = v;
        }
        if let Some(v) = self.platform {
            form.platform = v;
        }
        if let Some(v) = self.genre {
            form.genre = v;
        }
        if let Some(v) = self.release_year {
            form.release_year = v;
        }
        if let Some(v) = self.developer {
            form.developer = v;
        }
        if self.status.is_some() {
            form.status = self.status;
        }
        if self.rating.is_some() {
            form.rating = self.rating;
        }
        if self.playtime_hours.is_some() {
            form.playtime_hours = self.playtime_hours;
        }
        if self.completion_percentage.is_some() {
            form.completion_percentage = self.completion_percentage;
        }
        if self.notes.is_some() {
            form.notes = self.notes;
        }
        for field in self.clear {
            match field {
                ClearField::Rating => form.rating = None,
                ClearField::Playtime => form.playtime_hours = None,
                ClearField::Completion => form.completion_percentage = None,
                ClearField::Notes => form.notes = None,
            }
        }
    }
}

fn parse_status(s: &str) -> Result<Status, String> {
    s.parse().map_err(|e: gamevault::models::UnknownVariant| e.to_string())
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse().map_err(|e: gamevault::models::UnknownVariant| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup tracing
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let file = FileConfig::load(cli.config.as_deref())?;
    let config = Config::resolve(cli.store_path, cli.backend, file)?;
    debug!(?config, "Resolved configuration");

    let mut catalog = Catalog::open(Store::new(config.open_backend()?));

    match cli.command {
        Commands::Add(args) => match catalog.add(&args.into_form()) {
            Ok(game) => {
                println!("{}", "Game added successfully!".green());
                println!("{}", game.id);
            }
            Err(e) => return report(e),
        },
        Commands::Edit { id, fields } => {
            let Some(existing) = catalog.find(&id) else {
                return report(CatalogError::NotFound(id));
            };
            let mut form = GameForm::from_data(&existing.form_data());
            fields.apply(&mut form);

            match catalog.edit(&id, &form) {
                Ok(_) => println!("{}", "Game updated successfully!".green()),
                Err(e) => return report(e),
            }
        }
        Commands::Delete { id } => {
            let title = catalog.find(&id).map(|g| g.title.clone());
            match catalog.remove(&id) {
                Ok(true) => println!(
                    "{}",
                    format!("\"{}\" has been deleted successfully!", title.unwrap_or(id)).green()
                ),
                Ok(false) => return report(CatalogError::NotFound(id)),
                Err(e) => return report(e),
            }
        }
        Commands::Show { id } => match catalog.find(&id) {
            Some(game) => print!("{}", table::render_game(game)),
            None => return report(CatalogError::NotFound(id)),
        },
        Commands::List {
            search,
            status,
            platform,
        } => {
            catalog.set_search(search.unwrap_or_default());
            catalog.set_status_filter(status);
            catalog.set_platform_filter(platform);
            print!("{}", table::render_table(&catalog.visible(), catalog.games().len()));
        }
        Commands::Stats => print!("{}", table::render_stats(&catalog.stats())),
    }

    Ok(ExitCode::SUCCESS)
}

/// Field-level messages for validation, a short notice for a missing id,
/// and a generic failure for storage errors
fn report(err: CatalogError) -> Result<ExitCode> {
    match err {
        CatalogError::Validation(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{}: {}", field.red(), message);
            }
            Ok(ExitCode::from(1))
        }
        CatalogError::NotFound(id) => {
            eprintln!("No game with id {}", id);
            Ok(ExitCode::from(1))
        }
        CatalogError::Storage(e) => Err(eyre::Report::new(e).wrap_err("An error occurred while saving the game.")),
    }
}
