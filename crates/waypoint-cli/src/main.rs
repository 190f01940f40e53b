mod cache_cmd;
mod config;
mod packing_cmd;
mod plan_cmd;
mod refine_cmd;
mod show_cmd;
mod suggest_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::WaypointConfig;

#[derive(Parser)]
#[command(name = "waypoint", about = "Generative travel itinerary builder and refiner")]
struct Cli {
    /// Provider CLI binary (overrides WAYPOINT_ORACLE_BIN env var)
    #[arg(long, global = true)]
    oracle_binary: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default waypoint config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Suggest destinations for a budget, season, and continent
    Suggest {
        /// Budget tier, e.g. "Budget", "Mid-range", "Luxury"
        #[arg(long, default_value = "Mid-range")]
        budget: String,
        /// Time of year for the trip, e.g. "October"
        #[arg(long, default_value = "")]
        season: String,
        /// Continent to search, e.g. "Asia"
        #[arg(long, default_value = "Anywhere")]
        continent: String,
        /// Look up one specific country instead of suggesting
        #[arg(long, conflicts_with_all = ["budget", "continent", "off_beat"])]
        country: Option<String>,
        /// Curated off-the-beaten-path suggestions
        #[arg(long)]
        off_beat: bool,
    },
    /// Generate an itinerary and write it to a plan file
    Plan {
        /// Destination country
        destination: String,
        /// Trip length in days; 0 lets the provider pick (comprehensive tour)
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Itinerary style: mixed, touristy, or off-beat
        #[arg(long, default_value = "mixed")]
        style: String,
        /// Free-text preferences passed to the provider
        #[arg(long, default_value = "")]
        notes: String,
        /// Time of year for the trip
        #[arg(long, default_value = "")]
        season: String,
        /// Display name for the saved plan (default: "Trip to <destination>")
        #[arg(long)]
        name: Option<String>,
        /// Output file (default: derived from the display name)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Refine a saved plan through the provider
    Refine {
        /// Saved plan file
        file: PathBuf,
        /// Free-text refinement notes
        #[arg(long, default_value = "")]
        notes: String,
        /// Delete an activity first: "<day>:<activity name>" (repeatable)
        #[arg(long = "delete-activity", value_name = "DAY:NAME")]
        delete_activity: Vec<String>,
        /// Remove a city stop by its stop number from `show` (repeatable)
        #[arg(long = "remove-city", value_name = "STOP")]
        remove_city: Vec<usize>,
        /// Set a day's note first: "<day>:<text>" (repeatable)
        #[arg(long = "day-note", value_name = "DAY:TEXT")]
        day_note: Vec<String>,
        /// Output file (default: overwrite the input file)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a packing list for a saved plan
    Packing {
        /// Saved plan file
        file: PathBuf,
    },
    /// Render a saved plan as text
    Show {
        /// Saved plan file
        file: PathBuf,
    },
    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Remove expired entries from the response cache
    Sweep,
}

/// Write a default config file for the user to edit.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    config::save_config(&config::ConfigFile::default())?;
    println!("Wrote config file to {}", path.display());
    println!("Edit the [oracle] section to point at your provider CLI.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::Suggest {
            budget,
            season,
            continent,
            country,
            off_beat,
        } => {
            let resolved = WaypointConfig::resolve(cli.oracle_binary.as_deref())?;
            suggest_cmd::run_suggest(
                &resolved,
                suggest_cmd::SuggestArgs {
                    budget,
                    season,
                    continent,
                    country,
                    off_beat,
                },
            )
            .await?;
        }
        Commands::Plan {
            destination,
            days,
            style,
            notes,
            season,
            name,
            out,
        } => {
            let resolved = WaypointConfig::resolve(cli.oracle_binary.as_deref())?;
            plan_cmd::run_plan(
                &resolved,
                plan_cmd::PlanArgs {
                    destination,
                    days,
                    style,
                    notes,
                    season,
                    name,
                    out,
                },
            )
            .await?;
        }
        Commands::Refine {
            file,
            notes,
            delete_activity,
            remove_city,
            day_note,
            out,
        } => {
            let resolved = WaypointConfig::resolve(cli.oracle_binary.as_deref())?;
            refine_cmd::run_refine(
                &resolved,
                refine_cmd::RefineArgs {
                    file,
                    notes,
                    delete_activity,
                    remove_city,
                    day_note,
                    out,
                },
            )
            .await?;
        }
        Commands::Packing { file } => {
            let resolved = WaypointConfig::resolve(cli.oracle_binary.as_deref())?;
            packing_cmd::run_packing(&resolved, &file).await?;
        }
        Commands::Show { file } => {
            show_cmd::run_show(&file)?;
        }
        Commands::Cache { command } => {
            let resolved = WaypointConfig::resolve(cli.oracle_binary.as_deref())?;
            match command {
                CacheCommands::Sweep => cache_cmd::run_sweep(&resolved)?,
            }
        }
    }

    Ok(())
}
