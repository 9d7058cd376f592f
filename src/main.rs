//! OWCS Match Prediction CLI
//!
//! Build two rosters from the player catalog and predict the winner, or serve
//! the prediction API for the web UI.

use clap::{Parser, Subcommand};
use owcs::{Config, Result};

#[derive(Parser)]
#[command(name = "owcs")]
#[command(about = "OWCS match prediction from player statistics", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the prediction API
    Serve {
        /// Override the listen address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Predict a match between two rosters of catalog players
    Predict {
        /// Comma-separated team 1 player names
        #[arg(long, value_delimiter = ',')]
        team1: Vec<String>,
        /// Comma-separated team 2 player names
        #[arg(long, value_delimiter = ',')]
        team2: Vec<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// List players available for selection
    Players {
        /// Only show this role (tank, damage, support)
        #[arg(long)]
        role: Option<String>,
        /// Filter by name
        #[arg(long)]
        query: Option<String>,
    },
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Write a default config file
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show the model's inputs and outputs
    Info,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let mut config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };
    config.apply_env_overrides();

    // Run command
    let result = match cli.command {
        Commands::Serve { bind } => commands::serve(config, bind),
        Commands::Predict {
            team1,
            team2,
            format,
        } => commands::predict(&config, &team1, &team2, format),
        Commands::Players { role, query } => commands::players(&config, role, query),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use owcs::data::PlayerCatalog;
    use owcs::predict::adapter::select_output;
    use owcs::predict::{format_prediction, OnnxLoader, PredictionService};
    use owcs::team::MatchSession;
    use owcs::{OwError, Role, Side};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Place the player dataset at {}", config.data.players_path);
        println!("  2. Place the trained model at {}", config.model.path);
        println!("  3. Run 'owcs serve' or 'owcs predict --team1 ... --team2 ...'");

        Ok(())
    }

    pub fn serve(mut config: Config, bind: Option<String>) -> Result<()> {
        if let Some(bind) = bind {
            config.server.bind = bind;
        }
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(owcs::server::serve(&config))
    }

    pub fn predict(
        config: &Config,
        team1: &[String],
        team2: &[String],
        format: OutputFormat,
    ) -> Result<()> {
        let catalog = PlayerCatalog::load(&config.data.players_path)?;

        let mut session = MatchSession::new();
        for (side, names) in [(Side::Team1, team1), (Side::Team2, team2)] {
            for name in names {
                let player = catalog.require(name.trim())?;
                if !player.is_eligible() {
                    return Err(OwError::InvalidRoster(format!(
                        "{} has no recorded matches",
                        player.name
                    )));
                }
                session.add(side, player.clone())?;
            }
        }

        let service = PredictionService::new(OnnxLoader::new(&config.model.path));
        let result = session.predict(&service)?;
        let roster1 = session.roster(Side::Team1).players();
        let roster2 = session.roster(Side::Team2).players();

        match format {
            OutputFormat::Table => {
                print!("{}", format_prediction(&result, roster1, roster2));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }

        Ok(())
    }

    pub fn players(config: &Config, role: Option<String>, query: Option<String>) -> Result<()> {
        let catalog = PlayerCatalog::load(&config.data.players_path)?;
        let role = match role {
            Some(name) => Some(
                Role::from_name(&name)
                    .ok_or_else(|| OwError::Config(format!("Unknown role: {}", name)))?,
            ),
            None => None,
        };

        let players = catalog.search(query.as_deref().unwrap_or(""), role);
        println!("{:<24} {:<8} {:>8} {:>6}", "Player", "Role", "Matches", "K/D");
        println!("{}", "─".repeat(49));
        for p in &players {
            println!(
                "{:<24} {:<8} {:>8} {:>6.2}",
                p.name,
                p.role.to_string(),
                p.matches_played,
                p.stats.kd_ratio
            );
        }
        println!("\n{} players", players.len());

        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let service = PredictionService::new(OnnxLoader::new(&config.model.path));
        let backend = service.adapter().backend()?;

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:    {}", config.model.path);
        println!("  Inputs:");
        for name in backend.input_names() {
            println!("    {}", name);
        }
        println!("  Outputs:");
        for output in backend.outputs() {
            let kind = if output.is_tensor { "tensor" } else { "non-tensor" };
            println!("    {} ({})", output.name, kind);
        }
        match select_output(backend.outputs()) {
            Ok(selected) => println!("  Selected output: {}", selected.name),
            Err(e) => println!("  Selected output: none ({})", e),
        }

        Ok(())
    }
}
