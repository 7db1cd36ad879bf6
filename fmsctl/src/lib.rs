pub mod commands;
pub mod logging;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use fms_core::{load_fms_config, Airport, FlightPlanService, StaticNavDatabase};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use commands::script::parse_script;
use commands::session;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] fms_core::ConfigError),
    #[error("navdata error: {0}")]
    Navdata(#[from] fms_core::NavdataError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },
    #[error("script line {line}: {source}")]
    Step {
        line: usize,
        source: fms_core::PlanError,
    },
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Flight plan editing console", long_about = None)]
pub struct Cli {
    /// Path to the main fms.toml
    #[arg(long, default_value = "configs/fms.toml")]
    pub config: PathBuf,
    /// Alternative navigation database (overrides navdata.path)
    #[arg(long)]
    pub navdata: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs an editing script against a fresh set of flight plans
    Run(RunArgs),
    /// Lists the airports known to the navigation database
    Navdata,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Script file, one command per line (stdin when omitted)
    pub script: Option<PathBuf>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let context = AppContext::new(&cli)?;

    match &cli.command {
        Commands::Run(args) => {
            let source = read_script(args.script.as_deref())?;
            let steps = parse_script(&source)?;
            for step in &steps {
                if let Some(output) = session::execute(&context.service, step).await? {
                    render(&output, cli.format)?;
                }
            }
            info!(node = %context.node_name, steps = steps.len(), "script completed");
        }
        Commands::Navdata => {
            let listing = AirportList {
                rows: context.service.database().airports(),
            };
            render(&listing, cli.format)?;
        }
    }

    Ok(())
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn render<T>(value: &T, format: OutputFormat) -> Result<()>
where
    T: Serialize + DisplayFallback,
{
    match format {
        OutputFormat::Text => {
            println!("{}", value.display());
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{}", json);
            Ok(())
        }
    }
}

trait DisplayFallback {
    fn display(&self) -> String;
}

#[derive(Debug, Serialize)]
struct AirportList {
    rows: Vec<Airport>,
}

impl DisplayFallback for AirportList {
    fn display(&self) -> String {
        if self.rows.is_empty() {
            return "No airports loaded".to_string();
        }
        self.rows
            .iter()
            .map(|airport| {
                format!(
                    "{} | {}",
                    airport.ident,
                    airport.name.as_deref().unwrap_or("<unnamed>")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct AppContext {
    node_name: String,
    service: FlightPlanService<StaticNavDatabase>,
}

impl AppContext {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = load_fms_config(&cli.config)?;
        if let Some(navdata) = &cli.navdata {
            config.navdata.path = navdata.clone();
        }
        let service = FlightPlanService::from_config(&config)?;
        info!(
            node = %config.system.node_name,
            navdata = %config.navdata_path().display(),
            secondary_slots = config.slots.secondary_count,
            "flight plan service ready"
        );
        Ok(Self {
            node_name: config.system.node_name,
            service,
        })
    }
}
