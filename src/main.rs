//! ina219-ups-hat: MCP server for INA219-based UPS hat readings
//!
//! Exposes voltage, current, power, state of charge, remaining capacity and
//! remaining time as typed, unit-annotated sensors. Readings come from the
//! snapshot an external INA219 poller writes after every read.

use clap::{Parser, Subcommand};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::*,
    ErrorData as McpError,
    ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// === Modules ===

mod config;
mod coordinator;
mod platform;
mod sensors;
mod shared;
mod snapshot;

use coordinator::FileCoordinator;
use platform::DiscoveryInfo;
use sensors::SensorAdapter;

// === CLI ===

#[derive(Parser)]
#[command(name = "ina219-ups-hat")]
#[command(about = "MCP server for INA219 UPS hat sensors")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the config file in your editor
    Config,
    /// Read the current snapshot once and print every sensor
    Read {
        /// Print readings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-enable a sensor
    Enable { key: String },
    /// Disable a sensor
    Disable { key: String },
}

// === Common Parameter Types ===

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EmptyParams {}

// === Server ===

#[derive(Debug)]
pub struct UpsHatServer {
    pub tool_router: ToolRouter<Self>,
    coordinator: FileCoordinator,
    sensors: Vec<SensorAdapter>,
}

impl UpsHatServer {
    pub fn new(config: &config::Config) -> Self {
        let (coordinator, sensors) = register_sensors(config);
        Self {
            tool_router: Self::tool_router(),
            coordinator,
            sensors,
        }
    }
}

/// Create the coordinator and register the sensors it feeds
fn register_sensors(config: &config::Config) -> (FileCoordinator, Vec<SensorAdapter>) {
    let coordinator = FileCoordinator::new(&config.snapshot_path);
    let discovery = DiscoveryInfo {
        reader: coordinator.reader(),
    };

    let mut registered = Vec::new();
    platform::setup_platform(Some(discovery), config, |sensors| registered = sensors);
    (coordinator, registered)
}

#[rmcp::tool_router]
impl UpsHatServer {
    #[rmcp::tool(description = "List the UPS hat sensors with their keys, device classes, state classes and units")]
    pub async fn list_sensors(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        sensors::status::list_sensors(&self.sensors).await
    }

    #[rmcp::tool(description = "Read a single UPS hat sensor by key (voltage, current, power, read_power, soc, soc_inu, remaining_battery_capacity, remaining_time, remaining_time_custom)")]
    pub async fn get_sensor(
        &self,
        Parameters(params): Parameters<sensors::status::SensorKeyParams>,
    ) -> Result<CallToolResult, McpError> {
        sensors::status::get_sensor(&self.coordinator, &self.sensors, params).await
    }

    #[rmcp::tool(description = "Get UPS hat status: voltage, current, power, state of charge, remaining capacity and remaining time")]
    pub async fn get_ups_status(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        sensors::status::get_ups_status(&self.coordinator, &self.sensors).await
    }

    #[rmcp::tool(description = "Get every UPS hat sensor reading as JSON (value, unit, device class, state class, display precision)")]
    pub async fn get_readings_json(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        sensors::status::get_readings_json(&self.coordinator, &self.sensors).await
    }
}

#[rmcp::tool_handler]
impl ServerHandler for UpsHatServer {
    fn get_info(&self) -> ServerInfo {
        let mut description = format!(
            "ina219-ups-hat: {} sensors from {}.\n",
            self.sensors.len(),
            self.coordinator.path().display()
        );
        if !self.coordinator.last_update_success() {
            description.push_str("Last snapshot refresh failed; readings are flagged unavailable.\n");
        }

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(description),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config) => {
            run_config_command()?;
        }
        Some(Commands::Read { json }) => {
            init_tracing("warn");
            run_read_command(json).await?;
        }
        Some(Commands::Enable { key }) => {
            init_tracing("info");
            run_toggle_command(&key, true)?;
        }
        Some(Commands::Disable { key }) => {
            init_tracing("info");
            run_toggle_command(&key, false)?;
        }
        None => {
            init_tracing("info");
            run_server().await?;
        }
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open config file in user's editor
fn run_config_command() -> anyhow::Result<()> {
    let config_path = config::Config::path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !config_path.exists() {
        let template = include_str!("../config.toml.example");
        std::fs::write(&config_path, template)?;
        println!("Created config file: {}", config_path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string());

    println!("Opening {} with {}", config_path.display(), editor);

    std::process::Command::new(&editor)
        .arg(&config_path)
        .status()?;

    Ok(())
}

/// Refresh once and print all registered sensors.
///
/// Like the server, a failed refresh is reported per reading rather than
/// aborting.
async fn run_read_command(json: bool) -> anyhow::Result<()> {
    let config = config::Config::load();
    let (coordinator, sensors) = register_sensors(&config);
    coordinator.refresh().await.ok();

    if json {
        println!("{}", sensors::status::readings_json(&sensors)?);
    } else {
        print!("{}", sensors::status::format_status(&sensors));
    }
    Ok(())
}

fn run_toggle_command(key: &str, enable: bool) -> anyhow::Result<()> {
    if sensors::description::find(key).is_none() {
        anyhow::bail!("Unknown sensor: {}", key);
    }

    let mut config = config::Config::load();
    if enable {
        config.enable(key);
    } else {
        config.disable(key);
    }
    config.save()?;
    println!("{} {}", if enable { "Enabled" } else { "Disabled" }, key);
    Ok(())
}

/// Run the MCP server
async fn run_server() -> anyhow::Result<()> {
    tracing::info!("Starting ina219-ups-hat server");

    let config = config::Config::load();
    let server = UpsHatServer::new(&config);
    server.coordinator.refresh().await.ok();

    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    tracing::info!("ina219-ups-hat server stopped");
    Ok(())
}
