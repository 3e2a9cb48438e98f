use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/kasa.toml";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "path")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Parser)]
#[command(name = "kasa", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override log level (error, warn, info, debug, trace).
    #[arg(long)]
    level: Option<String>,
    /// Override server bind address.
    #[arg(long)]
    bind: Option<String>,
    /// Override server port.
    #[arg(long)]
    port: Option<u16>,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut builder = config::Config::builder();
        builder = builder.add_source(config::File::with_name(config_path).required(false));
        builder = builder.add_source(config::Environment::with_prefix("KASA").separator("__"));
        builder = builder.set_default("app.level", App::default().level)?;
        let mut settings: Settings = builder.build()?.try_deserialize()?;

        if let Some(level) = args.level {
            settings.app.level = level;
        }
        if let Some(server) = settings.server.as_mut() {
            if let Some(bind) = args.bind {
                server.bind = Some(bind);
            }
            if let Some(port) = args.port {
                server.port = port;
            }
        }

        Ok(settings)
    }
}
