use anyhow::Context;
use clap::Parser;
use freight_engine::config::{DatabaseConfig, ServerConfig};
use freight_engine::engine::Engine;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "freight",
    version,
    about = "Logistics reporting API",
    disable_help_subcommand = true
)]
struct Cli {
    /// Listen on HOST:PORT instead of 0.0.0.0:5000
    #[arg(short = 'S', value_name = "HOST:PORT")]
    serve: Option<String>,

    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    db_host: String,

    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    db_port: u16,

    #[arg(long, env = "DB_USER", default_value = "root")]
    db_user: String,

    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    db_password: String,

    #[arg(long, env = "DB_NAME", default_value = "gensoft_logistics")]
    db_name: String,
}

impl Cli {
    fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            name: self.db_name.clone(),
        }
    }
}

fn parse_host_port(s: &str) -> Result<(String, u16), String> {
    if let Some(rest) = s.strip_prefix('[') {
        // bracketed IPv6: [host]:port
        if let Some(end) = rest.find(']') {
            let host = &rest[..end];
            let remain = &rest[end + 1..];
            let port = remain
                .strip_prefix(':')
                .ok_or("missing port after IPv6 host")?;
            let port: u16 = port.parse().map_err(|_| "invalid port".to_string())?;
            return Ok((host.to_string(), port));
        }
        return Err("invalid bracketed IPv6 address".to_string());
    }
    let mut parts = s.rsplitn(2, ':');
    let port_str = parts.next().ok_or("missing port")?;
    let host = parts.next().ok_or("missing host")?;
    let port: u16 = port_str.parse().map_err(|_| "invalid port".to_string())?;
    Ok((host.to_string(), port))
}

/// Loads settings from a `.env` file (the working directory's when `path`
/// is `None`). Variables already in the environment take precedence.
fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env_file(None);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Some(path) = env_file {
        log::info!("loaded settings from {}", path.display());
    }
    let cli = Cli::parse();

    let mut config = ServerConfig::default().set_database(cli.database());
    if let Some(addr) = cli.serve.as_deref() {
        match parse_host_port(addr) {
            Ok((host, port)) => config = config.set_listen(host, port),
            Err(e) => {
                eprintln!("-S expects HOST:PORT (e.g. 0.0.0.0:5000), error: {}", e);
                std::process::exit(2);
            }
        }
    }

    let engine = Engine::connect(config).await;
    engine
        .run()
        .await
        .with_context(|| format!("http server on {}", engine.config().addr()))
}
