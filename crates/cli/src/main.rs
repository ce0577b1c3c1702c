use std::path::PathBuf;

use anyhow::Context;
use bibliotech_app::app;
use bibliotech_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bibliotech", about = "BiblioTech catalog service", version)]
struct Cli {
    /// Directory holding `base.toml` and `<env>.toml`
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to load (local, staging, production)
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the merged OpenAPI document as JSON
    Openapi,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let settings = match (&self.config_dir, &self.env) {
            (None, None) => Settings::load()?,
            (dir, env) => {
                let dir = match dir {
                    Some(dir) => dir.clone(),
                    None => std::env::current_dir()?.join("config"),
                };
                Settings::load_from(&dir, env.as_deref().unwrap_or("local"))?
            }
        };
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli
        .settings()
        .with_context(|| "failed to load BiblioTech settings")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            bibliotech_telemetry::init(&settings.telemetry);
            app::serve(settings).await
        }
        Commands::Migrate => {
            bibliotech_telemetry::init(&settings.telemetry);
            let registry = app::build_registry(&settings);
            let db = app::migrate(&registry, &settings).await?;
            db.close().await.context("failed to close database connection")?;
            Ok(())
        }
        // Logs would interleave with the document on stdout.
        Commands::Openapi => {
            let document = app::openapi(&settings);
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
    }
}
