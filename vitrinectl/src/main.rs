use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrine_config::{ConfigLoad, ConfigLoader, ConfigLoaderOptions};
use vitrine_core::plugins::{Autoplay, Hash, Lazy, Navigation};
use vitrine_core::{CarouselBuilder, Content, Viewport};

mod script;

use script::{Simulation, read_script};

#[derive(Parser)]
#[command(
    name = "vitrinectl",
    about = "Vitrine carousel options and simulation tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the settings that apply at a viewport width
    Resolve {
        #[command(flatten)]
        config: ConfigArgs,
        /// Viewport width in pixels
        #[arg(long)]
        width: f32,
    },
    /// Build a carousel, replay a script against it and print its final state
    Simulate {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long, default_value_t = 1200.0)]
        width: f32,
        /// Number of generated items
        #[arg(long, default_value_t = 6)]
        items: usize,
        /// JSON array of script steps
        #[arg(long)]
        script: Option<PathBuf>,
        /// URL fragment handed to the hash plugin (without '#')
        #[arg(long)]
        fragment: Option<String>,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// TOML or JSON options file; falls back to VITRINE_CONFIG_PATH,
    /// VITRINE_CONFIG_JSON, then ./vitrine.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// .env file consulted before the process environment
    #[arg(long)]
    env_file: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(self) -> Result<ConfigLoad> {
        let loaded = ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: self.config,
            env_file: self.env_file,
        })
        .load()
        .context("failed to load carousel options")?;
        info!(
            source = ?loaded.source,
            warnings = loaded.warnings.len(),
            "options loaded"
        );
        Ok(loaded)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve { config, width } => {
            let loaded = config.load()?;
            let resolved = loaded.options.resolve(width);
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Command::Simulate {
            config,
            width,
            items,
            script,
            fragment,
        } => {
            let loaded = config.load()?;
            let steps = match script {
                Some(path) => read_script(&path)?,
                None => Vec::new(),
            };

            let carousel =
                CarouselBuilder::new(loaded.options, Viewport::new(width))
                    .items((0..items).map(|i| {
                        Content::new(format!("/img/{i}.jpg"))
                            .with_hash(format!("item-{i}"))
                    }))
                    .plugin(Navigation::new())
                    .plugin(Autoplay::new())
                    .plugin(Lazy::new())
                    .plugin(Hash::new(fragment))
                    .build()
                    .context("failed to build carousel")?;

            let mut simulation = Simulation::new(carousel);
            simulation.run(&steps);
            println!("{}", serde_json::to_string_pretty(&simulation.report())?);
        }
    }

    Ok(())
}
