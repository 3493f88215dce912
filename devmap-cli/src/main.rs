use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use devmap_core::{NullHost, PanelKernel};
use devmap_extract::KeyCatalog;
use devmap_options::PanelOptions;
use devmap_store::{FrameSource, FrameSourceHandle, JsonFrameSource, MultiFrameSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "devmap")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render markers and list cards for a frame document.
    Render {
        /// Frame document; repeat to concatenate several in order.
        #[arg(long, required = true)]
        frames: Vec<PathBuf>,
        #[arg(long)]
        options: Option<PathBuf>,
        /// Clock for "last updated" text (RFC 3339).
        #[arg(long)]
        now: Option<String>,
    },
    /// List the payload keys found in the frames.
    Keys {
        #[arg(long, required = true)]
        frames: Vec<PathBuf>,
    },
    /// Report every problem in an options file.
    CheckOptions {
        #[arg(long)]
        options: PathBuf,
    },
}

fn source(paths: &[PathBuf]) -> MultiFrameSource {
    MultiFrameSource::new(
        paths
            .iter()
            .map(|p| Arc::new(JsonFrameSource::new(p)) as FrameSourceHandle)
            .collect(),
    )
}

fn load_options(path: Option<&Path>) -> anyhow::Result<PanelOptions> {
    match path {
        Some(path) => Ok(PanelOptions::from_path(path)?),
        None => Ok(PanelOptions::default()),
    }
}

fn parse_now(now: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match now {
        Some(text) => Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render { frames, options, now } => {
            let options = load_options(options.as_deref())?;
            let now = parse_now(now.as_deref())?;
            let frames = source(&frames).frames().await?;

            let mut kernel = PanelKernel::new(options, Arc::new(NullHost));
            let pass = kernel.render_at(&frames, now);
            info!(frames = frames.len(), devices = pass.points.len(), "rendered");

            println!("tiles {}", kernel.tile_source().url_template());
            println!("{}", kernel.options().header);
            for marker in &pass.markers {
                println!(
                    "marker {} color={} value={} badge={}",
                    marker.deviceid,
                    marker.color,
                    marker.value_text,
                    marker.badge_text.as_deref().unwrap_or("-"),
                );
            }
            for card in &pass.cards {
                println!(
                    "card {} {} value={} {} updated={}",
                    card.deviceid,
                    card.status,
                    card.value_text.as_deref().unwrap_or("-"),
                    card.unit.as_deref().unwrap_or(""),
                    card.last_updated.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::Keys { frames } => {
            let frames = source(&frames).frames().await?;
            let catalog = KeyCatalog::scan(&frames);
            for key in catalog.keys() {
                match catalog.sample(key) {
                    Some(sample) => println!("{key}\t{sample}"),
                    None => println!("{key}"),
                }
            }
        }
        Command::CheckOptions { options } => {
            let options = PanelOptions::from_path(&options)?;
            let problems = options.validate();
            if problems.is_empty() {
                println!("options ok");
            } else {
                for problem in &problems {
                    println!("{problem}");
                }
                anyhow::bail!("{} configuration problem(s)", problems.len());
            }
        }
    }

    Ok(())
}
