mod app;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use kg_lens::VisibilitySettings;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph JSON file with `nodes` and `edges` (or `links`) arrays.
    graph: PathBuf,

    /// JSON file with visibility settings; flags below override it.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Node count below which every node is shown.
    #[arg(long)]
    filter_threshold: Option<usize>,

    /// Importance above which a node is always shown.
    #[arg(long)]
    importance_threshold: Option<f32>,

    #[arg(long)]
    node_size: Option<f32>,

    #[arg(long)]
    force_strength: Option<f32>,
}

impl Args {
    fn visibility_settings(&self) -> Result<VisibilitySettings> {
        let mut settings = match &self.settings {
            Some(path) => VisibilitySettings::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => VisibilitySettings::default(),
        };

        if let Some(value) = self.filter_threshold {
            settings.filter_threshold = value;
        }
        if let Some(value) = self.importance_threshold {
            settings.importance_threshold = value;
        }
        if let Some(value) = self.node_size {
            settings.node_size = value;
        }
        if let Some(value) = self.force_strength {
            settings.force_strength = value;
        }

        settings
            .validate()
            .context("command-line settings are invalid")?;
        Ok(settings)
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kg_lens=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let settings = args.visibility_settings()?;
    info!(?settings, graph = %args.graph.display(), "starting viewer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "kg-lens",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::KgLensApp::new(
                cc,
                args.graph.clone(),
                settings,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
