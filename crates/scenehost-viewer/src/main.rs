//! Scenehost viewer - headless entry point
//!
//! Mounts one of the scene hosts on a null graphics backend, drives it
//! from a fixed-rate frame loop and logs what the scene ends up holding.

mod config;
mod fetch;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use scenehost_components::{AssetSceneHost, AssetSceneProps, SceneComponent, SceneHost};
use scenehost_engine::{Engine, FileAssetSource, FrameClock, NullBackend};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::{Config, HostKind, RunConfig};
use fetch::HttpAssetSource;
use report::SceneSummary;

#[derive(Parser, Debug)]
#[command(name = "scenehost")]
#[command(about = "Headless viewer for the scenehost scene components")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "scenehost.toml")]
    config: PathBuf,

    /// Host component to mount
    #[arg(long, value_enum)]
    host: Option<HostKind>,

    /// Model URL or path (implies the model host)
    #[arg(short, long)]
    model_url: Option<String>,

    /// Surface width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Frames to run, 0 runs until Ctrl-C
    #[arg(short, long)]
    frames: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write a default configuration file and exit
    #[arg(long)]
    write_default: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Scenehost v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let mut config = config::load_config(&args.config)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    info!(
        host = ?config.scene.host,
        width = config.surface.width,
        height = config.surface.height,
        frames = config.run.frames,
        "Configuration loaded"
    );

    let files = match &config.fetch.base_dir {
        Some(dir) => FileAssetSource::with_base_dir(dir),
        None => FileAssetSource::new(),
    };
    let assets = HttpAssetSource::new(Duration::from_secs(config.fetch.timeout_secs), files)?;
    let backend = NullBackend::new();
    let stats = backend.stats();
    let engine = Engine::new(Arc::new(backend), Arc::new(assets));

    let mut host = build_host(engine, &config)?;
    host.mount()
        .with_context(|| format!("Failed to mount {}", host.name()))?;

    run_frames(host.as_mut(), &config.run).await;

    if let Some(context) = host.context() {
        let scene = context.scene();
        info!(
            frames = context.frame_index(),
            summary = %SceneSummary::of(scene),
            "Scene state"
        );
        report::log_entities(scene);
    }

    host.unmount();
    info!(
        opened = stats.opened(),
        released = stats.released(),
        presented = stats.frames(),
        "Viewer finished"
    );

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(host) = args.host {
        config.scene.host = host;
    }
    if let Some(url) = &args.model_url {
        config.scene.model_url = Some(url.clone());
        if args.host.is_none() {
            config.scene.host = HostKind::Model;
        }
    }
    if let Some(width) = args.width {
        config.surface.width = width;
    }
    if let Some(height) = args.height {
        config.surface.height = height;
    }
    if let Some(frames) = args.frames {
        config.run.frames = frames;
    }
}

fn build_host(engine: Engine, config: &Config) -> Result<Box<dyn SceneComponent>> {
    let (width, height) = (config.surface.width, config.surface.height);
    let host: Box<dyn SceneComponent> = match config.scene.host {
        HostKind::Box => Box::new(SceneHost::new(engine, width, height)),
        HostKind::Model => {
            let url = config
                .scene
                .model_url
                .clone()
                .context("the model host needs a model URL")?;
            Box::new(AssetSceneHost::new(
                engine,
                AssetSceneProps::new(width, height, url),
            ))
        }
    };
    Ok(host)
}

async fn run_frames(host: &mut dyn SceneComponent, run: &RunConfig) {
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(run.frame_rate)));
    let mut clock = FrameClock::new();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut frames = 0u64;
    while run.frames == 0 || frames < run.frames {
        tokio::select! {
            _ = ticker.tick() => {
                let time = clock.tick();
                match host.context_mut() {
                    Some(context) => {
                        context.tick(time.dt);
                    }
                    None => {
                        warn!("Host lost its context, stopping");
                        break;
                    }
                }
                frames += 1;
            }
            _ = &mut shutdown => {
                info!(frames, "Interrupted, shutting down");
                break;
            }
        }
    }
}
