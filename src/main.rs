use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use moment_galaxy::model::load_moments_file;
use moment_galaxy::model::stats::{date_span, year_groups};
use moment_galaxy::render::camera::{CameraPose, TransitionKind};
use moment_galaxy::render::constellation::Constellation;
use moment_galaxy::render::vertex::as_bytes;
use moment_galaxy::{Emotion, GalaxyConfig, GalaxyLayout, GalaxyScene, MomentFilter, MomentStats};

/// Lay out a moment history as a spiral galaxy and dump the scene as JSON
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON array of moment records
    moments: PathBuf,

    /// TOML file overriding layout and camera parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep only moments with this emotion
    #[arg(long, value_parser = parse_emotion)]
    emotion: Option<Emotion>,

    /// Keep only moments with this importance (1-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    importance: Option<u8>,

    /// Keep only moments from this calendar year
    #[arg(long)]
    year: Option<i32>,

    /// Keep soft-deleted moments
    #[arg(long)]
    include_deleted: bool,

    /// Select these moments one after another and record the camera flights
    #[arg(long = "select", value_name = "ID")]
    selections: Vec<String>,

    /// Clear the selection after the last `--select`
    #[arg(long)]
    deselect: bool,

    /// Also lay out the constellation around this moment
    #[arg(long, value_name = "ID")]
    constellation: Option<String>,

    /// Simulation rate for camera flights
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Record only the last pose of each flight
    #[arg(long)]
    summary: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn parse_emotion(s: &str) -> std::result::Result<Emotion, String> {
    Emotion::parse(&s.to_ascii_lowercase()).ok_or_else(|| {
        format!("unknown emotion '{s}' (happy, sad, exciting, nostalgic, neutral)")
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Flight {
    /// `None` for a return to the overview
    selection: Option<String>,
    transition: Option<TransitionKind>,
    waypoints: usize,
    length: f32,
    speed: f32,
    duration: f32,
    frames: Vec<CameraPose>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Dump<'a> {
    stats: MomentStats,
    years: std::collections::BTreeMap<i32, usize>,
    first_date: Option<String>,
    last_date: Option<String>,
    layout: &'a GalaxyLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    constellation: Option<Constellation>,
    flights: Vec<Flight>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be a positive number");
    }

    let config = match &args.config {
        Some(path) => GalaxyConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GalaxyConfig::default(),
    };

    let all = load_moments_file(&args.moments)
        .with_context(|| format!("loading moments {}", args.moments.display()))?;

    let filter = MomentFilter {
        emotion: args.emotion,
        importance: args.importance,
        include_deleted: args.include_deleted,
        ..args.year.map(MomentFilter::year).unwrap_or_default()
    };
    let moments = filter.apply(&all);
    log::info!("{} of {} moments visible", moments.len(), all.len());

    let mut scene = GalaxyScene::new(config);
    let layout = scene.layout(&moments);
    log::info!(
        "Layout: {} bubbles, {} edges, {} guide points",
        layout.bubbles.len(),
        layout.edges.len(),
        layout.guide_path.len()
    );
    let buffers = layout.gpu_buffers();
    log::debug!(
        "GPU buffers: {} B instances, {} B guide, {} B edges",
        as_bytes(&buffers.bubbles).len(),
        as_bytes(&buffers.guide).len(),
        as_bytes(&buffers.edges).len()
    );

    let constellation = match &args.constellation {
        Some(id) => Some(
            scene
                .constellation(id, &moments)
                .with_context(|| format!("no visible moment with id '{id}'"))?,
        ),
        None => None,
    };

    let mut steps: Vec<Option<&str>> = args.selections.iter().map(|s| Some(s.as_str())).collect();
    if args.deselect {
        steps.push(None);
    }

    let dt = 1.0 / args.fps;
    let mut camera = scene.choreographer();
    let mut flights = Vec::with_capacity(steps.len());
    for step in steps {
        let target = match step {
            Some(id) => Some(
                layout
                    .bubble(id)
                    .with_context(|| format!("no visible moment with id '{id}'"))?,
            ),
            None => None,
        };
        if !camera.select(target) {
            log::info!("Selection {:?} unchanged, no flight", step);
            continue;
        }

        let mut flight = Flight {
            selection: step.map(str::to_owned),
            transition: camera.transition(),
            waypoints: camera.camera_points().len(),
            length: camera.path_length(),
            speed: camera.speed(),
            duration: 0.0,
            frames: Vec::new(),
        };
        while let Some(pose) = camera.tick(dt) {
            flight.duration += dt;
            if !args.summary || !camera.is_animating() {
                flight.frames.push(pose);
            }
        }
        log::info!(
            "Flight to {:?}: {:?}, {:.2} units in {:.2}s",
            step,
            flight.transition,
            flight.length,
            flight.duration
        );
        flights.push(flight);
    }

    let span = date_span(&moments);
    let dump = Dump {
        stats: MomentStats::collect(&moments),
        years: year_groups(&moments),
        first_date: span.map(|(first, _)| first.to_rfc3339()),
        last_date: span.map(|(_, last)| last.to_rfc3339()),
        layout: &layout,
        constellation,
        flights,
    };

    let out = if args.pretty {
        serde_json::to_string_pretty(&dump)?
    } else {
        serde_json::to_string(&dump)?
    };
    println!("{out}");
    Ok(())
}
