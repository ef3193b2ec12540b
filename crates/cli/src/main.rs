#![deny(unsafe_code)]
//! CLI binary for the particle-field animation.
//!
//! Subcommands:
//! - `render`: run a field for N frames off-screen, write the last frame as PNG
//! - `stats`: run N frames against a recording surface, report per-frame counts
//! - `defaults`: print the resolved configuration and the option schema

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use particle_field_core::{
    CancellationToken, FieldConfig, FixedHost, FrameLoop, FrameStats, ParticleField, Recorder,
    Srgb, Surface,
};
use particle_field_raster::Pixmap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "particle-field", about = "Animated particle field, rendered headless")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand that builds a field.
#[derive(clap::Args)]
struct FieldArgs {
    /// Host width in logical pixels.
    #[arg(short = 'W', long, default_value_t = 800.0)]
    width: f64,

    /// Host height in logical pixels.
    #[arg(short = 'H', long, default_value_t = 600.0)]
    height: f64,

    /// Number of frames to advance.
    #[arg(short, long, default_value_t = 300)]
    frames: u64,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Field options as a JSON object (e.g. '{"count": 80, "bounce": true}').
    #[arg(long, default_value = "{}")]
    params: String,

    /// Read field options from a JSON file; keys in --params override it.
    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Hold the pointer at "X,Y" for the whole run.
    #[arg(long)]
    pointer: Option<String>,

    /// Pace the run at this many frames per second instead of running flat out.
    #[arg(long)]
    fps: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a field for N frames and write the final frame as a PNG.
    Render {
        #[command(flatten)]
        field: FieldArgs,

        /// Background color behind the field (hex, rgb()/rgba(), or a CSS
        /// name), or "none" for transparency.
        #[arg(short, long, default_value = "#000000")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "field.png")]
        output: PathBuf,
    },
    /// Run a field for N frames and report point, respawn, and line counts.
    Stats {
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Print the resolved default configuration and the option schema.
    Defaults {
        /// Host width used to resolve width-relative defaults.
        #[arg(short = 'W', long, default_value_t = 800.0)]
        width: f64,

        /// Field options to resolve instead of the bare defaults.
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

/// Parses `--params`, layered over `--params-file` when one is given.
fn load_params(inline: &str, file: Option<&Path>) -> Result<Value, CliError> {
    let inline: Value = serde_json::from_str(inline)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let Some(path) = file else {
        return Ok(inline);
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    let mut base: Value = serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid JSON in {}: {e}", path.display())))?;
    if let (Some(base_obj), Some(overrides)) = (base.as_object_mut(), inline.as_object()) {
        for (key, value) in overrides {
            base_obj.insert(key.clone(), value.clone());
        }
    }
    Ok(base)
}

/// Parses a pointer position written as `"X,Y"`.
fn parse_pointer(raw: &str) -> Result<(f64, f64), CliError> {
    let bad = || CliError::Input(format!("invalid --pointer {raw:?}, expected X,Y"));
    let (x, y) = raw.split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse::<f64>().map_err(|_| bad())?;
    let y = y.trim().parse::<f64>().map_err(|_| bad())?;
    Ok((x, y))
}

/// Parses `--background`: any CSS color, or `"none"` for a transparent PNG.
fn parse_background(raw: &str) -> Result<Option<Srgb>, CliError> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(Some(Srgb::parse(raw)?))
}

/// Frame pacing for `--fps`; `None` runs unpaced.
fn frame_interval(fps: Option<f64>) -> Result<Option<Duration>, CliError> {
    match fps {
        None => Ok(None),
        Some(fps) if fps.is_finite() && fps > 0.0 => Ok(Some(Duration::from_secs_f64(1.0 / fps))),
        Some(fps) => Err(CliError::Input(format!("invalid --fps {fps}, expected a positive number"))),
    }
}

/// Builds a field on a fixed-size host and runs it for `args.frames` frames.
fn run_field<S: Surface>(
    args: &FieldArgs,
    surface: S,
    on_frame: impl FnMut(&FrameStats, &mut ParticleField<S>),
) -> Result<ParticleField<S>, CliError> {
    let params = load_params(&args.params, args.params_file.as_deref())?;
    let config = FieldConfig::from_json(&params);
    let pointer = args.pointer.as_deref().map(parse_pointer).transpose()?;
    let interval = frame_interval(args.fps)?;

    let host = FixedHost::new(args.width, args.height);
    let mut field = ParticleField::new(&host, config, surface, args.seed)?;
    if let Some((x, y)) = pointer {
        field.pointer_move(x, y);
    }

    let mut frame_loop = FrameLoop::unbounded().with_limit(args.frames);
    if let Some(interval) = interval {
        frame_loop = frame_loop.with_interval(interval);
    }
    let summary = frame_loop.run(&mut field, &CancellationToken::new(), on_frame);
    debug!(frames = summary.frames, "run complete");
    Ok(field)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Defaults { width, params } => {
            let params = load_params(&params, None)?;
            let config = FieldConfig::from_json(&params);
            let resolved = config.resolved_json(width);
            if cli.json {
                let info = serde_json::json!({
                    "config": resolved,
                    "schema": FieldConfig::param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Resolved configuration (width {width}):");
                if let Some(obj) = resolved.as_object() {
                    for (key, value) in obj {
                        println!("  {key}: {value}");
                    }
                }
            }
        }
        Command::Stats { field } => {
            let mut frames = Vec::new();
            let mut draw_calls = 0usize;
            let result = run_field(&field, Recorder::new(), |stats, f| {
                frames.push(*stats);
                draw_calls += f.surface_mut().take_commands().len();
            })?;
            let total_lines: usize = frames.iter().map(|s| s.lines).sum();
            let total_respawned: usize = frames.iter().map(|s| s.respawned).sum();
            let total_reflected: usize = frames.iter().map(|s| s.reflected).sum();
            if cli.json {
                let info = serde_json::json!({
                    "frames": frames,
                    "points": result.points().len(),
                    "lines": total_lines,
                    "respawned": total_respawned,
                    "reflected": total_reflected,
                    "draw_calls": draw_calls,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{} frames, {} points, {total_lines} lines, {total_respawned} respawned, {total_reflected} reflected",
                    frames.len(),
                    result.points().len()
                );
            }
        }
        Command::Render {
            field,
            background,
            output,
        } => {
            let background = parse_background(&background)?;
            let rendered = run_field(&field, Pixmap::new(1, 1)?, |_, _| {})?;
            let points = rendered.points().len();
            let frames = rendered.frame_count();
            let pixmap = rendered.into_surface();

            particle_field_raster::snapshot::write_png(&pixmap, background, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": pixmap.width(),
                    "height": pixmap.height(),
                    "frames": frames,
                    "points": points,
                    "seed": field.seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {points} points ({}x{}, {frames} frames, seed {}) -> {}",
                    pixmap.width(),
                    pixmap.height(),
                    field.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    info!("particle-field starting");
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Instant;
    use serde_json::json;

    fn args(params: &str) -> FieldArgs {
        FieldArgs {
            width: 120.0,
            height: 80.0,
            frames: 25,
            seed: 9,
            params: params.to_string(),
            params_file: None,
            pointer: None,
            fps: None,
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn load_params_rejects_invalid_json() {
        let err = load_params("{nope", None).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn load_params_file_is_overridden_by_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"count": 10, "bounce": true}"#).unwrap();

        let params = load_params(r#"{"count": 20}"#, Some(&path)).unwrap();
        assert_eq!(params, json!({"count": 20, "bounce": true}));
    }

    #[test]
    fn load_params_missing_file_is_io_error() {
        let err = load_params("{}", Some(Path::new("/nonexistent/params.json"))).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn parse_pointer_accepts_pairs() {
        assert_eq!(parse_pointer("10, 20.5").ok(), Some((10.0, 20.5)));
        assert!(parse_pointer("10").is_err());
        assert!(parse_pointer("a,b").is_err());
    }

    #[test]
    fn parse_background_none_is_transparent() {
        assert_eq!(parse_background("none").ok(), Some(None));
        assert_eq!(parse_background("#fff").ok(), Some(Some(Srgb::WHITE)));
        assert_eq!(parse_background("#zz").err().map(|e| e.exit_code()), Some(12));
    }

    #[test]
    fn parse_background_accepts_css_colors() {
        assert_eq!(parse_background("black").ok(), Some(Some(Srgb::BLACK)));
        let translucent = parse_background("rgba(255, 0, 0, 0.5)").unwrap().unwrap();
        assert_eq!(translucent.a, 0.5);
    }

    #[test]
    fn frame_interval_rejects_non_positive_fps() {
        assert_eq!(frame_interval(None).ok(), Some(None));
        assert_eq!(frame_interval(Some(50.0)).ok(), Some(Some(Duration::from_millis(20))));
        assert_eq!(frame_interval(Some(0.0)).err().map(|e| e.exit_code()), Some(12));
        assert!(frame_interval(Some(f64::NAN)).is_err());
    }

    #[test]
    fn run_field_paces_frames_with_fps() {
        let mut a = args(r#"{"count": 4}"#);
        a.frames = 5;
        a.fps = Some(100.0);
        let started = Instant::now();
        let field = run_field(&a, Recorder::new(), |_, _| {}).unwrap();
        assert_eq!(field.frame_count(), 5);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn run_field_advances_requested_frames() {
        let mut seen = 0;
        let field = run_field(&args(r#"{"count": 12}"#), Recorder::new(), |_, _| seen += 1).unwrap();
        assert_eq!(seen, 25);
        assert_eq!(field.frame_count(), 25);
        assert_eq!(field.points().len(), 12);
    }

    #[test]
    fn run_field_applies_pointer() {
        let mut a = args(r#"{"mousemove": true}"#);
        a.pointer = Some("60,40".into());
        let field = run_field(&a, Recorder::new(), |_, _| {}).unwrap();
        assert!(field.pointer_active());
    }

    #[test]
    fn run_field_on_pixmap_sizes_surface() {
        let field = run_field(&args("{}"), Pixmap::new(1, 1).unwrap(), |_, _| {}).unwrap();
        let pixmap = field.into_surface();
        assert_eq!((pixmap.width(), pixmap.height()), (120, 80));
    }
}
