#![deny(unsafe_code)]
//! Demo driver binary for the easel surface-composition system.
//!
//! Subcommands:
//! - `run` — build a canvas, register a demo screen, run the cooperative
//!   loop for N frames, optionally export every surface as PNG
//! - `presets` — print the aspect-ratio presets
//! - `fit` — compute the two-pass fit box of one ratio inside another

mod error;

use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};

use easel_core::context::{GraphicsConfig, GraphicsContext};
use easel_core::handler::GraphicsContextHandler;
use easel_core::ratio::{AspectRatio, AspectRatioConfig};
use easel_screens::canvas;
use easel_screens::{fit_dimensions, CanvasConfig, CanvasScreen, Sketch, SystemHost};

use error::CliError;

#[derive(Parser)]
#[command(name = "easel", about = "Surface composition for generative sketches")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a canvas, run the draw loop, optionally export PNGs.
    Run {
        /// Surface aspect ratio: a preset name or "W:H".
        #[arg(short, long, default_value = "square")]
        ratio: String,

        /// Canvas resolution in units.
        #[arg(long, default_value_t = 1080.0)]
        resolution: f64,

        /// Number of frames to run.
        #[arg(short, long, default_value_t = 3)]
        frames: usize,

        /// Export every surface of the active screen as PNG.
        #[arg(short, long)]
        save: bool,

        /// Directory exported files are written into.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Container window size as "WxH".
        #[arg(short, long, default_value = "1280x720")]
        window: String,

        /// Full canvas configuration as a JSON string (overrides --resolution).
        #[arg(long)]
        config: Option<String>,
    },
    /// List the aspect-ratio presets.
    Presets,
    /// Compute the fit box of one aspect ratio inside another.
    Fit {
        /// Surface ratio: a preset name or "W:H".
        surface: String,

        /// Container ratio: a preset name or "W:H".
        container: String,

        /// Resolution the container dimensions derive from.
        #[arg(long, default_value_t = 1080.0)]
        resolution: f64,
    },
}

/// Demo sketch: fills its surface with a shade that pulses per frame.
#[derive(Default)]
struct PulseSketch {
    frame: u32,
}

impl Sketch for PulseSketch {
    fn draw(&mut self, gfx: &mut GraphicsContext) {
        self.frame = self.frame.wrapping_add(1);
        let shade = ((self.frame % 32) * 8) as u8;
        gfx.surface_mut().fill([shade, shade, 96, 255]);
    }
}

fn parse_ratio(input: &str) -> Result<AspectRatio, CliError> {
    if let Ok(preset) = AspectRatio::from_name(input) {
        return Ok(preset);
    }
    let (w, h) = input.split_once(':').ok_or_else(|| {
        CliError::Input(format!(
            "invalid ratio '{input}': expected a preset name or \"W:H\""
        ))
    })?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| CliError::Input(format!("invalid ratio component '{s}'")))
    };
    let (w, h) = (parse(w)?, parse(h)?);
    if w < 1.0 || h < 1.0 {
        return Err(CliError::Input(format!(
            "ratio components must be >= 1, got {w}:{h}"
        )));
    }
    Ok(AspectRatio::from_config(AspectRatioConfig {
        name: None,
        width_ratio: w,
        height_ratio: h,
    }))
}

fn parse_window(input: &str) -> Result<(f64, f64), CliError> {
    let (w, h) = input
        .split_once('x')
        .ok_or_else(|| CliError::Input(format!("invalid window '{input}': expected \"WxH\"")))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| CliError::Input(format!("invalid window dimension '{s}'")))
    };
    Ok((parse(w)?, parse(h)?))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Run {
            ratio,
            resolution,
            frames,
            save,
            output,
            window,
            config,
        } => {
            let (window_width, window_height) = parse_window(&window)?;
            let mut host = SystemHost::new(window_width, window_height);

            let config = match config {
                Some(raw) => serde_json::from_str(&raw)
                    .map_err(|e| CliError::Input(format!("invalid --config JSON: {e}")))?,
                None => CanvasConfig::default().with_resolution(resolution),
            };
            canvas::reset();
            canvas::build_canvas(&mut host, config, true)?;

            let surface_ratio = parse_ratio(&ratio)?;
            let primary = GraphicsContext::new(
                &mut host,
                GraphicsConfig::named("primary")
                    .with_resolution(canvas::resolution())
                    .with_aspect_ratio(AspectRatioConfig {
                        name: None,
                        width_ratio: surface_ratio.width_ratio(),
                        height_ratio: surface_ratio.height_ratio(),
                    }),
            )?;
            let mut graphics = GraphicsContextHandler::new(primary);
            graphics.add_context(GraphicsContext::new(
                &mut host,
                GraphicsConfig::named("thumb").with_resolution(256.0),
            )?);

            canvas::add_screen(CanvasScreen::new(
                "main",
                graphics,
                Box::new(PulseSketch::default()),
            ));
            canvas::set_active_screen("main");

            let ticket = if save {
                canvas::with_context(|c| {
                    c.screens_mut()
                        .active_screen_mut()
                        .map(|s| s.save_all_graphics_in(&mut host, &output))
                })
                .flatten()
            } else {
                None
            };
            let expected = ticket.as_ref().map_or(0, |t| t.expected());

            let mut reports = Vec::new();
            let mut frame = 0usize;
            loop {
                canvas::draw(&mut host);
                frame += 1;
                if let Some(ticket) = &ticket {
                    reports.extend(ticket.drain());
                }
                if frame >= frames && reports.len() >= expected {
                    break;
                }
                if frame > frames + 4000 {
                    return Err(CliError::Io("exports did not complete".into()));
                }
                thread::sleep(Duration::from_millis(16));
            }

            let placement = canvas::with_context(|c| {
                c.screens()
                    .active_screen()
                    .map(|s| s.graphics_placement(c.state(), c.surface()))
            })
            .flatten();

            let exported: Vec<serde_json::Value> = reports
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "surface": r.surface,
                        "path": r.path.display().to_string(),
                        "ok": r.succeeded(),
                    })
                })
                .collect();

            if cli.json {
                let info = serde_json::json!({
                    "canvas": {
                        "name": canvas::name(),
                        "width": canvas::width(),
                        "height": canvas::height(),
                        "resolution": canvas::resolution(),
                        "stroke_width": canvas::default_stroke_width(),
                    },
                    "surface_ratio": surface_ratio.name(),
                    "frames": frame,
                    "placement": placement.map(|p| {
                        serde_json::json!({"x": p.x, "y": p.y, "width": p.width, "height": p.height})
                    }),
                    "exports": exported,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "canvas '{}' {}x{} (resolution {})",
                    canvas::name(),
                    canvas::width(),
                    canvas::height(),
                    canvas::resolution()
                );
                if let Some(p) = placement {
                    eprintln!(
                        "screen 'main' composites '{}' at ({}, {}) {}x{}",
                        surface_ratio.name(),
                        p.x,
                        p.y,
                        p.width,
                        p.height
                    );
                }
                eprintln!("ran {frame} frames");
                for r in &reports {
                    if r.succeeded() {
                        eprintln!("exported {}", r.path.display());
                    } else {
                        eprintln!("export failed: {}", r.path.display());
                    }
                }
            }

            canvas::reset();
            Ok(())
        }
        Command::Presets => {
            let presets: Vec<AspectRatio> = AspectRatio::preset_names()
                .iter()
                .map(|name| AspectRatio::from_name(name))
                .collect::<Result<_, _>>()?;
            if cli.json {
                let info: Vec<serde_json::Value> = presets
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "name": p.name(),
                            "width_ratio": p.width_ratio(),
                            "height_ratio": p.height_ratio(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "presets": info }))?
                );
            } else {
                println!("Presets:");
                for p in &presets {
                    println!("  {} ({}:{})", p.name(), p.width_ratio(), p.height_ratio());
                }
            }
            Ok(())
        }
        Command::Fit {
            surface,
            container,
            resolution,
        } => {
            let surface_ratio = parse_ratio(&surface)?;
            let container_ratio = parse_ratio(&container)?;
            let max_width = container_ratio.width(resolution);
            let max_height = container_ratio.height(resolution);
            let (width, height) = fit_dimensions(&surface_ratio, resolution, max_width, max_height);
            let x = (max_width - width) / 2;
            let y = (max_height - height) / 2;
            if cli.json {
                let info = serde_json::json!({
                    "surface": surface_ratio.name(),
                    "container": container_ratio.name(),
                    "container_size": {"width": max_width, "height": max_height},
                    "fit": {"x": x, "y": y, "width": width, "height": height},
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{} in {} ({}x{}): box ({}, {}) {}x{}",
                    surface_ratio.name(),
                    container_ratio.name(),
                    max_width,
                    max_height,
                    x,
                    y,
                    width,
                    height
                );
            }
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
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
