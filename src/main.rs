mod display;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use display::{Command, Display};
use windowpane::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "windowpane", about = "Interactive 2D/3D window-viewport viewer")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for PNG snapshots
    #[arg(long, default_value = ".")]
    snapshots: PathBuf,

    /// Mesh files to import at startup
    meshes: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };

    let mut engine = Engine::new(config.clone());
    for path in &args.meshes {
        if let Err(e) = engine.import_mesh(path, config.foreground) {
            error!(path = %path.display(), error = %e, "failed to import mesh");
        }
    }

    let mut display = Display::new("windowpane", config.viewport_width, config.viewport_height)?;
    let mut canvas = Canvas::new(config.viewport_width, config.viewport_height);
    let painter = Painter::new(config.background, Some(colors::GRID));
    let mut snapshot_count = 0;

    info!(
        clipping = %engine.clipping_method(),
        projection = %engine.projection(),
        "viewer started"
    );

    'running: loop {
        for command in display.poll_commands() {
            match command {
                Command::Quit => break 'running,
                Command::Pan { dx, dy } => {
                    engine.pan(f64::from(dx) * config.pan_step, f64::from(dy) * config.pan_step)
                }
                Command::ZoomIn => {
                    engine.zoom_in();
                }
                Command::ZoomOut => {
                    engine.zoom_out();
                }
                Command::RotateX { reverse } => engine.rotate_window(step(&config, reverse), Axis::X),
                Command::RotateY { reverse } => engine.rotate_window(step(&config, reverse), Axis::Y),
                Command::RotateZ { reverse } => engine.rotate_window(step(&config, reverse), Axis::Z),
                Command::ToggleClipping => {
                    let method = engine.clipping_method().toggled();
                    engine.set_clipping_method(method);
                }
                Command::ToggleProjection => {
                    let mode = engine.projection().toggled();
                    engine.set_projection(mode);
                }
                Command::ToggleAxes => engine.show_axes = !engine.show_axes,
                Command::Snapshot => {
                    snapshot_count += 1;
                    let path = args.snapshots.join(format!("windowpane-{:03}.png", snapshot_count));
                    match canvas.save_png(&path) {
                        Ok(()) => info!(path = %path.display(), "snapshot saved"),
                        Err(e) => warn!(path = %path.display(), error = %e, "snapshot failed"),
                    }
                }
            }
        }

        let display_list = engine.update();
        painter.paint(&mut canvas, display_list);
        display.present(canvas.as_bytes())?;
        display.wait_for_next_frame();
    }

    Ok(())
}

fn step(config: &ViewerConfig, reverse: bool) -> f64 {
    if reverse {
        -config.rotate_step
    } else {
        config.rotate_step
    }
}
