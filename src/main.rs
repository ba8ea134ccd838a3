//! Bouncy Shapes entry point
//!
//! Headless host: builds an in-memory canvas, spawns shapes, feeds the tick
//! driver simulated frames and prints the final scene as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use bouncy_shapes::platform::{ClickEvent, MouseButton, TickDriver};
use bouncy_shapes::sim::{ShapeFactory, ShapeKind, ShapeRegistry};
use bouncy_shapes::surface::Canvas;
use bouncy_shapes::{Extent, Settings};
use clap::Parser;

/// Surface size of the headless host
const SURFACE: Extent = Extent::new(800.0, 600.0);

/// Headless bouncing-shapes run that prints the final scene as JSON
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Settings file (JSON); defaults apply when missing or unreadable
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Ticks to simulate before printing the scene
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = 600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    ticks: u64,
    /// Randomly placed shapes added after the initial one
    #[arg(long, value_name = "COUNT", default_value_t = 3)]
    random: u32,
    /// Extra shape set moving from the start (circle or rectangle); repeatable
    #[arg(long = "spawn", value_name = "KIND")]
    spawn: Vec<ShapeKind>,
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Bouncy Shapes (headless) starting...");

    let args = Args::parse();

    let settings = args
        .config
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();

    let canvas = Canvas::new().shared();
    let factory = ShapeFactory::from_settings(canvas.clone(), &settings);
    let mut registry = ShapeRegistry::new(factory, &settings);
    let start = Instant::now();

    let initial = registry.add_initial_shape(SURFACE);
    for _ in 0..args.random {
        registry.add_random_shape(SURFACE);
    }

    // Requested kinds start along the top edge; a right click sets each one moving
    for (i, &kind) in args.spawn.iter().enumerate() {
        let size = settings.default_size;
        let pos = glam::DVec2::new(10.0 + i as f64 * (size + 10.0), 10.0);
        match registry.add_shape(kind, size, settings.default_velocity, pos) {
            Ok(_) => {
                let center = pos + size / 2.0;
                let at = start + settings.double_click_window() * (i as u32 + 1) * 2;
                let outcome = registry.handle_canvas_click(ClickEvent::new(
                    center.x,
                    center.y,
                    MouseButton::Right,
                    at,
                ));
                log::debug!("Spawned {}: {:?}", kind.as_str(), outcome);
            }
            Err(err) => log::error!("Could not spawn {}: {}", kind.as_str(), err),
        }
    }

    let mut driver = TickDriver::from_settings(&settings);
    let frame = Duration::from_millis(16);
    while driver.ticks() < args.ticks {
        driver.advance(frame, || registry.move_shapes(SURFACE));
    }
    log::info!(
        "Ran {} ticks ({} shapes on canvas)",
        driver.ticks(),
        canvas.borrow().len()
    );

    // Left click on the initial shape toggles it once more
    if let Some(shape) = initial.and_then(|id| registry.handler(id)) {
        let center = shape.position() + shape.size() / 2.0;
        let outcome = registry.handle_canvas_click(ClickEvent::new(
            center.x,
            center.y,
            MouseButton::Left,
            Instant::now() + Duration::from_secs(60),
        ));
        log::info!("Final click: {:?}", outcome);
    }

    match serde_json::to_string_pretty(&registry.snapshot()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Failed to serialize snapshot: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["bouncy-shapes"]).unwrap();
        assert_eq!(args.ticks, 600);
        assert_eq!(args.random, 3);
        assert!(args.config.is_none());
        assert!(args.spawn.is_empty());
    }

    #[test]
    fn test_args_repeated_spawn() {
        let args = Args::try_parse_from([
            "bouncy-shapes",
            "--spawn",
            "circle",
            "--spawn",
            "rect",
            "--config",
            "scene.json",
        ])
        .unwrap();
        assert_eq!(args.spawn, vec![ShapeKind::Circle, ShapeKind::Rectangle]);
        assert_eq!(args.config, Some(PathBuf::from("scene.json")));
    }

    #[test]
    fn test_args_rejects_bad_values() {
        assert!(Args::try_parse_from(["bouncy-shapes", "--spawn", "triangle"]).is_err());
        assert!(Args::try_parse_from(["bouncy-shapes", "--ticks", "0"]).is_err());
        assert!(Args::try_parse_from(["bouncy-shapes", "--verbose"]).is_err());
    }
}
