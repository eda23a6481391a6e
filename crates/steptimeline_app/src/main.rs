// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step timeline driver.
//!
//! Runs a scene headlessly on the logical clock:
//! - Loads options, steps and a navigation script from RON
//! - Applies script steps at their exact clock times
//! - Prints a text frame whenever the timeline changes
//! - Optionally prints each navigation plan as JSON
//!
//! ```text
//! steptimeline [SCENE.ron] [--frame-ms N] [--plan-json]
//! ```

mod error;
mod runner;
mod scene;
mod text;

use clap::Parser;
use error::AppError;
use runner::{RunSettings, Runner, DEFAULT_FRAME};
use scene::Scene;
use std::path::PathBuf;
use steptimeline_sequencer::Millis;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Play a step timeline scene on a logical clock
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene file (RON); the built-in demo runs when omitted
    #[arg(value_name = "SCENE")]
    scene: Option<PathBuf>,

    /// Clock step between frames, in milliseconds
    #[arg(
        long = "frame-ms",
        value_name = "N",
        default_value_t = DEFAULT_FRAME.as_u64(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    frame_ms: u64,

    /// Print each navigation plan as JSON
    #[arg(long = "plan-json")]
    plan_json: bool,
}

impl Args {
    fn settings(&self) -> RunSettings {
        RunSettings {
            frame: Millis(self.frame_ms),
            plan_json: self.plan_json,
        }
    }
}

fn env_filter() -> Result<EnvFilter, ParseError> {
    Ok(EnvFilter::from_default_env()
        .add_directive("steptimeline=info".parse()?)
        .add_directive("steptimeline_sequencer=debug".parse()?))
}

fn run(args: &Args) -> Result<(), AppError> {
    let scene = match &args.scene {
        Some(path) => {
            tracing::info!("Loading scene from {}", path.display());
            Scene::load(path)?
        }
        None => {
            tracing::info!("No scene given, running the built-in demo");
            Scene::demo()
        }
    };

    let mut runner = Runner::new(&scene, args.settings())?;
    let stdout = std::io::stdout();
    let summary = runner.run(&mut stdout.lock())?;

    tracing::info!(
        "Finished at {}: step {} settled, {} commits, {} overtaken",
        summary.finished_at,
        summary.final_index,
        summary.settled.len(),
        summary.stale_dropped
    );
    Ok(())
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(env_filter().unwrap_or_else(|_| EnvFilter::from_default_env()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting step timeline v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        tracing::error!("Run failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("steptimeline").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.scene, None);
        assert_eq!(parsed.settings(), RunSettings::default());
    }

    #[test]
    fn test_parse_flags() {
        let parsed = args(&["scene.ron", "--frame-ms", "8", "--plan-json"]).unwrap();
        assert_eq!(parsed.scene, Some(PathBuf::from("scene.ron")));
        assert_eq!(parsed.settings().frame, Millis(8));
        assert!(parsed.settings().plan_json);
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&["--frame-ms"]).is_err());
        assert!(args(&["--frame-ms", "fast"]).is_err());
        assert!(args(&["--frame-ms", "0"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a.ron", "b.ron"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_default_filter_covers_binary_target() {
        let filter = env_filter().unwrap().to_string();
        // Events from main.rs and runner.rs carry the binary's target
        assert!(filter.contains("steptimeline=info"), "{filter}");
        assert!(filter.contains("steptimeline_sequencer=debug"), "{filter}");
        assert!(module_path!().starts_with("steptimeline::"));
    }
}
