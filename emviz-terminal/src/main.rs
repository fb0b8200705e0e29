//! emviz-terminal: ASCII view and sample dump for the machine visualizations.
//!
//! Live mode keys: Space pauses, Tab moves to the next card, Q/Esc quits.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use emviz_core::{config, Visualization, VisualizationConfig};
use emviz_terminal::{dump_samples, LogGate, TerminalApp};

#[derive(Parser)]
#[command(name = "emviz-terminal", about = "Electrical-machine waveform visualizations in the terminal")]
struct Args {
    /// Visualization to show (see --list).
    #[arg(default_value = "ac-generator")]
    visualization: Visualization,

    /// Print this many samples as JSON lines instead of opening the live view.
    #[arg(long, value_name = "FRAMES")]
    dump: Option<usize>,

    /// Sample rate for --dump.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// TOML file with per-visualization parameter overrides.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Tracing filter directive, overrides RUST_LOG.
    #[arg(long, value_name = "DIRECTIVE")]
    log_level: Option<String>,

    /// List visualizations and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(directive) => tracing_subscriber::EnvFilter::try_new(directive)?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "emviz_core=warn,emviz_terminal=info".into()),
    };
    let log_gate = LogGate::new();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_gate.clone())
        .init();

    if args.list {
        let mut out = io::stdout().lock();
        for v in Visualization::ALL {
            writeln!(out, "{:<16} {}", v.name(), v.title())?;
        }
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => VisualizationConfig::default(),
    };

    if let Some(frames) = args.dump {
        tracing::info!(visualization = %args.visualization, frames, fps = args.fps, "Dumping samples");
        let params = settings.parameters(args.visualization);
        dump_samples(&mut io::stdout().lock(), args.visualization, &params, frames, args.fps)?;
        return Ok(());
    }

    tracing::info!(visualization = %args.visualization, "Starting live view");
    let mut app = TerminalApp::new(args.visualization, settings)?.with_log_gate(log_gate);
    app.run()?;
    Ok(())
}
