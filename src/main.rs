//! Trellis CLI
//!
//! Usage:
//!   trellis [OPTIONS] <SCENE>
//!
//! Options:
//!   -s, --stylesheet <FILE>  Stylesheet file for the color palette (TOML format)
//!   -f, --frames <N>         Advance N frames before drawing
//!   -o, --output <FILE>      Write SVG to a file instead of stdout
//!   --check                  Load and resolve the scene without writing SVG
//!   --trace                  Print every constraint evaluation to stderr
//!   -h, --help               Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use trellis::{
    describe_layout, render_with_config, trace_layout, RenderConfig, RenderError, Scene,
    Stylesheet, SvgConfig,
};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Render constraint-laid-out scenes to SVG")]
struct Cli {
    /// Scene file (TOML)
    scene: PathBuf,

    /// Stylesheet file for the color palette (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Frames to advance before drawing
    #[arg(short, long, default_value_t = 0)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Write SVG here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Load and resolve the scene, print its layout, write nothing
    #[arg(long)]
    check: bool,

    /// Print every constraint evaluation of the final frame to stderr
    #[arg(long)]
    trace: bool,

    /// Debug mode: print resolved bounds and label SVG elements
    #[arg(short, long)]
    debug: bool,

    /// Emit single-line SVG
    #[arg(long)]
    compact: bool,

    /// Log engine activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e.report());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), RenderError> {
    let stylesheet = match &cli.stylesheet {
        Some(path) => Stylesheet::from_file(path)?,
        None => Stylesheet::default(),
    };

    let source = fs::read_to_string(&cli.scene).map_err(trellis::SceneError::from)?;

    if cli.check || cli.trace {
        let mut scene = Scene::from_str(&source, &stylesheet)?;
        let window = scene.window_mut();
        for _ in 0..cli.frames {
            window.tick(cli.dt);
        }
        if cli.trace {
            eprint!("{}", trace_layout(window.tree(), window.root())?);
        }
        if cli.check {
            window.tree().check_cycles(window.root())?;
            print!("{}", describe_layout(window.tree(), window.root())?);
            return Ok(());
        }
    }

    let config = RenderConfig::new()
        .with_stylesheet(stylesheet)
        .with_frames(cli.frames, cli.dt)
        .with_svg(if cli.compact {
            SvgConfig::compact()
        } else {
            SvgConfig::default()
        })
        .with_debug(cli.debug);
    let svg = render_with_config(&source, config)?;

    match &cli.output {
        Some(path) => fs::write(path, svg).map_err(trellis::SceneError::from)?,
        None => println!("{}", svg),
    }
    Ok(())
}
