//! Slidetrack CLI — answer slider challenges from the command line.
//!
//! Usage:
//!   slidetrack solve [OPTIONS]        Solve a request body or a pair of image files
//!   slidetrack locate [OPTIONS]       Print the best gap offset and its score
//!   slidetrack tracks <DISTANCE>      Synthesize a drag trajectory
//!   slidetrack synth [OPTIONS]        Write a synthetic challenge with a known gap
//!   slidetrack config [--init]        Show the effective config or write the defaults

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slidetrack_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "slidetrack",
    about = "Slider gap localization and human-like drag synthesis",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/slidetrack/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the per-request random source (fresh OS entropy if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a challenge and print the response JSON
    Solve {
        /// Request body JSON file, or "-" for stdin
        #[arg(short, long, conflicts_with_all = ["background", "slider"])]
        request: Option<PathBuf>,

        /// Background image file
        #[arg(long, requires = "slider")]
        background: Option<PathBuf>,

        /// Slider image file
        #[arg(long, requires = "background")]
        slider: Option<PathBuf>,

        /// Drag time budget in ms (image-file mode only)
        #[arg(long)]
        total_time: Option<u64>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the best-matching gap offset
    Locate {
        /// Background image file
        #[arg(long)]
        background: PathBuf,

        /// Slider image file
        #[arg(long)]
        slider: PathBuf,

        /// Also report the score with the slider's left edge at this x
        #[arg(long, requires = "at_y")]
        at_x: Option<u32>,

        /// Also report the score with the slider's top edge at this y
        #[arg(long, requires = "at_x")]
        at_y: Option<u32>,
    },

    /// Synthesize a drag trajectory for a given distance
    Tracks {
        /// Horizontal drag distance in px
        distance: u32,

        /// Drag time budget in ms
        #[arg(long, default_value = "1000")]
        total_time: u64,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate a synthetic challenge request with a known gap
    Synth {
        /// Output request JSON file
        #[arg(short, long, default_value = "challenge.json")]
        output: PathBuf,

        /// Also write background.png and slider.png into this directory
        #[arg(long)]
        images_dir: Option<PathBuf>,

        /// Background width
        #[arg(long, default_value = "360")]
        width: u32,

        /// Background height
        #[arg(long, default_value = "200")]
        height: u32,

        /// Slider edge length
        #[arg(long, default_value = "50")]
        slider_size: u32,

        /// Gap left edge
        #[arg(long, default_value = "150")]
        gap_x: u32,

        /// Gap top edge
        #[arg(long, default_value = "70")]
        gap_y: u32,

        /// Drag time budget written into the request
        #[arg(long, default_value = "1000")]
        total_time: u64,
    },

    /// Print the effective configuration, or write the defaults to disk
    Config {
        /// Write the default configuration instead of printing
        #[arg(long)]
        init: bool,

        /// Destination for --init (defaults to the standard config path)
        #[arg(short, long, requires = "init")]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, requires = "init")]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match AppConfig::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: failed to load config {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    slidetrack_common::logging::init_logging(&config.logging);

    match run(cli, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: AppConfig) -> anyhow::Result<ExitCode> {
    // One generator per invocation; never shared.
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match cli.command {
        Commands::Solve {
            request,
            background,
            slider,
            total_time,
            pretty,
        } => {
            let input = match (request, background, slider) {
                (Some(path), _, _) => commands::solve::Input::Request(path),
                (None, Some(background), Some(slider)) => commands::solve::Input::Images {
                    background,
                    slider,
                    total_time,
                },
                _ => anyhow::bail!("pass --request or both --background and --slider"),
            };
            commands::solve::run(input, &config.solver, pretty, &mut rng)
        }
        Commands::Locate {
            background,
            slider,
            at_x,
            at_y,
        } => commands::locate::run(background, slider, at_x.zip(at_y), &config.solver),
        Commands::Tracks {
            distance,
            total_time,
            pretty,
        } => commands::tracks::run(distance, total_time, &config.solver, pretty, &mut rng),
        Commands::Synth {
            output,
            images_dir,
            width,
            height,
            slider_size,
            gap_x,
            gap_y,
            total_time,
        } => commands::synth::run(
            output,
            images_dir,
            slidetrack_solver_core::synthetic::ChallengeSpec {
                background_width: width,
                background_height: height,
                slider_size,
                gap_x,
                gap_y,
                ..Default::default()
            },
            total_time,
            &mut rng,
        ),
        Commands::Config {
            init,
            output,
            force,
        } => {
            if init {
                commands::config::init(output, force)
            } else {
                commands::config::show(&config)
            }
        }
    }
}
