//! PixelSynth CLI - Command-line interface for image-to-MIDI generation
//!
//! This binary provides commands for turning images into Standard MIDI
//! Files, previewing which cells will sound, and validating settings.

use clap::{Args, Parser, Subcommand};
use pixelsynth_spec::{PitchClass, Scale};
use std::process::ExitCode;

// Use modules from the library crate
use pixelsynth_cli::commands;
use pixelsynth_cli::commands::generate::GenerateOptions;
use pixelsynth_cli::input::{SettingsOverrides, DEFAULT_MAX_WIDTH};

/// PixelSynth - Deterministic Image-to-MIDI Generation
#[derive(Parser)]
#[command(name = "pixelsynth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Per-field settings overrides shared by `generate` and `preview`.
#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Tempo in beats per minute
    #[arg(long)]
    bpm: Option<f64>,

    /// Brightness a cell must exceed to sound (0-254)
    #[arg(long)]
    threshold: Option<u8>,

    /// Song length in bars
    #[arg(long)]
    bars: Option<u32>,

    /// Lowest MIDI note
    #[arg(long)]
    min_note: Option<u8>,

    /// Highest MIDI note
    #[arg(long)]
    max_note: Option<u8>,

    /// Scale (chromatic, major, minor, pentatonic_major, pentatonic_minor, blues, diminished)
    #[arg(long)]
    scale: Option<Scale>,

    /// Scale root (C, C#, D, ... B; flats accepted)
    #[arg(long)]
    root: Option<PitchClass>,

    /// Grid columns (time steps)
    #[arg(long)]
    resolution_x: Option<u32>,

    /// Grid rows (pitch steps)
    #[arg(long)]
    resolution_y: Option<u32>,

    /// MIDI channel (0-15)
    #[arg(long)]
    channel: Option<u8>,
}

impl From<OverrideArgs> for SettingsOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            bpm: args.bpm,
            threshold: args.threshold,
            duration_bars: args.bars,
            min_note: args.min_note,
            max_note: args.max_note,
            scale: args.scale,
            root_note: args.root,
            resolution_x: args.resolution_x,
            resolution_y: args.resolution_y,
            channel: args.channel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a MIDI file from an image
    Generate {
        /// Path to the input image (PNG, JPEG, GIF, BMP)
        #[arg(short, long)]
        input: String,

        /// Path to a settings JSON file
        #[arg(short, long)]
        settings: Option<String>,

        /// Path to an analyzer suggestion JSON file (tempo, scale, root)
        #[arg(long)]
        suggestion: Option<String>,

        /// Output MIDI path (default: input path with .mid)
        #[arg(short, long)]
        output: Option<String>,

        /// Downscale images wider than this before sampling
        #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
        max_width: u32,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Render a PNG showing which grid cells will sound
    Preview {
        /// Path to the input image
        #[arg(short, long)]
        input: String,

        /// Path to a settings JSON file
        #[arg(short, long)]
        settings: Option<String>,

        /// Output PNG path (default: <input>.preview.png)
        #[arg(short, long)]
        output: Option<String>,

        /// Edge length of one cell in pixels
        #[arg(long, default_value_t = commands::preview::DEFAULT_CELL_SIZE)]
        cell_size: u32,

        /// Downscale images wider than this before sampling
        #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
        max_width: u32,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Validate a settings file
    Validate {
        /// Path to the settings JSON file
        #[arg(short, long)]
        settings: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the default settings as JSON
    Defaults,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            input,
            settings,
            suggestion,
            output,
            max_width,
            json,
            overrides,
        } => {
            let options = GenerateOptions {
                input,
                settings,
                suggestion,
                output,
                max_width,
                overrides: overrides.into(),
            };
            commands::generate::run(&options, json)
        }
        Commands::Preview {
            input,
            settings,
            output,
            cell_size,
            max_width,
            overrides,
        } => commands::preview::run(
            &input,
            settings.as_deref(),
            output.as_deref(),
            cell_size,
            max_width,
            &overrides.into(),
        ),
        Commands::Validate { settings, json } => commands::validate::run(&settings, json),
        Commands::Defaults => commands::defaults::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
