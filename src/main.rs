use clap::Parser;

mod ambient;
mod animator;
mod engine;
mod events;
mod explorer;
mod globe;
mod narration;
mod quiz;
mod rotation;
mod selection;
mod speech;
mod surface;
mod transition;
mod viewer;

use engine::{Engine, EngineOptions};
use speech::{NullSpeech, PacedSpeech, SpeechSynth, VoiceParams};

#[derive(Parser, Debug)]
#[command(name = "chronoglobe")]
#[command(about = "Interactive timeline of historical events on a rotating globe")]
struct Args {
    /// Random seed for the globe surface and ambient effects
    #[arg(short, long)]
    seed: Option<u64>,

    /// Launch the pixel viewer window instead of the terminal explorer
    #[arg(long)]
    viewer: bool,

    /// Pixel viewer window size
    #[arg(long, default_value = "720")]
    window_size: usize,

    /// Suppress decorative extra spin turns
    #[arg(long)]
    reduced_motion: bool,

    /// Start with narration off
    #[arg(long)]
    no_narration: bool,

    /// Disable the speech engine entirely (text appears fully revealed)
    #[arg(long)]
    mute: bool,

    /// Narration speaking rate multiplier
    #[arg(long, default_value = "1.0")]
    rate: f64,

    /// Load the event timeline from a JSON file
    #[arg(long)]
    events: Option<std::path::PathBuf>,

    /// Load quiz questions from a JSON file
    #[arg(long)]
    quiz: Option<std::path::PathBuf>,

    /// Surface heightmap resolution (width; height is half)
    #[arg(long, default_value = "360")]
    surface_width: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Seed: {}", seed);

    let timeline = match &args.events {
        Some(path) => match events::Timeline::from_json_file(path) {
            Ok(timeline) => timeline,
            Err(e) => {
                eprintln!("Failed to load events from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => events::builtin_timeline(),
    };
    let questions = match &args.quiz {
        Some(path) => match quiz::questions_from_json_file(path) {
            Ok(questions) => questions,
            Err(e) => {
                eprintln!("Failed to load quiz from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => quiz::builtin_questions(),
    };

    println!("Generating surface...");
    let surface = surface::Surface::generate(args.surface_width, args.surface_width / 2, seed);

    let speech: Box<dyn SpeechSynth> = if args.mute {
        Box::new(NullSpeech::new())
    } else {
        Box::new(PacedSpeech::new())
    };
    let engine = Engine::new(
        timeline,
        speech,
        EngineOptions {
            reduced_motion: args.reduced_motion,
            narration_enabled: !args.no_narration,
            voice: VoiceParams {
                rate: args.rate,
                ..VoiceParams::default()
            },
            ambient_seed: seed ^ 0x636f_6d65_7473,
        },
    );

    let result = if args.viewer {
        println!("Launching pixel viewer...");
        viewer::run_viewer(engine, surface, args.window_size)
    } else {
        println!("Launching terminal explorer...");
        explorer::run_explorer(engine, surface, questions, quiz::builtin_scenarios())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
