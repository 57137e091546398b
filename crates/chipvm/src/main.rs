use std::path::PathBuf;

use chipvm::{BackendType, Options};
use chipvm_core::{Config, TimerMode, DEFAULT_FREQUENCY, SCREEN_SCALE};
use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Backend {
    Sdl2,
    Headless,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Timers {
    /// Count down once per executed instruction
    PerCycle,
    /// Count down 60 times per emulated second
    #[value(name = "fixed60hz")]
    Fixed60Hz,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Backend::Sdl2)]
    backend: Backend,

    #[arg(short, long, default_value_t = SCREEN_SCALE, help = "Window scale factor")]
    scale: u32,

    #[arg(short, long, default_value_t = DEFAULT_FREQUENCY, help = "Cycles per second")]
    frequency: u32,

    #[arg(long, value_enum, default_value_t = Timers::PerCycle)]
    timer_mode: Timers,

    #[arg(long, help = "Seed for the RANDOM instruction")]
    seed: Option<u64>,

    #[arg(long, help = "Start paused; P toggles, N steps")]
    paused: bool,

    #[arg(long, help = "Log cycle timing statistics on exit")]
    profile: bool,

    #[arg(long, help = "Headless backend: quit after this many frames")]
    max_frames: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Playing ROM path: '{}'", args.rom.display());

    let options = Options {
        rom_path: args.rom,
        backend: match args.backend {
            Backend::Sdl2 => BackendType::Sdl2,
            Backend::Headless => BackendType::Headless,
        },
        scale: args.scale,
        config: Config {
            frequency: args.frequency,
            timer_mode: match args.timer_mode {
                Timers::PerCycle => TimerMode::PerCycle,
                Timers::Fixed60Hz => TimerMode::Fixed60Hz,
            },
            seed: args.seed,
            start_paused: args.paused,
            profile: args.profile,
        },
        max_frames: args.max_frames,
    };
    chipvm::run(options)
}
