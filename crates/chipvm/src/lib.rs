use std::path::PathBuf;

use anyhow::Result;
use chipvm_common::{Event, Frontend};
use chipvm_core::{Config, Interpreter, SCREEN_HEIGHT, SCREEN_WIDTH};
use chipvm_sdl2::{SdlFrontend, SdlInitInfo};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BackendType {
    Sdl2,
    Headless,
}

pub struct Options {
    pub rom_path: PathBuf,
    pub backend: BackendType,
    pub scale: u32,
    pub config: Config,
    /// Headless only: quit after this many polls.
    pub max_frames: Option<u64>,
}

pub fn run(options: Options) -> Result<()> {
    match options.backend {
        BackendType::Sdl2 => run_sdl2(options),
        BackendType::Headless => run_headless(options),
    }
}

pub fn run_sdl2(options: Options) -> Result<()> {
    let init_info = SdlInitInfo::builder()
        .width(SCREEN_WIDTH as u32)
        .height(SCREEN_HEIGHT as u32)
        .scale(options.scale)
        .title("chipvm".to_string())
        .build();
    let frontend = SdlFrontend::new(init_info)?;
    run_with(frontend, options)
}

pub fn run_headless(options: Options) -> Result<()> {
    let frontend = HeadlessFrontend::new(options.max_frames);
    run_with(frontend, options)
}

fn run_with<F: Frontend>(frontend: F, options: Options) -> Result<()> {
    let mut interpreter = Interpreter::new(frontend, options.config);
    interpreter.boot()?;
    interpreter.load_rom(&options.rom_path)?;
    interpreter.run()?;
    Ok(())
}

/// A frontend without a window or keyboard. Counts presented frames and asks
/// to quit once its poll budget is spent.
pub struct HeadlessFrontend {
    polls_remaining: Option<u64>,
    frames: u64,
}

impl HeadlessFrontend {
    pub fn new(max_polls: Option<u64>) -> Self {
        Self {
            polls_remaining: max_polls,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Frontend for HeadlessFrontend {
    fn poll_events(&mut self) -> Vec<Event> {
        match self.polls_remaining.as_mut() {
            Some(0) => vec![Event::Quit],
            Some(remaining) => {
                *remaining -= 1;
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn present(&mut self, _pixels: &[bool]) -> Result<()> {
        self.frames += 1;
        log::trace!("Headless frame {}", self.frames);
        Ok(())
    }

    fn exit(&mut self) {
        log::info!("Headless frontend exit after {} frames", self.frames);
    }
}
