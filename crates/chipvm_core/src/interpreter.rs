use std::fs;
use std::path::Path;

use chipvm_common::{Event, Frontend, Key};

use crate::config::{Config, TimerMode};
use crate::cpu::Cpu;
use crate::display::Screen;
use crate::error::{Error, Result};
use crate::font::{self, FONT_ADDRESS_START};
use crate::keypad;
use crate::operation::OperationType;
use crate::profiler::Profiler;
use crate::throttle::Throttle;
use crate::{MAX_ROM_SIZE, START_ADDRESS, TIMER_FREQUENCY};

/// Drives a [`Cpu`] against a [`Frontend`]: boots the machine, loads a ROM and
/// runs the poll/execute loop at the configured rate.
pub struct Interpreter<F: Frontend> {
    cpu: Cpu,
    screen: Screen,
    frontend: F,
    throttle: Throttle,
    config: Config,
    running: bool,
    paused: bool,
    step_requested: bool,
    /// Fixed60Hz bookkeeping: timer ticks owed, scaled by the cycle frequency.
    timer_accumulator: u32,
    profiler: Option<Profiler>,
}

impl<F: Frontend> Interpreter<F> {
    pub fn new(frontend: F, config: Config) -> Self {
        let mut cpu = Cpu::default().with_timer_mode(config.timer_mode);
        if let Some(seed) = config.seed {
            cpu = cpu.with_seed(seed);
        }
        Self {
            cpu,
            screen: Screen::new(),
            frontend,
            throttle: Throttle::new(config.frequency),
            running: true,
            paused: config.start_paused,
            step_requested: false,
            timer_accumulator: 0,
            profiler: config.profile.then(Profiler::new),
            config,
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Copy the font into reserved memory.
    pub fn boot(&mut self) -> Result<()> {
        font::load(self.cpu.memory_mut())?;
        log::info!("Booted, font at {:#05X}", FONT_ADDRESS_START);
        Ok(())
    }

    pub fn load_rom(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let rom = fs::read(path).map_err(|source| Error::RomLoad {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading ROM '{}'", path.display());
        self.load_rom_bytes(&rom)
    }

    /// Place `rom` verbatim at the program start address.
    pub fn load_rom_bytes(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.cpu
            .memory_mut()
            .write_range(START_ADDRESS as usize, rom)?;
        log::info!("Loaded {} bytes at {:#05X}", rom.len(), START_ADDRESS);
        Ok(())
    }

    /// Loop until the frontend asks to quit or the CPU fails. CPU errors halt
    /// the loop and are returned as is.
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "Running at {} Hz, timers {:?}",
            self.config.frequency,
            self.config.timer_mode
        );
        self.running = true;
        let mut result = Ok(());
        while self.running {
            self.throttle.throttle();
            if let Err(err) = self.tick() {
                log::error!("Halting: {err}");
                result = Err(err);
                break;
            }
        }
        self.shutdown();
        result
    }

    /// One pass of the loop body: drain input, run a cycle unless paused,
    /// present the screen if it changed. Does not throttle.
    pub fn tick(&mut self) -> Result<()> {
        for event in self.frontend.poll_events() {
            self.handle_event(event);
            if !self.running {
                return Ok(());
            }
        }

        if !self.paused || std::mem::take(&mut self.step_requested) {
            self.step()?;
        }

        if self.screen.take_dirty() {
            self.frontend.present(self.screen.pixels())?;
        }
        Ok(())
    }

    /// Execute a single CPU cycle, ignoring pause.
    pub fn step(&mut self) -> Result<OperationType> {
        let kind = self.cpu.cycle(&mut self.screen)?;
        if let Some(profiler) = self.profiler.as_mut() {
            profiler.cycle();
        }
        if self.config.timer_mode == TimerMode::Fixed60Hz {
            self.timer_accumulator += TIMER_FREQUENCY;
            let frequency = self.config.frequency.max(1);
            while self.timer_accumulator >= frequency {
                self.timer_accumulator -= frequency;
                self.cpu.tick_timers();
            }
        }
        Ok(kind)
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Quit => {
                log::info!("Quit requested");
                self.running = false;
            }
            Event::KeyDown(Key::P) => {
                self.paused = !self.paused;
                log::info!(
                    "{} at {:#05X}",
                    if self.paused { "Paused" } else { "Resumed" },
                    self.cpu.program_counter()
                );
            }
            Event::KeyDown(Key::N) => {
                if self.paused {
                    self.step_requested = true;
                }
            }
            Event::KeyDown(key) => self.cpu.set_keycode(keypad::translate(key)),
            Event::KeyUp(Key::P | Key::N) => {}
            Event::KeyUp(_) => self.cpu.set_keycode(None),
        }
    }

    fn shutdown(&mut self) {
        if let Some(profiler) = &self.profiler {
            profiler.report();
        }
        self.frontend.exit();
        log::info!("Interpreter exit");
    }
}
