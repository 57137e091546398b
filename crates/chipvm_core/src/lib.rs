pub mod config;
pub mod cpu;
pub mod display;
pub mod error;
pub mod font;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod operation;
pub mod profiler;
pub mod registers;
pub mod throttle;

pub use config::{Config, TimerMode};
pub use cpu::Cpu;
pub use display::{Display, Screen};
pub use error::{Error, Result};
pub use interpreter::Interpreter;
pub use memory::Memory;
pub use operation::{Operation, OperationType};
pub use registers::Registers;
pub use throttle::Throttle;

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: usize = 64;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 32;
/// Default integer scaling factor for windowed frontends.
pub const SCREEN_SCALE: u32 = 10;

/// 4 KiB of addressable RAM, 0x000..=0xFFF.
pub const RAM_SIZE: usize = 4096;
/// Programs are loaded here; everything below is reserved for the interpreter.
pub const START_ADDRESS: u16 = 0x200;
/// Largest ROM accepted by the loader.
pub const MAX_ROM_SIZE: usize = 0xFFF - START_ADDRESS as usize;
pub const NUM_REGS: usize = 16;
pub const STACK_SIZE: usize = 16;

/// Default execution rate in cycles per second.
pub const DEFAULT_FREQUENCY: u32 = 700;
/// Rate at which the delay and sound timers count down on real hardware.
pub const TIMER_FREQUENCY: u32 = 60;
