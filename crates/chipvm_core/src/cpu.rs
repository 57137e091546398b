use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TimerMode;
use crate::display::Display;
use crate::error::{Error, Result};
use crate::font;
use crate::memory::Memory;
use crate::operation::{Operation, OperationType};
use crate::registers::Registers;
use crate::{STACK_SIZE, START_ADDRESS};

pub struct Cpu {
    memory: Memory,
    /// V registers
    registers: Registers,
    /// program counter
    program_counter: u16,
    /// I register. Not masked to 12 bits; out of range values fail on access.
    index: u16,
    stack: [u16; STACK_SIZE],
    /// Number of live return addresses on `stack`.
    stack_pointer: usize,
    delay_timer: u8,
    sound_timer: u8,
    /// Hex value of the key currently held, if any.
    keycode: Option<u8>,
    timer_mode: TimerMode,
    rng: StdRng,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(Memory::default(), Registers::default())
    }
}

impl Cpu {
    pub fn new(memory: Memory, registers: Registers) -> Self {
        Self {
            memory,
            registers,
            program_counter: START_ADDRESS,
            index: 0,
            stack: [0; STACK_SIZE],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            keycode: None,
            timer_mode: TimerMode::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Makes RANDOM reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_timer_mode(mut self, timer_mode: TimerMode) -> Self {
        self.timer_mode = timer_mode;
        self
    }

    /// Back to power-on state. Memory is wiped, fonts included.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.registers = Registers::default();
        self.program_counter = START_ADDRESS;
        self.index = 0;
        self.stack = [0; STACK_SIZE];
        self.stack_pointer = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.keycode = None;
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn set_index(&mut self, index: u16) {
        self.index = index;
    }

    pub fn stack_depth(&self) -> usize {
        self.stack_pointer
    }

    /// Saved return addresses, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.stack_pointer]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// The buzzer would be on; there is no audio output.
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn keycode(&self) -> Option<u8> {
        self.keycode
    }

    pub fn set_keycode(&mut self, keycode: Option<u8>) {
        self.keycode = keycode;
    }

    pub fn timer_mode(&self) -> TimerMode {
        self.timer_mode
    }

    /// Reads the big-endian opcode at the program counter and steps past it.
    pub fn fetch(&mut self) -> Result<u16> {
        let pc = self.program_counter as usize;
        let high = self.memory.read(pc)? as u16;
        let low = self.memory.read(pc + 1)? as u16;
        self.program_counter = self.program_counter.wrapping_add(2);
        Ok(high << 8 | low)
    }

    /// Fetch, decode and execute one instruction, then count the timers down
    /// when they are clocked per cycle.
    pub fn cycle<D: Display + ?Sized>(&mut self, display: &mut D) -> Result<OperationType> {
        let address = self.program_counter;
        let operation = Operation::decode(self.fetch()?);
        let kind = operation.kind()?;
        log::trace!("{address:#05X}: {operation} {kind:?}");

        self.execute(kind, operation, display)?;

        if self.timer_mode == TimerMode::PerCycle {
            self.tick_timers();
        }
        Ok(kind)
    }

    pub fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    fn execute<D: Display + ?Sized>(
        &mut self,
        kind: OperationType,
        op: Operation,
        display: &mut D,
    ) -> Result<()> {
        let x = op.x as usize;
        let y = op.y as usize;
        match kind {
            OperationType::ClearScreen => display.clear(),
            OperationType::Return => self.program_counter = self.pop()?,
            OperationType::Jump => self.program_counter = op.nnn,
            OperationType::Call => {
                self.push(self.program_counter)?;
                self.program_counter = op.nnn;
            }
            OperationType::SkipIfVxNnEq => {
                let vx = self.vx(x)?;
                self.skip_if(vx == op.nn);
            }
            OperationType::SkipIfVxNnNeq => {
                let vx = self.vx(x)?;
                self.skip_if(vx != op.nn);
            }
            OperationType::SkipIfVxVyEq => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.skip_if(vx == vy);
            }
            OperationType::SetRegister => self.registers.set(x, op.nn)?,
            OperationType::Add => self.registers.add(x, op.nn)?,
            OperationType::SetVx => {
                let vy = self.vx(y)?;
                self.registers.set(x, vy)?;
            }
            OperationType::Or => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.registers.set(x, vx | vy)?;
            }
            OperationType::And => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.registers.set(x, vx & vy)?;
            }
            OperationType::Xor => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.registers.set(x, vx ^ vy)?;
            }
            OperationType::AddVy => {
                let total = self.vx(x)? as u16 + self.vx(y)? as u16;
                self.registers.set(x, total as u8)?;
                self.registers.set_flag(total > 0xFF);
            }
            OperationType::SubVy => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.registers.set_flag(vx > vy);
                self.registers.set(x, vx.wrapping_sub(vy))?;
            }
            OperationType::ShiftRight => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.registers.set_flag(vx & 0x1 == 1);
                self.registers.set(x, vy >> 1)?;
            }
            OperationType::SubN => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.registers.set_flag(vy > vx);
                self.registers.set(x, vy.wrapping_sub(vx))?;
            }
            OperationType::ShiftLeft => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.registers.set_flag((vx >> 7) & 0x1 == 1);
                self.registers.set(x, vy << 1)?;
            }
            OperationType::SkipIfVxVyNeq => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                self.skip_if(vx != vy);
            }
            OperationType::SetIndex => self.index = op.nnn,
            OperationType::JumpWithOffset => {
                let v0 = self.vx(0)?;
                self.program_counter = op.nnn + v0 as u16;
            }
            OperationType::Random => {
                let value = self.rng.gen::<u8>() & op.nn;
                self.registers.set(x, value)?;
            }
            OperationType::Display => {
                let (vx, vy) = (self.vx(x)?, self.vx(y)?);
                let sprite = self.memory.read_range(self.index as usize, op.n as usize)?;
                let collision = display.draw_sprite(sprite, vx, vy);
                self.registers.set_flag(collision);
            }
            OperationType::SkipIfKeyEq => {
                let vx = self.vx(x)?;
                self.skip_if(self.keycode == Some(vx));
            }
            OperationType::SkipIfKeyNeq => {
                let vx = self.vx(x)?;
                self.skip_if(self.keycode != Some(vx));
            }
            OperationType::WaitForKey => match self.keycode {
                Some(key) => self.registers.set(x, key)?,
                // run this instruction again next cycle
                None => self.program_counter = self.program_counter.wrapping_sub(2),
            },
            OperationType::SetDelayFromVx => self.delay_timer = self.vx(x)?,
            OperationType::SetSoundFromVx => self.sound_timer = self.vx(x)?,
            OperationType::SetVxFromDelay => self.registers.set(x, self.delay_timer)?,
            OperationType::AddVxToIndex => {
                let vx = self.vx(x)?;
                self.index = self.index.wrapping_add(vx as u16);
            }
            OperationType::Font => {
                let character = self.vx(x)?;
                self.index = font::glyph_address(character)
                    .ok_or(Error::InvalidFontCharacter { character })?;
            }
            OperationType::Bcd => {
                let vx = self.vx(x)?;
                let digits = [vx / 100, (vx / 10) % 10, vx % 10];
                self.memory.write_range(self.index as usize, &digits)?;
            }
            OperationType::StoreRegisters => {
                let values = &self.registers.as_slice()[..=x];
                self.memory.write_range(self.index as usize, values)?;
            }
            OperationType::LoadRegisters => {
                let values = self.memory.read_range(self.index as usize, x + 1)?;
                for (i, value) in values.iter().enumerate() {
                    self.registers.set(i, *value)?;
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn vx(&self, index: usize) -> Result<u8> {
        self.registers.get(index)
    }

    #[inline]
    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    fn push(&mut self, address: u16) -> Result<()> {
        if self.stack_pointer >= STACK_SIZE {
            return Err(Error::StackOverflow {
                depth: self.stack_pointer,
            });
        }
        self.stack[self.stack_pointer] = address;
        self.stack_pointer += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<u16> {
        if self.stack_pointer == 0 {
            return Err(Error::StackUnderflow);
        }
        self.stack_pointer -= 1;
        Ok(self.stack[self.stack_pointer])
    }
}

#[cfg(test)]
mod tests;
