use crate::error::{Error, Result};
use crate::NUM_REGS;

/// VF doubles as the carry/borrow/collision flag.
pub const FLAG: usize = 0xF;

/// The sixteen general purpose registers V0..VF.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    v: [u8; NUM_REGS],
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Result<u8> {
        self.v
            .get(index)
            .copied()
            .ok_or(Error::InvalidRegister { index })
    }

    pub fn set(&mut self, index: usize, value: u8) -> Result<()> {
        let reg = self
            .v
            .get_mut(index)
            .ok_or(Error::InvalidRegister { index })?;
        *reg = value;
        Ok(())
    }

    /// Wrapping add of `value` into `Vindex`, no flag side effects.
    pub fn add(&mut self, index: usize, value: u8) -> Result<()> {
        let current = self.get(index)?;
        self.set(index, current.wrapping_add(value))
    }

    pub fn set_flag(&mut self, on: bool) {
        self.v[FLAG] = on as u8;
    }

    pub fn flag(&self) -> u8 {
        self.v[FLAG]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.v
    }
}
