use crate::error::{Error, Result};
use crate::RAM_SIZE;

/// Flat, bounds-checked byte store.
///
/// ```text
/// 0xFFF +----------------+
///       | program / data |
/// 0x200 +----------------+
///       | reserved, font |
/// 0x000 +----------------+
/// ```
pub struct Memory {
    cells: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(RAM_SIZE)
    }
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size].into_boxed_slice(),
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn read(&self, address: usize) -> Result<u8> {
        self.cells
            .get(address)
            .copied()
            .ok_or(Error::OutOfBoundsMemory { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(Error::OutOfBoundsMemory { address })?;
        *cell = value;
        Ok(())
    }

    /// Reads `len` bytes starting at `start`. Fails without reading anything if
    /// any address in the range is out of bounds.
    pub fn read_range(&self, start: usize, len: usize) -> Result<&[u8]> {
        let end = self.checked_end(start, len)?;
        Ok(&self.cells[start..end])
    }

    /// Writes `bytes` starting at `start`. Fails without writing anything if
    /// any address in the range is out of bounds.
    pub fn write_range(&mut self, start: usize, bytes: &[u8]) -> Result<()> {
        let end = self.checked_end(start, bytes.len())?;
        self.cells[start..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    fn checked_end(&self, start: usize, len: usize) -> Result<usize> {
        let end = start
            .checked_add(len)
            .ok_or(Error::OutOfBoundsMemory { address: start })?;
        if len > 0 && start >= self.size() {
            return Err(Error::OutOfBoundsMemory { address: start });
        }
        if end > self.size() {
            // first address past the end of RAM
            return Err(Error::OutOfBoundsMemory {
                address: self.size().max(start),
            });
        }
        Ok(end)
    }
}
