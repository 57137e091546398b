use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// What the CPU needs from a screen.
pub trait Display {
    /// Turn every pixel off.
    fn clear(&mut self);

    /// XOR `sprite` onto the screen with its top-left corner at (`x`, `y`).
    ///
    /// Each byte is a row and each bit a column, most significant bit first.
    /// Coordinates wrap around both edges. Returns `true` if any pixel that
    /// was on got turned off.
    fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8) -> bool;
}

/// In-memory 64x32 monochrome framebuffer.
pub struct Screen {
    pixels: [bool; SCREEN_WIDTH * SCREEN_HEIGHT],
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            pixels: [false; SCREEN_WIDTH * SCREEN_HEIGHT],
            dirty: true,
        }
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row-major pixel states.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[(y % SCREEN_HEIGHT) * SCREEN_WIDTH + x % SCREEN_WIDTH]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the screen changed since the last call and resets the
    /// flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn toggle(&mut self, x: usize, y: usize) -> bool {
        let index = y * SCREEN_WIDTH + x;
        let was_on = self.pixels[index];
        self.pixels[index] = !was_on;
        was_on
    }
}

impl Display for Screen {
    fn clear(&mut self) {
        self.pixels = [false; SCREEN_WIDTH * SCREEN_HEIGHT];
        self.dirty = true;
    }

    fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        let mut collision = false;
        for (row, bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if (bits >> (7 - col)) & 0x1 == 0 {
                    continue;
                }
                let px = (x as usize + col) % SCREEN_WIDTH;
                let py = (y as usize + row) % SCREEN_HEIGHT;
                collision |= self.toggle(px, py);
            }
        }
        self.dirty = true;
        collision
    }
}
