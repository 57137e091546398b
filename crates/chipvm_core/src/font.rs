use crate::error::Result;
use crate::memory::Memory;

/// First byte of the built-in font in RAM.
pub const FONT_ADDRESS_START: u16 = 0x050;
/// One past the last font byte.
pub const FONT_ADDRESS_END: u16 = FONT_ADDRESS_START + FONTSET_SIZE as u16;
/// Every glyph is 4 pixels wide and 5 rows tall, one byte per row.
pub const GLYPH_SIZE: usize = 5;
pub const GLYPH_COUNT: usize = 16;
pub const FONTSET_SIZE: usize = GLYPH_SIZE * GLYPH_COUNT;

/// Hex digits 0-F, in order.
pub const GLYPHS: [[u8; GLYPH_SIZE]; GLYPH_COUNT] = [
    [0xF0, 0x90, 0x90, 0x90, 0xF0], // 0
    [0x20, 0x60, 0x20, 0x20, 0x70], // 1
    [0xF0, 0x10, 0xF0, 0x80, 0xF0], // 2
    [0xF0, 0x10, 0xF0, 0x10, 0xF0], // 3
    [0x90, 0x90, 0xF0, 0x10, 0x10], // 4
    [0xF0, 0x80, 0xF0, 0x10, 0xF0], // 5
    [0xF0, 0x80, 0xF0, 0x90, 0xF0], // 6
    [0xF0, 0x10, 0x20, 0x40, 0x40], // 7
    [0xF0, 0x90, 0xF0, 0x90, 0xF0], // 8
    [0xF0, 0x90, 0xF0, 0x10, 0xF0], // 9
    [0xF0, 0x90, 0xF0, 0x90, 0x90], // A
    [0xE0, 0x90, 0xE0, 0x90, 0xE0], // B
    [0xF0, 0x80, 0x80, 0x80, 0xF0], // C
    [0xE0, 0x90, 0x90, 0x90, 0xE0], // D
    [0xF0, 0x80, 0xF0, 0x80, 0xF0], // E
    [0xF0, 0x80, 0xF0, 0x80, 0x80], // F
];

/// Glyph bitmap for a hex digit, `None` for anything above 0xF.
pub fn glyph(character: u8) -> Option<&'static [u8; GLYPH_SIZE]> {
    GLYPHS.get(character as usize)
}

/// Address the glyph for `character` is loaded at.
pub fn glyph_address(character: u8) -> Option<u16> {
    glyph(character).map(|_| FONT_ADDRESS_START + character as u16 * GLYPH_SIZE as u16)
}

/// Copy every glyph into reserved memory, back to back from
/// [`FONT_ADDRESS_START`].
pub fn load(memory: &mut Memory) -> Result<()> {
    for (digit, glyph) in GLYPHS.iter().enumerate() {
        let address = FONT_ADDRESS_START as usize + digit * GLYPH_SIZE;
        memory.write_range(address, glyph)?;
    }
    Ok(())
}

/// Renders a glyph as rows of '0'/'1', mostly useful when eyeballing test
/// failures.
pub fn to_rows(glyph: &[u8]) -> Vec<String> {
    glyph.iter().map(|row| format!("{row:08b}")).collect()
}
