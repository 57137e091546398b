use std::io;
use std::path::PathBuf;

use crate::operation::Operation;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid register V{index:X}")]
    InvalidRegister { index: usize },

    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBoundsMemory { address: usize },

    #[error("unhandled operation {operation}")]
    UnhandledOperation { operation: Operation },

    #[error("stack overflow: call depth already at {depth}")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("no font glyph for character {character:#04X}")]
    InvalidFontCharacter { character: u8 },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("failed to load ROM {}", path.display())]
    RomLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Frontend(#[from] anyhow::Error),
}
