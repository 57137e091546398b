use std::fmt;

use crate::error::{Error, Result};

/// Every instruction of the original CHIP-8 set.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OperationType {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump,
    /// 2NNN
    Call,
    /// 3XNN
    SkipIfVxNnEq,
    /// 4XNN
    SkipIfVxNnNeq,
    /// 5XY0
    SkipIfVxVyEq,
    /// 6XNN
    SetRegister,
    /// 7XNN, no carry flag
    Add,
    /// 8XY0
    SetVx,
    /// 8XY1
    Or,
    /// 8XY2
    And,
    /// 8XY3
    Xor,
    /// 8XY4, VF = carry
    AddVy,
    /// 8XY5, VF = not borrow
    SubVy,
    /// 8XY6
    ShiftRight,
    /// 8XY7, VF = not borrow
    SubN,
    /// 8XYE
    ShiftLeft,
    /// 9XY0
    SkipIfVxVyNeq,
    /// ANNN
    SetIndex,
    /// BNNN
    JumpWithOffset,
    /// CXNN
    Random,
    /// DXYN
    Display,
    /// EX9E
    SkipIfKeyEq,
    /// EXA1
    SkipIfKeyNeq,
    /// FX07
    SetVxFromDelay,
    /// FX0A
    WaitForKey,
    /// FX15
    SetDelayFromVx,
    /// FX18
    SetSoundFromVx,
    /// FX1E
    AddVxToIndex,
    /// FX29
    Font,
    /// FX33
    Bcd,
    /// FX55, V0..=VX into memory at I
    StoreRegisters,
    /// FX65, V0..=VX from memory at I
    LoadRegisters,
}

/// One row of the classification table. `None` fields match anything.
#[derive(Copy, Clone, Debug)]
pub struct Rule {
    pub nibble: u8,
    pub n: Option<u8>,
    pub nn: Option<u8>,
    pub kind: OperationType,
}

impl Rule {
    const fn any(nibble: u8, kind: OperationType) -> Self {
        Self { nibble, n: None, nn: None, kind }
    }

    const fn with_n(nibble: u8, n: u8, kind: OperationType) -> Self {
        Self { nibble, n: Some(n), nn: None, kind }
    }

    const fn with_nn(nibble: u8, nn: u8, kind: OperationType) -> Self {
        Self { nibble, n: None, nn: Some(nn), kind }
    }

    pub fn matches(&self, operation: &Operation) -> bool {
        self.nibble == operation.nibble
            && self.n.map_or(true, |n| n == operation.n)
            && self.nn.map_or(true, |nn| nn == operation.nn)
    }
}

/// Ordered classification table; the first matching rule wins. No two rules
/// may match the same opcode.
pub const RULES: &[Rule] = &[
    Rule::with_nn(0x0, 0xE0, OperationType::ClearScreen),
    Rule::with_nn(0x0, 0xEE, OperationType::Return),
    Rule::any(0x1, OperationType::Jump),
    Rule::any(0x2, OperationType::Call),
    Rule::any(0x3, OperationType::SkipIfVxNnEq),
    Rule::any(0x4, OperationType::SkipIfVxNnNeq),
    Rule::with_n(0x5, 0x0, OperationType::SkipIfVxVyEq),
    Rule::any(0x6, OperationType::SetRegister),
    Rule::any(0x7, OperationType::Add),
    Rule::with_n(0x8, 0x0, OperationType::SetVx),
    Rule::with_n(0x8, 0x1, OperationType::Or),
    Rule::with_n(0x8, 0x2, OperationType::And),
    Rule::with_n(0x8, 0x3, OperationType::Xor),
    Rule::with_n(0x8, 0x4, OperationType::AddVy),
    Rule::with_n(0x8, 0x5, OperationType::SubVy),
    Rule::with_n(0x8, 0x6, OperationType::ShiftRight),
    Rule::with_n(0x8, 0x7, OperationType::SubN),
    Rule::with_n(0x8, 0xE, OperationType::ShiftLeft),
    Rule::with_n(0x9, 0x0, OperationType::SkipIfVxVyNeq),
    Rule::any(0xA, OperationType::SetIndex),
    Rule::any(0xB, OperationType::JumpWithOffset),
    Rule::any(0xC, OperationType::Random),
    Rule::any(0xD, OperationType::Display),
    Rule::with_nn(0xE, 0x9E, OperationType::SkipIfKeyEq),
    Rule::with_nn(0xE, 0xA1, OperationType::SkipIfKeyNeq),
    Rule::with_nn(0xF, 0x07, OperationType::SetVxFromDelay),
    Rule::with_nn(0xF, 0x0A, OperationType::WaitForKey),
    Rule::with_nn(0xF, 0x15, OperationType::SetDelayFromVx),
    Rule::with_nn(0xF, 0x18, OperationType::SetSoundFromVx),
    Rule::with_nn(0xF, 0x1E, OperationType::AddVxToIndex),
    Rule::with_nn(0xF, 0x29, OperationType::Font),
    Rule::with_nn(0xF, 0x33, OperationType::Bcd),
    Rule::with_nn(0xF, 0x55, OperationType::StoreRegisters),
    Rule::with_nn(0xF, 0x65, OperationType::LoadRegisters),
];

/// Decoded view of a single opcode.
///
/// ```
/// use chipvm_core::operation::{Operation, OperationType};
///
/// let operation = Operation::decode(0xD01F);
/// assert_eq!((operation.nibble, operation.x, operation.y, operation.n), (0xD, 0x0, 0x1, 0xF));
/// assert_eq!(operation.kind().unwrap(), OperationType::Display);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Operation {
    pub opcode: u16,
    pub nibble: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Operation {
    pub const fn decode(opcode: u16) -> Self {
        Self {
            opcode,
            nibble: (opcode >> 12) as u8,
            x: ((opcode >> 8) & 0xF) as u8,
            y: ((opcode >> 4) & 0xF) as u8,
            n: (opcode & 0xF) as u8,
            nn: (opcode & 0xFF) as u8,
            nnn: opcode & 0xFFF,
        }
    }

    /// Classify against [`RULES`].
    pub fn kind(&self) -> Result<OperationType> {
        RULES
            .iter()
            .find(|rule| rule.matches(self))
            .map(|rule| rule.kind)
            .ok_or(Error::UnhandledOperation { operation: *self })
    }
}

impl From<u16> for Operation {
    fn from(opcode: u16) -> Self {
        Self::decode(opcode)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#06X} (nibble={:X} x={:X} y={:X} n={:X} nn={:#04X} nnn={:#05X})",
            self.opcode, self.nibble, self.x, self.y, self.n, self.nn, self.nnn
        )
    }
}
