//! Code-segment / interrupt control register (`CS`).
//!
//! Bit-packed control words are modelled with `bitflags`, following the
//! teacher's use of `bitflags` for its own VM flags register.

use bitflags::bitflags;

use crate::word::Word;

bitflags! {
    /// Flag bits of the [`Cs`] register, occupying the low 16 bits
    /// alongside `max_interrupts`.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CsFlags: u32 {
        /// Interrupts are globally enabled.
        const ENABLE_FLAG = 0x8000;
        /// Execution is currently inside an interrupt handler.
        const INTERRUPT_FLAG = 0x4000;
    }
}

/// Mask of the `max_interrupts` nesting-depth field (bits 3..0).
pub const MAX_INTERRUPTS_MASK: u32 = 0x0f;

/// Code-segment / interrupt control register.
///
/// | Field             | Meaning                                         |
/// |--------------------|-------------------------------------------------|
/// | `itp` (16 bits)    | interrupt-table pointer, byte address           |
/// | `enable` (1 bit)   | interrupts globally enabled                     |
/// | `interrupt` (1 bit)| currently inside a handler                      |
/// | `max_interrupts`   | maximum nesting depth (4 bits)                  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cs {
    /// Interrupt-table pointer: byte address of the first handler
    /// descriptor.
    pub itp: u16,
    /// Interrupts globally enabled.
    pub enable: bool,
    /// Currently executing inside a handler.
    pub interrupt: bool,
    /// Maximum interrupt nesting depth (0..15).
    pub max_interrupts: u8,
}

impl Cs {
    /// Packs the register into its 32-bit wire form.
    pub fn encode(self) -> Word {
        let mut flags = CsFlags::empty();
        flags.set(CsFlags::ENABLE_FLAG, self.enable);
        flags.set(CsFlags::INTERRUPT_FLAG, self.interrupt);
        ((self.itp as Word) << 16) | flags.bits() | (self.max_interrupts as Word & MAX_INTERRUPTS_MASK)
    }

    /// Unpacks a 32-bit wire form into a register.
    pub fn decode(w: Word) -> Self {
        let flags = CsFlags::from_bits_truncate(w & 0xffff);
        Self {
            itp: (w >> 16) as u16,
            enable: flags.contains(CsFlags::ENABLE_FLAG),
            interrupt: flags.contains(CsFlags::INTERRUPT_FLAG),
            max_interrupts: (w & MAX_INTERRUPTS_MASK) as u8,
        }
    }
}

impl From<Word> for Cs {
    fn from(w: Word) -> Self {
        Cs::decode(w)
    }
}

impl From<Cs> for Word {
    fn from(cs: Cs) -> Self {
        cs.encode()
    }
}
