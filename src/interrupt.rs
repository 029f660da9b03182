//! Interrupt raising, dispatch, and save/restore.
//!
//! An instruction handler may produce at most one interrupt per cycle
//! (held in the cycle-local `interrupt_out` slot the handler signature in
//! [`crate::isa::Handler`] takes by `&mut Option<Interrupt>`). The CPU
//! drains it at the start of the next cycle through [`dispatch`].

use tracing::warn;

use crate::cs::Cs;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::word::Word;

/// Predefined interrupt codes registered by [`crate::isa::Isa::default_simple_world`].
pub mod codes {
    /// Fetch found an opcode not present in the ISA.
    pub const INVALID_INSTRUCTION: u8 = 0;
    /// Fetch or a handler addressed memory out of range.
    pub const INVALID_MEMORY_LOCATION: u8 = 1;
    /// `div`/`mod` family divisor was zero.
    pub const DIVISION_BY_ZERO: u8 = 2;
    /// Raised by the host's timer, not the CPU itself.
    pub const TIMER_INTERRUPT: u8 = 3;
    /// The `world` trap's immediate was not understood by the environment.
    pub const INVALID_WORLD_COMMAND: u8 = 4;
    /// The environment has an event to deliver to the bug.
    pub const WORLD_EVENT: u8 = 5;
    /// Raised explicitly by a `world`-adjacent software request.
    pub const SOFTWARE_INTERRUPT: u8 = 6;
}

/// A pending interrupt: a code matching the ISA's interrupt registry, and
/// three argument words copied into `r0..r2` on dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interrupt {
    /// Interrupt code.
    pub code: u8,
    /// Copied into `r0` on dispatch.
    pub r0: Word,
    /// Copied into `r1` on dispatch.
    pub r1: Word,
    /// Copied into `r2` on dispatch.
    pub r2: Word,
}

impl Interrupt {
    /// Builds an interrupt with no arguments.
    pub const fn new(code: u8) -> Self {
        Self {
            code,
            r0: 0,
            r1: 0,
            r2: 0,
        }
    }

    /// Builds an interrupt carrying `r0..r2` arguments.
    pub const fn with_args(code: u8, r0: Word, r1: Word, r2: Word) -> Self {
        Self { code, r0, r1, r2 }
    }
}

/// Outcome of attempting to dispatch a pending interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The interrupt was delivered; the handler is about to run.
    Delivered,
    /// Interrupts are disabled or nesting is saturated; the interrupt was
    /// dropped.
    Dropped,
}

/// Pushes all 16 registers (`r0..r15` in that order) onto the stack
/// pointed at by `sp`, decrementing `sp` by 4 after each push.
fn push_all(regs: &mut Registers, mem: &mut Memory) -> Result<(), crate::error::MemoryError> {
    // Snapshot first: `sp` (r13) is itself one of the 16 pushed registers,
    // so its pre-push value must be saved as data even though the same
    // register is being used live to address each write.
    let snapshot = regs.0;
    for value in snapshot {
        let sp = regs.sp();
        mem.set_word(sp, value, true)?;
        regs.set_sp(sp.wrapping_sub(4));
    }
    Ok(())
}

/// Pops all 16 registers back in reverse order (`r15..r0`), incrementing
/// `sp` by 4 before each pop. This is the exact inverse of [`push_all`].
pub fn pop_all(regs: &mut Registers, mem: &mut Memory) -> Result<(), crate::error::MemoryError> {
    // Addressing runs off a local cursor rather than the live `sp`
    // register, since `sp` (r13) is itself restored partway through the
    // loop and must not perturb the addresses used for the remaining pops.
    let mut cursor = regs.sp();
    for code in (0..16u8).rev() {
        cursor = cursor.wrapping_add(4);
        regs[code] = mem.get_word(cursor, true)?;
    }
    Ok(())
}

/// Attempts to dispatch `interrupt` at the end of a cycle, per spec 4.6:
///
/// 1. if disabled or nesting saturated, drop it (logging through
///    `tracing`) and return [`Dispatched::Dropped`];
/// 2. otherwise push all 16 registers, copy `r0..r2` from the interrupt,
///    jump to the handler address read from `mem[cs.itp + code * 4]`, and
///    set `cs.interrupt`.
///
/// `depth` is the host-tracked nesting counter backing `cs.max_interrupts`.
/// `etp` ([`crate::registers::ETP`], register index 15) is pushed and
/// popped along with every other register by [`push_all`]/[`pop_all`]; it
/// has no separate save/restore path.
pub fn dispatch(
    interrupt: Interrupt,
    regs: &mut Registers,
    mem: &mut Memory,
    cs: &mut Cs,
    depth: &mut u8,
) -> Result<Dispatched, crate::error::MemoryError> {
    if !cs.enable || *depth >= cs.max_interrupts {
        warn!(
            code = interrupt.code,
            enabled = cs.enable,
            depth = *depth,
            max = cs.max_interrupts,
            "dropping interrupt: interrupts disabled or nesting saturated"
        );
        return Ok(Dispatched::Dropped);
    }

    push_all(regs, mem)?;
    regs[0] = interrupt.r0;
    regs[1] = interrupt.r1;
    regs[2] = interrupt.r2;

    let handler_addr = cs.itp as Word + interrupt.code as Word * 4;
    let handler = mem.get_word(handler_addr, true)?;
    regs.set_pc(handler);
    cs.interrupt = true;
    *depth += 1;

    Ok(Dispatched::Delivered)
}
