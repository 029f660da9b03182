//! The `world` trap: the single point where the CPU crosses into the
//! (out-of-scope) world-grid collaborator.
//!
//! Grounded on `fuel-vm/src/interpreter/ecal.rs`'s `EcalAccess` trait: a
//! narrow trait giving the trap handler exactly the access it needs,
//! rather than passing the whole interpreter around.

use crate::error::ActionBlocked;
use crate::interrupt::Interrupt;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::word::Address;

/// Implemented by the host simulation to answer `world` traps.
///
/// The VM forwards only the trap's 16-bit immediate, per spec: the
/// original's parameter marshalling for this call was never finished
/// (`#warning World operation not implemented`), so this is the
/// conservative reading rather than a guess at richer semantics.
pub trait WorldTrap {
    /// Handles a `world imm` trap. May mutate registers/memory (e.g. to
    /// report a result) and may request that an interrupt
    /// (`InvalidWorldCommand` or `WorldEvent`) be raised at the end of the
    /// cycle. Returning `Err` blocks the action outright; the CPU turns
    /// that, specifically, into an `InvalidWorldCommand` interrupt rather
    /// than conflating it with unrelated VM-internal faults.
    fn world(
        &mut self,
        imm: Address,
        regs: &mut Registers,
        mem: &mut Memory,
    ) -> Result<Option<Interrupt>, ActionBlocked>;
}

/// A `WorldTrap` that always succeeds and never raises an interrupt. Used
/// by the CPU's own tests and by hosts that have not wired in a world yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWorld;

impl WorldTrap for NullWorld {
    fn world(
        &mut self,
        _imm: Address,
        _regs: &mut Registers,
        _mem: &mut Memory,
    ) -> Result<Option<Interrupt>, ActionBlocked> {
        Ok(None)
    }
}
