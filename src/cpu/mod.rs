//! The CPU: register file, memory, control register, and the
//! fetch/decode/execute cycle tying them to an [`Isa`].
//!
//! Grounded on `fuel-vm/src/interpreter.rs`'s `Interpreter`: a struct
//! owning its execution state, advanced one instruction at a time through
//! a method that always returns control to the caller (no internal
//! blocking loop hidden behind `execute`'s convenience wrapper).

pub mod handlers;
pub mod isa_defaults;
pub mod opcodes;

pub use isa_defaults::default_simple_world;

use tracing::trace;

use crate::cs::Cs;
use crate::error::RuntimeError;
use crate::interrupt::{self, Dispatched, Interrupt};
use crate::isa::{Isa, Update};
use crate::memory::Memory;
use crate::registers::Registers;
use crate::world::WorldTrap;

/// A `SimpleWorld` CPU: register file, memory, control register, and the
/// bookkeeping needed to run one fetch/decode/execute cycle at a time.
///
/// `Cpu` does not own an [`Isa`]; the registry is shared read-only and
/// passed into [`Cpu::next`]/[`Cpu::execute`], matching the note in the
/// instruction-set registry module that an `Isa` has no reason to be
/// cloned per-bug.
#[derive(Debug, Clone)]
pub struct Cpu {
    /// The 16-word register file.
    pub registers: Registers,
    /// Word-addressable memory.
    pub memory: Memory,
    /// Interrupt control register.
    pub cs: Cs,
    interrupt_depth: u8,
    pending_interrupt: Option<Interrupt>,
    running: bool,
}

impl Cpu {
    /// Builds a CPU over `memory`, with all registers and `cs` zeroed and
    /// `running` set.
    pub fn new(memory: Memory) -> Self {
        Self {
            registers: Registers::ALL_ZERO,
            memory,
            cs: Cs::default(),
            interrupt_depth: 0,
            pending_interrupt: None,
            running: true,
        }
    }

    /// Whether the CPU will execute another cycle if asked.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Runs exactly one fetch/decode/execute cycle, per the instruction
    /// cycle description: drain a pending interrupt first (this may
    /// short-circuit the cycle), then fetch, decode, look up, execute, and
    /// apply the resulting [`Update`].
    #[tracing::instrument(level = "trace", skip(self, isa, world), fields(pc = self.registers.pc()))]
    pub fn next(&mut self, isa: &Isa, world: &mut dyn WorldTrap) -> Result<(), RuntimeError> {
        if !self.running {
            return Err(RuntimeError::CpuStopped);
        }

        if let Some(interrupt) = self.pending_interrupt.take() {
            let dispatched = interrupt::dispatch(
                interrupt,
                &mut self.registers,
                &mut self.memory,
                &mut self.cs,
                &mut self.interrupt_depth,
            )?;
            if dispatched == Dispatched::Delivered {
                trace!(code = interrupt.code, "interrupt delivered, cycle short-circuited");
                return Ok(());
            }
        }

        let pc = self.registers.pc();
        let word = match self.memory.get_word(pc, true) {
            Ok(word) => word,
            Err(_) => {
                self.pending_interrupt = Some(Interrupt::new(interrupt::codes::INVALID_MEMORY_LOCATION));
                self.registers.set_pc(pc.wrapping_add(4));
                return Ok(());
            }
        };
        let inst = crate::instruction::decode(word);

        let info = match isa.instruction_info(inst.code) {
            Ok(info) => info,
            Err(_) => {
                self.pending_interrupt = Some(Interrupt::new(interrupt::codes::INVALID_INSTRUCTION));
                self.registers.set_pc(pc.wrapping_add(4));
                return Ok(());
            }
        };

        let mut raised = None;
        let update = (info.handler)(
            &mut self.registers,
            &mut self.memory,
            &mut self.cs,
            &mut self.interrupt_depth,
            &mut raised,
            world,
            inst,
        );

        match update {
            Update::UpdatePc => self.registers.set_pc(self.registers.pc().wrapping_add(4)),
            Update::None => {}
            Update::Stop => self.running = false,
        }

        if let Some(interrupt) = raised {
            self.pending_interrupt = Some(interrupt);
        }

        Ok(())
    }

    /// Runs cycles until the CPU stops (a `stop` instruction executed, or
    /// the caller previously halted it).
    pub fn execute(&mut self, isa: &Isa, world: &mut dyn WorldTrap) -> Result<(), RuntimeError> {
        while self.running {
            self.next(isa, world)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::opcodes as op;
    use crate::instruction::Instruction;
    use crate::word::Word;
    use crate::world::NullWorld;

    fn assemble(mem: &mut Memory, addr: Word, inst: Instruction) {
        mem.set_word(addr, inst.encode(), true).unwrap();
    }

    #[test]
    fn runs_loadi_add_stop_sequence() {
        let isa = default_simple_world();
        let mut world = NullWorld;
        let mut mem = Memory::new(32);
        assemble(&mut mem, 0, Instruction::new(op::LOADI, 0, 0, 10));
        assemble(&mut mem, 4, Instruction::new(op::LOADI, 1, 0, 20));
        assemble(&mut mem, 8, Instruction::new(op::ADD, 0, 1, 0));
        assemble(&mut mem, 12, Instruction::new(op::STOP, 0, 0, 0));

        let mut cpu = Cpu::new(mem);
        cpu.execute(&isa, &mut world).unwrap();

        assert_eq!(cpu.registers[0], 30);
        assert!(!cpu.is_running());
    }

    #[test]
    fn unknown_opcode_raises_invalid_instruction_next_cycle() {
        let isa = default_simple_world();
        let mut world = NullWorld;
        let mut mem = Memory::new(64);
        mem.set_word(0, 0xff00_0000, true).unwrap();
        // interrupt table base 32, entry 0 (InvalidInstruction) points at 0x1000
        mem.set_word(32, 0x1000, true).unwrap();

        let mut cpu = Cpu::new(mem);
        cpu.cs = Cs {
            itp: 32,
            enable: true,
            interrupt: false,
            max_interrupts: 4,
        };
        cpu.registers.set_sp(60);

        cpu.next(&isa, &mut world).unwrap();
        assert_eq!(cpu.registers.pc(), 4);

        cpu.next(&isa, &mut world).unwrap();
        assert_eq!(cpu.registers.pc(), 0x1000);
        assert!(cpu.cs.interrupt);
    }

    #[test]
    fn division_by_zero_raises_interrupt() {
        let isa = default_simple_world();
        let mut world = NullWorld;
        let mut mem = Memory::new(64);
        assemble(&mut mem, 0, Instruction::new(op::LOADI, 0, 0, 1));
        assemble(&mut mem, 4, Instruction::new(op::DIV, 0, 1, 0));
        mem.set_word(8, 0x1000, true).unwrap();

        let mut cpu = Cpu::new(mem);
        cpu.cs = Cs {
            itp: 0,
            enable: true,
            interrupt: false,
            max_interrupts: 4,
        };
        cpu.registers.set_sp(60);

        cpu.next(&isa, &mut world).unwrap(); // loadi
        cpu.next(&isa, &mut world).unwrap(); // div, raises
        assert_eq!(cpu.registers.pc(), 8);
        cpu.next(&isa, &mut world).unwrap(); // dispatch
        assert_eq!(cpu.registers.pc(), 0x1000);
    }

    #[test]
    fn call_and_ret_round_trip() {
        let isa = default_simple_world();
        let mut world = NullWorld;
        let mut mem = Memory::new(64);
        assemble(&mut mem, 0, Instruction::new(op::CALL, 0, 0, 16));
        assemble(&mut mem, 4, Instruction::new(op::STOP, 0, 0, 0));
        assemble(&mut mem, 16, Instruction::new(op::RET, 0, 0, 0));

        let mut cpu = Cpu::new(mem);
        cpu.registers.set_sp(60);

        cpu.next(&isa, &mut world).unwrap(); // call
        assert_eq!(cpu.registers.pc(), 16);
        cpu.next(&isa, &mut world).unwrap(); // ret
        assert_eq!(cpu.registers.pc(), 4);
    }
}
