//! Instruction-set registry: the bijective opcode/register/interrupt
//! tables plus the opcode -> handler dispatch table.
//!
//! The original `SimpleWorld::CPU::ISA` is dynamically extensible (tests
//! register and remove ad-hoc opcodes), so unlike `fuel-asm`'s compile-time
//! `OpcodeRepr` enum this is a registry of maps, built once at startup by
//! [`Isa::default_simple_world`] and otherwise mutated through
//! `add_*`/`remove_*`.

use std::collections::HashMap;

use itertools::Itertools;

use crate::cs::Cs;
use crate::error::IsaError;
use crate::interrupt::Interrupt;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::instruction::Instruction;
use crate::world::WorldTrap;

/// Outcome of an instruction handler for one fetch/decode/execute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Advance `pc` by 4 (the default case for non-branching
    /// instructions).
    UpdatePc,
    /// Leave `pc` exactly as the handler set it (branches, `call`, `ret`).
    None,
    /// Halt the CPU.
    Stop,
}

/// An opcode handler: the canonical authority for one instruction's
/// semantics. May mutate registers, memory, and the `cs` control register,
/// enqueue at most one interrupt, reach into the world-grid collaborator,
/// and reports how `pc` should move next. Every handler takes the full
/// parameter list even though most instructions only touch `regs`/`mem`,
/// so dispatch stays a single uniform function-pointer table rather than
/// splitting into several handler traits by capability.
pub type Handler = fn(
    &mut Registers,
    &mut Memory,
    &mut Cs,
    &mut u8,
    &mut Option<Interrupt>,
    &mut dyn WorldTrap,
    Instruction,
) -> Update;

/// Static description of one registered opcode.
#[derive(Debug, Clone, Copy)]
pub struct InstructionInfo {
    /// Opcode byte.
    pub code: u8,
    /// Mnemonic, e.g. `"add"`.
    pub name: &'static str,
    /// Number of register operands the mnemonic takes (0..3).
    pub nregs: u8,
    /// Whether the mnemonic also takes a 16-bit immediate/address operand.
    pub has_immediate: bool,
    /// The handler implementing this opcode.
    pub handler: Handler,
}

/// The instruction-set registry: opcode<->mnemonic, register-code<->name,
/// interrupt-code<->name, plus opcode -> [`InstructionInfo`].
///
/// Registrations are additive; codes and names must be unique within each
/// table. Removal exists only to support dynamic tests, per the original
/// design.
#[derive(Debug, Default, Clone)]
pub struct Isa {
    instructions: HashMap<u8, InstructionInfo>,
    instruction_names: HashMap<String, u8>,
    registers: HashMap<u8, String>,
    register_codes: HashMap<String, u8>,
    interrupts: HashMap<u8, String>,
    interrupt_codes: HashMap<String, u8>,
}

impl Isa {
    /// An empty registry with no instructions, registers or interrupts.
    pub fn new() -> Self {
        Self::default()
    }

    // -- instructions --------------------------------------------------

    /// Registers a new opcode. Fails if the code or name is already taken.
    pub fn add_instruction(&mut self, info: InstructionInfo) -> Result<(), IsaError> {
        if self.instructions.contains_key(&info.code) {
            return Err(IsaError::AlreadyRegistered(format!("opcode {:#04x}", info.code)));
        }
        if self.instruction_names.contains_key(info.name) {
            return Err(IsaError::AlreadyRegistered(info.name.to_string()));
        }
        self.instruction_names.insert(info.name.to_string(), info.code);
        self.instructions.insert(info.code, info);
        Ok(())
    }

    /// Removes a previously registered opcode.
    pub fn remove_instruction(&mut self, code: u8) -> Result<(), IsaError> {
        let info = self
            .instructions
            .remove(&code)
            .ok_or(IsaError::InstructionNotFound(code))?;
        self.instruction_names.remove(info.name);
        Ok(())
    }

    /// Looks up the full description of `code`.
    pub fn instruction_info(&self, code: u8) -> Result<&InstructionInfo, IsaError> {
        self.instructions
            .get(&code)
            .ok_or(IsaError::InstructionNotFound(code))
    }

    /// Looks up the opcode registered under `name`.
    pub fn instruction_code(&self, name: &str) -> Result<u8, IsaError> {
        self.instruction_names
            .get(name)
            .copied()
            .ok_or_else(|| IsaError::MnemonicNotFound(name.to_string()))
    }

    /// All registered opcodes, in ascending order.
    pub fn instruction_codes(&self) -> Vec<u8> {
        self.instructions.keys().copied().sorted().collect()
    }

    // -- registers -------------------------------------------------------

    /// Registers a new register code/name pair.
    pub fn add_register(&mut self, code: u8, name: impl Into<String>) -> Result<(), IsaError> {
        let name = name.into();
        if self.registers.contains_key(&code) {
            return Err(IsaError::AlreadyRegistered(format!("register {code:#04x}")));
        }
        if self.register_codes.contains_key(&name) {
            return Err(IsaError::AlreadyRegistered(name));
        }
        self.register_codes.insert(name.clone(), code);
        self.registers.insert(code, name);
        Ok(())
    }

    /// Removes a previously registered register.
    pub fn remove_register(&mut self, code: u8) -> Result<(), IsaError> {
        let name = self.registers.remove(&code).ok_or(IsaError::RegisterNotFound(code))?;
        self.register_codes.remove(&name);
        Ok(())
    }

    /// Name of the register at `code`.
    pub fn register_name(&self, code: u8) -> Result<&str, IsaError> {
        self.registers
            .get(&code)
            .map(String::as_str)
            .ok_or(IsaError::RegisterNotFound(code))
    }

    /// Code of the register named `name`.
    pub fn register_code(&self, name: &str) -> Result<u8, IsaError> {
        self.register_codes
            .get(name)
            .copied()
            .ok_or_else(|| IsaError::RegisterNameNotFound(name.to_string()))
    }

    /// All registered register codes, in ascending order.
    pub fn register_codes(&self) -> Vec<u8> {
        self.registers.keys().copied().sorted().collect()
    }

    // -- interrupts --------------------------------------------------------

    /// Registers a new interrupt code/name pair.
    pub fn add_interrupt(&mut self, code: u8, name: impl Into<String>) -> Result<(), IsaError> {
        let name = name.into();
        if self.interrupts.contains_key(&code) {
            return Err(IsaError::AlreadyRegistered(format!("interrupt {code:#04x}")));
        }
        if self.interrupt_codes.contains_key(&name) {
            return Err(IsaError::AlreadyRegistered(name));
        }
        self.interrupt_codes.insert(name.clone(), code);
        self.interrupts.insert(code, name);
        Ok(())
    }

    /// Removes a previously registered interrupt.
    pub fn remove_interrupt(&mut self, code: u8) -> Result<(), IsaError> {
        let name = self
            .interrupts
            .remove(&code)
            .ok_or(IsaError::InterruptNotFound(code))?;
        self.interrupt_codes.remove(&name);
        Ok(())
    }

    /// Name of the interrupt at `code`.
    pub fn interrupt_name(&self, code: u8) -> Result<&str, IsaError> {
        self.interrupts
            .get(&code)
            .map(String::as_str)
            .ok_or(IsaError::InterruptNotFound(code))
    }

    /// Code of the interrupt named `name`.
    pub fn interrupt_code(&self, name: &str) -> Result<u8, IsaError> {
        self.interrupt_codes
            .get(name)
            .copied()
            .ok_or_else(|| IsaError::InterruptNameNotFound(name.to_string()))
    }

    /// All registered interrupt codes, in ascending order.
    pub fn interrupt_codes(&self) -> Vec<u8> {
        self.interrupts.keys().copied().sorted().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::Update::UpdatePc;
    use crate::world::WorldTrap;

    fn noop(
        _: &mut Registers,
        _: &mut Memory,
        _: &mut Cs,
        _: &mut u8,
        _: &mut Option<Interrupt>,
        _: &mut dyn WorldTrap,
        _: Instruction,
    ) -> Update {
        UpdatePc
    }

    #[test]
    fn add_and_look_up_register() {
        let mut isa = Isa::new();
        isa.add_register(0xfd, "test").unwrap();
        assert_eq!(isa.register_code("test").unwrap(), 0xfd);
        assert_eq!(isa.register_name(0xfd).unwrap(), "test");
        assert!(isa.register_codes().contains(&0xfd));
        isa.remove_register(0xfd).unwrap();
        assert!(isa.register_name(0xfd).is_err());
    }

    #[test]
    fn add_and_look_up_interrupt() {
        let mut isa = Isa::new();
        isa.add_interrupt(0xfd, "test").unwrap();
        assert_eq!(isa.interrupt_code("test").unwrap(), 0xfd);
        assert_eq!(isa.interrupt_name(0xfd).unwrap(), "test");
        isa.remove_interrupt(0xfd).unwrap();
        assert!(isa.interrupt_name(0xfd).is_err());
    }

    #[test]
    fn add_and_look_up_instruction() {
        let mut isa = Isa::new();
        let info = InstructionInfo {
            code: 0xfd,
            name: "test",
            nregs: 2,
            has_immediate: true,
            handler: noop,
        };
        isa.add_instruction(info).unwrap();
        assert_eq!(isa.instruction_code("test").unwrap(), 0xfd);
        assert_eq!(isa.instruction_info(0xfd).unwrap().name, "test");
        isa.remove_instruction(0xfd).unwrap();
        assert!(isa.instruction_info(0xfd).is_err());
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut isa = Isa::new();
        isa.add_register(1, "a").unwrap();
        assert!(isa.add_register(1, "b").is_err());
        assert!(isa.add_register(2, "a").is_err());
    }
}
