//! Opcode handlers: one function per mnemonic, matching
//! [`crate::isa::Handler`].
//!
//! Grounded on `fuel-vm/src/interpreter/alu.rs` and
//! `fuel-vm/src/interpreter/flow.rs`: arithmetic ops operate on the
//! register file directly and report faults by signalling rather than
//! panicking; flow-control ops are the only ones that return
//! [`Update::None`] instead of [`Update::UpdatePc`].

use crate::cs::Cs;
use crate::error::ActionBlocked;
use crate::instruction::Instruction;
use crate::interrupt::{codes, pop_all, Interrupt};
use crate::isa::Update;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::word::Word;
use crate::world::WorldTrap;

/// Evaluates a `Result<T, MemoryError>`, raising `InvalidMemoryLocation`
/// and returning early from the enclosing handler on failure.
macro_rules! mem_or_fault {
    ($result:expr, $interrupt_out:expr) => {
        match $result {
            Ok(value) => value,
            Err(_) => {
                *$interrupt_out = Some(Interrupt::new(codes::INVALID_MEMORY_LOCATION));
                return Update::UpdatePc;
            }
        }
    };
}

// -- data movement -----------------------------------------------------

pub fn move_(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    regs[inst.first] = regs[inst.second];
    Update::UpdatePc
}

pub fn load(
    regs: &mut Registers,
    mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let value = mem_or_fault!(mem.get_word(inst.address as Word, true), interrupt_out);
    regs[inst.first] = value;
    Update::UpdatePc
}

pub fn loadi(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    regs[inst.first] = inst.address as Word;
    Update::UpdatePc
}

pub fn loadhi(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let low = regs[inst.first] & 0xffff;
    regs[inst.first] = ((inst.address as Word) << 16) | low;
    Update::UpdatePc
}

pub fn store(
    regs: &mut Registers,
    mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let addr = regs[inst.first];
    mem_or_fault!(mem.set_word(addr, regs[inst.second], true), interrupt_out);
    Update::UpdatePc
}

pub fn push(
    regs: &mut Registers,
    mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let sp = regs.sp();
    mem_or_fault!(mem.set_word(sp, regs[inst.first], true), interrupt_out);
    regs.set_sp(sp.wrapping_sub(4));
    Update::UpdatePc
}

pub fn pop(
    regs: &mut Registers,
    mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let sp = regs.sp().wrapping_add(4);
    let value = mem_or_fault!(mem.get_word(sp, true), interrupt_out);
    regs.set_sp(sp);
    regs[inst.first] = value;
    Update::UpdatePc
}

// -- signed arithmetic ---------------------------------------------------

macro_rules! signed_binop {
    ($name:ident, $op:ident) => {
        pub fn $name(
            regs: &mut Registers,
            _mem: &mut Memory,
            _cs: &mut Cs,
            _depth: &mut u8,
            _interrupt_out: &mut Option<Interrupt>,
            _world: &mut dyn WorldTrap,
            inst: Instruction,
        ) -> Update {
            let a = regs[inst.first] as i32;
            let b = regs[inst.second] as i32;
            regs[inst.first] = a.$op(b) as u32;
            Update::UpdatePc
        }
    };
}

signed_binop!(add, wrapping_add);
signed_binop!(sub, wrapping_sub);
signed_binop!(mult, wrapping_mul);

macro_rules! signed_binop_immediate {
    ($name:ident, $op:ident) => {
        pub fn $name(
            regs: &mut Registers,
            _mem: &mut Memory,
            _cs: &mut Cs,
            _depth: &mut u8,
            _interrupt_out: &mut Option<Interrupt>,
            _world: &mut dyn WorldTrap,
            inst: Instruction,
        ) -> Update {
            let a = regs[inst.first] as i32;
            let imm = inst.address as i16 as i32;
            regs[inst.first] = a.$op(imm) as u32;
            Update::UpdatePc
        }
    };
}

signed_binop_immediate!(addi, wrapping_add);
signed_binop_immediate!(subi, wrapping_sub);
signed_binop_immediate!(multi, wrapping_mul);

pub fn div(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let b = regs[inst.second] as i32;
    if b == 0 {
        *interrupt_out = Some(Interrupt::new(codes::DIVISION_BY_ZERO));
        return Update::UpdatePc;
    }
    let a = regs[inst.first] as i32;
    regs[inst.first] = a.wrapping_div(b) as u32;
    Update::UpdatePc
}

pub fn modulo(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let b = regs[inst.second] as i32;
    if b == 0 {
        *interrupt_out = Some(Interrupt::new(codes::DIVISION_BY_ZERO));
        return Update::UpdatePc;
    }
    let a = regs[inst.first] as i32;
    regs[inst.first] = a.wrapping_rem(b) as u32;
    Update::UpdatePc
}

pub fn divi(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let imm = inst.address as i16 as i32;
    if imm == 0 {
        *interrupt_out = Some(Interrupt::new(codes::DIVISION_BY_ZERO));
        return Update::UpdatePc;
    }
    let a = regs[inst.first] as i32;
    regs[inst.first] = a.wrapping_div(imm) as u32;
    Update::UpdatePc
}

pub fn modi(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let imm = inst.address as i16 as i32;
    if imm == 0 {
        *interrupt_out = Some(Interrupt::new(codes::DIVISION_BY_ZERO));
        return Update::UpdatePc;
    }
    let a = regs[inst.first] as i32;
    regs[inst.first] = a.wrapping_rem(imm) as u32;
    Update::UpdatePc
}

// -- unsigned arithmetic -------------------------------------------------

pub fn multu(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    regs[inst.first] = regs[inst.first].wrapping_mul(regs[inst.second]);
    Update::UpdatePc
}

pub fn divu(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let b = regs[inst.second];
    if b == 0 {
        *interrupt_out = Some(Interrupt::new(codes::DIVISION_BY_ZERO));
        return Update::UpdatePc;
    }
    regs[inst.first] /= b;
    Update::UpdatePc
}

pub fn modu(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let b = regs[inst.second];
    if b == 0 {
        *interrupt_out = Some(Interrupt::new(codes::DIVISION_BY_ZERO));
        return Update::UpdatePc;
    }
    regs[inst.first] %= b;
    Update::UpdatePc
}

// -- logic ----------------------------------------------------------------

pub fn not(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    regs[inst.first] = !regs[inst.first];
    Update::UpdatePc
}

macro_rules! logic_binop {
    ($name:ident, $op:tt) => {
        pub fn $name(
            regs: &mut Registers,
            _mem: &mut Memory,
            _cs: &mut Cs,
            _depth: &mut u8,
            _interrupt_out: &mut Option<Interrupt>,
            _world: &mut dyn WorldTrap,
            inst: Instruction,
        ) -> Update {
            regs[inst.first] = regs[inst.first] $op regs[inst.second];
            Update::UpdatePc
        }
    };
}

logic_binop!(or, |);
logic_binop!(and, &);
logic_binop!(xor, ^);

macro_rules! logic_binop_immediate {
    ($name:ident, $op:tt) => {
        pub fn $name(
            regs: &mut Registers,
            _mem: &mut Memory,
            _cs: &mut Cs,
            _depth: &mut u8,
            _interrupt_out: &mut Option<Interrupt>,
            _world: &mut dyn WorldTrap,
            inst: Instruction,
        ) -> Update {
            regs[inst.first] = regs[inst.first] $op (inst.address as Word);
            Update::UpdatePc
        }
    };
}

logic_binop_immediate!(ori, |);
logic_binop_immediate!(andi, &);
logic_binop_immediate!(xori, ^);

// -- shift / rotate -------------------------------------------------------

pub fn sll(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let amount = regs[inst.second] & 0x1f;
    regs[inst.first] = regs[inst.first].wrapping_shl(amount);
    Update::UpdatePc
}

pub fn srl(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let amount = regs[inst.second] & 0x1f;
    regs[inst.first] = regs[inst.first].wrapping_shr(amount);
    Update::UpdatePc
}

/// Identical to [`sll`]: two's-complement left shift has no separate
/// arithmetic form, but the mnemonic is kept distinct for symmetry with
/// [`sra`].
pub fn sla(
    regs: &mut Registers,
    mem: &mut Memory,
    cs: &mut Cs,
    depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    sll(regs, mem, cs, depth, interrupt_out, world, inst)
}

pub fn sra(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let amount = regs[inst.second] & 0x1f;
    regs[inst.first] = ((regs[inst.first] as i32).wrapping_shr(amount)) as u32;
    Update::UpdatePc
}

pub fn rl(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let amount = regs[inst.second] & 0x1f;
    regs[inst.first] = regs[inst.first].rotate_left(amount);
    Update::UpdatePc
}

pub fn rr(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let amount = regs[inst.second] & 0x1f;
    regs[inst.first] = regs[inst.first].rotate_right(amount);
    Update::UpdatePc
}

// -- branches ---------------------------------------------------------

pub fn b(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    regs.set_pc(inst.address as Word);
    Update::None
}

macro_rules! conditional_branch {
    ($name:ident, $lhs_ty:ty, $cond:expr) => {
        pub fn $name(
            regs: &mut Registers,
            _mem: &mut Memory,
            _cs: &mut Cs,
            _depth: &mut u8,
            _interrupt_out: &mut Option<Interrupt>,
            _world: &mut dyn WorldTrap,
            inst: Instruction,
        ) -> Update {
            let a = regs[inst.first] as $lhs_ty;
            let b = regs[inst.second] as $lhs_ty;
            if $cond(a, b) {
                regs.set_pc(inst.address as Word);
                Update::None
            } else {
                Update::UpdatePc
            }
        }
    };
}

conditional_branch!(beq, u32, |a: u32, b: u32| a == b);
conditional_branch!(bne, u32, |a: u32, b: u32| a != b);
conditional_branch!(blt, i32, |a: i32, b: i32| a < b);
conditional_branch!(bltu, u32, |a: u32, b: u32| a < b);
conditional_branch!(bgt, i32, |a: i32, b: i32| a > b);
conditional_branch!(bgtu, u32, |a: u32, b: u32| a > b);
conditional_branch!(ble, i32, |a: i32, b: i32| a <= b);
conditional_branch!(bleu, u32, |a: u32, b: u32| a <= b);
conditional_branch!(bge, i32, |a: i32, b: i32| a >= b);
conditional_branch!(bgeu, u32, |a: u32, b: u32| a >= b);

// -- function call ------------------------------------------------------

pub fn call(
    regs: &mut Registers,
    mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    let return_address = regs.pc().wrapping_add(4);
    let sp = regs.sp();
    mem_or_fault!(mem.set_word(sp, return_address, true), interrupt_out);
    regs.set_sp(sp.wrapping_sub(4));
    let target = ((regs.sgp() & 0xffff) << 16) | (inst.address as Word);
    regs.set_pc(target);
    Update::None
}

pub fn ret(
    regs: &mut Registers,
    mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    _inst: Instruction,
) -> Update {
    let sp = regs.sp().wrapping_add(4);
    let return_address = mem_or_fault!(mem.get_word(sp, true), interrupt_out);
    regs.set_sp(sp);
    regs.set_pc(return_address);
    Update::None
}

pub fn rete(
    regs: &mut Registers,
    mem: &mut Memory,
    cs: &mut Cs,
    depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    _inst: Instruction,
) -> Update {
    if pop_all(regs, mem).is_err() {
        *interrupt_out = Some(Interrupt::new(codes::INVALID_MEMORY_LOCATION));
        return Update::UpdatePc;
    }
    *depth = depth.saturating_sub(1);
    cs.interrupt = *depth > 0;
    Update::None
}

// -- management -----------------------------------------------------------

pub fn stop(
    _regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    _inst: Instruction,
) -> Update {
    Update::Stop
}

pub fn restart(
    regs: &mut Registers,
    _mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    _interrupt_out: &mut Option<Interrupt>,
    _world: &mut dyn WorldTrap,
    _inst: Instruction,
) -> Update {
    regs.clear();
    Update::None
}

// -- world trap -----------------------------------------------------------

pub fn world(
    regs: &mut Registers,
    mem: &mut Memory,
    _cs: &mut Cs,
    _depth: &mut u8,
    interrupt_out: &mut Option<Interrupt>,
    world: &mut dyn WorldTrap,
    inst: Instruction,
) -> Update {
    match world.world(inst.address, regs, mem) {
        Ok(raised) => *interrupt_out = raised,
        Err(ActionBlocked(_)) => {
            *interrupt_out = Some(Interrupt::new(codes::INVALID_WORLD_COMMAND))
        }
    }
    Update::UpdatePc
}
