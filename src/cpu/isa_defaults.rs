//! Builds the default `SimpleWorld` instruction set: every opcode, register
//! name, and interrupt name the original CPU shipped with.
//!
//! Grounded on `examples/original_source/tests/cpu/isa_test.cpp`'s
//! registration calls and `examples/original_source/cpu/types.h`'s
//! register/interrupt name tables.

use crate::cpu::handlers;
use crate::cpu::opcodes as op;
use crate::interrupt::codes;
use crate::isa::{Isa, InstructionInfo};
use crate::registers::{ETP, PC, R0, R12, SP};

macro_rules! instructions {
    ($isa:expr, { $($code:expr, $name:expr, $nregs:expr, $imm:expr, $handler:expr;)* }) => {
        $(
            $isa.add_instruction(InstructionInfo {
                code: $code,
                name: $name,
                nregs: $nregs,
                has_immediate: $imm,
                handler: $handler,
            }).expect("default instruction set has no duplicate codes or names");
        )*
    };
}

/// Builds the `Isa` registry used by the reference CPU: every opcode,
/// general-purpose/special register name, and predefined interrupt the
/// original shipped with.
pub fn default_simple_world() -> Isa {
    let mut isa = Isa::new();

    for code in R0..=R12 {
        isa.add_register(code, format!("r{code}"))
            .expect("register codes 0..=12 are distinct");
    }
    isa.add_register(SP, "sp").unwrap();
    isa.add_register(PC, "pc").unwrap();
    isa.add_register(ETP, "etp").unwrap();

    isa.add_interrupt(codes::INVALID_INSTRUCTION, "InvalidInstruction").unwrap();
    isa.add_interrupt(codes::INVALID_MEMORY_LOCATION, "InvalidMemoryLocation").unwrap();
    isa.add_interrupt(codes::DIVISION_BY_ZERO, "DivisionByZero").unwrap();
    isa.add_interrupt(codes::TIMER_INTERRUPT, "TimerInterrupt").unwrap();
    isa.add_interrupt(codes::INVALID_WORLD_COMMAND, "InvalidWorldCommand").unwrap();
    isa.add_interrupt(codes::WORLD_EVENT, "WorldEvent").unwrap();
    isa.add_interrupt(codes::SOFTWARE_INTERRUPT, "SoftwareInterrupt").unwrap();

    instructions!(isa, {
        op::MOVE, "move", 2, false, handlers::move_;
        op::LOAD, "load", 1, true, handlers::load;
        op::LOADI, "loadi", 1, true, handlers::loadi;
        op::LOADHI, "loadhi", 1, true, handlers::loadhi;
        op::STORE, "store", 2, false, handlers::store;
        op::PUSH, "push", 1, false, handlers::push;
        op::POP, "pop", 1, false, handlers::pop;

        op::ADD, "add", 2, false, handlers::add;
        op::SUB, "sub", 2, false, handlers::sub;
        op::MULT, "mult", 2, false, handlers::mult;
        op::DIV, "div", 2, false, handlers::div;
        op::MOD, "mod", 2, false, handlers::modulo;
        op::ADDI, "addi", 1, true, handlers::addi;
        op::SUBI, "subi", 1, true, handlers::subi;
        op::MULTI, "multi", 1, true, handlers::multi;
        op::DIVI, "divi", 1, true, handlers::divi;
        op::MODI, "modi", 1, true, handlers::modi;

        op::MULTU, "multu", 2, false, handlers::multu;
        op::DIVU, "divu", 2, false, handlers::divu;
        op::MODU, "modu", 2, false, handlers::modu;

        op::NOT, "not", 1, false, handlers::not;
        op::OR, "or", 2, false, handlers::or;
        op::AND, "and", 2, false, handlers::and;
        op::XOR, "xor", 2, false, handlers::xor;
        op::ORI, "ori", 1, true, handlers::ori;
        op::ANDI, "andi", 1, true, handlers::andi;
        op::XORI, "xori", 1, true, handlers::xori;

        op::SLL, "sll", 2, false, handlers::sll;
        op::SRL, "srl", 2, false, handlers::srl;
        op::SLA, "sla", 2, false, handlers::sla;
        op::SRA, "sra", 2, false, handlers::sra;
        op::RL, "rl", 2, false, handlers::rl;
        op::RR, "rr", 2, false, handlers::rr;

        op::B, "b", 0, true, handlers::b;
        op::BEQ, "beq", 2, true, handlers::beq;
        op::BNE, "bne", 2, true, handlers::bne;
        op::BLT, "blt", 2, true, handlers::blt;
        op::BLTU, "bltu", 2, true, handlers::bltu;
        op::BGT, "bgt", 2, true, handlers::bgt;
        op::BGTU, "bgtu", 2, true, handlers::bgtu;
        op::BLE, "ble", 2, true, handlers::ble;
        op::BLEU, "bleu", 2, true, handlers::bleu;
        op::BGE, "bge", 2, true, handlers::bge;
        op::BGEU, "bgeu", 2, true, handlers::bgeu;

        op::CALL, "call", 0, true, handlers::call;
        op::RET, "ret", 0, false, handlers::ret;
        op::RETE, "rete", 0, false, handlers::rete;

        op::STOP, "stop", 0, false, handlers::stop;
        op::RESTART, "restart", 0, false, handlers::restart;

        op::WORLD, "world", 0, true, handlers::world;
    });

    isa
}
