//! Scenario-level tests for interrupt raising and dispatch through the
//! full fetch/decode/execute cycle.

use simpleworld_vm::cpu::{default_simple_world, opcodes as op};
use simpleworld_vm::cpu::Cpu;
use simpleworld_vm::cs::Cs;
use simpleworld_vm::instruction::Instruction;
use simpleworld_vm::interrupt::codes;
use simpleworld_vm::memory::Memory;
use simpleworld_vm::world::NullWorld;

fn program(words: &[(u32, Instruction)]) -> Memory {
    let mut mem = Memory::new(128);
    for (addr, inst) in words {
        mem.set_word(*addr, inst.encode(), true).unwrap();
    }
    mem
}

#[test]
fn division_by_zero_pushes_all_sixteen_registers_and_jumps_to_handler() {
    let isa = default_simple_world();
    let mut world = NullWorld;
    let mut mem = program(&[
        (0, Instruction::new(op::LOADI, 1, 0, 0)), // r1 = 0 (divisor)
        (4, Instruction::new(op::DIV, 0, 1, 0)),
        (8, Instruction::new(op::STOP, 0, 0, 0)),
    ]);
    // Interrupt table at 64, entry for DIVISION_BY_ZERO (code 2) at 64 + 2*4.
    mem.set_word(64 + codes::DIVISION_BY_ZERO as u32 * 4, 0x2000, true)
        .unwrap();

    let mut cpu = Cpu::new(mem);
    cpu.cs = Cs {
        itp: 64,
        enable: true,
        interrupt: false,
        max_interrupts: 4,
    };
    cpu.registers.set_sp(120);
    cpu.registers.set_etp(0xabcd);

    cpu.next(&isa, &mut world).unwrap(); // loadi
    cpu.next(&isa, &mut world).unwrap(); // div, raises DIVISION_BY_ZERO
    assert_eq!(cpu.registers.pc(), 8);

    cpu.next(&isa, &mut world).unwrap(); // dispatch
    assert_eq!(cpu.registers.pc(), 0x2000);
    assert!(cpu.cs.interrupt);

    // All 16 registers, including etp, were pushed below the saved sp.
    let mut sp = 120u32;
    for code in (0..16u8).rev() {
        let expected = match code {
            1 => 0, // r1 held the divisor
            14 => 8, // pc at the moment of the fault
            15 => 0xabcd, // etp
            _ => 0,
        };
        assert_eq!(cpu.memory.get_word(sp, true).unwrap(), expected, "register {code}");
        sp -= 4;
    }
    assert_eq!(cpu.registers.sp(), sp);
}

#[test]
fn disabled_interrupts_are_dropped_and_execution_continues() {
    let isa = default_simple_world();
    let mut world = NullWorld;
    let mem = program(&[
        (0, Instruction::new(op::LOADI, 1, 0, 0)),
        (4, Instruction::new(op::DIV, 0, 1, 0)),
        (8, Instruction::new(op::LOADI, 2, 0, 7)),
        (12, Instruction::new(op::STOP, 0, 0, 0)),
    ]);

    let mut cpu = Cpu::new(mem);
    cpu.cs = Cs {
        itp: 0,
        enable: false,
        interrupt: false,
        max_interrupts: 4,
    };
    cpu.registers.set_sp(120);

    cpu.execute(&isa, &mut world).unwrap();

    assert_eq!(cpu.registers[2], 7);
    assert!(!cpu.cs.interrupt);
}

#[test]
fn rete_restores_registers_and_clears_interrupt_flag() {
    let isa = default_simple_world();
    let mut world = NullWorld;
    let mut mem = program(&[
        (0, Instruction::new(op::LOADI, 1, 0, 0)),
        (4, Instruction::new(op::DIV, 0, 1, 0)),
        (8, Instruction::new(op::LOADI, 5, 0, 99)), // resumed here after rete
        (12, Instruction::new(op::STOP, 0, 0, 0)),
    ]);
    mem.set_word(64 + codes::DIVISION_BY_ZERO as u32 * 4, 0x2000, true)
        .unwrap();
    mem.set_word(0x2000, Instruction::new(op::RETE, 0, 0, 0).encode(), true)
        .unwrap();

    let mut cpu = Cpu::new(mem);
    cpu.cs = Cs {
        itp: 64,
        enable: true,
        interrupt: false,
        max_interrupts: 4,
    };
    cpu.registers.set_sp(120);

    cpu.next(&isa, &mut world).unwrap(); // loadi
    cpu.next(&isa, &mut world).unwrap(); // div, raises
    cpu.next(&isa, &mut world).unwrap(); // dispatch, jumps to 0x2000
    assert!(cpu.cs.interrupt);

    cpu.next(&isa, &mut world).unwrap(); // rete
    assert_eq!(cpu.registers.pc(), 8);
    assert_eq!(cpu.registers.sp(), 120);
    assert!(!cpu.cs.interrupt);

    cpu.next(&isa, &mut world).unwrap(); // loadi r5, 99
    assert_eq!(cpu.registers[5], 99);
}
