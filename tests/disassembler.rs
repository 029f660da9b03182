//! Scenario-level tests for object-file disassembly, including the
//! assemble/disassemble round trip.

use std::collections::HashMap;

use simpleworld_vm::cpu::{default_simple_world, opcodes as op};
use simpleworld_vm::instruction::Instruction;
use simpleworld_vm::object::{disassemble, disassemble_word, write_object};
use simpleworld_vm::source::{assemble_file, MemoryResolver};

#[test]
fn unknown_opcode_word_disassembles_as_data_directive() {
    let isa = default_simple_world();
    assert_eq!(disassemble_word(&isa, 0xff00_0000), ".data 0xff000000");
}

#[test]
fn zero_words_decode_as_move_r0_r0_since_opcode_zero_is_move() {
    // Opcode 0 is `move`, a real registered instruction, so an all-zero
    // word is not the bytes-as-data case: that only triggers when the
    // opcode or a register operand falls outside the registry.
    let isa = default_simple_world();
    let words = vec![0u32, 0, 0, Instruction::new(op::STOP, 0, 0, 0).encode()];
    let bytes = write_object(&words);

    let lines = disassemble(&isa, &bytes).unwrap();

    assert_eq!(
        lines,
        vec![
            "move r0 r0".to_string(),
            "move r0 r0".to_string(),
            "move r0 r0".to_string(),
            "stop".to_string(),
        ]
    );
}

#[test]
fn assembled_program_disassembles_back_to_equivalent_mnemonics() {
    let isa = default_simple_world();
    let resolver = MemoryResolver(HashMap::new());
    let src = vec![
        "loadi r0, 10".to_string(),
        "loadi r1, 20".to_string(),
        "add r0, r1".to_string(),
        "stop".to_string(),
    ];

    let words = assemble_file(&isa, "main.asm", &src, &resolver).unwrap();
    let bytes = write_object(&words);
    let lines = disassemble(&isa, &bytes).unwrap();

    assert_eq!(
        lines,
        vec![
            "loadi r0 0x000a".to_string(),
            "loadi r1 0x0014".to_string(),
            "add r0 r1".to_string(),
            "stop".to_string(),
        ]
    );
}

#[test]
fn disassembling_then_reassembling_object_bytes_is_the_identity() {
    let isa = default_simple_world();
    let words = vec![
        Instruction::new(op::LOADI, 2, 0, 0x2a).encode(),
        Instruction::new(op::SUB, 2, 0, 0).encode(),
        Instruction::new(op::STOP, 0, 0, 0).encode(),
    ];
    let bytes = write_object(&words);
    let disassembled = disassemble(&isa, &bytes).unwrap();

    let resolver = MemoryResolver(HashMap::new());
    let reassembled = assemble_file(&isa, "roundtrip.asm", &disassembled, &resolver).unwrap();

    assert_eq!(reassembled, words);
}
