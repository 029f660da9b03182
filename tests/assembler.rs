//! Scenario-level tests for the full include/define/data preprocessing
//! pipeline feeding the two-pass assembler.

use std::collections::HashMap;

use simpleworld_vm::cpu::{default_simple_world, opcodes as op};
use simpleworld_vm::instruction::Instruction;
use simpleworld_vm::source::{assemble_file, MemoryResolver};

#[test]
fn block_then_stop_assembles_to_three_zero_words_and_a_stop() {
    let isa = default_simple_world();
    let resolver = MemoryResolver(HashMap::new());
    let src = vec![".block 3".to_string(), "stop".to_string()];

    let words = assemble_file(&isa, "main.asm", &src, &resolver).unwrap();

    assert_eq!(
        words,
        vec![0, 0, 0, Instruction::new(op::STOP, 0, 0, 0).encode()]
    );
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let isa = default_simple_world();
    let resolver = MemoryResolver(HashMap::new());
    let src = vec![
        "# a leading comment".to_string(),
        "".to_string(),
        "loadi r0, 0x10  # load ten-ish".to_string(),
        "stop".to_string(),
    ];

    let words = assemble_file(&isa, "main.asm", &src, &resolver).unwrap();

    assert_eq!(
        words,
        vec![
            Instruction::new(op::LOADI, 0, 0, 0x10).encode(),
            Instruction::new(op::STOP, 0, 0, 0).encode(),
        ]
    );
}

#[test]
fn labels_and_includes_and_defines_compose() {
    let isa = default_simple_world();
    let mut files = HashMap::new();
    files.insert(
        "consts.asm".to_string(),
        vec![".define START 1".to_string()],
    );
    let resolver = MemoryResolver(files);

    let src = vec![
        ".include \"consts.asm\"".to_string(),
        ".label top:".to_string(),
        "loadi r0, START".to_string(),
        "b top".to_string(),
    ];

    let words = assemble_file(&isa, "main.asm", &src, &resolver).unwrap();

    assert_eq!(
        words,
        vec![
            Instruction::new(op::LOADI, 0, 0, 1).encode(),
            Instruction::new(op::B, 0, 0, 0).encode(),
        ]
    );
}

#[test]
fn multi_word_data_directive_emits_one_word_per_token() {
    let isa = default_simple_world();
    let resolver = MemoryResolver(HashMap::new());
    let src = vec![".data 1 2 0x3".to_string(), "stop".to_string()];

    let words = assemble_file(&isa, "main.asm", &src, &resolver).unwrap();

    assert_eq!(
        words,
        vec![1, 2, 3, Instruction::new(op::STOP, 0, 0, 0).encode()]
    );
}

#[test]
fn unresolved_include_reports_the_missing_file() {
    let isa = default_simple_world();
    let resolver = MemoryResolver(HashMap::new());
    let src = vec![".include \"missing.asm\"".to_string()];

    assert!(assemble_file(&isa, "main.asm", &src, &resolver).is_err());
}
