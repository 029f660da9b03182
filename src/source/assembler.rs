//! Two-pass assembler: tokenize, resolve labels, encode.
//!
//! Grounded on the original's two-pass design (label table built in pass
//! one, operands resolved against it in pass two) and on
//! `fuel-asm/src/instruction.rs`'s encode/decode pair for the wire format
//! itself.

use std::collections::HashMap;

use crate::error::AssemblerError;
use crate::instruction::Instruction;
use crate::isa::Isa;
use crate::source::preprocessor::Line;
use crate::word::Word;

struct PendingLine {
    address: u32,
    file: String,
    line: usize,
    content: String,
}

/// Assembles preprocessed source lines into a word stream, using `isa` to
/// resolve mnemonics and register names.
pub fn assemble(isa: &Isa, lines: &[Line]) -> Result<Vec<Word>, AssemblerError> {
    let (labels, pending) = first_pass(lines)?;
    second_pass(isa, &labels, &pending)
}

fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(idx) => &text[..idx],
        None => text,
    }
}

fn first_pass(lines: &[Line]) -> Result<(HashMap<String, u32>, Vec<PendingLine>), AssemblerError> {
    let mut labels = HashMap::new();
    let mut pending = Vec::new();
    let mut address: u32 = 0;

    for line in lines {
        let text = strip_comment(&line.text).trim().to_string();

        if let Some(rest) = text.strip_prefix(".label") {
            let label = rest.trim().trim_end_matches(':').trim().to_string();
            if label.is_empty() {
                return Err(AssemblerError::ParseError {
                    file: line.file.clone(),
                    line: line.line,
                    message: "`.label` requires a name".to_string(),
                });
            }
            if labels.contains_key(&label) {
                return Err(AssemblerError::ParseError {
                    file: line.file.clone(),
                    line: line.line,
                    message: format!("label `{label}` defined more than once"),
                });
            }
            labels.insert(label, address);
            continue;
        }

        if text.is_empty() {
            continue;
        }

        pending.push(PendingLine {
            address,
            file: line.file.clone(),
            line: line.line,
            content: text,
        });
        address = address.wrapping_add(Instruction::LEN as u32);
    }

    Ok((labels, pending))
}

fn parse_immediate(token: &str, labels: &HashMap<String, u32>) -> Option<u32> {
    let token = token.trim();
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok();
    }
    if let Ok(value) = token.parse::<i32>() {
        return Some(value as u32);
    }
    labels.get(token).copied()
}

fn second_pass(
    isa: &Isa,
    labels: &HashMap<String, u32>,
    pending: &[PendingLine],
) -> Result<Vec<Word>, AssemblerError> {
    let mut words = Vec::with_capacity(pending.len());

    for line in pending {
        if let Some(rest) = line.content.strip_prefix(".data") {
            let value = parse_immediate(rest.trim(), labels).ok_or_else(|| AssemblerError::ParseError {
                file: line.file.clone(),
                line: line.line,
                message: format!("`.data` operand `{}` is not a literal", rest.trim()),
            })?;
            words.push(value);
            continue;
        }

        let mut tokens = line
            .content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty());
        let mnemonic = tokens.next().ok_or_else(|| AssemblerError::ParseError {
            file: line.file.clone(),
            line: line.line,
            message: "empty instruction line".to_string(),
        })?;
        let operands: Vec<&str> = tokens.collect();

        let code = isa.instruction_code(mnemonic).map_err(|_| AssemblerError::ParseError {
            file: line.file.clone(),
            line: line.line,
            message: format!("unknown mnemonic `{mnemonic}`"),
        })?;
        let info = isa.instruction_info(code).expect("just resolved by name");

        let expected = info.nregs as usize + usize::from(info.has_immediate);
        if operands.len() != expected {
            return Err(AssemblerError::ParseError {
                file: line.file.clone(),
                line: line.line,
                message: format!(
                    "`{mnemonic}` expects {expected} operand(s), got {}",
                    operands.len()
                ),
            });
        }

        let mut first = 0u8;
        let mut second = 0u8;
        let mut idx = 0;
        if info.nregs >= 1 {
            first = isa.register_code(operands[idx]).map_err(|_| AssemblerError::ParseError {
                file: line.file.clone(),
                line: line.line,
                message: format!("unknown register `{}`", operands[idx]),
            })?;
            idx += 1;
        }
        if info.nregs >= 2 {
            second = isa.register_code(operands[idx]).map_err(|_| AssemblerError::ParseError {
                file: line.file.clone(),
                line: line.line,
                message: format!("unknown register `{}`", operands[idx]),
            })?;
            idx += 1;
        }
        let address = if info.has_immediate {
            parse_immediate(operands[idx], labels).ok_or_else(|| AssemblerError::ParseError {
                file: line.file.clone(),
                line: line.line,
                message: format!("unresolved operand `{}`", operands[idx]),
            })? as u16
        } else {
            0
        };

        words.push(Instruction::new(code, first, second, address).encode());
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::default_simple_world;
    use crate::cpu::opcodes as op;

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Line {
                file: "test.asm".to_string(),
                line: i + 1,
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn assembles_block_then_stop() {
        let isa = default_simple_world();
        let src = lines(&[".data 0x00000000", ".data 0x00000000", ".data 0x00000000", "stop"]);
        let words = assemble(&isa, &src).unwrap();
        assert_eq!(
            words,
            vec![0, 0, 0, Instruction::new(op::STOP, 0, 0, 0).encode()]
        );
    }

    #[test]
    fn resolves_forward_label_reference() {
        let isa = default_simple_world();
        let src = lines(&["b target", "stop", ".label target:", "stop"]);
        let words = assemble(&isa, &src).unwrap();
        assert_eq!(words[0], Instruction::new(op::B, 0, 0, 8).encode());
    }

    #[test]
    fn unknown_mnemonic_is_reported_with_location() {
        let isa = default_simple_world();
        let src = lines(&["frobnicate r0"]);
        let err = assemble(&isa, &src).unwrap_err();
        match err {
            AssemblerError::ParseError { file, line, .. } => {
                assert_eq!(file, "test.asm");
                assert_eq!(line, 1);
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn register_immediate_instruction_round_trips() {
        let isa = default_simple_world();
        let src = lines(&["loadi r3, 0x2a"]);
        let words = assemble(&isa, &src).unwrap();
        assert_eq!(words[0], Instruction::new(op::LOADI, 3, 0, 0x2a).encode());
    }
}
