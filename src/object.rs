//! Object files: a flat, headerless stream of big-endian words, plus the
//! disassembler built on top of it.
//!
//! Grounded on `fuel-asm`'s raw-bytes-in/raw-bytes-out philosophy for
//! instruction encoding, extended here to a whole program: no magic
//! number, no section table, just `len % 4 == 0` words in
//! [`crate::word::Word`]'s canonical big-endian form.

use std::fs;
use std::path::Path;

use crate::error::{FileAccessError, ObjectError};
use crate::instruction::decode;
use crate::isa::Isa;
use crate::word::Word;

/// Parses a raw object file into its constituent words.
pub fn read_object(bytes: &[u8]) -> Result<Vec<Word>, ObjectError> {
    if bytes.len() % 4 != 0 {
        return Err(ObjectError::Misaligned(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| Word::from_be_bytes(chunk.try_into().unwrap()))
        .collect())
}

/// Serializes `words` into their big-endian byte representation.
pub fn write_object(words: &[Word]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for word in words {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    bytes
}

/// Reads an object file from disk.
pub fn load_object(path: impl AsRef<Path>) -> Result<Vec<Word>, FileAccessError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| FileAccessError {
        path: path.display().to_string(),
        source,
    })?;
    read_object(&bytes).map_err(|err| FileAccessError {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string()),
    })
}

/// Writes `words` to disk as an object file.
pub fn save_object(path: impl AsRef<Path>, words: &[Word]) -> Result<(), FileAccessError> {
    let path = path.as_ref();
    fs::write(path, write_object(words)).map_err(|source| FileAccessError {
        path: path.display().to_string(),
        source,
    })
}

/// Disassembles one instruction word into its mnemonic form, or a
/// `.data` directive if the opcode or either register operand is not
/// registered in `isa`.
pub fn disassemble_word(isa: &Isa, word: Word) -> String {
    let inst = decode(word);
    let info = match isa.instruction_info(inst.code) {
        Ok(info) => info,
        Err(_) => return format!(".data {word:#010x}"),
    };

    let mut parts = vec![info.name.to_string()];
    let mut registers_known = true;

    if info.nregs >= 1 {
        match isa.register_name(inst.first) {
            Ok(name) => parts.push(name.to_string()),
            Err(_) => registers_known = false,
        }
    }
    if info.nregs >= 2 {
        match isa.register_name(inst.second) {
            Ok(name) => parts.push(name.to_string()),
            Err(_) => registers_known = false,
        }
    }

    if !registers_known {
        return format!(".data {word:#010x}");
    }

    if info.has_immediate {
        parts.push(format!("{:#06x}", inst.address));
    }

    parts.join(" ")
}

/// Disassembles a whole object file, one line per word.
pub fn disassemble(isa: &Isa, bytes: &[u8]) -> Result<Vec<String>, ObjectError> {
    Ok(read_object(bytes)?
        .into_iter()
        .map(|word| disassemble_word(isa, word))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::default_simple_world;
    use crate::cpu::opcodes as op;
    use crate::instruction::Instruction;

    #[test]
    fn misaligned_object_is_rejected() {
        assert_eq!(read_object(&[0, 1, 2]), Err(ObjectError::Misaligned(3)));
    }

    #[test]
    fn round_trips_through_bytes() {
        let words = vec![0x1234_5678, 0xdead_beef];
        let bytes = write_object(&words);
        assert_eq!(read_object(&bytes).unwrap(), words);
    }

    #[test]
    fn unknown_opcode_disassembles_as_data() {
        let isa = default_simple_world();
        assert_eq!(disassemble_word(&isa, 0xff00_0000), ".data 0xff000000");
    }

    #[test]
    fn known_instruction_disassembles_to_mnemonic_form() {
        let isa = default_simple_world();
        let word = Instruction::new(op::ADD, 1, 2, 0).encode();
        assert_eq!(disassemble_word(&isa, word), "add r1 r2");
    }

    #[test]
    fn immediate_instruction_includes_address_operand() {
        let isa = default_simple_world();
        let word = Instruction::new(op::LOADI, 0, 0, 0x2a).encode();
        assert_eq!(disassemble_word(&isa, word), "loadi r0 0x002a");
    }

    #[test]
    fn block_then_stop_matches_expected_words() {
        // `.block 3` reserves three zero words, followed by `stop`.
        let mut words = vec![0u32; 3];
        words.push(Instruction::new(op::STOP, 0, 0, 0).encode());
        assert_eq!(words, vec![0, 0, 0, Instruction::new(op::STOP, 0, 0, 0).encode()]);
    }
}
