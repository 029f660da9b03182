//! Persistence collaborator: the narrow interface a host database adapter
//! implements to load/save a bug's state, plus the MD5 hash used to
//! fingerprint its code segment.
//!
//! Grounded on `fuel-storage`'s `StorageInspect`/`StorageMutate` pair: an
//! associated-`Error` trait so the VM core never depends on a concrete
//! database crate, only on the shape of one. The hash itself is grounded
//! on `original_source/db/code.cpp`/`db/code.hpp`, which store an `md5`
//! column alongside a bug's code; `fuel-merkle` (`examples/FuelLabs-fuel-vm/fuel-merkle/Cargo.toml`)
//! reaches for the RustCrypto `digest`/`sha2` family for this kind of
//! concern rather than hand-rolling a hash, so this crate depends on the
//! sibling RustCrypto `md5` crate instead of reimplementing RFC 1321.

use crate::error::DbException;
use crate::registers::REGISTER_COUNT;
use crate::word::Word;

/// Kind of change recorded against a bug's code segment, mirroring the
/// original's mutation log used to reconstruct lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationKind {
    /// An existing word's value changed.
    Mutation,
    /// A word was inserted, shifting everything after it.
    Addition,
    /// A word was removed, shifting everything after it.
    Deletion,
}

/// One recorded change to a bug's code segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mutation {
    /// Word index into the code segment the mutation applies at.
    pub position: usize,
    /// Value before the mutation (`0` for `Addition`).
    pub original_word: Word,
    /// Value after the mutation (`0` for `Deletion`).
    pub mutated_word: Word,
    /// What kind of change this was.
    pub kind: MutationKind,
    /// Generation the mutation was recorded in, if the host tracks
    /// generations. `None` when mutations are applied outside of any
    /// generational breeding process (e.g. a manual edit).
    pub generation: Option<u32>,
}

/// Persists and restores a bug's register file, code segment, and
/// mutation history.
///
/// Every method is fallible through an associated `Error` so a concrete
/// adapter can report whatever its backing store produces without the
/// VM core depending on that store's crate.
pub trait BugStore {
    /// Error type returned by a concrete adapter.
    type Error: std::error::Error;

    /// Loads a bug's register file.
    fn load_registers(&self, bug_id: u32) -> Result<[Word; REGISTER_COUNT], Self::Error>;

    /// Saves a bug's register file.
    fn save_registers(&mut self, bug_id: u32, registers: &[Word; REGISTER_COUNT]) -> Result<(), Self::Error>;

    /// Loads a bug's code segment, as a word stream.
    fn load_code(&self, bug_id: u32) -> Result<Vec<Word>, Self::Error>;

    /// Saves a bug's code segment and its MD5 fingerprint together, so the
    /// stored hash can never drift from the stored code.
    fn save_code(&mut self, bug_id: u32, code: &[Word]) -> Result<(), Self::Error> {
        let hash = md5_of_words(code);
        self.save_code_and_hash(bug_id, code, hash)
    }

    /// Saves a bug's code segment alongside a precomputed hash.
    fn save_code_and_hash(&mut self, bug_id: u32, code: &[Word], hash: [u8; 16]) -> Result<(), Self::Error>;

    /// Loads the stored MD5 fingerprint of a bug's code segment.
    fn load_code_hash(&self, bug_id: u32) -> Result<[u8; 16], Self::Error>;

    /// Appends a mutation to a bug's history.
    fn record_mutation(&mut self, bug_id: u32, mutation: Mutation) -> Result<(), Self::Error>;

    /// Loads a bug's full mutation history, oldest first.
    fn load_mutations(&self, bug_id: u32) -> Result<Vec<Mutation>, Self::Error>;
}

/// Wraps a [`BugStore::Error`] as a boxed [`DbException`] for callers that
/// want one error type across adapters.
pub fn boxed_db_error<E: std::error::Error>(err: E) -> DbException {
    DbException(err.to_string())
}

/// Computes the MD5 hash of a bug's code segment, serialized the same way
/// [`crate::object::write_object`] would write it to disk.
pub fn md5_of_words(words: &[Word]) -> [u8; 16] {
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for word in words {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    md5::compute(&bytes).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_of_empty_string() {
        assert_eq!(
            md5::compute(b"").0,
            [
                0xd4, 0x1d, 0x8c, 0xd9, 0x8f, 0x00, 0xb2, 0x04, 0xe9, 0x80, 0x09, 0x98, 0xec, 0xf8,
                0x42, 0x7e
            ]
        );
    }

    #[test]
    fn md5_of_abc() {
        assert_eq!(
            md5::compute(b"abc").0,
            [
                0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f, 0x7d, 0x28, 0xe1,
                0x7f, 0x72
            ]
        );
    }

    #[test]
    fn mutation_kind_variants_display_their_name() {
        use strum::IntoEnumIterator;
        let names: Vec<String> = MutationKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["Mutation", "Addition", "Deletion"]);
    }

    #[test]
    fn md5_of_words_matches_big_endian_byte_serialization() {
        let words = [0x0123_4567u32, 0x89ab_cdef];
        let mut bytes = Vec::new();
        for w in words {
            bytes.extend_from_slice(&w.to_be_bytes());
        }
        assert_eq!(md5_of_words(&words), md5::compute(&bytes).0);
    }
}
