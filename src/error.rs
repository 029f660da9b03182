//! Error taxonomy for the VM core.
//!
//! Grounded on `fuel-vm/src/error.rs`: narrow, purpose-built error enums
//! per concern rather than one crate-wide error. Faults the CPU can
//! recover from synchronously (invalid instruction, invalid memory
//! location, division by zero) never reach `RuntimeError` at all: opcode
//! handlers raise them directly as an [`crate::interrupt::Interrupt`]
//! through their `interrupt_out` parameter, so `RuntimeError` is reserved
//! for conditions [`crate::cpu::Cpu::next`] cannot proceed past.

use thiserror::Error;

/// Out-of-range access on a [`crate::memory::Memory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// `address + 4 > size`, or `address >= size`.
    #[error("memory access at {address:#x} is out of range for a buffer of size {size}")]
    OutOfRange {
        /// Address that was accessed.
        address: u32,
        /// Size of the buffer.
        size: usize,
    },
}

/// ISA registry lookup misses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsaError {
    /// No instruction is registered under this opcode.
    #[error("instruction opcode {0:#04x} not found")]
    InstructionNotFound(u8),
    /// No instruction is registered under this mnemonic.
    #[error("instruction mnemonic `{0}` not found")]
    MnemonicNotFound(String),
    /// No register is registered under this code.
    #[error("register code {0:#04x} not found")]
    RegisterNotFound(u8),
    /// No register is registered under this name.
    #[error("register name `{0}` not found")]
    RegisterNameNotFound(String),
    /// No interrupt is registered under this code.
    #[error("interrupt code {0:#04x} not found")]
    InterruptNotFound(u8),
    /// No interrupt is registered under this name.
    #[error("interrupt name `{0}` not found")]
    InterruptNameNotFound(String),
    /// Attempted to register a code or name that is already taken.
    #[error("`{0}` is already registered")]
    AlreadyRegistered(String),
}

/// Runtime error description that either has a well-formed fallback
/// strategy (it becomes an interrupt) or must halt execution.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The CPU was not running.
    #[error("next() called on a halted CPU")]
    CpuStopped,
    /// A memory access failed for a reason the CPU cannot recover from
    /// synchronously (used only when no exception-table entry exists for
    /// the fault, see [`crate::cs::Cs`]).
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// The environment collaborator refused a `world` trap.
///
/// Grounded on `original_source/simpleworld/actionblocked.hpp`'s
/// `ActionBlocked` exception, which carries only a human-readable `what`
/// describing which action was refused; the file/line/function fields on
/// the original are a C++ `Exception` base-class convention this crate
/// gets for free from `std::error::Error`'s backtrace-free design, so only
/// the message is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("action blocked by the environment: {0}")]
pub struct ActionBlocked(pub String);

/// Assembler diagnostic, always carrying the source file and line it was
/// raised from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    /// A line could not be parsed as an instruction or directive.
    #[error("{file}:{line}: parse error: {message}")]
    ParseError {
        /// Source file the error occurred in.
        file: String,
        /// 1-based line number.
        line: usize,
        /// Human-readable description.
        message: String,
    },
    /// A preprocessor directive (`.include`, `.define`, `.block`) was
    /// malformed.
    #[error("{file}:{line}: bad directive: {message}")]
    ErrorDirective {
        /// Source file the error occurred in.
        file: String,
        /// 1-based line number.
        line: usize,
        /// Human-readable description.
        message: String,
    },
    /// `.include` directives formed a cycle.
    #[error("include cycle detected: {0}")]
    IncludeCycle(String),
}

/// Disassembly error from the object reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// The object file length was not a multiple of 4.
    #[error("object file length {0} is not a multiple of 4")]
    Misaligned(usize),
}

/// I/O failure on an object, source, or include file.
#[derive(Debug, Error)]
#[error("file access error on `{path}`: {source}")]
pub struct FileAccessError {
    /// Path that failed.
    pub path: String,
    /// Underlying I/O error.
    #[source]
    pub source: std::io::Error,
}

/// The persistence collaborator failed (out of core scope; represented
/// only so the VM's own error types can wrap it without knowing about any
/// particular database).
#[derive(Debug, Error)]
#[error("persistence error: {0}")]
pub struct DbException(pub String);
