//! Virtual-machine core for Simple World: a big-endian, word-addressable
//! memory, a 32-bit fixed-width instruction format, a dynamically
//! extensible instruction-set registry, a CPU with synchronous
//! prioritized interrupts, and a two-pass assembler/disassembler.
//!
//! The crate does not know about the world grid or bug persistence; those
//! are modelled as the narrow [`world::WorldTrap`] and [`storage::BugStore`]
//! traits a host implements.

#![warn(missing_docs)]

pub mod config;
pub mod cpu;
pub mod cs;
pub mod error;
pub mod instruction;
pub mod interrupt;
pub mod isa;
pub mod memory;
pub mod object;
pub mod registers;
pub mod source;
pub mod storage;
pub mod word;
pub mod world;

pub use cpu::{default_simple_world, Cpu};
pub use cs::Cs;
pub use error::{
    ActionBlocked, AssemblerError, FileAccessError, IsaError, MemoryError, ObjectError,
    RuntimeError,
};
pub use instruction::Instruction;
pub use interrupt::Interrupt;
pub use isa::{Isa, Update};
pub use memory::Memory;
pub use registers::Registers;
pub use world::{NullWorld, WorldTrap};
