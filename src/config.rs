//! Host-tunable defaults: include search path and default memory/stack
//! sizing used when a caller doesn't specify its own.
//!
//! Grounded on `fuel-vm/src/interpreter/memory.rs`'s convention of naming
//! default sizes as `const`s on a small config type rather than scattering
//! magic numbers through the crate.

/// Default size, in bytes, of a freshly created [`crate::memory::Memory`].
pub const DEFAULT_MEMORY_SIZE: usize = 64 * 1024;

/// Default stack size reserved at the top of memory (`sp` starts here).
pub const DEFAULT_STACK_SIZE: usize = 4 * 1024;

/// Assembler/include-resolution configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directories searched, in order, for `.include`d files that are not
    /// found relative to the including file. Consumed by
    /// [`crate::source::FsResolver::new`], which a host builds from this
    /// field; [`crate::source::MemoryResolver`] ignores it entirely.
    pub include_path: Vec<String>,
    /// Size, in bytes, of memory created for a fresh CPU.
    pub memory_size: usize,
    /// Initial value of `sp`, i.e. the top of the reserved stack region.
    pub stack_top: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_path: Vec::new(),
            memory_size: DEFAULT_MEMORY_SIZE,
            stack_top: DEFAULT_STACK_SIZE,
        }
    }
}
