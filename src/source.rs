//! Assembly source handling: the line-buffer file abstraction, the
//! preprocessor stages, and the two-pass assembler built on top of them.

pub mod assembler;
pub mod file;
pub mod preprocessor;

pub use assembler::assemble;
pub use file::SourceFile;
pub use preprocessor::{
    expand_data_directives, expand_includes, substitute_defines, FsResolver, IncludeResolver,
    Line, MemoryResolver,
};

use crate::error::AssemblerError;
use crate::isa::Isa;
use crate::word::Word;

/// Runs the full pipeline over `file`'s lines: include expansion,
/// `.define` substitution, `.block`/`.data`/string expansion, then
/// two-pass assembly.
pub fn assemble_file(
    isa: &Isa,
    file_name: &str,
    lines: &[String],
    resolver: &dyn IncludeResolver,
) -> Result<Vec<Word>, AssemblerError> {
    let expanded = expand_includes(file_name, lines, resolver)?;
    let defined = substitute_defines(expanded)?;
    let data_expanded = expand_data_directives(defined)?;
    assemble(isa, &data_expanded)
}
