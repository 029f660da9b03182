//! Preprocessing stages run before two-pass assembly: `.include`
//! resolution (with cycle detection), `.define` constant substitution,
//! and `.block`/`.data`/string-literal expansion into literal data words.
//!
//! Grounded on the original's preprocessing pipeline
//! (`examples/original_source/_INDEX.md` lists the `.include`/`.define`
//! directives this mirrors), reworked as a sequence of small pure
//! functions over `(file, line, text)` triples rather than in-place
//! string mutation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AssemblerError;

/// One source line after expansion, carrying its point of origin for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// File the line originated from (post-`.include` expansion, this is
    /// the included file, not the includer).
    pub file: String,
    /// 1-based line number within `file`.
    pub line: usize,
    /// The line's text.
    pub text: String,
}

/// Resolves an `.include "name"` directive to the file's lines. Lets
/// callers plug in either real filesystem access (searching
/// [`crate::config::Config::include_path`]) or an in-memory fixture for
/// tests.
pub trait IncludeResolver {
    /// Returns the lines of the file named `name`, and a canonical name
    /// used for cycle detection (e.g. an absolute path).
    fn resolve(&self, name: &str) -> Result<(String, Vec<String>), AssemblerError>;
}

/// An [`IncludeResolver`] backed by an in-memory map, for tests and for
/// hosts that keep all sources in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryResolver(pub HashMap<String, Vec<String>>);

impl IncludeResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> Result<(String, Vec<String>), AssemblerError> {
        self.0
            .get(name)
            .map(|lines| (name.to_string(), lines.clone()))
            .ok_or_else(|| AssemblerError::ErrorDirective {
                file: name.to_string(),
                line: 0,
                message: format!("include target `{name}` not found"),
            })
    }
}

/// An [`IncludeResolver`] backed by the filesystem: searches
/// [`crate::config::Config::include_path`], in order, for a file named
/// `name`; the canonical name used for cycle detection is the resolved
/// path.
#[derive(Debug, Clone)]
pub struct FsResolver {
    /// Directories searched, in order.
    pub include_path: Vec<PathBuf>,
}

impl FsResolver {
    /// Builds a resolver from a [`crate::config::Config`]'s include path.
    pub fn new(include_path: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            include_path: include_path.into_iter().map(Into::into).collect(),
        }
    }
}

impl IncludeResolver for FsResolver {
    fn resolve(&self, name: &str) -> Result<(String, Vec<String>), AssemblerError> {
        let candidates = std::iter::once(PathBuf::from(name))
            .chain(self.include_path.iter().map(|dir| dir.join(name)));
        for candidate in candidates {
            if let Ok(contents) = fs::read_to_string(&candidate) {
                let lines = contents.lines().map(|l| l.trim_end_matches('\r').to_string()).collect();
                return Ok((candidate.display().to_string(), lines));
            }
        }
        Err(AssemblerError::ErrorDirective {
            file: name.to_string(),
            line: 0,
            message: format!(
                "include target `{name}` not found in `.` or {:?}",
                self.include_path.iter().map(Path::display).map(|p| p.to_string()).collect::<Vec<_>>()
            ),
        })
    }
}

/// Expands `.include` directives, recursively, failing on a cycle.
pub fn expand_includes(
    file: &str,
    lines: &[String],
    resolver: &dyn IncludeResolver,
) -> Result<Vec<Line>, AssemblerError> {
    let mut stack = vec![file.to_string()];
    expand_includes_inner(file, lines, resolver, &mut stack)
}

fn expand_includes_inner(
    file: &str,
    lines: &[String],
    resolver: &dyn IncludeResolver,
    stack: &mut Vec<String>,
) -> Result<Vec<Line>, AssemblerError> {
    let mut out = Vec::new();
    for (idx, text) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let trimmed = text.trim();
        if let Some(rest) = trimmed.strip_prefix(".include") {
            let name = rest.trim().trim_matches('"').to_string();
            if stack.contains(&name) {
                return Err(AssemblerError::IncludeCycle(format!(
                    "{} -> {name}",
                    stack.join(" -> ")
                )));
            }
            let (canonical, included_lines) = resolver.resolve(&name)?;
            stack.push(canonical.clone());
            let expanded = expand_includes_inner(&canonical, &included_lines, resolver, stack)?;
            stack.pop();
            out.extend(expanded);
        } else {
            out.push(Line {
                file: file.to_string(),
                line: line_no,
                text: text.clone(),
            });
        }
    }
    Ok(out)
}

/// Collects `.define NAME value` directives and substitutes whole-word
/// occurrences of `NAME` with `value` in every remaining line. Definition
/// lines themselves are dropped from the output.
pub fn substitute_defines(lines: Vec<Line>) -> Result<Vec<Line>, AssemblerError> {
    let mut defines: HashMap<String, String> = HashMap::new();
    let mut body = Vec::with_capacity(lines.len());

    for line in lines {
        let trimmed = line.text.trim();
        if let Some(rest) = trimmed.strip_prefix(".define") {
            let mut parts = rest.trim().splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or_default().trim();
            let value = parts.next().unwrap_or_default().trim();
            if name.is_empty() || value.is_empty() {
                return Err(AssemblerError::ErrorDirective {
                    file: line.file,
                    line: line.line,
                    message: "`.define` requires a name and a value".to_string(),
                });
            }
            defines.insert(name.to_string(), value.to_string());
        } else {
            body.push(line);
        }
    }

    Ok(body
        .into_iter()
        .map(|line| Line {
            text: substitute_tokens(&line.text, &defines),
            ..line
        })
        .collect())
}

fn substitute_tokens(text: &str, defines: &HashMap<String, String>) -> String {
    if defines.is_empty() {
        return text.to_string();
    }
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = text[i..].chars().next().unwrap();
        if is_word_char(c) && (i == 0 || !is_word_char(text[..i].chars().next_back().unwrap())) {
            let start = i;
            let mut end = i;
            for (idx, ch) in text[start..].char_indices() {
                if is_word_char(ch) {
                    end = start + idx + ch.len_utf8();
                } else {
                    break;
                }
            }
            let word = &text[start..end];
            match defines.get(word) {
                Some(value) => out.push_str(value),
                None => out.push_str(word),
            }
            i = end;
        } else {
            out.push(c);
            i += c.len_utf8();
        }
    }
    out
}

/// Expands `.block N` (N zero data words) and `.data "text"` (packed
/// ASCII bytes, big-endian, zero-padded) into literal `.data
/// 0xHHHHHHHH` lines. All other lines pass through unchanged.
pub fn expand_data_directives(lines: Vec<Line>) -> Result<Vec<Line>, AssemblerError> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let trimmed = line.text.trim();
        if let Some(rest) = trimmed.strip_prefix(".block") {
            let count: usize = rest.trim().parse().map_err(|_| AssemblerError::ErrorDirective {
                file: line.file.clone(),
                line: line.line,
                message: format!("`.block` operand `{}` is not a number", rest.trim()),
            })?;
            for _ in 0..count {
                out.push(Line {
                    file: line.file.clone(),
                    line: line.line,
                    text: ".data 0x00000000".to_string(),
                });
            }
        } else if let Some(rest) = trimmed.strip_prefix(".data") {
            let rest = rest.trim();
            if let Some(literal) = rest.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
                for chunk in literal.as_bytes().chunks(4) {
                    let mut word_bytes = [0u8; 4];
                    word_bytes[..chunk.len()].copy_from_slice(chunk);
                    let word = u32::from_be_bytes(word_bytes);
                    out.push(Line {
                        file: line.file.clone(),
                        line: line.line,
                        text: format!(".data {word:#010x}"),
                    });
                }
            } else {
                // `.data w1 w2 ...`: one literal word per line downstream.
                for token in rest.split_whitespace() {
                    out.push(Line {
                        file: line.file.clone(),
                        line: line.line,
                        text: format!(".data {token}"),
                    });
                }
            }
        } else {
            out.push(line);
        }
    }
    Ok(out)
}
