//! Comment injection: re-attach a model's comments to emitter output.
//!
//! The emitter writes plain YAML with no comments. This module scans that text
//! once, top to bottom, reconstructing the key path of every section header
//! from its indentation, and writes inline and block comments next to the
//! headers whose path has one.
//!
//! Assumptions about the input, all of which hold for `serde_yaml` output of
//! a [`StructuralModel`]:
//!
//! - one nesting level is exactly [`INDENT_WIDTH`] spaces;
//! - a header is either `key: value` or a bare `key:` opening a section;
//! - keys never contain `:` or `#` (enforced when a schema is built);
//! - continuation lines of a block scalar (`|`, `>`) are indented deeper than
//!   the key that opened them.
//!
//! Text from any other source is outside what this scanner can annotate.

use std::fmt::Write as _;

use tracing::warn;

use crate::model::StructuralModel;
use crate::path::KeyPath;

/// Spaces per nesting level in emitter output.
pub const INDENT_WIDTH: usize = 2;
/// Marker that starts a YAML comment.
pub const COMMENT_MARKER: char = '#';
/// Character that ends a key on a header line.
pub const SECTION_START: char = ':';

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Return `plain` with the model's comments injected.
pub fn annotate(plain: &str, model: &StructuralModel) -> String {
    let mut out = String::with_capacity(plain.len() * 2);
    let mut path = KeyPath::root();
    let mut at_beginning = true;
    // The block scalar being copied, if any.
    let mut block_scalar: Option<BlockScalar> = None;
    // Blank lines right after a keep-chomped block belong to its value.
    let mut after_kept_block = false;

    for line in plain.lines() {
        if at_beginning && line.trim_start().starts_with(COMMENT_MARKER) {
            continue;
        }
        at_beginning = false;

        let indent = leading_spaces(line);
        if let Some(open) = block_scalar {
            if line.trim().is_empty() || indent > open.indent {
                push_line(&mut out, line);
                continue;
            }
            block_scalar = None;
            after_kept_block = open.keep;
        }

        if !is_section_header(line) {
            push_line(&mut out, line);
            continue;
        }

        let depth = indent / INDENT_WIDTH;
        if depth > path.depth() {
            warn!(
                line,
                depth,
                expected = path.depth(),
                "header nested more than one level below the previous one"
            );
        }
        path.truncate(depth);
        path.push(section_name(line));

        if let Some(lines) = model.block_comment(&path) {
            let separate = !out.is_empty() && !after_kept_block;
            write_block_comment(&mut out, &line[..indent], lines, separate);
        }
        after_kept_block = false;
        block_scalar = opens_block_scalar(line).map(|keep| BlockScalar { indent, keep });
        out.push_str(line);
        if let Some(comment) = model.inline_comment(&path) {
            let _ = write!(out, " {COMMENT_MARKER} {comment}");
        }
        out.push_str(LINE_ENDING);
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(LINE_ENDING);
}

/// A literal or folded scalar opened by a header line.
#[derive(Clone, Copy)]
struct BlockScalar {
    /// Indentation of the header that opened it.
    indent: usize,
    /// `+` chomping: trailing blank lines are part of the value.
    keep: bool,
}

/// Block comments take the indentation of the line they describe and are
/// preceded by a blank line when `separate` is set.
fn write_block_comment(out: &mut String, indent: &str, lines: &[String], separate: bool) {
    if separate {
        out.push_str(LINE_ENDING);
    }
    for line in lines {
        let _ = write!(out, "{indent}{COMMENT_MARKER} {line}{LINE_ENDING}");
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// `key: value`, or a bare `key:` opening a nested section.
fn is_section_header(line: &str) -> bool {
    line.contains(": ") || (line.len() > 1 && line.ends_with(SECTION_START))
}

/// Everything between the indentation and the first `:`, unquoted if the
/// emitter wrapped the key in quotes.
fn section_name(line: &str) -> String {
    let trimmed = line.trim_start_matches(' ');
    let name = trimmed
        .split_once(SECTION_START)
        .map_or(trimmed, |(name, _)| name);
    unquote(name)
}

fn unquote(name: &str) -> String {
    if name.len() >= 2 {
        if let Some(inner) = name.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
            return inner.replace("''", "'");
        }
        if let Some(inner) = name.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
            return unescape_double_quoted(inner);
        }
    }
    name.to_string()
}

/// Undo the escapes the emitter can produce for a key. Control characters
/// are rejected when a schema is built, so only `\\` and `\"` remain.
fn unescape_double_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match (c, chars.clone().next()) {
            ('\\', Some(next @ ('\\' | '"'))) => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// If the value on this header line starts a literal or folded block,
/// whether the block keeps its trailing blank lines.
fn opens_block_scalar(line: &str) -> Option<bool> {
    let (_, value) = line.split_once(": ")?;
    let indicator = value.trim_start().split_whitespace().next()?;
    indicator
        .starts_with(['|', '>'])
        .then(|| indicator.contains('+'))
}
