//! Block-level scanner splitting a document into markdown runs and
//! directive blocks.

use super::fence::FenceTracker;
use super::parser::{DirectiveName, is_terminator, parse_marker};
use super::DirectiveArgs;

/// A top-level piece of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Block {
    /// Plain markdown between directives.
    Markdown(String),
    /// A directive with its dedented body (empty for body-less directives).
    Directive {
        name: DirectiveName,
        args: DirectiveArgs,
        body: String,
    },
}

/// Split `input` into markdown and directive blocks.
///
/// Marker lines inside fenced code are left to the markdown parser.
pub(crate) fn split_blocks(input: &str) -> Vec<Block> {
    let lines: Vec<&str> = input.lines().collect();
    let mut blocks = Vec::new();
    let mut markdown = String::new();
    let mut fence = FenceTracker::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        idx += 1;

        let was_in_fence = fence.in_fence();
        if fence.update(line) || was_in_fence {
            push_line(&mut markdown, line);
            continue;
        }

        let Some(marker) = parse_marker(line) else {
            push_line(&mut markdown, line);
            continue;
        };

        if !markdown.is_empty() {
            blocks.push(Block::Markdown(std::mem::take(&mut markdown)));
        }

        let body = if marker.name.has_body() {
            let (body, consumed) = take_body(&lines[idx..]);
            idx += consumed;
            body
        } else {
            String::new()
        };

        blocks.push(Block::Directive {
            name: marker.name,
            args: marker.args,
            body,
        });
    }

    if !markdown.is_empty() {
        blocks.push(Block::Markdown(markdown));
    }
    blocks
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push('\n');
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Collect the indented body following a marker line.
///
/// Returns the dedented body and the number of lines consumed, including a
/// trailing `:::` terminator if present.
fn take_body(lines: &[&str]) -> (String, usize) {
    let end = lines
        .iter()
        .position(|line| !line.trim().is_empty() && !is_indented(line))
        .unwrap_or(lines.len());

    let indent = lines[..end]
        .iter()
        .find(|line| !line.trim().is_empty())
        .map_or(0, |line| indent_width(line));

    let mut body = String::new();
    for line in &lines[..end] {
        if line.trim().is_empty() {
            body.push('\n');
            continue;
        }
        let strip = indent_width(line).min(indent);
        push_line(&mut body, &line[strip..]);
    }
    let body = body.trim_matches('\n');
    let body = if body.is_empty() {
        String::new()
    } else {
        format!("{body}\n")
    };

    let consumed = match lines.get(end) {
        Some(line) if is_terminator(line) => end + 1,
        _ => end,
    };
    (body, consumed)
}
