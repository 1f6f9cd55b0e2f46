//! Marker line parsing: `:::name[argument]{options}` or `:::name options`.

use super::DirectiveArgs;

/// The six directives of the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveName {
    Box,
    Img,
    Title,
    Slide,
    TextStyle,
    SetStyle,
}

impl DirectiveName {
    /// Look up a directive by its marker name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "box" => Some(Self::Box),
            "img" => Some(Self::Img),
            "title" => Some(Self::Title),
            "slide" => Some(Self::Slide),
            "textstyle" => Some(Self::TextStyle),
            "setstyle" => Some(Self::SetStyle),
            _ => None,
        }
    }

    /// Marker name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Img => "img",
            Self::Title => "title",
            Self::Slide => "slide",
            Self::TextStyle => "textstyle",
            Self::SetStyle => "setstyle",
        }
    }

    /// Whether the directive takes an indented markdown body.
    #[must_use]
    pub fn has_body(self) -> bool {
        matches!(self, Self::Box | Self::TextStyle)
    }
}

/// A recognized marker line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Marker {
    pub(crate) name: DirectiveName,
    pub(crate) args: DirectiveArgs,
}

/// Parse a marker line.
///
/// Returns `None` for lines that are not markers, including markers naming
/// an unknown directive and bare `:::` terminators.
pub(crate) fn parse_marker(line: &str) -> Option<Marker> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = line[indent..].trim_end().strip_prefix(":::")?;
    if rest.starts_with(':') {
        return None;
    }
    let rest = rest.trim_start();

    let name_end = rest
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(rest.len());
    let name = &rest[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }
    let Some(directive) = DirectiveName::from_name(name) else {
        tracing::debug!(name, "Unknown directive left as text");
        return None;
    };

    let after_name = &rest[name_end..];
    let (argument, consumed) = parse_brackets(after_name);
    let after_argument = after_name[consumed..].trim_start();
    let options = match parse_braces(after_argument) {
        (attrs, consumed) if consumed > 0 => attrs,
        _ => after_argument.to_owned(),
    };

    Some(Marker {
        name: directive,
        args: DirectiveArgs::parse(&argument, &options),
    })
}

/// Whether a line is a bare `:::` terminator.
pub(crate) fn is_terminator(line: &str) -> bool {
    line.trim() == ":::"
}

fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Parse `[argument]`, handling nested brackets.
///
/// Returns the content and the number of bytes consumed.
fn parse_brackets(s: &str) -> (String, usize) {
    parse_delimited(s, '[', ']')
}

/// Parse `{options}`, handling nested braces.
fn parse_braces(s: &str) -> (String, usize) {
    parse_delimited(s, '{', '}')
}

fn parse_delimited(s: &str, open: char, close: char) -> (String, usize) {
    if !s.starts_with(open) {
        return (String::new(), 0);
    }

    let mut depth = 0;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (s[1..i].to_owned(), i + 1);
            }
        }
    }
    (String::new(), 0)
}
