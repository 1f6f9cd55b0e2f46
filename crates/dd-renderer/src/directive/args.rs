//! Directive option list parsing.
//!
//! Parses the `[argument] key=value key="quoted value"` tail of a marker line.

/// Raw arguments of a directive marker line.
///
/// Options keep their first-seen position; a repeated key overwrites the
/// earlier value in place.
///
/// # Example
///
/// ```
/// use dd_renderer::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse("photo.png", r#"width=50% title="A b""#);
/// assert_eq!(args.argument, "photo.png");
/// assert_eq!(args.get("width"), Some("50%"));
/// assert_eq!(args.get("title"), Some("A b"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// Positional argument: `[argument]` or the first bare word.
    pub argument: String,
    /// Options in insertion order.
    pub options: Vec<(String, String)>,
}

impl DirectiveArgs {
    /// Parse an argument and an option string.
    ///
    /// # Arguments
    ///
    /// * `argument` - Content of `[...]` after the name (may be empty)
    /// * `options_str` - Options, with or without surrounding braces removed
    #[must_use]
    pub fn parse(argument: &str, options_str: &str) -> Self {
        let mut args = Self {
            argument: argument.to_owned(),
            ..Default::default()
        };

        let mut remaining = options_str.trim();

        while !remaining.is_empty() {
            if let Some((key, value, rest)) = parse_key_value(remaining) {
                args.insert(key, value);
                remaining = rest.trim_start();
            } else {
                // Bare word: becomes the argument if none was bracketed
                let end = remaining
                    .find(char::is_whitespace)
                    .unwrap_or(remaining.len());
                if args.argument.is_empty() {
                    args.argument = remaining[..end].to_owned();
                } else {
                    tracing::debug!(word = &remaining[..end], "Ignoring stray directive word");
                }
                remaining = remaining[end..].trim_start();
            }
        }

        args
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.options.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => value.clone_into(slot),
            None => self.options.push((key.to_owned(), value.to_owned())),
        }
    }

    /// Get an option value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse a key-value pair from the start of the options string.
///
/// Supports: `key="value"`, `key='value'`, `key=value`. Returns `None` if the
/// next word has no `=`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let word_end = s.find(char::is_whitespace).unwrap_or(s.len());
    let eq_pos = s[..word_end].find('=')?;
    let key = &s[..eq_pos];

    if key.is_empty() {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_args() {
        let args = DirectiveArgs::parse("", "");
        assert_eq!(args.argument, "");
        assert!(args.options.is_empty());
    }

    #[test]
    fn test_argument_only() {
        let args = DirectiveArgs::parse("images/a.png", "");
        assert_eq!(args.argument, "images/a.png");
    }

    #[test]
    fn test_bare_word_becomes_argument() {
        let args = DirectiveArgs::parse("", "images/a.png width=2in");
        assert_eq!(args.argument, "images/a.png");
        assert_eq!(args.get("width"), Some("2in"));
    }

    #[test]
    fn test_bare_word_ignored_after_bracket_argument() {
        let args = DirectiveArgs::parse("a.png", "b.png width=2in");
        assert_eq!(args.argument, "a.png");
        assert_eq!(args.options.len(), 1);
    }

    #[test]
    fn test_double_quoted_value() {
        let args = DirectiveArgs::parse("", r#"layout="Title Only""#);
        assert_eq!(args.get("layout"), Some("Title Only"));
    }

    #[test]
    fn test_single_quoted_value() {
        let args = DirectiveArgs::parse("", "font_name='Fira Sans'");
        assert_eq!(args.get("font_name"), Some("Fira Sans"));
    }

    #[test]
    fn test_unquoted_value() {
        let args = DirectiveArgs::parse("", "left=10%");
        assert_eq!(args.get("left"), Some("10%"));
    }

    #[test]
    fn test_empty_quoted_value() {
        let args = DirectiveArgs::parse("", r#"background="""#);
        assert_eq!(args.get("background"), Some(""));
    }

    #[test]
    fn test_insertion_order() {
        let args = DirectiveArgs::parse("", "top=1 left=2 width=3");
        let keys: Vec<_> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["top", "left", "width"]);
    }

    #[test]
    fn test_duplicate_keeps_last_in_first_position() {
        let args = DirectiveArgs::parse("", "left=1in top=2in left=3in");
        assert_eq!(
            args.options,
            vec![
                ("left".to_owned(), "3in".to_owned()),
                ("top".to_owned(), "2in".to_owned()),
            ]
        );
    }

    #[test]
    fn test_unclosed_quote_treated_as_word() {
        let args = DirectiveArgs::parse("", r#"title="open"#);
        assert_eq!(args.get("title"), None);
        assert_eq!(args.argument, r#"title="open"#);
    }

    #[test]
    fn test_get_nonexistent() {
        let args = DirectiveArgs::parse("", "foo=bar");
        assert_eq!(args.get("baz"), None);
    }
}
