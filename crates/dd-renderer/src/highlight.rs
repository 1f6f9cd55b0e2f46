//! Syntax highlighting of code blocks.
//!
//! A [`Highlighter`] splits code into `(text, style)` tokens. Token styles are
//! written in the Pygments convention, e.g. `"bold #008000"` or
//! `"italic bg:#f8f8f8"`, and parsed with [`TokenStyle::parse`].

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use dd_deck::Color;
use regex::Regex;

use crate::error::RenderError;

/// A highlighted piece of code.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub text: String,
    pub style: TokenStyle,
}

impl Token {
    fn new(text: &str, style: TokenStyle) -> Self {
        Self {
            text: text.to_owned(),
            style,
        }
    }
}

/// Font attributes of a token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<Color>,
    /// Text background. Runs cannot carry one; renderers drop it.
    pub bg_color: Option<Color>,
    /// Text border. Runs cannot carry one; renderers drop it.
    pub border: Option<Color>,
}

impl TokenStyle {
    /// Parse a Pygments style string.
    ///
    /// Unknown words (`noinherit`, font families, ...) are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use dd_deck::Color;
    /// use dd_renderer::TokenStyle;
    ///
    /// let style = TokenStyle::parse("bold nounderline #008000 bg:#f8f8f8");
    /// assert_eq!(style.bold, Some(true));
    /// assert_eq!(style.underline, Some(false));
    /// assert_eq!(style.color, Some(Color::rgb(0, 0x80, 0)));
    /// assert_eq!(style.bg_color, Some(Color::rgb(0xf8, 0xf8, 0xf8)));
    /// ```
    #[must_use]
    pub fn parse(style: &str) -> Self {
        let mut parsed = Self::default();
        for word in style.split_whitespace() {
            match word {
                "bold" => parsed.bold = Some(true),
                "nobold" => parsed.bold = Some(false),
                "italic" => parsed.italic = Some(true),
                "noitalic" => parsed.italic = Some(false),
                "underline" => parsed.underline = Some(true),
                "nounderline" => parsed.underline = Some(false),
                _ => {
                    if let Some(bg) = word.strip_prefix("bg:") {
                        parsed.bg_color = hex_color(bg);
                    } else if let Some(border) = word.strip_prefix("border:") {
                        parsed.border = hex_color(border);
                    } else if word.starts_with('#') {
                        parsed.color = hex_color(word);
                    }
                }
            }
        }
        parsed
    }
}

fn hex_color(word: &str) -> Option<Color> {
    Color::from_hex(word.strip_prefix('#')?)
}

/// Splits code into styled tokens.
pub trait Highlighter {
    /// Highlight `code` written in `language`.
    ///
    /// The token texts concatenate back to `code`.
    fn highlight(&self, code: &str, language: &str) -> Result<Vec<Token>, RenderError>;
}

/// Styles of the token categories, as Pygments style strings.
#[derive(Clone, Debug)]
pub struct Theme {
    pub comment: String,
    pub keyword: String,
    pub string: String,
    pub number: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            comment: "italic #408080".to_owned(),
            keyword: "bold #008000".to_owned(),
            string: "#BA2121".to_owned(),
            number: "#666666".to_owned(),
        }
    }
}

struct LanguageRules {
    name: &'static str,
    keywords: &'static [&'static str],
    line_comment: Option<&'static str>,
    block_comment: Option<(&'static str, &'static str)>,
}

const GENERIC: LanguageRules = LanguageRules {
    name: "generic",
    keywords: &[],
    line_comment: None,
    block_comment: None,
};

const PYTHON: LanguageRules = LanguageRules {
    name: "python",
    keywords: &[
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "False", "finally", "for", "from", "global", "if", "import",
        "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass", "raise", "return",
        "True", "try", "while", "with", "yield",
    ],
    line_comment: Some("#"),
    block_comment: None,
};

const RUST: LanguageRules = LanguageRules {
    name: "rust",
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
};

const C_LIKE: LanguageRules = LanguageRules {
    name: "c-like",
    keywords: &[
        "break", "case", "catch", "class", "const", "continue", "default", "delete", "do",
        "else", "enum", "export", "extends", "false", "final", "for", "function", "func", "go",
        "if", "import", "interface", "let", "new", "null", "package", "private", "protected",
        "public", "return", "static", "struct", "switch", "this", "throw", "true", "try",
        "typedef", "var", "void", "while",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
};

const SHELL: LanguageRules = LanguageRules {
    name: "shell",
    keywords: &[
        "case", "do", "done", "elif", "else", "esac", "export", "fi", "for", "function", "if",
        "in", "local", "return", "then", "until", "while",
    ],
    line_comment: Some("#"),
    block_comment: None,
};

const SQL: LanguageRules = LanguageRules {
    name: "sql",
    keywords: &[
        "AND", "AS", "BY", "CREATE", "DELETE", "FROM", "GROUP", "INSERT", "INTO", "JOIN", "NOT",
        "NULL", "ON", "OR", "ORDER", "SELECT", "SET", "TABLE", "UPDATE", "VALUES", "WHERE",
    ],
    line_comment: Some("--"),
    block_comment: Some(("/*", "*/")),
};

const CONFIG: LanguageRules = LanguageRules {
    name: "config",
    keywords: &["true", "false", "null"],
    line_comment: Some("#"),
    block_comment: None,
};

const ALL_RULES: [&LanguageRules; 7] = [&GENERIC, &PYTHON, &RUST, &C_LIKE, &SHELL, &SQL, &CONFIG];

/// Token patterns of every rule set, compiled on first use.
/// Token patterns of every rule set, compiled once.
static PATTERNS: LazyLock<HashMap<&'static str, Result<Regex, regex::Error>>> =
    LazyLock::new(|| {
        ALL_RULES
            .iter()
            .map(|rules| (rules.name, Regex::new(&pattern(rules))))
            .collect()
    });

fn rules_for(language: &str) -> &'static LanguageRules {
    match language.to_ascii_lowercase().as_str() {
        "python" | "py" | "python3" => &PYTHON,
        "rust" | "rs" => &RUST,
        "c" | "cpp" | "c++" | "java" | "javascript" | "js" | "typescript" | "ts" | "go"
        | "kotlin" | "swift" | "csharp" | "cs" => &C_LIKE,
        "sh" | "bash" | "shell" | "zsh" => &SHELL,
        "sql" => &SQL,
        "toml" | "yaml" | "yml" | "ini" => &CONFIG,
        _ => &GENERIC,
    }
}

fn pattern(rules: &LanguageRules) -> String {
    let mut comments = Vec::new();
    if let Some((open, close)) = rules.block_comment {
        comments.push(format!(
            "{}(?s:.*?){}",
            regex::escape(open),
            regex::escape(close)
        ));
    }
    if let Some(prefix) = rules.line_comment {
        comments.push(format!("{}[^\\n]*", regex::escape(prefix)));
    }

    let mut alternatives = Vec::new();
    if !comments.is_empty() {
        alternatives.push(format!("(?P<comment>{})", comments.join("|")));
    }
    alternatives.push(r#"(?P<string>"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*')"#.to_owned());
    alternatives.push(r"(?P<number>\b\d+(?:\.\d+)?\b)".to_owned());
    alternatives.push(r"(?P<word>[A-Za-z_][A-Za-z0-9_]*)".to_owned());
    alternatives.join("|")
}

/// Regex-based highlighter with per-language keyword and comment rules.
///
/// Unknown languages fall back to strings and numbers only.
#[derive(Clone, Debug, Default)]
pub struct RegexHighlighter {
    theme: Theme,
}

impl RegexHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

impl Highlighter for RegexHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<Vec<Token>, RenderError> {
        let rules = rules_for(language);
        let regex = match PATTERNS.get(rules.name) {
            Some(Ok(regex)) => regex,
            Some(Err(e)) => {
                return Err(RenderError::Highlight {
                    language: language.to_owned(),
                    message: e.to_string(),
                });
            }
            None => {
                return Err(RenderError::Highlight {
                    language: language.to_owned(),
                    message: format!("no token pattern for {}", rules.name),
                });
            }
        };
        let keywords: HashSet<&str> = rules.keywords.iter().copied().collect();

        let comment = TokenStyle::parse(&self.theme.comment);
        let keyword = TokenStyle::parse(&self.theme.keyword);
        let string = TokenStyle::parse(&self.theme.string);
        let number = TokenStyle::parse(&self.theme.number);

        let mut tokens = Vec::new();
        let mut plain_start = 0;
        for caps in regex.captures_iter(code) {
            let (m, style) = if let Some(m) = caps.name("comment") {
                (m, &comment)
            } else if let Some(m) = caps.name("string") {
                (m, &string)
            } else if let Some(m) = caps.name("number") {
                (m, &number)
            } else if let Some(m) = caps.name("word").filter(|m| keywords.contains(m.as_str())) {
                (m, &keyword)
            } else {
                continue;
            };
            if m.start() > plain_start {
                tokens.push(Token::new(&code[plain_start..m.start()], TokenStyle::default()));
            }
            tokens.push(Token::new(m.as_str(), style.clone()));
            plain_start = m.end();
        }
        if plain_start < code.len() {
            tokens.push(Token::new(&code[plain_start..], TokenStyle::default()));
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_parse_style_words() {
        let style = TokenStyle::parse("italic noinherit nobold underline border:#000000 #BA2121");
        assert_eq!(
            style,
            TokenStyle {
                bold: Some(false),
                italic: Some(true),
                underline: Some(true),
                color: Some(Color::rgb(0xba, 0x21, 0x21)),
                bg_color: None,
                border: Some(Color::rgb(0, 0, 0)),
            }
        );
    }

    #[test]
    fn test_parse_empty_background() {
        let style = TokenStyle::parse("bg: border");
        assert_eq!(style, TokenStyle::default());
    }

    #[test]
    fn test_python_tokens() {
        let code = "def f(x):\n    return 'hi'  # done";
        let tokens = RegexHighlighter::new().highlight(code, "python").unwrap();
        assert_eq!(joined(&tokens), code);

        assert_eq!(tokens[0].text, "def");
        assert_eq!(tokens[0].style.bold, Some(true));
        let string = tokens.iter().find(|t| t.text == "'hi'").unwrap();
        assert_eq!(string.style.color, Some(Color::rgb(0xba, 0x21, 0x21)));
        let comment = tokens.last().unwrap();
        assert_eq!(comment.text, "# done");
        assert_eq!(comment.style.italic, Some(true));
    }

    #[test]
    fn test_rust_block_comment() {
        let code = "/* a\nb */ let n = 42;";
        let tokens = RegexHighlighter::new().highlight(code, "rust").unwrap();
        assert_eq!(joined(&tokens), code);
        assert_eq!(tokens[0].text, "/* a\nb */");
        assert!(tokens.iter().any(|t| t.text == "42" && t.style.color.is_some()));
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let code = "frobnicate \"x\" 7 # not a comment";
        let tokens = RegexHighlighter::new().highlight(code, "brainfunk").unwrap();
        assert_eq!(joined(&tokens), code);
        assert!(tokens.iter().all(|t| t.style.italic.is_none()));
        assert!(tokens.iter().any(|t| t.text == "\"x\""));
    }

    #[test]
    fn test_every_rule_set_compiles() {
        for rules in ALL_RULES {
            assert!(
                matches!(PATTERNS.get(rules.name), Some(Ok(_))),
                "{}",
                rules.name
            );
        }
    }

    #[test]
    fn test_trailing_spaces_are_a_plain_token() {
        let tokens = RegexHighlighter::new().highlight("x = 1  ", "python").unwrap();
        assert_eq!(tokens.last().unwrap().text, "  ");
    }

    #[test]
    fn test_custom_theme() {
        let theme = Theme {
            keyword: "underline".to_owned(),
            ..Theme::default()
        };
        let tokens = RegexHighlighter::new()
            .with_theme(theme)
            .highlight("fn main", "rust")
            .unwrap();
        assert_eq!(tokens[0].style.underline, Some(true));
        assert_eq!(tokens[0].style.bold, None);
    }
}
