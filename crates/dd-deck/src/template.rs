//! Slide templates.
//!
//! A template fixes the slide size and lists the named layouts slides can be
//! created from. Every layout has a title region; content layouts also have a
//! body region that receives paragraphs, tables and pictures.

use std::path::Path;

use serde::Deserialize;

use crate::{DeckError, Emu, EMU_PER_INCH, Rect};

/// A named slide layout.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LayoutTemplate {
    /// Layout name, matched exactly when adding a slide.
    pub name: String,
    /// Title placeholder geometry.
    pub title: Rect,
    /// Body placeholder geometry, if the layout has a content region.
    #[serde(default)]
    pub body: Option<Rect>,
}

/// Slide size and available layouts.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Template {
    /// Slide width in EMU.
    pub slide_width: Emu,
    /// Slide height in EMU.
    pub slide_height: Emu,
    /// Layouts in template order.
    pub layouts: Vec<LayoutTemplate>,
}

impl Template {
    /// Load a template from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not valid TOML, or
    /// describes an empty slide or duplicate layout names.
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        if !path.exists() {
            return Err(DeckError::TemplateNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let template = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            layouts = template.layouts.len(),
            "Loaded slide template"
        );
        Ok(template)
    }

    /// Parse a template from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self, DeckError> {
        let template: Self = toml::from_str(content)?;
        template.validate()?;
        Ok(template)
    }

    fn validate(&self) -> Result<(), DeckError> {
        if self.slide_width.get() <= 0 || self.slide_height.get() <= 0 {
            return Err(DeckError::InvalidTemplate(
                "slide_width and slide_height must be positive".to_owned(),
            ));
        }
        for (i, layout) in self.layouts.iter().enumerate() {
            if self.layouts[..i].iter().any(|l| l.name == layout.name) {
                return Err(DeckError::InvalidTemplate(format!(
                    "duplicate layout name: {}",
                    layout.name
                )));
            }
        }
        Ok(())
    }

    /// Find a layout by name.
    #[must_use]
    pub fn layout(&self, name: &str) -> Option<&LayoutTemplate> {
        self.layouts.iter().find(|l| l.name == name)
    }

    /// Built-in 16:9 template (13.333in x 7.5in).
    ///
    /// Provides "Title Slide", "Section Header", "Title and Content" and
    /// "Title Only" layouts. Only "Title and Content" has a body region.
    #[must_use]
    pub fn builtin() -> Self {
        let inch = |v: f64| Emu::from_inches(v);
        let width = Emu(13 * EMU_PER_INCH + EMU_PER_INCH / 3);
        let height = inch(7.5);
        let full_title = Rect::new(inch(0.92), inch(0.4), inch(11.5), inch(1.45));
        Self {
            slide_width: width,
            slide_height: height,
            layouts: vec![
                LayoutTemplate {
                    name: "Title Slide".to_owned(),
                    title: Rect::new(inch(1.67), inch(1.23), inch(10.0), inch(2.61)),
                    body: None,
                },
                LayoutTemplate {
                    name: "Section Header".to_owned(),
                    title: Rect::new(inch(0.91), inch(1.87), inch(11.5), inch(3.12)),
                    body: None,
                },
                LayoutTemplate {
                    name: "Title and Content".to_owned(),
                    title: full_title,
                    body: Some(Rect::new(inch(0.92), inch(2.0), inch(11.5), inch(4.76))),
                },
                LayoutTemplate {
                    name: "Title Only".to_owned(),
                    title: full_title,
                    body: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_template() {
        let toml = r#"
slide_width = 9144000
slide_height = 6858000

[[layouts]]
name = "Cover"
title = { left = 0, top = 0, width = 9144000, height = 1000000 }

[[layouts]]
name = "Content"
title = { left = 0, top = 0, width = 9144000, height = 1000000 }
body = { left = 0, top = 1000000, width = 9144000, height = 5000000 }
"#;
        let template = Template::parse(toml).unwrap();
        assert_eq!(template.slide_width, Emu(9_144_000));
        assert_eq!(template.layouts.len(), 2);
        assert!(template.layout("Cover").unwrap().body.is_none());
        assert_eq!(
            template.layout("Content").unwrap().body,
            Some(Rect::new(Emu(0), Emu(1_000_000), Emu(9_144_000), Emu(5_000_000)))
        );
        assert!(template.layout("Missing").is_none());
    }

    #[test]
    fn test_rejects_duplicate_layouts() {
        let toml = r#"
slide_width = 100
slide_height = 100

[[layouts]]
name = "A"
title = { left = 0, top = 0, width = 10, height = 10 }

[[layouts]]
name = "A"
title = { left = 0, top = 0, width = 10, height = 10 }
"#;
        let err = Template::parse(toml).unwrap_err();
        assert!(matches!(err, DeckError::InvalidTemplate(_)));
    }

    #[test]
    fn test_rejects_empty_slide() {
        let toml = "slide_width = 0\nslide_height = 100\nlayouts = []\n";
        assert!(Template::parse(toml).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Template::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, DeckError::TemplateNotFound(_)));
    }

    #[test]
    fn test_builtin_layouts() {
        let template = Template::builtin();
        assert_eq!(template.slide_width, Emu(12_192_000));
        assert_eq!(template.slide_height, Emu(6_858_000));
        assert!(template.layout("Section Header").unwrap().body.is_none());
        assert!(template.layout("Title and Content").unwrap().body.is_some());
    }
}
