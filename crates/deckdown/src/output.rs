//! Build status lines on stderr.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

/// Reports build progress. Styling is dropped when stderr is not a terminal.
pub(crate) struct Output {
    term: Term,
    done: Style,
    failed: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            done: Style::new().green(),
            failed: Style::new().red().bold(),
        }
    }

    /// Report the template a verbose build loads.
    pub(crate) fn template(&self, path: &Path) {
        self.line(format!("Template: {}", path.display()));
    }

    /// Report the saved deck.
    pub(crate) fn wrote(&self, path: &Path) {
        self.line(self.done.apply_to(format!("Wrote {}", path.display())));
    }

    pub(crate) fn failed(&self, err: &impl Display) {
        self.line(self.failed.apply_to(format!("Error: {err}")));
    }

    fn line(&self, msg: impl Display) {
        // A closed stderr leaves nowhere to report to.
        let _ = self.term.write_line(&msg.to_string());
    }
}
