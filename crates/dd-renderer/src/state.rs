//! Per-table render state.

use dd_deck::ShapeId;

/// Position of the next cell in a table being rendered.
///
/// Rows and columns are fixed when the table shape is created; cells are
/// addressed row-major from `(0, 0)`, the header row first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableState {
    pub slide: usize,
    pub shape: ShapeId,
    row: usize,
    column: usize,
}

impl TableState {
    pub fn new(slide: usize, shape: ShapeId) -> Self {
        Self {
            slide,
            shape,
            row: 0,
            column: 0,
        }
    }

    /// Start a row (the header counts as one).
    pub fn start_row(&mut self) {
        self.column = 0;
    }

    /// Finish a row.
    pub fn end_row(&mut self) {
        self.row += 1;
    }

    /// Move to the next cell.
    pub fn next_cell(&mut self) {
        self.column += 1;
    }

    /// Current `(row, column)`.
    pub fn cell(&self) -> (usize, usize) {
        (self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_row_major_addressing() {
        let mut state = TableState::new(0, ShapeId(4));
        let mut seen = Vec::new();
        for _ in 0..2 {
            state.start_row();
            for _ in 0..3 {
                seen.push(state.cell());
                state.next_cell();
            }
            state.end_row();
        }
        assert_eq!(seen, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }
}
