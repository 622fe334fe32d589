//! Rectangular cell bitmaps and a small catalog of classic patterns.
//!
//! Patterns use the plaintext convention: one line per row, `.` for dead,
//! `O` (also `*` or `#`) for alive, `!`-prefixed comment lines ignored.

use crate::error::PatternParseError;

/// A rectangular bitmap of cells, blittable into a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl Pattern {
    /// Parse a plaintext bitmap. Short rows are padded with dead cells to
    /// the widest row.
    pub fn parse(text: &str) -> Result<Pattern, PatternParseError> {
        let mut rows: Vec<Vec<bool>> = Vec::new();
        for line in text.lines() {
            let line = line.trim_end();
            if line.starts_with('!') {
                continue;
            }
            if line.is_empty() && rows.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for c in line.chars() {
                match c {
                    '.' => row.push(false),
                    'O' | '*' | '#' => row.push(true),
                    _ => return Err(PatternParseError::InvalidChar(c, rows.len())),
                }
            }
            rows.push(row);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(PatternParseError::Empty);
        }

        let height = rows.len();
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut cells = vec![false; height * width];
        for (r, row) in rows.iter().enumerate() {
            cells[r * width..r * width + row.len()].copy_from_slice(row);
        }
        Ok(Pattern {
            height,
            width,
            cells,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell state at 0-based (row, col) within the pattern.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.width + col]
    }

    /// Coordinates of all live cells, row-major.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    fn catalog(text: &str) -> Pattern {
        Pattern::parse(text).expect("catalog pattern is well-formed")
    }

    pub fn block() -> Pattern {
        Self::catalog("OO\nOO")
    }

    pub fn blinker() -> Pattern {
        Self::catalog("OOO")
    }

    pub fn toad() -> Pattern {
        Self::catalog(".OOO\nOOO.")
    }

    pub fn glider() -> Pattern {
        Self::catalog(".O.\n..O\nOOO")
    }

    pub fn lwss() -> Pattern {
        Self::catalog(".O..O\nO....\nO...O\nOOOO.")
    }

    pub fn r_pentomino() -> Pattern {
        Self::catalog(".OO\nOO.\n.O.")
    }
}

#[cfg(test)]
mod tests {
    use super::Pattern;
    use crate::error::PatternParseError;

    #[test]
    fn parses_ragged_rows_with_padding() {
        let p = Pattern::parse("O\n.OO\nO").unwrap();
        assert_eq!(p.height(), 3);
        assert_eq!(p.width(), 3);
        assert!(p.get(0, 0));
        assert!(!p.get(0, 2));
        assert!(p.get(1, 1));
        assert!(p.get(1, 2));
    }

    #[test]
    fn skips_comment_lines() {
        let p = Pattern::parse("!Name: Blinker\nOOO").unwrap();
        assert_eq!(p, Pattern::blinker());
    }

    #[test]
    fn rejects_unknown_characters() {
        assert_eq!(
            Pattern::parse("O.x"),
            Err(PatternParseError::InvalidChar('x', 0))
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Pattern::parse(""), Err(PatternParseError::Empty));
        assert_eq!(Pattern::parse("!just a comment"), Err(PatternParseError::Empty));
    }

    #[test]
    fn catalog_dimensions() {
        assert_eq!((Pattern::block().height(), Pattern::block().width()), (2, 2));
        assert_eq!(
            (Pattern::blinker().height(), Pattern::blinker().width()),
            (1, 3)
        );
        assert_eq!((Pattern::glider().height(), Pattern::glider().width()), (3, 3));
        assert_eq!((Pattern::lwss().height(), Pattern::lwss().width()), (4, 5));
        assert_eq!(Pattern::glider().live_cells().count(), 5);
    }
}
