use crate::error::{Error, Result};

/// Zero-indexed (row, column) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// A rectangular grid of cells, each of which is either fillable or a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Build a grid from rows of cells (`true` = fillable). Every row must have the same length
    /// and there must be at least one cell.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Grid> {
        let width = match rows.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(Error::InvalidGrid("grid has no cells".to_string())),
        };

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::InvalidGrid(format!(
                    "row {} has {} cells, expected {}",
                    row_idx,
                    row.len(),
                    width
                )));
            }
        }

        Ok(Grid {
            height: rows.len(),
            width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells outside the grid count as blocks.
    pub fn is_fillable(&self, (row, col): GridCoord) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }
}

/// Parse a structure from text, one line per row, with `_` or `.` representing fillable cells and
/// `#` or `█` representing blocks. Blank lines and surrounding whitespace are ignored.
pub fn load_structure(source: &str) -> Result<Grid> {
    let rows = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(row_idx, line)| {
            line.chars()
                .enumerate()
                .map(|(col_idx, cell)| match cell {
                    '_' | '.' => Ok(true),
                    '#' | '█' => Ok(false),
                    other => Err(Error::InvalidGrid(format!(
                        "unexpected character {:?} at row {}, column {}",
                        other, row_idx, col_idx
                    ))),
                })
                .collect::<Result<Vec<bool>>>()
        })
        .collect::<Result<Vec<Vec<bool>>>>()?;

    Grid::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::grid::{load_structure, Grid};

    #[test]
    fn test_load_structure() {
        let grid = load_structure(
            "
            #___#
            _____
            #_#_#
            ",
        )
        .expect("valid structure");

        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 5);
        assert!(!grid.is_fillable((0, 0)));
        assert!(grid.is_fillable((0, 1)));
        assert!(grid.is_fillable((1, 4)));
        assert!(!grid.is_fillable((2, 2)));
        assert!(!grid.is_fillable((3, 0)), "cells below the grid are blocks");
        assert!(!grid.is_fillable((0, 5)), "cells right of the grid are blocks");
    }

    #[test]
    fn test_dots_and_block_glyphs_are_accepted() {
        let grid = load_structure("..█\n#__").expect("valid structure");

        assert!(grid.is_fillable((0, 1)));
        assert!(!grid.is_fillable((0, 2)));
        assert!(!grid.is_fillable((1, 0)));
    }

    #[test]
    fn test_ragged_structure_is_rejected() {
        let result = load_structure("___\n__\n___");

        assert!(matches!(result, Err(Error::InvalidGrid(_))));
    }

    #[test]
    fn test_unknown_character_is_rejected() {
        let result = load_structure("_x_");

        assert!(matches!(result, Err(Error::InvalidGrid(_))));
    }

    #[test]
    fn test_empty_structure_is_rejected() {
        assert!(matches!(load_structure("\n  \n"), Err(Error::InvalidGrid(_))));
        assert!(matches!(Grid::from_rows(vec![]), Err(Error::InvalidGrid(_))));
    }
}
