//! Row-major grid editing over a flat cell list.
//!
//! A page stores its cells as one flat list read `columns` at a time. Structural
//! edits return a new list; cells outside the edited row or column are cloned
//! unchanged, so their ids survive the edit.

use crate::models::{Link, LinkCell, Page};

/// Something that can fill a grid slot.
pub trait GridItem: Clone {
    /// A fresh empty item with its own identity.
    fn blank() -> Self;
}

impl GridItem for LinkCell {
    fn blank() -> Self {
        LinkCell::new()
    }
}

impl GridItem for Link {
    fn blank() -> Self {
        Link::new()
    }
}

/// Grid edit failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Removing the only column
    LastColumn,
    /// Column count of zero
    ZeroColumns,
    RowOutOfRange { row: usize, rows: usize },
    ColumnOutOfRange { col: usize, columns: usize },
    /// Page has cells spanning several slots
    SpanningCells,
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::LastColumn => write!(f, "At least one column is required"),
            GridError::ZeroColumns => write!(f, "Column count must be at least 1"),
            GridError::RowOutOfRange { row, rows } => {
                write!(f, "Row {} is out of range (grid has {} rows)", row, rows)
            }
            GridError::ColumnOutOfRange { col, columns } => write!(
                f,
                "Column {} is out of range (grid has {} columns)",
                col, columns
            ),
            GridError::SpanningCells => write!(
                f,
                "Rows and columns cannot be changed while cells span several grid slots"
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Number of rows needed for `cell_count` cells.
pub fn rows(cell_count: usize, columns: usize) -> usize {
    if columns == 0 {
        return 0;
    }
    cell_count.div_ceil(columns)
}

/// `(row, col)` of a flat index.
pub fn position(index: usize, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    (index / columns, index % columns)
}

/// Flat index of `(row, col)`.
pub fn index(row: usize, col: usize, columns: usize) -> usize {
    row * columns + col
}

/// Split cells into rows of exactly `columns`, padding the last row with blanks.
pub fn to_grid<T: GridItem>(cells: &[T], columns: usize) -> Vec<Vec<T>> {
    let columns = columns.max(1);
    cells
        .chunks(columns)
        .map(|chunk| {
            let mut row = chunk.to_vec();
            row.resize_with(columns, T::blank);
            row
        })
        .collect()
}

/// Append one row of blanks.
pub fn add_row<T: GridItem>(cells: &[T], columns: usize) -> Result<Vec<T>, GridError> {
    if columns == 0 {
        return Err(GridError::ZeroColumns);
    }
    let mut next = cells.to_vec();
    next.extend((0..columns).map(|_| T::blank()));
    Ok(next)
}

/// Append a blank to the end of every row. Returns the new list and column count.
pub fn add_column<T: GridItem>(cells: &[T], columns: usize) -> Result<(Vec<T>, usize), GridError> {
    if columns == 0 {
        return Err(GridError::ZeroColumns);
    }

    let mut next = Vec::with_capacity(cells.len() + rows(cells.len(), columns));
    for row in 0..rows(cells.len(), columns) {
        for col in 0..columns {
            let i = index(row, col, columns);
            if i < cells.len() {
                next.push(cells[i].clone());
            }
        }
        next.push(T::blank());
    }

    Ok((next, columns + 1))
}

/// Drop the cells of one row.
pub fn remove_row<T: GridItem>(
    cells: &[T],
    row: usize,
    columns: usize,
) -> Result<Vec<T>, GridError> {
    if columns == 0 {
        return Err(GridError::ZeroColumns);
    }
    let total_rows = rows(cells.len(), columns);
    if row >= total_rows {
        return Err(GridError::RowOutOfRange {
            row,
            rows: total_rows,
        });
    }

    let start = index(row, 0, columns);
    let end = (start + columns).min(cells.len());
    let mut next = Vec::with_capacity(cells.len() - (end - start));
    next.extend_from_slice(&cells[..start]);
    next.extend_from_slice(&cells[end..]);
    Ok(next)
}

/// Drop one column from every row. Returns the new list and column count.
pub fn remove_column<T: GridItem>(
    cells: &[T],
    col: usize,
    columns: usize,
) -> Result<(Vec<T>, usize), GridError> {
    if columns <= 1 {
        return Err(GridError::LastColumn);
    }
    if col >= columns {
        return Err(GridError::ColumnOutOfRange { col, columns });
    }

    let mut next = Vec::with_capacity(cells.len());
    for row in 0..rows(cells.len(), columns) {
        for c in (0..columns).filter(|c| *c != col) {
            let i = index(row, c, columns);
            if i < cells.len() {
                next.push(cells[i].clone());
            }
        }
    }

    Ok((next, columns - 1))
}

/// Page-level edits. Refused while any cell spans several slots, since the
/// flat reindexing has no notion of spans.
impl Page {
    fn ensure_uniform(&self) -> Result<(), GridError> {
        if self.has_spanning_cells() {
            return Err(GridError::SpanningCells);
        }
        Ok(())
    }

    pub fn grid(&self) -> Vec<Vec<LinkCell>> {
        to_grid(&self.cells, self.columns)
    }

    pub fn row_count(&self) -> usize {
        rows(self.cells.len(), self.columns)
    }

    pub fn add_row(&mut self) -> Result<(), GridError> {
        self.ensure_uniform()?;
        self.cells = add_row(&self.cells, self.columns)?;
        Ok(())
    }

    pub fn add_column(&mut self) -> Result<(), GridError> {
        self.ensure_uniform()?;
        let (cells, columns) = add_column(&self.cells, self.columns)?;
        self.cells = cells;
        self.columns = columns;
        Ok(())
    }

    pub fn remove_row(&mut self, row: usize) -> Result<(), GridError> {
        self.ensure_uniform()?;
        self.cells = remove_row(&self.cells, row, self.columns)?;
        Ok(())
    }

    pub fn remove_column(&mut self, col: usize) -> Result<(), GridError> {
        self.ensure_uniform()?;
        let (cells, columns) = remove_column(&self.cells, col, self.columns)?;
        self.cells = cells;
        self.columns = columns;
        Ok(())
    }
}
