use core::fmt;
use std::str::FromStr;

use itertools::{iproduct, Itertools};
use log::debug;
use petgraph::unionfind::UnionFind;

use crate::cell::{Cell, CellIndex, CellState};
use crate::error::{ConfigurationError, ParseGridError};
use crate::render::{Canvas, Palette};

/// Cell side in pixels for grids that are created from text.
pub const DEFAULT_CELL_SIZE: u32 = 14;

/// A square arena of [Cell]s stored in row-major order. Cells refer to their neighbours by
/// [CellIndex], so the grid is the single owner of all cell data.
///
/// In addition to the cells, [Grid] keeps a [UnionFind] over the non-barrier cells that can
/// answer reachability questions without searching. It is flagged as dirty whenever a
/// barrier is placed or removed and must be regenerated with [update](Self::update).
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    width: u32,
    cell_size: u32,
    cells: Vec<Cell>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

fn allocate_cells(rows: usize, cell_size: u32) -> Vec<Cell> {
    iproduct!(0..rows, 0..rows)
        .map(|(row, column)| Cell::new(row, column, cell_size))
        .collect()
}

impl Grid {
    /// Allocates a `rows` x `rows` grid of empty cells covering `width` pixels. The cell size
    /// is `width / rows`; residual pixels are left uncovered.
    pub fn build(rows: usize, width: u32) -> Result<Grid, ConfigurationError> {
        if rows == 0 {
            return Err(ConfigurationError::InvalidRowCount);
        }
        let cell_size = u32::try_from(rows)
            .ok()
            .map(|r| width / r)
            .filter(|&size| size > 0)
            .ok_or(ConfigurationError::InvalidWidth { rows, width })?;
        debug!("Building {rows}x{rows} grid with {cell_size}px cells");
        Ok(Grid {
            rows,
            width,
            cell_size,
            cells: allocate_cells(rows, cell_size),
            components: UnionFind::new(rows * rows),
            components_dirty: true,
        })
    }

    /// Parses the text grid format with a custom cell size, see [FromStr] for the format.
    pub fn parse_with_cell_size(text: &str, cell_size: u32) -> Result<Grid, ParseGridError> {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect::<Vec<_>>();
        if lines.is_empty() {
            return Err(ParseGridError::Empty);
        }
        let rows = lines.len();
        let width = u32::try_from(rows)
            .ok()
            .and_then(|r| r.checked_mul(cell_size))
            .ok_or(ConfigurationError::InvalidWidth {
                rows,
                width: u32::MAX,
            })?;
        let mut grid = Grid::build(rows, width)?;
        let mut start_seen = false;
        let mut end_seen = false;
        for (row, (line_no, line)) in lines.into_iter().enumerate() {
            let found = line.chars().count();
            if found != rows {
                return Err(ParseGridError::NotSquare {
                    line: line_no,
                    found,
                    expected: rows,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let state = CellState::from_glyph(glyph).ok_or(ParseGridError::UnknownGlyph {
                    line: line_no,
                    column: column + 1,
                    glyph,
                })?;
                match state {
                    CellState::Start if start_seen => {
                        return Err(ParseGridError::DuplicateStart {
                            line: line_no,
                            column: column + 1,
                        })
                    }
                    CellState::End if end_seen => {
                        return Err(ParseGridError::DuplicateEnd {
                            line: line_no,
                            column: column + 1,
                        })
                    }
                    CellState::Start => start_seen = true,
                    CellState::End => end_seen = true,
                    _ => {}
                }
                let ix = row * rows + column;
                grid.cells[ix].set_state(state);
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// # Panics
    /// If `index` is not smaller than [len](Self::len).
    pub fn cell(&self, index: CellIndex) -> &Cell {
        &self.cells[index]
    }

    pub fn state(&self, index: CellIndex) -> CellState {
        self.cells[index].state()
    }

    pub(crate) fn set_state(&mut self, index: CellIndex, state: CellState) {
        let cell = &mut self.cells[index];
        if cell.is_barrier() != (state == CellState::Barrier) {
            self.components_dirty = true;
        }
        cell.set_state(state);
    }

    /// Converts a `(row, column)` pair to a cell index, or [None] outside the grid.
    pub fn index(&self, row: usize, column: usize) -> Option<CellIndex> {
        (row < self.rows && column < self.rows).then(|| row * self.rows + column)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&Cell> {
        self.index(row, column).map(|ix| &self.cells[ix])
    }

    /// Maps a pixel position to the cell that covers it by floor division with the cell size.
    /// Positions outside `[0, width)` or in the uncovered residual strip give [None].
    pub fn cell_at(&self, x: u32, y: u32) -> Option<CellIndex> {
        if x >= self.width || y >= self.width {
            return None;
        }
        let row = (y / self.cell_size) as usize;
        let column = (x / self.cell_size) as usize;
        self.index(row, column)
    }

    pub fn set_cell_state(
        &mut self,
        row: usize,
        column: usize,
        state: CellState,
    ) -> Result<(), ConfigurationError> {
        let ix = self
            .index(row, column)
            .ok_or(ConfigurationError::CellOutOfRange { row, column })?;
        self.set_state(ix, state);
        Ok(())
    }

    pub fn reset_cell(&mut self, row: usize, column: usize) -> Result<(), ConfigurationError> {
        self.set_cell_state(row, column, CellState::Empty)
    }

    /// Discards every cell and allocates a fresh, empty grid of the same dimensions.
    pub fn rebuild(&mut self) {
        debug!("Rebuilding {}x{} grid", self.rows, self.rows);
        self.cells = allocate_cells(self.rows, self.cell_size);
        self.components = UnionFind::new(self.cells.len());
        self.components_dirty = true;
    }

    /// Recomputes the neighbour list of every cell from the current barrier layout.
    pub fn recompute_all_neighbours(&mut self) {
        debug!("Recomputing neighbours of {} cells", self.cells.len());
        let barriers = self.cells.iter().map(Cell::is_barrier).collect::<Vec<bool>>();
        let rows = self.rows;
        for cell in &mut self.cells {
            cell.update_neighbours(rows, &barriers);
        }
    }

    /// First cell in row-major order that is in the given state.
    pub fn find(&self, state: CellState) -> Option<CellIndex> {
        self.cells.iter().position(|c| c.state() == state)
    }

    /// Locates the start and end cells.
    pub fn endpoints(&self) -> Result<(CellIndex, CellIndex), ConfigurationError> {
        let start = self
            .find(CellState::Start)
            .ok_or(ConfigurationError::MissingStart)?;
        let end = self
            .find(CellState::End)
            .ok_or(ConfigurationError::MissingEnd)?;
        Ok((start, end))
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up 4-adjacent non-barrier cells.
    pub fn generate_components(&mut self) {
        let rows = self.rows;
        self.components = UnionFind::new(self.cells.len());
        self.components_dirty = false;
        for (row, column) in iproduct!(0..rows, 0..rows) {
            let ix = row * rows + column;
            if self.cells[ix].is_barrier() {
                continue;
            }
            // Linking down and right is enough to cover every edge once.
            let linked = [(row + 1, column), (row, column + 1)]
                .into_iter()
                .filter_map(|(r, c)| self.index(r, c))
                .filter(|&n| !self.cells[n].is_barrier())
                .collect::<Vec<_>>();
            for n in linked {
                self.components.union(ix, n);
            }
        }
    }

    /// Checks if two cells are on the same connected component. Only meaningful after
    /// [update](Self::update) or [generate_components](Self::generate_components).
    pub fn reachable(&self, a: CellIndex, b: CellIndex) -> bool {
        a < self.cells.len()
            && b < self.cells.len()
            && !self.cells[a].is_barrier()
            && !self.cells[b].is_barrier()
            && self.components.equiv(a, b)
    }

    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }

    /// Draws the background, every cell and the grid lines.
    pub fn draw<C: Canvas>(&self, canvas: &mut C, palette: &Palette) {
        canvas.clear(palette.empty);
        for cell in &self.cells {
            cell.draw(canvas, palette);
        }
        for i in 0..self.rows as u32 {
            let offset = i * self.cell_size;
            canvas.line((0, offset), (self.width, offset), palette.grid_lines);
            canvas.line((offset, 0), (offset, self.width), palette.grid_lines);
        }
    }
}

/// Text grid format: one line per row, `.` empty, `#` barrier, `S` start, `E` end, and
/// `o`, `x`, `*` for open, closed and path cells. Blank lines are skipped and surrounding
/// whitespace is trimmed. The number of lines must equal the number of cells per line.
impl FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::parse_with_cell_size(s, DEFAULT_CELL_SIZE)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.rows) {
            writeln!(f, "{}", row.iter().map(|c| c.state().glyph()).join(""))?;
        }
        Ok(())
    }
}
