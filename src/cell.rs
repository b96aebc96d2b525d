use grid_util::point::Point;
use smallvec::SmallVec;

use crate::render::{Canvas, Palette};

/// Position of a [Cell] inside the row-major cell arena of a [Grid](crate::Grid).
pub type CellIndex = usize;

/// A cell has at most four traversable neighbours on a 4-connected grid.
pub type Neighbours = SmallVec<[CellIndex; 4]>;

/// What a cell currently represents, both for the user (start, end, barrier) and for
/// the search (open, closed, path).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    Open,
    Closed,
    Barrier,
    Start,
    End,
    Path,
}

impl CellState {
    /// Character used by the text grid format.
    pub fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Open => 'o',
            CellState::Closed => 'x',
            CellState::Barrier => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Path => '*',
        }
    }

    /// Inverse of [glyph](Self::glyph).
    pub fn from_glyph(glyph: char) -> Option<CellState> {
        match glyph {
            '.' => Some(CellState::Empty),
            'o' => Some(CellState::Open),
            'x' => Some(CellState::Closed),
            '#' => Some(CellState::Barrier),
            'S' => Some(CellState::Start),
            'E' => Some(CellState::End),
            '*' => Some(CellState::Path),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    row: usize,
    column: usize,
    size: u32,
    state: CellState,
    neighbours: Neighbours,
}

impl Cell {
    pub fn new(row: usize, column: usize, size: u32) -> Cell {
        Cell {
            row,
            column,
            size,
            state: CellState::Empty,
            neighbours: Neighbours::new(),
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.column)
    }

    /// The cell position as a [Point] with `x` the column and `y` the row.
    pub fn point(&self) -> Point {
        Point::new(self.column as i32, self.row as i32)
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub fn reset(&mut self) {
        self.state = CellState::Empty;
    }

    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }

    /// Traversable neighbours as of the last [update_neighbours](Self::update_neighbours),
    /// in discovery order: down, up, right, left.
    pub fn neighbours(&self) -> &[CellIndex] {
        &self.neighbours
    }

    /// Pixel rectangle `(x, y, side)` covered by this cell.
    pub fn pixel_rect(&self) -> (u32, u32, u32) {
        (
            self.column as u32 * self.size,
            self.row as u32 * self.size,
            self.size,
        )
    }

    /// Rebuilds the neighbour list of a cell in a `rows` x `rows` grid. `barriers` holds the
    /// barrier flag of every cell in row-major order. The order in which neighbours are
    /// pushed decides tie-breaking in the search and must stay fixed.
    pub fn update_neighbours(&mut self, rows: usize, barriers: &[bool]) {
        self.neighbours.clear();
        let (row, column) = (self.row, self.column);
        let mut candidates: SmallVec<[(usize, usize); 4]> = SmallVec::new();
        if row + 1 < rows {
            candidates.push((row + 1, column));
        }
        if row > 0 {
            candidates.push((row - 1, column));
        }
        if column + 1 < rows {
            candidates.push((row, column + 1));
        }
        if column > 0 {
            candidates.push((row, column - 1));
        }
        self.neighbours.extend(
            candidates
                .into_iter()
                .map(|(r, c)| r * rows + c)
                .filter(|&ix| !barriers[ix]),
        );
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C, palette: &Palette) {
        let (x, y, side) = self.pixel_rect();
        canvas.fill_rect(x, y, side, side, palette.color(self.state));
    }
}
