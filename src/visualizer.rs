//! Window-independent host logic: turns clicks and key presses into grid edits and search
//! runs. A front end feeds it [InputEvent]s with pixel coordinates, redraws from the
//! `on_step` callback and signals an abort by returning [ControlFlow::Break] from it.
use log::debug;
use std::ops::ControlFlow;

use crate::cell::{CellIndex, CellState};
use crate::config::VisualizerConfig;
use crate::error::ConfigurationError;
use crate::grid::Grid;
use crate::render::Canvas;
use crate::search::{run_search, SearchRun};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Places the start, then the end, then barriers.
    Left,
    /// Erases a cell.
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Click { button: MouseButton, x: u32, y: u32 },
    Search,
    Clear,
    Quit,
}

#[derive(Clone, Debug)]
pub struct Visualizer {
    config: VisualizerConfig,
    grid: Grid,
    start: Option<CellIndex>,
    end: Option<CellIndex>,
    running: bool,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Result<Visualizer, ConfigurationError> {
        config.validate()?;
        let grid = Grid::build(config.rows, config.width)?;
        Ok(Visualizer {
            config,
            grid,
            start: None,
            end: None,
            running: true,
        })
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Option<CellIndex> {
        self.start
    }

    pub fn end(&self) -> Option<CellIndex> {
        self.end
    }

    /// False once a [InputEvent::Quit] has been handled.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Left click: the first click places the start, the next one the end, and later
    /// clicks place barriers. Start and end are never painted over. Returns the affected
    /// cell, or [None] when the click is outside the grid or nothing changed.
    pub fn paint(&mut self, x: u32, y: u32) -> Option<CellIndex> {
        let ix = self.grid.cell_at(x, y)?;
        let state = if self.start.is_none() && self.end != Some(ix) {
            self.start = Some(ix);
            CellState::Start
        } else if self.end.is_none() && self.start != Some(ix) {
            self.end = Some(ix);
            CellState::End
        } else if self.start != Some(ix) && self.end != Some(ix) {
            CellState::Barrier
        } else {
            return None;
        };
        debug!("Painting cell {} as {:?}", ix, state);
        self.grid.set_state(ix, state);
        Some(ix)
    }

    /// Right click: resets the cell under the cursor and forgets it as start or end.
    pub fn erase(&mut self, x: u32, y: u32) -> Option<CellIndex> {
        let ix = self.grid.cell_at(x, y)?;
        debug!("Erasing cell {}", ix);
        self.grid.set_state(ix, CellState::Empty);
        if self.start == Some(ix) {
            self.start = None;
        } else if self.end == Some(ix) {
            self.end = None;
        }
        Some(ix)
    }

    /// Forgets start and end and replaces the grid with an empty one.
    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.grid.rebuild();
    }

    /// Recomputes all neighbour lists and runs the search between the placed start and end.
    pub fn search<F>(&mut self, on_step: F) -> Result<SearchRun, ConfigurationError>
    where
        F: FnMut(&Grid) -> ControlFlow<()>,
    {
        let start = self.start.ok_or(ConfigurationError::MissingStart)?;
        let end = self.end.ok_or(ConfigurationError::MissingEnd)?;
        self.grid.recompute_all_neighbours();
        run_search(&mut self.grid, start, end, self.config.heuristic, on_step)
    }

    /// Applies a single input event. Only [InputEvent::Search] produces a [SearchRun].
    pub fn handle<F>(
        &mut self,
        event: InputEvent,
        on_step: F,
    ) -> Result<Option<SearchRun>, ConfigurationError>
    where
        F: FnMut(&Grid) -> ControlFlow<()>,
    {
        match event {
            InputEvent::Click {
                button: MouseButton::Left,
                x,
                y,
            } => {
                self.paint(x, y);
            }
            InputEvent::Click {
                button: MouseButton::Right,
                x,
                y,
            } => {
                self.erase(x, y);
            }
            InputEvent::Search => return self.search(on_step).map(Some),
            InputEvent::Clear => self.clear(),
            InputEvent::Quit => self.running = false,
        }
        Ok(None)
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        self.grid.draw(canvas, &self.config.palette);
    }
}
