//! Remaining-cost estimates between two grid positions. Movement is 4-connected with unit
//! cost, so [Manhattan] is both admissible and consistent and is the default.
use grid_util::point::Point;
use serde::Deserialize;

pub trait Heuristic {
    /// Estimated number of unit moves from `from` to `to`. Must never be negative and should
    /// not exceed the true distance if shortest paths are expected.
    fn estimate(&self, from: Point, to: Point) -> u32;
}

/// `|dx| + |dy|`, the exact distance on an empty 4-connected grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

/// Straight-line distance rounded down, which keeps it admissible and consistent on integer
/// costs while exploring more cells than [Manhattan].
#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean;

/// Always zero, turning the search into uniform-cost (Dijkstra) search.
#[derive(Clone, Copy, Debug, Default)]
pub struct Zero;

impl Heuristic for Manhattan {
    fn estimate(&self, from: Point, to: Point) -> u32 {
        from.x.abs_diff(to.x) + from.y.abs_diff(to.y)
    }
}

impl Heuristic for Euclidean {
    fn estimate(&self, from: Point, to: Point) -> u32 {
        let dx = from.x.abs_diff(to.x) as f64;
        let dy = from.y.abs_diff(to.y) as f64;
        (dx * dx + dy * dy).sqrt().floor() as u32
    }
}

impl Heuristic for Zero {
    fn estimate(&self, _: Point, _: Point) -> u32 {
        0
    }
}

impl<F> Heuristic for F
where
    F: Fn(Point, Point) -> u32,
{
    fn estimate(&self, from: Point, to: Point) -> u32 {
        self(from, to)
    }
}

/// Selects one of the built-in heuristics, for configuration files and the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    #[default]
    Manhattan,
    Euclidean,
    Zero,
}

impl Heuristic for HeuristicKind {
    fn estimate(&self, from: Point, to: Point) -> u32 {
        match self {
            HeuristicKind::Manhattan => Manhattan.estimate(from, to),
            HeuristicKind::Euclidean => Euclidean.estimate(from, to),
            HeuristicKind::Zero => Zero.estimate(from, to),
        }
    }
}
