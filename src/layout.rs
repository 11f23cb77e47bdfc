use crate::automaton::Position;
use crate::config::LayoutConfig;

/// Decides where the `index`-th state of a newly built automaton goes.
///
/// Algorithms call `place` once per created state, in creation order. The
/// coordinates should be finite so the result can be written as a snapshot.
pub trait Placement {
    fn place(&mut self, index: usize) -> Position;
}

/// Lays states out on the grid described by a `LayoutConfig`.
#[derive(Debug, Clone, Default)]
pub struct GridPlacement {
    config: LayoutConfig,
}

impl GridPlacement {
    pub fn new(config: LayoutConfig) -> Self {
        GridPlacement { config }
    }
}

impl Placement for GridPlacement {
    fn place(&mut self, index: usize) -> Position {
        let c = &self.config;
        let (col, row) = match c.columns {
            0 => (index, index % 2),
            n => (index % n, index / n),
        };
        Position::new(
            c.origin_x + col as f64 * c.spacing_x,
            c.origin_y + row as f64 * c.spacing_y,
        )
    }
}

/// Puts every state at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Origin;

impl Placement for Origin {
    fn place(&mut self, _index: usize) -> Position {
        Position::default()
    }
}
