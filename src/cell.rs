#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    pub fn alive(&self) -> bool {
        matches!(self, Cell::Alive)
    }

    pub fn flipped(&self) -> Self {
        match self {
            Cell::Dead => Cell::Alive,
            Cell::Alive => Cell::Dead,
        }
    }

    pub fn flip(&mut self) {
        *self = self.flipped();
    }

    pub fn block(&self) -> char {
        match self {
            Cell::Dead => '.',
            Cell::Alive => '@',
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive {
            Cell::Alive
        } else {
            Cell::Dead
        }
    }
}

/// One of the eight cells surrounding a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Neighbor {
    /// `(row, col)` offset from the center cell.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Neighbor::TopLeft => (-1, -1),
            Neighbor::Top => (-1, 0),
            Neighbor::TopRight => (-1, 1),
            Neighbor::Left => (0, -1),
            Neighbor::Right => (0, 1),
            Neighbor::BottomLeft => (1, -1),
            Neighbor::Bottom => (1, 0),
            Neighbor::BottomRight => (1, 1),
        }
    }

    pub fn all() -> [Neighbor; 8] {
        [
            Neighbor::TopLeft,
            Neighbor::Top,
            Neighbor::TopRight,
            Neighbor::Left,
            Neighbor::Right,
            Neighbor::BottomLeft,
            Neighbor::Bottom,
            Neighbor::BottomRight,
        ]
    }
}
