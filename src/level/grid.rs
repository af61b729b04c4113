//! Level domain: text grid parsing and cell placement.
//!
//! One character per cell, newline-delimited rows. Row and column indices
//! scale directly to render-space pixels by `TILE_SIZE`.

use std::fmt;
use std::fs;
use std::path::Path;

use bevy::prelude::*;

/// Edge length of one grid cell in pixels.
pub const TILE_SIZE: f32 = 64.0;

/// Rows past this limit are ignored.
pub const MAX_ROWS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// 'D': plain solid ground
    Dirt,
    /// 'm': low-friction ground
    Ice,
    /// 'p': crumbles shortly after the player touches it
    Parkour,
    /// 'e': sensor that finishes the level
    Exit,
}

impl BlockKind {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'D' => Some(Self::Dirt),
            'm' => Some(Self::Ice),
            'p' => Some(Self::Parkour),
            'e' => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn friction(self) -> f32 {
        match self {
            Self::Dirt | Self::Parkour => 0.6,
            Self::Ice => 0.02,
            Self::Exit => 0.0,
        }
    }

    pub fn is_sensor(self) -> bool {
        matches!(self, Self::Exit)
    }

    pub fn color(self) -> Color {
        match self {
            Self::Dirt => Color::srgb(0.42, 0.31, 0.22),
            Self::Ice => Color::srgb(0.7, 0.85, 0.95),
            Self::Parkour => Color::srgb(0.55, 0.45, 0.35),
            Self::Exit => Color::srgba(0.4, 0.9, 0.5, 0.6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Block(BlockKind),
    PlayerSpawn,
    EnemySpawn,
}

impl CellKind {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'P' => Some(Self::PlayerSpawn),
            'E' => Some(Self::EnemySpawn),
            other => BlockKind::from_symbol(other).map(Self::Block),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub kind: CellKind,
}

impl Cell {
    /// Render-space centre of the cell.
    pub fn center(&self) -> Vec2 {
        cell_center(self.row, self.column)
    }
}

pub fn cell_center(row: usize, column: usize) -> Vec2 {
    Vec2::new(
        (column as f32 + 0.5) * TILE_SIZE,
        (row as f32 + 0.5) * TILE_SIZE,
    )
}

/// Parsed level layout. Unknown symbols are empty cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelGrid {
    pub cells: Vec<Cell>,
    pub rows: usize,
    pub columns: usize,
}

impl LevelGrid {
    pub fn parse(text: &str) -> Self {
        let mut grid = LevelGrid::default();

        for (row, line) in text.lines().enumerate() {
            if row >= MAX_ROWS {
                warn!("Level grid has more than {} rows, ignoring the rest", MAX_ROWS);
                break;
            }
            grid.rows = row + 1;
            grid.columns = grid.columns.max(line.chars().count());

            for (column, symbol) in line.chars().enumerate() {
                if let Some(kind) = CellKind::from_symbol(symbol) {
                    grid.cells.push(Cell { row, column, kind });
                }
            }
        }

        grid
    }

    pub fn player_spawn(&self) -> Option<Vec2> {
        self.first_of(CellKind::PlayerSpawn)
    }

    pub fn enemy_spawn(&self) -> Option<Vec2> {
        self.first_of(CellKind::EnemySpawn)
    }

    pub fn blocks(&self) -> impl Iterator<Item = (BlockKind, Vec2)> + '_ {
        self.cells.iter().filter_map(|cell| match cell.kind {
            CellKind::Block(kind) => Some((kind, cell.center())),
            _ => None,
        })
    }

    fn first_of(&self, kind: CellKind) -> Option<Vec2> {
        self.cells
            .iter()
            .find(|cell| cell.kind == kind)
            .map(Cell::center)
    }
}

/// Error type for level files that cannot be read.
#[derive(Debug)]
pub struct LevelLoadError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load level {}: {}", self.path, self.message)
    }
}

impl std::error::Error for LevelLoadError {}

pub fn load_level(path: &Path) -> Result<LevelGrid, LevelLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| LevelLoadError {
        path: path.display().to_string(),
        message: format!("IO error: {}", e),
    })?;
    Ok(LevelGrid::parse(&contents))
}
