//! The maze grid: a row-major array of tile tags.
//!
//! Cells are addressed `(x, z)`: `x` is the column, `z` the row. Once a
//! level is generated the grid is never mutated again; entities refer to
//! cells by coordinate.

use serde::{Deserialize, Serialize};

use crate::constants::tile_codes;
use crate::error::LevelError;

/// Tag stored in each grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Wall,
    Start,
    EnemySpawn,
    Key,
    Generator,
    Battery,
    Note,
}

impl Tile {
    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => tile_codes::EMPTY,
            Tile::Wall => tile_codes::WALL,
            Tile::Start => tile_codes::START,
            Tile::EnemySpawn => tile_codes::ENEMY_SPAWN,
            Tile::Key => tile_codes::KEY,
            Tile::Generator => tile_codes::GENERATOR,
            Tile::Battery => tile_codes::BATTERY,
            Tile::Note => tile_codes::NOTE,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            tile_codes::EMPTY => Some(Tile::Empty),
            tile_codes::WALL => Some(Tile::Wall),
            tile_codes::START => Some(Tile::Start),
            tile_codes::ENEMY_SPAWN => Some(Tile::EnemySpawn),
            tile_codes::KEY => Some(Tile::Key),
            tile_codes::GENERATOR => Some(Tile::Generator),
            tile_codes::BATTERY => Some(Tile::Battery),
            tile_codes::NOTE => Some(Tile::Note),
            _ => None,
        }
    }

    /// Character used by [`Grid::from_rows`] and [`Grid::render`].
    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Start => 'S',
            Tile::EnemySpawn => 'E',
            Tile::Key => 'K',
            Tile::Generator => 'G',
            Tile::Battery => 'B',
            Tile::Note => 'N',
        }
    }

    fn from_glyph(c: char) -> Self {
        match c {
            ' ' | '.' => Tile::Empty,
            'S' => Tile::Start,
            'E' => Tile::EnemySpawn,
            'K' => Tile::Key,
            'G' => Tile::Generator,
            'B' => Tile::Battery,
            'N' => Tile::Note,
            // anything unknown is solid
            _ => Tile::Wall,
        }
    }

    /// Walls are the only tiles that block passage.
    pub fn is_passable(self) -> bool {
        self != Tile::Wall
    }
}

/// Fixed-size maze grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// A grid of the given size with every cell set to `fill`.
    pub fn filled(width: usize, height: usize, fill: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Parse a grid from text rows. Short rows are padded with walls.
    ///
    /// ```
    /// use incursion_logic::grid::{Grid, Tile};
    ///
    /// let grid = Grid::from_rows(&["#####", "#S  #", "#####"]);
    /// assert_eq!(grid.width(), 5);
    /// assert_eq!(grid.tile(1, 1), Some(Tile::Start));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            let mut n = 0;
            for c in row.chars() {
                cells.push(Tile::from_glyph(c));
                n += 1;
            }
            cells.extend(std::iter::repeat(Tile::Wall).take(width - n));
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i64, z: i64) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.width && (z as usize) < self.height
    }

    /// Tile at `(x, z)`, or `None` outside the grid.
    pub fn tile(&self, x: usize, z: usize) -> Option<Tile> {
        if x < self.width && z < self.height {
            Some(self.cells[z * self.width + x])
        } else {
            None
        }
    }

    /// Strict lookup for signed coordinates.
    pub fn try_tile(&self, x: i64, z: i64) -> Result<Tile, LevelError> {
        if self.in_bounds(x, z) {
            Ok(self.cells[z as usize * self.width + x as usize])
        } else {
            Err(LevelError::OutOfBounds { x, z })
        }
    }

    pub(crate) fn set(&mut self, x: usize, z: usize, tile: Tile) {
        if x < self.width && z < self.height {
            self.cells[z * self.width + x] = tile;
        }
    }

    pub fn is_wall(&self, x: usize, z: usize) -> bool {
        self.tile(x, z).map_or(true, |t| t == Tile::Wall)
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    /// First cell carrying `tile`, scanning row by row.
    pub fn find(&self, tile: Tile) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&t| t == tile)
            .map(|i| (i % self.width, i / self.width))
    }

    /// Iterate `(x, z, tile)` for every cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &t)| (i % self.width, i / self.width, t))
    }

    /// Orthogonal neighbours that lie inside the grid.
    pub fn neighbors4(&self, x: usize, z: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (w, h) = (self.width as i64, self.height as i64);
        [(0i64, -1i64), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .map(move |(dx, dz)| (x as i64 + dx, z as i64 + dz))
            .filter(move |&(nx, nz)| nx >= 0 && nz >= 0 && nx < w && nz < h)
            .map(|(nx, nz)| (nx as usize, nz as usize))
    }

    /// Rows of tile codes, the form presentation layers consume.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }

    /// Rebuild a grid from rows of tile codes.
    pub fn from_codes(rows: &[Vec<u8>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return None;
            }
            for &code in row {
                cells.push(Tile::from_code(code)?);
            }
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Text dump, one line per row.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|t| t.glyph()));
            out.push('\n');
        }
        out
    }
}
