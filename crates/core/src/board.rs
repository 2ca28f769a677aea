//! Board module - manages the game grid
//!
//! The board is a 10x22 grid where each cell can be empty or filled with a piece kind.
//! The top two rows are a buffer above the visible skyline.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..21 (top to bottom)

use std::fmt;

use arrayvec::ArrayVec;
#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_ROWS, BOARD_WIDTH, TSPIN_CORNER_THRESHOLD};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices, at most one per board row
pub type RowList = ArrayVec<usize, BOARD_ROWS>;

/// The game board - 10 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Overwrite row `y` from cell codes; unknown codes become empty cells.
    /// Returns false if `y` is out of bounds.
    pub fn set_row(&mut self, y: usize, codes: &[u8]) -> bool {
        if y >= BOARD_ROWS {
            return false;
        }
        let width = BOARD_WIDTH as usize;
        for x in 0..width {
            let code = codes.get(x).copied().unwrap_or(0);
            self.cells[y * width + x] = PieceKind::from_code(code);
        }
        true
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_ROWS {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Whether every cell of `piece` is inside the walls and floor and
    /// does not overlap a filled cell.
    ///
    /// Cells above the top row (y < 0) only need to be inside the walls.
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        piece.cells().all(|(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return false;
            }
            y < 0 || self.is_valid(x, y)
        })
    }

    /// Stamp `piece` onto the board with its kind's code.
    ///
    /// Returns false without writing anything if any cell lies above the
    /// top row.
    pub fn lock_piece(&mut self, piece: &Piece) -> bool {
        if piece.cells().any(|(_, y)| y < 0) {
            return false;
        }
        let kind = piece.kind();
        for (x, y) in piece.cells() {
            self.set(x, y, Some(kind));
        }
        true
    }

    /// Indices of completely filled rows, top to bottom
    pub fn cleared_rows(&self) -> RowList {
        (0..BOARD_ROWS).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove the listed rows and insert as many empty rows at the top.
    /// Uses a two-pointer pass with zero allocation.
    pub fn collapse(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_ROWS;

        // Scan from bottom to top
        for read_y in (0..BOARD_ROWS).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }
    }

    /// Clear all full rows and return the row indices that were cleared
    pub fn clear_full_rows(&mut self) -> RowList {
        let rows = self.cleared_rows();
        self.collapse(&rows);
        rows
    }

    /// Count the occupied diagonal corners around a T piece's centre.
    ///
    /// Out-of-bounds corners count as occupied. Non-T pieces yield 0.
    pub fn t_spin_corners(&self, piece: &Piece) -> u8 {
        if piece.kind() != PieceKind::T || piece.shape().width() != 3 {
            return 0;
        }
        let (cx, cy) = (piece.x + 1, piece.y + 1);
        [(-1, -1), (1, -1), (-1, 1), (1, 1)]
            .iter()
            .filter(|&&(dx, dy)| !self.is_valid(cx + dx, cy + dy))
            .count() as u8
    }

    /// Whether a locked T piece sits in a pocket counted as a T-Spin
    pub fn is_t_spin_pocket(&self, piece: &Piece) -> bool {
        self.t_spin_corners(piece) >= TSPIN_CORNER_THRESHOLD
    }

    /// Rows `piece` can still fall before it would collide
    pub fn drop_distance(&self, piece: &Piece) -> i8 {
        let mut distance = 0;
        while self.is_valid_position(&piece.shifted(0, distance + 1)) {
            distance += 1;
        }
        distance
    }

    /// Whether `piece` cannot move down one row
    pub fn is_grounded(&self, piece: &Piece) -> bool {
        !self.is_valid_position(&piece.shifted(0, 1))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Write the board as cell codes into a fixed u8 grid (0 = empty)
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_ROWS]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, code) in row.iter_mut().enumerate() {
                *code = self.cells[y * width + x].map_or(0, |kind| kind.code());
            }
        }
    }

    /// Board rows as cell codes
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(BOARD_WIDTH as usize)
            .map(|row| row.iter().map(|cell| cell.map_or(0, |kind| kind.code())).collect())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(BOARD_WIDTH as usize) {
            for cell in row {
                match cell {
                    Some(kind) => write!(f, "{}", kind.as_str().to_uppercase())?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Shape;
    use crate::types::Rotation;

    fn dot(x: i8, y: i8) -> Piece {
        Piece::fixed(PieceKind::I, Shape::from_matrix(&[[1u8]]).unwrap(), x, y)
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 21), Some(219));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 22), None);
    }

    #[test]
    fn test_cells_above_top_skip_overlap_check() {
        let board = Board::new();
        assert!(board.is_valid_position(&dot(0, -1)));
        assert!(!board.is_valid_position(&dot(-1, -1)));
        assert!(!board.is_valid_position(&dot(0, 22)));
    }

    #[test]
    fn test_lock_above_top_writes_nothing() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::T, Rotation::North, 3, -1);
        assert!(!board.lock_piece(&piece));
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_collapse_keeps_relative_order() {
        let mut board = Board::new();
        board.set_row(21, &[1; 10]);
        board.set_row(20, &[2, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        board.set_row(19, &[3; 10]);
        board.set_row(18, &[0, 4, 0, 0, 0, 0, 0, 0, 0, 0]);

        let rows = board.cleared_rows();
        assert_eq!(rows.as_slice(), &[19, 21]);
        board.collapse(&rows);

        assert_eq!(board.get(0, 21), Some(Some(PieceKind::O)));
        assert_eq!(board.get(1, 20), Some(Some(PieceKind::S)));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_t_spin_corners_count_walls() {
        let board = Board::new();
        // Box against the left wall: both left corners are out of bounds.
        let t = Piece::new(PieceKind::T, Rotation::North, -1, 5);
        assert_eq!(board.t_spin_corners(&t), 2);
        let o = Piece::spawn(PieceKind::O);
        assert_eq!(board.t_spin_corners(&o), 0);
    }

    #[test]
    fn test_drop_distance_to_floor() {
        let board = Board::new();
        assert_eq!(board.drop_distance(&dot(0, 0)), 21);
        assert!(board.is_grounded(&dot(0, 21)));
    }
}
