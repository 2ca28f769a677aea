//! Pieces module - Tetromino shapes and SRS rotation system
//!
//! Implements Standard Rotation System (SRS) with wall kick tables.
//! Reference: https://tetris.wiki/SRS
//!
//! Shapes are precomputed matrices, one per (kind, rotation); nothing here
//! rotates a matrix at runtime. Kick offsets are stored in SRS notation
//! (positive `dy` points up) and converted to board rows (`y` grows down) by
//! [`try_rotate`].

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::types::{PieceKind, Rotation, BOARD_WIDTH};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Occupancy matrix of up to 4x4 cells.
///
/// Each entry of `rows` is a bit row, most significant of the `width` bits
/// being the leftmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Shape {
    width: u8,
    height: u8,
    rows: [u8; 4],
}

impl Shape {
    /// Maximum width and height of a shape box
    pub const MAX_SIZE: u8 = 4;

    const fn new(width: u8, height: u8, rows: [u8; 4]) -> Self {
        Self {
            width,
            height,
            rows,
        }
    }

    /// Build a shape from a matrix of 0/1 rows.
    ///
    /// Returns `None` for empty, ragged or oversized matrices, and for
    /// matrices without a single occupied cell.
    ///
    /// ```
    /// use tetris_engine_core::pieces::Shape;
    ///
    /// let dot = Shape::from_matrix(&[[1u8]]).unwrap();
    /// assert_eq!(dot.cells().count(), 1);
    /// assert!(Shape::from_matrix(&[[0u8, 0]]).is_none());
    /// ```
    pub fn from_matrix<R: AsRef<[u8]>>(matrix: &[R]) -> Option<Self> {
        let height = matrix.len();
        let width = matrix.first()?.as_ref().len();
        if height == 0
            || width == 0
            || height > Self::MAX_SIZE as usize
            || width > Self::MAX_SIZE as usize
        {
            return None;
        }

        let mut rows = [0u8; 4];
        for (y, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return None;
            }
            for (x, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    rows[y] |= 1 << (width - 1 - x);
                }
            }
        }

        if rows.iter().all(|&r| r == 0) {
            return None;
        }
        Some(Self::new(width as u8, height as u8, rows))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the cell at column `x`, row `y` of the box is occupied
    pub fn is_filled(&self, x: u8, y: u8) -> bool {
        x < self.width && y < self.height && (self.rows[y as usize] >> (self.width - 1 - x)) & 1 == 1
    }

    /// Occupied cells as offsets from the box's top-left corner, row by row
    pub fn cells(&self) -> impl Iterator<Item = MinoOffset> {
        let shape = *self;
        (0..shape.height).flat_map(move |y| {
            (0..shape.width)
                .filter(move |&x| shape.is_filled(x, y))
                .map(move |x| (x as i8, y as i8))
        })
    }

    /// The shape as a rows x cols matrix of 0/1
    pub fn matrix(&self) -> Vec<Vec<u8>> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self.is_filled(x, y) as u8).collect())
            .collect()
    }
}

const I_SHAPES: [Shape; 4] = [
    Shape::new(4, 4, [0b0000, 0b1111, 0b0000, 0b0000]),
    Shape::new(4, 4, [0b0010, 0b0010, 0b0010, 0b0010]),
    Shape::new(4, 4, [0b0000, 0b0000, 0b1111, 0b0000]),
    Shape::new(4, 4, [0b0100, 0b0100, 0b0100, 0b0100]),
];

const O_SHAPE: Shape = Shape::new(2, 2, [0b11, 0b11, 0, 0]);

const T_SHAPES: [Shape; 4] = [
    Shape::new(3, 3, [0b010, 0b111, 0b000, 0]),
    Shape::new(3, 3, [0b010, 0b011, 0b010, 0]),
    Shape::new(3, 3, [0b000, 0b111, 0b010, 0]),
    Shape::new(3, 3, [0b010, 0b110, 0b010, 0]),
];

const S_SHAPES: [Shape; 4] = [
    Shape::new(3, 3, [0b011, 0b110, 0b000, 0]),
    Shape::new(3, 3, [0b010, 0b011, 0b001, 0]),
    Shape::new(3, 3, [0b000, 0b011, 0b110, 0]),
    Shape::new(3, 3, [0b100, 0b110, 0b010, 0]),
];

const Z_SHAPES: [Shape; 4] = [
    Shape::new(3, 3, [0b110, 0b011, 0b000, 0]),
    Shape::new(3, 3, [0b001, 0b011, 0b010, 0]),
    Shape::new(3, 3, [0b000, 0b110, 0b011, 0]),
    Shape::new(3, 3, [0b010, 0b110, 0b100, 0]),
];

const J_SHAPES: [Shape; 4] = [
    Shape::new(3, 3, [0b100, 0b111, 0b000, 0]),
    Shape::new(3, 3, [0b011, 0b010, 0b010, 0]),
    Shape::new(3, 3, [0b000, 0b111, 0b001, 0]),
    Shape::new(3, 3, [0b010, 0b010, 0b110, 0]),
];

const L_SHAPES: [Shape; 4] = [
    Shape::new(3, 3, [0b001, 0b111, 0b000, 0]),
    Shape::new(3, 3, [0b010, 0b010, 0b011, 0]),
    Shape::new(3, 3, [0b000, 0b111, 0b100, 0]),
    Shape::new(3, 3, [0b110, 0b010, 0b010, 0]),
];

/// Get the shape matrix for a piece kind and rotation
pub fn shape_for(kind: PieceKind, rotation: Rotation) -> Shape {
    let r = rotation.index();
    match kind {
        PieceKind::I => I_SHAPES[r],
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPES[r],
        PieceKind::S => S_SHAPES[r],
        PieceKind::Z => Z_SHAPES[r],
        PieceKind::J => J_SHAPES[r],
        PieceKind::L => L_SHAPES[r],
    }
}

/// SRS wall kick data
/// Each entry is (dx, dy) offset to try when rotation fails, dy pointing up.
/// Order: 0=initial rotation, 1-4=wall kicks
pub type KickTable = [[(i8, i8); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E, clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W, counter-clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0 (E->N, counter-clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2 (E->S, clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1 (S->E, counter-clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3 (S->W, clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2 (W->S, counter-clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0 (W->N, clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Get the kick table for a piece kind; O has none
pub fn get_kick_table(kind: PieceKind) -> Option<&'static KickTable> {
    match kind {
        PieceKind::O => None,
        PieceKind::I => Some(&I_KICKS),
        _ => Some(&JLSTZ_KICKS),
    }
}

/// Get the kick index for a rotation transition
fn get_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,  // N->E
        (Rotation::North, false) => 1, // N->W
        (Rotation::East, false) => 2,  // E->N
        (Rotation::East, true) => 3,   // E->S
        (Rotation::South, false) => 4, // S->E
        (Rotation::South, true) => 5,  // S->W
        (Rotation::West, false) => 6,  // W->S
        (Rotation::West, true) => 7,   // W->N
    }
}

/// Ordered kick candidates for rotating `kind` from `from` to `to`.
///
/// Empty for O and for pairs that are not a quarter turn apart.
pub fn kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [(i8, i8)] {
    let Some(table) = get_kick_table(kind) else {
        return &[];
    };
    if to == from.rotate_cw() {
        &table[get_kick_index(from, true)]
    } else if to == from.rotate_ccw() {
        &table[get_kick_index(from, false)]
    } else {
        &[]
    }
}

/// Spawn row for new pieces
pub const SPAWN_Y: i8 = 0;

/// Spawn column that centres a shape's box on the board
pub fn spawn_x(shape: &Shape) -> i8 {
    ((BOARD_WIDTH - shape.width()) / 2) as i8
}

/// What a piece is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Form {
    /// One of the seven catalog pieces, rotating through its SRS states
    Tetromino(PieceKind),
    /// A non-rotating shape stamped with `kind`'s cell code
    Fixed { kind: PieceKind, shape: Shape },
}

/// A piece on the board
///
/// Pieces are values: every move produces a new piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Piece {
    pub form: Form,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a catalog piece at its spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            form: Form::Tetromino(kind),
            rotation: Rotation::North,
            x: spawn_x(&shape_for(kind, Rotation::North)),
            y: SPAWN_Y,
        }
    }

    /// Create a catalog piece at an explicit position
    pub fn new(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Self {
        Self {
            form: Form::Tetromino(kind),
            rotation,
            x,
            y,
        }
    }

    /// Create a non-rotating piece with a custom shape
    pub fn fixed(kind: PieceKind, shape: Shape, x: i8, y: i8) -> Self {
        Self {
            form: Form::Fixed { kind, shape },
            rotation: Rotation::North,
            x,
            y,
        }
    }

    pub fn kind(&self) -> PieceKind {
        match self.form {
            Form::Tetromino(kind) => kind,
            Form::Fixed { kind, .. } => kind,
        }
    }

    /// Get the shape matrix for the current rotation
    pub fn shape(&self) -> Shape {
        match self.form {
            Form::Tetromino(kind) => shape_for(kind, self.rotation),
            Form::Fixed { shape, .. } => shape,
        }
    }

    /// Absolute board coordinates of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> {
        let (x, y) = (self.x, self.y);
        self.shape().cells().map(move |(dx, dy)| (x + dx, y + dy))
    }

    /// Whether rotation can change this piece at all
    pub fn rotates(&self) -> bool {
        matches!(self.form, Form::Tetromino(kind) if kind != PieceKind::O)
    }

    /// The same piece translated by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// The same piece back at its spawn anchor and spawn rotation
    pub fn respawned(&self) -> Self {
        let rotation = Rotation::North;
        let shape = match self.form {
            Form::Tetromino(kind) => shape_for(kind, rotation),
            Form::Fixed { shape, .. } => shape,
        };
        Self {
            form: self.form,
            rotation,
            x: spawn_x(&shape),
            y: SPAWN_Y,
        }
    }
}

/// Try to rotate a piece with wall kicks
///
/// Candidates are tried in table order; the first one `fits` accepts wins.
/// Returns `None` for pieces that do not rotate and when every kick fails.
pub fn try_rotate(piece: &Piece, clockwise: bool, fits: impl Fn(&Piece) -> bool) -> Option<Piece> {
    if !piece.rotates() {
        return None;
    }

    let new_rotation = piece.rotation.rotate(clockwise);
    let kicks = kick_offsets(piece.kind(), piece.rotation, new_rotation);

    kicks
        .iter()
        .map(|&(dx, dy)| Piece {
            rotation: new_rotation,
            // SRS dy points up, board rows grow down.
            x: piece.x + dx,
            y: piece.y - dy,
            ..*piece
        })
        .find(|candidate| fits(candidate))
}
