//! Board tests - collision, locking, line clearing and T-Spin corners

use tetris_engine::core::{Board, Piece, Shape};
use tetris_engine::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

fn dot(x: i8, y: i8) -> Piece {
    Piece::fixed(PieceKind::I, Shape::from_matrix(&[[1u8]]).unwrap(), x, y)
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_valid(x, y), "Cell ({}, {}) should be valid", x, y);
        }
    }
    assert!(board.to_rows().iter().flatten().all(|&code| code == 0));
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_single_cell_locks_at_bottom_left() {
    let mut board = Board::new();
    assert!(board.lock_piece(&dot(0, 21)));
    assert_eq!(board.to_rows()[21][0], 1);
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_walls_and_floor_block_pieces() {
    let board = Board::new();
    let i = Piece::new(PieceKind::I, Rotation::North, 0, 0);
    assert!(board.is_valid_position(&i));
    assert!(!board.is_valid_position(&i.shifted(-1, 0)));
    assert!(!board.is_valid_position(&i.shifted(7, 0)));
    // I north occupies row 1 of its box.
    assert!(board.is_valid_position(&i.shifted(0, 20)));
    assert!(!board.is_valid_position(&i.shifted(0, 21)));
}

#[test]
fn test_overlap_blocks_pieces() {
    let mut board = Board::new();
    board.set(4, 1, Some(PieceKind::Z));
    let t = Piece::spawn(PieceKind::T);
    assert!(!board.is_valid_position(&t));
    assert!(board.is_valid_position(&t.shifted(-2, 0)));
}

#[test]
fn test_full_row_detection_and_collapse() {
    let mut board = Board::new();
    board.set_row(0, &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    board.set_row(20, &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    board.set_row(21, &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1]);

    assert!(board.is_row_full(21));
    assert!(!board.is_row_full(20));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[21]);
    assert_eq!(board.to_rows()[21], vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(board.to_rows()[0], vec![0; 10]);
}

#[test]
fn test_tetris_clears_four_rows() {
    let mut board = Board::new();
    for y in 18..22 {
        board.set_row(y, &[6; 10]);
    }
    board.set(3, 17, Some(PieceKind::L));
    assert_eq!(board.cleared_rows().len(), 4);
    board.clear_full_rows();
    assert_eq!(board.get(3, 21), Some(Some(PieceKind::L)));
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_t_spin_corner_count() {
    let mut board = Board::new();
    board.set_row(20, &[0, 0, 1, 1, 1, 1, 1, 1, 1, 1]);
    board.set_row(21, &[0, 0, 0, 1, 1, 1, 1, 1, 1, 1]);

    let t = Piece::new(PieceKind::T, Rotation::North, 0, 20);
    // (0,20) empty, (2,20) filled, both lower corners below the floor.
    assert_eq!(board.t_spin_corners(&t), 3);
    assert!(board.is_t_spin_pocket(&t));

    let open = Piece::new(PieceKind::T, Rotation::North, 3, 5);
    assert_eq!(board.t_spin_corners(&open), 0);
}

#[test]
fn test_ghost_distance() {
    let mut board = Board::new();
    board.set(4, 10, Some(PieceKind::S));
    let o = Piece::spawn(PieceKind::O);
    assert_eq!(board.drop_distance(&o), 8);
    assert!(!board.is_grounded(&o));
    assert!(board.is_grounded(&o.shifted(0, 8)));
}

#[test]
fn test_display_marks_filled_cells() {
    let mut board = Board::new();
    board.set(0, 21, Some(PieceKind::J));
    let text = board.to_string();
    let last = text.lines().last().unwrap();
    assert_eq!(last, "J.........");
    assert_eq!(text.lines().count(), 22);
}
