//! Grid tests - locking, row clearing, merging and flying-tile removal

use tetris_2048::core::{GameConfig, Grid, Piece, SimpleRng, Tile};
use tetris_2048::types::{GameOutcome, MoveDirection, Position, ShapeKind};

fn grid() -> Grid {
    Grid::new(&GameConfig::new(12, 18, 250).unwrap())
}

fn put(grid: &mut Grid, row: i32, col: i32, value: u32) {
    assert!(grid.set_tile(row, col, Tile::new(value)));
}

fn lock(grid: &mut Grid, piece: Piece) -> bool {
    let (tiles, blc) = piece.into_min_bounded_tiles();
    grid.lock(tiles, blc)
}

#[test]
fn test_grid_new_empty() {
    let g = grid();
    assert_eq!(g.width(), 12);
    assert_eq!(g.height(), 18);
    assert_eq!(g.tile_count(), 0);
    assert_eq!(g.score(), 0);
    assert!(!g.game_over());
    assert_eq!(g.outcome(), None);
    assert!(g.values().all(|v| v == 0));
}

#[test]
fn test_out_of_bounds_is_never_occupied() {
    let mut g = grid();
    for row in 0..18 {
        for col in 0..12 {
            put(&mut g, row, col, 2);
        }
    }
    for (row, col) in [(-1, 0), (0, -1), (18, 0), (0, 12), (40, 40), (-5, -5)] {
        assert!(!g.is_occupied(row, col), "({row}, {col})");
        assert!(!g.is_inside(row, col));
        assert!(!g.set_tile(row, col, Tile::new(2)));
    }
}

#[test]
fn test_o_piece_drops_to_floor_and_locks() {
    let mut g = grid();
    let mut rng = SimpleRng::new(5);
    let mut piece = Piece::spawn(ShapeKind::O, 4, g.height(), &mut rng);

    let mut moves = 0;
    while piece.move_by(MoveDirection::Down, &g) {
        moves += 1;
    }
    assert_eq!(moves, 17);
    assert_eq!(piece.anchor(), Position::new(4, 0));

    assert!(!lock(&mut g, piece));
    assert_eq!(g.tile_count(), 4);
    for (row, col) in [(0, 4), (0, 5), (1, 4), (1, 5)] {
        let value = g.value(row, col).unwrap();
        assert!(value == 2 || value == 4, "value {value}");
    }

    g.resolve();
    assert!(!g.game_over());
}

#[test]
fn test_lock_above_grid_is_game_over() {
    let mut g = grid();
    let piece = Piece::with_values(ShapeKind::I, Position::new(2, 16), [2, 4, 8, 16]).unwrap();
    assert!(lock(&mut g, piece));
    assert!(g.game_over());
    assert_eq!(g.outcome(), Some(GameOutcome::Lost));
}

#[test]
fn test_completed_row_clears_and_shifts() {
    let mut g = grid();
    for col in 1..12 {
        put(&mut g, 0, col, 2);
    }
    put(&mut g, 1, 5, 4);
    put(&mut g, 2, 5, 8);

    // Vertical I dropped into the gap at column 0: 2,4,8,16 top to bottom.
    let piece = Piece::with_values(ShapeKind::I, Position::new(-1, 0), [2, 4, 8, 16]).unwrap();
    assert!(!lock(&mut g, piece));
    assert!(g.row_is_full(0));

    let report = g.resolve();
    assert_eq!(report.rows_cleared, 1);
    assert_eq!(g.score(), 11 * 2 + 16);
    assert_eq!(report.score_gained, 38);

    // Everything above row 0 moved down one row.
    assert_eq!(g.value(0, 0), Some(8));
    assert_eq!(g.value(1, 0), Some(4));
    assert_eq!(g.value(2, 0), Some(2));
    assert_eq!(g.value(0, 5), Some(4));
    assert_eq!(g.value(1, 5), Some(8));
    assert!(!g.row_is_full(0));
}

#[test]
fn test_no_full_rows_after_clear() {
    let mut g = grid();
    for row in [0, 2, 3] {
        for col in 0..12 {
            put(&mut g, row, col, if row == 2 { 4 } else { 2 });
        }
    }
    put(&mut g, 1, 0, 8);

    assert_eq!(g.remove_full_rows_and_shift(), 3);
    assert!((0..18).all(|row| !g.row_is_full(row)));
    assert_eq!(g.value(0, 0), Some(8));
    assert_eq!(g.tile_count(), 1);
}

#[test]
fn test_two_1024_tiles_merge_into_win() {
    let mut g = grid();
    put(&mut g, 0, 0, 1024);
    put(&mut g, 1, 0, 1024);

    assert_eq!(g.merge_tiles(), 1);
    assert_eq!(g.value(0, 0), Some(2048));
    assert_eq!(g.value(1, 0), None);
    assert!(g.game_over());
    assert_eq!(g.outcome(), Some(GameOutcome::Won));
}

#[test]
fn test_2048_pairs_do_not_merge() {
    let mut g = grid();
    put(&mut g, 0, 3, 2048);
    put(&mut g, 1, 3, 2048);
    assert_eq!(g.merge_tiles(), 0);
    assert_eq!(g.tile_count(), 2);
}

#[test]
fn test_merge_reaches_fixed_point() {
    let mut g = grid();
    let column = [2, 2, 4, 8, 16, 32, 2];
    for (row, value) in column.iter().enumerate() {
        put(&mut g, row as i32, 7, *value);
    }
    put(&mut g, 0, 8, 4);
    put(&mut g, 1, 8, 4);
    put(&mut g, 2, 8, 4);

    g.merge_tiles();

    for col in 0..12 {
        for row in 0..17 {
            if let (Some(a), Some(b)) = (g.value(row, col), g.value(row + 1, col)) {
                assert!(a != b || a == 2048, "pair {a} at ({row}, {col})");
            }
        }
    }
    // 2+2 cascades all the way up to 64, leaving the top 2 on it.
    assert_eq!(g.value(0, 7), Some(64));
    assert_eq!(g.value(1, 7), Some(2));
    assert_eq!(g.value(0, 8), Some(8));
    assert_eq!(g.value(1, 8), Some(4));
}

#[test]
fn test_flying_tiles_removed_after_clear() {
    let mut g = grid();
    // Bottom row full except where the overhang rests on a support column.
    for col in 0..12 {
        put(&mut g, 0, col, 2);
    }
    put(&mut g, 1, 6, 4);
    put(&mut g, 2, 6, 8);
    put(&mut g, 2, 7, 16);
    put(&mut g, 1, 9, 32);

    let report = g.resolve();
    assert_eq!(report.rows_cleared, 1);
    // After the shift every remaining tile touches row 0 or a supported neighbour.
    assert_eq!(report.flying_removed, 0);
    assert_eq!(g.value(0, 6), Some(4));
    assert_eq!(g.value(1, 6), Some(8));
    assert_eq!(g.value(1, 7), Some(16));
    assert_eq!(g.value(0, 9), Some(32));
}

#[test]
fn test_detached_group_is_credited() {
    let mut g = grid();
    put(&mut g, 0, 0, 2);
    put(&mut g, 4, 4, 8);
    put(&mut g, 5, 4, 4);
    put(&mut g, 5, 5, 16);

    let report = g.resolve();
    assert_eq!(report.flying_removed, 3);
    assert_eq!(g.score(), 28);
    assert_eq!(g.tile_count(), 1);
}

/// Column 0 holds 4 over 4 with a gap at row 2; row 2 is full everywhere else
/// and rests on a two-tile support in column 1. `top` sits at (3, 1).
fn gap_above_merge(top: u32) -> Grid {
    let mut g = grid();
    put(&mut g, 0, 0, 4);
    put(&mut g, 1, 0, 4);
    put(&mut g, 3, 0, 16);
    put(&mut g, 0, 1, 8);
    put(&mut g, 1, 1, 32);
    for col in 1..12 {
        put(&mut g, 2, col, 2);
    }
    put(&mut g, 3, 1, top);
    g
}

#[test]
fn test_merge_completes_row_which_then_clears() {
    let mut g = gap_above_merge(64);
    assert!(!g.row_is_full(2));

    let report = g.resolve();
    // 4+4 drops the 16 into the gap; the completed row clears next pass.
    assert_eq!(report.merges, 1);
    assert_eq!(report.rows_cleared, 1);
    assert_eq!(report.flying_removed, 0);
    assert_eq!(report.score_gained, 8 + 16 + 11 * 2);
    assert_eq!(g.score(), 46);

    assert_eq!(g.value(0, 0), Some(8));
    assert_eq!(g.value(1, 0), None);
    assert_eq!(g.value(2, 0), None);
    assert_eq!(g.value(0, 1), Some(8));
    assert_eq!(g.value(1, 1), Some(32));
    assert_eq!(g.value(2, 1), Some(64));
    assert_eq!(g.tile_count(), 4);
}

#[test]
fn test_row_clear_lines_up_pair_which_then_merges() {
    let mut g = gap_above_merge(32);

    let report = g.resolve();
    // The clear drops the top 32 onto the 32 below it.
    assert_eq!(report.merges, 2);
    assert_eq!(report.rows_cleared, 1);
    assert_eq!(report.flying_removed, 0);
    assert_eq!(report.score_gained, 8 + 38 + 64);

    assert_eq!(g.value(0, 0), Some(8));
    assert_eq!(g.value(0, 1), Some(8));
    assert_eq!(g.value(1, 1), Some(64));
    assert_eq!(g.value(2, 1), None);
    assert_eq!(g.tile_count(), 3);
}

#[test]
fn test_merge_leaves_overhang_unsupported() {
    let mut g = grid();
    put(&mut g, 0, 0, 4);
    put(&mut g, 1, 0, 4);
    // Overhang hanging off the top 4.
    put(&mut g, 1, 1, 8);
    put(&mut g, 1, 2, 16);

    let report = g.resolve();
    assert_eq!(report.merges, 1);
    assert_eq!(report.rows_cleared, 0);
    assert_eq!(report.flying_removed, 2);
    assert_eq!(report.score_gained, 8 + 8 + 16);

    assert_eq!(g.value(0, 0), Some(8));
    assert_eq!(g.tile_count(), 1);
}
