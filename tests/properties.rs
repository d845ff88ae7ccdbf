use checkers_engine::{find_best_move, minimax, search, Board, Cell, Score, Side, Square};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PIECES: [Cell; 4] = [Cell::RedMan, Cell::BlackMan, Cell::RedKing, Cell::BlackKing];

fn random_board(rng: &mut StdRng, density: f64) -> Board {
    let mut board = Board::empty();
    for row in 0..8 {
        for col in 0..8 {
            if rng.gen_bool(density) {
                let square = Square::new(row, col).unwrap();
                board.set(square, PIECES[rng.gen_range(0..PIECES.len())]);
            }
        }
    }
    board
}

fn boards(seed: u64, count: usize, density: f64) -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| random_board(&mut rng, density)).collect()
}

#[test]
fn generated_moves_start_on_friendly_piece_and_land_on_empty_square() {
    for board in boards(1, 200, 0.3) {
        for side in [Side::Red, Side::Black] {
            for move_ in board.generate_moves(side) {
                assert_eq!(board.cell(move_.from).side(), Some(side), "{}\n{}", move_, board);
                assert_eq!(board.cell(move_.to), Cell::Empty, "{}\n{}", move_, board);
                let dr = move_.from.row().abs_diff(move_.to.row());
                let dc = move_.from.col().abs_diff(move_.to.col());
                assert!((dr == 1 && dc == 1) || (dr == 2 && dc == 2), "{}", move_);
            }
        }
    }
}

#[test]
fn apply_leaves_input_untouched() {
    for board in boards(2, 100, 0.3) {
        let before = board;
        for move_ in board.generate_moves(Side::Red).into_iter().chain(board.generate_moves(Side::Black)) {
            let _ = board.apply(move_);
            assert_eq!(board, before);
        }
    }
}

#[test]
fn jumps_remove_the_captured_piece() {
    let mut jumps = 0;
    for board in boards(3, 300, 0.4) {
        for side in [Side::Red, Side::Black] {
            for move_ in board.generate_moves(side).into_iter().filter(|m| m.is_jump()) {
                jumps += 1;
                let captured = move_.captured().unwrap();
                assert_eq!(board.cell(captured).side(), Some(side.opponent()));

                let after = board.apply(move_);
                assert_eq!(after.cell(captured), Cell::Empty);
                assert_eq!(after.cell(move_.from), Cell::Empty);
                assert_eq!(after.cell(move_.to), board.cell(move_.from).promoted(move_.to.row()));
                assert_eq!(after.cell(move_.to).side(), Some(side));
            }
        }
    }
    assert!(jumps > 0);
}

#[test]
fn only_men_on_the_far_row_change_tag() {
    for board in boards(4, 300, 0.3) {
        for side in [Side::Red, Side::Black] {
            for move_ in board.generate_moves(side) {
                let piece = board.cell(move_.from);
                let landed = board.apply(move_).cell(move_.to);
                let expected = match (piece, move_.to.row()) {
                    (Cell::RedMan, 0) => Cell::RedKing,
                    (Cell::BlackMan, 7) => Cell::BlackKing,
                    _ => piece,
                };
                assert_eq!(landed, expected);
            }
        }
    }
}

#[test]
fn only_the_moving_and_captured_squares_change() {
    for board in boards(5, 100, 0.3) {
        for move_ in board.generate_moves(Side::Black) {
            let after = board.apply(move_);
            let touched = [Some(move_.from), Some(move_.to), move_.captured()];
            for ((square, cell), (_, new_cell)) in board.squares().zip(after.squares()) {
                if !touched.contains(&Some(square)) {
                    assert_eq!(cell, new_cell, "{} changed by {}", square, move_);
                }
            }
        }
    }
}

#[test]
fn alpha_beta_score_equals_plain_minimax() {
    for board in boards(6, 40, 0.12) {
        for depth in 0..=4 {
            for side in [Side::Red, Side::Black] {
                assert_eq!(search(&board, depth, side).score, minimax(&board, depth, side), "depth {} {}\n{}", depth, side, board);
            }
        }
    }
}

#[test]
fn pruning_never_visits_more_nodes_than_the_full_tree() {
    fn tree_size(board: &Board, depth: u32, side: Side) -> u64 {
        if depth == 0 {
            return 1;
        }
        1 + board.generate_moves(side).into_iter()
            .map(|m| tree_size(&board.apply(m), depth - 1, side.opponent()))
            .sum::<u64>()
    }

    for board in boards(7, 20, 0.15) {
        let result = search(&board, 4, Side::Red);
        assert!(result.nodes <= tree_size(&board, 4, Side::Red));
    }
}

#[test]
fn missing_move_means_the_side_is_lost() {
    for board in boards(8, 60, 0.2) {
        for side in [Side::Red, Side::Black] {
            let moves = board.generate_moves(side);
            match find_best_move(&board, side, 3) {
                Some(move_) => assert!(moves.contains(&move_)),
                // no move means no legal move or a forced loss
                None => assert_eq!(search(&board, 3, side).score, Score::loss_for(side)),
            }
        }
    }
}

#[test]
fn search_is_deterministic() {
    for board in boards(9, 20, 0.2) {
        let first = search(&board, 4, Side::Black);
        let second = search(&board, 4, Side::Black);
        assert_eq!(first, second);
        assert_eq!(find_best_move(&board, Side::Black, 4), first.best_move);
    }
}
