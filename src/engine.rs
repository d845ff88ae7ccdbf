//! Material evaluation and depth-limited alpha-beta search.

use std::cmp::{max, min};
use std::fmt;
use log::debug;
use serde::{Serialize, Serializer};
use crate::board::{Board, Cell, Move, Side};

/// A search score seen from Red's side.
///
/// The two decisive variants order strictly outside every material value,
/// so `BlackWin < Material(_) < RedWin` holds for any evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Score {
    BlackWin,
    Material(i32),
    RedWin,
}

impl Score {
    /// The score of a position where `side` is to move and cannot.
    pub fn loss_for(side: Side) -> Self {
        match side {
            Side::Red => Score::BlackWin,
            Side::Black => Score::RedWin,
        }
    }

    pub fn is_decisive(self) -> bool {
        !matches!(self, Score::Material(_))
    }

    // strict improvement only, so ties keep the earlier move
    fn improves_for(self, side: Side, best: Score) -> bool {
        if side.is_maximizing() { self > best } else { self < best }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Score::BlackWin => f.write_str("-inf"),
            Score::Material(value) => write!(f, "{}", value),
            Score::RedWin => f.write_str("+inf"),
        }
    }
}

impl Serialize for Score {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        match self {
            Score::Material(value) => serializer.serialize_i32(*value),
            decisive => serializer.collect_str(decisive),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub score: Score,
    pub best_move: Option<Move>,
    /// Boards visited, root included.
    pub nodes: u64,
}

/// Material value of a single cell: positive for Red, negative for Black.
pub fn piece_value(cell: Cell) -> i32 {
    match cell {
        Cell::Empty => 0,
        Cell::RedMan => 5,
        Cell::RedKing => 8,
        Cell::BlackMan => -5,
        Cell::BlackKing => -8,
    }
}

/// Sums the material on the board. Positive favours Red.
pub fn evaluate(board: &Board) -> i32 {
    board.squares().map(|(_, cell)| piece_value(cell)).sum()
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    nodes: u64,
}

impl Engine {
    pub fn new() -> Self {
        Self { nodes: 0 }
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn eval(&self, board: &Board) -> i32 {
        evaluate(board)
    }

    /// Searches `depth` plies with `side` to move. Red maximizes, Black
    /// minimizes, and the window starts fully open.
    pub fn search(&mut self, board: &Board, depth: u32, side: Side) -> SearchResult {
        self.nodes = 0;
        let (score, best_move) = self.alpha_beta(board, depth, Score::BlackWin, Score::RedWin, side);
        debug!("searched depth {} for {}: score {}, move {:?}, {} nodes", depth, side, score, best_move, self.nodes);
        SearchResult { score, best_move, nodes: self.nodes }
    }

    pub fn best_move(&mut self, board: &Board, side: Side, depth: u32) -> Option<Move> {
        self.search(board, depth, side).best_move
    }

    fn alpha_beta(&mut self, board: &Board, depth: u32, mut alpha: Score, mut beta: Score, side: Side) -> (Score, Option<Move>) {
        self.nodes += 1;
        if depth == 0 {
            return (Score::Material(evaluate(board)), None);
        }

        let moves = board.generate_moves(side);
        if moves.is_empty() {
            return (Score::loss_for(side), None);
        }

        let mut value = Score::loss_for(side);
        let mut best_move = None;
        for move_ in moves {
            let child = board.apply(move_);
            let (score, _) = self.alpha_beta(&child, depth - 1, alpha, beta, side.opponent());
            if score.improves_for(side, value) {
                value = score;
                best_move = Some(move_);
            }
            if side.is_maximizing() {
                alpha = max(alpha, value);
            } else {
                beta = min(beta, value);
            }
            if alpha >= beta {
                break;
            }
        }

        // no move when nothing beat the losing sentinel
        (value, best_move)
    }
}

/// Plain minimax over the same tree, without pruning.
pub fn minimax(board: &Board, depth: u32, side: Side) -> Score {
    if depth == 0 {
        return Score::Material(evaluate(board));
    }
    board.generate_moves(side)
        .into_iter()
        .map(|move_| minimax(&board.apply(move_), depth - 1, side.opponent()))
        .fold(Score::loss_for(side), |best, score| if score.improves_for(side, best) { score } else { best })
}

pub fn search(board: &Board, depth: u32, side: Side) -> SearchResult {
    Engine::new().search(board, depth, side)
}

pub fn find_best_move(board: &Board, side: Side, depth: u32) -> Option<Move> {
    Engine::new().best_move(board, side, depth)
}
