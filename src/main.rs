use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn};
use serde_json::json;
use checkers_engine::{initial_board, Board, Engine, Move, Score, SearchResult, Side};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find the best move in a checkers position", long_about = None)]
struct Args {
    /// Board layout: an 8-line text grid of . r b R B, or JSON cell codes if the path ends in .json
    #[arg(long)]
    board: Option<PathBuf>,
    /// Side to move
    #[arg(long, default_value_t = Side::Red)]
    side: Side,
    /// Search depth in plies
    #[arg(long, default_value_t = 8)]
    depth: u32,
    /// JSON array of moves played in turn before searching, e.g. [{"from":[2,0],"to":[1,1]}]
    #[arg(long)]
    moves: Option<String>,
    /// Print a JSON report instead of the board
    #[arg(long)]
    json: bool,
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level: log::Level = args.log_level.parse()
        .map_err(|_| anyhow!("Invalid log level: {}", args.log_level))?;
    simple_logger::init_with_level(level)
        .map_err(|e| anyhow!("Failed to initialise logger: {}", e))?;

    let board = load_board(args.board.as_deref())?;
    info!("Loaded board:\n{}", board);

    let (board, side) = match &args.moves {
        Some(moves) => replay(board, args.side, moves)?,
        None => (board, args.side),
    };

    let mut engine = Engine::new();
    let result = engine.search(&board, args.depth, side);
    let summary = summarize(&board, side, &result);
    match result.best_move {
        Some(_) => info!("{} ({} nodes)", summary, result.nodes),
        None => warn!("{}", summary),
    }

    if args.json {
        let report = json!({
            "side": side,
            "depth": args.depth,
            "score": result.score,
            "best_move": result.best_move,
            "nodes": result.nodes,
            "board": board,
        });
        println!("{}", report);
    } else {
        print!("{}", render(&board, result.best_move));
        println!("{}", summary);
    }

    Ok(())
}

fn load_board(path: Option<&Path>) -> Result<Board> {
    let Some(path) = path else {
        return Ok(initial_board());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file {}", path.display()))?;
    let board: Board = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str::<Board>(&text).with_context(|| format!("Invalid JSON board in {}", path.display()))?
    } else {
        text.parse::<Board>().with_context(|| format!("Invalid board layout in {}", path.display()))?
    };
    Ok(board)
}

/// Plays a JSON list of moves in turn starting with `side`, returning the
/// resulting board and the side left to move.
fn replay(mut board: Board, mut side: Side, moves: &str) -> Result<(Board, Side)> {
    let moves: Vec<Move> = serde_json::from_str(moves).context("Failed to parse --moves")?;
    for move_ in moves {
        board = board.play(side, move_).with_context(|| format!("{} cannot play {}", side, move_))?;
        side = side.opponent();
    }
    Ok((board, side))
}

fn summarize(board: &Board, side: Side, result: &SearchResult) -> String {
    let outcome = if result.score.is_decisive() {
        format!("forced {} (score {})", if result.score == Score::loss_for(side) { "loss" } else { "win" }, result.score)
    } else {
        format!("score {}", result.score)
    };
    match result.best_move {
        Some(move_) => format!("{} plays {}, {}", side, move_, outcome),
        None if board.generate_moves(side).is_empty() => format!("{} has no legal moves, {}", side, outcome),
        None => format!("{} has no move that avoids a {}", side, outcome),
    }
}

// origin and destination of the chosen move are bracketed
fn render(board: &Board, highlight: Option<Move>) -> String {
    let mut out = String::new();
    for (row, cells) in board.rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let marked = highlight.is_some_and(|m| {
                [m.from, m.to].iter().any(|sq| sq.row() == row && sq.col() == col)
            });
            if marked {
                out.push_str(&format!("[{}]", cell.symbol()));
            } else {
                out.push_str(&format!(" {} ", cell.symbol()));
            }
        }
        out.push('\n');
    }
    out
}
