use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::ser::SerializeStruct;
use serde::de::{self, MapAccess, Visitor};
use crate::error::{EngineError, Result};

pub const N: usize = 8;

const MAN_RED_DIRECTIONS: [(isize, isize); 2] = [(-1, -1), (-1, 1)];
const MAN_BLACK_DIRECTIONS: [(isize, isize); 2] = [(1, -1), (1, 1)];
const KING_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Red maximizes the evaluation, Black minimizes it.
    pub fn is_maximizing(self) -> bool {
        self == Side::Red
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Side::Red => "red",
            Side::Black => "black",
        })
    }
}

impl FromStr for Side {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "r" | "red" => Ok(Side::Red),
            "b" | "black" => Ok(Side::Black),
            _ => Err(EngineError::InvalidSide(s.to_string())),
        }
    }
}

// cell codes 0-4 on the wire: empty, red man, black man, red king, black king
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    #[default]
    Empty,
    RedMan,
    BlackMan,
    RedKing,
    BlackKing,
}

impl Cell {
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::RedMan | Cell::RedKing => Some(Side::Red),
            Cell::BlackMan | Cell::BlackKing => Some(Side::Black),
        }
    }

    pub fn is_king(self) -> bool {
        matches!(self, Cell::RedKing | Cell::BlackKing)
    }

    /// The tag this piece carries after landing on `row`.
    pub fn promoted(self, row: usize) -> Self {
        match self {
            Cell::RedMan if row == 0 => Cell::RedKing,
            Cell::BlackMan if row == N - 1 => Cell::BlackKing,
            other => other,
        }
    }

    fn directions(self) -> &'static [(isize, isize)] {
        if self.is_king() {
            return &KING_DIRECTIONS;
        }
        match self.side() {
            Some(Side::Red) => &MAN_RED_DIRECTIONS,
            Some(Side::Black) => &MAN_BLACK_DIRECTIONS,
            None => &[],
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::RedMan => 'r',
            Cell::BlackMan => 'b',
            Cell::RedKing => 'R',
            Cell::BlackKing => 'B',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self> {
        match symbol {
            '.' => Ok(Cell::Empty),
            'r' => Ok(Cell::RedMan),
            'b' => Ok(Cell::BlackMan),
            'R' => Ok(Cell::RedKing),
            'B' => Ok(Cell::BlackKing),
            _ => Err(EngineError::InvalidPiece(symbol)),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        match cell {
            Cell::Empty => 0,
            Cell::RedMan => 1,
            Cell::BlackMan => 2,
            Cell::RedKing => 3,
            Cell::BlackKing => 4,
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = EngineError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::RedMan),
            2 => Ok(Cell::BlackMan),
            3 => Ok(Cell::RedKing),
            4 => Ok(Cell::BlackKing),
            _ => Err(EngineError::InvalidCell(code)),
        }
    }
}

/// A board coordinate, always in `[0, 8) x [0, 8)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < N && col < N).then_some(Self { row, col })
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        Self::new(self.row.checked_add_signed(dr)?, self.col.checked_add_signed(dc)?)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Serialize for Square {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        [self.row, self.col].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let [row, col] = <[usize; 2]>::deserialize(deserializer)?;
        Square::new(row, col).ok_or_else(|| de::Error::custom(format!("square ({}, {}) is off the board", row, col)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn is_jump(&self) -> bool {
        self.from.row.abs_diff(self.to.row) == 2
    }

    /// The jumped-over square, for jumps only.
    pub fn captured(&self) -> Option<Square> {
        self.is_jump().then_some(Square {
            row: (self.from.row + self.to.row) / 2,
            col: (self.from.col + self.to.col) / 2,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        let mut s = serializer.serialize_struct("Move", 2)?;
        s.serialize_field("from", &self.from)?;
        s.serialize_field("to", &self.to)?;
        s.end()
    }
}

struct MoveVisitor;
impl<'de> Visitor<'de> for MoveVisitor {
    type Value = Move;
    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object for Move")
    }
    fn visit_map<V>(self, mut map: V) -> std::result::Result<Move, V::Error> where V: MapAccess<'de> {
        let mut from = None;
        let mut to = None;
        while let Some(key) = map.next_key::<String>()? {
            let field = match key.as_str() {
                "from" => &mut from,
                "to" => &mut to,
                _ => { return Err(de::Error::unknown_field(&key, &["from", "to"])); }
            };
            *field = Some(map.next_value::<Square>()?);
        }
        let from = from.ok_or_else(|| de::Error::missing_field("from"))?;
        let to = to.ok_or_else(|| de::Error::missing_field("to"))?;
        Ok(Move { from, to })
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        deserializer.deserialize_map(MoveVisitor)
    }
}

/// An 8x8 grid of cells, row 0 at the top. Boards are plain values: every
/// transition returns a fresh copy and leaves its input untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; N]; N],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(cells: [[Cell; N]; N]) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[[Cell; N]; N] {
        &self.cells
    }

    pub fn cell(&self, square: Square) -> Cell {
        self.cells[square.row][square.col]
    }

    pub fn set(&mut self, square: Square, cell: Cell) {
        self.cells[square.row][square.col] = cell;
    }

    /// Every square with its cell, in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = (Square, Cell)> + '_ {
        (0..N).flat_map(move |row| (0..N).map(move |col| {
            let square = Square { row, col };
            (square, self.cell(square))
        }))
    }

    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Cell)> + '_ {
        self.squares().filter(move |(_, cell)| cell.side() == Some(side))
    }

    fn piece_moves(&self, from: Square, piece: Cell, side: Side) -> impl Iterator<Item = Move> + '_ {
        piece.directions().iter().flat_map(move |&(dr, dc)| {
            let step = from.offset(dr, dc)
                .filter(|&to| self.cell(to) == Cell::Empty);
            // single jump over an opposing piece onto an empty square
            let jump = from.offset(dr, dc)
                .filter(|&over| self.cell(over).side() == Some(side.opponent()))
                .and_then(|_| from.offset(2 * dr, 2 * dc))
                .filter(|&to| self.cell(to) == Cell::Empty);
            step.into_iter().chain(jump).map(move |to| Move { from, to })
        })
    }

    /// Candidate moves for `side`: origins scanned row-major, then each
    /// piece's directions in order, a step before a jump per direction.
    pub fn generate_moves(&self, side: Side) -> Vec<Move> {
        self.pieces(side)
            .flat_map(|(from, piece)| self.piece_moves(from, piece, side))
            .collect()
    }

    /// Applies a move without checking it. Jumps clear the midpoint, and a
    /// man reaching the far row is crowned.
    pub fn apply(&self, move_: Move) -> Self {
        let mut board = *self;
        let piece = board.cell(move_.from);
        board.set(move_.from, Cell::Empty);
        board.set(move_.to, piece.promoted(move_.to.row));
        if let Some(captured) = move_.captured() {
            board.set(captured, Cell::Empty);
        }
        board
    }

    /// Like [`Board::apply`], but rejects anything `side` could not generate.
    pub fn play(&self, side: Side, move_: Move) -> Result<Self> {
        if self.generate_moves(side).contains(&move_) {
            Ok(self.apply(move_))
        } else {
            Err(EngineError::IllegalMove(move_))
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(|cell| cell.symbol().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
        if lines.len() != N {
            return Err(EngineError::RowCount(lines.len()));
        }
        let mut board = Board::empty();
        for (row, line) in lines.iter().enumerate() {
            let cells = line.chars()
                .filter(|c| !c.is_whitespace())
                .map(Cell::from_symbol)
                .collect::<Result<Vec<Cell>>>()?;
            board.cells[row] = cells.try_into()
                .map_err(|cells: Vec<Cell>| EngineError::RowLength { row, len: cells.len() })?;
        }
        Ok(board)
    }
}

/// The sample position the demo analyses when no board is supplied.
pub fn initial_board() -> Board {
    use Cell::{BlackKing as B, Empty as E, RedKing as R};
    Board::from_rows([
        [R, E, E, E, E, E, E, E],
        [E, E, E, E, E, E, E, R],
        [R, E, R, E, R, E, E, E],
        [E, E, E, E, E, E, E, B],
        [E, E, B, E, B, E, E, E],
        [E, E, E, E, E, E, E, E],
        [E, E, E, E, E, E, E, E],
        [E, E, E, E, E, E, E, E],
    ])
}
