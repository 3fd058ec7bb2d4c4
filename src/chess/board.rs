//! [`Board`] stores the pieces and knows its own extent. It is deliberately
//! rule-agnostic: [`Board::apply`] relocates pieces without asking whether the
//! move is legal, which is what allows [`Board::legal_moves`] to test moves
//! by playing them on a [snapshot](Board::snapshot_after).
//!
//! Positions are persisted in a compact notation: a `|`-terminated token per
//! piece, `<color letter><kind code><square>`.
//!
//! ```
//! use shatranj::chess::board::Board;
//!
//! let board = Board::from_notation(8, 8, "WSHD1|BSHD8|WRHA1|").unwrap();
//! assert_eq!(board.to_notation(), "WRHA1|WSHD1|BSHD8|");
//! ```

use std::fmt;
use std::sync::LazyLock;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::chess::core::{
    Color,
    Move,
    Offset,
    Piece,
    PieceKind,
    Square,
    BOARD_HEIGHT,
    BOARD_WIDTH,
    MAX_FILES,
    MAX_RANKS,
};

/// Piece standing on a given square: an entry of a starting position or of a
/// persisted one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    #[allow(missing_docs)]
    pub color: Color,
    #[allow(missing_docs)]
    pub kind: PieceKind,
    #[allow(missing_docs)]
    pub square: Square,
}

impl Placement {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind, square: Square) -> Self {
        Self {
            color,
            kind,
            square,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn piece(self) -> Piece {
        Piece::new(self.color, self.kind)
    }
}

impl TryFrom<&str> for Placement {
    type Error = anyhow::Error;

    /// Parses a single notation token (without the `|` terminator), e.g.
    /// `WSHD1`.
    fn try_from(token: &str) -> anyhow::Result<Self> {
        let color = match token.get(..1) {
            Some("W") => Color::White,
            Some("B") => Color::Black,
            _ => bail!("piece token should start with 'W' or 'B', got '{token}'"),
        };
        let Some(kind) = token.get(1..3) else {
            bail!("piece token is missing the kind code: '{token}'");
        };
        let kind = PieceKind::try_from(kind)?;
        let Some(square) = token.get(3..) else {
            bail!("piece token is missing the square: '{token}'");
        };
        let square =
            Square::try_from(square).with_context(|| format!("incorrect square in '{token}'"))?;
        Ok(Self::new(color, kind, square))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.piece(), self.square)
    }
}

/// The classical opening layout on the 8×8 board. Every game copies it, so it
/// is never mutated.
pub static CLASSICAL_LAYOUT: LazyLock<Vec<Placement>> = LazyLock::new(|| {
    const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
        PieceKind::Rukh,
        PieceKind::Asb,
        PieceKind::Pil,
        PieceKind::Shah,
        PieceKind::Ferz,
        PieceKind::Pil,
        PieceKind::Asb,
        PieceKind::Rukh,
    ];
    let mut layout = Vec::with_capacity(4 * BOARD_WIDTH as usize);
    for (file, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
        layout.push(Placement::new(Color::White, kind, Square::new(file, 0)));
        layout.push(Placement::new(
            Color::White,
            PieceKind::WhiteSarbaz,
            Square::new(file, 1),
        ));
        layout.push(Placement::new(
            Color::Black,
            PieceKind::BlackSarbaz,
            Square::new(file, BOARD_HEIGHT - 2),
        ));
        layout.push(Placement::new(
            Color::Black,
            kind,
            Square::new(file, BOARD_HEIGHT - 1),
        ));
    }
    layout
});

/// Fixed-size grid where each square holds at most one [`Piece`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cols: u8,
    rows: u8,
    /// Rank-major: `rank * cols + file`.
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Errors
    ///
    /// If the dimensions can not be written in the square notation.
    pub fn empty(cols: u8, rows: u8) -> anyhow::Result<Self> {
        if !(1..=MAX_FILES).contains(&cols) {
            bail!("board should have 1..={MAX_FILES} columns, got {cols}");
        }
        if !(1..=MAX_RANKS).contains(&rows) {
            bail!("board should have 1..={MAX_RANKS} rows, got {rows}");
        }
        Ok(Self {
            cols,
            rows,
            squares: vec![None; usize::from(cols) * usize::from(rows)],
        })
    }

    /// Creates the board with the classical Shatranj opening layout.
    #[must_use]
    pub fn classical() -> Self {
        let mut board = Self {
            cols: BOARD_WIDTH,
            rows: BOARD_HEIGHT,
            squares: vec![None; usize::from(BOARD_WIDTH) * usize::from(BOARD_HEIGHT)],
        };
        for placement in CLASSICAL_LAYOUT.iter() {
            board.place(placement.square, placement.piece());
        }
        board
    }

    /// Creates a board and puts the given pieces on it.
    ///
    /// # Errors
    ///
    /// If the dimensions are invalid, a piece is outside of the board or two
    /// pieces share a square.
    pub fn with_placements(cols: u8, rows: u8, placements: &[Placement]) -> anyhow::Result<Self> {
        let mut board = Self::empty(cols, rows)?;
        for placement in placements {
            if !board.contains(placement.square) {
                bail!("{placement} is outside of the {cols}x{rows} board");
            }
            if let Some(occupant) = board.occupant_at(placement.square) {
                bail!(
                    "{placement} is placed on {} already occupied by {occupant}",
                    placement.square
                );
            }
            board.place(placement.square, placement.piece());
        }
        Ok(board)
    }

    /// Parses the position notation.
    ///
    /// # Errors
    ///
    /// If a token is malformed, references an unknown piece kind or a square
    /// outside of the board, or if two tokens share a square.
    pub fn from_notation(cols: u8, rows: u8, notation: &str) -> anyhow::Result<Self> {
        let placements = notation
            .split_terminator('|')
            .map(|token| {
                if token.is_empty() {
                    bail!("position notation contains an empty token: '{notation}'");
                }
                Placement::try_from(token)
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("incorrect position notation: '{notation}'"))?;
        Self::with_placements(cols, rows, &placements)
    }

    /// Serializes the pieces to the position notation. Tokens are ordered by
    /// rank, then by file.
    #[must_use]
    pub fn to_notation(&self) -> String {
        self.placements()
            .iter()
            .map(|placement| format!("{placement}|"))
            .collect()
    }

    /// Number of files.
    #[must_use]
    pub const fn cols(&self) -> u8 {
        self.cols
    }

    /// Number of ranks.
    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn contains(&self, square: Square) -> bool {
        square.file() < self.cols && square.rank() < self.rows
    }

    fn index(&self, square: Square) -> Option<usize> {
        self.contains(square)
            .then(|| usize::from(square.rank()) * usize::from(self.cols) + usize::from(square.file()))
    }

    /// Moves `square` by `offset`, staying within the board.
    #[must_use]
    pub fn shift(&self, square: Square, offset: Offset) -> Option<Square> {
        square.shift(offset).filter(|&target| self.contains(target))
    }

    /// Returns the piece on `square`. Squares outside of the board are
    /// always empty.
    #[must_use]
    pub fn occupant_at(&self, square: Square) -> Option<Piece> {
        self.index(square).and_then(|index| self.squares[index])
    }

    /// Puts `piece` on `square`, replacing the previous occupant.
    pub fn place(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.contains(square), "{square} is outside of the board");
        if let Some(index) = self.index(square) {
            self.squares[index] = Some(piece);
        }
    }

    /// Removes the occupant of `square`, if any.
    pub fn clear(&mut self, square: Square) {
        if let Some(index) = self.index(square) {
            self.squares[index] = None;
        }
    }

    /// Relocates the occupant of the start square to the destination,
    /// replacing whatever stood there, and promotes a Sarbaz reaching its last
    /// rank. Legality is not checked.
    pub fn apply(&mut self, next_move: Move) {
        let promoted = self.is_promotion(next_move);
        let piece = self
            .index(next_move.start())
            .and_then(|index| self.squares[index].take())
            .map(|piece| match piece.kind.promotion() {
                Some(kind) if promoted => Piece::new(piece.color, kind),
                _ => piece,
            });
        if let Some(index) = self.index(next_move.destination()) {
            self.squares[index] = piece;
        }
    }

    /// A Sarbaz promotes exactly when it lands on the farthest rank in its
    /// direction of travel.
    #[must_use]
    pub fn is_promotion(&self, candidate: Move) -> bool {
        let Some(piece) = self.occupant_at(candidate.start()) else {
            return false;
        };
        let last_rank = match piece.kind.advancing() {
            Some(Color::White) => self.rows - 1,
            Some(Color::Black) => 0,
            None => return false,
        };
        piece.kind.promotion().is_some() && candidate.destination().rank() == last_rank
    }

    /// Returns an independent copy of the board with `next_move` applied.
    #[must_use]
    pub fn snapshot_after(&self, next_move: Move) -> Self {
        let mut snapshot = self.clone();
        snapshot.apply(next_move);
        snapshot
    }

    /// All squares of the board, rank by rank.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.rows).flat_map(move |rank| (0..self.cols).map(move |file| Square::new(file, rank)))
    }

    /// Occupied squares with their pieces, rank by rank.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares()
            .filter_map(move |square| self.occupant_at(square).map(|piece| (square, piece)))
    }

    /// Squares occupied by `color`'s pieces.
    pub fn squares_of(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        self.pieces()
            .filter(move |(_, piece)| piece.color == color)
            .map(|(square, _)| square)
    }

    /// Number of pieces `color` has left.
    #[must_use]
    pub fn count(&self, color: Color) -> usize {
        self.squares_of(color).count()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn placements(&self) -> Vec<Placement> {
        self.pieces()
            .map(|(square, piece)| Placement::new(piece.color, piece.kind, square))
            .collect()
    }
}

impl fmt::Display for Board {
    /// Prints the board in position notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_notation())
    }
}

impl fmt::Debug for Board {
    /// Draws the board from White's perspective, the last rank on top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..self.rows).rev() {
            write!(f, "{:>2} ", u16::from(rank) + 1)?;
            for file in 0..self.cols {
                match self.occupant_at(Square::new(file, rank)) {
                    Some(piece) => write!(f, " {piece}")?,
                    None => write!(f, "  . ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for file in 0..self.cols {
            let letter = char::from_u32(u32::from('A') + u32::from(file)).unwrap_or('?');
            write!(f, "  {letter} ")?;
        }
        writeln!(f)
    }
}
