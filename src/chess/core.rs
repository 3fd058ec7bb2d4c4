//! Shatranj primitives commonly used within [`crate::chess`].

use std::fmt;
use std::ops::Mul;

use anyhow::{bail, Context};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Number of files on the classical board.
pub const BOARD_WIDTH: u8 = 8;
/// Number of ranks on the classical board.
pub const BOARD_HEIGHT: u8 = 8;
/// Files are written as a single letter, hence at most `A..=Z`.
pub const MAX_FILES: u8 = 26;
/// Ranks are written as 1-based numbers; two digits are enough for any board
/// anyone would play on.
pub const MAX_RANKS: u8 = 99;

/// Shatranj is played between two players: White (moving first in the
/// classical setup) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Single-letter prefix used by the position notation.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::White => 'W',
            Self::Black => 'B',
        }
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("color should be 'white' or 'black', got '{color}'"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

/// Relative displacement between two squares: `files` to the right and
/// `ranks` up, both from White's perspective.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    files: i16,
    ranks: i16,
}

impl Offset {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(files: i16, ranks: i16) -> Self {
        Self { files, ranks }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn files(self) -> i16 {
        self.files
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn ranks(self) -> i16 {
        self.ranks
    }
}

impl Mul<u8> for Offset {
    type Output = Self;

    /// Stretches a single step to `distance` steps along the same line.
    /// Scaling by zero leaves the offset as is: rays are always walked from
    /// distance 1.
    fn mul(self, distance: u8) -> Self {
        if distance == 0 {
            return self;
        }
        let distance = i16::from(distance);
        Self::new(
            self.files.saturating_mul(distance),
            self.ranks.saturating_mul(distance),
        )
    }
}

/// Board coordinate: zero-based file (column) and rank (row). The square does
/// not know the board it belongs to, [`crate::chess::board::Board`] decides
/// whether it is within the extent.
///
/// ```
/// use shatranj::chess::core::Square;
///
/// let square = Square::try_from("D4").unwrap();
/// assert_eq!((square.file(), square.rank()), (3, 3));
/// assert_eq!(square.to_string(), "D4");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Color of the square itself. Only matters for drawing the board.
    #[must_use]
    pub const fn checker_color(self) -> Color {
        if (self.file as u16 + self.rank as u16) % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Moves the square by `offset`. Returns [`None`] if either coordinate
    /// would become negative; the upper bound is checked by the board.
    #[must_use]
    pub fn shift(self, offset: Offset) -> Option<Self> {
        let file = i32::from(self.file) + i32::from(offset.files());
        let rank = i32::from(self.rank) + i32::from(offset.ranks());
        Some(Self::new(u8::try_from(file).ok()?, u8::try_from(rank).ok()?))
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    /// Parses a square from its notation: file letter followed by 1-based
    /// rank number, e.g. `D4` or `b12`.
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let mut chars = square.chars();
        let file = match chars.next() {
            Some(file @ ('A'..='Z' | 'a'..='z')) => file.to_ascii_uppercase() as u8 - b'A',
            Some(file) => bail!("file should be within 'A'..='Z', got '{file}'"),
            None => bail!("square should not be empty"),
        };
        let rank = chars.as_str();
        if rank.is_empty() || !rank.bytes().all(|c| c.is_ascii_digit()) {
            bail!("rank should be a number, got '{rank}' in {square}");
        }
        let rank: u8 = rank
            .parse()
            .with_context(|| format!("rank can not be parsed in {square}"))?;
        match rank {
            1..=MAX_RANKS => Ok(Self::new(file, rank - 1)),
            _ => bail!("rank should be within 1..={MAX_RANKS}, got {rank}"),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = anyhow::Error;

    fn try_from(square: String) -> anyhow::Result<Self> {
        Self::try_from(square.as_str())
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from_u32(u32::from('A') + u32::from(self.file)).unwrap_or('?');
        write!(f, "{file}{}", u16::from(self.rank) + 1)
    }
}

/// Shatranj pieces. The pawn-like [`PieceKind::WhiteSarbaz`] and
/// [`PieceKind::BlackSarbaz`] are separate kinds because they advance in
/// opposite directions.
///
/// What each kind can do is described by
/// [`crate::chess::catalog::Capability`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum PieceKind {
    /// The king.
    #[serde(rename = "SH")]
    Shah,
    /// The counsellor: one step diagonally.
    #[serde(rename = "FZ")]
    Ferz,
    /// The chariot: any distance orthogonally.
    #[serde(rename = "RH")]
    Rukh,
    /// The elephant: jumps exactly two squares diagonally.
    #[serde(rename = "PL")]
    Pil,
    /// The horse: knight leap.
    #[serde(rename = "AB")]
    Asb,
    #[allow(missing_docs)]
    #[serde(rename = "WS")]
    WhiteSarbaz,
    #[allow(missing_docs)]
    #[serde(rename = "BS")]
    BlackSarbaz,
}

impl PieceKind {
    /// Two-letter code used by the position notation.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Shah => "SH",
            Self::Ferz => "FZ",
            Self::Rukh => "RH",
            Self::Pil => "PL",
            Self::Asb => "AB",
            Self::WhiteSarbaz => "WS",
            Self::BlackSarbaz => "BS",
        }
    }

    /// The Sarbaz marching in `color`'s direction.
    #[must_use]
    pub const fn sarbaz(color: Color) -> Self {
        match color {
            Color::White => Self::WhiteSarbaz,
            Color::Black => Self::BlackSarbaz,
        }
    }
}

impl TryFrom<&str> for PieceKind {
    type Error = anyhow::Error;

    fn try_from(code: &str) -> anyhow::Result<Self> {
        match Self::iter().find(|kind| kind.code() == code) {
            Some(kind) => Ok(kind),
            None => bail!(
                "piece code should be one of {}, got '{code}'",
                Self::iter().map(Self::code).join(", ")
            ),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub color: Color,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.letter(), self.kind)
    }
}

/// A move only knows where it starts and where it ends: the moving piece,
/// captures and promotion are derived from the board it is applied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Move {
    start: Square,
    destination: Square,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(start: Square, destination: Square) -> Self {
        Self { start, destination }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn start(self) -> Square {
        self.start
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn destination(self) -> Square {
        self.destination
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    /// Parses the text notation: `"<start> <destination>"`, e.g. `"D2 D3"`.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let Some((start, destination)) = input.split_whitespace().collect_tuple() else {
            bail!("move should be two squares separated by a space, got '{input}'");
        };
        Ok(Self::new(start.try_into()?, destination.try_into()?))
    }
}

impl TryFrom<String> for Move {
    type Error = anyhow::Error;

    fn try_from(input: String) -> anyhow::Result<Self> {
        Self::try_from(input.as_str())
    }
}

impl From<Move> for String {
    fn from(value: Move) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start, self.destination)
    }
}
