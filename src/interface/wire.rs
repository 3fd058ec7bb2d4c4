//! Records exchanged with the outside world: moves submitted by players,
//! rendered positions sent back to them and the persisted game row.
//!
//! Coordinates are always `(col, row)`, zero-based, matching
//! [`Square::file`] and [`Square::rank`].

use anyhow::Context;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::chess::board::Board;
use crate::chess::core::{Color, Move, PieceKind, Square};
use crate::chess::game::{Game, GameConfig, Outcome};

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSquare {
    pub col: u8,
    pub row: u8,
}

impl From<Square> for WireSquare {
    fn from(square: Square) -> Self {
        Self {
            col: square.file(),
            row: square.rank(),
        }
    }
}

impl From<WireSquare> for Square {
    fn from(square: WireSquare) -> Self {
        Self::new(square.col, square.row)
    }
}

/// Move as submitted by a player. Coordinates are not validated here: a move
/// leaving the board is simply not legal.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub start: WireSquare,
    pub destination: WireSquare,
}

impl From<Move> for WireMove {
    fn from(value: Move) -> Self {
        Self {
            start: value.start().into(),
            destination: value.destination().into(),
        }
    }
}

impl From<WireMove> for Move {
    fn from(value: WireMove) -> Self {
        Self::new(value.start.into(), value.destination.into())
    }
}

/// A single piece of the rendered position.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPiece {
    pub position: WireSquare,
    pub color: Color,
    pub kind: PieceKind,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMetadata {
    pub cols: u8,
    pub rows: u8,
}

/// Everything a client needs to draw the board.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendering {
    pub board: BoardMetadata,
    pub position: Vec<RenderedPiece>,
}

/// Persisted state of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[allow(missing_docs)]
    pub board_cols: u8,
    #[allow(missing_docs)]
    pub board_rows: u8,
    /// The side to move.
    pub turn: Color,
    #[allow(missing_docs)]
    pub has_started: bool,
    #[allow(missing_docs)]
    pub has_finished: bool,
    /// Current position notation.
    pub position: String,
    /// Position notation the game was created with.
    pub initial_position: String,
    /// Applied moves in text notation, `|`-separated.
    pub moves: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub outcome: Option<Outcome>,
}

impl Game {
    /// Pieces on the board, rank by rank.
    #[must_use]
    pub fn render_position(&self) -> Vec<RenderedPiece> {
        self.board()
            .pieces()
            .map(|(square, piece)| RenderedPiece {
                position: square.into(),
                color: piece.color,
                kind: piece.kind,
            })
            .collect()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn render_board(&self) -> BoardMetadata {
        BoardMetadata {
            cols: self.board().cols(),
            rows: self.board().rows(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn render(&self) -> Rendering {
        Rendering {
            board: self.render_board(),
            position: self.render_position(),
        }
    }

    /// Snapshot of the game for persistence.
    #[must_use]
    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            board_cols: self.board().cols(),
            board_rows: self.board().rows(),
            turn: self.turn(),
            has_started: self.has_started(),
            has_finished: self.has_finished(),
            position: self.board().to_notation(),
            initial_position: self.initial_position().to_string(),
            moves: self.history().iter().join("|"),
            outcome: self.outcome(),
        }
    }

    /// Restores a persisted game.
    ///
    /// # Errors
    ///
    /// If either position or a move can not be parsed, or the position is
    /// not playable (see [`Game::new`]).
    pub fn from_record(record: &GameRecord) -> anyhow::Result<Self> {
        let config = GameConfig {
            has_started: record.has_started,
            has_finished: record.has_finished,
            ..GameConfig::from_notation(
                record.board_cols,
                record.board_rows,
                &record.position,
                record.turn,
            )?
        };
        let game = Self::new(config).context("incorrect game record")?;
        let initial_position = if record.initial_position.is_empty() {
            record.position.clone()
        } else {
            Board::from_notation(record.board_cols, record.board_rows, &record.initial_position)
                .context("incorrect initial position")?
                .to_notation()
        };
        let history = record
            .moves
            .split('|')
            .filter(|token| !token.is_empty())
            .map(Move::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("incorrect move history: '{}'", record.moves))?;
        Ok(game.restore(initial_position, history, record.outcome))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::game::MoveError;

    #[test]
    fn wire_move() {
        let json = r#"{"start":{"col":4,"row":1},"destination":{"col":4,"row":2}}"#;
        let wire: WireMove = serde_json::from_str(json).unwrap();
        let parsed = Move::from(wire);
        assert_eq!(parsed, Move::try_from("E2 E3").unwrap());
        assert_eq!(serde_json::to_string(&WireMove::from(parsed)).unwrap(), json);
    }

    #[test]
    fn off_board_wire_move_is_illegal() {
        let mut game = Game::classical();
        let wire = WireMove {
            start: WireSquare { col: 4, row: 1 },
            destination: WireSquare { col: 4, row: 200 },
        };
        assert!(matches!(
            game.process_move(wire.into()),
            Err(MoveError::IllegalMove(_))
        ));
        assert_eq!(game, Game::classical());
    }

    #[test]
    fn render() {
        let game = Game::from_notation("BSHH8|WSHA1|WRHB2|", Color::White).unwrap();
        assert_eq!(
            serde_json::to_value(game.render()).unwrap(),
            serde_json::json!({
                "board": {"cols": 8, "rows": 8},
                "position": [
                    {"position": {"col": 0, "row": 0}, "color": "WHITE", "kind": "SH"},
                    {"position": {"col": 1, "row": 1}, "color": "WHITE", "kind": "RH"},
                    {"position": {"col": 7, "row": 7}, "color": "BLACK", "kind": "SH"},
                ],
            })
        );
        assert_eq!(Game::classical().render_position().len(), 32);
    }

    #[test]
    fn record_round_trip() {
        let mut game = Game::classical();
        for notation in ["E2 E3", "D7 D6", "B1 C3"] {
            let _ = game.process_move(Move::try_from(notation).unwrap()).unwrap();
        }
        let record = game.to_record();
        assert_eq!(record.moves, "E2 E3|D7 D6|B1 C3");
        assert_eq!(record.turn, Color::Black);
        assert!(record.has_started);
        assert_eq!(record.initial_position, Board::classical().to_notation());
        let restored = Game::from_record(&record).unwrap();
        assert_eq!(restored, game);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(serde_json::from_str::<GameRecord>(&json).unwrap(), record);
    }

    #[test]
    fn finished_record() {
        let mut game = Game::classical();
        let _ = game.resign(Color::Black).unwrap();
        let restored = Game::from_record(&game.to_record()).unwrap();
        assert!(restored.has_finished());
        assert_eq!(restored.outcome(), Some(Outcome::Win(Color::White)));
        assert!(restored.legal_moves().is_empty());
    }

    #[test]
    fn record_without_history() {
        let record = GameRecord {
            board_cols: 8,
            board_rows: 8,
            turn: Color::White,
            has_started: false,
            has_finished: false,
            position: "WSHA1|BSHH8|".to_string(),
            initial_position: String::new(),
            moves: String::new(),
            outcome: None,
        };
        let game = Game::from_record(&record).unwrap();
        assert_eq!(game.initial_position(), "WSHA1|BSHH8|");
        assert!(game.history().is_empty());
        assert_eq!(game.last_move(), None);
    }

    #[test]
    fn malformed_records() {
        let valid = Game::classical().to_record();
        for record in [
            GameRecord {
                position: "WSHD1|BSHD8|WXXA1|".to_string(),
                ..valid.clone()
            },
            GameRecord {
                initial_position: "nonsense".to_string(),
                ..valid.clone()
            },
            GameRecord {
                moves: "E2 E3|E7".to_string(),
                ..valid.clone()
            },
            GameRecord {
                board_cols: 4,
                ..valid.clone()
            },
        ] {
            assert!(Game::from_record(&record).is_err(), "{record:?}");
        }
    }
}
