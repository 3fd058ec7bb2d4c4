//! [`Game`] drives a single Shatranj game: it owns the board and the turn,
//! accepts moves and decides when the game is over.
//!
//! A game is never finished by checkmate as such. After each move the side
//! now to move is examined:
//!
//! - Both sides having a single piece left is a draw.
//! - Having no legal moves loses.
//! - Having a single piece left loses, unless one of the legal moves leaves
//!   the opponent with a single piece too (the bare king rule).

use anyhow::bail;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::chess::board::{Board, Placement, CLASSICAL_LAYOUT};
use crate::chess::core::{Color, Move, BOARD_HEIGHT, BOARD_WIDTH};

/// Settings a game is created from. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    #[allow(missing_docs)]
    pub board_cols: u8,
    #[allow(missing_docs)]
    pub board_rows: u8,
    /// [`None`] stands for the classical layout.
    pub starting_position: Option<Vec<Placement>>,
    /// The side to move.
    pub turn: Color,
    #[allow(missing_docs)]
    pub has_started: bool,
    #[allow(missing_docs)]
    pub has_finished: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_cols: BOARD_WIDTH,
            board_rows: BOARD_HEIGHT,
            starting_position: None,
            turn: Color::White,
            has_started: false,
            has_finished: false,
        }
    }
}

impl GameConfig {
    /// Configuration of a game starting from the position written in the
    /// notation.
    ///
    /// # Errors
    ///
    /// If the notation can not be parsed or does not fit the board.
    pub fn from_notation(cols: u8, rows: u8, notation: &str, turn: Color) -> anyhow::Result<Self> {
        let board = Board::from_notation(cols, rows, notation)?;
        Ok(Self {
            board_cols: cols,
            board_rows: rows,
            starting_position: Some(board.placements()),
            turn,
            ..Self::default()
        })
    }
}

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "winner", rename_all = "lowercase")]
pub enum Outcome {
    #[allow(missing_docs)]
    Win(Color),
    #[allow(missing_docs)]
    Draw,
}

impl Outcome {
    /// [`None`] for a draw.
    #[must_use]
    pub const fn winner(self) -> Option<Color> {
        match self {
            Self::Win(color) => Some(color),
            Self::Draw => None,
        }
    }
}

/// Reasons to reject a move. None of them changes the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The move is not among the legal moves of the side to move.
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    #[allow(missing_docs)]
    #[error("not your turn: {expected} to move, got a move from {got}")]
    WrongTurn { expected: Color, got: Color },
    #[allow(missing_docs)]
    #[error("game is already finished")]
    GameFinished,
}

/// What an accepted move changed, ready to be sent to both players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Position after the move, in position notation.
    pub position: String,
    #[allow(missing_docs)]
    #[serde(rename = "move")]
    pub applied: Move,
    /// Set when the move finished the game.
    pub outcome: Option<Outcome>,
}

/// State of a single game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    has_started: bool,
    has_finished: bool,
    last_move: Option<Move>,
    history: Vec<Move>,
    initial_position: String,
    outcome: Option<Outcome>,
}

impl Game {
    /// Creates the game and checks that the position can be played from.
    ///
    /// # Errors
    ///
    /// If the board dimensions or placements are invalid, a side does not
    /// have exactly one Shah or the side that just moved is left in check.
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        let placements = config
            .starting_position
            .as_deref()
            .unwrap_or(CLASSICAL_LAYOUT.as_slice());
        let board = Board::with_placements(config.board_cols, config.board_rows, placements)?;
        for color in Color::iter() {
            let shahs = board
                .pieces()
                .filter(|(_, piece)| piece.color == color && piece.kind.is_royal())
                .count();
            if shahs != 1 {
                bail!("position should have exactly one {color} shah, got {shahs}: {board}");
            }
        }
        if board.is_in_check(config.turn.opponent()) {
            bail!(
                "{} shah can be captured while {} is to move: {board}",
                config.turn.opponent(),
                config.turn
            );
        }
        let mut game = Self {
            initial_position: board.to_notation(),
            board,
            turn: config.turn,
            has_started: config.has_started,
            has_finished: config.has_finished,
            last_move: None,
            history: Vec::new(),
            outcome: None,
        };
        if game.has_finished {
            game.outcome = game.evaluate();
        }
        Ok(game)
    }

    /// Classical 8×8 game with White to move.
    #[must_use]
    pub fn classical() -> Self {
        let board = Board::classical();
        Self {
            initial_position: board.to_notation(),
            board,
            turn: Color::White,
            has_started: false,
            has_finished: false,
            last_move: None,
            history: Vec::new(),
            outcome: None,
        }
    }

    /// Game on the classical board starting from the given position.
    ///
    /// # Errors
    ///
    /// See [`GameConfig::from_notation`] and [`Game::new`].
    pub fn from_notation(notation: &str, turn: Color) -> anyhow::Result<Self> {
        Self::new(GameConfig::from_notation(
            BOARD_WIDTH,
            BOARD_HEIGHT,
            notation,
            turn,
        )?)
    }

    /// Attaches what the configuration does not carry to a restored game.
    pub(crate) fn restore(
        mut self,
        initial_position: String,
        history: Vec<Move>,
        outcome: Option<Outcome>,
    ) -> Self {
        self.initial_position = initial_position;
        self.last_move = history.last().copied();
        self.history = history;
        if self.has_finished && outcome.is_some() {
            self.outcome = outcome;
        }
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[must_use]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    /// Whether at least one move was made.
    #[must_use]
    pub const fn has_started(&self) -> bool {
        self.has_started
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn has_finished(&self) -> bool {
        self.has_finished
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Moves applied since the game was created or restored, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Position notation of the board the game was created with.
    #[must_use]
    pub fn initial_position(&self) -> &str {
        &self.initial_position
    }

    /// How the game ended. Always [`None`] until it is finished; also
    /// [`None`] for a game restored as finished without a known result.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Moves the side to move can make. A finished game has none.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.has_finished {
            return Vec::new();
        }
        self.board.legal_moves(self.turn)
    }

    /// Whether the side to move has lost by the rules: it has no legal moves
    /// or it is down to a bare king.
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.board.legal_moves(self.turn).is_empty() || self.board.is_bare_king_loss(self.turn)
    }

    /// Whether both sides are down to a bare king.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.board.is_bare_king_draw()
    }

    fn evaluate(&self) -> Option<Outcome> {
        if self.is_draw() {
            Some(Outcome::Draw)
        } else if self.is_win() {
            Some(Outcome::Win(self.turn.opponent()))
        } else {
            None
        }
    }

    /// Applies a move of the side to move, switches the turn and checks
    /// whether the game is over.
    ///
    /// # Errors
    ///
    /// If the game is finished or the move is not legal. The game is left
    /// untouched.
    pub fn process_move(&mut self, candidate: Move) -> Result<MoveReport, MoveError> {
        if self.has_finished {
            warn!("Rejected {candidate}: game is already finished");
            return Err(MoveError::GameFinished);
        }
        if !self.board.legal_moves(self.turn).contains(&candidate) {
            warn!("Rejected illegal move {candidate} of {}", self.turn);
            return Err(MoveError::IllegalMove(candidate));
        }
        self.board.apply(candidate);
        debug!("{} played {candidate}: {}", self.turn, self.board);
        self.last_move = Some(candidate);
        self.history.push(candidate);
        self.has_started = true;
        self.turn = self.turn.opponent();
        self.outcome = self.evaluate();
        debug!("Termination for {} to move: {:?}", self.turn, self.outcome);
        if let Some(outcome) = self.outcome {
            self.has_finished = true;
            info!("Game finished after {} moves: {outcome:?}", self.history.len());
        }
        Ok(MoveReport {
            position: self.board.to_notation(),
            applied: candidate,
            outcome: self.outcome,
        })
    }

    /// Same as [`Game::process_move`] for a move submitted by `color`.
    ///
    /// # Errors
    ///
    /// [`MoveError::WrongTurn`] if `color` is not the side to move, otherwise
    /// as [`Game::process_move`].
    pub fn submit(&mut self, color: Color, candidate: Move) -> Result<MoveReport, MoveError> {
        if self.has_finished {
            return Err(MoveError::GameFinished);
        }
        if color != self.turn {
            warn!("Rejected {candidate}: {color} moved out of turn");
            return Err(MoveError::WrongTurn {
                expected: self.turn,
                got: color,
            });
        }
        self.process_move(candidate)
    }

    /// `color` gives up and the opponent wins.
    ///
    /// # Errors
    ///
    /// If the game is already finished.
    pub fn resign(&mut self, color: Color) -> Result<Outcome, MoveError> {
        self.finish(Outcome::Win(color.opponent()))
    }

    /// Both players agree to a draw.
    ///
    /// # Errors
    ///
    /// If the game is already finished.
    pub fn agree_draw(&mut self) -> Result<Outcome, MoveError> {
        self.finish(Outcome::Draw)
    }

    fn finish(&mut self, outcome: Outcome) -> Result<Outcome, MoveError> {
        if self.has_finished {
            return Err(MoveError::GameFinished);
        }
        self.has_finished = true;
        self.outcome = Some(outcome);
        info!("Game finished without a move: {outcome:?}");
        Ok(outcome)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::classical()
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::{Piece, PieceKind, Square};

    fn setup(notation: &str, turn: Color) -> Game {
        Game::from_notation(notation, turn)
            .unwrap_or_else(|e| panic!("invalid position {notation}: {e:#}"))
    }

    fn make(notation: &str) -> Move {
        Move::try_from(notation).unwrap()
    }

    #[test]
    fn default_config() {
        let game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game, Game::classical());
        assert_eq!(game.turn(), Color::White);
        assert!(!game.has_started());
        assert!(!game.has_finished());
        assert_eq!(game.last_move(), None);
        assert_eq!(game.initial_position(), Board::classical().to_notation());
        assert_eq!(game.legal_moves().len(), 16);
    }

    #[test]
    fn config_from_partial_json() {
        let config: GameConfig = serde_json::from_str(r#"{"turn": "BLACK"}"#).unwrap();
        assert_eq!(
            config,
            GameConfig {
                turn: Color::Black,
                ..GameConfig::default()
            }
        );
        let config: GameConfig = serde_json::from_str(
            r#"{
                "board_cols": 5,
                "board_rows": 5,
                "starting_position": [
                    {"color": "WHITE", "kind": "SH", "square": "A1"},
                    {"color": "BLACK", "kind": "SH", "square": "E5"}
                ]
            }"#,
        )
        .unwrap();
        let game = Game::new(config).unwrap();
        assert_eq!(game.board().cols(), 5);
        assert_eq!(game.initial_position(), "WSHA1|BSHE5|");
        assert!(serde_json::from_str::<GameConfig>(r#"{"colour": "WHITE"}"#).is_err());
    }

    #[test]
    fn invalid_configs() {
        for (notation, turn) in [
            ("WSHD1|", Color::White),
            ("WSHD1|BSHD8|WSHA1|", Color::White),
            ("WRHA1|BRHA8|", Color::White),
            // Black Shah is attacked while White is to move.
            ("WSHA1|BSHH8|WRHH2|", Color::White),
        ] {
            assert!(
                Game::from_notation(notation, turn).is_err(),
                "{notation} {turn}"
            );
        }
        // The classical layout does not fit.
        assert!(Game::new(GameConfig {
            board_cols: 6,
            ..GameConfig::default()
        })
        .is_err());
        // Side to move may be in check.
        assert!(Game::from_notation("WSHA1|BSHH8|WRHH2|", Color::Black).is_ok());
    }

    #[test]
    fn process_move() {
        let mut game = Game::classical();
        let report = game.process_move(make("B1 C3")).unwrap();
        assert_eq!(report.applied, make("B1 C3"));
        assert_eq!(report.outcome, None);
        assert_eq!(report.position, game.board().to_notation());
        assert!(game.has_started());
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.last_move(), Some(make("B1 C3")));
        assert_eq!(
            game.board().occupant_at(Square::try_from("C3").unwrap()),
            Some(Piece::new(Color::White, PieceKind::Asb))
        );
        let _ = game.process_move(make("D7 D6")).unwrap();
        assert_eq!(game.history(), &[make("B1 C3"), make("D7 D6")]);
        assert_eq!(game.initial_position(), Board::classical().to_notation());
    }

    #[test]
    fn illegal_move_leaves_game_unchanged() {
        let mut game = Game::classical();
        let _ = game.process_move(make("E2 E3")).unwrap();
        let before = game.clone();
        for candidate in ["E7 E5", "E2 E4", "D8 D7", "A1 A3", "H3 H4"] {
            assert_eq!(
                game.process_move(make(candidate)),
                Err(MoveError::IllegalMove(make(candidate)))
            );
            assert_eq!(game, before);
        }
    }

    #[test]
    fn wrong_turn() {
        let mut game = Game::classical();
        assert_eq!(
            game.submit(Color::Black, make("E7 E6")),
            Err(MoveError::WrongTurn {
                expected: Color::White,
                got: Color::Black,
            })
        );
        assert_eq!(game, Game::classical());
        assert!(game.submit(Color::White, make("E2 E3")).is_ok());
        assert!(game.submit(Color::Black, make("E7 E6")).is_ok());
    }

    #[test]
    fn promoted_sarbaz_moves_as_ferz() {
        let mut game = setup("WSHA1|BSHH8|BBSH5|WWSC7|", Color::White);
        let _ = game.process_move(make("C7 C8")).unwrap();
        assert_eq!(
            game.board().occupant_at(Square::try_from("C8").unwrap()),
            Some(Piece::new(Color::White, PieceKind::Ferz))
        );
        let _ = game.process_move(make("H5 H4")).unwrap();
        assert_eq!(
            game.legal_moves()
                .into_iter()
                .filter(|candidate| candidate.start() == Square::try_from("C8").unwrap())
                .map(|candidate| candidate.to_string())
                .sorted()
                .collect_vec(),
            vec!["C8 B7", "C8 D7"]
        );
    }

    #[test]
    fn no_moves_left() {
        let mut game = setup("WSHA1|WRHB7|WFZF6|BSHH8|BFZG7|", Color::White);
        let report = game.process_move(make("B7 G7")).unwrap();
        assert_eq!(report.outcome, Some(Outcome::Win(Color::White)));
        assert!(game.has_finished());
        assert!(game.is_win());
        assert!(!game.is_draw());
        assert!(game.legal_moves().is_empty());
        assert_eq!(
            game.process_move(make("H8 G8")),
            Err(MoveError::GameFinished)
        );
    }

    #[test]
    fn bare_king_loss() {
        let mut game = setup("WSHA1|WRHD3|BSHH8|BRHD5|", Color::White);
        assert!(!game.is_win());
        let report = game.process_move(make("D3 D5")).unwrap();
        assert_eq!(report.outcome, Some(Outcome::Win(Color::White)));
        assert!(!game.board().legal_moves(Color::Black).is_empty());
        assert_eq!(game.outcome().and_then(Outcome::winner), Some(Color::White));
    }

    #[test]
    fn bare_king_draw() {
        let mut game = setup("WSHA1|BSHH8|BRHA2|", Color::White);
        let report = game.process_move(make("A1 A2")).unwrap();
        assert_eq!(report.outcome, Some(Outcome::Draw));
        assert!(game.is_draw());
        assert!(!game.is_win());
        assert!(game.has_finished());
        assert_eq!(game.outcome().and_then(Outcome::winner), None);
    }

    #[test]
    fn draw_takes_precedence_over_stalemate() {
        // On a single file the lone black Shah can not step next to its rival.
        let config = GameConfig::from_notation(1, 4, "WSHA1|BRHA2|BSHA4|", Color::White).unwrap();
        let mut game = Game::new(config).unwrap();
        let report = game.process_move(make("A1 A2")).unwrap();
        assert!(game.board().legal_moves(Color::Black).is_empty());
        assert!(game.is_win());
        assert!(game.is_draw());
        assert_eq!(report.outcome, Some(Outcome::Draw));
        assert_eq!(game.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn resign_and_draw() {
        let mut game = Game::classical();
        assert_eq!(game.resign(Color::White), Ok(Outcome::Win(Color::Black)));
        assert!(game.has_finished());
        assert_eq!(game.resign(Color::Black), Err(MoveError::GameFinished));
        assert_eq!(game.agree_draw(), Err(MoveError::GameFinished));
        assert_eq!(game.outcome(), Some(Outcome::Win(Color::Black)));

        let mut game = Game::classical();
        assert_eq!(game.agree_draw(), Ok(Outcome::Draw));
        assert!(game.legal_moves().is_empty());
        assert_eq!(
            game.submit(Color::White, make("E2 E3")),
            Err(MoveError::GameFinished)
        );
    }

    #[test]
    fn outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&Outcome::Win(Color::Black)).unwrap(),
            r#"{"result":"win","winner":"BLACK"}"#
        );
        assert_eq!(
            serde_json::to_string(&Outcome::Draw).unwrap(),
            r#"{"result":"draw"}"#
        );
        let report = MoveReport {
            position: "WSHA1|BSHH8|".to_string(),
            applied: make("A2 A1"),
            outcome: Some(Outcome::Draw),
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"position":"WSHA1|BSHH8|","move":"A2 A1","outcome":{"result":"draw"}}"#
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            MoveError::IllegalMove(make("A1 A2")).to_string(),
            "illegal move: A1 A2"
        );
        assert_eq!(
            MoveError::WrongTurn {
                expected: Color::White,
                got: Color::Black
            }
            .to_string(),
            "not your turn: white to move, got a move from black"
        );
    }
}
