//! Check detection and legal move filtering.
//!
//! Legality is decided by playing each pseudo-legal candidate on a
//! [snapshot](Board::snapshot_after) and throwing it away if the mover's Shah
//! ends up attacked. Leaving the Shah attacked is the only constraint on top
//! of the piece geometry.

use crate::chess::board::Board;
use crate::chess::core::{Color, Move, Square};

impl Board {
    /// Whether any of `by`'s pieces can move to `square`.
    #[must_use]
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        self.squares_of(by).any(|from| {
            self.pseudo_legal_moves(from)
                .iter()
                .any(|candidate| candidate.destination() == square)
        })
    }

    /// Square of `color`'s royal piece.
    #[must_use]
    pub fn royal_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.color == color && piece.kind.is_royal())
            .map(|(square, _)| square)
    }

    /// Whether `color`'s Shah is attacked by the opponent.
    ///
    /// # Panics
    ///
    /// If `color` has no Shah on the board: such position can not come out of
    /// a valid game.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        let Some(shah) = self.royal_square(color) else {
            panic!("no {color} shah on the board: {}", self.to_notation());
        };
        self.is_attacked(shah, color.opponent())
    }

    /// Moves `color` can make without leaving its own Shah attacked.
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.pseudo_legal_moves_of(color)
            .into_iter()
            .filter(|&candidate| !self.snapshot_after(candidate).is_in_check(color))
            .collect()
    }

    /// Bare-king loss: `color` is down to a single piece and no legal move
    /// reduces the opponent to a single piece as well.
    #[must_use]
    pub fn is_bare_king_loss(&self, color: Color) -> bool {
        self.count(color) == 1
            && self
                .legal_moves(color)
                .into_iter()
                .all(|candidate| self.snapshot_after(candidate).count(color.opponent()) > 1)
    }

    /// Both sides are down to a single piece.
    #[must_use]
    pub fn is_bare_king_draw(&self) -> bool {
        self.count(Color::White) == 1 && self.count(Color::Black) == 1
    }
}
