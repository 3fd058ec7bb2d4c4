//! Pseudo-legal move generation: every move a piece can geometrically make on
//! the current board, without looking at whether it leaves its own Shah
//! attacked. Filtering those out is done by [`Board::legal_moves`].
//!
//! All the information about the movement comes from
//! [`crate::chess::catalog::Capability`]:
//!
//! - Long-range pieces walk each step along a ray until the first occupied
//!   square (captured when it holds an enemy piece) or the board edge.
//! - Pieces with capture-only steps capture exclusively along them and move
//!   along their regular steps only to empty squares.
//! - Everything else makes a single step onto an empty or enemy-occupied
//!   square.

use crate::chess::board::Board;
use crate::chess::core::{Color, Move, Square};

impl Board {
    /// Generates moves of the piece standing on `from`. An empty square yields
    /// no moves.
    #[must_use]
    pub fn pseudo_legal_moves(&self, from: Square) -> Vec<Move> {
        let Some(piece) = self.occupant_at(from) else {
            return Vec::new();
        };
        let capability = piece.kind.capability();
        let mut moves = Vec::with_capacity(capability.steps.len());
        if capability.long_range {
            for &step in capability.steps {
                for distance in 1..=u8::MAX {
                    let Some(to) = self.shift(from, step * distance) else {
                        break;
                    };
                    match self.occupant_at(to) {
                        None => moves.push(Move::new(from, to)),
                        Some(target) => {
                            if target.color != piece.color {
                                moves.push(Move::new(from, to));
                            }
                            break;
                        },
                    }
                }
            }
        } else if !capability.capture_only.is_empty() {
            for &step in capability.capture_only {
                if let Some(to) = self.shift(from, step) {
                    if self.holds_enemy_of(piece.color, to) {
                        moves.push(Move::new(from, to));
                    }
                }
            }
            for &step in capability.steps {
                if let Some(to) = self.shift(from, step) {
                    if self.occupant_at(to).is_none() {
                        moves.push(Move::new(from, to));
                    }
                }
            }
        } else {
            for &step in capability.steps {
                if let Some(to) = self.shift(from, step) {
                    if self.occupant_at(to).is_none() || self.holds_enemy_of(piece.color, to) {
                        moves.push(Move::new(from, to));
                    }
                }
            }
        }
        moves
    }

    /// Pseudo-legal moves of all `color`'s pieces.
    #[must_use]
    pub fn pseudo_legal_moves_of(&self, color: Color) -> Vec<Move> {
        self.squares_of(color)
            .flat_map(|from| self.pseudo_legal_moves(from))
            .collect()
    }

    fn holds_enemy_of(&self, color: Color, square: Square) -> bool {
        self.occupant_at(square)
            .is_some_and(|occupant| occupant.color != color)
    }
}
