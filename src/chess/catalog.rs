//! Movement capabilities of each [`PieceKind`]. Pieces carry no behavior of
//! their own: move generation reads everything it needs from [`Capability`].

use crate::chess::core::{Color, Offset, PieceKind};

/// Static description of how a piece kind moves.
#[derive(Debug, PartialEq, Eq)]
pub struct Capability {
    /// Single steps the piece moves (and, unless [`Capability::capture_only`]
    /// is non-empty, captures) along.
    pub steps: &'static [Offset],
    /// Long-range pieces repeat their steps along a ray until blocked.
    pub long_range: bool,
    /// Steps that are only allowed when they capture an enemy piece. Pieces
    /// with such steps can not capture along [`Capability::steps`].
    pub capture_only: &'static [Offset],
    /// Whether the safety of this piece constrains the legal moves.
    pub royal: bool,
}

const SHAH_STEPS: [Offset; 8] = [
    Offset::new(-1, -1),
    Offset::new(-1, 0),
    Offset::new(-1, 1),
    Offset::new(0, -1),
    Offset::new(0, 1),
    Offset::new(1, -1),
    Offset::new(1, 0),
    Offset::new(1, 1),
];

const FERZ_STEPS: [Offset; 4] = [
    Offset::new(-1, -1),
    Offset::new(-1, 1),
    Offset::new(1, -1),
    Offset::new(1, 1),
];

const RUKH_STEPS: [Offset; 4] = [
    Offset::new(-1, 0),
    Offset::new(0, -1),
    Offset::new(1, 0),
    Offset::new(0, 1),
];

const PIL_STEPS: [Offset; 4] = [
    Offset::new(-2, -2),
    Offset::new(-2, 2),
    Offset::new(2, -2),
    Offset::new(2, 2),
];

const ASB_STEPS: [Offset; 8] = [
    Offset::new(-2, -1),
    Offset::new(-2, 1),
    Offset::new(-1, -2),
    Offset::new(-1, 2),
    Offset::new(1, -2),
    Offset::new(1, 2),
    Offset::new(2, -1),
    Offset::new(2, 1),
];

const WHITE_SARBAZ_STEPS: [Offset; 1] = [Offset::new(0, 1)];
const WHITE_SARBAZ_CAPTURES: [Offset; 2] = [Offset::new(-1, 1), Offset::new(1, 1)];
const BLACK_SARBAZ_STEPS: [Offset; 1] = [Offset::new(0, -1)];
const BLACK_SARBAZ_CAPTURES: [Offset; 2] = [Offset::new(-1, -1), Offset::new(1, -1)];

const fn stepper(steps: &'static [Offset]) -> Capability {
    Capability {
        steps,
        long_range: false,
        capture_only: &[],
        royal: false,
    }
}

/// Indexed by `PieceKind as usize`.
static CATALOG: [Capability; 7] = [
    // Shah.
    Capability {
        royal: true,
        ..stepper(&SHAH_STEPS)
    },
    // Ferz.
    stepper(&FERZ_STEPS),
    // Rukh.
    Capability {
        long_range: true,
        ..stepper(&RUKH_STEPS)
    },
    // Pil.
    stepper(&PIL_STEPS),
    // Asb.
    stepper(&ASB_STEPS),
    // WhiteSarbaz.
    Capability {
        capture_only: &WHITE_SARBAZ_CAPTURES,
        ..stepper(&WHITE_SARBAZ_STEPS)
    },
    // BlackSarbaz.
    Capability {
        capture_only: &BLACK_SARBAZ_CAPTURES,
        ..stepper(&BLACK_SARBAZ_STEPS)
    },
];

impl PieceKind {
    /// Looks up how pieces of this kind move.
    #[must_use]
    pub fn capability(self) -> &'static Capability {
        &CATALOG[self as usize]
    }

    /// The piece whose capture the check rule protects.
    #[must_use]
    pub fn is_royal(self) -> bool {
        self.capability().royal
    }

    /// What the piece becomes upon reaching the last rank in its direction of
    /// travel, if anything.
    #[must_use]
    pub const fn promotion(self) -> Option<Self> {
        match self {
            Self::WhiteSarbaz | Self::BlackSarbaz => Some(Self::Ferz),
            _ => None,
        }
    }

    /// Direction the piece advances in, for kinds whose movement depends on
    /// the color.
    #[must_use]
    pub const fn advancing(self) -> Option<Color> {
        match self {
            Self::WhiteSarbaz => Some(Color::White),
            Self::BlackSarbaz => Some(Color::Black),
            _ => None,
        }
    }
}
