//! Rules engine for [Shatranj], the historical predecessor of chess: board
//! representation, move generation, legality checks and the bare king
//! termination rules. For more information, see [README].
//!
//! [Shatranj]: https://en.wikipedia.org/wiki/Shatranj
//! [README]: https://github.com/kirillbobyrev/shatranj/blob/main/README.md

pub mod chess;
pub mod interface;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}
