use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Incremented on every reset, deferred effects of an older generation are dropped.
pub type Generation = u64;

/// Time the player gets to see a matching pair before it is marked.
pub const MATCH_DELAY: Duration = Duration::from_millis(600);
/// Longer than [`MATCH_DELAY`] so a mismatch can be memorized before it flips back.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1_000);
/// How long a hint keeps every unmatched card face up.
pub const HINT_DURATION: Duration = Duration::from_millis(2_000);
/// How long the win celebration stays on screen.
pub const CELEBRATION_DURATION: Duration = Duration::from_millis(5_000);
/// Period of [`MatchSession::tick`].
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    ResolveMatch(CardId, CardId),
    ResolveMismatch(CardId, CardId),
    EndHint,
    EndCelebration,
}

impl DeferredAction {
    pub const fn delay(self) -> Duration {
        use DeferredAction::*;
        match self {
            ResolveMatch(..) => MATCH_DELAY,
            ResolveMismatch(..) => MISMATCH_DELAY,
            EndHint => HINT_DURATION,
            EndCelebration => CELEBRATION_DURATION,
        }
    }
}

/// An effect the host must hand back to [`MatchSession::run_deferred`] once
/// `delay` has passed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deferred {
    pub generation: Generation,
    pub delay: Duration,
    pub action: DeferredAction,
}

impl Deferred {
    pub const fn new(generation: Generation, action: DeferredAction) -> Self {
        Self {
            generation,
            delay: action.delay(),
            action,
        }
    }
}
