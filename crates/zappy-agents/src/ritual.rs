//! Ritual coordination state.
//!
//! A ritual needs several players of the same level on one tile. One player
//! (the caller) announces readiness, the others walk toward the sound and
//! confirm on arrival. [`RitualState`] tracks which part of that dance this
//! player is in; [`Coordination`] adds the quorum tally and the silence
//! counter that lets a stalled rendezvous time out.

use serde::Serialize;
use zappy_types::Direction;

/// Where this player stands in a ritual attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RitualState {
    /// No ritual in progress.
    #[default]
    Idle,
    /// Following a caller. `target` is the last heard direction, cleared once
    /// the path toward it has been sent.
    PreparingRitual {
        /// Direction of the caller's last ready broadcast.
        target: Option<Direction>,
    },
    /// Passed the gate and broadcasting readiness, waiting for the quorum.
    Calling,
    /// Arrived on the caller's tile and confirmed. Holds still until the
    /// caller casts.
    AwaitingQuorum,
    /// `Incantation` sent, waiting for its outcome.
    Casting,
}

/// Whether this player may start its own call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallSuppression {
    /// Nothing in progress; a call may start.
    Unset,
    /// Committed to someone else's ritual or already casting.
    Suppressed,
    /// This player's own call is live.
    Active,
}

impl RitualState {
    /// Call suppression implied by this state.
    pub const fn suppression(self) -> CallSuppression {
        match self {
            Self::Idle => CallSuppression::Unset,
            Self::Calling => CallSuppression::Active,
            Self::PreparingRitual { .. } | Self::AwaitingQuorum | Self::Casting => {
                CallSuppression::Suppressed
            }
        }
    }

    /// Whether the player has committed to a ritual on its current tile.
    pub const fn is_committed(self) -> bool {
        matches!(self, Self::Calling | Self::AwaitingQuorum | Self::Casting)
    }

    /// Whether the player is following another caller.
    pub const fn is_following(self) -> bool {
        matches!(self, Self::PreparingRitual { .. } | Self::AwaitingQuorum)
    }

    /// The pending travel target, if any.
    pub const fn rendezvous_target(self) -> Option<Direction> {
        match self {
            Self::PreparingRitual { target } => target,
            Self::Idle | Self::Calling | Self::AwaitingQuorum | Self::Casting => None,
        }
    }
}

/// Ritual state plus the counters that go with it.
///
/// Going back to [`RitualState::Idle`] always clears the quorum tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Coordination {
    state: RitualState,
    quorum: u32,
    idle_ticks: u32,
    ready_here_counted: bool,
    underway: bool,
}

impl Coordination {
    /// Idle with an empty tally.
    pub const fn new() -> Self {
        Self {
            state: RitualState::Idle,
            quorum: 0,
            idle_ticks: 0,
            ready_here_counted: false,
            underway: false,
        }
    }

    /// Current ritual state.
    pub const fn state(&self) -> RitualState {
        self.state
    }

    /// Ready players counted for the current attempt.
    pub const fn quorum(&self) -> u32 {
        self.quorum
    }

    /// Decision ticks since the last own-level signal.
    pub const fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    /// Move to `state`. Moving to Idle goes through [`Self::reset`].
    pub const fn transition(&mut self, state: RitualState) {
        if matches!(state, RitualState::Idle) {
            self.reset();
        } else {
            self.state = state;
        }
    }

    /// Abandon any attempt: Idle, empty tally, silence counter cleared.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Count the first signal of an attempt as the sender itself.
    pub const fn bump_from_zero(&mut self) {
        if self.quorum == 0 {
            self.quorum = 1;
        }
    }

    /// Count one more ready peer.
    pub const fn add_peer(&mut self) {
        self.quorum = self.quorum.saturating_add(1);
    }

    /// Count a ready peer sharing this tile. A co-located caller repeats
    /// its broadcast, so only the first one of an attempt counts.
    ///
    /// Returns whether the tally changed.
    pub const fn add_ready_peer_here(&mut self) -> bool {
        if self.ready_here_counted {
            return false;
        }
        self.ready_here_counted = true;
        self.add_peer();
        true
    }

    /// Record that a ritual started on this tile.
    pub const fn mark_underway(&mut self) {
        self.underway = true;
        self.idle_ticks = 0;
    }

    /// Whether a ritual has started on this tile during the attempt.
    pub const fn is_underway(&self) -> bool {
        self.underway
    }

    /// Record that a signal was just heard.
    pub const fn heard_signal(&mut self) {
        self.idle_ticks = 0;
    }

    /// Advance the silence counter by one decision tick and return it.
    pub const fn tick(&mut self) -> u32 {
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        self.idle_ticks
    }
}
