//! Ritual rendezvous: reacting to team signals and driving the hand-off.
//!
//! A player that passes its gate becomes the caller and repeats a ready
//! broadcast (`r`). Same-level players hearing it walk toward the sound one
//! step per tick; on reaching the caller's tile they answer with a call
//! (`c`) and hold still. The caller counts those calls and casts once the
//! quorum is in place. Silence for too long on either side abandons the
//! attempt.

use tracing::{debug, info};
use zappy_agents::{CallSuppression, Player, RitualState, Signal, SignalKind, quorum_threshold};
use zappy_types::{Command, Direction};

use crate::config::AgentConfig;
use crate::navigation;

/// What the ritual hand-off wants from this send opportunity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandOff {
    /// No ritual in progress; lower priorities may act.
    Continue,
    /// A ritual is in progress and nothing should be sent now.
    Wait,
    /// Send `commands`, then move to `next`.
    Send {
        /// Commands to queue.
        commands: Vec<Command>,
        /// Ritual state once they are queued.
        next: RitualState,
    },
}

/// Why coordination was abandoned on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abandoned {
    /// A follower heard nothing from its caller for too long.
    StaleRendezvous,
    /// A caller gathered nobody for too long.
    CallerGaveUp,
}

/// React to a coordination broadcast heard from `direction`.
///
/// Returns whether the signal concerned this player's level.
pub fn on_signal(player: &mut Player, direction: Direction, signal: Signal) -> bool {
    if signal.level != player.level {
        debug!(level = %signal.level, own = %player.level, "Ignoring signal for another level");
        return false;
    }

    let coordination = &mut player.coordination;
    coordination.heard_signal();
    coordination.bump_from_zero();

    match signal.kind {
        SignalKind::Call => {
            coordination.add_peer();
            let state = coordination.state();
            if !state.is_committed() && coordination.quorum() >= quorum_threshold(player.level) {
                debug!(quorum = coordination.quorum(), "Quorum met locally, cancelling travel");
                coordination.reset();
            }
        }
        SignalKind::Ready => {
            let state = coordination.state();
            match state.suppression() {
                // Our own call is live: only a ready peer on this tile counts,
                // and only once per attempt.
                CallSuppression::Active => {
                    if direction.is_here() && !coordination.add_ready_peer_here() {
                        debug!(quorum = coordination.quorum(), "Ready peer already counted");
                    }
                }
                CallSuppression::Unset | CallSuppression::Suppressed if !state.is_committed() => {
                    coordination.transition(RitualState::PreparingRitual {
                        target: Some(direction),
                    });
                }
                CallSuppression::Unset | CallSuppression::Suppressed => {}
            }
        }
    }
    true
}

/// Advance the silence counter for one decision tick and abandon the
/// attempt if it has gone quiet for too long.
pub fn tick(player: &mut Player, config: &AgentConfig) -> Option<Abandoned> {
    let state = player.coordination.state();
    // The caller is silent while casting; a follower on a tile where the
    // ritual has started holds still for as long as a caller would wait.
    let (limit, reason) = if state.is_following() && player.coordination.is_underway() {
        (config.caller_patience_ticks, Abandoned::StaleRendezvous)
    } else if state.is_following() {
        (config.stale_signal_ticks, Abandoned::StaleRendezvous)
    } else if matches!(state, RitualState::Calling) {
        (config.caller_patience_ticks, Abandoned::CallerGaveUp)
    } else {
        return None;
    };

    if player.coordination.tick() > limit {
        info!(
            ?reason,
            ?state,
            idle_ticks = player.coordination.idle_ticks(),
            "Abandoning ritual coordination"
        );
        player.coordination.reset();
        return Some(reason);
    }
    None
}

/// Decide the ritual hand-off for this send opportunity.
pub fn hand_off(player: &Player) -> HandOff {
    let level = player.level;
    match player.coordination.state() {
        RitualState::Idle => HandOff::Continue,
        RitualState::Casting | RitualState::AwaitingQuorum => HandOff::Wait,
        RitualState::Calling => {
            if player.coordination.quorum() >= quorum_threshold(level) {
                HandOff::Send {
                    commands: vec![Command::Incantation],
                    next: RitualState::Casting,
                }
            } else if player.pending().is_empty() {
                HandOff::Send {
                    commands: vec![Signal::ready(level).to_command()],
                    next: RitualState::Calling,
                }
            } else {
                HandOff::Wait
            }
        }
        state @ RitualState::PreparingRitual { .. } => match state.rendezvous_target() {
            None => HandOff::Wait,
            Some(direction) if direction.is_here() => HandOff::Send {
                commands: vec![Signal::call(level).to_command()],
                next: RitualState::AwaitingQuorum,
            },
            Some(direction) => HandOff::Send {
                commands: navigation::path_toward(direction),
                next: RitualState::PreparingRitual { target: None },
            },
        },
    }
}
