//! The decision loop: one [`Agent`] per connection.
//!
//! The session feeds every received line to [`Agent::handle_line`] and asks
//! for commands with [`Agent::send_opportunity`] once the buffered lines are
//! drained or the idle tick fires. Each opportunity yields at most one
//! intent, chosen by priority:
//!
//! 1. lay an egg after this player's own successful ritual;
//! 2. carry on with a ritual hand-off already in progress;
//! 3. look around if there is no fresh look result;
//! 4. try the elevation gate;
//! 5. gather food and stones, or walk.
//!
//! An intent that does not fit in the pending-command queue is deferred.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use zappy_agents::{AgentError, Player, RitualState, Sight, Signal, View};
use zappy_types::{Command, Item, ServerEvent, codec};

use crate::config::AgentConfig;
use crate::coordination::{self, HandOff};
use crate::evolution::{self, GateOutcome, Refusal};
use crate::perception;

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The player starved.
    Died,
    /// The server ended the game.
    GameOver,
    /// The player reached level 8.
    MaxLevel,
}

/// Connection lifecycle as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Opening the socket.
    Connecting,
    /// Exchanging team name and map size.
    Handshaking,
    /// Sending commands and handling replies.
    Playing,
    /// Finished; no more commands will be sent.
    Terminated(Termination),
}

/// Commands for one send opportunity plus the bookkeeping that applies
/// once they are queued.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Intent {
    commands: Vec<Command>,
    next_state: Option<RitualState>,
    clears_reproduce: bool,
    consumes_food: bool,
}

impl Intent {
    const fn new(commands: Vec<Command>) -> Self {
        Self {
            commands,
            next_state: None,
            clears_reproduce: false,
            consumes_food: false,
        }
    }
}

/// Decision state for one connected player.
#[derive(Debug)]
pub struct Agent {
    player: Player,
    config: AgentConfig,
    rng: StdRng,
    termination: Option<Termination>,
}

impl Agent {
    /// New level-1 agent. Wandering is seeded from `config.rng_seed` when
    /// set, from OS entropy otherwise.
    pub fn new(config: AgentConfig) -> Self {
        let rng = config
            .rng_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            player: Player::new(),
            config,
            rng,
            termination: None,
        }
    }

    /// The player state.
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player state, for scenario setup.
    pub const fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The configuration in use.
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Why the agent stopped, if it has.
    pub const fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Current session phase. An agent exists only once the handshake is
    /// over, so it is either playing or terminated.
    pub const fn phase(&self) -> SessionPhase {
        match self.termination {
            Some(reason) => SessionPhase::Terminated(reason),
            None => SessionPhase::Playing,
        }
    }

    fn terminate(&mut self, reason: Termination) {
        if self.termination.is_none() {
            info!(?reason, level = %self.player.level, "Agent terminated");
            self.termination = Some(reason);
        }
    }

    // -----------------------------------------------------------------------
    // Incoming lines
    // -----------------------------------------------------------------------

    /// Process one server line.
    pub fn handle_line(&mut self, line: &str) -> Result<(), AgentError> {
        if self.termination.is_some() {
            return Ok(());
        }
        let event = codec::decode(line, self.player.pending().front());
        debug!(line, ?event, unsolicited = event.is_unsolicited(), "Received");

        match event {
            ServerEvent::Message { direction, text } => {
                match Signal::parse(&text) {
                    Some(signal) => {
                        coordination::on_signal(&mut self.player, direction, signal);
                    }
                    None => debug!(%direction, %text, "Ignoring broadcast chatter"),
                }
                Ok(())
            }
            ServerEvent::RitualStarted => {
                let state = self.player.coordination.state();
                debug!(?state, "Elevation underway");
                if state.is_following() {
                    self.player.coordination.mark_underway();
                }
                Ok(())
            }
            ServerEvent::Ejected(direction) => {
                info!(%direction, "Ejected from tile");
                if self.player.sight.view().is_some() {
                    self.player.sight = Sight::Blind;
                }
                Ok(())
            }
            ServerEvent::Dead => {
                self.terminate(Termination::Died);
                Ok(())
            }
            ServerEvent::EndOfGame => {
                self.terminate(Termination::GameOver);
                Ok(())
            }
            ServerEvent::LevelUp(reached) => {
                let own = matches!(self.player.pending().front(), Some(Command::Incantation));
                if own {
                    self.player.acknowledge();
                }
                self.on_level_up(reached, own);
                Ok(())
            }
            reply => match self.player.acknowledge() {
                Some(command) => self.on_reply(command, reply),
                None => {
                    warn!(?reply, "Reply with no pending command");
                    Ok(())
                }
            },
        }
    }

    fn on_reply(&mut self, command: Command, reply: ServerEvent) -> Result<(), AgentError> {
        match (command, reply) {
            (Command::Look, ServerEvent::LookResult(tiles)) => {
                if self.player.sight.is_awaiting() {
                    self.player.sight = Sight::Seen(View::new(tiles));
                } else {
                    debug!("Discarding look result taken before a move");
                }
            }
            (Command::Look, ServerEvent::Negative) => self.player.sight = Sight::Blind,
            (Command::Inventory, ServerEvent::InventoryResult(entries)) => {
                self.player.pending_food = codec::inventory_count(&entries, Item::FOOD);
                debug!(food = ?self.player.pending_food, "Inventory received");
            }
            (Command::Take(Item::Stone(resource)), ServerEvent::Ok) => {
                self.player.inventory.add(resource, 1)?;
            }
            (Command::Set(resource), ServerEvent::Negative) => {
                debug!(%resource, "Drop refused, crediting back");
                self.player.inventory.add(resource, 1)?;
            }
            (Command::Incantation, ServerEvent::Negative) => self.on_ritual_failed(),
            (command, ServerEvent::Ok | ServerEvent::Negative) => {
                debug!(%command, "Acknowledged");
            }
            (command, ServerEvent::Unknown(line)) => {
                warn!(%command, %line, "Unrecognised reply");
            }
            (command, reply) => {
                warn!(%command, ?reply, "Reply does not match command");
            }
        }
        Ok(())
    }

    fn on_level_up(&mut self, reached: u8, own: bool) {
        let expected = self.player.level.next();
        let Some(level) = expected.filter(|level| level.get() == reached) else {
            warn!(reached, level = %self.player.level, own, "Rejecting impossible level");
            if own {
                self.on_ritual_failed();
            }
            return;
        };

        self.player.level = level;
        self.player.inventory.reduce_ceilings(level);
        self.player.sight = Sight::Blind;
        self.player.coordination.reset();
        self.player.pending_food = None;
        self.player.just_completed_ritual = own;
        self.player.should_reproduce = own;
        info!(level = %level, own, "Level up");

        if level.is_max() {
            self.terminate(Termination::MaxLevel);
        }
    }

    fn on_ritual_failed(&mut self) {
        info!(level = %self.player.level, "Ritual failed");
        self.player.coordination.reset();
        self.player.pending_food = None;
        self.player.sight = Sight::Blind;
    }

    // -----------------------------------------------------------------------
    // Outgoing commands
    // -----------------------------------------------------------------------

    /// Pick and queue the commands for this send opportunity.
    ///
    /// Returns the commands to write, in order. An empty list means nothing
    /// to send this time.
    pub fn send_opportunity(&mut self) -> Result<Vec<Command>, AgentError> {
        if self.termination.is_some() {
            return Ok(Vec::new());
        }
        coordination::tick(&mut self.player, &self.config);

        let Some(intent) = self.decide() else {
            return Ok(Vec::new());
        };
        if intent.commands.len() > self.player.pending().free() {
            debug!(
                wanted = intent.commands.len(),
                free = self.player.pending().free(),
                "Deferring intent"
            );
            return Ok(Vec::new());
        }

        self.player.issue_all(intent.commands.clone())?;
        if let Some(state) = intent.next_state {
            self.player.coordination.transition(state);
        }
        if intent.clears_reproduce {
            self.player.should_reproduce = false;
        }
        if intent.consumes_food {
            self.player.pending_food = None;
        }
        debug!(commands = ?intent.commands, state = ?self.player.coordination.state(), "Sending");
        Ok(intent.commands)
    }

    fn decide(&mut self) -> Option<Intent> {
        if self.player.should_reproduce {
            return Some(Intent {
                clears_reproduce: true,
                ..Intent::new(vec![Command::Fork])
            });
        }

        match coordination::hand_off(&self.player) {
            HandOff::Continue => {}
            HandOff::Wait => return None,
            HandOff::Send { commands, next } => {
                return Some(Intent {
                    next_state: Some(next),
                    ..Intent::new(commands)
                });
            }
        }

        let view = match &self.player.sight {
            Sight::Blind if self.player.pending().is_empty() => {
                return Some(Intent::new(vec![Command::Look]));
            }
            Sight::Blind | Sight::Awaiting => return None,
            Sight::Seen(view) => view,
        };

        match evolution::evaluate(&self.player, view) {
            GateOutcome::Commit {
                drops,
                needs_company,
            } => {
                let level = self.player.level;
                info!(%level, needs_company, "Elevation gate passed");
                let next = if needs_company {
                    RitualState::Calling
                } else {
                    RitualState::Casting
                };
                return Some(Intent {
                    next_state: Some(next),
                    consumes_food: true,
                    ..Intent::new(GateOutcome::commit_commands(drops, needs_company, level))
                });
            }
            GateOutcome::QueryFood => return Some(Intent::new(vec![Command::Inventory])),
            GateOutcome::Refused(Refusal::AwaitingFood) => return None,
            GateOutcome::Refused(refusal) => {
                debug!(?refusal, "Elevation gate refused");
                if matches!(refusal, Refusal::FoodLow { .. }) {
                    self.player.pending_food = None;
                }
            }
        }

        let view = self.player.sight.view()?;
        let commands = perception::collect(
            view,
            &self.player.inventory,
            self.config.max_travel_ring,
            &mut self.rng,
        );
        Some(Intent::new(commands))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use zappy_types::{Level, Resource};

    fn agent() -> Agent {
        Agent::new(AgentConfig {
            rng_seed: Some(7),
            ..AgentConfig::default()
        })
    }

    #[test]
    fn first_opportunity_looks() {
        let mut agent = agent();
        assert_eq!(agent.send_opportunity().unwrap(), vec![Command::Look]);
        assert!(agent.player().sight.is_awaiting());
        // Still waiting for the look: nothing else to do.
        assert!(agent.send_opportunity().unwrap().is_empty());
    }

    #[test]
    fn look_reply_fills_the_view() {
        let mut agent = agent();
        agent.send_opportunity().unwrap();
        agent.handle_line("[player food, linemate]").unwrap();
        assert_eq!(agent.player().sight.view().map(View::len), Some(2));
        assert!(agent.player().pending().is_empty());
    }

    #[test]
    fn look_ko_blinds() {
        let mut agent = agent();
        agent.send_opportunity().unwrap();
        agent.handle_line("ko").unwrap();
        assert_eq!(agent.player().sight, Sight::Blind);
    }

    #[test]
    fn level_one_with_linemate_casts() {
        let mut agent = agent();
        agent.send_opportunity().unwrap();
        agent.handle_line("[player linemate]").unwrap();
        assert_eq!(agent.send_opportunity().unwrap(), vec![Command::Incantation]);
        assert_eq!(agent.player().coordination.state(), RitualState::Casting);

        agent.handle_line("Elevation underway").unwrap();
        assert_eq!(agent.player().pending().len(), 1);
        agent.handle_line("Current level: 2").unwrap();
        assert_eq!(agent.player().level.get(), 2);
        assert!(agent.player().should_reproduce);
        assert_eq!(agent.send_opportunity().unwrap(), vec![Command::Fork]);
        assert!(!agent.player().should_reproduce);
    }

    #[test]
    fn taken_stone_is_credited_on_ok() {
        let mut agent = agent();
        agent.send_opportunity().unwrap();
        agent.handle_line("[player player player sibur]").unwrap();
        // Crowded: stone left alone, player moves instead.
        let plan = agent.send_opportunity().unwrap();
        assert_eq!(plan.first(), Some(&Command::Forward));

        let mut agent = self::agent();
        agent.player_mut().sight = Sight::Seen(View::new(vec!["player sibur".to_owned()]));
        assert_eq!(
            agent.send_opportunity().unwrap(),
            vec![Command::Take(Item::Stone(Resource::Sibur))]
        );
        agent.handle_line("ok").unwrap();
        assert_eq!(agent.player().inventory.count(Resource::Sibur), 1);
    }

    #[test]
    fn refused_drop_is_credited_back() {
        let mut agent = agent();
        agent.player_mut().inventory.add(Resource::Linemate, 1).unwrap();
        agent.player_mut().sight = Sight::Seen(View::new(vec!["player".to_owned()]));
        assert_eq!(
            agent.send_opportunity().unwrap(),
            vec![Command::Set(Resource::Linemate), Command::Incantation]
        );
        assert_eq!(agent.player().inventory.count(Resource::Linemate), 0);
        agent.handle_line("ko").unwrap();
        assert_eq!(agent.player().inventory.count(Resource::Linemate), 1);
    }

    #[test]
    fn ritual_ko_resets_everything() {
        let mut agent = agent();
        agent.player_mut().sight = Sight::Seen(View::new(vec!["player linemate".to_owned()]));
        agent.send_opportunity().unwrap();
        agent.handle_line("ko").unwrap();
        assert_eq!(agent.player().coordination.state(), RitualState::Idle);
        assert_eq!(agent.player().sight, Sight::Blind);
        assert_eq!(agent.player().level, Level::MIN);
    }

    #[test]
    fn participant_level_up_does_not_fork() {
        let mut agent = agent();
        agent.send_opportunity().unwrap();
        agent.handle_line("Current level: 2").unwrap();
        assert_eq!(agent.player().level.get(), 2);
        assert!(!agent.player().should_reproduce);
        assert!(!agent.player().just_completed_ritual);
        // The pending Look is still waiting for its reply.
        assert_eq!(agent.player().pending().front(), Some(&Command::Look));
    }

    #[test]
    fn skipped_level_is_rejected() {
        let mut agent = agent();
        agent.handle_line("Current level: 3").unwrap();
        assert_eq!(agent.player().level, Level::MIN);
    }

    #[test]
    fn death_and_end_terminate() {
        let mut agent = agent();
        agent.handle_line("dead").unwrap();
        assert_eq!(agent.termination(), Some(Termination::Died));
        assert_eq!(agent.phase(), SessionPhase::Terminated(Termination::Died));
        assert!(agent.send_opportunity().unwrap().is_empty());

        let mut agent = self::agent();
        agent.handle_line("end").unwrap();
        assert_eq!(agent.termination(), Some(Termination::GameOver));
    }

    #[test]
    fn stray_reply_is_ignored() {
        let mut agent = agent();
        agent.handle_line("ok").unwrap();
        assert!(agent.player().pending().is_empty());
        assert_eq!(agent.phase(), SessionPhase::Playing);
    }

    #[test]
    fn ejection_blinds_without_dequeuing() {
        let mut agent = agent();
        agent.player_mut().sight = Sight::Seen(View::new(vec!["player".to_owned()]));
        agent.player_mut().issue(Command::Inventory).unwrap();
        agent.handle_line("eject: 3").unwrap();
        assert_eq!(agent.player().sight, Sight::Blind);
        assert_eq!(agent.player().pending().front(), Some(&Command::Inventory));
    }

    #[test]
    fn unknown_reply_still_dequeues_one() {
        let mut agent = agent();
        agent.player_mut().issue(Command::Look).unwrap();
        agent.player_mut().issue(Command::Forward).unwrap();
        agent.handle_line("something odd").unwrap();
        assert_eq!(agent.player().pending().len(), 1);
        assert_eq!(agent.player().pending().front(), Some(&Command::Forward));
    }

    #[test]
    fn inventory_reply_sets_pending_food() {
        let mut agent = agent();
        agent.player_mut().issue(Command::Inventory).unwrap();
        agent
            .handle_line("[food 20, linemate 1, deraumere 0]")
            .unwrap();
        assert_eq!(agent.player().pending_food, Some(20));
    }

    #[test]
    fn oversized_intent_is_deferred() {
        let mut agent = agent();
        for _ in 0..9 {
            agent.player_mut().issue(Command::Inventory).unwrap();
        }
        // Food two rings out needs more than one free slot.
        agent.player_mut().sight = Sight::Seen(View::new(
            ["player", "", "", "", "", "", "food"]
                .iter()
                .map(|t| (*t).to_owned())
                .collect(),
        ));
        assert!(agent.send_opportunity().unwrap().is_empty());
        assert!(agent.player().sight.view().is_some());
    }
}
