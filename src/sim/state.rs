//! Game state and core simulation types
//!
//! `GameSession` owns everything that changes during a run: the clock, the
//! collision registry, both entities, the phase and the progress latches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::{PursuitAgent, parse_path};
use super::clock::CountdownClock;
use super::collision::{Collider, CollisionRegistry};
use super::error::RuleError;
use super::player::Player;
use crate::Settings;
use crate::consts::{BONUS_AMOUNT, SCORE_PER_SECOND};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, clock not running
    #[default]
    NotStarted = 0,
    /// Active gameplay
    Playing = 1,
    /// Game is paused
    Paused = 2,
    /// Player escaped
    Won = 3,
    /// Time ran out or the player was caught
    Lost = 4,
}

impl GamePhase {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }

    /// Legal moves of the phase machine. Terminal phases only leave through
    /// a new session.
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        match self {
            NotStarted => matches!(next, Playing),
            Playing => matches!(next, Paused | Won | Lost),
            Paused => matches!(next, Playing),
            Won | Lost => false,
        }
    }
}

impl TryFrom<i32> for GamePhase {
    type Error = RuleError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GamePhase::NotStarted),
            1 => Ok(GamePhase::Playing),
            2 => Ok(GamePhase::Paused),
            3 => Ok(GamePhase::Won),
            4 => Ok(GamePhase::Lost),
            other => Err(RuleError::PhaseOutOfRange(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    TimeUp,
    Caught,
}

/// One-way progress markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressFlag {
    ChestDoorOpen,
    ExitOpen,
    SpikesLowered,
    ScrollUsed,
}

impl ProgressFlag {
    pub const ALL: [ProgressFlag; 4] = [
        ProgressFlag::ChestDoorOpen,
        ProgressFlag::ExitOpen,
        ProgressFlag::SpikesLowered,
        ProgressFlag::ScrollUsed,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Map collider that disappears when this flag is latched
    pub fn collider_name(self) -> Option<&'static str> {
        match self {
            ProgressFlag::ChestDoorOpen => Some("chestDoor"),
            ProgressFlag::ExitOpen => Some("exit"),
            ProgressFlag::SpikesLowered => Some("spikes"),
            ProgressFlag::ScrollUsed => None,
        }
    }
}

/// Set of latched progress flags. There is no way to clear a flag; a fresh
/// `Progress` comes only with a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    bits: u8,
}

impl Progress {
    /// Latch `flag`. Returns true if it was not already set.
    pub fn set(&mut self, flag: ProgressFlag) -> bool {
        let was_set = self.is_set(flag);
        self.bits |= flag.bit();
        !was_set
    }

    pub fn is_set(&self, flag: ProgressFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }
}

/// Hidden-achievement bonus: either absent or the fixed amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Bonus {
    #[default]
    None,
    Found,
}

impl Bonus {
    pub fn value(self) -> i32 {
        match self {
            Bonus::None => 0,
            Bonus::Found => BONUS_AMOUNT,
        }
    }
}

impl TryFrom<i32> for Bonus {
    type Error = RuleError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Bonus::None),
            BONUS_AMOUNT => Ok(Bonus::Found),
            got => Err(RuleError::InvalidBonus {
                got,
                expected: BONUS_AMOUNT,
            }),
        }
    }
}

/// How many timed events of each kind the player has triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventCounters {
    pub hidden: u32,
    pub negative: u32,
    pub positive: u32,
}

/// Something that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    TimeExpired,
    Caught,
}

/// Map geometry plus spawn points, as produced by the content loader
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MazeLayout {
    pub colliders: Vec<Collider>,
    pub player_start: Vec2,
    pub agent_start: Vec2,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameSession {
    phase: GamePhase,
    loss_reason: Option<LossReason>,
    progress: Progress,
    bonus: Bonus,
    counters: EventCounters,
    pub(crate) clock: CountdownClock,
    pub(crate) registry: CollisionRegistry,
    pub(crate) player: Player,
    pub(crate) agent: PursuitAgent,
    layout: MazeLayout,
    settings: Settings,
}

impl GameSession {
    /// Build a session in `NotStarted`. Fails if the agent path in
    /// `settings` is malformed.
    pub fn new(layout: MazeLayout, settings: Settings) -> Result<Self, RuleError> {
        let path = parse_path(&settings.agent_path)?;
        let mut registry = CollisionRegistry::new();
        registry.init(layout.colliders.iter().cloned());

        let mut player = Player::new(layout.player_start);
        player.set_speed(settings.player_speed);

        let agent = PursuitAgent::new(
            layout.agent_start,
            path,
            settings.effective_agent_speed(),
            settings.effective_reach_size(),
        );

        Ok(Self {
            phase: GamePhase::NotStarted,
            loss_reason: None,
            progress: Progress::default(),
            bonus: Bonus::None,
            counters: EventCounters::default(),
            clock: CountdownClock::new(),
            registry,
            player,
            agent,
            layout,
            settings,
        })
    }

    /// Throw away all run state and go back to `NotStarted`
    pub fn new_session(&mut self) {
        self.phase = GamePhase::NotStarted;
        self.loss_reason = None;
        self.progress = Progress::default();
        self.bonus = Bonus::None;
        self.counters = EventCounters::default();
        self.clock.reset();
        self.registry.init(self.layout.colliders.iter().cloned());

        self.player = Player::new(self.layout.player_start);
        self.player.set_speed(self.settings.player_speed);
        self.agent.reset_to(self.layout.agent_start);
        log::info!("New session");
    }

    // === Phase ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn loss_reason(&self) -> Option<LossReason> {
        self.loss_reason
    }

    /// Move to `next` if the phase machine allows it
    pub fn set_phase(&mut self, next: GamePhase) -> Result<(), RuleError> {
        let from = self.phase;
        if !from.can_transition_to(next) {
            log::warn!("Rejected phase transition {:?} -> {:?}", from, next);
            return Err(RuleError::IllegalTransition { from, to: next });
        }
        self.phase = next;
        log::info!("Phase {:?} -> {:?}", from, next);
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), RuleError> {
        self.set_phase(GamePhase::Playing)
    }

    pub fn toggle_pause(&mut self) -> Result<(), RuleError> {
        match self.phase {
            GamePhase::Paused => self.set_phase(GamePhase::Playing),
            _ => self.set_phase(GamePhase::Paused),
        }
    }

    pub fn win(&mut self) -> Result<(), RuleError> {
        self.set_phase(GamePhase::Won)
    }

    pub fn lose(&mut self, reason: LossReason) -> Result<(), RuleError> {
        self.set_phase(GamePhase::Lost)?;
        self.loss_reason = Some(reason);
        Ok(())
    }

    // === Score ===

    /// Whole seconds left times `SCORE_PER_SECOND`, plus the bonus.
    /// Goes negative once the clock has run past zero and saturates at the
    /// `i32` bounds.
    pub fn calculate_score(&self) -> i32 {
        let score = i64::from(self.clock.time_left()) * i64::from(SCORE_PER_SECOND)
            + i64::from(self.bonus.value());
        score.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    pub fn bonus(&self) -> Bonus {
        self.bonus
    }

    pub fn award_bonus(&mut self) {
        if self.bonus == Bonus::None {
            log::info!("Bonus found (+{})", BONUS_AMOUNT);
        }
        self.bonus = Bonus::Found;
    }

    /// Set the bonus from a raw value; only 0 and `BONUS_AMOUNT` are accepted
    pub fn set_bonus_value(&mut self, value: i32) -> Result<(), RuleError> {
        self.bonus = Bonus::try_from(value)?;
        Ok(())
    }

    // === Progress ===

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn is_set(&self, flag: ProgressFlag) -> bool {
        self.progress.is_set(flag)
    }

    /// Latch `flag`, opening its linked map geometry the first time
    pub fn set_flag(&mut self, flag: ProgressFlag) {
        if !self.progress.set(flag) {
            return;
        }
        log::info!("Progress: {:?}", flag);
        if let Some(name) = flag.collider_name() {
            self.registry.remove_collision_by_name(name);
        }
    }

    // === Timed events ===

    pub fn counters(&self) -> &EventCounters {
        &self.counters
    }

    /// Give `seconds` back to the player immediately
    pub fn time_bonus(&mut self, seconds: f32) {
        self.counters.positive += 1;
        self.clock.add(-seconds);
    }

    /// Take `seconds` from the player over the next few ticks
    pub fn time_penalty(&mut self, seconds: f32) {
        self.counters.negative += 1;
        self.clock.add_gradually(seconds);
    }

    pub fn hidden_event(&mut self) {
        self.counters.hidden += 1;
    }

    /// Make the player invisible for the configured duration
    pub fn grant_invisibility(&mut self) {
        self.player.make_invisible(self.settings.invisibility_seconds);
    }

    // === Components ===

    pub fn clock(&self) -> &CountdownClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut CountdownClock {
        &mut self.clock
    }

    pub fn registry(&self) -> &CollisionRegistry {
        &self.registry
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn agent(&self) -> &PursuitAgent {
        &self.agent
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
