//! Per-frame simulation tick
//!
//! Order within a tick is fixed: the move is gated by collision and
//! committed, then the clock advances, then the agent moves and checks its
//! reach. If the clock expires and the agent catches the player in the same
//! tick, expiry wins.

use super::agent::Direction;
use super::state::{GameEvent, GamePhase, GameSession, LossReason};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested player movement
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause && matches!(session.phase(), GamePhase::Playing | GamePhase::Paused) {
        let from = session.phase();
        if session.toggle_pause().is_ok() {
            events.push(GameEvent::PhaseChanged {
                from,
                to: session.phase(),
            });
        }
    }

    if session.phase() != GamePhase::Playing {
        return events;
    }

    if let Some(dir) = input.direction {
        session.player.move_in(dir, dt, &session.registry);
    }
    session.player.tick(dt);

    let expired = session.clock.tick(dt);
    let caught = session
        .agent
        .update(dt, &session.registry, &session.player);

    let outcome = if expired {
        Some((GameEvent::TimeExpired, LossReason::TimeUp))
    } else if caught {
        Some((GameEvent::Caught, LossReason::Caught))
    } else {
        None
    };

    if let Some((event, reason)) = outcome {
        events.push(event);
        if session.lose(reason).is_ok() {
            events.push(GameEvent::PhaseChanged {
                from: GamePhase::Playing,
                to: GamePhase::Lost,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::consts::SIM_DT;
    use crate::sim::collision::Collider;
    use crate::sim::rect::Rect;
    use crate::sim::state::MazeLayout;
    use glam::Vec2;

    fn layout() -> MazeLayout {
        MazeLayout {
            colliders: vec![Collider::named(
                "chestDoor",
                Rect::new(64.0, 0.0, 32.0, 32.0),
            )],
            player_start: Vec2::new(0.0, 0.0),
            agent_start: Vec2::new(0.0, 320.0),
        }
    }

    fn playing(settings: Settings) -> GameSession {
        let mut session = GameSession::new(layout(), settings).unwrap();
        session.start().unwrap();
        session
    }

    /// Agent parked far from the player
    fn idle_agent() -> Settings {
        Settings {
            agent_path: String::new(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_not_started_does_nothing() {
        let mut session = GameSession::new(layout(), idle_agent()).unwrap();
        let input = TickInput {
            direction: Some(Direction::U),
            ..Default::default()
        };
        assert!(tick(&mut session, &input, 1.0).is_empty());
        assert_eq!(session.clock().elapsed(), 0.0);
        assert_eq!(session.player().position(), Vec2::ZERO);
    }

    #[test]
    fn test_tick_advances_clock_and_player() {
        let mut session = playing(idle_agent());
        let input = TickInput {
            direction: Some(Direction::U),
            ..Default::default()
        };
        tick(&mut session, &input, 0.1);
        assert!((session.clock().elapsed() - 0.1).abs() < 1e-6);
        assert!((session.player().position().y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_player_blocked_by_door_until_opened() {
        let mut session = playing(idle_agent());
        session.player_mut().teleport(Vec2::new(40.0, 0.0));
        let input = TickInput {
            direction: Some(Direction::R),
            ..Default::default()
        };

        tick(&mut session, &input, 0.1);
        assert_eq!(session.player().position().x, 40.0);

        session.set_flag(crate::sim::state::ProgressFlag::ChestDoorOpen);
        tick(&mut session, &input, 0.1);
        assert!(session.player().position().x > 40.0);
    }

    #[test]
    fn test_tick_pause() {
        let mut session = playing(idle_agent());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        let events = tick(&mut session, &pause, SIM_DT);
        assert_eq!(session.phase(), GamePhase::Paused);
        assert_eq!(
            events,
            vec![GameEvent::PhaseChanged {
                from: GamePhase::Playing,
                to: GamePhase::Paused
            }]
        );

        // Clock frozen while paused
        let elapsed = session.clock().elapsed();
        tick(&mut session, &TickInput::default(), 5.0);
        assert_eq!(session.clock().elapsed(), elapsed);

        tick(&mut session, &pause, SIM_DT);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_expiry_loses_once() {
        let mut session = playing(idle_agent());
        session.clock_mut().add(299.5);

        let events = tick(&mut session, &TickInput::default(), 1.0);
        assert_eq!(events[0], GameEvent::TimeExpired);
        assert_eq!(session.phase(), GamePhase::Lost);
        assert_eq!(session.loss_reason(), Some(LossReason::TimeUp));

        // Lost is terminal, nothing more happens
        assert!(tick(&mut session, &TickInput::default(), 1.0).is_empty());
    }

    #[test]
    fn test_capture_loses() {
        let mut session = playing(idle_agent());
        session.player_mut().teleport(Vec2::new(8.0, 330.0));

        let events = tick(&mut session, &TickInput::default(), SIM_DT);
        assert_eq!(events[0], GameEvent::Caught);
        assert_eq!(session.loss_reason(), Some(LossReason::Caught));
    }

    #[test]
    fn test_invisible_player_is_not_caught() {
        let mut session = playing(idle_agent());
        session.player_mut().teleport(Vec2::new(8.0, 330.0));
        session.grant_invisibility();

        assert!(tick(&mut session, &TickInput::default(), SIM_DT).is_empty());
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_expiry_beats_capture_in_same_tick() {
        let mut session = playing(idle_agent());
        session.player_mut().teleport(Vec2::new(8.0, 330.0));
        session.clock_mut().add(299.9);

        let events = tick(&mut session, &TickInput::default(), 0.5);
        assert_eq!(events[0], GameEvent::TimeExpired);
        assert!(!events.contains(&GameEvent::Caught));
        assert_eq!(session.loss_reason(), Some(LossReason::TimeUp));
    }

    #[test]
    fn test_gradual_penalty_drains_through_ticks() {
        let mut session = playing(idle_agent());
        session.time_penalty(10.0);
        for _ in 0..59 {
            tick(&mut session, &TickInput::default(), SIM_DT);
        }
        // Just under a second of play plus the whole penalty, drained at
        // 25/60 s per tick
        assert_eq!(session.clock().time_left(), 289);
        assert_eq!(session.clock().pending_gradual(), 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(Settings::default());
        let mut b = playing(Settings::default());
        let inputs = [
            TickInput {
                direction: Some(Direction::U),
                ..Default::default()
            },
            TickInput {
                direction: Some(Direction::R),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                let ea = tick(&mut a, input, SIM_DT);
                let eb = tick(&mut b, input, SIM_DT);
                assert_eq!(ea, eb);
            }
        }

        assert_eq!(a.clock().elapsed(), b.clock().elapsed());
        assert_eq!(a.player().position(), b.player().position());
        assert_eq!(a.agent().position(), b.agent().position());
        assert_eq!(a.phase(), b.phase());
    }
}
