//! Maze Escape headless runner
//!
//! Plays a scripted run through a small demo maze and reports the outcome.
//!
//! Usage: maze-escape [--settings PATH] [--difficulty NAME] [--scores PATH]

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use maze_escape::consts::*;
use maze_escape::sim::{
    Collider, Direction, GameEvent, GamePhase, GameSession, MazeLayout, ProgressFlag, Rect,
    RuleError, TickInput, Trackable, tick,
};
use maze_escape::{Difficulty, HighScores, Settings, highscores::HighScoreEntry};

/// Length of one rendered frame in the headless loop
const FRAME_DT: f32 = 1.0 / 30.0;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Settings file (JSON); defaults are used if it is missing
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Difficulty preset, overrides the settings file
    #[arg(long, value_name = "NAME", value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,
    /// High score file to record a winning run in
    #[arg(long, value_name = "PATH")]
    scores: Option<PathBuf>,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s)
        .ok_or_else(|| format!("unknown difficulty {:?} (easy, normal, hard)", s))
}

/// A walled 10x10 tile room with a door across the bottom corridor and a
/// closed exit in the bottom-right corner
fn demo_layout() -> MazeLayout {
    let size = 10.0 * TILE;
    MazeLayout {
        colliders: vec![
            Collider::named("wall", Rect::new(-TILE, -TILE, size + 2.0 * TILE, TILE)),
            Collider::named("wall", Rect::new(-TILE, size, size + 2.0 * TILE, TILE)),
            Collider::named("wall", Rect::new(-TILE, 0.0, TILE, size)),
            Collider::named("wall", Rect::new(size, 0.0, TILE, size)),
            Collider::named("chestDoor", Rect::new(5.0 * TILE, 0.0, TILE, 2.0 * TILE)),
            Collider::new(Rect::new(5.0 * TILE, 2.0 * TILE, TILE, TILE)),
            Collider::named("exit", exit_zone()),
        ],
        player_start: Vec2::new(TILE, 8.0),
        agent_start: Vec2::new(3.0 * TILE, 7.0 * TILE),
    }
}

fn exit_zone() -> Rect {
    Rect::new(9.0 * TILE, 0.0, TILE, 2.0 * TILE)
}

/// One scripted action of the demo run
#[derive(Debug, Clone, Copy)]
enum Step {
    Walk(Direction, f32),
    Wait(f32),
    Latch(ProgressFlag),
    TimeBonus(f32),
    TimePenalty(f32),
    FindBonus,
    Invisible,
}

const SCRIPT: &[Step] = &[
    Step::Walk(Direction::R, 0.6),
    Step::TimePenalty(5.0),
    Step::Latch(ProgressFlag::ChestDoorOpen),
    Step::Walk(Direction::R, 0.5),
    Step::Invisible,
    Step::Wait(0.5),
    Step::FindBonus,
    Step::TimeBonus(3.0),
    Step::Latch(ProgressFlag::ExitOpen),
    Step::Walk(Direction::R, 0.5),
];

/// Drive the session through the script with a fixed-step accumulator
fn run(session: &mut GameSession) -> Result<(), RuleError> {
    session.start()?;
    let mut accumulator = 0.0f32;

    for step in SCRIPT {
        let (direction, duration) = match *step {
            Step::Walk(dir, secs) => (Some(dir), secs),
            Step::Wait(secs) => (None, secs),
            Step::Latch(flag) => {
                session.set_flag(flag);
                continue;
            }
            Step::TimeBonus(secs) => {
                session.time_bonus(secs);
                continue;
            }
            Step::TimePenalty(secs) => {
                session.time_penalty(secs);
                continue;
            }
            Step::FindBonus => {
                session.award_bonus();
                continue;
            }
            Step::Invisible => {
                session.grant_invisibility();
                continue;
            }
        };

        let input = TickInput {
            direction,
            ..Default::default()
        };
        let mut remaining = duration;
        while remaining > 0.0 {
            accumulator += FRAME_DT;
            remaining -= FRAME_DT;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                for event in tick(session, &input, SIM_DT) {
                    match event {
                        GameEvent::TimeExpired => log::info!("Out of time"),
                        GameEvent::Caught => log::info!("Caught by the agent"),
                        GameEvent::PhaseChanged { from, to } => {
                            log::debug!("{:?} -> {:?}", from, to)
                        }
                    }
                }
                accumulator -= SIM_DT;
                substeps += 1;
            }

            if session.phase().is_terminal() {
                return Ok(());
            }
            if session.is_set(ProgressFlag::ExitOpen)
                && session.player().hitbox().overlaps(&exit_zone())
            {
                return session.win();
            }
            log::debug!("{}", session.clock().clock_display());
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Maze Escape (headless) starting...");

    let args = Cli::parse();
    let mut settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    }
    log::info!("Difficulty: {}", settings.difficulty.as_str());

    let mut session = match GameSession::new(demo_layout(), settings) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&mut session) {
        log::error!("Run aborted: {}", e);
        std::process::exit(1);
    }

    let score = session.calculate_score();
    println!("Result: {:?}", session.phase());
    if let Some(reason) = session.loss_reason() {
        println!("Reason: {:?}", reason);
    }
    println!("{}", session.clock().clock_display());
    println!("Score: {}", score);

    if session.phase() == GamePhase::Won {
        if let Some(path) = args.scores {
            let mut scores = HighScores::load(&path);
            match scores.add(HighScoreEntry::from_session(&session)) {
                Some(rank) => println!("New high score! Rank #{}", rank),
                None => println!("Top score: {}", scores.top_score().unwrap_or(0)),
            }
            if let Err(e) = scores.save(&path) {
                log::warn!("Could not save high scores: {}", e);
            }
        }
    }
}
