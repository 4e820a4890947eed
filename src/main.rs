//! Keeper headless driver
//!
//! Runs a full session against a scripted "autopilot" keeper and the bundled
//! flight animator. Useful for balance checks without a renderer.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use keeper::consts::SIM_DT;
use keeper::sim::{
    BallId, Easing, FlightAnimator, Game, GameEvent, GamePhase, Hand, MissReason, SharedHands,
    reaction_time,
};
use keeper::{GameConfig, Profile};

#[derive(Parser, Debug)]
#[command(name = "keeper", about = "Run a headless Keeper session")]
struct Args {
    /// Balance preset (classic, arcade)
    #[arg(long, default_value = "arcade")]
    profile: String,

    /// JSON config file; overrides the preset
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Chance the autopilot goes for each ball (0..1)
    #[arg(long, default_value_t = 0.7)]
    skill: f32,

    /// Retries allowed per failed level before giving up
    #[arg(long, default_value_t = 2)]
    max_retries: u32,

    /// Run at wall-clock speed instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Scripted keeper: decides per ball whether to go for it, then tracks it
/// once it is close enough to react to.
struct Autopilot {
    hands: SharedHands,
    rng: Pcg32,
    skill: f32,
    /// Depth at which the keeper starts reaching
    reach_z: f32,
    attempt: Option<(BallId, Hand)>,
}

impl Autopilot {
    fn new(hands: SharedHands, seed: u64, skill: f32) -> Self {
        Self {
            hands,
            rng: Pcg32::seed_from_u64(seed ^ 0xA11CE),
            skill: skill.clamp(0.0, 1.0),
            reach_z: -4.0,
            attempt: None,
        }
    }

    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BallSpawned { ball } => {
                let hand = if ball.target.x < 0.0 { Hand::Left } else { Hand::Right };
                self.attempt = (self.rng.random::<f32>() < self.skill).then_some((ball.id, hand));
            }
            GameEvent::BallSaved { .. } | GameEvent::BallMissed { .. } => {
                self.attempt = None;
                self.hands.clear();
            }
            _ => {}
        }
    }

    /// Push hand samples for the next tick
    fn react(&mut self, ball: Option<(BallId, Vec3)>) {
        let (Some((id, pos)), Some((target, hand))) = (ball, self.attempt) else {
            return;
        };
        if id == target && pos.z >= self.reach_z {
            self.hands.push(hand, Some(pos));
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    saves: u32,
    arrived: u32,
    expired: u32,
    superseded: u32,
}

fn load_config(args: &Args) -> anyhow::Result<GameConfig> {
    if let Some(path) = &args.config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = GameConfig::from_json(&json)
            .with_context(|| format!("loading config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    let Some(profile) = Profile::from_str(&args.profile) else {
        bail!("unknown profile '{}' (expected classic or arcade)", args.profile);
    };
    log::info!("Using {} profile", profile.as_str());
    Ok(GameConfig::from_profile(profile))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;

    let hands = SharedHands::new();
    let mut autopilot = Autopilot::new(hands.clone(), args.seed, args.skill);
    let mut game = Game::new(config, args.seed, hands, FlightAnimator::new(Easing::EaseOut));
    let mut tally = Tally::default();
    let mut retries = 0;

    log::info!("Keeper (headless) starting, seed {:#x}", args.seed);
    game.start_new_game();

    while !game.phase().is_terminal() {
        let ball = game.current_ball().map(|b| b.id).zip(game.ball_position());
        autopilot.react(ball);
        game.update(SIM_DT);

        for event in game.drain_events() {
            autopilot.on_event(&event);
            match event {
                GameEvent::BallSaved { .. } => tally.saves += 1,
                GameEvent::BallMissed { reason, .. } => match reason {
                    MissReason::Arrived => tally.arrived += 1,
                    MissReason::Expired => tally.expired += 1,
                    MissReason::Superseded => tally.superseded += 1,
                },
                _ => {}
            }
        }

        if game.phase() == GamePhase::LevelComplete {
            println!("{}", game.feedback().text);
            if game.level_passed() {
                retries = 0;
                game.advance_level();
            } else if retries < args.max_retries {
                retries += 1;
                game.retry_level();
            } else {
                log::info!("Out of retries on level {}", game.score().level);
                break;
            }
        }

        if args.realtime {
            std::thread::sleep(Duration::from_secs_f32(SIM_DT));
        }
    }

    let snapshot = game.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!(
            "{} at level {}/{}: total {} | saves {} | misses {} arrived, {} expired, {} superseded",
            snapshot.phase.as_str(),
            snapshot.current_level,
            snapshot.level_count,
            snapshot.total_score,
            tally.saves,
            tally.arrived,
            tally.expired,
            tally.superseded,
        );
        println!(
            "Reaction time needed at level {}: {:.2}s ({} simulated ticks)",
            snapshot.current_level,
            reaction_time(game.config(), snapshot.current_level),
            game.time_ticks()
        );
    }
    Ok(())
}
