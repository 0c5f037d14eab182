//! Torus Rocks entry point
//!
//! Headless run: the autopilot flies, sound goes to the log, and the HUD
//! (plus an occasional text frame) is printed through the logger.

use std::thread;
use std::time::{Duration, Instant};

use torus_rocks::audio::{AudioManager, LogEmitter, NullEmitter, ToneEmitter};
use torus_rocks::renderer::{self, hud_lines};
use torus_rocks::sim::{TickInput, autopilot};
use torus_rocks::{Game, Settings};

/// Wall-clock frame pacing
const FRAME: Duration = Duration::from_micros(16_667);
/// Pause on the game-over screen before the autopilot restarts
const RESTART_DELAY: Duration = Duration::from_secs(2);
const ASCII_COLS: usize = 80;
const ASCII_ROWS: usize = 24;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Torus Rocks (headless) starting...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(rand::random);

    let emitter: Box<dyn ToneEmitter> = if settings.muted {
        Box::new(NullEmitter)
    } else {
        Box::new(LogEmitter)
    };
    let audio = AudioManager::new(emitter);
    let mut game = Game::new(seed, audio, &settings);
    game.start_heartbeat();

    let run_for = Duration::try_from_secs_f32(settings.demo_seconds).unwrap_or(Duration::ZERO);
    let ascii_every = (settings.ascii_frame_interval > 0.0)
        .then(|| Duration::try_from_secs_f32(settings.ascii_frame_interval).ok())
        .flatten();

    let started = Instant::now();
    let mut last_frame = started;
    let mut last_hud = started;
    let mut last_ascii = started;
    let mut game_over_since: Option<Instant> = None;

    while started.elapsed() < run_for {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        if settings.autopilot {
            let held = game.shared().read(autopilot::steer);
            game.set_held(&held);
        } else {
            game.set_held(&TickInput::default());
        }
        game.update(dt);

        let frame = game.frame();
        if frame.game_over {
            let since = *game_over_since.get_or_insert(now);
            if settings.autopilot && now.duration_since(since) >= RESTART_DELAY {
                game.press_restart();
                game_over_since = None;
            }
        } else {
            game_over_since = None;
        }

        if now.duration_since(last_hud) >= Duration::from_secs(1) {
            log::info!("{}", hud_lines(&frame).join(" | "));
            last_hud = now;
        }
        if ascii_every.is_some_and(|every| now.duration_since(last_ascii) >= every) {
            log::debug!("\n{}", renderer::render(&frame, ASCII_COLS, ASCII_ROWS));
            last_ascii = now;
        }

        let spent = now.elapsed();
        if spent < FRAME {
            thread::sleep(FRAME - spent);
        }
    }

    let frame = game.frame();
    log::info!("Run finished: {}", hud_lines(&frame).join(" | "));
    game.shutdown();
}
