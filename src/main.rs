/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::entity::PlatformKind;
use domain::input::ActionSet;
use sim::event::GameEvent;
use sim::level::load_level;
use sim::step::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::TerminalRenderer;

const LOG_FILE_ENV_VAR: &str = "SIDESCROLL_LOG";

fn main() -> ExitCode {
    init_tracing();

    let config = GameConfig::load();

    let grid = match load_level(&config.level_path) {
        Ok(grid) => grid,
        Err(e) => {
            tracing::error!(error = %e, "cannot start without a level");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut world = WorldState::new(grid, &config);
    let count = |kind| world.platforms.iter().filter(|p| p.kind == kind).count();
    tracing::info!(
        solid = count(PlatformKind::Solid),
        hazard = count(PlatformKind::Hazard),
        one_way = count(PlatformKind::OneWay),
        "platform set built",
    );

    let mut renderer = TerminalRenderer::new(&config);
    let honor_release = match renderer.init() {
        Ok(h) => h,
        Err(e) => {
            let _ = renderer.cleanup();
            eprintln!("Terminal init failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = game_loop(&mut world, &mut renderer, &config, honor_release);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "frame loop aborted");
            eprintln!("Game error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // stderr is hidden behind the alternate screen while playing
    if let Some(path) = std::env::var_os(LOG_FILE_ENV_VAR) {
        match File::create(&path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .compact()
                    .init();
                return;
            }
            Err(e) => eprintln!("cannot open log file {}: {e}", path.to_string_lossy()),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut TerminalRenderer,
    config: &GameConfig,
    honor_release: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = honor_release;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let frame_time = Duration::from_secs_f64(1.0 / config.screen.fps as f64);
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        kb.drain_events();
        gp.update();

        if kb.quit_requested() || gp.quit_pressed() {
            tracing::info!(frame = world.frame, "quit requested");
            break;
        }
        if kb.restart_requested() || gp.restart_pressed() {
            tracing::info!(frame = world.frame, elapsed = world.elapsed, "restart");
            world.restart();
        }

        let dt = last_frame.elapsed().as_secs_f32().min(config.screen.max_frame_dt);
        last_frame = Instant::now();

        let input = ActionSet::from_source(&kb).union(ActionSet::from_source(&gp));
        let events = step(world, input, dt);
        log_events(world, &events);

        renderer.render(world)?;

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

fn log_events(world: &WorldState, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Scrolled { pixels } => {
                tracing::debug!(pixels, offset = world.camera.offset(), "scrolled");
            }
            other => {
                tracing::debug!(frame = world.frame, x = world.actor.x, y = world.actor.y, event = ?other);
            }
        }
    }
}
