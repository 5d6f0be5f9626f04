//! Terminal Tetris 2048 runner (default binary).
//!
//! Polls crossterm for keys until the next tick is due, queues the mapped
//! actions on the session, then ticks it. Rendering goes through the
//! framebuffer-based renderer in the term crate.

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use env_logger::{Builder, Env, Target};
use log::{info, warn};

use tetris_2048::best_score::{BestScore, DEFAULT_BEST_SCORE_FILE};
use tetris_2048::core::{GameConfig, GameSnapshot, Session};
use tetris_2048::input::handle_key_event;
use tetris_2048::term::{FrameBuffer, GameView, PanelInfo, TerminalRenderer, Viewport};
use tetris_2048::types::{GameAction, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_TICK_MS};

#[derive(Parser, Debug)]
#[command(version, about = "Falling tetrominoes made of 2048 tiles")]
struct Args {
    /// Grid width in cells (12-24)
    #[arg(long, env = "TETRIS2048_WIDTH", default_value_t = DEFAULT_GRID_WIDTH)]
    width: usize,

    /// Grid height in cells (12-24)
    #[arg(long, env = "TETRIS2048_HEIGHT", default_value_t = DEFAULT_GRID_HEIGHT)]
    height: usize,

    /// Milliseconds between gravity steps (50-500)
    #[arg(long, env = "TETRIS2048_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u32,

    /// RNG seed; defaults to the current time
    #[arg(long)]
    seed: Option<u32>,

    /// Where the best score is kept
    #[arg(
        long,
        env = "TETRIS2048_BEST_SCORE_FILE",
        value_name = "FILE",
        default_value = DEFAULT_BEST_SCORE_FILE
    )]
    best_score_file: PathBuf,

    /// Write logs to this file (the terminal is busy drawing the game)
    #[arg(long, env = "TETRIS2048_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let seed = args.seed.unwrap_or_else(time_seed);
    let config = GameConfig::new(args.width, args.height, args.tick_ms)
        .context("invalid game configuration")?
        .with_seed(seed);
    let mut best = BestScore::load(&args.best_score_file);
    info!(
        "starting {}x{} grid, tick {}ms, seed {}, best {}",
        config.width(),
        config.height(),
        config.tick_ms(),
        seed,
        best.best()
    );

    let mut term = TerminalRenderer::new();
    let result = term.enter().and_then(|_| run(&mut term, config, &mut best));

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        warn!("failed to restore terminal: {err:#}");
    }
    result
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: GameConfig, best: &mut BestScore) -> Result<()> {
    let tick_duration = config.tick_interval();
    let mut session = Session::new(config);

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut last_tick = Instant::now();
    let mut recorded_episode = None;

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        let info = PanelInfo {
            best_score: Some(best.best()),
        };
        view.render_into(&snap, info, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    match handle_key_event(key) {
                        Some(GameAction::Quit) => break,
                        Some(action) => {
                            if !session.enqueue(action) {
                                log::debug!("command queue full, dropped {}", action.as_str());
                            }
                        }
                        None => {}
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick();

            if session.game_over() && recorded_episode != Some(session.episode_id()) {
                recorded_episode = Some(session.episode_id());
                info!(
                    "episode {} ended after {} ticks, {} pieces, score {}",
                    session.episode_id(),
                    session.ticks(),
                    session.pieces_locked(),
                    session.score()
                );
                if let Err(err) = best.record(session.score()) {
                    warn!("{err:#}");
                }
            }
        }
    }

    // A quit mid-game still counts towards the best score.
    if let Err(err) = best.record(session.score()) {
        warn!("{err:#}");
    }
    Ok(())
}
