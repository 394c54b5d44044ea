// DotClock - Procedural dot-matrix watchface for the terminal
// A 16x16 field of signed intensities computed from the clock, blended with
// bitmap digits, warped onto a disc, and drawn as variable-radius dots.
use anyhow::Result;
use clap::Parser;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use notify::{Config as NotifyConfig, Event as NotifyEvent, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use std::f32::consts::TAU;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

mod config;
mod digits;
mod field;
mod patterns;
mod render;
mod term;
mod types;
mod warp;

use config::{Args, FaceConfig};
use field::PatternSelect;
use patterns::Pattern;
use render::{FaceRenderer, Surface};
use term::PixelFrame;
use types::{FrameTime, Rgb};

/// Watch the config file and forward modification events to the render loop
fn spawn_config_watcher(change_tx: mpsc::Sender<()>) -> Result<()> {
    let config_path = FaceConfig::config_path(None)?;

    thread::spawn(move || {
        let (tx, rx) = mpsc::channel();
        let mut watcher = match RecommendedWatcher::new(tx, NotifyConfig::default()) {
            Ok(w) => w,
            Err(_) => return,
        };

        if watcher
            .watch(&config_path, RecursiveMode::NonRecursive)
            .is_err()
        {
            return;
        }

        loop {
            match rx.recv() {
                Ok(Ok(NotifyEvent { kind, .. })) => {
                    if matches!(kind, notify::EventKind::Modify(_)) {
                        let _ = change_tx.send(());
                    }
                }
                Err(_) => break,
                _ => {}
            }
        }
    });

    Ok(())
}

/// Seconds-hand overlay: a small dot at the disc edge. Drawn before the dot
/// field, so the field overdraws it where they overlap.
fn draw_seconds_overlay<S: Surface>(surface: &mut S, now: FrameTime, bounds: render::Bounds) {
    let (cx, cy) = bounds.center();
    let max_dim = bounds.max_dim();
    let angle = now.second as f32 / 60.0 * TAU;
    surface.fill_circle(
        cx + angle.sin() * max_dim * 0.95,
        cy - angle.cos() * max_dim * 0.95,
        (max_dim * 0.02).max(1.0),
        Rgb { r: 128, g: 128, b: 128 },
    );
}

fn config_info_lines(config: &FaceConfig, select: PatternSelect) -> Vec<Line<'static>> {
    let pattern = match select {
        PatternSelect::Cycle { speed } => format!("cycle (speed {})", speed),
        PatternSelect::Fixed(p) => p.name().to_string(),
    };
    vec![
        Line::from(format!("pattern:        {}", pattern)),
        Line::from(format!("fps:            {:.0}", config.fps)),
        Line::from(format!("positive color: {}", config.positive_color)),
        Line::from(format!("negative color: {}", config.negative_color)),
        Line::from(format!("overlay:        {}", config.overlay)),
        Line::from(format!(
            "config file:    {}",
            config
                .config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        )),
    ]
}

fn run_face(
    mut config: FaceConfig,
    shutdown: Arc<AtomicBool>,
    change_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let mut renderer = FaceRenderer::new(config.paints()?, config.pattern_select()?);
    let mut seconds_overlay = config.seconds_overlay();

    // Setup terminal for TUI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut show_config_info = false;
    let mut frame_duration = Duration::from_secs_f64(1.0 / config.fps);

    let result = loop {
        let loop_start = Instant::now();

        if shutdown.load(Ordering::Relaxed) {
            break Ok(());
        }

        // Keyboard input with a brief timeout for responsiveness
        if poll(Duration::from_millis(1))? {
            if let Event::Key(key) = read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => break Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break Ok(())
                    }
                    KeyCode::Char('i') | KeyCode::Char('I') => {
                        show_config_info = !show_config_info;
                        terminal.clear()?;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') => {
                        // Step to the next fixed pattern (leaves cycle mode)
                        renderer.select = match renderer.select {
                            PatternSelect::Fixed(p) => PatternSelect::Fixed(p.next()),
                            PatternSelect::Cycle { .. } => PatternSelect::Fixed(Pattern::Noise),
                        };
                    }
                    KeyCode::Char('c') | KeyCode::Char('C') => {
                        renderer.select = PatternSelect::Cycle { speed: config.pattern_speed };
                    }
                    _ => {}
                }
            }
        }

        // Config hot reload
        if change_rx.try_recv().is_ok() {
            if let Ok(mut new_config) = FaceConfig::load() {
                new_config.sanitize();
                if new_config.fps != config.fps {
                    frame_duration = Duration::from_secs_f64(1.0 / new_config.fps);
                }
                if let Ok(paints) = new_config.paints() {
                    renderer.paints = paints;
                }
                if let Ok(select) = new_config.pattern_select() {
                    renderer.select = select;
                }
                seconds_overlay = new_config.seconds_overlay();
                config = new_config;
            }
        }

        let now = FrameTime::now();

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Header
                    Constraint::Min(8),    // Watchface
                    Constraint::Length(3), // Footer
                ])
                .split(f.size());

            let pattern_name = match renderer.select {
                PatternSelect::Cycle { .. } => "cycle",
                PatternSelect::Fixed(p) => p.name(),
            };
            let header_text = format!(
                "dotclock | {:02}:{:02}:{:02} | pattern: {}",
                now.hour, now.minute, now.second, pattern_name
            );
            let header = Paragraph::new(header_text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(header, chunks[0]);

            if show_config_info {
                let info = Paragraph::new(config_info_lines(&config, renderer.select)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Configuration (Press 'i' to hide)"),
                );
                f.render_widget(info, chunks[1]);
            } else {
                // Two pixel rows per character row; keep the frame square so
                // the disc stays round.
                let area = chunks[1];
                // Even side so the half-block packing shows every pixel row.
                let side = (area.width as usize).min(area.height as usize * 2) & !1;
                if side >= 2 {
                    let mut frame = PixelFrame::new(side, side);
                    let bounds = frame.bounds();
                    renderer.render(&mut frame, bounds, now, |s, t| {
                        if seconds_overlay {
                            draw_seconds_overlay(s, t, bounds);
                        }
                    });
                    let face = Paragraph::new(frame.to_lines()).alignment(Alignment::Center);
                    f.render_widget(face, area);
                }
            }

            let footer_text = format!(
                "FPS: {:.0} | 'n' next pattern, 'c' cycle, 'i' config, 'q' or Ctrl+C to quit",
                config.fps
            );
            let footer = Paragraph::new(footer_text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(footer, chunks[2]);
        })?;

        // Frame rate limiting
        let elapsed = loop_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    };

    terminal.show_cursor()?;
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    result
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set global config path immediately (before any config loads)
    FaceConfig::set_config_path(args.cfg.clone());

    let mut config = match FaceConfig::load() {
        Ok(c) => c,
        Err(_) => {
            // First run: persist defaults so the watcher has a file to watch
            let mut c = FaceConfig::default();
            c.config_path = FaceConfig::config_path(None).ok();
            let _ = c.save();
            c
        }
    };
    config.merge_with_args(&args);
    config.sanitize();

    // Fail fast on unusable colors or pattern names from CLI/config
    config.paints()?;
    config.pattern_select()?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))?;
    }

    let (change_tx, change_rx) = mpsc::channel();
    spawn_config_watcher(change_tx)?;

    run_face(config, shutdown, change_rx)
}
