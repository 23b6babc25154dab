// termcanvas demo viewer
//
// Hosts a scripted terminal session inside the virtualized canvas and lets
// you scroll through it:
// - arrow keys / mouse wheel scroll, PageUp/PageDown jump half a viewport
// - [ and ] step between output blocks, Home/End jump to the edges
// - scrollback budgets come from the config file or --max-lines/--max-frames
//
// With --headless the canvas is driven tick by tick without a terminal UI
// and a summary is printed; integration tests exercise that path.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser as ClapParser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseEventKind};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use termcanvas::script::SessionScript;
use termcanvas::{Canvas, CanvasConfig, FramePane, Pane, Scrollbar, ScrollbarWidget, TextPane};

#[derive(Debug, ClapParser)]
#[command(
    name = "termcanvas",
    version,
    about = "Virtualized scroll canvas demo viewer"
)]
struct Args {
    /// Session script (JSON); a synthetic session is used when omitted
    script: Option<PathBuf>,

    /// Config file (TOML); defaults to the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the scrollback line budget
    #[arg(long)]
    max_lines: Option<usize>,

    /// Override the scrollback frame budget
    #[arg(long)]
    max_frames: Option<usize>,

    /// Run without a terminal UI and print a canvas summary
    #[arg(long)]
    headless: bool,

    /// Viewport height in rows for headless runs
    #[arg(long, default_value_t = 24)]
    height: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args);
    let script = match &args.script {
        Some(path) => SessionScript::from_path(path)?,
        None => SessionScript::sample(),
    };

    if args.headless {
        run_headless(&script, config, args.height)
    } else {
        run_tui(&script, config)
    }
}

/// Resolve the effective config: file (if readable), then CLI overrides.
/// A malformed file is logged and the defaults are kept.
fn load_config(args: &Args) -> CanvasConfig {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = match path {
        Some(path) if path.exists() => match CanvasConfig::from_path(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("ignoring config {}: {err}", path.display());
                CanvasConfig::default()
            }
        },
        _ => CanvasConfig::default(),
    };
    if let Some(n) = args.max_lines {
        config.scrollback_max_lines = n;
    }
    if let Some(n) = args.max_frames {
        config.scrollback_max_frames = n;
    }
    config
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("termcanvas").join("config.toml"))
}

fn build_canvas(script: &SessionScript, config: CanvasConfig, height: usize) -> Canvas {
    let mut canvas = Canvas::new(config);
    canvas.connect();
    canvas.set_container_height(height);
    for pane in script.build_panes() {
        canvas.append_pane(pane);
    }
    if let Some(&last) = canvas.pane_order().last() {
        canvas.set_focus_target(Some(last));
    }
    canvas.scroll_to_bottom();
    canvas
}

fn run_headless(script: &SessionScript, config: CanvasConfig, height: usize) -> Result<()> {
    let mut canvas = build_canvas(script, config, height);

    // Step the scheduler the way a host event loop would, one tick at a
    // time, until the pump goes idle.
    let mut ticks = 0;
    while canvas.run_scheduled() > 0 {
        ticks += 1;
    }
    let events = canvas.take_events().len();

    println!("panes: {}", canvas.pane_count());
    println!("live: {}", canvas.visible_panes().len());
    println!("total height: {}", canvas.total_virtual_height());
    println!("scroll offset: {}", canvas.scroll_offset());
    println!("ticks: {ticks}");
    println!("events: {events}");
    Ok(())
}

fn run_tui(script: &SessionScript, config: CanvasConfig) -> Result<()> {
    let mut terminal = ratatui::init();
    crossterm::execute!(io::stdout(), EnableMouseCapture)?;
    let result = event_loop(&mut terminal, script, config);
    let _ = crossterm::execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    script: &SessionScript,
    config: CanvasConfig,
) -> Result<()> {
    let size = terminal.size()?;
    let mut canvas = build_canvas(script, config, content_height(size.height));
    let mut scrollbar = Scrollbar::new();

    loop {
        canvas.run_scheduled();

        scrollbar.set_viewport(canvas.container_height());
        scrollbar.set_length(canvas.total_virtual_height());
        scrollbar.set_position(canvas.scroll_offset());

        terminal.draw(|frame| draw(frame, &canvas, &scrollbar))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Up => canvas.scroll_by(-1),
                KeyCode::Down => canvas.scroll_by(1),
                KeyCode::PageUp => canvas.scroll_page_up(),
                KeyCode::PageDown => canvas.scroll_page_down(),
                KeyCode::Home => canvas.scroll_to(0),
                KeyCode::End => canvas.scroll_to_bottom(),
                KeyCode::Char('[') => canvas.go_to_previous_frame(),
                KeyCode::Char(']') => canvas.go_to_next_frame(),
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => canvas.scroll_by(-3),
                MouseEventKind::ScrollDown => canvas.scroll_by(3),
                _ => {}
            },
            Event::Resize(_, rows) => {
                canvas.set_container_height(content_height(rows));
                canvas.schedule_resize();
            }
            _ => {}
        }

        // The demo has no outer layout; drop bubbled notifications.
        canvas.take_events();
    }
    Ok(())
}

/// One row is reserved for the status line.
fn content_height(rows: u16) -> usize {
    rows.saturating_sub(1) as usize
}

fn draw(frame: &mut Frame, canvas: &Canvas, scrollbar: &Scrollbar) {
    let area = frame.area();
    let content = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + content.height,
        height: area.height - content.height,
        ..area
    };

    let height = content.height as usize;
    let mut rows: Vec<Line> = vec![Line::default(); height];
    for (id, top) in canvas.visible_panes() {
        let Some(pane) = canvas.pane(id) else { continue };
        for (i, line) in pane_lines(pane).into_iter().enumerate() {
            let row = top + i as isize;
            if (0..height as isize).contains(&row) {
                rows[row as usize] = line;
            }
        }
    }
    frame.render_widget(Paragraph::new(Text::from(rows)), content);
    frame.render_widget(ScrollbarWidget::new(scrollbar), content);

    let status = Line::from(vec![
        Span::styled(
            format!(
                " {}/{} px | {} panes, {} live ",
                canvas.scroll_offset(),
                canvas.total_virtual_height(),
                canvas.pane_count(),
                canvas.visible_panes().len(),
            ),
            Style::default().fg(Color::Black).bg(Color::Gray),
        ),
        Span::raw("  q quit | arrows scroll | [ ] frames | Home/End"),
    ]);
    frame.render_widget(Paragraph::new(status), status_area);
}

/// Render a pane's content as styled lines; captured frames are dimmed.
fn pane_lines(pane: &dyn Pane) -> Vec<Line<'static>> {
    if let Some(text) = pane.as_any().downcast_ref::<TextPane>() {
        text.lines()
            .iter()
            .map(|l| Line::from(l.clone()))
            .collect()
    } else if let Some(capture) = pane.as_any().downcast_ref::<FramePane>() {
        capture
            .lines()
            .iter()
            .map(|l| Line::styled(l.clone(), Style::default().fg(Color::DarkGray)))
            .collect()
    } else {
        Vec::new()
    }
}
