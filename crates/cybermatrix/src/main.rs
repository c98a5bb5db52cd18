use std::{fs::File, io, path::Path, sync::Mutex, time::Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use cybermatrix_core::{HostEvent, PartialSettings, Settings};
use cybermatrix_effect::CyberMatrix;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};
use tracing_subscriber::EnvFilter;

mod cli;
mod clock;
mod terminal;

use cli::Cli;
use clock::FrameClock;
use terminal::{TerminalContainer, cell_center, viewport_for};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let options = cybermatrix_config::load(cli.config.as_deref())?.overlay(cli.overrides());
    if cli.print_config {
        print!("{}", toml::to_string_pretty(&Settings::resolve(options))?);
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = run(terminal, options, cli.fps);
    ratatui::restore();
    result
}

/// Log to a file; the terminal itself belongs to the animation.
fn init_tracing(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(terminal: DefaultTerminal, options: PartialSettings, fps: u32) -> color_eyre::Result<()> {
    execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)?;
    let result = App::new(options, fps).run(terminal);
    execute!(io::stdout(), DisableMouseCapture, DisableFocusChange)?;
    result
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    /// Show the key help line over the animation.
    show_help: bool,
    effect: CyberMatrix<TerminalContainer, FrameClock>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(options: PartialSettings, fps: u32) -> Self {
        Self {
            running: false,
            show_help: true,
            effect: CyberMatrix::new(TerminalContainer, FrameClock::new(fps), options),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        tracing::info!(
            particles = self.effect.particles().len(),
            streams = self.effect.drops().len(),
            "cybermatrix running"
        );
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            if let Some(request) = self.effect.scheduler_mut().take_due(Instant::now()) {
                self.effect.on_frame(request);
            }
        }
        self.effect.destroy();
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        if let Some(surface) = self.effect.surface() {
            frame.render_widget(surface, area);
        }

        if !self.show_help {
            return;
        }
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Animation
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let key = Color::Rgb(0, 255, 65);
        let state = if self.effect.is_running() { " pause  " } else { " resume  " };
        let help = Line::from(vec![
            "q".bold().fg(key),
            " quit  ".dark_gray(),
            "space".bold().fg(key),
            state.dark_gray(),
            "r".bold().fg(key),
            " rain  ".dark_gray(),
            "g".bold().fg(key),
            " grid  ".dark_gray(),
            "c".bold().fg(key),
            " links  ".dark_gray(),
            "h".bold().fg(key),
            " hide help".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the time left until the next frame.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self.effect.scheduler().time_until_due(Instant::now());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::FocusLost => self.effect.handle_event(HostEvent::PointerLeave),
                Event::Resize(cols, rows) => self
                    .effect
                    .handle_event(HostEvent::Resize(viewport_for(cols, rows))),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('r')) => self.toggle_rain(),
            (_, KeyCode::Char('g')) => self.toggle_grid(),
            (_, KeyCode::Char('c')) => self.toggle_connections(),
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Pointer motion inside the terminal, reported at the cell center.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
            let at = cell_center(mouse.column, mouse.row);
            self.effect
                .handle_event(HostEvent::PointerMove { x: at.x, y: at.y });
        }
    }

    /// Stop or restart the frame chain.
    fn toggle_pause(&mut self) {
        if self.effect.is_running() {
            self.effect.stop();
        } else {
            self.effect.start();
        }
    }

    fn toggle_rain(&mut self) {
        let show = !self.effect.settings().show_matrix_rain;
        self.effect.update_config(PartialSettings {
            show_matrix_rain: Some(show),
            ..Default::default()
        });
    }

    fn toggle_grid(&mut self) {
        let show = !self.effect.settings().show_grid;
        self.effect.update_config(PartialSettings {
            show_grid: Some(show),
            ..Default::default()
        });
    }

    fn toggle_connections(&mut self) {
        let show = !self.effect.settings().show_connections;
        self.effect.update_config(PartialSettings {
            show_connections: Some(show),
            ..Default::default()
        });
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
