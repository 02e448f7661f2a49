// TUI module - interactive array grid
//
// Sets up the terminal, runs the event loop and restores the terminal when
// done. With `clear` the grid takes over the alternate screen; without it
// the grid is drawn inline below the existing output and stays in the
// scrollback after exit.

pub mod app;
pub mod clipboard;
pub mod colormap;
pub mod components;
pub mod layout;
pub mod theme;
pub mod traits;

use crate::config::Config;
use crate::highlight::grid_dims;
use crate::logging::LogBuffer;
use crate::wrapped::WrappedArray;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};
use std::io::{self, Stdout};
use std::time::Duration;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Show `array` as an interactive grid until the user quits
pub async fn run_grid(array: WrappedArray, config: &Config, log_buffer: LogBuffer, clear: bool) -> Result<()> {
    let (rows, _) = grid_dims(array.shape());

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if clear {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;
    } else {
        execute!(stdout, EnableMouseCapture).context("Failed to setup terminal")?;
    }

    let backend = CrosstermBackend::new(stdout);
    let terminal = if clear {
        Terminal::new(backend)
    } else {
        let (_, height) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::Inline(layout::inline_height(rows).min(height));
        Terminal::with_options(backend, TerminalOptions { viewport })
    };
    let mut terminal = terminal.context("Failed to create terminal")?;
    if clear {
        terminal.clear().context("Failed to clear screen")?;
    }

    let mut app = App::new(array, config, log_buffer);
    tracing::info!(clear, theme = app.theme.kind.name(), "Grid session started");

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore terminal even when the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    if clear {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)
            .context("Failed to restore terminal")?;
    } else {
        execute!(terminal.backend_mut(), DisableMouseCapture)
            .context("Failed to restore terminal")?;
        println!();
    }
    terminal.show_cursor().context("Failed to show cursor")?;

    tracing::info!(
        selected = app.grid.session().highlights().len(),
        "Grid session ended"
    );
    result
}

/// Redraw, then wait for the next terminal event or tick
async fn run_event_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    loop {
        terminal
            .draw(|f| app.draw(f))
            .context("Failed to draw terminal")?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => app.handle_key(key),
                Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => break,
            },
            _ = tick_interval.tick() => app.tick(),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
