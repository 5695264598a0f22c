//! Interactive terminal client.

use std::io::Write;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType},
};

use crate::backend::{create_backend, load_payload};
use crate::config::ViewerConfig;
use crate::payload::RawPayload;
use crate::selection::SessionStore;
use crate::tui::{App, Line, LineStyle};

/// Run the interactive viewer until the user quits.
pub(crate) fn cmd_view(config: &ViewerConfig) -> crate::Result<()> {
    let (width, height) = terminal::size().unwrap_or((80, 24));
    let mut app = App::with_dimensions(SessionStore::new(), config.source.clone(), width, height);
    let pending = spawn_fetch(config.clone());

    terminal::enable_raw_mode().map_err(crate::Error::terminal)?;
    let mut stdout = std::io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)
        .map_err(crate::Error::terminal)?;

    let result = run_tui_loop(&mut app, &mut stdout, config, &pending);

    // Cleanup: restore terminal
    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

/// Fetch and parse the sheet off the UI thread.
fn spawn_fetch(config: ViewerConfig) -> Receiver<crate::Result<RawPayload>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = create_backend(&config).and_then(|backend| load_payload(backend.as_ref(), &config));
        // The receiver is gone if the user quit before the fetch finished.
        let _ = tx.send(result);
    });
    rx
}

fn run_tui_loop<W: Write>(
    app: &mut App<SessionStore>,
    stdout: &mut W,
    config: &ViewerConfig,
    pending: &Receiver<crate::Result<RawPayload>>,
) -> crate::Result<()> {
    let mut loading = true;

    while !app.should_quit() {
        if loading {
            match pending.try_recv() {
                Ok(result) => {
                    app.finish_loading(result, config.second_row_as_header, &config.initial_query);
                    loading = false;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    app.finish_loading(
                        Err(crate::Error::source_unavailable(
                            &config.source,
                            "fetch thread ended without a result",
                        )),
                        config.second_row_as_header,
                        &config.initial_query,
                    );
                    loading = false;
                }
            }
        }

        draw(stdout, &app.render())?;

        if event::poll(Duration::from_millis(100)).map_err(crate::Error::terminal)? {
            match event::read().map_err(crate::Error::terminal)? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(w, h) => app.resize(w, h),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw<W: Write>(stdout: &mut W, lines: &[Line]) -> crate::Result<()> {
    let (_, height) = terminal::size().unwrap_or((80, 24));
    queue!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0)).map_err(crate::Error::terminal)?;

    let shown = lines.len().min(usize::from(height));
    for (i, line) in lines.iter().take(shown).enumerate() {
        let attribute = match line.style {
            LineStyle::Plain => Attribute::Reset,
            LineStyle::Header => Attribute::Bold,
            LineStyle::Focused | LineStyle::Bar => Attribute::Reverse,
            LineStyle::Dim => Attribute::Dim,
        };
        queue!(
            stdout,
            SetAttribute(attribute),
            Print(&line.text),
            SetAttribute(Attribute::Reset)
        )
        .map_err(crate::Error::terminal)?;
        if i + 1 < shown {
            queue!(stdout, Print("\r\n")).map_err(crate::Error::terminal)?;
        }
    }

    stdout.flush().map_err(crate::Error::terminal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_spawn_fetch_delivers_local_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "ID,Name\n1,Widget\n").unwrap();
        let config = ViewerConfig::default().with_source(path.to_string_lossy().to_string());

        let payload = spawn_fetch(config).recv().unwrap().unwrap();
        assert_eq!(payload.len(), 1, "FALSIFIED: one data row expected");
    }

    #[test]
    fn f_spawn_fetch_reports_missing_file() {
        let config = ViewerConfig::default().with_source("/nonexistent/sheet.csv");
        let result = spawn_fetch(config).recv().unwrap();
        assert!(result.unwrap_err().is_source_unavailable());
    }
}
