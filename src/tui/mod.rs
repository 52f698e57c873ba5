pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use tracing::debug;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer log output while TUI is active to prevent it corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250);
    debug!(path = %app.book_path.display(), entries = app.book.len(), "Starting TUI");

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    // Flush buffered log lines now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprint!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Editing
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
                KeyCode::Char('C') => app.request_clear(),

                // Undo
                KeyCode::Char('z') => app.undo_last(),

                // Export
                KeyCode::Char('e') => {
                    let path = crate::output::default_export_path();
                    app.export_to(&path);
                }

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::EntryForm => {
            match key.code {
                KeyCode::Enter => app.submit_form(),
                KeyCode::Esc => app.cancel_form(),
                KeyCode::Tab | KeyCode::Down => app.form.next_field(),
                KeyCode::BackTab | KeyCode::Up => app.form.previous_field(),
                KeyCode::Backspace => app.form.backspace(),
                KeyCode::Char(c) => app.form.push_char(c),

                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::ConfirmDelete | app::InputMode::ConfirmClear => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
