use crate::app::{App, MenuItem};
use crate::state::app_state::InputMode;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    // Text entry intercepts everything except Ctrl-C.
    if guard.state.input_mode != InputMode::Normal {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Esc, _) => guard.input_cancel(),
            (KeyCode::Enter, _) => guard.input_commit(),
            (KeyCode::Backspace, _) => guard.input_backspace(),
            (KeyCode::Down, _) => guard.state.search.move_down(),
            (KeyCode::Up, _) => guard.state.search.move_up(),
            (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => guard.input_push(c),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Dashboard),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Matches),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Teams),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Refresh both collections
        (_, Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadData).await;
            return;
        }

        // Filters
        (_, Char('l'), _) => guard.cycle_league(),
        (_, Char('d'), _) => guard.cycle_date_window(),
        (_, Char('c'), _) => guard.clear_filters(),

        // Matches: participant search + scrolling
        (MenuItem::Matches, Char('/'), _) => guard.begin_input(InputMode::MatchSearch),
        (MenuItem::Matches, Char('j') | KeyCode::Down, _) => guard.matches_scroll_down(),
        (MenuItem::Matches, Char('k') | KeyCode::Up, _) => guard.matches_scroll_up(),

        // Teams: picker search + standings scrolling
        (MenuItem::Teams, Char('/') | Char('i'), _) => guard.begin_input(InputMode::TeamSearch),
        (MenuItem::Teams, Char('j') | KeyCode::Down, _) => guard.standings_scroll_down(),
        (MenuItem::Teams, Char('k') | KeyCode::Up, _) => guard.standings_scroll_up(),

        // Global
        (_, Char('t'), _) => guard.toggle_theme(),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
