use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Apply one key press. Returns false when the user asked to quit.
pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) -> bool {
    let mut guard = app.lock().await;

    match (guard.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => return false,

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Health),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.next_round(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.prev_round(),
        (MenuItem::Bracket | MenuItem::Health, Char('j') | KeyCode::Down, _) => guard.scroll_down(),
        (MenuItem::Bracket | MenuItem::Health, Char('k') | KeyCode::Up, _) => guard.scroll_up(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
    true
}
