use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    /// Periodic redraw so poller progress shows without input.
    Refresh,
}
