use atsbracket::Bracket;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Health,
    Help,
}

/// Terminal UI state. Bracket data itself lives behind the poller's mutex
/// and is read at draw time.
pub struct App {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    /// 1-based round shown on the Bracket tab.
    pub view_round: u32,
    pub n_rounds: u32,
    pub scroll_offset: u16,
    pub full_screen: bool,
    pub show_logs: bool,
    /// Spinner glyph while a poll pass is running, otherwise blank.
    pub spinner_char: char,
    spinner_index: usize,
}

impl App {
    /// Opens on the earliest round that still has games to play.
    pub fn new(bracket: &Bracket) -> Self {
        let n_rounds = bracket.n_rounds();
        let view_round = bracket
            .frontier()
            .iter()
            .filter_map(|&id| bracket.event(id))
            .map(|e| e.round)
            .min()
            .unwrap_or(n_rounds);

        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            view_round,
            n_rounds,
            scroll_offset: 0,
            full_screen: false,
            show_logs: false,
            spinner_char: ' ',
            spinner_index: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.active_tab == next {
            return;
        }
        self.previous_tab = self.active_tab;
        self.active_tab = next;
        self.scroll_offset = 0;
    }

    pub fn exit_help(&mut self) {
        if self.active_tab == MenuItem::Help {
            self.active_tab = self.previous_tab;
        }
    }

    /// Tab bar index to keep highlighted while Help is open.
    pub fn previous_tab_index(&self) -> usize {
        match self.previous_tab {
            MenuItem::Health => 1,
            _ => 0,
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.show_logs = !self.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.full_screen = !self.full_screen;
    }

    // -----------------------------------------------------------------------
    // Bracket navigation
    // -----------------------------------------------------------------------

    pub fn next_round(&mut self) {
        if self.view_round < self.n_rounds {
            self.view_round += 1;
            self.scroll_offset = 0;
        }
    }

    pub fn prev_round(&mut self) {
        if self.view_round > 1 {
            self.view_round -= 1;
            self.scroll_offset = 0;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Called on every refresh tick.
    pub fn advance_spinner(&mut self, polling: bool, healthy: bool) {
        if polling {
            self.spinner_char = SPINNER_CHARS[self.spinner_index];
            self.spinner_index = (self.spinner_index + 1) % SPINNER_CHARS.len();
        } else {
            self.spinner_char = if healthy { ' ' } else { ERROR_CHAR };
            self.spinner_index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atsbracket::{Participant, Team};

    fn bracket(n: usize) -> Bracket {
        let participants = (0..n)
            .map(|i| {
                let team = Team {
                    name: format!("Team {i}"),
                    seed: 1,
                    code: format!("T{i}"),
                    odds_name: format!("Odds T{i}"),
                    original_position: i,
                };
                Participant::new(format!("Player {i}"), team)
            })
            .collect();
        Bracket::new(participants).unwrap()
    }

    #[test]
    fn round_navigation_stays_in_range() {
        let mut app = App::new(&bracket(8));
        assert_eq!(app.view_round, 1);
        app.prev_round();
        assert_eq!(app.view_round, 1);
        app.next_round();
        app.next_round();
        app.next_round();
        assert_eq!(app.view_round, 3);
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = App::new(&bracket(4));
        app.update_tab(MenuItem::Health);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.active_tab, MenuItem::Health);
    }

    #[test]
    fn spinner_shows_error_when_unhealthy() {
        let mut app = App::new(&bracket(4));
        app.advance_spinner(true, true);
        assert_eq!(app.spinner_char, SPINNER_CHARS[0]);
        app.advance_spinner(true, true);
        assert_eq!(app.spinner_char, SPINNER_CHARS[1]);
        app.advance_spinner(false, false);
        assert_eq!(app.spinner_char, ERROR_CHAR);
        app.advance_spinner(false, true);
        assert_eq!(app.spinner_char, ' ');
    }
}
