use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Periodic redraw, once a second. The bracket is updated in place by the
/// poller, so the UI only needs a nudge to pick up changes.
pub struct PeriodicRefresher {
    ui_events: mpsc::Sender<UiEvent>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events, period: Duration::from_secs(1) }
    }

    pub async fn run(self) {
        let mut refresh_interval = interval(self.period);
        // Skip the immediate first tick; startup draws on its own.
        refresh_interval.tick().await;

        loop {
            refresh_interval.tick().await;
            if self.ui_events.send(UiEvent::Refresh).await.is_err() {
                break;
            }
        }
    }
}
