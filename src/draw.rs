use chrono::{DateTime, Local, Utc};
use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, ERROR_CHAR, MenuItem};
use crate::ui::layout::LayoutAreas;
use atsbracket::{Bracket, Event, EventStatus};

static TABS: &[&str; 2] = &["Bracket", "Health"];

const HELP_TEXT: &str = "q=quit  1=Bracket  2=Health  h/l=round  j/k=scroll  \"=logs  f=full screen  Esc=back";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &App, bracket: &Bracket)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.full_screen, app.show_logs);

        if !app.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app, bracket),
            MenuItem::Health => draw_health(f, layout.main, app, bracket),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if app.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app);
    });
    if let Err(e) = result {
        error!("Failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::Health => 1,
        MenuItem::Help => app.previous_tab_index(),
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn status_color(status: EventStatus) -> Color {
    match status {
        EventStatus::InProgress => Color::Rgb(255, 165, 0),
        EventStatus::Scheduled => Color::White,
        EventStatus::Final => Color::Gray,
        EventStatus::Tbd => Color::Magenta,
        EventStatus::Postponed => Color::Red,
    }
}

/// One event as colored spans: id, matchup, score, then spread and status in
/// the status color.
fn event_line<'a>(bracket: &Bracket, event: &Event) -> Line<'a> {
    let (home, away) = bracket.side_labels(event);
    let (home_score, away_score) = bracket.score_line(event);
    let spread = bracket.spread_label(event);
    let status = Style::default().fg(status_color(event.status()));

    let mut spans = vec![
        Span::styled(format!("#{:<3} ", event.event_id), Style::default().fg(Color::Red)),
        Span::styled(format!("{home} vs. {away}  "), Style::default().fg(Color::Blue)),
        Span::styled(format!("{home_score} - {away_score}  "), Style::default().fg(Color::Green)),
        Span::styled(format!("Spread: {spread}  "), status),
        Span::styled(event.status().to_string(), status),
    ];
    if let Some(clock) = event.clock() {
        spans.push(Span::styled(format!(" {clock}"), status));
    }
    if event.status() == EventStatus::Scheduled
        && let Some(start) = event.estimated_start_time()
    {
        let soon = event.is_starting_within(Utc::now(), chrono::Duration::hours(1));
        let color = if soon { Color::Yellow } else { Color::DarkGray };
        spans.push(Span::styled(
            format!(" {}", start.with_timezone(&Local).format("%a %H:%M")),
            Style::default().fg(color),
        ));
    }
    if event.spread().is_some() && !event.spread_final() {
        spans.push(Span::styled(" (line may move)", Style::default().fg(Color::DarkGray)));
    }
    if let Some(winner) = event.winning_participant().and_then(|id| bracket.participant(id)) {
        spans.push(Span::styled(
            format!("  → {} covers", winner.name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &App, bracket: &Bracket) {
    let title = format!(
        " {} ({}/{}) ",
        bracket.round_description(app.view_round),
        app.view_round,
        bracket.n_rounds()
    );
    let block = default_border(Color::White).title(title);

    let by_round = bracket.events_by_round();
    let lines: Vec<Line> = by_round
        .get(&app.view_round)
        .map(|events| events.iter().map(|e| event_line(bracket, e)).collect())
        .unwrap_or_default();

    if lines.is_empty() {
        draw_placeholder(f, area, "No events in this round");
        return;
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .scroll((app.scroll_offset, 0)),
        area,
    );
}

fn draw_health(f: &mut Frame, area: Rect, app: &App, bracket: &Bracket) {
    let block = default_border(Color::White).title(" Health ");
    let snapshot = bracket.snapshot();
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White);
    let timestamp = |t: Option<DateTime<Local>>| {
        t.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string())
    };

    let (updating, updating_style) = if snapshot.is_successfully_updating {
        ("yes", Style::default().fg(Color::Green))
    } else {
        ("no", Style::default().fg(Color::Red))
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Successfully updating: ", label),
            Span::styled(updating, updating_style),
        ]),
        Line::from(vec![
            Span::styled("Scoreboard passes:     ", label),
            Span::styled(snapshot.calls_to_espn.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Odds API calls:        ", label),
            Span::styled(snapshot.calls_to_odds_api.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Last successful poll:  ", label),
            Span::styled(timestamp(snapshot.last_successful_update), value),
        ]),
        Line::from(vec![
            Span::styled("Last attempted poll:   ", label),
            Span::styled(timestamp(snapshot.last_attempted_update), value),
        ]),
        Line::from(vec![
            Span::styled("Games incomplete:      ", label),
            Span::styled(
                format!("{} of {}", snapshot.total_games_incomplete, snapshot.total_games_in_bracket),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("In progress now:       ", label),
            Span::styled(bracket.events_in_progress().len().to_string(), value),
        ]),
        Line::default(),
    ];

    if let Some(champion) = bracket.champion() {
        lines.push(Line::styled(
            format!("Champion: {} with {}", champion.name, champion.team.name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::default());
    }

    for participant in bracket.participants() {
        let style = if participant.is_in {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::styled(participant.to_string(), style));
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .scroll((app.scroll_offset, 0)),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App) {
    if app.spinner_char == ' ' {
        return;
    }
    let style = match app.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(app.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
