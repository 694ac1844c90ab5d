//! Render orchestration for the journey TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use odyssey_core::{Phase, SavedJourney, OVERRUN_MARGIN, STEP};

use crate::app::{App, FormField};
use crate::ui::centered_rect;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    match app.phase() {
        Phase::Landing => render_landing(frame, app, area),
        Phase::Listing => render_listing(frame, app, area),
        Phase::IntroForm => render_intro_form(frame, app, area),
        Phase::Generating => render_busy(frame, app, "Weaving your destiny..."),
        Phase::Playing => render_playing(frame, app, area),
        Phase::Finished => render_finished(frame, app, area),
    }
}

/// Full-screen waiting frame, drawn before a slow operation is awaited.
pub fn render_busy(frame: &mut Frame, app: &App, message: &str) {
    let area = frame.area();
    let spinner = SPINNER[(app.animation_frame / 2) as usize % SPINNER.len()];

    let lines = vec![
        Line::default(),
        Line::styled(format!("{spinner} {message}"), app.theme.highlight_style()),
        Line::default(),
        Line::styled(
            "The model is shaping your next ten years",
            app.theme.dim_style(),
        ),
    ];

    let paragraph = Paragraph::new(lines)
        .centered()
        .block(Block::default().borders(Borders::ALL).border_style(app.theme.border_style(false)));
    frame.render_widget(paragraph, centered_rect(60, 8, area));
}

fn render_landing(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::default(),
        Line::styled("O D Y S S E Y", app.theme.title_style()),
        Line::styled("walk the decade toward your goal", app.theme.dim_style()),
        Line::default(),
        Line::default(),
        menu_line(app, "n", "Begin a new journey"),
        menu_line(app, "f", "Find saved journeys"),
        menu_line(app, "r", "Resume the last journey on this device"),
        menu_line(app, "q", "Quit"),
    ];

    if let Some(error) = &app.error {
        lines.push(Line::default());
        lines.push(Line::styled(error.clone(), app.theme.error_style()));
    }

    let paragraph = Paragraph::new(lines)
        .centered()
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(app.theme.border_style(false)));
    frame.render_widget(paragraph, centered_rect(64, 16, area));
}

fn menu_line(app: &App, key: &str, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[{key}] "), app.theme.highlight_style()),
        Span::styled(label.to_string(), app.theme.text_style()),
    ])
}

fn render_listing(frame: &mut Frame, app: &App, area: Rect) {
    let outer = centered_rect(area.width.saturating_sub(8).max(40), area.height.saturating_sub(4).max(12), area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(outer);

    let saved = app.controller.saved();
    if saved.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::default(),
            Line::styled("No journeys recorded yet.", app.theme.dim_style()),
            Line::default(),
            Line::styled("Press Esc to go back and begin one.", app.theme.dim_style()),
        ])
        .centered()
        .block(titled_block(app, "Recorded Journeys"));
        frame.render_widget(paragraph, chunks[0]);
    } else {
        let items: Vec<ListItem> = saved.iter().map(|journey| journey_item(app, journey)).collect();
        let list = List::new(items)
            .block(titled_block(app, "Recorded Journeys"))
            .highlight_style(app.theme.highlight_style().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(app.list_selected.min(saved.len() - 1)));
        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    let hints = Paragraph::new(Line::styled(
        "j/k move   Enter resume   Esc back",
        app.theme.dim_style(),
    ))
    .centered();
    frame.render_widget(hints, chunks[1]);
}

fn titled_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(app.theme.border_style(false))
}

fn journey_item<'a>(app: &App, journey: &'a SavedJourney) -> ListItem<'a> {
    let walked = journey.progression.distance.floor() as i64;
    let header = Line::from(vec![
        Span::styled(journey.context.name.clone(), app.theme.text_style().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {walked}m walked"), app.theme.dim_style()),
    ]);
    let goal = Line::styled(
        format!("  goal: {}", journey.context.ten_year_goal),
        app.theme.dim_style(),
    );
    ListItem::new(vec![header, goal])
}

fn render_intro_form(frame: &mut Frame, app: &App, area: Rect) {
    let outer = centered_rect(70, 18, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(outer);

    let title = Paragraph::new(Line::styled("Create your odyssey", app.theme.title_style())).centered();
    frame.render_widget(title, chunks[0]);

    render_form_field(frame, app, chunks[1], "Your name", &app.form.name, FormField::Name);
    render_form_field(
        frame,
        app,
        chunks[2],
        "Where are you today?",
        &app.form.current_status,
        FormField::CurrentStatus,
    );
    render_form_field(
        frame,
        app,
        chunks[3],
        "Where do you want to be at the end of the decade?",
        &app.form.ten_year_goal,
        FormField::TenYearGoal,
    );

    let footer = if let Some(error) = &app.error {
        Line::styled(error.clone(), app.theme.error_style())
    } else {
        Line::styled("Tab next field   Enter submit on the last field   Esc cancel", app.theme.dim_style())
    };
    frame.render_widget(Paragraph::new(footer).centered(), chunks[4]);
}

fn render_form_field(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    label: &str,
    value: &str,
    field: FormField,
) {
    let focused = app.form.focus == field;
    let display = if focused {
        format!("{value}_")
    } else {
        value.to_string()
    };

    let paragraph = Paragraph::new(display).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(app.theme.border_style(focused)),
    );
    frame.render_widget(paragraph, area);
}

fn render_playing(frame: &mut Frame, app: &App, area: Rect) {
    let Some(journey) = app.controller.active() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    // Milestone track: one pip per milestone, lit once revealed.
    let current_index = journey.progression.current_index;
    let pips: Vec<Span> = (0..journey.milestones.len())
        .map(|i| Span::styled("██ ", app.theme.pip_style((i as i32) <= current_index)))
        .collect();
    let track = Paragraph::new(Line::from(pips))
        .centered()
        .block(Block::default().borders(Borders::ALL).border_style(app.theme.border_style(false)));
    frame.render_widget(track, chunks[0]);

    // The road ahead.
    let middle = vec![
        Line::default(),
        Line::styled(
            format!("{}'s odyssey", journey.context.name),
            app.theme.title_style(),
        ),
        Line::default(),
        Line::styled(format!("\"{}\"", journey.context.ten_year_goal), app.theme.highlight_style()),
    ];
    frame.render_widget(Paragraph::new(middle).centered().wrap(Wrap { trim: true }), chunks[1]);

    // Distance toward the end of the decade.
    let total = journey.milestones.len() as f64 * STEP + OVERRUN_MARGIN;
    let ratio = (journey.progression.distance / total).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(app.theme.border_style(false)))
        .gauge_style(app.theme.pip_style(true))
        .label(format!("{:.0}m", journey.progression.distance))
        .ratio(ratio);
    frame.render_widget(gauge, chunks[2]);

    let hints = Paragraph::new(Line::styled(
        "w/Up walk forward   s/Down walk back   Space stop   q quit",
        app.theme.dim_style(),
    ))
    .centered();
    frame.render_widget(hints, chunks[3]);

    if app.show_milestone_dialog {
        render_milestone_dialog(frame, app, area);
    }
}

fn render_milestone_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(journey) = app.controller.active() else {
        return;
    };
    let Some(milestone) = journey.current_milestone() else {
        return;
    };

    let dialog = centered_rect(area.width.saturating_sub(10).max(40), 16, area);
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::styled(
            format!("MILESTONE REACHED - end of {}", display_year(milestone.year)),
            app.theme.reveal_style(),
        ),
        Line::default(),
        Line::styled(milestone.title.clone(), app.theme.title_style()),
        Line::default(),
        Line::styled(milestone.description.clone(), app.theme.text_style()),
        Line::default(),
        Line::styled(format!("\"{}\"", milestone.advice), app.theme.highlight_style().add_modifier(Modifier::ITALIC)),
        Line::default(),
        Line::styled("[Enter] Continue the walk", app.theme.dim_style()),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(true)),
        );
    frame.render_widget(paragraph, dialog);
}

fn render_finished(frame: &mut Frame, app: &App, area: Rect) {
    let goal = app
        .controller
        .active()
        .map(|journey| journey.context.ten_year_goal.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::default(),
        Line::styled("LEGACY COMPLETE", app.theme.reveal_style()),
        Line::default(),
        Line::styled("You walked every meter of the destiny you imagined.", app.theme.text_style()),
        Line::default(),
        Line::styled(format!("\"{goal}\""), app.theme.highlight_style()),
        Line::default(),
        Line::styled("[Enter] Start a new story   [q] Quit", app.theme.dim_style()),
    ];

    let paragraph = Paragraph::new(lines)
        .centered()
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(app.theme.border_style(false)));
    frame.render_widget(paragraph, centered_rect(70, 14, area));
}

/// Milestone years are calendar years; tolerate a model that answered with a
/// small offset from the journey start instead.
fn display_year(year: i32) -> i32 {
    if year < 100 {
        2025 + year
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_year_passes_calendar_years() {
        assert_eq!(display_year(2031), 2031);
    }

    #[test]
    fn test_display_year_lifts_small_offsets() {
        assert_eq!(display_year(3), 2028);
    }
}
