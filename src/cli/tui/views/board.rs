//! Board view: add form, pending and completed lists, progress bar

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};

use crate::cli::tui::app::{App, Focus, InputMode};
use crate::controller::FormField;
use crate::domain::{Priority, Urgency};
use crate::view::TaskItem;

/// Draw the board layout
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Add form
            Constraint::Min(6),    // Lists
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    draw_form(frame, app, chunks[0]);
    draw_pending(frame, app, lists[0]);
    draw_completed(frame, app, lists[1]);
    draw_progress(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = app.form();
    let adding = app.input_mode() == InputMode::Adding;

    let field_style = |field: FormField| {
        if adding && form.field == field {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        }
    };

    let deadline = if form.deadline.is_empty() && !adding {
        "YYYY-MM-DD".to_string()
    } else {
        form.deadline.clone()
    };

    let line = Line::from(vec![
        Span::raw("Task: "),
        Span::styled(format!("{} ", form.text), field_style(FormField::Text)),
        Span::raw("  Priority: "),
        Span::styled(form.priority.label(), field_style(FormField::Priority)),
        Span::raw("  Deadline: "),
        Span::styled(deadline, field_style(FormField::Deadline)),
    ]);

    let border = if adding { Color::Cyan } else { Color::DarkGray };
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title("New task [n]")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );

    frame.render_widget(paragraph, area);
}

fn draw_pending(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();
    let items: Vec<ListItem> = view.pending.iter().map(task_line).map(ListItem::new).collect();

    let title = format!(
        "Pending ({}/{}) [filter: {}]",
        view.pending.len(),
        view.pending_total,
        view.filter
    );
    draw_list(
        frame,
        items,
        title,
        app.focus() == Focus::Pending,
        app.pending_index(),
        area,
    );
}

fn draw_completed(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();
    let items: Vec<ListItem> = view
        .completed
        .iter()
        .map(task_line)
        .map(|line| ListItem::new(line).style(Style::default().fg(Color::DarkGray)))
        .collect();

    let title = format!("Completed ({})", view.completed.len());
    draw_list(
        frame,
        items,
        title,
        app.focus() == Focus::Completed,
        app.completed_index(),
        area,
    );
}

fn draw_list(
    frame: &mut Frame,
    items: Vec<ListItem>,
    title: String,
    focused: bool,
    selected: usize,
    area: Rect,
) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if focused && !empty {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_line(item: &TaskItem) -> Line<'static> {
    let check = if item.completed { "[x] " } else { "[ ] " };

    let label_style = match item.urgency {
        Some(Urgency::Overdue) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Some(Urgency::Close) => Style::default().fg(Color::Yellow),
        _ => Style::default(),
    };

    let mut spans = vec![
        Span::raw(check),
        Span::styled(item.text.clone(), label_style),
        Span::raw(" "),
        Span::styled(format!("[{}]", item.badge), priority_style(item.priority)),
        Span::styled(
            format!(" {}", item.deadline_text),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(decoration) = item.decoration {
        spans.push(Span::styled(format!(" ({})", decoration), label_style));
    }

    Line::from(spans)
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Green),
    }
}

fn draw_progress(frame: &mut Frame, app: &App, area: Rect) {
    let gauge = Gauge::default()
        .block(Block::default().title("Progress").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(app.view().progress_percent())
        .label(app.view().progress_width());

    frame.render_widget(gauge, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (content, style) = match app.input_mode() {
        InputMode::Normal => {
            let msg = app.status_message().unwrap_or("[n]ew [s]ort [f]ilter [?]help [q]uit");
            (msg.to_string(), Style::default())
        }
        InputMode::Adding => (
            "Tab: next field  Enter: add  Esc: cancel".to_string(),
            Style::default().fg(Color::Yellow),
        ),
    };

    let status = match (app.input_mode(), app.status_message()) {
        (InputMode::Adding, Some(msg)) => format!("{}  |  {}", msg, content),
        _ => content,
    };

    let paragraph = Paragraph::new(status)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
