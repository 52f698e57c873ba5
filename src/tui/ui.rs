use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};
use crate::grading::mark::MAX_MARK;
use crate::output::formatter::truncate_subject;
use crate::output::{format_decimal, format_mark, format_plain};
use crate::tui::app::{App, FormField, InputMode};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Table(fill) + Summary(1) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),  // Title bar
        Constraint::Fill(1),    // Entries table
        Constraint::Length(1),  // Summary line
        Constraint::Length(1),  // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_table(frame, chunks[1], app);
    render_summary(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::EntryForm => render_form_popup(frame, app),
        InputMode::ConfirmDelete => {
            let subject = app
                .selected_entry()
                .map(|e| e.subject.clone())
                .unwrap_or_default();
            render_confirm_popup(frame, &app.theme, &format!("Delete '{}'?", subject));
        }
        InputMode::ConfirmClear => {
            let msg = format!("Delete all {} entries?", app.book.len());
            render_confirm_popup(frame, &app.theme, &msg);
        }
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = "Moyenne";
    let mut spans = vec![Span::styled(title, Style::default().fg(app.theme.title_color).bold())];

    if !app.book.is_empty() {
        let sep = app.config.export.decimal_char();
        let status = app.summary.status();
        let average_text = format!(
            "General average: {}/20 {}",
            format_decimal(app.summary.general_average, sep),
            status.label()
        );
        let padding_len = (area.width as usize)
            .saturating_sub(title.len() + average_text.chars().count());

        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(
            average_text,
            Style::default().fg(app.theme.status_color(status)).bold(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.book.is_empty() {
        let empty_msg = Paragraph::new("No grades yet. Press 'a' to add a subject.")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let theme = &app.theme;
    let sep = app.config.export.decimal_char();

    let rows: Vec<Row> = app
        .book
        .scored()
        .into_iter()
        .enumerate()
        .map(|(idx, (entry, average, status))| {
            let index = format!("{}.", idx + 1);
            let color = theme.status_color(status);

            let mut average_spans = vec![Span::styled(
                format!("{:>6} ", format_decimal(average, sep)),
                Style::default().fg(color).bold(),
            )];
            average_spans.extend(average_bar(average, 8, color, theme).spans);

            let mark_cell = |mark: Option<f64>| {
                let style = if mark.is_some() {
                    Style::default()
                } else {
                    Style::default().fg(theme.absent_mark)
                };
                Cell::from(format_mark(mark, sep)).style(style)
            };

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(index).style(Style::default().fg(theme.index_color)),
                Cell::from(truncate_subject(&entry.subject, 40)),
                Cell::from(format_plain(entry.coefficient, sep)),
                mark_cell(entry.continuous_assessment),
                mark_cell(entry.practical_work),
                Cell::from(format_decimal(entry.exam, sep)),
                Cell::from(Line::from(average_spans)),
                Cell::from(status.label()).style(Style::default().fg(color)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),   // Index: "99."
        Constraint::Fill(1),     // Subject
        Constraint::Length(5),   // Coef
        Constraint::Length(6),   // CC
        Constraint::Length(6),   // TP
        Constraint::Length(6),   // Exam
        Constraint::Length(16),  // Average + bar: " 10.40 ████░░░░"
        Constraint::Length(9),   // Status
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Subject", "Coef", "CC", "TP", "Exam", "Average", "Status"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let count = app.book.len();
    let subjects = if count == 1 { "subject" } else { "subjects" };

    let line = Line::from(vec![
        Span::styled(
            format!("{} validated", app.summary.validated_count),
            Style::default().fg(theme.status_good),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} in danger", app.summary.danger_count),
            Style::default().fg(theme.status_danger),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} {} | total coefficient {}", count, subjects,
                format_plain(app.book.total_coefficient(), app.config.export.decimal_char())),
            Style::default().fg(theme.muted),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        // Show flash message with color based on message type
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Nothing") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        // Build hints with colored shortcut keys
        let hints = [
            ("j/k", ":nav "),
            ("a", ":add "),
            ("d", ":delete "),
            ("C", ":clear "),
            ("e", ":export "),
            ("z", ":undo "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area
    );
}

/// Bar showing the average on the /20 scale
fn average_bar(average: f64, width: usize, color: Color, theme: &ThemeColors) -> Line<'static> {
    let ratio = (average / MAX_MARK).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(color)));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)));
    }

    Line::from(spans)
}

/// Render the add-entry form popup
fn render_form_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(50, 11, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Add Subject ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == app.form.focus;
            let label_style = if focused {
                theme.field_focus
            } else {
                Style::default().fg(theme.muted)
            };
            let cursor = if focused { "|" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:<15}", field.label()), label_style),
                Span::raw(format!("{}{}", app.form.value(*field), cursor)),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    match app.form.error {
        Some(ref error) => lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.form_error),
        ))),
        None => lines.push(Line::from("")),
    }
    lines.push(Line::from(Span::styled(
        "Tab: next | Enter: save | Esc: cancel",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a yes/no confirmation popup
fn render_confirm_popup(frame: &mut Frame, theme: &ThemeColors, message: &str) {
    let width = (message.chars().count() as u16 + 6).max(34);
    let popup_area = centered_rect_fixed(width, 5, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Confirm ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let chunks = Layout::vertical([
        Constraint::Length(1),  // Question
        Constraint::Length(1),  // Spacer
        Constraint::Length(1),  // Help text
    ])
    .split(inner);

    frame.render_widget(Paragraph::new(message.to_string()).alignment(Alignment::Center), chunks[0]);

    let help = Paragraph::new("y/Enter: confirm | n/Esc: cancel")
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.muted));
    frame.render_widget(help, chunks[2]);
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 16, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let shortcuts = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("a             ", "Add a subject"),
        ("d             ", "Delete selected subject"),
        ("C             ", "Clear all subjects"),
        ("e             ", "Export to CSV"),
        ("z             ", "Undo last change"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = shortcuts
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();

    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "CC+TP: 30% CC, 20% TP, 50% exam",
        Style::default().fg(theme.muted),
    )));
    help_lines.push(Line::from(Span::styled(
        "CC or TP: 40% mark, 60% exam",
        Style::default().fg(theme.muted),
    )));
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(
        Span::styled("Press any key to close", Style::default().fg(theme.muted))
    ));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
