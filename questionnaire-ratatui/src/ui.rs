//! Drawing the screen.

use questionnaire::{InputKind, NavControls, Progress, Question, WidgetState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::Screen;

/// Draw the whole screen into a frame.
pub fn draw(frame: &mut Frame, screen: &Screen) {
    let area = frame.area();
    let theme = screen.theme();

    let toast_height = screen.toasts().len().min(3) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(2),            // Progress bar
            Constraint::Min(6),               // Card
            Constraint::Length(toast_height), // Toasts
            Constraint::Length(3),            // Help
        ])
        .split(area);

    let header = Paragraph::new(screen.title().to_string())
        .style(Style::default().fg(theme.primary).bold())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.muted)),
        );
    frame.render_widget(header, chunks[0]);

    match (screen.navigated_to(), screen.view(), screen.visible()) {
        (Some(location), _, _) => draw_leaving(frame, screen, location, chunks[2]),
        (None, Some(view), Some((question, widget))) => {
            draw_progress(frame, screen, &view.progress, chunks[1]);
            draw_card(frame, screen, question, widget, chunks[2]);
            draw_help(frame, screen, question, &view.controls, chunks[4]);
        }
        _ => {
            let empty = Paragraph::new("There are no questions for today.")
                .style(Style::default().fg(theme.muted))
                .alignment(Alignment::Center);
            frame.render_widget(empty, chunks[2]);
        }
    }

    draw_toasts(frame, screen, chunks[3]);

    if let Some(prompt) = screen.prompt() {
        draw_prompt(frame, screen, prompt, area);
    }
}

// Thin bar with "N of M" centered below it.
fn draw_progress(frame: &mut Frame, screen: &Screen, progress: &Progress, area: Rect) {
    let theme = screen.theme();
    let bar_width = area.width.saturating_sub(2);
    let bar_x = area.x + 1;

    let track = "─".repeat(bar_width as usize);
    frame.render_widget(
        Paragraph::new(track).style(Style::default().fg(theme.muted)),
        Rect::new(bar_x, area.y, bar_width, 1),
    );

    let filled_width = (progress.ratio() * f64::from(bar_width)) as u16;
    if filled_width > 0 {
        let filled = "━".repeat(filled_width as usize);
        frame.render_widget(
            Paragraph::new(filled).style(Style::default().fg(theme.primary)),
            Rect::new(bar_x, area.y, filled_width, 1),
        );
    }

    if area.height > 1 {
        let text = format!(" {progress} ");
        let text_width = (text.chars().count() as u16).min(bar_width);
        let text_x = bar_x + bar_width.saturating_sub(text_width) / 2;
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(theme.secondary)),
            Rect::new(text_x, area.y + 1, text_width, 1),
        );
    }
}

fn draw_card(
    frame: &mut Frame,
    screen: &Screen,
    question: &Question,
    widget: &WidgetState,
    area: Rect,
) {
    let theme = screen.theme();
    let prompt_height = if question.description().is_some() { 4 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(prompt_height), Constraint::Min(3)])
        .split(area);

    let mut lines = vec![Line::from(question.prompt().to_string())];
    if let Some(description) = question.description() {
        lines.push(Line::from(description.to_string()).fg(theme.muted).italic());
    }
    let title = if question.is_required() {
        " Question * "
    } else {
        " Question "
    };
    let prompt = Paragraph::new(lines)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary))
                .title(title)
                .title_style(Style::default().fg(theme.highlight)),
        );
    frame.render_widget(prompt, chunks[0]);

    if let WidgetState::FreeText { text } = widget {
        let input = Paragraph::new(text.clone())
            .style(Style::default().fg(theme.text))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.muted))
                    .title(" Your answer ")
                    .title_style(Style::default().fg(theme.secondary)),
            );
        frame.render_widget(input, chunks[1]);
        if screen.prompt().is_none() {
            let typed = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
            let cursor_x = chunks[1]
                .x
                .saturating_add(1)
                .saturating_add(typed)
                .min(chunks[1].right().saturating_sub(2));
            frame.set_cursor_position((cursor_x, chunks[1].y + 1));
        }
        return;
    }

    let items: Vec<ListItem> = question
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let marked = is_marked(widget, option);
            let marker = match (question.kind(), marked) {
                (InputKind::CheckboxGroup, true) => "[✓]",
                (InputKind::CheckboxGroup, false) => "[ ]",
                (InputKind::RadioGroup, true) => "(•)",
                (InputKind::RadioGroup, false) => "( )",
                (_, true) => "▣",
                (_, false) => "□",
            };
            let style = if i == screen.cursor() {
                Style::default().fg(theme.highlight).bold()
            } else if marked {
                Style::default().fg(theme.secondary)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(format!("  {marker} {option}")).style(style)
        })
        .collect();

    let title = match question.kind() {
        InputKind::CheckboxGroup => " Select all that apply ",
        _ => " Select one ",
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.muted))
                .title(title)
                .title_style(Style::default().fg(theme.secondary)),
        )
        .highlight_symbol("► ");

    let mut list_state = ListState::default();
    list_state.select(Some(screen.cursor()));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn is_marked(widget: &WidgetState, option: &str) -> bool {
    match widget {
        WidgetState::SingleChoice { selected } | WidgetState::Radio { checked: selected } => {
            selected.as_deref() == Some(option)
        }
        WidgetState::Checkboxes { checked } => checked.iter().any(|t| t == option),
        WidgetState::FreeText { .. } => false,
    }
}

fn draw_help(
    frame: &mut Frame,
    screen: &Screen,
    question: &Question,
    controls: &NavControls,
    area: Rect,
) {
    let theme = screen.theme();
    let mut hints: Vec<&str> = Vec::new();
    if question.kind() != InputKind::FreeText {
        hints.push("↑/↓: Move");
        hints.push("Space: Choose");
    }
    if controls.previous_enabled {
        hints.push("←: Previous");
    }
    if controls.show_next {
        hints.push("→/Enter: Next");
    }
    if controls.show_submit {
        hints.push(if controls.submit_enabled {
            "Enter: Submit"
        } else {
            "Submitting..."
        });
    }
    hints.push("Esc: Quit");

    let help = Paragraph::new(hints.join("  "))
        .style(Style::default().fg(theme.muted))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.muted)),
        );
    frame.render_widget(help, area);
}

fn draw_toasts(frame: &mut Frame, screen: &Screen, area: Rect) {
    if area.height == 0 {
        return;
    }
    let theme = screen.theme();
    let skip = screen.toasts().len().saturating_sub(area.height as usize);
    let lines: Vec<Line> = screen
        .toasts()
        .iter()
        .skip(skip)
        .map(|toast| {
            Line::from(toast.notice.message.clone()).fg(theme.notice(toast.notice.level))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_leaving(frame: &mut Frame, screen: &Screen, location: &str, area: Rect) {
    let theme = screen.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.success))
        .title(" Done ")
        .title_style(Style::default().fg(theme.success).bold());
    let text = format!("All set for today.\n\nResults: {location}");
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_prompt(frame: &mut Frame, screen: &Screen, prompt: &str, area: Rect) {
    let theme = screen.theme();
    let width = area.width.saturating_sub(4).min(60);
    let height = 6.min(area.height);
    let modal = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(" Confirm ")
        .title_style(Style::default().fg(theme.highlight).bold());
    let text = vec![
        Line::from(prompt.to_string()),
        Line::from(""),
        Line::from("y: Yes   n: No").fg(theme.muted),
    ];
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(Clear, modal);
    frame.render_widget(paragraph, modal);
}
