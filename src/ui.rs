use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::App;
use crate::render::response_lines;

pub const TITLE: &str = "AI Mental Coach";
pub const SUBTITLE: &str =
    "A supportive mental coach to help with stress, motivation, habits, and confidence";
pub const PLACEHOLDER: &str = "Share what's on your mind...";

/// Visible rows inside the message box.
const TEXTAREA_ROWS: u16 = 4;
const MAX_WIDTH: u16 = 100;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Keep the page readable on wide terminals
    let [_, page, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Max(MAX_WIDTH),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [header_area, input_area, button_area, outcome_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(TEXTAREA_ROWS + 2),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(page);

    // Inner size of the response box, for scroll limits
    app.response_width = outcome_area.width.saturating_sub(2);
    app.response_height = outcome_area.height.saturating_sub(2);
    app.response_scroll = app.response_scroll.min(app.max_response_scroll());

    render_header(frame, header_area);
    render_textarea(app, frame, input_area);
    render_button(app, frame, button_area);
    render_outcome(app, frame, outcome_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Text::from(vec![
        Line::from(Span::styled(TITLE, Style::default().fg(Color::Cyan).bold())),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::DarkGray))),
    ]);

    let paragraph = Paragraph::new(header)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_textarea(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.loading { Color::DarkGray } else { Color::Yellow };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message ");

    let inner_width = area.width.saturating_sub(2) as usize;
    let (row, col) = app.cursor_position();

    // Scroll so the cursor stays inside the box
    let v_scroll = row.saturating_sub(TEXTAREA_ROWS as usize - 1);
    let h_scroll = if inner_width == 0 || col < inner_width {
        0
    } else {
        col - inner_width + 1
    };

    let text = if app.draft.is_empty() {
        Text::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        let style = if app.loading {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Text::from(
            app.draft
                .split('\n')
                .map(|line| Line::from(Span::styled(line.to_string(), style)))
                .collect::<Vec<_>>(),
        )
    };

    let textarea = Paragraph::new(text)
        .block(block)
        .scroll((v_scroll as u16, h_scroll as u16));
    frame.render_widget(textarea, area);

    if !app.loading {
        frame.set_cursor_position((
            area.x + 1 + (col - h_scroll) as u16,
            area.y + 1 + (row - v_scroll) as u16,
        ));
    }
}

fn render_button(app: &App, frame: &mut Frame, area: Rect) {
    let style = if app.can_submit() {
        Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let width = (app.button_label().chars().count() as u16 + 6).min(area.width);
    let [_, button, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(area);

    let paragraph = Paragraph::new(app.button_label())
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(paragraph, button);
}

/// Error and response share one slot; at most one of them is ever set.
fn render_outcome(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(error) = &app.error {
        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled("Error: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(error.as_str()),
        ]))
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    } else if let Some(response) = app.visible_response() {
        let lines: Vec<Line> = response_lines(response)
            .into_iter()
            .map(Line::from)
            .collect();

        let paragraph = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .title(Span::styled(
                        " Response: ",
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    )),
            )
            .wrap(Wrap { trim: false })
            .scroll((app.response_scroll, 0));
        frame.render_widget(paragraph, area);
    } else if app.loading {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        let paragraph = Paragraph::new(Span::styled(
            format!("Waiting for your coach{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = if app.loading {
        " Sending... | PgUp/PgDn scroll | Esc quit "
    } else {
        " Enter send | Alt+Enter newline | Ctrl+U clear | PgUp/PgDn scroll | Esc quit "
    };

    let footer = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
