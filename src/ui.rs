use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::persona;

const BOT_NAME: &str = "Dr. Sarah";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(2),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " MindfulAI ",
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("· "),
        Span::styled(app.client.model().to_string(), Style::default().dim()),
    ];
    if !app.client.has_key() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("no API key", Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Conversation ");
    let inner = block.inner(area);

    // The scroll math in App works off the rendered dimensions
    app.chat_height = inner.height;
    app.chat_width = inner.width;

    let mut lines: Vec<Line> = Vec::new();

    for msg in app.conversation.messages() {
        let (name, name_style) = if msg.is_bot {
            (
                BOT_NAME,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                "You",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
        };
        lines.push(Line::from(vec![
            Span::styled(name, name_style),
            Span::raw("  "),
            Span::styled(msg.timestamp.clone(), Style::default().dim()),
        ]));

        let text_lines: Vec<&str> = if msg.text.is_empty() {
            vec![""]
        } else {
            msg.text.lines().collect()
        };
        let last = text_lines.len().saturating_sub(1);
        for (i, text_line) in text_lines.iter().enumerate() {
            let mut spans = vec![Span::raw(text_line.to_string())];
            if msg.is_typing && i == last {
                spans.push(Span::styled("▎", Style::default().fg(Color::Blue)));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::default());
    }

    if app.loading {
        lines.push(Line::from(Span::styled(
            BOT_NAME,
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )));
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().dim().italic(),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_style = if app.busy() {
        Style::default().fg(Color::DarkGray)
    } else if app.input_mode == InputMode::Editing {
        Style::default().fg(Color::Blue)
    } else {
        Style::default()
    };

    let title = if app.loading {
        " Waiting for reply... "
    } else if app.is_revealing() {
        " Dr. Sarah is typing... "
    } else {
        " Share what's on your mind "
    };

    let paragraph = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(paragraph, area);

    if app.input_mode == InputMode::Editing && !app.busy() {
        let cursor_x = area.x + 1 + app.input_cursor as u16;
        frame.set_cursor_position(Position::new(
            cursor_x.min(area.x + area.width.saturating_sub(2)),
            area.y + 1,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.input_mode {
        InputMode::Editing => "Enter send · Esc browse · Ctrl-C quit",
        InputMode::Normal => "i write · j/k scroll · g/G top/bottom · q quit",
    };
    let lines = vec![
        Line::from(Span::styled(hints, Style::default().dim())),
        Line::from(Span::styled(
            persona::DISCLAIMER,
            Style::default().dim().italic(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
