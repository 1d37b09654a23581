use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use crate::app::App;
use crate::state::{Message, Role};

const ACCENT: Color = Color::Magenta;
const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub const EMPTY_PLACEHOLDER: &str = "Ask A Question Ayan AI";
pub const INPUT_PLACEHOLDER: &str = "How Can Ayan AI Help...?";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" AYAN ai ", Style::default().fg(ACCENT).bold()),
        Span::styled(app.client.model().to_string(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

fn message_lines(msg: &Message) -> Vec<Line<'static>> {
    let (label, label_style, body_style, alignment) = match msg.role {
        Role::User => (
            "You",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White),
            Alignment::Right,
        ),
        Role::Assistant => (
            "Ayan",
            Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Gray),
            Alignment::Left,
        ),
    };

    let mut lines = vec![Line::from(Span::styled(label, label_style)).alignment(alignment)];

    // Content is shown verbatim, one line per source line
    for line in msg.content.split('\n') {
        lines.push(Line::from(Span::styled(line.to_string(), body_style)).alignment(alignment));
    }

    lines.push(
        Line::from(Span::styled(
            msg.timestamp.clone(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        ))
        .alignment(alignment),
    );
    lines.push(Line::default());
    lines
}

fn loading_lines(frame_idx: u8) -> Vec<Line<'static>> {
    let spinner = SPINNER_FRAMES[frame_idx as usize % SPINNER_FRAMES.len()];
    vec![
        Line::from(Span::styled(
            "Ayan",
            Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(spinner, Style::default().fg(ACCENT))),
    ]
}

/// Build every line of the transcript view, including the loading indicator.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = app
        .session
        .transcript()
        .iter()
        .flat_map(message_lines)
        .collect();

    if app.is_awaiting_response() {
        lines.extend(loading_lines(app.animation_frame));
    }

    lines
}

/// Rows the transcript occupies when word-wrapped to `width` columns, using
/// the same wrapper the paragraph renders with.
fn rendered_height(chat: &Paragraph, width: u16) -> u16 {
    chat.line_count(width.max(1)).min(u16::MAX as usize) as u16
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing and dimensions for scroll calculations
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    if app.session.transcript().is_empty() && !app.is_awaiting_response() {
        app.chat_scroll = 0;
        let top_padding = app.chat_height.saturating_sub(1) / 2;
        let mut lines: Vec<Line> = vec![Line::default(); top_padding as usize];
        lines.push(Line::from(Span::styled(
            EMPTY_PLACEHOLDER,
            Style::default().fg(Color::LightMagenta),
        )));
        let placeholder = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    // Measured without the block so borders are not counted
    let chat = Paragraph::new(Text::from(transcript_lines(app))).wrap(Wrap { trim: false });
    let total = rendered_height(&chat, app.chat_width);
    let max_scroll = total.saturating_sub(app.chat_height);

    if app.follow_tail || app.chat_scroll >= max_scroll {
        app.chat_scroll = max_scroll;
        app.follow_tail = true;
    }

    let chat = chat.block(block).scroll((app.chat_scroll, 0));
    frame.render_widget(chat, area);

    if max_scroll > 0 {
        let mut scrollbar_state = ScrollbarState::new(max_scroll as usize)
            .position(app.chat_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let awaiting = app.is_awaiting_response();
    let (title, border_color) = if awaiting {
        (" waiting for reply... ", Color::DarkGray)
    } else {
        (" Enter to send ", ACCENT)
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.session.cursor();

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input = if app.session.pending_input().is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else {
        let visible_text: String = app
            .session
            .pending_input()
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::White))
    };

    frame.render_widget(input.block(input_block), area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let count = app.session.transcript().len();
    let footer = Line::from(vec![
        Span::styled(" CHAT ", Style::default().bg(ACCENT).fg(Color::Black)),
        Span::styled(
            format!(" {count} messages "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            " PgUp/PgDn scroll  Esc quit ",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}
