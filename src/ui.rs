use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, Screen};
use crate::persona::{Persona, PersonaColor};

fn theme_color(color: PersonaColor) -> Color {
    match color {
        PersonaColor::Cyan => Color::Cyan,
        PersonaColor::Purple => Color::Magenta,
        PersonaColor::Rose => Color::LightRed,
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    match app.screen {
        Screen::Select => render_select(app, frame),
        Screen::Chat => render_chat(app, frame),
    }
}

// Selection screen

fn render_select(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_branding(app, frame, header_area);

    let items: Vec<ListItem> = Persona::all().iter().map(persona_card).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Personas ")
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▌ ");

    frame.render_stateful_widget(list, body_area, &mut app.catalog_state);

    let help = Line::from(vec![
        Span::styled(" j/k", Style::default().fg(Color::Yellow)),
        Span::raw(" select  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" start conversation  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(Paragraph::new(help).dim(), footer_area);
}

fn render_branding(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled("✦ ", Style::default().fg(Color::Cyan)),
        Span::styled(
            app.config.product_name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    let tagline = Line::from(Span::styled(
        app.config.tagline().to_string(),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(Text::from(vec![title, tagline]))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

/// One persona rendered as a card: monogram, name, title, description and
/// expertise badges. The monogram stands in for the remote avatar image,
/// which a terminal cannot show.
fn persona_card(persona: &Persona) -> ListItem<'static> {
    let color = theme_color(persona.color);

    let name_line = Line::from(vec![
        Span::styled(
            format!("({}) ", persona.monogram()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            persona.name.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]);

    let title_line = Line::from(Span::styled(
        format!("    {}", persona.title),
        Style::default().fg(Color::Gray),
    ));

    let badges: Vec<Span> = persona
        .expertise
        .iter()
        .flat_map(|skill| {
            [
                Span::styled(format!("[{skill}]"), Style::default().fg(color).dim()),
                Span::raw(" "),
            ]
        })
        .collect();
    let mut badge_spans = vec![Span::raw("    ")];
    badge_spans.extend(badges);

    ListItem::new(Text::from(vec![
        name_line,
        title_line,
        Line::from(badge_spans),
        Line::default(),
    ]))
}

// Conversation screen

fn render_chat(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, chat_area, status_area, input_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(area);

    let Some(persona) = app.session.as_ref().map(|s| s.persona) else {
        return;
    };
    let color = theme_color(persona.color);

    render_chat_header(app, frame, header_area, color);
    render_transcript(app, frame, chat_area, color);
    render_status_line(app, frame, status_area);
    render_input(app, frame, input_area, color);
}

fn render_chat_header(app: &App, frame: &mut Frame, area: Rect, color: Color) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let persona = session.persona;

    let mut spans = vec![
        Span::styled(
            format!("({}) ", persona.monogram()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            persona.name.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(persona.title.to_string(), Style::default().fg(Color::Gray)),
    ];
    if session.now_playing().is_some() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("♪ playing", Style::default().fg(Color::Green)));
    }

    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect, color: Color) {
    let block = Block::default().borders(Borders::LEFT | Borders::RIGHT);
    let inner = block.inner(area);

    // Remember geometry for scroll-to-bottom calculations
    app.chat_height = inner.height;
    app.chat_width = inner.width;

    let mut lines: Vec<Line> = Vec::new();

    let Some(session) = app.session.as_ref() else {
        return;
    };

    if session.transcript().is_empty() && !session.is_pending() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Start a conversation with {}", session.persona.name),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Type your question below and receive a personalized voice response.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (idx, message) in session.transcript().iter().enumerate() {
        let selected = app.selected_message_idx == Some(idx);
        let marker = if selected { "▶ " } else { "" };

        let speaker = if message.is_user {
            Span::styled(
                format!("{marker}You"),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                format!("{marker}{}", session.persona.name),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        };
        lines.push(Line::from(speaker));

        for text_line in message.text.lines() {
            lines.push(Line::from(Span::raw(text_line.to_string())));
        }

        if message.has_audio() {
            let hint = if session.now_playing() == Some(message.id.as_str()) {
                Span::styled("♪ Playing...", Style::default().fg(Color::Green))
            } else {
                Span::styled("♪ Replay voice (select + p)", Style::default().fg(color).dim())
            };
            lines.push(Line::from(hint));
        }

        lines.push(Line::default());
    }

    if session.is_pending() {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("{} is thinking{dots}", session.persona.name),
            Style::default().fg(color).add_modifier(Modifier::ITALIC),
        )));
    }

    let total_lines = lines.len() as u16;
    let max_scroll = total_lines.saturating_sub(inner.height);
    if app.chat_scroll > max_scroll {
        app.chat_scroll = max_scroll;
    }

    let transcript = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(transcript, area);
}

fn render_status_line(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(notice) = &app.notice {
        let line = Line::from(Span::styled(
            format!(" {}", notice.text),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let help = match app.input_mode {
        InputMode::Editing => Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" send  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" browse transcript"),
        ]),
        InputMode::Normal => Line::from(vec![
            Span::styled(" i", Style::default().fg(Color::Yellow)),
            Span::raw(" type  "),
            Span::styled("j/k", Style::default().fg(Color::Yellow)),
            Span::raw(" messages  "),
            Span::styled("p", Style::default().fg(Color::Yellow)),
            Span::raw(" replay  "),
            Span::styled("s", Style::default().fg(Color::Yellow)),
            Span::raw(" stop  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" back"),
        ]),
    };
    frame.render_widget(Paragraph::new(help).dim(), area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect, color: Color) {
    let Some(session) = app.session.as_ref() else {
        return;
    };

    let (border_style, placeholder) = if session.is_pending() {
        (
            Style::default().fg(Color::DarkGray),
            "Waiting for the voice response...".to_string(),
        )
    } else if app.input_mode == InputMode::Editing {
        (
            Style::default().fg(color),
            format!("Ask {} anything...", session.persona.name),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            format!("Ask {} anything...", session.persona.name),
        )
    };

    let content = if app.input.is_empty() {
        Line::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(Span::raw(app.input.clone()))
    };

    let input = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);

    if app.input_mode == InputMode::Editing && !session.is_pending() {
        let x = area.x + 1 + app.cursor.min(area.width.saturating_sub(2) as usize) as u16;
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}
