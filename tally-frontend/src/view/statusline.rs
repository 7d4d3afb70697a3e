use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::{
    model::{Model, Phase},
    service::AuthProvider,
};

pub fn view(model: &Model, auth: &dyn AuthProvider, frame: &mut Frame, rect: Rect) {
    let phase = Line::from(Span::styled(
        phase_label(model.phase()),
        Style::default().fg(Color::Gray),
    ));

    let mut hints = vec![Span::raw(format!(
        "{} acknowledged",
        model.view.acknowledged().len()
    ))];
    if model.view.save_enabled(auth) {
        hints.push(Span::styled("  <C-s> save", Style::default().fg(Color::Green)));
    }
    let hints = Line::from(hints);

    let error = match &model.status {
        Some(status) => Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Red),
        )),
        None => Line::default(),
    };

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(phase.width() as u16 + 3),
            Constraint::Min(error.width() as u16),
            Constraint::Length(hints.width() as u16),
        ])
        .split(rect);

    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Black)),
        rect,
    );

    frame.render_widget(Paragraph::new(phase), layout[0]);
    frame.render_widget(Paragraph::new(error), layout[1]);
    frame.render_widget(Paragraph::new(hints), layout[2]);
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Searching => "searching",
        Phase::Displaying => "displaying",
        Phase::Saving => "saving",
        Phase::Saved => "saved",
    }
}
