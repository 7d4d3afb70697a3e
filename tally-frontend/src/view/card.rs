use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{region::RegionStatistics, Model};

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let paragraph = match model.view.last_result() {
        Some(record) => Paragraph::new(lines(record)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", record.region_name)),
        ),
        None => Paragraph::new(Line::from(Span::styled(
            "* This application is intended for US states only",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))),
    };

    frame.render_widget(paragraph, rect);
}

fn lines(record: &RegionStatistics) -> Vec<Line<'_>> {
    vec![
        row("Confirmed", record.confirmed_total.to_string()),
        row("Deaths", record.deaths_total.to_string()),
        row("New confirmed", record.new_confirmed.to_string()),
        row("New deaths", record.new_deaths.to_string()),
        row("Last update", record.last_updated.clone()),
    ]
}

fn row(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<15}", label),
            Style::default().fg(Color::Gray),
        ),
        Span::raw(value),
    ])
}
