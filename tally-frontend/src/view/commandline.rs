use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::Model;

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Search for your state ");

    let text = model.view.search_text.as_str();
    frame.render_widget(Paragraph::new(text).block(block), rect);

    let offset = text.chars().count() as u16;
    let x = (rect.x + 1 + offset).min(rect.right().saturating_sub(2));
    frame.set_cursor_position((x, rect.y + 1));
}
