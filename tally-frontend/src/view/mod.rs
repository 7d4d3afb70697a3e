use ratatui::Frame;

use crate::{
    error::AppError, layout::AppLayout, model::Model, service::AuthProvider,
    terminal::TerminalWrapper,
};

mod card;
mod commandline;
mod statusline;

pub fn render_model(
    terminal: &mut TerminalWrapper,
    model: &Model,
    auth: &dyn AuthProvider,
) -> Result<(), AppError> {
    terminal.draw(|frame| view(model, auth, frame))
}

pub fn view(model: &Model, auth: &dyn AuthProvider, frame: &mut Frame) {
    let layout = AppLayout::new(frame.area());

    commandline::view(model, frame, layout.commandline);
    card::view(model, frame, layout.result);
    statusline::view(model, auth, frame, layout.statusline);
}
