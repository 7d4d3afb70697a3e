use std::sync::Arc;

use action::Action;
use error::AppError;
use event::{Emitter, Message};
use model::Model;
use service::{AuthProvider, SessionToken};
use settings::Settings;
use task::Task;
use terminal::TerminalWrapper;
use update::{acknowledged, update};
use view::render_model;

mod action;
pub mod error;
mod event;
mod init;
mod layout;
pub mod model;
pub mod service;
pub mod session;
pub mod settings;
mod task;
mod terminal;
mod update;
mod view;

pub use init::acknowledged::{CsvStorage, MemoryStorage};

pub async fn run(settings: Settings) -> Result<(), AppError> {
    let services = service::Services::from_settings(&settings)?;
    let auth: Arc<dyn AuthProvider> = Arc::new(SessionToken::new(settings.token.clone()));

    let mut terminal = TerminalWrapper::start()?;
    let mut emitter = Emitter::start(services.clone());
    let mut model = Model::default();

    match services.storage.load() {
        Ok(loaded) => model.view.acknowledged = loaded,
        Err(error) => {
            tracing::error!("loading acknowledged regions failed: {:?}", error);
            emitter.run(Task::EmitMessages(vec![Message::Error(
                "Failed to load acknowledged regions".to_string(),
            )]));
        }
    }

    if settings.reset_acknowledged {
        execute(&mut emitter, acknowledged::reset(&mut model.view));
    }

    tracing::debug!("starting with model state: {:?}", model);

    let mut result = Vec::new();
    if let Err(error) = render_model(&mut terminal, &model, auth.as_ref()) {
        result.push(error);
    }

    while result.is_empty() {
        let envelope = match emitter.receiver.recv().await {
            Some(it) => it,
            None => break,
        };

        tracing::debug!("received messages: {:?}", envelope.messages);

        let actions = update(&mut model, &envelope, auth.as_ref());
        let quit = execute(&mut emitter, actions);

        if let Err(error) = render_model(&mut terminal, &model, auth.as_ref()) {
            result.push(error);
            break;
        }

        if quit {
            break;
        }
    }

    if let Err(error) = terminal.shutdown() {
        result.push(error);
    }

    emitter.run(Task::SaveAcknowledged(model.view.acknowledged.clone()));
    if let Err(error) = emitter.shutdown().await {
        result.push(error);
    }

    if result.is_empty() {
        Ok(())
    } else {
        Err(AppError::Aggregate(result))
    }
}

fn execute(emitter: &mut Emitter, actions: Vec<Action>) -> bool {
    let mut quit = false;
    for action in actions {
        match action {
            Action::Quit => quit = true,
            Action::Task(task) => emitter.run(task),
        }
    }
    quit
}
