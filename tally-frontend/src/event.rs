use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{AppError, SaveError, SearchError},
    model::region::RegionStatistics,
    service::Services,
    task::{Task, TaskManager},
};

#[derive(Debug)]
pub struct Envelope {
    pub messages: Vec<Message>,
    pub source: MessageSource,
}

#[derive(Debug, Eq, PartialEq)]
pub enum MessageSource {
    Task,
    User,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    DeleteChar,
    DismissResult,
    Error(String),
    Insert(char),
    Quit,
    Rerender,
    ResetAcknowledged,
    SaveFinished(String, Result<(), SaveError>),
    SearchFinished(u64, Result<RegionStatistics, SearchError>),
    SubmitSave,
    SubmitSearch,
}

pub struct Emitter {
    cancellation: CancellationToken,
    tasks: TaskManager,
    pub receiver: Receiver<Envelope>,
}

impl Emitter {
    pub fn start(services: Services) -> Self {
        let (sender, receiver) = mpsc::channel(16);
        let tasks = TaskManager::new(sender.clone(), services);

        let cancellation = CancellationToken::new();
        start_crossterm_listener(cancellation.child_token(), sender);

        Self {
            cancellation,
            tasks,
            receiver,
        }
    }

    pub fn run(&mut self, task: Task) {
        self.tasks.run(task);
    }

    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.cancellation.cancel();

        // NOTE: closing first lets tasks still reporting back fail fast instead of
        // waiting on a receiver nobody drains anymore
        self.receiver.close();
        self.tasks.finishing().await
    }
}

fn start_crossterm_listener(cancellation: CancellationToken, sender: Sender<Envelope>) {
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            let event = reader.next().fuse();

            tokio::select! {
                _ = cancellation.cancelled() => break,
                Some(Ok(event)) = event => {
                    if let Some(messages) = handle_crossterm_event(event) {
                        let envelope = Envelope {
                            messages,
                            source: MessageSource::User,
                        };

                        if let Err(error) = sender.send(envelope).await {
                            tracing::error!("sending user input failed: {:?}", error);
                            break;
                        }
                    }
                }
            }
        }

        tracing::debug!("crossterm listener stopped");
    });
}

fn handle_crossterm_event(event: Event) -> Option<Vec<Message>> {
    match event {
        Event::Key(key) => to_message(&key).map(|message| vec![message]),
        Event::Resize(_, _) => Some(vec![Message::Rerender]),
        Event::FocusLost | Event::FocusGained | Event::Paste(_) | Event::Mouse(_) => None,
    }
}

pub fn to_message(event: &KeyEvent) -> Option<Message> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('r') => Some(Message::ResetAcknowledged),
            KeyCode::Char('s') => Some(Message::SubmitSave),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Backspace => Some(Message::DeleteChar),
        KeyCode::Char(c) => Some(Message::Insert(c)),
        KeyCode::Enter => Some(Message::SubmitSearch),
        KeyCode::Esc => Some(Message::DismissResult),
        _ => None,
    }
}
