use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc::{self, Sender, UnboundedSender},
    task::{AbortHandle, JoinSet},
    time::Instant,
};

use crate::{
    error::AppError,
    event::{Envelope, Message, MessageSource},
    model::acknowledged::Acknowledged,
    service::{AcknowledgedStorage, Services},
    update::{save::SaveRequest, search::SearchRequest},
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Task {
    EmitMessages(Vec<Message>),
    Persist(SaveRequest),
    SaveAcknowledged(Acknowledged),
    Search(SearchRequest),
}

pub struct TaskManager {
    abort_handles: Vec<(Task, AbortHandle)>,
    flushes: Option<UnboundedSender<Acknowledged>>,
    sender: Sender<Envelope>,
    services: Services,
    shutdown_grace: Duration,
    tasks: JoinSet<Result<(), AppError>>,
}

impl TaskManager {
    pub fn new(sender: Sender<Envelope>, services: Services) -> Self {
        let mut tasks = JoinSet::new();

        // NOTE: flushes are written by a single writer so an older snapshot can
        // never overwrite a newer one
        let (flushes, mut flush_receiver) = mpsc::unbounded_channel::<Acknowledged>();
        let storage = services.storage.clone();
        let error_sender = sender.clone();
        tasks.spawn(async move {
            while let Some(mut latest) = flush_receiver.recv().await {
                while let Ok(next) = flush_receiver.try_recv() {
                    latest = next;
                }

                if let Err(error) = flush(storage.clone(), latest).await {
                    emit_error(&error_sender, error).await;
                }
            }

            tracing::trace!("acknowledged writer finished");

            Ok(())
        });

        Self {
            abort_handles: Vec::new(),
            flushes: Some(flushes),
            sender,
            services,
            shutdown_grace: SHUTDOWN_GRACE,
            tasks,
        }
    }

    pub fn abort(&mut self, task: &Task) {
        if let Some(index) = self.abort_handles.iter().position(|(t, _)| t == task) {
            let (_, abort_handle) = self.abort_handles.remove(index);
            abort_handle.abort();
        }
    }

    pub async fn finishing(&mut self) -> Result<(), AppError> {
        self.flushes = None;

        let mut lingering = Vec::new();
        for (task, abort_handle) in self.abort_handles.drain(..) {
            if should_abort_on_finish(&task) {
                abort_handle.abort();
            } else {
                lingering.push(abort_handle);
            }
        }

        let deadline = Instant::now() + self.shutdown_grace;
        let mut errors = Vec::new();
        loop {
            let joined = if lingering.is_empty() {
                self.tasks.join_next().await
            } else {
                match tokio::time::timeout_at(deadline, self.tasks.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        tracing::warn!("aborting tasks still running after shutdown grace");
                        for abort_handle in lingering.drain(..) {
                            abort_handle.abort();
                        }
                        continue;
                    }
                }
            };

            let task = match joined {
                Some(it) => it,
                None => break,
            };

            match task {
                Ok(Ok(())) => (),
                Ok(Err(error)) => {
                    tracing::error!("task result returned error: {:?}", error);
                    errors.push(error)
                }
                Err(error) if error.is_cancelled() => {
                    tracing::trace!("task cancelled on finish");
                }
                Err(error) => {
                    tracing::error!("task failed: {:?}", error);
                }
            };
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Aggregate(errors))
        }
    }

    pub fn run(&mut self, task: Task) {
        self.abort_handles
            .retain(|(_, abort_handle)| !abort_handle.is_finished());

        tracing::debug!("running task: {:?}", task);

        let abort_handle = match task.clone() {
            Task::EmitMessages(messages) => {
                let sender = self.sender.clone();
                self.tasks.spawn(async move {
                    send(&sender, messages).await;
                    Ok(())
                })
            }
            Task::Persist(request) => {
                let sender = self.sender.clone();
                let persistence = self.services.persistence.clone();
                self.tasks.spawn(async move {
                    let result = persistence.persist(&request.record, &request.token).await;
                    let region_id = request.record.region_id;

                    send(&sender, vec![Message::SaveFinished(region_id, result)]).await;
                    Ok(())
                })
            }
            Task::SaveAcknowledged(acknowledged) => {
                match &self.flushes {
                    Some(flushes) => {
                        if let Err(error) = flushes.send(acknowledged) {
                            tracing::error!("queueing acknowledged flush failed: {:?}", error);
                        }
                    }
                    None => tracing::warn!("acknowledged flush after finishing is skipped"),
                }
                return;
            }
            Task::Search(request) => {
                self.abort_searches();

                let sender = self.sender.clone();
                let lookup = self.services.lookup.clone();
                self.tasks.spawn(async move {
                    let result = lookup.lookup(&request.region_name).await;

                    send(
                        &sender,
                        vec![Message::SearchFinished(request.generation, result)],
                    )
                    .await;
                    Ok(())
                })
            }
        };

        self.abort_handles.push((task, abort_handle));
    }

    fn abort_searches(&mut self) {
        let superseded: Vec<_> = self
            .abort_handles
            .iter()
            .filter(|(task, _)| matches!(task, Task::Search(_)))
            .map(|(task, _)| task.clone())
            .collect();

        for task in superseded {
            tracing::debug!("aborting superseded search: {:?}", task);
            self.abort(&task);
        }
    }
}

fn should_abort_on_finish(task: &Task) -> bool {
    match task {
        Task::EmitMessages(_) | Task::Search(_) => true,
        Task::Persist(_) | Task::SaveAcknowledged(_) => false,
    }
}

pub async fn flush(
    storage: Arc<dyn AcknowledgedStorage>,
    acknowledged: Acknowledged,
) -> Result<(), AppError> {
    match tokio::task::spawn_blocking(move || storage.save(&acknowledged)).await {
        Ok(result) => result,
        Err(error) => {
            tracing::error!("acknowledged flush panicked: {:?}", error);
            Err(AppError::SaveAcknowledgedFailed)
        }
    }
}

async fn send(sender: &Sender<Envelope>, messages: Vec<Message>) {
    if let Err(error) = sender.send(to_envelope(messages)).await {
        tracing::warn!("sending task result failed: {:?}", error);
    }
}

async fn emit_error(sender: &Sender<Envelope>, error: AppError) {
    tracing::error!("task failed: {:?}", error);

    let error = format!("Error: {}", error);
    send(sender, vec![Message::Error(error)]).await;
}

fn to_envelope(messages: Vec<Message>) -> Envelope {
    Envelope {
        messages,
        source: MessageSource::Task,
    }
}
