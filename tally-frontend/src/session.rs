//! Headless driver over the same update functions the terminal ui uses.
//!
//! Every operation awaits its service call inline, so there is exactly one
//! operation in flight at a time. Failures are logged, handed to the optional
//! error hook and returned, they never leave the view state half updated.

use std::sync::Arc;

use crate::{
    action::Action,
    error::{AppError, SaveError, SearchError},
    model::{region::RegionStatistics, Model, Phase, ViewState},
    service::{AuthProvider, Services},
    task::Task,
    update::{acknowledged, save, search},
};

pub type ErrorHook = Box<dyn Fn(&AppError) + Send + Sync>;

pub struct Session {
    auth: Arc<dyn AuthProvider>,
    model: Model,
    on_error: Option<ErrorHook>,
    services: Services,
}

impl Session {
    /// Starts a session with the acknowledged regions hydrated from storage.
    pub fn start(
        services: Services,
        auth: Arc<dyn AuthProvider>,
        on_error: Option<ErrorHook>,
    ) -> Self {
        let mut session = Self {
            auth,
            model: Model::default(),
            on_error,
            services,
        };

        match session.services.storage.load() {
            Ok(acknowledged) => session.model.view.acknowledged = acknowledged,
            Err(error) => session.report(error),
        }

        tracing::debug!("session started with view state: {:?}", session.model.view);

        session
    }

    pub fn view(&self) -> &ViewState {
        &self.model.view
    }

    pub fn phase(&self) -> Phase {
        self.model.phase()
    }

    pub fn save_enabled(&self) -> bool {
        self.model.view.save_enabled(self.auth.as_ref())
    }

    pub async fn submit_search(&mut self, raw_input: &str) -> Result<RegionStatistics, SearchError> {
        let request = search::submit(&mut self.model, raw_input)?;
        let result = self.services.lookup.lookup(&request.region_name).await;

        let actions = search::finished(&mut self.model, request.generation, result.clone());
        self.execute(actions);

        if let Err(error) = &result {
            self.report(AppError::Search(error.clone()));
        }

        result
    }

    pub async fn submit_save(&mut self) -> Result<(), SaveError> {
        let request = save::submit(&mut self.model, self.auth.as_ref())?;
        let result = self
            .services
            .persistence
            .persist(&request.record, &request.token)
            .await;

        let actions = save::finished(&mut self.model, &request.record.region_id, result.clone());
        self.execute(actions);

        if let Err(error) = &result {
            self.report(AppError::Save(error.clone()));
        }

        result
    }

    pub fn dismiss(&mut self) {
        search::dismiss(&mut self.model);
    }

    pub fn reset_acknowledged(&mut self) {
        let actions = acknowledged::reset(&mut self.model.view);
        self.execute(actions);
    }

    /// Final flush of the acknowledged set.
    pub fn finish(self) -> ViewState {
        let action = acknowledged::flush(&self.model.view);
        self.execute(vec![action]);

        self.model.view
    }

    fn execute(&self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Task(Task::SaveAcknowledged(acknowledged)) => {
                    if let Err(error) = self.services.storage.save(&acknowledged) {
                        self.report(error);
                    }
                }
                action => tracing::warn!("session skips unsupported action: {:?}", action),
            }
        }
    }

    fn report(&self, error: AppError) {
        tracing::error!("session operation failed: {:?}", error);

        if let Some(hook) = &self.on_error {
            hook(&error);
        }
    }
}
