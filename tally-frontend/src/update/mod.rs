use crate::{
    action::Action,
    event::{Envelope, Message},
    model::Model,
    service::AuthProvider,
    task::Task,
};

pub mod acknowledged;
mod commandline;
pub mod save;
pub mod search;

#[tracing::instrument(skip(model, auth))]
pub fn update(model: &mut Model, envelope: &Envelope, auth: &dyn AuthProvider) -> Vec<Action> {
    envelope
        .messages
        .iter()
        .flat_map(|message| update_with_message(model, message, auth))
        .collect()
}

#[tracing::instrument(skip(model, auth))]
pub fn update_with_message(
    model: &mut Model,
    message: &Message,
    auth: &dyn AuthProvider,
) -> Vec<Action> {
    match message {
        Message::DeleteChar => {
            commandline::delete(model);
            Vec::new()
        }
        Message::DismissResult => {
            search::dismiss(model);
            Vec::new()
        }
        Message::Error(error) => {
            model.status = Some(error.to_owned());
            Vec::new()
        }
        Message::Insert(c) => {
            commandline::insert(model, *c);
            Vec::new()
        }
        Message::Quit => vec![Action::Quit],
        Message::Rerender => Vec::new(),
        Message::ResetAcknowledged => acknowledged::reset(&mut model.view),
        Message::SaveFinished(region_id, result) => {
            save::finished(model, region_id, result.clone())
        }
        Message::SearchFinished(generation, result) => {
            search::finished(model, *generation, result.clone())
        }
        Message::SubmitSave => match save::submit(model, auth) {
            Ok(request) => vec![Action::Task(Task::Persist(request))],
            Err(error) => {
                tracing::debug!("save not submitted: {}", error);
                Vec::new()
            }
        },
        Message::SubmitSearch => {
            let text = model.view.search_text.clone();
            match search::submit(model, &text) {
                Ok(request) => vec![Action::Task(Task::Search(request))],
                Err(error) => {
                    tracing::debug!("search not submitted: {}", error);
                    Vec::new()
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        error::SearchError,
        event::MessageSource,
        model::region::RegionStatistics,
        service::Token,
    };

    use super::*;

    struct Anonymous;

    impl AuthProvider for Anonymous {
        fn is_authenticated(&self) -> bool {
            false
        }

        fn token(&self) -> Option<Token> {
            None
        }
    }

    fn user(messages: Vec<Message>) -> Envelope {
        Envelope {
            messages,
            source: MessageSource::User,
        }
    }

    #[test]
    fn typed_search_issues_lookup_task() {
        let mut model = Model::default();
        let envelope = user("New York"
            .chars()
            .map(Message::Insert)
            .chain([Message::SubmitSearch])
            .collect());

        let actions = update(&mut model, &envelope, &Anonymous);

        assert_eq!(
            vec![Action::Task(Task::Search(search::SearchRequest {
                generation: 1,
                region_name: "new york".to_string(),
            }))],
            actions
        );
        assert_eq!("New York", model.view.search_text);
    }

    #[test]
    fn empty_search_issues_nothing() {
        let mut model = Model::default();

        let actions = update(&mut model, &user(vec![Message::SubmitSearch]), &Anonymous);

        assert!(actions.is_empty());
        assert_eq!(0, model.requests.search_generation);
    }

    #[test]
    fn anonymous_save_issues_nothing() {
        let mut model = Model::default();
        model.view.last_result = Some(RegionStatistics {
            confirmed_total: 1,
            deaths_total: 1,
            new_confirmed: 1,
            new_deaths: 1,
            last_updated: "x".to_string(),
            region_name: "ohio".to_string(),
            region_id: "ohio".to_string(),
        });
        model.view.pending_region_id = Some("ohio".to_string());
        model.view.acknowledged.insert("ohio");
        let before = model.view.clone();

        let actions = update(&mut model, &user(vec![Message::SubmitSave]), &Anonymous);

        assert!(actions.is_empty());
        assert_eq!(before, model.view);
        assert!(!model.view.save_enabled(&Anonymous));
    }

    #[test]
    fn failed_search_reports_status() {
        let mut model = Model::default();
        model.view.search_text = "atlantis".to_string();
        update(&mut model, &user(vec![Message::SubmitSearch]), &Anonymous);

        let envelope = Envelope {
            messages: vec![Message::SearchFinished(
                1,
                Err(SearchError::UpstreamFailure("HTTP 404".to_string())),
            )],
            source: MessageSource::Task,
        };
        update(&mut model, &envelope, &Anonymous);

        assert_eq!("atlantis", model.view.search_text);
        assert!(model.status.unwrap().contains("HTTP 404"));
    }

    #[test]
    fn quit_message_returns_quit_action() {
        let mut model = Model::default();
        assert_eq!(
            vec![Action::Quit],
            update(&mut model, &user(vec![Message::Quit]), &Anonymous)
        );
    }
}
