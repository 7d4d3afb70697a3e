use crate::{
    action::Action,
    error::SaveError,
    model::{region::RegionStatistics, Model},
    service::{AuthProvider, Token},
};

use super::acknowledged;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaveRequest {
    pub record: RegionStatistics,
    pub token: Token,
}

/// Checks every precondition of a save and marks it as running.
pub fn submit(model: &mut Model, auth: &dyn AuthProvider) -> Result<SaveRequest, SaveError> {
    let view = &model.view;
    let record = match &view.last_result {
        Some(it) => it,
        None => return Err(SaveError::NothingToSave),
    };

    let token = match auth.token() {
        Some(token) if auth.is_authenticated() => token,
        _ => {
            tracing::trace!("skipping save without authentication");
            return Err(SaveError::NotAuthenticated);
        }
    };

    if model.requests.saving.is_some() {
        tracing::warn!("skipping save while another save is running");
        return Err(SaveError::InFlight);
    }

    let pending = match &view.pending_region_id {
        Some(it) => it,
        None if view.acknowledged.contains(&record.region_id) => {
            return Err(SaveError::AlreadySaved);
        }
        None => {
            return Err(inconsistent(format!(
                "no pending region for {}",
                record.region_id
            )));
        }
    };

    if pending != &record.region_id {
        return Err(inconsistent(format!(
            "pending region {} does not match displayed {}",
            pending, record.region_id
        )));
    }

    if !view.acknowledged.contains(pending) {
        return Err(inconsistent(format!(
            "pending region {} is not acknowledged",
            pending
        )));
    }

    let request = SaveRequest {
        record: record.clone(),
        token,
    };
    model.requests.saving = Some(pending.clone());

    Ok(request)
}

pub fn finished(
    model: &mut Model,
    region_id: &str,
    result: Result<(), SaveError>,
) -> Vec<Action> {
    if model.requests.saving.as_deref() == Some(region_id) {
        model.requests.saving = None;
    }

    if let Err(error) = result {
        tracing::error!("saving region {} failed: {:?}", region_id, error);
        model.status = Some(error.to_string());
        return Vec::new();
    }

    tracing::info!("region {} saved", region_id);

    let view = &mut model.view;
    if view.pending_region_id.as_deref() == Some(region_id) {
        view.pending_region_id = None;
    }
    model.status = None;

    acknowledged::add(view, region_id)
}

fn inconsistent(reason: String) -> SaveError {
    tracing::error!("save rejected: {}", reason);
    SaveError::Inconsistent(reason)
}

#[cfg(test)]
mod test {
    use crate::{
        model::Phase,
        update::search,
    };

    use super::*;

    struct StaticAuth(Option<&'static str>);

    impl AuthProvider for StaticAuth {
        fn is_authenticated(&self) -> bool {
            self.0.is_some()
        }

        fn token(&self) -> Option<Token> {
            self.0.map(Token::new)
        }
    }

    fn displaying() -> Model {
        let mut model = Model::default();
        let request = search::submit(&mut model, "new york").unwrap();
        search::finished(
            &mut model,
            request.generation,
            Ok(RegionStatistics {
                confirmed_total: 100,
                deaths_total: 5,
                new_confirmed: 2,
                new_deaths: 0,
                last_updated: "2020-05-01".to_string(),
                region_name: "new york".to_string(),
                region_id: "new-york".to_string(),
            }),
        );
        model
    }

    #[test]
    fn submit_without_result_is_noop() {
        let mut model = Model::default();
        let before = model.view.clone();

        assert_eq!(
            Err(SaveError::NothingToSave),
            submit(&mut model, &StaticAuth(Some("t")))
        );
        assert_eq!(before, model.view);
    }

    #[test]
    fn submit_without_authentication_is_noop() {
        let mut model = displaying();
        let before = model.view.clone();

        assert_eq!(
            Err(SaveError::NotAuthenticated),
            submit(&mut model, &StaticAuth(None))
        );
        assert_eq!(before, model.view);
    }

    #[test]
    fn submit_marks_save_running() {
        let mut model = displaying();

        let request = submit(&mut model, &StaticAuth(Some("t"))).unwrap();

        assert_eq!("new-york", request.record.region_id);
        assert_eq!("t", request.token.as_str());
        assert_eq!(Phase::Saving, model.phase());
        assert_eq!(
            Err(SaveError::InFlight),
            submit(&mut model, &StaticAuth(Some("t")))
        );
    }

    #[test]
    fn submit_rejects_unacknowledged_pending() {
        let mut model = displaying();
        model.view.acknowledged.entries.clear();

        assert!(matches!(
            submit(&mut model, &StaticAuth(Some("t"))),
            Err(SaveError::Inconsistent(_))
        ));
        assert!(model.requests.saving.is_none());
    }

    #[test]
    fn finished_success_clears_pending_idempotently() {
        let mut model = displaying();
        submit(&mut model, &StaticAuth(Some("t"))).unwrap();
        let size = model.view.acknowledged.len();

        let actions = finished(&mut model, "new-york", Ok(()));

        assert!(actions.is_empty());
        assert!(model.view.pending_region_id.is_none());
        assert_eq!(size, model.view.acknowledged.len());
        assert_eq!(Phase::Saved, model.phase());
        assert_eq!(
            Err(SaveError::AlreadySaved),
            submit(&mut model, &StaticAuth(Some("t")))
        );
    }

    #[test]
    fn finished_failure_keeps_pending_for_retry() {
        let mut model = displaying();
        submit(&mut model, &StaticAuth(Some("t"))).unwrap();

        let actions = finished(
            &mut model,
            "new-york",
            Err(SaveError::PersistFailure("500".to_string())),
        );

        assert!(actions.is_empty());
        assert_eq!(Some("new-york"), model.view.pending_region_id.as_deref());
        assert_eq!(Phase::Displaying, model.phase());
        assert!(submit(&mut model, &StaticAuth(Some("t"))).is_ok());
    }

    #[test]
    fn finished_after_new_search_keeps_new_pending() {
        let mut model = displaying();
        submit(&mut model, &StaticAuth(Some("t"))).unwrap();

        model.view.pending_region_id = Some("ohio".to_string());
        finished(&mut model, "new-york", Ok(()));

        assert_eq!(Some("ohio"), model.view.pending_region_id.as_deref());
        assert!(model.requests.saving.is_none());
    }
}
