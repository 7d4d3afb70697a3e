use crate::{
    action::Action,
    error::SearchError,
    model::{region::RegionStatistics, Model},
};

use super::acknowledged;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchRequest {
    pub generation: u64,
    pub region_name: String,
}

pub fn normalize(raw_input: &str) -> Option<String> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Issues a new search. Empty input leaves the model untouched.
pub fn submit(model: &mut Model, raw_input: &str) -> Result<SearchRequest, SearchError> {
    let region_name = match normalize(raw_input) {
        Some(it) => it,
        None => {
            tracing::trace!("skipping search for empty input");
            return Err(SearchError::EmptyInput);
        }
    };

    let requests = &mut model.requests;
    requests.search_generation += 1;
    requests.searching = true;

    Ok(SearchRequest {
        generation: requests.search_generation,
        region_name,
    })
}

pub fn finished(
    model: &mut Model,
    generation: u64,
    result: Result<RegionStatistics, SearchError>,
) -> Vec<Action> {
    if generation != model.requests.search_generation {
        tracing::debug!(
            "dropping result of superseded search {} (latest is {})",
            generation,
            model.requests.search_generation
        );
        return Vec::new();
    }

    model.requests.searching = false;

    let record = match result {
        Ok(it) => it,
        Err(error) => {
            tracing::error!("search failed: {:?}", error);
            model.status = Some(error.to_string());
            return Vec::new();
        }
    };

    tracing::debug!("search resolved region {}", record.region_id);

    let view = &mut model.view;
    view.pending_region_id = Some(record.region_id.clone());
    view.search_text.clear();

    let actions = acknowledged::add(view, &record.region_id);
    view.last_result = Some(record);
    model.status = None;

    actions
}

/// Drops the displayed result once the user moved on.
pub fn dismiss(model: &mut Model) {
    let view = &mut model.view;
    if view.last_result.take().is_some() {
        tracing::trace!("result dismissed");
    }
    view.pending_region_id = None;
}

#[cfg(test)]
mod test {
    use crate::{action::Action, model::Phase, task::Task};

    use super::*;

    fn new_york() -> RegionStatistics {
        RegionStatistics {
            confirmed_total: 100,
            deaths_total: 5,
            new_confirmed: 2,
            new_deaths: 0,
            last_updated: "2020-05-01".to_string(),
            region_name: "new york".to_string(),
            region_id: "new-york".to_string(),
        }
    }

    #[test]
    fn submit_ignores_empty_and_whitespace_input() {
        let mut model = Model::default();
        model.view.search_text = "   ".to_string();
        let before = model.view.clone();

        assert_eq!(Err(SearchError::EmptyInput), submit(&mut model, ""));
        assert_eq!(Err(SearchError::EmptyInput), submit(&mut model, "   "));
        assert_eq!(before, model.view);
    }

    #[test]
    fn submit_normalizes_to_lowercase() {
        let mut model = Model::default();

        let request = submit(&mut model, "  New York ").unwrap();

        assert_eq!("new york", request.region_name);
        assert_eq!(1, request.generation);
        assert_eq!(Phase::Searching, model.phase());
    }

    #[test]
    fn finished_applies_record_atomically() {
        let mut model = Model::default();
        model.view.search_text = "new york".to_string();
        let request = submit(&mut model, "new york").unwrap();

        let actions = finished(&mut model, request.generation, Ok(new_york()));

        assert_eq!(Some(&new_york()), model.view.last_result());
        assert_eq!(Some("new-york"), model.view.pending_region_id.as_deref());
        assert!(model.view.acknowledged.contains("new-york"));
        assert_eq!("", model.view.search_text);
        assert_eq!(Phase::Displaying, model.phase());
        assert_eq!(
            vec![Action::Task(Task::SaveAcknowledged(
                model.view.acknowledged.clone()
            ))],
            actions
        );
    }

    #[test]
    fn finished_skips_flush_for_known_region() {
        let mut model = Model::default();
        model.view.acknowledged.insert("new-york");
        let request = submit(&mut model, "new york").unwrap();

        let actions = finished(&mut model, request.generation, Ok(new_york()));

        assert!(actions.is_empty());
        assert_eq!(1, model.view.acknowledged.len());
    }

    #[test]
    fn finished_failure_keeps_view_state() {
        let mut model = Model::default();
        model.view.search_text = "atlantis".to_string();
        let expected = model.view.clone();
        let request = submit(&mut model, "atlantis").unwrap();

        let actions = finished(
            &mut model,
            request.generation,
            Err(SearchError::UpstreamFailure("404".to_string())),
        );

        assert!(actions.is_empty());
        assert_eq!(expected, model.view);
        assert_eq!("atlantis", model.view.search_text);
        assert!(model.status.is_some());
        assert_eq!(Phase::Idle, model.phase());
    }

    #[test]
    fn finished_drops_superseded_result() {
        let mut model = Model::default();
        let first = submit(&mut model, "ohio").unwrap();
        let second = submit(&mut model, "new york").unwrap();

        let mut ohio = new_york();
        ohio.region_id = "ohio".to_string();
        ohio.region_name = "ohio".to_string();

        assert!(finished(&mut model, first.generation, Ok(ohio)).is_empty());
        assert!(model.view.last_result.is_none());
        assert_eq!(Phase::Searching, model.phase());

        finished(&mut model, second.generation, Ok(new_york()));
        assert_eq!(Some(&new_york()), model.view.last_result());
        assert!(!model.view.acknowledged.contains("ohio"));
    }

    #[test]
    fn dismiss_clears_result_and_pending() {
        let mut model = Model::default();
        let request = submit(&mut model, "new york").unwrap();
        finished(&mut model, request.generation, Ok(new_york()));

        dismiss(&mut model);

        assert!(model.view.last_result.is_none());
        assert!(model.view.pending_region_id.is_none());
        assert!(model.view.acknowledged.contains("new-york"));
    }
}
