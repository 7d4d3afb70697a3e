use crate::{action::Action, model::ViewState, task::Task};

pub fn add(view: &mut ViewState, region_id: &str) -> Vec<Action> {
    if view.acknowledged.insert(region_id) {
        vec![flush(view)]
    } else {
        Vec::new()
    }
}

pub fn reset(view: &mut ViewState) -> Vec<Action> {
    tracing::info!("resetting {} acknowledged regions", view.acknowledged.len());

    view.acknowledged.entries.clear();
    vec![flush(view)]
}

pub fn flush(view: &ViewState) -> Action {
    Action::Task(Task::SaveAcknowledged(view.acknowledged.clone()))
}
