use crate::service::AuthProvider;

use self::{acknowledged::Acknowledged, region::RegionStatistics};

pub mod acknowledged;
pub mod region;

#[derive(Debug, Default)]
pub struct Model {
    pub requests: Requests,
    /// Latest failure reported on the error channel, shown in the statusline.
    pub status: Option<String>,
    pub view: ViewState,
}

/// Bookkeeping for service calls in flight, kept apart from the view state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Requests {
    pub search_generation: u64,
    pub searching: bool,
    pub saving: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ViewState {
    pub search_text: String,
    pub last_result: Option<RegionStatistics>,
    pub pending_region_id: Option<String>,
    pub acknowledged: Acknowledged,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    Displaying,
    Saving,
    Saved,
}

impl ViewState {
    pub fn last_result(&self) -> Option<&RegionStatistics> {
        self.last_result.as_ref()
    }

    pub fn acknowledged(&self) -> &Acknowledged {
        &self.acknowledged
    }

    pub fn save_enabled(&self, auth: &dyn AuthProvider) -> bool {
        auth.is_authenticated() && self.last_result.is_some()
    }
}

impl Model {
    pub fn phase(&self) -> Phase {
        if self.requests.searching {
            return Phase::Searching;
        }

        if self.requests.saving.is_some() {
            return Phase::Saving;
        }

        match (&self.view.last_result, &self.view.pending_region_id) {
            (None, _) => Phase::Idle,
            (Some(_), Some(_)) => Phase::Displaying,
            (Some(_), None) => Phase::Saved,
        }
    }
}
