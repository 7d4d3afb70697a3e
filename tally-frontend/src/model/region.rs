/// Canonical statistics for a single region as returned by a successful lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegionStatistics {
    pub confirmed_total: u64,
    pub deaths_total: u64,
    pub new_confirmed: u64,
    pub new_deaths: u64,
    pub last_updated: String,
    pub region_name: String,
    pub region_id: String,
}
