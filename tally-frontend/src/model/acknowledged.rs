use std::collections::BTreeSet;

/// Region identifiers the user searched or saved, cached locally across sessions.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Acknowledged {
    pub entries: BTreeSet<String>,
}

impl Acknowledged {
    pub fn contains(&self, region_id: &str) -> bool {
        self.entries.contains(region_id)
    }

    /// Returns true if the set changed.
    pub fn insert(&mut self, region_id: &str) -> bool {
        if self.entries.contains(region_id) {
            return false;
        }
        self.entries.insert(region_id.to_owned())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Acknowledged {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}
