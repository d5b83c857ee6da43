use crate::models::Reco;

/// Groups recos into maximal contiguous runs sharing a `search_id`.
///
/// Only adjacency matters: an id reappearing after a different one starts a
/// new group. At most one group is held in memory.
#[derive(Debug, Default)]
pub struct SearchAggregator {
    current_key: Option<String>,
    group: Vec<Reco>,
}

impl SearchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reco, returning the previous group if this reco closed it
    pub fn push(&mut self, reco: Reco) -> Option<Vec<Reco>> {
        let mut closed = None;
        if self.current_key.as_deref() != Some(reco.search_id.as_str()) {
            if !self.group.is_empty() {
                closed = Some(std::mem::take(&mut self.group));
            }
            self.current_key = Some(reco.search_id.clone());
        }
        self.group.push(reco);
        closed
    }

    /// Flush the in-flight group once the input is exhausted
    pub fn finish(&mut self) -> Option<Vec<Reco>> {
        self.current_key = None;
        if self.group.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.group))
        }
    }

    /// Number of recos in the open group
    pub fn pending(&self) -> usize {
        self.group.len()
    }
}
