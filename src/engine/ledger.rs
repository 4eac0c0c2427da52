//! Task ledger: the ordered list of completed task segments

use serde::{Deserialize, Serialize};

use super::EngineError;

/// One completed task segment (a lap).
///
/// The duration is fixed at the moment the segment is cut; only the name
/// may change afterwards. Names are free-form display strings with no
/// uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSegment {
    pub id: u64,
    pub name: String,
    pub duration_seconds: u64,
}

/// Insertion-ordered sequence of task segments plus the elapsed-time
/// boundary of the last cut.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLedger {
    segments: Vec<TaskSegment>,
    /// Elapsed-time mark of the last cut; the next segment's duration is
    /// measured from here.
    cutoff_elapsed: u64,
    next_id: u64,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted segments. The id sequence resumes
    /// past the highest persisted id so reloads never reuse one.
    pub fn from_persisted(segments: Vec<TaskSegment>, cutoff_elapsed: u64) -> Self {
        let next_id = segments.iter().map(|s| s.id + 1).max().unwrap_or(0);
        Self {
            segments,
            cutoff_elapsed,
            next_id,
        }
    }

    /// Close a segment at elapsed-time boundary `elapsed`.
    ///
    /// The new segment's duration is the distance from the previous cut.
    /// Without an explicit name the segment gets a positional default,
    /// matching what the display layer would render anyway.
    pub fn cut(&mut self, elapsed: u64, name: Option<String>) -> TaskSegment {
        let name = name.unwrap_or_else(|| format!("New Task {}", self.segments.len() + 1));
        let segment = TaskSegment {
            id: self.next_id,
            name,
            duration_seconds: elapsed.saturating_sub(self.cutoff_elapsed),
        };
        self.next_id += 1;
        self.cutoff_elapsed = elapsed;
        self.segments.push(segment.clone());
        segment
    }

    /// Replace the name of the segment with id `id`.
    pub fn rename(&mut self, id: u64, new_name: String) -> Result<&TaskSegment, EngineError> {
        let segment = self
            .segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(EngineError::NotFound(id))?;
        segment.name = new_name;
        Ok(segment)
    }

    /// Delete the segment with id `id`.
    ///
    /// Segments are independent once cut: removal does not move
    /// `cutoff_elapsed` and does not touch any other segment's duration.
    pub fn remove(&mut self, id: u64) -> Result<TaskSegment, EngineError> {
        let index = self
            .segments
            .iter()
            .position(|s| s.id == id)
            .ok_or(EngineError::NotFound(id))?;
        Ok(self.segments.remove(index))
    }

    /// Empty the ledger and rewind the cut boundary to zero.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.cutoff_elapsed = 0;
        self.next_id = 0;
    }

    pub fn segments(&self) -> &[TaskSegment] {
        &self.segments
    }

    pub fn cutoff_elapsed(&self) -> u64 {
        self.cutoff_elapsed
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_measures_from_previous_boundary() {
        let mut ledger = TaskLedger::new();
        let first = ledger.cut(10, None);
        assert_eq!(first.duration_seconds, 10);
        assert_eq!(ledger.cutoff_elapsed(), 10);

        let second = ledger.cut(25, Some("review".to_string()));
        assert_eq!(second.duration_seconds, 15);
        assert_eq!(second.name, "review");
        assert_eq!(ledger.cutoff_elapsed(), 25);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_cut_assigns_unique_monotonic_ids() {
        let mut ledger = TaskLedger::new();
        let a = ledger.cut(5, None).id;
        let b = ledger.cut(9, None).id;
        let c = ledger.cut(9, None).id;
        assert!(a < b && b < c);
    }

    #[test]
    fn test_default_names_are_positional() {
        let mut ledger = TaskLedger::new();
        assert_eq!(ledger.cut(3, None).name, "New Task 1");
        assert_eq!(ledger.cut(6, None).name, "New Task 2");
        ledger.remove(0).unwrap();
        // Removal never renumbers; the next default continues from the count.
        assert_eq!(ledger.cut(9, None).name, "New Task 2");
    }

    #[test]
    fn test_rename_changes_only_the_name() {
        let mut ledger = TaskLedger::new();
        let id = ledger.cut(30, None).id;
        let renamed = ledger.rename(id, "standup".to_string()).unwrap();
        assert_eq!(renamed.name, "standup");
        assert_eq!(renamed.duration_seconds, 30);
    }

    #[test]
    fn test_rename_unknown_id_is_not_found() {
        let mut ledger = TaskLedger::new();
        ledger.cut(10, None);
        let before = ledger.clone();
        assert_eq!(
            ledger.rename(99, "x".to_string()).unwrap_err(),
            EngineError::NotFound(99)
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_remove_leaves_other_segments_intact() {
        let mut ledger = TaskLedger::new();
        let first = ledger.cut(10, None).id;
        let second = ledger.cut(25, None).id;
        let removed = ledger.remove(first).unwrap();
        assert_eq!(removed.duration_seconds, 10);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.segments()[0].id, second);
        assert_eq!(ledger.segments()[0].duration_seconds, 15);
        // The cut boundary does not move when a segment is removed.
        assert_eq!(ledger.cutoff_elapsed(), 25);
    }

    #[test]
    fn test_remove_unknown_id_is_not_found() {
        let mut ledger = TaskLedger::new();
        let before = ledger.clone();
        assert_eq!(ledger.remove(7).unwrap_err(), EngineError::NotFound(7));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_clear_resets_boundary_and_ids() {
        let mut ledger = TaskLedger::new();
        ledger.cut(10, None);
        ledger.cut(20, None);
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.cutoff_elapsed(), 0);
        assert_eq!(ledger.cut(5, None).id, 0);
    }

    #[test]
    fn test_from_persisted_resumes_id_sequence() {
        let segments = vec![
            TaskSegment {
                id: 3,
                name: "a".to_string(),
                duration_seconds: 10,
            },
            TaskSegment {
                id: 7,
                name: "b".to_string(),
                duration_seconds: 5,
            },
        ];
        let mut ledger = TaskLedger::from_persisted(segments, 15);
        assert_eq!(ledger.cutoff_elapsed(), 15);
        assert_eq!(ledger.cut(20, None).id, 8);
    }
}
