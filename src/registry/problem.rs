//! Recorded violations for a single bone

use crate::speed::{Severity, SpeedSample};
use crate::types::FrameIndex;
use serde::{Deserialize, Serialize};

/// One violating frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemEntry {
    pub frame: FrameIndex,
    pub speed: f64,
    /// Speed minus the threshold that was in force
    pub excess: f64,
    #[serde(default)]
    pub invalid_position: bool,
}

impl ProblemEntry {
    pub fn new(frame: FrameIndex, speed: f64, threshold: f64) -> Self {
        Self {
            frame,
            speed,
            excess: speed - threshold,
            invalid_position: false,
        }
    }

    pub fn severity(&self) -> Severity {
        if self.invalid_position {
            Severity::High
        } else {
            Severity::from_excess(self.excess)
        }
    }
}

impl From<&SpeedSample> for ProblemEntry {
    fn from(sample: &SpeedSample) -> Self {
        Self {
            frame: sample.frame,
            speed: sample.speed,
            excess: sample.excess(),
            invalid_position: sample.invalid_position,
        }
    }
}

/// Violations of one bone, strictly ascending by frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemGroup {
    entries: Vec<ProblemEntry>,
}

impl ProblemGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from arbitrary entries; sorts and keeps the last entry per frame
    pub fn from_entries(mut entries: Vec<ProblemEntry>) -> Self {
        entries.sort_by_key(|e| e.frame);
        let mut deduped: Vec<ProblemEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.last_mut() {
                Some(last) if last.frame == entry.frame => *last = entry,
                _ => deduped.push(entry),
            }
        }
        Self { entries: deduped }
    }

    /// Append an entry; returns false if it would break frame ordering
    pub fn push(&mut self, entry: ProblemEntry) -> bool {
        if let Some(last) = self.entries.last() {
            if entry.frame <= last.frame {
                return false;
            }
        }
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[ProblemEntry] {
        &self.entries
    }

    pub fn get(&self, frame: FrameIndex) -> Option<&ProblemEntry> {
        self.entries
            .binary_search_by_key(&frame, |e| e.frame)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Worst severity across the group
    pub fn severity(&self) -> Option<Severity> {
        self.entries.iter().map(ProblemEntry::severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rejects_out_of_order() {
        let mut group = ProblemGroup::new();
        assert!(group.push(ProblemEntry::new(2, 2.0, 1.0)));
        assert!(group.push(ProblemEntry::new(5, 1.5, 1.0)));
        assert!(!group.push(ProblemEntry::new(5, 3.0, 1.0)));
        assert!(!group.push(ProblemEntry::new(3, 3.0, 1.0)));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_from_entries_sorts_and_dedups() {
        let group = ProblemGroup::from_entries(vec![
            ProblemEntry::new(7, 1.2, 1.0),
            ProblemEntry::new(3, 1.1, 1.0),
            ProblemEntry::new(7, 4.0, 1.0),
        ]);
        let frames: Vec<i64> = group.entries().iter().map(|e| e.frame).collect();
        assert_eq!(frames, vec![3, 7]);
        assert_eq!(group.get(7).unwrap().speed, 4.0);
        assert!(group.get(4).is_none());
    }

    #[test]
    fn test_group_severity() {
        let mut group = ProblemGroup::new();
        assert_eq!(group.severity(), None);
        group.push(ProblemEntry::new(1, 1.5, 1.0));
        group.push(ProblemEntry::new(2, 2.5, 1.0));
        assert_eq!(group.severity(), Some(Severity::Medium));
        group.push(ProblemEntry::new(3, 4.0, 1.0));
        assert_eq!(group.severity(), Some(Severity::High));
    }
}
