use std::collections::BTreeSet;

use sluice_core::DeliveryTag;

/// Ordered set of delivery tags that are sent but not yet confirmed.
///
/// An ordered set (not a hash set) is required: multiple-confirm removal is
/// a prefix-range erase that must cost in proportion to the removed range,
/// not the total outstanding count.
#[derive(Debug, Default)]
pub struct ConfirmTracker {
    open: BTreeSet<DeliveryTag>,
}

impl ConfirmTracker {
    /// Records a tag as outstanding. Returns false if it was already known.
    pub fn insert(&mut self, tag: DeliveryTag) -> bool {
        self.open.insert(tag)
    }

    /// Removes exactly `tag`. Returns whether it was outstanding.
    pub fn remove(&mut self, tag: DeliveryTag) -> bool {
        self.open.remove(&tag)
    }

    /// Removes every outstanding tag `<= tag`, returning how many were
    /// removed. Removing an empty range is not an error.
    pub fn remove_up_to(&mut self, tag: DeliveryTag) -> usize {
        let before = self.open.len();
        match tag.0.checked_add(1) {
            Some(next) => {
                let remaining = self.open.split_off(&DeliveryTag(next));
                let removed = before - remaining.len();
                self.open = remaining;
                removed
            }
            None => {
                self.open.clear();
                before
            }
        }
    }

    pub fn contains(&self, tag: DeliveryTag) -> bool {
        self.open.contains(&tag)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use sluice_core::DeliveryTag;

    use super::ConfirmTracker;

    fn tracker_with(tags: &[u64]) -> ConfirmTracker {
        let mut tracker = ConfirmTracker::default();
        for &tag in tags {
            assert!(tracker.insert(DeliveryTag(tag)));
        }
        tracker
    }

    #[test]
    fn remove_single_reports_missing_tags() {
        let mut tracker = tracker_with(&[1, 2]);
        assert!(tracker.remove(DeliveryTag(1)));
        assert!(!tracker.remove(DeliveryTag(1)));
        assert!(!tracker.remove(DeliveryTag(9)));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn remove_up_to_erases_the_prefix_range() {
        let mut tracker = tracker_with(&[1, 2, 3, 4, 5]);
        assert_eq!(tracker.remove_up_to(DeliveryTag(3)), 3);
        assert_eq!(tracker.len(), 2);
        assert!(tracker.contains(DeliveryTag(4)));
        assert!(tracker.contains(DeliveryTag(5)));
    }

    #[test]
    fn remove_up_to_handles_gaps_and_empty_ranges() {
        let mut tracker = tracker_with(&[4, 7, 9]);
        assert_eq!(tracker.remove_up_to(DeliveryTag(2)), 0);
        assert_eq!(tracker.remove_up_to(DeliveryTag(8)), 2);
        assert!(tracker.contains(DeliveryTag(9)));
    }

    #[test]
    fn remove_up_to_max_tag_clears_everything() {
        let mut tracker = tracker_with(&[1, u64::MAX]);
        assert_eq!(tracker.remove_up_to(DeliveryTag(u64::MAX)), 2);
        assert!(tracker.is_empty());
    }

    #[test]
    fn duplicate_insert_is_reported() {
        let mut tracker = tracker_with(&[3]);
        assert!(!tracker.insert(DeliveryTag(3)));
        assert_eq!(tracker.len(), 1);
    }
}
