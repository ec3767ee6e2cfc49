use smallvec::SmallVec;

use crate::core::types::Point;

use super::TouchId;

const MAX_TRACKED_TOUCHES: usize = 2;

/// The (at most two) touch points a pinch is computed from, in arrival
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchTracker {
    touches: SmallVec<[(TouchId, Point); MAX_TRACKED_TOUCHES]>,
}

impl TouchTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking new touches until two are tracked. Touches already
    /// tracked get their position refreshed.
    pub fn start(&mut self, touches: &[(TouchId, Point)]) {
        for &(id, point) in touches {
            if let Some(slot) = self.slot_mut(id) {
                *slot = point;
            } else if self.touches.len() < MAX_TRACKED_TOUCHES {
                self.touches.push((id, point));
            }
        }
    }

    /// Moves tracked touches; untracked ids are ignored.
    pub fn update(&mut self, touches: &[(TouchId, Point)]) {
        for &(id, point) in touches {
            if let Some(slot) = self.slot_mut(id) {
                *slot = point;
            }
        }
    }

    /// Stops tracking `ids`. Returns how many were tracked.
    pub fn remove(&mut self, ids: &[TouchId]) -> usize {
        let before = self.touches.len();
        self.touches.retain(|(id, _)| !ids.contains(id));
        before - self.touches.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.touches.len() >= MAX_TRACKED_TOUCHES
    }

    /// Both tracked points, once two touches are down.
    #[must_use]
    pub fn pair(&self) -> Option<(Point, Point)> {
        match self.touches.as_slice() {
            [(_, first), (_, second)] => Some((*first, *second)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, id: TouchId) -> Option<&mut Point> {
        self.touches
            .iter_mut()
            .find(|(tracked, _)| *tracked == id)
            .map(|(_, point)| point)
    }
}

#[cfg(test)]
mod tests {
    use super::TouchTracker;
    use crate::core::types::Point;
    use crate::interaction::TouchId;

    #[test]
    fn tracks_at_most_two_touches_in_arrival_order() {
        let mut tracker = TouchTracker::new();
        tracker.start(&[
            (TouchId(7), Point::new(1.0, 1.0)),
            (TouchId(3), Point::new(2.0, 2.0)),
            (TouchId(9), Point::new(3.0, 3.0)),
        ]);
        assert_eq!(tracker.len(), 2);
        assert_eq!(
            tracker.pair(),
            Some((Point::new(1.0, 1.0), Point::new(2.0, 2.0)))
        );
    }

    #[test]
    fn update_ignores_untracked_ids() {
        let mut tracker = TouchTracker::new();
        tracker.start(&[(TouchId(1), Point::new(0.0, 0.0))]);
        tracker.update(&[
            (TouchId(1), Point::new(5.0, 5.0)),
            (TouchId(2), Point::new(9.0, 9.0)),
        ]);
        assert_eq!(tracker.len(), 1);
        assert!(tracker.pair().is_none());
    }

    #[test]
    fn removing_a_finger_ends_the_pinch() {
        let mut tracker = TouchTracker::new();
        tracker.start(&[
            (TouchId(1), Point::new(0.0, 0.0)),
            (TouchId(2), Point::new(4.0, 0.0)),
        ]);
        assert!(tracker.is_pinching());
        assert_eq!(tracker.remove(&[TouchId(2), TouchId(5)]), 1);
        assert!(!tracker.is_pinching());
        assert_eq!(tracker.len(), 1);
    }
}
