//! Pending track queue
//!
//! The track that is currently playing lives in the playback state, so the
//! queue only ever holds the *pending* list. Every index taken by this type is
//! pending-relative: index 0 is the next track to play, and the now-playing
//! track can never be addressed for delete or promote.

use std::collections::VecDeque;

use super::types::Track;

#[derive(Clone, Debug, Default)]
pub struct TrackQueue {
    pending: VecDeque<Track>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail
    pub fn enqueue(&mut self, track: Track) {
        self.pending.push_back(track);
    }

    /// Remove and return the next track. `None` means the queue is exhausted.
    pub fn take_next(&mut self) -> Option<Track> {
        self.pending.pop_front()
    }

    /// Remove the pending track at `index`, keeping the order of the rest.
    /// Out-of-range indices leave the queue untouched and return `None`.
    pub fn remove_at(&mut self, index: usize) -> Option<Track> {
        self.pending.remove(index)
    }

    /// Move the pending track at `index` into the next-to-play slot.
    /// Returns the promoted track, or `None` if the index is out of range.
    pub fn promote_to_front(&mut self, index: usize) -> Option<&Track> {
        let track = self.pending.remove(index)?;
        self.pending.push_front(track);
        self.pending.front()
    }

    /// Drop every pending track
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &Track> {
        self.pending.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.pending.get(index)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(titles: &[&str]) -> TrackQueue {
        let mut queue = TrackQueue::new();
        for title in titles {
            queue.enqueue(Track::new(format!("https://example.com/{title}"), *title));
        }
        queue
    }

    fn titles(queue: &TrackQueue) -> Vec<&str> {
        queue.pending().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn take_next_drains_in_insertion_order() {
        let mut queue = queue_of(&["A", "B", "C"]);
        assert_eq!(queue.take_next().unwrap().title, "A");
        assert_eq!(queue.take_next().unwrap().title, "B");
        assert_eq!(queue.take_next().unwrap().title, "C");
        assert!(queue.take_next().is_none());
    }

    #[test]
    fn remove_at_keeps_remaining_order() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        let removed = queue.remove_at(1).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(titles(&queue), ["A", "C", "D"]);
    }

    #[test]
    fn remove_at_out_of_range_is_noop() {
        let mut queue = queue_of(&["A", "B"]);
        assert!(queue.remove_at(2).is_none());
        assert_eq!(titles(&queue), ["A", "B"]);
    }

    #[test]
    fn promote_moves_track_into_next_slot() {
        let mut queue = queue_of(&["B", "C"]);
        assert_eq!(queue.promote_to_front(1).unwrap().title, "C");
        assert_eq!(titles(&queue), ["C", "B"]);
    }

    #[test]
    fn promote_out_of_range_is_noop() {
        let mut queue = queue_of(&["B", "C"]);
        assert!(queue.promote_to_front(5).is_none());
        assert_eq!(titles(&queue), ["B", "C"]);
    }

    #[test]
    fn clear_empties_pending() {
        let mut queue = queue_of(&["A", "B"]);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }
}
