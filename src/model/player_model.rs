//! Queue, selection and playback state owned by one voice session

use super::playback::PlaybackState;
use super::queue::TrackQueue;
use super::types::Track;

/// Pending-relative index picked in the selection menu
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection(Option<usize>);

impl Selection {
    pub fn get(self) -> Option<usize> {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0.is_none()
    }
}

/// Main model of a session. The selection can only be cleared from here and
/// every queue mutation goes through [`PlayerModel::mutate_queue`], so no
/// caller can act on an index from before the mutation.
#[derive(Clone, Debug, Default)]
pub struct PlayerModel {
    queue: TrackQueue,
    selection: Selection,
    pub playback: PlaybackState,
    last_played: Option<Track>,
}

impl PlayerModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &TrackQueue {
        &self.queue
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn last_played(&self) -> Option<&Track> {
        self.last_played.as_ref()
    }

    /// Apply `f` to the queue and clear the selection in the same step
    pub fn mutate_queue<R>(&mut self, f: impl FnOnce(&mut TrackQueue) -> R) -> R {
        let out = f(&mut self.queue);
        self.selection = Selection::default();
        out
    }

    /// Appending never shifts pending indices, so the selection survives
    pub fn enqueue(&mut self, track: Track) {
        self.queue.enqueue(track);
    }

    /// Record a menu pick. Indices outside the pending list clear the
    /// selection instead. Returns whether something is now selected.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.queue.len() {
            self.selection = Selection(Some(index));
            true
        } else {
            tracing::debug!(index, pending = self.queue.len(), "Ignoring out-of-range selection");
            self.selection = Selection::default();
            false
        }
    }

    pub fn take_next(&mut self) -> Option<Track> {
        self.mutate_queue(TrackQueue::take_next)
    }

    /// Remove the selected pending track. `Err(index)` when the queue shrank
    /// under the selection; `Ok(None)` when nothing was selected.
    pub fn remove_selected(&mut self) -> Result<Option<Track>, usize> {
        let Some(index) = self.selection.get() else {
            return Ok(None);
        };
        self.mutate_queue(|queue| queue.remove_at(index))
            .map(Some)
            .ok_or(index)
    }

    /// Promote the selected pending track into the next-to-play slot
    pub fn promote_selected(&mut self) -> Result<Option<Track>, usize> {
        let Some(index) = self.selection.get() else {
            return Ok(None);
        };
        self.mutate_queue(|queue| queue.promote_to_front(index).cloned())
            .map(Some)
            .ok_or(index)
    }

    pub fn clear_pending(&mut self) {
        self.mutate_queue(TrackQueue::clear);
    }

    /// Enter Playing with `track`
    pub fn start(&mut self, track: Track) {
        self.last_played = Some(track.clone());
        self.playback.start(track);
    }

    /// Idle with nothing pending, selection cleared
    pub fn reset(&mut self) {
        self.mutate_queue(TrackQueue::clear);
        self.playback.stop();
    }

    /// Skip is offered when there is a next track or autoplay can supply one
    pub fn can_skip(&self) -> bool {
        !self.queue.is_empty() || self.playback.autoplay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(titles: &[&str]) -> PlayerModel {
        let mut model = PlayerModel::new();
        for title in titles {
            model.enqueue(Track::new(format!("https://example.com/{title}"), *title));
        }
        model
    }

    #[test]
    fn every_queue_mutation_clears_selection() {
        let mut model = model_with(&["A", "B", "C"]);

        assert!(model.select(1));
        model.take_next();
        assert!(model.selection().is_none());

        assert!(model.select(0));
        model.clear_pending();
        assert!(model.selection().is_none());
    }

    #[test]
    fn enqueue_keeps_selection() {
        let mut model = model_with(&["A", "B"]);
        model.select(1);
        model.enqueue(Track::new("x", "C"));
        assert_eq!(model.selection().get(), Some(1));
    }

    #[test]
    fn selecting_past_the_end_clears() {
        let mut model = model_with(&["A"]);
        assert!(model.select(0));
        assert!(!model.select(1));
        assert!(model.selection().is_none());
    }

    #[test]
    fn remove_selected_reports_stale_index() {
        let mut model = model_with(&["A", "B"]);
        model.select(1);
        model.mutate_queue(|q| q.take_next());
        // selection was cleared by the mutation above
        assert_eq!(model.remove_selected(), Ok(None));

        model.select(0);
        model.queue.clear();
        assert_eq!(model.remove_selected(), Err(0));
        assert!(model.selection().is_none());
    }

    #[test]
    fn promote_selected_moves_track_up() {
        let mut model = model_with(&["B", "C"]);
        model.select(1);
        let promoted = model.promote_selected().unwrap().unwrap();
        assert_eq!(promoted.title, "C");
        let order: Vec<_> = model.queue().pending().map(|t| t.title.as_str()).collect();
        assert_eq!(order, ["C", "B"]);
        assert!(model.selection().is_none());
    }

    #[test]
    fn reset_goes_idle_and_empties() {
        let mut model = model_with(&["A", "B"]);
        let next = model.take_next().unwrap();
        model.start(next);
        model.select(0);
        model.reset();

        assert!(model.playback.status.is_idle());
        assert!(model.queue().is_empty());
        assert!(model.selection().is_none());
        assert_eq!(model.last_played().unwrap().title, "A");
    }

    #[test]
    fn skip_needs_pending_or_autoplay() {
        let mut model = PlayerModel::new();
        assert!(!model.can_skip());
        model.playback.toggle_autoplay();
        assert!(model.can_skip());
        model.playback.toggle_autoplay();
        model.enqueue(Track::new("x", "A"));
        assert!(model.can_skip());
    }
}
