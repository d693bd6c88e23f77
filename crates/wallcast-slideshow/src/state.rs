//! The rotation state machine.
//!
//! Invariants:
//! - every record in the display queue is also in the content list;
//! - a deleted record is never handed out for display again;
//! - when the queue empties it is refilled from the content list as it is at
//!   that moment, so records created mid-cycle join the next rotation.

use std::collections::VecDeque;

use tracing::debug;

use wallcast_core::{ContentKind, Record, RecordId};

#[derive(Debug, Default)]
pub struct SlideshowState {
    /// All known records, newest first.
    contents: Vec<Record>,
    /// Records still pending display in the current rotation cycle.
    queue: VecDeque<Record>,
    /// The record currently on the wall. `None` until the first display, or
    /// after the displayed record was deleted.
    current: Option<Record>,
}

impl SlideshowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the content list from the initial fetch. Returns the record to
    /// display immediately, if any.
    pub fn initialize(&mut self, records: Vec<Record>) -> Option<Record> {
        self.contents = records;
        if self.contents.is_empty() {
            debug!("initialized with empty content list, wall idle");
            return None;
        }
        debug!(count = self.contents.len(), "initialized");
        self.advance()
    }

    /// New records arrived, newest first. Prepends to both sequences.
    ///
    /// Returns a record to display immediately when the wall was empty
    /// (empty-to-nonempty transition); otherwise the newcomers simply wait
    /// their turn at the front of the queue.
    pub fn on_created(&mut self, new_records: Vec<Record>) -> Option<Record> {
        if new_records.is_empty() {
            return None;
        }
        let was_idle = self.current.is_none() && self.contents.is_empty();

        for record in new_records.iter().rev() {
            self.queue.push_front(record.clone());
        }
        let count = new_records.len();
        self.contents.splice(0..0, new_records);
        debug!(count, total = self.contents.len(), "records created");

        if was_idle {
            return self.advance();
        }
        None
    }

    /// Records were deleted. Purges both sequences so none of the ids is ever
    /// displayed again. The record currently on the wall is not re-rendered,
    /// but it stops being `current` so a tick never hands it out either.
    pub fn on_deleted(&mut self, deleted_ids: &[RecordId]) {
        if deleted_ids.is_empty() {
            return;
        }
        self.contents.retain(|r| !deleted_ids.contains(&r.id));
        self.queue.retain(|r| !deleted_ids.contains(&r.id));
        if self
            .current
            .as_ref()
            .is_some_and(|c| deleted_ids.contains(&c.id))
        {
            self.current = None;
        }
        debug!(
            deleted = deleted_ids.len(),
            remaining = self.contents.len(),
            "records deleted"
        );
    }

    /// Timer tick: the record to display now, or `None` to idle (empty wall).
    pub fn tick(&mut self) -> Option<Record> {
        self.advance()
    }

    /// Preload hint: media location of the upcoming record when it is an
    /// image. Audio/video are not prefetched.
    pub fn upcoming_media(&self) -> Option<&str> {
        self.queue
            .front()
            .filter(|r| r.kind() == ContentKind::Image)
            .and_then(|r| r.media_location())
    }

    /// Pop the next record, refilling the queue from the current content list
    /// whenever it runs dry. The refill also happens before the pop: a delete
    /// can empty the queue mid-cycle while records survive, and the rotation
    /// must pick those up on the next tick.
    fn advance(&mut self) -> Option<Record> {
        if self.queue.is_empty() {
            self.queue = self.contents.iter().cloned().collect();
        }
        let next = self.queue.pop_front()?;
        if self.queue.is_empty() {
            // Snapshot of the list as it is now, so mid-cycle creations and
            // deletions shape the next rotation.
            self.queue = self.contents.iter().cloned().collect();
        }
        self.current = Some(next.clone());
        Some(next)
    }

    pub fn current(&self) -> Option<&Record> {
        self.current.as_ref()
    }

    pub fn contents(&self) -> &[Record] {
        &self.contents
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// True when every queued record is also in the content list.
    pub fn queue_is_subset_of_contents(&self) -> bool {
        self.queue
            .iter()
            .all(|q| self.contents.iter().any(|c| c.id == q.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Record {
        Record {
            id: RecordId::from(id),
            text: Some(format!("text-{id}")),
            from: None,
            attachment: None,
            last_modified: 0,
        }
    }

    #[test]
    fn single_record_repeats_forever() {
        let mut state = SlideshowState::new();
        let first = state.initialize(vec![record("a")]).unwrap();
        assert_eq!(first.id.as_str(), "a");
        for _ in 0..5 {
            assert_eq!(state.tick().unwrap().id.as_str(), "a");
        }
    }

    #[test]
    fn empty_initialize_idles() {
        let mut state = SlideshowState::new();
        assert!(state.initialize(vec![]).is_none());
        assert!(state.tick().is_none());
        assert!(state.current().is_none());
    }

    #[test]
    fn deleting_current_clears_it() {
        let mut state = SlideshowState::new();
        state.initialize(vec![record("a")]);
        state.on_deleted(&[RecordId::from("a")]);
        assert!(state.current().is_none());
        assert!(state.tick().is_none());
    }

    #[test]
    fn delete_everything_goes_idle_then_wakes_on_create() {
        let mut state = SlideshowState::new();
        state.initialize(vec![record("a"), record("b")]);
        state.on_deleted(&[RecordId::from("a"), RecordId::from("b")]);
        assert!(state.tick().is_none());

        let shown = state.on_created(vec![record("c")]).unwrap();
        assert_eq!(shown.id.as_str(), "c");
    }

    #[test]
    fn created_while_rotating_waits_its_turn() {
        let mut state = SlideshowState::new();
        state.initialize(vec![record("a"), record("b")]);
        // Wall is showing "a"; a newcomer must not force a re-render.
        assert!(state.on_created(vec![record("c")]).is_none());
        // But it cut to the front of the queue.
        assert_eq!(state.tick().unwrap().id.as_str(), "c");
        assert_eq!(state.tick().unwrap().id.as_str(), "b");
    }

    #[test]
    fn upcoming_media_only_for_images() {
        let mut state = SlideshowState::new();
        let mut img = record("img");
        img.text = Some("https://pics.example/cat.jpg".into());
        state.initialize(vec![record("a"), img]);
        // Queue head after initialize is the image record.
        assert_eq!(state.upcoming_media(), Some("https://pics.example/cat.jpg"));
    }
}
