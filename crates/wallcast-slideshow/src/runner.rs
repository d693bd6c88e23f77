//! Async driver for the rotation state machine.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use wallcast_core::{Record, RecordEvent};

use crate::renderer::{Preloader, Renderer};
use crate::state::SlideshowState;

pub struct Slideshow {
    state: SlideshowState,
    renderer: Box<dyn Renderer>,
    preloader: Box<dyn Preloader>,
    refresh: Duration,
    events: mpsc::Receiver<RecordEvent>,
}

impl Slideshow {
    pub fn new(
        renderer: Box<dyn Renderer>,
        preloader: Box<dyn Preloader>,
        refresh: Duration,
        events: mpsc::Receiver<RecordEvent>,
    ) -> Self {
        Self {
            state: SlideshowState::new(),
            renderer,
            preloader,
            refresh,
            events,
        }
    }

    /// Surface a startup failure on the wall. The slideshow never starts in
    /// this case (no retry).
    pub async fn show_error(&self, message: &str) {
        self.renderer.show_error(message).await;
    }

    /// Main loop. Displays the first record immediately, then rotates every
    /// `refresh` until `shutdown` broadcasts `true`. Never self-terminates:
    /// an empty wall idles and wakes up when records are created.
    pub async fn run(self, initial: Vec<Record>, mut shutdown: watch::Receiver<bool>) {
        let Slideshow {
            mut state,
            renderer,
            preloader,
            refresh,
            mut events,
        } = self;

        info!(
            count = initial.len(),
            refresh_ms = refresh.as_millis() as u64,
            "slideshow started"
        );
        if let Some(first) = state.initialize(initial) {
            show(renderer.as_ref(), preloader.as_ref(), &state, &first).await;
        }

        let mut interval = tokio::time::interval(refresh);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first interval tick completes immediately; the record shown at
        // initialize already covers it.
        interval.tick().await;

        let mut events_closed = false;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match state.tick() {
                        Some(record) => {
                            show(renderer.as_ref(), preloader.as_ref(), &state, &record).await;
                        }
                        None => debug!("wall empty, idle tick"),
                    }
                }
                event = events.recv(), if !events_closed => {
                    match event {
                        Some(RecordEvent::Created(records)) => {
                            info!(count = records.len(), "created event");
                            if let Some(record) = state.on_created(records) {
                                // Empty-to-nonempty: display right away and
                                // restart the rotation clock behind it.
                                show(renderer.as_ref(), preloader.as_ref(), &state, &record).await;
                                interval.reset();
                            }
                        }
                        Some(RecordEvent::Deleted(ids)) => {
                            info!(count = ids.len(), "deleted event");
                            state.on_deleted(&ids);
                        }
                        None => {
                            // Change source gone; keep rotating what we have.
                            warn!("event channel closed, rotation continues without updates");
                            events_closed = true;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("slideshow shutting down");
                        break;
                    }
                }
            }
        }
    }
}

async fn show(
    renderer: &dyn Renderer,
    preloader: &dyn Preloader,
    state: &SlideshowState,
    record: &Record,
) {
    debug!(record_id = %record.id, kind = ?record.kind(), "displaying record");
    if let Err(e) = renderer.render(record).await {
        warn!(record_id = %record.id, error = %e, "render failed, skipping record");
    }
    if let Some(location) = state.upcoming_media() {
        preloader.preload(location);
    }
}
