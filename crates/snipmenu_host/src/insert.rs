//! Page-side insertion context.
//!
//! The bridge can double-deliver an insert directive; the guard here is the
//! front line against that, not a correctness requirement of the engine. The
//! context is session-scoped: tearing down the hosting context discards it,
//! so a recreated context starts with an empty window.

use snipmenu_core::constants::DUPLICATE_INSERT_WINDOW_MS;
use snipmenu_core::surface::{insert, InsertOutcome, Surface};
use std::time::{Duration, Instant};
use tracing::debug;

/// Tracks the last processed `(text, timestamp)` pair.
#[derive(Debug, Default)]
pub struct InsertGuard {
    last: Option<(String, Instant)>,
}

impl InsertGuard {
    /// Record `text` at `now` unless an identical payload was already
    /// processed within the duplicate window.
    ///
    /// A suppressed payload does not refresh the window, so a genuine repeat
    /// after the window has passed is admitted again.
    ///
    /// # Returns
    /// `true` when the payload should be processed.
    pub fn admit(&mut self, text: &str, now: Instant) -> bool {
        if let Some((last_text, last_at)) = &self.last {
            let window = Duration::from_millis(DUPLICATE_INSERT_WINDOW_MS);
            if last_text == text && now.duration_since(*last_at) < window {
                return false;
            }
        }
        self.last = Some((text.to_string(), now));
        true
    }
}

/// Outcome of delivering a bridged insert payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The focused surface was mutated.
    Inserted,
    /// Dropped as a duplicate delivery.
    Suppressed,
    /// Nothing held focus.
    NoTarget,
    /// A rich surface had no active selection range.
    NoCaret,
}

/// Applies bridged insert directives to the focused surface.
#[derive(Debug, Default)]
pub struct InsertionContext {
    guard: InsertGuard,
}

impl InsertionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `text` to the focused surface.
    pub fn deliver(&mut self, target: Option<&mut Surface>, text: &str) -> DeliveryOutcome {
        self.deliver_at(target, text, Instant::now())
    }

    /// Clock-injectable variant of [`InsertionContext::deliver`].
    pub fn deliver_at(
        &mut self,
        target: Option<&mut Surface>,
        text: &str,
        now: Instant,
    ) -> DeliveryOutcome {
        if !self.guard.admit(text, now) {
            debug!("suppressed duplicate insert delivery");
            return DeliveryOutcome::Suppressed;
        }
        match insert(target, text) {
            InsertOutcome::Inserted => DeliveryOutcome::Inserted,
            InsertOutcome::NoTarget => DeliveryOutcome::NoTarget,
            InsertOutcome::NoCaret => DeliveryOutcome::NoCaret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snipmenu_core::surface::PlainSurface;

    #[test]
    fn identical_payload_within_window_is_suppressed_once() {
        let mut context = InsertionContext::new();
        let base = Instant::now();
        let mut surface = Surface::Plain(PlainSurface::with_selection("", 0, 0));

        assert_eq!(
            context.deliver_at(Some(&mut surface), "snippet", base),
            DeliveryOutcome::Inserted
        );
        assert_eq!(
            context.deliver_at(
                Some(&mut surface),
                "snippet",
                base + Duration::from_millis(400)
            ),
            DeliveryOutcome::Suppressed
        );
        // 600 ms after the first (admitted) delivery the window has passed.
        assert_eq!(
            context.deliver_at(
                Some(&mut surface),
                "snippet",
                base + Duration::from_millis(600)
            ),
            DeliveryOutcome::Inserted
        );

        let Surface::Plain(plain) = &surface else {
            unreachable!()
        };
        assert_eq!(plain.value(), "snippetsnippet");
    }

    #[test]
    fn different_payloads_are_not_suppressed() {
        let mut context = InsertionContext::new();
        let base = Instant::now();
        let mut surface = Surface::Plain(PlainSurface::with_selection("", 0, 0));

        assert_eq!(
            context.deliver_at(Some(&mut surface), "one", base),
            DeliveryOutcome::Inserted
        );
        assert_eq!(
            context.deliver_at(
                Some(&mut surface),
                "two",
                base + Duration::from_millis(100)
            ),
            DeliveryOutcome::Inserted
        );
    }

    #[test]
    fn missing_focus_is_reported_but_still_recorded() {
        let mut context = InsertionContext::new();
        let base = Instant::now();

        assert_eq!(
            context.deliver_at(None, "snippet", base),
            DeliveryOutcome::NoTarget
        );
        // The guard tracks deliveries, not successful insertions.
        assert_eq!(
            context.deliver_at(None, "snippet", base + Duration::from_millis(100)),
            DeliveryOutcome::Suppressed
        );
    }

    #[test]
    fn fresh_context_starts_with_an_empty_window() {
        let base = Instant::now();
        let mut first = InsertionContext::new();
        assert_eq!(
            first.deliver_at(None, "snippet", base),
            DeliveryOutcome::NoTarget
        );

        let mut recreated = InsertionContext::new();
        assert_eq!(
            recreated.deliver_at(None, "snippet", base + Duration::from_millis(1)),
            DeliveryOutcome::NoTarget
        );
    }
}
