//! Visibility-driven load-more trigger.
//!
//! The host (a browser bridge, a terminal front end, a test) reports
//! intersection changes with [`ScrollTrigger::report`]. When the watched
//! target becomes visible the trigger sends [`FeedEvent::TriggerFired`] to
//! its subscriber, normally the controller's own event channel.
//!
//! A trigger fires at most once per arm. It re-arms when
//! [`observe`](ScrollTrigger::observe) is called again after a render, or
//! when the target scrolls out of view and back in. The debounce interval
//! only applies to the second kind: a target flickering at the viewport
//! edge is ignored, while a freshly observed target fires on its first
//! visible report.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::controller::FeedEvent;

/// Element whose visibility requests the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerTarget {
    /// Persistent element below the feed.
    Sentinel,
    /// The last rendered card, by post id.
    LastItem(String),
}

/// Which kind of target to watch after each render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    #[default]
    Sentinel,
    LastItem,
}

/// One intersection report for an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub target: TriggerTarget,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub ratio: f64,
}

impl Intersection {
    pub fn new(target: TriggerTarget, ratio: f64) -> Self {
        Self { target, ratio }
    }
}

#[derive(Debug)]
pub struct ScrollTrigger {
    target: Option<TriggerTarget>,
    threshold: f64,
    debounce: Duration,
    armed: bool,
    last_fired: Option<Instant>,
    subscriber: Option<mpsc::Sender<FeedEvent>>,
}

impl ScrollTrigger {
    /// `threshold` is the visible fraction that counts as "in view".
    pub fn new(threshold: f64, debounce: Duration) -> Self {
        Self {
            target: None,
            threshold,
            debounce,
            armed: false,
            last_fired: None,
            subscriber: None,
        }
    }

    pub fn subscribe(&mut self, sender: mpsc::Sender<FeedEvent>) {
        self.subscriber = Some(sender);
    }

    pub fn unsubscribe(&mut self) {
        self.subscriber = None;
    }

    /// Starts watching `target` and arms the trigger.
    ///
    /// Clears the debounce window: the next visible report fires even if
    /// the previous firing was moments ago.
    pub fn observe(&mut self, target: TriggerTarget) {
        tracing::trace!(?target, "Scroll trigger armed");
        self.target = Some(target);
        self.armed = true;
        self.last_fired = None;
    }

    /// Stops watching. Reports are ignored until the next `observe`.
    pub fn disconnect(&mut self) {
        self.target = None;
        self.armed = false;
    }

    pub fn target(&self) -> Option<&TriggerTarget> {
        self.target.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Processes intersection reports. Returns true if the trigger fired.
    pub fn report(&mut self, entries: &[Intersection]) -> bool {
        let Some(target) = self.target.clone() else {
            return false;
        };
        let Some(subscriber) = self.subscriber.clone() else {
            return false;
        };

        let mut fired = false;
        for entry in entries.iter().filter(|e| e.target == target) {
            let intersecting = entry.ratio > 0.0 && entry.ratio >= self.threshold;
            if !intersecting {
                // Leaving the viewport re-arms for the next entry
                self.armed = true;
                continue;
            }
            if !self.armed || fired {
                continue;
            }
            if let Some(last) = self.last_fired {
                if last.elapsed() < self.debounce {
                    tracing::trace!("Scroll trigger debounced");
                    continue;
                }
            }

            match subscriber.try_send(FeedEvent::TriggerFired) {
                Ok(()) => {
                    self.armed = false;
                    self.last_fired = Some(Instant::now());
                    fired = true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping scroll trigger event");
                }
            }
        }
        fired
    }
}
