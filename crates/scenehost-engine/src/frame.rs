//! Per-frame callbacks and frame timing

use std::time::{Duration, Instant};

use crate::scene::Scene;

/// Handle returned by [`crate::RuntimeContext::on_each_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSubscription(u64);

pub type FrameCallback = Box<dyn FnMut(&mut Scene, f32)>;

/// Registered frame callbacks, run in registration order
#[derive(Default)]
pub(crate) struct FrameCallbacks {
    next_id: u64,
    entries: Vec<(FrameSubscription, FrameCallback)>,
}

impl FrameCallbacks {
    pub fn subscribe(&mut self, callback: FrameCallback) -> FrameSubscription {
        let subscription = FrameSubscription(self.next_id);
        self.next_id += 1;
        self.entries.push((subscription, callback));
        subscription
    }

    /// Returns false if the subscription was already released
    pub fn unsubscribe(&mut self, subscription: FrameSubscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(s, _)| *s != subscription);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn run(&mut self, scene: &mut Scene, dt: f32) {
        for (_, callback) in self.entries.iter_mut() {
            callback(scene, dt);
        }
    }
}

/// Result of one [`FrameClock`] tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick, bounded by the clock's step limits
    pub dt: f32,
    /// Unbounded seconds since the clock started or was last reset
    pub elapsed: f32,
    pub frame_index: u64,
}

/// Turns wall-clock time into `dt` values for [`crate::RuntimeContext::tick`].
/// A stalled loop resumes with at most `max_step` instead of one huge jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    previous: Option<Instant>,
    ticks: u64,
    min_step: Duration,
    max_step: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_step_limits(Duration::ZERO, Duration::from_millis(250))
    }

    /// Limits may be given in either order
    pub fn with_step_limits(a: Duration, b: Duration) -> Self {
        let (min_step, max_step) = if a <= b { (a, b) } else { (b, a) };
        Self {
            started: Instant::now(),
            previous: None,
            ticks: 0,
            min_step,
            max_step,
        }
    }

    /// Start over as if freshly created, e.g. after a remount
    pub fn reset(&mut self) {
        self.started = Instant::now();
        self.previous = None;
        self.ticks = 0;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Tick as if the current time were `now`. The first tick reports `min_step`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let step = match self.previous {
            Some(previous) => now
                .saturating_duration_since(previous)
                .clamp(self.min_step, self.max_step),
            None => self.min_step,
        };
        self.previous = Some(now);

        let time = FrameTime {
            dt: step.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.started).as_secs_f32(),
            frame_index: self.ticks,
        };
        self.ticks += 1;
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_unsubscribe_stops_callback() {
        let mut callbacks = FrameCallbacks::default();
        let mut scene = Scene::new();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        let sub = callbacks.subscribe(Box::new(move |_, _| counter.set(counter.get() + 1)));
        callbacks.run(&mut scene, 0.016);
        assert_eq!(calls.get(), 1);

        assert!(callbacks.unsubscribe(sub));
        assert!(!callbacks.unsubscribe(sub));
        callbacks.run(&mut scene, 0.016);
        assert_eq!(calls.get(), 1);
        assert_eq!(callbacks.len(), 0);
    }

    #[test]
    fn test_clock_bounds_steps() {
        let mut clock = FrameClock::with_step_limits(Duration::from_millis(5), Duration::from_millis(100));
        let start = Instant::now();

        let first = clock.tick_at(start);
        assert_eq!(first.frame_index, 0);
        assert!((first.dt - 0.005).abs() < 1e-6);

        let normal = clock.tick_at(start + Duration::from_millis(20));
        assert!((normal.dt - 0.020).abs() < 1e-6);
        assert_eq!(normal.frame_index, 1);

        let burst = clock.tick_at(start + Duration::from_millis(21));
        assert!((burst.dt - 0.005).abs() < 1e-6);

        let stalled = clock.tick_at(start + Duration::from_secs(5));
        assert!((stalled.dt - 0.100).abs() < 1e-6);
        assert!(stalled.elapsed >= 5.0);
    }

    #[test]
    fn test_clock_accepts_swapped_limits() {
        let mut clock = FrameClock::with_step_limits(Duration::from_millis(100), Duration::from_millis(5));
        let start = Instant::now();
        clock.tick_at(start);
        let stalled = clock.tick_at(start + Duration::from_secs(1));
        assert!((stalled.dt - 0.100).abs() < 1e-6);
    }

    #[test]
    fn test_clock_reset_restarts_counting() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.tick();
        clock.reset();
        let time = clock.tick();
        assert_eq!(time.frame_index, 0);
        assert_eq!(time.dt, 0.0);
    }
}
