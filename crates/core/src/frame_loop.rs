//! Cancellable frame loop.
//!
//! The loop owns the continuation: it calls
//! [`ParticleField::advance_frame`] until its [`CancellationToken`] is
//! cancelled or an optional frame limit is reached. Hosts with their own
//! scheduler (the browser's `requestAnimationFrame`) check the same token
//! before rescheduling.

use crate::field::{FrameStats, ParticleField};
use crate::surface::Surface;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the loop to stop before its next frame.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Why a [`FrameLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Cancelled,
    LimitReached,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub exit: LoopExit,
}

/// Explicit frame loop with an optional frame limit and pacing interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameLoop {
    limit: Option<u64>,
    interval: Option<Duration>,
}

impl FrameLoop {
    /// A loop that runs until cancelled, as fast as frames complete.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Stops after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Paces frames so each starts at least `interval` after the previous one.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Advances `field` until cancelled or the limit is reached, calling
    /// `on_frame` after every frame. The callback may forward host events
    /// (resize, pointer) to the field before the next frame. The token is
    /// checked before each frame, so a cancel from inside `on_frame` stops
    /// the loop immediately.
    pub fn run<S: Surface>(
        &self,
        field: &mut ParticleField<S>,
        token: &CancellationToken,
        mut on_frame: impl FnMut(&FrameStats, &mut ParticleField<S>),
    ) -> LoopSummary {
        let mut frames = 0;
        let exit = loop {
            if token.is_cancelled() {
                break LoopExit::Cancelled;
            }
            if self.limit.is_some_and(|limit| frames >= limit) {
                break LoopExit::LimitReached;
            }
            let started = Instant::now();
            let stats = field.advance_frame();
            frames += 1;
            on_frame(&stats, field);
            if let Some(interval) = self.interval {
                if let Some(rest) = interval.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        };
        debug!(frames, ?exit, "frame loop finished");
        LoopSummary { frames, exit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::host::FixedHost;
    use crate::surface::Recorder;

    fn small_field() -> ParticleField<Recorder> {
        let host = FixedHost::new(64.0, 64.0);
        let config = FieldConfig {
            count: 5,
            line: false,
            ..FieldConfig::default()
        };
        ParticleField::new(&host, config, Recorder::new(), 1).unwrap()
    }

    #[test]
    fn token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn limit_stops_after_exact_frame_count() {
        let mut field = small_field();
        let summary = FrameLoop::unbounded()
            .with_limit(12)
            .run(&mut field, &CancellationToken::new(), |_, _| {});
        assert_eq!(summary.frames, 12);
        assert_eq!(summary.exit, LoopExit::LimitReached);
        assert_eq!(field.frame_count(), 12);
    }

    #[test]
    fn pre_cancelled_token_runs_no_frames() {
        let mut field = small_field();
        let token = CancellationToken::new();
        token.cancel();
        let summary = FrameLoop::unbounded().run(&mut field, &token, |_, _| {});
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.exit, LoopExit::Cancelled);
    }

    #[test]
    fn cancel_from_callback_stops_unbounded_loop() {
        let mut field = small_field();
        let token = CancellationToken::new();
        let stopper = token.clone();
        let summary = FrameLoop::unbounded().run(&mut field, &token, |stats, _| {
            if stats.frame == 30 {
                stopper.cancel();
            }
        });
        assert_eq!(summary.frames, 30);
        assert_eq!(summary.exit, LoopExit::Cancelled);
    }

    #[test]
    fn callback_sees_population_every_frame() {
        let mut field = small_field();
        let mut seen = Vec::new();
        FrameLoop::unbounded().with_limit(3).run(
            &mut field,
            &CancellationToken::new(),
            |stats, f| seen.push((stats.frame, f.points().len())),
        );
        assert_eq!(seen, vec![(1, 5), (2, 5), (3, 5)]);
    }

    #[test]
    fn callback_can_forward_pointer_events() {
        let mut field = small_field();
        FrameLoop::unbounded().with_limit(2).run(
            &mut field,
            &CancellationToken::new(),
            |stats, f| {
                if stats.frame == 1 {
                    f.pointer_move(10.0, 10.0);
                }
            },
        );
        assert!(field.pointer().is_some());
    }

    #[test]
    fn interval_paces_frames() {
        let mut field = small_field();
        let started = Instant::now();
        FrameLoop::unbounded()
            .with_limit(3)
            .with_interval(Duration::from_millis(5))
            .run(&mut field, &CancellationToken::new(), |_, _| {});
        assert!(started.elapsed() >= Duration::from_millis(15));
    }
}
