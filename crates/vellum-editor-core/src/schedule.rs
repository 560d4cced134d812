//! Render scheduling.
//!
//! Re-rendering the preview on every keystroke is wasteful and janky, so
//! input events arm a quiet-period deadline instead. When the deadline
//! passes the scheduler fires a render - unless transfers are still
//! outstanding, in which case it keeps polling until they drain (their
//! completions rewrite the buffer and would immediately invalidate the
//! render).

use web_time::{Duration, Instant};

/// Debounce and poll intervals for the render scheduler.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleConfig {
    /// Quiet period after the last input before a render fires.
    pub quiet: Duration,
    /// Host re-poll interval while waiting on outstanding transfers.
    pub poll: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            quiet: Duration::from_millis(500),
            poll: Duration::from_millis(10),
        }
    }
}

/// Debounced render trigger, driven by the host's clock.
///
/// The host calls [`note_input`](Self::note_input) on every buffer change
/// and [`poll`](Self::poll) on its timer ticks; a `true` return means
/// "render now".
#[derive(Debug, Default)]
pub struct RenderScheduler {
    config: ScheduleConfig,
    deadline: Option<Instant>,
}

impl RenderScheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            deadline: None,
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// A render is armed but has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record an input event; (re)arms the quiet-period deadline.
    pub fn note_input(&mut self, now: Instant) {
        self.deadline = Some(now + self.config.quiet);
    }

    /// Check whether a render should fire.
    ///
    /// `outstanding` is the number of transfers still in flight. A passed
    /// deadline with transfers outstanding stays armed; the host should
    /// poll again after [`ScheduleConfig::poll`].
    pub fn poll(&mut self, now: Instant, outstanding: usize) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }
        if outstanding > 0 {
            tracing::trace!(target: "vellum::render", outstanding, "render deferred");
            return false;
        }
        self.deadline = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let mut scheduler = RenderScheduler::default();
        let start = Instant::now();

        scheduler.note_input(start);
        assert!(scheduler.is_pending());
        assert!(!scheduler.poll(start + ms(499), 0));
        assert!(scheduler.poll(start + ms(500), 0));
        assert!(!scheduler.is_pending());

        // Fired and disarmed; later polls stay quiet until new input.
        assert!(!scheduler.poll(start + ms(900), 0));
    }

    #[test]
    fn test_input_resets_deadline() {
        let mut scheduler = RenderScheduler::default();
        let start = Instant::now();

        scheduler.note_input(start);
        scheduler.note_input(start + ms(400));
        assert!(!scheduler.poll(start + ms(600), 0));
        assert!(scheduler.poll(start + ms(900), 0));
    }

    #[test]
    fn test_outstanding_transfers_defer_render() {
        let mut scheduler = RenderScheduler::default();
        let start = Instant::now();

        scheduler.note_input(start);
        assert!(!scheduler.poll(start + ms(600), 2));
        assert!(scheduler.is_pending());
        assert!(!scheduler.poll(start + ms(700), 1));
        // Last transfer drained: the armed render fires.
        assert!(scheduler.poll(start + ms(710), 0));
    }

    #[test]
    fn test_unarmed_scheduler_never_fires() {
        let mut scheduler = RenderScheduler::default();
        assert!(!scheduler.poll(Instant::now(), 0));
    }
}
