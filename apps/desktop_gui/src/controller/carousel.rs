//! Carousel timing state machine.
//!
//! Each catalog card owns one [`CarouselState`]; the hero banner owns one
//! [`HeroRotator`]. Both are pure state driven by an injected clock so the
//! timing rules can be tested without a UI loop. Timers are deadline values
//! rather than callbacks: starting a timer stores a deadline, cancelling
//! drops it, and the frame loop polls with the current instant.

use std::time::{Duration, Instant};

/// Widths at or below this are compact mode; above it, wide mode.
pub const VIEWPORT_BREAKPOINT: f32 = 768.0;
/// Rotation period while a wide-mode card is hovered.
pub const HOVER_ROTATION_PERIOD: Duration = Duration::from_millis(800);
/// Rotation period for compact-mode autoplay.
pub const AUTOPLAY_PERIOD: Duration = Duration::from_millis(2500);
/// Rotation period of the hero banner.
pub const HERO_ROTATION_PERIOD: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportMode {
    Compact,
    Wide,
}

impl ViewportMode {
    pub fn from_width(width: f32) -> Self {
        if width > VIEWPORT_BREAKPOINT {
            ViewportMode::Wide
        } else {
            ViewportMode::Compact
        }
    }
}

/// A repeating deadline. `poll` reports how many periods elapsed since the
/// last call and re-arms past the given instant, so a long stall between
/// frames yields the same net index movement as individual ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatingTimer {
    period: Duration,
    next_fire: Instant,
}

impl RepeatingTimer {
    pub fn start(now: Instant, period: Duration) -> Self {
        Self {
            period,
            next_fire: now + period,
        }
    }

    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while now >= self.next_fire {
            self.next_fire += self.period;
            fired += 1;
        }
        fired
    }

    pub fn next_fire(&self) -> Instant {
        self.next_fire
    }
}

/// Timing state of one card carousel.
///
/// Invariants: `current < frame_count.max(1)`; at most one of the two timer
/// classes is live at any time (autoplay is compact-only, hover rotation is
/// wide-only, and every mode or hover transition cancels the class that no
/// longer applies). Cards with fewer than two frames never start a timer.
#[derive(Debug, Clone)]
pub struct CarouselState {
    frame_count: usize,
    current: usize,
    autoplay: Option<RepeatingTimer>,
    hover: Option<RepeatingTimer>,
    hovering: bool,
}

impl CarouselState {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            current: 0,
            autoplay: None,
            hover: None,
            hovering: false,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn has_autoplay_timer(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn has_hover_timer(&self) -> bool {
        self.hover.is_some()
    }

    fn rotates(&self) -> bool {
        self.frame_count > 1
    }

    fn advance(&mut self, steps: u32) {
        if self.frame_count > 0 {
            self.current = (self.current + steps as usize) % self.frame_count;
        }
    }

    /// Edge-detects pointer containment reported by the frame loop.
    pub fn set_hovering(&mut self, hovering: bool, mode: ViewportMode, now: Instant) {
        if hovering == self.hovering {
            return;
        }
        if hovering {
            self.pointer_enter(mode, now);
        } else {
            self.pointer_leave(mode);
        }
    }

    /// Hover is recorded in both modes so a later mode switch can consult
    /// it; the rotation timer only starts in wide mode.
    pub fn pointer_enter(&mut self, mode: ViewportMode, now: Instant) {
        self.hovering = true;
        if mode == ViewportMode::Wide && self.rotates() && self.hover.is_none() {
            self.hover = Some(RepeatingTimer::start(now, HOVER_ROTATION_PERIOD));
        }
    }

    /// Cancels the hover timer unconditionally; in wide mode leaving always
    /// snaps back to the first frame.
    pub fn pointer_leave(&mut self, mode: ViewportMode) {
        self.hovering = false;
        self.hover = None;
        if mode == ViewportMode::Wide {
            self.current = 0;
        }
    }

    /// Reconciles timers with the viewport mode. Runs at startup and on
    /// every observed width change, with the mode recomputed from the
    /// instantaneous width; there is deliberately no debounce, so rapid
    /// oscillation across the breakpoint starts and stops timers each time.
    pub fn reconcile(&mut self, mode: ViewportMode, now: Instant) {
        if !self.rotates() {
            return;
        }
        match mode {
            ViewportMode::Compact => {
                // A resize can land mid-hover; the hover timer must not
                // survive into compact mode.
                self.hover = None;
                if self.autoplay.is_none() {
                    self.autoplay = Some(RepeatingTimer::start(now, AUTOPLAY_PERIOD));
                }
            }
            ViewportMode::Wide => {
                self.autoplay = None;
                if !self.hovering {
                    self.current = 0;
                }
            }
        }
    }

    /// Advances past due timer fires. Returns true when the active frame
    /// changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut fired = 0;
        if let Some(timer) = self.autoplay.as_mut() {
            fired += timer.poll(now);
        }
        if let Some(timer) = self.hover.as_mut() {
            fired += timer.poll(now);
        }
        self.advance(fired);
        fired > 0
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (&self.autoplay, &self.hover) {
            (Some(a), Some(h)) => Some(a.next_fire().min(h.next_fire())),
            (Some(a), None) => Some(a.next_fire()),
            (None, Some(h)) => Some(h.next_fire()),
            (None, None) => None,
        }
    }
}

/// The hero banner rotator: one unconditional repeating timer for the whole
/// app lifetime, insensitive to hover and viewport mode. Not constructed at
/// all for fewer than two slides.
#[derive(Debug, Clone)]
pub struct HeroRotator {
    slide_count: usize,
    index: usize,
    timer: RepeatingTimer,
}

impl HeroRotator {
    pub fn new(slide_count: usize, now: Instant) -> Option<Self> {
        if slide_count < 2 {
            return None;
        }
        Some(Self {
            slide_count,
            index: 0,
            timer: RepeatingTimer::start(now, HERO_ROTATION_PERIOD),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        let fired = self.timer.poll(now);
        self.index = (self.index + fired as usize) % self.slide_count;
        fired > 0
    }

    pub fn next_deadline(&self) -> Instant {
        self.timer.next_fire()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> Instant {
        Instant::now()
    }

    fn assert_single_timer_class(state: &CarouselState) {
        assert!(
            !(state.has_autoplay_timer() && state.has_hover_timer()),
            "autoplay and hover timers must never be live together"
        );
    }

    #[test]
    fn breakpoint_is_exclusive_on_the_wide_side() {
        assert_eq!(ViewportMode::from_width(500.0), ViewportMode::Compact);
        assert_eq!(ViewportMode::from_width(768.0), ViewportMode::Compact);
        assert_eq!(ViewportMode::from_width(768.1), ViewportMode::Wide);
        assert_eq!(ViewportMode::from_width(1024.0), ViewportMode::Wide);
    }

    #[test]
    fn new_state_shows_the_first_frame_with_no_timers() {
        let state = CarouselState::new(4);
        assert_eq!(state.current(), 0);
        assert!(!state.has_autoplay_timer());
        assert!(!state.has_hover_timer());
        assert!(!state.is_hovering());
    }

    #[test]
    fn single_frame_card_never_starts_timers() {
        let now = t0();
        let mut state = CarouselState::new(1);

        state.reconcile(ViewportMode::Compact, now);
        assert!(!state.has_autoplay_timer());

        state.pointer_enter(ViewportMode::Wide, now);
        assert!(state.is_hovering());
        assert!(!state.has_hover_timer());

        state.reconcile(ViewportMode::Wide, now);
        assert_eq!(state.current(), 0);
    }

    #[test]
    fn compact_reconcile_starts_autoplay_exactly_once() {
        let now = t0();
        let mut state = CarouselState::new(3);

        state.reconcile(ViewportMode::Compact, now);
        let deadline = state.next_deadline().expect("autoplay deadline");

        // A second reconcile (another resize within compact mode) must not
        // restart the timer.
        state.reconcile(ViewportMode::Compact, now + Duration::from_millis(100));
        assert_eq!(state.next_deadline(), Some(deadline));
        assert_single_timer_class(&state);
    }

    #[test]
    fn autoplay_ticks_advance_and_wrap() {
        let now = t0();
        let mut state = CarouselState::new(3);
        state.reconcile(ViewportMode::Compact, now);

        assert!(!state.poll(now + AUTOPLAY_PERIOD - Duration::from_millis(1)));
        assert_eq!(state.current(), 0);

        assert!(state.poll(now + AUTOPLAY_PERIOD));
        assert_eq!(state.current(), 1);

        assert!(state.poll(now + AUTOPLAY_PERIOD * 3));
        assert_eq!(state.current(), 0, "three periods wrap a 3-frame carousel");
    }

    #[test]
    fn hover_enter_starts_rotation_in_wide_mode_only() {
        let now = t0();

        let mut wide = CarouselState::new(3);
        wide.pointer_enter(ViewportMode::Wide, now);
        assert!(wide.has_hover_timer());

        let mut compact = CarouselState::new(3);
        compact.pointer_enter(ViewportMode::Compact, now);
        assert!(compact.is_hovering(), "hover is recorded in compact mode");
        assert!(!compact.has_hover_timer(), "but starts no timer");
    }

    #[test]
    fn hover_rotation_fires_every_800ms() {
        let now = t0();
        let mut state = CarouselState::new(4);
        state.pointer_enter(ViewportMode::Wide, now);

        assert!(!state.poll(now + Duration::from_millis(799)));
        assert!(state.poll(now + Duration::from_millis(800)));
        assert_eq!(state.current(), 1);

        assert!(state.poll(now + Duration::from_millis(2400)));
        assert_eq!(state.current(), 3);
    }

    #[test]
    fn repeated_enter_does_not_restart_the_hover_timer() {
        let now = t0();
        let mut state = CarouselState::new(3);
        state.pointer_enter(ViewportMode::Wide, now);
        let deadline = state.next_deadline();

        state.pointer_enter(ViewportMode::Wide, now + Duration::from_millis(500));
        assert_eq!(state.next_deadline(), deadline);
    }

    #[test]
    fn hover_leave_cancels_the_timer_and_resets_to_the_first_frame() {
        let now = t0();
        let mut state = CarouselState::new(3);
        state.pointer_enter(ViewportMode::Wide, now);
        state.poll(now + Duration::from_millis(1600));
        assert_eq!(state.current(), 2);

        state.pointer_leave(ViewportMode::Wide);
        assert!(!state.has_hover_timer());
        assert!(!state.is_hovering());
        assert_eq!(state.current(), 0, "leaving always shows the first frame");
    }

    #[test]
    fn hover_leave_in_compact_mode_does_not_reset_the_index() {
        let now = t0();
        let mut state = CarouselState::new(3);
        state.reconcile(ViewportMode::Compact, now);
        state.pointer_enter(ViewportMode::Compact, now);
        state.poll(now + AUTOPLAY_PERIOD);
        assert_eq!(state.current(), 1);

        state.pointer_leave(ViewportMode::Compact);
        assert_eq!(state.current(), 1);
        assert!(state.has_autoplay_timer(), "autoplay keeps running");
    }

    #[test]
    fn resize_to_compact_mid_hover_swaps_the_timer_class() {
        let now = t0();
        let mut state = CarouselState::new(3);

        // Wide viewport, pointer over the card, hover rotation running.
        state.reconcile(ViewportMode::Wide, now);
        state.pointer_enter(ViewportMode::Wide, now);
        assert!(state.has_hover_timer());

        // Window narrows to 500: hover timer cancelled, autoplay started,
        // hover containment still recorded.
        state.reconcile(ViewportMode::Compact, now + Duration::from_millis(100));
        assert!(!state.has_hover_timer());
        assert!(state.has_autoplay_timer());
        assert!(state.is_hovering());
        assert_single_timer_class(&state);

        // Pointer containment produces no further effect in compact mode.
        state.set_hovering(true, ViewportMode::Compact, now + Duration::from_millis(200));
        assert!(!state.has_hover_timer());
    }

    #[test]
    fn resize_back_to_wide_without_hover_resets_to_the_first_frame() {
        let now = t0();
        let mut state = CarouselState::new(3);
        state.reconcile(ViewportMode::Compact, now);
        state.poll(now + AUTOPLAY_PERIOD * 2);
        assert_eq!(state.current(), 2);

        state.reconcile(ViewportMode::Wide, now + AUTOPLAY_PERIOD * 2);
        assert!(!state.has_autoplay_timer());
        assert!(!state.has_hover_timer());
        assert_eq!(state.current(), 0);
    }

    #[test]
    fn resize_back_to_wide_while_hovered_keeps_the_index() {
        let now = t0();
        let mut state = CarouselState::new(3);
        state.reconcile(ViewportMode::Compact, now);
        state.pointer_enter(ViewportMode::Compact, now);
        state.poll(now + AUTOPLAY_PERIOD);
        assert_eq!(state.current(), 1);

        // Still hovered when the viewport widens: autoplay stops, the index
        // stays, and no hover timer starts until the next pointer enter.
        state.reconcile(ViewportMode::Wide, now + AUTOPLAY_PERIOD);
        assert!(!state.has_autoplay_timer());
        assert!(!state.has_hover_timer());
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn reconcile_runs_on_every_qualifying_resize_without_rate_limiting() {
        let now = t0();
        let mut state = CarouselState::new(3);

        // Rapid oscillation across the breakpoint: each call takes effect.
        for step in 0..6 {
            let at = now + Duration::from_millis(step * 10);
            if step % 2 == 0 {
                state.reconcile(ViewportMode::Compact, at);
                assert!(state.has_autoplay_timer());
            } else {
                state.reconcile(ViewportMode::Wide, at);
                assert!(!state.has_autoplay_timer());
            }
            assert_single_timer_class(&state);
        }
    }

    #[test]
    fn current_index_stays_in_range_through_arbitrary_sequences() {
        let now = t0();
        let mut state = CarouselState::new(4);
        let steps: &[(u64, ViewportMode, bool)] = &[
            (0, ViewportMode::Wide, true),
            (900, ViewportMode::Wide, true),
            (1000, ViewportMode::Compact, true),
            (4000, ViewportMode::Compact, false),
            (6000, ViewportMode::Wide, false),
            (6100, ViewportMode::Wide, true),
            (9000, ViewportMode::Wide, false),
        ];
        for &(offset, mode, hovering) in steps {
            let at = now + Duration::from_millis(offset);
            state.reconcile(mode, at);
            state.set_hovering(hovering, mode, at);
            state.poll(at);
            assert!(state.current() < state.frame_count());
            assert_single_timer_class(&state);
        }
    }

    #[test]
    fn timer_poll_catches_up_after_a_stall() {
        let now = t0();
        let mut timer = RepeatingTimer::start(now, Duration::from_millis(800));
        assert_eq!(timer.poll(now + Duration::from_millis(3300)), 4);
        assert_eq!(timer.poll(now + Duration::from_millis(3300)), 0);
    }

    #[test]
    fn hero_rotator_wraps_after_a_full_cycle() {
        let now = t0();
        let mut hero = HeroRotator::new(3, now).expect("rotator");
        assert_eq!(hero.index(), 0);

        assert!(hero.poll(now + HERO_ROTATION_PERIOD));
        assert_eq!(hero.index(), 1);
        hero.poll(now + HERO_ROTATION_PERIOD * 2);
        assert_eq!(hero.index(), 2);
        hero.poll(now + HERO_ROTATION_PERIOD * 3);
        assert_eq!(hero.index(), 0, "three ticks return a 3-slide hero to 0");
    }

    #[test]
    fn hero_rotator_requires_at_least_two_slides() {
        let now = t0();
        assert!(HeroRotator::new(0, now).is_none());
        assert!(HeroRotator::new(1, now).is_none());
        assert!(HeroRotator::new(2, now).is_some());
    }
}
