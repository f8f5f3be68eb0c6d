//! Cursor blink state

use std::time::Duration;

/// Cursor blink phase. The host drives it by calling [`tick`](Self::tick)
/// from its own timer every [`interval`](Self::interval).
#[derive(Debug, Clone, Copy)]
pub struct BlinkTimer {
    interval: Option<Duration>,
    active: bool,
    visible: bool,
}

impl BlinkTimer {
    /// `interval` is half the flash cycle; `None` never blinks
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            active: false,
            visible: false,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Option<Duration>) {
        self.interval = interval;
        if interval.is_none() {
            self.active = false;
        }
    }

    /// Begin blinking from the visible phase. Without an interval the
    /// cursor just stays visible.
    pub fn start(&mut self) {
        self.active = self.interval.is_some();
        self.reset();
    }

    /// Stop blinking, leaving the cursor shown or hidden
    pub fn stop(&mut self, visible: bool) {
        self.active = false;
        self.visible = visible;
    }

    /// Restart the phase visible, after the cursor moved or text changed
    pub fn reset(&mut self) {
        self.visible = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip the phase. Returns true if the cursor needs a redraw.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.visible = !self.visible;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_SECOND: Duration = Duration::from_millis(500);

    #[test]
    fn test_inactive_timer_never_flips() {
        let mut timer = BlinkTimer::new(Some(HALF_SECOND));
        assert!(!timer.tick());
        assert!(!timer.is_visible());
    }

    #[test]
    fn test_tick_flips_visibility() {
        let mut timer = BlinkTimer::new(Some(HALF_SECOND));
        timer.start();
        assert!(timer.is_visible());
        assert!(timer.tick());
        assert!(!timer.is_visible());
        assert!(timer.tick());
        assert!(timer.is_visible());
    }

    #[test]
    fn test_reset_shows_cursor() {
        let mut timer = BlinkTimer::new(Some(HALF_SECOND));
        timer.start();
        timer.tick();
        timer.reset();
        assert!(timer.is_visible());
    }

    #[test]
    fn test_without_interval_stays_visible() {
        let mut timer = BlinkTimer::new(None);
        timer.start();
        assert!(!timer.is_active());
        assert!(timer.is_visible());
        assert!(!timer.tick());
    }
}
