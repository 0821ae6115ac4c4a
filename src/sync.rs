/// Media-time interval between persisted watch-position updates.
pub const POSITION_INTERVAL_SECS: u64 = 10;

/// Gate for throttled watch-position persistence.
///
/// Fires at most once per crossed 10-second boundary of media time. The
/// boundary last reported is tracked explicitly instead of testing
/// `floor(time) % 10 == 0` on each tick, which double-fires at sub-second
/// tick rates and skips boundaries entirely across a seek.
#[derive(Debug, Clone)]
pub struct PositionSync {
    last_boundary: u64,
}

impl Default for PositionSync {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSync {
    /// Position zero is known at source attach, so boundary 0 never fires.
    pub fn new() -> Self {
        Self { last_boundary: 0 }
    }

    /// Feed one time-update tick. Returns the whole-second position to
    /// persist when a new boundary has been crossed.
    pub fn on_tick(&mut self, time: f64) -> Option<u64> {
        if !time.is_finite() || time < 0.0 {
            return None;
        }
        let boundary = (time / POSITION_INTERVAL_SECS as f64).floor() as u64;
        if boundary == self.last_boundary {
            return None;
        }
        self.last_boundary = boundary;
        Some(time.floor() as u64)
    }

    /// Re-align to an externally moved position (seek, restart) without
    /// firing; the next natural boundary after the target reports again.
    pub fn resync(&mut self, time: f64) {
        if time.is_finite() && time >= 0.0 {
            self.last_boundary = (time / POSITION_INTERVAL_SECS as f64).floor() as u64;
        } else {
            self.last_boundary = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_boundary() {
        let mut sync = PositionSync::new();
        // 4Hz ticks through the first boundary
        assert_eq!(sync.on_tick(9.25), None);
        assert_eq!(sync.on_tick(9.5), None);
        assert_eq!(sync.on_tick(10.0), Some(10));
        assert_eq!(sync.on_tick(10.25), None);
        assert_eq!(sync.on_tick(10.75), None);
        assert_eq!(sync.on_tick(20.1), Some(20));
    }

    #[test]
    fn boundary_zero_never_fires() {
        let mut sync = PositionSync::new();
        assert_eq!(sync.on_tick(0.0), None);
        assert_eq!(sync.on_tick(0.5), None);
        assert_eq!(sync.on_tick(9.99), None);
    }

    #[test]
    fn seek_resync_suppresses_spurious_fire() {
        let mut sync = PositionSync::new();
        assert_eq!(sync.on_tick(10.0), Some(10));
        // seek forward to 47s; must not fire for the skipped boundaries
        sync.resync(47.0);
        assert_eq!(sync.on_tick(47.2), None);
        assert_eq!(sync.on_tick(50.0), Some(50));
    }

    #[test]
    fn backward_seek_reports_again() {
        let mut sync = PositionSync::new();
        assert_eq!(sync.on_tick(30.0), Some(30));
        sync.resync(5.0);
        assert_eq!(sync.on_tick(5.5), None);
        assert_eq!(sync.on_tick(10.2), Some(10));
    }

    #[test]
    fn garbage_time_is_ignored() {
        let mut sync = PositionSync::new();
        assert_eq!(sync.on_tick(f64::NAN), None);
        assert_eq!(sync.on_tick(-3.0), None);
        assert_eq!(sync.on_tick(10.0), Some(10));
    }
}
