//! Idle vertical float applied to ring items.

pub const ACTIVE_AMPLITUDE: f64 = 8.0;
pub const INACTIVE_AMPLITUDE: f64 = 4.0;
pub const ACTIVE_PERIOD: f64 = 4.0;
pub const INACTIVE_PERIOD: f64 = 5.0;
/// Start delay per item index (seconds).
pub const STAGGER: f64 = 0.2;

pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Vertical offset (negative is up) of item `index` after `elapsed` seconds.
/// Loops through `0 → -amplitude → 0` once per period.
pub fn offset(elapsed: f64, index: usize, active: bool) -> f64 {
    let (amplitude, period) = if active {
        (ACTIVE_AMPLITUDE, ACTIVE_PERIOD)
    } else {
        (INACTIVE_AMPLITUDE, INACTIVE_PERIOD)
    };

    let local = elapsed - index as f64 * STAGGER;
    if local <= 0.0 {
        return 0.0;
    }

    let phase = (local % period) / period;
    let lift = if phase < 0.5 {
        ease_in_out(phase * 2.0)
    } else {
        1.0 - ease_in_out((phase - 0.5) * 2.0)
    };
    -amplitude * lift
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_peak_at_half_period() {
        assert!(close(offset(2.0, 0, true), -ACTIVE_AMPLITUDE));
        assert!(close(offset(2.5, 0, false), -INACTIVE_AMPLITUDE));
    }

    #[test]
    fn test_loops() {
        assert!(close(offset(0.0, 0, true), 0.0));
        assert!(close(offset(4.0, 0, true), 0.0));
        assert!(close(offset(1.3, 0, true), offset(5.3, 0, true)));
    }

    #[test]
    fn test_stagger_by_index() {
        assert_eq!(offset(0.3, 2, false), 0.0);
        assert!(close(offset(2.4, 2, true), -ACTIVE_AMPLITUDE));
        assert!(!close(offset(1.0, 0, false), offset(1.0, 1, false)));
    }

    #[test]
    fn test_bounded() {
        for i in 0..200 {
            let y = offset(i as f64 * 0.07, i % 5, i % 2 == 0);
            assert!((-ACTIVE_AMPLITUDE..=0.0).contains(&y));
        }
    }
}
