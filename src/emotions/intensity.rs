//! Intensity Model: pure "current value + interaction → next value" rules.
//!
//! Two interaction modes coexist:
//! - click cycling on the primary wheel (default 60, +25 per repeat click,
//!   wrapping back to 30 once a step would pass 85);
//! - direct manipulation of a continuous control (clamp, then snap to step).

use serde::{Deserialize, Serialize};

/// Intensity assigned to a freshly chosen primary emotion.
pub const DEFAULT_INTENSITY: u8 = 60;
/// Increment applied by each repeat click on the selected emotion.
pub const CYCLE_STEP: u8 = 25;
/// Highest intensity the click cycle can produce.
pub const CYCLE_CEILING: u8 = 85;
/// Value the click cycle wraps to once a step would pass the ceiling.
pub const CYCLE_FLOOR: u8 = 30;

// ── Ranges ─────────────────────────────────────────────

/// Bounds and step of a continuous control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl IntensityRange {
    /// Primary/secondary emotion intensity: 0..=100 in steps of 5.
    pub const EMOTION: IntensityRange = IntensityRange {
        min: 0,
        max: 100,
        step: 5,
    };

    /// Energy level: -50..=50 in steps of 5.
    pub const ENERGY: IntensityRange = IntensityRange {
        min: -50,
        max: 50,
        step: 5,
    };

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Clamp `target` into range, then round to the nearest step counted from `min`.
    pub fn snap(&self, target: i32) -> i32 {
        let clamped = self.clamp(target);
        if self.step <= 1 {
            return clamped;
        }
        let offset = clamped - self.min;
        let steps = (offset + self.step / 2).div_euclid(self.step);
        self.clamp(self.min + steps * self.step)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

// ── Click cycling ──────────────────────────────────────

/// Next intensity after a repeat click on the already-selected emotion.
///
/// 60 → 85 → 30 → 55 → 80 → 30 → …
pub fn cycle_intensity(current: u8) -> u8 {
    let next = current.saturating_add(CYCLE_STEP);
    if next > CYCLE_CEILING {
        CYCLE_FLOOR
    } else {
        next
    }
}

/// Resolve the intensity emitted when `clicked` is activated while
/// `selected` (emotion, intensity) is the current selection.
///
/// Same category → cycle; anything else → [`DEFAULT_INTENSITY`].
pub fn next_on_click<E: PartialEq>(selected: Option<(&E, u8)>, clicked: &E) -> u8 {
    match selected {
        Some((emotion, intensity)) if emotion == clicked => cycle_intensity(intensity),
        _ => DEFAULT_INTENSITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cycle_follows_documented_sequence() {
        let mut value = DEFAULT_INTENSITY;
        let mut seen = vec![value];
        for _ in 0..6 {
            value = cycle_intensity(value);
            seen.push(value);
        }
        assert_eq!(seen, vec![60, 85, 30, 55, 80, 30, 55]);
    }

    #[test]
    fn cycle_wraps_values_above_ceiling() {
        assert_eq!(cycle_intensity(100), CYCLE_FLOOR);
        assert_eq!(cycle_intensity(255), CYCLE_FLOOR);
    }

    #[test]
    fn different_category_resets_to_default() {
        assert_eq!(next_on_click(Some((&"joy", 85)), &"fear"), 60);
        assert_eq!(next_on_click::<&str>(None, &"fear"), 60);
        assert_eq!(next_on_click(Some((&"joy", 85)), &"joy"), 30);
    }

    #[test]
    fn snap_rounds_to_nearest_step() {
        let r = IntensityRange::EMOTION;
        assert_eq!(r.snap(42), 40);
        assert_eq!(r.snap(43), 45);
        assert_eq!(r.snap(-7), 0);
        assert_eq!(r.snap(250), 100);

        let e = IntensityRange::ENERGY;
        assert_eq!(e.snap(-32), -30);
        assert_eq!(e.snap(-33), -35);
        assert_eq!(e.snap(-80), -50);
        assert_eq!(e.snap(30), 30);
    }

    proptest! {
        #[test]
        fn cycled_values_stay_in_band(start in CYCLE_FLOOR..=100u8) {
            let next = cycle_intensity(start);
            prop_assert!((CYCLE_FLOOR..=CYCLE_CEILING).contains(&next));
        }

        #[test]
        fn snapped_values_are_in_range_and_on_step(target in -1000i32..1000) {
            for range in [IntensityRange::EMOTION, IntensityRange::ENERGY] {
                let v = range.snap(target);
                prop_assert!(range.contains(v));
                prop_assert_eq!((v - range.min) % range.step, 0);
            }
        }
    }
}
