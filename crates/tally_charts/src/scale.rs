//! Position scales
//!
//! [`LinearScale`] maps vote counts (or category indices) to pixels;
//! [`BandScale`] lays categories out as equal-width padded bands.

// Thresholds between the 1/2/5/10 step multipliers (sqrt 50, sqrt 10, sqrt 2).
const E10: f64 = 7.071_067_811_865_475;
const E5: f64 = 3.162_277_660_168_379_5;
const E2: f64 = 1.414_213_562_373_095_1;

/// Tick spacing for roughly `count` ticks over `[start, stop]`.
///
/// Always a power of ten times 1, 2, 5 or 10; zero for an empty or non-finite span.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if !(span.is_finite() && span > 0.0) {
        return 0.0;
    }
    let step = span / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    factor * 10f64.powf(power)
}

/// `i * step`, computed so that fractional steps land on exact decimals.
fn tick_value(i: i64, step: f64) -> f64 {
    if step < 1.0 {
        // Steps below one are 1/n for an integer n, so divide instead of multiplying.
        i as f64 / (1.0 / step).round()
    } else {
        i as f64 * step
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    pub fn new(domain_min: f32, domain_max: f32, range_min: f32, range_max: f32) -> Self {
        Self {
            domain_min,
            domain_max,
            range_min,
            range_max,
        }
    }

    pub fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    pub fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }

    pub fn with_domain(&self, domain_min: f32, domain_max: f32) -> Self {
        Self::new(domain_min, domain_max, self.range_min, self.range_max)
    }

    pub fn map(&self, value: f32) -> f32 {
        let d = self.domain_max - self.domain_min;
        if d.abs() < 1e-12 {
            return self.range_min;
        }
        let t = (value - self.domain_min) / d;
        self.range_min + t * (self.range_max - self.range_min)
    }

    pub fn invert(&self, px: f32) -> f32 {
        let r = self.range_max - self.range_min;
        if r.abs() < 1e-12 {
            return self.domain_min;
        }
        let t = (px - self.range_min) / r;
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Extend the domain outward to whole multiples of the tick step.
    pub fn nice(&self, count: usize) -> Self {
        let reversed = self.domain_max < self.domain_min;
        let (mut lo, mut hi) = if reversed {
            (f64::from(self.domain_max), f64::from(self.domain_min))
        } else {
            (f64::from(self.domain_min), f64::from(self.domain_max))
        };

        let mut prev = 0.0;
        for _ in 0..10 {
            let step = tick_step(lo, hi, count);
            if step == 0.0 || step == prev {
                break;
            }
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
            prev = step;
        }

        let (lo, hi) = (lo as f32, hi as f32);
        if reversed {
            self.with_domain(hi, lo)
        } else {
            self.with_domain(lo, hi)
        }
    }

    /// Step used by [`LinearScale::ticks`] for the same `count`.
    pub fn tick_step(&self, count: usize) -> f32 {
        tick_step(
            f64::from(self.domain_min),
            f64::from(self.domain_max),
            count,
        ) as f32
    }

    /// Round-valued ticks inside the domain, ascending.
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        let lo = f64::from(self.domain_min.min(self.domain_max));
        let hi = f64::from(self.domain_min.max(self.domain_max));
        if !(lo.is_finite() && hi.is_finite()) || count == 0 {
            return Vec::new();
        }
        let step = tick_step(lo, hi, count);
        if step == 0.0 {
            return vec![lo as f32];
        }
        let i0 = (lo / step).ceil() as i64;
        let i1 = (hi / step).floor() as i64;
        (i0..=i1).map(|i| tick_value(i, step) as f32).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f32,
    step: f32,
    band_width: f32,
}

impl BandScale {
    pub fn new(
        count: usize,
        range_min: f32,
        range_max: f32,
        padding_inner: f32,
        padding_outer: f32,
    ) -> Self {
        if count == 0 {
            return Self {
                count: 0,
                start: range_min,
                step: 0.0,
                band_width: 0.0,
            };
        }
        let count_f = count as f32;
        let span = (range_max - range_min).max(0.0);
        let denom = (count_f - padding_inner + 2.0 * padding_outer).max(1.0);
        let step = span / denom;
        let band_width = step * (1.0 - padding_inner).max(0.0);
        let start = range_min + step * padding_outer;
        Self {
            count,
            start,
            step,
            band_width,
        }
    }

    /// Band scale with the same inner and outer padding.
    pub fn padded(count: usize, range_min: f32, range_max: f32, padding: f32) -> Self {
        Self::new(count, range_min, range_max, padding, padding)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Left edge of the first band.
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Distance between the left edges of adjacent bands.
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn band_width(&self) -> f32 {
        self.band_width
    }

    pub fn band_start(&self, idx: usize) -> Option<f32> {
        if idx >= self.count {
            return None;
        }
        Some(self.start + self.step * idx as f32)
    }

    pub fn center(&self, idx: usize) -> Option<f32> {
        self.band_start(idx).map(|x| x + self.band_width * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_step_uses_1_2_5_multipliers() {
        assert_eq!(tick_step(0.0, 150.0, 10), 20.0);
        assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_step(0.0, 60.0, 10), 5.0);
        assert_eq!(tick_step(0.0, 1.0, 10), 0.1);
        assert_eq!(tick_step(3.0, 3.0, 10), 0.0);
    }

    #[test]
    fn nice_rounds_upper_bound_to_step() {
        let s = LinearScale::new(0.0, 150.0, 440.0, 0.0).nice(10);
        assert_eq!(s.domain(), (0.0, 160.0));
        let s = LinearScale::new(0.0, 1.0, 440.0, 0.0).nice(10);
        assert_eq!(s.domain(), (0.0, 1.0));
        let s = LinearScale::new(0.0, 123_456.0, 1.0, 0.0).nice(10);
        assert_eq!(s.domain(), (0.0, 130_000.0));
    }

    #[test]
    fn nice_on_step_boundaries() {
        // One pass: step 10 already fits the rounded bound.
        let s = LinearScale::new(0.0, 95.0, 440.0, 0.0).nice(10);
        assert_eq!(s.domain(), (0.0, 100.0));
        // Already nice.
        let s = LinearScale::new(0.0, 100.0, 440.0, 0.0).nice(10);
        assert_eq!(s.domain(), (0.0, 100.0));
        // Step grows from 5 to 10 after the first rounding, so a second pass applies.
        let s = LinearScale::new(0.0, 70.5, 440.0, 0.0).nice(10);
        assert_eq!(s.domain(), (0.0, 80.0));
        // Nicing a nice domain is a no-op.
        assert_eq!(s.nice(10).domain(), s.domain());
    }

    #[test]
    fn ticks_are_round_and_inside_domain() {
        let s = LinearScale::new(0.0, 60.0, 440.0, 0.0);
        let ticks = s.ticks(10);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&60.0));
        assert_eq!(ticks.len(), 13);

        let unit = LinearScale::new(0.0, 1.0, 440.0, 0.0).ticks(10);
        assert_eq!(unit.len(), 11);
        assert_eq!(unit[3], 0.3);
    }

    #[test]
    fn linear_maps_inverted_range() {
        let s = LinearScale::new(0.0, 100.0, 440.0, 0.0);
        assert_eq!(s.map(0.0), 440.0);
        assert_eq!(s.map(100.0), 0.0);
        assert!((s.invert(110.0) - 75.0).abs() < 1e-4);
    }

    #[test]
    fn band_scale_bounds_indices() {
        let b = BandScale::new(3, 0.0, 300.0, 0.1, 0.05);
        assert!(b.band_start(2).is_some());
        assert!(b.band_start(3).is_none());
    }

    #[test]
    fn padded_band_layout_matches_expected_geometry() {
        // step = 730 / (3 - 0.2 + 0.4)
        let b = BandScale::padded(3, 0.0, 730.0, 0.2);
        let step = 730.0 / 3.2;
        assert!((b.step() - step).abs() < 1e-3);
        assert!((b.start() - step * 0.2).abs() < 1e-3);
        assert!((b.band_width() - step * 0.8).abs() < 1e-3);
        let last_end = b.band_start(2).unwrap() + b.band_width();
        assert!((730.0 - last_end - step * 0.2).abs() < 1e-3);
    }

    #[test]
    fn band_scale_with_zero_count_has_no_band_width() {
        let b = BandScale::new(0, 0.0, 100.0, 0.1, 0.05);
        assert_eq!(b.band_width(), 0.0);
        assert!(b.band_start(0).is_none());
    }
}
