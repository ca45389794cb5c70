//! Maps smoothed spectrum magnitudes to bar heights.
//!
//! Raw magnitudes are dominated by the low end of the spectrum. Each bin is
//! multiplied by a compensation factor that rises across the band, then log-
//! and power-compressed so quiet and loud passages both stay readable.

use crate::config::BarConfig;
use crate::consts;

/// Compensation endpoints per quartile of the bin range, low to high.
const QUARTILE_COMPENSATION: [(f32, f32); 4] = [(0.01, 0.1), (0.1, 0.3), (0.3, 0.6), (0.5, 1.0)];

/// Bin whose compensation is pinned instead of interpolated.
const PINNED_BIN: usize = 3;
const PINNED_BIN_COMPENSATION: f32 = 0.015;

/// Per-bin frequency compensation for bin `index` of `bins`.
///
/// Linear interpolation inside each quartile of `[0, bins)`. Bin 3 always
/// gets 0.015 regardless of where it falls.
pub fn frequency_compensation(index: usize, bins: usize) -> f32 {
    if index == PINNED_BIN {
        return PINNED_BIN_COMPENSATION;
    }
    if bins == 0 {
        return QUARTILE_COMPENSATION[0].0;
    }

    let position = index as f32 * 4.0 / bins as f32;
    let quartile = (position.floor() as usize).min(3);
    let t = (position - quartile as f32).clamp(0.0, 1.0);
    let (from, to) = QUARTILE_COMPENSATION[quartile];
    from + (to - from) * t
}

/// Height of a single bin given its magnitude and compensation factor.
///
/// Natural log compression: `ln(1 + value * c * scale) ^ exponent`, clamped
/// to `[0.01, max_bar_height]`.
pub fn map_height(magnitude: f32, compensation: f32, config: &BarConfig) -> f32 {
    let gated = if magnitude < config.minimum_threshold {
        0.0
    } else {
        magnitude
    };

    let scaled = gated * compensation * config.scale_factor;
    let amplitude = if scaled > 0.0 { scaled.ln_1p() } else { 0.0 };
    let amplitude = amplitude.powf(config.exponent);

    let ceiling = config.max_bar_height.max(consts::MIN_BAR_HEIGHT);
    if amplitude.is_nan() {
        return consts::MIN_BAR_HEIGHT;
    }
    amplitude.clamp(consts::MIN_BAR_HEIGHT, ceiling)
}

/// Maps every bin of `spectrum` into `heights`.
pub fn map_heights(spectrum: &[f32], config: &BarConfig, heights: &mut [f32]) {
    let bins = spectrum.len();
    for (i, (height, &magnitude)) in heights.iter_mut().zip(spectrum).enumerate() {
        *height = map_height(magnitude, frequency_compensation(i, bins), config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BarConfig {
        BarConfig {
            minimum_threshold: 0.0,
            ..BarConfig::default()
        }
    }

    #[test]
    fn quartile_endpoints_for_64_bins() {
        assert!((frequency_compensation(0, 64) - 0.01).abs() < 1e-6);
        assert!((frequency_compensation(16, 64) - 0.1).abs() < 1e-6);
        assert!((frequency_compensation(32, 64) - 0.3).abs() < 1e-6);
        assert!((frequency_compensation(48, 64) - 0.5).abs() < 1e-6);
        // Last bin approaches but never reaches the top endpoint
        let last = frequency_compensation(63, 64);
        assert!(last > 0.95 && last < 1.0);
    }

    #[test]
    fn bin_three_is_pinned() {
        let interpolated = 0.01 + 0.09 * 3.0 / 16.0;
        assert!((frequency_compensation(3, 64) - 0.015).abs() < 1e-9);
        assert!((frequency_compensation(3, 64) - interpolated).abs() > 0.01);
        assert_eq!(frequency_compensation(3, 1024), 0.015);
    }

    #[test]
    fn compensation_rises_inside_quartiles_and_into_the_middle_band() {
        let bins = 64;
        let c: Vec<f32> = (0..bins).map(|i| frequency_compensation(i, bins)).collect();
        for i in 1..bins {
            if i == PINNED_BIN || i == PINNED_BIN + 1 || i == 48 {
                continue;
            }
            assert!(c[i] >= c[i - 1], "bin {i}: {} < {}", c[i], c[i - 1]);
        }
        // The top quartile restarts at 0.5, below the end of the third
        assert!(c[48] < c[47]);
    }

    #[test]
    fn pinned_bin_scales_a_small_magnitude() {
        let config = config();
        let expected = (0.02f32 * 0.015 * 50.0).ln_1p().powf(0.5);
        let height = map_height(0.02, frequency_compensation(3, 64), &config);
        assert!((height - expected).abs() < 1e-6);

        let mut spectrum = vec![0.0; 64];
        spectrum[3] = 0.02;
        let mut heights = vec![0.0; 64];
        map_heights(&spectrum, &config, &mut heights);
        assert!((heights[3] - expected).abs() < 1e-6);
    }

    #[test]
    fn uses_natural_log() {
        let mut config = config();
        config.exponent = 1.0;
        config.scale_factor = 1.0;
        config.max_bar_height = 50.0;
        // scaled = e - 1, so ln(1 + scaled) = 1 whereas log10 would give ~0.434
        let magnitude = std::f32::consts::E - 1.0;
        let height = map_height(magnitude, 1.0, &config);
        assert!((height - 1.0).abs() < 1e-5);
    }

    #[test]
    fn noise_gate_floors_quiet_bins() {
        let mut config = config();
        config.minimum_threshold = 0.01;
        assert_eq!(map_height(0.009, 1.0, &config), consts::MIN_BAR_HEIGHT);
        assert!(map_height(0.011, 1.0, &config) > consts::MIN_BAR_HEIGHT);
    }

    #[test]
    fn output_stays_within_bounds() {
        let config = BarConfig::default();
        let magnitudes = [0.0, 1e-9, 1e-4, 0.01, 0.1, 0.5, 1.0, 10.0, 1e6, f32::MAX];
        for bins in [8, 64, 256] {
            for &m in &magnitudes {
                let spectrum = vec![m; bins];
                let mut heights = vec![0.0; bins];
                map_heights(&spectrum, &config, &mut heights);
                for &h in &heights {
                    assert!(
                        (consts::MIN_BAR_HEIGHT..=config.max_bar_height).contains(&h),
                        "bins={bins} m={m} h={h}"
                    );
                }
            }
        }
    }
}
