//! Wet-bulb temperature via the Stull (2011) approximation.
//!
//! WBT = T·atan(0.151977·√(RH + 8.313659)) + atan(T + RH)
//!       − atan(RH − 1.676331) + 0.00391838·RH^1.5·atan(0.023101·RH)
//!       − 4.686035
//!
//! Valid for RH in 5-99% and T in -20-50 °C, which covers every viewport
//! this service answers for.

/// Wet-bulb temperature in °C from air temperature (°C) and relative
/// humidity (percent, 0-100).
pub fn stull_wet_bulb(temp_c: f64, rh_percent: f64) -> f64 {
    let t = temp_c;
    let rh = rh_percent;

    t * (0.151977 * (rh + 8.313659).sqrt()).atan() + (t + rh).atan() - (rh - 1.676331).atan()
        + 0.00391838 * rh.powf(1.5) * (0.023101 * rh).atan()
        - 4.686035
}

/// Wet-bulb danger level.
///
/// 35 °C is the survivability ceiling for sustained exposure; the lower
/// rungs follow the usual heat-stress guidance bands.
pub fn classify_danger(wet_bulb_c: f64) -> &'static str {
    if wet_bulb_c >= 35.0 {
        "extreme"
    } else if wet_bulb_c >= 32.0 {
        "very_high"
    } else if wet_bulb_c >= 28.0 {
        "high"
    } else if wet_bulb_c >= 24.0 {
        "moderate"
    } else {
        "low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stull_reference_point() {
        // Published worked example: T=20 °C, RH=50% -> Tw ≈ 13.7 °C.
        assert!((stull_wet_bulb(20.0, 50.0) - 13.7).abs() < 0.05);
    }

    #[test]
    fn test_wet_bulb_below_dry_bulb() {
        for &(t, rh) in &[(30.0, 40.0), (35.0, 60.0), (25.0, 90.0)] {
            assert!(stull_wet_bulb(t, rh) < t);
        }
    }

    #[test]
    fn test_saturated_air_converges_to_dry_bulb() {
        let t = 30.0;
        assert!((stull_wet_bulb(t, 99.0) - t).abs() < 1.0);
    }

    #[test]
    fn test_danger_ladder() {
        assert_eq!(classify_danger(20.0), "low");
        assert_eq!(classify_danger(25.0), "moderate");
        assert_eq!(classify_danger(30.0), "high");
        assert_eq!(classify_danger(33.0), "very_high");
        assert_eq!(classify_danger(36.0), "extreme");
    }
}
