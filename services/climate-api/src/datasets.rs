//! Dataset configurations.
//!
//! Each dataset is a thin [`DatasetSpec`]: the raster selection, the unit
//! conversion, and the completeness policy. Everything algorithmic lives in
//! the coverage engine; the tables and threshold ladders here are the whole
//! of what distinguishes one dataset endpoint from another.

use hex_engine::{CompletenessPolicy, DatasetSpec, RasterSelector};

/// Kelvin to Celsius offset.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Baseline temperature for anomaly calculation (1986-2005 average, °C).
pub const BASELINE_TEMP_C: f64 = 14.5;

/// Climate model used for projections.
pub const DEFAULT_MODEL: &str = "ACCESS-CM2";

/// Outward bounds buffering for datasets rendered as seamless panning
/// layers. Fraction of each viewport span.
const PANNING_BUFFER_FRACTION: f64 = 0.05;

/// Map an RCP scenario name to its SSP equivalent.
pub fn map_scenario(scenario: &str) -> Option<&'static str> {
    match scenario {
        "rcp26" => Some("ssp126"),
        "rcp45" => Some("ssp245"),
        "rcp85" => Some("ssp585"),
        _ => None,
    }
}

fn kelvin_to_anomaly_c(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET - BASELINE_TEMP_C
}

/// NASA NEX-GDDP-CMIP6 maximum-temperature projection for one year and
/// scenario. Values arrive in Kelvin and convert to anomaly °C against the
/// baseline. Cells without model coverage are excluded.
pub fn temperature_projection(year: i32, ssp_scenario: &str) -> DatasetSpec {
    DatasetSpec::new(
        "NASA NEX-GDDP-CMIP6",
        RasterSelector::new("NASA/GDDP-CMIP6", "tasmax")
            .at_scale_meters(27_830.0)
            .between(format!("{year}-01-01"), format!("{year}-12-31"))
            .filter("model", DEFAULT_MODEL)
            .filter("scenario", ssp_scenario),
    )
    .with_convert(kelvin_to_anomaly_c)
}

/// CHIRPS daily precipitation, averaged over the reference window, mm/day.
/// Missing cells (open water) are excluded, never interpolated.
pub fn precipitation() -> DatasetSpec {
    DatasetSpec::new(
        "CHIRPS Daily via analysis platform",
        RasterSelector::new("UCSB-CHG/CHIRPS/DAILY", "precipitation")
            .at_scale_meters(5000.0)
            .between("2020-01-01", "2023-12-31"),
    )
}

/// Yale YCEO nighttime surface urban heat island intensity (°C). The UHI
/// raster is sparse outside built-up areas, so gaps interpolate from
/// neighbors to keep the rendered surface continuous.
pub fn urban_heat_island() -> DatasetSpec {
    DatasetSpec::new(
        "Yale YCEO Urban Heat Island (Summer UHI v4)",
        RasterSelector::new("YALE/YCEO/UHI/Summer_UHI_yearly_pixel/v4", "Nighttime")
            .at_scale_meters(300.0),
    )
    .with_policy(CompletenessPolicy::interpolate())
    .with_buffer_fraction(PANNING_BUFFER_FRACTION)
}

/// GRACE liquid-water-equivalent thickness (cm) averaged over a date range.
/// Used twice per request (baseline and recent windows) to derive a trend.
pub fn groundwater_lwe(start: &str, end: &str) -> DatasetSpec {
    DatasetSpec::new(
        "NASA GRACE via analysis platform",
        RasterSelector::new("NASA/GRACE/MASS_GRIDS_V04/MASCON_CRI", "lwe_thickness")
            .at_scale_meters(111_320.0)
            .between(start, end),
    )
    .with_policy(CompletenessPolicy::interpolate())
    .with_buffer_fraction(PANNING_BUFFER_FRACTION)
}

/// GRACE baseline window: the start of the record.
pub const GRACE_BASELINE: (&str, &str) = ("2002-04-01", "2007-12-31");
/// GRACE recent window: the last five years of the record.
pub const GRACE_RECENT: (&str, &str) = ("2019-01-01", "2024-09-30");
/// Years between the midpoints of the two GRACE windows.
pub const GRACE_WINDOW_GAP_YEARS: f64 = 16.5;

/// NEX-GDDP-CMIP6 summer selector for one band (wet-bulb inputs).
pub fn cmip6_summer_band(band: &str, year: i32, ssp_scenario: &str) -> DatasetSpec {
    DatasetSpec::new(
        "NASA NEX-GDDP-CMIP6",
        RasterSelector::new("NASA/GDDP-CMIP6", band)
            .at_scale_meters(27_830.0)
            .between(format!("{year}-06-01"), format!("{year}-08-31"))
            .filter("scenario", ssp_scenario),
    )
}

// ============================================================================
// Classification ladders
// ============================================================================

/// Heat island intensity level.
pub fn classify_heat_island(intensity_c: f64) -> &'static str {
    if intensity_c < 0.5 {
        "none"
    } else if intensity_c < 1.5 {
        "low"
    } else if intensity_c < 3.0 {
        "moderate"
    } else if intensity_c < 4.5 {
        "high"
    } else {
        "extreme"
    }
}

/// Groundwater depletion status from the LWE trend in cm/year.
pub fn classify_depletion(trend_cm_per_year: f64) -> &'static str {
    if trend_cm_per_year < -2.0 {
        "severe_depletion"
    } else if trend_cm_per_year < -0.5 {
        "moderate_depletion"
    } else if trend_cm_per_year < 0.5 {
        "stable"
    } else {
        "recharge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_mapping() {
        assert_eq!(map_scenario("rcp26"), Some("ssp126"));
        assert_eq!(map_scenario("rcp45"), Some("ssp245"));
        assert_eq!(map_scenario("rcp85"), Some("ssp585"));
        assert_eq!(map_scenario("rcp60"), None);
    }

    #[test]
    fn test_kelvin_to_anomaly() {
        // 300.0 K = 26.85 °C = +12.35 °C over the 14.5 °C baseline.
        assert!((kelvin_to_anomaly_c(300.0) - 12.35).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_selector_carries_year_and_scenario() {
        let spec = temperature_projection(2050, "ssp245");
        assert_eq!(
            spec.selector.date_range,
            Some(("2050-01-01".to_string(), "2050-12-31".to_string()))
        );
        assert!(spec
            .selector
            .filters
            .contains(&("scenario".to_string(), "ssp245".to_string())));
        assert_eq!(spec.policy, CompletenessPolicy::Exclude);
    }

    #[test]
    fn test_interpolating_datasets() {
        assert_eq!(
            urban_heat_island().policy,
            CompletenessPolicy::Interpolate { ring: 2 }
        );
        assert_eq!(
            groundwater_lwe("2019-01-01", "2024-09-30").policy,
            CompletenessPolicy::Interpolate { ring: 2 }
        );
    }

    #[test]
    fn test_heat_island_ladder() {
        assert_eq!(classify_heat_island(0.2), "none");
        assert_eq!(classify_heat_island(1.0), "low");
        assert_eq!(classify_heat_island(2.0), "moderate");
        assert_eq!(classify_heat_island(4.0), "high");
        assert_eq!(classify_heat_island(6.0), "extreme");
    }

    #[test]
    fn test_depletion_ladder() {
        assert_eq!(classify_depletion(-3.0), "severe_depletion");
        assert_eq!(classify_depletion(-1.0), "moderate_depletion");
        assert_eq!(classify_depletion(0.0), "stable");
        assert_eq!(classify_depletion(1.0), "recharge");
    }
}
