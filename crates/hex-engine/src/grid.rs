//! Hex grid generation: complete cell coverings of a bounding box.

use std::collections::BTreeSet;

use atlas_common::{AtlasError, AtlasResult, CellResolution, GeoBounds};
use atlas_protocol::Ring;
use geo_types::{Coord, LineString, Polygon};
use h3o::geom::{ContainmentMode, PolyfillConfig, ToCells};
use h3o::{CellIndex, LatLng};

/// Fallback sample spacing as a fraction of the resolution's approximate
/// edge length. 40% oversamples enough that no cell is skipped regardless of
/// hex orientation. Empirically tuned; kept as a named constant rather than
/// buried in the loop.
pub const DENSE_GRID_STEP_FRACTION: f64 = 0.4;

/// Generate the set of cells covering `bounds` at `resolution`.
///
/// `buffer_fraction` expands the box outward by that fraction of each span
/// before generation (0.0 for none), so adjacent viewport tiles overlap
/// seamlessly while panning. Latitude is clamped to [-90, 90].
///
/// The primary strategy tessellates the closed bbox ring exactly; if the
/// geometry is rejected, generation degrades to dense-grid sampling. Output
/// is deduplicated and sorted, so responses are deterministic.
pub fn generate_cells(
    bounds: &GeoBounds,
    resolution: CellResolution,
    buffer_fraction: f64,
) -> AtlasResult<Vec<CellIndex>> {
    let expanded = bounds.buffered(buffer_fraction);

    match polygon_tessellation(&expanded, resolution) {
        Ok(cells) => Ok(cells),
        Err(err) => {
            tracing::warn!(
                error = %err,
                "polygon tessellation failed, falling back to dense-grid sampling"
            );
            dense_grid_sampling(&expanded, resolution)
        }
    }
}

/// Exact polygon-to-cells tessellation of the bbox ring.
///
/// Covering containment: every point of the box falls inside at least one
/// returned cell, which is the gap-free guarantee the callers rely on.
fn polygon_tessellation(
    bounds: &GeoBounds,
    resolution: CellResolution,
) -> Result<Vec<CellIndex>, h3o::error::InvalidGeometry> {
    let mut ring: Vec<Coord<f64>> = bounds
        .corners()
        .iter()
        .map(|&(lon, lat)| Coord { x: lon, y: lat })
        .collect();
    // Explicitly close the ring: four corners, first repeated last.
    ring.push(ring[0]);

    let polygon = Polygon::new(LineString::new(ring), vec![]);
    let shape = h3o::geom::Polygon::from_degrees(polygon)?;

    let config = PolyfillConfig::new(resolution.to_h3()).containment_mode(ContainmentMode::Covers);
    let cells: BTreeSet<CellIndex> = shape.to_cells(config).collect();
    Ok(cells.into_iter().collect())
}

/// Dense-grid fallback: step across the box in both dimensions, snapping
/// each sample point to its containing cell. Oversampling at
/// [`DENSE_GRID_STEP_FRACTION`] of the edge length keeps the covering
/// gap-free; the set deduplicates.
fn dense_grid_sampling(
    bounds: &GeoBounds,
    resolution: CellResolution,
) -> AtlasResult<Vec<CellIndex>> {
    let step = resolution.edge_length_deg() * DENSE_GRID_STEP_FRACTION;
    let mut cells = BTreeSet::new();

    let mut lat = bounds.south;
    while lat <= bounds.north {
        let mut lon = bounds.west;
        while lon <= bounds.east {
            let point = LatLng::new(lat, lon)
                .map_err(|e| AtlasError::Internal(format!("invalid sample point: {e}")))?;
            cells.insert(point.to_cell(resolution.to_h3()));
            lon += step;
        }
        lat += step;
    }

    Ok(cells.into_iter().collect())
}

/// Cell boundary as a closed GeoJSON ring: [lon, lat] vertex pairs with the
/// first vertex repeated at the end. H3 reports boundaries as (lat, lon);
/// the swap here is the only place it happens.
pub fn cell_ring(cell: CellIndex) -> Ring {
    let boundary = cell.boundary();
    let mut ring: Ring = boundary.iter().map(|v| [v.lng(), v.lat()]).collect();
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}

/// Cell center as (lat, lon) degrees.
pub fn cell_center(cell: CellIndex) -> (f64, f64) {
    let center = LatLng::from(cell);
    (center.lat(), center.lng())
}
