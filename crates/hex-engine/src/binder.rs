//! Cell data binding: batched reduction plus completeness policy.

use std::collections::HashMap;

use metrics::counter;

use atlas_common::{AtlasError, AtlasResult, ReducerError};
use atlas_protocol::Ring;
use h3o::CellIndex;

use crate::grid::cell_ring;
use crate::policy::CompletenessPolicy;
use crate::reducer::{RasterSelector, RegionReducer};

/// A cell with its resolved (and unit-converted) value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundCell {
    pub cell: CellIndex,
    pub value: f64,
    /// True when the value was filled from neighbors rather than reduced.
    pub interpolated: bool,
}

/// Result of binding a generated cell set.
#[derive(Debug, Clone, PartialEq)]
pub struct BindOutcome {
    /// Cells that made it into the output, in generation order.
    pub cells: Vec<BoundCell>,
    /// Number of cells the reducer was asked about.
    pub generated: usize,
    /// Number of cells the reducer returned no data for.
    pub missing: usize,
}

/// Resolve a value for every cell through one batched reducer call, then
/// apply the completeness policy.
///
/// Two-pass: all present cells resolve first (through `convert`, if any),
/// then under [`CompletenessPolicy::Interpolate`] each gap is filled with
/// the mean of its already-resolved ring neighbors. Gaps never interpolate
/// from other gaps; a gap with zero resolved neighbors is dropped.
///
/// Fails with [`AtlasError::NoDataInRegion`] when the reducer answered but
/// not a single cell resolved (e.g. a pure-ocean viewport), so callers can
/// tell that apart from a reducer failure.
pub async fn bind(
    cells: &[CellIndex],
    reducer: &dyn RegionReducer,
    selector: &RasterSelector,
    policy: CompletenessPolicy,
    convert: Option<fn(f64) -> f64>,
) -> AtlasResult<BindOutcome> {
    let regions: Vec<Ring> = cells.iter().map(|&cell| cell_ring(cell)).collect();
    let raw = reducer.reduce_mean(&regions, selector).await?;

    if raw.len() != cells.len() {
        return Err(AtlasError::Reducer(ReducerError::MalformedResponse(
            format!("expected {} values, got {}", cells.len(), raw.len()),
        )));
    }

    // First pass: resolve everything the reducer answered for.
    let mut resolved: HashMap<CellIndex, f64> = HashMap::with_capacity(cells.len());
    for (&cell, value) in cells.iter().zip(&raw) {
        if let Some(v) = value {
            let v = convert.map_or(*v, |f| f(*v));
            resolved.insert(cell, v);
        }
    }

    let missing = cells.len() - resolved.len();
    if resolved.is_empty() {
        return Err(AtlasError::NoDataInRegion);
    }

    // Report the gap total once per call, never per cell.
    if missing > 0 {
        tracing::info!(
            missing,
            generated = cells.len(),
            policy = ?policy,
            "cells with no reducer data"
        );
        counter!("hex_cells_missing_total").increment(missing as u64);
    }

    // Second pass: emit in generation order, filling gaps where the policy
    // allows, from the resolved set only.
    let mut out = Vec::with_capacity(cells.len());
    for &cell in cells {
        if let Some(&value) = resolved.get(&cell) {
            out.push(BoundCell {
                cell,
                value,
                interpolated: false,
            });
            continue;
        }

        if let CompletenessPolicy::Interpolate { ring } = policy {
            let neighbors: Vec<CellIndex> = cell.grid_disk(ring);
            let values: Vec<f64> = neighbors
                .iter()
                .filter(|&&n| n != cell)
                .filter_map(|n| resolved.get(n))
                .copied()
                .collect();

            if !values.is_empty() {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                out.push(BoundCell {
                    cell,
                    value: mean,
                    interpolated: true,
                });
            }
        }
    }

    Ok(BindOutcome {
        cells: out,
        generated: cells.len(),
        missing,
    })
}
