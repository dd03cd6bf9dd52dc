//! Missing-data completeness policies.

use serde::{Deserialize, Serialize};

/// How the binder treats cells the reducer returned no value for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "policy")]
pub enum CompletenessPolicy {
    /// Drop cells with no data from the output.
    Exclude,

    /// Fill a missing cell with the mean of its already-resolved neighbors
    /// within `ring` grid distance. Gaps never interpolate from other gaps;
    /// a cell with zero resolved neighbors is still dropped.
    Interpolate { ring: u32 },
}

impl CompletenessPolicy {
    /// Ring distance used by interpolation unless a caller overrides it.
    /// Empirically tuned; kept configurable rather than hardcoded.
    pub const DEFAULT_INTERPOLATION_RING: u32 = 2;

    /// Interpolation at the default ring distance.
    pub fn interpolate() -> Self {
        CompletenessPolicy::Interpolate {
            ring: Self::DEFAULT_INTERPOLATION_RING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interpolation_ring() {
        assert_eq!(
            CompletenessPolicy::interpolate(),
            CompletenessPolicy::Interpolate { ring: 2 }
        );
    }
}
