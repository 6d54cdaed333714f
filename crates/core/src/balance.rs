use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::priority::{Priority, NUM_PRIORITIES};

/// Per-account quota remaining in each real priority band.
///
/// Balances are owned by the replenishment side of the scheduler; here they
/// are read-only input. Serialized as a plain list of floats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct Balance([f64; NUM_PRIORITIES]);

impl Balance {
    pub const fn new(values: [f64; NUM_PRIORITIES]) -> Self {
        Self(values)
    }

    /// Build a balance from a slice of any length: missing bands are zero,
    /// extra values are ignored.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut bands = [0.0; NUM_PRIORITIES];
        for (slot, v) in bands.iter_mut().zip(values) {
            *slot = *v;
        }
        Self(bands)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The best priority this balance can run at: the lowest band with a
    /// positive value, or [`Priority::FREE_BUCKET`] if there is none.
    pub fn best_priority(&self) -> Priority {
        self.0
            .iter()
            .position(|v| *v > 0.0)
            .map(|p| Priority::new(p as i32))
            .unwrap_or(Priority::FREE_BUCKET)
    }
}

impl Index<usize> for Balance {
    type Output = f64;

    fn index(&self, band: usize) -> &f64 {
        &self.0[band]
    }
}

impl From<Vec<f64>> for Balance {
    fn from(values: Vec<f64>) -> Self {
        Self::from_slice(&values)
    }
}

impl From<Balance> for Vec<f64> {
    fn from(balance: Balance) -> Self {
        balance.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_priority_picks_first_positive_band() {
        assert_eq!(Balance::new([1.0, 0.0, 0.0]).best_priority(), Priority::P0);
        assert_eq!(Balance::new([0.0, 2.5, 1.0]).best_priority(), Priority::P1);
        assert_eq!(Balance::new([-3.0, 0.0, 0.1]).best_priority(), Priority::P2);
    }

    #[test]
    fn best_priority_without_quota_is_free_bucket() {
        assert_eq!(Balance::default().best_priority(), Priority::FREE_BUCKET);
        assert_eq!(
            Balance::new([-1.0, 0.0, -0.5]).best_priority(),
            Priority::FREE_BUCKET
        );
        assert_eq!(
            Balance::new([f64::NAN, f64::NAN, 0.0]).best_priority(),
            Priority::FREE_BUCKET
        );
    }

    #[test]
    fn from_slice_pads_and_truncates() {
        assert_eq!(Balance::from_slice(&[2.0]), Balance::new([2.0, 0.0, 0.0]));
        assert_eq!(
            Balance::from_slice(&[1.0, 2.0, 3.0, 4.0]),
            Balance::new([1.0, 2.0, 3.0])
        );
        assert_eq!(Balance::from_slice(&[]), Balance::default());
    }

    #[test]
    fn deserializes_from_short_list() {
        let balance: Balance = serde_json::from_str("[0, 4.5]").unwrap();
        assert_eq!(balance[1], 4.5);
        assert_eq!(balance[2], 0.0);
        assert_eq!(serde_json::to_string(&balance).unwrap(), "[0.0,4.5,0.0]");
    }
}
