//! The [`Selector`] trait.

/// Weighted random selection over a fixed-size set of sites.
///
/// Weights are propensities: non-negative, finite floats. A weight of
/// zero means the site currently has no events and can never be sampled.
///
/// # Contract
///
/// - `fill` and `update` overwrite stored weights; `update` reads the
///   new weight for each listed site out of the full `table` slice,
///   matching the caller's propensity table layout.
/// - `sample` is deterministic given the supplied uniform draw; the
///   selector itself holds no generator state.
/// - Both `update` and `sample` must run in O(log n) for n stored sites.
pub trait Selector {
    /// Number of stored weights.
    fn len(&self) -> usize;

    /// Whether the selector stores no weights.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all stored weights.
    fn total(&self) -> f64;

    /// Overwrite every weight from `table` (`table.len() == self.len()`).
    fn fill(&mut self, table: &[f64]);

    /// Overwrite the weights of the listed sites from `table`.
    ///
    /// `table` is the full propensity table, indexed by site ordinal;
    /// only the entries named in `sites` are read.
    fn update(&mut self, sites: &[usize], table: &[f64]);

    /// Pick one site with probability proportional to its weight.
    ///
    /// `u` is a uniform draw in `[0, 1)`. Returns `None` when the total
    /// weight is zero (nothing can fire).
    fn sample(&self, u: f64) -> Option<usize>;
}
