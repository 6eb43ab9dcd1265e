use log::debug;
use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;

use crate::integrand::integrand::{
    Integrand,
    IntegrandError
};
use crate::quadrature::midpointrule::evaluate;

// ─────────────────────────────────────────────────────────────────────────────
// ConvergenceLadder
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_LADDER: [i64; 7] = [10, 20, 50, 100, 200, 500, 1000];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LadderError {
    #[error("convergence ladder is empty")]
    Empty,

    #[error("convergence ladder entry {0} is not positive")]
    NonPositive(i64),

    #[error("convergence ladder is not strictly ascending at {previous} -> {next}")]
    NotAscending { previous: i64, next: i64 },
}

/// Strictly ascending, positive subdivision counts sampled by
/// [`sample_convergence`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct ConvergenceLadder {
    counts: Vec<i64>,
}

impl ConvergenceLadder {
    pub fn new(counts: Vec<i64>) -> Result<ConvergenceLadder, LadderError> {
        if counts.is_empty() {
            return Err(LadderError::Empty);
        }
        if let Some(&bad) = counts.iter().find(|&&n| n <= 0) {
            return Err(LadderError::NonPositive(bad));
        }
        if let Some(pair) = counts.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(LadderError::NotAscending {
                previous: pair[0],
                next: pair[1],
            });
        }
        Ok(ConvergenceLadder { counts })
    }

    pub fn counts(&self) -> &[i64] {
        &self.counts
    }

    /// Entries not exceeding `max_n`, still ascending.
    pub fn up_to(&self, max_n: i64) -> impl Iterator<Item = i64> + '_ {
        self.counts.iter().copied().take_while(move |&n| n <= max_n)
    }
}

impl Default for ConvergenceLadder {
    fn default() -> Self {
        ConvergenceLadder { counts: DEFAULT_LADDER.to_vec() }
    }
}

impl TryFrom<Vec<i64>> for ConvergenceLadder {
    type Error = LadderError;

    fn try_from(counts: Vec<i64>) -> Result<Self, Self::Error> {
        ConvergenceLadder::new(counts)
    }
}

impl From<ConvergenceLadder> for Vec<i64> {
    fn from(ladder: ConvergenceLadder) -> Self {
        ladder.counts
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ConvergenceSeries
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergencePoint {
    subdivisions: i64,
    approximation: f64,
}

impl ConvergencePoint {
    pub fn new(subdivisions: i64, approximation: f64) -> ConvergencePoint {
        ConvergencePoint { subdivisions, approximation }
    }

    pub fn subdivisions(&self) -> i64 {
        self.subdivisions
    }

    pub fn approximation(&self) -> f64 {
        self.approximation
    }
}

/// Approximations at ascending subdivision counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConvergenceSeries {
    points: Vec<ConvergencePoint>,
}

impl ConvergenceSeries {
    pub fn points(&self) -> &[ConvergencePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConvergencePoint> {
        self.points.iter()
    }

    pub fn subdivisions(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.subdivisions).collect()
    }

    /// Absolute error of each approximation against `exact`.
    pub fn errors_against(&self, exact: f64) -> Vec<(i64, f64)> {
        self.points
            .iter()
            .map(|p| (p.subdivisions, (p.approximation - exact).abs()))
            .collect()
    }

    /// Empirical order of accuracy between consecutive points:
    ///
    ///   p_k = ln(e_k / e_{k+1}) / ln(n_{k+1} / n_k)
    ///
    /// About 2 for a smooth integrand. Pairs where either error is zero
    /// are skipped.
    pub fn observed_orders(&self, exact: f64) -> Vec<(i64, f64)> {
        let errors = self.errors_against(exact);
        errors
            .windows(2)
            .filter(|pair| pair[0].1 > 0.0 && pair[1].1 > 0.0)
            .map(|pair| {
                let (n0, e0) = pair[0];
                let (n1, e1) = pair[1];
                (n1, (e0 / e1).ln() / (n1 as f64 / n0 as f64).ln())
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ConvergenceSeries {
    type Item = &'a ConvergencePoint;
    type IntoIter = std::slice::Iter<'a, ConvergencePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sampler
// ─────────────────────────────────────────────────────────────────────────────

/// Runs the midpoint rule once per ladder entry not exceeding `max_n`.
///
/// Each entry is an independent full evaluation. An empty series is
/// returned when no entry qualifies.
pub fn sample_convergence<I>(
    f: &I,
    a: f64,
    b: f64,
    max_n: i64,
    ladder: &ConvergenceLadder,
) -> Result<ConvergenceSeries, IntegrandError>
where
    I: Integrand + ?Sized,
{
    let mut points = Vec::new();
    for n in ladder.up_to(max_n) {
        let approximation = evaluate(f, a, b, n)?;
        points.push(ConvergencePoint::new(n, approximation));
    }
    debug!("sampled {} convergence points up to n = {}", points.len(), max_n);
    Ok(ConvergenceSeries { points })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_rejects_invalid_entries() {
        assert_eq!(ConvergenceLadder::new(vec![]), Err(LadderError::Empty));
        assert_eq!(
            ConvergenceLadder::new(vec![10, 0, 20]),
            Err(LadderError::NonPositive(0))
        );
        assert_eq!(
            ConvergenceLadder::new(vec![10, 20, 20]),
            Err(LadderError::NotAscending { previous: 20, next: 20 })
        );
    }

    #[test]
    fn ladder_from_json() {
        let ladder: ConvergenceLadder = serde_json::from_str("[4, 8, 16]").unwrap();
        assert_eq!(ladder.counts(), &[4, 8, 16]);
        assert!(serde_json::from_str::<ConvergenceLadder>("[8, 4]").is_err());
    }

    #[test]
    fn up_to_is_inclusive() {
        let ladder = ConvergenceLadder::default();
        let kept: Vec<i64> = ladder.up_to(200).collect();
        assert_eq!(kept, vec![10, 20, 50, 100, 200]);
        assert_eq!(ladder.up_to(9).count(), 0);
    }

    #[test]
    fn observed_order_of_smooth_integrand_is_two() {
        let f = |x: f64| x.exp();
        let exact = 1.0_f64.exp() - 1.0;
        let ladder = ConvergenceLadder::new(vec![10, 20, 40, 80]).unwrap();
        let series = sample_convergence(&f, 0.0, 1.0, 80, &ladder).unwrap();
        for (_, order) in series.observed_orders(exact) {
            assert!((order - 2.0).abs() < 0.05, "order {}", order);
        }
    }
}
