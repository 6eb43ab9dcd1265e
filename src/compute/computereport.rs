use serde::Serialize;

use crate::compute::computerequest::ComputeRequest;
use crate::math::round::round;
use crate::quadrature::convergence::ConvergenceSeries;

/// Outcome of a [`ComputeRequest`]: the primary approximation, the
/// convergence series and, when available, the exact value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeReport {
    request: ComputeRequest,
    approximation: f64,
    series: ConvergenceSeries,
    exact: Option<f64>
}

impl ComputeReport {
    pub fn new(
        request: ComputeRequest,
        approximation: f64,
        series: ConvergenceSeries,
        exact: Option<f64>,
    ) -> ComputeReport {
        ComputeReport { request, approximation, series, exact }
    }

    pub fn request(&self) -> &ComputeRequest {
        &self.request
    }

    pub fn approximation(&self) -> f64 {
        self.approximation
    }

    pub fn series(&self) -> &ConvergenceSeries {
        &self.series
    }

    pub fn exact(&self) -> Option<f64> {
        self.exact
    }

    pub fn absolute_error(&self) -> Option<f64> {
        self.exact.map(|exact| (self.approximation - exact).abs())
    }

    /// Error of every series point against the exact value; empty when
    /// there is no exact value.
    pub fn series_errors(&self) -> Vec<(i64, f64)> {
        self.exact
            .map(|exact| self.series.errors_against(exact))
            .unwrap_or_default()
    }

    /// Copy of the report with every number rounded for display.
    pub fn rounded(&self, digits: u32) -> RoundedReport {
        RoundedReport {
            approximation: round(self.approximation, digits),
            exact: self.exact.map(|v| round(v, digits)),
            absolute_error: self.absolute_error().map(|v| round(v, digits)),
            series: self
                .series
                .iter()
                .map(|p| (p.subdivisions(), round(p.approximation(), digits)))
                .collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundedReport {
    pub approximation: f64,
    pub exact: Option<f64>,
    pub absolute_error: Option<f64>,
    pub series: Vec<(i64, f64)>
}
