//! Derived ratios over extracted metrics.
//!
//! Pure, stateless functions. A missing input always yields `None`, and the
//! division guards return `None` instead of producing infinite or undefined
//! values. `None` means "could not be computed", never zero.

use serde::{Deserialize, Serialize};

use crate::types::Metrics;

/// The derived ratios for one entity, each independently optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    /// Year-over-year revenue growth; see [`revenue_growth`].
    pub revenue_growth: Option<f64>,
    /// Net-income margin as a percentage; see [`gross_margin`].
    pub gross_margin: Option<f64>,
    /// Liabilities over derived equity; see [`debt_to_equity`].
    pub debt_to_equity: Option<f64>,
}

impl Ratios {
    /// Computes all ratios from a metric mapping.
    #[must_use]
    pub fn from_metrics(metrics: &Metrics) -> Self {
        Self {
            revenue_growth: revenue_growth(metrics),
            gross_margin: gross_margin(metrics),
            debt_to_equity: debt_to_equity(metrics),
        }
    }
}

/// Net income over revenue, as a percentage.
///
/// The extracted concept subset carries no cost-of-goods-sold figure, so net
/// income stands in for gross profit here: this is a net-income margin under
/// the historical `gross_margin` name, kept for output compatibility. Revenue
/// of exactly zero yields `None` rather than an infinite result.
#[must_use]
pub fn gross_margin(metrics: &Metrics) -> Option<f64> {
    let revenue = metrics.revenue?;
    let net_income = metrics.net_income?;
    if revenue == 0.0 {
        return None;
    }
    Some(net_income / revenue * 100.0)
}

/// Total liabilities over derived equity (assets minus liabilities).
///
/// Equity of exactly zero yields `None`.
#[must_use]
pub fn debt_to_equity(metrics: &Metrics) -> Option<f64> {
    let assets = metrics.total_assets?;
    let liabilities = metrics.total_liabilities?;
    let equity = assets - liabilities;
    if equity == 0.0 {
        return None;
    }
    Some(liabilities / equity)
}

/// Year-over-year revenue growth.
///
/// A single-snapshot metric mapping retains no prior-period revenue, so this
/// always returns `None` today. The operation exists so a multi-period
/// extension has a stable place to land; it must not fabricate a value.
#[must_use]
pub const fn revenue_growth(_metrics: &Metrics) -> Option<f64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(
        revenue: Option<f64>,
        net_income: Option<f64>,
        total_assets: Option<f64>,
        total_liabilities: Option<f64>,
    ) -> Metrics {
        Metrics {
            revenue,
            net_income,
            total_assets,
            total_liabilities,
        }
    }

    #[test]
    fn gross_margin_basic() {
        let m = metrics(Some(1000.0), Some(100.0), None, None);
        assert_eq!(gross_margin(&m), Some(10.0));
    }

    #[test]
    fn gross_margin_requires_both_inputs() {
        assert_eq!(gross_margin(&metrics(Some(1000.0), None, None, None)), None);
        assert_eq!(gross_margin(&metrics(None, Some(100.0), None, None)), None);
    }

    #[test]
    fn gross_margin_zero_revenue_guard() {
        let m = metrics(Some(0.0), Some(5.0), None, None);
        assert_eq!(gross_margin(&m), None);
    }

    #[test]
    fn gross_margin_negative_income() {
        let m = metrics(Some(1000.0), Some(-50.0), None, None);
        assert_eq!(gross_margin(&m), Some(-5.0));
    }

    #[test]
    fn debt_to_equity_basic() {
        let m = metrics(None, None, Some(300.0), Some(100.0));
        assert_eq!(debt_to_equity(&m), Some(0.5));
    }

    #[test]
    fn debt_to_equity_zero_equity_guard() {
        let m = metrics(None, None, Some(100.0), Some(100.0));
        assert_eq!(debt_to_equity(&m), None);
    }

    #[test]
    fn debt_to_equity_requires_both_inputs() {
        assert_eq!(debt_to_equity(&metrics(None, None, Some(100.0), None)), None);
        assert_eq!(debt_to_equity(&metrics(None, None, None, Some(100.0))), None);
    }

    #[test]
    fn debt_to_equity_zero_liabilities() {
        let m = metrics(None, None, Some(100.0), Some(0.0));
        assert_eq!(debt_to_equity(&m), Some(0.0));
    }

    #[test]
    fn revenue_growth_always_absent_for_single_snapshot() {
        let m = metrics(Some(1000.0), Some(100.0), Some(300.0), Some(100.0));
        assert_eq!(revenue_growth(&m), None);
    }

    #[test]
    fn ratios_from_metrics_combines_all() {
        let m = metrics(Some(1000.0), Some(100.0), Some(300.0), Some(100.0));
        let ratios = Ratios::from_metrics(&m);
        assert_eq!(ratios.gross_margin, Some(10.0));
        assert_eq!(ratios.debt_to_equity, Some(0.5));
        assert_eq!(ratios.revenue_growth, None);
    }
}
