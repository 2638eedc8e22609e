//! Internal rate of return for realized withdrawal streams.
//!
//! A depleted path is summarized retroactively as the cash-flow stream
//! `[-initial_asset, w, w, ..., w]`: the initial outlay followed by one
//! fixed withdrawal per completed year. The IRR is the discount rate
//! zeroing the stream's net present value. Newton-Raphson runs first from a
//! flat guess; when it wanders out of the domain or stalls, a bracketing
//! bisection takes over. A stream with no withdrawals, or one whose NPV
//! never crosses zero, has no defined rate and reports `None`.

const MAX_NEWTON_STEPS: usize = 64;
const MAX_BISECTION_STEPS: usize = 128;
const RATE_TOLERANCE: f64 = 1e-9;
const NPV_TOLERANCE: f64 = 1e-6;
/// Rates at or below -100% are outside the economically meaningful domain.
const MIN_RATE: f64 = -0.999_999;
const MAX_RATE: f64 = 10.0;

/// Net present value of `cash_flows` at `rate`; flow 0 is undiscounted.
#[must_use]
pub fn net_present_value(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn npv_derivative(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cf)| -(t as f64) * cf / (1.0 + rate).powi(t as i32 + 1))
        .sum()
}

/// Solve for the rate that zeroes the net present value of `cash_flows`.
///
/// Returns `None` when the stream has fewer than two flows or no real root
/// exists in `(-1, 10]`.
#[must_use]
pub fn internal_rate_of_return(cash_flows: &[f64]) -> Option<f64> {
    if cash_flows.len() < 2 {
        return None;
    }
    newton(cash_flows).or_else(|| bisection(cash_flows))
}

/// IRR of a depleted path: one fixed withdrawal per completed year against
/// the initial outlay. Zero completed years means the stream is degenerate
/// and the rate is undefined.
#[must_use]
pub fn withdrawal_stream_irr(
    initial_asset: f64,
    annual_withdrawal: f64,
    completed_years: usize,
) -> Option<f64> {
    if completed_years == 0 {
        return None;
    }
    let mut cash_flows = Vec::with_capacity(completed_years + 1);
    cash_flows.push(-initial_asset);
    cash_flows.resize(completed_years + 1, annual_withdrawal);
    internal_rate_of_return(&cash_flows)
}

fn newton(cash_flows: &[f64]) -> Option<f64> {
    let mut rate = 0.1;
    for _ in 0..MAX_NEWTON_STEPS {
        let value = net_present_value(rate, cash_flows);
        let slope = npv_derivative(rate, cash_flows);
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }
        let next = rate - value / slope;
        if !next.is_finite() || next <= MIN_RATE {
            return None;
        }
        if (next - rate).abs() < RATE_TOLERANCE {
            let residual = net_present_value(next, cash_flows);
            return (residual.is_finite() && residual.abs() < NPV_TOLERANCE).then_some(next);
        }
        rate = next;
    }
    None
}

/// Bisection over `[MIN_RATE, MAX_RATE]`. Our withdrawal streams have one
/// sign change, so the NPV is monotone on the domain and a bracketed root
/// is unique.
fn bisection(cash_flows: &[f64]) -> Option<f64> {
    let mut lo = MIN_RATE;
    let mut hi = MAX_RATE;
    let npv_lo = net_present_value(lo, cash_flows);
    let npv_hi = net_present_value(hi, cash_flows);
    if npv_lo == 0.0 {
        return Some(lo);
    }
    if npv_hi == 0.0 {
        return Some(hi);
    }
    if (npv_lo > 0.0) == (npv_hi > 0.0) {
        return None;
    }

    for _ in 0..MAX_BISECTION_STEPS {
        let mid = (lo + hi) / 2.0;
        let value = net_present_value(mid, cash_flows);
        if value.abs() < NPV_TOLERANCE || (hi - lo) / 2.0 < RATE_TOLERANCE {
            return Some(mid);
        }
        if (value > 0.0) == (npv_lo > 0.0) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some((lo + hi) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flow_has_no_rate() {
        assert_eq!(internal_rate_of_return(&[-1000.0]), None);
        assert_eq!(internal_rate_of_return(&[]), None);
    }

    #[test]
    fn test_two_flow_stream_exact() {
        // -1000 + 400/(1+r) = 0  =>  r = -0.6
        let irr = internal_rate_of_return(&[-1000.0, 400.0]).unwrap();
        assert!((irr + 0.6).abs() < 1e-6, "got {irr}");
    }

    #[test]
    fn test_breakeven_stream() {
        // Two 500s repay 1000 exactly at a zero rate.
        let irr = internal_rate_of_return(&[-1000.0, 500.0, 500.0]).unwrap();
        assert!(irr.abs() < 1e-6, "got {irr}");
    }

    #[test]
    fn test_profitable_stream_is_positive() {
        let flows = [-1000.0, 600.0, 600.0];
        let irr = internal_rate_of_return(&flows).unwrap();
        assert!(irr > 0.13 && irr < 0.131, "got {irr}");
        assert!(net_present_value(irr, &flows).abs() < 1e-4);
    }

    #[test]
    fn test_no_sign_change_means_no_rate() {
        // All outflows: NPV is negative everywhere on the domain.
        assert_eq!(internal_rate_of_return(&[-10.0, -5.0]), None);
        assert_eq!(internal_rate_of_return(&[-10.0, 0.0]), None);
    }

    #[test]
    fn test_withdrawal_stream_annuity() {
        // Seven 200s against 1000: annuity factor 5, rate near 9.2%.
        let irr = withdrawal_stream_irr(1000.0, 200.0, 7).unwrap();
        assert!(irr > 0.09 && irr < 0.095, "got {irr}");
        let mut flows = vec![-1000.0];
        flows.resize(8, 200.0);
        assert!(net_present_value(irr, &flows).abs() < 1e-4);
    }

    #[test]
    fn test_withdrawal_stream_degenerate() {
        assert_eq!(withdrawal_stream_irr(1000.0, 40.0, 0), None);
    }
}
