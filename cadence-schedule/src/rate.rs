// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Conversion between bandwidth demand and injection delay.
//!
//! The simulator sets an injection rate by fixing the message size and the
//! delay between successive messages, so a demand fraction is turned into
//! a delay by inverting the base (line-rate) delay.

use crate::config::LinkModel;

/// Substitute for a literal zero demand before inversion.
///
/// A zero demand has no finite delay. 0.001% of link bandwidth yields a
/// delay five orders of magnitude above line rate, which is effectively
/// idle next to any configured rate. This is a deliberate approximation.
pub const ZERO_DEMAND_EPSILON: f64 = 0.001;

/// Number of fractional digits kept in emitted delays.
pub const DELAY_PRECISION_DIGITS: u32 = 6;

fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(DELAY_PRECISION_DIGITS as i32);
    (value * scale).round() / scale
}

/// Injection delay for a demand given in percent of link bandwidth.
///
/// Strictly positive and finite for any legal demand, and strictly
/// decreasing in `demand_percent`.
#[must_use]
pub fn delay_for_demand(link: &LinkModel, demand_percent: f64) -> f64 {
    let demand_percent = if demand_percent == 0.0 {
        ZERO_DEMAND_EPSILON
    } else {
        demand_percent
    };
    round_to_precision(link.base_rate() * 100.0 / demand_percent)
}

/// Inverse of [`delay_for_demand`], up to the emitted rounding precision.
#[must_use]
pub fn demand_for_delay(link: &LinkModel, delay: f64) -> f64 {
    link.base_rate() * 100.0 / delay
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn monotonically_decreasing() {
        let link = LinkModel::default();
        let demands = [0.5, 1.0, 5.0, 10.0, 15.0, 25.0, 50.0, 100.0];
        for pair in demands.windows(2) {
            assert!(delay_for_demand(&link, pair[0]) > delay_for_demand(&link, pair[1]));
        }
    }

    #[test]
    fn zero_demand_is_finite_and_idle() {
        let link = LinkModel::default();
        let idle = delay_for_demand(&link, 0.0);
        assert!(idle.is_finite());
        assert!(idle > 0.0);
        assert!(idle > delay_for_demand(&link, 1.0));
    }

    #[test]
    fn full_demand_is_base_rate() {
        let link = LinkModel::default();
        assert_relative_eq!(delay_for_demand(&link, 100.0), 2.384186, epsilon = 1e-6);
    }

    #[test]
    fn rounded_to_six_digits() {
        let link = LinkModel::default();
        let delay = delay_for_demand(&link, 15.0);
        assert_relative_eq!(delay, 15.894572);
        assert_eq!(format!("{delay}"), "15.894572");
    }

    #[test]
    fn delay_inverts_back_to_demand() {
        let link = LinkModel::default();
        for demand in [1.0, 5.0, 15.0, 25.0, 99.0] {
            let recovered = demand_for_delay(&link, delay_for_demand(&link, demand));
            assert_relative_eq!(recovered, demand, epsilon = 1e-4);
        }
    }
}
