use crate::error::{LoanError, Result};
use log::{debug, trace};
use std::fmt;

/// One row of a differentiated repayment plan.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MonthlyPayment {
    pub month: u32,
    pub amount: f64,
}

impl MonthlyPayment {
    pub fn new(month: u32, amount: f64) -> Self {
        Self { month, amount }
    }
}

impl fmt::Display for MonthlyPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Month {}: payment is {}", self.month, self.amount)
    }
}

/// Converts an annual percentage (i.e., 7.8) to the nominal monthly rate
/// as a fraction.
pub fn nominal_interest_rate(annual_percent: f64) -> f64 {
    (annual_percent / 100.) / 12.
}

/// Fixed monthly payment that repays `principal` over `periods` months.
pub fn annuity_payment(principal: f64, periods: f64, rate: f64) -> f64 {
    if rate == 0. {
        return principal / periods;
    }
    let (factor, factor_m1) = growth_factor(periods, rate);
    (principal * rate * factor) / factor_m1
}

/// Principal that a fixed `payment` repays over `periods` months.
pub fn annuity_principal(payment: f64, periods: f64, rate: f64) -> f64 {
    if rate == 0. {
        return payment * periods;
    }
    let (factor, factor_m1) = growth_factor(periods, rate);
    payment / ((rate * factor) / factor_m1)
}

// (1+rate)^periods and (1+rate)^periods - 1, accurate for rates near zero
fn growth_factor(periods: f64, rate: f64) -> (f64, f64) {
    let factor_m1 = (periods * rate.ln_1p()).exp_m1();
    (factor_m1 + 1., factor_m1)
}

/// Number of months needed to repay `principal` with a fixed `payment`.
///
/// The payment has to exceed the first month's interest, otherwise the
/// balance never shrinks and the logarithm is undefined.
pub fn annuity_periods(payment: f64, principal: f64, rate: f64) -> Result<u32> {
    let first_interest = rate * principal;
    if payment <= first_interest {
        debug!(
            "payment {} does not cover first month interest {}",
            payment, first_interest
        );
        return Err(LoanError::InvalidParameters("payment does not cover interest"));
    }

    let months = if rate == 0. {
        principal / payment
    } else {
        -(-first_interest / payment).ln_1p() / rate.ln_1p()
    };
    trace!("exact term {} months", months);

    let months = months.ceil();
    if !months.is_finite() || months < 0. || months > u32::MAX as f64 {
        return Err(LoanError::InvalidParameters("term out of range"));
    }
    Ok(months as u32)
}

/// Payment due in `month` (1-based) of a differentiated loan, rounded up to
/// a whole currency unit.
pub fn differentiated_payment(month: u32, principal: f64, rate: f64, periods: f64) -> f64 {
    let repaid = principal * (f64::from(month) - 1.) / periods;
    (principal / periods + rate * (principal - repaid)).ceil()
}

/// Payments for every month of a differentiated loan.
pub fn differentiated_schedule(principal: f64, rate: f64, periods: f64) -> Vec<MonthlyPayment> {
    let last_month = periods.floor() as u32;
    let mut schedule = Vec::new();

    for month in 1..=last_month {
        let amount = differentiated_payment(month, principal, rate, periods);
        trace!("month {}, payment {}", month, amount);
        schedule.push(MonthlyPayment::new(month, amount));
    }
    schedule
}

pub fn overpayment(principal: f64, total_paid: f64) -> f64 {
    total_paid - principal
}

/// Renders a term in months as e.g. "2 years and 1 month". Zero parts are
/// left out; a zero term reads "0 months".
pub fn periods_to_human(total_months: u32) -> String {
    let years = total_months / 12;
    let months = total_months % 12;

    match (years, months) {
        (0, m) => plural(m, "month"),
        (y, 0) => plural(y, "year"),
        (y, m) => format!("{} and {}", plural(y, "year"), plural(m, "month")),
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        annuity_payment, annuity_periods, annuity_principal, differentiated_payment,
        differentiated_schedule, nominal_interest_rate, overpayment, periods_to_human,
        MonthlyPayment,
    };
    use crate::error::LoanError;
    use test_log::test;

    #[test]
    fn test_nominal_interest_rate() {
        assert_eq!(nominal_interest_rate(12.), 0.01);
        assert_eq!(nominal_interest_rate(0.), 0.);
        assert!((nominal_interest_rate(7.8) - 0.0065).abs() < 1e-12);
    }

    #[test]
    fn test_annuity_payment() {
        let rate = nominal_interest_rate(10.);
        let payment = annuity_payment(1000000., 60., rate);

        assert!((payment - 21247.0447).abs() < 1e-3);
        assert_eq!(payment.ceil(), 21248.);
    }

    #[test]
    fn test_annuity_principal() {
        let rate = nominal_interest_rate(5.6);
        let principal = annuity_principal(8722., 120., rate);

        assert_eq!(principal.trunc(), 800018.);
    }

    #[test]
    fn test_payment_and_principal_are_inverse() {
        for (principal, periods, interest) in [
            (1000000., 60., 10.),
            (500000., 8., 7.8),
            (250000., 360., 4.25),
            (1200., 12., 0.),
        ] {
            let rate = nominal_interest_rate(interest);
            let payment = annuity_payment(principal, periods, rate);
            let recovered = annuity_principal(payment, periods, rate);
            assert!(
                (recovered - principal).abs() < 1e-4,
                "{} recovered as {}",
                principal,
                recovered
            );
        }
    }

    #[test]
    fn test_annuity_periods() {
        assert_eq!(annuity_periods(23000., 500000., nominal_interest_rate(7.8)), Ok(24));
        assert_eq!(annuity_periods(8722., 800018., nominal_interest_rate(5.6)), Ok(120));
        assert_eq!(annuity_periods(1000., 0., nominal_interest_rate(10.)), Ok(0));
    }

    #[test]
    fn test_tiny_interest_rates() {
        let rate = nominal_interest_rate(1e-12);
        assert!(rate > 0.);

        let payment = annuity_payment(1200., 12., rate);
        assert!((payment - 100.).abs() < 1e-9, "payment {}", payment);
        let principal = annuity_principal(100., 12., rate);
        assert!((principal - 1200.).abs() < 1e-6, "principal {}", principal);

        // the term has to be long enough to repay the whole principal
        let months = annuity_periods(1., 1e9, rate).unwrap();
        assert_eq!(months, 1000000417);
        assert!(f64::from(months) >= 1e9);
    }

    #[test]
    fn test_annuity_periods_without_interest() {
        assert_eq!(annuity_periods(100., 1050., 0.), Ok(11));
        assert_eq!(annuity_periods(100., 1000., 0.), Ok(10));
    }

    #[test]
    fn test_annuity_periods_never_repaid() {
        let rate = nominal_interest_rate(12.);

        // exactly the first month's interest
        assert_eq!(
            annuity_periods(1000., 100000., rate),
            Err(LoanError::InvalidParameters("payment does not cover interest"))
        );
        assert!(annuity_periods(500., 100000., rate).is_err());
        assert!(annuity_periods(0., 100., 0.).is_err());
    }

    #[test]
    fn test_differentiated_payment() {
        let rate = nominal_interest_rate(10.);

        assert_eq!(differentiated_payment(1, 1000000., rate, 10.), 108334.);
        assert_eq!(differentiated_payment(2, 1000000., rate, 10.), 107500.);
        assert_eq!(differentiated_payment(10, 1000000., rate, 10.), 100834.);
    }

    #[test]
    fn test_differentiated_payment_month_zero() {
        assert_eq!(differentiated_payment(0, 1000., 0., 10.), 100.);
        assert!(differentiated_payment(0, 1000., 0.01, 10.).is_finite());
    }

    #[test]
    fn test_differentiated_schedule() {
        let schedule = differentiated_schedule(500000., nominal_interest_rate(7.8), 8.);
        let amounts: Vec<f64> = schedule.iter().map(|p| p.amount).collect();

        assert_eq!(
            amounts,
            vec![65750., 65344., 64938., 64532., 64125., 63719., 63313., 62907.]
        );
        assert_eq!(schedule[0], MonthlyPayment::new(1, 65750.));
        assert_eq!(schedule[7].to_string(), "Month 8: payment is 62907");
    }

    #[test]
    fn test_differentiated_schedule_fractional_term() {
        let schedule = differentiated_schedule(1000., 0., 2.5);

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[1].month, 2);
    }

    #[test]
    fn test_overpayment() {
        assert_eq!(overpayment(500000., 552000.), 52000.);
        assert_eq!(overpayment(0., 0.), 0.);
        assert_eq!(overpayment(1000., 900.), -100.);
    }

    #[test]
    fn test_periods_to_human() {
        assert_eq!(periods_to_human(0), "0 months");
        assert_eq!(periods_to_human(1), "1 month");
        assert_eq!(periods_to_human(11), "11 months");
        assert_eq!(periods_to_human(12), "1 year");
        assert_eq!(periods_to_human(13), "1 year and 1 month");
        assert_eq!(periods_to_human(14), "1 year and 2 months");
        assert_eq!(periods_to_human(24), "2 years");
        assert_eq!(periods_to_human(25), "2 years and 1 month");
        assert_eq!(periods_to_human(98), "8 years and 2 months");
    }
}
