//! Turns the raw flag values into a single validated calculation and runs it.

use crate::error::{LoanError, Result};
use crate::loan::{
    annuity_payment, annuity_periods, annuity_principal, differentiated_schedule,
    nominal_interest_rate, overpayment, periods_to_human, MonthlyPayment,
};
use log::{debug, info, warn};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LoanKind {
    Annuity,
    Differentiated,
}

impl FromStr for LoanKind {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "annuity" => Ok(LoanKind::Annuity),
            "diff" => Ok(LoanKind::Differentiated),
            _ => Err(LoanError::InvalidParameters("unrecognized loan type")),
        }
    }
}

impl fmt::Display for LoanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanKind::Annuity => write!(f, "annuity"),
            LoanKind::Differentiated => write!(f, "diff"),
        }
    }
}

/// Parameters exactly as supplied on the command line.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct LoanRequest {
    pub kind: Option<String>,
    pub payment: Option<f64>,
    pub principal: Option<f64>,
    pub periods: Option<f64>,
    pub interest: Option<f64>,
}

/// The annuity figure being solved for, with the two that are known.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Annuity {
    MissingPayment { principal: f64, periods: f64 },
    MissingPrincipal { payment: f64, periods: f64 },
    MissingPeriods { payment: f64, principal: f64 },
}

/// A request that passed validation. `rate` is the nominal monthly rate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Calculation {
    Annuity {
        rate: f64,
        unknown: Annuity,
    },
    Differentiated {
        rate: f64,
        principal: f64,
        periods: f64,
    },
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Report {
    Payment {
        payment: f64,
    },
    Principal {
        principal: f64,
        overpayment: f64,
    },
    Periods {
        periods: u32,
        overpayment: f64,
    },
    Differentiated {
        payments: Vec<MonthlyPayment>,
        overpayment: f64,
    },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Payment { payment } => write!(f, "Your monthly payment = {}!", payment),
            Report::Principal {
                principal,
                overpayment,
            } => write!(
                f,
                "Your loan principal = {}!\nOverpayment = {}",
                principal, overpayment
            ),
            Report::Periods {
                periods,
                overpayment,
            } => write!(
                f,
                "It will take {} to repay this loan!\nOverpayment = {}",
                periods_to_human(*periods),
                overpayment
            ),
            Report::Differentiated {
                payments,
                overpayment,
            } => {
                for pmt in payments {
                    writeln!(f, "{}", pmt)?;
                }
                write!(f, "Overpayment = {}", overpayment)
            }
        }
    }
}

impl LoanRequest {
    /// Checks the supplied parameters and decides which figure to compute.
    pub fn validate(&self) -> Result<Calculation> {
        for (name, value) in [
            ("payment", self.payment),
            ("principal", self.principal),
            ("periods", self.periods),
            ("interest", self.interest),
        ] {
            if let Some(value) = value {
                if value.is_nan() || value < 0. {
                    debug!("{} is {}", name, value);
                    return Err(LoanError::InvalidParameters("negative value"));
                }
            }
        }

        let interest = self
            .interest
            .ok_or(LoanError::InvalidParameters("interest is required"))?;
        let kind: LoanKind = self
            .kind
            .as_deref()
            .ok_or(LoanError::InvalidParameters("loan type is required"))?
            .parse()?;
        let rate = nominal_interest_rate(interest);
        debug!("{} loan, nominal monthly rate {}", kind, rate);

        match kind {
            LoanKind::Annuity => {
                let unknown = match (self.payment, self.principal, self.periods) {
                    (None, Some(principal), Some(periods)) => {
                        Annuity::MissingPayment {
                            principal,
                            periods: term(periods)?,
                        }
                    }
                    (Some(payment), None, Some(periods)) => Annuity::MissingPrincipal {
                        payment,
                        periods: term(periods)?,
                    },
                    (Some(payment), Some(principal), None) => {
                        Annuity::MissingPeriods { payment, principal }
                    }
                    _ => {
                        return Err(LoanError::InvalidParameters(
                            "annuity needs exactly two of payment, principal and periods",
                        ))
                    }
                };
                Ok(Calculation::Annuity { rate, unknown })
            }
            LoanKind::Differentiated => {
                if self.payment.is_some() {
                    return Err(LoanError::InvalidParameters(
                        "payment is not accepted for diff",
                    ));
                }
                match (self.principal, self.periods) {
                    (Some(principal), Some(periods)) => Ok(Calculation::Differentiated {
                        rate,
                        principal,
                        periods: term(periods)?,
                    }),
                    _ => Err(LoanError::InvalidParameters(
                        "diff needs principal and periods",
                    )),
                }
            }
        }
    }
}

/// Longest accepted term: 1000 years of monthly payments.
pub const MAX_TERM_MONTHS: f64 = 12_000.;

// a term shorter than one month cannot be amortized
fn term(periods: f64) -> Result<f64> {
    if periods < 1. {
        return Err(LoanError::InvalidParameters("term shorter than one month"));
    }
    if periods > MAX_TERM_MONTHS {
        return Err(LoanError::InvalidParameters("term too long"));
    }
    Ok(periods)
}

fn finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoanError::InvalidParameters("result is not a finite number"))
    }
}

impl Calculation {
    pub fn compute(&self) -> Result<Report> {
        let report = match *self {
            Calculation::Annuity { rate, unknown } => match unknown {
                Annuity::MissingPayment { principal, periods } => {
                    let payment = finite(annuity_payment(principal, periods, rate))?;
                    info!("monthly payment {}", payment);
                    Report::Payment {
                        payment: payment.ceil(),
                    }
                }
                Annuity::MissingPrincipal { payment, periods } => {
                    let principal = finite(annuity_principal(payment, periods, rate))?.trunc();
                    info!("loan principal {}", principal);
                    Report::Principal {
                        principal,
                        overpayment: finite(overpayment(principal, periods * payment))?,
                    }
                }
                Annuity::MissingPeriods { payment, principal } => {
                    let periods = annuity_periods(payment, principal, rate)?;
                    info!("repaid after {} months", periods);
                    Report::Periods {
                        periods,
                        overpayment: finite(overpayment(principal, payment * f64::from(periods)))?,
                    }
                }
            },
            Calculation::Differentiated {
                rate,
                principal,
                periods,
            } => {
                let payments = differentiated_schedule(principal, rate, periods);
                let total_paid: f64 = payments.iter().map(|pmt| pmt.amount).sum();
                info!("{} payments totalling {}", payments.len(), total_paid);
                Report::Differentiated {
                    overpayment: finite(overpayment(principal, total_paid))?,
                    payments,
                }
            }
        };
        Ok(report)
    }
}

/// Validates `request` and computes the missing figure.
pub fn evaluate(request: &LoanRequest) -> Result<Report> {
    let result = request.validate().and_then(|calc| calc.compute());
    if let Err(err) = &result {
        warn!("rejected {:?}: {}", request, err.reason());
    }
    result
}
