//! Annuity and differentiated loan calculations.
//!
//! Given an interest rate and all but one of payment, principal and term,
//! [`evaluate`] computes the missing figure together with the overpayment.

pub mod calc;
pub mod error;
pub mod loan;

pub use calc::{evaluate, Annuity, Calculation, LoanKind, LoanRequest, Report};
pub use error::{LoanError, Result};
pub use loan::MonthlyPayment;
