use clap::{ArgAction, Parser};
use creditcalc::{evaluate, LoanRequest};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::process::ExitCode;

/// Loan calculator: works out the monthly payment, principal or term of an
/// annuity loan, or the monthly payments of a differentiated loan.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Loan type: annuity or diff
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,

    /// Monthly payment
    #[arg(long, allow_negative_numbers = true)]
    payment: Option<f64>,

    /// Loan principal
    #[arg(long, allow_negative_numbers = true)]
    principal: Option<f64>,

    /// Number of monthly payments
    #[arg(long, allow_negative_numbers = true)]
    periods: Option<f64>,

    /// Annual interest rate in percent, i.e. 7.8
    #[arg(long, allow_negative_numbers = true)]
    interest: Option<f64>,

    /// Log more detail to stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn to_request(&self) -> LoanRequest {
        LoanRequest {
            kind: self.kind.clone(),
            payment: self.payment,
            principal: self.principal,
            periods: self.periods,
            interest: self.interest,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level())
        .init()
        .unwrap();

    match evaluate(&cli.to_request()) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{}", err);
            ExitCode::FAILURE
        }
    }
}

// public types stay sized, thread-safe and movable
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<creditcalc::Report>();
    is_normal::<creditcalc::LoanRequest>();
    is_normal::<creditcalc::LoanError>();
}
