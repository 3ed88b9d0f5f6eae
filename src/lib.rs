//! `cuota_fija` is a Rust library for fixed-payment (annuity) loan
//! amortization schedules.
//!
//! It covers the whole path from what a person types to the table they read:
//! - **Parsing**: free-form amounts such as `"$12,000.00"` or `"1.234,56 MXN"`
//!   are normalized to a `Decimal`.
//! - **Validation**: amounts are checked against per-currency bounds, with
//!   messages formatted for the active locale.
//! - **Schedule**: the fixed payment is computed with the annuity formula and
//!   every period is rounded to cents, the final period absorbing any residual
//!   so the balance closes at exactly zero.
//! - **Export**: schedules serialize to CSV.
//!
//! ## Usage
//!
//! Add `cuota_fija` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cuota_fija = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Then use a [`LoanSession`] to go from raw input to a schedule:
//!
//! ```rust
//! use cuota_fija::{LoanConfig, LoanSession, LocaleFormatter};
//!
//! fn main() {
//!     let mut session = LoanSession::new(LoanConfig::reference(), LocaleFormatter)
//!         .expect("reference configuration is valid");
//!
//!     match session.calculate("$12,000.00", 12) {
//!         Ok(result) => {
//!             println!("Payment:        {:.2}", result.summary.periodic_payment);
//!             println!("Total interest: {:.2}", result.summary.total_interest);
//!             println!("Total repaid:   {:.2}", result.summary.total_repaid);
//!         }
//!         Err(e) => {
//!             eprintln!("Error calculating schedule: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod amortization;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod parser;
pub mod payment;
pub mod rounding;
pub mod schedule;
pub mod session;
pub mod summary;
pub mod types;
pub mod validator;

pub use amortization::{Amortization, LoanRequest, compute_schedule};
pub use config::{Bounds, CurrencyLimits, CurrencyProfile, DEFAULT_BOUNDS, LoanConfig, RateTable};
pub use error::{AmountError, LoanError, Result};
pub use export::{CSV_HEADER, export_file_name, to_csv_string, write_csv};
pub use format::{CurrencyFormatter, LocaleFormatter, format_fixed};
pub use parser::{parse_amount, parse_amount_with_codes};
pub use payment::fixed_payment;
pub use rounding::round2;
pub use schedule::{PeriodRecord, Schedule, generate};
pub use session::LoanSession;
pub use summary::{SummaryResult, summarize};
pub use types::{Money, Rate};
pub use validator::{validate_amount, validate_amount_for};
