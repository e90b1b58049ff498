//! # drought-calendar
//!
//! Day-of-year arithmetic for the Gregorian calendar, as used to index
//! climatologies and gamma parameters.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["NaiveDate"] -->|"Doy::of()"| B["Doy (1..=366)"]
//!     A -->|"DoyWindow::trailing()"| C["DoyWindow"]
//!     C -->|".doys()"| D["Vec of Doy"]
//!     E["today"] -->|"analysis_date()"| A
//!     A -->|"trailing_dates()"| F["Vec of NaiveDate"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use drought_calendar::{Doy, DoyWindow};
//!
//! let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//! assert_eq!(Doy::of(end).get(), 5);
//!
//! // A 12-day window ending Jan 5 starts on Dec 25 and wraps the year.
//! let window = DoyWindow::trailing(end, 12).unwrap();
//! assert!(window.is_wrapped());
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `doy` | Leap-aware day-of-year newtype |
//! | `window` | Inclusive day-of-year windows with year wraparound |
//! | `date` | Analysis-date arithmetic and calendar predicates |
//! | `sequence` | Daily date sequences |
//! | `error` | Error types |

mod date;
mod doy;
mod error;
mod sequence;
mod window;

pub use date::{analysis_date, is_january};
pub use doy::Doy;
pub use error::CalendarError;
pub use sequence::{daily_sequence, trailing_dates};
pub use window::DoyWindow;
