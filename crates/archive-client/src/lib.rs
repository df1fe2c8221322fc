//! # archive-client
//!
//! Talks to the archive API over HTTP and keeps the client-side view of the
//! item list: filters, edit selection and spending summaries.

pub mod client;
pub mod controller;
pub mod error;
pub mod state;

pub use client::{ArchiveClient, ClientConfig, HealthStatus};
pub use controller::ArchiveController;
pub use error::{ClientError, Result};
pub use state::ArchiveState;

use archive_core::defaults::CURRENCY_SYMBOL;

/// Render an amount the way the dashboard shows it, e.g. `R50.00`.
pub fn format_amount(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(50.0), "R50.00");
        assert_eq!(format_amount(1234.5), "R1234.50");
        assert_eq!(format_amount(0.0), "R0.00");
    }
}
