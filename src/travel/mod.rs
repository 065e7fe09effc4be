//! Travel searches: flights and hotels

pub mod flights;
pub mod hotels;

pub use flights::{search_flights, FlightSearch};
pub use hotels::{search_hotels, HotelSearch};

use crate::error::AgentError;
use crate::Result;
use chrono::NaiveDate;

/// Appended to provider errors so the agent goes back to the user.
pub const FOLLOW_UP_HINT: &str =
    " Ask the user for more information related to the context received about the function.";

pub const UNKNOWN_ERROR: &str = "Unknown Error.";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date parameter.
pub fn parse_date(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AgentError::InvalidToolInput(format!(
            "{} must be a date in YYYY-MM-DD format, got '{}'",
            name, value
        ))
    })
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("outbound_date", "2024-02-08").unwrap();
        assert_eq!(format_date(date), "2024-02-08");

        assert!(parse_date("outbound_date", "08/02/2024").is_err());
        assert!(parse_date("outbound_date", "2024-02-30").is_err());
    }
}
