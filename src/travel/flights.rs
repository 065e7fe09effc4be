//! Flight search
//!
//! Round-trip search priced in USD. The best-flights list is preferred;
//! the other-flights list is the fallback.

use super::{format_date, parse_date};
use crate::error::AgentError;
use crate::models::FlightQuote;
use crate::search::{parse_price, SearchApi, SearchEngine, SearchOutcome, SearchRequest};
use crate::Result;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearch {
    pub departure_id: String,
    pub arrival_id: String,
    pub outbound_date: NaiveDate,
    pub return_date: NaiveDate,
    pub num_passengers: u32,
}

impl FlightSearch {
    pub fn new(
        departure_id: &str,
        arrival_id: &str,
        outbound_date: &str,
        return_date: &str,
        num_passengers: u32,
    ) -> Result<Self> {
        let departure_id = departure_id.trim();
        let arrival_id = arrival_id.trim();
        if departure_id.is_empty() || arrival_id.is_empty() {
            return Err(AgentError::InvalidToolInput(
                "departure_id and arrival_id are required".to_string(),
            ));
        }
        if num_passengers == 0 {
            return Err(AgentError::InvalidToolInput(
                "num_passengers must be at least 1".to_string(),
            ));
        }

        let outbound_date = parse_date("outbound_date", outbound_date)?;
        let return_date = parse_date("return_date", return_date)?;
        if return_date < outbound_date {
            return Err(AgentError::InvalidToolInput(format!(
                "return_date {} is before outbound_date {}",
                return_date, outbound_date
            )));
        }

        Ok(Self {
            departure_id: departure_id.to_string(),
            arrival_id: arrival_id.to_string(),
            outbound_date,
            return_date,
            num_passengers,
        })
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest::new(SearchEngine::GoogleFlights)
            .param("departure_id", self.departure_id.clone())
            .param("arrival_id", self.arrival_id.clone())
            .param("outbound_date", format_date(self.outbound_date))
            .param("return_date", format_date(self.return_date))
            .param("currency", "USD")
            .param("hl", "en")
    }
}

pub async fn search_flights(
    api: &dyn SearchApi,
    search: &FlightSearch,
) -> Result<SearchOutcome<FlightQuote>> {
    let body = api.search(&search.to_request()).await?;
    let outcome = SearchOutcome::from_response(&body, |b| extract_flights(b, search.num_passengers));

    info!(
        departure = %search.departure_id,
        arrival = %search.arrival_id,
        found = matches!(outcome, SearchOutcome::Success(_)),
        "Flight search completed"
    );

    Ok(outcome)
}

fn extract_flights(body: &Value, num_passengers: u32) -> Option<FlightQuote> {
    let flights = non_empty_list(body, "best_flights").or_else(|| non_empty_list(body, "other_flights"))?;

    // Fares of all returned options are summed; unpriced options count 0.
    let fare_sum = flights
        .iter()
        .map(|flight| flight.get("price").and_then(parse_price).unwrap_or(0.0))
        .fold(0.0, |acc, price| acc + price);
    let total_cost = fare_sum * f64::from(num_passengers);

    Some(FlightQuote {
        flights: flights.clone(),
        num_passengers,
        total_cost,
        per_passenger_cost: total_cost / f64::from(num_passengers),
    })
}

fn non_empty_list<'a>(body: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    body.get(key)
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
}
