//! Hotel search

use super::{format_date, parse_date};
use crate::error::AgentError;
use crate::models::HotelListing;
use crate::search::{SearchApi, SearchEngine, SearchOutcome, SearchRequest};
use crate::Result;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

/// Properties handed back to the agent per search.
pub const MAX_PROPERTIES: usize = 2;
pub const DEFAULT_COUNTRY: &str = "us";

#[derive(Debug, Clone, PartialEq)]
pub struct HotelSearch {
    pub q: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub adults: Option<u32>,
    pub country: String,
}

impl HotelSearch {
    pub fn new(
        q: &str,
        check_in_date: &str,
        check_out_date: &str,
        adults: Option<u32>,
        country: Option<&str>,
    ) -> Result<Self> {
        let q = q.trim();
        if q.is_empty() {
            return Err(AgentError::InvalidToolInput("q (location) is required".to_string()));
        }
        if adults == Some(0) {
            return Err(AgentError::InvalidToolInput("adults must be at least 1".to_string()));
        }

        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COUNTRY)
            .to_lowercase();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AgentError::InvalidToolInput(format!(
                "country_search must be a two-letter country code, got '{}'",
                country
            )));
        }

        let check_in_date = parse_date("check_in_date", check_in_date)?;
        let check_out_date = parse_date("check_out_date", check_out_date)?;
        if check_out_date <= check_in_date {
            return Err(AgentError::InvalidToolInput(format!(
                "check_out_date {} must be after check_in_date {}",
                check_out_date, check_in_date
            )));
        }

        Ok(Self {
            q: q.to_string(),
            check_in_date,
            check_out_date,
            adults,
            country,
        })
    }

    pub fn to_request(&self) -> SearchRequest {
        let mut request = SearchRequest::new(SearchEngine::GoogleHotels)
            .param("q", self.q.clone())
            .param("check_in_date", format_date(self.check_in_date))
            .param("check_out_date", format_date(self.check_out_date));

        if let Some(adults) = self.adults {
            request = request.param("adults", adults.to_string());
        }

        request
            .param("currency", "USD")
            .param("gl", self.country.clone())
            .param("hl", "en")
    }
}

pub async fn search_hotels(
    api: &dyn SearchApi,
    search: &HotelSearch,
) -> Result<SearchOutcome<HotelListing>> {
    let body = api.search(&search.to_request()).await?;
    let outcome = SearchOutcome::from_response(&body, extract_properties);

    info!(
        q = %search.q,
        found = matches!(outcome, SearchOutcome::Success(_)),
        "Hotel search completed"
    );

    Ok(outcome)
}

fn extract_properties(body: &Value) -> Option<HotelListing> {
    let properties = body
        .get("properties")
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())?;

    Some(HotelListing {
        properties: properties.iter().take(MAX_PROPERTIES).cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::StaticSearchApi;
    use serde_json::json;

    fn search() -> HotelSearch {
        HotelSearch::new("Bali Resorts", "2024-02-10", "2024-02-14", Some(2), Some("UK")).unwrap()
    }

    #[test]
    fn test_request_params() {
        let request = search().to_request();
        assert_eq!(request.engine, SearchEngine::GoogleHotels);
        assert_eq!(request.get("q"), Some("Bali Resorts"));
        assert_eq!(request.get("adults"), Some("2"));
        assert_eq!(request.get("gl"), Some("uk"));
        assert_eq!(request.get("currency"), Some("USD"));

        let request = HotelSearch::new("Lisbon", "2024-02-10", "2024-02-11", None, None)
            .unwrap()
            .to_request();
        assert_eq!(request.get("adults"), None);
        assert_eq!(request.get("gl"), Some("us"));
    }

    #[test]
    fn test_validation() {
        assert!(HotelSearch::new("", "2024-02-10", "2024-02-14", None, None).is_err());
        assert!(HotelSearch::new("Bali", "2024-02-10", "2024-02-10", None, None).is_err());
        assert!(HotelSearch::new("Bali", "2024-02-10", "2024-02-14", Some(0), None).is_err());
        assert!(HotelSearch::new("Bali", "2024-02-10", "2024-02-14", None, Some("usa")).is_err());
    }

    #[tokio::test]
    async fn test_returns_first_properties() {
        let api = StaticSearchApi::new().with_response(
            SearchEngine::GoogleHotels,
            json!({"properties": [{"name": "One"}, {"name": "Two"}, {"name": "Three"}]}),
        );

        match search_hotels(&api, &search()).await.unwrap() {
            SearchOutcome::Success(listing) => {
                assert_eq!(listing.properties.len(), MAX_PROPERTIES);
                assert_eq!(listing.properties[0]["name"], json!("One"));
            }
            other => panic!("expected properties, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_single_property_and_empty() {
        let api = StaticSearchApi::new()
            .with_response(SearchEngine::GoogleHotels, json!({"properties": [{"name": "Only"}]}));
        match search_hotels(&api, &search()).await.unwrap() {
            SearchOutcome::Success(listing) => assert_eq!(listing.properties.len(), 1),
            other => panic!("expected properties, got {:?}", other),
        }

        let api = StaticSearchApi::new()
            .with_response(SearchEngine::GoogleHotels, json!({"properties": []}));
        assert_eq!(
            search_hotels(&api, &search()).await.unwrap(),
            SearchOutcome::Empty
        );
    }
}
