//! Flight and hotel tools

use super::params::{ensure_object_parameters, optional_str, optional_u32, require_str};
use super::Tool;
use crate::error::AgentError;
use crate::models::{ParamType, ToolInput, ToolOutput, ToolParameter};
use crate::search::{SearchApi, SearchOutcome};
use crate::travel::{
    search_flights, search_hotels, FlightSearch, HotelSearch, FOLLOW_UP_HINT, UNKNOWN_ERROR,
};
use crate::Result;
use serde_json::{json, Value};
use std::sync::Arc;

const AIRPORT_HELP: &str = "An airport code is an uppercase 3-letter code. For example, CDG is Paris Charles de Gaulle Airport and AUS is Austin-Bergstrom International Airport.";

static FLIGHT_PARAMETERS: &[ToolParameter] = &[
    ToolParameter {
        name: "departure_id",
        param_type: ParamType::String,
        required: true,
        description: "Departure airport code or location kgmid. An airport code is an uppercase 3-letter code. For example, CDG is Paris Charles de Gaulle Airport and AUS is Austin-Bergstrom International Airport.",
    },
    ToolParameter {
        name: "arrival_id",
        param_type: ParamType::String,
        required: true,
        description: "Arrival airport code or location kgmid. An airport code is an uppercase 3-letter code. For example, CDG is Paris Charles de Gaulle Airport and AUS is Austin-Bergstrom International Airport.",
    },
    ToolParameter {
        name: "outbound_date",
        param_type: ParamType::String,
        required: true,
        description: "Outbound date in YYYY-MM-DD format, e.g. 2024-02-08",
    },
    ToolParameter {
        name: "return_date",
        param_type: ParamType::String,
        required: true,
        description: "Return date in YYYY-MM-DD format, e.g. 2024-02-08",
    },
    ToolParameter {
        name: "num_passengers",
        param_type: ParamType::Integer,
        required: false,
        description: "Number of passengers traveling (default 1)",
    },
];

static HOTEL_PARAMETERS: &[ToolParameter] = &[
    ToolParameter {
        name: "q",
        param_type: ParamType::String,
        required: true,
        description: "Location to search, e.g. Bali Resorts",
    },
    ToolParameter {
        name: "check_in_date",
        param_type: ParamType::String,
        required: true,
        description: "Check-in date in YYYY-MM-DD format, e.g. 2024-02-10",
    },
    ToolParameter {
        name: "check_out_date",
        param_type: ParamType::String,
        required: true,
        description: "Check-out date in YYYY-MM-DD format, e.g. 2024-02-12",
    },
    ToolParameter {
        name: "adults",
        param_type: ParamType::Integer,
        required: false,
        description: "Number of adults",
    },
    ToolParameter {
        name: "country_search",
        param_type: ParamType::String,
        required: false,
        description: "Two-letter country code for the search (e.g. us, uk, fr). Defaults to us.",
    },
];

/// Body for a search the provider rejected or returned nothing for.
fn unusable_search(outcome_error: Option<String>, extra: Option<(&str, Value)>) -> ToolOutput {
    let message = match outcome_error {
        Some(message) => format!("{}{}", message, FOLLOW_UP_HINT),
        None => UNKNOWN_ERROR.to_string(),
    };

    let mut data = json!({ "error": message });
    if let Some((key, value)) = extra {
        data[key] = value;
    }

    ToolOutput {
        success: false,
        data,
        error: Some(message),
    }
}

pub struct GetFlightsTool {
    api: Arc<dyn SearchApi>,
}

impl GetFlightsTool {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self { api }
    }

    fn parse(input: &ToolInput) -> Result<FlightSearch> {
        ensure_object_parameters(input)?;
        let departure_id = require_str(input, "departure_id").map_err(|_| {
            AgentError::InvalidToolInput(format!("Expected 'departure_id'. {}", AIRPORT_HELP))
        })?;
        let arrival_id = require_str(input, "arrival_id").map_err(|_| {
            AgentError::InvalidToolInput(format!("Expected 'arrival_id'. {}", AIRPORT_HELP))
        })?;

        FlightSearch::new(
            &departure_id,
            &arrival_id,
            &require_str(input, "outbound_date")?,
            &require_str(input, "return_date")?,
            optional_u32(input, "num_passengers")?.unwrap_or(1),
        )
    }
}

#[async_trait::async_trait]
impl Tool for GetFlightsTool {
    fn name(&self) -> &'static str {
        "get_flights"
    }

    fn description(&self) -> &'static str {
        "Gets best flight results from Google Flights"
    }

    fn parameters(&self) -> &'static [ToolParameter] {
        FLIGHT_PARAMETERS
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let search = Self::parse(input)?;

        let output = match search_flights(self.api.as_ref(), &search).await? {
            SearchOutcome::Success(quote) => ToolOutput::ok(serde_json::to_value(quote)?),
            SearchOutcome::ProviderError(message) => {
                unusable_search(Some(message), Some(("total_cost", json!(0))))
            }
            SearchOutcome::Empty => unusable_search(None, Some(("total_cost", json!(0)))),
        };

        Ok(output)
    }

    fn failure_body(&self, error: &AgentError) -> Value {
        json!({ "error": error.to_string(), "total_cost": 0 })
    }
}

pub struct GetHotelsTool {
    api: Arc<dyn SearchApi>,
}

impl GetHotelsTool {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self { api }
    }

    fn parse(input: &ToolInput) -> Result<HotelSearch> {
        ensure_object_parameters(input)?;
        let country = optional_str(input, "country_search")?;

        HotelSearch::new(
            &require_str(input, "q")?,
            &require_str(input, "check_in_date")?,
            &require_str(input, "check_out_date")?,
            optional_u32(input, "adults")?,
            country.as_deref(),
        )
    }
}

#[async_trait::async_trait]
impl Tool for GetHotelsTool {
    fn name(&self) -> &'static str {
        "get_hotels"
    }

    fn description(&self) -> &'static str {
        "Gets hotels properties from Google Hotels"
    }

    fn parameters(&self) -> &'static [ToolParameter] {
        HOTEL_PARAMETERS
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let search = Self::parse(input)?;

        let output = match search_hotels(self.api.as_ref(), &search).await? {
            SearchOutcome::Success(listing) => ToolOutput::ok(serde_json::to_value(listing)?),
            SearchOutcome::ProviderError(message) => unusable_search(Some(message), None),
            SearchOutcome::Empty => unusable_search(None, None),
        };

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchEngine, StaticSearchApi};

    fn input(parameters: Value) -> ToolInput {
        ToolInput { parameters }
    }

    fn flight_params() -> Value {
        json!({
            "departure_id": "AUS",
            "arrival_id": "CDG",
            "outbound_date": "2024-06-01",
            "return_date": "2024-06-10",
            "num_passengers": "2"
        })
    }

    #[tokio::test]
    async fn test_flights_success_body() {
        let api = Arc::new(StaticSearchApi::new().with_response(
            SearchEngine::GoogleFlights,
            json!({"best_flights": [{"price": 500, "type": "Round trip"}]}),
        ));
        let tool = GetFlightsTool::new(api);

        let output = tool.execute(&input(flight_params())).await.unwrap();
        assert!(output.success);
        assert_eq!(output.data["num_passengers"], json!(2));
        assert_eq!(output.data["total_cost"], json!(1000.0));
        assert_eq!(output.data["per_passenger_cost"], json!(500.0));
        assert_eq!(output.data["flights"][0]["type"], json!("Round trip"));
    }

    #[tokio::test]
    async fn test_flights_provider_error_asks_for_more_information() {
        let api = Arc::new(StaticSearchApi::new().with_response(
            SearchEngine::GoogleFlights,
            json!({"error": "Google Flights hasn't returned any results for this query."}),
        ));
        let tool = GetFlightsTool::new(api);

        let output = tool.execute(&input(flight_params())).await.unwrap();
        assert!(!output.success);
        assert_eq!(output.data["total_cost"], json!(0));
        let message = output.data["error"].as_str().unwrap();
        assert!(message.starts_with("Google Flights hasn't returned any results"));
        assert!(message.ends_with(FOLLOW_UP_HINT));
    }

    #[tokio::test]
    async fn test_flights_unknown_error() {
        let api = Arc::new(
            StaticSearchApi::new().with_response(SearchEngine::GoogleFlights, json!({})),
        );
        let output = GetFlightsTool::new(api)
            .execute(&input(flight_params()))
            .await
            .unwrap();
        assert_eq!(output.data, json!({"error": "Unknown Error.", "total_cost": 0}));
    }

    #[tokio::test]
    async fn test_flights_missing_airport_explains_codes() {
        let tool = GetFlightsTool::new(Arc::new(StaticSearchApi::new()));
        let err = tool
            .execute(&input(json!({"arrival_id": "CDG"})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("uppercase 3-letter code"));
        assert_eq!(tool.failure_body(&err)["total_cost"], json!(0));
    }

    #[tokio::test]
    async fn test_hotels_body() {
        let api = Arc::new(StaticSearchApi::new().with_response(
            SearchEngine::GoogleHotels,
            json!({"properties": [{"name": "A"}, {"name": "B"}, {"name": "C"}]}),
        ));
        let tool = GetHotelsTool::new(api.clone());

        let output = tool
            .execute(&input(json!({
                "q": "Bali Resorts",
                "check_in_date": "2024-02-10",
                "check_out_date": "2024-02-12",
                "adults": "2",
                "country_search": "FR"
            })))
            .await
            .unwrap();

        assert_eq!(output.data["properties"].as_array().unwrap().len(), 2);
        let request = &api.requests()[0];
        assert_eq!(request.get("gl"), Some("fr"));
        assert_eq!(request.get("adults"), Some("2"));
    }
}
