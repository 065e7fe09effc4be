//! OpenAPI document for the agent action group
//!
//! Generated from the registered tools so the schema handed to the agent
//! always matches what the server accepts.

use crate::tools::ToolRegistry;
use serde_json::{json, Map, Value};

pub const API_TITLE: &str = "Travel Planner Bot API";
pub const API_VERSION: &str = "1.0.0";
pub const API_DESCRIPTION: &str =
    "Travel Planner API for searching flights and hotels and checking a stock portfolio against travel costs";

pub fn openapi_document(registry: &ToolRegistry) -> Value {
    let mut paths = Map::new();

    for tool in registry.tools() {
        let parameters: Vec<Value> = tool
            .parameters()
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "in": "query",
                    "required": p.required,
                    "description": p.description,
                    "schema": { "type": p.param_type },
                })
            })
            .collect();

        paths.insert(
            tool.path(),
            json!({
                "get": {
                    "operationId": tool.name(),
                    "summary": tool.description(),
                    "description": tool.description(),
                    "parameters": parameters,
                    "responses": {
                        "200": json_response("Successful Response"),
                        "400": json_response("Invalid input or missing configuration"),
                        "422": json_response("Request cannot be satisfied"),
                        "502": json_response("Search API failure"),
                    },
                }
            }),
        );
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": API_TITLE,
            "version": API_VERSION,
            "description": API_DESCRIPTION,
        },
        "tags": [
            { "name": "travel" },
            { "name": "flights" },
            { "name": "hotels" },
            { "name": "finance" },
            { "name": "portfolio" },
        ],
        "paths": paths,
    })
}

fn json_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "type": "object" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticHoldings;
    use crate::search::StaticSearchApi;
    use crate::tools::build_registry;
    use std::sync::Arc;

    #[test]
    fn test_document_lists_every_tool() {
        let registry = build_registry(
            Arc::new(StaticSearchApi::new()),
            Arc::new(StaticHoldings::default()),
        );
        let doc = openapi_document(&registry);

        assert_eq!(doc["info"]["title"], json!(API_TITLE));
        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 4);

        let flights = &doc["paths"]["/get_flights"]["get"];
        assert_eq!(flights["operationId"], json!("get_flights"));
        let params = flights["parameters"].as_array().unwrap();
        assert_eq!(params.len(), 5);
        assert_eq!(params[0]["name"], json!("departure_id"));
        assert_eq!(params[0]["required"], json!(true));
        assert_eq!(params[4]["schema"]["type"], json!("integer"));

        let shares = &doc["paths"]["/calculate_shares_to_sell"]["get"];
        assert_eq!(shares["parameters"][0]["schema"]["type"], json!("number"));
    }
}
