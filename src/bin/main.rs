//! Prints the OpenAPI document for the agent action group.

use std::sync::Arc;
use tracing::debug;
use travel_planner_agent::{
    config::StaticHoldings, openapi::openapi_document, search::StaticSearchApi,
    tools::build_registry,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    // The schema only depends on tool descriptors, not on live backends.
    let registry = build_registry(
        Arc::new(StaticSearchApi::new()),
        Arc::new(StaticHoldings::default()),
    );
    debug!(tools = ?registry.list(), "Building schema");

    let document = openapi_document(&registry);
    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}
