//! OpenAPI Specification Generator Binary
//!
//! Generates the RELIC OpenAPI specification as JSON to stdout.
//!
//! Usage:
//!   cargo run -p relic-api --bin generate-openapi > openapi.json

use relic_api::ApiDoc;

fn main() {
    match ApiDoc::to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI spec: {}", e);
            std::process::exit(1);
        }
    }
}
