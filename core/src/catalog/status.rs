//! Status messages posted to a space.

use serde_json::Value;

use crate::endpoint::Endpoint;
use crate::http::HttpMethod;

pub fn add() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Post, "/status/space/{{space_id}}")
}

pub fn get() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Get, "/status/{{status_id}}")
}

pub fn update() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Put, "/status/{{status_id}}")
}

pub fn delete() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Delete, "/status/{{status_id}}")
}
