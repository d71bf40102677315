//! Comments on items, statuses and tasks.
//!
//! `add` and `update` take a postable record: path parameters beside a
//! `data` body such as `{"value": "text"}`.

use serde_json::Value;

use super::ResourceRef;
use crate::endpoint::Endpoint;
use crate::http::HttpMethod;

pub fn add() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Post, "/comment/{{type}}/{{id}}")
}

pub fn get() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Get, "/comment/{{comment_id}}")
}

pub fn get_on_ref() -> Endpoint<ResourceRef, Value> {
    Endpoint::declare(HttpMethod::Get, "/comment/{{type}}/{{id}}")
}

pub fn get_revisions() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Get, "/comment/{{comment_id}}/revision")
}

pub fn update() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Put, "/comment/{{comment_id}}")
}

pub fn delete() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Delete, "/comment/{{comment_id}}")
}
