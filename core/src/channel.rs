//! Content-channel selection.
//!
//! `GET` always uses the query string. `POST` and `PUT` send multipart when
//! the caller wrapped the argument as a form and JSON otherwise; the decision
//! reads the argument's shape before any request transformer runs. `DELETE`
//! carries no payload.

use serde::{Deserialize, Serialize};

use crate::argument::Argument;
use crate::http::HttpMethod;

/// Transport-level carrier of a request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    QueryString,
    Form,
    Json,
}

pub fn select_channel(method: HttpMethod, argument: &Argument) -> Option<Channel> {
    match method {
        HttpMethod::Get => Some(Channel::QueryString),
        HttpMethod::Post | HttpMethod::Put => match argument {
            Argument::Form { .. } => Some(Channel::Form),
            Argument::Plain(_) | Argument::Postable { .. } => Some(Channel::Json),
        },
        HttpMethod::Delete => None,
    }
}
