//! Webhooks attached to apps, spaces and items.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ResourceRef;
use crate::argument::Argument;
use crate::endpoint::Endpoint;
use crate::error::Failure;
use crate::http::HttpMethod;

/// A webhook registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub url: String,
    #[serde(rename = "type")]
    pub hook_type: String,
}

/// A hook to be attached to `reference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRequest {
    pub reference: ResourceRef,
    pub hook: Hook,
}

impl From<HookRequest> for Argument {
    fn from(req: HookRequest) -> Self {
        Argument::Plain(json!({
            "ref": req.reference,
            "url": req.hook.url,
            "type": req.hook.hook_type,
        }))
    }
}

/// Hooks on a referenced object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookTarget(pub ResourceRef);

impl From<HookTarget> for Argument {
    fn from(target: HookTarget) -> Self {
        Argument::Plain(json!({ "ref": target.0 }))
    }
}

/// A single hook by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteHook {
    pub hook_id: u64,
}

impl From<RemoteHook> for Argument {
    fn from(hook: RemoteHook) -> Self {
        Argument::Plain(json!({ "hook_id": hook.hook_id }))
    }
}

/// Verification code for a hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookValidation {
    pub hook_id: u64,
    pub code: String,
}

impl From<HookValidation> for Argument {
    fn from(v: HookValidation) -> Self {
        Argument::Postable {
            params: json!({ "hook_id": v.hook_id }),
            data: json!({ "code": v.code }),
        }
    }
}

/// Result of creating a hook; `options.raw` keeps the untouched response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookResponse {
    pub hook_id: u64,
    pub options: Value,
}

pub fn all() -> Endpoint<HookTarget, Vec<Hook>> {
    Endpoint::declare(HttpMethod::Get, "/hook/{{ref.type}}/{{ref.id}}").decoded()
}

pub fn create() -> Endpoint<HookRequest, HookResponse> {
    Endpoint::declare(HttpMethod::Post, "/hook/{{ref.type}}/{{ref.id}}")
        .with_request(|arg| {
            let record = arg.to_value();
            json!({ "url": record["url"], "type": record["type"] })
        })
        .with_response(|wire| {
            let hook_id = wire["hook_id"]
                .as_u64()
                .ok_or_else(|| Failure::new("response missing hook_id"))?;
            Ok(HookResponse {
                hook_id,
                options: json!({ "raw": wire }),
            })
        })
}

pub fn validate() -> Endpoint<HookValidation, Value> {
    Endpoint::declare(HttpMethod::Post, "/hook/{{hook_id}}/verify/validate")
}

pub fn delete() -> Endpoint<RemoteHook, Value> {
    Endpoint::declare(HttpMethod::Delete, "/hook/{{hook_id}}")
}

pub fn request_verification() -> Endpoint<RemoteHook, Value> {
    Endpoint::declare(HttpMethod::Post, "/hook/{{hook_id}}/verify/request")
}
