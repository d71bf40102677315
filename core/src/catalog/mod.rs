//! Resource declarations built on the core.
//!
//! Each submodule declares the operations of one resource as functions
//! returning an `Endpoint`. Declarations are configuration only: a method, a
//! path template and, where the wire format differs from the caller's
//! record, a transformer.

pub mod comments;
pub mod files;
pub mod hooks;
pub mod status;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::argument::Argument;

/// Kind of object a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefType {
    Item,
    App,
    Space,
    LinkedAccount,
}

/// A typed pointer to a remote object, e.g. `{"type": "app", "id": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub ref_type: RefType,
    pub id: u64,
}

impl ResourceRef {
    pub fn new(ref_type: RefType, id: u64) -> Self {
        Self { ref_type, id }
    }
}

impl From<ResourceRef> for Argument {
    fn from(reference: ResourceRef) -> Self {
        Argument::Plain(json!({ "type": reference.ref_type, "id": reference.id }))
    }
}
