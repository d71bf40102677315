//! Files: lookup, upload and replacement.

use serde_json::{json, Value};

use crate::endpoint::Endpoint;
use crate::http::HttpMethod;

pub fn get() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Get, "/file/{{file_id}}")
}

/// List files; the record's fields (`limit`, `sort_by`, ...) become the query.
pub fn get_all() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Get, "/file")
}

/// Upload a file. Pass the argument as a form wrapper so it is sent as
/// multipart.
pub fn upload() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Post, "/file")
}

pub fn copy() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Post, "/file/{{file_id}}/copy")
}

/// Replace `old` with `new`: `{"old": {"file_id": ..}, "new": {"file_id": ..}}`.
pub fn replace() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Post, "/file/{{new.file_id}}/replace")
        .with_request(|arg| json!({ "old_file_id": arg.to_value()["old"]["file_id"] }))
}

pub fn delete() -> Endpoint<Value, Value> {
    Endpoint::declare(HttpMethod::Delete, "/file/{{file_id}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::channel::Channel;

    #[test]
    fn upload_form_goes_multipart() {
        let arg = Argument::form(&json!({}), &json!({ "filename": "a.txt", "source": "hi" })).unwrap();
        let plan = upload().plan(Some(arg.to_value()));
        assert_eq!(plan.channel, Some(Channel::Form));
        assert_eq!(plan.payload, json!({ "filename": "a.txt", "source": "hi" }));
    }

    #[test]
    fn get_all_uses_query_string() {
        let plan = get_all().plan(Some(json!({ "limit": 2 })));
        assert_eq!(plan.path, "/file");
        assert_eq!(plan.channel, Some(Channel::QueryString));
        assert_eq!(plan.payload, json!({ "limit": 2 }));
    }

    #[test]
    fn copy_sends_the_record() {
        let plan = copy().plan(Some(json!({ "file_id": 6 })));
        assert_eq!(plan.path, "/file/6/copy");
        assert_eq!(plan.channel, Some(Channel::Json));
        assert_eq!(plan.payload, json!({ "file_id": 6 }));
    }

    #[test]
    fn replace_reshapes_the_body() {
        let plan = replace().plan(Some(json!({
            "old": { "file_id": 1 },
            "new": { "file_id": 2 }
        })));
        assert_eq!(plan.path, "/file/2/replace");
        assert_eq!(plan.payload, json!({ "old_file_id": 1 }));
    }
}
