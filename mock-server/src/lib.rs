use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Hook {
    pub hook_id: u64,
    pub url: String,
    #[serde(rename = "type")]
    pub hook_type: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct CreateHook {
    pub url: String,
    #[serde(rename = "type")]
    pub hook_type: String,
}

#[derive(Deserialize)]
pub struct ValidateHook {
    pub code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileInfo {
    pub file_id: u64,
    pub name: String,
    pub size: usize,
}

#[derive(Deserialize)]
pub struct ListFiles {
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub comment_id: u64,
    pub value: String,
    pub hook: bool,
}

#[derive(Deserialize)]
pub struct CreateComment {
    pub value: String,
}

#[derive(Deserialize)]
pub struct HookFlag {
    pub hook: Option<bool>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    hooks: BTreeMap<u64, (String, u64, Hook)>,
    files: BTreeMap<u64, FileInfo>,
    comments: BTreeMap<u64, Comment>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/hook/{key}", delete(delete_hook))
        .route("/hook/{key}/{id}", get(list_hooks).post(create_hook))
        .route("/hook/{key}/verify/validate", post(validate_hook))
        .route("/file", get(list_files).post(upload_file))
        .route("/file/{key}", get(get_file))
        .route("/comment/{key}", get(get_comment))
        .route("/comment/{key}/{id}", post(create_comment))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- hooks ---

async fn list_hooks(
    State(db): State<Db>,
    Path((ref_type, ref_id)): Path<(String, u64)>,
) -> Json<Vec<Hook>> {
    let store = db.read().await;
    let hooks = store
        .hooks
        .values()
        .filter(|(t, id, _)| *t == ref_type && *id == ref_id)
        .map(|(_, _, hook)| hook.clone())
        .collect();
    Json(hooks)
}

async fn create_hook(
    State(db): State<Db>,
    Path((ref_type, ref_id)): Path<(String, u64)>,
    Json(input): Json<CreateHook>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut store = db.write().await;
    let hook_id = store.next_id();
    let hook = Hook {
        hook_id,
        url: input.url,
        hook_type: input.hook_type,
        status: "inactive".to_string(),
    };
    tracing::debug!(hook_id, %ref_type, ref_id, "hook created");
    store.hooks.insert(hook_id, (ref_type, ref_id, hook));
    (StatusCode::CREATED, Json(serde_json::json!({ "hook_id": hook_id })))
}

async fn validate_hook(
    State(db): State<Db>,
    Path(hook_id): Path<u64>,
    Json(input): Json<ValidateHook>,
) -> StatusCode {
    if input.code.is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    let mut store = db.write().await;
    match store.hooks.get_mut(&hook_id) {
        Some((_, _, hook)) => {
            hook.status = "active".to_string();
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_hook(State(db): State<Db>, Path(hook_id): Path<u64>) -> StatusCode {
    let mut store = db.write().await;
    store
        .hooks
        .remove(&hook_id)
        .map(|_| StatusCode::NO_CONTENT)
        .unwrap_or(StatusCode::NOT_FOUND)
}

// --- files ---

async fn list_files(State(db): State<Db>, Query(query): Query<ListFiles>) -> Json<Vec<FileInfo>> {
    let store = db.read().await;
    let limit = query.limit.unwrap_or(usize::MAX);
    Json(store.files.values().take(limit).cloned().collect())
}

async fn upload_file(
    State(db): State<Db>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileInfo>), StatusCode> {
    let mut name = None;
    let mut source = None;
    while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
        let field_name = field.name().unwrap_or_default().to_string();
        let text = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        match field_name.as_str() {
            "filename" => name = Some(text),
            "source" => source = Some(text),
            _ => {}
        }
    }
    let (Some(name), Some(source)) = (name, source) else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut store = db.write().await;
    let file = FileInfo {
        file_id: store.next_id(),
        name,
        size: source.len(),
    };
    store.files.insert(file.file_id, file.clone());
    Ok((StatusCode::CREATED, Json(file)))
}

async fn get_file(State(db): State<Db>, Path(file_id): Path<u64>) -> Result<Json<FileInfo>, StatusCode> {
    let store = db.read().await;
    store.files.get(&file_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

// --- comments ---

async fn create_comment(
    State(db): State<Db>,
    Path((_ref_type, _ref_id)): Path<(String, u64)>,
    Query(flag): Query<HookFlag>,
    Json(input): Json<CreateComment>,
) -> (StatusCode, Json<Comment>) {
    let mut store = db.write().await;
    let comment = Comment {
        comment_id: store.next_id(),
        value: input.value,
        hook: flag.hook.unwrap_or(true),
    };
    store.comments.insert(comment.comment_id, comment.clone());
    (StatusCode::CREATED, Json(comment))
}

async fn get_comment(
    State(db): State<Db>,
    Path(comment_id): Path<u64>,
) -> Result<Json<Comment>, StatusCode> {
    let store = db.read().await;
    store.comments.get(&comment_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}
