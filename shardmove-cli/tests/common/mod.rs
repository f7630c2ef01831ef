#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};

/// In-process stand-in for the CouchDB cluster endpoints the client uses.
#[derive(Default)]
pub struct MockCouch {
    pub nodes: Vec<String>,
    pub dbs: Vec<String>,
    /// Shard metadata documents by database name.
    pub docs: HashMap<String, Value>,
    pub puts: Vec<String>,
    pub syncs: Vec<String>,
    pub failing_sync: Option<String>,
    /// Database whose shard map PUT is rejected as a revision conflict.
    pub conflicting_put: Option<String>,
    pub required_auth: Option<String>,
    pub auth_failures: usize,
}

pub type SharedCouch = Arc<Mutex<MockCouch>>;

pub fn shard_doc(db: &str, ranges: &[(&str, &[&str])]) -> Value {
    let mut by_range = serde_json::Map::new();
    let mut by_node: serde_json::Map<String, Value> = serde_json::Map::new();
    let mut changelog = Vec::new();
    for (range, nodes) in ranges {
        by_range.insert(range.to_string(), json!(nodes));
        for node in nodes.iter() {
            changelog.push(json!(["add", range, node]));
            let entry = by_node.entry(node.to_string()).or_insert_with(|| json!([]));
            entry.as_array_mut().unwrap().push(json!(range));
        }
    }
    json!({
        "_id": db,
        "_rev": "1-967a00dff5e02add41819138abb3284d",
        "shard_suffix": [46, 49, 55],
        "changelog": changelog,
        "by_node": by_node,
        "by_range": by_range,
        "props": {}
    })
}

impl MockCouch {
    pub fn with_db(mut self, db: &str, ranges: &[(&str, &[&str])]) -> Self {
        self.dbs.push(db.to_string());
        self.docs.insert(db.to_string(), shard_doc(db, ranges));
        self
    }

    pub fn with_nodes(mut self, nodes: &[&str]) -> Self {
        self.nodes = nodes.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn owners(&self, db: &str, range: &str) -> Vec<String> {
        serde_json::from_value(self.docs[db]["by_range"][range].clone()).unwrap()
    }
}

fn authorized(state: &SharedCouch, headers: &HeaderMap) -> Result<(), StatusCode> {
    let mut guard = state.lock().unwrap();
    let Some(expected) = guard.required_auth.clone() else {
        return Ok(());
    };
    let got = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if got == expected {
        Ok(())
    } else {
        guard.auth_failures += 1;
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn membership(
    State(state): State<SharedCouch>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorized(&state, &headers)?;
    let nodes = state.lock().unwrap().nodes.clone();
    Ok(Json(json!({ "all_nodes": nodes, "cluster_nodes": nodes })))
}

async fn all_dbs(
    State(state): State<SharedCouch>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    authorized(&state, &headers)?;
    Ok(Json(json!(state.lock().unwrap().dbs)))
}

async fn db_shards(
    State(state): State<SharedCouch>,
    Path(db): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let guard = state.lock().unwrap();
    let doc = guard.docs.get(&db).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "shards": doc["by_range"] })))
}

async fn sync_shards(
    State(state): State<SharedCouch>,
    Path(db): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut guard = state.lock().unwrap();
    guard.syncs.push(db.clone());
    if guard.failing_sync.as_deref() == Some(db.as_str()) {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "unknown_error", "reason": "sync failed"}).to_string(),
        ));
    }
    Ok(Json(json!({ "ok": true })))
}

async fn get_dbs_doc(
    State(state): State<SharedCouch>,
    Path(db): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let guard = state.lock().unwrap();
    guard.docs.get(&db).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn put_dbs_doc(
    State(state): State<SharedCouch>,
    Path(db): Path<String>,
    Json(mut doc): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let conflict = || {
        (
            StatusCode::CONFLICT,
            json!({"error": "conflict", "reason": "Document update conflict."}).to_string(),
        )
    };
    let mut guard = state.lock().unwrap();
    if guard.conflicting_put.as_deref() == Some(db.as_str()) {
        return Err(conflict());
    }
    let current = guard
        .docs
        .get(&db)
        .ok_or((StatusCode::NOT_FOUND, String::new()))?;
    if current["_rev"] != doc["_rev"] {
        return Err(conflict());
    }
    doc["_rev"] = json!("2-updated");
    guard.docs.insert(db.clone(), doc);
    guard.puts.push(db.clone());
    Ok(Json(json!({ "ok": true, "id": db, "rev": "2-updated" })))
}

/// Serve the mock on an ephemeral port and return its base URL.
pub async fn start_mock_couch(couch: MockCouch) -> anyhow::Result<(String, SharedCouch)> {
    let state: SharedCouch = Arc::new(Mutex::new(couch));
    let app = Router::new()
        .route("/_membership", get(membership))
        .route("/_all_dbs", get(all_dbs))
        .route("/{db}/_shards", get(db_shards))
        .route("/{db}/_sync_shards", post(sync_shards))
        .route("/_node/_local/_dbs/{db}", get(get_dbs_doc).put(put_dbs_doc))
        .with_state(state.clone());

    let listener =
        tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("mock couch server error: {e}");
        }
    });

    Ok((base_url, state))
}
