//! Pretend content API for trying the gateway locally.
//!
//! ```text
//! cargo run --example mock_upstream -- --port 7860 --name primary
//! cargo run --example mock_upstream -- --port 7861 --name secondary
//! cargo run --example mock_upstream -- --port 7860 --name primary --down
//! ```

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;

#[derive(Parser, Clone)]
struct Args {
    #[arg(long, default_value_t = 7860)]
    port: u16,

    /// Reported in every response body.
    #[arg(long, default_value = "primary")]
    name: String,

    /// Answer 503 everywhere, like a sleeping hosted app.
    #[arg(long)]
    down: bool,
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

async fn popular(State(args): State<Args>, Query(q): Query<PageQuery>) -> impl IntoResponse {
    if args.down {
        return (StatusCode::SERVICE_UNAVAILABLE, "application not running").into_response();
    }
    Json(json!([
        {"title": "Solo Leveling", "page": q.page.unwrap_or(1), "served_by": args.name},
        {"title": "Omniscient Reader", "page": q.page.unwrap_or(1), "served_by": args.name},
    ]))
    .into_response()
}

async fn series(State(args): State<Args>, Path(slug): Path<String>) -> impl IntoResponse {
    if args.down {
        return (StatusCode::SERVICE_UNAVAILABLE, "application not running").into_response();
    }
    if slug == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "series not found"}))).into_response();
    }
    Json(json!({"slug": slug, "chapters": 120, "served_by": args.name})).into_response()
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let app = Router::new()
        .route("/popular", get(popular))
        .route("/trending", get(popular))
        .route("/manga/{slug}", get(series))
        .with_state(args.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    println!("Mock {} content API listening on http://{}", args.name, addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
