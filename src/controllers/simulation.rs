//! Synthetic load endpoints for telemetry demos.
//!
//! These generate interesting traces on demand: configurable latency, random
//! failures, short-lived large allocations, and query storms. None of them
//! change note state; they only read row counts.

use actix_web::{web, HttpResponse, Responder};
use rand::Rng;
use serde::Deserialize;
use std::time::{Duration, Instant};

use crate::AppState;

const MAX_DELAY_SECS: u64 = 30;
const MAX_ALLOC_MB: usize = 256;
const MAX_LOAD_QUERIES: u32 = 200;

fn storage_error(op: &str, e: rusqlite::Error) -> HttpResponse {
    log::error!("[SIMULATION] {} failed: {}", op, e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "detail": "internal storage error"
    }))
}

// --- Slow responses ---

#[derive(Debug, Deserialize)]
struct SlowQuery {
    delay: Option<u64>,
}

/// Sleep for `?delay=` seconds (default: random 2-5), then run one real query
/// so the trace has a database span in it.
async fn simulate_slow(data: web::Data<AppState>, query: web::Query<SlowQuery>) -> impl Responder {
    let delay = query
        .delay
        .unwrap_or_else(|| rand::thread_rng().gen_range(2..=5))
        .min(MAX_DELAY_SECS);

    let start = Instant::now();
    tokio::time::sleep(Duration::from_secs(delay)).await;

    let note_count = match data.db.count_notes() {
        Ok(c) => c,
        Err(e) => return storage_error("slow", e),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Simulated slow operation completed",
        "requested_delay": delay,
        "actual_delay": start.elapsed().as_secs_f64(),
        "note_count": note_count,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// --- Random errors ---

#[derive(Debug, Deserialize)]
struct ErrorQuery {
    error_rate: Option<f64>,
}

/// Fail with probability `?error_rate=` (default 0.5), picking a random
/// failure flavor; otherwise return a success payload with the note count.
async fn simulate_error(
    data: web::Data<AppState>,
    query: web::Query<ErrorQuery>,
) -> impl Responder {
    let error_rate = query.error_rate.unwrap_or(0.5).clamp(0.0, 1.0);

    let (roll, flavor) = {
        let mut rng = rand::thread_rng();
        (rng.gen_range(0.0..1.0f64), rng.gen_range(0..4))
    };

    if roll < error_rate {
        let (kind, detail) = match flavor {
            0 => ("database_connection", "Database connection failed"),
            1 => ("internal_server_error", "Internal server error occurred"),
            2 => ("service_unavailable", "Service temporarily unavailable"),
            _ => ("timeout", "Request timeout occurred"),
        };
        log::warn!("[SIMULATION] Injected error: {}", kind);

        let body = serde_json::json!({ "detail": detail, "error_type": kind });
        return match kind {
            "database_connection" | "service_unavailable" => {
                HttpResponse::ServiceUnavailable().json(body)
            }
            "timeout" => HttpResponse::GatewayTimeout().json(body),
            _ => HttpResponse::InternalServerError().json(body),
        };
    }

    let note_count = match data.db.count_notes() {
        Ok(c) => c,
        Err(e) => return storage_error("error", e),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Operation successful (no error this time)",
        "error_rate": error_rate,
        "note_count": note_count,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// --- Memory pressure ---

#[derive(Debug, Deserialize)]
struct MemoryQuery {
    size_mb: Option<usize>,
}

/// Allocate `?size_mb=` megabytes (default: random 10-50, capped), touch the
/// pages so the allocation is real, hold briefly, then release.
async fn simulate_memory(query: web::Query<MemoryQuery>) -> impl Responder {
    let size_mb = query
        .size_mb
        .unwrap_or_else(|| rand::thread_rng().gen_range(10..=50))
        .min(MAX_ALLOC_MB);

    let start = Instant::now();

    let buffer = vec![0xAAu8; size_mb * 1024 * 1024];
    // Touch one byte per page so the OS actually commits the memory
    let touched: u64 = buffer.iter().step_by(4096).map(|&b| b as u64).sum();

    tokio::time::sleep(Duration::from_secs(1)).await;
    drop(buffer);

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Memory operation completed",
        "allocated_mb": size_mb,
        "pages_touched": touched / 0xAA,
        "duration": start.elapsed().as_secs_f64(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// --- Query storms ---

#[derive(Debug, Deserialize)]
struct LoadQuery {
    queries: Option<u32>,
}

/// Run `?queries=` mixed read queries back to back (default: random 10-50)
/// with a small delay between each, to stress the storage layer.
async fn simulate_database_load(
    data: web::Data<AppState>,
    query: web::Query<LoadQuery>,
) -> impl Responder {
    let queries = query
        .queries
        .unwrap_or_else(|| rand::thread_rng().gen_range(10..=50))
        .min(MAX_LOAD_QUERIES);

    let start = Instant::now();
    let mut sample_results = Vec::new();

    for i in 0..queries {
        let result = match i % 3 {
            0 => data.db.count_notes().map(|c| format!("count_{}: {}", i, c)),
            1 => data
                .db
                .list_notes()
                .map(|n| format!("listed_{}: {} notes", i, n.len())),
            _ => data
                .db
                .count_unlocked_notes()
                .map(|c| format!("unlocked_{}: {}", i, c)),
        };

        match result {
            Ok(line) => {
                if sample_results.len() < 5 {
                    sample_results.push(line);
                }
            }
            Err(e) => return storage_error("database-load", e),
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Database load test completed",
        "queries_executed": queries,
        "duration": start.elapsed().as_secs_f64(),
        "sample_results": sample_results,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/simulation")
            .route("/slow", web::get().to(simulate_slow))
            .route("/error", web::get().to(simulate_error))
            .route("/memory", web::get().to(simulate_memory))
            .route("/database-load", web::get().to(simulate_database_load)),
    );
}
