//! Notes REST API — CRUD endpoints plus the lock action.
//!
//! This layer is an adapter only: it maps service outcomes to status codes
//! and JSON bodies. The lock rule itself lives in `NoteService`.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::notes::NoteError;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct CreateNoteRequest {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateNoteRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Map a service failure to its response. `locked_detail` carries the
/// operation-specific 409 wording for the Locked case.
fn error_response(op: &str, locked_detail: &str, err: NoteError) -> HttpResponse {
    match err {
        NoteError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
            "detail": "Note not found"
        })),
        NoteError::Locked => HttpResponse::Conflict().json(serde_json::json!({
            "detail": locked_detail
        })),
        NoteError::AlreadyLocked => HttpResponse::Conflict().json(serde_json::json!({
            "detail": "Note is already locked."
        })),
        NoteError::Storage(e) => {
            log::error!("[NOTES] {} failed: {}", op, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "detail": "internal storage error"
            }))
        }
    }
}

async fn create_note(
    data: web::Data<AppState>,
    body: web::Json<CreateNoteRequest>,
) -> impl Responder {
    match data.notes.create(&body.name, body.description.as_deref()) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => error_response("create", "Note is locked and cannot be modified.", e),
    }
}

async fn list_notes(data: web::Data<AppState>) -> impl Responder {
    match data.notes.list() {
        Ok(summaries) => HttpResponse::Ok().json(summaries),
        Err(e) => error_response("list", "Note is locked and cannot be modified.", e),
    }
}

async fn get_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match data.notes.get(&path) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => error_response("get", "Note is locked and cannot be modified.", e),
    }
}

async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateNoteRequest>,
) -> impl Responder {
    match data
        .notes
        .update(&path, body.name.as_deref(), body.description.as_deref())
    {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => error_response("update", "Note is locked and cannot be modified.", e),
    }
}

async fn lock_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match data.notes.lock(&path) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => error_response("lock", "Note is locked and cannot be modified.", e),
    }
}

async fn delete_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match data.notes.delete(&path) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "detail": "Note deleted"
        })),
        Err(e) => error_response("delete", "Note is locked and cannot be deleted.", e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .route("", web::post().to(create_note))
            .route("", web::get().to(list_notes))
            .route("/{uuid}", web::get().to(get_note))
            .route("/{uuid}", web::put().to(update_note))
            .route("/{uuid}", web::delete().to(delete_note))
            .route("/{uuid}/lock", web::put().to(lock_note)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{NoteDetail, NoteSummary};
    use crate::notes::NoteService;
    use actix_web::{test, App};
    use std::sync::Arc;

    fn app_state() -> web::Data<AppState> {
        let db = Arc::new(Database::open_in_memory().unwrap());
        web::Data::new(AppState {
            db: Arc::clone(&db),
            notes: NoteService::new(db),
            started_at: std::time::Instant::now(),
        })
    }

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(config)).await
        };
    }

    #[actix_web::test]
    async fn test_create_and_get_note() {
        let state = app_state();
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/notes")
            .set_json(serde_json::json!({"name": "n", "description": "d"}))
            .to_request();
        let created: NoteDetail = test::call_and_read_body_json(&app, req).await;

        assert_eq!(created.name, "n");
        assert_eq!(created.description.as_deref(), Some("d"));
        assert!(!created.locked);

        let req = test::TestRequest::get()
            .uri(&format!("/notes/{}", created.uuid))
            .to_request();
        let fetched: NoteDetail = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn test_list_returns_summaries_in_order() {
        let state = app_state();
        let app = init_app!(state);

        for name in ["first", "second"] {
            let req = test::TestRequest::post()
                .uri("/notes")
                .set_json(serde_json::json!({"name": name}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
        }

        let req = test::TestRequest::get().uri("/notes").to_request();
        let listed: Vec<NoteSummary> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "first");
        assert_eq!(listed[1].name, "second");
    }

    #[actix_web::test]
    async fn test_get_unknown_note_is_404() {
        let state = app_state();
        let app = init_app!(state);

        let req = test::TestRequest::get()
            .uri("/notes/00000000-0000-0000-0000-000000000000")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Note not found");
    }

    #[actix_web::test]
    async fn test_update_is_partial() {
        let state = app_state();
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/notes")
            .set_json(serde_json::json!({"name": "n", "description": "d"}))
            .to_request();
        let created: NoteDetail = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/notes/{}", created.uuid))
            .set_json(serde_json::json!({"description": "x"}))
            .to_request();
        let updated: NoteDetail = test::call_and_read_body_json(&app, req).await;

        assert_eq!(updated.name, "n");
        assert_eq!(updated.description.as_deref(), Some("x"));
    }

    #[actix_web::test]
    async fn test_lock_then_mutations_conflict() {
        let state = app_state();
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/notes")
            .set_json(serde_json::json!({"name": "n", "description": "d"}))
            .to_request();
        let created: NoteDetail = test::call_and_read_body_json(&app, req).await;

        // Rename before locking
        let req = test::TestRequest::put()
            .uri(&format!("/notes/{}", created.uuid))
            .set_json(serde_json::json!({"name": "m"}))
            .to_request();
        let updated: NoteDetail = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.name, "m");

        // Lock succeeds once
        let req = test::TestRequest::put()
            .uri(&format!("/notes/{}/lock", created.uuid))
            .to_request();
        let locked: NoteDetail = test::call_and_read_body_json(&app, req).await;
        assert!(locked.locked);

        // Second lock is a 409
        let req = test::TestRequest::put()
            .uri(&format!("/notes/{}/lock", created.uuid))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Note is already locked.");

        // Delete is a 409
        let req = test::TestRequest::delete()
            .uri(&format!("/notes/{}", created.uuid))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Note is locked and cannot be deleted.");

        // Update is a 409 and fields stay put
        let req = test::TestRequest::put()
            .uri(&format!("/notes/{}", created.uuid))
            .set_json(serde_json::json!({"name": "z"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Note is locked and cannot be modified.");

        let req = test::TestRequest::get()
            .uri(&format!("/notes/{}", created.uuid))
            .to_request();
        let fetched: NoteDetail = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched.name, "m");
        assert_eq!(fetched.description.as_deref(), Some("d"));
    }

    #[actix_web::test]
    async fn test_delete_unlocked_note() {
        let state = app_state();
        let app = init_app!(state);

        let req = test::TestRequest::post()
            .uri("/notes")
            .set_json(serde_json::json!({"name": "n"}))
            .to_request();
        let created: NoteDetail = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/notes/{}", created.uuid))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Note deleted");

        let req = test::TestRequest::get()
            .uri(&format!("/notes/{}", created.uuid))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
