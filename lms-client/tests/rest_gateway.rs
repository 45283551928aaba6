//! `RestGateway` against a real axum server on an ephemeral port.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use lms_client::{
    ClientConfig, CollectionRef, CourseModule, ItemId, Lesson, QuizQuestion, ReorderMethod,
    ReorderOutcome, ReorderSession, RestGateway, SyncError, SyncGateway,
};
use serde_json::{Value, json};
use shared::models::ReorderRequest;
use shared::sequence::CollectionKind;
use shared::{ApiResponse, AppError, ErrorCode};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    request_id: Option<String>,
    authorization: Option<String>,
    body: Value,
}

#[derive(Default)]
struct Backend {
    modules: Vec<Value>,
    lessons: Vec<Value>,
    requests: Vec<Recorded>,
}

type Shared = Arc<Mutex<Backend>>;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn record(state: &Shared, method: Method, path: String, headers: &HeaderMap, body: Value) {
    state.lock().unwrap().requests.push(Recorded {
        method,
        path,
        request_id: header(headers, "x-request-id"),
        authorization: header(headers, "authorization"),
        body,
    });
}

/// Reorder `items` by the ids in `body`, rejecting anything but a permutation.
fn apply(items: &mut Vec<Value>, kind: CollectionKind, body: &Value) -> Result<(), AppError> {
    let request = ReorderRequest::from_value(kind, body).ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, format!("{} required", kind.id_field()))
    })?;
    let mut next = Vec::with_capacity(items.len());
    for id in &request.ordered_ids {
        let item = items
            .iter()
            .find(|item| serde_json::from_value::<ItemId>(item["id"].clone()).ok().as_ref() == Some(id))
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::UnknownId, format!("unknown id {id}"))
                    .with_detail("id", id.to_string())
            })?;
        next.push(item.clone());
    }
    if next.len() != items.len() {
        return Err(AppError::validation("order must name every item"));
    }
    *items = next;
    Ok(())
}

async fn get_course(State(state): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    let modules = state.lock().unwrap().modules.clone();
    // bare parent object, no envelope
    Json(json!({"id": id, "title": "Rust 101", "modules": modules}))
}

async fn reorder_modules(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<ApiResponse<()>, AppError> {
    record(&state, Method::POST, format!("courses/{id}/modules/reorder"), &headers, body.clone());
    let mut backend = state.lock().unwrap();
    apply(&mut backend.modules, CollectionKind::CourseModules, &body)?;
    Ok(ApiResponse::ok())
}

async fn get_module(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    if id == 404 {
        return AppError::new(ErrorCode::ModuleNotFound).into_response();
    }
    let lessons = state.lock().unwrap().lessons.clone();
    ApiResponse::success(json!({"id": id, "title": "Basics", "lessons": lessons})).into_response()
}

async fn reorder_lessons(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<ApiResponse<()>, AppError> {
    record(&state, Method::PATCH, format!("modules/{id}/lessons/reorder"), &headers, body.clone());
    let mut backend = state.lock().unwrap();
    apply(&mut backend.lessons, CollectionKind::ModuleLessons, &body)?;
    Ok(ApiResponse::ok())
}

async fn get_quiz(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "id": id,
        "questions": [
            {"id": "q-1", "question": "One?", "question_type": "true_false"},
            {"id": "q-2", "question": "Two?", "question_type": "short_answer"}
        ]
    }))
}

async fn reorder_questions() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
}

async fn spawn_backend(state: Shared) -> String {
    let app = Router::new()
        .route("/api/courses/{id}", get(get_course))
        .route("/api/courses/{id}/modules/reorder", post(reorder_modules))
        .route("/api/modules/{id}", get(get_module))
        .route("/api/modules/{id}/lessons/reorder", patch(reorder_lessons))
        .route("/api/quizzes/{id}", get(get_quiz))
        .route("/api/quizzes/{id}/questions/reorder", post(reorder_questions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn backend() -> Shared {
    Arc::new(Mutex::new(Backend {
        modules: vec![
            json!({"id": 10, "title": "Intro"}),
            json!({"id": 11, "title": "Basics"}),
            json!({"id": 12, "title": "Advanced"}),
        ],
        lessons: vec![
            json!({"id": 1, "module_id": 11, "title": "Ownership", "type": "video"}),
            json!({"id": 2, "module_id": 11, "title": "Borrowing"}),
            json!({"id": 3, "module_id": 11, "title": "Lifetimes"}),
        ],
        requests: Vec::new(),
    }))
}

fn gateway(base_url: &str, method: ReorderMethod) -> RestGateway {
    ClientConfig::new(base_url)
        .with_token("instructor-token")
        .with_reorder_method(method)
        .build_gateway()
        .unwrap()
}

fn ids(raw: &[i64]) -> Vec<ItemId> {
    raw.iter().copied().map(ItemId::Int).collect()
}

#[tokio::test]
async fn test_fetch_bare_and_enveloped_parents() {
    let state = backend();
    let base = spawn_backend(state.clone()).await;
    let gateway = gateway(&base, ReorderMethod::Post);

    let modules: Vec<CourseModule> = gateway
        .fetch_collection(&CollectionRef::course_modules(7))
        .await
        .unwrap();
    let titles: Vec<&str> = modules.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Intro", "Basics", "Advanced"]);

    let lessons: Vec<Lesson> = gateway
        .fetch_collection(&CollectionRef::module_lessons(11))
        .await
        .unwrap();
    assert_eq!(lessons.len(), 3);
    assert_eq!(lessons[0].title, "Ownership");

    let questions: Vec<QuizQuestion> = gateway
        .fetch_collection(&CollectionRef::quiz_questions("quiz-9"))
        .await
        .unwrap();
    assert_eq!(questions[1].id, "q-2");
}

#[tokio::test]
async fn test_fetch_error_envelope_maps_to_rejected() {
    let base = spawn_backend(backend()).await;
    let gateway = gateway(&base, ReorderMethod::Post);

    let err = SyncGateway::<Lesson>::fetch_collection(&gateway, &CollectionRef::module_lessons(404))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::Rejected {
            status: 404,
            code: Some(ErrorCode::ModuleNotFound),
            ..
        }
    ));
}

#[tokio::test]
async fn test_persist_posts_full_order_with_request_id() {
    let state = backend();
    let base = spawn_backend(state.clone()).await;
    let gateway = gateway(&base, ReorderMethod::Post);

    SyncGateway::<CourseModule>::persist_order(
        &gateway,
        &CollectionRef::course_modules(7),
        &ids(&[12, 10, 11]),
    )
    .await
    .unwrap();

    let backend = state.lock().unwrap();
    let request = &backend.requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "courses/7/modules/reorder");
    assert_eq!(request.body, json!({"module_ids": [12, 10, 11]}));
    assert_eq!(request.authorization.as_deref(), Some("Bearer instructor-token"));
    let request_id = request.request_id.as_deref().unwrap();
    assert_eq!(request_id.len(), 36);
    let order: Vec<&Value> = backend.modules.iter().map(|m| &m["id"]).collect();
    assert_eq!(order, [&json!(12), &json!(10), &json!(11)]);
}

#[tokio::test]
async fn test_request_ids_are_unique_per_save() {
    let state = backend();
    let base = spawn_backend(state.clone()).await;
    let gateway = gateway(&base, ReorderMethod::Post);
    let collection = CollectionRef::course_modules(7);

    for order in [[12, 10, 11], [12, 10, 11]] {
        SyncGateway::<CourseModule>::persist_order(&gateway, &collection, &ids(&order))
            .await
            .unwrap();
    }

    let backend = state.lock().unwrap();
    assert_eq!(backend.requests.len(), 2);
    assert_ne!(backend.requests[0].request_id, backend.requests[1].request_id);
}

#[tokio::test]
async fn test_patch_rejection_carries_error_code() {
    let state = backend();
    let base = spawn_backend(state.clone()).await;
    let gateway = gateway(&base, ReorderMethod::Patch);

    let err = SyncGateway::<Lesson>::persist_order(
        &gateway,
        &CollectionRef::module_lessons(11),
        &ids(&[3, 99, 1]),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err,
        SyncError::Rejected {
            status: 422,
            code: Some(ErrorCode::UnknownId),
            message: "unknown id 99".into(),
        }
    );
    let backend = state.lock().unwrap();
    assert_eq!(backend.requests[0].method, Method::PATCH);
    assert_eq!(backend.requests[0].body, json!({"lesson_ids": [3, 99, 1]}));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = gateway(&format!("http://{addr}/api"), ReorderMethod::Post);
    let err = SyncGateway::<CourseModule>::persist_order(
        &gateway,
        &CollectionRef::course_modules(7),
        &ids(&[11, 10, 12]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)));
}

#[tokio::test]
async fn test_session_over_rest() {
    let state = backend();
    let base = spawn_backend(state.clone()).await;
    let session: ReorderSession<Lesson, _> = ReorderSession::open(
        gateway(&base, ReorderMethod::Patch),
        CollectionRef::module_lessons(11),
    )
    .await
    .unwrap();

    session.begin_drag(3).unwrap();
    assert_eq!(session.drop_on(1).await.unwrap(), ReorderOutcome::Settled);
    assert_eq!(session.ids(), ids(&[3, 1, 2]));

    session.refresh().await.unwrap();
    assert_eq!(session.ids(), ids(&[3, 1, 2]));
    assert_eq!(state.lock().unwrap().requests.len(), 1);
}

#[tokio::test]
async fn test_server_error_rolls_session_back() {
    let base = spawn_backend(backend()).await;
    let session: ReorderSession<QuizQuestion, _> = ReorderSession::open(
        gateway(&base, ReorderMethod::Post),
        CollectionRef::quiz_questions("quiz-9"),
    )
    .await
    .unwrap();
    let before = session.snapshot();

    let outcome = session.move_item("q-2", "q-1").await.unwrap();
    let Some(SyncError::Rejected { status, code, message }) = outcome.sync_error() else {
        panic!("expected a rejected save, got {outcome:?}");
    };
    assert_eq!(*status, 500);
    assert_eq!(*code, None);
    assert_eq!(message, "database unavailable");
    assert_eq!(session.snapshot(), before);
}
