use std::collections::HashMap;

use super::*;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};

const BOARD: &str = r#"{"Chess Club": {"description":"Learn strategies","schedule":"Fridays","max_participants":12,"participants":["a@x.com"]}}"#;

#[derive(Clone, Default)]
struct Backend {
    mutations: Arc<Mutex<Vec<String>>>,
    reject_with: Option<&'static str>,
}

fn json(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn list() -> Response {
    json(StatusCode::OK, BOARD.to_string())
}

async fn mutate(
    backend: Backend,
    action: &str,
    activity: String,
    query: HashMap<String, String>,
) -> Response {
    let email = query.get("email").cloned().unwrap_or_default();
    backend
        .mutations
        .lock()
        .await
        .push(format!("{action} {activity} {email}"));
    match backend.reject_with {
        Some(detail) => json(
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "detail": detail }).to_string(),
        ),
        None => json(
            StatusCode::OK,
            serde_json::json!({ "message": format!("{action} {email}") }).to_string(),
        ),
    }
}

async fn signup(
    State(backend): State<Backend>,
    Path(activity): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    mutate(backend, "signup", activity, query).await
}

async fn unregister(
    State(backend): State<Backend>,
    Path(activity): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    mutate(backend, "unregister", activity, query).await
}

async fn spawn_backend(backend: Backend) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/activities", get(list))
        .route("/activities/:activity/signup", post(signup))
        .route("/activities/:activity/unregister", delete(unregister))
        .with_state(backend);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

fn board_for(url: &str) -> (ActivityBoard, Arc<DocumentView>) {
    let api = HttpActivityApi::new(url).expect("api");
    let view = Arc::new(DocumentView::new());
    (ActivityBoard::new(Arc::new(api), view.clone()), view)
}

fn signup_cmd(activity: &str, email: &str) -> Command {
    Command::Signup {
        activity: activity.into(),
        email: email.into(),
    }
}

fn unregister_cmd(activity: &str, email: &str) -> Command {
    Command::Unregister {
        activity: activity.into(),
        email: email.into(),
    }
}

#[tokio::test]
async fn list_reflects_whether_the_board_loaded() {
    let url = spawn_backend(Backend::default()).await;
    let (board, view) = board_for(&url);
    assert!(run(Command::List, &board, &view).await);

    let (board, view) = board_for(&unreachable_url().await);
    assert!(!run(Command::List, &board, &view).await);
}

#[tokio::test]
async fn signup_through_the_form_succeeds() {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let (board, view) = board_for(&url);

    assert!(run(signup_cmd("Chess Club", "b@x.com"), &board, &view).await);
    assert_eq!(*backend.mutations.lock().await, ["signup Chess Club b@x.com"]);
}

#[tokio::test]
async fn signup_without_a_form_fails_before_sending() {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let (board, view) = board_for(&url);

    assert!(!run(signup_cmd("Drama Club", "b@x.com"), &board, &view).await);
    assert!(backend.mutations.lock().await.is_empty());
}

#[tokio::test]
async fn blank_signup_email_fails_before_sending() {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let (board, view) = board_for(&url);

    assert!(!run(signup_cmd("Chess Club", "  "), &board, &view).await);
    assert!(backend.mutations.lock().await.is_empty());
}

#[tokio::test]
async fn rejected_signup_fails() {
    let backend = Backend {
        reject_with: Some("Student is already signed up"),
        ..Backend::default()
    };
    let url = spawn_backend(backend.clone()).await;
    let (board, view) = board_for(&url);

    assert!(!run(signup_cmd("Chess Club", "a@x.com"), &board, &view).await);
    assert_eq!(backend.mutations.lock().await.len(), 1);
    assert_eq!(
        render_status(&view.status().await).as_deref(),
        Some("[error] Student is already signed up")
    );
}

#[tokio::test]
async fn signup_fails_when_the_board_cannot_load() {
    let (board, view) = board_for(&unreachable_url().await);
    assert!(!run(signup_cmd("Chess Club", "b@x.com"), &board, &view).await);
}

#[tokio::test]
async fn unregister_listed_participant_succeeds() {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let (board, view) = board_for(&url);

    assert!(run(unregister_cmd("Chess Club", "a@x.com"), &board, &view).await);
    assert_eq!(
        *backend.mutations.lock().await,
        ["unregister Chess Club a@x.com"]
    );
}

#[tokio::test]
async fn unregister_unlisted_participant_fails_before_sending() {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let (board, view) = board_for(&url);

    assert!(!run(unregister_cmd("Chess Club", "z@x.com"), &board, &view).await);
    assert!(backend.mutations.lock().await.is_empty());
}
