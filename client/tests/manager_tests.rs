//! End-to-end manager flows against a stub backend.
//!
//! Each test binds a throwaway hyper server on an ephemeral port and points
//! the gateway at it, so the optimistic-update contracts are exercised over
//! real HTTP rather than against mocks of the gateway.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;

use client::ClientError;
use client::auth::AuthFlow;
use client::gateway::ApiGateway;
use client::guard::{self, RouteDecision};
use client::profile::ProfileManager;
use client::session::SessionStore;
use client::tasks::{TaskManager, TaskScope};
use client::users::UserManager;
use client::view::TaskQuery;
use shared::types::client_config::UploadConfig;
use shared::types::{ImageUpload, Role, SessionUser, TaskDraft};

// ---------------------------------------------------------------------------
// Stub backend
// ---------------------------------------------------------------------------

type Responder = dyn Fn(&Method, &str) -> (StatusCode, String) + Send + Sync;

async fn spawn_backend(handler: Arc<Responder>) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let io = TokioIo::new(stream);
            let handler = handler.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let handler = handler.clone();
                    async move {
                        let (status, body) = handler(req.method(), req.uri().path());
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("content-type", "application/json")
                                .body(Full::new(Bytes::from(body)))
                                .expect("build stub response"),
                        )
                    }
                });
                let _ = http1::Builder::new().serve_connection(io, service).await;
            });
        }
    });

    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn signed_in_session() -> SessionStore {
    let session = SessionStore::new();
    session.login(
        "test-token",
        SessionUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::User,
            profile_image: None,
        },
    );
    session
}

fn task_json(id: &str, title: &str, progress: u8) -> serde_json::Value {
    json!({
        "_id": id,
        "title": title,
        "description": format!("{title} description"),
        "status": "pending",
        "progress": progress,
    })
}

fn task_list(count: usize) -> String {
    let tasks: Vec<_> = (1..=count)
        .map(|i| task_json(&format!("t{i}"), &format!("Task {i}"), 0))
        .collect();
    serde_json::to_string(&tasks).expect("encode fixture")
}

fn task_manager(base_url: &str, session: SessionStore) -> TaskManager {
    TaskManager::new(
        Arc::new(ApiGateway::new(base_url)),
        session,
        UploadConfig::default(),
        TaskScope::Mine,
    )
}

// ---------------------------------------------------------------------------
// Load + pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn six_tasks_paginate_into_five_plus_one() {
    let handler: Arc<Responder> = Arc::new(|_, _| (StatusCode::OK, task_list(6)));
    let base_url = spawn_backend(handler).await;

    let mut manager = task_manager(&base_url, signed_in_session());
    manager.load().await.expect("load");

    let page1 = manager.view(&TaskQuery::new(5));
    assert_eq!(page1.items.len(), 5);
    assert_eq!(page1.total_pages, 2);

    let page2 = manager.view(&TaskQuery {
        page: 2,
        ..TaskQuery::new(5)
    });
    assert_eq!(page2.items.len(), 1);
    assert_eq!(page2.current_page, 2);
}

#[tokio::test]
async fn failed_load_preserves_previous_list_and_sets_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler: Arc<Responder> = {
        let calls = calls.clone();
        Arc::new(move |_, _| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                (StatusCode::OK, task_list(3))
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "boom"}).to_string(),
                )
            }
        })
    };
    let base_url = spawn_backend(handler).await;

    let mut manager = task_manager(&base_url, signed_in_session());
    manager.load().await.expect("first load");
    assert_eq!(manager.tasks().len(), 3);

    let err = manager.load().await.expect_err("second load fails");
    assert!(matches!(err, ClientError::Http { .. }));
    assert_eq!(manager.tasks().len(), 3, "base list must survive the failure");
    assert_eq!(manager.last_error(), Some("boom"));
}

#[tokio::test]
async fn load_without_a_token_never_reaches_the_network() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler: Arc<Responder> = {
        let calls = calls.clone();
        Arc::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            (StatusCode::OK, task_list(1))
        })
    };
    let base_url = spawn_backend(handler).await;

    let mut manager = task_manager(&base_url, SessionStore::new());
    let err = manager.load().await.expect_err("no token");
    assert!(err.is_auth_required());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn network_errors_are_distinguished_from_http_errors() {
    // Nothing listens on the discard port.
    let mut manager = task_manager("http://127.0.0.1:9", signed_in_session());
    let err = manager.load().await.expect_err("connection refused");
    assert!(matches!(err, ClientError::Network(_)));
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_pulls_the_row_only_after_confirmation() {
    let handler: Arc<Responder> = Arc::new(|method, path| {
        if method == Method::DELETE {
            assert!(path.ends_with("/delete-task"));
            (StatusCode::OK, "{}".to_string())
        } else {
            (StatusCode::OK, task_list(2))
        }
    });
    let base_url = spawn_backend(handler).await;

    let mut manager = task_manager(&base_url, signed_in_session());
    manager.load().await.expect("load");

    manager.remove("t1").await.expect("remove");
    assert_eq!(manager.tasks().len(), 1);
    assert!(manager.tasks().iter().all(|t| t.id != "t1"));
}

#[tokio::test]
async fn failed_remove_leaves_the_list_as_fetched() {
    let handler: Arc<Responder> = Arc::new(|method, _| {
        if method == Method::DELETE {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"message": "nope"}).to_string(),
            )
        } else {
            (StatusCode::OK, task_list(2))
        }
    });
    let base_url = spawn_backend(handler).await;

    let mut manager = task_manager(&base_url, signed_in_session());
    manager.load().await.expect("load");

    manager.remove("t1").await.expect_err("remove fails");
    assert_eq!(manager.tasks().len(), 2);
}

#[tokio::test]
async fn add_with_empty_title_is_rejected_before_any_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler: Arc<Responder> = {
        let calls = calls.clone();
        Arc::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            (StatusCode::OK, "{}".to_string())
        })
    };
    let base_url = spawn_backend(handler).await;

    let mut manager = task_manager(&base_url, signed_in_session());
    let err = manager
        .add(TaskDraft::new("   ", "a description"))
        .await
        .expect_err("validation");
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(manager.tasks().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn add_appends_the_server_returned_record() {
    let handler: Arc<Responder> = Arc::new(|method, path| {
        if method == Method::POST && path == "/add-task" {
            (
                StatusCode::OK,
                task_json("srv-9", "Fresh task", 10).to_string(),
            )
        } else {
            (StatusCode::OK, task_list(2))
        }
    });
    let base_url = spawn_backend(handler).await;

    let mut manager = task_manager(&base_url, signed_in_session());
    manager.load().await.expect("load");

    let created = manager
        .add(TaskDraft::new("Fresh task", "a description"))
        .await
        .expect("add");
    assert_eq!(created.id, "srv-9");
    assert_eq!(manager.tasks().len(), 3);
    // Append semantics: the new record sits at the end until the next
    // derived-view recomputation.
    assert_eq!(manager.tasks().last().map(|t| t.id.as_str()), Some("srv-9"));
}

#[tokio::test]
async fn update_returns_the_record_without_touching_the_list() {
    let handler: Arc<Responder> = Arc::new(|method, path| {
        if method == Method::PUT {
            assert!(path.ends_with("/edit-task"));
            (
                StatusCode::OK,
                task_json("t1", "Renamed", 80).to_string(),
            )
        } else {
            (StatusCode::OK, task_list(2))
        }
    });
    let base_url = spawn_backend(handler).await;

    let mut manager = task_manager(&base_url, signed_in_session());
    manager.load().await.expect("load");

    let updated = manager
        .update("t1", TaskDraft::new("Renamed", "a description"))
        .await
        .expect("update");
    assert_eq!(updated.title, "Renamed");
    // The caller refreshes explicitly.
    assert_eq!(manager.tasks()[0].title, "Task 1");

    manager.replace_local(updated);
    assert_eq!(manager.tasks()[0].title, "Renamed");
    assert_eq!(manager.tasks()[0].progress, 80);
}

// ---------------------------------------------------------------------------
// Auth + guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_opens_the_session_and_the_guard_applies_roles() {
    let handler: Arc<Responder> = Arc::new(|method, path| {
        assert_eq!((method, path), (&Method::POST, "/login"));
        (
            StatusCode::OK,
            json!({
                "token": "jwt-abc",
                "user": {"username": "bob", "email": "bob@example.com", "role": "User"}
            })
            .to_string(),
        )
    });
    let base_url = spawn_backend(handler).await;

    let session = SessionStore::new();
    let auth = AuthFlow::new(Arc::new(ApiGateway::new(base_url)), session.clone());
    let user = auth.login("bob@example.com", "hunter2").await.expect("login");

    let state = session.current();
    assert!(state.authenticated);
    assert_eq!(session.token().as_deref(), Some("jwt-abc"));

    assert_eq!(
        guard::decide(state.authenticated, Some(user.role), "/admin"),
        RouteDecision::Redirect(guard::SITE_ROOT)
    );
    assert_eq!(
        guard::decide(state.authenticated, Some(user.role), "/tasks"),
        RouteDecision::Allow
    );
}

#[tokio::test]
async fn rejected_login_surfaces_the_server_message_and_stays_signed_out() {
    let handler: Arc<Responder> = Arc::new(|_, _| {
        (
            StatusCode::UNAUTHORIZED,
            json!({"message": "Invalid credentials"}).to_string(),
        )
    });
    let base_url = spawn_backend(handler).await;

    let session = SessionStore::new();
    let auth = AuthFlow::new(Arc::new(ApiGateway::new(base_url)), session.clone());
    let err = auth
        .login("bob@example.com", "wrong")
        .await
        .expect_err("rejected");

    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!session.current().authenticated);
}

// ---------------------------------------------------------------------------
// Users (admin)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn user_listing_filters_and_removes_after_confirmation() {
    let handler: Arc<Responder> = Arc::new(|method, path| {
        if method == Method::DELETE {
            assert_eq!(path, "/user/u2/remove");
            (StatusCode::OK, "{}".to_string())
        } else {
            (
                StatusCode::OK,
                json!([
                    {"_id": "u1", "name": "Ada", "email": "ada@calc.org", "role": "admin"},
                    {"_id": "u2", "username": "turing", "email": "alan@bletchley.uk"},
                    {"_id": "u3", "email": "grace@navy.mil", "role": "User"},
                ])
                .to_string(),
            )
        }
    });
    let base_url = spawn_backend(handler).await;

    let mut manager = UserManager::new(
        Arc::new(ApiGateway::new(base_url)),
        signed_in_session(),
    );
    manager.load().await.expect("load users");
    assert_eq!(manager.users().len(), 3);

    let matching = manager.apply_filter("turing");
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].display_name(), "turing");

    manager.remove("u2").await.expect("remove user");
    assert_eq!(manager.users().len(), 2);
    assert!(manager.users().iter().all(|u| u.id != "u2"));
}

// ---------------------------------------------------------------------------
// Profile picture
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_picture_roundtrip_writes_through_the_session() {
    let handler: Arc<Responder> = Arc::new(|method, path| {
        assert_eq!((method, path), (&Method::PUT, "/edit-user"));
        (
            StatusCode::OK,
            json!({"profileImage": "avatar-1.png"}).to_string(),
        )
    });
    let base_url = spawn_backend(handler).await;

    let session = signed_in_session();
    let manager = ProfileManager::new(
        Arc::new(ApiGateway::new(base_url)),
        session.clone(),
        UploadConfig::default(),
    );

    let reference = manager
        .upload_picture(ImageUpload {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"\x89PNG fake"),
        })
        .await
        .expect("upload");
    assert_eq!(reference.as_deref(), Some("avatar-1.png"));
    assert_eq!(
        session.current().user.unwrap().profile_image.as_deref(),
        Some("avatar-1.png")
    );

    manager.remove_picture().await.expect("remove");
    assert!(session.current().user.unwrap().profile_image.is_none());
}

#[tokio::test]
async fn oversized_profile_pictures_are_rejected_locally() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler: Arc<Responder> = {
        let calls = calls.clone();
        Arc::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            (StatusCode::OK, "{}".to_string())
        })
    };
    let base_url = spawn_backend(handler).await;

    let manager = ProfileManager::new(
        Arc::new(ApiGateway::new(base_url)),
        signed_in_session(),
        UploadConfig {
            max_bytes: 8,
            ..UploadConfig::default()
        },
    );

    let err = manager
        .upload_picture(ImageUpload {
            file_name: "big.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from(vec![0u8; 9]),
        })
        .await
        .expect_err("too large");
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
