use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use myco_core::blog::BLOG_COLLECTION;
use myco_core::catalog::RecipeCatalog;
use myco_core::error::StoreError;
use myco_core::feed::FeedState;
use myco_core::ports::{DocumentQuery, DocumentStore, StoredDocument};
use myco_infra::{EmailAdminPolicy, InMemoryDocumentStore};

use super::Routes;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

#[cfg(feature = "auth")]
use myco_core::ports::TokenService;
#[cfg(feature = "auth")]
use myco_infra::{JwtConfig, JwtTokenService};

const ADMIN_EMAIL: &str = "admin@mushroomservice.com";

struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn query(&self, _query: &DocumentQuery) -> Result<Vec<StoredDocument>, StoreError> {
        Err(StoreError::Connection("connection refused".to_string()))
    }
}

/// Each query waits on the next gate, so a test decides the resolution order.
struct GatedStore {
    gates: Mutex<VecDeque<tokio::sync::oneshot::Receiver<Vec<StoredDocument>>>>,
}

impl GatedStore {
    fn waiting(&self) -> usize {
        self.gates.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn query(&self, _query: &DocumentQuery) -> Result<Vec<StoredDocument>, StoreError> {
        let gate = self.gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| StoreError::Connection("gate dropped".to_string())),
            None => Err(StoreError::Connection("no gate".to_string())),
        }
    }
}

fn state_with(store: Arc<dyn DocumentStore>) -> AppState {
    AppState::with_store(
        store,
        Arc::new(EmailAdminPolicy::default()),
        RecipeCatalog::with_defaults(),
    )
}

#[cfg(feature = "rate-limit")]
fn routes() -> Routes {
    use myco_infra::{InMemoryRateLimiter, RateLimitConfig};

    let limiter = InMemoryRateLimiter::new(RateLimitConfig::default()).expect("valid limiter config");
    Routes::new(Arc::new(limiter))
}

#[cfg(not(feature = "rate-limit"))]
fn routes() -> Routes {
    Routes::new()
}

#[cfg(feature = "auth")]
fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig::default()))
}

#[cfg(feature = "auth")]
fn bearer(email: &str) -> (&'static str, String) {
    let token = token_service()
        .generate_token("user-1", Some(email))
        .expect("token");
    ("Authorization", format!("Bearer {}", token))
}

macro_rules! test_app {
    ($state:expr) => {{
        let app = App::new()
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new($state));
        #[cfg(feature = "auth")]
        let app = app.app_data(web::Data::new(token_service()));
        let routes = routes();
        test::init_service(app.configure(move |cfg| routes.configure(cfg))).await
    }};
}

fn submission(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Low nutrient agar for cloning",
        "category": "agar",
        "ingredients": ["500ml water", "10g agar"],
        "instructions": ["Mix", "Sterilize"],
        "author": "Grower Bob"
    })
}

fn post(id: &str, title: &str, published: bool, day: u32) -> StoredDocument {
    let created = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
    StoredDocument::new(id)
        .with_field("title", title)
        .with_field("content", "Spores everywhere")
        .with_field("is_published", published)
        .with_field("created_at", created)
        .with_field("updated_at", created)
        .with_field("published_at", published.then_some(created))
}

async fn seeded_store() -> Arc<InMemoryDocumentStore> {
    let store = Arc::new(InMemoryDocumentStore::new());
    store.put(BLOG_COLLECTION, post("p1", "Older", true, 1)).await;
    store.put(BLOG_COLLECTION, post("p2", "Draft", false, 2)).await;
    store.put(BLOG_COLLECTION, post("p3", "Newest", true, 3)).await;
    store
}

fn titles(posts: &Value) -> Vec<&str> {
    posts
        .as_array()
        .expect("posts array")
        .iter()
        .filter_map(|p| p["title"].as_str())
        .collect()
}

#[actix_rt::test]
async fn test_health_reports_catalog_size() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["recipes"], 5);
}

#[actix_rt::test]
async fn test_list_recipes_public_view() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::get().uri("/api/recipes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["recipes"].as_array().unwrap().len(), 5);
    assert!(body["data"].get("pendingCount").is_none());
    assert!(body["data"].get("pending_count").is_none());

    let counts = body["data"]["counts"].as_array().unwrap();
    assert_eq!(counts.len(), 5);
    assert_eq!(counts[0]["category"], "all");
    assert_eq!(counts[0]["count"], 5);
}

#[actix_rt::test]
async fn test_list_recipes_rejects_unknown_category() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::get()
        .uri("/api/recipes?category=spawn")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_submit_recipe_lands_pending_and_hidden() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .set_json(submission("Cloning Agar"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    let recipe = &body["data"];
    assert_eq!(recipe["status"], "pending");
    assert_eq!(recipe["isCustom"], true);
    let id = recipe["id"].as_str().unwrap().to_string();

    // Pending recipes stay out of the public catalog.
    let req = test::TestRequest::get()
        .uri("/api/recipes?search=cloning")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"]["recipes"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_submit_recipe_requires_title() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .set_json(submission("   "))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_admin_routes_require_sign_in() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::get()
        .uri("/api/admin/recipes/pending")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/admin/recipes/1/moderation")
        .set_json(json!({ "action": "reject" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[cfg(feature = "auth")]
#[actix_rt::test]
async fn test_non_admin_is_forbidden() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::delete()
        .uri("/api/admin/recipes/1")
        .insert_header(bearer("grower@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The recipe is untouched.
    let req = test::TestRequest::get().uri("/api/recipes/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[cfg(feature = "auth")]
#[actix_rt::test]
async fn test_bad_token_is_treated_as_anonymous() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::get()
        .uri("/api/recipes")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/admin/recipes/pending")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[cfg(feature = "auth")]
#[actix_rt::test]
async fn test_admin_approves_submission() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .set_json(submission("Cloning Agar"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/admin/recipes/pending")
        .insert_header(bearer(ADMIN_EMAIL))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let pending = body["data"]["recipes"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], id.as_str());

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/recipes/{}/moderation", id))
        .insert_header(bearer(ADMIN_EMAIL))
        .set_json(json!({ "action": "approve" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["removed"], false);
    assert_eq!(body["data"]["recipe"]["status"], "approved");

    let req = test::TestRequest::get().uri("/api/recipes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["recipes"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"]["counts"][1]["category"], "agar");
}

#[cfg(feature = "auth")]
#[actix_rt::test]
async fn test_admin_sees_pending_count_and_unapproved() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .set_json(submission("Cloning Agar"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/recipes")
        .insert_header(bearer(ADMIN_EMAIL))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["recipes"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"]["pendingCount"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/{}", id))
        .insert_header(bearer(ADMIN_EMAIL))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[cfg(feature = "auth")]
#[actix_rt::test]
async fn test_admin_deletes_recipe() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    let req = test::TestRequest::delete()
        .uri("/api/admin/recipes/2")
        .insert_header(bearer(ADMIN_EMAIL))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["removed"], true);
    assert!(body["data"].get("recipe").is_none());

    let req = test::TestRequest::get().uri("/api/recipes/2").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A second delete finds nothing.
    let req = test::TestRequest::delete()
        .uri("/api/admin/recipes/2")
        .insert_header(bearer(ADMIN_EMAIL))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_blog_posts_public_sees_published_newest_first() {
    let store = seeded_store().await;
    let app = test_app!(state_with(store));

    let req = test::TestRequest::get().uri("/api/blog/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let posts = &body["data"]["posts"];
    assert_eq!(titles(posts), vec!["Newest", "Older"]);
    assert_eq!(posts[0]["created_at"], "2024-03-03T12:00:00.000Z");
    assert_eq!(posts[0]["published_at"], "2024-03-03T12:00:00.000Z");
    assert_eq!(posts[0]["is_published"], true);
}

#[cfg(feature = "auth")]
#[actix_rt::test]
async fn test_blog_posts_admin_sees_drafts() {
    let store = seeded_store().await;
    let app = test_app!(state_with(store));

    let req = test::TestRequest::get()
        .uri("/api/blog/posts")
        .insert_header(bearer(ADMIN_EMAIL))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let posts = &body["data"]["posts"];
    assert_eq!(titles(posts), vec!["Newest", "Draft", "Older"]);
    assert_eq!(posts[1]["published_at"], Value::Null);
}

#[actix_rt::test]
async fn test_blog_store_failure() {
    let app = test_app!(state_with(Arc::new(FailingStore)));

    let req = test::TestRequest::get().uri("/api/blog/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let req = test::TestRequest::get().uri("/api/blog/feed").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["state"], "error");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("connection refused")
    );
}

#[actix_rt::test]
async fn test_blog_feed_loaded() {
    let store = seeded_store().await;
    let app = test_app!(state_with(store));

    let req = test::TestRequest::get().uri("/api/blog/feed").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["state"], "loaded");
    assert_eq!(titles(&body["posts"]), vec!["Newest", "Older"]);
}

#[actix_rt::test]
async fn test_blog_feed_drops_superseded_refresh() {
    let (stale_tx, stale_rx) = tokio::sync::oneshot::channel();
    let (fresh_tx, fresh_rx) = tokio::sync::oneshot::channel();
    let store = Arc::new(GatedStore {
        gates: Mutex::new(VecDeque::from([stale_rx, fresh_rx])),
    });
    let state = state_with(store.clone());
    let app = test_app!(state.clone());

    let first = test::call_and_read_body_json::<_, _, Value>(
        &app,
        test::TestRequest::get().uri("/api/blog/feed").to_request(),
    );
    let second = test::call_and_read_body_json::<_, _, Value>(
        &app,
        test::TestRequest::get().uri("/api/blog/feed").to_request(),
    );
    let resolve = async {
        while store.waiting() > 0 {
            tokio::task::yield_now().await;
        }
        fresh_tx.send(vec![post("fresh", "Fresh", true, 5)]).unwrap();
        while state.feed(false).state() == FeedState::Loading {
            tokio::task::yield_now().await;
        }
        // The older request resolves last.
        stale_tx.send(vec![post("stale", "Stale", true, 4)]).unwrap();
    };

    let (first, second, ()) = tokio::join!(first, second, resolve);

    assert_eq!(titles(&second["posts"]), vec!["Fresh"]);
    assert_eq!(titles(&first["posts"]), vec!["Fresh"]);
    match state.feed(false).state() {
        FeedState::Loaded { posts } => assert_eq!(posts[0].id, "fresh"),
        other => panic!("unexpected feed state: {other:?}"),
    }
}

#[cfg(feature = "auth")]
#[actix_rt::test]
async fn test_blog_feed_is_kept_per_viewing_context() {
    let store = seeded_store().await;
    let state = state_with(store);
    let app = test_app!(state.clone());

    let req = test::TestRequest::get()
        .uri("/api/blog/feed")
        .insert_header(bearer(ADMIN_EMAIL))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(titles(&body["posts"]), vec!["Newest", "Draft", "Older"]);

    // The admin refresh never touched the public feed.
    assert_eq!(state.feed(false).state(), FeedState::Loading);

    let req = test::TestRequest::get().uri("/api/blog/feed").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(titles(&body["posts"]), vec!["Newest", "Older"]);
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_submissions_are_rate_limited() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    for i in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/recipes")
            .set_json(submission(&format!("Recipe {}", i)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .set_json(submission("One too many"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));

    // Reads are never limited.
    let req = test::TestRequest::get().uri("/api/recipes").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_forwarded_headers_do_not_reset_the_limit() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));
    let peer: std::net::SocketAddr = "203.0.113.7:40000".parse().unwrap();

    let mut created = 0;
    for i in 0..8 {
        let forwarded = format!("198.51.100.{}", i);
        let req = test::TestRequest::post()
            .uri("/api/recipes")
            .peer_addr(peer)
            .insert_header(("X-Forwarded-For", forwarded.clone()))
            .insert_header(("Forwarded", format!("for={}", forwarded)))
            .set_json(submission(&format!("Recipe {}", i)))
            .to_request();
        if test::call_service(&app, req).await.status() == StatusCode::CREATED {
            created += 1;
        }
    }

    assert_eq!(created, 5);
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_rate_limit_is_per_peer_address() {
    let app = test_app!(state_with(Arc::new(InMemoryDocumentStore::new())));

    for port in 40000..40005 {
        let req = test::TestRequest::post()
            .uri("/api/recipes")
            .peer_addr(format!("203.0.113.7:{}", port).parse().unwrap())
            .set_json(submission("From one host"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    // Same host on a new port is still the same client.
    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .peer_addr("203.0.113.7:50000".parse().unwrap())
        .set_json(submission("Same host again"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .peer_addr("203.0.113.8:40000".parse().unwrap())
        .set_json(submission("Another host"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
}
