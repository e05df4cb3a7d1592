//! End-to-end signup-style flows: length gate, breach gate, pepper, and
//! verification against a loopback range server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;

use passguard::{BreachChecker, CredentialHasher, Error, HashParams, PasswordConfig};

// SHA1("password123") = CBFDAC6008F9CAB4083784CBD1874F76618D2A97
const BREACHED_SUFFIX: &str = "C6008F9CAB4083784CBD1874F76618D2A97";

#[derive(Clone)]
struct ServerState {
    hits: Arc<AtomicUsize>,
    body: String,
}

async fn range(State(state): State<ServerState>, Path(prefix): Path<String>) -> String {
    assert_eq!(prefix.len(), 5);
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.body.clone()
}

async fn spawn_range_server(body: &str) -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = ServerState {
        hits: Arc::clone(&hits),
        body: body.to_owned(),
    };
    let app = Router::new()
        .route("/range/{prefix}", get(range))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (addr, hits)
}

fn test_params() -> HashParams {
    HashParams {
        memory_cost_kib: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

fn hasher_against(addr: SocketAddr, config: PasswordConfig) -> CredentialHasher {
    let checker = BreachChecker::builder()
        .base_url(format!("http://{addr}"))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    CredentialHasher::new(config)
        .unwrap()
        .with_breach_checker(checker)
        .with_params(test_params())
}

#[tokio::test]
async fn breached_password_is_rejected() {
    let body = format!("0018A45C4D1DEF81644B54AB7F969B88D65:13\r\n{BREACHED_SUFFIX}:2254650");
    let (addr, _) = spawn_range_server(&body).await;
    let hasher = hasher_against(addr, PasswordConfig::default());

    match hasher.generate_password_hash("password123").await {
        Err(Error::CommonPassword) => {}
        other => panic!("expected CommonPassword, got {other:?}"),
    }
}

#[tokio::test]
async fn unbreached_password_hashes_and_verifies() {
    // The range for "password123" comes back without its suffix.
    let body = "0018A45C4D1DEF81644B54AB7F969B88D65:13";
    let (addr, hits) = spawn_range_server(body).await;
    let hasher = hasher_against(addr, PasswordConfig::default());

    let hash = hasher.generate_password_hash("password123").await.unwrap();
    assert!(hasher.check_password_hash(&hash, "password123"));
    assert!(!hasher.check_needs_rehash(&hash));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn short_password_makes_no_network_call() {
    let (addr, hits) = spawn_range_server("").await;
    let hasher = hasher_against(addr, PasswordConfig::default());

    assert!(matches!(
        hasher.generate_password_hash("seven77").await,
        Err(Error::ShortPassword { min_length: 8 })
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disabled_check_makes_no_network_call() {
    let (addr, hits) = spawn_range_server("").await;
    let hasher = hasher_against(addr, PasswordConfig::default().with_check_common(false));

    let hash = hasher.generate_password_hash("password123").await.unwrap();
    assert!(hasher.check_password_hash(&hash, "password123"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn breach_service_failure_aborts_generation() {
    // Nothing listens on the discard port; the transport failure must reach
    // the caller rather than degrade into a skipped check.
    let checker = BreachChecker::builder()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let hasher = CredentialHasher::new(PasswordConfig::default())
        .unwrap()
        .with_breach_checker(checker)
        .with_params(test_params());

    match hasher.generate_password_hash("password123").await {
        Err(Error::Breach(_)) => {}
        other => panic!("expected Breach error, got {other:?}"),
    }
}

#[tokio::test]
async fn verification_makes_no_network_call() {
    let body = "0018A45C4D1DEF81644B54AB7F969B88D65:13";
    let (addr, hits) = spawn_range_server(body).await;
    let hasher = hasher_against(addr, PasswordConfig::default());

    let hash = hasher.generate_password_hash("password123").await.unwrap();
    let fetches_after_generate = hits.load(Ordering::SeqCst);

    assert!(hasher.check_password_hash(&hash, "password123"));
    assert!(!hasher.check_password_hash(&hash, "wrong password"));
    assert_eq!(hits.load(Ordering::SeqCst), fetches_after_generate);
}

#[tokio::test]
async fn peppered_flow_end_to_end() {
    let body = "0018A45C4D1DEF81644B54AB7F969B88D65:13";
    let (addr, _) = spawn_range_server(body).await;

    let hasher =
        hasher_against(addr, PasswordConfig::default().with_secret("server pepper"));
    let hash = hasher.generate_password_hash("password123").await.unwrap();

    assert!(hasher.check_password_hash(&hash, "password123"));

    let rotated =
        hasher_against(addr, PasswordConfig::default().with_secret("rotated pepper"));
    assert!(!rotated.check_password_hash(&hash, "password123"));
}
