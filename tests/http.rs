use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    email: String,
}

#[derive(Debug, Deserialize)]
struct DayBucket {
    date: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    visits_by_day: Vec<DayBucket>,
    total_visits: u64,
    search_count: u64,
}

#[derive(Debug, Deserialize)]
struct WatchResponse {
    signed_in: bool,
}

// The server runs with TZ=UTC so the formatted bucket dates are stable.
const SEED_JSON: &str = r#"{
  "users": [
    { "email": "admin@example.com", "password": "s3cret", "role": "admin" },
    { "email": "viewer@example.com", "password": "viewer-pass", "role": "viewer" },
    { "email": "ghost@example.com", "password": "ghost-pass" }
  ],
  "visits": [
    "2026-08-05T13:00:00Z",
    "2026-08-05T12:00:00Z",
    "2026-08-04T09:00:00Z"
  ],
  "searches": 42
}"#;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn write_seed_file() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "admin_dashboard_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    std::fs::write(&path, SEED_JSON).expect("write seed file");
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/login")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let seed_path = write_seed_file();
    let child = Command::new(env!("CARGO_BIN_EXE_admin_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", seed_path)
        .env("RUST_LOG", "info")
        .env("TZ", "UTC")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn login(client: &Client, base_url: &str, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap()
}

fn session_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("set-cookie")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .expect("set-cookie header")
        .to_string()
}

#[tokio::test]
async fn http_login_rejects_bad_password() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = login(&client, &server.base_url, "admin@example.com", "wrong").await;
    assert_eq!(response.status(), 401);
    assert!(response.headers().get("set-cookie").is_none());
    assert_eq!(response.text().await.unwrap(), "invalid credentials");
}

#[tokio::test]
async fn http_login_rejects_non_admin() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = login(&client, &server.base_url, "viewer@example.com", "viewer-pass").await;
    assert_eq!(response.status(), 403);
    assert_eq!(response.text().await.unwrap(), "access denied: admins only");
}

#[tokio::test]
async fn http_login_rejects_user_without_profile() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = login(&client, &server.base_url, "ghost@example.com", "ghost-pass").await;
    assert_eq!(response.status(), 403);
    assert_eq!(
        response.text().await.unwrap(),
        "access denied: profile not found"
    );
}

#[tokio::test]
async fn http_admin_sees_seeded_statistics() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = login(&client, &server.base_url, "admin@example.com", "s3cret").await;
    assert_eq!(response.status(), 200);
    let cookie = session_cookie(&response);
    let body: SessionResponse = response.json().await.unwrap();
    assert_eq!(body.email, "admin@example.com");

    let session: SessionResponse = client
        .get(format!("{}/api/session", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session.email, "admin@example.com");

    let stats: StatsResponse = client
        .get(format!("{}/api/stats", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats.visits_by_day.len(), 2);
    assert_eq!(stats.visits_by_day[0].date, "04/08/2026");
    assert_eq!(stats.visits_by_day[0].count, 1);
    assert_eq!(stats.visits_by_day[1].date, "05/08/2026");
    assert_eq!(stats.visits_by_day[1].count, 2);
    assert_eq!(stats.total_visits, 3);
    assert_eq!(stats.search_count, 42);

    let page = client
        .get(format!("{}/", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(page.url().path(), "/");
    assert!(page.text().await.unwrap().contains("admin@example.com"));
}

#[tokio::test]
async fn http_without_session_redirects_to_login() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.url().path(), "/login");
}

#[tokio::test]
async fn http_logout_ends_the_session() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = login(&client, &server.base_url, "admin@example.com", "s3cret").await;
    let cookie = session_cookie(&response);

    let logout = client
        .post(format!("{}/api/logout", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status(), 204);

    let session = client
        .get(format!("{}/api/session", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(session.status(), 401);
}

#[tokio::test]
async fn http_watch_answers_a_sign_out() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = login(&client, &server.base_url, "admin@example.com", "s3cret").await;
    let cookie = session_cookie(&response);

    let watch_client = client.clone();
    let watch_url = format!("{}/api/session/watch", server.base_url);
    let watch_cookie = cookie.clone();
    let watch = tokio::spawn(async move {
        watch_client
            .get(watch_url)
            .header("cookie", watch_cookie)
            .send()
            .await
            .unwrap()
            .json::<WatchResponse>()
            .await
            .unwrap()
    });

    // Let the long poll subscribe before revoking the session.
    sleep(Duration::from_millis(300)).await;
    client
        .post(format!("{}/api/logout", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();

    let outcome = watch.await.unwrap();
    assert!(!outcome.signed_in);
}
