use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use reminder_board::models::{ReminderRecord, RemindersResponse};
use reminder_board::status::ReminderStatus;
use reminder_board::storage::encode_reminders;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

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

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

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

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/healthz")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_reminder_board"))
        .env("PORT", port.to_string())
        .env("BIND_ADDR", "127.0.0.1")
        .env("RUST_LOG", "info")
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

/// A browser stand-in: keeps its own cookies, so each client is its own session.
fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .unwrap()
}

async fn list(client: &Client, base_url: &str) -> RemindersResponse {
    client
        .get(format!("{base_url}/api/reminders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn add_json(client: &Client, base_url: &str, title: &str, persist: bool) -> RemindersResponse {
    let response = client
        .post(format!("{base_url}/api/reminders"))
        .json(&serde_json::json!({
            "title": title,
            "description": "from the api",
            "date": "2099-01-01",
            "time": "09:00",
            "persist": persist,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_form_add_with_cookie_renders_reminder() {
    let server = shared_server().await;
    let client = browser();

    let response = client
        .post(format!("{}/", server.base_url))
        .form(&[
            ("action", "add"),
            ("title", "Pay rent"),
            ("description", ""),
            ("date", "2099-01-01"),
            ("time", "09:00"),
            ("save_cookie", "1"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Reminder added successfully!"));
    assert!(page.contains("Pay rent"));
    assert!(page.contains("Your Reminders (1)"));
    assert!(!page.contains("badge-past"));

    let state = list(&client, &server.base_url).await;
    assert_eq!(state.reminders.len(), 1);
    assert_eq!(state.reminders[0].record.title, "Pay rent");
    assert_eq!(state.reminders[0].status, ReminderStatus::Upcoming);
    assert!(state.has_cookie_reminders);

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!page.contains("Reminder added successfully!"));
}

#[tokio::test]
async fn http_form_add_missing_fields_flashes_error() {
    let server = shared_server().await;
    let client = browser();

    let response = client
        .post(format!("{}/", server.base_url))
        .form(&[("action", "add"), ("title", ""), ("date", "2099-01-01"), ("time", "09:00")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Please fill in all required fields."));
    assert!(page.contains("Your Reminders (0)"));
}

#[tokio::test]
async fn http_form_unknown_action_is_rejected() {
    let server = shared_server().await;
    let client = browser();

    let response = client
        .post(format!("{}/", server.base_url))
        .form(&[("action", "rename")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_api_add_requires_title() {
    let server = shared_server().await;
    let client = browser();

    let response = client
        .post(format!("{}/api/reminders", server.base_url))
        .json(&serde_json::json!({ "title": "  ", "date": "2099-01-01", "time": "09:00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Please fill in all required fields.");

    assert!(list(&client, &server.base_url).await.reminders.is_empty());
}

#[tokio::test]
async fn http_delete_only_reminder_empties_session_and_cookie() {
    let server = shared_server().await;
    let client = browser();

    let created = add_json(&client, &server.base_url, "Only one", true).await;
    assert_eq!(created.reminders.len(), 1);
    assert!(created.has_cookie_reminders);
    let id = created.reminders[0].record.id.clone();

    let response = client
        .delete(format!("{}/api/reminders/{id}", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let after: RemindersResponse = response.json().await.unwrap();
    assert!(after.reminders.is_empty());
    assert!(!after.has_cookie_reminders);
    assert_eq!(after.message.as_deref(), Some("Reminder deleted successfully!"));

    let again: RemindersResponse = client
        .delete(format!("{}/api/reminders/{id}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(again.message.as_deref(), Some("Reminder deleted successfully!"));
}

#[tokio::test]
async fn http_clear_all_expires_cookie() {
    let server = shared_server().await;
    let client = browser();

    add_json(&client, &server.base_url, "first", true).await;
    add_json(&client, &server.base_url, "second", false).await;

    let cleared: RemindersResponse = client
        .delete(format!("{}/api/reminders", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cleared.reminders.is_empty());
    assert!(!cleared.has_cookie_reminders);

    let response = client
        .post(format!("{}/api/reminders/load", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "No reminders found in cookies.");
}

#[tokio::test]
async fn http_load_from_cookie_replaces_session() {
    let server = shared_server().await;
    let client = Client::new();

    let saved = vec![
        ReminderRecord {
            id: "saved-1".to_string(),
            title: "Renew passport".to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2099, 3, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            created_at: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        },
        ReminderRecord {
            id: "saved-2".to_string(),
            title: "Old meeting".to_string(),
            description: "already happened".to_string(),
            date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            created_at: NaiveDate::from_ymd_opt(1999, 12, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        },
    ];
    let cookie = format!("reminders={}", encode_reminders(&saved).unwrap());

    let loaded: RemindersResponse = client
        .post(format!("{}/api/reminders/load", server.base_url))
        .header(reqwest::header::COOKIE, cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(loaded.message.as_deref(), Some("Reminders loaded from cookies!"));
    let records: Vec<_> = loaded.reminders.iter().map(|view| view.record.clone()).collect();
    assert_eq!(records, saved);
    assert_eq!(loaded.reminders[0].status, ReminderStatus::Upcoming);
    assert_eq!(loaded.reminders[1].status, ReminderStatus::Past);
}

#[tokio::test]
async fn http_sessions_are_isolated() {
    let server = shared_server().await;
    let alice = browser();
    let bob = browser();

    add_json(&alice, &server.base_url, "alice only", false).await;

    assert_eq!(list(&alice, &server.base_url).await.reminders.len(), 1);
    assert!(list(&bob, &server.base_url).await.reminders.is_empty());
}

#[tokio::test]
async fn http_reads_without_session_do_not_start_one() {
    let server = shared_server().await;
    let client = Client::new();

    for path in ["/", "/api/reminders"] {
        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        let starts_session = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .any(|value| value.to_str().unwrap_or("").starts_with("reminder_sid="));
        assert!(!starts_session, "GET {path} handed out a session cookie");
    }
}
