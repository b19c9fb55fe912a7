use crate::actions::{self, Action};
use crate::errors::{ActionError, AppError};
use crate::gateway::{CookieStore, JarCookies, SessionStore};
use crate::models::{ActionForm, NewReminder, Notice, RemindersResponse};
use crate::session::{session_cookie, session_id, SessionData};
use crate::state::AppState;
use crate::status::{local_now, to_views};
use crate::ui::render_index;
use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDateTime;
use std::time::Instant;
use tracing::error;

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let now = local_now();
    let (jar, html) = read_session(&state, jar, |session, cookies| {
        let notice = session.take_flash();
        render_index(
            session.reminders(),
            cookies.has_reminders(),
            notice.as_ref(),
            now,
        )
    })
    .await;
    (jar, Html(html))
}

pub async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<ActionForm>, FormRejection>,
) -> Result<(CookieJar, Redirect), AppError> {
    let Form(form) = form.map_err(|err| AppError::bad_request(err.body_text()))?;
    let action = Action::try_from(form)?;
    let now = local_now();

    let (jar, ()) = with_session(&state, jar, |session, cookies| {
        let notice = match actions::apply(action, session, cookies, now) {
            Ok(message) => Notice::success(message),
            Err(err) => {
                if let ActionError::Cookie(inner) = &err {
                    error!("failed to save reminders cookie: {inner}");
                }
                Notice::error(err.to_string())
            }
        };
        session.set_flash(notice);
    })
    .await;

    Ok((jar, Redirect::to("/")))
}

pub async fn list_reminders(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<RemindersResponse>) {
    let now = local_now();
    let (jar, response) =
        read_session(&state, jar, |session, cookies| snapshot(session, cookies, None, now)).await;
    (jar, Json(response))
}

pub async fn create_reminder(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<NewReminder>,
) -> Result<(StatusCode, CookieJar, Json<RemindersResponse>), AppError> {
    let (jar, response) = run_api(&state, jar, Action::Add(payload)).await?;
    Ok((StatusCode::CREATED, jar, response))
}

pub async fn delete_reminder(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, Json<RemindersResponse>), AppError> {
    run_api(&state, jar, Action::Delete { id }).await
}

pub async fn clear_reminders(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RemindersResponse>), AppError> {
    run_api(&state, jar, Action::ClearAll).await
}

pub async fn load_reminders(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RemindersResponse>), AppError> {
    run_api(&state, jar, Action::LoadFromCookie).await
}

pub async fn health() -> &'static str {
    "ok"
}

async fn run_api(
    state: &AppState,
    jar: CookieJar,
    action: Action,
) -> Result<(CookieJar, Json<RemindersResponse>), AppError> {
    let now = local_now();
    let (jar, result) = with_session(state, jar, |session, cookies| {
        actions::apply(action, session, cookies, now)
            .map(|message| snapshot(session, cookies, Some(message), now))
    })
    .await;

    let response = result?;
    Ok((jar, Json(response)))
}

fn snapshot(
    session: &SessionData,
    cookies: &JarCookies,
    message: Option<&str>,
    now: NaiveDateTime,
) -> RemindersResponse {
    RemindersResponse {
        message: message.map(str::to_string),
        reminders: to_views(session.reminders(), now),
        has_cookie_reminders: cookies.has_reminders(),
    }
}

async fn with_session<T>(
    state: &AppState,
    jar: CookieJar,
    f: impl FnOnce(&mut SessionData, &mut JarCookies) -> T,
) -> (CookieJar, T) {
    let incoming = session_id(&jar);
    let mut sessions = state.sessions.lock().await;
    let (id, session) = sessions.open(incoming, Instant::now());

    let mut cookies = JarCookies::new(jar);
    let out = f(session, &mut cookies);

    let mut jar = cookies.into_jar();
    if incoming != Some(id) {
        jar = jar.add(session_cookie(id));
    }
    (jar, out)
}

// Read-only requests without a live session see an empty one and get no
// session cookie, so cookie-less clients don't fill the registry.
async fn read_session<T>(
    state: &AppState,
    jar: CookieJar,
    f: impl FnOnce(&mut SessionData, &mut JarCookies) -> T,
) -> (CookieJar, T) {
    let incoming = session_id(&jar);
    let mut sessions = state.sessions.lock().await;
    let mut cookies = JarCookies::new(jar);
    let out = match sessions.get(incoming, Instant::now()) {
        Some(session) => f(session, &mut cookies),
        None => f(&mut SessionData::default(), &mut cookies),
    };
    (cookies.into_jar(), out)
}
