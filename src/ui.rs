use crate::models::{Notice, NoticeKind, ReminderRecord};
use crate::status::{derive_status_at, occurs_at};
use chrono::NaiveDateTime;

pub fn render_index(
    reminders: &[ReminderRecord],
    has_cookie_reminders: bool,
    notice: Option<&Notice>,
    now: NaiveDateTime,
) -> String {
    let clear_all = if reminders.is_empty() {
        ""
    } else {
        CLEAR_ALL_FORM
    };
    let cookie_notice = if reminders.is_empty() && has_cookie_reminders {
        COOKIE_NOTICE
    } else {
        ""
    };

    INDEX_HTML
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace("{{COOKIE_NOTICE}}", cookie_notice)
        .replace("{{COUNT}}", &reminders.len().to_string())
        .replace("{{CLEAR_ALL}}", clear_all)
        .replace("{{REMINDERS}}", &render_reminders(reminders, now))
}

fn render_notice(notice: Option<&Notice>) -> String {
    match notice {
        Some(notice) => {
            let class = match notice.kind {
                NoticeKind::Success => "alert-success",
                NoticeKind::Error => "alert-error",
            };
            format!(
                r#"<div class="alert {class}">{}</div>"#,
                escape_html(&notice.text)
            )
        }
        None => String::new(),
    }
}

fn render_reminders(reminders: &[ReminderRecord], now: NaiveDateTime) -> String {
    if reminders.is_empty() {
        return EMPTY_STATE.to_string();
    }

    let mut html = String::from(r#"<div class="reminders-grid">"#);
    for record in reminders {
        html.push_str(&render_card(record, now));
    }
    html.push_str("</div>");
    html
}

fn render_card(record: &ReminderRecord, now: NaiveDateTime) -> String {
    let status = derive_status_at(record, now);
    let at = occurs_at(record);

    let mut card = format!(
        r#"<div class="reminder-card {class}">
  <div class="reminder-header">
    <h3>{title}</h3>
    <form method="post" action="/" class="inline" onsubmit="return confirm('Delete this reminder?')">
      <input type="hidden" name="action" value="delete" />
      <input type="hidden" name="id" value="{id}" />
      <button type="submit" class="btn-delete" title="Delete">&times;</button>
    </form>
  </div>"#,
        class = status.css_class(),
        title = escape_html(&record.title),
        id = escape_html(&record.id),
    );

    if !record.description.is_empty() {
        card.push_str(&format!(
            r#"
  <p class="reminder-description">{}</p>"#,
            escape_html(&record.description)
        ));
    }

    card.push_str(&format!(
        r#"
  <div class="reminder-datetime">
    <span class="date">&#128197; {date}</span>
    <span class="time">&#128336; {time}</span>
  </div>"#,
        date = at.format("%b %d, %Y"),
        time = at.format("%I:%M %p"),
    ));

    if let Some(badge) = status.badge() {
        card.push_str(&format!(
            r#"
  <span class="badge badge-{}">{badge}</span>"#,
            status.css_class()
        ));
    }

    card.push_str(&format!(
        r#"
  <div class="reminder-meta"><small>Created on: {}</small></div>
</div>"#,
        record.created_at.format("%b %d, %Y %I:%M %p")
    ));
    card
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const COOKIE_NOTICE: &str = r#"<div class="cookie-notice">
        <p>&#127850; You have reminders saved in cookies!</p>
        <form method="post" action="/" class="inline">
          <input type="hidden" name="action" value="load_from_cookie" />
          <button type="submit" class="btn btn-secondary">Load from Cookies</button>
        </form>
      </div>"#;

const CLEAR_ALL_FORM: &str = r#"<form method="post" action="/" class="inline" onsubmit="return confirm('Are you sure you want to clear all reminders?')">
          <input type="hidden" name="action" value="clear_all" />
          <button type="submit" class="btn btn-danger">Clear All</button>
        </form>"#;

const EMPTY_STATE: &str = r#"<div class="empty-state">
        <p>No reminders yet. Add your first reminder above!</p>
      </div>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Reminder Board</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #2b2a28;
      --muted: #6b645d;
      --accent: #3d6b8c;
      --danger: #c4463a;
      --past: #9c958d;
      --today: #e0a32e;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(43, 42, 40, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #e6ecef);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 32px 18px 48px;
    }

    .container {
      width: min(920px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
    }

    .alert {
      padding: 14px 18px;
      border-radius: 12px;
      transition: opacity 300ms ease;
    }

    .alert-success {
      background: #e2f3e5;
      color: #24613a;
    }

    .alert-error {
      background: #fbe3e0;
      color: #8a2a21;
    }

    .info-box,
    .cookie-notice,
    .form-container,
    .reminders-container {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 22px 24px;
    }

    .info-box h3 {
      margin-top: 0;
    }

    .cookie-notice {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
      background: #fff6e0;
    }

    .form-group {
      display: grid;
      gap: 6px;
      margin-bottom: 14px;
    }

    .form-row {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 14px;
    }

    input[type="text"],
    input[type="date"],
    input[type="time"],
    textarea {
      font: inherit;
      padding: 10px 12px;
      border: 1px solid #d6d0c8;
      border-radius: 10px;
    }

    .checkbox-group label {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    .btn {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 11px 20px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      color: white;
    }

    .btn-primary {
      background: var(--accent);
    }

    .btn-secondary {
      background: var(--today);
    }

    .btn-danger {
      background: var(--danger);
    }

    .inline {
      display: inline;
    }

    .reminders-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .reminders-grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
      gap: 16px;
    }

    .reminder-card {
      border: 1px solid #e4dfd8;
      border-left: 5px solid var(--accent);
      border-radius: 14px;
      padding: 14px 16px;
      display: grid;
      gap: 8px;
    }

    .reminder-card.past {
      border-left-color: var(--past);
      opacity: 0.75;
    }

    .reminder-card.today {
      border-left-color: var(--today);
    }

    .reminder-header {
      display: flex;
      justify-content: space-between;
      align-items: start;
      gap: 8px;
    }

    .reminder-header h3 {
      margin: 0;
      word-break: break-word;
    }

    .btn-delete {
      border: none;
      background: transparent;
      color: var(--danger);
      font-size: 1.4rem;
      cursor: pointer;
      line-height: 1;
    }

    .reminder-description {
      margin: 0;
      color: var(--muted);
      white-space: pre-wrap;
    }

    .reminder-datetime {
      display: flex;
      gap: 12px;
      font-size: 0.92rem;
    }

    .badge {
      justify-self: start;
      padding: 3px 10px;
      border-radius: 999px;
      font-size: 0.78rem;
      font-weight: 600;
      color: white;
    }

    .badge-past {
      background: var(--past);
    }

    .badge-today {
      background: var(--today);
    }

    .reminder-meta {
      color: var(--muted);
    }

    .empty-state {
      text-align: center;
      color: var(--muted);
      padding: 24px 0;
    }
  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>&#128221; Reminder Board</h1>
      <p class="subtitle">Manage your reminders with sessions &amp; cookies</p>
    </header>

    {{NOTICE}}

    <div class="info-box">
      <h3>How it works</h3>
      <ul>
        <li><strong>Session storage:</strong> reminders live in your browser session and are cleared when it ends.</li>
        <li><strong>Cookie storage:</strong> tick "Save to Cookie" to keep a reminder for 30 days.</li>
        <li><strong>Load from cookie:</strong> restore previously saved reminders into a new session.</li>
      </ul>
    </div>

    {{COOKIE_NOTICE}}

    <div class="form-container">
      <h2>Add New Reminder</h2>
      <form method="post" action="/">
        <input type="hidden" name="action" value="add" />

        <div class="form-group">
          <label for="title">Title *</label>
          <input type="text" id="title" name="title" required placeholder="Enter reminder title" />
        </div>

        <div class="form-group">
          <label for="description">Description</label>
          <textarea id="description" name="description" rows="3" placeholder="Enter reminder description (optional)"></textarea>
        </div>

        <div class="form-row">
          <div class="form-group">
            <label for="date">Date *</label>
            <input type="date" id="date" name="date" required />
          </div>
          <div class="form-group">
            <label for="time">Time *</label>
            <input type="time" id="time" name="time" required />
          </div>
        </div>

        <div class="form-group checkbox-group">
          <label>
            <input type="checkbox" name="save_cookie" value="1" />
            Save to Cookie (persist for 30 days)
          </label>
        </div>

        <button type="submit" class="btn btn-primary">Add Reminder</button>
      </form>
    </div>

    <div class="reminders-container">
      <div class="reminders-header">
        <h2>Your Reminders ({{COUNT}})</h2>
        {{CLEAR_ALL}}
      </div>
      {{REMINDERS}}
    </div>
  </div>

  <script>
    const dateInput = document.getElementById('date');
    const today = new Date();
    const pad = (value) => String(value).padStart(2, '0');
    dateInput.min = `${today.getFullYear()}-${pad(today.getMonth() + 1)}-${pad(today.getDate())}`;

    setTimeout(() => {
      document.querySelectorAll('.alert').forEach((alert) => {
        alert.style.opacity = '0';
        setTimeout(() => alert.remove(), 300);
      });
    }, 5000);
  </script>
</body>
</html>
"#;
