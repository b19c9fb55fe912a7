use crate::errors::{ActionError, AppError};
use crate::gateway::{CookieStore, SessionStore};
use crate::models::{ActionForm, NewReminder, ReminderRecord};
use crate::store;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info};
use uuid::Uuid;

pub const ADDED: &str = "Reminder added successfully!";
pub const DELETED: &str = "Reminder deleted successfully!";
pub const CLEARED: &str = "All reminders cleared!";
pub const LOADED: &str = "Reminders loaded from cookies!";

#[derive(Debug, Clone)]
pub enum Action {
    Add(NewReminder),
    Delete { id: String },
    ClearAll,
    LoadFromCookie,
}

impl TryFrom<ActionForm> for Action {
    type Error = AppError;

    fn try_from(form: ActionForm) -> Result<Self, Self::Error> {
        match form.action.trim() {
            "add" => Ok(Action::Add(NewReminder {
                title: form.title.unwrap_or_default(),
                description: form.description.unwrap_or_default(),
                date: form.date.unwrap_or_default(),
                time: form.time.unwrap_or_default(),
                persist: form.save_cookie.is_some(),
            })),
            "delete" => form
                .id
                .map(|id| Action::Delete { id })
                .ok_or_else(|| AppError::bad_request("delete requires an id")),
            "clear_all" => Ok(Action::ClearAll),
            "load_from_cookie" => Ok(Action::LoadFromCookie),
            "" => Err(AppError::bad_request("missing action")),
            other => Err(AppError::bad_request(format!("unknown action '{other}'"))),
        }
    }
}

pub fn apply<S, C>(
    action: Action,
    session: &mut S,
    cookies: &mut C,
    now: NaiveDateTime,
) -> Result<&'static str, ActionError>
where
    S: SessionStore,
    C: CookieStore,
{
    match action {
        Action::Add(new) => add(new, session, cookies, now),
        Action::Delete { id } => delete(&id, session, cookies),
        Action::ClearAll => {
            session.set_reminders(store::clear());
            cookies.expire();
            info!("cleared all reminders");
            Ok(CLEARED)
        }
        Action::LoadFromCookie => {
            let reminders = cookies.read().ok_or(ActionError::NoCookieReminders)?;
            info!(count = reminders.len(), "loaded reminders from cookie");
            session.set_reminders(store::replace_all(reminders));
            Ok(LOADED)
        }
    }
}

fn add<S, C>(
    new: NewReminder,
    session: &mut S,
    cookies: &mut C,
    now: NaiveDateTime,
) -> Result<&'static str, ActionError>
where
    S: SessionStore,
    C: CookieStore,
{
    let persist = new.persist;
    let record = build_record(new, now)?;

    // Cookie first: a failed encode must not leave the session half updated.
    if persist {
        let saved = store::add(cookies.read().unwrap_or_default(), record.clone());
        cookies.write(&saved)?;
    }

    info!(id = %record.id, persist, "reminder added");
    let reminders = store::add(session.reminders().to_vec(), record);
    session.set_reminders(reminders);
    Ok(ADDED)
}

fn delete<S, C>(id: &str, session: &mut S, cookies: &mut C) -> Result<&'static str, ActionError>
where
    S: SessionStore,
    C: CookieStore,
{
    let before = session.reminders().len();
    let reminders = store::delete_by_id(session.reminders().to_vec(), id);
    debug!(id, removed = before - reminders.len(), "delete from session");
    session.set_reminders(reminders);

    if let Some(saved) = cookies.read() {
        cookies.write(&store::delete_by_id(saved, id))?;
    }

    Ok(DELETED)
}

pub fn build_record(new: NewReminder, now: NaiveDateTime) -> Result<ReminderRecord, ActionError> {
    let title = new.title.trim();
    let date = new.date.trim();
    let time = new.time.trim();
    if title.is_empty() || date.is_empty() || time.is_empty() {
        return Err(ActionError::MissingFields);
    }

    let date =
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ActionError::InvalidDateTime)?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| ActionError::InvalidDateTime)?;

    Ok(ReminderRecord {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: new.description.trim().to_string(),
        date,
        time,
        created_at: now,
    })
}
