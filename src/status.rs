use crate::models::{ReminderRecord, ReminderView};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Past,
    Today,
    Upcoming,
}

impl ReminderStatus {
    pub fn badge(self) -> Option<&'static str> {
        match self {
            ReminderStatus::Past => Some("Past"),
            ReminderStatus::Today => Some("Today"),
            ReminderStatus::Upcoming => None,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ReminderStatus::Past => "past",
            ReminderStatus::Today => "today",
            ReminderStatus::Upcoming => "",
        }
    }
}

pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn occurs_at(record: &ReminderRecord) -> NaiveDateTime {
    record.date.and_time(record.time)
}

pub fn derive_status_at(record: &ReminderRecord, now: NaiveDateTime) -> ReminderStatus {
    let at = occurs_at(record);
    if at < now {
        ReminderStatus::Past
    } else if at.date() == now.date() {
        ReminderStatus::Today
    } else {
        ReminderStatus::Upcoming
    }
}

pub fn to_views(records: &[ReminderRecord], now: NaiveDateTime) -> Vec<ReminderView> {
    records
        .iter()
        .map(|record| ReminderView {
            status: derive_status_at(record, now),
            record: record.clone(),
        })
        .collect()
}
