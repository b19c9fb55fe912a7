use crate::models::ReminderRecord;

pub fn add(mut list: Vec<ReminderRecord>, record: ReminderRecord) -> Vec<ReminderRecord> {
    list.push(record);
    list
}

pub fn delete_by_id(mut list: Vec<ReminderRecord>, id: &str) -> Vec<ReminderRecord> {
    list.retain(|record| record.id != id);
    list
}

pub fn clear() -> Vec<ReminderRecord> {
    Vec::new()
}

pub fn replace_all(new_list: Vec<ReminderRecord>) -> Vec<ReminderRecord> {
    new_list
}
