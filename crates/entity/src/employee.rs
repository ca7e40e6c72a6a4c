use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an employment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Active,
    Inactive,
    OnLeave,
}

/// A single employment record. `email` is unique across the live set;
/// `joining_date` stays a calendar string (`YYYY-MM-DD`) rather than a
/// timestamp because the source data carries no time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub subjects: Vec<String>,
    pub attendance: f64,
    pub joining_date: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Status,
    pub flagged: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a record. The store mints the id and
/// both timestamps; `status` defaults to [`Status::Active`] and new
/// records always start unflagged.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub subjects: Vec<String>,
    pub attendance: f64,
    pub joining_date: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<Status>,
}

/// Partial update of an employment record. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub subjects: Option<Vec<String>>,
    pub attendance: Option<f64>,
    pub joining_date: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<Status>,
    pub flagged: Option<bool>,
}
