use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access role carried in session claims. `Manager` grants nothing
/// beyond `Employee` for record updates; only `Admin` widens access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
    Manager,
}

/// A directory account. `employee_id` is a weak reference: it may point
/// at a record that has since been deleted, in which case lookups
/// resolve to nothing rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub employee_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied at account registration. The store mints the id and
/// timestamp; self-registered accounts start without an employee link.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
