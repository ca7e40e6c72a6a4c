use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use entity::employee::{Employee, EmployeePatch, NewEmployee, Status};
use entity::user::{NewUser, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

/// The live record set, guarded by one lock per collection. Records
/// keep insertion order, which is also the order unsorted queries
/// return. Every mutation runs under a single write lock, so the
/// uniqueness check and the write it protects are atomic.
#[derive(Debug, Default)]
pub struct RecordStore {
    employees: RwLock<Vec<Employee>>,
    users: RwLock<Vec<User>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(employees: Vec<Employee>, users: Vec<User>) -> Self {
        Self {
            employees: RwLock::new(employees),
            users: RwLock::new(users),
        }
    }

    /// Adds a record, minting its id and stamping both timestamps.
    /// Fails when another live record already holds the email.
    pub async fn insert_employee(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        let mut employees = self.employees.write().await;
        if employees.iter().any(|e| e.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = Utc::now();
        let employee = Employee {
            id: format!("emp_{}", Uuid::new_v4().simple()),
            name: new.name,
            email: new.email,
            age: new.age,
            department: new.department,
            position: new.position,
            salary: new.salary,
            subjects: new.subjects,
            attendance: new.attendance,
            joining_date: new.joining_date,
            phone: new.phone,
            address: new.address,
            status: new.status.unwrap_or(Status::Active),
            flagged: false,
            created_at: now,
            updated_at: now,
        };
        employees.push(employee.clone());
        Ok(employee)
    }

    pub async fn find_employee(&self, id: &str) -> Option<Employee> {
        self.employees
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    pub async fn find_employee_by_email(&self, email: &str) -> Option<Employee> {
        self.employees
            .read()
            .await
            .iter()
            .find(|e| e.email == email)
            .cloned()
    }

    /// Bulk lookup for the batch loader. Unknown ids are simply absent
    /// from the result map.
    pub async fn find_employees(&self, ids: &[String]) -> HashMap<String, Employee> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.employees
            .read()
            .await
            .iter()
            .filter(|e| wanted.contains(e.id.as_str()))
            .map(|e| (e.id.clone(), e.clone()))
            .collect()
    }

    /// Merges the provided fields into an existing record and advances
    /// its `updated_at`. A changed email must not collide with any
    /// other live record.
    pub async fn update_employee(
        &self,
        id: &str,
        patch: EmployeePatch,
    ) -> Result<Employee, StoreError> {
        let mut employees = self.employees.write().await;
        let position = employees
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(email) = patch.email.as_deref() {
            if employees.iter().any(|e| e.email == email && e.id != id) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let employee = &mut employees[position];
        if let Some(name) = patch.name {
            employee.name = name;
        }
        if let Some(email) = patch.email {
            employee.email = email;
        }
        if let Some(age) = patch.age {
            employee.age = age;
        }
        if let Some(department) = patch.department {
            employee.department = department;
        }
        if let Some(position) = patch.position {
            employee.position = position;
        }
        if let Some(salary) = patch.salary {
            employee.salary = salary;
        }
        if let Some(subjects) = patch.subjects {
            employee.subjects = subjects;
        }
        if let Some(attendance) = patch.attendance {
            employee.attendance = attendance;
        }
        if let Some(joining_date) = patch.joining_date {
            employee.joining_date = joining_date;
        }
        if let Some(phone) = patch.phone {
            employee.phone = Some(phone);
        }
        if let Some(address) = patch.address {
            employee.address = Some(address);
        }
        if let Some(status) = patch.status {
            employee.status = status;
        }
        if let Some(flagged) = patch.flagged {
            employee.flagged = flagged;
        }
        employee.updated_at = next_stamp(employee.updated_at);
        Ok(employee.clone())
    }

    /// Removes a record; `false` means the id was not present.
    pub async fn delete_employee(&self, id: &str) -> bool {
        let mut employees = self.employees.write().await;
        let before = employees.len();
        employees.retain(|e| e.id != id);
        employees.len() < before
    }

    /// Removes every listed record that exists and reports how many
    /// were actually removed. Unknown ids are skipped, not errors.
    pub async fn bulk_delete_employees(&self, ids: &[String]) -> usize {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut employees = self.employees.write().await;
        let before = employees.len();
        employees.retain(|e| !wanted.contains(e.id.as_str()));
        before - employees.len()
    }

    /// Snapshot of the live set in insertion order.
    pub async fn scan_employees(&self) -> Vec<Employee> {
        self.employees.read().await.clone()
    }

    pub async fn insert_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: format!("user_{}", Uuid::new_v4().simple()),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            employee_id: None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    pub async fn find_user(&self, id: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }
}

/// Write stamps must move strictly forward even when the wall clock
/// reports the same instant twice, so back-to-back updates to one
/// record stay ordered.
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
