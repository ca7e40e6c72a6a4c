//! The read pipeline: every list query runs filter, then sort, then
//! paginate over a snapshot of the record set. All of it is pure so it
//! can be exercised without a store.

use entity::employee::{Employee, Status};

use crate::error::StoreError;

pub const MAX_PAGE_SIZE: i32 = 100;

/// Conjunctive filter over the employee set. Text fields match
/// case-insensitively (`name` and `position` by substring,
/// `department` exactly); numeric bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub status: Option<Status>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub flagged: Option<bool>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(name) = &self.name {
            if !employee
                .name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if employee.department.to_lowercase() != department.to_lowercase() {
                return false;
            }
        }
        if let Some(position) = &self.position {
            if !employee
                .position
                .to_lowercase()
                .contains(&position.to_lowercase())
            {
                return false;
            }
        }
        if let Some(status) = self.status {
            if employee.status != status {
                return false;
            }
        }
        if let Some(min_age) = self.min_age {
            if employee.age < min_age {
                return false;
            }
        }
        if let Some(max_age) = self.max_age {
            if employee.age > max_age {
                return false;
            }
        }
        if let Some(min_salary) = self.min_salary {
            if employee.salary < min_salary {
                return false;
            }
        }
        if let Some(max_salary) = self.max_salary {
            if employee.salary > max_salary {
                return false;
            }
        }
        if let Some(flagged) = self.flagged {
            if employee.flagged != flagged {
                return false;
            }
        }
        true
    }
}

/// The closed set of sortable fields. Anything else is rejected at the
/// schema boundary rather than silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Age,
    Salary,
    JoiningDate,
    Attendance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

/// Cursorless page counters exposed alongside each page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: i32,
    pub total_pages: i32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Debug, Clone)]
pub struct EmployeePage {
    pub employees: Vec<Employee>,
    pub total_count: i32,
    pub page_info: PageInfo,
}

pub fn filter_employees(records: Vec<Employee>, filter: &EmployeeFilter) -> Vec<Employee> {
    records
        .into_iter()
        .filter(|employee| filter.matches(employee))
        .collect()
}

/// Stable sort: records with equal keys keep their relative input
/// order, so a sorted listing never reshuffles ties between calls.
pub fn sort_employees(records: &mut [Employee], sort: SortSpec) {
    records.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Age => a.age.cmp(&b.age),
            SortField::Salary => a.salary.total_cmp(&b.salary),
            SortField::JoiningDate => a.joining_date.cmp(&b.joining_date),
            SortField::Attendance => a.attendance.total_cmp(&b.attendance),
        };
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Slices one page out of the full result set. A page past the end is
/// an empty page, not an error; invalid bounds are.
pub fn paginate(records: Vec<Employee>, page: i32, limit: i32) -> Result<EmployeePage, StoreError> {
    if page < 1 {
        return Err(StoreError::InvalidInput("page must be >= 1".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(StoreError::InvalidInput(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    let total_count = records.len() as i32;
    let total_pages = (total_count + limit - 1) / limit;
    let offset = ((page as i64 - 1) * limit as i64) as usize;
    let employees: Vec<Employee> = records
        .into_iter()
        .skip(offset)
        .take(limit as usize)
        .collect();
    Ok(EmployeePage {
        employees,
        total_count,
        page_info: PageInfo {
            current_page: page,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        },
    })
}

/// Filter, then sort, then paginate, in that order.
pub fn apply(
    records: Vec<Employee>,
    filter: &EmployeeFilter,
    sort: Option<SortSpec>,
    page: i32,
    limit: i32,
) -> Result<EmployeePage, StoreError> {
    let mut matched = filter_employees(records, filter);
    if let Some(sort) = sort {
        sort_employees(&mut matched, sort);
    }
    paginate(matched, page, limit)
}

/// Aggregate counters for the dashboard surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_employees: i32,
    pub active_employees: i32,
    pub average_age: f64,
    pub average_salary: f64,
    pub department_distribution: Vec<DepartmentCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentCount {
    pub department: String,
    pub count: i32,
}

/// Averages are zero for an empty set; the department breakdown lists
/// departments in first-seen record order.
pub fn summarize(records: &[Employee]) -> StatsSummary {
    let total = records.len();
    let active = records
        .iter()
        .filter(|e| e.status == Status::Active)
        .count();
    let (average_age, average_salary) = if total == 0 {
        (0.0, 0.0)
    } else {
        let age_sum: i64 = records.iter().map(|e| i64::from(e.age)).sum();
        let salary_sum: f64 = records.iter().map(|e| e.salary).sum();
        (age_sum as f64 / total as f64, salary_sum / total as f64)
    };
    let mut department_distribution: Vec<DepartmentCount> = Vec::new();
    for employee in records {
        match department_distribution
            .iter_mut()
            .find(|d| d.department == employee.department)
        {
            Some(entry) => entry.count += 1,
            None => department_distribution.push(DepartmentCount {
                department: employee.department.clone(),
                count: 1,
            }),
        }
    }
    StatsSummary {
        total_employees: total as i32,
        active_employees: active as i32,
        average_age,
        average_salary,
        department_distribution,
    }
}
