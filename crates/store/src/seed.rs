//! Demo data the server starts with unless asked not to. Three demo
//! accounts exist: `admin@company.com` / `admin123` (ADMIN, no record),
//! `sarah.johnson@company.com` / `employee123` (EMPLOYEE, emp_001) and
//! `robert.taylor@company.com` / `manager123` (MANAGER, emp_006).

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use chrono::{DateTime, TimeZone, Utc};
use entity::employee::{Employee, Status};
use entity::user::{Role, User};

use crate::records::RecordStore;

pub fn demo_store() -> RecordStore {
    RecordStore::with_records(demo_employees(), demo_users())
}

pub fn demo_employees() -> Vec<Employee> {
    vec![
        demo_employee(
            "emp_001",
            "Sarah Johnson",
            "sarah.johnson@company.com",
            32,
            "Engineering",
            "Senior Software Engineer",
            125_000.0,
            &["React", "Node.js", "GraphQL", "TypeScript"],
            96.5,
            (2020, 3, 15),
            "+1-555-0101",
            "123 Tech Street, San Francisco, CA",
            Status::Active,
            false,
        ),
        demo_employee(
            "emp_002",
            "Michael Chen",
            "michael.chen@company.com",
            28,
            "Engineering",
            "Full Stack Developer",
            95_000.0,
            &["Vue.js", "Python", "Docker", "AWS"],
            94.2,
            (2021, 6, 1),
            "+1-555-0102",
            "456 Innovation Ave, Seattle, WA",
            Status::Active,
            false,
        ),
        demo_employee(
            "emp_003",
            "Emily Rodriguez",
            "emily.rodriguez@company.com",
            35,
            "Product",
            "Product Manager",
            135_000.0,
            &["Product Strategy", "Agile", "User Research", "Analytics"],
            98.1,
            (2019, 1, 10),
            "+1-555-0103",
            "789 Product Lane, Austin, TX",
            Status::Active,
            false,
        ),
        demo_employee(
            "emp_004",
            "David Kim",
            "david.kim@company.com",
            29,
            "Design",
            "UI/UX Designer",
            88_000.0,
            &["Figma", "User Experience", "Prototyping", "Design Systems"],
            92.8,
            (2021, 9, 20),
            "+1-555-0104",
            "321 Design Blvd, New York, NY",
            Status::Active,
            true,
        ),
        demo_employee(
            "emp_005",
            "Jessica Martinez",
            "jessica.martinez@company.com",
            31,
            "Engineering",
            "DevOps Engineer",
            115_000.0,
            &["Kubernetes", "CI/CD", "Terraform", "Monitoring"],
            97.3,
            (2020, 8, 12),
            "+1-555-0105",
            "654 Cloud Drive, Denver, CO",
            Status::Active,
            false,
        ),
        demo_employee(
            "emp_006",
            "Robert Taylor",
            "robert.taylor@company.com",
            42,
            "Engineering",
            "Engineering Manager",
            165_000.0,
            &["Leadership", "Architecture", "Mentoring", "Strategy"],
            95.7,
            (2018, 2, 1),
            "+1-555-0106",
            "987 Management St, Boston, MA",
            Status::Active,
            false,
        ),
        demo_employee(
            "emp_007",
            "Amanda White",
            "amanda.white@company.com",
            27,
            "Marketing",
            "Digital Marketing Specialist",
            72_000.0,
            &["SEO", "Content Marketing", "Social Media", "Analytics"],
            93.5,
            (2022, 4, 15),
            "+1-555-0107",
            "147 Marketing Way, Chicago, IL",
            Status::Active,
            false,
        ),
        demo_employee(
            "emp_008",
            "James Anderson",
            "james.anderson@company.com",
            38,
            "Sales",
            "Sales Director",
            145_000.0,
            &["Enterprise Sales", "Negotiation", "CRM", "Strategy"],
            91.2,
            (2019, 7, 22),
            "+1-555-0108",
            "258 Sales Plaza, Miami, FL",
            Status::OnLeave,
            false,
        ),
        demo_employee(
            "emp_009",
            "Lisa Thompson",
            "lisa.thompson@company.com",
            30,
            "HR",
            "HR Manager",
            92_000.0,
            &["Recruitment", "Employee Relations", "Benefits", "Compliance"],
            96.8,
            (2020, 11, 5),
            "+1-555-0109",
            "369 HR Avenue, Portland, OR",
            Status::Active,
            false,
        ),
        demo_employee(
            "emp_010",
            "Christopher Lee",
            "christopher.lee@company.com",
            33,
            "Engineering",
            "Backend Developer",
            105_000.0,
            &["Java", "Spring Boot", "Microservices", "PostgreSQL"],
            94.9,
            (2021, 1, 18),
            "+1-555-0110",
            "741 Backend Road, Phoenix, AZ",
            Status::Active,
            false,
        ),
        demo_employee(
            "emp_011",
            "Maria Garcia",
            "maria.garcia@company.com",
            26,
            "Design",
            "Graphic Designer",
            68_000.0,
            &["Adobe Creative Suite", "Branding", "Illustration", "Typography"],
            89.4,
            (2022, 8, 30),
            "+1-555-0111",
            "852 Creative Circle, Los Angeles, CA",
            Status::Active,
            true,
        ),
        demo_employee(
            "emp_012",
            "Daniel Brown",
            "daniel.brown@company.com",
            36,
            "Finance",
            "Financial Analyst",
            98_000.0,
            &["Financial Modeling", "Excel", "Forecasting", "Reporting"],
            97.6,
            (2019, 12, 10),
            "+1-555-0112",
            "963 Finance Street, Philadelphia, PA",
            Status::Active,
            false,
        ),
    ]
}

pub fn demo_users() -> Vec<User> {
    vec![
        demo_user("user_001", "admin", "admin@company.com", "admin123", Role::Admin, None),
        demo_user(
            "user_002",
            "sarah",
            "sarah.johnson@company.com",
            "employee123",
            Role::Employee,
            Some("emp_001"),
        ),
        demo_user(
            "user_003",
            "robert",
            "robert.taylor@company.com",
            "manager123",
            Role::Manager,
            Some("emp_006"),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn demo_employee(
    id: &str,
    name: &str,
    email: &str,
    age: i32,
    department: &str,
    position: &str,
    salary: f64,
    subjects: &[&str],
    attendance: f64,
    joined: (i32, u32, u32),
    phone: &str,
    address: &str,
    status: Status,
    flagged: bool,
) -> Employee {
    let (year, month, day) = joined;
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        age,
        department: department.to_string(),
        position: position.to_string(),
        salary,
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
        attendance,
        joining_date: format!("{year:04}-{month:02}-{day:02}"),
        phone: Some(phone.to_string()),
        address: Some(address.to_string()),
        status,
        flagged,
        created_at: timestamp(year, month, day),
        updated_at: timestamp(2024, 11, 20),
    }
}

fn demo_user(
    id: &str,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
    employee_id: Option<&str>,
) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password),
        role,
        employee_id: employee_id.map(str::to_string),
        created_at: timestamp(2024, 1, 1),
    }
}

fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .expect("demo password hash")
}

fn timestamp(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid seed timestamp")
}
