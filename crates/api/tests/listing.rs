mod common;

use common::{admin_identity, employee_identity, has_error_code, TestContext};
use serde_json::{json, Value};

const LIST: &str = r#"
    query List($filter: EmployeeFilterInput) {
        listEmployees(filter: $filter) { id name department salary status }
    }
"#;

const PAGINATED: &str = r#"
    query Page(
        $filter: EmployeeFilterInput,
        $sort: EmployeeSortInput,
        $page: Int!,
        $limit: Int!
    ) {
        paginatedEmployees(filter: $filter, sort: $sort, page: $page, limit: $limit) {
            employees { id name salary joiningDate }
            totalCount
            pageInfo { currentPage totalPages hasNextPage hasPreviousPage }
        }
    }
"#;

const STATS: &str = r#"
    query Stats {
        employeeStats {
            totalEmployees
            activeEmployees
            averageAge
            averageSalary
            departmentDistribution { department count }
        }
    }
"#;

#[tokio::test]
async fn reads_require_a_sign_in() {
    let ctx = TestContext::new_seeded();
    let lookups = [
        r#"query { employee(id: "emp_001") { id } }"#,
        r#"query { listEmployees { id } }"#,
        r#"query { paginatedEmployees { totalCount } }"#,
        r#"query { employeeStats { totalEmployees } }"#,
    ];
    for query in lookups {
        let resp = ctx.exec(query, json!({})).await;
        assert!(
            has_error_code(&resp.errors, "UNAUTHENTICATED"),
            "expected UNAUTHENTICATED for {query}, got {:?}",
            resp.errors
        );
    }
}

#[tokio::test]
async fn list_returns_the_full_set_in_stored_order() {
    let ctx = TestContext::new_seeded();
    let resp = ctx.exec_as(&employee_identity(), LIST, json!({})).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let ids = extract_ids(&resp.data.into_json().unwrap()["listEmployees"]);
    assert_eq!(ids.len(), 12);
    assert_eq!(ids.first().map(String::as_str), Some("emp_001"));
    assert_eq!(ids.last().map(String::as_str), Some("emp_012"));
}

#[tokio::test]
async fn filters_compose_conjunctively() {
    let ctx = TestContext::new_seeded();
    let resp = ctx
        .exec_as(
            &employee_identity(),
            LIST,
            json!({ "filter": { "department": "Engineering", "minSalary": 100000.0 } }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let ids = extract_ids(&resp.data.into_json().unwrap()["listEmployees"]);
    assert_eq!(ids, ["emp_001", "emp_005", "emp_006", "emp_010"]);
}

#[tokio::test]
async fn name_filter_matches_substrings_case_insensitively() {
    let ctx = TestContext::new_seeded();
    let resp = ctx
        .exec_as(
            &employee_identity(),
            LIST,
            json!({ "filter": { "name": "JOHNSON" } }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let ids = extract_ids(&resp.data.into_json().unwrap()["listEmployees"]);
    assert_eq!(ids, ["emp_001"]);
}

#[tokio::test]
async fn status_filter_selects_exactly() {
    let ctx = TestContext::new_seeded();
    let resp = ctx
        .exec_as(
            &employee_identity(),
            LIST,
            json!({ "filter": { "status": "ON_LEAVE" } }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let listed = resp.data.into_json().unwrap();
    let ids = extract_ids(&listed["listEmployees"]);
    assert_eq!(ids, ["emp_008"]);
    assert_eq!(listed["listEmployees"][0]["status"], "ON_LEAVE");
}

#[tokio::test]
async fn paginated_listing_filters_sorts_and_slices() {
    let ctx = TestContext::new_seeded();
    let vars = |page: i32| {
        json!({
            "filter": { "department": "Engineering", "minSalary": 100000.0 },
            "sort": { "field": "SALARY", "order": "DESC" },
            "page": page,
            "limit": 2
        })
    };

    let first = ctx.exec_as(&employee_identity(), PAGINATED, vars(1)).await;
    assert!(first.errors.is_empty(), "unexpected errors: {:?}", first.errors);
    let page = first.data.into_json().unwrap();
    let listing = &page["paginatedEmployees"];
    assert_eq!(extract_ids(&listing["employees"]), ["emp_006", "emp_001"]);
    assert_eq!(listing["totalCount"], 4);
    assert_eq!(listing["pageInfo"]["currentPage"], 1);
    assert_eq!(listing["pageInfo"]["totalPages"], 2);
    assert_eq!(listing["pageInfo"]["hasNextPage"], true);
    assert_eq!(listing["pageInfo"]["hasPreviousPage"], false);

    let second = ctx.exec_as(&employee_identity(), PAGINATED, vars(2)).await;
    let page = second.data.into_json().unwrap();
    let listing = &page["paginatedEmployees"];
    assert_eq!(extract_ids(&listing["employees"]), ["emp_005", "emp_010"]);
    assert_eq!(listing["pageInfo"]["hasNextPage"], false);
    assert_eq!(listing["pageInfo"]["hasPreviousPage"], true);
}

#[tokio::test]
async fn pagination_defaults_to_the_first_ten() {
    let ctx = TestContext::new_seeded();
    let query = r#"
        query {
            paginatedEmployees {
                employees { id }
                totalCount
                pageInfo { currentPage totalPages hasNextPage }
            }
        }
    "#;
    let resp = ctx.exec_as(&employee_identity(), query, json!({})).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let listing = &resp.data.into_json().unwrap()["paginatedEmployees"];
    assert_eq!(listing["employees"].as_array().unwrap().len(), 10);
    assert_eq!(listing["totalCount"], 12);
    assert_eq!(listing["pageInfo"]["currentPage"], 1);
    assert_eq!(listing["pageInfo"]["totalPages"], 2);
    assert_eq!(listing["pageInfo"]["hasNextPage"], true);
}

#[tokio::test]
async fn a_page_past_the_end_is_empty_not_an_error() {
    let ctx = TestContext::new_seeded();
    let resp = ctx
        .exec_as(
            &employee_identity(),
            PAGINATED,
            json!({ "page": 9, "limit": 10 }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let listing = &resp.data.into_json().unwrap()["paginatedEmployees"];
    assert!(listing["employees"].as_array().unwrap().is_empty());
    assert_eq!(listing["totalCount"], 12);
    assert_eq!(listing["pageInfo"]["hasNextPage"], false);
    assert_eq!(listing["pageInfo"]["hasPreviousPage"], true);
}

#[tokio::test]
async fn pagination_bounds_are_validated() {
    let ctx = TestContext::new_seeded();
    for vars in [
        json!({ "page": 0, "limit": 10 }),
        json!({ "page": 1, "limit": 0 }),
        json!({ "page": 1, "limit": 101 }),
    ] {
        let resp = ctx
            .exec_as(&employee_identity(), PAGINATED, vars.clone())
            .await;
        assert!(
            has_error_code(&resp.errors, "INVALID_INPUT"),
            "expected INVALID_INPUT for {vars}, got {:?}",
            resp.errors
        );
    }
}

#[tokio::test]
async fn sorting_by_joining_date_descending_puts_newest_first() {
    let ctx = TestContext::new_seeded();
    let resp = ctx
        .exec_as(
            &employee_identity(),
            PAGINATED,
            json!({
                "sort": { "field": "JOINING_DATE", "order": "DESC" },
                "page": 1,
                "limit": 12
            }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let listing = resp.data.into_json().unwrap();
    let rows = listing["paginatedEmployees"]["employees"].as_array().unwrap().clone();
    let dates: Vec<&str> = rows
        .iter()
        .map(|row| row["joiningDate"].as_str().unwrap())
        .collect();
    assert!(dates.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(rows.first().unwrap()["id"], "emp_011");
    assert_eq!(rows.last().unwrap()["id"], "emp_006");
}

#[tokio::test]
async fn stats_summarize_the_directory() {
    let ctx = TestContext::new_seeded();
    let resp = ctx.exec_as(&admin_identity(), STATS, json!({})).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let stats = &resp.data.into_json().unwrap()["employeeStats"];
    assert_eq!(stats["totalEmployees"], 12);
    assert_eq!(stats["activeEmployees"], 11);
    assert!((stats["averageAge"].as_f64().unwrap() - 32.25).abs() < 1e-9);
    let expected_salary = 1_303_000.0 / 12.0;
    assert!((stats["averageSalary"].as_f64().unwrap() - expected_salary).abs() < 1e-9);

    let departments: Vec<(&str, i64)> = stats["departmentDistribution"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| (d["department"].as_str().unwrap(), d["count"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        departments,
        [
            ("Engineering", 5),
            ("Product", 1),
            ("Design", 2),
            ("Marketing", 1),
            ("Sales", 1),
            ("HR", 1),
            ("Finance", 1),
        ]
    );
}

#[tokio::test]
async fn employee_lookup_returns_null_for_unknown_ids() {
    let ctx = TestContext::new_seeded();
    let query = r#"
        query Fetch($id: ID!) { employee(id: $id) { id name } }
    "#;

    let missing = ctx
        .exec_as(&employee_identity(), query, json!({ "id": "emp_999" }))
        .await;
    assert!(missing.errors.is_empty(), "unexpected errors: {:?}", missing.errors);
    assert_eq!(missing.data.into_json().unwrap()["employee"], Value::Null);

    let found = ctx
        .exec_as(&employee_identity(), query, json!({ "id": "emp_003" }))
        .await;
    assert_eq!(
        found.data.into_json().unwrap()["employee"]["name"],
        "Emily Rodriguez"
    );
}

#[tokio::test]
async fn aliased_lookups_resolve_in_one_request() {
    let ctx = TestContext::new_seeded();
    let query = r#"
        query {
            a: employee(id: "emp_001") { id name }
            b: employee(id: "emp_002") { id name }
            me { employee { id } }
        }
    "#;
    let resp = ctx.exec_as(&employee_identity(), query, json!({})).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let data = resp.data.into_json().unwrap();
    assert_eq!(data["a"]["name"], "Sarah Johnson");
    assert_eq!(data["b"]["name"], "Michael Chen");
    assert_eq!(data["me"]["employee"]["id"], "emp_001");
}

fn extract_ids(rows: &Value) -> Vec<String> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap().to_string())
        .collect()
}
