//! GraphQL schema: query and mutation roots plus the object and input
//! types they expose.
//!
//! Resolvers stay thin. They check access, translate GraphQL inputs into
//! store calls, and convert store records back into nodes. All shared
//! state (record store, freshness cache, auth config, employee loader)
//! travels in schema or request data.

use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use async_graphql::{
    ComplexObject, Context, EmptySubscription, Enum, Error, ErrorExtensions, InputObject, Object,
    Schema, SimpleObject, ID,
};
use chrono::{DateTime, Utc};
use entity::employee::{Employee, EmployeePatch, NewEmployee, Status};
use entity::user::{NewUser, Role, User};
use store::cache::FreshnessCache;
use store::query::{self, DepartmentCount, EmployeeFilter, EmployeePage, StatsSummary};
use store::records::RecordStore;
use store::StoreError;

use crate::auth::{self, issue_token, Access, AuthConfig, CurrentUser};
use crate::error::{internal_error, ApiError};
use crate::loader::EmployeeBatcher;

pub struct AppSchema(pub Schema<QueryRoot, MutationRoot, EmptySubscription>);

pub fn build_schema(
    store: Arc<RecordStore>,
    cache: FreshnessCache,
    auth: Arc<AuthConfig>,
) -> AppSchema {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .data(cache)
        .data(auth)
        .finish();
    AppSchema(schema)
}

pub struct QueryRoot;
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    /// Single employee by id, batched through the per-request loader.
    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        require_access(ctx, Access::SignedIn)?;
        let loader = employee_batcher(ctx)?;
        let employee = loader.load_one(id.as_str().to_string()).await?;
        Ok(employee.map(EmployeeNode::from))
    }

    /// Every employee matching the filter, in stored order and without
    /// pagination.
    #[graphql(name = "listEmployees")]
    async fn list_employees(
        &self,
        ctx: &Context<'_>,
        filter: Option<EmployeeFilterInput>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        require_access(ctx, Access::SignedIn)?;
        let store = record_store(ctx)?;
        let filter = filter.map(EmployeeFilter::from).unwrap_or_default();
        let employees = query::filter_employees(store.scan_employees().await, &filter);
        Ok(employees.into_iter().map(EmployeeNode::from).collect())
    }

    /// Filtered, sorted and paginated employee listing.
    #[graphql(name = "paginatedEmployees")]
    async fn paginated_employees(
        &self,
        ctx: &Context<'_>,
        filter: Option<EmployeeFilterInput>,
        sort: Option<EmployeeSortInput>,
        #[graphql(default = 1)] page: i32,
        #[graphql(default = 10)] limit: i32,
    ) -> async_graphql::Result<PaginatedEmployees> {
        require_access(ctx, Access::SignedIn)?;
        let store = record_store(ctx)?;
        let filter = filter.map(EmployeeFilter::from).unwrap_or_default();
        let sort = sort.map(query::SortSpec::from);
        let page = query::apply(store.scan_employees().await, &filter, sort, page, limit)
            .map_err(store_error)?;
        Ok(PaginatedEmployees::from(page))
    }

    /// Account of the signed-in user.
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<UserNode> {
        let identity = require_access(ctx, Access::SignedIn)?;
        let store = record_store(ctx)?;
        let user = store
            .find_user(&identity.user_id)
            .await
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()).extend())?;
        Ok(UserNode::from(user))
    }

    /// Aggregate head-count and averages across the directory.
    #[graphql(name = "employeeStats")]
    async fn employee_stats(&self, ctx: &Context<'_>) -> async_graphql::Result<EmployeeStats> {
        require_access(ctx, Access::SignedIn)?;
        let store = record_store(ctx)?;
        let summary = query::summarize(&store.scan_employees().await);
        Ok(EmployeeStats::from(summary))
    }
}

#[Object]
impl MutationRoot {
    /// Exchange email and password for a signed session token.
    async fn login(
        &self,
        ctx: &Context<'_>,
        input: LoginInput,
    ) -> async_graphql::Result<AuthPayload> {
        let store = record_store(ctx)?;
        let auth = auth_config(ctx)?;
        let Some(user) = store.find_user_by_email(&input.email).await else {
            return Err(ApiError::InvalidCredentials.extend());
        };
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|_| internal_error(anyhow::anyhow!("stored password hash failed to parse")))?;
        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(ApiError::InvalidCredentials.extend());
        }
        let token = issue_token(&user, &auth).map_err(internal_error)?;
        Ok(AuthPayload {
            token,
            user: UserNode::from(user),
        })
    }

    /// Create an account and sign it in. New accounts default to the
    /// EMPLOYEE role and start without a linked employee record.
    async fn register(
        &self,
        ctx: &Context<'_>,
        input: RegisterInput,
    ) -> async_graphql::Result<AuthPayload> {
        let store = record_store(ctx)?;
        let auth = auth_config(ctx)?;
        let password_hash = hash_password(&input.password)?;
        let user = store
            .insert_user(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                role: input.role.map(Role::from).unwrap_or(Role::Employee),
            })
            .await
            .map_err(store_error)?;
        let token = issue_token(&user, &auth).map_err(internal_error)?;
        Ok(AuthPayload {
            token,
            user: UserNode::from(user),
        })
    }

    /// Admin only. Creates a record and clears every cached employee.
    #[graphql(name = "addEmployee")]
    async fn add_employee(
        &self,
        ctx: &Context<'_>,
        input: CreateEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        require_access(ctx, Access::Admin)?;
        let store = record_store(ctx)?;
        let cache = freshness_cache(ctx)?;
        let employee = store
            .insert_employee(NewEmployee::from(input))
            .await
            .map_err(store_error)?;
        cache.invalidate_all().await;
        Ok(EmployeeNode::from(employee))
    }

    /// Admins may update anyone; everyone else only the record linked to
    /// their own account.
    #[graphql(name = "updateEmployee")]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        require_access(ctx, Access::OwnRecord(id.as_str()))?;
        let store = record_store(ctx)?;
        let cache = freshness_cache(ctx)?;
        let employee = store
            .update_employee(id.as_str(), EmployeePatch::from(input))
            .await
            .map_err(store_error)?;
        cache.invalidate(id.as_str()).await;
        Ok(EmployeeNode::from(employee))
    }

    /// Admin only. Returns true once the record is gone.
    #[graphql(name = "deleteEmployee")]
    async fn delete_employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        require_access(ctx, Access::Admin)?;
        let store = record_store(ctx)?;
        let cache = freshness_cache(ctx)?;
        if !store.delete_employee(id.as_str()).await {
            return Err(ApiError::NotFound("Employee not found".to_string()).extend());
        }
        cache.invalidate(id.as_str()).await;
        Ok(true)
    }

    /// Flip the review flag on a record. Any signed-in user may do this.
    #[graphql(name = "toggleEmployeeFlag")]
    async fn toggle_employee_flag(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<EmployeeNode> {
        require_access(ctx, Access::SignedIn)?;
        let store = record_store(ctx)?;
        let cache = freshness_cache(ctx)?;
        let current = store
            .find_employee(id.as_str())
            .await
            .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()).extend())?;
        let patch = EmployeePatch {
            flagged: Some(!current.flagged),
            ..EmployeePatch::default()
        };
        let employee = store
            .update_employee(id.as_str(), patch)
            .await
            .map_err(store_error)?;
        cache.invalidate(id.as_str()).await;
        Ok(EmployeeNode::from(employee))
    }

    /// Admin only. Deletes every id that exists and reports how many
    /// records were removed; unknown ids are skipped, not errors.
    #[graphql(name = "bulkDeleteEmployees")]
    async fn bulk_delete_employees(
        &self,
        ctx: &Context<'_>,
        ids: Vec<ID>,
    ) -> async_graphql::Result<i32> {
        require_access(ctx, Access::Admin)?;
        let store = record_store(ctx)?;
        let cache = freshness_cache(ctx)?;
        let ids: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        let removed = store.bulk_delete_employees(&ids).await;
        cache.invalidate_all().await;
        Ok(removed as i32)
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum EmployeeStatus {
    Active,
    Inactive,
    OnLeave,
}

impl From<Status> for EmployeeStatus {
    fn from(value: Status) -> Self {
        match value {
            Status::Active => EmployeeStatus::Active,
            Status::Inactive => EmployeeStatus::Inactive,
            Status::OnLeave => EmployeeStatus::OnLeave,
        }
    }
}

impl From<EmployeeStatus> for Status {
    fn from(value: EmployeeStatus) -> Self {
        match value {
            EmployeeStatus::Active => Status::Active,
            EmployeeStatus::Inactive => Status::Inactive,
            EmployeeStatus::OnLeave => Status::OnLeave,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum UserRole {
    Admin,
    Employee,
    Manager,
}

impl From<Role> for UserRole {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => UserRole::Admin,
            Role::Employee => UserRole::Employee,
            Role::Manager => UserRole::Manager,
        }
    }
}

impl From<UserRole> for Role {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Admin => Role::Admin,
            UserRole::Employee => Role::Employee,
            UserRole::Manager => Role::Manager,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for query::SortOrder {
    fn from(value: SortOrder) -> Self {
        match value {
            SortOrder::Asc => query::SortOrder::Asc,
            SortOrder::Desc => query::SortOrder::Desc,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum EmployeeSortField {
    Name,
    Age,
    Salary,
    JoiningDate,
    Attendance,
}

impl From<EmployeeSortField> for query::SortField {
    fn from(value: EmployeeSortField) -> Self {
        match value {
            EmployeeSortField::Name => query::SortField::Name,
            EmployeeSortField::Age => query::SortField::Age,
            EmployeeSortField::Salary => query::SortField::Salary,
            EmployeeSortField::JoiningDate => query::SortField::JoiningDate,
            EmployeeSortField::Attendance => query::SortField::Attendance,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub subjects: Vec<String>,
    pub attendance: f64,
    #[graphql(name = "joiningDate")]
    pub joining_date: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: EmployeeStatus,
    pub flagged: bool,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeNode {
    fn from(record: Employee) -> Self {
        Self {
            id: ID::from(record.id),
            name: record.name,
            email: record.email,
            age: record.age,
            department: record.department,
            position: record.position,
            salary: record.salary,
            subjects: record.subjects,
            attendance: record.attendance,
            joining_date: record.joining_date,
            phone: record.phone,
            address: record.address,
            status: EmployeeStatus::from(record.status),
            flagged: record.flagged,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "User", complex)]
pub struct UserNode {
    pub id: ID,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[graphql(name = "employeeId")]
    pub employee_id: Option<ID>,
}

#[ComplexObject]
impl UserNode {
    /// Employee record linked to this account, if any. Goes through the
    /// batching loader so `me { employee }` shares fetches with other
    /// employee lookups in the same request.
    async fn employee(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<EmployeeNode>> {
        let Some(employee_id) = &self.employee_id else {
            return Ok(None);
        };
        let loader = employee_batcher(ctx)?;
        let employee = loader.load_one(employee_id.as_str().to_string()).await?;
        Ok(employee.map(EmployeeNode::from))
    }
}

impl From<User> for UserNode {
    fn from(record: User) -> Self {
        Self {
            id: ID::from(record.id),
            username: record.username,
            email: record.email,
            role: UserRole::from(record.role),
            employee_id: record.employee_id.map(ID::from),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserNode,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PageInfo")]
pub struct PageInfoNode {
    #[graphql(name = "currentPage")]
    pub current_page: i32,
    #[graphql(name = "totalPages")]
    pub total_pages: i32,
    #[graphql(name = "hasNextPage")]
    pub has_next_page: bool,
    #[graphql(name = "hasPreviousPage")]
    pub has_previous_page: bool,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PaginatedEmployees {
    pub employees: Vec<EmployeeNode>,
    #[graphql(name = "totalCount")]
    pub total_count: i32,
    #[graphql(name = "pageInfo")]
    pub page_info: PageInfoNode,
}

impl From<EmployeePage> for PaginatedEmployees {
    fn from(page: EmployeePage) -> Self {
        Self {
            employees: page.employees.into_iter().map(EmployeeNode::from).collect(),
            total_count: page.total_count,
            page_info: PageInfoNode {
                current_page: page.page_info.current_page,
                total_pages: page.page_info.total_pages,
                has_next_page: page.page_info.has_next_page,
                has_previous_page: page.page_info.has_previous_page,
            },
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DepartmentStat {
    pub department: String,
    pub count: i32,
}

impl From<DepartmentCount> for DepartmentStat {
    fn from(value: DepartmentCount) -> Self {
        Self {
            department: value.department,
            count: value.count,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeeStats {
    #[graphql(name = "totalEmployees")]
    pub total_employees: i32,
    #[graphql(name = "activeEmployees")]
    pub active_employees: i32,
    #[graphql(name = "averageAge")]
    pub average_age: f64,
    #[graphql(name = "averageSalary")]
    pub average_salary: f64,
    #[graphql(name = "departmentDistribution")]
    pub department_distribution: Vec<DepartmentStat>,
}

impl From<StatsSummary> for EmployeeStats {
    fn from(summary: StatsSummary) -> Self {
        Self {
            total_employees: summary.total_employees,
            active_employees: summary.active_employees,
            average_age: summary.average_age,
            average_salary: summary.average_salary,
            department_distribution: summary
                .department_distribution
                .into_iter()
                .map(DepartmentStat::from)
                .collect(),
        }
    }
}

#[derive(InputObject, Default, Clone)]
pub struct EmployeeFilterInput {
    pub name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub status: Option<EmployeeStatus>,
    #[graphql(name = "minAge")]
    pub min_age: Option<i32>,
    #[graphql(name = "maxAge")]
    pub max_age: Option<i32>,
    #[graphql(name = "minSalary")]
    pub min_salary: Option<f64>,
    #[graphql(name = "maxSalary")]
    pub max_salary: Option<f64>,
    pub flagged: Option<bool>,
}

impl From<EmployeeFilterInput> for EmployeeFilter {
    fn from(input: EmployeeFilterInput) -> Self {
        Self {
            name: input.name,
            department: input.department,
            position: input.position,
            status: input.status.map(Status::from),
            min_age: input.min_age,
            max_age: input.max_age,
            min_salary: input.min_salary,
            max_salary: input.max_salary,
            flagged: input.flagged,
        }
    }
}

#[derive(InputObject, Clone)]
pub struct EmployeeSortInput {
    pub field: EmployeeSortField,
    pub order: SortOrder,
}

impl From<EmployeeSortInput> for query::SortSpec {
    fn from(input: EmployeeSortInput) -> Self {
        Self {
            field: input.field.into(),
            order: input.order.into(),
        }
    }
}

#[derive(InputObject, Clone)]
pub struct CreateEmployeeInput {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub subjects: Vec<String>,
    pub attendance: f64,
    #[graphql(name = "joiningDate")]
    pub joining_date: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl From<CreateEmployeeInput> for NewEmployee {
    fn from(input: CreateEmployeeInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            age: input.age,
            department: input.department,
            position: input.position,
            salary: input.salary,
            subjects: input.subjects,
            attendance: input.attendance,
            joining_date: input.joining_date,
            phone: input.phone,
            address: input.address,
            status: input.status.map(Status::from),
        }
    }
}

#[derive(InputObject, Clone)]
pub struct UpdateEmployeeInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub subjects: Option<Vec<String>>,
    pub attendance: Option<f64>,
    #[graphql(name = "joiningDate")]
    pub joining_date: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub flagged: Option<bool>,
}

impl From<UpdateEmployeeInput> for EmployeePatch {
    fn from(input: UpdateEmployeeInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            age: input.age,
            department: input.department,
            position: input.position,
            salary: input.salary,
            subjects: input.subjects,
            attendance: input.attendance,
            joining_date: input.joining_date,
            phone: input.phone,
            address: input.address,
            status: input.status.map(Status::from),
            flagged: input.flagged,
        }
    }
}

#[derive(InputObject, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(InputObject, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
}

fn record_store(ctx: &Context<'_>) -> async_graphql::Result<Arc<RecordStore>> {
    ctx.data::<Arc<RecordStore>>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing record store"))
}

fn freshness_cache(ctx: &Context<'_>) -> async_graphql::Result<FreshnessCache> {
    ctx.data::<FreshnessCache>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing freshness cache"))
}

fn auth_config(ctx: &Context<'_>) -> async_graphql::Result<Arc<AuthConfig>> {
    ctx.data::<Arc<AuthConfig>>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing auth config"))
}

fn employee_batcher<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a EmployeeBatcher> {
    ctx.data::<EmployeeBatcher>()
        .map_err(|_| error_with_code("INTERNAL", "Missing employee loader"))
}

fn current_user(ctx: &Context<'_>) -> Option<CurrentUser> {
    ctx.data_opt::<CurrentUser>().cloned()
}

/// Resolve the caller's identity and check it against the required
/// access level, mapping refusals to extension-coded errors.
fn require_access(ctx: &Context<'_>, access: Access<'_>) -> async_graphql::Result<CurrentUser> {
    let identity = current_user(ctx);
    auth::authorize(identity.as_ref(), access)
        .map(Clone::clone)
        .map_err(|err| err.extend())
}

fn store_error(err: StoreError) -> Error {
    ApiError::from(err).extend()
}

fn hash_password(password: &str) -> async_graphql::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| error_with_code("INTERNAL", "Failed to hash password"))
}

fn error_with_code(code: &'static str, message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}
