use std::sync::Arc;

use api::auth::{AuthConfig, CurrentUser};
use api::loader::{EmployeeBatcher, EmployeeLoader};
use api::schema::{build_schema, AppSchema};
use async_graphql::{Request, ServerError, Value as GqlValue, Variables};
use entity::user::Role;
use serde_json::Value;
use store::cache::FreshnessCache;
use store::records::RecordStore;
use store::seed;

pub struct TestContext {
    store: Arc<RecordStore>,
    cache: FreshnessCache,
    schema: async_graphql::Schema<
        api::schema::QueryRoot,
        api::schema::MutationRoot,
        async_graphql::EmptySubscription,
    >,
}

impl TestContext {
    pub fn new_seeded() -> Self {
        let store = Arc::new(seed::demo_store());
        let cache = FreshnessCache::new();
        let auth = Arc::new(AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_ttl_days: 7,
        });
        let AppSchema(schema) = build_schema(store.clone(), cache.clone(), auth);
        Self {
            store,
            cache,
            schema,
        }
    }

    /// Execute a request with no identity attached.
    pub async fn exec(&self, query: &str, vars: Value) -> async_graphql::Response {
        let request = Request::new(query)
            .variables(Variables::from_json(vars))
            .data(self.loader());
        self.schema.execute(request).await
    }

    /// Execute a request as the given signed-in user.
    pub async fn exec_as(
        &self,
        user: &CurrentUser,
        query: &str,
        vars: Value,
    ) -> async_graphql::Response {
        let request = Request::new(query)
            .variables(Variables::from_json(vars))
            .data(user.clone())
            .data(self.loader());
        self.schema.execute(request).await
    }

    // Each request gets its own loader, matching what the HTTP layer does.
    fn loader(&self) -> EmployeeBatcher {
        EmployeeLoader::new(self.store.clone(), self.cache.clone()).batched()
    }
}

/// Identity matching the seeded admin account.
pub fn admin_identity() -> CurrentUser {
    CurrentUser {
        user_id: "user_001".to_string(),
        role: Role::Admin,
        employee_id: None,
    }
}

/// Identity matching the seeded employee account linked to emp_001.
pub fn employee_identity() -> CurrentUser {
    CurrentUser {
        user_id: "user_002".to_string(),
        role: Role::Employee,
        employee_id: Some("emp_001".to_string()),
    }
}

pub fn has_error_code(errors: &[ServerError], code: &str) -> bool {
    errors
        .iter()
        .any(|e| matches_code(e.extensions.as_ref(), code))
}

fn matches_code(values: Option<&async_graphql::ErrorExtensionValues>, code: &str) -> bool {
    match values.and_then(|ext| ext.get("code")) {
        Some(GqlValue::String(s)) => s == code,
        Some(GqlValue::Enum(name)) => name.as_str() == code,
        _ => false,
    }
}
