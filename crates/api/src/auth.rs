use chrono::{Duration, Utc};
use entity::user::{Role, User};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl AuthConfig {
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.jwt_secret.as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.jwt_secret.as_bytes())
    }
}

/// Claims carried in a bearer token. The employee link rides along so
/// ownership checks need no store round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: Role,
    #[serde(rename = "employeeId", default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

/// The verified identity attached to a request. A request without one
/// is anonymous.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    pub role: Role,
    pub employee_id: Option<String>,
}

impl From<SessionClaims> for CurrentUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            employee_id: claims.employee_id,
        }
    }
}

/// What an operation demands of its caller.
#[derive(Debug, Clone, Copy)]
pub enum Access<'a> {
    /// Any signed-in account.
    SignedIn,
    /// Admin accounts only.
    Admin,
    /// Admin, or the account whose employee link matches the target
    /// record. Managers get no extra reach here.
    OwnRecord(&'a str),
}

/// The single policy gate every guarded resolver goes through.
pub fn authorize<'a>(
    identity: Option<&'a CurrentUser>,
    access: Access<'_>,
) -> ApiResult<&'a CurrentUser> {
    let user = identity.ok_or(ApiError::Unauthenticated)?;
    match access {
        Access::SignedIn => Ok(user),
        Access::Admin => {
            if user.role == Role::Admin {
                Ok(user)
            } else {
                Err(ApiError::Forbidden("Admin access required".to_string()))
            }
        }
        Access::OwnRecord(target) => {
            if user.role == Role::Admin || user.employee_id.as_deref() == Some(target) {
                Ok(user)
            } else {
                Err(ApiError::Forbidden(
                    "You can only update your own record".to_string(),
                ))
            }
        }
    }
}

pub fn issue_token(user: &User, config: &AuthConfig) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::days(config.token_ttl_days))
        .unwrap_or(now)
        .timestamp() as usize;
    let claims = SessionClaims {
        sub: user.id.clone(),
        role: user.role,
        employee_id: user.employee_id.clone(),
        exp,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &config.encoding_key())
}

pub fn decode_token(
    token: &str,
    config: &AuthConfig,
) -> jsonwebtoken::errors::Result<SessionClaims> {
    jsonwebtoken::decode::<SessionClaims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
}

/// Validates a bearer token into an identity. Invalid or expired
/// tokens downgrade the request to anonymous rather than failing it.
pub fn verify_token(token: &str, config: &AuthConfig) -> Option<CurrentUser> {
    decode_token(token, config).ok().map(CurrentUser::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 7,
        }
    }

    fn account(role: Role, employee_id: Option<&str>) -> User {
        User {
            id: "user_abc".to_string(),
            username: "ada".to_string(),
            email: "ada@example.test".to_string(),
            password_hash: "hash".to_string(),
            role,
            employee_id: employee_id.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn identity(role: Role, employee_id: Option<&str>) -> CurrentUser {
        CurrentUser {
            user_id: "user_abc".to_string(),
            role,
            employee_id: employee_id.map(str::to_string),
        }
    }

    #[test]
    fn tokens_round_trip_their_claims() {
        let config = config();
        let user = account(Role::Employee, Some("emp_001"));
        let token = issue_token(&user, &config).unwrap();
        let verified = verify_token(&token, &config).unwrap();
        assert_eq!(verified.user_id, "user_abc");
        assert_eq!(verified.role, Role::Employee);
        assert_eq!(verified.employee_id.as_deref(), Some("emp_001"));
    }

    #[test]
    fn tampered_tokens_are_anonymous() {
        let config = config();
        let token = issue_token(&account(Role::Admin, None), &config).unwrap();
        let other = AuthConfig {
            jwt_secret: "another-secret".to_string(),
            token_ttl_days: 7,
        };
        assert!(verify_token(&token, &other).is_none());
        assert!(verify_token("not-a-token", &config).is_none());
    }

    #[test]
    fn expired_tokens_are_anonymous() {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: -1,
        };
        let token = issue_token(&account(Role::Admin, None), &config).unwrap();
        assert!(verify_token(&token, &config).is_none());
    }

    #[test]
    fn anonymous_callers_are_rejected() {
        let err = authorize(None, Access::SignedIn).unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[test]
    fn admin_gate_rejects_other_roles() {
        let employee = identity(Role::Employee, Some("emp_001"));
        assert!(matches!(
            authorize(Some(&employee), Access::Admin).unwrap_err(),
            ApiError::Forbidden(_)
        ));
        let manager = identity(Role::Manager, Some("emp_006"));
        assert!(matches!(
            authorize(Some(&manager), Access::Admin).unwrap_err(),
            ApiError::Forbidden(_)
        ));
        let admin = identity(Role::Admin, None);
        assert!(authorize(Some(&admin), Access::Admin).is_ok());
    }

    #[test]
    fn own_record_gate_checks_the_employee_link() {
        let employee = identity(Role::Employee, Some("emp_001"));
        assert!(authorize(Some(&employee), Access::OwnRecord("emp_001")).is_ok());
        assert!(matches!(
            authorize(Some(&employee), Access::OwnRecord("emp_002")).unwrap_err(),
            ApiError::Forbidden(_)
        ));

        // A manager is held to the same ownership rule as an employee.
        let manager = identity(Role::Manager, Some("emp_006"));
        assert!(authorize(Some(&manager), Access::OwnRecord("emp_006")).is_ok());
        assert!(matches!(
            authorize(Some(&manager), Access::OwnRecord("emp_001")).unwrap_err(),
            ApiError::Forbidden(_)
        ));

        let admin = identity(Role::Admin, None);
        assert!(authorize(Some(&admin), Access::OwnRecord("emp_001")).is_ok());

        let unlinked = identity(Role::Employee, None);
        assert!(matches!(
            authorize(Some(&unlinked), Access::OwnRecord("emp_001")).unwrap_err(),
            ApiError::Forbidden(_)
        ));
    }
}
