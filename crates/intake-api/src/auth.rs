use std::sync::LazyLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use intake_db::Database;
use intake_types::api::{LoginRequest, LoginResponse};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "intake_session";

/// Admin sessions expire this long after login.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Verified against when the username is unknown, so both paths pay for one
/// argon2 run.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("intake-dummy-password").ok());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// POST /api/admin/login — verifies the password and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let db = state.clone();
    let username = req.username.clone();
    let password = req.password;

    // Argon2 verification is CPU-bound
    let verified =
        tokio::task::spawn_blocking(move || verify_admin(&db.db, &username, &password))
            .await
            .map_err(ApiError::join)??;

    if !verified {
        warn!(username = %req.username, "Rejected admin login");
        return Err(ApiError::Unauthorized);
    }

    let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
    let token = create_token(&state.session_secret, &req.username, expires_at)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .max_age(time::Duration::hours(SESSION_TTL_HOURS));

    info!(username = %req.username, "Admin logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            username: req.username,
            expires_at,
        }),
    ))
}

/// POST /api/admin/logout — clears the session cookie.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/")),
    )
}

/// GET /api/admin/session — who is logged in, and until when.
pub async fn session(Extension(claims): Extension<Claims>) -> ApiResult<impl IntoResponse> {
    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp as i64, 0)
        .ok_or_else(|| ApiError::Internal("session expiry out of range".into()))?;

    Ok(Json(LoginResponse {
        username: claims.sub,
        expires_at,
    }))
}

pub fn create_token(
    secret: &str,
    username: &str,
    expires_at: DateTime<Utc>,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: username.to_string(),
        iat: Utc::now().timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Checks signature and expiry.
pub fn decode_token(secret: &str, token: &str) -> anyhow::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("Stored admin password hash is malformed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Checks a login attempt. Unknown usernames still run one argon2
/// verification.
pub fn verify_admin(db: &Database, username: &str, password: &str) -> ApiResult<bool> {
    match db.get_admin(username)? {
        Some(admin) => Ok(verify_password(password, &admin.password_hash)),
        None => {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                verify_password(password, hash);
            }
            Ok(false)
        }
    }
}

/// Creates the first admin account when none exists yet. Returns whether an
/// account was created.
pub fn seed_admin(db: &Database, username: &str, password: &str) -> anyhow::Result<bool> {
    if db.count_admins()? > 0 {
        return Ok(false);
    }
    let hash = hash_password(password)?;
    db.upsert_admin(username, &hash)?;
    info!(%username, "Seeded initial admin account");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let expires = Utc::now() + Duration::hours(1);
        let token = create_token("secret", "admin", expires).unwrap();
        let claims = decode_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, expires.timestamp() as usize);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = create_token("secret", "admin", Utc::now() + Duration::hours(1)).unwrap();
        assert!(decode_token("other-secret", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Beyond the default validation leeway
        let token = create_token("secret", "admin", Utc::now() - Duration::hours(1)).unwrap();
        assert!(decode_token("secret", &token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn verify_admin_checks_known_and_unknown_users() {
        let db = Database::open_in_memory().unwrap();
        seed_admin(&db, "admin", "first-password").unwrap();

        assert!(verify_admin(&db, "admin", "first-password").unwrap());
        assert!(!verify_admin(&db, "admin", "wrong-password").unwrap());
        assert!(!verify_admin(&db, "ghost", "first-password").unwrap());
        assert!(!verify_admin(&db, "ghost", "intake-dummy-password").unwrap());
    }

    #[test]
    fn seed_admin_only_when_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(seed_admin(&db, "admin", "first-password").unwrap());
        assert!(!seed_admin(&db, "other", "second-password").unwrap());

        let admin = db.get_admin("admin").unwrap().unwrap();
        assert!(verify_password("first-password", &admin.password_hash));
        assert!(db.get_admin("other").unwrap().is_none());
    }
}
