use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::user::{LinkInput, User};
use crate::presentation::http::error::ApiError;
use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::request::Parts,
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::post,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    /// Public username. Also accepted as `login`.
    #[serde(alias = "login")]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub links: Vec<LinkInput>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        UserResponse {
            id: u.id,
            email: u.email.clone(),
            username: u.username.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/sign-up", tag = "Auth", request_body = SignUpRequest, security(()), responses(
    (status = 201, body = AuthResponse),
    (status = 400, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn sign_up(
    State(ctx): State<AppContext>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        email: req.email,
        username: req.username,
        password: req.password,
        about_text: req.about,
        links: req.links,
    };
    let user = uc.execute(&dto).await?;
    tracing::info!(user_id = user.id, "user signed up");
    let (headers, body) = session_for(&ctx.cfg, &user)?;
    Ok((StatusCode::CREATED, headers, Json(body)))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = AuthResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: req.email,
        password: req.password,
    };
    let user = uc
        .execute(&dto)
        .await
        .map_err(|e| ApiError::internal(format!("{e:#}")))?
        .ok_or_else(|| ApiError::unauthorized("incorrect login or password"))?;
    let (headers, body) = session_for(&ctx.cfg, &user)?;
    Ok((headers, Json(body)))
}

/// Issues a token for `user` and the matching HttpOnly cookie.
fn session_for(cfg: &Config, user: &User) -> Result<(HeaderMap, AuthResponse), ApiError> {
    let token = issue_token(cfg, user).map_err(|e| ApiError::internal(&e))?;
    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(&token, cfg.jwt_expires_secs, cfg.secure_cookies());
    headers.insert(
        axum::http::header::SET_COOKIE,
        HeaderValue::from_str(&cookie).unwrap_or(HeaderValue::from_static("")),
    );
    Ok((
        headers,
        AuthResponse {
            access_token: token,
            user: UserResponse::from(user),
        },
    ))
}

pub fn issue_token(cfg: &Config, user: &User) -> jsonwebtoken::errors::Result<String> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        exp: now + (cfg.jwt_expires_secs.max(0) as usize),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
}

const ACCESS_COOKIE: &str = "access_token";

/// Raw access token from `Authorization: Bearer` or, failing that, the
/// `access_token` cookie.
#[derive(Debug)]
pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = |name: axum::http::HeaderName| parts.headers.get(name).and_then(|v| v.to_str().ok());
        header_value(axum::http::header::AUTHORIZATION)
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .or_else(|| {
                header_value(axum::http::header::COOKIE)
                    .and_then(|cookies| get_cookie(cookies, ACCESS_COOKIE))
            })
            .map(Bearer)
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))
    }
}

/// Resolves the authenticated user id from a bearer token.
pub fn authenticated_user_id(cfg: &Config, bearer: &Bearer) -> Result<i64, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(
        &bearer.0,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ApiError::unauthorized("token expired")
            }
            _ => ApiError::unauthorized("invalid token"),
        }
    })?;
    data.claims
        .sub
        .parse()
        .map_err(|_| ApiError::unauthorized("invalid token"))
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim().to_string())
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{ACCESS_COOKIE}={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", security(()), responses((status = 204)))]
pub async fn logout(State(ctx): State<AppContext>) -> (HeaderMap, StatusCode) {
    let mut headers = HeaderMap::new();
    let cookie = if ctx.cfg.secure_cookies() {
        "access_token=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=Lax"
    } else {
        "access_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"
    };
    headers.insert(
        axum::http::header::SET_COOKIE,
        HeaderValue::from_static(cookie),
    );
    (headers, StatusCode::NO_CONTENT)
}
