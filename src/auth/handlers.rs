use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info, instrument};

use crate::{
    auth::{
        claims::Claims,
        dto::{AuthResponse, MessageResponse, SessionResponse, SignInRequest, SignUpRequest},
        error::{AuthError, AuthResult, FieldError},
        extractors::AuthUser,
        jwt::JwtKeys,
        services::CredentialService,
        session::SessionCookies,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/me", get(me))
}

fn body_error(rejection: JsonRejection) -> AuthError {
    AuthError::Validation(vec![FieldError::new("body", rejection.body_text())])
}

#[instrument(skip_all)]
pub async fn sign_up(
    State(credentials): State<CredentialService>,
    State(keys): State<JwtKeys>,
    State(cookies): State<SessionCookies>,
    jar: CookieJar,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let Json(payload) = payload.map_err(body_error)?;
    let account = payload.validate()?;

    let user = credentials.create_user(account).await?;
    let token = keys.sign(&Claims::from(&user))?;
    let jar = cookies.set(jar, token);

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User created successfully",
            user,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn sign_in(
    State(credentials): State<CredentialService>,
    State(keys): State<JwtKeys>,
    State(cookies): State<SessionCookies>,
    jar: CookieJar,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<(CookieJar, Json<AuthResponse>)> {
    let Json(payload) = payload.map_err(body_error)?;
    let login = payload.validate()?;

    let user = credentials.authenticate_user(login).await?;
    let token = keys.sign(&Claims::from(&user))?;
    let jar = cookies.set(jar, token);

    info!(user_id = %user.id, email = %user.email, "user signed in");
    Ok((
        jar,
        Json(AuthResponse {
            message: "User signed in successfully",
            user,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn sign_out(
    State(cookies): State<SessionCookies>,
    jar: CookieJar,
) -> AuthResult<(CookieJar, Json<MessageResponse>)> {
    if cookies.get(&jar).is_none() {
        return Err(AuthError::MissingSession);
    }
    let jar = cookies.clear(jar);

    info!("user signed out");
    Ok((
        jar,
        Json(MessageResponse {
            message: "User signed out successfully",
        }),
    ))
}

pub async fn me(AuthUser(claims): AuthUser) -> Json<SessionResponse> {
    debug!(user_id = %claims.id, "session checked");
    Json(SessionResponse { user: claims })
}
