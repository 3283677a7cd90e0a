use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

use crate::auth::jwt::{issue_session_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::SESSION_COOKIE;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;
use crate::models::{
    DEFAULT_BREAK_END, DEFAULT_BREAK_START, DEFAULT_ENTRY_TIME, DEFAULT_EXIT_TIME, LoginRequest,
    SessionUser, SignupRequest, UserAuthRow, parse_shift_time,
};
use crate::utils::email_guard;

const SESSION_USER_SQL: &str = r#"
    SELECT id, email, full_name,
           CASE WHEN role_id = 1 THEN 'admin' ELSE 'employee' END AS role,
           department, shift
    FROM users
    WHERE id = ?
"#;

fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(config.session_ttl as i64))
        .finish()
}

/// Signup endpoint
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = Object, example = json!({
            "message": "Account created successfully"
        })),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn signup(
    payload: web::Json<SignupRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let email = payload.email.trim().to_lowercase();

    if email.is_empty() || payload.password.is_empty() || payload.full_name.trim().is_empty() {
        return Err(ApiError::validation(
            "Required: email, password, full_name",
        ));
    }

    if !email_guard::is_available(&email, pool.get_ref()).await {
        return Ok(HttpResponse::Conflict().json(json!({
            "error": "Email already registered"
        })));
    }

    let entry_time = parse_shift_time(payload.entry_time.as_deref().unwrap_or(DEFAULT_ENTRY_TIME))
        .ok_or_else(|| ApiError::validation("Invalid entry_time"))?;
    let exit_time = parse_shift_time(payload.exit_time.as_deref().unwrap_or(DEFAULT_EXIT_TIME))
        .ok_or_else(|| ApiError::validation("Invalid exit_time"))?;
    let break_start =
        parse_shift_time(payload.break_start.as_deref().unwrap_or(DEFAULT_BREAK_START))
            .ok_or_else(|| ApiError::validation("Invalid break_start"))?;
    let break_end = parse_shift_time(payload.break_end.as_deref().unwrap_or(DEFAULT_BREAK_END))
        .ok_or_else(|| ApiError::validation("Invalid break_end"))?;

    // Portal convention carried over from the original frontend: an
    // admin@... address, or an explicit role request, provisions an admin.
    let role = if email.starts_with("admin@") || payload.role.as_deref() == Some("admin") {
        Role::Admin
    } else {
        Role::Employee
    };

    let hashed = hash_password(&payload.password);

    let result = sqlx::query(
        r#"
        INSERT INTO users
            (email, password, full_name, role_id, phone, cnic, position,
             department, shift, salary, entry_time, exit_time, break_start, break_end)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&email)
    .bind(&hashed)
    .bind(payload.full_name.trim())
    .bind(role.id())
    .bind(payload.phone.as_deref().unwrap_or(""))
    .bind(payload.cnic.as_deref().unwrap_or(""))
    .bind(payload.position.as_deref().unwrap_or("Associate"))
    .bind(payload.department.as_deref().unwrap_or("Operations"))
    .bind(payload.shift.as_deref().unwrap_or("Day Shift"))
    .bind(payload.salary.as_deref().unwrap_or("0"))
    .bind(entry_time)
    .bind(exit_time)
    .bind(break_start)
    .bind(break_end)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) => {
            email_guard::mark_taken(&email).await;

            Ok(HttpResponse::Created().json(json!({
                "message": "Account created successfully",
                "user": {
                    "id": done.last_insert_id(),
                    "email": email,
                    "full_name": payload.full_name.trim(),
                    "role": role.as_str(),
                }
            })))
        }
        Err(e) => {
            // Lost the uniqueness race against a concurrent signup.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "error": "Email already registered"
                    })));
                }
            }

            error!(error = %e, "Signup insert failed");
            Err(ApiError::Internal)
        }
    }
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie issued", body = Object, example = json!({
            "user": {
                "id": 42,
                "email": "jane.doe@company.com",
                "full_name": "Jane Doe",
                "role": "employee",
                "department": "Operations",
                "shift": "Day Shift"
            }
        })),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, payload),
    fields(email = %payload.email)
)]
pub async fn login(
    payload: web::Json<LoginRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if payload.email.trim().is_empty() || payload.password.is_empty() {
        info!("Validation failed: empty email or password");
        return HttpResponse::BadRequest().json(json!({
            "error": "Email and password are required"
        }));
    }

    debug!("Fetching user from database");

    let db_user = match sqlx::query_as::<_, UserAuthRow>(
        r#"
        SELECT id, email, password, full_name, role_id, department, shift
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(payload.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().json(json!({
                "error": "Invalid email or password"
            }));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if verify_password(&payload.password, &db_user.password).is_err() {
        info!("Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().json(json!({
            "error": "Invalid email or password"
        }));
    }

    debug!("Password verified, issuing session token");

    let token = issue_session_token(
        db_user.id,
        db_user.email.clone(),
        db_user.role_id,
        &config.jwt_secret,
        config.session_ttl,
    );

    // Non-fatal bookkeeping; login proceeds even if this write fails.
    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = ?")
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
    }

    info!("Login successful");

    let role = Role::from_id(db_user.role_id)
        .unwrap_or(Role::Employee)
        .as_str();

    HttpResponse::Ok()
        .cookie(session_cookie(token, config.get_ref()))
        .json(json!({
            "user": {
                "id": db_user.id,
                "email": db_user.email,
                "full_name": db_user.full_name,
                "role": role,
                "department": db_user.department,
                "shift": db_user.shift,
            }
        }))
}

/// Logout endpoint
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cleared", body = Object, example = json!({
            "message": "Logged out"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(("session_cookie" = [])),
    tag = "Auth"
)]
pub async fn logout() -> impl Responder {
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Strict);
    removal.make_removal();

    HttpResponse::Ok().cookie(removal).json(json!({
        "message": "Logged out"
    }))
}

/// Current-session endpoint; never errors, replies `{"user": null}` for
/// missing or stale sessions so the frontend can render logged-out state.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session identity or null", body = Object, example = json!({
            "user": null
        }))
    ),
    tag = "Auth"
)]
pub async fn me(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let anonymous = || HttpResponse::Ok().json(json!({ "user": null }));

    let token = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_owned(),
        None => return anonymous(),
    };

    let claims = match verify_token(&token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return anonymous(),
    };

    match sqlx::query_as::<_, SessionUser>(SESSION_USER_SQL)
        .bind(claims.user_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(user)) => HttpResponse::Ok().json(json!({ "user": user })),
        Ok(None) => anonymous(),
        Err(e) => {
            error!(error = %e, "Session lookup failed");
            anonymous()
        }
    }
}
