use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

use crate::auth::jwt::verify_token;
use crate::auth::session::{AuthUser, SESSION_COOKIE};
use crate::config::Config;
use crate::model::role::Role;

/// Decodes the session cookie once per request and stashes the caller in
/// request extensions; handlers downstream extract `AuthUser` from there.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let jwt_secret = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?
        .jwt_secret
        .clone();

    let token = match req.request().cookie(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_owned(),
        None => {
            let resp = HttpResponse::Unauthorized().json(json!({"error": "Unauthorized"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let claims = match verify_token(&token, &jwt_secret) {
        Ok(c) => c,
        Err(_) => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Invalid or expired session"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let role = match Role::from_id(claims.role) {
        Some(role) => role,
        None => {
            let resp = HttpResponse::Unauthorized().json(json!({"error": "Invalid role"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let auth_user = AuthUser {
        user_id: claims.user_id,
        email: claims.sub,
        role,
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
