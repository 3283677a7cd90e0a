use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::Claims;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// One token kind only: a session credential with a 7-day default TTL,
/// carried in the auth cookie.
pub fn issue_session_token(
    user_id: u64,
    email: String,
    role: u8,
    secret: &str,
    ttl: usize,
) -> String {
    let claims = Claims {
        user_id,
        sub: email,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_session_token_round_trip() {
        let token =
            issue_session_token(42, "jane@company.com".to_string(), 2, SECRET, 3600);
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "jane@company.com");
        assert_eq!(claims.role, 2);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            issue_session_token(42, "jane@company.com".to_string(), 2, SECRET, 3600);
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Validation::default() allows 60s leeway; go well past it.
        let claims = Claims {
            user_id: 42,
            sub: "jane@company.com".to_string(),
            role: 2,
            exp: now() - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }
}
