use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    /// Session cookie lifetime in seconds.
    pub session_ttl: usize,
    pub cookie_secure: bool,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_signup_per_min: u32,
    pub rate_protected_per_min: u32,

    // Attendance policy
    pub grace_minutes: i64,
    pub expected_working_days: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            session_ttl: env::var("SESSION_TTL")
                .unwrap_or_else(|_| "604800".to_string()) // default 7 days
                .parse()
                .unwrap(),
            cookie_secure: env::var("COOKIE_SECURE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_signup_per_min: env::var("RATE_SIGNUP_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            grace_minutes: env::var("ATTENDANCE_GRACE_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap(),
            expected_working_days: env::var("EXPECTED_WORKING_DAYS")
                .unwrap_or_else(|_| "26".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}
