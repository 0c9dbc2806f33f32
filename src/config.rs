use chrono::{FixedOffset, NaiveTime};
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Fixed local zone for all calendar-day bucketing (UTC+7, no DST).
    pub zone: FixedOffset,
    /// Check-ins strictly after this local time count as late.
    pub late_cutoff: NaiveTime,
    /// Monthly leave allotment used when no explicit quota row exists.
    pub default_leave_quota: f64,
    pub report_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let tz_offset_hours: i32 = env::var("TZ_OFFSET_HOURS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .expect("TZ_OFFSET_HOURS must be an integer");

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .unwrap(),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL")
                .unwrap_or_else(|_| "604800".to_string()) // default 7 days
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_refresh_per_min: env::var("RATE_REFRESH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            zone: FixedOffset::east_opt(tz_offset_hours * 3600)
                .expect("TZ_OFFSET_HOURS out of range"),
            late_cutoff: env::var("LATE_CUTOFF")
                .unwrap_or_else(|_| "08:00:00".to_string())
                .parse()
                .expect("LATE_CUTOFF must be HH:MM:SS"),
            default_leave_quota: env::var("DEFAULT_LEAVE_QUOTA")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .expect("DEFAULT_LEAVE_QUOTA must be a number"),
            report_cache_ttl_secs: env::var("REPORT_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
        }
    }
}
