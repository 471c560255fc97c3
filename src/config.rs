use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub mail_from_alias: String,
    pub mail_timeout: Duration,
    pub frontend_url: String,
    /// Name of the slot holding the serialized job list. Separate keys give separate queues.
    pub job_slot_key: String,
    pub sweep_interval: Duration,
    /// Days a sent, failed or cancelled job is kept. Values past the representable range never prune.
    pub retention_days: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://boatme-jobs.db?mode=rwc".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            mail_from_alias: env::var("MAIL_FROM_ALIAS").unwrap_or_else(|_| "default".to_string()),
            mail_timeout: Duration::from_secs(
                env::var("MAIL_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string()).parse().expect("MAIL_TIMEOUT_SECS must be a number"),
            ),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            job_slot_key: env::var("JOB_SLOT_KEY").unwrap_or_else(|_| "boatme_email_jobs".to_string()),
            sweep_interval: Duration::from_secs(
                env::var("SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "900".to_string()).parse().expect("SWEEP_INTERVAL_SECS must be a number"),
            ),
            retention_days: env::var("JOB_RETENTION_DAYS").unwrap_or_else(|_| "30".to_string()).parse().expect("JOB_RETENTION_DAYS must be a non-negative number"),
        }
    }
}
