use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub moralis_api_key: String,

    /// Seconds between tracker cycles.
    pub poll_interval_secs: u64,
    /// Bound on every outbound network call (quote fetch, store selection).
    pub http_timeout_secs: u64,

    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: SmtpTls,

    /// Recipient for plain price-change notifications. Unset means change
    /// detection still runs and logs, but no mail goes out.
    pub change_notify_email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub enum SmtpTls {
    #[default]
    StartTls,
    Tls,
    None,
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|s| !s.trim().is_empty())
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "tokenwatch".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let moralis_api_key = env::var("MORALIS_API_KEY").unwrap_or_default();

    let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(300);

    let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);

    let smtp_tls = match env::var("SMTP_TLS").unwrap_or_default().as_str() {
        "tls" => SmtpTls::Tls,
        "none" => SmtpTls::None,
        _ => SmtpTls::StartTls,
    };

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        moralis_api_key,
        poll_interval_secs,
        http_timeout_secs,
        smtp_host: non_empty("SMTP_HOST"),
        smtp_port: env::var("SMTP_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(587),
        smtp_username: non_empty("SMTP_USERNAME"),
        smtp_password: non_empty("SMTP_PASSWORD"),
        smtp_from: non_empty("SMTP_FROM_ADDRESS"),
        smtp_tls,
        change_notify_email: non_empty("CHANGE_NOTIFY_EMAIL"),
    }
}
