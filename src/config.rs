use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the registration API the client talks to.
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub http_timeout_seconds: u64,
    pub records_per_page: usize,
    pub max_visible_pages: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".into()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            http_timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "15".into())
                .parse()?,
            records_per_page: positive("RECORDS_PER_PAGE", 30)?,
            max_visible_pages: positive("MAX_VISIBLE_PAGES", 10)?,
        })
    }

    /// Defaults pointed at an explicit API, used by tests and tooling.
    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            host: "127.0.0.1".into(),
            port: 0,
            http_timeout_seconds: 15,
            records_per_page: 30,
            max_visible_pages: 10,
        }
    }
}

fn positive(key: &str, default: usize) -> anyhow::Result<usize> {
    let value: usize = match env::var(key) {
        Ok(raw) => raw.parse()?,
        Err(_) => default,
    };
    if value == 0 {
        anyhow::bail!("{key} must be greater than zero");
    }
    Ok(value)
}
