use std::time::Duration;

use url::Url;

use crate::error::Error;
use crate::session_id::DEFAULT_PAIRING_SCHEME;

/// Backend address used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://192.168.3.14:3000";
/// Delay between two device-session polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
/// Pairing attempts expire after this long without a confirmed login.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wordbook client configuration.
///
/// The backend URL is the only required value; everything else has defaults
/// and can be overridden by chaining:
///
/// ```rust,ignore
/// use hearai_wordbook::Config;
///
/// let config = Config::new("https://wordbook.example.com".parse()?)
///     .with_poll_interval(std::time::Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    pub(crate) base_url: Url,
    pub(crate) poll_interval: Duration,
    pub(crate) poll_timeout: Duration,
    pub(crate) pairing_scheme: String,
    pub(crate) request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL.parse().expect("valid default URL"))
    }
}

impl Config {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            pairing_scheme: DEFAULT_PAIRING_SCHEME.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `HEARAI_BACKEND_URL`: backend base URL
    /// - `HEARAI_POLL_INTERVAL_MS`: device-session poll interval in milliseconds
    /// - `HEARAI_POLL_TIMEOUT_SECS`: pairing expiry in seconds
    /// - `HEARAI_PAIRING_SCHEME`: URI scheme embedded in the pairing code
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is set but malformed.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = match std::env::var("HEARAI_BACKEND_URL") {
            Ok(url_str) => Self::new(
                url_str
                    .parse()
                    .map_err(|e| Error::Config(format!("HEARAI_BACKEND_URL: {e}")))?,
            ),
            Err(_) => Self::default(),
        };

        if let Ok(ms) = std::env::var("HEARAI_POLL_INTERVAL_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("HEARAI_POLL_INTERVAL_MS: {e}")))?;
            config = config.with_poll_interval(Duration::from_millis(ms));
        }
        if let Ok(secs) = std::env::var("HEARAI_POLL_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("HEARAI_POLL_TIMEOUT_SECS: {e}")))?;
            config = config.with_poll_timeout(Duration::from_secs(secs));
        }
        if let Ok(scheme) = std::env::var("HEARAI_PAIRING_SCHEME") {
            config = config.with_pairing_scheme(scheme.trim());
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the poll loop cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero poll interval, a base URL that
    /// cannot carry paths, or an empty pairing scheme.
    pub fn validate(&self) -> Result<(), Error> {
        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll interval must be positive".into()));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "backend URL cannot be a base: {}",
                self.base_url
            )));
        }
        if self.pairing_scheme.is_empty() {
            return Err(Error::Config("pairing scheme must not be empty".into()));
        }
        Ok(())
    }

    /// Point the client at another backend.
    #[must_use]
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = url;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_pairing_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.pairing_scheme = scheme.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    #[must_use]
    pub fn pairing_scheme(&self) -> &str {
        &self.pairing_scheme
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// `POST` target for adding words.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL cannot be joined.
    pub fn words_url(&self) -> Result<Url, Error> {
        self.endpoint("my/words")
    }

    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL cannot be joined.
    pub fn profile_url(&self) -> Result<Url, Error> {
        self.endpoint("auth/profile")
    }

    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL cannot be joined.
    pub fn device_session_url(&self) -> Result<Url, Error> {
        self.endpoint("auth/device-session")
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        // Keep any path prefix of the base URL: join replaces the last segment
        // unless the base ends in a slash.
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(path)
            .map_err(|e| Error::Config(format!("{path}: {e}")))
    }
}
