pub trait DbConnectConfig: serde::de::DeserializeOwned {
    /// Full connection string; takes precedence over the individual parts.
    fn url(&self) -> Option<&str> { None }
    fn password(&self) -> Option<&str> { None }
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn db(&self) -> u8;
    fn max_conn(&self) -> usize { 16 }
    fn timeout_ms(&self) -> u64 { 500 }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RedisDbConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "host_default")]
    pub host: String,
    #[serde(default = "port_default")]
    pub port: u16,
    #[serde(default = "db_default")]
    pub db: u8,
    #[serde(default = "max_conn_default")]
    pub max_conn: usize,
    #[serde(default = "timeout_ms_default")]
    pub timeout_ms: u64,
}

impl Default for RedisDbConfig {
    fn default() -> Self {
        Self {
            url: None,
            password: None,
            host: host_default(),
            port: port_default(),
            db: db_default(),
            max_conn: max_conn_default(),
            timeout_ms: timeout_ms_default(),
        }
    }
}

impl DbConnectConfig for RedisDbConfig {
    fn url(&self) -> Option<&str> { self.url.as_deref() }

    fn password(&self) -> Option<&str> { self.password.as_deref() }

    fn host(&self) -> &str { &self.host }

    fn port(&self) -> u16 { self.port }

    fn db(&self) -> u8 { self.db }

    fn max_conn(&self) -> usize { self.max_conn }

    fn timeout_ms(&self) -> u64 { self.timeout_ms }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_capacity")]
    pub capacity: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_memory_capacity(),
        }
    }
}

fn host_default() -> String { "localhost".into() }
fn port_default() -> u16 { 6379 }
fn db_default() -> u8 { 0 }
fn max_conn_default() -> usize { 16 }
fn timeout_ms_default() -> u64 { 500 }
fn default_memory_capacity() -> u64 { 10_000 }
