pub trait DbConnectConfig: serde::de::DeserializeOwned {
    fn uri(&self) -> &str;
}

/// Configure database connection pool data
pub trait DbOptionsConfig {
    fn max_conn(&self) -> Option<u32> { None }
    fn min_conn(&self) -> Option<u32> { None }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PostgresDbConfig {
    #[serde(default = "uri_default")]
    pub uri: String,
    pub max_conn: Option<u32>,
    pub min_conn: Option<u32>,
}

impl Default for PostgresDbConfig {
    fn default() -> Self {
        Self {
            uri: uri_default(),
            max_conn: None,
            min_conn: None,
        }
    }
}

impl DbConnectConfig for PostgresDbConfig {
    fn uri(&self) -> &str { &self.uri }
}

impl DbOptionsConfig for PostgresDbConfig {
    fn max_conn(&self) -> Option<u32> { self.max_conn }

    fn min_conn(&self) -> Option<u32> { self.min_conn }
}

fn uri_default() -> String {
    "postgresql://localhost:5432/analytics_db".into()
}
