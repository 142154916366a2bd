/// Configuration for the database backend
///
/// Holds everything needed to open the connection pool. Built from the
/// `database` section of the application config.
#[derive(Debug, Clone)]
pub struct DatabaseBackendConfig {
    /// Connection URL for the storage backend
    /// Examples: "sqlite:./sales.db", "sales.db", ":memory:" or "sqlite::memory:"
    pub connection_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseBackendConfig {
    pub fn new(connection_url: String) -> Self {
        Self {
            connection_url,
            max_connections: 10,
            connection_timeout: 30,
        }
    }

    /// Create an in-memory SQLite configuration for testing
    pub fn memory_sqlite() -> Self {
        Self::new(":memory:".to_string())
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_connection_timeout(mut self, timeout_seconds: u64) -> Self {
        self.connection_timeout = timeout_seconds;
        self
    }

    pub fn is_memory_database(&self) -> bool {
        matches!(self.connection_url.as_str(), ":memory:" | "sqlite::memory:")
    }

    /// The URL in the form sqlx expects, prefixing bare file paths.
    pub fn sqlx_url(&self) -> String {
        if self.is_memory_database() {
            "sqlite::memory:".to_string()
        } else if self.connection_url.starts_with("sqlite:") {
            self.connection_url.clone()
        } else {
            format!("sqlite:{}", self.connection_url)
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connection_url.is_empty() {
            return Err("Connection URL cannot be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("Max connections must be greater than 0".to_string());
        }

        if !self.connection_url.starts_with("sqlite:")
            && self.connection_url != ":memory:"
            && !self.connection_url.ends_with(".db")
            && !self.connection_url.ends_with(".sqlite")
        {
            return Err("SQLite connection URL must start with 'sqlite:', be ':memory:', or end with '.db' or '.sqlite'".to_string());
        }

        Ok(())
    }
}

impl Default for DatabaseBackendConfig {
    fn default() -> Self {
        Self::memory_sqlite()
    }
}
