use std::time::Duration;

use envconfig::Envconfig;

use crate::types::ConnectionArgs;

/// Cluster connection settings, read from the environment.
#[derive(Envconfig, Clone, Debug)]
pub struct ClusterConfig {
    #[envconfig(from = "COUCH_URL", default = "http://127.0.0.1:5984")]
    pub url: String,
    #[envconfig(from = "COUCH_USER")]
    pub user: Option<String>,
    #[envconfig(from = "COUCH_PASSWORD")]
    pub password: Option<String>,
    #[envconfig(from = "COUCH_TIMEOUT_SECS", default = "30")]
    pub timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5984".to_string(),
            user: None,
            password: None,
            timeout_secs: 30,
        }
    }
}

impl ClusterConfig {
    /// Environment settings with command line overrides applied.
    pub fn load(conn: &ConnectionArgs) -> Result<Self, envconfig::Error> {
        Ok(Self::init_from_env()?.with_overrides(conn))
    }

    pub fn with_overrides(mut self, conn: &ConnectionArgs) -> Self {
        if let Some(url) = &conn.url {
            self.url = url.clone();
        }
        if let Some(user) = &conn.user {
            self.user = Some(user.clone());
        }
        if let Some(password) = &conn.password {
            self.password = Some(password.clone());
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
