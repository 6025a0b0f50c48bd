use serde::Deserialize;

/// Connection settings for the user store cluster.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub nodes: Vec<String>,
    pub keyspace: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl StoreConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let nodes: Vec<String> = std::env::var("CASSANDRA_NODES")
            .unwrap_or_else(|_| "127.0.0.1:9042".into())
            .split(',')
            .map(|node| node.trim().to_string())
            .filter(|node| !node.is_empty())
            .collect();
        if nodes.is_empty() {
            anyhow::bail!("CASSANDRA_NODES must name at least one contact point");
        }

        Ok(Self {
            nodes,
            keyspace: std::env::var("CASSANDRA_KEYSPACE").ok(),
            username: std::env::var("CASSANDRA_USER").ok(),
            password: std::env::var("CASSANDRA_PASSWORD").ok(),
        })
    }

    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_reads_nodes_and_falls_back_to_defaults() {
        std::env::set_var("CASSANDRA_NODES", "10.0.0.1:9042, 10.0.0.2:9042");
        std::env::set_var("CASSANDRA_KEYSPACE", "people");
        let config = StoreConfig::from_env().expect("config should parse");
        assert_eq!(config.nodes, vec!["10.0.0.1:9042", "10.0.0.2:9042"]);
        assert_eq!(config.keyspace.as_deref(), Some("people"));

        std::env::remove_var("CASSANDRA_NODES");
        std::env::remove_var("CASSANDRA_KEYSPACE");
        std::env::remove_var("CASSANDRA_USER");
        std::env::remove_var("CASSANDRA_PASSWORD");
        let config = StoreConfig::from_env().expect("defaults should apply");
        assert_eq!(config.nodes, vec!["127.0.0.1:9042"]);
        assert!(config.keyspace.is_none());
        assert!(config.username.is_none());
    }

    #[test]
    fn with_keyspace_overrides_the_target_keyspace() {
        let config = StoreConfig {
            nodes: vec!["127.0.0.1:9042".into()],
            keyspace: None,
            username: None,
            password: None,
        };
        assert_eq!(
            config.with_keyspace("people_test").keyspace.as_deref(),
            Some("people_test")
        );
    }
}
