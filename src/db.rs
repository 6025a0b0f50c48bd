use anyhow::Context;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session_builder::SessionBuilder;
use scylla::statement::Consistency;
use tracing::info;

use crate::config::StoreConfig;

// Re-export the session type so callers and test harnesses don't need a
// direct driver dependency.
pub use scylla::client::session::Session;

/// Build a session against the cluster described by `config`.
///
/// The default execution profile pins consistency ONE, which is what the
/// mapper layer expects from the store. Timeouts and retries live in the
/// driver profile as well; this layer adds none of its own.
pub async fn connect(config: &StoreConfig) -> anyhow::Result<Session> {
    let profile = ExecutionProfile::builder()
        .consistency(Consistency::One)
        .build();

    let mut builder = SessionBuilder::new()
        .known_nodes(&config.nodes)
        .default_execution_profile_handle(profile.into_handle());

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        builder = builder.user(username, password);
    }

    let session = builder.build().await.context("connect to cluster")?;

    if let Some(keyspace) = &config.keyspace {
        session
            .use_keyspace(keyspace, false)
            .await
            .with_context(|| format!("use keyspace {keyspace}"))?;
    }

    info!(nodes = ?config.nodes, keyspace = ?config.keyspace, "store session established");
    Ok(session)
}
