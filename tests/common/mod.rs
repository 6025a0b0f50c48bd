use std::sync::Arc;

use anyhow::Context;
use time::OffsetDateTime;
use userstore::db::{self, Session};
use userstore::{StoreConfig, User, UserStatus};

const CREATE_USER_TABLE_CQL: &str = r#"
    CREATE TABLE user (
        user_email varchar,
        password varchar,
        name varchar,
        status varchar,
        last_activity timestamp,
        auth_token varchar,
        google_token varchar,
        facebook_token varchar,
        PRIMARY KEY ((user_email), name)
    ) WITH CLUSTERING ORDER BY (name ASC)
"#;

/// A dedicated keyspace with the `user` table, provisioned per test so the
/// suite needs no shared fixtures and tests can run in parallel.
pub struct TestStore {
    pub session: Arc<Session>,
    keyspace: String,
}

impl TestStore {
    pub async fn provision(keyspace: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        init_tracing();

        // the env may carry a production keyspace; tests always use their own
        let mut config = StoreConfig::from_env()?;
        config.keyspace = None;

        let session = db::connect(&config).await?;
        session
            .query_unpaged(format!("DROP KEYSPACE IF EXISTS {keyspace}"), &[])
            .await
            .context("drop leftover test keyspace")?;
        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE {keyspace} WITH replication = \
                     {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
                ),
                &[],
            )
            .await
            .context("create test keyspace")?;
        session
            .use_keyspace(keyspace, false)
            .await
            .context("switch to test keyspace")?;
        session
            .query_unpaged(CREATE_USER_TABLE_CQL, &[])
            .await
            .context("create user table")?;

        Ok(Self {
            session: Arc::new(session),
            keyspace: keyspace.to_string(),
        })
    }

    pub async fn teardown(self) -> anyhow::Result<()> {
        self.session
            .query_unpaged(format!("DROP KEYSPACE IF EXISTS {}", self.keyspace), &[])
            .await
            .context("drop test keyspace")?;
        Ok(())
    }
}

fn init_tracing() {
    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "userstore=debug,scylla=warn".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn sample_user(n: usize, last_activity: OffsetDateTime) -> User {
    User {
        email: format!("user{n}@example.com"),
        password: "argon2id$stub-hash".to_string(),
        name: n.to_string(),
        status: UserStatus::Active,
        last_activity,
        auth_token: format!("auth-token-{n}"),
        google_token: format!("google-token-{n}"),
        facebook_token: format!("facebook-token-{n}"),
    }
}
