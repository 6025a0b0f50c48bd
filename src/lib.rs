//! Data-access layer mapping the `user` domain entity to rows in a
//! wide-column store (Cassandra / ScyllaDB).
//!
//! [`UserMapper`] exposes point lookups, whole-table pagination driven by
//! the store's continuation tokens, and conditional writes keyed by
//! `(email, name)`. Sessions are built in [`db`] from a
//! [`config::StoreConfig`]; every failure is typed in [`error`].

pub mod config;
pub mod db;
pub mod error;
pub mod mapper;
pub mod users;

pub use config::StoreConfig;
pub use error::{MapperError, StoreError};
pub use mapper::DataMapper;
pub use users::{User, UserMapper, UserStatus};
