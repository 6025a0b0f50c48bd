use std::ops::ControlFlow;
use std::sync::Arc;

use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::response::query_result::QueryResult;
use scylla::response::PagingState;
use scylla::statement::unprepared::Statement;
use scylla::statement::Consistency;
use time::OffsetDateTime;
use tracing::debug;

use crate::error::{MapperError, StoreError};
use crate::mapper::DataMapper;
use crate::users::model::{User, UserStatus};

const DEFAULT_PAGE_SIZE: i32 = 10;

const SELECT_BY_EMAIL_CQL: &str = r#"
    SELECT user_email, password, name, status, last_activity,
           auth_token, google_token, facebook_token
    FROM user
    WHERE user_email = ?
    LIMIT 1
"#;

const SELECT_ALL_CQL: &str = r#"
    SELECT user_email, password, name, status, last_activity,
           auth_token, google_token, facebook_token
    FROM user
"#;

const INSERT_CQL: &str = r#"
    INSERT INTO user (user_email, password, name, status, last_activity,
                      auth_token, google_token, facebook_token)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

// Key columns never appear in the SET clause: the store forbids updating
// partition and clustering key columns.
const UPDATE_CQL: &str = r#"
    UPDATE user SET
        password = ?,
        status = ?,
        last_activity = ?,
        auth_token = ?,
        google_token = ?,
        facebook_token = ?
    WHERE user_email = ? AND name = ?
    IF EXISTS
"#;

const DELETE_CQL: &str = r#"
    DELETE FROM user
    WHERE user_email = ? AND name = ?
    IF EXISTS
"#;

/// Column tuple in statement order, scanned manually into [`User`].
type UserRow = (
    String,
    String,
    String,
    String,
    OffsetDateTime,
    String,
    String,
    String,
);

/// In-flight paged scan: the select it runs plus the continuation token the
/// store returned for the upcoming page. `token` is `None` once the store
/// has handed out the final page.
struct ScanState {
    select: Statement,
    token: Option<PagingState>,
}

/// Data mapper for the `user` table.
///
/// Point lookups and writes share the session and can run concurrently;
/// the paged-scan cursor is per-mapper state, so `find_all`/`next_page`
/// take `&mut self` and one mapper drives at most one scan at a time.
pub struct UserMapper {
    session: Arc<Session>,
    page_size: i32,
    scan: Option<ScanState>,
}

impl UserMapper {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            page_size: DEFAULT_PAGE_SIZE,
            scan: None,
        }
    }

    /// Page size for fetches issued after this call; pages already fetched
    /// by an in-flight scan keep their size.
    pub fn set_page_size(&mut self, size: i32) {
        // the driver rejects non-positive page sizes
        self.page_size = size.max(1);
    }

    /// Point lookup by partition key.
    pub async fn find_by_id(&self, id: &str) -> Result<User, MapperError> {
        let mut select = Statement::new(SELECT_BY_EMAIL_CQL);
        select.set_consistency(Consistency::One);

        let result = self
            .session
            .query_unpaged(select, (id,))
            .await
            .map_err(StoreError::from)?;
        let rows = result.into_rows_result().map_err(StoreError::from)?;

        match rows.maybe_first_row::<UserRow>().map_err(StoreError::from)? {
            Some(row) => Ok(row_into_user(row)?),
            None => Err(MapperError::NotFound),
        }
    }

    /// Start a new paged scan over the whole table and return its first
    /// page. Any scan already in flight is discarded.
    pub async fn find_all(&mut self) -> Result<Vec<User>, MapperError> {
        self.scan = None;

        let mut select = Statement::new(SELECT_ALL_CQL);
        select.set_page_size(self.page_size);

        let (result, paging) = self
            .session
            .query_single_page(select.clone(), &[], PagingState::start())
            .await
            .map_err(StoreError::from)?;
        let users = collect_rows(result)?;

        let token = match paging.into_paging_control_flow() {
            ControlFlow::Continue(token) => Some(token),
            ControlFlow::Break(()) => None,
        };
        self.scan = Some(ScanState { select, token });

        debug!(rows = users.len(), page_size = self.page_size, "started paged scan");
        Ok(users)
    }

    /// Fetch the next page of the scan started by [`find_all`].
    ///
    /// The returned flag is `true` exactly once, on the call that drains
    /// the result set; that call still carries the final page's records and
    /// resets the cursor, so any later call fails with
    /// [`MapperError::NoActiveQuery`].
    ///
    /// [`find_all`]: UserMapper::find_all
    pub async fn next_page(&mut self) -> Result<(Vec<User>, bool), MapperError> {
        let scan = self.scan.as_mut().ok_or(MapperError::NoActiveQuery)?;
        // copy the token so a failed fetch leaves the cursor retryable
        let token = match &scan.token {
            Some(token) => token.clone(),
            None => {
                // the first page already drained the result set
                self.scan = None;
                return Ok((Vec::new(), true));
            }
        };
        scan.select.set_page_size(self.page_size);
        let select = scan.select.clone();

        let (result, paging) = self
            .session
            .query_single_page(select, &[], token)
            .await
            .map_err(StoreError::from)?;
        let users = collect_rows(result)?;

        match paging.into_paging_control_flow() {
            ControlFlow::Continue(token) => {
                if let Some(scan) = self.scan.as_mut() {
                    scan.token = Some(token);
                }
                debug!(rows = users.len(), "fetched page, more remain");
                Ok((users, false))
            }
            ControlFlow::Break(()) => {
                self.scan = None;
                debug!(rows = users.len(), "fetched final page");
                Ok((users, true))
            }
        }
    }

    /// Write all columns for `user`; an existing `(email, name)` row is
    /// overwritten.
    pub async fn insert(&self, user: &User) -> Result<(), MapperError> {
        self.session
            .query_unpaged(
                INSERT_CQL,
                (
                    &user.email,
                    &user.password,
                    &user.name,
                    user.status.code(),
                    // the store is timezone-naive and reads back as UTC
                    user.last_activity_utc(),
                    &user.auth_token,
                    &user.google_token,
                    &user.facebook_token,
                ),
            )
            .await
            .map_err(StoreError::from)?;

        debug!(email = %user.email, name = %user.name, status = %user.status, "user inserted");
        Ok(())
    }

    /// Update every non-key column of the `(email, name)` row.
    ///
    /// The store gives no affected-rows signal, so updating a key that does
    /// not exist still reports success. Callers needing confirmation must
    /// check existence themselves.
    pub async fn update(&self, user: &User) -> Result<(), MapperError> {
        self.session
            .query_unpaged(
                UPDATE_CQL,
                (
                    &user.password,
                    user.status.code(),
                    user.last_activity_utc(),
                    &user.auth_token,
                    &user.google_token,
                    &user.facebook_token,
                    &user.email,
                    &user.name,
                ),
            )
            .await
            .map_err(StoreError::from)?;

        debug!(email = %user.email, name = %user.name, "user updated");
        Ok(())
    }

    /// Delete the `(email, name)` row.
    ///
    /// Same caveat as [`update`](UserMapper::update): a missing key is
    /// indistinguishable from a deletion that happened.
    pub async fn delete(&self, user: &User) -> Result<(), MapperError> {
        self.session
            .query_unpaged(DELETE_CQL, (&user.email, &user.name))
            .await
            .map_err(StoreError::from)?;

        debug!(email = %user.email, name = %user.name, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl DataMapper for UserMapper {
    type Model = User;
    type Id = str;

    async fn find_by_id(&self, id: &str) -> Result<User, MapperError> {
        UserMapper::find_by_id(self, id).await
    }

    async fn insert(&self, model: &User) -> Result<(), MapperError> {
        UserMapper::insert(self, model).await
    }

    async fn update(&self, model: &User) -> Result<(), MapperError> {
        UserMapper::update(self, model).await
    }

    async fn delete(&self, model: &User) -> Result<(), MapperError> {
        UserMapper::delete(self, model).await
    }
}

fn collect_rows(result: QueryResult) -> Result<Vec<User>, StoreError> {
    let rows = result.into_rows_result()?;
    let mut users = Vec::new();
    let mut iter = rows.rows::<UserRow>()?;
    while let Some(row) = iter.next().transpose()? {
        users.push(row_into_user(row)?);
    }
    Ok(users)
}

fn row_into_user(row: UserRow) -> Result<User, StoreError> {
    let (email, password, name, status, last_activity, auth_token, google_token, facebook_token) =
        row;
    let status = match UserStatus::from_code(&status) {
        Some(status) => status,
        None => return Err(StoreError::UnknownStatus(status)),
    };
    Ok(User {
        email,
        password,
        name,
        status,
        last_activity,
        auth_token,
        google_token,
        facebook_token,
    })
}
