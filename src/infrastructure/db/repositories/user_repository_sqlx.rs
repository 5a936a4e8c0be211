use async_trait::async_trait;
use futures_util::{Stream, TryStreamExt};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, Transaction};

use crate::application::ports::user_repository::{StoreError, UserRepository};
use crate::domain::users::user::{Link, LinkInput, LinkUpdateInput, User};
use crate::infrastructure::db::SqlitePool;
use crate::infrastructure::db::repositories::constraint::{
    Violation, db_operation, scan_failed, violation_of,
};

// One row per link, or a single row with NULL link columns when the user has
// none. Links come back in creation order.
const USER_BY_EMAIL: &str = r#"SELECT u.id, u.email, u.username, u.pass_hash, u.about_text,
       l.id AS link_id, l.user_id AS link_user_id, l.link_name, l.link_color, l.link_path
  FROM users u
  LEFT JOIN links l ON l.user_id = u.id
 WHERE u.email = ?
 ORDER BY l.id"#;

const USER_BY_ID: &str = r#"SELECT u.id, u.email, u.username, u.pass_hash, u.about_text,
       l.id AS link_id, l.user_id AS link_user_id, l.link_name, l.link_color, l.link_path
  FROM users u
  LEFT JOIN links l ON l.user_id = u.id
 WHERE u.id = ?
 ORDER BY l.id"#;

const USER_BY_USERNAME: &str = r#"SELECT u.id, u.email, u.username, u.pass_hash, u.about_text,
       l.id AS link_id, l.user_id AS link_user_id, l.link_name, l.link_color, l.link_path
  FROM users u
  LEFT JOIN links l ON l.user_id = u.id
 WHERE u.username = ?
 ORDER BY l.id"#;

#[derive(Debug, Clone, Copy)]
enum UserKey<'a> {
    Email(&'a str),
    Id(i64),
    Username(&'a str),
}

pub struct SqlxUserRepository {
    pub pool: SqlitePool,
}

impl SqlxUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_user(&self, key: UserKey<'_>) -> Result<User, StoreError> {
        let query = match key {
            UserKey::Email(email) => sqlx::query(USER_BY_EMAIL).bind(email),
            UserKey::Id(id) => sqlx::query(USER_BY_ID).bind(id),
            UserKey::Username(username) => sqlx::query(USER_BY_USERNAME).bind(username),
        };
        let result = fold_user_rows(query.fetch(&self.pool)).await;
        if let Err(StoreError::UserNotFound) = &result {
            tracing::debug!(?key, "user not found");
        }
        result
    }
}

/// Accumulates one user and its links from a flattened `users LEFT JOIN links`
/// result. User columns are decoded from the first row only.
#[derive(Debug, Default)]
struct UserAggregate {
    user: Option<User>,
}

impl UserAggregate {
    fn push_row(&mut self, row: &SqliteRow) -> Result<(), StoreError> {
        if self.user.is_none() {
            let first = decode_user(row).map_err(|e| {
                tracing::error!(error = ?e, "failed to scan user data");
                scan_failed(e)
            })?;
            self.user = Some(first);
        }
        let link = decode_link(row).map_err(|e| {
            tracing::error!(error = ?e, "failed to scan link data");
            scan_failed(e)
        })?;
        if let (Some(user), Some(link)) = (self.user.as_mut(), link) {
            user.links.push(link);
        }
        Ok(())
    }

    fn finish(self) -> Result<User, StoreError> {
        self.user.ok_or(StoreError::UserNotFound)
    }
}

/// Folds a forward-only row stream into a single [`User`].
///
/// Any undecodable row aborts the read: a malformed link must not hide its
/// siblings behind a seemingly complete profile.
pub(crate) async fn fold_user_rows<S>(mut rows: S) -> Result<User, StoreError>
where
    S: Stream<Item = Result<SqliteRow, sqlx::Error>> + Unpin,
{
    let mut aggregate = UserAggregate::default();
    while let Some(row) = rows.try_next().await.map_err(|e| {
        tracing::error!(error = ?e, "rows iteration failed");
        db_operation(e)
    })? {
        aggregate.push_row(&row)?;
    }
    aggregate.finish()
}

fn decode_user(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        hashed_password: row.try_get("pass_hash")?,
        about_text: row.try_get("about_text")?,
        links: Vec::new(),
    })
}

fn decode_link(row: &SqliteRow) -> Result<Option<Link>, sqlx::Error> {
    let Some(id) = row.try_get::<Option<i64>, _>("link_id")? else {
        return Ok(None);
    };
    Ok(Some(Link {
        id,
        user_id: row.try_get("link_user_id")?,
        link_name: row.try_get("link_name")?,
        link_color: row.try_get("link_color")?,
        link_path: row.try_get("link_path")?,
    }))
}

/// Opens a transaction holding SQLite's write lock from the start, so waiting
/// writers go through the busy timeout. A deferred transaction that reads and
/// then writes fails at once with SQLITE_BUSY_SNAPSHOT when another connection
/// committed in between.
async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, StoreError> {
    pool.begin_with("BEGIN IMMEDIATE").await.map_err(|e| {
        tracing::error!(error = ?e, "failed to begin write transaction");
        db_operation(e)
    })
}

async fn insert_link<'e, E>(executor: E, user_id: i64, link: &LinkInput) -> Result<(), StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(
        "INSERT INTO links (user_id, link_name, link_color, link_path) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&link.link_name)
    .bind(&link.link_color)
    .bind(&link.link_path)
    .execute(executor)
    .await;
    match res {
        Ok(_) => Ok(()),
        Err(e) => match violation_of(&e) {
            Some(Violation::Unique) => {
                tracing::warn!(user_id, path = %link.link_path, "duplicate link path");
                Err(StoreError::LinkAlreadyExists)
            }
            Some(Violation::ForeignKey) => {
                tracing::warn!(user_id, "invalid user reference");
                Err(StoreError::UserNotFound)
            }
            None => {
                tracing::error!(user_id, error = ?e, "failed to insert link");
                Err(db_operation(e))
            }
        },
    }
}

async fn ensure_link_owned<'e, E>(executor: E, user_id: i64, link_id: i64) -> Result<(), StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists =
        sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM links WHERE id = ? AND user_id = ?)")
            .bind(link_id)
            .bind(user_id)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                tracing::error!(user_id, link_id, error = ?e, "failed to check link existence");
                db_operation(e)
            })?;
    if exists == 0 {
        tracing::warn!(user_id, link_id, "link not found or doesn't belong to user");
        return Err(StoreError::LinkNotFound);
    }
    Ok(())
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &[u8],
        about_text: &str,
        links: &[LinkInput],
    ) -> Result<User, StoreError> {
        let mut tx = begin_write(&self.pool).await?;
        let res = sqlx::query(
            "INSERT INTO users (email, username, pass_hash, about_text) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(about_text)
        .execute(&mut *tx)
        .await;
        let user_id = match res {
            Ok(done) => done.last_insert_rowid(),
            Err(e) if violation_of(&e) == Some(Violation::Unique) => {
                tracing::warn!(%email, %username, "user already exists");
                return Err(StoreError::UserAlreadyExists);
            }
            Err(e) => {
                tracing::error!(error = ?e, "failed to insert user");
                return Err(db_operation(e));
            }
        };

        // Seed links share the transaction: a bad one rolls the user back too.
        for link in links.iter().filter(|l| l.is_complete()) {
            insert_link(&mut *tx, user_id, link).await?;
        }
        tx.commit().await.map_err(db_operation)?;
        tracing::debug!(user_id, %email, "user created");

        match self.load_user(UserKey::Id(user_id)).await {
            Err(StoreError::UserNotFound) => {
                tracing::error!(user_id, "newly created user not found - data inconsistency");
                Err(StoreError::UserRetrievalFailed)
            }
            other => other,
        }
    }

    async fn user_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.load_user(UserKey::Email(email)).await
    }

    async fn user_by_id(&self, id: i64) -> Result<User, StoreError> {
        self.load_user(UserKey::Id(id)).await
    }

    async fn user_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.load_user(UserKey::Username(username)).await
    }

    async fn update_about_me(&self, id: i64, text: &str) -> Result<(), StoreError> {
        let res = sqlx::query("UPDATE users SET about_text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(user_id = id, error = ?e, "failed to update about text");
                db_operation(e)
            })?;
        if res.rows_affected() == 0 {
            tracing::warn!(user_id = id, "about text update affected 0 rows");
            return Err(StoreError::NoRowsAffected);
        }
        tracing::debug!(user_id = id, "about text updated");
        Ok(())
    }

    async fn add_link(&self, user_id: i64, link: &LinkInput) -> Result<(), StoreError> {
        insert_link(&self.pool, user_id, link).await?;
        tracing::debug!(user_id, "link added");
        Ok(())
    }

    async fn update_link(&self, user_id: i64, link: &LinkUpdateInput) -> Result<(), StoreError> {
        let link_id = link.link_id;
        let mut tx = begin_write(&self.pool).await?;
        ensure_link_owned(&mut *tx, user_id, link_id).await?;
        let res = sqlx::query(
            r#"UPDATE links
                  SET link_name = ?, link_color = ?, link_path = ?
                WHERE id = ? AND user_id = ?"#,
        )
        .bind(&link.link_name)
        .bind(&link.link_color)
        .bind(&link.link_path)
        .bind(link_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await;
        let done = match res {
            Ok(done) => done,
            Err(e) if violation_of(&e) == Some(Violation::Unique) => {
                tracing::warn!(user_id, link_id, path = %link.link_path, "duplicate link path");
                return Err(StoreError::LinkAlreadyExists);
            }
            Err(e) => {
                tracing::error!(user_id, link_id, error = ?e, "failed to execute link update");
                return Err(db_operation(e));
            }
        };
        if done.rows_affected() == 0 {
            return Err(StoreError::LinkNotFound);
        }
        tx.commit().await.map_err(db_operation)?;
        tracing::debug!(user_id, link_id, "link updated");
        Ok(())
    }

    async fn delete_link(&self, user_id: i64, link_id: i64) -> Result<(), StoreError> {
        let mut tx = begin_write(&self.pool).await?;
        ensure_link_owned(&mut *tx, user_id, link_id).await?;
        let done = sqlx::query("DELETE FROM links WHERE id = ? AND user_id = ?")
            .bind(link_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(user_id, link_id, error = ?e, "failed to execute delete link");
                db_operation(e)
            })?;
        if done.rows_affected() == 0 {
            return Err(StoreError::LinkNotFound);
        }
        tx.commit().await.map_err(db_operation)?;
        tracing::debug!(user_id, link_id, "link deleted");
        Ok(())
    }
}
