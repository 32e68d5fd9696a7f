use chrono::Utc;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    Insert, QueryFilter, QueryOrder, Set, TransactionTrait, prelude::DateTimeWithTimeZone,
    sea_query::OnConflict,
};

use super::{DaoBase, DaoResult};
use crate::db::entities::prelude::Todo;
use crate::db::entities::todo;

// Postgres only. Holding EXCLUSIVE blocks concurrent inserts until commit, so
// the sequence can be moved past MAX(id) without handing out a taken id.
const LOCK_TODOS: &str = "LOCK TABLE todos IN EXCLUSIVE MODE";
// Only ever moves the sequence forward and never below its minimum of 1, so
// ids <= 0 and ids under an already issued value leave it where it is.
const ADVANCE_ID_SEQUENCE: &str = "
WITH bounds AS (
    SELECT GREATEST(
        (SELECT MAX(id) FROM todos),
        pg_sequence_last_value(pg_get_serial_sequence('todos', 'id')::regclass)
    ) AS high
)
SELECT setval(pg_get_serial_sequence('todos', 'id'), GREATEST(high, 1), COALESCE(high >= 1, false))
FROM bounds";

/// Fields a caller wants to write. `None` leaves the column alone on update
/// and falls back to the column default on insert; `Some("")` is a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    fn columns(&self) -> Vec<todo::Column> {
        let mut columns = Vec::new();
        if self.title.is_some() {
            columns.push(todo::Column::Title);
        }
        if self.description.is_some() {
            columns.push(todo::Column::Description);
        }
        if self.status.is_some() {
            columns.push(todo::Column::Status);
        }
        columns
    }

    fn into_insert_model(self, now: DateTimeWithTimeZone) -> todo::ActiveModel {
        todo::ActiveModel {
            id: ActiveValue::NotSet,
            title: Set(self.title.unwrap_or_default()),
            description: Set(self.description.unwrap_or_default()),
            status: Set(self.status.unwrap_or(false)),
            created: Set(now),
            modified: Set(now),
        }
    }

    fn into_update_model(self, now: DateTimeWithTimeZone) -> todo::ActiveModel {
        let mut active = todo::ActiveModel {
            modified: Set(now),
            ..Default::default()
        };
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        active
    }
}

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = Todo;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TodoDao {
    /// Inserts a record and returns its id. With `id` set the row is written
    /// under that id and the generator is moved past it in the same
    /// transaction; an id already in use is a constraint violation.
    pub async fn create(&self, id: Option<i64>, changes: TodoChanges) -> DaoResult<i64> {
        let mut active = changes.into_insert_model(Utc::now().fixed_offset());
        let Some(id) = id else {
            let result = Todo::insert(active).exec(self.db()).await?;
            return Ok(result.last_insert_id);
        };

        active.id = Set(id);
        self.insert_with_explicit_id(Todo::insert(active)).await?;
        Ok(id)
    }

    pub async fn retrieve(&self, id: i64) -> DaoResult<Option<todo::Model>> {
        self.find_by_id(id).await
    }

    /// Writes only the supplied fields plus `modified`. Returns the number of
    /// rows touched: 0 when nothing was supplied or the id does not exist.
    pub async fn update(&self, id: i64, changes: TodoChanges) -> DaoResult<u64> {
        if changes.is_empty() {
            return Ok(0);
        }

        let active = changes.into_update_model(Utc::now().fixed_offset());
        let result = Todo::update_many()
            .set(active)
            .filter(todo::Column::Id.eq(id))
            .exec(self.db())
            .await?;
        Ok(result.rows_affected)
    }

    /// Insert-or-update keyed by `id` as one statement. An existing row gets
    /// the same field treatment as [`TodoDao::update`] and keeps `created`;
    /// a missing row is created as by [`TodoDao::create`]. Always returns `id`.
    pub async fn upsert(&self, id: i64, changes: TodoChanges) -> DaoResult<i64> {
        let columns = changes.columns();
        let mut active = changes.into_insert_model(Utc::now().fixed_offset());
        active.id = Set(id);

        let on_conflict = if columns.is_empty() {
            OnConflict::column(todo::Column::Id).do_nothing().to_owned()
        } else {
            OnConflict::column(todo::Column::Id)
                .update_columns(columns.into_iter().chain([todo::Column::Modified]))
                .to_owned()
        };

        self.insert_with_explicit_id(Todo::insert(active).on_conflict(on_conflict))
            .await?;
        Ok(id)
    }

    pub async fn delete(&self, id: i64) -> DaoResult<u64> {
        self.delete_by_id(id).await
    }

    pub async fn get_all(&self) -> DaoResult<Vec<todo::Model>> {
        self.find_all(|query| query.order_by_asc(todo::Column::Id))
            .await
    }

    async fn insert_with_explicit_id(&self, insert: Insert<todo::ActiveModel>) -> DaoResult<u64> {
        let txn = self.db().begin().await?;
        let is_postgres = txn.get_database_backend() == DatabaseBackend::Postgres;

        if is_postgres {
            txn.execute_unprepared(LOCK_TODOS).await?;
        }
        let rows = insert.exec_without_returning(&txn).await?;
        if is_postgres {
            txn.execute_unprepared(ADVANCE_ID_SEQUENCE).await?;
        }

        txn.commit().await?;
        Ok(rows)
    }
}
