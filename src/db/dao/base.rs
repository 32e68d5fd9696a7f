use sea_orm::{DatabaseConnection, EntityTrait, PrimaryKeyTrait, Select};

use super::error::DaoResult;

/// Generic single-table access keyed by an integer primary key.
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<i64> + Send + Sync,
{
    type Entity: EntityTrait + Send + Sync;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    async fn find_by_id(
        &self,
        id: i64,
    ) -> DaoResult<Option<<Self::Entity as EntityTrait>::Model>> {
        Ok(Self::Entity::find_by_id(id).one(self.db()).await?)
    }

    async fn find_all(
        &self,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Vec<<Self::Entity as EntityTrait>::Model>> {
        Ok(apply(Self::Entity::find()).all(self.db()).await?)
    }

    /// Returns the number of rows removed; a missing id is `Ok(0)`.
    async fn delete_by_id(&self, id: i64) -> DaoResult<u64> {
        let result = Self::Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(result.rows_affected)
    }

    async fn ping(&self) -> DaoResult<()> {
        Ok(self.db().ping().await?)
    }
}
