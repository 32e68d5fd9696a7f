use crate::{
    db::dao::{DaoBase, DaoLayerError, TodoChanges, TodoDao},
    db::entities::todo,
    error::AppError,
};

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn list(&self) -> Result<Vec<todo::Model>, AppError> {
        let todos = self
            .todo_dao
            .get_all()
            .await
            .map_err(|err| store_failure("list", None, err))?;
        tracing::info!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    pub async fn get(&self, id: i64) -> Result<todo::Model, AppError> {
        let todo = self
            .todo_dao
            .retrieve(id)
            .await
            .map_err(|err| store_failure("retrieve", Some(id), err))?;
        match todo {
            Some(todo) => {
                tracing::info!(id, "found todo");
                Ok(todo)
            }
            None => Err(not_found(id)),
        }
    }

    pub async fn create(&self, id: Option<i64>, changes: TodoChanges) -> Result<i64, AppError> {
        let id = self
            .todo_dao
            .create(id, changes)
            .await
            .map_err(|err| store_failure("create", id, err))?;
        tracing::info!(id, "created todo");
        Ok(id)
    }

    /// Partial update. A request that supplies no field is rejected, since an
    /// empty write can't tell an existing record from a missing one.
    pub async fn update(&self, id: i64, changes: TodoChanges) -> Result<u64, AppError> {
        if changes.is_empty() {
            tracing::warn!(id, "update without any fields");
            return Err(AppError::bad_request("No fields to update"));
        }

        let updated = self
            .todo_dao
            .update(id, changes)
            .await
            .map_err(|err| store_failure("update", Some(id), err))?;
        if updated == 0 {
            return Err(not_found(id));
        }
        tracing::info!(id, updated, "updated todo");
        Ok(updated)
    }

    pub async fn upsert(&self, id: i64, changes: TodoChanges) -> Result<i64, AppError> {
        let id = self
            .todo_dao
            .upsert(id, changes)
            .await
            .map_err(|err| store_failure("upsert", Some(id), err))?;
        tracing::info!(id, "upserted todo");
        Ok(id)
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let deleted = self
            .todo_dao
            .delete(id)
            .await
            .map_err(|err| store_failure("delete", Some(id), err))?;
        tracing::info!(id, deleted, "deleted todo");
        Ok(deleted)
    }

    pub async fn is_ready(&self) -> bool {
        match self.todo_dao.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "database ping failed");
                false
            }
        }
    }
}

fn not_found(id: i64) -> AppError {
    tracing::warn!(id, "todo not found");
    AppError::not_found(format!("Todo {id} not found"))
}

fn store_failure(operation: &'static str, id: Option<i64>, err: DaoLayerError) -> AppError {
    match &err {
        DaoLayerError::Constraint(_) => {
            tracing::warn!(operation, ?id, error = %err, "todo write rejected");
        }
        DaoLayerError::Db(_) => {
            tracing::error!(operation, ?id, error = %err, "todo store failure");
        }
    }
    err.into()
}
