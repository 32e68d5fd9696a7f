use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Constraint violation: {0}")]
    Constraint(DbErr),
    #[error("Database error: {0}")]
    Db(DbErr),
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl From<DbErr> for DaoLayerError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_))
            | Some(SqlErr::ForeignKeyConstraintViolation(_)) => DaoLayerError::Constraint(err),
            _ => DaoLayerError::Db(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::DaoLayerError;

    #[test]
    fn plain_errors_are_not_constraint_violations() {
        let err = DaoLayerError::from(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, DaoLayerError::Db(_)));
        assert!(err.to_string().starts_with("Database error:"));
    }
}
