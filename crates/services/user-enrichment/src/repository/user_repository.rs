//! User repository implementation.

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use domain::{PageRequest, SortColumn, UserFields, UserRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Result of a store operation; failures are raw database errors.
pub type StoreResult<T> = Result<T, DbErr>;

/// User repository trait for dependency injection.
///
/// Update and delete report the number of affected rows; a missing id is
/// not an error at this layer.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// One page of users ordered ascending by `sort`
    async fn get_all(&self, page: PageRequest, sort: SortColumn) -> StoreResult<Vec<UserRecord>>;

    /// Insert a new user; the store assigns the id
    async fn save(&self, fields: UserFields) -> StoreResult<()>;

    /// Overwrite all mutable fields of the user with `id`
    async fn update(&self, id: i32, fields: UserFields) -> StoreResult<u64>;

    /// Delete the user with `id`
    async fn delete(&self, id: i32) -> StoreResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(fields: UserFields) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(fields.name),
        surname: Set(fields.surname),
        patronymic: Set(fields.patronymic),
        age: Set(fields.age),
        gender: Set(fields.gender),
        nationality: Set(fields.nationality),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn get_all(&self, page: PageRequest, sort: SortColumn) -> StoreResult<Vec<UserRecord>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::from(sort))
            .limit(page.limit())
            .offset(page.offset())
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(UserRecord::from).collect())
    }

    async fn save(&self, fields: UserFields) -> StoreResult<()> {
        UserEntity::insert(active_model(fields))
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn update(&self, id: i32, fields: UserFields) -> StoreResult<u64> {
        let result = UserEntity::update_many()
            .set(active_model(fields))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i32) -> StoreResult<u64> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
