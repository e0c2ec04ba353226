//! User service - orchestrates enrichment and persistence per request.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DbErr;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use common::{AppError, AppResult};
use domain::{parse_user_id, PageRequest, PaginatedUsers, SortColumn, User, UserFields};

use crate::enrichment::Enricher;
use crate::repository::UserRepository;

/// User service trait for dependency injection.
///
/// Raw pagination and id strings come straight from the transport; parsing
/// and fallback rules live here so every boundary behaves the same.
#[async_trait]
pub trait UserService: Send + Sync {
    /// One page of users. Unparsable or non-positive `page`/`page_size`
    /// fall back to the defaults; an unknown `sort` column is rejected.
    async fn list_users(
        &self,
        page: &str,
        page_size: &str,
        sort: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<PaginatedUsers>;

    /// Enrich and persist a new user
    async fn create_user(&self, user: User, cancel: &CancellationToken) -> AppResult<()>;

    /// Re-enrich and overwrite the user with `id`
    async fn update_user(&self, id: &str, user: User, cancel: &CancellationToken)
        -> AppResult<()>;

    /// Delete the user with `id`
    async fn delete_user(&self, id: &str, cancel: &CancellationToken) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository and enricher.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    enricher: Arc<dyn Enricher>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn UserRepository>, enricher: Arc<dyn Enricher>) -> Self {
        Self { repo, enricher }
    }

    async fn enrich(&self, user: User, cancel: &CancellationToken) -> AppResult<UserFields> {
        let attributes = self.enricher.enrich(&user.name, cancel).await.map_err(|e| {
            warn!(name = %user.name, error = %e, "Enrichment failed");
            AppError::from(e)
        })?;

        Ok(UserFields::enriched(user, attributes))
    }
}

/// Race a store call against the caller's cancellation.
async fn guarded<T, F>(cancel: &CancellationToken, call: F) -> AppResult<T>
where
    F: Future<Output = Result<T, DbErr>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = call => result.map_err(AppError::from),
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(
        &self,
        page: &str,
        page_size: &str,
        sort: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<PaginatedUsers> {
        let request = PageRequest::parse(page, page_size);
        let sort = SortColumn::resolve(sort)?;

        let users = guarded(cancel, self.repo.get_all(request, sort)).await?;

        info!(
            page = request.page,
            page_size = request.page_size,
            sort = %sort,
            count = users.len(),
            "Listed users"
        );
        Ok(PaginatedUsers::new(users, request))
    }

    async fn create_user(&self, user: User, cancel: &CancellationToken) -> AppResult<()> {
        let fields = self.enrich(user, cancel).await?;
        let name = fields.name.clone();

        guarded(cancel, self.repo.save(fields)).await?;

        info!(name = %name, "User created");
        Ok(())
    }

    async fn update_user(
        &self,
        id: &str,
        user: User,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        let id = parse_user_id(id)?;
        let fields = self.enrich(user, cancel).await?;

        let affected = guarded(cancel, self.repo.update(id, fields)).await?;

        if affected == 0 {
            warn!(id, "Update matched no user");
        } else {
            info!(id, "User updated");
        }
        Ok(())
    }

    async fn delete_user(&self, id: &str, cancel: &CancellationToken) -> AppResult<()> {
        let id = parse_user_id(id)?;

        let affected = guarded(cancel, self.repo.delete(id)).await?;

        if affected == 0 {
            warn!(id, "Delete matched no user");
        } else {
            info!(id, "User deleted");
        }
        Ok(())
    }
}
