//! Local (site) use cases.

use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{GeneralFilter, ListScope, Local, LocalInput, PaginatedList, StatusCode, User};
use crate::ports::LocalRepository;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LocalUseCase: Send + Sync {
    async fn create(&self, user: User, input: LocalInput) -> DomainResult<i64>;

    async fn list(&self, user: User, filter: GeneralFilter) -> DomainResult<PaginatedList<Local>>;

    async fn get_by_id(&self, user: User, id: i64) -> DomainResult<Local>;

    async fn edit(&self, user: User, id: i64, input: LocalInput) -> DomainResult<()>;

    /// Soft delete. Deleting a local that is already gone yields `NotFound`.
    async fn delete(&self, user: User, id: i64) -> DomainResult<()>;
}

pub struct LocalService {
    locals: Arc<dyn LocalRepository>,
}

impl LocalService {
    pub fn new(locals: Arc<dyn LocalRepository>) -> Self {
        Self { locals }
    }

    async fn require_local(&self, owner_id: i64, id: i64) -> DomainResult<Local> {
        if id <= 0 {
            return Err(DomainError::invalid("id must be positive"));
        }
        self.locals
            .get_by_id(owner_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("local {}", id)))
    }
}

#[async_trait]
impl LocalUseCase for LocalService {
    async fn create(&self, user: User, input: LocalInput) -> DomainResult<i64> {
        input.validate()?;
        let id = self
            .locals
            .create(user.id, input.normalized(), StatusCode::Exists)
            .await?;

        tracing::info!(user_id = user.id, local_id = id, "Local created");
        Ok(id)
    }

    async fn list(&self, user: User, filter: GeneralFilter) -> DomainResult<PaginatedList<Local>> {
        let query = filter.into_query(user.id, ListScope::default())?;
        self.locals.list(query).await
    }

    async fn get_by_id(&self, user: User, id: i64) -> DomainResult<Local> {
        self.require_local(user.id, id).await
    }

    async fn edit(&self, user: User, id: i64, input: LocalInput) -> DomainResult<()> {
        input.validate()?;
        self.require_local(user.id, id).await?;
        if !self.locals.edit(user.id, id, input.normalized()).await? {
            return Err(DomainError::not_found(format!("local {}", id)));
        }

        tracing::info!(user_id = user.id, local_id = id, "Local updated");
        Ok(())
    }

    async fn delete(&self, user: User, id: i64) -> DomainResult<()> {
        self.require_local(user.id, id).await?;
        self.locals.soft_delete(user.id, id).await?;

        tracing::info!(user_id = user.id, local_id = id, "Local deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::ports::MockLocalRepository;
    use crate::services::test_support::{local_input, sample_local, user_with_role};

    #[tokio::test]
    async fn test_create_trims_and_stamps_status() {
        let user = user_with_role(Role::Flat3);
        let owner = user.id;
        let mut locals = MockLocalRepository::new();
        locals
            .expect_create()
            .withf(move |o, input, status| {
                *o == owner && input.name == "Warehouse" && *status == StatusCode::Exists
            })
            .times(1)
            .returning(|_, _, _| Ok(12));
        locals.expect_set_status_code().times(0);

        let mut input = local_input();
        input.name = "  Warehouse ".into();
        let id = LocalService::new(Arc::new(locals))
            .create(user, input)
            .await
            .unwrap();
        assert_eq!(id, 12);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let mut locals = MockLocalRepository::new();
        locals.expect_create().times(0);
        let mut input = local_input();
        input.name = "   ".into();
        let err = LocalService::new(Arc::new(locals))
            .create(user_with_role(Role::Master), input)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_get_missing_local() {
        let mut locals = MockLocalRepository::new();
        locals.expect_get_by_id().returning(|_, _| Ok(None));
        let err = LocalService::new(Arc::new(locals))
            .get_by_id(user_with_role(Role::Master), 8)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_edit_existing_local() {
        let mut locals = MockLocalRepository::new();
        locals
            .expect_get_by_id()
            .returning(|o, id| Ok(Some(sample_local(o, id))));
        locals
            .expect_edit()
            .withf(|_, id, input| *id == 8 && input.city == "Olinda")
            .times(1)
            .returning(|_, _, _| Ok(true));

        let mut input = local_input();
        input.city = " Olinda ".into();
        LocalService::new(Arc::new(locals))
            .edit(user_with_role(Role::Master), 8, input)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_edit_of_row_deleted_meanwhile_is_not_found() {
        let mut locals = MockLocalRepository::new();
        locals
            .expect_get_by_id()
            .returning(|o, id| Ok(Some(sample_local(o, id))));
        locals.expect_edit().times(1).returning(|_, _, _| Ok(false));

        let err = LocalService::new(Arc::new(locals))
            .edit(user_with_role(Role::Master), 8, local_input())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_create_is_reported() {
        let mut locals = MockLocalRepository::new();
        locals
            .expect_create()
            .times(1)
            .returning(|_, _, _| Err(DomainError::unexpected("storage failure")));
        locals.expect_set_status_code().times(0);

        let err = LocalService::new(Arc::new(locals))
            .create(user_with_role(Role::Master), local_input())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_local_is_not_found() {
        let mut locals = MockLocalRepository::new();
        locals.expect_get_by_id().returning(|_, _| Ok(None));
        locals.expect_soft_delete().times(0);
        let err = LocalService::new(Arc::new(locals))
            .delete(user_with_role(Role::Master), 8)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_uses_no_extra_scope() {
        let mut locals = MockLocalRepository::new();
        locals
            .expect_list()
            .withf(|q| q.scope == ListScope::default() && q.search.as_deref() == Some("hq"))
            .times(1)
            .returning(|q| Ok(PaginatedList::new(Vec::new(), 0, q.limit)));

        let filter = GeneralFilter {
            search: " hq ".into(),
            id_local: Some(3),
            ..Default::default()
        };
        LocalService::new(Arc::new(locals))
            .list(user_with_role(Role::Master), filter)
            .await
            .unwrap();
    }
}
