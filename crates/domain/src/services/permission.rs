//! Authorizing adapters around the product and local use cases.
//!
//! Each adapter exposes the same trait as the use case it wraps. Every call
//! is checked against the policy first; a denied call returns `Unauthorized`
//! and never reaches the inner implementation.

use async_trait::async_trait;

use super::authorization::{authorize, Action};
use super::local::LocalUseCase;
use super::product::ProductUseCase;
use crate::error::DomainResult;
use crate::models::{GeneralFilter, Local, LocalInput, PaginatedList, Product, ProductInput, User};

fn check(user: &User, action: Action) -> DomainResult<()> {
    authorize(user, action).inspect_err(|_| {
        tracing::warn!(
            user_id = user.id,
            role = %user.role,
            action = %action,
            "Permission denied"
        );
    })
}

pub struct PermissionProductUseCase<U> {
    inner: U,
}

impl<U: ProductUseCase> PermissionProductUseCase<U> {
    pub fn new(inner: U) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<U: ProductUseCase> ProductUseCase for PermissionProductUseCase<U> {
    async fn create(&self, user: User, input: ProductInput) -> DomainResult<i64> {
        check(&user, Action::CreateProduct)?;
        self.inner.create(user, input).await
    }

    async fn list(
        &self,
        user: User,
        filter: GeneralFilter,
    ) -> DomainResult<PaginatedList<Product>> {
        check(&user, Action::ListProducts)?;
        self.inner.list(user, filter).await
    }

    async fn get_by_id(&self, user: User, id: i64) -> DomainResult<Product> {
        check(&user, Action::GetProduct)?;
        self.inner.get_by_id(user, id).await
    }

    async fn edit(&self, user: User, id: i64, input: ProductInput) -> DomainResult<()> {
        check(&user, Action::EditProduct)?;
        self.inner.edit(user, id, input).await
    }

    async fn delete(&self, user: User, id: i64) -> DomainResult<()> {
        check(&user, Action::DeleteProduct)?;
        self.inner.delete(user, id).await
    }

    async fn set_read(&self, user: User, id: i64) -> DomainResult<()> {
        check(&user, Action::SetReadFlag)?;
        self.inner.set_read(user, id).await
    }

    async fn clear_read(&self, user: User, id: i64) -> DomainResult<()> {
        check(&user, Action::ClearReadFlag)?;
        self.inner.clear_read(user, id).await
    }

    async fn list_read(
        &self,
        user: User,
        filter: GeneralFilter,
    ) -> DomainResult<PaginatedList<Product>> {
        check(&user, Action::ListReadProducts)?;
        self.inner.list_read(user, filter).await
    }
}

pub struct PermissionLocalUseCase<U> {
    inner: U,
}

impl<U: LocalUseCase> PermissionLocalUseCase<U> {
    pub fn new(inner: U) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<U: LocalUseCase> LocalUseCase for PermissionLocalUseCase<U> {
    async fn create(&self, user: User, input: LocalInput) -> DomainResult<i64> {
        check(&user, Action::CreateLocal)?;
        self.inner.create(user, input).await
    }

    async fn list(&self, user: User, filter: GeneralFilter) -> DomainResult<PaginatedList<Local>> {
        check(&user, Action::ListLocals)?;
        self.inner.list(user, filter).await
    }

    async fn get_by_id(&self, user: User, id: i64) -> DomainResult<Local> {
        check(&user, Action::GetLocal)?;
        self.inner.get_by_id(user, id).await
    }

    async fn edit(&self, user: User, id: i64, input: LocalInput) -> DomainResult<()> {
        check(&user, Action::EditLocal)?;
        self.inner.edit(user, id, input).await
    }

    async fn delete(&self, user: User, id: i64) -> DomainResult<()> {
        check(&user, Action::DeleteLocal)?;
        self.inner.delete(user, id).await
    }
}
