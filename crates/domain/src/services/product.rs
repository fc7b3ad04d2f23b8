//! Product (camera) use cases.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    GeneralFilter, ListScope, PaginatedList, Product, ProductInput, ProductRecord, StatusCode,
    User,
};
use crate::ports::{FileStorage, LocalRepository, ProductRepository};

/// Operations exposed for products. All calls act on the caller's own rows.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProductUseCase: Send + Sync {
    async fn create(&self, user: User, input: ProductInput) -> DomainResult<i64>;

    async fn list(&self, user: User, filter: GeneralFilter)
        -> DomainResult<PaginatedList<Product>>;

    async fn get_by_id(&self, user: User, id: i64) -> DomainResult<Product>;

    async fn edit(&self, user: User, id: i64, input: ProductInput) -> DomainResult<()>;

    /// Soft delete. Deleting a product that is already gone yields `NotFound`.
    async fn delete(&self, user: User, id: i64) -> DomainResult<()>;

    /// Adds the product to the read working set.
    async fn set_read(&self, user: User, id: i64) -> DomainResult<()>;

    /// Removes the product from the read working set.
    async fn clear_read(&self, user: User, id: i64) -> DomainResult<()>;

    async fn list_read(
        &self,
        user: User,
        filter: GeneralFilter,
    ) -> DomainResult<PaginatedList<Product>>;
}

/// Storage-backed product use cases.
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    locals: Arc<dyn LocalRepository>,
    files: Arc<dyn FileStorage>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        locals: Arc<dyn LocalRepository>,
        files: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            products,
            locals,
            files,
        }
    }

    async fn require_local(&self, owner_id: i64, local_id: i64) -> DomainResult<()> {
        if self.locals.exists_active(owner_id, local_id).await? {
            Ok(())
        } else {
            Err(DomainError::InvalidReference(format!(
                "local {} does not exist or is inactive",
                local_id
            )))
        }
    }

    async fn require_product(&self, owner_id: i64, id: i64) -> DomainResult<Product> {
        if id <= 0 {
            return Err(DomainError::invalid("id must be positive"));
        }
        self.products
            .get_by_id(owner_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("product {}", id)))
    }

    /// Stores an uploaded image. URLs are kept as given.
    async fn store_image(&self, image: Option<String>) -> DomainResult<Option<String>> {
        match image.filter(|data| !data.trim().is_empty()) {
            None => Ok(None),
            Some(url) if shared::validation::is_http_url(&url) => Ok(Some(url)),
            Some(data) => {
                let hint = format!("images/products/{}", Uuid::new_v4());
                let url = self.files.save_encoded_image(data, hint).await?;
                Ok(Some(url))
            }
        }
    }

    async fn remove_image(&self, url: Option<String>) {
        if let Some(url) = url {
            if let Err(e) = self.files.delete(url.clone()).await {
                tracing::warn!(url = %url, error = %e, "Failed to remove product image");
            }
        }
    }

    async fn set_flag(&self, user: &User, id: i64, flag: bool) -> DomainResult<()> {
        if id <= 0 {
            return Err(DomainError::invalid("id must be positive"));
        }
        if self.products.set_parameter_flag(user.id, id, flag).await? {
            Ok(())
        } else {
            Err(DomainError::not_found(format!("product {}", id)))
        }
    }
}

#[async_trait]
impl ProductUseCase for ProductService {
    async fn create(&self, user: User, mut input: ProductInput) -> DomainResult<i64> {
        input.validate()?;
        self.require_local(user.id, input.local_id).await?;

        let uploading = input
            .image_base64
            .as_deref()
            .is_some_and(|data| !data.trim().is_empty() && !shared::validation::is_http_url(data));
        let image_url = self.store_image(input.image_base64.take()).await?;
        let record = ProductRecord::from_input(input, image_url.clone());

        let id = match self.products.create(user.id, record, StatusCode::Exists).await {
            Ok(id) => id,
            Err(e) => {
                if uploading {
                    self.remove_image(image_url).await;
                }
                return Err(e);
            }
        };

        tracing::info!(user_id = user.id, product_id = id, "Product created");
        Ok(id)
    }

    async fn list(
        &self,
        user: User,
        filter: GeneralFilter,
    ) -> DomainResult<PaginatedList<Product>> {
        let scope = ListScope::products(filter.local_scope());
        let query = filter.into_query(user.id, scope)?;
        self.products.list(query).await
    }

    async fn get_by_id(&self, user: User, id: i64) -> DomainResult<Product> {
        self.require_product(user.id, id).await
    }

    async fn edit(&self, user: User, id: i64, mut input: ProductInput) -> DomainResult<()> {
        input.validate()?;
        let current = self.require_product(user.id, id).await?;
        self.require_local(user.id, input.local_id).await?;

        let mut uploaded = None;
        let image_url = match input.image_base64.take() {
            Some(data) if !data.trim().is_empty() => {
                if shared::validation::is_http_url(&data) {
                    Some(data)
                } else {
                    self.remove_image(current.image_url.clone()).await;
                    uploaded = self.store_image(Some(data)).await?;
                    uploaded.clone()
                }
            }
            _ => current.image_url,
        };

        let record = ProductRecord::from_input(input, image_url);
        if !self.products.edit(user.id, id, record).await? {
            self.remove_image(uploaded).await;
            return Err(DomainError::not_found(format!("product {}", id)));
        }

        tracing::info!(user_id = user.id, product_id = id, "Product updated");
        Ok(())
    }

    async fn delete(&self, user: User, id: i64) -> DomainResult<()> {
        let current = self.require_product(user.id, id).await?;
        self.remove_image(current.image_url).await;
        self.products.soft_delete(user.id, id).await?;

        tracing::info!(user_id = user.id, product_id = id, "Product deleted");
        Ok(())
    }

    async fn set_read(&self, user: User, id: i64) -> DomainResult<()> {
        self.set_flag(&user, id, true).await
    }

    async fn clear_read(&self, user: User, id: i64) -> DomainResult<()> {
        self.set_flag(&user, id, false).await
    }

    async fn list_read(
        &self,
        user: User,
        filter: GeneralFilter,
    ) -> DomainResult<PaginatedList<Product>> {
        let scope = ListScope::read_products(filter.local_scope());
        let query = filter.into_query(user.id, scope)?;
        self.products.list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::ports::{MockFileStorage, MockLocalRepository, MockProductRepository};
    use crate::services::test_support::{product_input, sample_product, user_with_role};
    use mockall::predicate::eq;

    fn service(
        products: MockProductRepository,
        locals: MockLocalRepository,
        files: MockFileStorage,
    ) -> ProductService {
        ProductService::new(Arc::new(products), Arc::new(locals), Arc::new(files))
    }

    #[tokio::test]
    async fn test_create_with_existing_local() {
        let user = user_with_role(Role::Master);
        let owner = user.id;

        let mut locals = MockLocalRepository::new();
        locals
            .expect_exists_active()
            .with(eq(owner), eq(3))
            .times(1)
            .returning(|_, _| Ok(true));

        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .withf(move |o, record, status| {
                *o == owner && record.name == "Front Gate" && *status == StatusCode::Exists
            })
            .times(1)
            .returning(|_, _, _| Ok(41));
        products.expect_set_status_code().times(0);

        let id = service(products, locals, MockFileStorage::new())
            .create(user, product_input())
            .await
            .unwrap();
        assert_eq!(id, 41);
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let user = user_with_role(Role::Flat1);
        let owner = user.id;
        let stored = std::sync::Arc::new(std::sync::Mutex::new(None::<ProductRecord>));

        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(true));

        let mut products = MockProductRepository::new();
        let sink = stored.clone();
        products.expect_create().returning(move |_, record, _| {
            *sink.lock().unwrap() = Some(record);
            Ok(7)
        });
        let source = stored.clone();
        products.expect_get_by_id().returning(move |o, id| {
            let record = source.lock().unwrap().clone().unwrap();
            let mut product = sample_product(o, id);
            product.local_id = record.local_id;
            product.name = record.name;
            product.ip_address = record.ip_address;
            product.port = record.port;
            product.camera_type = record.camera_type;
            Ok(Some(product))
        });

        let svc = service(products, locals, MockFileStorage::new());
        let input = product_input();
        let id = svc.create(user.clone(), input.clone()).await.unwrap();
        let product = svc.get_by_id(user, id).await.unwrap();

        assert_eq!(product.user_id, owner);
        assert_eq!(product.name, input.name);
        assert_eq!(product.local_id, input.local_id);
        assert_eq!(product.ip_address, input.ip_address);
        assert_eq!(product.port, input.port);
        assert_eq!(product.camera_type, input.camera_type);
    }

    #[tokio::test]
    async fn test_create_with_missing_local_writes_nothing() {
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(false));

        let mut products = MockProductRepository::new();
        products.expect_create().times(0);
        products.expect_set_status_code().times(0);

        let mut files = MockFileStorage::new();
        files.expect_save_encoded_image().times(0);

        let mut input = product_input();
        input.image_base64 = Some("aGVsbG8=".into());
        let err = service(products, locals, files)
            .create(user_with_role(Role::Master), input)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().times(0);
        let mut products = MockProductRepository::new();
        products.expect_create().times(0);

        let mut input = product_input();
        input.port = 70000;
        let err = service(products, locals, MockFileStorage::new())
            .create(user_with_role(Role::Master), input)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_create_stores_uploaded_image() {
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(true));

        let mut files = MockFileStorage::new();
        files
            .expect_save_encoded_image()
            .withf(|data, hint| data == "aGVsbG8=" && hint.starts_with("images/products/"))
            .times(1)
            .returning(|_, hint| Ok(format!("http://localhost/files/{}", hint)));

        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .withf(|_, record, _| {
                record
                    .image_url
                    .as_deref()
                    .is_some_and(|u| u.starts_with("http://localhost/files/images/products/"))
            })
            .returning(|_, _, _| Ok(1));

        let mut input = product_input();
        input.image_base64 = Some("aGVsbG8=".into());
        service(products, locals, files)
            .create(user_with_role(Role::Master), input)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_keeps_image_url() {
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(true));
        let mut files = MockFileStorage::new();
        files.expect_save_encoded_image().times(0);

        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .withf(|_, record, _| record.image_url.as_deref() == Some("https://cdn.example.com/a.png"))
            .returning(|_, _, _| Ok(1));

        let mut input = product_input();
        input.image_base64 = Some("https://cdn.example.com/a.png".into());
        service(products, locals, files)
            .create(user_with_role(Role::Master), input)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_edit_with_missing_local() {
        let user = user_with_role(Role::Master);
        let mut products = MockProductRepository::new();
        products
            .expect_get_by_id()
            .returning(|o, id| Ok(Some(sample_product(o, id))));
        products.expect_edit().times(0);
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(false));

        let err = service(products, locals, MockFileStorage::new())
            .edit(user, 5, product_input())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_edit_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().returning(|_, _| Ok(None));
        products.expect_edit().times(0);

        let err = service(products, MockLocalRepository::new(), MockFileStorage::new())
            .edit(user_with_role(Role::Master), 5, product_input())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_edit_replaces_image() {
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().returning(|o, id| {
            let mut p = sample_product(o, id);
            p.image_url = Some("http://localhost/files/images/products/old".into());
            Ok(Some(p))
        });
        products
            .expect_edit()
            .withf(|_, id, record| *id == 5 && record.image_url.as_deref() == Some("new-url"))
            .times(1)
            .returning(|_, _, _| Ok(true));
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(true));
        let mut files = MockFileStorage::new();
        files
            .expect_delete()
            .with(eq("http://localhost/files/images/products/old".to_string()))
            .times(1)
            .returning(|_| Ok(()));
        files
            .expect_save_encoded_image()
            .times(1)
            .returning(|_, _| Ok("new-url".into()));

        let mut input = product_input();
        input.image_base64 = Some("aGVsbG8=".into());
        service(products, locals, files)
            .edit(user_with_role(Role::Master), 5, input)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_edit_without_image_keeps_current() {
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().returning(|o, id| {
            let mut p = sample_product(o, id);
            p.image_url = Some("kept".into());
            Ok(Some(p))
        });
        products
            .expect_edit()
            .withf(|_, _, record| record.image_url.as_deref() == Some("kept"))
            .times(1)
            .returning(|_, _, _| Ok(true));
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(true));
        let mut files = MockFileStorage::new();
        files.expect_delete().times(0);

        service(products, locals, files)
            .edit(user_with_role(Role::Master), 5, product_input())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_create_removes_uploaded_image() {
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(true));

        let mut files = MockFileStorage::new();
        files
            .expect_save_encoded_image()
            .times(1)
            .returning(|_, _| Ok("http://localhost/files/images/products/fresh.png".into()));
        files
            .expect_delete()
            .with(eq("http://localhost/files/images/products/fresh.png".to_string()))
            .times(1)
            .returning(|_| Ok(()));

        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .times(1)
            .returning(|_, _, _| Err(DomainError::unexpected("storage failure")));
        products.expect_set_status_code().times(0);

        let mut input = product_input();
        input.image_base64 = Some("aGVsbG8=".into());
        let err = service(products, locals, files)
            .create(user_with_role(Role::Master), input)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_failed_create_keeps_external_image() {
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(true));
        let mut files = MockFileStorage::new();
        files.expect_delete().times(0);
        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .returning(|_, _, _| Err(DomainError::unexpected("storage failure")));

        let mut input = product_input();
        input.image_base64 = Some("https://cdn.example.com/a.png".into());
        assert!(service(products, locals, files)
            .create(user_with_role(Role::Master), input)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_edit_of_row_deleted_meanwhile_is_not_found() {
        let mut products = MockProductRepository::new();
        products
            .expect_get_by_id()
            .returning(|o, id| Ok(Some(sample_product(o, id))));
        products.expect_edit().times(1).returning(|_, _, _| Ok(false));
        let mut locals = MockLocalRepository::new();
        locals.expect_exists_active().returning(|_, _| Ok(true));

        let err = service(products, locals, MockFileStorage::new())
            .edit(user_with_role(Role::Master), 5, product_input())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let deleted = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));

        let mut products = MockProductRepository::new();
        let seen = deleted.clone();
        products.expect_get_by_id().returning(move |o, id| {
            if seen.load(std::sync::atomic::Ordering::SeqCst) {
                Ok(None)
            } else {
                Ok(Some(sample_product(o, id)))
            }
        });
        let mark = deleted.clone();
        products
            .expect_soft_delete()
            .times(1)
            .returning(move |_, _| {
                mark.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            });

        let svc = service(products, MockLocalRepository::new(), MockFileStorage::new());
        let user = user_with_role(Role::Flat2);
        svc.delete(user.clone(), 9).await.unwrap();

        for _ in 0..2 {
            let err = svc.delete(user.clone(), 9).await.unwrap_err();
            assert!(matches!(err, DomainError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_delete_removes_image_first() {
        let mut seq = mockall::Sequence::new();
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().returning(|o, id| {
            let mut p = sample_product(o, id);
            p.image_url = Some("img".into());
            Ok(Some(p))
        });
        let mut files = MockFileStorage::new();
        files
            .expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DomainError::unexpected("disk")));
        products
            .expect_soft_delete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        service(products, MockLocalRepository::new(), files)
            .delete(user_with_role(Role::Master), 2)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_by_id_rejects_non_positive() {
        let mut products = MockProductRepository::new();
        products.expect_get_by_id().times(0);
        let err = service(products, MockLocalRepository::new(), MockFileStorage::new())
            .get_by_id(user_with_role(Role::Master), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_list_rejects_page_without_limit() {
        let mut products = MockProductRepository::new();
        products.expect_list().times(0);
        let filter = GeneralFilter {
            page: 2,
            ..Default::default()
        };
        let err = service(products, MockLocalRepository::new(), MockFileStorage::new())
            .list(user_with_role(Role::Master), filter)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_list_passes_owner_and_scope() {
        let user = user_with_role(Role::Master);
        let owner = user.id;
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .withf(move |q| {
                q.owner_id == owner
                    && q.scope == ListScope::products(Some(4))
                    && q.limit == Some(10)
                    && q.offset == 30
            })
            .times(1)
            .returning(|q| Ok(PaginatedList::new(Vec::new(), 25, q.limit)));

        let filter = GeneralFilter {
            page: 4,
            limit: 10,
            id_local: Some(4),
            ..Default::default()
        };
        let list = service(products, MockLocalRepository::new(), MockFileStorage::new())
            .list(user, filter)
            .await
            .unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.total_count, 25);
        assert_eq!(list.page, 3);
    }

    #[tokio::test]
    async fn test_list_read_scopes_to_flag() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .withf(|q| q.scope.parameter_only && q.limit.is_none())
            .times(1)
            .returning(|q| Ok(PaginatedList::new(Vec::new(), 0, q.limit)));

        service(products, MockLocalRepository::new(), MockFileStorage::new())
            .list_read(user_with_role(Role::Master), GeneralFilter::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_and_clear_read_flag() {
        let mut products = MockProductRepository::new();
        products
            .expect_set_parameter_flag()
            .with(eq(1), eq(3), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(true));
        products
            .expect_set_parameter_flag()
            .with(eq(1), eq(3), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(true));
        products
            .expect_set_parameter_flag()
            .with(eq(1), eq(99), eq(true))
            .returning(|_, _, _| Ok(false));

        let mut user = user_with_role(Role::Master);
        user.id = 1;
        let svc = service(products, MockLocalRepository::new(), MockFileStorage::new());
        svc.set_read(user.clone(), 3).await.unwrap();
        svc.clear_read(user.clone(), 3).await.unwrap();
        let err = svc.set_read(user, 99).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_storage_failure_is_passed_through() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .returning(|_| Err(DomainError::unexpected("database error")));
        let err = service(products, MockLocalRepository::new(), MockFileStorage::new())
            .list(user_with_role(Role::Master), GeneralFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unexpected(_)));
    }
}
