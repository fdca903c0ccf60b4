use serde::Serialize;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedAdmin, check_role};
use crate::domain::category::Category;
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{CategoryForm, ProductForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CategoryReader, CategoryWriter, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Data for the storefront landing page.
#[derive(Debug, Serialize)]
pub struct StorefrontIndex {
    pub featured: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Storefront catalog filters.
#[derive(Debug, Default, Clone)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub page: Option<usize>,
}

/// Back-office product list filters.
#[derive(Debug, Default, Clone)]
pub struct AdminProductQuery {
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub low_stock_only: bool,
    pub page: Option<usize>,
}

fn apply_common_filters(mut query: ProductListQuery, search: Option<String>, category_id: Option<i32>) -> ProductListQuery {
    if let Some(term) = search.filter(|term| !term.trim().is_empty()) {
        query = query.search(term.trim());
    }
    if let Some(category_id) = category_id {
        query = query.category(category_id);
    }
    query
}

/// Featured products and live categories for the landing page.
pub fn load_storefront_index<R>(repo: &R) -> ServiceResult<StorefrontIndex>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let (_, featured) = repo.list_products(
        ProductListQuery::new()
            .active_only()
            .featured_only()
            .paginate(1, DEFAULT_ITEMS_PER_PAGE),
    )?;
    let categories = repo.list_categories(false)?;

    Ok(StorefrontIndex {
        featured,
        categories,
    })
}

/// Paginated storefront catalog, active products only.
pub fn browse_catalog<R>(repo: &R, query: CatalogQuery) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader + ?Sized,
{
    let page = query.page.unwrap_or(1);
    let list_query = apply_common_filters(
        ProductListQuery::new().active_only(),
        query.search,
        query.category_id,
    )
    .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, products) = repo.list_products(list_query)?;
    Ok(Paginated::new(
        products,
        page,
        total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
    ))
}

/// A single product page; inactive products are hidden from the storefront.
pub fn view_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)?
        .filter(|product| product.is_active)
        .ok_or(ServiceError::NotFound)
}

/// Back-office product list, including inactive products.
pub fn list_products<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    query: AdminProductQuery,
) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let mut list_query =
        apply_common_filters(ProductListQuery::new(), query.search, query.category_id);
    if query.low_stock_only {
        list_query = list_query.low_stock_only();
    }
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, products) = repo.list_products(list_query)?;
    Ok(Paginated::new(
        products,
        page,
        total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
    ))
}

pub fn load_product<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_product_by_id(product_id)?
        .ok_or(ServiceError::NotFound)
}

/// Create a product; any opening stock is booked through the ledger by the
/// repository.
pub fn create_product<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    mut form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    form.sanitize();
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let new_product = form.into_new_product().map_err(ServiceError::Form)?;

    let product = repo.create_product(&new_product)?;
    log::info!("product {} ({}) created by {}", product.id, product.sku, admin.email);
    Ok(product)
}

pub fn update_product<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    product_id: i32,
    mut form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    form.sanitize();
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let updates = form.into_update().map_err(ServiceError::Form)?;

    Ok(repo.update_product(product_id, &updates)?)
}

pub fn delete_product<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_product(product_id)?;
    log::info!("product {} deleted by {}", product_id, admin.email);
    Ok(())
}

pub fn list_categories<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    include_archived: bool,
) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.list_categories(include_archived)?)
}

pub fn create_category<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    mut form: CategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    form.sanitize();
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_category(&form.into_new_category())?)
}

pub fn update_category<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    category_id: i32,
    mut form: CategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    form.sanitize();
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.update_category(category_id, &form.into_update())?)
}

/// Delete a category; the repository detaches its products first.
pub fn delete_category<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    category_id: i32,
) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_category(category_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repository::mock::{MockProductReader, MockProductWriter};

    fn admin() -> AuthenticatedAdmin {
        AuthenticatedAdmin {
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        }
    }

    fn visitor() -> AuthenticatedAdmin {
        AuthenticatedAdmin {
            email: "visitor@example.com".to_string(),
            name: "Visitor".to_string(),
            roles: Vec::new(),
        }
    }

    fn product(id: i32, active: bool) -> Product {
        let now = chrono::Local::now().naive_utc();
        Product {
            id,
            sku: format!("SKU-{id}"),
            name: "Rice".to_string(),
            description: None,
            price_cents: 800,
            discount_price_cents: None,
            stock_quantity: 10,
            min_stock: 2,
            category_id: None,
            is_active: active,
            is_featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn product_form() -> ProductForm {
        ProductForm {
            sku: "RICE-5KG".to_string(),
            name: "Basmati Rice".to_string(),
            description: None,
            price: "12.50".to_string(),
            discount_price: None,
            stock_quantity: 40,
            min_stock: 5,
            category_id: None,
            is_active: true,
            is_featured: false,
        }
    }

    #[test]
    fn storefront_hides_inactive_products() {
        let mut repo = MockProductReader::new();
        repo.expect_get_product_by_id()
            .returning(|id| Ok(Some(product(id, false))));

        let result = view_product(&repo, 1);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn browse_catalog_requests_active_products_only() {
        let mut repo = MockProductReader::new();
        repo.expect_list_products()
            .withf(|query| {
                query.active_only
                    && !query.low_stock_only
                    && query.search.as_deref() == Some("rice")
            })
            .times(1)
            .returning(|_| Ok((1, vec![product(1, true)])));

        let page = browse_catalog(
            &repo,
            CatalogQuery {
                search: Some("  rice ".to_string()),
                category_id: None,
                page: None,
            },
        )
        .expect("catalog loads");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn admin_list_supports_the_low_stock_filter() {
        let mut repo = MockProductReader::new();
        repo.expect_list_products()
            .withf(|query| query.low_stock_only && !query.active_only)
            .times(1)
            .returning(|_| Ok((0, Vec::new())));

        let query = AdminProductQuery {
            low_stock_only: true,
            ..AdminProductQuery::default()
        };
        list_products(&repo, &admin(), query).expect("list loads");
    }

    #[test]
    fn create_product_requires_the_admin_role() {
        let mut repo = MockProductWriter::new();
        repo.expect_create_product().times(0);

        let result = create_product(&repo, &visitor(), product_form());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn create_product_converts_the_form_and_inserts() {
        let mut repo = MockProductWriter::new();
        repo.expect_create_product()
            .withf(|new_product| {
                new_product.sku == "RICE-5KG"
                    && new_product.price_cents == 1250
                    && new_product.stock_quantity == 40
            })
            .times(1)
            .returning(|_| Ok(product(1, true)));

        create_product(&repo, &admin(), product_form()).expect("create succeeds");
    }

    #[test]
    fn create_product_rejects_bad_prices() {
        let mut repo = MockProductWriter::new();
        repo.expect_create_product().times(0);

        let mut form = product_form();
        form.price = "cheap".to_string();
        let result = create_product(&repo, &admin(), form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
