use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub discount_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub min_stock: i32,
    pub category_id: Option<i32>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub sku: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub discount_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub min_stock: i32,
    pub category_id: Option<i32>,
    pub is_active: bool,
    pub is_featured: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub sku: Option<&'a str>,
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub price_cents: Option<i64>,
    pub discount_price_cents: Option<Option<i64>>,
    pub min_stock: Option<i32>,
    pub category_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            sku: value.sku,
            name: value.name,
            description: value.description,
            price_cents: value.price_cents,
            discount_price_cents: value.discount_price_cents,
            stock_quantity: value.stock_quantity,
            min_stock: value.min_stock,
            category_id: value.category_id,
            is_active: value.is_active,
            is_featured: value.is_featured,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            sku: value.sku.as_str(),
            name: value.name.as_str(),
            description: value.description.as_deref(),
            price_cents: value.price_cents,
            discount_price_cents: value.discount_price_cents,
            stock_quantity: value.stock_quantity,
            min_stock: value.min_stock,
            category_id: value.category_id,
            is_active: value.is_active,
            is_featured: value.is_featured,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            sku: value.sku.as_deref(),
            name: value.name.as_deref(),
            description: value
                .description
                .as_ref()
                .map(|inner| inner.as_ref().map(String::as_str)),
            price_cents: value.price_cents,
            discount_price_cents: value.discount_price_cents,
            min_stock: value.min_stock,
            category_id: value.category_id,
            is_active: value.is_active,
            is_featured: value.is_featured,
            updated_at: value.updated_at,
        }
    }
}
