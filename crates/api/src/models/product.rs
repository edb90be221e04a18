//! Products, their images, and specification tables.

use chrono::{DateTime, Utc};
use gearshop_core::{
    BrandId, CategoryId, ProductId, ProductImageId, SpecificationId, Vnd,
    pcbuild::ComponentKind,
};
use serde::{Deserialize, Serialize};

/// A product as shown in listings. Images and specifications are loaded
/// separately for the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub product_code: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub brand_id: Option<BrandId>,
    pub brand_name: Option<String>,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub component_kind: Option<ComponentKind>,
    pub price: Vnd,
    pub original_price: Option<Vnd>,
    pub stock: i32,
    pub sold: i32,
    pub is_active: bool,
    pub primary_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub url: String,
    pub alt: Option<String>,
    pub sort_order: i32,
    pub is_primary: bool,
}

/// A name/value specification row ("Socket" => "LGA1700").
#[derive(Debug, Clone, Serialize)]
pub struct Specification {
    pub id: SpecificationId,
    pub name: String,
    pub value: String,
    pub sort_order: i32,
}

/// Full detail view served by `GET /api/products/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub specifications: Vec<Specification>,
}

/// Listing filters for `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring match on name or product code.
    pub q: Option<String>,
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub component_kind: Option<ComponentKind>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub in_stock: Option<bool>,
    pub sort: Option<ProductSort>,
}

/// Listing sort orders.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    Newest,
    PriceAsc,
    PriceDesc,
    BestSelling,
}

impl ProductSort {
    /// SQL `ORDER BY` expression for this sort.
    #[must_use]
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::Newest => "p.created_at DESC",
            Self::PriceAsc => "p.price ASC",
            Self::PriceDesc => "p.price DESC",
            Self::BestSelling => "p.sold DESC",
        }
    }
}

/// One spec row in a create/update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecificationInput {
    pub name: String,
    pub value: String,
}

/// One image in a create/update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    pub url: String,
    pub alt: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Admin create payload.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product_code: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub brand_id: Option<BrandId>,
    pub category_id: Option<CategoryId>,
    pub component_kind: Option<ComponentKind>,
    pub price: i64,
    pub original_price: Option<i64>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub images: Vec<ImageInput>,
    #[serde(default)]
    pub specifications: Vec<SpecificationInput>,
}

/// Admin update payload. Absent fields are left unchanged; `images` and
/// `specifications`, when present, replace the existing sets wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub brand_id: Option<Option<BrandId>>,
    pub category_id: Option<Option<CategoryId>>,
    pub component_kind: Option<Option<ComponentKind>>,
    pub price: Option<i64>,
    pub original_price: Option<Option<i64>>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    pub images: Option<Vec<ImageInput>>,
    pub specifications: Option<Vec<SpecificationInput>>,
}
