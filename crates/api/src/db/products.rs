//! Product repository.
//!
//! Products are soft-deleted (`deleted_at`) so order history keeps valid
//! references. Every query here excludes deleted rows.

use chrono::{DateTime, Utc};
use gearshop_core::{
    BrandId, CategoryId, ProductId, ProductImageId, SpecificationId, Vnd, messages,
    pcbuild::ComponentKind,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{RepositoryError, Result};
use crate::models::product::{
    CreateProductRequest, Product, ProductDetail, ProductFilter, ProductImage, ProductSort,
    Specification, UpdateProductRequest,
};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    product_code: String,
    name: String,
    slug: String,
    description: Option<String>,
    brand_id: Option<BrandId>,
    brand_name: Option<String>,
    category_id: Option<CategoryId>,
    category_name: Option<String>,
    component_kind: Option<String>,
    price: Vnd,
    original_price: Option<Vnd>,
    stock: i32,
    sold: i32,
    is_active: bool,
    primary_image: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Product> {
        let component_kind = row
            .component_kind
            .as_deref()
            .map(str::parse::<ComponentKind>)
            .transpose()
            .map_err(RepositoryError::DataCorruption)?;
        Ok(Product {
            id: row.id,
            product_code: row.product_code,
            name: row.name,
            slug: row.slug,
            description: row.description,
            brand_id: row.brand_id,
            brand_name: row.brand_name,
            category_id: row.category_id,
            category_name: row.category_name,
            component_kind,
            price: row.price,
            original_price: row.original_price,
            stock: row.stock,
            sold: row.sold,
            is_active: row.is_active,
            primary_image: row.primary_image,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: ProductImageId,
    url: String,
    alt: Option<String>,
    sort_order: i32,
    is_primary: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct SpecRow {
    id: SpecificationId,
    name: String,
    value: String,
    sort_order: i32,
}

/// Select list shared by every product query. Joins the brand and
/// category names and picks the primary image in a lateral-free subquery.
const SELECT: &str = "SELECT p.id, p.product_code, p.name, p.slug, p.description,
        p.brand_id, b.name AS brand_name,
        p.category_id, c.name AS category_name,
        p.component_kind, p.price, p.original_price, p.stock, p.sold,
        p.is_active,
        (SELECT i.url FROM product_images i
          WHERE i.product_id = p.id
          ORDER BY i.is_primary DESC, i.sort_order, i.id
          LIMIT 1) AS primary_image,
        p.created_at
   FROM products p
   LEFT JOIN brands b ON b.id = p.brand_id
   LEFT JOIN categories c ON c.id = p.category_id";

pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products with filters, pagination, and the total match count.
    ///
    /// `category_ids`, when non-empty, is the pre-expanded subtree of the
    /// filter's category. `storefront` hides inactive products.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        category_ids: &[CategoryId],
        storefront: bool,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Product>, i64)> {
        fn push_conditions<'q>(
            qb: &mut QueryBuilder<'q, Postgres>,
            filter: &'q ProductFilter,
            category_ids: &'q [CategoryId],
            storefront: bool,
        ) {
            qb.push(" WHERE p.deleted_at IS NULL");
            if storefront {
                qb.push(" AND p.is_active");
            }
            if let Some(q) = filter.q.as_deref().filter(|q| !q.trim().is_empty()) {
                let pattern = format!("%{}%", q.trim());
                qb.push(" AND (p.name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR p.product_code ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
            if !category_ids.is_empty() {
                let ids: Vec<i32> = category_ids.iter().map(|c| c.as_i32()).collect();
                qb.push(" AND p.category_id = ANY(")
                    .push_bind(ids)
                    .push(")");
            }
            if let Some(brand_id) = filter.brand_id {
                qb.push(" AND p.brand_id = ").push_bind(brand_id);
            }
            if let Some(kind) = filter.component_kind {
                qb.push(" AND p.component_kind = ").push_bind(kind.as_str());
            }
            if let Some(min) = filter.min_price {
                qb.push(" AND p.price >= ").push_bind(min);
            }
            if let Some(max) = filter.max_price {
                qb.push(" AND p.price <= ").push_bind(max);
            }
            if filter.in_stock == Some(true) {
                qb.push(" AND p.stock > 0");
            }
        }

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM products p");
        push_conditions(&mut count_qb, filter, category_ids, storefront);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT);
        push_conditions(&mut qb, filter, category_ids, storefront);
        qb.push(" ORDER BY ")
            .push(filter.sort.unwrap_or(ProductSort::Newest).order_by())
            .push(", p.id DESC")
            .push(" LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind((page - 1) * per_page);

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(self.pool).await?;
        let products = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok((products, total))
    }

    pub async fn find(&self, id: ProductId) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT} WHERE p.id = $1 AND p.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;
        row.try_into()
    }

    /// Like [`Self::find`] but absence is not an error. Cart validation
    /// treats missing rows as lines to drop, not failures.
    pub async fn find_opt(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT} WHERE p.id = $1 AND p.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        row.map(Product::try_from).transpose()
    }

    /// Full detail view with images and specifications.
    pub async fn find_detail(&self, id: ProductId) -> Result<ProductDetail> {
        let product = self.find(id).await?;
        let images = self.images(id).await?;
        let specifications = self.specifications(id).await?;
        Ok(ProductDetail {
            product,
            images,
            specifications,
        })
    }

    async fn images(&self, id: ProductId) -> Result<Vec<ProductImage>> {
        let rows = sqlx::query_as::<_, ImageRow>(
            "SELECT id, url, alt, sort_order, is_primary
             FROM product_images
             WHERE product_id = $1
             ORDER BY is_primary DESC, sort_order, id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| ProductImage {
                id: r.id,
                url: r.url,
                alt: r.alt,
                sort_order: r.sort_order,
                is_primary: r.is_primary,
            })
            .collect())
    }

    pub async fn specifications(&self, id: ProductId) -> Result<Vec<Specification>> {
        let rows = sqlx::query_as::<_, SpecRow>(
            "SELECT id, name, value, sort_order
             FROM product_specifications
             WHERE product_id = $1
             ORDER BY sort_order, id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| Specification {
                id: r.id,
                name: r.name,
                value: r.value,
                sort_order: r.sort_order,
            })
            .collect())
    }

    /// Active products from the same category, excluding the product
    /// itself. Best sellers first.
    pub async fn related(&self, id: ProductId, limit: i64) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT}
             WHERE p.deleted_at IS NULL AND p.is_active AND p.id <> $1
               AND p.category_id = (SELECT category_id FROM products WHERE id = $1)
               AND p.category_id IS NOT NULL
             ORDER BY p.sold DESC, p.id DESC
             LIMIT $2"
        ))
        .bind(id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    pub async fn create(&self, req: &CreateProductRequest) -> Result<ProductDetail> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "WITH inserted AS (
                INSERT INTO products
                    (product_code, name, slug, description, brand_id, category_id,
                     component_kind, price, original_price, stock)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
             )
             {}",
            SELECT.replace("FROM products p", "FROM inserted p")
        ))
        .bind(&req.product_code)
        .bind(&req.name)
        .bind(&req.slug)
        .bind(&req.description)
        .bind(req.brand_id)
        .bind(req.category_id)
        .bind(req.component_kind.map(ComponentKind::as_str))
        .bind(req.price)
        .bind(req.original_price)
        .bind(req.stock)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            RepositoryError::conflict_on_unique(
                e,
                "products_product_code_key",
                messages::PRODUCT_CODE_TAKEN,
            )
        })
        .map_err(|e| match e {
            RepositoryError::Database(inner) => RepositoryError::conflict_on_unique(
                inner,
                "products_slug_key",
                messages::SLUG_TAKEN,
            ),
            other => other,
        })?;
        let id = row.id;

        Self::replace_images(&mut tx, id, &req.images).await?;
        Self::replace_specifications(&mut tx, id, &req.specifications).await?;
        tx.commit().await?;

        self.find_detail(id).await
    }

    pub async fn update(&self, id: ProductId, req: &UpdateProductRequest) -> Result<ProductDetail> {
        let mut tx = self.pool.begin().await?;

        // Double-option fields distinguish "set NULL" from "leave alone".
        let (set_brand, brand) = unpack(req.brand_id);
        let (set_category, category) = unpack(req.category_id);
        let (set_kind, kind) = unpack(req.component_kind);
        let (set_orig, orig) = unpack(req.original_price);

        let result = sqlx::query(
            "UPDATE products SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                brand_id = CASE WHEN $5 THEN $6 ELSE brand_id END,
                category_id = CASE WHEN $7 THEN $8 ELSE category_id END,
                component_kind = CASE WHEN $9 THEN $10 ELSE component_kind END,
                price = COALESCE($11, price),
                original_price = CASE WHEN $12 THEN $13 ELSE original_price END,
                stock = COALESCE($14, stock),
                is_active = COALESCE($15, is_active),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.slug)
        .bind(&req.description)
        .bind(set_brand)
        .bind(brand)
        .bind(set_category)
        .bind(category)
        .bind(set_kind)
        .bind(kind.map(ComponentKind::as_str))
        .bind(req.price)
        .bind(set_orig)
        .bind(orig)
        .bind(req.stock)
        .bind(req.is_active)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            RepositoryError::conflict_on_unique(e, "products_slug_key", messages::SLUG_TAKEN)
        })?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        if let Some(images) = &req.images {
            sqlx::query("DELETE FROM product_images WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::replace_images(&mut tx, id, images).await?;
        }
        if let Some(specs) = &req.specifications {
            sqlx::query("DELETE FROM product_specifications WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::replace_specifications(&mut tx, id, specs).await?;
        }
        tx.commit().await?;

        self.find_detail(id).await
    }

    /// Soft-delete: the row stays for order history but leaves every
    /// listing and lookup.
    pub async fn soft_delete(&self, id: ProductId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW(), is_active = FALSE
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Append one image. New images sort after the existing set.
    pub async fn add_image(
        &self,
        id: ProductId,
        image: &crate::models::product::ImageInput,
    ) -> Result<ProductImage> {
        // Verify the product exists and is not deleted first.
        self.find(id).await?;

        let row = sqlx::query_as::<_, ImageRow>(
            "INSERT INTO product_images (product_id, url, alt, sort_order, is_primary)
             VALUES ($1, $2, $3,
                     COALESCE((SELECT MAX(sort_order) + 1 FROM product_images
                                WHERE product_id = $1), 0),
                     $4)
             RETURNING id, url, alt, sort_order, is_primary",
        )
        .bind(id)
        .bind(&image.url)
        .bind(&image.alt)
        .bind(image.is_primary)
        .fetch_one(self.pool)
        .await?;
        Ok(ProductImage {
            id: row.id,
            url: row.url,
            alt: row.alt,
            sort_order: row.sort_order,
            is_primary: row.is_primary,
        })
    }

    pub async fn delete_image(&self, id: ProductId, image_id: ProductImageId) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM product_images WHERE id = $1 AND product_id = $2")
                .bind(image_id)
                .bind(id)
                .execute(self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Replace the whole specification set.
    pub async fn replace_specification_set(
        &self,
        id: ProductId,
        specs: &[crate::models::product::SpecificationInput],
    ) -> Result<Vec<Specification>> {
        self.find(id).await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM product_specifications WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::replace_specifications(&mut tx, id, specs).await?;
        tx.commit().await?;

        self.specifications(id).await
    }

    async fn replace_images(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: ProductId,
        images: &[crate::models::product::ImageInput],
    ) -> Result<()> {
        for (i, image) in images.iter().enumerate() {
            sqlx::query(
                "INSERT INTO product_images (product_id, url, alt, sort_order, is_primary)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(&image.url)
            .bind(&image.alt)
            .bind(i32::try_from(i).unwrap_or(i32::MAX))
            .bind(image.is_primary)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn replace_specifications(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: ProductId,
        specs: &[crate::models::product::SpecificationInput],
    ) -> Result<()> {
        for (i, spec) in specs.iter().enumerate() {
            sqlx::query(
                "INSERT INTO product_specifications (product_id, name, value, sort_order)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(&spec.name)
            .bind(&spec.value)
            .bind(i32::try_from(i).unwrap_or(i32::MAX))
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

/// Split a double-option update field into (apply, value).
const fn unpack<T: Copy>(field: Option<Option<T>>) -> (bool, Option<T>) {
    match field {
        Some(value) => (true, value),
        None => (false, None),
    }
}
