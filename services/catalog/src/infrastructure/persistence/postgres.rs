//! PostgreSQL 商品仓储实现

use async_trait::async_trait;
use mesa_common::{ProductId, Timestamps};
use mesa_errors::{AppError, AppResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{NewProduct, Product};
use crate::domain::repositories::ProductRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, description, category, food_type, ready_time,
           price, rating, images, is_special, created_at, updated_at
    FROM products
"#;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, fields: NewProduct) -> AppResult<Product> {
        // 校验在写入之前，失败时不触达数据库
        let product = Product::create(fields)?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, category, food_type, ready_time,
                                  price, rating, images, is_special, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.food_type)
        .bind(product.ready_time)
        .bind(product.price)
        .bind(product.rating)
        .bind(&product.images)
        .bind(product.is_special)
        .bind(product.timestamps.created_at)
        .bind(product.timestamps.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create product: {}", e)))?;

        Ok(product)
    }

    async fn find_all(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{} ORDER BY created_at", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list products: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into_product()).collect())
    }

    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to find product: {}", e)))?;

        Ok(row.map(|r| r.into_product()))
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{} WHERE category = $1 ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find products by category: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into_product()).collect())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> AppResult<Vec<Product>> {
        let raw_ids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{} WHERE id = ANY($1) ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find selected products: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into_product()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    category: Option<String>,
    food_type: String,
    ready_time: Option<i32>,
    price: Option<f64>,
    rating: Option<f64>,
    images: Vec<String>,
    is_special: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            category: self.category,
            food_type: self.food_type,
            ready_time: self.ready_time,
            price: self.price,
            rating: self.rating,
            images: self.images,
            is_special: self.is_special,
            timestamps: Timestamps {
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}
