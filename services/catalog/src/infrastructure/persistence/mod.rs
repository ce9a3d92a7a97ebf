//! 持久化实现

mod postgres;

pub use postgres::*;

/// 内嵌的数据库迁移，启动时对商品库执行
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrator_embeds_products_migration() {
        let descriptions: Vec<_> = MIGRATOR.iter().map(|m| m.description.as_ref()).collect();
        assert!(descriptions.contains(&"products"));
    }
}
