//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_posts_table;
mod m20250101_000002_create_comments_table;
mod m20250101_000003_create_post_ratings_table;
mod m20250101_000004_create_site_ratings_table;
mod m20250101_000005_create_like_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_posts_table::Migration),
            Box::new(m20250101_000002_create_comments_table::Migration),
            Box::new(m20250101_000003_create_post_ratings_table::Migration),
            Box::new(m20250101_000004_create_site_ratings_table::Migration),
            Box::new(m20250101_000005_create_like_tables::Migration),
        ]
    }
}
