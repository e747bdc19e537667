pub use sea_orm_migration::prelude::*;

mod m20250101_000001_init;
mod m20250109_000001_generation_guard;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_init::Migration),
            Box::new(m20250109_000001_generation_guard::Migration),
        ]
    }
}
