pub use sea_orm_migration::prelude::*;

mod m20240311_101500_create_admin_table;
mod m20240311_103042_create_donation_table;
mod m20240318_091210_create_session_table;
mod m20240402_120335_create_audit_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240311_101500_create_admin_table::Migration),
            Box::new(m20240311_103042_create_donation_table::Migration),
            Box::new(m20240318_091210_create_session_table::Migration),
            Box::new(m20240402_120335_create_audit_log_table::Migration),
        ]
    }
}
