//! `SeaORM` entity definitions.

pub mod audit_logs;
pub mod businesses;
pub mod categories;
pub mod memberships;
pub mod sea_orm_active_enums;
pub mod settlements;
pub mod transactions;
pub mod users;
