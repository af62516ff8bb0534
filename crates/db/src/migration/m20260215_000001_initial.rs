//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and triggers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: IDENTITY TABLES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(BUSINESSES_SQL).await?;
        db.execute_unprepared(MEMBERSHIPS_SQL).await?;

        // ============================================================
        // PART 3: BOOKKEEPING TABLES
        // ============================================================
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(SETTLEMENTS_SQL).await?;

        // ============================================================
        // PART 4: AUDIT TRAIL
        // ============================================================
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Member roles (strict total rank: owner > co-owner > admin > accountant > employee)
CREATE TYPE member_role AS ENUM (
    'owner',
    'co-owner',
    'admin',
    'accountant',
    'employee'
);

-- Transaction kinds
CREATE TYPE transaction_kind AS ENUM (
    'expense',
    'income'
);

-- Settlement directions
CREATE TYPE settlement_direction AS ENUM (
    'business_to_member',
    'member_to_business'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    full_name TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const BUSINESSES_SQL: &str = r"
CREATE TABLE businesses (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MEMBERSHIPS_SQL: &str = r"
CREATE TABLE memberships (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses(id),
    user_id UUID NOT NULL REFERENCES users(id),
    role member_role NOT NULL DEFAULT 'employee',
    permission_overrides JSONB NOT NULL DEFAULT '{}',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, user_id)
);

CREATE INDEX idx_memberships_business ON memberships(business_id) WHERE is_active;
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses(id),
    name TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (business_id, name)
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses(id),
    kind transaction_kind NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount >= 0),
    category_id UUID REFERENCES categories(id),
    attributed_to UUID REFERENCES memberships(id),
    note TEXT,
    transaction_date DATE NOT NULL,
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Balance aggregates filter on (business, attribution, kind) over live rows
CREATE INDEX idx_transactions_attribution
    ON transactions(business_id, attributed_to, kind)
    WHERE NOT is_deleted;

CREATE INDEX idx_transactions_date
    ON transactions(business_id, transaction_date)
    WHERE NOT is_deleted;
";

const SETTLEMENTS_SQL: &str = r"
CREATE TABLE settlements (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses(id),
    membership_id UUID NOT NULL REFERENCES memberships(id),
    direction settlement_direction NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    note TEXT,
    settlement_date DATE NOT NULL,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_settlements_member
    ON settlements(business_id, membership_id, direction);
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY,
    business_id UUID NOT NULL REFERENCES businesses(id),
    action TEXT NOT NULL,
    entity_type TEXT NOT NULL,
    entity_id UUID NOT NULL,
    changes JSONB NOT NULL DEFAULT '{}',
    metadata JSONB NOT NULL DEFAULT '{}',
    actor_id UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_logs_business_created
    ON audit_logs(business_id, created_at DESC);

CREATE INDEX idx_audit_logs_entity
    ON audit_logs(business_id, entity_type, entity_id, created_at DESC);

-- Append-only: reject updates and deletes at the database level
CREATE OR REPLACE FUNCTION audit_logs_immutable() RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'audit_logs is append-only';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_audit_logs_immutable
    BEFORE UPDATE OR DELETE ON audit_logs
    FOR EACH ROW EXECUTE FUNCTION audit_logs_immutable();
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_businesses_updated_at
    BEFORE UPDATE ON businesses
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_memberships_updated_at
    BEFORE UPDATE ON memberships
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_categories_updated_at
    BEFORE UPDATE ON categories
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_transactions_updated_at
    BEFORE UPDATE ON transactions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_logs CASCADE;
DROP TABLE IF EXISTS settlements CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS memberships CASCADE;
DROP TABLE IF EXISTS businesses CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP FUNCTION IF EXISTS audit_logs_immutable CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS settlement_direction;
DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS member_role;
";
