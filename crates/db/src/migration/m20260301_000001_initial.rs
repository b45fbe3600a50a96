//! Initial database migration.
//!
//! Creates the enums, core tables, indexes, and `updated_at` triggers.

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
        // PART 2: ACCOUNTS & PROFILES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(NGO_PROFILES_SQL).await?;
        db.execute_unprepared(DONOR_PROFILES_SQL).await?;

        // ============================================================
        // PART 3: CATEGORIES & REQUESTS
        // ============================================================
        db.execute_unprepared(CATEGORIES_SQL).await?;
        db.execute_unprepared(DONATION_REQUESTS_SQL).await?;

        // ============================================================
        // PART 4: DONATIONS
        // ============================================================
        db.execute_unprepared(DONATIONS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
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
-- Account roles
CREATE TYPE user_role AS ENUM ('admin', 'ngo', 'donor');

-- Donation request lifecycle status
CREATE TYPE request_status AS ENUM (
    'pending',
    'approved',
    'rejected',
    'completed'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username VARCHAR(80) NOT NULL UNIQUE,
    email VARCHAR(120) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'donor',
    is_approved BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_users_role_approval ON users (role, is_approved);
";

const NGO_PROFILES_SQL: &str = r"
CREATE TABLE ngo_profiles (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    organization_name VARCHAR(120) NOT NULL UNIQUE,
    registration_number VARCHAR(80) UNIQUE,
    contact_person VARCHAR(100) NOT NULL,
    phone_number VARCHAR(20),
    address VARCHAR(255),
    website_url VARCHAR(255),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DONOR_PROFILES_SQL: &str = r"
CREATE TABLE donor_profiles (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    first_name VARCHAR(80) NOT NULL,
    last_name VARCHAR(80) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DONATION_REQUESTS_SQL: &str = r"
CREATE TABLE donation_requests (
    id UUID PRIMARY KEY,
    ngo_id UUID NOT NULL REFERENCES ngo_profiles(id),
    category_id UUID NOT NULL REFERENCES categories(id),
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    amount_needed NUMERIC(10, 2) NOT NULL CHECK (amount_needed > 0),
    amount_received NUMERIC(10, 2) NOT NULL DEFAULT 0.00
        CHECK (amount_received >= 0 AND amount_received <= amount_needed),
    image_url VARCHAR(255),
    status request_status NOT NULL DEFAULT 'pending',
    approved_by_admin_id UUID REFERENCES users(id),
    approval_date TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_donation_requests_status ON donation_requests (status);
CREATE INDEX idx_donation_requests_ngo ON donation_requests (ngo_id);
CREATE INDEX idx_donation_requests_category ON donation_requests (category_id);
";

const DONATIONS_SQL: &str = r"
CREATE TABLE donations (
    id UUID PRIMARY KEY,
    donor_id UUID NOT NULL REFERENCES donor_profiles(id),
    donation_request_id UUID NOT NULL REFERENCES donation_requests(id),
    amount_donated NUMERIC(10, 2) NOT NULL CHECK (amount_donated > 0),
    transaction_ref VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_donations_donor ON donations (donor_id, created_at DESC);
CREATE INDEX idx_donations_request ON donations (donation_request_id);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_ngo_profiles_updated_at
    BEFORE UPDATE ON ngo_profiles
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_donor_profiles_updated_at
    BEFORE UPDATE ON donor_profiles
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_categories_updated_at
    BEFORE UPDATE ON categories
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_donation_requests_updated_at
    BEFORE UPDATE ON donation_requests
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS donations CASCADE;
DROP TABLE IF EXISTS donation_requests CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS donor_profiles CASCADE;
DROP TABLE IF EXISTS ngo_profiles CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;
DROP TYPE IF EXISTS request_status;
DROP TYPE IF EXISTS user_role;
";
