//! Database seeder for Kindra development and testing.
//!
//! Seeds the admin account and starter categories for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use kindra_core::auth::hash_password;
use kindra_db::entities::{categories, sea_orm_active_enums::UserRole, users};

/// Admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000001";

const STARTER_CATEGORIES: &[(&str, &str)] = &[
    ("Education", "School supplies, tuition support, and literacy programs"),
    ("Health", "Medical care, equipment, and public health campaigns"),
    ("Disaster Relief", "Emergency response to floods, fires, and earthquakes"),
    ("Environment", "Conservation, reforestation, and clean water projects"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = kindra_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin account...");
    seed_admin(&db).await;

    println!("Seeding starter categories...");
    seed_categories(&db).await;

    println!("Seeding complete!");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

/// Seeds the admin account for development.
async fn seed_admin(db: &DatabaseConnection) {
    if users::Entity::find_by_id(admin_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin account already exists, skipping...");
        return;
    }

    let password =
        std::env::var("KINDRA_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-dev-password".to_string());
    let password_hash = hash_password(&password).expect("Failed to hash admin password");

    let now = Utc::now().into();
    let admin = users::ActiveModel {
        id: Set(admin_user_id()),
        username: Set("admin".to_string()),
        email: Set("admin@kindra.dev".to_string()),
        password_hash: Set(password_hash),
        role: Set(UserRole::Admin),
        is_approved: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = admin.insert(db).await {
        eprintln!("Failed to insert admin account: {e}");
    } else {
        println!("  Created admin account: admin@kindra.dev");
    }
}

/// Seeds the starter categories for development.
async fn seed_categories(db: &DatabaseConnection) {
    for (name, description) in STARTER_CATEGORIES {
        let existing = categories::Entity::find()
            .filter(categories::Column::Name.eq(*name))
            .one(db)
            .await
            .ok()
            .flatten();

        if existing.is_some() {
            println!("  Category '{name}' already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set((*name).to_string()),
            description: Set(Some((*description).to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = category.insert(db).await {
            eprintln!("Failed to insert category '{name}': {e}");
        } else {
            println!("  Created category: {name}");
        }
    }
}
