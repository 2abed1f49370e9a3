//! Sample-data seeder for BudgeIn development.
//!
//! Seeds a demo account plus a handful of budgets with random expenses into
//! the configured storage backend. Budgets that already exist are skipped.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use budgein_core::auth::hash_password;
use budgein_core::budget::{CreateBudgetInput, CreateExpenseInput};
use budgein_shared::AppConfig;
use budgein_store::{BudgetStore, UserRepository, connect};
use chrono::{Duration, Local};
use fake::Fake;
use fake::faker::lorem::en::Words;
use rust_decimal::Decimal;

const DEMO_EMAIL: &str = "demo@budgein.dev";
const DEMO_PASSWORD: &str = "demo123";

/// Budget name and allocation in whole currency units.
const SAMPLE_BUDGETS: &[(&str, i64)] = &[
    ("Food", 1_500_000),
    ("Transport", 500_000),
    ("Entertainment", 300_000),
    ("Bills", 2_000_000),
];

const EXPENSES_PER_BUDGET: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    println!("Seeding data in {}...", config.storage.data_dir.display());

    let persistence = connect(&config.storage).await?;

    println!("Seeding demo user...");
    seed_demo_user(&UserRepository::open(Arc::clone(&persistence)).await?).await?;

    println!("Seeding budgets and expenses...");
    seed_budgets(&BudgetStore::open(persistence).await?).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the demo account used for local logins.
async fn seed_demo_user(users: &UserRepository) -> anyhow::Result<()> {
    if users.find_by_email(DEMO_EMAIL).await.is_some() {
        println!("  Demo user already exists, skipping...");
        return Ok(());
    }

    let hash = hash_password(DEMO_PASSWORD)?;
    users.create(DEMO_EMAIL, "demo", hash).await?;
    println!("  Created {DEMO_EMAIL} / {DEMO_PASSWORD}");
    Ok(())
}

/// Seeds sample budgets, each with a few expenses over the last month.
async fn seed_budgets(store: &BudgetStore) -> anyhow::Result<()> {
    let existing: Vec<String> = store
        .list_budgets()
        .await
        .into_iter()
        .map(|b| b.name)
        .collect();
    let today = Local::now().date_naive();

    for &(name, amount) in SAMPLE_BUDGETS {
        if existing.iter().any(|n| n == name) {
            println!("  Budget '{name}' already exists, skipping...");
            continue;
        }

        store
            .create_budget(CreateBudgetInput {
                name: name.to_string(),
                amount: Decimal::from(amount),
            })
            .await?;

        for _ in 0..EXPENSES_PER_BUDGET {
            let words: Vec<String> = Words(1..3).fake();
            let cost: i64 = (1_000..amount / 10).fake();
            let days_ago: i64 = (0..30).fake();

            store
                .create_expense(CreateExpenseInput {
                    name: words.join(" "),
                    amount: Decimal::from(cost),
                    budget_name: name.to_string(),
                    date: Some(today - Duration::days(days_ago)),
                })
                .await?;
        }

        println!("  Seeded '{name}' with {EXPENSES_PER_BUDGET} expenses");
    }

    Ok(())
}
