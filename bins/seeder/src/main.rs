//! Database seeder for Hearth development and testing.
//!
//! Seeds staff users, households with accounts, profitability rows for the
//! current quarter, advisor and firm rollups, a starter tag set, and an
//! onboarding workflow template. Re-running is safe: existing rows are
//! detected and skipped.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use hearth_core::auth::hash_password;
use hearth_core::customization::EntityType;
use hearth_core::period::PeriodType;
use hearth_core::profitability::{CostRates, ProfitabilityInputs};
use hearth_core::workflow::WorkflowStep;
use hearth_db::entities::sea_orm_active_enums::UserRole;
use hearth_db::repositories::{
    AdvisorMetricsInput, AdvisorMetricsRepository, CreateTagInput, CreateTemplateInput,
    FirmMetricsInput, FirmMetricsRepository, HouseholdRepository, ProfitabilityRepository,
    TagRepository, UserRepository, WorkflowRepository,
};

/// Shared development password for every seeded user.
const DEV_PASSWORD: &str = "hearth-dev-password";

const SMITH_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0101);
const JOHNSON_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0102);
const NGUYEN_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0103);
const PATEL_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0104);

struct SeedUser {
    email: &'static str,
    full_name: &'static str,
    role: UserRole,
}

const USERS: [SeedUser; 6] = [
    SeedUser { email: "admin@hearth.dev", full_name: "Avery Admin", role: UserRole::Admin },
    SeedUser { email: "morgan@hearth.dev", full_name: "Morgan Reyes", role: UserRole::Advisor },
    SeedUser { email: "casey@hearth.dev", full_name: "Casey Walsh", role: UserRole::Advisor },
    SeedUser { email: "ops@hearth.dev", full_name: "Jordan Ops", role: UserRole::Operations },
    SeedUser { email: "compliance@hearth.dev", full_name: "Riley Compliance", role: UserRole::Compliance },
    SeedUser { email: "viewer@hearth.dev", full_name: "Quinn Viewer", role: UserRole::Viewer },
];

struct SeedHousehold {
    id: Uuid,
    name: &'static str,
    advisor_email: &'static str,
    accounts: &'static [(&'static str, &'static str, Decimal)],
    inputs: ProfitabilityInputs,
}

static SMITH_ACCOUNTS: [(&str, &str, Decimal); 2] = [
    ("Smith Joint Brokerage", "brokerage", dec!(3200000)),
    ("John Smith IRA", "ira", dec!(1800000)),
];
static JOHNSON_ACCOUNTS: [(&str, &str, Decimal); 1] = [("Johnson Trust", "trust", dec!(1250000))];
static NGUYEN_ACCOUNTS: [(&str, &str, Decimal); 2] = [
    ("Nguyen Brokerage", "brokerage", dec!(600000)),
    ("Nguyen 401k Rollover", "ira", dec!(400000)),
];
static PATEL_ACCOUNTS: [(&str, &str, Decimal); 1] = [("Patel Brokerage", "brokerage", dec!(250000))];

fn households() -> Vec<SeedHousehold> {
    vec![
        SeedHousehold {
            id: SMITH_ID,
            name: "Smith Family",
            advisor_email: "morgan@hearth.dev",
            accounts: &SMITH_ACCOUNTS,
            inputs: ProfitabilityInputs {
                aum: dec!(5000000),
                management_fee_revenue: dec!(62500),
                planning_fee_revenue: dec!(7500),
                other_revenue: dec!(2250),
                advisor_hours: dec!(40),
                operations_hours: dec!(5),
                compliance_hours: dec!(5),
                technology_cost: dec!(4800),
                custodian_cost: dec!(3600),
                marketing_cost: dec!(1500),
                overhead_cost: dec!(8000),
            },
        },
        SeedHousehold {
            id: JOHNSON_ID,
            name: "Johnson Household",
            advisor_email: "morgan@hearth.dev",
            accounts: &JOHNSON_ACCOUNTS,
            inputs: ProfitabilityInputs {
                aum: dec!(1250000),
                management_fee_revenue: dec!(12500),
                planning_fee_revenue: dec!(2500),
                other_revenue: Decimal::ZERO,
                advisor_hours: dec!(30),
                operations_hours: dec!(10),
                compliance_hours: dec!(4),
                technology_cost: dec!(1200),
                custodian_cost: dec!(900),
                marketing_cost: dec!(500),
                overhead_cost: dec!(2000),
            },
        },
        SeedHousehold {
            id: NGUYEN_ID,
            name: "Nguyen Family",
            advisor_email: "casey@hearth.dev",
            accounts: &NGUYEN_ACCOUNTS,
            inputs: ProfitabilityInputs {
                aum: dec!(1000000),
                management_fee_revenue: dec!(10000),
                planning_fee_revenue: dec!(1500),
                other_revenue: dec!(250),
                advisor_hours: dec!(20),
                operations_hours: dec!(6),
                compliance_hours: dec!(2),
                technology_cost: dec!(800),
                custodian_cost: dec!(600),
                marketing_cost: dec!(300),
                overhead_cost: dec!(1500),
            },
        },
        SeedHousehold {
            id: PATEL_ID,
            name: "Patel Household",
            advisor_email: "casey@hearth.dev",
            accounts: &PATEL_ACCOUNTS,
            inputs: ProfitabilityInputs {
                aum: dec!(250000),
                management_fee_revenue: dec!(2500),
                planning_fee_revenue: Decimal::ZERO,
                other_revenue: Decimal::ZERO,
                advisor_hours: dec!(25),
                operations_hours: dec!(12),
                compliance_hours: dec!(3),
                technology_cost: dec!(600),
                custodian_cost: dec!(400),
                marketing_cost: dec!(200),
                overhead_cost: dec!(1000),
            },
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seeder=info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    info!("Connecting to database...");
    let db = hearth_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let admin_id = seed_users(&db).await?;
    seed_households(&db).await?;
    seed_profitability(&db).await?;
    seed_metrics(&db).await?;
    seed_tags(&db, admin_id).await?;
    seed_workflow_template(&db, admin_id).await?;

    info!("Seeding complete!");
    Ok(())
}

/// Seeds one user per role and returns the admin's ID.
async fn seed_users(db: &DatabaseConnection) -> anyhow::Result<Uuid> {
    let repo = UserRepository::new(db.clone());
    let password_hash = hash_password(DEV_PASSWORD)?;
    let mut admin_id = None;

    for seed in &USERS {
        let user = match repo.find_by_email(seed.email).await? {
            Some(existing) => {
                info!(email = seed.email, "User already exists, skipping");
                existing
            }
            None => {
                let created = repo
                    .create(seed.email, &password_hash, seed.full_name, seed.role)
                    .await?;
                info!(email = seed.email, role = ?seed.role, "Created user");
                created
            }
        };
        if seed.role == UserRole::Admin {
            admin_id = Some(user.id);
        }
    }

    admin_id.context("admin user missing after seeding")
}

async fn seed_households(db: &DatabaseConnection) -> anyhow::Result<()> {
    let users = UserRepository::new(db.clone());
    let repo = HouseholdRepository::new(db.clone());

    for seed in households() {
        if repo.find_by_id(seed.id).await?.is_some() {
            info!(household = seed.name, "Household already exists, skipping");
            continue;
        }

        let advisor_id = users.find_by_email(seed.advisor_email).await?.map(|u| u.id);
        let total_aum: Decimal = seed.accounts.iter().map(|(_, _, aum)| *aum).sum();

        repo.create(seed.id, seed.name, advisor_id, total_aum).await?;
        for (name, account_type, aum) in seed.accounts {
            repo.add_account(seed.id, name, account_type, *aum).await?;
        }
        info!(household = seed.name, accounts = seed.accounts.len(), "Created household");
    }

    Ok(())
}

/// Scores every household for the current quarter using default cost rates.
async fn seed_profitability(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = ProfitabilityRepository::new(db.clone());
    let period = PeriodType::Quarterly.bounds(Utc::now().date_naive());
    let rates = CostRates::default();

    for seed in households() {
        let row = repo
            .upsert_calculated(seed.id, period, &seed.inputs, &rates)
            .await?;
        info!(
            household = seed.name,
            score = %row.profitability_score,
            tier = ?row.tier,
            "Scored household"
        );
    }

    Ok(())
}

async fn seed_metrics(db: &DatabaseConnection) -> anyhow::Result<()> {
    let users = UserRepository::new(db.clone());
    let advisor_repo = AdvisorMetricsRepository::new(db.clone());
    let firm_repo = FirmMetricsRepository::new(db.clone());
    let period = PeriodType::Monthly.bounds(Utc::now().date_naive());

    let advisors = users.list_advisors().await?;
    let rollups = [
        (dec!(6250000), dec!(450000), dec!(84750), 14, 22, dec!(98.5)),
        (dec!(1250000), dec!(150000), dec!(14750), 9, 17, dec!(95)),
    ];

    let mut total_aum = Decimal::ZERO;
    let mut total_revenue = Decimal::ZERO;
    let mut net_new_assets = Decimal::ZERO;
    for (advisor, (aum, new_aum, revenue, meetings, tasks, retention)) in
        advisors.iter().zip(rollups)
    {
        advisor_repo
            .upsert(
                advisor.id,
                period,
                AdvisorMetricsInput {
                    households: 2,
                    total_aum: aum,
                    new_aum,
                    revenue,
                    meetings_held: meetings,
                    tasks_completed: tasks,
                    client_retention_rate: retention,
                },
            )
            .await?;
        total_aum += aum;
        total_revenue += revenue;
        net_new_assets += new_aum;
        info!(advisor = %advisor.full_name, "Seeded advisor metrics");
    }

    firm_repo
        .upsert(
            period,
            FirmMetricsInput {
                total_aum,
                total_revenue,
                total_households: i32::try_from(households().len())?,
                total_advisors: i32::try_from(advisors.len())?,
                average_profitability_score: dec!(58.25),
                net_new_assets,
            },
        )
        .await?;
    info!(period = %period.label(), "Seeded firm metrics");

    Ok(())
}

async fn seed_tags(db: &DatabaseConnection, admin_id: Uuid) -> anyhow::Result<()> {
    let repo = TagRepository::new(db.clone());
    let existing = repo.list().await?;
    if !existing.is_empty() {
        info!(count = existing.len(), "Tags already exist, skipping");
        return Ok(());
    }

    let segment = repo
        .create(CreateTagInput {
            name: "Client Segment".to_string(),
            color: Some("#4A5568".to_string()),
            description: Some("Service tiers for households".to_string()),
            parent_id: None,
            created_by: admin_id,
        })
        .await?;

    for (name, color) in [("VIP", "#D69E2E"), ("Core", "#3182CE"), ("Emerging", "#38A169")] {
        repo.create(CreateTagInput {
            name: name.to_string(),
            color: Some(color.to_string()),
            description: None,
            parent_id: Some(segment.id),
            created_by: admin_id,
        })
        .await?;
    }

    let vip = repo
        .list()
        .await?
        .into_iter()
        .find(|tag| tag.name == "VIP")
        .context("VIP tag missing after seeding")?;
    repo.tag_entity(vip.id, EntityType::Household, SMITH_ID, admin_id)
        .await?;

    info!("Seeded tags");
    Ok(())
}

async fn seed_workflow_template(db: &DatabaseConnection, admin_id: Uuid) -> anyhow::Result<()> {
    const NAME: &str = "Client Onboarding";

    let repo = WorkflowRepository::new(db.clone());
    let templates = repo.list_templates(Some(EntityType::Household), true).await?;
    if templates.iter().any(|t| t.name == NAME) {
        info!("Workflow template already exists, skipping");
        return Ok(());
    }

    let step = |key: &str, name: &str, role: &str, due_in_days: u32| WorkflowStep {
        key: key.to_string(),
        name: name.to_string(),
        description: None,
        assignee_role: Some(role.to_string()),
        due_in_days: Some(due_in_days),
    };

    repo.create_template(
        admin_id,
        CreateTemplateInput {
            name: NAME.to_string(),
            description: Some("New household intake through first review".to_string()),
            entity_type: EntityType::Household,
            steps: vec![
                step("kyc", "Collect KYC documents", "operations", 3),
                step("compliance_review", "Compliance review", "compliance", 7),
                step("account_opening", "Open accounts", "operations", 14),
                step("first_review", "First planning meeting", "advisor", 30),
            ],
        },
    )
    .await?;

    info!(template = NAME, "Seeded workflow template");
    Ok(())
}
