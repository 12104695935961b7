//! Development Data Seeder
//!
//! Seeds sample gym data on startup when dev mode is enabled: two plans,
//! two clients, one fully-paid and one half-paid subscription, and a pair
//! of attendance rows showing both verdict kinds.

use mongodb::Database;
use tracing::info;

use crate::access::engine::AccessResult;
use crate::attendance::{Attendance, AttendanceRepository};
use crate::client::entity::Gender;
use crate::client::{Client, ClientRepository};
use crate::plan::{SubscriptionPlan, SubscriptionPlanRepository};
use crate::subscription::entity::{Payment, PaymentMethod};
use crate::subscription::{Subscription, SubscriptionRepository};

/// Development data seeder
pub struct DevDataSeeder {
    db: Database,
}

impl DevDataSeeder {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Seed all development data. Safe to re-run: existing records are
    /// detected by their natural keys and left alone.
    pub async fn seed(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!("=== DEV DATA SEEDER ===");

        let (basic, premium) = self.seed_plans().await?;
        let (aya, bassir) = self.seed_clients().await?;
        self.seed_subscriptions(&basic, &premium, &aya, &bassir).await?;

        info!("Development data seeded successfully!");
        info!("=======================");

        Ok(())
    }

    async fn seed_plans(
        &self,
    ) -> Result<(SubscriptionPlan, SubscriptionPlan), Box<dyn std::error::Error>> {
        let repo = SubscriptionPlanRepository::new(&self.db);

        let basic = match repo.find_by_name("Basic").await? {
            Some(existing) => existing,
            None => {
                let plan = SubscriptionPlan::new("Basic", 500.0, 1)
                    .with_description("Access to gym equipment only");
                repo.insert(&plan).await?;
                info!("Created plan: {}", plan.display_name());
                plan
            }
        };

        let premium = match repo.find_by_name("Premium").await? {
            Some(existing) => existing,
            None => {
                let plan = SubscriptionPlan::new("Premium", 1200.0, 3)
                    .with_description("Access to gym + classes");
                repo.insert(&plan).await?;
                info!("Created plan: {}", plan.display_name());
                plan
            }
        };

        Ok((basic, premium))
    }

    async fn seed_clients(&self) -> Result<(Client, Client), Box<dyn std::error::Error>> {
        let repo = ClientRepository::new(&self.db);

        let aya = match repo.find_by_phone("0601010101").await? {
            Some(existing) => existing,
            None => {
                let client = Client::new("Aya Ziyad", "0601010101")
                    .with_email("aya@example.com")
                    .with_gender(Gender::Female);
                repo.insert(&client).await?;
                info!("Created client: {}", client.full_name);
                client
            }
        };

        let bassir = match repo.find_by_phone("0602020202").await? {
            Some(existing) => existing,
            None => {
                let client = Client::new("Bassir El Houssein", "0602020202")
                    .with_email("bassir@example.com")
                    .with_gender(Gender::Male);
                repo.insert(&client).await?;
                info!("Created client: {}", client.full_name);
                client
            }
        };

        Ok((aya, bassir))
    }

    async fn seed_subscriptions(
        &self,
        basic: &SubscriptionPlan,
        premium: &SubscriptionPlan,
        aya: &Client,
        bassir: &Client,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let subscription_repo = SubscriptionRepository::new(&self.db);
        let attendance_repo = AttendanceRepository::new(&self.db);

        let today = chrono::Utc::now().date_naive();

        if subscription_repo.find_by_client(&aya.id).await?.is_empty() {
            let end = basic.calculate_end_date(today).ok_or("end date overflow")?;
            let mut sub = Subscription::new(&aya.id, &basic.id, today, end, basic.price);
            // Fully paid up front
            sub.record_payment(Payment::new(basic.price, PaymentMethod::Cash));
            subscription_repo.insert(&sub).await?;

            let attendance = Attendance::new(&aya.id, AccessResult::Granted)
                .with_subscription(&sub.id);
            attendance_repo.insert(&attendance).await?;

            info!("Created paid subscription for {}", aya.full_name);
        }

        if subscription_repo.find_by_client(&bassir.id).await?.is_empty() {
            let end = premium.calculate_end_date(today).ok_or("end date overflow")?;
            let mut sub = Subscription::new(&bassir.id, &premium.id, today, end, premium.price);
            // Half paid: the remaining balance stays open
            sub.record_payment(Payment::new(premium.price / 2.0, PaymentMethod::Cheque));
            subscription_repo.insert(&sub).await?;

            let attendance = Attendance::new(&bassir.id, AccessResult::Granted)
                .with_subscription(&sub.id);
            attendance_repo.insert(&attendance).await?;

            info!("Created half-paid subscription for {}", bassir.full_name);
        }

        Ok(())
    }
}
