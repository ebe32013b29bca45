// Synthetic demo-data generator
// Seeded, so a given seed always yields the same merchant population
// and traffic. A few merchants get deliberately suspicious patterns so
// the detectors have something to find.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use backend_domain::{MerchantId, MerchantProfile, Transaction};

use crate::AppState;

const BUSINESS_TYPES: &[&str] = &["retail", "restaurant", "ecommerce", "services", "travel"];
const PAYMENT_METHODS: &[&str] = &["credit_card", "debit_card", "upi", "netbanking", "wallet"];
const CATEGORIES: &[&str] = &["electronics", "fashion", "food", "travel", "entertainment"];
const PLATFORMS: &[&str] = &["web", "mobile", "pos", "kiosk"];
const CITIES: &[&str] = &["Mumbai", "Delhi", "Bangalore", "Chennai", "Hyderabad"];

#[derive(Debug, Clone, Deserialize)]
pub struct SeedOptions {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_merchants")]
    pub merchants: usize,
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_seed() -> u64 {
    42
}

fn default_merchants() -> usize {
    25
}

fn default_days() -> i64 {
    14
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            merchants: default_merchants(),
            days: default_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedSummary {
    pub merchants: usize,
    pub transactions: usize,
    pub flagged_merchants: Vec<String>,
}

pub struct DemoDataGenerator {
    rng: StdRng,
    now: DateTime<Utc>,
    sequence: u64,
}

impl DemoDataGenerator {
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            now,
            sequence: 0,
        }
    }

    pub fn generate(
        &mut self,
        merchant_count: usize,
        days: i64,
    ) -> (Vec<MerchantProfile>, Vec<Transaction>, Vec<String>) {
        let mut merchants = Vec::with_capacity(merchant_count);
        let mut transactions = Vec::new();
        let mut flagged = Vec::new();

        for index in 0..merchant_count.max(1) {
            let merchant = self.merchant(index);
            // Every fifth merchant carries injected fraud traffic.
            let suspicious = index % 5 == 4;
            let mut traffic = self.baseline_traffic(&merchant, days);
            if suspicious {
                traffic.extend(self.fraud_traffic(&merchant));
                flagged.push(merchant.merchant_id.clone());
            }
            transactions.extend(traffic);
            merchants.push(merchant);
        }

        (merchants, transactions, flagged)
    }

    fn merchant(&mut self, index: usize) -> MerchantProfile {
        let avg_amount = self.rng.gen_range(30.0..400.0_f64);
        MerchantProfile {
            merchant_id: format!("M{:04}", index + 1),
            business_name: format!("Business_{}", index + 1),
            business_type: self.pick(BUSINESS_TYPES).to_string(),
            registration_date: self.now - Duration::days(self.rng.gen_range(30..365)),
            registered: self.rng.gen_bool(0.95),
            avg_transaction_amount: (avg_amount * 100.0).round() / 100.0,
            avg_hourly_transactions: self.rng.gen_range(1.0..8.0),
            risk_score: 0.0,
            risk_computed_at: None,
        }
    }

    fn baseline_traffic(&mut self, merchant: &MerchantProfile, days: i64) -> Vec<Transaction> {
        let count = self.rng.gen_range(40..120);
        let span_seconds = days.max(1) * 24 * 3600;
        (0..count)
            .map(|_| {
                let offset = self.rng.gen_range(0..span_seconds);
                let amount = merchant.avg_transaction_amount
                    * self.rng.gen_range(0.5..1.5_f64);
                self.transaction(merchant, self.now - Duration::seconds(offset), amount)
            })
            .collect()
    }

    fn fraud_traffic(&mut self, merchant: &MerchantProfile) -> Vec<Transaction> {
        let mut out = Vec::new();

        // Nocturnal burst within the last day.
        let night = self
            .now
            .date_naive()
            .and_hms_opt(2, 15, 0)
            .unwrap()
            .and_utc();
        for i in 0..3 {
            let amount = merchant.avg_transaction_amount * self.rng.gen_range(4.0..8.0_f64);
            out.push(self.transaction(merchant, night + Duration::minutes(i * 7), amount));
        }

        // Round-amount cluster.
        let round_base = self.now - Duration::hours(6);
        for i in 0..4 {
            let amount = self.rng.gen_range(1..10) as f64 * 100.0;
            out.push(self.transaction(merchant, round_base + Duration::minutes(i * 11), amount));
        }

        // One oversized spike.
        let spike = merchant.avg_transaction_amount * self.rng.gen_range(12.0..20.0_f64);
        out.push(self.transaction(merchant, self.now - Duration::hours(3), spike));

        // Concentrated customer: reuse one customer id for a run of buys.
        let customer = format!("C{}", self.rng.gen_range(1000..9999));
        let base = self.now - Duration::hours(12);
        for i in 0..8 {
            let amount = merchant.avg_transaction_amount * self.rng.gen_range(0.8..1.2_f64);
            let mut tx = self.transaction(merchant, base + Duration::minutes(i * 25), amount);
            tx.customer_id = customer.clone();
            out.push(tx);
        }

        out
    }

    fn transaction(
        &mut self,
        merchant: &MerchantProfile,
        timestamp: DateTime<Utc>,
        amount: f64,
    ) -> Transaction {
        self.sequence += 1;
        Transaction {
            transaction_id: format!("TX{:08}", self.sequence),
            merchant_id: merchant.merchant_id.clone(),
            timestamp,
            amount: (amount * 100.0).round() / 100.0,
            customer_id: format!("C{}", self.rng.gen_range(1000..9999)),
            device_id: format!("D{}", self.rng.gen_range(1000..9999)),
            location: self.pick(CITIES).to_string(),
            payment_method: self.pick(PAYMENT_METHODS).to_string(),
            status: if self.rng.gen_bool(0.95) {
                "success".to_string()
            } else {
                "failed".to_string()
            },
            category: self.pick(CATEGORIES).to_string(),
            platform: self.pick(PLATFORMS).to_string(),
        }
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.gen_range(0..values.len())]
    }
}

/// Generates and stores a synthetic population. Existing rows are left
/// in place; demo ids are stable per seed so reseeding overwrites the
/// same merchants.
pub async fn seed_demo_data(state: &AppState, options: SeedOptions) -> Result<SeedSummary> {
    let mut generator = DemoDataGenerator::new(options.seed, Utc::now());
    let (merchants, transactions, flagged) = generator.generate(options.merchants, options.days);

    state.merchant_repo.upsert_merchants(&merchants).await?;
    state
        .transaction_repo
        .insert_transactions(&transactions)
        .await?;
    // Only the reseeded merchants changed; cached profiles for the
    // rest of the population stay valid.
    for merchant in &merchants {
        state
            .cache
            .invalidate(&MerchantId(merchant.merchant_id.clone()))
            .await;
    }

    Ok(SeedSummary {
        merchants: merchants.len(),
        transactions: transactions.len(),
        flagged_merchants: flagged,
    })
}
