//! Optional demo data: two users, three weeks of card purchases, a stored
//! prediction for each purchase and a handful of user corrections.

use chrono::{Duration, Utc};
use rusqlite::Connection;

use crate::date_utils::to_iso;
use crate::db::repository::Resource;
use crate::error::AppResult;
use crate::json_utils::Numeric;
use crate::models::{
    Feedback, NewFeedback, NewPrediction, NewTransaction, NewUser, PredictRequest, Prediction,
    Transaction, User,
};
use crate::services::classifier::Classifier;

const DEMO_PASSWORD: &str = "demo123";
const MODEL_VERSION: &str = "v1.0";

struct DemoTxn {
    days_ago: i64,
    description: &'static str,
    amount: f64,
    merchant: &'static str,
}

const TRANSACTIONS: &[DemoTxn] = &[
    DemoTxn { days_ago: 7, description: "Starbucks Coffee - Morning Latte", amount: 5.75, merchant: "Starbucks" },
    DemoTxn { days_ago: 6, description: "Shell Gas Station - Fuel", amount: 45.20, merchant: "Shell" },
    DemoTxn { days_ago: 6, description: "Amazon.com - Books Purchase", amount: 29.99, merchant: "Amazon" },
    DemoTxn { days_ago: 5, description: "Whole Foods Market - Weekly Groceries", amount: 87.45, merchant: "Whole Foods" },
    DemoTxn { days_ago: 5, description: "Netflix Monthly Subscription", amount: 15.99, merchant: "Netflix" },
    DemoTxn { days_ago: 4, description: "Uber Ride to Downtown", amount: 18.50, merchant: "Uber" },
    DemoTxn { days_ago: 4, description: "Electric Company - Monthly Bill", amount: 125.00, merchant: "City Electric" },
    DemoTxn { days_ago: 3, description: "CVS Pharmacy - Prescription", amount: 22.50, merchant: "CVS" },
    DemoTxn { days_ago: 3, description: "Chipotle Mexican Grill - Lunch", amount: 12.85, merchant: "Chipotle" },
    DemoTxn { days_ago: 2, description: "Target - Household Items", amount: 54.30, merchant: "Target" },
    DemoTxn { days_ago: 2, description: "Shell Gas Station - Fuel", amount: 42.10, merchant: "Shell" },
    DemoTxn { days_ago: 1, description: "Spotify Premium - Monthly", amount: 9.99, merchant: "Spotify" },
    DemoTxn { days_ago: 1, description: "Walmart Supercenter - Groceries", amount: 95.60, merchant: "Walmart" },
    DemoTxn { days_ago: 0, description: "Panera Bread - Breakfast", amount: 8.75, merchant: "Panera Bread" },
    DemoTxn { days_ago: 0, description: "AMC Theatres - Movie Tickets", amount: 24.00, merchant: "AMC Theatres" },
    DemoTxn { days_ago: 0, description: "Verizon Wireless - Phone Bill", amount: 85.00, merchant: "Verizon" },
    DemoTxn { days_ago: 0, description: "Trader Joe's - Groceries", amount: 67.80, merchant: "Trader Joe's" },
    DemoTxn { days_ago: 0, description: "Lyft Ride - Airport", amount: 35.50, merchant: "Lyft" },
    DemoTxn { days_ago: 0, description: "Walgreens - Health Products", amount: 18.90, merchant: "Walgreens" },
    DemoTxn { days_ago: 0, description: "Pizza Hut - Dinner Delivery", amount: 28.45, merchant: "Pizza Hut" },
];

/// Index into [`TRANSACTIONS`], corrected category id, note.
const CORRECTIONS: &[(usize, i64, &str)] = &[
    (2, 6, "Books should be categorized as entertainment"),
    (9, 1, "Household cleaning supplies should be groceries"),
    (13, 1, "Breakfast items purchased for home should be groceries"),
    (11, 5, "Monthly subscriptions should be bills"),
    (18, 1, "Vitamins and health products purchased as regular items"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub transactions: usize,
    pub predictions: usize,
    pub feedback: usize,
}

fn demo_user(n: u32) -> NewUser {
    NewUser {
        name: format!("Demo User {n}"),
        email: format!("user{n}@demo.example"),
        password: DEMO_PASSWORD.into(),
    }
}

/// Load the demo data into an empty database. Returns `None` without touching
/// anything when a user already exists; otherwise all rows land in one SQLite
/// transaction.
pub fn seed_demo(conn: &mut Connection, classifier: &Classifier) -> AppResult<Option<SeedSummary>> {
    let has_users: bool =
        conn.query_row("SELECT EXISTS(SELECT 1 FROM users)", [], |row| row.get(0))?;
    if has_users {
        tracing::info!("Users already exist, skipping demo data");
        return Ok(None);
    }

    let tx = conn.transaction()?;
    let mut summary = SeedSummary::default();

    let owner = User::insert(&tx, &demo_user(1))?;
    User::insert(&tx, &demo_user(2))?;
    summary.users = 2;

    let now = Utc::now();
    // (transaction id, prediction id, predicted category id), in table order
    let mut stored = Vec::with_capacity(TRANSACTIONS.len());
    for demo in TRANSACTIONS {
        let transaction_id = Transaction::insert(
            &tx,
            &NewTransaction {
                user_id: owner,
                description: demo.description.into(),
                amount: Some(demo.amount),
                merchant_name: Some(demo.merchant.into()),
                transaction_date: to_iso(now - Duration::days(demo.days_ago)),
            },
        )?;

        let outcome = classifier.predict(&PredictRequest {
            transaction: Some(demo.description.into()),
            amount: Some(Numeric::from(demo.amount)),
            merchant_name: Some(demo.merchant.into()),
        })?;
        let prediction_id = Prediction::insert(
            &tx,
            &NewPrediction {
                transaction_id,
                category_id: outcome.category_id,
                confidence: outcome.confidence,
                influential_tokens: Some(outcome.influential_tokens),
                model_version: MODEL_VERSION.into(),
            },
        )?;
        stored.push((transaction_id, prediction_id, outcome.category_id));
    }
    summary.transactions = stored.len();
    summary.predictions = stored.len();

    for &(index, corrected, note) in CORRECTIONS {
        let Some(&(transaction_id, prediction_id, predicted)) = stored.get(index) else {
            continue;
        };
        Feedback::insert(
            &tx,
            &NewFeedback {
                transaction_id,
                prediction_id: Some(prediction_id),
                original_category_id: Some(predicted),
                corrected_category_id: corrected,
                user_id: owner,
                notes: Some(note.into()),
            },
        )?;
        summary.feedback += 1;
    }

    tx.commit()?;
    tracing::info!(?summary, "Demo data loaded");
    Ok(Some(summary))
}
