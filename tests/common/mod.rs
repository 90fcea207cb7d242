#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use poultry_ledger::{config::AppConfig, AppState};

/// Application state loaded with the sample farm.
pub async fn seeded_app() -> AppState {
    let config = AppConfig {
        seed_sample_data: true,
        ..AppConfig::default()
    };
    AppState::in_memory(config).await.expect("seeded state")
}

/// Application state with no records.
pub async fn empty_app() -> AppState {
    AppState::in_memory(AppConfig::default())
        .await
        .expect("empty state")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid instant")
}

/// "Today" in the sample data's timeline.
pub fn sample_today() -> NaiveDate {
    date(2025, 4, 10)
}
