//! Shared test harness for user store and controller testing
//!
//! Provides record and form fixtures, a deterministic clock, and the
//! `user_store_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod user_store_tests;

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use user_directory::core::mutation::{FixedClock, prepare_create};
use user_directory::core::record::{Address, RecordBody, UserForm, UserRecord};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 2022-01-`day` 10:00 UTC
pub fn at_day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, day, 10, 0, 0).unwrap()
}

pub fn fixed_clock(day: u32) -> Arc<FixedClock> {
    Arc::new(FixedClock(at_day(day)))
}

/// A stored record created on 2022-01-`day`
pub fn user(id: &str, first: &str, last: &str, email: &str, day: u32) -> UserRecord {
    let stamp = format!("2022-01-{:02}T10:00:00.000Z", day);
    UserRecord {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        email: Some(email.to_string()),
        phone_number: Some("0888123456".to_string()),
        image_url: Some(format!("https://example.com/{}.png", id)),
        address: Some(Address {
            country: Some("Bulgaria".to_string()),
            city: Some("Sofia".to_string()),
            street: Some("Vitosha".to_string()),
            street_number: Some(day.to_string()),
        }),
        created_at: Some(stamp.clone()),
        updated_at: Some(stamp),
        ..UserRecord::with_id(id)
    }
}

/// Seven users `u1`..`u7` created on consecutive days, stored out of order
pub fn seven_users() -> Vec<UserRecord> {
    let people = [
        ("u4", "Dimitar", "Georgiev", "dimitar@abv.bg", 4),
        ("u1", "Ivan", "Petrov", "ivan@abv.bg", 1),
        ("u7", "Georgi", "Ivanov", "georgi@gmail.com", 7),
        ("u2", "Maria", "Ivanova", "maria@abv.bg", 2),
        ("u6", "Elena", "Dimitrova", "elena@gmail.com", 6),
        ("u3", "Petar", "Stoyanov", "petar@abv.bg", 3),
        ("u5", "Ani", "Koleva", "ani@gmail.com", 5),
    ];
    people
        .iter()
        .map(|(id, first, last, email, day)| user(id, first, last, email, *day))
        .collect()
}

/// A complete, valid form
pub fn form(first: &str, last: &str, email: &str) -> UserForm {
    UserForm {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone_number: "0888123456".to_string(),
        image_url: "https://example.com/avatar.png".to_string(),
        country: "Bulgaria".to_string(),
        city: "Plovdiv".to_string(),
        street: "Glavna".to_string(),
        street_number: "5".to_string(),
    }
}

/// Create body for `first`, stamped on 2022-01-01
pub fn body(first: &str) -> RecordBody {
    prepare_create(
        form(first, "Test", &format!("{}@test.com", first.to_lowercase())),
        at_day(1),
    )
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

pub fn ids(records: &[UserRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}
