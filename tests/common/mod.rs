#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};

use car_inquiries::{
    create_app,
    middleware::{error_handling::Result, AppError, StaticKeyAuthorizer, API_KEY_HEADER},
    models::inquiry::{Inquiry, InquiryFilter, InquiryFull, InquiryStatus, NewInquiry},
    repositories::InquiryRepository,
    AppState,
};

pub const API_KEY: &str = "super-secret-inquiries";

pub struct Car {
    pub brand: String,
    pub model: String,
    pub vin: String,
}

pub struct User {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
}

#[derive(Default)]
struct Tables {
    inquiries: Vec<Inquiry>,
    cars: HashMap<i64, Car>,
    users: HashMap<i64, User>,
    next_id: i64,
}

/// In-memory stand-in for the Postgres repository, including the left-join
/// projection used by the list endpoint.
pub struct InMemoryInquiryRepository {
    tables: Mutex<Tables>,
    healthy: AtomicBool,
}

impl Default for InMemoryInquiryRepository {
    fn default() -> Self {
        Self { tables: Mutex::new(Tables::default()), healthy: AtomicBool::new(true) }
    }
}

impl InMemoryInquiryRepository {
    pub fn add_car(&self, id: i64, brand: &str, model: &str, vin: &str) {
        self.tables.lock().unwrap().cars.insert(
            id,
            Car { brand: brand.to_string(), model: model.to_string(), vin: vin.to_string() },
        );
    }

    pub fn add_user(&self, id: i64, last_name: &str, first_name: &str, middle_name: Option<&str>) {
        self.tables.lock().unwrap().users.insert(
            id,
            User {
                last_name: last_name.to_string(),
                first_name: first_name.to_string(),
                middle_name: middle_name.map(str::to_string),
            },
        );
    }

    pub fn delete_car(&self, id: i64) {
        self.tables.lock().unwrap().cars.remove(&id);
    }

    pub fn delete_user(&self, id: i64) {
        self.tables.lock().unwrap().users.remove(&id);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn inquiry_count(&self) -> usize {
        self.tables.lock().unwrap().inquiries.len()
    }

    pub fn get(&self, id: i64) -> Option<Inquiry> {
        self.tables.lock().unwrap().inquiries.iter().find(|i| i.id == id).cloned()
    }

    fn display_name(user: Option<&User>) -> String {
        user.map(|u| {
            [Some(u.last_name.as_str()), Some(u.first_name.as_str()), u.middle_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
    }
}

#[async_trait]
impl InquiryRepository for InMemoryInquiryRepository {
    async fn insert(&self, inquiry: &NewInquiry) -> Result<Inquiry> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_id += 1;
        let id = tables.next_id;

        // Strictly increasing creation times keep ordering deterministic
        let created_at = Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap() + Duration::seconds(id);

        let row = Inquiry {
            id,
            car_id: inquiry.car_id,
            buyer_id: inquiry.buyer_id,
            seller_id: inquiry.seller_id,
            message: inquiry.message.clone(),
            preferred_time: inquiry.preferred_time,
            contact_phone: inquiry.contact_phone.clone(),
            status: InquiryStatus::New.to_string(),
            created_at,
            updated_at: created_at,
        };
        tables.inquiries.push(row.clone());
        Ok(row)
    }

    async fn list(&self, filter: &InquiryFilter) -> Result<Vec<InquiryFull>> {
        let tables = self.tables.lock().unwrap();

        let mut rows: Vec<InquiryFull> = tables
            .inquiries
            .iter()
            .filter(|i| filter.matches(i))
            .map(|i| {
                let car = tables.cars.get(&i.car_id);
                InquiryFull {
                    id: i.id,
                    car_id: i.car_id,
                    buyer_id: i.buyer_id,
                    seller_id: i.seller_id,
                    message: i.message.clone(),
                    preferred_time: i.preferred_time,
                    contact_phone: i.contact_phone.clone(),
                    status: i.status.clone(),
                    created_at: i.created_at,
                    updated_at: i.updated_at,
                    car_name: car.map(|c| format!("{} {}", c.brand, c.model)).unwrap_or_default(),
                    car_vin: car.map(|c| c.vin.clone()).unwrap_or_default(),
                    buyer_name: Self::display_name(tables.users.get(&i.buyer_id)),
                    seller_name: Self::display_name(tables.users.get(&i.seller_id)),
                }
            })
            .collect();

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn update_status(&self, id: i64, status: InquiryStatus) -> Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        match tables.inquiries.iter_mut().find(|i| i.id == id) {
            Some(row) => {
                row.status = status.to_string();
                row.updated_at = row.updated_at + Duration::minutes(5);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
    }
}

pub fn cutoff() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 10, 0, 0, 0).unwrap()
}

pub fn test_server() -> (TestServer, Arc<InMemoryInquiryRepository>) {
    let repo = Arc::new(InMemoryInquiryRepository::default());
    let state = AppState::with_dependencies(
        repo.clone(),
        Arc::new(StaticKeyAuthorizer::new(API_KEY)),
        Some(cutoff()),
    );
    let server = TestServer::new(create_app(state)).unwrap();
    (server, repo)
}

pub fn api_key_header() -> (HeaderName, HeaderValue) {
    (HeaderName::from_static(API_KEY_HEADER), HeaderValue::from_static(API_KEY))
}
