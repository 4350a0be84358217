#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde_json::json;

use bookingflow::models::{
    AvailabilitySlot, BookingConfirmation, BookingRequest, BookingStatus, BusinessProfile,
    EmployeeEntry, ServiceCatalogEntry,
};
use bookingflow::services::{BackendError, BookingBackend};

pub const SLUG: &str = "salon-ana";
pub const HAIRCUT: i64 = 1;
pub const COLORING: i64 = 2;
pub const MARIA: i64 = 7;
pub const ION: i64 = 8;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

pub fn tomorrow() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

pub fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

pub fn slot(start: &str, end: &str, available: bool) -> AvailabilitySlot {
    AvailabilitySlot {
        start: at(start),
        end: at(end),
        available,
    }
}

// ── Mock Backend ──

/// In-memory backend for a single salon. Bookings made through it mark
/// their slot as taken for every later availability query.
pub struct FakeBackend {
    profile: BusinessProfile,
    services: Vec<ServiceCatalogEntry>,
    employees: Vec<EmployeeEntry>,
    schedule: HashMap<(i64, NaiveDate), Vec<AvailabilitySlot>>,
    booked: Mutex<HashSet<(i64, DateTime<FixedOffset>)>>,
    next_id: AtomicI64,
    pub catalog_down: AtomicBool,
    pub employees_down: AtomicBool,
    pub availability_down: AtomicBool,
    /// Latency added to every booking call, in milliseconds.
    pub booking_delay_ms: AtomicU64,
    pub requests: Mutex<Vec<BookingRequest>>,
}

impl FakeBackend {
    pub fn salon() -> Self {
        let profile: BusinessProfile = serde_json::from_value(json!({
            "id": 3,
            "slug": SLUG,
            "name": "Salon Ana",
            "address": "Str. Lunga 4",
            "city": "Cluj-Napoca",
            "phone": "0264123456",
            "cancellation_policy_hours": 12
        }))
        .unwrap();

        let services: Vec<ServiceCatalogEntry> = serde_json::from_value(json!([
            {"id": HAIRCUT, "name": "Haircut", "duration_minutes": 30, "price": "50", "price_max": "70"},
            {"id": COLORING, "name": "Coloring", "duration_minutes": 90, "price": "150"},
            {"id": 9, "name": "Broken", "duration_minutes": 0, "price": "10"}
        ]))
        .unwrap();

        let employees: Vec<EmployeeEntry> = serde_json::from_value(json!([
            {"id": MARIA, "full_name": "Maria Pop", "role": "Stylist"},
            {"id": ION, "full_name": "Ion Vasile", "display_name": "Ionut"}
        ]))
        .unwrap();

        let mut schedule = HashMap::new();
        // Deliberately unsorted.
        schedule.insert(
            (MARIA, tomorrow()),
            vec![
                slot("2026-10-15T10:30:00+00:00", "2026-10-15T11:00:00+00:00", true),
                slot("2026-10-15T10:00:00+00:00", "2026-10-15T10:30:00+00:00", true),
                slot("2026-10-15T11:00:00+00:00", "2026-10-15T11:30:00+00:00", false),
            ],
        );

        Self {
            profile,
            services,
            employees,
            schedule,
            booked: Mutex::new(HashSet::new()),
            next_id: AtomicI64::new(101),
            catalog_down: AtomicBool::new(false),
            employees_down: AtomicBool::new(false),
            availability_down: AtomicBool::new(false),
            booking_delay_ms: AtomicU64::new(0),
            requests: Mutex::new(vec![]),
        }
    }

    fn check_slug(&self, slug: &str) -> Result<(), BackendError> {
        if slug == self.profile.slug {
            Ok(())
        } else {
            Err(BackendError::NotFound("Business not found".to_string()))
        }
    }

    fn down(flag: &AtomicBool) -> Result<(), BackendError> {
        if flag.load(Ordering::SeqCst) {
            Err(BackendError::Status {
                status: 503,
                message: "maintenance".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn business_profile(&self, slug: &str) -> Result<BusinessProfile, BackendError> {
        self.check_slug(slug)?;
        Self::down(&self.catalog_down)?;
        Ok(self.profile.clone())
    }

    async fn list_services(&self, slug: &str) -> Result<Vec<ServiceCatalogEntry>, BackendError> {
        self.check_slug(slug)?;
        Self::down(&self.catalog_down)?;
        Ok(self.services.clone())
    }

    async fn list_employees(
        &self,
        slug: &str,
        service_id: i64,
    ) -> Result<Vec<EmployeeEntry>, BackendError> {
        self.check_slug(slug)?;
        Self::down(&self.employees_down)?;
        if service_id == COLORING {
            return Ok(self.employees.iter().filter(|e| e.id == MARIA).cloned().collect());
        }
        Ok(self.employees.clone())
    }

    async fn availability(
        &self,
        slug: &str,
        employee_id: i64,
        _service_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, BackendError> {
        self.check_slug(slug)?;
        Self::down(&self.availability_down)?;
        let booked = self.booked.lock().unwrap();
        Ok(self
            .schedule
            .get(&(employee_id, date))
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|mut s| {
                s.available = s.available && !booked.contains(&(employee_id, s.start));
                s
            })
            .collect())
    }

    async fn create_booking(
        &self,
        slug: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, BackendError> {
        self.check_slug(slug)?;
        let delay = self.booking_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        self.requests.lock().unwrap().push(request.clone());

        let mut booked = self.booked.lock().unwrap();
        if !booked.insert((request.employee_id, request.start_time)) {
            return Err(BackendError::Conflict(
                "Intervalul nu mai este disponibil".to_string(),
            ));
        }

        let duration = self
            .services
            .iter()
            .find(|s| s.id == request.service_id)
            .map(|s| s.duration_minutes)
            .unwrap_or(30);

        Ok(BookingConfirmation {
            appointment_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            status: BookingStatus::Confirmed,
            start: request.start_time,
            end: request.start_time + Duration::minutes(duration as i64),
            message: "Programare confirmata".to_string(),
        })
    }
}
