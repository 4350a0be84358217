pub mod availability;
pub mod booking;
pub mod business;
pub mod employee;
pub mod service;

pub use availability::{AvailabilityDay, AvailabilitySlot};
pub use booking::{BookingConfirmation, BookingRequest, BookingStatus, ContactDetails};
pub use business::BusinessProfile;
pub use employee::EmployeeEntry;
pub use service::ServiceCatalogEntry;
