//! Appointment booking and its status lifecycle.
//!
//! `lifecycle` holds the pure transition rules; `service` loads rows, checks
//! permissions and applies those rules.

pub mod lifecycle;
pub mod service;

pub use service::{
    assign_mechanic, cancel_appointment, create_appointment, get_appointment, list_appointments, list_for_mechanic,
    update_appointment, AppointmentPatch, NewAppointment,
};
