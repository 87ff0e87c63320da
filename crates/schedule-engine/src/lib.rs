//! # schedule-engine
//!
//! Deterministic appointment layout and slot availability for calendar views.
//!
//! The engine is a pure, synchronous computation layer. Callers hand it a
//! snapshot of appointments, the weekly working-hours table and a reference
//! "now"; it answers two independent questions:
//!
//! - which visual column each appointment occupies so concurrent appointments
//!   render side by side without collision, and
//! - what interaction state every slot of a day is in (closed, free, occupied,
//!   elapsed).
//!
//! Nothing is cached or mutated between calls. Re-invoke whenever the input
//! snapshot or the clock changes.
//!
//! ## Modules
//!
//! - [`slots`] — fixed-granularity grid of slots covering one day
//! - [`hours`] — weekly working-hour rules and the open/closed resolver
//! - [`appointment`] — appointment intervals and their validation
//! - [`layout`] — greedy column packing of overlapping appointments
//! - [`classify`] — per-slot interaction state
//! - [`view`] — minute/row offsets and date grids for day, week and month views
//! - [`zone`] — absolute instants to calendar-local wall time
//! - [`document`] — JSON documents exchanged with the data service
//! - [`error`] — Error types

pub mod appointment;
pub mod classify;
pub mod document;
pub mod error;
pub mod hours;
pub mod layout;
pub mod slots;
pub mod view;
pub mod zone;

pub use appointment::{AppointmentInterval, AppointmentStatus, IntervalError};
pub use classify::{classify_day, classify_slot, BookingIntent, ClassifiedSlot, SlotState};
pub use document::{AppointmentRecord, EngineConfig, ScheduleDocument};
pub use error::EngineError;
pub use hours::{is_within_hours, resolve_hours, OpenWindow, WorkingHourRule};
pub use layout::{
    compute_layout, compute_layout_by_date, peak_concurrency, LayoutAssignment, LayoutOutcome,
    SkippedAppointment,
};
pub use slots::{generate_slots, slot_at, TimeSlot, TimeSlots};
