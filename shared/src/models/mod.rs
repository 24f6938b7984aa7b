//! Domain models

pub mod equipment;
pub mod lab;
pub mod lab_work;
pub mod reservation;
pub mod role;

pub use equipment::{Equipment, EquipmentCreate, EquipmentStatus, EquipmentUpdate};
pub use lab::{Lab, LabCreate, LabUpdate};
pub use lab_work::{LabWork, LabWorkCreate, LabWorkStatus, LabWorkUpdate};
pub use reservation::{
    Reservation, ReservationCreate, ReservationStatus, ReservationStatusUpdate,
};
pub use role::Role;
