//! Screen state and input handling, one module per view

pub mod equipment;
pub mod lab_works;
pub mod labs;
pub mod login;
pub mod register;
pub mod reservations;

pub use equipment::EquipmentScreen;
pub use lab_works::LabWorksScreen;
pub use labs::LabsScreen;
pub use login::LoginScreen;
pub use register::RegisterScreen;
pub use reservations::ReservationsScreen;
