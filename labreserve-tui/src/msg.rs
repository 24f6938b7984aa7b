//! Application messages
//!
//! Keyboard input, session events and completed network calls all
//! arrive in the main loop as one message stream. List results carry
//! the generation stamp of the request that produced them so stale
//! responses can be discarded.

use crossterm::event::KeyEvent;
use labreserve_client::SessionEvent;
use shared::client::LoginResponse;
use shared::models::{Equipment, Lab, LabWork, Reservation};

use crate::app::Route;

#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Session(SessionEvent),
    Api(ApiMsg),
}

#[derive(Debug)]
pub enum ApiMsg {
    LoginDone(Result<LoginResponse, String>),
    RegisterDone(Result<(), String>),
    LabsLoaded {
        generation: u64,
        result: Result<Vec<Lab>, String>,
    },
    EquipmentLoaded {
        generation: u64,
        result: Result<Vec<Equipment>, String>,
    },
    LabWorksLoaded {
        generation: u64,
        result: Result<Vec<LabWork>, String>,
    },
    ReservationsLoaded {
        generation: u64,
        result: Result<Vec<Reservation>, String>,
    },
    /// Published works for the composer's template picker
    PublishedLoaded(Result<Vec<LabWork>, String>),
    /// Inventory of the lab currently selected in the composer
    LabInventoryLoaded {
        lab_id: i64,
        result: Result<Vec<Equipment>, String>,
    },
    /// Equipment options for the lab-work form's multi-select
    LabWorkOptionsLoaded(Result<Vec<Equipment>, String>),
    ReservationSubmitted(Result<Reservation, String>),
    /// A create/update/delete finished; `route` names the screen that
    /// initiated it and is refreshed on success.
    MutationDone {
        route: Route,
        result: Result<(), String>,
    },
}
