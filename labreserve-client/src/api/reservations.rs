//! Reservation endpoints

use super::ApiClient;
use crate::ClientResult;
use shared::models::{
    Reservation, ReservationCreate, ReservationStatus, ReservationStatusUpdate,
};

impl ApiClient {
    /// All reservations (privileged roles).
    pub async fn reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.intercept(self.http.get("reservations").await)
    }

    /// The caller's own reservations.
    pub async fn my_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.intercept(self.http.get("reservations/my").await)
    }

    /// Reservations awaiting approval (privileged roles).
    pub async fn pending_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.intercept(self.http.get("reservations/pending").await)
    }

    pub async fn create_reservation(
        &self,
        reservation: &ReservationCreate,
    ) -> ClientResult<Reservation> {
        self.intercept(self.http.post("reservations", reservation).await)
    }

    pub async fn approve_reservation(&self, id: i64) -> ClientResult<Reservation> {
        self.intercept(
            self.http
                .patch_empty(&format!("reservations/{}/approve", id))
                .await,
        )
    }

    pub async fn reject_reservation(&self, id: i64) -> ClientResult<Reservation> {
        self.intercept(
            self.http
                .patch_empty(&format!("reservations/{}/reject", id))
                .await,
        )
    }

    pub async fn set_reservation_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> ClientResult<Reservation> {
        let body = ReservationStatusUpdate { status };
        self.intercept(
            self.http
                .patch(&format!("reservations/{}/status", id), &body)
                .await,
        )
    }

    /// Delete a reservation. For a non-privileged owner this is the
    /// "cancel" action on a PENDING reservation.
    pub async fn delete_reservation(&self, id: i64) -> ClientResult<()> {
        self.intercept(self.http.delete(&format!("reservations/{}", id)).await)
    }
}
