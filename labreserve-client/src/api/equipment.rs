//! Equipment endpoints

use super::ApiClient;
use crate::ClientResult;
use shared::models::{Equipment, EquipmentCreate, EquipmentUpdate};

impl ApiClient {
    pub async fn equipment(&self) -> ClientResult<Vec<Equipment>> {
        self.intercept(self.http.get("equipment").await)
    }

    pub async fn equipment_item(&self, id: i64) -> ClientResult<Equipment> {
        self.intercept(self.http.get(&format!("equipment/{}", id)).await)
    }

    /// Inventory of one lab; the reservation composer uses this to keep
    /// equipment choices filtered to the selected lab.
    pub async fn equipment_by_lab(&self, lab_id: i64) -> ClientResult<Vec<Equipment>> {
        self.intercept(self.http.get(&format!("equipment/lab/{}", lab_id)).await)
    }

    pub async fn create_equipment(&self, equipment: &EquipmentCreate) -> ClientResult<Equipment> {
        self.intercept(self.http.post("equipment", equipment).await)
    }

    pub async fn update_equipment(
        &self,
        id: i64,
        equipment: &EquipmentUpdate,
    ) -> ClientResult<Equipment> {
        self.intercept(self.http.put(&format!("equipment/{}", id), equipment).await)
    }

    pub async fn delete_equipment(&self, id: i64) -> ClientResult<()> {
        self.intercept(self.http.delete(&format!("equipment/{}", id)).await)
    }
}
