//! Lab endpoints

use super::ApiClient;
use crate::ClientResult;
use shared::models::{Lab, LabCreate, LabUpdate};

impl ApiClient {
    pub async fn labs(&self) -> ClientResult<Vec<Lab>> {
        self.intercept(self.http.get("labs").await)
    }

    pub async fn lab(&self, id: i64) -> ClientResult<Lab> {
        self.intercept(self.http.get(&format!("labs/{}", id)).await)
    }

    pub async fn create_lab(&self, lab: &LabCreate) -> ClientResult<Lab> {
        self.intercept(self.http.post("labs", lab).await)
    }

    pub async fn update_lab(&self, id: i64, lab: &LabUpdate) -> ClientResult<Lab> {
        self.intercept(self.http.put(&format!("labs/{}", id), lab).await)
    }

    pub async fn delete_lab(&self, id: i64) -> ClientResult<()> {
        self.intercept(self.http.delete(&format!("labs/{}", id)).await)
    }
}
