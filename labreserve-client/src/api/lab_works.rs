//! Lab work endpoints

use super::ApiClient;
use crate::ClientResult;
use shared::models::{LabWork, LabWorkCreate, LabWorkUpdate};

impl ApiClient {
    pub async fn lab_works(&self) -> ClientResult<Vec<LabWork>> {
        self.intercept(self.http.get("labworks").await)
    }

    pub async fn lab_work(&self, id: i64) -> ClientResult<LabWork> {
        self.intercept(self.http.get(&format!("labworks/{}", id)).await)
    }

    /// Published works only; these are the ones offered as reservation
    /// templates.
    pub async fn published_lab_works(&self) -> ClientResult<Vec<LabWork>> {
        self.intercept(self.http.get("labworks/published").await)
    }

    pub async fn my_lab_works(&self) -> ClientResult<Vec<LabWork>> {
        self.intercept(self.http.get("labworks/my").await)
    }

    pub async fn create_lab_work(&self, work: &LabWorkCreate) -> ClientResult<LabWork> {
        self.intercept(self.http.post("labworks", work).await)
    }

    pub async fn update_lab_work(&self, id: i64, work: &LabWorkUpdate) -> ClientResult<LabWork> {
        self.intercept(self.http.put(&format!("labworks/{}", id), work).await)
    }

    pub async fn delete_lab_work(&self, id: i64) -> ClientResult<()> {
        self.intercept(self.http.delete(&format!("labworks/{}", id)).await)
    }
}
