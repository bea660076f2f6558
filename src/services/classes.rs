use crate::{
    models::class::{fallback_classes, ClassRef},
    services::api::ApiClient,
};

/// Read-only access to the class-listing service.
#[derive(Debug, Clone)]
pub struct ClassService {
    api: ApiClient,
}

impl ClassService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn fetch(&self) -> anyhow::Result<Vec<ClassRef>> {
        let classes = self
            .api
            .http()
            .get(self.api.endpoint(&["api", "classes"]))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(classes)
    }

    /// Class list for the form; falls back to the built-in list when the
    /// service cannot be reached.
    pub async fn list_or_fallback(&self) -> Vec<ClassRef> {
        match self.fetch().await {
            Ok(classes) => classes,
            Err(e) => {
                tracing::warn!("Class listing unavailable, using built-in list: {}", e);
                fallback_classes()
            }
        }
    }
}
