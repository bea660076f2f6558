use crate::{models::student::StudentPage, services::api::ApiClient};

/// Paged listing of registered students.
#[derive(Debug, Clone)]
pub struct StudentDirectory {
    api: ApiClient,
}

impl StudentDirectory {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn page(&self, page: usize) -> anyhow::Result<StudentPage> {
        let mut url = self.api.endpoint(&["api", "students"]);
        url.query_pairs_mut().append_pair("page", &page.to_string());

        let listing = self
            .api
            .http()
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(listing)
    }
}
