use reqwest::Client;
use shared::{
    domain::ContactId,
    error::ApiError,
    protocol::{
        ContactListResponse, ContactRecord, CreateContactRequest, UpdateContactRequest,
    },
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server rejected request with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response payload: {0}")]
    MalformedResponse(String),
}

/// HTTP client for the contact backend. Every method maps to one endpoint;
/// callers decide how failures surface in the UI.
pub struct ContactsClient {
    http: Client,
    server_url: String,
}

impl ContactsClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn list_contacts(&self) -> Result<Vec<ContactRecord>, ClientError> {
        let url = format!("{}/contacts", self.server_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        let response = check_status(response).await?;

        // A body without the `contacts` field is a backend bug; surface it
        // instead of rendering an empty list.
        let body: ContactListResponse = response
            .json()
            .await
            .map_err(|err| ClientError::MalformedResponse(err.to_string()))?;
        debug!(count = body.contacts.len(), "fetched contact list");
        Ok(body.contacts)
    }

    pub async fn create_contact(&self, req: &CreateContactRequest) -> Result<(), ClientError> {
        let url = format!("{}/create_contact", self.server_url);
        let response = self
            .http
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn update_contact(
        &self,
        contact_id: ContactId,
        req: &UpdateContactRequest,
    ) -> Result<(), ClientError> {
        let url = format!("{}/update_contact/{}", self.server_url, contact_id.0);
        let response = self
            .http
            .patch(&url)
            .json(req)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn delete_contact(&self, contact_id: ContactId) -> Result<(), ClientError> {
        let url = format!("{}/delete_contact/{}", self.server_url, contact_id.0);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Prefer the backend's ApiError message when the body carries one.
    let message = match response.json::<ApiError>().await {
        Ok(api_error) => api_error.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
