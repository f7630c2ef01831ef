use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ClientError;
use crate::config::ClusterConfig;

/// JSON over HTTP against the cluster API. Paths are given as segments and
/// each segment is percent-encoded on its own, so database names containing
/// `/` stay a single segment.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    user: Option<String>,
    password: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClusterConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.url).map_err(|e| {
            ClientError::config_error(format!("invalid cluster URL '{}': {e}", config.url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::config_error(format!(
                "cluster URL '{}' cannot be used as a base",
                config.url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("shardmove/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::RequestFailed)?;

        Ok(Self {
            client,
            base_url,
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    pub fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::config_error("cluster URL cannot be used as a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.user {
            Some(user) => request.basic_auth(user, self.password.as_ref()),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T>(&self, segments: &[&str]) -> Result<T, ClientError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.url(segments)?;
        debug!(%url, "GET");
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(ClientError::RequestFailed)?;
        self.handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = self.url(segments)?;
        debug!(%url, "PUT");
        let response = self
            .authorize(self.client.put(url))
            .json(body)
            .send()
            .await
            .map_err(ClientError::RequestFailed)?;
        self.handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = self.url(segments)?;
        debug!(%url, "POST");
        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(ClientError::RequestFailed)?;
        self.handle_response(response).await
    }

    /// Decode a JSON reply, or turn a non-2xx status into `ApiError`.
    async fn handle_response<T>(&self, response: Response) -> Result<T, ClientError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(%status, %body, "request rejected");
            return Err(ClientError::from_response(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}
