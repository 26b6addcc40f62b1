use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::error::PushError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
    PATCH,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PATCH => reqwest::Method::PATCH,
        }
    }
}

/// JSON client bound to the HR server origin.
///
/// Cookies persist across calls, which stands in for same-origin
/// credentials. Any non-2xx response becomes [`PushError::Network`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: Url,
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Result<Self, PushError> {
        let base = Url::parse(base_url)
            .map_err(|e| PushError::Network(format!("invalid base url {base_url}: {e}")))?;
        let inner = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| PushError::Network(e.to_string()))?;
        Ok(HttpClient { base, inner })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PushError> {
        self.fetch::<T, ()>(HttpMethod::GET, path, None).await
    }

    pub async fn fetch<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, PushError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| PushError::Network(format!("invalid path {path}: {e}")))?;
        log::debug!("[Http] {:?} {}", method, url);

        let mut request = self
            .inner
            .request(method.into(), url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            let json = serde_json::to_vec(body).map_err(|e| PushError::Network(e.to_string()))?;
            request = request.body(json);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PushError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::warn!("[Http] {} {} failed: {}", status.as_u16(), path, text);
            return Err(PushError::from_status(status.as_u16(), text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PushError::Network(e.to_string()))?;
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body)
            .map_err(|e| PushError::Network(format!("invalid response from {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HttpClient::new("::nope"),
            Err(PushError::Network(_))
        ));
    }

    #[test]
    fn joins_absolute_api_paths_onto_origin() {
        let client = HttpClient::new("http://hr.local:5000/app/").unwrap();
        let joined = client.base().join("/api/employees").unwrap();
        assert_eq!(joined.as_str(), "http://hr.local:5000/api/employees");
    }
}
