//! HTTP client for a remote visualizer server's listing/fetch endpoints

use async_trait::async_trait;
use url::Url;

use super::{DocumentSource, FileEntry};
use crate::error::SourceError;

#[derive(Debug, Clone)]
pub struct RemoteSource {
    base_url: Url,
    client: reqwest::Client,
}

impl RemoteSource {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let mut base_url = Url::parse(base_url)?;
        // Relative joins drop the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn files_url(&self) -> Result<Url, SourceError> {
        Ok(self.base_url.join("api/files")?)
    }

    pub fn file_url(&self, name: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.join("api/file")?;
        url.query_pairs_mut().append_pair("filename", name);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, SourceError> {
        tracing::debug!(%url, "remote request");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SourceError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DocumentSource for RemoteSource {
    async fn list(&self) -> Result<Vec<FileEntry>, SourceError> {
        let response = self.get(self.files_url()?).await?;
        Ok(response.json().await?)
    }

    async fn fetch(&self, name: &str) -> Result<String, SourceError> {
        let response = self.get(self.file_url(name)?).await?;
        Ok(response.text().await?)
    }
}
