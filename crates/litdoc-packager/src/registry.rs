//! Package registry abstraction.
//!
//! Runtime assets embedded in a document are fetched by package name from
//! a public registry. The default root is unpkg; tests substitute their
//! own [`PackageRegistry`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::error::{PackagerError, Result};

/// Registry root used when none is configured.
pub const DEFAULT_REGISTRY_ROOT: &str = "https://unpkg.com/";

/// A package body as returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPackage {
    /// Media type reported by the registry, if any.
    pub content_type: Option<String>,
    /// Raw package bytes.
    pub body: Vec<u8>,
}

/// Something that can fetch a package by name.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Fetch a package.
    ///
    /// A non-success response must surface as
    /// [`PackagerError::PackageFetchFailure`] carrying the status text.
    async fn fetch(&self, package: &str) -> Result<FetchedPackage>;
}

#[async_trait]
impl<T: PackageRegistry + ?Sized> PackageRegistry for Arc<T> {
    async fn fetch(&self, package: &str) -> Result<FetchedPackage> {
        (**self).fetch(package).await
    }
}

/// Registry reached over HTTP with `GET {root}{package}`.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: reqwest::Client,
    root: String,
}

impl HttpRegistry {
    /// Create a registry client for the given root URL.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            root: root.into(),
        }
    }

    /// The URL a package is fetched from.
    pub fn package_url(&self, package: &str) -> String {
        format!("{}{}", self.root, package)
    }
}

impl Default for HttpRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_ROOT)
    }
}

#[async_trait]
impl PackageRegistry for HttpRegistry {
    async fn fetch(&self, package: &str) -> Result<FetchedPackage> {
        let url = self.package_url(package);
        debug!(%url, "fetching package");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(package, %status, "registry returned error status");
            return Err(PackagerError::PackageFetchFailure {
                package: package.to_string(),
                status: status.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();

        Ok(FetchedPackage { content_type, body })
    }
}
