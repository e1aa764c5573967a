//! The document packager.
//!
//! Resolves embedded runtime packages, canonicalizes access-control
//! conditions, and renders a [`LitDocument`]. Any failure aborts the whole
//! call; no partially built document is ever returned.

use std::sync::Arc;

use litdoc_core::{
    canonicalize_all, encode_data_url, AccessControlCondition, CanonicalFormatter,
    ConditionFormatter, EmbeddedState,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{CacheConfig, PackageCache};
use crate::document::{self, DocumentParts, LitDocument, DEFAULT_RUNTIME_SCRIPT_URL};
use crate::error::Result;
use crate::registry::{HttpRegistry, PackageRegistry, DEFAULT_REGISTRY_ROOT};

/// Media type assumed when the registry does not report one.
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Configuration for the packager.
#[derive(Debug, Clone)]
pub struct PackagerConfig {
    /// Registry root packages are fetched from, including the trailing slash.
    pub registry_root: String,
    /// Runtime script every document loads to drive unlocking.
    pub runtime_script_url: String,
    /// Bounds of the package cache created by [`Packager::new`].
    pub cache: CacheConfig,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            registry_root: DEFAULT_REGISTRY_ROOT.to_string(),
            runtime_script_url: DEFAULT_RUNTIME_SCRIPT_URL.to_string(),
            cache: CacheConfig::default(),
        }
    }
}

/// Inputs of one packaging call.
#[derive(Debug, Clone)]
pub struct PackageRequest {
    /// Document title.
    pub title: String,
    /// Publicly visible HTML; must contain the `unlockButton` element.
    pub html_body: String,
    /// Stylesheet text.
    pub css: String,
    /// Inline reference to the encrypted bundle.
    pub encrypted_bundle_url: String,
    /// Conditions gating key release, in evaluation order.
    pub access_control_conditions: Vec<AccessControlCondition>,
    /// Ciphertext of the bundle key as produced by the key-release network.
    pub encrypted_symmetric_key: Vec<u8>,
    /// Chain the conditions are evaluated on.
    pub chain: String,
    /// Registry packages to embed inline.
    pub npm_packages: Vec<String>,
    /// Route key requests through the parent frame.
    pub use_proxy: bool,
}

impl PackageRequest {
    /// Start a request with the required fields; the rest default to empty.
    pub fn new(
        title: impl Into<String>,
        html_body: impl Into<String>,
        encrypted_bundle_url: impl Into<String>,
        access_control_conditions: Vec<AccessControlCondition>,
        encrypted_symmetric_key: impl Into<Vec<u8>>,
        chain: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            html_body: html_body.into(),
            css: String::new(),
            encrypted_bundle_url: encrypted_bundle_url.into(),
            access_control_conditions,
            encrypted_symmetric_key: encrypted_symmetric_key.into(),
            chain: chain.into(),
            npm_packages: Vec::new(),
            use_proxy: false,
        }
    }

    /// Set the stylesheet.
    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    /// Add a registry package to embed.
    pub fn npm_package(mut self, name: impl Into<String>) -> Self {
        self.npm_packages.push(name.into());
        self
    }

    /// Enable or disable proxy mode.
    pub fn use_proxy(mut self, enabled: bool) -> Self {
        self.use_proxy = enabled;
        self
    }
}

/// Builds locked documents.
pub struct Packager<R: PackageRegistry = HttpRegistry> {
    registry: R,
    cache: Arc<PackageCache>,
    formatter: Arc<dyn ConditionFormatter>,
    config: PackagerConfig,
}

impl Packager<HttpRegistry> {
    /// Create a packager fetching over HTTP from `config.registry_root`.
    pub fn from_config(config: PackagerConfig) -> Self {
        let registry = HttpRegistry::new(config.registry_root.clone());
        Self::new(registry, config)
    }
}

impl<R: PackageRegistry> Packager<R> {
    /// Create a packager with its own cache and the canonical formatter.
    pub fn new(registry: R, config: PackagerConfig) -> Self {
        Self {
            registry,
            cache: Arc::new(PackageCache::new(config.cache.clone())),
            formatter: Arc::new(CanonicalFormatter),
            config,
        }
    }

    /// Share a process-wide cache with other packagers.
    pub fn with_cache(mut self, cache: Arc<PackageCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Use a different condition formatter.
    pub fn with_formatter(mut self, formatter: Arc<dyn ConditionFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// The cache this packager reads and fills.
    pub fn cache(&self) -> &Arc<PackageCache> {
        &self.cache
    }

    /// Resolve a package to an inline data URL, fetching it on a cache miss.
    pub async fn resolve_package_asset(&self, name: &str) -> Result<String> {
        if let Some(data_url) = self.cache.get(name) {
            debug!(package = name, "package cache hit");
            return Ok(data_url);
        }

        let fetched = self.registry.fetch(name).await?;
        let media_type = fetched
            .content_type
            .as_deref()
            .unwrap_or(FALLBACK_MEDIA_TYPE);
        let data_url = encode_data_url(media_type, &fetched.body);
        debug!(package = name, bytes = fetched.body.len(), "package fetched");

        self.cache.insert(name, data_url.clone());
        Ok(data_url)
    }

    /// Canonicalize conditions with this packager's formatter.
    pub fn canonicalize_conditions(
        &self,
        conditions: &[AccessControlCondition],
    ) -> Result<Vec<Value>> {
        Ok(canonicalize_all(self.formatter.as_ref(), conditions)?)
    }

    /// Package a locked document.
    pub async fn package(&self, request: PackageRequest) -> Result<LitDocument> {
        let conditions = self.canonicalize_conditions(&request.access_control_conditions)?;
        self.package_canonical(request, conditions).await
    }

    /// Package a document whose conditions were already canonicalized.
    ///
    /// `conditions` is embedded as given; the request's own condition list
    /// is not consulted.
    pub async fn package_canonical(
        &self,
        request: PackageRequest,
        conditions: Vec<Value>,
    ) -> Result<LitDocument> {
        let mut script_tags = String::new();
        for name in &request.npm_packages {
            let data_url = self.resolve_package_asset(name).await?;
            script_tags.push_str(&document::script_tag(&data_url));
        }

        let state = EmbeddedState {
            encrypted_zip_data_url: request.encrypted_bundle_url,
            access_control_conditions: conditions,
            chain: request.chain,
            encrypted_symmetric_key: hex::encode(&request.encrypted_symmetric_key),
            locked: true,
            use_lit_post_message_proxy: request.use_proxy,
        };

        let html = document::render(&DocumentParts {
            title: &request.title,
            css: &request.css,
            html_body: &request.html_body,
            script_tags: &script_tags,
            runtime_script_url: &self.config.runtime_script_url,
            state: &state,
        });

        info!(
            chain = %state.chain,
            conditions = state.access_control_conditions.len(),
            packages = request.npm_packages.len(),
            "packaged locked document"
        );

        Ok(LitDocument { html, state })
    }
}
