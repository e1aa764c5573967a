//! End-to-end publishing: encrypt, gate the key, package.

use std::sync::Arc;

use async_trait::async_trait;
use litdoc_core::{
    bundle_data_url, encrypt_files, encrypt_text, AccessControlCondition, SymmetricKey,
};
use litdoc_packager::{LitDocument, PackageRegistry, PackageRequest, Packager};
use serde_json::Value;
use tracing::info;

use crate::error::Result;

/// Stores a bundle key with the key-release network.
#[async_trait]
pub trait KeyGate: Send + Sync {
    /// Encrypt `key` under `conditions` and return the gated ciphertext.
    async fn save_encryption_key(
        &self,
        key: &SymmetricKey,
        conditions: &[Value],
        chain: &str,
    ) -> Result<Vec<u8>>;
}

/// What gets locked.
#[derive(Debug, Clone)]
pub enum LockedContent {
    /// HTML shown in the content region once unlocked.
    Text(String),
    /// Named files placed under the asset folder.
    Files(Vec<(String, Vec<u8>)>),
}

/// Inputs of one publish call.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Document title.
    pub title: String,
    /// Public markup shown while locked.
    pub html_body: String,
    pub css: String,
    /// Content sealed into the bundle.
    pub content: LockedContent,
    /// Conditions the key is gated under, before canonicalization.
    pub access_control_conditions: Vec<AccessControlCondition>,
    pub chain: String,
    /// Registry packages inlined into the document.
    pub npm_packages: Vec<String>,
    /// Route key requests through the parent frame.
    pub use_proxy: bool,
}

/// A published document and the key its bundle was sealed with.
///
/// The key is returned for hosts that unlock out of band (proxy mode);
/// it is not embedded anywhere in `document`.
pub struct Published {
    pub document: LitDocument,
    pub key: SymmetricKey,
}

/// Runs the whole locking pipeline.
pub struct Publisher<R: PackageRegistry> {
    packager: Packager<R>,
    key_gate: Arc<dyn KeyGate>,
}

impl<R: PackageRegistry> Publisher<R> {
    /// Combine a packager with the gate that stores bundle keys.
    pub fn new(packager: Packager<R>, key_gate: Arc<dyn KeyGate>) -> Self {
        Self { packager, key_gate }
    }

    /// The packager documents are rendered with.
    pub fn packager(&self) -> &Packager<R> {
        &self.packager
    }

    /// Encrypt the content, gate its key, and package the document.
    ///
    /// Conditions are canonicalized once, with the packager's formatter, and
    /// the same list is both gated and embedded.
    pub async fn publish(&self, request: PublishRequest) -> Result<Published> {
        let sealed = match request.content {
            LockedContent::Text(text) => encrypt_text(&text)?,
            LockedContent::Files(files) => encrypt_files(files)?,
        };

        let conditions = self
            .packager
            .canonicalize_conditions(&request.access_control_conditions)?;
        let gated_key = self
            .key_gate
            .save_encryption_key(&sealed.key, &conditions, &request.chain)
            .await?;

        let mut package = PackageRequest::new(
            request.title,
            request.html_body,
            bundle_data_url(&sealed.bundle),
            Vec::new(),
            gated_key,
            request.chain,
        )
        .css(request.css)
        .use_proxy(request.use_proxy);
        package.npm_packages = request.npm_packages;

        let document = self.packager.package_canonical(package, conditions).await?;
        info!(fingerprint = %sealed.bundle.fingerprint(), "published locked document");

        Ok(Published {
            document,
            key: sealed.key,
        })
    }
}
