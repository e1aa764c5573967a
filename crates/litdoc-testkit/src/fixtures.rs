//! Test fixtures and scripted collaborators.
//!
//! Common setup code for unlock and packaging integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use litdoc_core::{bundle_data_url, encrypt_files, encrypt_text, EmbeddedState, SymmetricKey};
use litdoc_packager::{FetchedPackage, PackageRegistry, PackagerError};
use litdoc_unlock::{
    AuthOutcome, AuthSig, AuthSigner, ChannelMessenger, Collaborators, FrameMessage, KeyRequest,
    LitRuntime, MemoryView, NetworkClient,
};
use serde_json::{json, Value};
use tokio::sync::{mpsc, Notify};

/// Content shown before unlocking in every fixture.
pub const PUBLIC_CONTENT: &str = "<p>This content is locked.</p>";

/// An auth proof with fixed contents.
pub fn sample_auth_sig() -> AuthSig {
    AuthSig {
        sig: "0x18a173d68d2f78cc5c13da0f2e1d8a5dd1d9c6d3e5f1".into(),
        derived_via: "web3.eth.personal.sign".into(),
        signed_message: "I am creating an account to use LITs".into(),
        address: "0x9b9f6e4f1c8f1c3f2c4f7e1b1d1a0c9b8a7f6e5d".into(),
    }
}

/// A token-holding condition in the shape the network evaluates.
pub fn sample_conditions() -> Vec<Value> {
    vec![json!({
        "contractAddress": "0x3110c39b428221012934A7F617913b095BC1078C",
        "chain": "ethereum",
        "standardContractType": "ERC1155",
        "method": "balanceOf",
        "parameters": [":userAddress", "9541"],
        "returnValueTest": { "comparator": ">", "value": "0" }
    })]
}

/// Key-release network with a scripted answer.
pub struct ScriptedNetwork {
    ready: AtomicBool,
    key: Option<SymmetricKey>,
    gate: Option<Arc<Notify>>,
    requests: Mutex<Vec<KeyRequest>>,
}

impl ScriptedNetwork {
    /// Releases `key` to anyone.
    pub fn releasing(key: SymmetricKey) -> Self {
        Self::answering(Some(key))
    }

    /// Refuses every request.
    pub fn refusing() -> Self {
        Self::answering(None)
    }

    fn answering(key: Option<SymmetricKey>) -> Self {
        Self {
            ready: AtomicBool::new(true),
            key,
            gate: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Hold every answer until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Flip whether the network reports itself connected.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<KeyRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkClient for ScriptedNetwork {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn get_encryption_key(
        &self,
        request: &KeyRequest,
    ) -> litdoc_unlock::Result<Option<SymmetricKey>> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.key.clone())
    }
}

/// Wallet signer with a scripted answer.
pub struct ScriptedSigner {
    outcome: AuthOutcome,
    calls: AtomicUsize,
}

impl ScriptedSigner {
    /// Always signs with [`sample_auth_sig`].
    pub fn signing() -> Self {
        Self {
            outcome: AuthOutcome::Signed(sample_auth_sig()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always reports the wallet is on another chain.
    pub fn wrong_chain() -> Self {
        Self {
            outcome: AuthOutcome::WrongChain,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of signing requests seen.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthSigner for ScriptedSigner {
    async fn check_and_sign(&self, _chain: &str) -> litdoc_unlock::Result<AuthOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

/// Registry serving packages from a map, counting fetches.
#[derive(Default)]
pub struct StaticRegistry {
    packages: HashMap<String, FetchedPackage>,
    fetches: AtomicUsize,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as JavaScript under `name`.
    pub fn with_script(mut self, name: &str, body: &str) -> Self {
        self.packages.insert(
            name.to_string(),
            FetchedPackage {
                content_type: Some("application/javascript".into()),
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    /// Number of registry fetches, hits and misses alike.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageRegistry for StaticRegistry {
    async fn fetch(&self, package: &str) -> litdoc_packager::Result<FetchedPackage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| PackagerError::PackageFetchFailure {
                package: package.to_string(),
                status: "404 Not Found".into(),
            })
    }
}

/// A runtime wired to scripted collaborators.
pub struct RuntimeFixture {
    pub runtime: LitRuntime,
    pub view: Arc<MemoryView>,
    pub network: Arc<ScriptedNetwork>,
    pub signer: Arc<ScriptedSigner>,
    /// Messages posted to the parent frame.
    pub parent: mpsc::UnboundedReceiver<FrameMessage>,
    /// The key the bundle was sealed with.
    pub key: SymmetricKey,
    pub embedded: EmbeddedState,
}

/// Builder for [`RuntimeFixture`].
pub struct RuntimeFixtureBuilder {
    secret: String,
    files: Option<Vec<(String, Vec<u8>)>>,
    chain: String,
    use_proxy: bool,
    release_key: bool,
    wrong_chain: bool,
    network_ready: bool,
    gate: Option<Arc<Notify>>,
}

impl RuntimeFixture {
    /// Start building a fixture whose bundle holds `secret`.
    pub fn builder(secret: &str) -> RuntimeFixtureBuilder {
        RuntimeFixtureBuilder {
            secret: secret.to_string(),
            files: None,
            chain: "ethereum".into(),
            use_proxy: false,
            release_key: true,
            wrong_chain: false,
            network_ready: true,
            gate: None,
        }
    }
}

impl RuntimeFixtureBuilder {
    /// Chain the document is gated on.
    pub fn chain(mut self, chain: &str) -> Self {
        self.chain = chain.to_string();
        self
    }

    /// Seal a file set instead of the secret text. The bundle then has no
    /// primary entry.
    pub fn files(mut self, files: Vec<(String, Vec<u8>)>) -> Self {
        self.files = Some(files);
        self
    }

    /// Route key requests through the parent frame.
    pub fn proxy(mut self) -> Self {
        self.use_proxy = true;
        self
    }

    /// The network refuses to release the key.
    pub fn unauthorized(mut self) -> Self {
        self.release_key = false;
        self
    }

    /// The wallet is connected to another chain.
    pub fn wrong_chain(mut self) -> Self {
        self.wrong_chain = true;
        self
    }

    /// The network has not finished connecting.
    pub fn network_not_ready(mut self) -> Self {
        self.network_ready = false;
        self
    }

    /// Hold key release until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Seal the secret, embed it, and build a ready runtime.
    pub fn build(self) -> RuntimeFixture {
        let sealed = match self.files {
            Some(files) => encrypt_files(files),
            None => encrypt_text(&self.secret),
        }
        .expect("sealing fixture content");

        let mut network = if self.release_key {
            ScriptedNetwork::releasing(sealed.key.clone())
        } else {
            ScriptedNetwork::refusing()
        };
        if let Some(gate) = self.gate {
            network = network.gated(gate);
        }
        network.set_ready(self.network_ready);
        let network = Arc::new(network);

        let signer = Arc::new(if self.wrong_chain {
            ScriptedSigner::wrong_chain()
        } else {
            ScriptedSigner::signing()
        });
        let view = Arc::new(MemoryView::new(PUBLIC_CONTENT));
        let (messenger, parent) = ChannelMessenger::new();

        let embedded = EmbeddedState {
            encrypted_zip_data_url: bundle_data_url(&sealed.bundle),
            access_control_conditions: sample_conditions(),
            chain: self.chain,
            encrypted_symmetric_key: hex::encode(b"gated key ciphertext"),
            locked: true,
            use_lit_post_message_proxy: self.use_proxy,
        };

        let collaborators = Collaborators {
            network: network.clone(),
            signer: signer.clone(),
            messenger: Arc::new(messenger),
            view: view.clone(),
        };
        let runtime = LitRuntime::from_embedded(embedded.clone(), collaborators);
        runtime.on_ready();

        RuntimeFixture {
            runtime,
            view,
            network,
            signer,
            parent,
            key: sealed.key,
            embedded,
        }
    }
}
