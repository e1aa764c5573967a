//! Unlock state machine.
//!
//! ```text
//!            toggle_lock (authorized)
//!   Locked ──────────► Unlocking ──────────► Unlocked
//!     ▲                    │                    │
//!     │      aborted       │                    │
//!     └────────────────────┘                    │
//!     └──────────────── toggle_lock ────────────┘
//! ```
//!
//! `Unlocking` only exists while an attempt is in flight. A failed or
//! refused attempt leaves the runtime and the view exactly as they were.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use litdoc_core::{bundle_from_data_url, decrypt_bundle, EmbeddedState, SymmetricKey};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::collaborators::{AuthOutcome, Collaborators};
use crate::error::Result;
use crate::messages::{FrameMessage, KeyRequest};

/// Header text while the content is locked.
pub const LOCKED_HEADER: &str = "LOCKED";
/// Header text once the content is unlocked.
pub const UNLOCKED_HEADER: &str = "UNLOCKED";

const NETWORK_NOT_READY_NOTICE: &str =
    "The LIT network is still connecting. Please try again in about 10 seconds.";

/// Runtime configuration, normally taken from the embedded state.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Chain the conditions are evaluated on.
    pub chain: String,
    /// Route key requests through the parent frame.
    pub use_proxy: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            chain: "ethereum".to_string(),
            use_proxy: false,
        }
    }
}

/// Mutable runtime state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LitState {
    /// Whether the locked content is hidden.
    pub locked: bool,
    /// Content shown before the first unlock, restored on relock.
    pub public_content: Option<String>,
    /// Set once the runtime's dependencies have loaded.
    pub ready: bool,
}

/// Observable lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocking,
    Unlocked,
}

/// Why a toggle did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The unlock control is not enabled yet.
    ControlDisabled,
    /// Another attempt is still running.
    AttemptInFlight,
    /// The network client has not finished connecting.
    NetworkNotReady,
    /// The wallet is on a different chain.
    WrongChain { expected: String },
    /// The network refused to release the key.
    Unauthorized,
}

/// What a call to [`LitRuntime::toggle_lock`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The content was decrypted and swapped in.
    Unlocked,
    /// The public content was restored.
    Relocked,
    /// The key request went to the parent frame; the host will call
    /// [`LitRuntime::unlock_with_key`] when the key arrives.
    ProxyRequested,
    /// Nothing changed.
    Aborted(AbortReason),
}

/// Clears the in-flight flag when an attempt ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The in-document unlock runtime.
pub struct LitRuntime {
    config: RuntimeConfig,
    encrypted_zip_data_url: String,
    access_control_conditions: Vec<Value>,
    encrypted_symmetric_key: String,
    collaborators: Collaborators,
    state: Mutex<LitState>,
    in_flight: AtomicBool,
}

impl LitRuntime {
    /// Build a runtime from the state a packaged document carries.
    pub fn from_embedded(embedded: EmbeddedState, collaborators: Collaborators) -> Self {
        let config = RuntimeConfig {
            chain: embedded.chain,
            use_proxy: embedded.use_lit_post_message_proxy,
        };
        Self {
            config,
            encrypted_zip_data_url: embedded.encrypted_zip_data_url,
            access_control_conditions: embedded.access_control_conditions,
            encrypted_symmetric_key: embedded.encrypted_symmetric_key,
            collaborators,
            state: Mutex::new(LitState {
                locked: embedded.locked,
                public_content: None,
                ready: false,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runtime configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> LitState {
        self.state().clone()
    }

    /// Current lock state.
    pub fn lock_state(&self) -> LockState {
        let locked = self.state().locked;
        match (locked, self.in_flight.load(Ordering::Acquire)) {
            (false, _) => LockState::Unlocked,
            (true, true) => LockState::Unlocking,
            (true, false) => LockState::Locked,
        }
    }

    /// Called once the runtime's dependencies have loaded.
    pub fn on_ready(&self) {
        self.state().ready = true;
        let view = &self.collaborators.view;
        view.set_unlock_enabled(true);
        view.hide_loading();
        info!(chain = %self.config.chain, proxy = self.config.use_proxy, "runtime ready");
    }

    /// Unlock if locked, relock if unlocked.
    pub async fn toggle_lock(&self) -> Result<ToggleOutcome> {
        if !self.state().ready {
            return Ok(ToggleOutcome::Aborted(AbortReason::ControlDisabled));
        }
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("toggle ignored, attempt already in flight");
            return Ok(ToggleOutcome::Aborted(AbortReason::AttemptInFlight));
        };

        if self.state().locked {
            self.attempt_unlock().await
        } else {
            self.relock();
            Ok(ToggleOutcome::Relocked)
        }
    }

    /// Decrypt the bundle with `key` and show its primary text.
    ///
    /// Everything is decoded before the view is touched; on error the
    /// runtime stays locked and the view unchanged.
    pub fn unlock_with_key(&self, key: &SymmetricKey) -> Result<()> {
        let bundle = bundle_from_data_url(&self.encrypted_zip_data_url)?;
        let archive = decrypt_bundle(&bundle, key)?;
        let html = archive.primary_text()?;

        let view = &self.collaborators.view;
        let mut state = self.state();
        if state.public_content.is_none() {
            state.public_content = Some(view.content());
        }
        view.set_content(html);
        view.set_header(UNLOCKED_HEADER);
        state.locked = false;

        info!(entries = archive.len(), "document unlocked");
        Ok(())
    }

    async fn attempt_unlock(&self) -> Result<ToggleOutcome> {
        let Collaborators {
            network,
            signer,
            messenger,
            view,
        } = &self.collaborators;
        let chain = &self.config.chain;

        // Phase 1: remember what the public sees
        {
            let mut state = self.state();
            if state.public_content.is_none() {
                state.public_content = Some(view.content());
            }
        }

        // Phase 2: the network must be connected unless the parent fetches
        if !self.config.use_proxy && !network.is_ready() {
            view.notify(NETWORK_NOT_READY_NOTICE);
            return Ok(ToggleOutcome::Aborted(AbortReason::NetworkNotReady));
        }

        // Phase 3: auth proof
        let auth_sig = match signer.check_and_sign(chain).await? {
            AuthOutcome::Signed(sig) => sig,
            AuthOutcome::WrongChain => {
                warn!(expected = %chain, "wallet on wrong chain");
                view.notify(&format!(
                    "You are connected to the wrong blockchain. Please switch your wallet to {chain}"
                ));
                return Ok(ToggleOutcome::Aborted(AbortReason::WrongChain {
                    expected: chain.clone(),
                }));
            }
        };

        let request = KeyRequest {
            access_control_conditions: self.access_control_conditions.clone(),
            to_decrypt: self.encrypted_symmetric_key.clone(),
            auth_sig,
            chain: chain.clone(),
        };

        // Phase 4: key release
        if self.config.use_proxy {
            messenger
                .send_to_parent(FrameMessage::get_encryption_key(request))
                .await?;
            debug!("key request handed to parent frame");
            return Ok(ToggleOutcome::ProxyRequested);
        }

        let Some(key) = network.get_encryption_key(&request).await? else {
            debug!("network declined to release key");
            return Ok(ToggleOutcome::Aborted(AbortReason::Unauthorized));
        };

        // Phase 5: decrypt and swap
        self.unlock_with_key(&key)?;
        Ok(ToggleOutcome::Unlocked)
    }

    fn relock(&self) {
        let view = &self.collaborators.view;
        let mut state = self.state();
        if let Some(public) = &state.public_content {
            view.set_content(public);
        }
        view.set_header(LOCKED_HEADER);
        state.locked = true;
        info!("document relocked");
    }

    fn state(&self) -> MutexGuard<'_, LitState> {
        self.state.lock().unwrap()
    }
}
