//! Capabilities the unlock runtime depends on.
//!
//! The runtime never talks to a wallet, the key-release network, or the
//! page directly. Hosts supply implementations of these traits; the
//! [`memory`] module has in-process ones for tests and headless use.

use std::sync::Arc;

use async_trait::async_trait;
use litdoc_core::SymmetricKey;

use crate::error::Result;
use crate::messages::{AuthSig, FrameMessage, KeyRequest};

/// Client of the key-release network.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Whether the client has finished connecting.
    fn is_ready(&self) -> bool;

    /// Ask the network to release the bundle key.
    ///
    /// `Ok(None)` means the network refused, usually because the
    /// requester does not satisfy the conditions.
    async fn get_encryption_key(&self, request: &KeyRequest) -> Result<Option<SymmetricKey>>;
}

/// Result of asking the wallet for an auth proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The wallet signed.
    Signed(AuthSig),
    /// The wallet is connected to a different chain.
    WrongChain,
}

/// Wallet-side signer.
#[async_trait]
pub trait AuthSigner: Send + Sync {
    /// Produce an auth proof for `chain`.
    async fn check_and_sign(&self, chain: &str) -> Result<AuthOutcome>;
}

/// Channel to the embedding parent frame.
#[async_trait]
pub trait FrameMessenger: Send + Sync {
    /// Post `message` to the parent; delivery is not acknowledged.
    async fn send_to_parent(&self, message: FrameMessage) -> Result<()>;
}

/// The document surface the runtime reads and writes.
pub trait DocumentView: Send + Sync {
    /// Current HTML of the content region.
    fn content(&self) -> String;
    /// Replace the content region.
    fn set_content(&self, html: &str);
    /// Set the LOCKED/UNLOCKED header text.
    fn set_header(&self, text: &str);
    /// Enable or disable the unlock control.
    fn set_unlock_enabled(&self, enabled: bool);
    /// Hide the loading spinner and clear the loading text.
    fn hide_loading(&self);
    /// Show a message to the user.
    fn notify(&self, message: &str);
}

/// Everything a [`crate::LitRuntime`] talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub network: Arc<dyn NetworkClient>,
    pub signer: Arc<dyn AuthSigner>,
    pub messenger: Arc<dyn FrameMessenger>,
    pub view: Arc<dyn DocumentView>,
}

/// In-memory collaborators.
pub mod memory {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    use crate::error::UnlockError;

    /// Snapshot of what a [`MemoryView`] currently shows.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ViewState {
        pub content: String,
        pub header: String,
        pub unlock_enabled: bool,
        pub loading_visible: bool,
        pub notifications: Vec<String>,
    }

    /// A document view backed by plain strings.
    #[derive(Debug, Default)]
    pub struct MemoryView {
        state: Mutex<ViewState>,
    }

    impl MemoryView {
        /// A view showing `content` with the loading indicators visible.
        pub fn new(content: impl Into<String>) -> Self {
            Self {
                state: Mutex::new(ViewState {
                    content: content.into(),
                    header: "LOCKED".into(),
                    unlock_enabled: false,
                    loading_visible: true,
                    notifications: Vec::new(),
                }),
            }
        }

        /// Copy of the current view state.
        pub fn snapshot(&self) -> ViewState {
            self.state.lock().unwrap().clone()
        }
    }

    impl DocumentView for MemoryView {
        fn content(&self) -> String {
            self.state.lock().unwrap().content.clone()
        }

        fn set_content(&self, html: &str) {
            self.state.lock().unwrap().content = html.to_string();
        }

        fn set_header(&self, text: &str) {
            self.state.lock().unwrap().header = text.to_string();
        }

        fn set_unlock_enabled(&self, enabled: bool) {
            self.state.lock().unwrap().unlock_enabled = enabled;
        }

        fn hide_loading(&self) {
            self.state.lock().unwrap().loading_visible = false;
        }

        fn notify(&self, message: &str) {
            self.state
                .lock()
                .unwrap()
                .notifications
                .push(message.to_string());
        }
    }

    /// Frame messenger that forwards onto a channel.
    pub struct ChannelMessenger {
        sender: mpsc::UnboundedSender<FrameMessage>,
    }

    impl ChannelMessenger {
        /// Create a messenger and the receiving end the "parent" reads.
        pub fn new() -> (Self, mpsc::UnboundedReceiver<FrameMessage>) {
            let (sender, receiver) = mpsc::unbounded_channel();
            (Self { sender }, receiver)
        }
    }

    #[async_trait]
    impl FrameMessenger for ChannelMessenger {
        async fn send_to_parent(&self, message: FrameMessage) -> Result<()> {
            self.sender
                .send(message)
                .map_err(|_| UnlockError::Collaborator("parent frame went away".into()))
        }
    }
}
