//! # litdoc unlock
//!
//! The runtime that lives inside a packaged document and turns it from
//! locked to unlocked and back.
//!
//! ## Overview
//!
//! Unlocking a document runs one attempt at a time:
//!
//! 1. Snapshot the public content (first time only)
//! 2. Check the key-release network is connected (skipped in proxy mode)
//! 3. Ask the wallet for an auth proof on the document's chain
//! 4. Ask the network, or the parent frame in proxy mode, for the key
//! 5. Decrypt the bundle and swap in its primary text
//!
//! Refusals along the way are reported as [`ToggleOutcome::Aborted`] and
//! leave the document locked.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use litdoc_unlock::{Collaborators, LitRuntime, ToggleOutcome};
//!
//! async fn example(state: litdoc_core::EmbeddedState, collaborators: Collaborators) {
//!     let runtime = LitRuntime::from_embedded(state, collaborators);
//!     runtime.on_ready();
//!
//!     match runtime.toggle_lock().await {
//!         Ok(ToggleOutcome::Unlocked) => println!("unlocked"),
//!         Ok(other) => println!("{other:?}"),
//!         Err(e) => eprintln!("unlock failed: {e}"),
//!     }
//! }
//! ```

pub mod collaborators;
pub mod error;
pub mod machine;
pub mod messages;

pub use collaborators::{
    memory::ChannelMessenger, memory::MemoryView, memory::ViewState, AuthOutcome, AuthSigner,
    Collaborators, DocumentView, FrameMessenger, NetworkClient,
};
pub use error::{Result, UnlockError};
pub use machine::{
    AbortReason, LitRuntime, LitState, LockState, RuntimeConfig, ToggleOutcome, LOCKED_HEADER,
    UNLOCKED_HEADER,
};
pub use messages::{
    AuthSig, FrameMessage, KeyRequest, GET_ENCRYPTION_KEY_COMMAND, LIT_NODE_CLIENT_TARGET,
};
