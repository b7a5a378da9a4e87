// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Client of the Phala World NFT sale and incubation pallets.
//!
//! The client talks to a node through the dynamic `subxt` API, so it does not depend on the
//! runtime metadata at compile time. Storage reads are exposed through the
//! [`PhalaWorldStorage`] trait, which the client-side logic of [`queries`] is generic over.

pub mod calls;
pub mod queries;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_storage;

mod client;
mod error;
mod signer;
mod storage;

pub use client::{Client, ConnectionParams, TransactionOutcome};
pub use error::{Error, Result};
pub use signer::{sign_overlord_message, verify_overlord_message, Signer};
pub use storage::{NftInfo, PhalaWorldStorage, ResourceInfo};

/// Log target of the client.
pub const LOG_TARGET: &str = "phala-world";
