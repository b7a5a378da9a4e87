// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

use pw_primitives::{AttributeKey, CollectionId, NftId, ParseAttributeError};
use thiserror::Error;

/// Result type used by the Phala World client.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the Phala World pallets.
#[derive(Error, Debug)]
pub enum Error {
	/// A [`subxt::Error`] wrapper error.
	#[error(transparent)]
	Subxt(#[from] subxt::Error),
	/// A [`subxt::error::DecodeError`] wrapper error.
	#[error(transparent)]
	DecodeValue(#[from] subxt::error::DecodeError),
	/// A [`codec::Error`] wrapper error.
	#[error("failed to decode {entry}: {error}")]
	Decode { entry: &'static str, error: codec::Error },
	/// The sale pallet has no collection configured for the given NFT kind.
	#[error("{0} collection id is not configured")]
	CollectionNotConfigured(&'static str),
	/// The NFT has no attribute with the given key.
	#[error("attribute {key} is not set for NFT {nft_id} of collection {collection_id}")]
	MissingAttribute { collection_id: CollectionId, nft_id: NftId, key: AttributeKey },
	#[error(transparent)]
	InvalidAttribute(#[from] ParseAttributeError),
	/// Storage key or value has a shape that doesn't match the pallet declaration.
	#[error("unexpected layout of {entry}")]
	UnexpectedLayout { entry: &'static str },
	#[error("invalid secret URI: {0}")]
	InvalidSecretUri(String),
}

impl Error {
	pub(crate) fn decode(entry: &'static str) -> impl FnOnce(codec::Error) -> Self {
		move |error| Error::Decode { entry, error }
	}
}
