// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Storage of the Phala World pallets, as seen by the client.

use crate::{Error, Result};
use async_trait::async_trait;
use pw_primitives::{
	AccountId, CollectionId, EraId, FoodStat, NftId, NftSaleInfo, PreorderId, PreorderInfo,
	RaceType, RarityType, ResourceId, SaleStatus,
};
use subxt::ext::scale_value::{Composite, Value, ValueDef};

/// RMRK NFT details, decoded with the runtime metadata.
pub type NftInfo = subxt::dynamic::DecodedValue;
/// RMRK resource details, decoded with the runtime metadata.
pub type ResourceInfo = subxt::dynamic::DecodedValue;

/// Storage reads of the `PWNftSale`, `PWIncubation`, `RmrkCore` and `Uniques` pallets.
///
/// Every call reads the latest state known to the node.
#[async_trait]
pub trait PhalaWorldStorage: Send + Sync {
	/// Collection that holds spirit NFTs.
	async fn spirit_collection_id(&self) -> Result<Option<CollectionId>>;
	/// Collection that holds Origin of Shell NFTs.
	async fn origin_of_shell_collection_id(&self) -> Result<Option<CollectionId>>;
	/// Current incubation era.
	async fn era(&self) -> Result<EraId>;
	/// Timestamp of the first day of the sale.
	async fn zero_day(&self) -> Result<Option<u64>>;
	/// Identifier that the next preorder will get.
	async fn preorder_index(&self) -> Result<PreorderId>;
	/// All pending preorders.
	async fn preorders(&self) -> Result<Vec<(PreorderId, PreorderInfo)>>;
	/// Sale and incubation switches.
	async fn sale_status(&self) -> Result<SaleStatus>;
	/// Inventory counters of every race of given rarity.
	async fn inventory(&self, rarity: RarityType) -> Result<Vec<(RaceType, NftSaleInfo)>>;
	/// NFTs of `collection_id` owned by `owner`.
	async fn account_nfts(&self, owner: &AccountId, collection_id: CollectionId)
		-> Result<Vec<NftId>>;
	/// All NFTs of the collection.
	async fn nfts(&self, collection_id: CollectionId) -> Result<Vec<(NftId, NftInfo)>>;
	/// Single NFT of the collection.
	async fn nft(&self, collection_id: CollectionId, nft_id: NftId) -> Result<Option<NftInfo>>;
	/// Identifier that the next NFT minted into the collection will get.
	async fn next_nft_id(&self, collection_id: CollectionId) -> Result<NftId>;
	/// All `(key, value)` attributes of the NFT (or of the collection itself if `nft_id` is `None`).
	async fn attributes(
		&self,
		collection_id: CollectionId,
		nft_id: Option<NftId>,
	) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
	/// Value of a single attribute.
	async fn attribute(
		&self,
		collection_id: CollectionId,
		nft_id: Option<NftId>,
		key: &[u8],
	) -> Result<Option<Vec<u8>>>;
	/// Hatch timestamps of the Origin of Shells of the collection.
	async fn hatch_times(&self, collection_id: CollectionId) -> Result<Vec<(NftId, u64)>>;
	/// Feeding statistics of every Origin of Shell fed during the era, in storage order.
	async fn food_stats(&self, era: EraId) -> Result<Vec<FoodStat>>;
	/// Number of times the Origin of Shell was fed during the era.
	async fn food_stat(&self, era: EraId, collection_id: CollectionId, nft_id: NftId)
		-> Result<u32>;
	/// Resources attached to the NFT.
	async fn resources(
		&self,
		collection_id: CollectionId,
		nft_id: NftId,
	) -> Result<Vec<(ResourceId, ResourceInfo)>>;
}

/// Interpret dynamic value as an unsigned integer that fits into `N`.
pub(crate) fn value_as<N: TryFrom<u128>, T>(value: &Value<T>, entry: &'static str) -> Result<N> {
	value
		.as_u128()
		.and_then(|n| N::try_from(n).ok())
		.ok_or(Error::UnexpectedLayout { entry })
}

/// Interpret dynamic value as a byte string, looking through newtype wrappers.
pub(crate) fn value_as_bytes<T>(value: &Value<T>, entry: &'static str) -> Result<Vec<u8>> {
	let mut bytes = Vec::new();
	collect_bytes(value, &mut bytes).ok_or(Error::UnexpectedLayout { entry })?;
	Ok(bytes)
}

fn collect_bytes<T>(value: &Value<T>, bytes: &mut Vec<u8>) -> Option<()> {
	match &value.value {
		ValueDef::Composite(composite) => {
			for inner in composite.values() {
				collect_bytes(inner, bytes)?;
			}
			Some(())
		},
		_ => {
			bytes.push(u8::try_from(value.as_u128()?).ok()?);
			Some(())
		},
	}
}

/// Interpret dynamic value as a fieldless enum variant.
pub(crate) fn value_as_variant<E: std::str::FromStr, T>(
	value: &Value<T>,
	entry: &'static str,
) -> Result<E> {
	match &value.value {
		ValueDef::Variant(variant) => {
			variant.name.parse().map_err(|_| Error::UnexpectedLayout { entry })
		},
		_ => Err(Error::UnexpectedLayout { entry }),
	}
}

/// Interpret dynamic value as a `(CollectionId, NftId)` pair.
pub(crate) fn value_as_nft_pair<T>(
	value: &Value<T>,
	entry: &'static str,
) -> Result<(CollectionId, NftId)> {
	match &value.value {
		ValueDef::Composite(Composite::Unnamed(fields)) if fields.len() == 2 =>
			Ok((value_as(&fields[0], entry)?, value_as(&fields[1], entry)?)),
		_ => Err(Error::UnexpectedLayout { entry }),
	}
}

/// Storage key component at `index`.
pub(crate) fn key_at<'a, T>(
	keys: &'a [Value<T>],
	index: usize,
	entry: &'static str,
) -> Result<&'a Value<T>> {
	keys.get(index).ok_or(Error::UnexpectedLayout { entry })
}

#[cfg(test)]
mod tests {
	use super::*;

	const ENTRY: &str = "Test";

	#[test]
	fn bytes_are_collected_through_newtypes() {
		let bounded = Value::unnamed_composite([Value::from_bytes(b"race")]);

		assert_eq!(value_as_bytes(&bounded, ENTRY).unwrap(), b"race".to_vec());
	}

	#[test]
	fn non_byte_values_are_rejected() {
		let value = Value::unnamed_composite([Value::u128(256)]);

		assert!(value_as_bytes(&value, ENTRY).is_err());
		assert!(value_as::<u8, _>(&Value::u128(256), ENTRY).is_err());
		assert_eq!(value_as::<u32, _>(&Value::u128(256), ENTRY).unwrap(), 256);
	}

	#[test]
	fn storage_keys_are_indexed() {
		let keys = vec![Value::u128(2), Value::u128(5)];

		assert_eq!(value_as::<u32, _>(key_at(&keys, 1, ENTRY).unwrap(), ENTRY).unwrap(), 5);
		assert!(matches!(key_at(&keys, 2, ENTRY), Err(Error::UnexpectedLayout { entry: ENTRY })));
	}

	#[test]
	fn enum_variants_are_parsed() {
		let race = Value::unnamed_variant("XGene", Vec::new());

		assert_eq!(value_as_variant::<RaceType, _>(&race, ENTRY).unwrap(), RaceType::XGene);
		assert!(value_as_variant::<RaceType, _>(&Value::u128(2), ENTRY).is_err());
	}

	#[test]
	fn nft_pairs_are_split() {
		let pair = Value::unnamed_composite([Value::u128(1), Value::u128(4)]);

		assert_eq!(value_as_nft_pair(&pair, ENTRY).unwrap(), (1, 4));
		assert!(value_as_nft_pair(&Value::unnamed_composite([Value::u128(1)]), ENTRY).is_err());
	}
}
