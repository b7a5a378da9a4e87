// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Queries that need more than a single storage read.

use crate::{Error, NftInfo, PhalaWorldStorage, Result, LOG_TARGET};
use pw_primitives::{
	AccountId, AttributeKey, CollectionId, EraId, FoodStat, HatchTimeUpdate, NftAttribute, NftId,
	PreorderId, PreorderInfo,
};
use serde::Serialize;

/// NFTs of a collection owned by an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OwnedNfts {
	pub collection_id: CollectionId,
	pub nft_ids: Vec<NftId>,
}

/// Raw attribute of an NFT, along with its typed value when the key is a known one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeEntry {
	pub key: Vec<u8>,
	pub value: Vec<u8>,
	pub typed: Option<NftAttribute>,
}

async fn spirit_collection_id<S: PhalaWorldStorage + ?Sized>(storage: &S) -> Result<CollectionId> {
	storage.spirit_collection_id().await?.ok_or(Error::CollectionNotConfigured("spirit"))
}

async fn origin_of_shell_collection_id<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
) -> Result<CollectionId> {
	storage
		.origin_of_shell_collection_id()
		.await?
		.ok_or(Error::CollectionNotConfigured("origin of shell"))
}

/// Spirits owned by `owner`.
pub async fn spirits_of<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
	owner: &AccountId,
) -> Result<OwnedNfts> {
	let collection_id = spirit_collection_id(storage).await?;
	let nft_ids = storage.account_nfts(owner, collection_id).await?;
	Ok(OwnedNfts { collection_id, nft_ids })
}

/// All Origin of Shells, with the collection they belong to.
pub async fn origin_of_shells<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
) -> Result<(CollectionId, Vec<(NftId, NftInfo)>)> {
	let collection_id = origin_of_shell_collection_id(storage).await?;
	let nfts = storage.nfts(collection_id).await?;
	log::debug!(target: LOG_TARGET, "Collection {collection_id} holds {} Origin of Shells", nfts.len());
	Ok((collection_id, nfts))
}

/// All attributes of an NFT (or of the collection itself).
pub async fn attributes_of<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
	collection_id: CollectionId,
	nft_id: Option<NftId>,
) -> Result<Vec<AttributeEntry>> {
	Ok(storage
		.attributes(collection_id, nft_id)
		.await?
		.into_iter()
		.map(|(key, value)| {
			let typed = std::str::from_utf8(&key)
				.ok()
				.and_then(|key| key.parse::<AttributeKey>().ok())
				.and_then(|key| NftAttribute::decode(key, &value).ok());
			AttributeEntry { key, value, typed }
		})
		.collect())
}

/// Typed attribute of an NFT.
pub async fn nft_attribute<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
	collection_id: CollectionId,
	nft_id: NftId,
	key: AttributeKey,
) -> Result<NftAttribute> {
	let value = storage
		.attribute(collection_id, Some(nft_id), key.as_bytes())
		.await?
		.ok_or(Error::MissingAttribute { collection_id, nft_id, key })?;
	Ok(NftAttribute::decode(key, &value)?)
}

/// Pending preorders, optionally only those of `owner`.
pub async fn preorders_of<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
	owner: Option<&AccountId>,
) -> Result<Vec<(PreorderId, PreorderInfo)>> {
	let mut preorders = storage.preorders().await?;
	if let Some(owner) = owner {
		preorders.retain(|(_, info)| info.owner == *owner);
	}
	Ok(preorders)
}

/// Most fed first. Equally fed Origin of Shells keep their relative order.
pub fn rank_food_stats(mut stats: Vec<FoodStat>, limit: usize) -> Vec<FoodStat> {
	stats.sort_by(|a, b| b.times_fed.cmp(&a.times_fed));
	stats.truncate(limit);
	stats
}

/// Most fed Origin of Shells of `era` (the current era if `None`).
pub async fn top_fed<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
	era: Option<EraId>,
	limit: usize,
) -> Result<(EraId, Vec<FoodStat>)> {
	let era = match era {
		Some(era) => era,
		None => storage.era().await?,
	};
	let stats = storage.food_stats(era).await?;
	log::info!(target: LOG_TARGET, "{} Origin of Shells were fed in era {era}", stats.len());
	Ok((era, rank_food_stats(stats, limit)))
}

/// Hatch time reductions for a ranking, best ranked first.
///
/// Ranked Origin of Shells beyond the end of `reductions` get nothing.
pub fn hatch_time_rewards(ranking: &[FoodStat], reductions: &[u64]) -> Vec<HatchTimeUpdate> {
	ranking
		.iter()
		.zip(reductions)
		.map(|(stat, reduction_secs)| HatchTimeUpdate {
			collection_id: stat.collection_id,
			nft_id: stat.nft_id,
			reduction_secs: *reduction_secs,
		})
		.collect()
}

/// Number of times the Origin of Shell was fed, over all eras up to the current one.
pub async fn total_fed<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
	collection_id: CollectionId,
	nft_id: NftId,
) -> Result<u64> {
	let current_era = storage.era().await?;
	let mut total = 0u64;
	for era in (0..=current_era).rev() {
		total += u64::from(storage.food_stat(era, collection_id, nft_id).await?);
	}
	Ok(total)
}

/// Ids of Origin of Shells whose attribute matches `expected`.
///
/// Every id below `RmrkCore::NextNftId` is checked; NFTs that have no attribute under the
/// expected key, or an unreadable one, don't match.
pub async fn filter_by_attribute<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
	expected: NftAttribute,
) -> Result<Vec<NftId>> {
	let Some(collection_id) = storage.origin_of_shell_collection_id().await? else {
		log::warn!(target: LOG_TARGET, "Origin of Shell collection is not configured");
		return Ok(Vec::new())
	};

	let key = expected.key();
	let next_nft_id = storage.next_nft_id(collection_id).await?;
	let mut matching = Vec::new();
	for nft_id in 0..next_nft_id {
		let Some(value) = storage.attribute(collection_id, Some(nft_id), key.as_bytes()).await?
		else {
			log::debug!(target: LOG_TARGET, "NFT {collection_id}/{nft_id} has no {key} attribute");
			continue
		};
		match NftAttribute::decode(key, &value) {
			Ok(actual) => {
				log::debug!(target: LOG_TARGET, "NFT {collection_id}/{nft_id} has {key} {actual}");
				if actual == expected {
					matching.push(nft_id);
				}
			},
			Err(e) => log::warn!(target: LOG_TARGET, "NFT {collection_id}/{nft_id}: {e}"),
		}
	}

	log::info!(target: LOG_TARGET, "NFTs with {key} {expected}: {matching:?}");
	Ok(matching)
}

/// Details of the given Origin of Shells. Ids without an NFT are skipped.
pub async fn filtered_nfts<S: PhalaWorldStorage + ?Sized>(
	storage: &S,
	nft_ids: &[NftId],
) -> Result<Vec<(NftId, NftInfo)>> {
	let Some(collection_id) = storage.origin_of_shell_collection_id().await? else {
		return Ok(Vec::new())
	};

	let mut nfts = Vec::with_capacity(nft_ids.len());
	for nft_id in nft_ids {
		if let Some(info) = storage.nft(collection_id, *nft_id).await? {
			nfts.push((*nft_id, info));
		}
	}
	Ok(nfts)
}
