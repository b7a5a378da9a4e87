// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! In-memory [`PhalaWorldStorage`] to test the client-side logic with.

use crate::{NftInfo, PhalaWorldStorage, ResourceInfo, Result};
use async_trait::async_trait;
use pw_primitives::{
	AccountId, CollectionId, EraId, FoodStat, NftId, NftSaleInfo, PreorderId, PreorderInfo,
	RaceType, RarityType, ResourceId, SaleStatus,
};
use std::collections::{BTreeMap, HashMap};
use subxt::dynamic::Value;

/// NFT or resource details that are identified by `tag` alone.
pub fn tagged_info(tag: u32) -> NftInfo {
	Value::u128(tag as u128).map_context(|_| 0)
}

/// Phala World storage kept in memory. NFT and resource details are [`tagged_info`] values.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	pub spirit_collection_id: Option<CollectionId>,
	pub origin_of_shell_collection_id: Option<CollectionId>,
	pub era: EraId,
	pub zero_day: Option<u64>,
	pub preorders: Vec<(PreorderId, PreorderInfo)>,
	pub sale_status: SaleStatus,
	pub inventory: Vec<(RarityType, RaceType, NftSaleInfo)>,
	pub owners: HashMap<(CollectionId, NftId), AccountId>,
	pub nfts: BTreeMap<(CollectionId, NftId), u32>,
	pub next_nft_id: HashMap<CollectionId, NftId>,
	pub attributes: BTreeMap<(CollectionId, Option<NftId>, Vec<u8>), Vec<u8>>,
	pub hatch_times: BTreeMap<(CollectionId, NftId), u64>,
	pub food_stats: Vec<FoodStat>,
	pub resources: BTreeMap<(CollectionId, NftId, ResourceId), u32>,
}

#[async_trait]
impl PhalaWorldStorage for MemoryStorage {
	async fn spirit_collection_id(&self) -> Result<Option<CollectionId>> {
		Ok(self.spirit_collection_id)
	}

	async fn origin_of_shell_collection_id(&self) -> Result<Option<CollectionId>> {
		Ok(self.origin_of_shell_collection_id)
	}

	async fn era(&self) -> Result<EraId> {
		Ok(self.era)
	}

	async fn zero_day(&self) -> Result<Option<u64>> {
		Ok(self.zero_day)
	}

	async fn preorder_index(&self) -> Result<PreorderId> {
		Ok(self.preorders.len() as PreorderId)
	}

	async fn preorders(&self) -> Result<Vec<(PreorderId, PreorderInfo)>> {
		Ok(self.preorders.clone())
	}

	async fn sale_status(&self) -> Result<SaleStatus> {
		Ok(self.sale_status)
	}

	async fn inventory(&self, rarity: RarityType) -> Result<Vec<(RaceType, NftSaleInfo)>> {
		Ok(self
			.inventory
			.iter()
			.filter(|(entry_rarity, _, _)| *entry_rarity == rarity)
			.map(|(_, race, info)| (*race, *info))
			.collect())
	}

	async fn account_nfts(
		&self,
		owner: &AccountId,
		collection_id: CollectionId,
	) -> Result<Vec<NftId>> {
		let mut nft_ids: Vec<_> = self
			.owners
			.iter()
			.filter(|((collection, _), account)| *collection == collection_id && *account == owner)
			.map(|((_, nft_id), _)| *nft_id)
			.collect();
		nft_ids.sort();
		Ok(nft_ids)
	}

	async fn nfts(&self, collection_id: CollectionId) -> Result<Vec<(NftId, NftInfo)>> {
		Ok(self
			.nfts
			.iter()
			.filter(|((collection, _), _)| *collection == collection_id)
			.map(|((_, nft_id), tag)| (*nft_id, tagged_info(*tag)))
			.collect())
	}

	async fn nft(&self, collection_id: CollectionId, nft_id: NftId) -> Result<Option<NftInfo>> {
		Ok(self.nfts.get(&(collection_id, nft_id)).map(|tag| tagged_info(*tag)))
	}

	async fn next_nft_id(&self, collection_id: CollectionId) -> Result<NftId> {
		Ok(self.next_nft_id.get(&collection_id).copied().unwrap_or_default())
	}

	async fn attributes(
		&self,
		collection_id: CollectionId,
		nft_id: Option<NftId>,
	) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
		Ok(self
			.attributes
			.iter()
			.filter(|((collection, nft, _), _)| *collection == collection_id && *nft == nft_id)
			.map(|((_, _, key), value)| (key.clone(), value.clone()))
			.collect())
	}

	async fn attribute(
		&self,
		collection_id: CollectionId,
		nft_id: Option<NftId>,
		key: &[u8],
	) -> Result<Option<Vec<u8>>> {
		Ok(self.attributes.get(&(collection_id, nft_id, key.to_vec())).cloned())
	}

	async fn hatch_times(&self, collection_id: CollectionId) -> Result<Vec<(NftId, u64)>> {
		Ok(self
			.hatch_times
			.iter()
			.filter(|((collection, _), _)| *collection == collection_id)
			.map(|((_, nft_id), hatch_time)| (*nft_id, *hatch_time))
			.collect())
	}

	async fn food_stats(&self, era: EraId) -> Result<Vec<FoodStat>> {
		Ok(self.food_stats.iter().filter(|stat| stat.era == era).copied().collect())
	}

	async fn food_stat(
		&self,
		era: EraId,
		collection_id: CollectionId,
		nft_id: NftId,
	) -> Result<u32> {
		Ok(self
			.food_stats
			.iter()
			.find(|stat| {
				stat.era == era && stat.collection_id == collection_id && stat.nft_id == nft_id
			})
			.map(|stat| stat.times_fed)
			.unwrap_or_default())
	}

	async fn resources(
		&self,
		collection_id: CollectionId,
		nft_id: NftId,
	) -> Result<Vec<(ResourceId, ResourceInfo)>> {
		Ok(self
			.resources
			.iter()
			.filter(|((collection, nft, _), _)| *collection == collection_id && *nft == nft_id)
			.map(|((_, _, resource_id), tag)| (*resource_id, tagged_info(*tag)))
			.collect())
	}
}
