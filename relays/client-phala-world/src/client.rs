// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Client that connects to a Khala node and is used to query the Phala World pallets and to
//! submit transactions to them.

use crate::{
	storage::{key_at, value_as, value_as_bytes, value_as_nft_pair, value_as_variant},
	Error, NftInfo, PhalaWorldStorage, ResourceInfo, Result, Signer, LOG_TARGET,
};
use async_trait::async_trait;
use codec::Decode;
use futures::TryStreamExt;
use pw_primitives::{
	incubation_storage, nft_sale_storage, rmrk_storage, uniques_storage, AccountId, CollectionId,
	EraId, FoodStat, NftId, NftSaleInfo, PreorderId, PreorderInfo, RaceType, RarityType,
	ResourceId, SaleStatus, INCUBATION_PALLET_NAME, NFT_SALE_PALLET_NAME, RMRK_CORE_PALLET_NAME,
	UNIQUES_PALLET_NAME,
};
use serde::Serialize;
use subxt::{
	dynamic::{DecodedValueThunk, Value},
	tx::DynamicPayload,
	utils::H256,
	OnlineClient, PolkadotConfig,
};

/// Node connection parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionParams {
	/// Full websocket URI. Overrides `host`, `port` and `secure`.
	pub uri: Option<String>,
	/// Websocket host.
	pub host: String,
	/// Websocket port.
	pub port: u16,
	/// Use secure websocket connection.
	pub secure: bool,
}

impl Default for ConnectionParams {
	fn default() -> Self {
		ConnectionParams { uri: None, host: "127.0.0.1".into(), port: 9944, secure: false }
	}
}

impl ConnectionParams {
	/// Websocket URL of the node.
	pub fn url(&self) -> String {
		match self.uri {
			Some(ref uri) => uri.clone(),
			None => format!(
				"{}://{}:{}",
				if self.secure { "wss" } else { "ws" },
				self.host,
				self.port,
			),
		}
	}
}

/// Result of a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionOutcome {
	/// Hash of the submitted extrinsic.
	pub extrinsic_hash: H256,
	/// Hash of the finalized block that includes the extrinsic, if we have waited for it.
	pub block_hash: Option<H256>,
}

/// Khala node client.
#[derive(Clone)]
pub struct Client {
	api: OnlineClient<PolkadotConfig>,
}

impl std::fmt::Debug for Client {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		fmt.debug_struct("Client").field("genesis_hash", &self.api.genesis_hash()).finish()
	}
}

impl Client {
	/// Connect to the node.
	pub async fn new(params: ConnectionParams) -> Result<Self> {
		let url = params.url();
		log::debug!(target: LOG_TARGET, "Connecting to {url}");
		// Local development nodes are served over plain `ws://`.
		let api = OnlineClient::<PolkadotConfig>::from_insecure_url(&url).await?;
		log::info!(
			target: LOG_TARGET,
			"Connected to {url}: spec version {}",
			api.runtime_version().spec_version,
		);
		Ok(Client { api })
	}

	/// Sign the call with the signer's next nonce and submit it.
	///
	/// When `wait` is set, waits until the transaction is finalized and fails if it was not
	/// dispatched successfully.
	pub async fn submit(
		&self,
		call: &DynamicPayload,
		signer: &Signer,
		wait: bool,
	) -> Result<TransactionOutcome> {
		log::info!(
			target: LOG_TARGET,
			"Submitting {}::{} signed by {}",
			call.pallet_name(),
			call.call_name(),
			signer,
		);

		if !wait {
			let extrinsic_hash =
				self.api.tx().sign_and_submit_default(call, signer.keypair()).await?;
			log::info!(target: LOG_TARGET, "Submitted extrinsic {extrinsic_hash:?}");
			return Ok(TransactionOutcome { extrinsic_hash, block_hash: None })
		}

		let in_block = self
			.api
			.tx()
			.sign_and_submit_then_watch_default(call, signer.keypair())
			.await?
			.wait_for_finalized()
			.await?;
		let block_hash = in_block.block_hash();
		let events = in_block.wait_for_success().await?;
		log::info!(
			target: LOG_TARGET,
			"Extrinsic {:?} finalized in block {block_hash:?}",
			events.extrinsic_hash(),
		);
		Ok(TransactionOutcome {
			extrinsic_hash: events.extrinsic_hash(),
			block_hash: Some(block_hash),
		})
	}

	async fn fetch(
		&self,
		pallet: &'static str,
		entry: &'static str,
		keys: Vec<Value>,
	) -> Result<Option<DecodedValueThunk>> {
		let address = subxt::dynamic::storage(pallet, entry, keys);
		Ok(self.api.storage().at_latest().await?.fetch(&address).await?)
	}

	async fn fetch_or_default(
		&self,
		pallet: &'static str,
		entry: &'static str,
		keys: Vec<Value>,
	) -> Result<DecodedValueThunk> {
		let address = subxt::dynamic::storage(pallet, entry, keys);
		Ok(self.api.storage().at_latest().await?.fetch_or_default(&address).await?)
	}

	/// Iterate over all entries of the map whose keys start with `prefix`.
	async fn iter(
		&self,
		pallet: &'static str,
		entry: &'static str,
		prefix: Vec<Value>,
	) -> Result<Vec<(Vec<Value>, DecodedValueThunk)>> {
		let address = subxt::dynamic::storage(pallet, entry, prefix);
		let pairs: Vec<_> = self
			.api
			.storage()
			.at_latest()
			.await?
			.iter(address)
			.await?
			.try_collect()
			.await?;
		log::debug!(target: LOG_TARGET, "Read {} entries of {pallet}::{entry}", pairs.len());
		Ok(pairs.into_iter().map(|pair| (pair.keys, pair.value)).collect())
	}

	async fn fetch_flag(&self, pallet: &'static str, entry: &'static str) -> Result<bool> {
		let value = self.fetch_or_default(pallet, entry, Vec::new()).await?;
		bool::decode(&mut value.encoded()).map_err(Error::decode(entry))
	}

	async fn fetch_number<N: TryFrom<u128>>(
		&self,
		pallet: &'static str,
		entry: &'static str,
		keys: Vec<Value>,
	) -> Result<N> {
		let value = self.fetch_or_default(pallet, entry, keys).await?;
		value_as(&value.to_value()?, entry)
	}

	async fn fetch_optional_number<N: TryFrom<u128>>(
		&self,
		pallet: &'static str,
		entry: &'static str,
	) -> Result<Option<N>> {
		match self.fetch(pallet, entry, Vec::new()).await? {
			Some(value) => value_as(&value.to_value()?, entry).map(Some),
			None => Ok(None),
		}
	}
}

fn id(value: u32) -> Value {
	Value::u128(value as u128)
}

#[async_trait]
impl PhalaWorldStorage for Client {
	async fn spirit_collection_id(&self) -> Result<Option<CollectionId>> {
		self.fetch_optional_number(NFT_SALE_PALLET_NAME, nft_sale_storage::SPIRIT_COLLECTION_ID)
			.await
	}

	async fn origin_of_shell_collection_id(&self) -> Result<Option<CollectionId>> {
		self.fetch_optional_number(
			NFT_SALE_PALLET_NAME,
			nft_sale_storage::ORIGIN_OF_SHELL_COLLECTION_ID,
		)
		.await
	}

	async fn era(&self) -> Result<EraId> {
		self.fetch_number(NFT_SALE_PALLET_NAME, nft_sale_storage::ERA, Vec::new()).await
	}

	async fn zero_day(&self) -> Result<Option<u64>> {
		self.fetch_optional_number(NFT_SALE_PALLET_NAME, nft_sale_storage::ZERO_DAY).await
	}

	async fn preorder_index(&self) -> Result<PreorderId> {
		self.fetch_number(NFT_SALE_PALLET_NAME, nft_sale_storage::PREORDER_INDEX, Vec::new())
			.await
	}

	async fn preorders(&self) -> Result<Vec<(PreorderId, PreorderInfo)>> {
		const ENTRY: &str = nft_sale_storage::PREORDERS;
		self.iter(NFT_SALE_PALLET_NAME, ENTRY, Vec::new())
			.await?
			.into_iter()
			.map(|(keys, value)| {
				let preorder_id = value_as(key_at(&keys, 0, ENTRY)?, ENTRY)?;
				let info =
					PreorderInfo::decode(&mut value.encoded()).map_err(Error::decode(ENTRY))?;
				Ok((preorder_id, info))
			})
			.collect()
	}

	async fn sale_status(&self) -> Result<SaleStatus> {
		use incubation_storage::*;
		use nft_sale_storage::*;

		Ok(SaleStatus {
			can_claim_spirits: self.fetch_flag(NFT_SALE_PALLET_NAME, CAN_CLAIM_SPIRITS).await?,
			can_purchase_rare_origin_of_shells: self
				.fetch_flag(NFT_SALE_PALLET_NAME, CAN_PURCHASE_RARE_ORIGIN_OF_SHELLS)
				.await?,
			can_purchase_prime_origin_of_shells: self
				.fetch_flag(NFT_SALE_PALLET_NAME, CAN_PURCHASE_PRIME_ORIGIN_OF_SHELLS)
				.await?,
			can_preorder_origin_of_shells: self
				.fetch_flag(NFT_SALE_PALLET_NAME, CAN_PREORDER_ORIGIN_OF_SHELLS)
				.await?,
			last_day_of_sale: self.fetch_flag(NFT_SALE_PALLET_NAME, LAST_DAY_OF_SALE).await?,
			can_start_incubation: self
				.fetch_flag(INCUBATION_PALLET_NAME, CAN_START_INCUBATION)
				.await?,
		})
	}

	async fn inventory(&self, rarity: RarityType) -> Result<Vec<(RaceType, NftSaleInfo)>> {
		const ENTRY: &str = nft_sale_storage::ORIGIN_OF_SHELLS_INVENTORY;
		let prefix = vec![crate::calls::enum_value(rarity)];
		self.iter(NFT_SALE_PALLET_NAME, ENTRY, prefix)
			.await?
			.into_iter()
			.map(|(keys, value)| {
				let race = value_as_variant(key_at(&keys, 1, ENTRY)?, ENTRY)?;
				let info =
					NftSaleInfo::decode(&mut value.encoded()).map_err(Error::decode(ENTRY))?;
				Ok((race, info))
			})
			.collect()
	}

	async fn account_nfts(
		&self,
		owner: &AccountId,
		collection_id: CollectionId,
	) -> Result<Vec<NftId>> {
		const ENTRY: &str = uniques_storage::ACCOUNT;
		let prefix = vec![crate::calls::account_value(owner), id(collection_id)];
		self.iter(UNIQUES_PALLET_NAME, ENTRY, prefix)
			.await?
			.into_iter()
			.map(|(keys, _)| value_as(key_at(&keys, 2, ENTRY)?, ENTRY))
			.collect()
	}

	async fn nfts(&self, collection_id: CollectionId) -> Result<Vec<(NftId, NftInfo)>> {
		const ENTRY: &str = rmrk_storage::NFTS;
		self.iter(RMRK_CORE_PALLET_NAME, ENTRY, vec![id(collection_id)])
			.await?
			.into_iter()
			.map(|(keys, value)| Ok((value_as(key_at(&keys, 1, ENTRY)?, ENTRY)?, value.to_value()?)))
			.collect()
	}

	async fn nft(&self, collection_id: CollectionId, nft_id: NftId) -> Result<Option<NftInfo>> {
		let keys = vec![id(collection_id), id(nft_id)];
		match self.fetch(RMRK_CORE_PALLET_NAME, rmrk_storage::NFTS, keys).await? {
			Some(value) => Ok(Some(value.to_value()?)),
			None => Ok(None),
		}
	}

	async fn next_nft_id(&self, collection_id: CollectionId) -> Result<NftId> {
		self.fetch_number(RMRK_CORE_PALLET_NAME, rmrk_storage::NEXT_NFT_ID, vec![id(collection_id)])
			.await
	}

	async fn attributes(
		&self,
		collection_id: CollectionId,
		nft_id: Option<NftId>,
	) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
		const ENTRY: &str = uniques_storage::ATTRIBUTE;
		let prefix = vec![id(collection_id), crate::calls::option_value(nft_id.map(id))];
		self.iter(UNIQUES_PALLET_NAME, ENTRY, prefix)
			.await?
			.into_iter()
			.map(|(keys, value)| {
				let key = value_as_bytes(key_at(&keys, 2, ENTRY)?, ENTRY)?;
				let (value, _deposit) = <(Vec<u8>, u128)>::decode(&mut value.encoded())
					.map_err(Error::decode(ENTRY))?;
				Ok((key, value))
			})
			.collect()
	}

	async fn attribute(
		&self,
		collection_id: CollectionId,
		nft_id: Option<NftId>,
		key: &[u8],
	) -> Result<Option<Vec<u8>>> {
		const ENTRY: &str = uniques_storage::ATTRIBUTE;
		let keys = vec![
			id(collection_id),
			crate::calls::option_value(nft_id.map(id)),
			Value::from_bytes(key),
		];
		match self.fetch(UNIQUES_PALLET_NAME, ENTRY, keys).await? {
			Some(value) => {
				let (value, _deposit) = <(Vec<u8>, u128)>::decode(&mut value.encoded())
					.map_err(Error::decode(ENTRY))?;
				Ok(Some(value))
			},
			None => Ok(None),
		}
	}

	async fn hatch_times(&self, collection_id: CollectionId) -> Result<Vec<(NftId, u64)>> {
		const ENTRY: &str = incubation_storage::HATCH_TIMES;
		self.iter(INCUBATION_PALLET_NAME, ENTRY, vec![id(collection_id)])
			.await?
			.into_iter()
			.map(|(keys, value)| {
				Ok((value_as(key_at(&keys, 1, ENTRY)?, ENTRY)?, value_as(&value.to_value()?, ENTRY)?))
			})
			.collect()
	}

	async fn food_stats(&self, era: EraId) -> Result<Vec<FoodStat>> {
		const ENTRY: &str = incubation_storage::ORIGIN_OF_SHELL_FOOD_STATS;
		let prefix = vec![Value::u128(era as u128)];
		self.iter(INCUBATION_PALLET_NAME, ENTRY, prefix)
			.await?
			.into_iter()
			.map(|(keys, value)| {
				let (collection_id, nft_id) = value_as_nft_pair(key_at(&keys, 1, ENTRY)?, ENTRY)?;
				Ok(FoodStat {
					era,
					collection_id,
					nft_id,
					times_fed: value_as(&value.to_value()?, ENTRY)?,
				})
			})
			.collect()
	}

	async fn food_stat(
		&self,
		era: EraId,
		collection_id: CollectionId,
		nft_id: NftId,
	) -> Result<u32> {
		let keys = vec![
			Value::u128(era as u128),
			Value::unnamed_composite([id(collection_id), id(nft_id)]),
		];
		self.fetch_number(
			INCUBATION_PALLET_NAME,
			incubation_storage::ORIGIN_OF_SHELL_FOOD_STATS,
			keys,
		)
		.await
	}

	async fn resources(
		&self,
		collection_id: CollectionId,
		nft_id: NftId,
	) -> Result<Vec<(ResourceId, ResourceInfo)>> {
		const ENTRY: &str = rmrk_storage::RESOURCES;
		self.iter(RMRK_CORE_PALLET_NAME, ENTRY, vec![id(collection_id), id(nft_id)])
			.await?
			.into_iter()
			.map(|(keys, value)| Ok((value_as(key_at(&keys, 2, ENTRY)?, ENTRY)?, value.to_value()?)))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_connection_is_local_node() {
		assert_eq!(ConnectionParams::default().url(), "ws://127.0.0.1:9944");
	}

	#[test]
	fn uri_overrides_connection_components() {
		let params = ConnectionParams {
			uri: Some("wss://khala.api.onfinality.io/public-ws".into()),
			host: "10.0.0.1".into(),
			port: 1,
			secure: false,
		};

		assert_eq!(params.url(), "wss://khala.api.onfinality.io/public-ws");
	}

	#[test]
	fn secure_connection_uses_wss() {
		let params = ConnectionParams {
			host: "node.local".into(),
			port: 443,
			secure: true,
			..Default::default()
		};

		assert_eq!(params.url(), "wss://node.local:443");
	}
}
