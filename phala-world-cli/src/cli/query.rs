// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

use crate::cli::{print_rendered, HexBytes, OutputFormat};
use clap::{ArgGroup, Args, Subcommand};
use pw_client::{queries, Client, NftInfo, PhalaWorldStorage};
use pw_primitives::{
	parse_account, to_ss58, AccountId, AttributeKey, CareerType, CollectionId, EraId, FoodStat,
	NftAttribute, NftId, NftSaleInfo, PreorderId, PreorderInfo, RaceType, RarityType, ResourceId,
	TOP_FED_LIMIT,
};
use serde::Serialize;

/// Read the state of the sale and incubation pallets.
#[derive(Args, Debug)]
pub struct Query {
	#[clap(subcommand)]
	query: QueryCommand,
}

#[derive(Debug, Subcommand)]
enum QueryCommand {
	/// Spirits owned by an account.
	Spirits {
		/// SS58 address of the owner.
		#[clap(long, value_parser = parse_account)]
		owner: AccountId,
	},
	/// All Origin of Shells.
	OriginOfShells,
	/// All attributes of an NFT, or of the collection when no NFT is given.
	Attributes {
		#[clap(long)]
		collection: CollectionId,
		#[clap(long)]
		nft: Option<NftId>,
	},
	/// Single attribute of an NFT.
	Attribute {
		#[clap(long)]
		collection: CollectionId,
		#[clap(long)]
		nft: NftId,
		/// One of `race`, `career` or `rarity`.
		#[clap(long)]
		key: AttributeKey,
	},
	/// Pending Origin of Shell preorders.
	Preorders {
		/// Only list preorders of this account.
		#[clap(long, value_parser = parse_account)]
		owner: Option<AccountId>,
	},
	/// Current incubation era.
	Era,
	/// Timestamp of the first day of the sale.
	ZeroDay,
	/// Origin of Shells left for every race of given rarity.
	Inventory {
		#[clap(long)]
		rarity: RarityType,
	},
	/// Sale and incubation switches.
	Status,
	/// Hatch times of Origin of Shells.
	HatchTimes {
		/// Defaults to the Origin of Shell collection.
		#[clap(long)]
		collection: Option<CollectionId>,
	},
	/// Most fed Origin of Shells of an era.
	TopFed {
		/// Defaults to the current era.
		#[clap(long)]
		era: Option<EraId>,
		#[clap(long, default_value_t = TOP_FED_LIMIT)]
		limit: usize,
	},
	/// Number of times an Origin of Shell was fed over all eras.
	TotalFed {
		#[clap(long)]
		collection: CollectionId,
		#[clap(long)]
		nft: NftId,
	},
	/// Origin of Shells with given attribute.
	Filter(AttributeFilter),
	/// Resources attached to an NFT.
	Resources {
		#[clap(long)]
		collection: CollectionId,
		#[clap(long)]
		nft: NftId,
	},
}

/// Expected attribute of the filtered Origin of Shells.
#[derive(Args, Debug, PartialEq, Eq)]
#[clap(group(ArgGroup::new("attribute").required(true).args(["race", "career", "rarity"])))]
struct AttributeFilter {
	#[clap(long)]
	race: Option<RaceType>,
	#[clap(long)]
	career: Option<CareerType>,
	#[clap(long)]
	rarity: Option<RarityType>,
}

impl AttributeFilter {
	fn expected(&self) -> anyhow::Result<NftAttribute> {
		match (self.race, self.career, self.rarity) {
			(Some(race), None, None) => Ok(NftAttribute::Race(race)),
			(None, Some(career), None) => Ok(NftAttribute::Career(career)),
			(None, None, Some(rarity)) => Ok(NftAttribute::Rarity(rarity)),
			_ => Err(anyhow::format_err!(
				"Exactly one of '--race', '--career' or '--rarity' is expected"
			)),
		}
	}
}

#[derive(Serialize)]
struct NftRecord {
	collection_id: CollectionId,
	nft_id: NftId,
	info: String,
}

impl NftRecord {
	fn new(collection_id: CollectionId, nft_id: NftId, info: &NftInfo) -> Self {
		NftRecord { collection_id, nft_id, info: info.to_string() }
	}

	fn line(&self) -> String {
		format!("NFT {}/{}: {}", self.collection_id, self.nft_id, self.info)
	}
}

#[derive(Serialize)]
struct AttributeRecord {
	key: String,
	value: HexBytes,
	typed: Option<NftAttribute>,
}

#[derive(Serialize)]
struct PreorderRecord {
	preorder_id: PreorderId,
	#[serde(flatten)]
	info: PreorderInfo,
}

#[derive(Serialize)]
struct Preorders {
	preorder_index: PreorderId,
	preorders: Vec<PreorderRecord>,
}

#[derive(Serialize)]
struct InventoryRecord {
	rarity: RarityType,
	race: RaceType,
	#[serde(flatten)]
	info: NftSaleInfo,
}

#[derive(Serialize)]
struct HatchTime {
	collection_id: CollectionId,
	nft_id: NftId,
	hatch_time: u64,
}

#[derive(Serialize)]
struct TopFed {
	era: EraId,
	ranking: Vec<FoodStat>,
}

#[derive(Serialize)]
struct FilteredNfts {
	expected: NftAttribute,
	nft_ids: Vec<NftId>,
	nfts: Vec<NftRecord>,
}

#[derive(Serialize)]
struct ResourceRecord {
	resource_id: ResourceId,
	info: String,
}

fn yes_no(flag: bool) -> &'static str {
	if flag {
		"yes"
	} else {
		"no"
	}
}

impl Query {
	/// Run the query.
	pub async fn run(self, client: &Client, output: OutputFormat) -> anyhow::Result<()> {
		print_rendered(&self.render(client, output).await?);
		Ok(())
	}

	/// Read the queried state and render it.
	async fn render<S: PhalaWorldStorage + ?Sized>(
		self,
		storage: &S,
		output: OutputFormat,
	) -> anyhow::Result<String> {
		match self.query {
			QueryCommand::Spirits { owner } => {
				let owned = queries::spirits_of(storage, &owner).await?;
				let owner = to_ss58(&owner);
				let lines = owned.nft_ids.iter().map(|nft_id| {
					format!("Spirit {}/{nft_id} owned by {owner}", owned.collection_id)
				});
				output.render(&owned, lines.collect::<Vec<_>>())
			},
			QueryCommand::OriginOfShells => {
				let (collection_id, nfts) = queries::origin_of_shells(storage).await?;
				let records: Vec<_> = nfts
					.iter()
					.map(|(nft_id, info)| NftRecord::new(collection_id, *nft_id, info))
					.collect();
				output.render(&records, records.iter().map(NftRecord::line))
			},
			QueryCommand::Attributes { collection, nft } => {
				let records: Vec<_> = queries::attributes_of(storage, collection, nft)
					.await?
					.into_iter()
					.map(|entry| AttributeRecord {
						key: String::from_utf8_lossy(&entry.key).into_owned(),
						value: HexBytes(entry.value),
						typed: entry.typed,
					})
					.collect();
				let lines = records.iter().map(|record| match record.typed {
					Some(typed) => format!("{}: {typed}", record.key),
					None => format!("{}: {}", record.key, record.value),
				});
				output.render(&records, lines.collect::<Vec<_>>())
			},
			QueryCommand::Attribute { collection, nft, key } => {
				let attribute = queries::nft_attribute(storage, collection, nft, key).await?;
				output.render(
					&attribute,
					[format!("Attribute {key} of NFT {collection}/{nft}: {attribute}")],
				)
			},
			QueryCommand::Preorders { owner } => {
				let preorder_index = storage.preorder_index().await?;
				let preorders = queries::preorders_of(storage, owner.as_ref()).await?;
				let preorders = Preorders {
					preorder_index,
					preorders: preorders
						.into_iter()
						.map(|(preorder_id, info)| PreorderRecord { preorder_id, info })
						.collect(),
				};
				let mut lines = vec![format!("Current preorder index: {preorder_index}")];
				lines.extend(preorders.preorders.iter().map(|record| {
					format!(
						"Preorder {}: {} {} for {}",
						record.preorder_id,
						record.info.race,
						record.info.career,
						to_ss58(&record.info.owner),
					)
				}));
				output.render(&preorders, lines)
			},
			QueryCommand::Era => {
				let era = storage.era().await?;
				output.render(&era, [format!("Current era: {era}")])
			},
			QueryCommand::ZeroDay => {
				let zero_day = storage.zero_day().await?;
				let line = match zero_day {
					Some(timestamp) => format!("Zero day: {timestamp}"),
					None => "Zero day is not set".to_owned(),
				};
				output.render(&zero_day, [line])
			},
			QueryCommand::Inventory { rarity } => {
				let records: Vec<_> = storage
					.inventory(rarity)
					.await?
					.into_iter()
					.map(|(race, info)| InventoryRecord { rarity, race, info })
					.collect();
				let lines = records.iter().map(|record| {
					format!(
						"{} {}: {} total, {} for sale, {} giveaway, {} reserved",
						record.rarity,
						record.race,
						record.info.race_count,
						record.info.race_for_sale_count,
						record.info.race_giveaway_count,
						record.info.race_reserved_count,
					)
				});
				output.render(&records, lines.collect::<Vec<_>>())
			},
			QueryCommand::Status => {
				let status = storage.sale_status().await?;
				output.render(
					&status,
					[
						format!("Can claim spirits: {}", yes_no(status.can_claim_spirits)),
						format!(
							"Can purchase rare Origin of Shells: {}",
							yes_no(status.can_purchase_rare_origin_of_shells)
						),
						format!(
							"Can purchase prime Origin of Shells: {}",
							yes_no(status.can_purchase_prime_origin_of_shells)
						),
						format!(
							"Can preorder Origin of Shells: {}",
							yes_no(status.can_preorder_origin_of_shells)
						),
						format!("Last day of sale: {}", yes_no(status.last_day_of_sale)),
						format!("Can start incubation: {}", yes_no(status.can_start_incubation)),
					],
				)
			},
			QueryCommand::HatchTimes { collection } => {
				let collection_id = match collection {
					Some(collection_id) => collection_id,
					None => storage.origin_of_shell_collection_id().await?.ok_or_else(|| {
						anyhow::format_err!("Origin of Shell collection id is not configured")
					})?,
				};
				let records: Vec<_> = storage
					.hatch_times(collection_id)
					.await?
					.into_iter()
					.map(|(nft_id, hatch_time)| HatchTime { collection_id, nft_id, hatch_time })
					.collect();
				let lines = records.iter().map(|record| {
					format!(
						"Origin of Shell {}/{} hatches at {}",
						record.collection_id, record.nft_id, record.hatch_time
					)
				});
				output.render(&records, lines.collect::<Vec<_>>())
			},
			QueryCommand::TopFed { era, limit } => {
				let (era, ranking) = queries::top_fed(storage, era, limit).await?;
				let mut lines = vec![format!("Most fed Origin of Shells of era {era}:")];
				lines.extend(ranking.iter().enumerate().map(|(rank, stat)| {
					format!(
						"#{} {}/{}: fed {} times",
						rank + 1,
						stat.collection_id,
						stat.nft_id,
						stat.times_fed
					)
				}));
				output.render(&TopFed { era, ranking }, lines)
			},
			QueryCommand::TotalFed { collection, nft } => {
				let total = queries::total_fed(storage, collection, nft).await?;
				output.render(&total, [format!("Origin of Shell {collection}/{nft} total fed: {total}")])
			},
			QueryCommand::Filter(filter) => {
				let expected = filter.expected()?;
				let nft_ids = queries::filter_by_attribute(storage, expected).await?;
				let collection_id = storage.origin_of_shell_collection_id().await?;
				let nfts = match collection_id {
					Some(collection_id) => queries::filtered_nfts(storage, &nft_ids)
						.await?
						.iter()
						.map(|(nft_id, info)| NftRecord::new(collection_id, *nft_id, info))
						.collect(),
					None => Vec::new(),
				};
				let mut lines = vec![format!("NFTs with {} {expected}: {nft_ids:?}", expected.key())];
				lines.extend(nfts.iter().map(NftRecord::line));
				output.render(&FilteredNfts { expected, nft_ids, nfts }, lines)
			},
			QueryCommand::Resources { collection, nft } => {
				let records: Vec<_> = storage
					.resources(collection, nft)
					.await?
					.into_iter()
					.map(|(resource_id, info)| ResourceRecord { resource_id, info: info.to_string() })
					.collect();
				let lines = records.iter().map(|record| {
					format!("Resource {} of NFT {collection}/{nft}: {}", record.resource_id, record.info)
				});
				output.render(&records, lines.collect::<Vec<_>>())
			},
		}
	}
}
