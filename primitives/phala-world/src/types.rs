// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

use crate::{AccountId, CollectionId, EraId, NftId};
use codec::{Decode, Encode};
use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

/// Race of an Origin of Shell.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	Encode,
	Decode,
	Serialize,
	Display,
	EnumString,
	IntoStaticStr,
	VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum RaceType {
	Cyborg,
	AISpectre,
	XGene,
	Pandroid,
}

/// Career of an Origin of Shell.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	Encode,
	Decode,
	Serialize,
	Display,
	EnumString,
	IntoStaticStr,
	VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum CareerType {
	HardwareDruid,
	RoboWarrior,
	TradeNegotiator,
	HackerWizard,
	Web3Monk,
}

/// Sale phase that the overlord may open or close.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	Encode,
	Decode,
	Serialize,
	Display,
	EnumString,
	IntoStaticStr,
	VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum StatusType {
	ClaimSpirits,
	PurchaseRareOriginOfShells,
	PurchasePrimeOriginOfShells,
	PreorderOriginOfShells,
}

/// Rarity of an Origin of Shell.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	Encode,
	Decode,
	Serialize,
	Display,
	EnumString,
	IntoStaticStr,
	VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum RarityType {
	Prime,
	Magic,
	Legendary,
}

/// How an Origin of Shell left the inventory.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	Encode,
	Decode,
	Serialize,
	Display,
	EnumString,
	IntoStaticStr,
	VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum NftSaleType {
	ForSale,
	Giveaway,
	Reserved,
}

/// What an overlord signature authorizes.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	Encode,
	Decode,
	Serialize,
	Display,
	EnumString,
	IntoStaticStr,
	VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum Purpose {
	RedeemSpirit,
	BuyPrimeOriginOfShells,
}

/// Off-chain message signed by the overlord.
///
/// The pallet verifies the overlord signature against the SCALE encoding of this structure, so
/// the field order is part of the protocol.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize)]
pub struct OverlordMessage {
	#[serde(serialize_with = "crate::serialize_account")]
	pub account: AccountId,
	pub purpose: Purpose,
}

/// Origin of Shell preorder, as stored in `PWNftSale::Preorders`.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize)]
pub struct PreorderInfo {
	#[serde(serialize_with = "crate::serialize_account")]
	pub owner: AccountId,
	pub race: RaceType,
	pub career: CareerType,
	#[serde(serialize_with = "crate::serialize_lossy_utf8")]
	pub metadata: Vec<u8>,
}

/// Inventory counters of a (rarity, race) pair, as stored in `PWNftSale::OriginOfShellsInventory`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode, Serialize)]
pub struct NftSaleInfo {
	pub race_count: u32,
	pub race_for_sale_count: u32,
	pub race_giveaway_count: u32,
	pub race_reserved_count: u32,
}

/// Sale and incubation switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SaleStatus {
	pub can_claim_spirits: bool,
	pub can_purchase_rare_origin_of_shells: bool,
	pub can_purchase_prime_origin_of_shells: bool,
	pub can_preorder_origin_of_shells: bool,
	pub last_day_of_sale: bool,
	pub can_start_incubation: bool,
}

/// Number of times an Origin of Shell was fed during an era.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FoodStat {
	pub era: EraId,
	pub collection_id: CollectionId,
	pub nft_id: NftId,
	pub times_fed: u32,
}

/// Hatch time reduction granted to an Origin of Shell, in seconds.
///
/// Encodes as `((CollectionId, NftId), u64)`, the element type of
/// `PWIncubation::update_incubation_time`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode, Serialize)]
pub struct HatchTimeUpdate {
	pub collection_id: CollectionId,
	pub nft_id: NftId,
	pub reduction_secs: u64,
}

impl std::str::FromStr for HatchTimeUpdate {
	type Err = String;

	/// Parse `<collection>:<nft>:<seconds>`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split(':').collect();
		let [collection_id, nft_id, reduction_secs] = parts.as_slice() else {
			return Err(format!("expected '<collection>:<nft>:<seconds>', got '{s}'"))
		};
		let parse_err = |e: std::num::ParseIntError| format!("invalid number in '{s}': {e}");
		Ok(HatchTimeUpdate {
			collection_id: collection_id.parse().map_err(parse_err)?,
			nft_id: nft_id.parse().map_err(parse_err)?,
			reduction_secs: reduction_secs.parse().map_err(parse_err)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;
	use std::str::FromStr;

	#[test]
	fn enums_encode_as_declaration_index() {
		assert_eq!(RaceType::Cyborg.encode(), vec![0]);
		assert_eq!(RaceType::Pandroid.encode(), vec![3]);
		assert_eq!(CareerType::Web3Monk.encode(), vec![4]);
		assert_eq!(StatusType::PreorderOriginOfShells.encode(), vec![3]);
		assert_eq!(RarityType::Legendary.encode(), vec![2]);
		assert_eq!(NftSaleType::Reserved.encode(), vec![2]);
		assert_eq!(Purpose::BuyPrimeOriginOfShells.encode(), vec![1]);
	}

	#[test]
	fn enums_parse_case_insensitively() {
		assert_eq!(RaceType::from_str("aispectre"), Ok(RaceType::AISpectre));
		assert_eq!(CareerType::from_str("HackerWizard"), Ok(CareerType::HackerWizard));
		assert_eq!(RarityType::from_str("LEGENDARY"), Ok(RarityType::Legendary));
		assert!(RaceType::from_str("Human").is_err());
		assert_eq!(RaceType::XGene.to_string(), "XGene");
	}

	#[test]
	fn overlord_message_is_account_followed_by_purpose() {
		// given
		let account = AccountId::new(hex!(
			"d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d"
		));
		let message = OverlordMessage { account: account.clone(), purpose: Purpose::RedeemSpirit };

		// when
		let encoded = message.encode();

		// then
		assert_eq!(encoded.len(), 33);
		assert_eq!(&encoded[..32], AsRef::<[u8]>::as_ref(&account));
		assert_eq!(encoded[32], 0);
	}

	#[test]
	fn preorder_info_decodes_from_chain_layout() {
		let owner = AccountId::new([7u8; 32]);
		let mut encoded = owner.encode();
		encoded.extend([3u8, 3u8]);
		encoded.extend(b"I am Prime".to_vec().encode());

		let info = PreorderInfo::decode(&mut &encoded[..]).unwrap();

		assert_eq!(info.owner, owner);
		assert_eq!(info.race, RaceType::Pandroid);
		assert_eq!(info.career, CareerType::HackerWizard);
		assert_eq!(info.metadata, b"I am Prime".to_vec());
	}

	#[test]
	fn preorder_info_serializes_readable_fields() {
		let info = PreorderInfo {
			owner: AccountId::new([1u8; 32]),
			race: RaceType::Cyborg,
			career: CareerType::RoboWarrior,
			metadata: b"I am Prime".to_vec(),
		};

		let json = serde_json::to_value(&info).unwrap();

		assert_eq!(json["race"], "Cyborg");
		assert_eq!(json["metadata"], "I am Prime");
		assert_eq!(json["owner"], crate::to_ss58(&info.owner));
	}

	#[test]
	fn hatch_time_update_encodes_as_nested_tuple() {
		let update = HatchTimeUpdate { collection_id: 1, nft_id: 3, reduction_secs: 3600 };
		assert_eq!(update.encode(), ((1u32, 3u32), 3600u64).encode());
	}

	#[test]
	fn hatch_time_update_parses_from_triple() {
		assert_eq!(
			HatchTimeUpdate::from_str("1:0:7200"),
			Ok(HatchTimeUpdate { collection_id: 1, nft_id: 0, reduction_secs: 7200 })
		);
		assert!(HatchTimeUpdate::from_str("1:0").is_err());
		assert!(HatchTimeUpdate::from_str("1:x:7200").is_err());
	}
}
