// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Primitives of the Phala World NFT pre-sale (`PWNftSale`) and incubation (`PWIncubation`)
//! pallets, as they are seen by off-chain clients.

pub mod attribute;
mod types;

pub use attribute::{AttributeKey, NftAttribute, ParseAttributeError};
pub use types::*;

use serde::Serializer;
use sp_core::crypto::{Ss58AddressFormat, Ss58Codec};

/// Account identifier of the chain.
pub type AccountId = sp_core::crypto::AccountId32;
/// Identifier of an NFT collection (shared by `Uniques` and `RmrkCore`).
pub type CollectionId = u32;
/// Identifier of an NFT within its collection.
pub type NftId = u32;
/// Identifier of an Origin of Shell preorder.
pub type PreorderId = u32;
/// Identifier of an incubation era.
pub type EraId = u64;
/// Identifier of an RMRK resource attached to an NFT.
pub type ResourceId = u32;

/// SS58 prefix of Khala accounts.
pub const KHALA_SS58_PREFIX: u16 = 30;

/// Name of the NFT sale pallet in the runtime.
pub const NFT_SALE_PALLET_NAME: &str = "PWNftSale";
/// Name of the incubation pallet in the runtime.
pub const INCUBATION_PALLET_NAME: &str = "PWIncubation";
/// Name of the RMRK core pallet in the runtime.
pub const RMRK_CORE_PALLET_NAME: &str = "RmrkCore";
/// Name of the uniques pallet in the runtime.
pub const UNIQUES_PALLET_NAME: &str = "Uniques";

/// Time reductions (in seconds) granted to the most fed Origin of Shells of an era, best first.
pub const DEFAULT_HATCH_TIME_REDUCTIONS: [u64; 10] =
	[10800, 7200, 3600, 2400, 1400, 1400, 1400, 1400, 1400, 1400];

/// Number of Origin of Shells rewarded at the end of an era.
pub const TOP_FED_LIMIT: usize = DEFAULT_HATCH_TIME_REDUCTIONS.len();

/// Storage items of the `PWNftSale` pallet.
pub mod nft_sale_storage {
	pub const SPIRIT_COLLECTION_ID: &str = "SpiritCollectionId";
	pub const ORIGIN_OF_SHELL_COLLECTION_ID: &str = "OriginOfShellCollectionId";
	pub const ERA: &str = "Era";
	pub const ZERO_DAY: &str = "ZeroDay";
	pub const PREORDER_INDEX: &str = "PreorderIndex";
	pub const PREORDERS: &str = "Preorders";
	pub const ORIGIN_OF_SHELLS_INVENTORY: &str = "OriginOfShellsInventory";
	pub const CAN_CLAIM_SPIRITS: &str = "CanClaimSpirits";
	pub const CAN_PURCHASE_RARE_ORIGIN_OF_SHELLS: &str = "CanPurchaseRareOriginOfShells";
	pub const CAN_PURCHASE_PRIME_ORIGIN_OF_SHELLS: &str = "CanPurchasePrimeOriginOfShells";
	pub const CAN_PREORDER_ORIGIN_OF_SHELLS: &str = "CanPreorderOriginOfShells";
	pub const LAST_DAY_OF_SALE: &str = "LastDayOfSale";
}

/// Storage items of the `PWIncubation` pallet.
pub mod incubation_storage {
	pub const CAN_START_INCUBATION: &str = "CanStartIncubation";
	pub const HATCH_TIMES: &str = "HatchTimes";
	pub const ORIGIN_OF_SHELL_FOOD_STATS: &str = "OriginOfShellFoodStats";
}

/// Storage items of the `RmrkCore` pallet.
pub mod rmrk_storage {
	pub const NFTS: &str = "Nfts";
	pub const NEXT_NFT_ID: &str = "NextNftId";
	pub const RESOURCES: &str = "Resources";
}

/// Storage items of the `Uniques` pallet.
pub mod uniques_storage {
	pub const ACCOUNT: &str = "Account";
	pub const ATTRIBUTE: &str = "Attribute";
}

/// Format account as a Khala SS58 address.
pub fn to_ss58(account: &AccountId) -> String {
	account.to_ss58check_with_version(Ss58AddressFormat::custom(KHALA_SS58_PREFIX))
}

/// Parse SS58 address, accepting any network prefix.
pub fn parse_account(address: &str) -> Result<AccountId, String> {
	AccountId::from_ss58check_with_version(address)
		.map(|(account, _)| account)
		.map_err(|e| format!("invalid SS58 address '{address}': {e:?}"))
}

pub(crate) fn serialize_account<S: Serializer>(
	account: &AccountId,
	serializer: S,
) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&to_ss58(account))
}

pub(crate) fn serialize_lossy_utf8<S: Serializer>(
	bytes: &[u8],
	serializer: S,
) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&String::from_utf8_lossy(bytes))
}
