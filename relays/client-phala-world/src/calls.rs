// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Calls of the Phala World pallets.
//!
//! Calls are built as dynamic payloads, so that they are validated against the metadata of the
//! node we're connected to rather than against metadata known at compile time.

use pw_primitives::{
	AccountId, CareerType, CollectionId, HatchTimeUpdate, NftId, NftSaleType, PreorderId,
	RaceType, RarityType, ResourceId, StatusType, INCUBATION_PALLET_NAME, NFT_SALE_PALLET_NAME,
	RMRK_CORE_PALLET_NAME,
};
use subxt::dynamic::Value;

pub use subxt::tx::DynamicPayload;

/// Raw sr25519 signature.
pub type Signature = [u8; 64];

/// Dynamic value of a fieldless enum variant.
pub(crate) fn enum_value<E: Into<&'static str>>(variant: E) -> Value {
	Value::unnamed_variant(variant.into(), Vec::new())
}

pub(crate) fn account_value(account: &AccountId) -> Value {
	Value::from_bytes(account)
}

pub(crate) fn option_value(value: Option<Value>) -> Value {
	match value {
		Some(value) => Value::unnamed_variant("Some", [value]),
		None => Value::unnamed_variant("None", Vec::new()),
	}
}

fn number(value: impl Into<u128>) -> Value {
	Value::u128(value.into())
}

fn nft_sale(call: &str, fields: Vec<Value>) -> DynamicPayload {
	subxt::dynamic::tx(NFT_SALE_PALLET_NAME, call, fields)
}

fn incubation(call: &str, fields: Vec<Value>) -> DynamicPayload {
	subxt::dynamic::tx(INCUBATION_PALLET_NAME, call, fields)
}

fn rmrk_core(call: &str, fields: Vec<Value>) -> DynamicPayload {
	subxt::dynamic::tx(RMRK_CORE_PALLET_NAME, call, fields)
}

/// Claim a spirit NFT. Only possible while spirit claiming is enabled.
pub fn claim_spirit() -> DynamicPayload {
	nft_sale("claim_spirit", Vec::new())
}

/// Redeem a spirit NFT with an overlord signature over `(account, RedeemSpirit)`.
pub fn redeem_spirit(signature: &Signature) -> DynamicPayload {
	nft_sale("redeem_spirit", vec![Value::from_bytes(signature)])
}

/// Buy a rare (magic or legendary) Origin of Shell.
pub fn buy_rare_origin_of_shell(
	rarity: RarityType,
	race: RaceType,
	career: CareerType,
) -> DynamicPayload {
	nft_sale(
		"buy_rare_origin_of_shell",
		vec![enum_value(rarity), enum_value(race), enum_value(career)],
	)
}

/// Buy a prime Origin of Shell with an overlord signature over
/// `(account, BuyPrimeOriginOfShells)`.
pub fn buy_prime_origin_of_shell(
	signature: &Signature,
	race: RaceType,
	career: CareerType,
) -> DynamicPayload {
	nft_sale(
		"buy_prime_origin_of_shell",
		vec![Value::from_bytes(signature), enum_value(race), enum_value(career)],
	)
}

/// Preorder a prime Origin of Shell.
pub fn preorder_origin_of_shell(race: RaceType, career: CareerType) -> DynamicPayload {
	nft_sale("preorder_origin_of_shell", vec![enum_value(race), enum_value(career)])
}

fn preorder_ids(ids: &[PreorderId]) -> Value {
	Value::unnamed_composite(ids.iter().map(|id| number(*id)))
}

/// Mint the Origin of Shells of the preorders that won the draw. Overlord only.
pub fn mint_chosen_preorders(preorders: &[PreorderId]) -> DynamicPayload {
	nft_sale("mint_chosen_preorders", vec![preorder_ids(preorders)])
}

/// Refund the preorders that lost the draw. Overlord only.
pub fn refund_not_chosen_preorders(preorders: &[PreorderId]) -> DynamicPayload {
	nft_sale("refund_not_chosen_preorders", vec![preorder_ids(preorders)])
}

/// Move Origin of Shells of given rarity between the for-sale and giveaway pools. Overlord only.
///
/// Meant to be called once the whitelist sale is closed, so that the numbers don't change under
/// the update.
pub fn update_rarity_type_counts(
	rarity: RarityType,
	for_sale_count: u32,
	giveaway_count: u32,
) -> DynamicPayload {
	nft_sale(
		"update_rarity_type_counts",
		vec![enum_value(rarity), number(for_sale_count), number(giveaway_count)],
	)
}

/// Open or close a sale phase. Overlord only.
pub fn set_status_type(enabled: bool, status: StatusType) -> DynamicPayload {
	nft_sale("set_status_type", vec![Value::bool(enabled), enum_value(status)])
}

/// Mint an Origin of Shell outside of the sale. Overlord only.
pub fn mint_gift_origin_of_shell(
	owner: &AccountId,
	rarity: RarityType,
	race: RaceType,
	career: CareerType,
	sale_type: NftSaleType,
) -> DynamicPayload {
	nft_sale(
		"mint_gift_origin_of_shell",
		vec![
			account_value(owner),
			enum_value(rarity),
			enum_value(race),
			enum_value(career),
			enum_value(sale_type),
		],
	)
}

/// Enable or disable the incubation phase. Overlord only.
pub fn set_can_start_incubation_status(enabled: bool) -> DynamicPayload {
	incubation("set_can_start_incubation_status", vec![Value::bool(enabled)])
}

/// Feed an Origin of Shell.
pub fn feed_origin_of_shell(collection_id: CollectionId, nft_id: NftId) -> DynamicPayload {
	incubation("feed_origin_of_shell", vec![number(collection_id), number(nft_id)])
}

/// Reduce hatch times of Origin of Shells. Overlord only.
pub fn update_incubation_time(updates: &[HatchTimeUpdate]) -> DynamicPayload {
	let updates = updates.iter().map(|update| {
		Value::unnamed_composite([
			Value::unnamed_composite([number(update.collection_id), number(update.nft_id)]),
			number(update.reduction_secs),
		])
	});
	incubation("update_incubation_time", vec![Value::unnamed_composite(updates)])
}

/// Hatch an Origin of Shell into a shell whose file resource lives at `metadata`. Overlord only.
pub fn hatch_origin_of_shell(
	owner: &AccountId,
	collection_id: CollectionId,
	nft_id: NftId,
	metadata: &str,
) -> DynamicPayload {
	incubation(
		"hatch_origin_of_shell",
		vec![
			account_value(owner),
			number(collection_id),
			number(nft_id),
			Value::from_bytes(metadata),
		],
	)
}

/// RMRK basic resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicResource {
	pub src: Option<String>,
	pub metadata: Option<String>,
	pub license: Option<String>,
	pub thumb: Option<String>,
}

/// Attach a basic resource to an NFT. The NFT owner has to accept it unless they added it.
pub fn add_basic_resource(
	collection_id: CollectionId,
	nft_id: NftId,
	resource: &BasicResource,
) -> DynamicPayload {
	let string = |s: &Option<String>| option_value(s.as_deref().map(|s| Value::from_bytes(s)));
	let resource = Value::named_composite([
		("src", string(&resource.src)),
		("metadata", string(&resource.metadata)),
		("license", string(&resource.license)),
		("thumb", string(&resource.thumb)),
	]);
	rmrk_core("add_basic_resource", vec![number(collection_id), number(nft_id), resource])
}

/// Accept a pending resource of an owned NFT.
pub fn accept_resource(
	collection_id: CollectionId,
	nft_id: NftId,
	resource_id: ResourceId,
) -> DynamicPayload {
	rmrk_core("accept_resource", vec![number(collection_id), number(nft_id), number(resource_id)])
}

#[cfg(test)]
mod tests {
	use super::*;
	use subxt::ext::scale_value::{Composite, ValueDef};

	fn fields(call: &DynamicPayload) -> Vec<Value> {
		call.call_data().values().cloned().collect()
	}

	#[test]
	fn sale_calls_target_sale_pallet() {
		let call = buy_rare_origin_of_shell(
			RarityType::Legendary,
			RaceType::Cyborg,
			CareerType::HackerWizard,
		);

		assert_eq!(call.pallet_name(), "PWNftSale");
		assert_eq!(call.call_name(), "buy_rare_origin_of_shell");
		assert_eq!(
			fields(&call),
			vec![
				Value::unnamed_variant("Legendary", Vec::new()),
				Value::unnamed_variant("Cyborg", Vec::new()),
				Value::unnamed_variant("HackerWizard", Vec::new()),
			]
		);
	}

	#[test]
	fn claim_spirit_has_no_arguments() {
		assert_eq!(claim_spirit().call_name(), "claim_spirit");
		assert!(fields(&claim_spirit()).is_empty());
	}

	#[test]
	fn signature_is_passed_as_bytes() {
		let call = redeem_spirit(&[0xAB; 64]);

		assert_eq!(fields(&call), vec![Value::from_bytes([0xAB; 64])]);
	}

	#[test]
	fn preorder_lists_keep_their_order() {
		let call = mint_chosen_preorders(&[0, 1, 2, 4, 10, 6, 12, 11]);

		assert_eq!(call.call_name(), "mint_chosen_preorders");
		let ids = match &fields(&call)[0].value {
			ValueDef::Composite(Composite::Unnamed(ids)) =>
				ids.iter().map(|id| id.as_u128().unwrap()).collect::<Vec<_>>(),
			other => panic!("unexpected preorder list: {other:?}"),
		};
		assert_eq!(ids, vec![0, 1, 2, 4, 10, 6, 12, 11]);
	}

	#[test]
	fn incubation_time_updates_are_nested_tuples() {
		let call = update_incubation_time(&[HatchTimeUpdate {
			collection_id: 1,
			nft_id: 3,
			reduction_secs: 3600,
		}]);

		assert_eq!(call.pallet_name(), "PWIncubation");
		assert_eq!(
			fields(&call),
			vec![Value::unnamed_composite([Value::unnamed_composite([
				Value::unnamed_composite([Value::u128(1), Value::u128(3)]),
				Value::u128(3600),
			])])]
		);
	}

	#[test]
	fn gift_mint_passes_owner_account() {
		let owner = AccountId::new([5u8; 32]);
		let call = mint_gift_origin_of_shell(
			&owner,
			RarityType::Prime,
			RaceType::Cyborg,
			CareerType::HackerWizard,
			NftSaleType::Giveaway,
		);

		let fields = fields(&call);
		assert_eq!(fields.len(), 5);
		assert_eq!(fields[0], Value::from_bytes([5u8; 32]));
		assert_eq!(fields[4], Value::unnamed_variant("Giveaway", Vec::new()));
	}

	#[test]
	fn basic_resource_fields_are_optional() {
		let resource = BasicResource {
			metadata: Some("ar://YV4TWufBJZtpRc-7BkgzvaM7eN2Y5xZcZ3uFbplN-L4".into()),
			..Default::default()
		};
		let call = add_basic_resource(3, 0, &resource);

		assert_eq!(call.pallet_name(), "RmrkCore");
		let fields = fields(&call);
		assert_eq!(
			fields[2],
			Value::named_composite([
				("src", Value::unnamed_variant("None", Vec::new())),
				(
					"metadata",
					Value::unnamed_variant(
						"Some",
						[Value::from_bytes("ar://YV4TWufBJZtpRc-7BkgzvaM7eN2Y5xZcZ3uFbplN-L4")]
					)
				),
				("license", Value::unnamed_variant("None", Vec::new())),
				("thumb", Value::unnamed_variant("None", Vec::new())),
			])
		);
	}
}
