// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

use crate::cli::{
	chain_schema::{OverlordSigningParams, SigningParams},
	HexBytes, OutputFormat,
};
use clap::{ArgAction, Args, Subcommand};
use pw_client::{
	calls::{self, BasicResource, DynamicPayload, Signature},
	queries, sign_overlord_message, Client, PhalaWorldStorage, Signer, TransactionOutcome,
	LOG_TARGET,
};
use pw_primitives::{
	parse_account, AccountId, CareerType, CollectionId, EraId, HatchTimeUpdate, NftId,
	NftSaleType, PreorderId, Purpose, RaceType, RarityType, ResourceId, StatusType,
	DEFAULT_HATCH_TIME_REDUCTIONS, TOP_FED_LIMIT,
};

/// Sign and submit a transaction.
#[derive(Args, Debug)]
pub struct Transact {
	#[clap(flatten)]
	signer: SigningParams,
	#[clap(flatten)]
	overlord: OverlordSigningParams,
	/// Return right after the transaction is submitted instead of waiting for its finalization.
	#[clap(long, global = true)]
	no_wait: bool,
	#[clap(subcommand)]
	call: Call,
}

#[derive(Debug, Subcommand)]
enum Call {
	/// Claim a spirit.
	ClaimSpirit,
	/// Redeem a spirit.
	RedeemSpirit {
		/// Overlord signature over `(account, RedeemSpirit)`. Signed with the overlord key if
		/// missing.
		#[clap(long)]
		signature: Option<HexBytes>,
	},
	/// Buy a magic or legendary Origin of Shell.
	BuyRare {
		#[clap(long)]
		rarity: RarityType,
		#[clap(long)]
		race: RaceType,
		#[clap(long)]
		career: CareerType,
	},
	/// Buy a prime Origin of Shell as a whitelisted account.
	BuyPrime {
		/// Overlord signature over `(account, BuyPrimeOriginOfShells)`. Signed with the overlord
		/// key if missing.
		#[clap(long)]
		signature: Option<HexBytes>,
		#[clap(long)]
		race: RaceType,
		#[clap(long)]
		career: CareerType,
	},
	/// Preorder a prime Origin of Shell.
	Preorder {
		#[clap(long)]
		race: RaceType,
		#[clap(long)]
		career: CareerType,
	},
	/// Mint Origin of Shells of the chosen preorders. Overlord only.
	MintChosenPreorders {
		#[clap(required = true)]
		preorders: Vec<PreorderId>,
	},
	/// Refund preorders that were not chosen. Overlord only.
	RefundNotChosenPreorders {
		#[clap(required = true)]
		preorders: Vec<PreorderId>,
	},
	/// Move Origin of Shells between the for-sale and giveaway pools. Overlord only.
	UpdateRarityTypeCounts {
		#[clap(long)]
		rarity: RarityType,
		#[clap(long)]
		for_sale: u32,
		#[clap(long)]
		giveaway: u32,
	},
	/// Open or close a sale phase. Overlord only.
	SetStatusType {
		#[clap(long)]
		status: StatusType,
		#[clap(long, action = ArgAction::Set)]
		enabled: bool,
	},
	/// Open or close the incubation phase. Overlord only.
	SetIncubationStatus {
		#[clap(long, action = ArgAction::Set)]
		enabled: bool,
	},
	/// Feed an Origin of Shell.
	Feed {
		#[clap(long)]
		collection: CollectionId,
		#[clap(long)]
		nft: NftId,
	},
	/// Reduce hatch times of Origin of Shells. Overlord only.
	UpdateIncubationTime {
		/// Reductions as `<collection>:<nft>:<seconds>`.
		#[clap(required = true)]
		updates: Vec<HatchTimeUpdate>,
	},
	/// Reward the most fed Origin of Shells of an era with hatch time reductions. Overlord only.
	RewardTopFed {
		/// Defaults to the current era.
		#[clap(long)]
		era: Option<EraId>,
	},
	/// Mint an Origin of Shell outside of the sale. Overlord only.
	MintGift {
		#[clap(long, value_parser = parse_account)]
		owner: AccountId,
		#[clap(long)]
		rarity: RarityType,
		#[clap(long)]
		race: RaceType,
		#[clap(long)]
		career: CareerType,
		#[clap(long)]
		sale_type: NftSaleType,
	},
	/// Hatch an Origin of Shell into a shell. Overlord only.
	Hatch {
		#[clap(long, value_parser = parse_account)]
		owner: AccountId,
		#[clap(long)]
		collection: CollectionId,
		#[clap(long)]
		nft: NftId,
		/// Location of the shell file resource.
		#[clap(long)]
		metadata: String,
	},
	/// Attach a basic resource to an NFT. Overlord only.
	AddBasicResource {
		#[clap(long)]
		collection: CollectionId,
		#[clap(long)]
		nft: NftId,
		#[clap(long)]
		src: Option<String>,
		#[clap(long)]
		metadata: Option<String>,
		#[clap(long)]
		license: Option<String>,
		#[clap(long)]
		thumb: Option<String>,
	},
	/// Accept a pending resource of an owned NFT.
	AcceptResource {
		#[clap(long)]
		collection: CollectionId,
		#[clap(long)]
		nft: NftId,
		#[clap(long)]
		resource: ResourceId,
	},
}

/// Overlord signature given on the command line, or signed with the overlord key.
fn overlord_signature(
	signature: Option<HexBytes>,
	overlord: &OverlordSigningParams,
	account: &AccountId,
	purpose: Purpose,
) -> anyhow::Result<Signature> {
	match signature {
		Some(HexBytes(bytes)) => bytes.try_into().map_err(|bytes: Vec<u8>| {
			anyhow::format_err!("Signature must be 64 bytes long, got {} bytes", bytes.len())
		}),
		None => Ok(sign_overlord_message(&overlord.to_signer()?, account, purpose)),
	}
}

impl Transact {
	/// Build the call and the signer that has to submit it.
	async fn prepare<S: PhalaWorldStorage + ?Sized>(
		&self,
		storage: &S,
	) -> anyhow::Result<(DynamicPayload, Signer)> {
		let user = || self.signer.to_signer();
		let overlord = || self.overlord.to_signer();

		Ok(match &self.call {
			Call::ClaimSpirit => (calls::claim_spirit(), user()?),
			Call::RedeemSpirit { signature } => {
				let user = user()?;
				let signature = overlord_signature(
					signature.clone(),
					&self.overlord,
					&user.account(),
					Purpose::RedeemSpirit,
				)?;
				(calls::redeem_spirit(&signature), user)
			},
			Call::BuyRare { rarity, race, career } =>
				(calls::buy_rare_origin_of_shell(*rarity, *race, *career), user()?),
			Call::BuyPrime { signature, race, career } => {
				let user = user()?;
				let signature = overlord_signature(
					signature.clone(),
					&self.overlord,
					&user.account(),
					Purpose::BuyPrimeOriginOfShells,
				)?;
				(calls::buy_prime_origin_of_shell(&signature, *race, *career), user)
			},
			Call::Preorder { race, career } =>
				(calls::preorder_origin_of_shell(*race, *career), user()?),
			Call::MintChosenPreorders { preorders } =>
				(calls::mint_chosen_preorders(preorders), overlord()?),
			Call::RefundNotChosenPreorders { preorders } =>
				(calls::refund_not_chosen_preorders(preorders), overlord()?),
			Call::UpdateRarityTypeCounts { rarity, for_sale, giveaway } =>
				(calls::update_rarity_type_counts(*rarity, *for_sale, *giveaway), overlord()?),
			Call::SetStatusType { status, enabled } =>
				(calls::set_status_type(*enabled, *status), overlord()?),
			Call::SetIncubationStatus { enabled } =>
				(calls::set_can_start_incubation_status(*enabled), overlord()?),
			Call::Feed { collection, nft } =>
				(calls::feed_origin_of_shell(*collection, *nft), user()?),
			Call::UpdateIncubationTime { updates } =>
				(calls::update_incubation_time(updates), overlord()?),
			Call::RewardTopFed { era } => {
				let overlord = overlord()?;
				let (era, ranking) = queries::top_fed(storage, *era, TOP_FED_LIMIT).await?;
				let rewards = queries::hatch_time_rewards(&ranking, &DEFAULT_HATCH_TIME_REDUCTIONS);
				if rewards.is_empty() {
					return Err(anyhow::format_err!("No Origin of Shell was fed in era {era}"))
				}
				for (stat, reward) in ranking.iter().zip(&rewards) {
					log::info!(
						target: LOG_TARGET,
						"Origin of Shell {}/{} fed {} times in era {era}: hatch time reduced by {}s",
						stat.collection_id,
						stat.nft_id,
						stat.times_fed,
						reward.reduction_secs,
					);
				}
				(calls::update_incubation_time(&rewards), overlord)
			},
			Call::MintGift { owner, rarity, race, career, sale_type } => (
				calls::mint_gift_origin_of_shell(owner, *rarity, *race, *career, *sale_type),
				overlord()?,
			),
			Call::Hatch { owner, collection, nft, metadata } =>
				(calls::hatch_origin_of_shell(owner, *collection, *nft, metadata), overlord()?),
			Call::AddBasicResource { collection, nft, src, metadata, license, thumb } => {
				let resource = BasicResource {
					src: src.clone(),
					metadata: metadata.clone(),
					license: license.clone(),
					thumb: thumb.clone(),
				};
				(calls::add_basic_resource(*collection, *nft, &resource), overlord()?)
			},
			Call::AcceptResource { collection, nft, resource } =>
				(calls::accept_resource(*collection, *nft, *resource), user()?),
		})
	}

	/// Run the command.
	pub async fn run(self, client: &Client, output: OutputFormat) -> anyhow::Result<()> {
		let (call, signer) = self.prepare(client).await?;
		let outcome = client.submit(&call, &signer, !self.no_wait).await?;
		output.print(&outcome, [outcome_line(&outcome)])
	}
}

fn outcome_line(outcome: &TransactionOutcome) -> String {
	match outcome.block_hash {
		Some(block_hash) => format!(
			"Extrinsic {:?} finalized in block {:?}",
			outcome.extrinsic_hash, block_hash
		),
		None => format!("Extrinsic {:?} submitted", outcome.extrinsic_hash),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cli::{Cli, Command};
	use clap::Parser;
	use pw_client::{test_storage::MemoryStorage, verify_overlord_message};
	use pw_primitives::FoodStat;

	fn parse(args: &[&str]) -> Result<Transact, clap::Error> {
		let cli = Cli::try_parse_from(["phala-world", "tx"].iter().chain(args))?;
		match cli.command {
			Command::Tx(tx) => Ok(tx),
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn signing_options_follow_call() {
		// when
		let tx = parse(&[
			"buy-rare",
			"--rarity",
			"Legendary",
			"--race",
			"Cyborg",
			"--career",
			"HackerWizard",
			"--signer",
			"//Ferdie",
			"--no-wait",
		])
		.unwrap();

		// then
		assert_eq!(tx.signer.signer.as_deref(), Some("//Ferdie"));
		assert!(tx.no_wait);
		assert!(matches!(
			tx.call,
			Call::BuyRare {
				rarity: RarityType::Legendary,
				race: RaceType::Cyborg,
				career: CareerType::HackerWizard
			}
		));
	}

	#[test]
	fn preorder_lists_are_positional() {
		let tx = parse(&["mint-chosen-preorders", "0", "1", "2", "4", "10", "6", "12", "11"])
			.unwrap();

		let Call::MintChosenPreorders { preorders } = tx.call else {
			panic!("expected mint-chosen-preorders call")
		};
		assert_eq!(preorders, vec![0, 1, 2, 4, 10, 6, 12, 11]);
		assert!(parse(&["refund-not-chosen-preorders"]).is_err());
	}

	#[test]
	fn status_switch_takes_explicit_value() {
		let tx = parse(&["set-status-type", "--status", "ClaimSpirits", "--enabled", "false"])
			.unwrap();

		assert!(matches!(
			tx.call,
			Call::SetStatusType { status: StatusType::ClaimSpirits, enabled: false }
		));
		assert!(parse(&["set-incubation-status", "--enabled"]).is_err());
	}

	#[test]
	fn incubation_time_updates_are_parsed() {
		let tx = parse(&["update-incubation-time", "1:1:10800", "1:0:7200"]).unwrap();

		let Call::UpdateIncubationTime { updates } = tx.call else {
			panic!("expected update-incubation-time call")
		};
		assert_eq!(
			updates,
			vec![
				HatchTimeUpdate { collection_id: 1, nft_id: 1, reduction_secs: 10800 },
				HatchTimeUpdate { collection_id: 1, nft_id: 0, reduction_secs: 7200 },
			]
		);
		assert!(parse(&["update-incubation-time", "1:1"]).is_err());
	}

	#[test]
	fn given_signature_must_have_signature_length() {
		let account = AccountId::new([1; 32]);
		let overlord = OverlordSigningParams::default();

		let signature = overlord_signature(
			Some(HexBytes(vec![7; 64])),
			&overlord,
			&account,
			Purpose::RedeemSpirit,
		)
		.unwrap();
		assert_eq!(signature, [7; 64]);

		let err =
			overlord_signature(Some(HexBytes(vec![7; 63])), &overlord, &account, Purpose::RedeemSpirit)
				.unwrap_err();
		assert_eq!(err.to_string(), "Signature must be 64 bytes long, got 63 bytes");
	}

	#[test]
	fn missing_signature_is_signed_by_overlord() {
		// given
		let account = Signer::from_suri("//Ferdie", None).unwrap().account();
		let overlord =
			OverlordSigningParams { overlord: Some("//Alice".into()), ..Default::default() };

		// when
		let signature =
			overlord_signature(None, &overlord, &account, Purpose::BuyPrimeOriginOfShells).unwrap();

		// then
		let overlord = Signer::from_suri("//Alice", None).unwrap().account();
		assert!(verify_overlord_message(
			&overlord,
			&account,
			Purpose::BuyPrimeOriginOfShells,
			&signature
		));
	}

	fn fed(era: EraId, nft_id: NftId, times_fed: u32) -> FoodStat {
		FoodStat { era, collection_id: 1, nft_id, times_fed }
	}

	#[tokio::test]
	async fn top_fed_are_rewarded_by_overlord() {
		// given
		let storage = MemoryStorage {
			era: 4,
			food_stats: vec![fed(3, 0, 50), fed(4, 2, 3), fed(4, 5, 9), fed(4, 1, 3)],
			..Default::default()
		};
		let tx = parse(&["reward-top-fed", "--overlord", "//Alice", "--signer", "//Ferdie"]).unwrap();

		// when
		let (call, signer) = tx.prepare(&storage).await.unwrap();

		// then
		let expected = calls::update_incubation_time(&[
			HatchTimeUpdate { collection_id: 1, nft_id: 5, reduction_secs: 10800 },
			HatchTimeUpdate { collection_id: 1, nft_id: 2, reduction_secs: 7200 },
			HatchTimeUpdate { collection_id: 1, nft_id: 1, reduction_secs: 3600 },
		]);
		assert_eq!(call.pallet_name(), "PWIncubation");
		assert_eq!(call.call_name(), "update_incubation_time");
		assert_eq!(call.call_data(), expected.call_data());
		assert_eq!(signer.account(), Signer::from_suri("//Alice", None).unwrap().account());
	}

	#[tokio::test]
	async fn reward_of_era_without_feeding_is_refused() {
		let storage = MemoryStorage { era: 4, food_stats: vec![fed(4, 0, 1)], ..Default::default() };
		let tx = parse(&["reward-top-fed", "--era", "3", "--overlord", "//Alice"]).unwrap();

		let err = tx.prepare(&storage).await.unwrap_err();

		assert_eq!(err.to_string(), "No Origin of Shell was fed in era 3");
	}

	#[tokio::test]
	async fn user_calls_are_signed_by_user() {
		let storage = MemoryStorage::default();
		let tx = parse(&["feed", "--collection", "1", "--nft", "3", "--signer", "//Ferdie"]).unwrap();

		let (call, signer) = tx.prepare(&storage).await.unwrap();

		assert_eq!(call.pallet_name(), "PWIncubation");
		assert_eq!(call.call_data(), calls::feed_origin_of_shell(1, 3).call_data());
		assert_eq!(signer.account(), Signer::from_suri("//Ferdie", None).unwrap().account());

		let tx = parse(&["set-incubation-status", "--enabled", "true"]).unwrap();
		let err = tx.prepare(&storage).await.unwrap_err();
		assert_eq!(
			err.to_string(),
			"One of options must be specified: '--overlord' or '--overlord-file'"
		);
	}

	#[test]
	fn outcome_names_finalized_block() {
		let submitted = TransactionOutcome { extrinsic_hash: Default::default(), block_hash: None };
		let finalized = TransactionOutcome {
			extrinsic_hash: Default::default(),
			block_hash: Some(Default::default()),
		};

		assert!(outcome_line(&submitted).ends_with(" submitted"));
		assert!(outcome_line(&finalized).contains(" finalized in block 0x"));
		assert_eq!(
			OutputFormat::Json.render(&finalized, [outcome_line(&finalized)]).unwrap(),
			serde_json::to_string_pretty(&finalized).unwrap()
		);
	}
}
