// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

use crate::cli::{chain_schema::OverlordSigningParams, HexBytes, OutputFormat};
use clap::Args;
use pw_client::sign_overlord_message;
use pw_primitives::{parse_account, to_ss58, AccountId, Purpose};
use serde::Serialize;

/// Sign an overlord message.
#[derive(Args, Debug)]
pub struct SignOverlordMessage {
	#[clap(flatten)]
	overlord: OverlordSigningParams,
	/// SS58 address of the account that is allowed to act.
	#[clap(long, value_parser = parse_account)]
	account: AccountId,
	/// What the account is allowed to do: `RedeemSpirit` or `BuyPrimeOriginOfShells`.
	#[clap(long)]
	purpose: Purpose,
}

#[derive(Serialize)]
struct SignedMessage {
	overlord: String,
	account: String,
	purpose: Purpose,
	signature: HexBytes,
}

impl SignOverlordMessage {
	/// Run the command.
	pub fn run(self, output: OutputFormat) -> anyhow::Result<()> {
		let overlord = self.overlord.to_signer()?;
		let signature = sign_overlord_message(&overlord, &self.account, self.purpose);
		let signed = SignedMessage {
			overlord: overlord.to_string(),
			account: to_ss58(&self.account),
			purpose: self.purpose,
			signature: HexBytes(signature.to_vec()),
		};
		output.print(&signed, [signed.signature.to_string()])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cli::{Cli, Command};
	use clap::Parser;

	#[test]
	fn purpose_is_required() {
		let account = "5DAAnrj7VHTznn2AWBemMuyBwZWs6FNFjdyVXUeYum3PTXFy";

		let cli = Cli::try_parse_from([
			"phala-world",
			"sign-overlord-message",
			"--account",
			account,
			"--purpose",
			"redeemspirit",
			"--overlord",
			"//Alice",
		])
		.unwrap();

		let Command::SignOverlordMessage(cmd) = cli.command else {
			panic!("expected sign-overlord-message command")
		};
		assert_eq!(cmd.purpose, Purpose::RedeemSpirit);
		assert_eq!(cmd.account, parse_account(account).unwrap());
		assert!(Cli::try_parse_from(["phala-world", "sign-overlord-message", "--account", account])
			.is_err());
	}
}
