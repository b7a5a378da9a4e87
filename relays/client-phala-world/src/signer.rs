// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

use crate::{calls::Signature, Error, Result};
use codec::Encode;
use pw_primitives::{to_ss58, AccountId, OverlordMessage, Purpose};
use std::fmt;
use subxt_signer::{
	sr25519::{self, Keypair},
	SecretUri,
};

/// Transaction signer.
#[derive(Clone)]
pub struct Signer {
	keypair: Keypair,
}

impl Signer {
	/// Create signer from a secret URI (`//Alice`, mnemonic, `0x` seed, with optional
	/// `//hard` and `/soft` junctions).
	///
	/// `password` is appended to the URI unless the URI carries one already.
	pub fn from_suri(suri: &str, password: Option<&str>) -> Result<Self> {
		let suri = suri.trim();
		let suri = match password {
			Some(password) if !suri.contains("///") => format!("{suri}///{password}"),
			_ => suri.to_owned(),
		};
		let uri: SecretUri = suri.parse().map_err(|e| Error::InvalidSecretUri(format!("{e}")))?;
		let keypair = Keypair::from_uri(&uri).map_err(|e| Error::InvalidSecretUri(format!("{e}")))?;
		Ok(Signer { keypair })
	}

	/// Account of the signer.
	pub fn account(&self) -> AccountId {
		AccountId::new(self.keypair.public_key().0)
	}

	pub(crate) fn keypair(&self) -> &Keypair {
		&self.keypair
	}

	/// Sign arbitrary bytes.
	pub fn sign(&self, message: &[u8]) -> Signature {
		self.keypair.sign(message).0
	}
}

impl fmt::Display for Signer {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&to_ss58(&self.account()))
	}
}

impl fmt::Debug for Signer {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Signer").field("account", &to_ss58(&self.account())).finish()
	}
}

/// Sign the overlord message that authorizes `account` to act for `purpose`.
pub fn sign_overlord_message(overlord: &Signer, account: &AccountId, purpose: Purpose) -> Signature {
	let message = OverlordMessage { account: account.clone(), purpose };
	overlord.sign(&message.encode())
}

/// Check that `signature` authorizes `account` to act for `purpose` on behalf of `overlord`.
pub fn verify_overlord_message(
	overlord: &AccountId,
	account: &AccountId,
	purpose: Purpose,
	signature: &Signature,
) -> bool {
	let message = OverlordMessage { account: account.clone(), purpose };
	let public_key = sr25519::PublicKey(overlord.clone().into());
	sr25519::verify(&sr25519::Signature(*signature), message.encode(), &public_key)
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;

	const ALICE_PUBLIC: [u8; 32] =
		hex!("d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d");

	#[test]
	fn dev_suri_resolves_to_dev_account() {
		let alice = Signer::from_suri("//Alice", None).unwrap();

		assert_eq!(alice.account(), AccountId::new(ALICE_PUBLIC));
	}

	#[test]
	fn password_changes_derived_account() {
		let plain = Signer::from_suri("//Alice", None).unwrap();
		let protected = Signer::from_suri("//Alice", Some("secret")).unwrap();
		let inline = Signer::from_suri("//Alice///secret", Some("ignored")).unwrap();

		assert_ne!(plain.account(), protected.account());
		assert_eq!(protected.account(), inline.account());
	}

	#[test]
	fn garbage_suri_is_rejected() {
		assert!(matches!(
			Signer::from_suri("definitely not a mnemonic", None),
			Err(Error::InvalidSecretUri(_))
		));
	}

	#[test]
	fn overlord_signature_is_bound_to_account_and_purpose() {
		// given
		let overlord = Signer::from_suri("//Alice", None).unwrap();
		let ferdie = Signer::from_suri("//Ferdie", None).unwrap().account();
		let charlie = Signer::from_suri("//Charlie", None).unwrap().account();

		// when
		let signature = sign_overlord_message(&overlord, &ferdie, Purpose::RedeemSpirit);

		// then
		let overlord = overlord.account();
		assert!(verify_overlord_message(&overlord, &ferdie, Purpose::RedeemSpirit, &signature));
		assert!(!verify_overlord_message(
			&overlord,
			&ferdie,
			Purpose::BuyPrimeOriginOfShells,
			&signature
		));
		assert!(!verify_overlord_message(&overlord, &charlie, Purpose::RedeemSpirit, &signature));
	}
}
