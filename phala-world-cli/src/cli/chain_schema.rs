// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

use clap::Args;
use pw_client::{Client, Signer};
use std::path::PathBuf;

/// Node connection params.
#[derive(Args, Debug, PartialEq, Eq, Clone)]
pub struct ConnectionParams {
	/// WS endpoint of the node: full URI. Overrides all other connection string components
	/// (host, port, secure).
	#[clap(long, env = "ENDPOINT", global = true)]
	pub uri: Option<String>,
	/// WS endpoint of the node: host component.
	#[clap(long, default_value = "127.0.0.1", global = true)]
	pub host: String,
	/// WS endpoint of the node: port component.
	#[clap(long, default_value = "9944", global = true)]
	pub port: u16,
	/// Use secure websocket connection.
	#[clap(long, global = true)]
	pub secure: bool,
}

impl ConnectionParams {
	/// Connect to the node.
	pub async fn into_client(self) -> anyhow::Result<Client> {
		Ok(Client::new(pw_client::ConnectionParams {
			uri: self.uri,
			host: self.host,
			port: self.port,
			secure: self.secure,
		})
		.await?)
	}
}

/// User signing params.
#[derive(Args, Debug, PartialEq, Eq, Clone, Default)]
pub struct SigningParams {
	/// The SURI of secret key to use when user transactions are submitted.
	#[clap(long, env = "USER_PRIVKEY", hide_env_values = true, global = true)]
	pub signer: Option<String>,
	/// The password for the SURI of user secret key.
	#[clap(long, global = true)]
	pub signer_password: Option<String>,
	/// Path to the file, that contains SURI of user secret key. Can be overridden with
	/// `--signer` option.
	#[clap(long, global = true)]
	pub signer_file: Option<PathBuf>,
	/// Path to the file, that contains password for the SURI of user secret key. Can be
	/// overridden with `--signer-password` option.
	#[clap(long, global = true)]
	pub signer_password_file: Option<PathBuf>,
}

impl SigningParams {
	/// Parse signing params into signer.
	pub fn to_signer(&self) -> anyhow::Result<Signer> {
		load_signer(
			SuriSource { value: &self.signer, file: &self.signer_file, option: "signer" },
			SuriSource {
				value: &self.signer_password,
				file: &self.signer_password_file,
				option: "signer-password",
			},
		)
	}
}

/// Overlord signing params.
#[derive(Args, Debug, PartialEq, Eq, Clone, Default)]
pub struct OverlordSigningParams {
	/// The SURI of the overlord secret key.
	#[clap(long, env = "OVERLORD_PRIVKEY", hide_env_values = true, global = true)]
	pub overlord: Option<String>,
	/// The password for the SURI of the overlord secret key.
	#[clap(long, global = true)]
	pub overlord_password: Option<String>,
	/// Path to the file, that contains SURI of the overlord secret key. Can be overridden with
	/// `--overlord` option.
	#[clap(long, global = true)]
	pub overlord_file: Option<PathBuf>,
	/// Path to the file, that contains password for the SURI of the overlord secret key. Can be
	/// overridden with `--overlord-password` option.
	#[clap(long, global = true)]
	pub overlord_password_file: Option<PathBuf>,
}

impl OverlordSigningParams {
	/// Parse overlord signing params into signer.
	pub fn to_signer(&self) -> anyhow::Result<Signer> {
		load_signer(
			SuriSource { value: &self.overlord, file: &self.overlord_file, option: "overlord" },
			SuriSource {
				value: &self.overlord_password,
				file: &self.overlord_password_file,
				option: "overlord-password",
			},
		)
	}
}

struct SuriSource<'a> {
	value: &'a Option<String>,
	file: &'a Option<PathBuf>,
	option: &'static str,
}

impl SuriSource<'_> {
	fn read(&self) -> anyhow::Result<Option<String>> {
		match (self.value, self.file) {
			(Some(value), _) => Ok(Some(value.to_owned())),
			(None, Some(file)) => std::fs::read_to_string(file)
				.map(|value| Some(value.trim_end().to_owned()))
				.map_err(|err| {
					anyhow::format_err!("Failed to read {} from file {:?}: {}", self.option, file, err)
				}),
			(None, None) => Ok(None),
		}
	}
}

fn load_signer(suri: SuriSource, password: SuriSource) -> anyhow::Result<Signer> {
	let Some(suri_value) = suri.read()? else {
		return Err(anyhow::format_err!(
			"One of options must be specified: '--{}' or '--{}-file'",
			suri.option,
			suri.option,
		))
	};
	let password = password.read()?;
	let signer = Signer::from_suri(&suri_value, password.as_deref())?;
	log::debug!(target: pw_client::LOG_TARGET, "Using {} key of {signer}", suri.option);
	Ok(signer)
}
