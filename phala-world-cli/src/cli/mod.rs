// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Deal with CLI args of the Phala World client.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

mod chain_schema;
mod query;
mod sign_message;
mod transact;

/// Parse CLI args.
pub fn parse_args() -> Cli {
	Cli::parse()
}

/// Phala World NFT sale and incubation client.
#[derive(Debug, Parser)]
#[clap(author, about, version)]
pub struct Cli {
	/// Format of the command output.
	#[clap(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub output: OutputFormat,
	/// Prefix log lines with a timestamp.
	#[clap(long, global = true)]
	pub log_timestamps: bool,
	#[clap(flatten)]
	pub connection: chain_schema::ConnectionParams,
	#[clap(subcommand)]
	pub command: Command,
}

/// Phala World commands.
#[derive(Debug, Subcommand)]
pub enum Command {
	/// Read the state of the sale and incubation pallets.
	Query(query::Query),
	/// Sign and submit a transaction to the sale, incubation or RMRK pallets.
	///
	/// Overlord-only calls are signed with the overlord key, all other calls with the user key.
	Tx(transact::Transact),
	/// Sign an overlord message that lets an account redeem a spirit or buy a prime Origin of
	/// Shell. Works offline.
	SignOverlordMessage(sign_message::SignOverlordMessage),
}

impl Cli {
	/// Run the command.
	pub async fn run(self) -> anyhow::Result<()> {
		initialize_logger(self.log_timestamps);
		let Cli { output, connection, command, .. } = self;
		match command {
			Command::Query(arg) => arg.run(&connection.into_client().await?, output).await?,
			Command::Tx(arg) => arg.run(&connection.into_client().await?, output).await?,
			Command::SignOverlordMessage(arg) => arg.run(output)?,
		}
		Ok(())
	}
}

/// Initialize logger: `warn` for everything and `info` for the client, unless `RUST_LOG` says
/// otherwise.
fn initialize_logger(with_timestamp: bool) {
	let env = env_logger::Env::default().default_filter_or("warn,phala-world=info");
	let mut builder = env_logger::Builder::from_env(env);
	if !with_timestamp {
		builder.format_timestamp(None);
	}
	let _ = builder.try_init();
}

/// Format of the command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// One human readable line per record.
	Text,
	/// Single JSON document.
	Json,
}

impl OutputFormat {
	/// Render command result: `lines` in text mode, `value` in JSON mode.
	pub fn render<T: Serialize>(
		self,
		value: &T,
		lines: impl IntoIterator<Item = String>,
	) -> anyhow::Result<String> {
		Ok(match self {
			OutputFormat::Text => lines.into_iter().collect::<Vec<_>>().join("\n"),
			OutputFormat::Json => serde_json::to_string_pretty(value)?,
		})
	}

	/// Print command result to stdout.
	pub fn print<T: Serialize>(
		self,
		value: &T,
		lines: impl IntoIterator<Item = String>,
	) -> anyhow::Result<()> {
		print_rendered(&self.render(value, lines)?);
		Ok(())
	}
}

/// Print rendered command output, if there's any.
pub fn print_rendered(rendered: &str) {
	if !rendered.is_empty() {
		println!("{rendered}");
	}
}

/// Nicer formatting for raw bytes vectors.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl std::str::FromStr for HexBytes {
	type Err = hex::FromHexError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(hex::decode(s.strip_prefix("0x").unwrap_or(s))?))
	}
}

impl std::fmt::Debug for HexBytes {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(fmt, "{}", self)
	}
}

impl std::fmt::Display for HexBytes {
	fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(fmt, "0x{}", hex::encode(&self.0))
	}
}

impl Serialize for HexBytes {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_is_well_formed() {
		Cli::command().debug_assert();
	}

	#[test]
	fn hex_bytes_accept_optional_prefix() {
		assert_eq!("0xdead".parse::<HexBytes>(), Ok(HexBytes(vec![0xde, 0xad])));
		assert_eq!("dead".parse::<HexBytes>(), Ok(HexBytes(vec![0xde, 0xad])));
		assert!("0xdea".parse::<HexBytes>().is_err());
		assert_eq!(HexBytes(vec![1, 2]).to_string(), "0x0102");
	}

	#[test]
	fn global_options_follow_subcommands() {
		// when
		let cli = Cli::try_parse_from([
			"phala-world",
			"query",
			"era",
			"--output",
			"json",
			"--uri",
			"wss://khala.api.onfinality.io/public-ws",
		])
		.unwrap();

		// then
		assert_eq!(cli.output, OutputFormat::Json);
		assert_eq!(
			cli.connection.uri.as_deref(),
			Some("wss://khala.api.onfinality.io/public-ws")
		);
		assert!(matches!(cli.command, Command::Query(_)));
	}

	#[test]
	fn output_defaults_to_text() {
		let cli = Cli::try_parse_from(["phala-world", "query", "status"]).unwrap();

		assert_eq!(cli.output, OutputFormat::Text);
		assert_eq!(cli.connection.host, "127.0.0.1");
		assert_eq!(cli.connection.port, 9944);
	}

	#[test]
	fn output_is_rendered_as_lines_or_json() {
		#[derive(Serialize)]
		struct Era {
			era: u64,
		}

		let lines = || vec!["Current era: 3".to_owned(), "Next era: 4".to_owned()];

		assert_eq!(
			OutputFormat::Text.render(&Era { era: 3 }, lines()).unwrap(),
			"Current era: 3\nNext era: 4"
		);
		assert_eq!(OutputFormat::Json.render(&Era { era: 3 }, lines()).unwrap(), "{\n  \"era\": 3\n}");
		assert_eq!(OutputFormat::Text.render(&Era { era: 3 }, Vec::new()).unwrap(), "");
	}

	#[test]
	fn unknown_output_format_is_rejected() {
		assert!(Cli::try_parse_from(["phala-world", "--output", "yaml", "query", "era"]).is_err());
	}
}
