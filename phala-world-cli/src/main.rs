// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Phala World NFT sale and incubation client.

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	// `.env` is optional.
	let _ = dotenv::dotenv();
	cli::parse_args().run().await
}
