// Copyright (C) Phala Network.
// SPDX-License-Identifier: Apache-2.0

//! Origin of Shell attributes stored in `Uniques::Attribute`.

use crate::{CareerType, RaceType, RarityType};
use codec::{Decode, Encode};
use serde::Serialize;
use std::{fmt, str::FromStr};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

/// Attribute key of an Origin of Shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, IntoStaticStr, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttributeKey {
	Race,
	Career,
	Rarity,
}

impl AttributeKey {
	/// Raw key bytes, as used in the `Uniques::Attribute` storage key.
	pub fn as_bytes(&self) -> &'static [u8] {
		let key: &'static str = self.into();
		key.as_bytes()
	}
}

/// Typed attribute value of an Origin of Shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NftAttribute {
	Race(RaceType),
	Career(CareerType),
	Rarity(RarityType),
}

/// Attribute value that can't be interpreted as the expected type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseAttributeError {
	pub key: AttributeKey,
	pub value: Vec<u8>,
}

impl fmt::Display for ParseAttributeError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "unrecognized {} attribute value 0x{}", self.key, hex::encode(&self.value))
	}
}

impl std::error::Error for ParseAttributeError {}

impl NftAttribute {
	/// Key under which this attribute is stored.
	pub fn key(&self) -> AttributeKey {
		match self {
			NftAttribute::Race(_) => AttributeKey::Race,
			NftAttribute::Career(_) => AttributeKey::Career,
			NftAttribute::Rarity(_) => AttributeKey::Rarity,
		}
	}

	/// Decode attribute value stored under `key`.
	///
	/// Values are normally the SCALE encoding of the attribute enum. Values written by hand
	/// through `Uniques::set_attribute` hold the variant name instead, which is accepted too.
	pub fn decode(key: AttributeKey, value: &[u8]) -> Result<Self, ParseAttributeError> {
		let parsed = match key {
			AttributeKey::Race => decode_enum(value).map(NftAttribute::Race),
			AttributeKey::Career => decode_enum(value).map(NftAttribute::Career),
			AttributeKey::Rarity => decode_enum(value).map(NftAttribute::Rarity),
		};
		parsed.ok_or_else(|| ParseAttributeError { key, value: value.to_vec() })
	}

	/// Parse attribute from `key` and variant name.
	pub fn parse(key: AttributeKey, value: &str) -> Result<Self, ParseAttributeError> {
		let parsed = match key {
			AttributeKey::Race => value.parse().ok().map(NftAttribute::Race),
			AttributeKey::Career => value.parse().ok().map(NftAttribute::Career),
			AttributeKey::Rarity => value.parse().ok().map(NftAttribute::Rarity),
		};
		parsed.ok_or_else(|| ParseAttributeError { key, value: value.as_bytes().to_vec() })
	}
}

impl fmt::Display for NftAttribute {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			NftAttribute::Race(race) => fmt::Display::fmt(race, f),
			NftAttribute::Career(career) => fmt::Display::fmt(career, f),
			NftAttribute::Rarity(rarity) => fmt::Display::fmt(rarity, f),
		}
	}
}

fn decode_enum<T: Decode + FromStr>(value: &[u8]) -> Option<T> {
	if value.len() == 1 {
		return T::decode(&mut &value[..]).ok()
	}
	std::str::from_utf8(value).ok().and_then(|name| name.parse().ok())
}

/// Encoded attribute value, as the sale pallet writes it.
pub fn encode_attribute(attribute: &NftAttribute) -> Vec<u8> {
	match attribute {
		NftAttribute::Race(race) => race.encode(),
		NftAttribute::Career(career) => career.encode(),
		NftAttribute::Rarity(rarity) => rarity.encode(),
	}
}
