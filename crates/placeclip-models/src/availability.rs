//! Geographic availability of a place.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Address sub-fields, in the order the extraction prompt asks for them.
pub const AVAILABILITY_FIELDS: [&str; 6] = [
    "street_address",
    "city",
    "county",
    "state",
    "country",
    "region",
];

/// Where a place can be found.
///
/// Every field is always present; unknown parts are the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Availability {
    pub street_address: String,
    pub city: String,
    pub county: String,
    pub state: String,
    pub country: String,
    /// Wider area such as "Bali" or "the Amalfi Coast"
    pub region: String,
}

impl Availability {
    /// True when no address part is known.
    pub fn is_empty(&self) -> bool {
        self.street_address.is_empty()
            && self.city.is_empty()
            && self.county.is_empty()
            && self.state.is_empty()
            && self.country.is_empty()
            && self.region.is_empty()
    }

    /// Single-line address: street, city, state (or region), country.
    ///
    /// Empty parts are skipped so the result never has doubled, leading or
    /// trailing separators.
    pub fn one_line(&self) -> String {
        let state_or_region = if self.state.is_empty() {
            self.region.as_str()
        } else {
            self.state.as_str()
        };

        [
            self.street_address.as_str(),
            self.city.as_str(),
            state_or_region,
            self.country.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}
