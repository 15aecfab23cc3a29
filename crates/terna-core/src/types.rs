//! Query selector types for the Terna transparency API.
//!
//! This module defines the typed arguments accepted by the data operations:
//!
//! - [`BiddingZone`] - Market zone for load data
//! - [`GenerationType`] - Generation source for generation and capacity data
//! - [`EnergyBalanceType`] - Balance item for the energy balance
//! - [`DateRange`] - Inclusive day range sent as `dateFrom` / `dateTo`
//!
//! The selector types wrap free-form strings so that values added upstream can
//! be used without a new release; the associated constants cover the values
//! the API documents today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::error::{Result, TernaError};

/// Date format expected by the `dateFrom` / `dateTo` query parameters.
pub const API_DATE_FORMAT: &str = "%d/%m/%Y";

macro_rules! selector {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$cmeta:meta])* $konst:ident => $value:literal),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            $(
                $(#[$cmeta])*
                pub const $konst: Self = Self(Cow::Borrowed($value));
            )*

            /// Creates a selector from an arbitrary upstream value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(Cow::Owned(value.into()))
            }

            /// Returns the value sent to the API.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }
    };
}

selector! {
    /// A bidding zone of the Italian market.
    BiddingZone {
        /// The whole country.
        ITALY => "Italy",
        /// Northern zone.
        NORTH => "North",
        /// Centre-North zone.
        CENTRE_NORTH => "Centre-North",
        /// Centre-South zone.
        CENTRE_SOUTH => "Centre-South",
        /// Southern zone.
        SOUTH => "South",
        /// Calabria zone.
        CALABRIA => "Calabria",
        /// Sicily zone.
        SICILY => "Sicily",
        /// Sardinia zone.
        SARDINIA => "Sardinia",
    }
}

selector! {
    /// A generation source.
    GenerationType {
        /// Thermal plants.
        THERMAL => "Thermal",
        /// Hydro plants.
        HYDRO => "Hydro",
        /// Wind farms.
        WIND => "Wind",
        /// Geothermal plants.
        GEOTHERMAL => "Geothermal",
        /// Photovoltaic plants.
        PHOTOVOLTAIC => "Photovoltaic",
        /// Self-consumption of producers.
        SELF_CONSUMPTION => "Self-consumption",
        /// Biomass plants.
        BIOMASS => "Biomass",
    }
}

selector! {
    /// An item of the national energy balance.
    EnergyBalanceType {
        /// Thermal production.
        THERMAL => "Thermal",
        /// Hydro production.
        HYDRO => "Hydro",
        /// Wind production.
        WIND => "Wind",
        /// Geothermal production.
        GEOTHERMAL => "Geothermal",
        /// Photovoltaic production.
        PHOTOVOLTAIC => "Photovoltaic",
        /// Self-consumption of producers.
        SELF_CONSUMPTION => "Self-consumption",
        /// Consumption for pumped storage.
        PUMPING_CONSUMPTION => "Pumping-consumption",
        /// Net imports.
        NET_FOREIGN_EXCHANGE => "Net Foreign Exchange",
    }
}

/// An inclusive range of days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting a start after the end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(TernaError::InvalidParameter(format!(
                "Start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Returns the `dateFrom` / `dateTo` query parameters for this range.
    #[must_use]
    pub fn to_params(&self) -> [(&'static str, String); 2] {
        [
            ("dateFrom", self.start.format(API_DATE_FORMAT).to_string()),
            ("dateTo", self.end.format(API_DATE_FORMAT).to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_constants_and_custom_values() {
        assert_eq!(BiddingZone::CENTRE_NORTH.as_str(), "Centre-North");
        assert_eq!(GenerationType::SELF_CONSUMPTION.to_string(), "Self-consumption");
        assert_eq!(
            EnergyBalanceType::NET_FOREIGN_EXCHANGE.as_str(),
            "Net Foreign Exchange"
        );

        let zone = BiddingZone::from("North");
        assert_eq!(zone, BiddingZone::NORTH);
    }

    #[test]
    fn test_date_range_params() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 6).unwrap(),
        )
        .unwrap();

        let params = range.to_params();
        assert_eq!(params[0], ("dateFrom", "05/01/2023".to_string()));
        assert_eq!(params[1], ("dateTo", "06/01/2023".to_string()));
    }

    #[test]
    fn test_date_range_rejects_inverted_range() {
        let result = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        );
        assert!(matches!(result, Err(TernaError::InvalidParameter(_))));
    }

    #[test]
    fn test_single_day_range_is_valid() {
        let day = NaiveDate::from_ymd_opt(2023, 3, 26).unwrap();
        assert!(DateRange::new(day, day).is_ok());
    }
}
