//! Provider traits for fetching transparency data.
//!
//! This module groups the data operations by category:
//!
//! - [`TransparencyProvider`] - Base trait for all providers
//! - [`LoadDataProvider`] - Total and market load per bidding zone
//! - [`GenerationDataProvider`] - Generation, energy balance, installed capacity
//! - [`TransmissionDataProvider`] - Scheduled exchanges and physical flows
//!
//! Every operation returns `Ok(None)` when the upstream has no rows for the
//! request.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    error::Result,
    table::Table,
    types::{BiddingZone, EnergyBalanceType, GenerationType},
};

/// Base trait for all transparency data providers.
pub trait TransparencyProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Terna").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for electricity load.
#[async_trait]
pub trait LoadDataProvider: TransparencyProvider {
    /// Fetches actual and forecast total load for a bidding zone.
    async fn total_load(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        zone: &BiddingZone,
    ) -> Result<Option<Table>>;

    /// Fetches market load for a bidding zone.
    async fn market_load(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        zone: &BiddingZone,
    ) -> Result<Option<Table>>;
}

/// Provider for generation data.
#[async_trait]
pub trait GenerationDataProvider: TransparencyProvider {
    /// Fetches actual generation for a source type.
    async fn actual_generation(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        generation_type: &GenerationType,
    ) -> Result<Option<Table>>;

    /// Fetches renewable generation for a source type.
    async fn renewable_generation(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        generation_type: &GenerationType,
    ) -> Result<Option<Table>>;

    /// Fetches an item of the national energy balance.
    async fn energy_balance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        balance_type: &EnergyBalanceType,
    ) -> Result<Option<Table>>;

    /// Fetches installed capacity for a year, indexed by year.
    async fn installed_capacity(
        &self,
        year: i32,
        generation_type: &GenerationType,
    ) -> Result<Option<Table>>;
}

/// Provider for cross-zonal and cross-border transmission data.
#[async_trait]
pub trait TransmissionDataProvider: TransparencyProvider {
    /// Fetches scheduled exchanges with foreign countries.
    async fn scheduled_foreign_exchange(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Table>>;

    /// Fetches scheduled exchanges between internal bidding zones.
    async fn scheduled_internal_exchange(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Table>>;

    /// Fetches physical flows with foreign countries.
    async fn physical_foreign_flow(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Table>>;

    /// Fetches physical flows between internal bidding zones.
    async fn physical_internal_flow(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Table>>;
}
