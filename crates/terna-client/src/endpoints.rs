//! Endpoint paths and the provider trait implementations for [`TernaClient`].
//!
//! Each operation maps its arguments to a path and ordered query parameters
//! and hands them to [`TernaClient::fetch`].

use async_trait::async_trait;
use chrono::NaiveDate;
use terna_core::{
    BiddingZone, DateRange, EnergyBalanceType, GenerationDataProvider, GenerationType,
    LoadDataProvider, Result, Table, TransmissionDataProvider, TransparencyProvider,
};

use crate::{QueryParams, TernaClient};

/// Total load (actual and forecast) per bidding zone.
pub const TOTAL_LOAD: &str = "gettotalload";
/// Market load per bidding zone.
pub const MARKET_LOAD: &str = "getmarketload";
/// Actual generation per source type.
pub const ACTUAL_GENERATION: &str = "getactualgeneration";
/// Renewable generation per source type.
pub const RENEWABLE_GENERATION: &str = "getrenewablegeneration";
/// National energy balance.
pub const ENERGY_BALANCE: &str = "getenergybalance";
/// Installed capacity per year and source type.
pub const INSTALLED_CAPACITY: &str = "getinstalledcapacity";
/// Scheduled foreign exchange.
pub const SCHEDULED_FOREIGN_EXCHANGE: &str = "getscheduledforeignexchange";
/// Scheduled internal exchange.
pub const SCHEDULED_INTERNAL_EXCHANGE: &str = "getscheduledinternalexchange";
/// Physical foreign flow.
pub const PHYSICAL_FOREIGN_FLOW: &str = "getphysicalforeignflow";
/// Physical internal flow.
pub const PHYSICAL_INTERNAL_FLOW: &str = "getphysicalinternalflow";

fn range_params(start: NaiveDate, end: NaiveDate) -> Result<QueryParams> {
    Ok(DateRange::new(start, end)?.to_params().into())
}

fn range_params_with(
    start: NaiveDate,
    end: NaiveDate,
    name: &'static str,
    value: &str,
) -> Result<QueryParams> {
    let mut params = range_params(start, end)?;
    params.push((name, value.to_string()));
    Ok(params)
}

impl TransparencyProvider for TernaClient {
    fn name(&self) -> &str {
        "Terna"
    }

    fn description(&self) -> &str {
        "Terna transparency data: load, generation, capacity, exchanges and flows of the Italian grid"
    }
}

#[async_trait]
impl LoadDataProvider for TernaClient {
    async fn total_load(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        zone: &BiddingZone,
    ) -> Result<Option<Table>> {
        let params = range_params_with(start, end, "biddingZone", zone.as_str())?;
        self.fetch(TOTAL_LOAD, &params).await
    }

    async fn market_load(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        zone: &BiddingZone,
    ) -> Result<Option<Table>> {
        let params = range_params_with(start, end, "biddingZone", zone.as_str())?;
        self.fetch(MARKET_LOAD, &params).await
    }
}

#[async_trait]
impl GenerationDataProvider for TernaClient {
    async fn actual_generation(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        generation_type: &GenerationType,
    ) -> Result<Option<Table>> {
        let params = range_params_with(start, end, "type", generation_type.as_str())?;
        self.fetch(ACTUAL_GENERATION, &params).await
    }

    async fn renewable_generation(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        generation_type: &GenerationType,
    ) -> Result<Option<Table>> {
        let params = range_params_with(start, end, "type", generation_type.as_str())?;
        self.fetch(RENEWABLE_GENERATION, &params).await
    }

    async fn energy_balance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        balance_type: &EnergyBalanceType,
    ) -> Result<Option<Table>> {
        let params = range_params_with(start, end, "type", balance_type.as_str())?;
        self.fetch(ENERGY_BALANCE, &params).await
    }

    async fn installed_capacity(
        &self,
        year: i32,
        generation_type: &GenerationType,
    ) -> Result<Option<Table>> {
        let params: QueryParams = vec![
            ("year", year.to_string()),
            ("type", generation_type.as_str().to_string()),
        ];
        self.fetch(INSTALLED_CAPACITY, &params).await
    }
}

#[async_trait]
impl TransmissionDataProvider for TernaClient {
    async fn scheduled_foreign_exchange(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Table>> {
        self.fetch(SCHEDULED_FOREIGN_EXCHANGE, &range_params(start, end)?)
            .await
    }

    async fn scheduled_internal_exchange(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Table>> {
        self.fetch(SCHEDULED_INTERNAL_EXCHANGE, &range_params(start, end)?)
            .await
    }

    async fn physical_foreign_flow(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Table>> {
        self.fetch(PHYSICAL_FOREIGN_FLOW, &range_params(start, end)?)
            .await
    }

    async fn physical_internal_flow(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Table>> {
        self.fetch(PHYSICAL_INTERNAL_FLOW, &range_params(start, end)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use serde_json::json;
    use std::time::Duration;
    use terna_core::TernaError;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn client(server: &MockServer) -> TernaClient {
        Mock::given(method("POST"))
            .and(path("/oauth/accessToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok",
                "expires_in": 3600
            })))
            .mount(server)
            .await;

        TernaClient::new(
            ClientConfig::new("key", "secret")
                .with_auth_url(format!("{}/oauth/accessToken", server.uri()))
                .with_base_url(format!("{}/v1.0", server.uri()))
                .with_min_interval(Duration::from_millis(1)),
        )
        .unwrap()
    }

    fn empty() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"result": {"status": "OK"}}))
    }

    #[test]
    fn test_range_params_order() {
        let params = range_params_with(date(2023, 3, 1), date(2023, 3, 2), "type", "Wind").unwrap();
        assert_eq!(
            params,
            vec![
                ("dateFrom", "01/03/2023".to_string()),
                ("dateTo", "02/03/2023".to_string()),
                ("type", "Wind".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_generation_endpoints_send_type() {
        let server = MockServer::start().await;
        let client = client(&server).await;

        for endpoint in [ACTUAL_GENERATION, RENEWABLE_GENERATION] {
            Mock::given(method("GET"))
                .and(path(format!("/v1.0/{endpoint}")))
                .and(query_param("type", "Photovoltaic"))
                .and(query_param("dateTo", "31/01/2023"))
                .respond_with(empty())
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path(format!("/v1.0/{ENERGY_BALANCE}")))
            .and(query_param("type", "Net Foreign Exchange"))
            .respond_with(empty())
            .expect(1)
            .mount(&server)
            .await;

        let (start, end) = (date(2023, 1, 1), date(2023, 1, 31));
        let pv = GenerationType::PHOTOVOLTAIC;
        assert!(client.actual_generation(start, end, &pv).await.unwrap().is_none());
        assert!(client.renewable_generation(start, end, &pv).await.unwrap().is_none());
        assert!(
            client
                .energy_balance(start, end, &EnergyBalanceType::NET_FOREIGN_EXCHANGE)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_installed_capacity_is_indexed_by_year() {
        let server = MockServer::start().await;
        let client = client(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/v1.0/{INSTALLED_CAPACITY}")))
            .and(query_param("year", "2022"))
            .and(query_param("type", "Wind"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"status": "OK"},
                "installedCapacity": [
                    {"Year": "2022", "Type": "Wind", "Installed_Capacity_MW": "11858.2"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let table = client
            .installed_capacity(2022, &GenerationType::WIND)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(table.index().years(), Some(&[2022][..]));
        assert_eq!(
            table.column("Installed_Capacity_MW").unwrap().as_numeric(),
            Some(&[Some(11_858.2)][..])
        );
    }

    #[tokio::test]
    async fn test_transmission_endpoints_send_only_dates() {
        let server = MockServer::start().await;
        let client = client(&server).await;

        for endpoint in [
            SCHEDULED_FOREIGN_EXCHANGE,
            SCHEDULED_INTERNAL_EXCHANGE,
            PHYSICAL_FOREIGN_FLOW,
            PHYSICAL_INTERNAL_FLOW,
        ] {
            Mock::given(method("GET"))
                .and(path(format!("/v1.0/{endpoint}")))
                .and(query_param("dateFrom", "01/02/2023"))
                .and(query_param("dateTo", "02/02/2023"))
                .respond_with(empty())
                .expect(1)
                .mount(&server)
                .await;
        }

        let (start, end) = (date(2023, 2, 1), date(2023, 2, 2));
        assert!(client.scheduled_foreign_exchange(start, end).await.unwrap().is_none());
        assert!(client.scheduled_internal_exchange(start, end).await.unwrap().is_none());
        assert!(client.physical_foreign_flow(start, end).await.unwrap().is_none());
        assert!(client.physical_internal_flow(start, end).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected_before_any_request() {
        let server = MockServer::start().await;
        let client = client(&server).await;

        let err = client
            .market_load(date(2023, 2, 2), date(2023, 2, 1), &BiddingZone::SOUTH)
            .await
            .unwrap_err();
        assert!(matches!(err, TernaError::InvalidParameter(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_provider_metadata() {
        let client = TernaClient::new(ClientConfig::new("key", "secret")).unwrap();
        assert_eq!(client.name(), "Terna");
        assert!(!client.description().is_empty());
    }
}
