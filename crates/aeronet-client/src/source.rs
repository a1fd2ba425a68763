//! Abstraction over where raw AERONET responses come from.

use std::sync::Arc;

use async_trait::async_trait;

use aeronet_common::{AeronetResult, Query};

use crate::client::AeronetClient;

/// A provider of raw AERONET response text.
///
/// `AeronetClient` is the production implementation; tests substitute an
/// in-memory source.
#[async_trait]
pub trait AodSource: Send + Sync {
    /// Raw data response for a query.
    async fn fetch_aod(&self, query: &Query) -> AeronetResult<String>;

    /// Raw site locations file.
    async fn fetch_sites(&self) -> AeronetResult<String>;
}

#[async_trait]
impl AodSource for AeronetClient {
    async fn fetch_aod(&self, query: &Query) -> AeronetResult<String> {
        self.fetch_aod_text(query).await
    }

    async fn fetch_sites(&self) -> AeronetResult<String> {
        self.fetch_sites_text().await
    }
}

#[async_trait]
impl<T: AodSource + ?Sized> AodSource for Arc<T> {
    async fn fetch_aod(&self, query: &Query) -> AeronetResult<String> {
        (**self).fetch_aod(query).await
    }

    async fn fetch_sites(&self) -> AeronetResult<String> {
        (**self).fetch_sites().await
    }
}
