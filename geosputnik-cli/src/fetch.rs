use std::future::Future;

use geosputnik_lib::{Error, Result, offline::Fetcher};
use tracing::debug;

/// [`Fetcher`] over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("geosputnik/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> {
        let url = url.to_string();
        async move {
            debug!("GET {url}");
            let failed = |e: reqwest::Error| Error::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            };

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(failed)?;
            let body = response.bytes().await.map_err(failed)?;

            Ok(body.to_vec())
        }
    }
}
