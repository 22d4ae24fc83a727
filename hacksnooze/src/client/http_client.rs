use futures::{Future, IntoFuture};
use log::info;
use reqwest::header::ACCEPT;
use reqwest::r#async::{Client as ReqwestClient, Response};
use serde::Serialize;
use url::Url;

use crate::error::Error;

#[derive(Clone)]
pub(super) struct HttpClient {
    base_url: Url,
    reqwest: ReqwestClient,
}

impl HttpClient {
    pub(super) fn new(base_url: Url, reqwest: ReqwestClient) -> Self {
        HttpClient { base_url, reqwest }
    }

    pub(super) fn get(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> impl Future<Item = Response, Error = Error> {
        let request_url = self.base_url.join(path);
        let client = self.reqwest.clone();
        let token = token.map(str::to_owned);

        request_url
            .map_err(Error::from)
            .into_future()
            .and_then(move |mut url| {
                if let Some(token) = token {
                    url.query_pairs_mut().append_pair("token", &token);
                }
                info!("GET {}", url.path());

                client
                    .get(url.as_str())
                    .header(ACCEPT, "application/json")
                    .send()
                    .map_err(Error::from)
            })
    }

    pub(super) fn post<B>(&self, path: &str, body: B) -> impl Future<Item = Response, Error = Error>
    where
        B: Serialize + Send + 'static,
    {
        let request_url = self.base_url.join(path);
        let client = self.reqwest.clone();

        request_url
            .map_err(Error::from)
            .into_future()
            .and_then(move |url| {
                info!("POST {}", url.path());

                client
                    .post(url.as_str())
                    .header(ACCEPT, "application/json")
                    .json(&body)
                    .send()
                    .map_err(Error::from)
            })
    }

    pub(super) fn delete<B>(
        &self,
        path: &str,
        body: B,
    ) -> impl Future<Item = Response, Error = Error>
    where
        B: Serialize + Send + 'static,
    {
        let request_url = self.base_url.join(path);
        let client = self.reqwest.clone();

        request_url
            .map_err(Error::from)
            .into_future()
            .and_then(move |url| {
                info!("DELETE {}", url.path());

                client
                    .delete(url.as_str())
                    .header(ACCEPT, "application/json")
                    .json(&body)
                    .send()
                    .map_err(Error::from)
            })
    }
}
