use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::tfs::config::{expand_env_vars, ConnectionConfig};
use crate::tfs::error::TfsError;

/// Maximum number of redirect hops followed for a single request.
pub const MAX_REDIRECTS: usize = 10;

/// Base HTTP client for TFS API communication.
/// Builds endpoint urls and sends authenticated requests.
#[derive(Debug, Clone)]
pub struct BaseClient {
    pub client: reqwest::Client,
    pub config: ConnectionConfig,
}

impl BaseClient {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        // Redirects are followed by hand in `send` so the credentials can be
        // put back on every hop.
        let mut client_builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none())
            .use_rustls_tls();

        if let Some(proxy_url) = &config.proxy {
            let proxy_url = expand_env_vars(proxy_url)?;
            let proxy = reqwest::Proxy::all(&proxy_url)
                .with_context(|| format!("Invalid proxy URL: {proxy_url}"))?;
            client_builder = client_builder.proxy(proxy);
            info!("🔀 Using proxy from config: {proxy_url}");
        }

        let client = client_builder.build()?;
        Ok(Self { client, config })
    }

    /// Url scoped to a collection, e.g. `{base}/{collection}/_apis/projects`.
    pub fn collection_url(
        &self,
        collection: &str,
        area: &str,
        resource: &str,
        query: &str,
    ) -> Result<Url, TfsError> {
        let collection = self.effective_collection(collection)?;
        self.formatted_url(&[collection, "_apis", area, resource], query)
    }

    /// Url scoped to a project inside a collection, e.g.
    /// `{base}/{collection}/{project}/_apis/distributedtask/variablegroups`.
    pub fn project_url(
        &self,
        collection: &str,
        project: &str,
        area: &str,
        resource: &str,
        query: &str,
    ) -> Result<Url, TfsError> {
        let collection = self.effective_collection(collection)?;
        let project = self.effective_project(project)?;
        self.formatted_url(&[collection, project, "_apis", area, resource], query)
    }

    pub fn effective_collection<'a>(&'a self, collection: &'a str) -> Result<&'a str, TfsError> {
        non_empty_or(collection, &self.config.collection).ok_or_else(|| TfsError::missing("collection"))
    }

    pub fn effective_project<'a>(&'a self, project: &'a str) -> Result<&'a str, TfsError> {
        non_empty_or(project, &self.config.project).ok_or_else(|| TfsError::missing("project"))
    }

    fn formatted_url(&self, segments: &[&str], query: &str) -> Result<Url, TfsError> {
        let mut url = Url::parse(self.config.tfsurl.trim())?;
        let base_path = url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        url.set_path(&base_path);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| TfsError::InvalidUrl {
                    source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
                })?;
            path.pop_if_empty();
            path.extend(
                segments
                    .iter()
                    .flat_map(|segment| segment.split('/'))
                    .filter(|segment| !segment.is_empty()),
            );
        }
        url.set_query((!query.is_empty()).then_some(query));
        Ok(url)
    }

    pub async fn get(&self, url: Url) -> Result<Response, TfsError> {
        self.send(Method::GET, url, None).await
    }

    pub async fn post(&self, url: Url, json_body: String) -> Result<Response, TfsError> {
        self.send(Method::POST, url, Some(json_body)).await
    }

    /// Sends a request with the basic auth header, following redirects and
    /// attaching the header again on every hop.
    async fn send(
        &self,
        mut method: Method,
        mut url: Url,
        mut body: Option<String>,
    ) -> Result<Response, TfsError> {
        for _ in 0..=MAX_REDIRECTS {
            debug!("🔗 {method} {url}");
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .basic_auth("", Some(&self.config.pat));
            if let Some(body) = &body {
                debug!("Request body:\n{body}");
                request = request
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone());
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_redirection() {
                return Ok(response);
            }

            let Some(next) = response
                .headers()
                .get(LOCATION)
                .and_then(|location| location.to_str().ok())
                .and_then(|location| url.join(location).ok())
            else {
                return Ok(response);
            };

            if matches!(
                status,
                StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::SEE_OTHER
            ) && method != Method::GET
                && method != Method::HEAD
            {
                method = Method::GET;
                body = None;
            }
            debug!("↪️ {status} redirect to {next}");
            url = next;
        }

        Err(TfsError::TooManyRedirects {
            limit: MAX_REDIRECTS,
        })
    }

    /// Turns an error status into [`TfsError::Api`] and decodes the body otherwise.
    pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TfsError> {
        let response = Self::check_status(response)?;
        let response_text = response.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            log::error!("Failed to decode response. Error: {e}");
            log::error!(
                "Response body (first 500 chars): {}",
                &response_text.chars().take(500).collect::<String>()
            );
            TfsError::Decode { source: e }
        })
    }

    pub fn check_status(response: Response) -> Result<Response, TfsError> {
        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(TfsError::Api { status });
        }
        Ok(response)
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> Option<&'a str> {
    [value, default]
        .into_iter()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
}

impl TryFrom<&ConnectionConfig> for BaseClient {
    type Error = anyhow::Error;

    fn try_from(config: &ConnectionConfig) -> Result<Self, Self::Error> {
        Self::new(config.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    /// `":token"` base64 encoded.
    pub const TEST_AUTH: &str = "Basic OnRva2Vu";

    pub fn test_config(tfsurl: &str, collection: &str, project: &str) -> ConnectionConfig {
        ConnectionConfig {
            tfsurl: tfsurl.to_string(),
            pat: "token".to_string(),
            collection: collection.to_string(),
            project: project.to_string(),
            proxy: None,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn test_client(tfsurl: &str, collection: &str, project: &str) -> BaseClient {
        BaseClient::new(test_config(tfsurl, collection, project)).unwrap()
    }

    #[rstest]
    #[case("http://tfsrepository.mydomain.com:8080/tfs/", "", "", "http://tfsrepository.mydomain.com:8080/tfs/defcol/defproj/_apis")]
    #[case("http://tfsrepository.mydomain.com:8080/tfs/", "colone", "projone", "http://tfsrepository.mydomain.com:8080/tfs/colone/projone/_apis")]
    #[case("http://tfsrepository.mydomain.com:8080/tfs", "colone", "projone", "http://tfsrepository.mydomain.com:8080/tfs/colone/projone/_apis")]
    #[case("http://tfsrepository.mydomain.com:8080/tfs/", "col-one", "proj-one", "http://tfsrepository.mydomain.com:8080/tfs/col-one/proj-one/_apis")]
    #[case("http://simpleintranet:8080", "col-one", "proj-one", "http://simpleintranet:8080/col-one/proj-one/_apis")]
    #[case("http://simpleintranet:8080/", "col-one", "proj-one", "http://simpleintranet:8080/col-one/proj-one/_apis")]
    #[case("http://tfsrepository.mydomain.com:8080/tfs//", "colone", "projone", "http://tfsrepository.mydomain.com:8080/tfs/colone/projone/_apis")]
    #[case("http://tfsrepository.mydomain.com:8080//tfs///", "", "", "http://tfsrepository.mydomain.com:8080/tfs/defcol/defproj/_apis")]
    fn project_url_joins_segments(
        #[case] tfsurl: &str,
        #[case] collection: &str,
        #[case] project: &str,
        #[case] expected: &str,
    ) {
        let client = test_client(tfsurl, "defcol", "defproj");
        let url = client.project_url(collection, project, "", "", "").unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn valid_args_win_over_empty_defaults() {
        let client = test_client("http://tfsrepository.mydomain.com:8080/tfs", "", "");
        let url = client
            .project_url("awesomecol", "awesomeproj", "", "", "")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://tfsrepository.mydomain.com:8080/tfs/awesomecol/awesomeproj/_apis"
        );
    }

    #[test]
    fn missing_collection_is_an_error() {
        let client = test_client("http://tfsrepository.mydomain.com:8080/tfs/", "", "");
        let err = client.collection_url("", "", "projects", "").unwrap_err();
        assert!(matches!(err, TfsError::MissingParameter { ref name } if name == "collection"));
        let err = client.project_url("", "", "", "", "").unwrap_err();
        assert!(matches!(err, TfsError::MissingParameter { .. }));
    }

    #[test]
    fn missing_project_is_an_error() {
        let client = test_client("http://tfs:8080/tfs", "defcol", "");
        let err = client.project_url("", "", "", "", "").unwrap_err();
        assert!(matches!(err, TfsError::MissingParameter { ref name } if name == "project"));
    }

    #[test]
    fn area_resource_and_query_are_appended() {
        let client = test_client("http://tfs:8080/tfs/", "defcol", "defproj");
        let url = client
            .project_url(
                "",
                "",
                "distributedtask",
                "variablegroups",
                "groupName=*&actionFilter=use&top=50&api-version=4.1-preview.1",
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://tfs:8080/tfs/defcol/defproj/_apis/distributedtask/variablegroups?groupName=*&actionFilter=use&top=50&api-version=4.1-preview.1"
        );

        let url = client
            .collection_url("", "", "distributedtask/variablegroups", "")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://tfs:8080/tfs/defcol/_apis/distributedtask/variablegroups"
        );
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        let client = test_client("not a url", "defcol", "defproj");
        let err = client.collection_url("", "", "projects", "").unwrap_err();
        assert!(matches!(err, TfsError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn sends_basic_auth_with_empty_username() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tfs/col/_apis/projects")
            .match_header("authorization", TEST_AUTH)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = test_client(&format!("{}/tfs", server.url()), "col", "");
        let url = client.collection_url("", "", "projects", "").unwrap();
        let response = client.get(url).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn redirect_keeps_authorization_header() {
        let mut server = mockito::Server::new_async().await;
        let moved = server
            .mock("GET", "/tfs/col/_apis/projects")
            .match_header("authorization", TEST_AUTH)
            .with_status(302)
            .with_header("location", "/tfs/moved/_apis/projects")
            .create_async()
            .await;
        let target = server
            .mock("GET", "/tfs/moved/_apis/projects")
            .match_header("authorization", TEST_AUTH)
            .with_status(200)
            .with_body(r#"{"count": 0, "value": []}"#)
            .create_async()
            .await;

        let client = test_client(&format!("{}/tfs", server.url()), "col", "");
        let url = client.collection_url("", "", "projects", "").unwrap();
        let response = client.get(url).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        moved.assert_async().await;
        target.assert_async().await;
    }

    #[tokio::test]
    async fn temporary_redirect_keeps_post_body() {
        let mut server = mockito::Server::new_async().await;
        let moved = server
            .mock("POST", "/tfs/create")
            .with_status(307)
            .with_header("location", "/tfs/created")
            .create_async()
            .await;
        let target = server
            .mock("POST", "/tfs/created")
            .match_header("authorization", TEST_AUTH)
            .match_header("content-type", "application/json")
            .match_body(r#"{"name":"x"}"#)
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&format!("{}/tfs", server.url()), "col", "");
        let url = Url::parse(&format!("{}/tfs/create", server.url())).unwrap();
        client.post(url, r#"{"name":"x"}"#.to_string()).await.unwrap();
        moved.assert_async().await;
        target.assert_async().await;
    }

    #[tokio::test]
    async fn redirect_loop_is_cut_off() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tfs/loop")
            .with_status(302)
            .with_header("location", "/tfs/loop")
            .expect(MAX_REDIRECTS + 1)
            .create_async()
            .await;

        let client = test_client(&format!("{}/tfs", server.url()), "col", "");
        let url = Url::parse(&format!("{}/tfs/loop", server.url())).unwrap();
        let err = client.get(url).await.unwrap_err();
        assert!(matches!(err, TfsError::TooManyRedirects { limit: MAX_REDIRECTS }));
    }

    #[tokio::test]
    async fn error_status_is_reported_with_status_line() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tfs/col/_apis/projects")
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(&format!("{}/tfs", server.url()), "col", "");
        let url = client.collection_url("", "", "projects", "").unwrap();
        let response = client.get(url).await.unwrap();
        let err = BaseClient::decode::<serde_json::Value>(response)
            .await
            .unwrap_err();
        assert!(matches!(err, TfsError::Api { status } if status == StatusCode::UNAUTHORIZED));
        assert!(err.to_string().ends_with("401 Unauthorized"));
    }

    #[tokio::test]
    async fn bad_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tfs/col/_apis/projects")
            .with_status(200)
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let client = test_client(&format!("{}/tfs", server.url()), "col", "");
        let url = client.collection_url("", "", "projects", "").unwrap();
        let response = client.get(url).await.unwrap();
        let err = BaseClient::decode::<serde_json::Value>(response)
            .await
            .unwrap_err();
        assert!(matches!(err, TfsError::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let client = test_client("http://127.0.0.1:1/tfs", "col", "");
        let url = client.collection_url("", "", "projects", "").unwrap();
        let err = client.get(url).await.unwrap_err();
        assert!(matches!(err, TfsError::Transport { .. }));
    }
}
