// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use hyper::ext::ReasonPhrase;
use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use snafu::{ResultExt, ensure};
use tracing::{debug, info, warn};

use crate::{
    connection_url::{endpoint_url, extract_parameter, strip_user_info},
    error::{ConfigurationError, Error, InvalidProxySnafu, Result, UnsupportedOperationSnafu},
    transport::{Credentials, EndpointVersion, Proxy, Transport, TransportKind},
};

/// Connect and read timeout applied to every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Ordered query parameters of a single request
pub type ParamSet = Vec<(&'static str, String)>;

/// Addressing derived from the connection URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Base URL with the query string and user info stripped
    pub endpoint_url:          String,
    pub database_name:         Option<String>,
    pub retention_policy_name: Option<String>,
    pub bucket_name:           Option<String>,
    pub organization:          Option<String>,
}

impl EndpointConfig {
    /// Reads all four addressing parameters regardless of version
    pub fn from_url(url: &str) -> Self {
        Self {
            endpoint_url:          strip_user_info(endpoint_url(url)),
            database_name:         extract_parameter(url, "db"),
            retention_policy_name: extract_parameter(url, "rp"),
            bucket_name:           extract_parameter(url, "bucket"),
            organization:          extract_parameter(url, "org"),
        }
    }

    /// Checks that the parameters match the endpoint version.
    ///
    /// Each version rejects the other's addressing fields instead of
    /// ignoring them.
    pub fn validate(&self, version: EndpointVersion) -> Result<(), ConfigurationError> {
        match version {
            EndpointVersion::V1 => {
                ensure!(
                    self.database_name.is_some(),
                    crate::error::NoDatabaseSpecifiedSnafu
                );
                ensure!(
                    self.bucket_name.is_none(),
                    crate::error::BucketNotSupportedInV1Snafu
                );
            }
            EndpointVersion::V2 => {
                ensure!(
                    self.database_name.is_none(),
                    crate::error::DatabaseNotSupportedInV2Snafu
                );
                ensure!(
                    self.retention_policy_name.is_none(),
                    crate::error::RetentionPolicyNotSupportedInV2Snafu
                );
                ensure!(
                    self.bucket_name.is_some(),
                    crate::error::BucketRequiredInV2Snafu
                );
                ensure!(
                    self.organization.is_some(),
                    crate::error::OrganizationRequiredInV2Snafu
                );
            }
        }
        Ok(())
    }

    /// Base parameters of every query and write for the given version
    fn parameters(&self, version: EndpointVersion) -> ParamSet {
        // Fields were checked by `validate`, so the fallbacks never apply.
        match version {
            EndpointVersion::V1 => {
                let mut params = vec![("db", self.database_name.clone().unwrap_or_default())];
                if let Some(rp) = &self.retention_policy_name {
                    params.push(("rp", rp.clone()));
                }
                params
            }
            EndpointVersion::V2 => vec![
                ("org", self.organization.clone().unwrap_or_default()),
                ("bucket", self.bucket_name.clone().unwrap_or_default()),
            ],
        }
    }
}

/// HTTP(S) transport
///
/// Holds one client session whose auth, headers and proxy are reconfigured
/// in place and reused for every request.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxwire_client::{EndpointVersion, HttpTransport, Transport};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut transport =
///         HttpTransport::new("http://localhost:8086?bucket=metrics&org=acme", EndpointVersion::V2)?;
///     transport.set_api_token("my-token")?;
///     transport.send("cpu,host=a value=1".to_string())?;
///     println!("{}", transport.query("SELECT * FROM cpu")?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    config:     EndpointConfig,
    version:    EndpointVersion,
    client:     Client,
    basic_auth: Option<Credentials>,
    headers:    HeaderMap,
}

impl HttpTransport {
    /// Creates a transport for the given URL and endpoint version
    ///
    /// # Errors
    /// Returns `Error::Configuration` when the URL's addressing parameters
    /// do not fit the endpoint version
    pub fn new<S: AsRef<str>>(url: S, version: EndpointVersion) -> Result<Self> {
        let config = EndpointConfig::from_url(url.as_ref());
        config.validate(version)?;

        let client = Self::build_client(None)?;

        info!(
            "Created HTTP transport for {} (endpoint {})",
            config.endpoint_url, version
        );
        Ok(Self {
            config,
            version,
            client,
            basic_auth: None,
            headers: HeaderMap::new(),
        })
    }

    pub fn endpoint(&self) -> &EndpointConfig { &self.config }

    pub fn version(&self) -> EndpointVersion { self.version }

    /// Base parameters for the configured endpoint version
    pub fn parameters(&self) -> ParamSet { self.config.parameters(self.version) }

    fn build_client(proxy: Option<&Proxy>) -> Result<Client> {
        let builder = Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT);

        let builder = match proxy {
            // Without an explicit proxy, ignore proxy environment variables
            None => builder.no_proxy(),
            Some(proxy) => {
                let mut route = reqwest::Proxy::all(proxy.address()).context(InvalidProxySnafu {
                    proxy: proxy.address().to_string(),
                })?;
                if let Some(auth) = proxy.authentication() {
                    route = route.basic_auth(&auth.user, &auth.password);
                }
                builder.proxy(route)
            }
        };

        Ok(builder.build()?)
    }

    fn url(&self, path: &str) -> String { format!("{}{}", self.config.endpoint_url, path) }

    /// Applies the configured headers and credentials.
    ///
    /// A configured `Authorization` header (the API token) takes the place of
    /// basic authentication, so a request never carries two of them.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.headers(self.headers.clone());
        match &self.basic_auth {
            Some(auth) if !self.headers.contains_key(AUTHORIZATION) => {
                request.basic_auth(&auth.user, Some(&auth.password))
            }
            _ => request,
        }
    }

    fn get_query(&self, q: &str) -> Result<String> {
        let url = self.url("/query");
        let mut params = self.parameters();
        params.push(("q", q.to_string()));

        debug!("GET {} ({})", url, param_names(&params));
        let response = self.authorize(self.client.get(&url)).query(&params).send();
        let response = check_response(response)?;
        Ok(response.text()?)
    }
}

fn param_names(params: &ParamSet) -> String {
    params.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(",")
}

/// Reason phrase from the status line, falling back to the canonical text
/// when the server sent the standard one (hyper only keeps non-standard
/// phrases).
fn reason_phrase(response: &Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Turns the outcome of a request into an error unless it succeeded.
///
/// Failures before a status was received become `Error::Request` carrying the
/// client's message as is, even when empty; non-2xx statuses become
/// `Error::RequestFailed` with the server's own reason text.
pub(crate) fn check_response(response: reqwest::Result<Response>) -> Result<Response> {
    let response = response.map_err(|err| {
        let err = Error::from(err);
        warn!("{}", err);
        err
    })?;

    let status = response.status();
    if !status.is_success() {
        let err = Error::RequestFailed {
            status: status.as_u16(),
            reason: reason_phrase(&response),
        };
        warn!("{}", err);
        return Err(err);
    }
    Ok(response)
}

impl Transport for HttpTransport {
    fn kind(&self) -> TransportKind { TransportKind::Http }

    fn send(&mut self, payload: String) -> Result<()> {
        let url = self.url("/write");

        debug!(
            "POST {} ({}, {} bytes)",
            url,
            param_names(&self.parameters()),
            payload.len()
        );
        let request = self
            .authorize(self.client.post(&url))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .query(&self.parameters())
            .body(payload);
        check_response(request.send())?;
        Ok(())
    }

    fn query(&mut self, query: &str) -> Result<String> { self.get_query(query) }

    fn execute(&mut self, command: &str) -> Result<String> { self.get_query(command) }

    fn create_database(&mut self) -> Result<()> {
        ensure!(
            self.version == EndpointVersion::V1,
            UnsupportedOperationSnafu {
                operation: "create_database",
                transport: format!("{} (endpoint {})", self.kind(), self.version),
            }
        );

        let database = self.config.database_name.clone().unwrap_or_default();
        let url = self.url("/query");
        debug!("POST {} (CREATE DATABASE {})", url, database);

        let request = self
            .authorize(self.client.post(&url))
            .query(&[("q", format!("CREATE DATABASE {database}"))]);
        check_response(request.send())?;
        Ok(())
    }

    fn set_proxy(&mut self, proxy: &Proxy) -> Result<()> {
        info!("Routing requests through proxy {}", proxy.address());
        self.client = Self::build_client(Some(proxy))?;
        Ok(())
    }

    fn set_basic_authentication(&mut self, user: &str, password: &str) -> Result<()> {
        debug!("Enabling basic authentication for user {}", user);
        self.basic_auth = Some(Credentials {
            user:     user.to_string(),
            password: password.to_string(),
        });
        Ok(())
    }

    fn set_api_token(&mut self, token: &str) -> Result<()> {
        let mut value =
            HeaderValue::from_str(&format!("Token {token}")).map_err(|_| Error::InvalidApiToken)?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn params(pairs: &[(&'static str, &str)]) -> ParamSet {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_v1_parameters() {
        let transport =
            HttpTransport::new("http://localhost:8086?db=mydb", EndpointVersion::V1).unwrap();
        assert_eq!(transport.parameters(), params(&[("db", "mydb")]));
        assert_eq!(transport.endpoint().endpoint_url, "http://localhost:8086");
    }

    #[test]
    fn test_v1_parameters_with_retention_policy() {
        let transport =
            HttpTransport::new("http://localhost:8086/?rp=weekly&db=mydb", EndpointVersion::V1)
                .unwrap();
        assert_eq!(
            transport.parameters(),
            params(&[("db", "mydb"), ("rp", "weekly")])
        );
        assert_eq!(transport.endpoint().endpoint_url, "http://localhost:8086");
    }

    #[test]
    fn test_v2_parameters() {
        let transport =
            HttpTransport::new("http://localhost:8086?bucket=b1&org=org1", EndpointVersion::V2)
                .unwrap();
        assert_eq!(
            transport.parameters(),
            params(&[("org", "org1"), ("bucket", "b1")])
        );
    }

    #[test_case("http://localhost:8086", EndpointVersion::V1, ConfigurationError::NoDatabaseSpecified ; "v1 without db")]
    #[test_case("http://localhost:8086?db=mydb&bucket=b1", EndpointVersion::V1, ConfigurationError::BucketNotSupportedInV1 ; "v1 with db and bucket")]
    #[test_case("http://localhost:8086?bucket=b1", EndpointVersion::V1, ConfigurationError::NoDatabaseSpecified ; "v1 bucket only reports db first")]
    #[test_case("http://localhost:8086?db=mydb&bucket=b1&org=o", EndpointVersion::V2, ConfigurationError::DatabaseNotSupportedInV2 ; "v2 with db")]
    #[test_case("http://localhost:8086?rp=weekly&bucket=b1&org=o", EndpointVersion::V2, ConfigurationError::RetentionPolicyNotSupportedInV2 ; "v2 with rp")]
    #[test_case("http://localhost:8086?org=o", EndpointVersion::V2, ConfigurationError::BucketRequiredInV2 ; "v2 without bucket")]
    #[test_case("http://localhost:8086?bucket=b1", EndpointVersion::V2, ConfigurationError::OrganizationRequiredInV2 ; "v2 without org")]
    fn test_validation_errors(url: &str, version: EndpointVersion, expected: ConfigurationError) {
        let err = HttpTransport::new(url, version).unwrap_err();
        assert_eq!(err.as_configuration(), Some(&expected), "got {err:?}");
    }

    #[test]
    fn test_v1_bucket_conflict_with_db_present() {
        let err =
            HttpTransport::new("http://localhost:8086?db=mydb&bucket=b1", EndpointVersion::V1)
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bucket provided in URL but not supported for endpoint v1"
        );
    }

    #[test]
    fn test_endpoint_url_drops_credentials() {
        let transport =
            HttpTransport::new("https://admin:pw@influx:8086/?db=mydb", EndpointVersion::V1)
                .unwrap();
        assert_eq!(transport.endpoint().endpoint_url, "https://influx:8086");
    }

    #[test]
    fn test_empty_database_counts_as_present() {
        let transport = HttpTransport::new("http://localhost:8086?db=", EndpointVersion::V1);
        assert!(transport.is_ok());
    }

    #[test]
    fn test_create_database_unsupported_in_v2() {
        // Port 9 (discard) is never contacted: the check fails first.
        let mut transport =
            HttpTransport::new("http://127.0.0.1:9?bucket=b1&org=org1", EndpointVersion::V2)
                .unwrap();
        let err = transport.create_database().unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedOperation { operation: "create_database", .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn test_set_api_token_stores_header() {
        let mut transport =
            HttpTransport::new("http://localhost:8086?db=mydb", EndpointVersion::V1).unwrap();
        transport.set_api_token("abc123").unwrap();
        assert_eq!(
            transport.headers.get(AUTHORIZATION).unwrap(),
            &HeaderValue::from_static("Token abc123")
        );
    }

    #[test]
    fn test_param_names_keep_order() {
        let transport =
            HttpTransport::new("http://localhost:8086/?rp=weekly&db=mydb", EndpointVersion::V1)
                .unwrap();
        assert_eq!(param_names(&transport.parameters()), "db,rp");
    }

    #[test]
    fn test_set_api_token_rejects_control_characters() {
        let mut transport =
            HttpTransport::new("http://localhost:8086?db=mydb", EndpointVersion::V1).unwrap();
        assert!(matches!(
            transport.set_api_token("bad\ntoken"),
            Err(Error::InvalidApiToken)
        ));
    }

    #[test]
    fn test_set_proxy_rejects_invalid_address() {
        let mut transport =
            HttpTransport::new("http://localhost:8086?db=mydb", EndpointVersion::V1).unwrap();
        let err = transport.set_proxy(&Proxy::new("not a url")).unwrap_err();
        assert!(matches!(err, Error::InvalidProxy { .. }), "got {err:?}");
    }
}
