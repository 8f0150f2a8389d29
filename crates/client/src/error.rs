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

use snafu::Snafu;

/// Common result type for client operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Client error types
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The connection URL has no discoverable scheme
    #[snafu(display("Ill-formed URI: {url}"))]
    IllFormedUri { url: String },

    /// The URL scheme does not map to any known transport
    #[snafu(display("Unrecognized backend {scheme}"))]
    UnsupportedBackend { scheme: String },

    /// A socket transport was given a URL without a host
    #[snafu(display("No host specified in URL for {scheme} transport"))]
    MissingHost { scheme: String },

    /// A socket transport was given a URL without a port
    #[snafu(display("No port specified in URL for {scheme} transport"))]
    MissingPort { scheme: String },

    /// URL parameters are inconsistent with the endpoint version
    #[snafu(transparent)]
    Configuration { source: ConfigurationError },

    /// Textual endpoint version that is neither `v1` nor `v2`
    #[snafu(display("Unknown endpoint version '{version}'"))]
    UnknownEndpointVersion { version: String },

    /// Operation has no meaning for this transport or endpoint version
    #[snafu(display("{operation} is not supported by the {transport} transport"))]
    UnsupportedOperation {
        operation: &'static str,
        transport: String,
    },

    /// Failure before any HTTP status was received
    #[snafu(display("Request error: ({code}) {message}"))]
    Request { code: i32, message: String },

    /// Non-success HTTP status
    #[snafu(display("Request failed: ({status}) {reason}"))]
    RequestFailed { status: u16, reason: String },

    /// API token that cannot be carried in an HTTP header
    #[snafu(display("API token contains characters not allowed in an HTTP header"))]
    InvalidApiToken,

    /// Proxy address rejected by the HTTP client
    #[snafu(display("Invalid proxy '{proxy}': {source}"))]
    InvalidProxy {
        proxy:  String,
        source: reqwest::Error,
    },

    /// Socket level failure in the TCP, UDP or Unix transports
    #[snafu(display("Socket error: {source}"))]
    Io { source: std::io::Error },
}

/// Endpoint version validation failures raised while constructing an HTTP
/// transport
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigurationError {
    #[snafu(display("No Database specified in URL"))]
    NoDatabaseSpecified,

    #[snafu(display("Bucket provided in URL but not supported for endpoint v1"))]
    BucketNotSupportedInV1,

    #[snafu(display("Database provided in URL but not supported for endpoint v2"))]
    DatabaseNotSupportedInV2,

    #[snafu(display("Retention policy provided in URL but not supported for endpoint v2"))]
    RetentionPolicyNotSupportedInV2,

    #[snafu(display("Bucket is required as URL parameter for endpoint version v2"))]
    BucketRequiredInV2,

    #[snafu(display("Organization is required as URL parameter for endpoint version v2"))]
    OrganizationRequiredInV2,
}

impl Error {
    /// Returns the configuration error if this is one
    pub fn as_configuration(&self) -> Option<&ConfigurationError> {
        match self {
            Error::Configuration { source } => Some(source),
            _ => None,
        }
    }

    /// True for failures that happened on the wire
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Request { .. } | Error::RequestFailed { .. } | Error::Io { .. }
        )
    }

    /// HTTP status of the response, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Numeric class of a transport-level request failure.
///
/// The values follow the error codes used by libcurl based clients so that
/// messages such as `Request error: (28) ...` stay familiar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[repr(i32)]
pub enum RequestErrorCode {
    InvalidUrlFormat       = 3,
    HostResolutionFailure  = 6,
    ConnectionFailure      = 7,
    TooManyRedirects       = 47,
    NetworkSendFailure     = 55,
    NetworkReceiveError    = 56,
    OperationTimedOut      = 28,
    ProxyResolutionFailure = 5,
    UnknownError           = 1000,
}

impl RequestErrorCode {
    /// Classifies an HTTP client error
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestErrorCode::OperationTimedOut
        } else if err.is_connect() {
            if is_dns_failure(err) {
                RequestErrorCode::HostResolutionFailure
            } else {
                RequestErrorCode::ConnectionFailure
            }
        } else if err.is_builder() {
            RequestErrorCode::InvalidUrlFormat
        } else if err.is_redirect() {
            RequestErrorCode::TooManyRedirects
        } else if err.is_body() || err.is_decode() {
            RequestErrorCode::NetworkReceiveError
        } else if err.is_request() {
            RequestErrorCode::NetworkSendFailure
        } else {
            RequestErrorCode::UnknownError
        }
    }

    pub fn code(self) -> i32 { self as i32 }
}

fn is_dns_failure(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return true;
        }
        source = cause.source();
    }
    false
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request {
            code:    RequestErrorCode::classify(&err).code(),
            message: err.to_string(),
        }
    }
}
