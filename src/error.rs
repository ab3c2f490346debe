//! Error types shared by the credential, token, and message stages.

// std
use std::io::{Error as IoError, ErrorKind as IoErrorKind};
// self
use crate::{_prelude::*, auth::IdentifierError, obs::Stage};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Serde failure annotated with the JSON path that could not be decoded.
pub type ParseError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical error exposed by the public APIs.
///
/// Every variant is fatal to the current delivery attempt and never to the process.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The signing key could not be loaded.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// No access token could be obtained.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// The messaging API call failed.
	#[error(transparent)]
	Message(#[from] MessageError),
}
impl Error {
	/// Returns the pipeline stage that produced the error, if any.
	pub fn stage(&self) -> Option<Stage> {
		match self {
			Self::Config(_) => None,
			Self::Credential(_) => Some(Stage::Credential),
			Self::Token(_) => Some(Stage::Token),
			Self::Message(_) => Some(Stage::Message),
		}
	}
}

/// Configuration and environment failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting was not provided.
	#[error("Missing required setting `{field}`.")]
	MissingField {
		/// Setting name.
		field: &'static str,
	},
	/// A required setting was provided but empty.
	#[error("Setting `{field}` cannot be empty.")]
	EmptyField {
		/// Setting name.
		field: &'static str,
	},
	/// An endpoint could not be parsed.
	#[error("Setting `{field}` is not a valid URL.")]
	InvalidUrl {
		/// Setting name.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTP(S).
	#[error("Setting `{field}` must use http or https: {url}.")]
	UnsupportedScheme {
		/// Setting name.
		field: &'static str,
		/// Offending URL.
		url: String,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// The process environment could not be deserialized.
	#[error("Environment configuration is invalid: {0}.")]
	Environment(#[from] envy::Error),
	/// A `.env` file exists but could not be read.
	#[error("The .env file could not be loaded.")]
	DotEnv {
		/// Underlying loader failure.
		#[source]
		source: dotenvy::Error,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while loading the RSA signing key.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// The key file does not exist.
	#[error("Private key file was not found: {}.", path.display())]
	NotFound {
		/// Path that was requested.
		path: PathBuf,
	},
	/// The key file exists but cannot be read with the current permissions.
	#[error("Private key file is not readable: {}.", path.display())]
	AccessDenied {
		/// Path that was requested.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: IoError,
	},
	/// The content is not an unencrypted RSA private key in PEM form.
	#[error("Private key is not a valid unencrypted RSA PEM key.")]
	InvalidFormat {
		/// Path the material was read from, when loaded from disk.
		path: Option<PathBuf>,
		/// Parser or signer failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Any other I/O failure.
	#[error("Private key could not be loaded from {}.", path.display())]
	Unexpected {
		/// Path that was requested.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: IoError,
	},
}
impl CredentialError {
	/// Classifies an I/O failure raised while reading `path`.
	pub fn from_io(path: &Path, source: IoError) -> Self {
		let path = path.to_path_buf();

		match source.kind() {
			IoErrorKind::NotFound => Self::NotFound { path },
			IoErrorKind::PermissionDenied => Self::AccessDenied { path, source },
			_ => Self::Unexpected { path, source },
		}
	}
}

/// Failures raised while exchanging the JWT assertion for an access token.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// The token endpoint was unreachable or answered with a non-success status.
	#[error("Token exchange failed: {message}.")]
	ExchangeFailed {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when a response was received.
		status: Option<u16>,
		/// Leading part of the response body, when one was received.
		body: Option<String>,
		/// Transport failure, when no response was received.
		#[source]
		source: Option<BoxError>,
	},
	/// The endpoint answered successfully but the body lacks a usable access token.
	#[error("Token endpoint returned a malformed response.")]
	MalformedResponse {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: ParseError,
	},
	/// The JWT assertion could not be signed.
	#[error("JWT assertion could not be signed.")]
	Signing {
		/// Signer failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}
impl TokenError {
	/// Wraps a transport failure that prevented a response from arriving.
	pub fn transport(src: ReqwestError) -> Self {
		Self::ExchangeFailed {
			message: "token endpoint could not be reached".into(),
			status: src.status().map(|code| code.as_u16()),
			body: None,
			source: Some(Box::new(src)),
		}
	}
}

/// Failures raised by the messaging API client.
#[derive(Debug, ThisError)]
pub enum MessageError {
	/// The API answered with a non-success status.
	#[error("Messaging API request failed with HTTP {status}.")]
	RequestFailed {
		/// HTTP status code.
		status: u16,
		/// Response body, when it could be read.
		body: Option<String>,
	},
	/// Connectivity or transport failure; no HTTP status is available.
	#[error("Network error occurred while calling the messaging API.")]
	NetworkFailure {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request could not be assembled (for example an invalid header value); nothing was sent.
	#[error("Messaging API request could not be built.")]
	InvalidRequest {
		/// Request builder failure.
		#[source]
		source: BoxError,
	},
	/// The API answered successfully with a body that is not JSON.
	#[error("Messaging API returned a malformed response.")]
	MalformedResponse {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: ParseError,
	},
	/// The request body could not be encoded.
	#[error("Message payload could not be encoded.")]
	Encode(#[source] serde_json::Error),
	/// The request URL could not be assembled.
	#[error("Messaging API URL is invalid.")]
	InvalidUrl(#[source] url::ParseError),
}
impl MessageError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::NetworkFailure { source: Box::new(src) }
	}
}
impl From<ReqwestError> for MessageError {
	fn from(e: ReqwestError) -> Self {
		if e.is_builder() { Self::InvalidRequest { source: Box::new(e) } } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn io_failures_map_to_credential_variants() {
		let path = Path::new("/keys/bot.pem");

		assert!(matches!(
			CredentialError::from_io(path, IoError::from(IoErrorKind::NotFound)),
			CredentialError::NotFound { .. }
		));
		assert!(matches!(
			CredentialError::from_io(path, IoError::from(IoErrorKind::PermissionDenied)),
			CredentialError::AccessDenied { .. }
		));
		assert!(matches!(
			CredentialError::from_io(path, IoError::from(IoErrorKind::InvalidData)),
			CredentialError::Unexpected { .. }
		));
	}

	#[test]
	fn stage_follows_the_failing_component() {
		let err = Error::from(MessageError::RequestFailed { status: 500, body: None });

		assert_eq!(err.stage(), Some(Stage::Message));
		assert_eq!(
			Error::from(ConfigError::MissingField { field: "client_id" }).stage(),
			None
		);
	}
}
