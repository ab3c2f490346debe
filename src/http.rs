//! Transport primitives shared by the token exchange and the messaging API.
//!
//! [`HttpClient`] wraps a reqwest [`ReqwestClient`] so both stages share one connection
//! pool and one policy: redirects are never followed (the token endpoint and the API answer
//! directly) and an optional per-request timeout comes from the configuration.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::{ConfigError, ParseError}};

const BODY_PREVIEW_LEN: usize = 512;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug)]
pub struct HttpClient(pub ReqwestClient);
impl HttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// Configure any custom client to disable redirect following.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects and applies `timeout` when provided.
	pub fn build(timeout: Option<StdDuration>) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().redirect(Policy::none());

		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}

		Ok(Self(builder.build()?))
	}
}
impl AsRef<ReqwestClient> for HttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for HttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Decodes a JSON body, keeping the path of the field that failed.
pub(crate) fn parse_json<T>(body: &[u8]) -> Result<T, ParseError>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de)
}

/// Returns a bounded, lossy UTF-8 view of a response body for diagnostics.
pub(crate) fn body_preview(body: &[u8]) -> Option<String> {
	if body.is_empty() {
		return None;
	}

	let text = String::from_utf8_lossy(body);
	let preview = match text.char_indices().nth(BODY_PREVIEW_LEN) {
		Some((idx, _)) => format!("{}...", &text[..idx]),
		None => text.into_owned(),
	};

	Some(preview)
}
