//! Bot messaging API client.
//!
//! [`MessageClient`] holds one access token and issues authenticated JSON requests below the
//! API root. Identifiers embedded in the path are percent-encoded as single segments, so a
//! recipient such as `user@example.com` becomes `user%40example.com`.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, json};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, BotId, Recipient},
	error::MessageError,
	http::{self, HttpClient},
	obs::{self, Stage, StageOutcome, StageSpan},
};

// Everything except RFC 3986 unreserved characters, so `/`, `@`, and spaces are escaped too.
const PATH_SEGMENT: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes `value` for use as a single URL path segment.
pub fn encode_path_segment(value: &str) -> String {
	utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Message body delivered to a recipient.
///
/// The client does not inspect the structure; it is sent as the `content` member of the
/// request body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageContent(Map<String, Value>);
impl MessageContent {
	/// Plain text message: `{"type": "text", "text": <text>}`.
	pub fn text(text: impl Into<String>) -> Self {
		let mut map = Map::new();

		map.insert("type".into(), Value::String("text".into()));
		map.insert("text".into(), Value::String(text.into()));

		Self(map)
	}

	/// Returns the `type` member, if present.
	pub fn kind(&self) -> Option<&str> {
		self.0.get("type").and_then(Value::as_str)
	}

	/// Borrows the underlying JSON object.
	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}
}
impl From<Map<String, Value>> for MessageContent {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

/// Authenticated client for the bot REST API.
#[derive(Clone, Debug)]
pub struct MessageClient {
	http_client: HttpClient,
	api_base: Url,
	access_token: AccessToken,
}
impl MessageClient {
	/// Creates a client that authenticates every request with `access_token`.
	pub fn new(http_client: HttpClient, api_base: Url, access_token: AccessToken) -> Self {
		Self { http_client, api_base, access_token }
	}

	/// Sends `content` from `bot_id` to `recipient` and returns the parsed response body.
	pub async fn send_message(
		&self,
		bot_id: &BotId,
		recipient: &Recipient,
		content: &MessageContent,
	) -> Result<Value, MessageError> {
		let response = observed("send_message", async {
			let url = self.endpoint(&[
				"bots",
				&bot_id.path_segment(),
				"users",
				&recipient.path_segment(),
				"messages",
			])?;

			tracing::info!(%recipient, "Sending message.");

			self.request(Method::POST, url, Some(&json!({ "content": content }))).await
		})
		.await?;

		tracing::info!(%recipient, "Message sent.");

		Ok(response)
	}

	/// Fetches the bot's profile (`GET /bots/{bot_id}`).
	pub async fn bot_info(&self, bot_id: &BotId) -> Result<Value, MessageError> {
		observed("bot_info", async {
			let url = self.endpoint(&["bots", &bot_id.path_segment()])?;

			tracing::info!(%bot_id, "Fetching bot info.");

			self.request(Method::GET, url, None).await
		})
		.await
	}

	/// Joins already-encoded `segments` below the API root.
	pub fn endpoint(&self, segments: &[&str]) -> Result<Url, MessageError> {
		let mut raw = self.api_base.as_str().trim_end_matches('/').to_owned();

		for segment in segments {
			raw.push('/');
			raw.push_str(segment);
		}

		Url::parse(&raw).map_err(MessageError::InvalidUrl)
	}

	/// Issues an authenticated request; an empty success body yields `{}`.
	pub async fn request(
		&self,
		method: Method,
		url: Url,
		body: Option<&Value>,
	) -> Result<Value, MessageError> {
		let mut request = self
			.http_client
			.request(method.clone(), url.clone())
			.header(CONTENT_TYPE, "application/json")
			.header(AUTHORIZATION, format!("Bearer {}", self.access_token.expose()));

		if let Some(body) = body {
			request = request.body(serde_json::to_vec(body).map_err(MessageError::Encode)?);
		}

		let response = request.send().await.map_err(|e| {
			let err = MessageError::from(e);

			match &err {
				MessageError::InvalidRequest { source } => tracing::error!(
					%method,
					%url,
					error = %source,
					"Messaging API request could not be built."
				),
				_ => tracing::error!(
					%method,
					%url,
					error = %err,
					"Network error while calling the messaging API."
				),
			}

			err
		})?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(|e| {
			tracing::error!(
				%method,
				%url,
				error = %e,
				"Network error while reading the messaging API response."
			);

			MessageError::from(e)
		})?;

		if !status.is_success() {
			let body = http::body_preview(&bytes);

			tracing::error!(
				%method,
				%url,
				status = status.as_u16(),
				body = body.as_deref(),
				"Messaging API returned an error status."
			);

			return Err(MessageError::RequestFailed { status: status.as_u16(), body });
		}
		if bytes.is_empty() {
			return Ok(Value::Object(Map::new()));
		}

		http::parse_json(&bytes).map_err(|source| {
			tracing::error!(
				%method,
				%url,
				path = %source.path(),
				"Messaging API response is not valid JSON."
			);

			MessageError::MalformedResponse { status: status.as_u16(), source }
		})
	}
}

// Wraps one API call in a message-stage span and records its outcome.
async fn observed<Fut>(call: &'static str, fut: Fut) -> Result<Value, MessageError>
where
	Fut: Future<Output = Result<Value, MessageError>>,
{
	obs::record_stage_outcome(Stage::Message, StageOutcome::Attempt);

	let result = StageSpan::new(Stage::Message, call).instrument(fut).await;

	obs::record_stage_outcome(Stage::Message, StageOutcome::of(&result));

	result
}
