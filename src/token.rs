//! JWT bearer grant: sign a service-account assertion and exchange it for an access token.
//!
//! [`TokenIssuer::issue`] builds fresh [`JwtClaims`] on every call, signs them with RS256,
//! and posts the assertion to the token endpoint as an
//! `urn:ietf:params:oauth:grant-type:jwt-bearer` grant. Nothing is cached; a failed
//! exchange is reported once and never retried.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, JwtClaims, Secret, SigningKey},
	config::BotConfig,
	error::TokenError,
	http::{self, HttpClient},
	obs::{self, Stage, StageOutcome, StageSpan},
};

/// Grant type of the JWT bearer assertion flow (RFC 7523).
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Successful token endpoint response.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Bearer token for the messaging API.
	pub access_token: AccessToken,
	/// Token type reported by the provider (usually `Bearer`).
	#[serde(default)]
	pub token_type: Option<String>,
	/// Lifetime reported by the provider.
	#[serde(default, deserialize_with = "de_seconds")]
	pub expires_in: Option<Duration>,
	/// Refresh token, when the provider issues one.
	#[serde(default)]
	pub refresh_token: Option<Secret>,
	/// Granted scopes.
	#[serde(default)]
	pub scope: Option<String>,
}

/// Exchanges signed assertions for access tokens.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
	http_client: HttpClient,
	endpoint: Url,
	client_id: String,
	client_secret: Secret,
	service_account: String,
	scope: String,
}
impl TokenIssuer {
	/// Creates an issuer for the credentials and token endpoint in `config`.
	pub fn new(http_client: HttpClient, config: &BotConfig) -> Self {
		Self {
			http_client,
			endpoint: config.endpoints.token.clone(),
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			service_account: config.service_account.clone(),
			scope: config.scope.clone(),
		}
	}

	/// Builds the claim set for a new assertion, issued now.
	pub fn claims(&self) -> JwtClaims {
		JwtClaims::new(&self.client_id, &self.service_account)
	}

	/// Obtains an access token for `key`.
	pub async fn issue(&self, key: &SigningKey) -> Result<AccessToken, TokenError> {
		self.exchange(key).await.map(|response| response.access_token)
	}

	/// Performs the exchange and returns the full token response.
	pub async fn exchange(&self, key: &SigningKey) -> Result<TokenResponse, TokenError> {
		let span = StageSpan::new(Stage::Token, "exchange");

		obs::record_stage_outcome(Stage::Token, StageOutcome::Attempt);

		let result = span.instrument(self.exchange_inner(key)).await;

		match &result {
			Ok(response) => {
				obs::record_stage_outcome(Stage::Token, StageOutcome::Success);
				tracing::info!(
					expires_in = response.expires_in.map(|d| d.whole_seconds()),
					"Access token obtained."
				);
			},
			Err(e) => {
				obs::record_stage_outcome(Stage::Token, StageOutcome::Failure);
				log_failure(e);
			},
		}

		result
	}

	async fn exchange_inner(&self, key: &SigningKey) -> Result<TokenResponse, TokenError> {
		let assertion =
			self.claims().sign(key).map_err(|source| TokenError::Signing { source })?;
		let form = [
			("assertion", assertion.as_str()),
			("grant_type", JWT_BEARER_GRANT),
			("client_id", self.client_id.as_str()),
			("client_secret", self.client_secret.expose()),
			("scope", self.scope.as_str()),
		];
		let response = self
			.http_client
			.post(self.endpoint.clone())
			.form(&form)
			.send()
			.await
			.map_err(TokenError::transport)?;
		let status = response.status();
		let body = response.bytes().await.map_err(TokenError::transport)?;

		if !status.is_success() {
			return Err(TokenError::ExchangeFailed {
				message: format!("token endpoint responded with HTTP {}", status.as_u16()),
				status: Some(status.as_u16()),
				body: http::body_preview(&body),
				source: None,
			});
		}

		http::parse_json(&body)
			.map_err(|source| TokenError::MalformedResponse { status: status.as_u16(), source })
	}
}

fn log_failure(err: &TokenError) {
	match err {
		TokenError::ExchangeFailed { status, body, source, .. } => tracing::error!(
			status = *status,
			body = body.as_deref(),
			cause = source.as_ref().map(tracing::field::display),
			"Failed to obtain an access token: {err}"
		),
		TokenError::MalformedResponse { source, .. } => tracing::error!(
			path = %source.path(),
			"Token endpoint response is malformed; no access token was issued: {source}"
		),
		TokenError::Signing { source } => {
			tracing::error!(error = %source, "Failed to sign the JWT assertion.")
		},
	}
}

// The provider reports `expires_in` as a numeric string; plain numbers are accepted too.
fn de_seconds<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Seconds {
		Number(i64),
		Text(String),
	}

	let secs = match Option::<Seconds>::deserialize(deserializer)? {
		None => return Ok(None),
		Some(Seconds::Number(secs)) => secs,
		Some(Seconds::Text(text)) => text.trim().parse::<i64>().map_err(|_| {
			serde::de::Error::custom(format!("expires_in is not a number of seconds: {text:?}"))
		})?,
	};

	Ok(Some(Duration::seconds(secs)))
}
