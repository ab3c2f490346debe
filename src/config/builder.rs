// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{BotId, Secret},
	config::{API_BASE_URL, BotConfig, DEFAULT_BOT_ID, DEFAULT_SCOPE, Endpoints, TOKEN_ENDPOINT},
	error::ConfigError,
};

/// Builder for [`BotConfig`] values.
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// OAuth client secret.
	pub client_secret: Option<Secret>,
	/// Service account identifier.
	pub service_account: Option<String>,
	/// Path of the PEM private key.
	pub private_key_file: Option<PathBuf>,
	/// Bot identifier (defaults to [`DEFAULT_BOT_ID`]).
	pub bot_id: Option<BotId>,
	/// Requested scopes (defaults to [`DEFAULT_SCOPE`]).
	pub scope: Option<String>,
	/// Token endpoint override (defaults to [`TOKEN_ENDPOINT`]).
	pub token_endpoint: Option<Url>,
	/// API root override (defaults to [`API_BASE_URL`]).
	pub api_base: Option<Url>,
	/// Optional per-request timeout.
	pub timeout: Option<StdDuration>,
}
impl BotConfigBuilder {
	/// Sets the OAuth client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, value: impl Into<Secret>) -> Self {
		self.client_secret = Some(value.into());

		self
	}

	/// Sets the service account identifier.
	pub fn service_account(mut self, value: impl Into<String>) -> Self {
		self.service_account = Some(value.into());

		self
	}

	/// Sets the private key path.
	pub fn private_key_file(mut self, path: impl Into<PathBuf>) -> Self {
		self.private_key_file = Some(path.into());

		self
	}

	/// Sets the bot identifier.
	pub fn bot_id(mut self, bot_id: BotId) -> Self {
		self.bot_id = Some(bot_id);

		self
	}

	/// Overrides the requested scopes.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Overrides the API root.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Sets a per-request timeout.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<BotConfig, ConfigError> {
		let client_id = required("client_id", self.client_id)?;
		let client_secret =
			self.client_secret.ok_or(ConfigError::MissingField { field: "client_secret" })?;

		if client_secret.is_empty() {
			return Err(ConfigError::EmptyField { field: "client_secret" });
		}

		let service_account = required("service_account", self.service_account)?;
		let private_key_file =
			self.private_key_file.ok_or(ConfigError::MissingField { field: "private_key_file" })?;

		if private_key_file.as_os_str().is_empty() {
			return Err(ConfigError::EmptyField { field: "private_key_file" });
		}

		let bot_id = match self.bot_id {
			Some(bot_id) => bot_id,
			None => BotId::new(DEFAULT_BOT_ID)?,
		};
		let scope = self.scope.unwrap_or_else(|| DEFAULT_SCOPE.into());

		if scope.trim().is_empty() {
			return Err(ConfigError::EmptyField { field: "scope" });
		}

		let token = endpoint("token_endpoint", self.token_endpoint, TOKEN_ENDPOINT)?;
		let api_base = endpoint("api_base", self.api_base, API_BASE_URL)?;

		Ok(BotConfig {
			client_id,
			client_secret,
			service_account,
			private_key_file,
			bot_id,
			scope,
			endpoints: Endpoints { token, api_base },
			timeout: self.timeout,
		})
	}
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	let value = value.ok_or(ConfigError::MissingField { field })?;

	if value.trim().is_empty() {
		return Err(ConfigError::EmptyField { field });
	}

	Ok(value)
}

fn endpoint(field: &'static str, value: Option<Url>, default: &str) -> Result<Url, ConfigError> {
	let url = match value {
		Some(url) => url,
		None => Url::parse(default).map_err(|source| ConfigError::InvalidUrl { field, source })?,
	};

	match url.scheme() {
		"https" | "http" => Ok(url),
		_ => Err(ConfigError::UnsupportedScheme { field, url: url.to_string() }),
	}
}
