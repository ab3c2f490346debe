//! Bot configuration: credentials, identifiers, and endpoints.
//!
//! [`BotConfig`] is assembled through [`BotConfigBuilder`] (validated) or loaded from the
//! process environment with [`BotConfig::from_env`], which first reads a `.env` file when
//! one is present. Recognized variables: `SERVICE_ACCOUNT`, `PRIVATE_KEY_FILE`, `CLIENT_ID`,
//! `CLIENT_SECRET`, and the optional `BOT_ID` and `REQUEST_TIMEOUT_SECS`.

/// Builder API for assembling configurations.
pub mod builder;

pub use builder::*;

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{BotId, Secret},
	error::ConfigError,
};

/// LINE WORKS OAuth2 token endpoint.
pub const TOKEN_ENDPOINT: &str = "https://auth.worksmobile.com/oauth2/v2.0/token";
/// Root of the LINE WORKS REST API.
pub const API_BASE_URL: &str = "https://www.worksapis.com/v1.0";
/// Bot used when the environment does not name one.
pub const DEFAULT_BOT_ID: &str = "10087978";
/// Scopes requested for bot messaging.
pub const DEFAULT_SCOPE: &str = "bot bot.message";

/// Remote endpoints the bot talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// OAuth2 token endpoint.
	pub token: Url,
	/// REST API root; resource paths are appended to it.
	pub api_base: Url,
}

/// Immutable configuration consumed by the pipeline.
#[derive(Clone, Debug)]
pub struct BotConfig {
	/// OAuth client identifier (`iss` of the assertion).
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
	/// Service account identifier (`sub` of the assertion).
	pub service_account: String,
	/// Path of the PEM private key.
	pub private_key_file: PathBuf,
	/// Bot that sends the messages.
	pub bot_id: BotId,
	/// Space-delimited scopes requested from the token endpoint.
	pub scope: String,
	/// Remote endpoints.
	pub endpoints: Endpoints,
	/// Per-request timeout; `None` leaves the HTTP client default in place.
	pub timeout: Option<StdDuration>,
}
impl BotConfig {
	/// Creates a new, empty builder.
	pub fn builder() -> BotConfigBuilder {
		BotConfigBuilder::default()
	}

	/// Loads `.env` (if present) and reads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		match dotenvy::dotenv() {
			Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file."),
			Err(e) if e.not_found() => {},
			Err(source) => return Err(ConfigError::DotEnv { source }),
		}

		Self::from_env_vars(std::env::vars())
	}

	/// Reads the configuration from an explicit set of environment variables.
	pub fn from_env_vars<I>(vars: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let env: EnvConfig = envy::from_iter(vars)?;
		let mut builder = Self::builder()
			.client_id(env.client_id)
			.client_secret(env.client_secret)
			.service_account(env.service_account)
			.private_key_file(env.private_key_file);

		if let Some(bot_id) = env.bot_id {
			builder = builder.bot_id(BotId::new(bot_id)?);
		}
		if let Some(secs) = env.request_timeout_secs {
			builder = builder.timeout(StdDuration::from_secs(secs));
		}

		builder.build()
	}
}

#[derive(Deserialize)]
struct EnvConfig {
	service_account: String,
	private_key_file: PathBuf,
	client_id: String,
	client_secret: String,
	bot_id: Option<String>,
	request_timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
		pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
	}

	#[test]
	fn environment_supplies_required_settings() {
		let config = BotConfig::from_env_vars(vars(&[
			("SERVICE_ACCOUNT", "svc.account@example"),
			("PRIVATE_KEY_FILE", "keys/private.key"),
			("CLIENT_ID", "client-id"),
			("CLIENT_SECRET", "client-secret"),
			("UNRELATED", "ignored"),
		]))
		.expect("Complete environment should produce a configuration.");

		assert_eq!(config.client_id, "client-id");
		assert_eq!(config.client_secret.expose(), "client-secret");
		assert_eq!(config.service_account, "svc.account@example");
		assert_eq!(config.private_key_file, PathBuf::from("keys/private.key"));
		assert_eq!(config.bot_id.as_ref(), DEFAULT_BOT_ID);
		assert_eq!(config.scope, DEFAULT_SCOPE);
		assert_eq!(config.endpoints.token.as_str(), TOKEN_ENDPOINT);
		assert_eq!(config.endpoints.api_base.as_str(), API_BASE_URL);
		assert_eq!(config.timeout, None);
	}

	#[test]
	fn environment_overrides_bot_and_timeout() {
		let config = BotConfig::from_env_vars(vars(&[
			("SERVICE_ACCOUNT", "svc"),
			("PRIVATE_KEY_FILE", "key.pem"),
			("CLIENT_ID", "id"),
			("CLIENT_SECRET", "secret"),
			("BOT_ID", "2000001"),
			("REQUEST_TIMEOUT_SECS", "15"),
		]))
		.expect("Optional settings should be honored.");

		assert_eq!(config.bot_id.as_ref(), "2000001");
		assert_eq!(config.timeout, Some(StdDuration::from_secs(15)));
	}

	#[test]
	fn endpoints_serialize_as_url_strings() {
		let endpoints = Endpoints {
			token: Url::parse(TOKEN_ENDPOINT).expect("Token endpoint should parse."),
			api_base: Url::parse(API_BASE_URL).expect("API base should parse."),
		};
		let value = serde_json::to_value(&endpoints).expect("Endpoints should serialize.");

		assert_eq!(value["token"], TOKEN_ENDPOINT);
		assert_eq!(value["api_base"], API_BASE_URL);
		assert_eq!(
			serde_json::from_value::<Endpoints>(value).expect("Endpoints should deserialize."),
			endpoints
		);
	}

	#[test]
	fn missing_variables_are_reported() {
		let err = BotConfig::from_env_vars(vars(&[("CLIENT_ID", "id")]))
			.expect_err("Incomplete environment should be rejected.");

		assert!(matches!(err, ConfigError::Environment(_)));
	}

	#[test]
	fn empty_variables_are_rejected() {
		let err = BotConfig::from_env_vars(vars(&[
			("SERVICE_ACCOUNT", "svc"),
			("PRIVATE_KEY_FILE", "key.pem"),
			("CLIENT_ID", ""),
			("CLIENT_SECRET", "secret"),
		]))
		.expect_err("Empty client identifiers should be rejected.");

		assert!(matches!(err, ConfigError::EmptyField { field: "client_id" }));
	}
}
