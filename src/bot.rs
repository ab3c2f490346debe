//! Delivery pipeline: load the signing key, obtain an access token, send the message.
//!
//! [`Bot`] runs the three stages strictly in order and stops at the first failure, so a
//! message is never sent without a token and a token is never requested without a key.
//! [`send_bot_message`] wraps the pipeline in the boolean entry point used by scripts.

// crates.io
use tracing::Instrument;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Recipient, SigningKey},
	config::BotConfig,
	error::{ConfigError, CredentialError},
	http::HttpClient,
	message::{MessageClient, MessageContent},
	token::TokenIssuer,
};

/// Sends messages as the configured bot.
///
/// Every call loads the key and exchanges a new assertion; no token outlives the call that
/// obtained it.
#[derive(Clone, Debug)]
pub struct Bot {
	/// Configuration shared by every stage.
	pub config: BotConfig,
	/// HTTP client used for the token exchange and the messaging API.
	pub http_client: HttpClient,
}
impl Bot {
	/// Creates a bot with its own HTTP client, honoring the configured timeout.
	pub fn new(config: BotConfig) -> Result<Self, ConfigError> {
		let http_client = HttpClient::build(config.timeout)?;

		Ok(Self::with_http_client(config, http_client))
	}

	/// Creates a bot that reuses the caller-provided HTTP client.
	pub fn with_http_client(config: BotConfig, http_client: HttpClient) -> Self {
		Self { config, http_client }
	}

	/// Loads the signing key from the configured path.
	pub fn load_signing_key(&self) -> Result<SigningKey, CredentialError> {
		SigningKey::from_pem_file(&self.config.private_key_file)
	}

	/// Returns a token issuer bound to this bot's credentials.
	pub fn token_issuer(&self) -> TokenIssuer {
		TokenIssuer::new(self.http_client.clone(), &self.config)
	}

	/// Returns a messaging client authenticated with `access_token`.
	pub fn message_client(&self, access_token: AccessToken) -> MessageClient {
		MessageClient::new(
			self.http_client.clone(),
			self.config.endpoints.api_base.clone(),
			access_token,
		)
	}

	/// Runs the credential and token stages.
	pub async fn access_token(&self) -> Result<AccessToken> {
		let key = self.load_signing_key().inspect_err(|_| {
			tracing::error!("Signing key could not be loaded; no token will be requested.")
		})?;
		let token = self.token_issuer().issue(&key).await.inspect_err(|_| {
			tracing::error!("Access token could not be obtained; no message will be sent.")
		})?;

		Ok(token)
	}

	/// Delivers `content` to `recipient`, returning the API response body.
	pub async fn send(&self, recipient: &Recipient, content: &MessageContent) -> Result<Value> {
		let span = tracing::info_span!("lineworks_bot.send", bot_id = %self.config.bot_id);

		async {
			tracing::info!(%recipient, "Starting message delivery.");

			let token = self.access_token().await?;
			let response = self
				.message_client(token)
				.send_message(&self.config.bot_id, recipient, content)
				.await?;

			tracing::info!(%recipient, "Message delivery completed.");

			Ok::<_, Error>(response)
		}
		.instrument(span)
		.await
	}

	/// Delivers a plain text message.
	pub async fn send_text(&self, recipient: &Recipient, text: impl Into<String>) -> Result<Value> {
		self.send(recipient, &MessageContent::text(text)).await
	}

	/// Fetches the configured bot's profile.
	pub async fn bot_info(&self) -> Result<Value> {
		let token = self.access_token().await?;

		Ok(self.message_client(token).bot_info(&self.config.bot_id).await?)
	}

	/// Sends `text` to the raw `recipient` and reports whether delivery succeeded.
	pub async fn notify(&self, recipient: &str, text: &str) -> bool {
		let result = match Recipient::new(recipient) {
			Ok(recipient) => self.send_text(&recipient, text).await,
			Err(e) => Err(ConfigError::from(e).into()),
		};

		match result {
			Ok(_) => true,
			Err(e) => {
				report_failure(&e);

				false
			},
		}
	}
}

/// Sends `text` to `recipient` and reports whether delivery succeeded.
///
/// Every failure is logged; `true` is returned only when all three stages completed.
pub async fn send_bot_message(config: &BotConfig, recipient: &str, text: &str) -> bool {
	match Bot::new(config.clone()) {
		Ok(bot) => bot.notify(recipient, text).await,
		Err(e) => {
			report_failure(&e.into());

			false
		},
	}
}

fn report_failure(e: &Error) {
	tracing::error!(stage = e.stage().map(|stage| stage.as_str()), "Message delivery failed: {e}");
}
