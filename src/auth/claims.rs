//! JWT claim set presented to the token endpoint as a bearer assertion.

// self
use crate::{_prelude::*, auth::SigningKey};

/// Claims of the service-account assertion.
///
/// A fresh claim set is built for every token request; `exp` is always `iat` plus
/// [`JwtClaims::LIFETIME`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
	/// Issuer: the OAuth client identifier.
	pub iss: String,
	/// Subject: the service account identifier.
	pub sub: String,
	/// Issue time in Unix seconds.
	pub iat: i64,
	/// Expiry time in Unix seconds.
	pub exp: i64,
}
impl JwtClaims {
	/// Validity window of every assertion.
	pub const LIFETIME: Duration = Duration::HOUR;

	/// Builds claims issued now.
	pub fn new(client_id: impl Into<String>, service_account: impl Into<String>) -> Self {
		Self::issued_at(client_id, service_account, OffsetDateTime::now_utc())
	}

	/// Builds claims issued at `now`.
	pub fn issued_at(
		client_id: impl Into<String>,
		service_account: impl Into<String>,
		now: OffsetDateTime,
	) -> Self {
		let iat = now.unix_timestamp();

		Self {
			iss: client_id.into(),
			sub: service_account.into(),
			iat,
			exp: iat + Self::LIFETIME.whole_seconds(),
		}
	}

	/// Signs the claims with RS256.
	pub fn sign(&self, key: &SigningKey) -> Result<String, jsonwebtoken::errors::Error> {
		key.sign(self)
	}
}
