//! Loads PEM-encoded RSA private keys into RS256 signing keys.

// std
use std::fs;
// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	error::CredentialError,
	obs::{self, Stage, StageOutcome, StageSpan},
};

/// RSA private key ready to sign RS256 assertions.
///
/// The key lives only in process memory; nothing about it is persisted or logged.
#[derive(Clone)]
pub struct SigningKey(EncodingKey);
impl SigningKey {
	/// Reads and parses an unencrypted PEM private key (PKCS#1 or PKCS#8) from `path`.
	///
	/// The file is held open only for the duration of the read.
	pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
		let path = path.as_ref();
		let _span = StageSpan::new(Stage::Credential, "from_pem_file").entered();

		obs::record_stage_outcome(Stage::Credential, StageOutcome::Attempt);

		let result = fs::read(path)
			.map_err(|e| CredentialError::from_io(path, e))
			.and_then(|pem| Self::parse(&pem, Some(path)));

		match &result {
			Ok(_) => {
				obs::record_stage_outcome(Stage::Credential, StageOutcome::Success);
				tracing::debug!(path = %path.display(), "Signing key loaded.");
			},
			Err(e) => {
				obs::record_stage_outcome(Stage::Credential, StageOutcome::Failure);
				log_failure(e);
			},
		}

		result
	}

	/// Parses PEM material that is already in memory.
	pub fn from_pem(pem: &[u8]) -> Result<Self, CredentialError> {
		Self::parse(pem, None).inspect_err(log_failure)
	}

	/// Signs `claims` as a compact RS256 JWT.
	pub fn sign<T>(&self, claims: &T) -> Result<String, jsonwebtoken::errors::Error>
	where
		T: Serialize,
	{
		jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &self.0)
	}

	fn parse(pem: &[u8], path: Option<&Path>) -> Result<Self, CredentialError> {
		let invalid =
			|source| CredentialError::InvalidFormat { path: path.map(Path::to_path_buf), source };
		let key = Self(EncodingKey::from_rsa_pem(pem).map_err(invalid)?);

		// The DER body is only validated by the signer, so sign once to reject unusable keys here.
		key.sign(&serde_json::Map::new()).map_err(invalid)?;

		Ok(key)
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SigningKey(<redacted>)")
	}
}

fn log_failure(err: &CredentialError) {
	match err {
		CredentialError::NotFound { path } => {
			tracing::error!(path = %path.display(), "Private key file was not found.")
		},
		CredentialError::AccessDenied { path, source } => tracing::error!(
			path = %path.display(),
			error = %source,
			"Private key file is not readable; check its permissions."
		),
		CredentialError::InvalidFormat { source, .. } => {
			tracing::error!(error = %source, "Private key file has an invalid format.")
		},
		CredentialError::Unexpected { path, source } => tracing::error!(
			path = %path.display(),
			error = %source,
			"Unexpected error while loading the private key."
		),
	}
}
