// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use tracing_test::traced_test;
// self
use lineworks_bot::{
	auth::{JwtClaims, SigningKey},
	error::CredentialError,
};

fn fixture(name: &str) -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn verify(token: &str) -> JwtClaims {
	let public = fs::read(fixture("rsa_public.pem")).expect("Public key fixture should be readable.");
	let key = DecodingKey::from_rsa_pem(&public).expect("Public key fixture should parse.");
	let mut validation = Validation::new(Algorithm::RS256);

	validation.validate_aud = false;

	jsonwebtoken::decode::<JwtClaims>(token, &key, &validation)
		.expect("Assertion should verify against the public key.")
		.claims
}

#[test]
fn pkcs8_key_loads_and_signs_verifiable_assertions() {
	let key = SigningKey::from_pem_file(fixture("rsa_private.pem"))
		.expect("PKCS#8 RSA key should load.");
	let claims = JwtClaims::new("client-id", "svc.account@example");
	let token = claims.sign(&key).expect("Loaded key should sign claims.");
	let header = jsonwebtoken::decode_header(&token).expect("Assertion header should decode.");

	assert_eq!(header.alg, Algorithm::RS256);
	assert_eq!(verify(&token), claims);
}

#[test]
fn pkcs1_key_loads() {
	let key = SigningKey::from_pem_file(fixture("rsa_private_pkcs1.pem"))
		.expect("PKCS#1 RSA key should load.");
	let claims = JwtClaims::new("client-id", "svc.account@example");

	assert_eq!(verify(&claims.sign(&key).expect("PKCS#1 key should sign claims.")), claims);
}

#[test]
fn in_memory_pem_loads() {
	let pem = fs::read(fixture("rsa_private.pem")).expect("Private key fixture should be readable.");

	assert!(SigningKey::from_pem(&pem).is_ok());
}

#[test]
fn debug_output_hides_key_material() {
	let key = SigningKey::from_pem_file(fixture("rsa_private.pem"))
		.expect("PKCS#8 RSA key should load.");

	assert_eq!(format!("{key:?}"), "SigningKey(<redacted>)");
}

#[test]
#[traced_test]
fn missing_file_is_not_found() {
	let path = fixture("does_not_exist.pem");
	let err = SigningKey::from_pem_file(&path).expect_err("Missing key files should be rejected.");

	assert!(matches!(&err, CredentialError::NotFound { path: reported } if reported == &path));
	assert!(logs_contain("Private key file was not found."));
}

#[test]
#[traced_test]
fn garbage_content_is_invalid_format() {
	let err = SigningKey::from_pem_file(fixture("invalid.pem"))
		.expect_err("Non-PEM content should be rejected.");

	assert!(matches!(err, CredentialError::InvalidFormat { path: Some(_), .. }));
	assert!(logs_contain("Private key file has an invalid format."));
}

#[test]
fn non_rsa_key_is_invalid_format() {
	let err = SigningKey::from_pem_file(fixture("ec_private.pem"))
		.expect_err("EC keys cannot sign RS256 assertions.");

	assert!(matches!(err, CredentialError::InvalidFormat { .. }));
}

#[test]
fn invalid_in_memory_pem_has_no_path() {
	let err = SigningKey::from_pem(b"invalid key data")
		.expect_err("Non-PEM content should be rejected.");

	assert!(matches!(err, CredentialError::InvalidFormat { path: None, .. }));
}

#[test]
#[traced_test]
fn directory_path_is_unexpected() {
	let err = SigningKey::from_pem_file(fixture(""))
		.expect_err("Directories cannot be read as key files.");

	assert!(matches!(err, CredentialError::Unexpected { .. }));
	assert!(logs_contain("Unexpected error while loading the private key."));
}

#[cfg(unix)]
#[test]
#[traced_test]
fn unreadable_file_is_access_denied() {
	// std
	use std::os::unix::fs::PermissionsExt;

	let path = std::env::temp_dir()
		.join(format!("lineworks-bot-{}-unreadable.pem", std::process::id()));

	fs::copy(fixture("rsa_private.pem"), &path).expect("Key fixture should copy to a temp file.");
	fs::set_permissions(&path, fs::Permissions::from_mode(0o000))
		.expect("Temp key permissions should be adjustable.");

	// Privileged users bypass file modes.
	if fs::read(&path).is_ok() {
		fs::remove_file(&path).expect("Temp key should be removable.");

		return;
	}

	let result = SigningKey::from_pem_file(&path);

	fs::remove_file(&path).expect("Temp key should be removable.");

	assert!(matches!(result, Err(CredentialError::AccessDenied { .. })));
	assert!(logs_contain("Private key file is not readable; check its permissions."));
}
