// crates.io
use httpmock::prelude::*;
use serde_json::json;
use tracing_test::traced_test;
// self
use lineworks_bot::{
	auth::{AccessToken, BotId, Recipient},
	error::MessageError,
	http::HttpClient,
	message::{MessageClient, MessageContent},
	url::Url,
};

fn client(api_base: &str) -> MessageClient {
	MessageClient::new(
		HttpClient::build(None).expect("HTTP client should build."),
		Url::parse(api_base).expect("API base should parse."),
		AccessToken::new("dummy_token"),
	)
}

fn mock_client(server: &MockServer) -> MessageClient {
	client(&format!("http://{}/v1.0", server.address()))
}

fn bot_id() -> BotId {
	BotId::new("test_bot").expect("Bot identifier should be valid.")
}

fn recipient() -> Recipient {
	Recipient::new("test_user@example.com").expect("Recipient should be valid.")
}

#[tokio::test]
async fn message_is_posted_with_bearer_token_and_encoded_recipient() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1.0/bots/test_bot/users/test_user%40example.com/messages")
				.header("authorization", "Bearer dummy_token")
				.header("content-type", "application/json")
				.json_body(json!({ "content": { "type": "text", "text": "Test message" } }));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "messageId": "123456" }));
		})
		.await;
	let response = mock_client(&server)
		.send_message(&bot_id(), &recipient(), &MessageContent::text("Test message"))
		.await
		.expect("Message delivery should succeed.");

	mock.assert_async().await;

	assert_eq!(response, json!({ "messageId": "123456" }));
}

#[tokio::test]
async fn custom_content_is_forwarded_verbatim() {
	let server = MockServer::start_async().await;
	let content = json!({ "type": "sticker", "packageId": "1", "stickerId": "2" });
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1.0/bots/test_bot/users/test_user%40example.com/messages")
				.json_body(json!({ "content": content.clone() }));
			then.status(201).json_body(json!({}));
		})
		.await;
	let content = MessageContent::from(
		content.as_object().cloned().expect("Sticker content should be a JSON object."),
	);

	assert_eq!(content.kind(), Some("sticker"));

	mock_client(&server)
		.send_message(&bot_id(), &recipient(), &content)
		.await
		.expect("Any 2xx status should count as success.");
	mock.assert_async().await;
}

#[tokio::test]
async fn empty_success_body_yields_empty_object() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path_includes("/messages");
			then.status(204);
		})
		.await;
	let response = mock_client(&server)
		.send_message(&bot_id(), &recipient(), &MessageContent::text("hello"))
		.await
		.expect("Empty success bodies should be accepted.");

	assert_eq!(response, json!({}));
}

#[tokio::test]
#[traced_test]
async fn error_status_is_a_request_failure() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path_includes("/messages");
			then.status(500).body("Internal Server Error");
		})
		.await;
	let err = mock_client(&server)
		.send_message(&bot_id(), &recipient(), &MessageContent::text("hello"))
		.await
		.expect_err("Server errors should fail delivery.");

	mock.assert_calls_async(1).await;

	match err {
		MessageError::RequestFailed { status, body } => {
			assert_eq!(status, 500);
			assert_eq!(body.as_deref(), Some("Internal Server Error"));
		},
		other => panic!("Unexpected error variant: {other:?}"),
	}

	assert!(logs_contain("Messaging API returned an error status."));
}

#[tokio::test]
#[traced_test]
async fn unreachable_api_is_a_network_failure() {
	let err = client("http://127.0.0.1:1/v1.0")
		.send_message(&bot_id(), &recipient(), &MessageContent::text("hello"))
		.await
		.expect_err("Unreachable APIs should fail delivery.");

	assert!(matches!(err, MessageError::NetworkFailure { .. }));
	assert!(logs_contain("Network error while calling the messaging API."));
}

#[tokio::test]
#[traced_test]
async fn unusable_token_is_rejected_before_sending() {
	let client = MessageClient::new(
		HttpClient::build(None).expect("HTTP client should build."),
		Url::parse("http://127.0.0.1:1/v1.0").expect("API base should parse."),
		AccessToken::new("broken\ntoken"),
	);
	let err = client
		.send_message(&bot_id(), &recipient(), &MessageContent::text("hello"))
		.await
		.expect_err("Tokens that are not valid header values should fail delivery.");

	assert!(matches!(err, MessageError::InvalidRequest { .. }));
	assert!(logs_contain("Messaging API request could not be built."));
	assert!(!logs_contain("Network error while calling the messaging API."));
}

#[tokio::test]
async fn non_json_success_is_malformed() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path_includes("/messages");
			then.status(200).body("accepted");
		})
		.await;
	let err = mock_client(&server)
		.send_message(&bot_id(), &recipient(), &MessageContent::text("hello"))
		.await
		.expect_err("Non-JSON bodies should be rejected.");

	assert!(matches!(err, MessageError::MalformedResponse { status: 200, .. }));
}

#[tokio::test]
#[traced_test]
async fn bot_info_is_fetched_with_get() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1.0/bots/test_bot")
				.header("authorization", "Bearer dummy_token");
			then.status(200).json_body(json!({ "botId": "test_bot", "botName": "Notifier" }));
		})
		.await;
	let info = mock_client(&server).bot_info(&bot_id()).await.expect("Bot info should load.");

	mock.assert_async().await;

	assert_eq!(info["botName"], "Notifier");
	assert!(logs_contain("call=\"bot_info\""));
}
