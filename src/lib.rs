//! LINE WORKS bot messaging: sign a service-account JWT, exchange it for an access token,
//! and deliver a message to a user in one call.
//!
//! The pipeline lives in [`bot`]; each stage is usable on its own through [`auth`],
//! [`token`], and [`message`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod bot;
pub mod config;
pub mod error;
pub mod http;
pub mod message;
pub mod obs;
pub mod token;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		str::FromStr,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(feature = "cli")]
use {clap as _, color_eyre as _, tokio as _, tracing_appender as _, tracing_subscriber as _};
#[cfg(test)] use {httpmock as _, tracing_test as _};
