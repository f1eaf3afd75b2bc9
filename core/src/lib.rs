//! Core components for signing S3 requests.
//!
//! This crate provides the foundational types shared by the signers in this
//! workspace. It knows nothing about a particular signature scheme.
//!
//! ## Overview
//!
//! - **SigningRequest**: A structured request description (method, uri pieces, headers)
//!   built from and applied back to [`http::request::Parts`].
//! - **Traits**: [`SigningCredential`] validates credentials and [`SignRequest`]
//!   signs a request in place.
//! - **Signer**: Pairs a credential with a [`SignRequest`] implementation.
//! - **Env**: Abstracts environment variables so config loading is testable.
//!
//! Everything here is synchronous and side effect free except for the
//! request that is explicitly handed over for signing.
//!
//! ## Example
//!
//! ```
//! use s3sig_core::{Result, SignRequest, Signer, SigningCredential};
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     token: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     fn sign_request(
//!         &self,
//!         req: &mut http::request::Parts,
//!         cred: Option<&Self::Credential>,
//!         _expires_in: Option<Duration>,
//!     ) -> Result<()> {
//!         if let Some(cred) = cred {
//!             req.headers.insert("x-token", cred.token.parse()?);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn example() -> Result<()> {
//! let signer = Signer::new(MyCredential { token: "abc".to_string() }, MyBuilder);
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://example.com")
//!     .body(())?
//!     .into_parts()
//!     .0;
//!
//! signer.sign(&mut parts, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: base64 and HMAC-SHA1 helpers
//! - [`time`]: HTTP date helpers
//! - [`utils`]: Data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod env;
pub use env::{Env, OsEnv, StaticEnv};

mod api;
pub use api::{SignRequest, SigningCredential};
mod request;
pub use request::{SigningMethod, SigningRequest};
mod signer;
pub use signer::Signer;
