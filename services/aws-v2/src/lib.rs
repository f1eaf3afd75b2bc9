//! AWS Signature Version 2 signer for S3.
//!
//! ## Example
//!
//! ```
//! use s3sig_aws_v2::{Credential, RequestSigner};
//! use s3sig_core::Result;
//!
//! # fn example() -> Result<()> {
//! let cred = Credential::new("0PN5J17HBGZHT7JJ3X82", "uV3F3YluFJax1cknvbcGwgjvx4QpvB+leU8dUj2o");
//! let signer = RequestSigner::new();
//!
//! let (mut parts, _) = http::Request::get("http://johnsmith.s3.amazonaws.com/photos/puppy.jpg")
//!     .header("Date", "Tue, 27 Mar 2007 19:36:42 +0000")
//!     .body(())?
//!     .into_parts();
//! signer.sign_header(&mut parts, &cred)?;
//!
//! assert_eq!(
//!     parts.headers["authorization"],
//!     "AWS 0PN5J17HBGZHT7JJ3X82:xXjDGYUmKxnwqr5KXNPGldn5LbA="
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod resource;
pub use resource::build_resource;
pub use resource::canonicalize_resource;

mod string_to_sign;
pub use string_to_sign::string_to_sign;

mod sign_request;
pub use sign_request::sign;
pub use sign_request::RequestSigner;
