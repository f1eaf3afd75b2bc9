//! AWS Signature Version 2 for S3.
use std::time::Duration;

use http::header::AUTHORIZATION;
use http::header::HeaderName;
use http::header::DATE;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use log::debug;
use percent_encoding::utf8_percent_encode;
use percent_encoding::NON_ALPHANUMERIC;
use s3sig_core::hash::base64_hmac_sha1;
use s3sig_core::time::{format_http_date, format_timestamp, now, DateTime};
use s3sig_core::{Error, Result, SignRequest, SigningCredential, SigningMethod, SigningRequest};

use crate::constants::*;
use crate::credential::Credential;
use crate::string_to_sign::string_to_sign;
use crate::Config;

/// Compute the signature of a string to sign.
///
/// `base64(HMAC-SHA1(secret_access_key, string_to_sign))`, always 28 characters.
pub fn sign(secret_access_key: &str, string_to_sign: &str) -> String {
    base64_hmac_sha1(secret_access_key.as_bytes(), string_to_sign.as_bytes())
}

/// RequestSigner that implements AWS Signature Version 2.
///
/// - [Signing and Authenticating REST Requests](https://docs.aws.amazon.com/AmazonS3/latest/userguide/RESTAuthentication.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    base_domain: String,
    presign_amz_headers: bool,
    time: Option<DateTime>,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSigner {
    /// Create a signer for `amazonaws.com`.
    pub fn new() -> Self {
        Self {
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            presign_amz_headers: false,
            time: None,
        }
    }

    /// Create a signer from config.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            base_domain: cfg.base_domain().to_string(),
            presign_amz_headers: cfg.presign_amz_headers,
            time: None,
        }
    }

    /// Specify the base domain used to detect virtual-hosted-style buckets.
    pub fn with_base_domain(mut self, base_domain: &str) -> Self {
        self.base_domain = base_domain.to_string();
        self
    }

    /// Let `x-amz-*` headers of the request participate in presigned urls.
    ///
    /// Clients of such an url must send the very same headers.
    pub fn with_presign_amz_headers(mut self, enabled: bool) -> Self {
        self.presign_amz_headers = enabled;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn get_time(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }

    /// Build the `Authorization` header value without touching the request.
    ///
    /// The value is `AWS <access_key_id>:<signature>`. The request is signed
    /// as is: no `Date` header is added.
    pub fn authorization(&self, ctx: &SigningRequest, cred: &Credential) -> Result<String> {
        let string_to_sign = string_to_sign(ctx, &self.base_domain, None)?;
        let signature = sign(&cred.secret_access_key, &string_to_sign);

        Ok(format!(
            "{AUTHORIZATION_SCHEME} {}:{signature}",
            cred.access_key_id
        ))
    }

    /// Sign the request via the `Authorization` header.
    ///
    /// - The uri authority is replaced by the `Host` header if they differ.
    /// - `Date` is set to the signing time if neither `Date` nor a non-empty
    ///   `x-amz-date` is present.
    ///
    /// Once a `Date` header exists, signing the same request again yields the
    /// same result.
    pub fn sign_header(&self, parts: &mut http::request::Parts, cred: &Credential) -> Result<()> {
        let mut ctx = SigningRequest::build(parts);
        let signed = self.sign_header_inner(&mut ctx, cred);

        // Return the request back even if signing failed.
        let applied = ctx.apply(parts);
        signed.and(applied)
    }

    fn sign_header_inner(&self, ctx: &mut SigningRequest, cred: &Credential) -> Result<()> {
        ctx.align_authority_with_host_header()?;
        let has_amz_date = !ctx
            .header_get_or_default(&HeaderName::from_static(X_AMZ_DATE))?
            .is_empty();
        if !ctx.headers.contains_key(DATE) && !has_amz_date {
            ctx.headers
                .insert(DATE, format_http_date(self.get_time()).parse()?);
        }

        let mut value: HeaderValue = self.authorization(ctx, cred)?.parse()?;
        value.set_sensitive(true);
        ctx.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Build a presigned url for `method` on `uri`.
    ///
    /// `expires` is placed into the date slot of the string to sign and into
    /// the `Expires` query parameter, it is expected to be a unix timestamp.
    /// No header participates in the signature.
    ///
    /// The original query string is kept and extended with
    /// `AWSAccessKeyId=<id>&Expires=<expires>&Signature=<signature>`, every
    /// value percent encoded.
    pub fn presign_url(
        &self,
        method: &Method,
        uri: &Uri,
        cred: &Credential,
        expires: &str,
    ) -> Result<Uri> {
        let mut ctx = SigningRequest::new(method.clone(), uri, HeaderMap::new());
        self.presign(&mut ctx, cred, expires)?;
        ctx.uri()
    }

    /// Sign the request via query string, valid until `expires` (unix timestamp).
    ///
    /// Only `x-amz-*` headers can participate, and only when
    /// [`RequestSigner::with_presign_amz_headers`] is enabled.
    pub fn sign_query(
        &self,
        parts: &mut http::request::Parts,
        cred: &Credential,
        expires: &str,
    ) -> Result<()> {
        let mut ctx = SigningRequest::build(parts);
        let signed = self.sign_query_inner(&mut ctx, cred, expires);

        // Return the request back even if signing failed.
        let applied = ctx.apply(parts);
        signed.and(applied)
    }

    fn sign_query_inner(
        &self,
        ctx: &mut SigningRequest,
        cred: &Credential,
        expires: &str,
    ) -> Result<()> {
        if !self.presign_amz_headers {
            let headers = std::mem::take(&mut ctx.headers);
            let signed = self.presign(ctx, cred, expires);
            ctx.headers = headers;
            return signed;
        }

        // Sign against the amz headers only, keeping the request headers untouched.
        let headers: HeaderMap = ctx
            .headers
            .iter()
            .filter(|(k, _)| k.as_str().starts_with(X_AMZ_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut signing = SigningRequest::new(ctx.method.clone(), &ctx.uri()?, headers);
        self.presign(&mut signing, cred, expires)?;
        ctx.query = signing.query;
        Ok(())
    }

    fn presign(&self, ctx: &mut SigningRequest, cred: &Credential, expires: &str) -> Result<()> {
        let string_to_sign = string_to_sign(ctx, &self.base_domain, Some(expires))?;
        let signature = sign(&cred.secret_access_key, &string_to_sign);
        debug!("presign with expires: {expires}");

        ctx.query_push(
            AWS_ACCESS_KEY_ID_QUERY,
            utf8_percent_encode(&cred.access_key_id, NON_ALPHANUMERIC).to_string(),
        );
        ctx.query_push(
            EXPIRES_QUERY,
            utf8_percent_encode(expires, NON_ALPHANUMERIC).to_string(),
        );
        ctx.query_push(
            SIGNATURE_QUERY,
            utf8_percent_encode(&signature, NON_ALPHANUMERIC).to_string(),
        );
        Ok(())
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid("missing credential"));
        };
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "access_key_id and secret_access_key must not be empty",
            ));
        }

        let method = if let Some(expires_in) = expires_in {
            SigningMethod::Query(expires_in)
        } else {
            SigningMethod::Header
        };

        match method {
            SigningMethod::Header => self.sign_header(req, cred),
            SigningMethod::Query(expires_in) => {
                let expires_in = chrono::TimeDelta::from_std(expires_in).map_err(|e| {
                    Error::request_invalid("expires_in is out of range").with_source(e)
                })?;
                let expires_at = self
                    .get_time()
                    .checked_add_signed(expires_in)
                    .ok_or_else(|| Error::request_invalid("expires_in is out of range"))?;
                let expires = format_timestamp(expires_at);
                self.sign_query(req, cred, &expires)
            }
        }
    }
}
