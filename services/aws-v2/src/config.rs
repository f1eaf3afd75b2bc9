use s3sig_core::Env;

use crate::constants::*;

/// Config carries all the configuration for aws v2 signing.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_ACCESS_KEY_ID`
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SECRET_ACCESS_KEY`
    pub secret_access_key: Option<String>,
    /// `base_domain` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `S3SIG_BASE_DOMAIN`
    /// - default to `amazonaws.com`
    pub base_domain: Option<String>,
    /// Let `x-amz-*` headers of the request participate in presigned urls.
    ///
    /// Disabled by default: a presigned url is expected to work without any
    /// extra headers.
    pub presign_amz_headers: bool,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        if let Some(v) = env.var(AWS_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = env.var(AWS_SECRET_ACCESS_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Some(v) = env.var(S3SIG_BASE_DOMAIN) {
            self.base_domain.get_or_insert(v);
        }

        self
    }

    /// Base domain used to detect virtual-hosted-style buckets.
    pub fn base_domain(&self) -> &str {
        self.base_domain.as_deref().unwrap_or(DEFAULT_BASE_DOMAIN)
    }
}
