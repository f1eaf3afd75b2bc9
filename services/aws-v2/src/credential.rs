use std::fmt::{Debug, Formatter};

use s3sig_core::utils::Redact;
use s3sig_core::{Error, Result, SigningCredential};

use crate::Config;

/// Credential for aws v2 signing.
#[derive(Clone, Default)]
pub struct Credential {
    /// Access key id, embedded in the signed request.
    pub access_key_id: String,
    /// Secret access key, only ever used as HMAC key material.
    pub secret_access_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

impl TryFrom<&Config> for Credential {
    type Error = Error;

    fn try_from(cfg: &Config) -> Result<Self> {
        let (Some(ak), Some(sk)) = (&cfg.access_key_id, &cfg.secret_access_key) else {
            return Err(Error::config_invalid(
                "access_key_id and secret_access_key are both required",
            ));
        };

        let cred = Credential::new(ak, sk);
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "access_key_id and secret_access_key must not be empty",
            ));
        }
        Ok(cred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3sig_core::ErrorKind;

    #[test]
    fn test_debug_is_redacted() {
        let cred = Credential::new(
            "0PN5J17HBGZHT7JJ3X82",
            "uV3F3YluFJax1cknvbcGwgjvx4QpvB+leU8dUj2o",
        );
        let output = format!("{cred:?}");
        assert!(!output.contains("uV3F3YluFJax1cknvbcGwgjvx4QpvB+leU8dUj2o"));
        assert!(output.contains("0PN***X82"));
    }

    #[test]
    fn test_try_from_config() {
        let cfg = Config {
            access_key_id: Some("ak".to_string()),
            ..Default::default()
        };
        let err = Credential::try_from(&cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let cfg = Config {
            access_key_id: Some("ak".to_string()),
            secret_access_key: Some(String::new()),
            ..Default::default()
        };
        let err = Credential::try_from(&cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);

        let cfg = Config {
            access_key_id: Some("ak".to_string()),
            secret_access_key: Some("sk".to_string()),
            ..Default::default()
        };
        let cred = Credential::try_from(&cfg).unwrap();
        assert_eq!(cred.access_key_id, "ak");
    }
}
