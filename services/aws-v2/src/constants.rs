use std::collections::HashSet;

use once_cell::sync::Lazy;

// Env values used in aws v2 signing.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const S3SIG_BASE_DOMAIN: &str = "S3SIG_BASE_DOMAIN";

/// Base domain of virtual-hosted-style S3 endpoints.
pub const DEFAULT_BASE_DOMAIN: &str = "amazonaws.com";

// Headers used in aws v2 signing.
pub const CONTENT_MD5: &str = "content-md5";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_PREFIX: &str = "x-amz-";

// Query names used in presigned urls.
pub const AWS_ACCESS_KEY_ID_QUERY: &str = "AWSAccessKeyId";
pub const EXPIRES_QUERY: &str = "Expires";
pub const SIGNATURE_QUERY: &str = "Signature";

/// Authorization scheme prefix, `AWS <access-key-id>:<signature>`.
pub const AUTHORIZATION_SCHEME: &str = "AWS";

// Please attention: the subresources are case sensitive.
pub static SUBRESOURCES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "acl",
        "location",
        "logging",
        "notification",
        "partNumber",
        "policy",
        "requestPayment",
        "response-cache-control",
        "response-content-disposition",
        "response-content-encoding",
        "response-content-language",
        "response-content-type",
        "response-expires",
        "torrent",
        "uploadId",
        "uploads",
        "versionId",
        "versioning",
        "versions",
        "website",
    ])
});
