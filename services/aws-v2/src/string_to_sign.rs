use std::fmt::Write;

use http::header::HeaderName;
use http::header::CONTENT_TYPE;
use http::header::DATE;
use log::debug;
use s3sig_core::Result;
use s3sig_core::SigningRequest;

use crate::constants::*;
use crate::resource::canonicalize_resource;

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// HTTP-Verb + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// CanonicalizedAmzHeaders +
/// CanonicalizedResource;
/// ```
///
/// The date slot is filled by, in order:
///
/// - `expires` if given, used by presigned urls.
/// - nothing if `x-amz-date` is present and not empty, it is signed as an amz
///   header instead.
/// - the `Date` header as is.
///
/// The current time is never injected here, callers must make sure a date
/// header exists before signing via headers.
///
/// If a positional header is sent more than once, only its first value is signed.
///
/// ## Reference
///
/// - [Signing and Authenticating REST Requests](https://docs.aws.amazon.com/AmazonS3/latest/userguide/RESTAuthentication.html)
pub fn string_to_sign(
    ctx: &SigningRequest,
    base_domain: &str,
    expires: Option<&str>,
) -> Result<String> {
    let content_md5 = ctx.header_get_or_default(&HeaderName::from_static(CONTENT_MD5))?;
    let content_type = ctx.header_get_or_default(&CONTENT_TYPE)?;
    let amz_date = ctx.header_get_or_default(&HeaderName::from_static(X_AMZ_DATE))?;
    let date = match expires {
        Some(expires) => expires,
        None if !amz_date.is_empty() => "",
        None => ctx.header_get_or_default(&DATE)?,
    };

    let mut s = String::new();
    writeln!(&mut s, "{}", ctx.method.as_str())?;
    writeln!(&mut s, "{content_md5}")?;
    writeln!(&mut s, "{content_type}")?;
    writeln!(&mut s, "{date}")?;
    s.write_str(&canonicalize_amz_headers(ctx)?)?;
    s.write_str(&canonicalize_resource(ctx, base_domain))?;

    debug!("string to sign: {}", &s);
    Ok(s)
}

/// Build `CanonicalizedAmzHeaders`.
///
/// Every `x-amz-*` header becomes one `name:value1,value2\n` line, values in
/// arrival order. Lines are sorted bytewise.
fn canonicalize_amz_headers(ctx: &SigningRequest) -> Result<String> {
    let mut lines = ctx
        .header_names_with_prefix(X_AMZ_PREFIX)
        .into_iter()
        .map(|name| -> Result<String> {
            let values = ctx.header_get_all(name)?;
            Ok(format!("{}:{}\n", name.as_str(), values.join(",")))
        })
        .collect::<Result<Vec<_>>>()?;
    lines.sort_unstable();

    Ok(lines.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue, Method, Uri};
    use pretty_assertions::assert_eq;
    use s3sig_core::ErrorKind;

    const BASE: &str = "amazonaws.com";

    fn request(
        method: Method,
        uri: &'static str,
        headers: &[(&'static str, &'static str)],
    ) -> SigningRequest {
        let mut map = HeaderMap::new();
        for &(k, v) in headers {
            map.append(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_static(v),
            );
        }
        SigningRequest::new(method, &Uri::from_static(uri), map)
    }

    #[test]
    fn test_object_get() -> Result<()> {
        let ctx = request(
            Method::GET,
            "http://johnsmith.s3.amazonaws.com/photos/puppy.jpg",
            &[("Date", "Tue, 27 Mar 2007 19:36:42 +0000")],
        );
        assert_eq!(
            string_to_sign(&ctx, BASE, None)?,
            "GET\n\n\nTue, 27 Mar 2007 19:36:42 +0000\n/johnsmith/photos/puppy.jpg"
        );
        Ok(())
    }

    #[test]
    fn test_amz_headers_are_sorted_and_joined() -> Result<()> {
        let ctx = request(
            Method::PUT,
            "http://static.johnsmith.net:8080/db-backup.dat.gz",
            &[
                ("Date", "Tue, 27 Mar 2007 21:06:08 +0000"),
                ("x-amz-acl", "public-read"),
                ("content-type", "application/x-download"),
                ("Content-MD5", "4gJE4saaMU4BqNR0kLY+lw=="),
                ("X-Amz-Meta-ReviewedBy", "joe@johnsmith.net"),
                ("X-Amz-Meta-ReviewedBy", "jane@johnsmith.net"),
                ("X-Amz-Meta-FileChecksum", "0x02661779"),
                ("X-Amz-Meta-ChecksumAlgorithm", "crc32"),
                ("Content-Disposition", "attachment; filename=database.dat"),
            ],
        );
        assert_eq!(
            string_to_sign(&ctx, BASE, None)?,
            "PUT\n\
             4gJE4saaMU4BqNR0kLY+lw==\n\
             application/x-download\n\
             Tue, 27 Mar 2007 21:06:08 +0000\n\
             x-amz-acl:public-read\n\
             x-amz-meta-checksumalgorithm:crc32\n\
             x-amz-meta-filechecksum:0x02661779\n\
             x-amz-meta-reviewedby:joe@johnsmith.net,jane@johnsmith.net\n\
             /static.johnsmith.net/db-backup.dat.gz"
        );
        Ok(())
    }

    #[test]
    fn test_amz_date_empties_date_slot() -> Result<()> {
        let ctx = request(
            Method::DELETE,
            "http://s3.amazonaws.com/johnsmith/photos/puppy.jpg",
            &[
                ("Date", "Tue, 27 Mar 2007 21:20:27 +0000"),
                ("x-amz-date", "Tue, 27 Mar 2007 21:20:26 +0000"),
            ],
        );
        assert_eq!(
            string_to_sign(&ctx, BASE, None)?,
            "DELETE\n\n\n\nx-amz-date:Tue, 27 Mar 2007 21:20:26 +0000\n/johnsmith/photos/puppy.jpg"
        );
        Ok(())
    }

    #[test]
    fn test_empty_amz_date_keeps_date_slot() -> Result<()> {
        let ctx = request(
            Method::GET,
            "http://s3.amazonaws.com/",
            &[("Date", "Wed, 28 Mar 2007 01:29:59 +0000"), ("x-amz-date", "")],
        );
        assert_eq!(
            string_to_sign(&ctx, BASE, None)?,
            "GET\n\n\nWed, 28 Mar 2007 01:29:59 +0000\nx-amz-date:\n/"
        );
        Ok(())
    }

    #[test]
    fn test_expires_overrides_date() -> Result<()> {
        let ctx = request(
            Method::GET,
            "http://johnsmith.s3.amazonaws.com/photos/puppy.jpg",
            &[
                ("Date", "Tue, 27 Mar 2007 19:36:42 +0000"),
                ("x-amz-date", "Tue, 27 Mar 2007 21:20:26 +0000"),
            ],
        );
        assert_eq!(
            string_to_sign(&ctx, BASE, Some("1175139620"))?,
            "GET\n\n\n1175139620\nx-amz-date:Tue, 27 Mar 2007 21:20:26 +0000\n/johnsmith/photos/puppy.jpg"
        );
        Ok(())
    }

    #[test]
    fn test_missing_date_is_left_empty() -> Result<()> {
        let ctx = request(Method::GET, "http://s3.amazonaws.com/", &[]);
        assert_eq!(string_to_sign(&ctx, BASE, None)?, "GET\n\n\n\n/");
        Ok(())
    }

    #[test]
    fn test_duplicate_positional_headers_first_wins() -> Result<()> {
        let ctx = request(
            Method::PUT,
            "http://s3.amazonaws.com/bucket/key",
            &[
                ("Content-Type", "image/jpeg"),
                ("Content-Type", "image/png"),
                ("Date", "Tue, 27 Mar 2007 21:15:45 +0000"),
                ("Date", "Wed, 28 Mar 2007 01:29:59 +0000"),
            ],
        );
        assert_eq!(
            string_to_sign(&ctx, BASE, None)?,
            "PUT\n\nimage/jpeg\nTue, 27 Mar 2007 21:15:45 +0000\n/bucket/key"
        );
        Ok(())
    }

    #[test]
    fn test_non_utf8_header_is_rejected() {
        let mut map = HeaderMap::new();
        map.insert("x-amz-meta-blob", HeaderValue::from_bytes(&[0xc3, 0x28]).unwrap());
        let ctx = SigningRequest::new(Method::PUT, &Uri::from_static("/bucket/key"), map);

        let err = string_to_sign(&ctx, BASE, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_deterministic() -> Result<()> {
        let ctx = request(
            Method::GET,
            "http://johnsmith.s3.amazonaws.com/?acl&versionId=1&prefix=a",
            &[("x-amz-b", "2"), ("x-amz-a", "1"), ("Date", "d")],
        );
        let first = string_to_sign(&ctx, BASE, None)?;
        for _ in 0..8 {
            assert_eq!(string_to_sign(&ctx, BASE, None)?, first);
        }
        assert_eq!(
            first,
            "GET\n\n\nd\nx-amz-a:1\nx-amz-b:2\n/johnsmith/?acl&versionId=1"
        );
        Ok(())
    }
}
