use std::mem;
use std::str::FromStr;
use std::time::Duration;

use http::header::HeaderName;
use http::header::HOST;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::Error;
use crate::Result;

/// Signing context for request.
///
/// Header names in [`HeaderMap`] are already lower-cased, so lookups never
/// need to care about the case the caller used. Multiple values of the same
/// header keep their arrival order.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme, `None` for origin-form request targets.
    pub scheme: Option<Scheme>,
    /// HTTP authority, `None` for origin-form request targets.
    pub authority: Option<Authority>,
    /// Raw HTTP path, still percent encoded.
    pub path: String,
    /// Raw query string without the leading `?`, exactly as sent on the wire.
    pub query: String,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from its pieces without touching any request.
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap) -> Self {
        let mut ctx = Self {
            method,
            scheme: None,
            authority: None,
            path: String::new(),
            query: String::new(),
            headers,
        };
        ctx.set_uri(uri.clone());
        ctx
    }

    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Self {
        let mut ctx = Self {
            method: parts.method.clone(),
            scheme: None,
            authority: None,
            path: String::new(),
            query: String::new(),
            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        };
        ctx.set_uri(mem::take(&mut parts.uri));
        ctx
    }

    fn set_uri(&mut self, uri: Uri) {
        let uri = uri.into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        self.scheme = uri.scheme;
        self.authority = uri.authority;
        self.path = paq.path().to_string();
        self.query = paq.query().unwrap_or_default().to_string();
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// Headers are always returned, even if the uri can not be rebuilt.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.uri = self.uri()?;
        parts.method = self.method;

        Ok(())
    }

    /// Rebuild the request uri from the current scheme, authority, path and query.
    pub fn uri(&self) -> Result<Uri> {
        let mut uri_parts = http::uri::Parts::default();
        if let Some(authority) = &self.authority {
            uri_parts.scheme = Some(self.scheme.clone().unwrap_or(Scheme::HTTP));
            uri_parts.authority = Some(authority.clone());
        }
        uri_parts.path_and_query = {
            let paq = if self.query.is_empty() {
                self.path.clone()
            } else {
                format!("{}?{}", self.path, self.query)
            };

            Some(PathAndQuery::from_str(&paq)?)
        };

        Ok(Uri::from_parts(uri_parts)?)
    }

    /// Host of the request without port, empty if the uri carries no authority.
    #[inline]
    pub fn host(&self) -> &str {
        self.authority.as_ref().map(|a| a.host()).unwrap_or_default()
    }

    /// Replace the uri authority with the `Host` header if they disagree.
    ///
    /// The `Host` header is what actually travels on the wire, so signing must
    /// reflect it. Returns `true` if the authority changed.
    pub fn align_authority_with_host_header(&mut self) -> Result<bool> {
        let Some(host) = self.headers.get(HOST) else {
            return Ok(false);
        };
        let host = std::str::from_utf8(host.as_bytes())?;
        if self.authority.as_ref().map(|a| a.as_str()) == Some(host) {
            return Ok(false);
        }

        let authority = Authority::from_str(host).map_err(|e| {
            Error::url_invalid(format!("invalid host header: {host}")).with_source(e)
        })?;
        self.authority = Some(authority);
        Ok(true)
    }

    /// Get the query decoded into pairs, in the order they appear.
    ///
    /// Pairs without `=` are returned with an empty value.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(self.query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Push a new query pair into query string.
    ///
    /// The value is appended as is, callers must encode it first.
    #[inline]
    pub fn query_push(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) {
        if !self.query.is_empty() {
            self.query.push('&');
        }
        self.query.push_str(key.as_ref());
        self.query.push('=');
        self.query.push_str(value.as_ref());
    }

    /// Get the first header value by name.
    ///
    /// Returns empty string if header not found. Values that are not valid
    /// utf-8 are rejected instead of being converted lossily.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(std::str::from_utf8(v.as_bytes())?),
            None => Ok(""),
        }
    }

    /// Get all values of a header in arrival order.
    pub fn header_get_all(&self, key: &HeaderName) -> Result<Vec<&str>> {
        self.headers
            .get_all(key)
            .iter()
            .map(|v| std::str::from_utf8(v.as_bytes()).map_err(Error::from))
            .collect()
    }

    /// Get header names that start with the given prefix.
    ///
    /// Every name is returned once even if the header carries multiple values.
    pub fn header_names_with_prefix(&self, prefix: &str) -> Vec<&HeaderName> {
        self.headers
            .keys()
            .filter(|k| k.as_str().starts_with(prefix))
            .collect()
    }
}

/// SigningMethod is the method that used in signing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with header.
    Header,
    /// Signing with query.
    Query(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;

    fn parts(uri: &str) -> http::request::Parts {
        http::Request::get(uri).body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_build_and_apply_roundtrip() -> Result<()> {
        let mut p = parts("https://bucket.s3.amazonaws.com:8443/a%20b?acl&x=1");
        let ctx = SigningRequest::build(&mut p);
        assert_eq!(ctx.host(), "bucket.s3.amazonaws.com");
        assert_eq!(ctx.path, "/a%20b");
        assert_eq!(ctx.query, "acl&x=1");

        ctx.apply(&mut p)?;
        assert_eq!(
            p.uri.to_string(),
            "https://bucket.s3.amazonaws.com:8443/a%20b?acl&x=1"
        );
        Ok(())
    }

    #[test]
    fn test_origin_form_has_no_host() -> Result<()> {
        let mut p = parts("/photos/puppy.jpg");
        let ctx = SigningRequest::build(&mut p);
        assert_eq!(ctx.host(), "");
        ctx.apply(&mut p)?;
        assert_eq!(p.uri.to_string(), "/photos/puppy.jpg");
        Ok(())
    }

    #[test]
    fn test_align_authority_with_host_header() -> Result<()> {
        let mut p = parts("/db-backup.dat.gz");
        p.headers
            .insert(HOST, HeaderValue::from_static("static.johnsmith.net:8080"));
        let mut ctx = SigningRequest::build(&mut p);

        assert!(ctx.align_authority_with_host_header()?);
        assert_eq!(ctx.host(), "static.johnsmith.net");
        assert!(!ctx.align_authority_with_host_header()?);

        ctx.apply(&mut p)?;
        assert_eq!(
            p.uri.to_string(),
            "http://static.johnsmith.net:8080/db-backup.dat.gz"
        );
        Ok(())
    }

    #[test]
    fn test_query_pairs_are_decoded() {
        let ctx = SigningRequest::new(
            Method::GET,
            &Uri::from_static("/?response-content-type=text%2Fplain&uploads&a=b+c"),
            HeaderMap::new(),
        );
        assert_eq!(
            ctx.query_pairs(),
            vec![
                ("response-content-type".to_string(), "text/plain".to_string()),
                ("uploads".to_string(), "".to_string()),
                ("a".to_string(), "b c".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_push() -> Result<()> {
        let mut ctx = SigningRequest::new(
            Method::GET,
            &Uri::from_static("http://example.com/key"),
            HeaderMap::new(),
        );
        ctx.query_push("Expires", "1175139620");
        ctx.query_push("Signature", "abc%3D");
        assert_eq!(
            ctx.uri()?.to_string(),
            "http://example.com/key?Expires=1175139620&Signature=abc%3D"
        );
        Ok(())
    }

    #[test]
    fn test_header_get_rejects_non_utf8() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());
        let ctx = SigningRequest::new(Method::PUT, &Uri::from_static("/"), headers);

        let err = ctx.header_get_or_default(&CONTENT_TYPE).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_header_get_all_keeps_order() -> Result<()> {
        let mut headers = HeaderMap::new();
        let name = HeaderName::from_static("x-amz-meta-reviewedby");
        headers.append(&name, HeaderValue::from_static("joe@johnsmith.net"));
        headers.append(&name, HeaderValue::from_static("jane@johnsmith.net"));
        let ctx = SigningRequest::new(Method::PUT, &Uri::from_static("/"), headers);

        assert_eq!(
            ctx.header_get_all(&name)?,
            vec!["joe@johnsmith.net", "jane@johnsmith.net"]
        );
        assert_eq!(ctx.header_names_with_prefix("x-amz-").len(), 1);
        Ok(())
    }
}
