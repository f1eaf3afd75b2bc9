use log::debug;
use s3sig_core::SigningRequest;

use crate::constants::SUBRESOURCES;

/// Build the canonicalized resource of a request.
///
/// ## Format
///
/// ```text
/// [ "/" + Bucket ] +
/// <HTTP-Request-URI, from the protocol name up to the query string> +
/// [ "?" + sorted sub-resources joined by "&" ];
/// ```
///
/// The bucket is taken from the host:
///
/// - `bucket.s3.amazonaws.com` and `bucket.s3-eu-west-1.amazonaws.com` carry the
///   bucket in front of the last three labels.
/// - any other non-empty host is treated as a CNAME of a single bucket.
/// - an empty host means the bucket is already the first path segment.
pub fn canonicalize_resource(ctx: &SigningRequest, base_domain: &str) -> String {
    let pairs = ctx.query_pairs();
    let resource = build_resource(
        ctx.host(),
        &ctx.path,
        pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        base_domain,
    );

    debug!("canonicalized resource: {resource}");
    resource
}

/// Build the canonicalized resource from decoded query pairs.
///
/// `host` may still carry a port, it will be stripped.
pub fn build_resource<'a>(
    host: &str,
    path: &str,
    query: impl IntoIterator<Item = (&'a str, &'a str)>,
    base_domain: &str,
) -> String {
    let mut s = String::with_capacity(path.len() + 16);

    let host = strip_port(host);
    if let Some(bucket) = bucket_from_host(host, base_domain) {
        s.push('/');
        s.push_str(bucket);
    }

    s.push_str(path.split('?').next().unwrap_or_default());

    let params = canonicalize_sub_resources(query);
    if !params.is_empty() {
        s.push('?');
        s.push_str(&params);
    }

    s
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        // Keep bracketed ipv6 literals such as `[::1]` intact.
        Some((h, port)) if !port.contains(']') => h,
        _ => host,
    }
}

fn bucket_from_host<'a>(host: &'a str, base_domain: &str) -> Option<&'a str> {
    if host.is_empty() {
        return None;
    }

    if !host.ends_with(base_domain) {
        return Some(host);
    }

    let labels = host.split('.').count();
    if labels <= 3 {
        return None;
    }

    // Everything in front of the trailing three labels.
    let end = host.match_indices('.').nth(labels - 4).map(|(idx, _)| idx)?;
    Some(&host[..end])
}

/// Collect allow-listed sub-resources as `key=value` (or bare `key`), sorted
/// bytewise and joined with `&`.
fn canonicalize_sub_resources<'a>(query: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut params: Vec<String> = query
        .into_iter()
        .filter(|(k, _)| is_sub_resource(k))
        .map(|(k, v)| {
            if v.is_empty() {
                k.to_string()
            } else {
                format!("{k}={v}")
            }
        })
        .collect();
    params.sort_unstable();

    params.join("&")
}

fn is_sub_resource(param: &str) -> bool {
    SUBRESOURCES.contains(param)
}
