use std::time::Duration;

use anyhow::Result;
use s3sig_aws_v2::{Config, Credential, RequestSigner};
use s3sig_core::{OsEnv, Signer};

fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let cfg = Config::default().from_env(&OsEnv);
    let cred = match Credential::try_from(&cfg) {
        Ok(cred) => cred,
        Err(err) => {
            println!("No AWS credentials found ({err}), using demo credentials for example");
            Credential::new("0PN5J17HBGZHT7JJ3X82", "uV3F3YluFJax1cknvbcGwgjvx4QpvB+leU8dUj2o")
        }
    };
    let signer = Signer::new(cred, RequestSigner::from_config(&cfg));

    // Example 1: Authorization header
    let (mut parts, _) = http::Request::get("https://johnsmith.s3.amazonaws.com/photos/puppy.jpg")
        .body(())?
        .into_parts();
    signer.sign(&mut parts, None)?;
    println!("Date: {:?}", parts.headers.get(http::header::DATE));
    println!("Authorization: {:?}", parts.headers.get(http::header::AUTHORIZATION));

    // Example 2: presigned url valid for one hour
    let (mut parts, _) = http::Request::get("https://johnsmith.s3.amazonaws.com/photos/puppy.jpg")
        .body(())?
        .into_parts();
    signer.sign(&mut parts, Some(Duration::from_secs(3600)))?;
    println!("Presigned url: {}", parts.uri);

    Ok(())
}
