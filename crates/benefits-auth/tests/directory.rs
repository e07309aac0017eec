//! S3 directory tests call real AWS and need credentials plus a bucket
//! seeded with `employees/12345.json`.
//!
//! Run with: `BENEFITS_BUCKET=... cargo test -p benefits-auth --test directory -- --ignored`

use benefits_auth::directory::{EmployeeDirectory, S3Directory};
use benefits_auth::error::AuthError;

async fn build_directory() -> S3Directory {
    let bucket = std::env::var("BENEFITS_BUCKET").expect("set BENEFITS_BUCKET");
    let client = benefits_storage::client::build_client_with_region("us-east-1").await;
    S3Directory::new(client, bucket)
}

#[tokio::test]
#[ignore]
async fn s3_lookup_finds_seeded_employee() {
    let directory = build_directory().await;
    let employee = directory
        .lookup("12345")
        .await
        .expect("lookup should succeed")
        .expect("employee 12345 should be seeded");
    assert_eq!(employee.employee_id, "12345");
}

#[tokio::test]
#[ignore]
async fn s3_lookup_missing_employee_is_none() {
    let directory = build_directory().await;
    let employee = directory
        .lookup("does-not-exist-0000")
        .await
        .expect("lookup should succeed");
    assert!(employee.is_none());
}

#[tokio::test]
async fn s3_lookup_rejects_path_ids_without_network() {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .build();
    let directory = S3Directory::new(aws_sdk_s3::Client::from_conf(config), "unused");

    assert!(directory.lookup("../secrets").await.unwrap().is_none());
    assert!(directory.lookup("").await.unwrap().is_none());
}

#[tokio::test]
async fn s3_lookup_against_unreachable_endpoint_is_a_directory_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .endpoint_url(endpoint)
        .force_path_style(true)
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            "test", "test", None, None, "static",
        ))
        .retry_config(aws_sdk_s3::config::retry::RetryConfig::disabled())
        .build();
    let directory = S3Directory::new(aws_sdk_s3::Client::from_conf(config), "benefits");

    let result = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        directory.lookup("12345"),
    )
    .await
    .expect("lookup should fail fast");

    match result {
        Err(AuthError::Directory(detail)) => assert!(detail.contains("employees/12345.json")),
        other => panic!("expected directory error, got {other:?}"),
    }
}
