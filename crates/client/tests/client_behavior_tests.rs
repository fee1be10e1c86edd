use std::sync::Arc;
use std::time::Duration;

use webfs_client::WebFsClient;
use webfs_config::{AuthMethod, ClientConfig};
use webfs_core::Error;
use webfs_security::{IdentityContext, TokenAuthority};

mod common;
use common::{client, client_with, identity, simple_config, FakeCluster, URI, USER};

#[test]
fn test_concurrent_calls_on_empty_cache_fetch_once() {
    let cluster = FakeCluster::slow(Duration::from_millis(50));
    cluster.put_file("/shared", b"x");
    let client = client(&cluster);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| client.get_file_status("/shared").unwrap());
        }
    });

    assert_eq!(cluster.fetch_count(), 1);
    let cached = client.cached_token().unwrap();
    assert!(cluster
        .sent()
        .iter()
        .all(|r| Arc::ptr_eq(r.delegation.as_ref().unwrap(), &cached)));
}

#[test]
fn test_concurrent_rejections_replace_once() {
    let cluster = FakeCluster::new();
    cluster.put_file("/shared", b"x");
    let client = client(&cluster);
    let original = client.delegation_token().unwrap().unwrap();
    cluster.expire(&original);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| client.get_file_status("/shared").unwrap());
        }
    });

    assert_eq!(cluster.fetch_count(), 2);
    let stats = client.token_stats();
    assert_eq!(stats.fetches, 1);
    assert_eq!(stats.replacements, 1);
    let fresh = client.cached_token().unwrap();
    assert!(!Arc::ptr_eq(&fresh, &original));
    assert!(client.owns_cached_token());
}

#[test]
fn test_close_during_first_fetch_cancels_the_late_token() {
    let cluster = FakeCluster::slow(Duration::from_millis(300));
    cluster.put_file("/f", b"data");
    let client = client(&cluster);

    let outcome = std::thread::scope(|scope| {
        let in_flight = scope.spawn(|| client.open("/f"));
        std::thread::sleep(Duration::from_millis(100));
        client.close().unwrap();
        in_flight.join().unwrap()
    });

    assert!(matches!(outcome, Err(Error::Closed)), "unexpected outcome: {outcome:?}");
    assert!(client.is_closed());
    assert_eq!(cluster.fetch_count(), 1);
    assert_eq!(cluster.cancel_count(), 1);
    assert!(client.cached_token().is_none());
    assert!(!client.owns_cached_token());
    assert!(cluster.sent().is_empty());
}

#[test]
fn test_simple_auth_never_fetches() {
    let cluster = FakeCluster::insecure();
    let config = simple_config();
    assert!(!config.token_refresh);
    let client = client_with(&cluster, config.clone(), identity(&config));

    client.create("/plain", b"1", false).unwrap();
    assert_eq!(client.open("/plain").unwrap(), b"1");
    assert_eq!(client.delegation_token().unwrap(), None);
    assert_eq!(cluster.fetch_count(), 0);
    assert!(cluster.sent().iter().all(|r| r.delegation.is_none()));

    let injected = Arc::new(cluster.fetch(None).unwrap());
    client.set_delegation_token(injected.clone());
    client.open("/plain").unwrap();
    let last = cluster.sent().pop().unwrap();
    assert!(Arc::ptr_eq(last.delegation.as_ref().unwrap(), &injected));
}

#[test]
fn test_simple_auth_does_not_replace_rejected_token() {
    let cluster = FakeCluster::insecure();
    let config = simple_config();
    let client = client_with(&cluster, config.clone(), identity(&config));
    let injected = Arc::new(cluster.fetch(None).unwrap());
    client.set_delegation_token(injected.clone());
    let baseline = cluster.fetch_count();

    cluster.expire(&injected);
    let err = client.mkdirs("/dir").unwrap_err();
    assert!(err.is_invalid_token());
    assert_eq!(cluster.fetch_count(), baseline);
    assert_eq!(client.token_stats().retries, 0);
}

#[test]
fn test_issued_tags_win_over_defaults() {
    let cluster = FakeCluster::with_tags("bar", "foo");
    let client = client(&cluster);

    let token = client.delegation_token().unwrap().unwrap();
    assert_eq!(token.kind(), "bar");
    assert_eq!(token.service(), "foo");
    assert_eq!(client.token_kind(), "WEBHDFS delegation");
}

#[test]
fn test_remote_failures_are_not_retried() {
    let cluster = FakeCluster::new();
    let client = client(&cluster);

    match client.open("/missing").unwrap_err() {
        Error::Remote {
            status, exception, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(exception, "FileNotFoundException");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(cluster.sent().len(), 1);
    assert_eq!(cluster.fetch_count(), 1);
    assert_eq!(client.token_stats().retries, 0);
}

#[test]
fn test_filesystem_round_trip() {
    let cluster = FakeCluster::new();
    let client = client(&cluster);

    assert!(client.mkdirs("/user/DummyUser").unwrap());
    client.create("/user/DummyUser/f", b"abc", true).unwrap();
    let status = client.get_file_status("/user/DummyUser/f").unwrap();
    assert_eq!(status.length, 3);
    assert_eq!(status.owner, USER);
    assert!(!status.is_dir());
    assert!(client
        .rename("/user/DummyUser/f", "/user/DummyUser/g")
        .unwrap());
    assert!(client.delete("/user/DummyUser", true).unwrap());

    let rename = cluster
        .sent()
        .into_iter()
        .find(|r| r.op == webfs_core::Op::Rename)
        .unwrap();
    assert_eq!(rename.get_param("destination"), Some("/user/DummyUser/g"));
    assert_eq!(cluster.fetch_count(), 1);
}

#[test]
fn test_identity_must_match_configuration() {
    let cluster = FakeCluster::new();
    let config = ClientConfig::builder()
        .uri(URI)
        .user(USER)
        .auth_method(AuthMethod::Kerberos)
        .build()
        .unwrap();

    let stranger = Arc::new(IdentityContext::new("mallory", AuthMethod::Kerberos));
    let err = WebFsClient::with_parts(config.clone(), stranger, cluster.clone(), cluster.clone())
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));

    let simple = Arc::new(IdentityContext::new(USER, AuthMethod::Simple));
    let err = WebFsClient::with_parts(config, simple, cluster.clone(), cluster.clone()).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
