//! Unit tests for the verification code service

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::verification_code::CODE_LENGTH;
use crate::errors::{DomainError, SmsError};
use crate::services::otp::{OtpService, OtpServiceConfig};

use super::mocks::{MockCodeCache, MockRateLimiter, MockSmsSender};

type TestService = OtpService<MockSmsSender, MockCodeCache, MockRateLimiter>;

fn build(
    sms: MockSmsSender,
    limiter: MockRateLimiter,
) -> (TestService, Arc<MockSmsSender>, Arc<MockCodeCache>) {
    let sms = Arc::new(sms);
    let cache = Arc::new(MockCodeCache::new());
    let service = OtpService::new(
        sms.clone(),
        cache.clone(),
        Arc::new(limiter),
        OtpServiceConfig::default(),
    );
    (service, sms, cache)
}

#[tokio::test]
async fn test_issue_success_caches_sent_code() {
    let (service, sms, cache) = build(MockSmsSender::new(false), MockRateLimiter::unlimited());

    service.issue("13800000000").await.unwrap();

    let sent = sms.get_sent_code("13800000000").unwrap();
    assert_eq!(sent.len(), CODE_LENGTH);
    assert!(sent.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(cache.stored_code("13800000000"), Some(sent));
}

#[tokio::test]
async fn test_eleventh_issue_is_rate_limited() {
    let (service, sms, _cache) = build(MockSmsSender::new(false), MockRateLimiter::new(10));

    for _ in 0..10 {
        service.issue("13800000000").await.unwrap();
    }

    match service.issue("13800000000").await {
        Err(DomainError::RateLimitExceeded {
            message,
            retry_after,
        }) => {
            assert_eq!(retry_after, Duration::from_secs(300));
            assert!(message.contains("5 分钟内最多发送 10 次"));
        }
        other => panic!("expected rate limit error, got {:?}", other),
    }

    // Denied issuance never reaches the sender
    assert_eq!(sms.sends(), 10);
}

#[tokio::test]
async fn test_verify_unknown_identity_is_false() {
    let (service, _sms, _cache) = build(MockSmsSender::new(false), MockRateLimiter::unlimited());
    assert!(!service.verify("13900000000", "123456").await);
    assert!(!service.verify("13900000000", "").await);
}

#[tokio::test]
async fn test_verify_does_not_consume_code() {
    let (service, sms, _cache) = build(MockSmsSender::new(false), MockRateLimiter::unlimited());

    service.issue("13800000000").await.unwrap();
    let code = sms.get_sent_code("13800000000").unwrap();

    assert!(service.verify("13800000000", &code).await);
    assert!(service.verify("13800000000", &code).await);
}

#[tokio::test]
async fn test_verify_wrong_code_is_false() {
    let (service, sms, _cache) = build(MockSmsSender::new(false), MockRateLimiter::unlimited());

    service.issue("13800000000").await.unwrap();
    let code = sms.get_sent_code("13800000000").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    assert!(!service.verify("13800000000", wrong).await);
    assert!(!service.verify("13800000000", &code[..5]).await);
}

#[tokio::test]
async fn test_reissue_replaces_previous_code() {
    let (service, sms, cache) = build(MockSmsSender::new(false), MockRateLimiter::unlimited());

    service.issue("13800000000").await.unwrap();
    service.issue("13800000000").await.unwrap();

    let latest = sms.get_sent_code("13800000000").unwrap();
    assert_eq!(cache.stored_code("13800000000"), Some(latest.clone()));
    assert!(service.verify("13800000000", &latest).await);
}

#[tokio::test(start_paused = true)]
async fn test_code_expires_after_ttl() {
    let (service, sms, _cache) = build(MockSmsSender::new(false), MockRateLimiter::unlimited());

    service.issue("13800000000").await.unwrap();
    let code = sms.get_sent_code("13800000000").unwrap();

    tokio::time::advance(Duration::from_secs(299)).await;
    assert!(service.verify("13800000000", &code).await);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(!service.verify("13800000000", &code).await);
}

#[tokio::test]
async fn test_delivery_failure_leaves_cache_empty() {
    let (service, _sms, cache) = build(MockSmsSender::new(true), MockRateLimiter::unlimited());

    let result = service.issue("13800000000").await;
    assert!(matches!(
        result,
        Err(DomainError::Delivery(SmsError::Transport(_)))
    ));
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_delivery_timeout_leaves_cache_empty() {
    let (service, _sms, cache) = build(
        MockSmsSender::with_delay(Duration::from_secs(60)),
        MockRateLimiter::unlimited(),
    );

    let result = service.issue("13800000000").await;
    match result {
        Err(DomainError::DeliveryTimeout { timeout }) => {
            assert_eq!(timeout, Duration::from_secs(10));
        }
        other => panic!("expected delivery timeout, got {:?}", other),
    }
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_issue_and_verify_scenario() {
    let (service, sms, cache) = build(MockSmsSender::new(false), MockRateLimiter::unlimited());

    service.issue("13800000000").await.unwrap();

    let cached = cache.stored_code("13800000000").unwrap();
    assert_eq!(cached.len(), 6);
    assert_eq!(Some(cached.clone()), sms.get_sent_code("13800000000"));

    assert!(service.verify("13800000000", &cached).await);
    if cached != "000000" {
        assert!(!service.verify("13800000000", "000000").await);
    }
}

#[tokio::test]
async fn test_config_from_app_settings() {
    let settings = otp_shared::OtpConfig {
        ttl_minutes: 2,
        ..Default::default()
    };
    let config = OtpServiceConfig::from(&settings);
    assert_eq!(config.code_length, CODE_LENGTH);
    assert_eq!(config.ttl(), Duration::from_secs(120));

    let (sms, cache) = (
        Arc::new(MockSmsSender::new(false)),
        Arc::new(MockCodeCache::new()),
    );
    let service = OtpService::new(
        sms.clone(),
        cache,
        Arc::new(MockRateLimiter::unlimited()),
        config,
    );
    service.issue("13800000000").await.unwrap();
    assert_eq!(sms.get_sent_code("13800000000").unwrap().len(), CODE_LENGTH);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issues_converge_on_a_sent_code() {
    let (service, sms, cache) = build(MockSmsSender::new(false), MockRateLimiter::unlimited());
    let service = Arc::new(service);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.issue("13800000000").await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let sent = sms.all_sent_codes();
    assert_eq!(sent.len(), 2);
    let cached = cache.stored_code("13800000000").unwrap();
    assert!(sent.contains(&cached), "cached {} not among sent {:?}", cached, sent);
    assert!(service.verify("13800000000", &cached).await);
}
