//! Tests for TTL expiry, capacity and error handling of the response cache.

use pricebot_cache::{CacheKey, ResponseCache, ResponseCacheConfig, SharedResponseCache};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Quote {
    symbol: String,
    price: f64,
}

fn quote(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price,
    }
}

#[tokio::test(start_paused = true)]
async fn test_two_calls_within_ttl_compute_once() {
    let mut cache = ResponseCache::default();
    let key = CacheKey::new("get_crypto_price", "BTC");
    let mut calls = 0;

    let first: Result<Quote, String> = cache.get_or_compute(&key, || {
        calls += 1;
        Ok(quote("BTC", 65000.12))
    });
    assert_eq!(first.unwrap(), quote("BTC", 65000.12));

    tokio::time::advance(Duration::from_secs(299)).await;

    let second: Result<Quote, String> = cache.get_or_compute(&key, || {
        calls += 1;
        Ok(quote("BTC", 1.0))
    });
    assert_eq!(second.unwrap().price, 65000.12);
    assert_eq!(calls, 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_is_recomputed() {
    let mut cache = ResponseCache::default();
    let key = CacheKey::new("get_crypto_price", "ETH");
    let mut calls = 0;

    let first: Result<Quote, String> = cache.get_or_compute(&key, || {
        calls += 1;
        Ok(quote("ETH", 3000.0))
    });
    assert!(first.is_ok());

    tokio::time::advance(Duration::from_secs(300)).await;
    assert!(!cache.contains_live(&key));

    let second: Result<Quote, String> = cache.get_or_compute(&key, || {
        calls += 1;
        Ok(quote("ETH", 3100.0))
    });

    assert_eq!(second.unwrap().price, 3100.0);
    assert_eq!(calls, 2);
}

#[tokio::test(start_paused = true)]
async fn test_custom_ttl_is_respected() {
    let config = ResponseCacheConfig::default().with_ttl_seconds(10);
    let mut cache = ResponseCache::new(config);
    let key = CacheKey::new("get_crypto_price", "SOL");
    cache.insert_as(&key, &quote("SOL", 150.0));

    tokio::time::advance(Duration::from_secs(9)).await;
    assert_eq!(cache.get_as::<Quote>(&key), Some(quote("SOL", 150.0)));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(cache.get_as::<Quote>(&key), None);
    assert!(cache.is_empty());
}

#[test]
fn test_capacity_never_exceeded() {
    let mut cache = ResponseCache::new(ResponseCacheConfig::default().with_max_size(3));

    for i in 0..3 {
        cache.insert_as(&CacheKey::new("get_crypto_price", i), &i);
    }
    assert_eq!(cache.len(), 3);

    cache.insert_as(&CacheKey::new("get_crypto_price", 3), &3);
    assert_eq!(cache.len(), 3);

    // Exactly the oldest entry was evicted.
    assert!(!cache.contains_live(&CacheKey::new("get_crypto_price", 0)));
    for i in 1..4 {
        assert!(cache.contains_live(&CacheKey::new("get_crypto_price", i)));
    }

    for i in 4..50 {
        cache.insert_as(&CacheKey::new("get_crypto_price", i), &i);
        assert!(cache.len() <= 3);
    }
}

#[test]
fn test_failed_compute_leaves_no_entry() {
    let mut cache = ResponseCache::default();
    let key = CacheKey::new("get_crypto_price", "NOPE");

    let result: Result<Quote, String> =
        cache.get_or_compute(&key, || Err("Sorry, I could not find the price for NOPE".into()));

    assert_eq!(
        result.unwrap_err(),
        "Sorry, I could not find the price for NOPE"
    );
    assert!(!cache.contains_live(&key));
    assert!(cache.is_empty());

    // A later success is computed and stored normally.
    let retry: Result<Quote, String> = cache.get_or_compute(&key, || Ok(quote("NOPE", 0.5)));
    assert!(retry.is_ok());
    assert!(cache.contains_live(&key));
}

#[tokio::test(start_paused = true)]
async fn test_cleanup_expired_counts_removed() {
    let mut cache = ResponseCache::new(ResponseCacheConfig::default().with_ttl_seconds(60));
    cache.insert_as(&CacheKey::new("p", "old"), &1);
    tokio::time::advance(Duration::from_secs(30)).await;
    cache.insert_as(&CacheKey::new("p", "new"), &2);
    tokio::time::advance(Duration::from_secs(30)).await;

    assert_eq!(cache.cleanup_expired(), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains_live(&CacheKey::new("p", "new")));
}

#[tokio::test(start_paused = true)]
async fn test_async_compute_runs_once() {
    let mut cache = ResponseCache::default();
    let key = CacheKey::new("get_historical_data", "bitcoin:30");
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let series: Result<Vec<(i64, f64)>, String> = cache
            .get_or_compute_async(&key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![(1_700_000_000_000, 64000.0), (1_700_086_400_000, 65000.0)])
            })
            .await;
        assert_eq!(series.unwrap().len(), 2);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shared_cache_across_tasks() {
    let cache = SharedResponseCache::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = CacheKey::new("get_crypto_price", "BTC");

    let first: Result<Quote, String> = cache
        .get_or_compute(&key, || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(quote("BTC", 65000.12))
            }
        })
        .await;
    assert!(first.is_ok());

    let handle = {
        let cache = cache.clone();
        let calls = calls.clone();
        let key = key.clone();
        tokio::spawn(async move {
            cache
                .get_or_compute(&key, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(quote("BTC", 0.0))
                })
                .await
        })
    };

    let from_task = handle.await.expect("task completes").expect("cached value");
    assert_eq!(from_task.price, 65000.12);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_shared_cache_does_not_store_errors() {
    let cache = SharedResponseCache::default();
    let key = CacheKey::new("get_crypto_price", "ERR");

    let result: Result<Quote, String> = cache
        .get_or_compute(&key, || async { Err("API rate limit exceeded".to_string()) })
        .await;

    assert!(result.is_err());
    assert!(cache.is_empty().await);
}
