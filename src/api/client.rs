use crate::config::Config;
use crate::error::AppError;
use crate::rate_limit::RateLimitStore;
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use super::http::{HttpResponse, HttpTransport, Sleeper, ThreadSleeper, UreqTransport};

pub const TOKEN_HEADER: &str = "X-Riot-Token";
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// What to do when the upstream answers 429.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` keeps retrying for as long as 429s keep coming. Each attempt
    /// waits for its own Retry-After, so a permanently throttled key blocks
    /// the caller indefinitely.
    pub max_retries: Option<u32>,
    /// Wait used when a 429 carries no usable Retry-After.
    pub default_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: None,
            default_retry_after: Duration::from_secs(10),
        }
    }
}

/// Authenticated GET client that honours the upstream rate limits.
pub struct RiotHttpClient {
    api_key: Option<String>,
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    buckets: RateLimitStore,
    pacer: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    retry: RetryPolicy,
}

impl RiotHttpClient {
    pub fn new(config: &Config) -> Self {
        let retry = RetryPolicy {
            max_retries: config.max_retries,
            ..RetryPolicy::default()
        };
        Self::with_parts(
            config.api_key.clone(),
            config.requests_per_second,
            retry,
            Arc::new(UreqTransport::new(config.timeout)),
            Arc::new(ThreadSleeper),
        )
    }

    pub fn with_parts(
        api_key: Option<String>,
        requests_per_second: u32,
        retry: RetryPolicy,
        transport: Arc<dyn HttpTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        RiotHttpClient {
            api_key,
            transport,
            sleeper,
            buckets: RateLimitStore::new(),
            pacer: RateLimiter::direct(Quota::per_second(per_second)),
            retry,
        }
    }

    pub fn buckets(&self) -> &RateLimitStore {
        &self.buckets
    }

    /// GETs `url` with the credential and decodes the JSON body. `endpoint`
    /// names the rate-limit bucket the call counts against.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str, endpoint: &str) -> Result<T, AppError> {
        let result = self
            .execute_request(url, endpoint)
            .and_then(|resp| serde_json::from_str(&resp.body).map_err(AppError::from));

        if let Err(e) = &result {
            error!("Error fetching {}: {}", endpoint, e);
        }
        result
    }

    /// GETs an unauthenticated static asset. No credential, no buckets.
    pub fn get_static_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        debug!("GET {}", url);
        let resp = self
            .transport
            .get(url, &[])
            .map_err(|e| AppError::NoResponse(e.to_string()))?;

        if !resp.is_success() {
            return Err(status_error(&resp));
        }
        Ok(serde_json::from_str(&resp.body)?)
    }

    /// Issues the request and reports only whether it succeeded.
    pub fn probe(&self, url: &str) -> Result<bool, AppError> {
        let api_key = self.api_key.as_deref().ok_or(AppError::MissingCredential)?;
        let resp = self
            .transport
            .get(url, &[(TOKEN_HEADER, api_key)])
            .map_err(|e| AppError::NoResponse(e.to_string()))?;
        Ok(resp.is_success())
    }

    fn execute_request(&self, url: &str, endpoint: &str) -> Result<HttpResponse, AppError> {
        let api_key = self.api_key.as_deref().ok_or(AppError::MissingCredential)?;
        let mut retries = 0u32;
        let mut after_retry_wait = false;

        loop {
            // a 429 leaves the bucket over its limit; Retry-After already covers that wait
            if !after_retry_wait {
                self.wait_for_bucket(endpoint);
            }
            after_retry_wait = false;
            self.pace();

            debug!("GET {} [{}]", url, endpoint);
            let resp = self
                .transport
                .get(url, &[(TOKEN_HEADER, api_key)])
                .map_err(|e| AppError::NoResponse(e.to_string()))?;

            self.buckets
                .record_headers(endpoint, |name| resp.header(name), Instant::now());

            if resp.is_success() {
                return Ok(resp);
            }

            if resp.status != 429 {
                return Err(status_error(&resp));
            }

            if let Some(max) = self.retry.max_retries {
                if retries >= max {
                    return Err(AppError::RateLimited {
                        attempts: retries + 1,
                    });
                }
            }

            let wait = resp
                .header(RETRY_AFTER_HEADER)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(self.retry.default_retry_after);
            warn!(
                "Rate limit exceeded on {}. Waiting {}ms before retrying...",
                endpoint,
                wait.as_millis()
            );
            self.sleeper.sleep(wait);
            retries += 1;
            after_retry_wait = true;
        }
    }

    fn wait_for_bucket(&self, endpoint: &str) {
        if let Some(wait) = self.buckets.wait_time(endpoint, Instant::now()) {
            warn!(
                "Rate limit reached for {}. Waiting {}ms...",
                endpoint,
                wait.as_millis()
            );
            self.sleeper.sleep(wait);
        }
    }

    fn pace(&self) {
        let clock = DefaultClock::default();
        while let Err(not_until) = self.pacer.check() {
            self.sleeper.sleep(not_until.wait_time_from(clock.now()));
        }
    }
}

fn status_error(resp: &HttpResponse) -> AppError {
    let message = if resp.body.is_empty() {
        format!("HTTP status {}", resp.status)
    } else {
        resp.body.chars().take(200).collect()
    };
    AppError::from_status(resp.status, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::testing::{RecordingSleeper, ScriptedTransport};
    use serde_json::Value;

    const URL: &str = "https://euw1.api.riotgames.com/lol/summoner/v4/summoners/by-puuid/abc";

    fn client(
        transport: ScriptedTransport,
        retry: RetryPolicy,
    ) -> (RiotHttpClient, Arc<ScriptedTransport>, Arc<RecordingSleeper>) {
        let transport = Arc::new(transport);
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = RiotHttpClient::with_parts(
            Some("RGAPI-test".to_string()),
            20,
            retry,
            transport.clone(),
            sleeper.clone(),
        );
        (client, transport, sleeper)
    }

    #[test]
    fn test_success_sends_token_header() {
        let (client, transport, sleeper) =
            client(ScriptedTransport::new().respond(200, r#"{"ok":true}"#), RetryPolicy::default());

        let value: Value = client.get_json(URL, "summoner-by-puuid").unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(transport.request_header(0, TOKEN_HEADER).as_deref(), Some("RGAPI-test"));
        assert!(!transport.urls()[0].contains("RGAPI"));
        assert!(sleeper.sleeps().is_empty());
    }

    #[test]
    fn test_missing_credential_makes_no_request() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, "{}"));
        let client = RiotHttpClient::with_parts(
            None,
            20,
            RetryPolicy::default(),
            transport.clone(),
            Arc::new(RecordingSleeper::default()),
        );

        let err = client.get_json::<Value>(URL, "summoner-by-puuid").unwrap_err();
        assert!(matches!(err, AppError::MissingCredential));
        assert!(transport.urls().is_empty());
    }

    #[test]
    fn test_429_waits_retry_after_then_retries_same_request() {
        let transport = ScriptedTransport::new()
            .respond_with_headers(429, &[("Retry-After", "2")], "")
            .respond(200, r#"{"name":"Faker"}"#);
        let (client, transport, sleeper) = client(transport, RetryPolicy::default());

        let value: Value = client.get_json(URL, "summoner-by-puuid").unwrap();

        assert_eq!(value["name"], "Faker");
        let sleeps = sleeper.sleeps();
        assert_eq!(sleeps.len(), 1);
        assert!(sleeps[0] >= Duration::from_secs(2));
        assert_eq!(transport.urls(), vec![URL.to_string(), URL.to_string()]);
    }

    #[test]
    fn test_429_over_bucket_limit_waits_only_retry_after() {
        let transport = ScriptedTransport::new()
            .respond_with_headers(
                429,
                &[
                    ("Retry-After", "2"),
                    ("X-App-Rate-Limit", "20:1"),
                    ("X-App-Rate-Limit-Count", "21:1"),
                ],
                "",
            )
            .respond(200, "{}");
        let (client, transport, sleeper) = client(transport, RetryPolicy::default());

        let _: Value = client.get_json(URL, "match-ids").unwrap();

        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(2)]);
        assert_eq!(transport.urls().len(), 2);
    }

    #[test]
    fn test_429_without_hint_waits_default() {
        let transport = ScriptedTransport::new()
            .respond(429, "")
            .respond(200, "[]");
        let (client, _, sleeper) = client(transport, RetryPolicy::default());

        let _: Value = client.get_json(URL, "match-ids").unwrap();
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(10)]);
    }

    #[test]
    fn test_repeated_429_keeps_retrying_when_unbounded() {
        let transport = ScriptedTransport::new()
            .respond_with_headers(429, &[("Retry-After", "1")], "")
            .respond_with_headers(429, &[("Retry-After", "3")], "")
            .respond_with_headers(429, &[("Retry-After", "1")], "")
            .respond(200, "{}");
        let (client, transport, sleeper) = client(transport, RetryPolicy::default());

        let _: Value = client.get_json(URL, "match-by-id").unwrap();
        assert_eq!(
            sleeper.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(3), Duration::from_secs(1)]
        );
        assert_eq!(transport.urls().len(), 4);
    }

    #[test]
    fn test_bounded_retries_give_up() {
        let transport = ScriptedTransport::new()
            .respond(429, "")
            .respond(429, "")
            .respond(429, "");
        let retry = RetryPolicy {
            max_retries: Some(2),
            default_retry_after: Duration::from_millis(5),
        };
        let (client, transport, _) = client(transport, retry);

        let err = client.get_json::<Value>(URL, "match-by-id").unwrap_err();
        assert!(matches!(err, AppError::RateLimited { attempts: 3 }));
        assert_eq!(transport.urls().len(), 3);
    }

    #[test]
    fn test_status_errors() {
        let cases: [(u16, fn(&AppError) -> bool); 5] = [
            (401, |e| matches!(e, AppError::Unauthorized)),
            (403, |e| matches!(e, AppError::Forbidden)),
            (404, |e| matches!(e, AppError::NotFound)),
            (502, |e| matches!(e, AppError::UpstreamUnavailable { status: 502 })),
            (400, |e| matches!(e, AppError::UpstreamError { status: 400, .. })),
        ];

        for (status, check) in cases {
            let (client, _, _) = client(
                ScriptedTransport::new().respond(status, r#"{"status":{"message":"nope"}}"#),
                RetryPolicy::default(),
            );
            let err = client.get_json::<Value>(URL, "league-entries").unwrap_err();
            assert!(check(&err), "status {} gave {:?}", status, err);
        }
    }

    #[test]
    fn test_transport_failure_is_no_response() {
        let (client, _, _) = client(ScriptedTransport::new().fail("connection reset"), RetryPolicy::default());
        let err = client.get_json::<Value>(URL, "league-entries").unwrap_err();
        assert!(matches!(err, AppError::NoResponse(msg) if msg.contains("connection reset")));
    }

    #[test]
    fn test_bad_json_is_json_error() {
        let (client, _, _) = client(ScriptedTransport::new().respond(200, "<html>"), RetryPolicy::default());
        let err = client.get_json::<Value>(URL, "league-entries").unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }

    #[test]
    fn test_exhausted_bucket_delays_next_call() {
        let transport = ScriptedTransport::new()
            .respond_with_headers(
                200,
                &[("X-App-Rate-Limit", "2:1,100:120"), ("X-App-Rate-Limit-Count", "2:1,2:120")],
                "{}",
            )
            .respond(200, "{}");
        let (client, _, sleeper) = client(transport, RetryPolicy::default());

        let _: Value = client.get_json(URL, "match-ids").unwrap();
        assert!(client.buckets().get("match-ids").unwrap().is_exhausted());
        assert!(sleeper.sleeps().is_empty());

        let _: Value = client.get_json(URL, "match-ids").unwrap();
        let sleeps = sleeper.sleeps();
        assert_eq!(sleeps.len(), 1);
        assert!(sleeps[0] > Duration::ZERO && sleeps[0] <= Duration::from_secs(1));
    }

    #[test]
    fn test_static_json_skips_credential() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, r#"["15.6.1"]"#));
        let client = RiotHttpClient::with_parts(
            None,
            20,
            RetryPolicy::default(),
            transport.clone(),
            Arc::new(RecordingSleeper::default()),
        );

        let versions: Vec<String> = client
            .get_static_json("https://ddragon.leagueoflegends.com/api/versions.json")
            .unwrap();
        assert_eq!(versions, vec!["15.6.1"]);
        assert_eq!(transport.request_header(0, TOKEN_HEADER), None);
    }
}
