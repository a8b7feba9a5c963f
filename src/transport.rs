//! 전송 모듈 — 폼 인코딩 POST 실행과 커넥션 풀 관리
//!
//! - [`Transport`] — 와이어 요청 1건을 전송하고 응답 상태/본문을 돌려주는 트레이트
//! - [`HttpTransport`] — reqwest 기반 구현 *(feature `"client"` 활성화 시)*
//! - [`ConnectionPool`] — 호출 간 공유되는 동시 연결 상한 (초과 시 대기)
//! - [`ConnectionLease`] — 풀에서 빌린 연결, `Drop` 시 정확히 한 번 반환
//!
//! 버퍼 크기 경고([`warn_if_oversized`])는 진단용이며 호출을 막지 않습니다.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::warn;

use crate::error::TransportError;
use crate::types::WireRequest;
use crate::wire::BodySource;

/// 전송 계층이 돌려주는 응답
pub struct WireResponse {
    /// HTTP 상태 코드
    pub status: u16,
    /// 서버가 선언한 본문 길이 (`Content-Length`)
    pub declared_length: Option<u64>,
    /// 스트리밍 본문 (`None`이면 본문 스트림 자체가 없음)
    pub body: Option<Box<dyn BodySource>>,
}

impl WireResponse {
    /// 상태 코드와 본문으로 응답을 생성합니다.
    pub fn new(status: u16, declared_length: Option<u64>, body: impl BodySource + 'static) -> Self {
        Self {
            status,
            declared_length,
            body: Some(Box::new(body)),
        }
    }

    /// 본문 스트림이 없는 응답을 생성합니다.
    pub fn without_body(status: u16) -> Self {
        Self {
            status,
            declared_length: None,
            body: None,
        }
    }
}

impl fmt::Debug for WireResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireResponse")
            .field("status", &self.status)
            .field("declared_length", &self.declared_length)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// 와이어 요청 1건을 서버 URL로 전송합니다.
///
/// 구현체는 여러 태스크에서 동시에 호출될 수 있어야 합니다.
#[async_trait]
pub trait Transport: Send + Sync {
    /// 폼 인코딩 POST를 실행하고 응답 헤더가 도착하면 반환합니다.
    async fn send(&self, url: &str, request: &WireRequest)
    -> Result<WireResponse, TransportError>;
}

/// 버퍼 크기가 임계값을 넘으면 경고 로그를 남깁니다.
///
/// 경고 전용이며 호출을 막지 않습니다. 경고를 남겼으면 `true`를 반환합니다.
pub fn warn_if_oversized(what: &'static str, len: usize, threshold: usize) -> bool {
    if len > threshold {
        warn!(
            buffer = what,
            bytes = len,
            threshold,
            "Buffer exceeds soft size threshold"
        );
        return true;
    }
    false
}

/// 커넥션 풀 통계 스냅샷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// 최대 동시 연결 수
    pub capacity: usize,
    /// 현재 사용 중인 연결 수
    pub in_use: usize,
    /// 지금까지의 최대 동시 사용 수
    pub peak: usize,
    /// 누적 할당 횟수
    pub acquired: usize,
    /// 누적 반환 횟수
    pub released: usize,
}

#[derive(Debug, Default)]
struct PoolCounters {
    in_use: AtomicUsize,
    peak: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// 동시 연결 수를 제한하는 커넥션 풀
///
/// 상한을 넘는 호출은 거부되지 않고 빈 연결이 생길 때까지 대기합니다.
/// 복제본은 같은 풀을 공유합니다.
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    counters: Arc<PoolCounters>,
}

impl ConnectionPool {
    /// 최대 `capacity`개의 동시 연결을 허용하는 풀을 생성합니다 (최소 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            counters: Arc::new(PoolCounters::default()),
        }
    }

    /// 연결을 빌립니다. 빈 연결이 없으면 대기합니다.
    ///
    /// # 에러
    ///
    /// - [`TransportError::PoolClosed`] — [`close`](Self::close) 이후 호출된 경우
    pub async fn acquire(&self) -> Result<ConnectionLease, TransportError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| TransportError::PoolClosed)?;

        let in_use = self.counters.in_use.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(in_use, Ordering::SeqCst);
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);

        Ok(ConnectionLease {
            _permit: permit,
            counters: Arc::clone(&self.counters),
        })
    }

    /// 풀을 닫습니다. 대기 중이거나 이후의 `acquire`는 실패합니다.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// 최대 동시 연결 수
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 현재 통계를 반환합니다.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            in_use: self.counters.in_use.load(Ordering::SeqCst),
            peak: self.counters.peak.load(Ordering::SeqCst),
            acquired: self.counters.acquired.load(Ordering::SeqCst),
            released: self.counters.released.load(Ordering::SeqCst),
        }
    }
}

/// 풀에서 빌린 연결
///
/// 성공, 서버 에러, 전송 에러, 타임아웃(퓨처 drop) 등 모든 종료 경로에서
/// `Drop`을 통해 정확히 한 번 반환됩니다.
#[derive(Debug)]
pub struct ConnectionLease {
    _permit: OwnedSemaphorePermit,
    counters: Arc<PoolCounters>,
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        self.counters.in_use.fetch_sub(1, Ordering::SeqCst);
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(feature = "client")]
pub use http_client::HttpTransport;

#[cfg(feature = "client")]
mod http_client {
    use async_trait::async_trait;
    use reqwest::{Client, RequestBuilder};
    use reqwest::header::{CONTENT_TYPE, EXPECT};
    use tracing::trace;

    use super::{Transport, WireResponse, warn_if_oversized};
    use crate::client::ClientConfig;
    use crate::constants::FORM_CONTENT_TYPE;
    use crate::error::TransportError;
    use crate::types::WireRequest;

    /// reqwest 기반 HTTP 전송
    ///
    /// 내부 reqwest::Client는 호출 간 공유되며 호스트별 유휴 연결을 재사용합니다.
    /// 전체 타임아웃은 연결 + 송신 + 본문 수신을 모두 포함합니다.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        http: Client,
        expect_continue: bool,
        buffer_warn_threshold: usize,
    }

    impl HttpTransport {
        /// 설정으로부터 전송을 생성합니다.
        ///
        /// # 에러
        ///
        /// - [`TransportError::Http`] — TLS 백엔드 초기화 실패 등
        pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
            let http = Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(config.timeout)
                .connect_timeout(config.timeout)
                .pool_max_idle_per_host(config.max_connections)
                .build()?;

            Ok(Self {
                http,
                expect_continue: config.expect_continue,
                buffer_warn_threshold: config.buffer_warn_threshold,
            })
        }

        /// 폼 본문과 헤더를 채운 POST 요청을 준비합니다.
        pub(crate) fn prepare(&self, url: &str, body: String) -> RequestBuilder {
            let mut builder = self
                .http
                .post(url)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .header("Accept", "*/*");
            if self.expect_continue {
                // NOTE: header only. Whether the body waits for `100 Continue`
                // is decided by the HTTP engine.
                builder = builder.header(EXPECT, "100-continue");
            }
            builder.body(body)
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn send(
            &self,
            url: &str,
            request: &WireRequest,
        ) -> Result<WireResponse, TransportError> {
            let body = request.to_form_body();
            warn_if_oversized("request", body.len(), self.buffer_warn_threshold);
            trace!(url, bytes = body.len(), "Sending form request");

            let resp = self.prepare(url, body).send().await?;
            let status = resp.status().as_u16();
            let declared_length = resp.content_length();

            Ok(WireResponse::new(status, declared_length, resp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::MemoryBody;

    #[tokio::test]
    async fn test_pool_lease_released_on_drop() {
        let pool = ConnectionPool::new(2);
        {
            let _a = pool.acquire().await.unwrap();
            let _b = pool.acquire().await.unwrap();
            assert_eq!(pool.stats().in_use, 2);
        }
        let stats = pool.stats();
        assert_eq!(stats.in_use, 0);
        assert_eq!(stats.peak, 2);
        assert_eq!(stats.acquired, 2);
        assert_eq!(stats.released, 2);
    }

    #[tokio::test]
    async fn test_pool_blocks_beyond_capacity() {
        let pool = ConnectionPool::new(1);
        let lease = pool.acquire().await.unwrap();

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire().await.map(|_| ()) })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(lease);
        waiter.await.unwrap().unwrap();
        assert_eq!(pool.stats().peak, 1);
    }

    #[tokio::test]
    async fn test_pool_closed() {
        let pool = ConnectionPool::new(1);
        pool.close();
        let err = pool.acquire().await.unwrap_err();
        assert!(matches!(err, TransportError::PoolClosed));
    }

    #[test]
    fn test_pool_capacity_at_least_one() {
        assert_eq!(ConnectionPool::new(0).capacity(), 1);
    }

    #[test]
    fn test_warn_if_oversized() {
        assert!(!warn_if_oversized("request", 10, 10));
        assert!(warn_if_oversized("request", 11, 10));
    }

    #[test]
    fn test_wire_response_debug() {
        let resp = WireResponse::new(200, Some(3), MemoryBody::new(b"abc".to_vec()));
        let debug = format!("{resp:?}");
        assert!(debug.contains("status: 200"));
        assert!(debug.contains("has_body: true"));
        assert!(WireResponse::without_body(204).body.is_none());
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_http_transport_builds_from_default_config() {
        let transport = HttpTransport::new(&crate::client::ClientConfig::default());
        assert!(transport.is_ok());
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_http_request_headers_follow_expect_continue() {
        use crate::client::ClientConfig;
        use reqwest::header::{CONTENT_TYPE, EXPECT};

        let url = "http://localhost:9/report";
        let on = HttpTransport::new(&ClientConfig::default()).unwrap();
        let req = on.prepare(url, "format=PDF".to_string()).build().unwrap();
        assert_eq!(req.headers()[EXPECT], "100-continue");
        assert_eq!(
            req.headers()[CONTENT_TYPE],
            crate::constants::FORM_CONTENT_TYPE
        );

        let off = HttpTransport::new(&ClientConfig::default().with_expect_continue(false)).unwrap();
        let req = off.prepare(url, "format=PDF".to_string()).build().unwrap();
        assert!(req.headers().get(EXPECT).is_none());
    }
}
