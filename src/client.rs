//! 리포트 클라이언트 모듈 — 작업 실행과 결과 분류
//!
//! [`ReportClient`]는 작업 1건을 다음 단계로 처리합니다. 재시도는 하지 않습니다.
//!
//! 1. `Building` — [`build_request`]로 와이어 요청 생성 (잘못된 인자는 [`ReportError::Validation`])
//! 2. `Sending` — 커넥션 풀에서 연결 할당 후 [`Transport::send`] (실패는 [`ReportError::Transport`])
//! 3. `AwaitingResponse` — 상태 코드 200이 아니면 본문 전체를 읽어 [`ReportError::Server`]
//! 4. `Reading` — [`read_body`]로 결과 바이트 수집
//! 5. `Done` — 결과 반환
//!
//! 전송과 본문 수신은 [`ClientConfig::timeout`] 하나로 제한되며,
//! 어떤 경로로 종료되든 연결은 정확히 한 번 풀에 반환됩니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::codec::build_request;
use crate::constants::{
    BUFFER_WARN_THRESHOLD, DEFAULT_MAX_CONNECTIONS, DEFAULT_TIMEOUT, USER_AGENT,
};
use crate::diagnostics::{CallInfo, CallObserver, CallPhase, CallReport, TracingObserver};
use crate::error::{ReportError, Result, TransportError};
use crate::transport::{ConnectionPool, PoolStats, Transport, WireResponse, warn_if_oversized};
use crate::types::{ExportFormat, Operation, WireRequest};
use crate::wire::{read_body, read_body_text};

/// 클라이언트 설정
///
/// ```
/// use std::time::Duration;
/// use repora::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_max_connections(4);
/// assert_eq!(config.timeout, Duration::from_secs(60));
/// assert!(config.expect_continue);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 호출 1회의 전체 타임아웃 (전송 + 본문 수신)
    pub timeout: Duration,
    /// 최대 동시 연결 수 (초과 호출은 대기)
    pub max_connections: usize,
    /// 요청/응답 버퍼 경고 임계값 (바이트, 경고 전용)
    pub buffer_warn_threshold: usize,
    /// `Expect: 100-continue` 핸드셰이크 사용 여부
    pub expect_continue: bool,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            buffer_warn_threshold: BUFFER_WARN_THRESHOLD,
            expect_continue: true,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// 전체 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 최대 동시 연결 수를 설정합니다.
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// 버퍼 경고 임계값을 설정합니다.
    pub fn with_buffer_warn_threshold(mut self, bytes: usize) -> Self {
        self.buffer_warn_threshold = bytes;
        self
    }

    /// `Expect: 100-continue` 사용 여부를 설정합니다.
    pub fn with_expect_continue(mut self, enabled: bool) -> Self {
        self.expect_continue = enabled;
        self
    }

    /// User-Agent를 설정합니다.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// 리포트 서버 클라이언트
///
/// 인스턴스는 오래 유지되며 커넥션 풀을 소유합니다. `&self`로 여러 태스크에서
/// 동시에 호출할 수 있고, 호출마다 요청/응답 객체를 독점합니다.
///
/// # 예시
///
/// ```no_run
/// use repora::{ExportFormat, ReportClient};
///
/// # async fn example() -> repora::Result<()> {
/// let client = ReportClient::new("http://192.168.1.10/ReportServer")?;
/// let pdf = client
///     .build_report(b"<template/>".to_vec(), b"<data/>".to_vec(), ExportFormat::Pdf, "", 1)
///     .await?;
/// println!("{} bytes", pdf.len());
/// # Ok(())
/// # }
/// ```
pub struct ReportClient {
    server_url: String,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    pool: ConnectionPool,
    observer: Arc<dyn CallObserver>,
}

impl std::fmt::Debug for ReportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportClient")
            .field("server_url", &self.server_url)
            .field("config", &self.config)
            .field("pool", &self.pool.stats())
            .finish_non_exhaustive()
    }
}

impl ReportClient {
    /// 기본 설정과 reqwest 전송으로 클라이언트를 생성합니다.
    ///
    /// # 에러
    ///
    /// - [`ReportError::Transport`] — HTTP 클라이언트 초기화 실패
    #[cfg(feature = "client")]
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_config(server_url, ClientConfig::default())
    }

    /// 지정한 설정과 reqwest 전송으로 클라이언트를 생성합니다.
    #[cfg(feature = "client")]
    pub fn with_config(server_url: &str, config: ClientConfig) -> Result<Self> {
        let transport = crate::transport::HttpTransport::new(&config)?;
        Ok(Self::with_transport(server_url, config, transport))
    }

    /// 임의의 [`Transport`] 구현으로 클라이언트를 생성합니다.
    pub fn with_transport(
        server_url: &str,
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Self {
        let pool = ConnectionPool::new(config.max_connections);
        Self {
            server_url: server_url.to_string(),
            config,
            transport: Arc::new(transport),
            pool,
            observer: Arc::new(TracingObserver),
        }
    }

    /// 호출 관찰자를 교체합니다 (기본: [`TracingObserver`]).
    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// 기본 서버 URL을 반환합니다.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// 클라이언트 설정을 반환합니다.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 커넥션 풀 통계를 반환합니다.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// 커넥션 풀을 닫습니다.
    ///
    /// 진행 중인 호출은 그대로 끝나고, 연결을 기다리던 호출과 이후의 호출은
    /// [`TransportError::PoolClosed`]로 실패합니다.
    pub fn close(&self) {
        self.pool.close();
    }

    /// 템플릿과 데이터소스로 리포트를 생성하여 `format` 형식으로 반환합니다.
    ///
    /// `printer`가 비어 있지 않으면 서버가 `copies`매 인쇄도 수행합니다.
    pub async fn build_report(
        &self,
        template: impl Into<Vec<u8>>,
        datasource: impl Into<Vec<u8>>,
        format: ExportFormat,
        printer: impl Into<String>,
        copies: i32,
    ) -> Result<Vec<u8>> {
        self.execute(&Operation::BuildReport {
            template: template.into(),
            datasource: datasource.into(),
            format,
            printer: printer.into(),
            copies,
        })
        .await
    }

    /// 템플릿과 데이터소스로 리포트를 생성하여 인쇄합니다.
    ///
    /// 성공하면 서버의 확인 페이로드(관례상 `"true"`)를 반환합니다.
    pub async fn print_report(
        &self,
        template: impl Into<Vec<u8>>,
        datasource: impl Into<Vec<u8>>,
        printer: impl Into<String>,
        copies: i32,
    ) -> Result<Vec<u8>> {
        self.execute(&Operation::PrintWithTemplate {
            template: template.into(),
            datasource: datasource.into(),
            printer: printer.into(),
            copies,
        })
        .await
    }

    /// 준비된 리포트를 인쇄합니다.
    pub async fn print_prepared_report(
        &self,
        prepared: impl Into<Vec<u8>>,
        printer: impl Into<String>,
        copies: i32,
    ) -> Result<Vec<u8>> {
        self.execute(&Operation::PrintPrepared {
            prepared: prepared.into(),
            printer: printer.into(),
            copies,
        })
        .await
    }

    /// 준비된 리포트를 `format` 형식으로 변환합니다 (프린터가 있으면 인쇄도 수행).
    pub async fn convert_report(
        &self,
        prepared: impl Into<Vec<u8>>,
        format: ExportFormat,
        printer: impl Into<String>,
        copies: i32,
    ) -> Result<Vec<u8>> {
        self.execute(&Operation::ConvertPrepared {
            prepared: prepared.into(),
            format,
            printer: printer.into(),
            copies,
        })
        .await
    }

    /// 오피스 문서를 `format` 형식으로 변환합니다.
    pub async fn convert_office_document(
        &self,
        document: impl Into<Vec<u8>>,
        format: ExportFormat,
    ) -> Result<Vec<u8>> {
        self.execute(&Operation::ConvertOffice {
            document: document.into(),
            format,
        })
        .await
    }

    /// 기본 서버 URL로 작업을 실행합니다.
    pub async fn execute(&self, op: &Operation) -> Result<Vec<u8>> {
        self.execute_at(&self.server_url, op).await
    }

    /// 지정한 서버 URL로 작업을 실행합니다.
    ///
    /// # 에러
    ///
    /// - [`ReportError::Validation`] — 잘못된 작업 인자
    /// - [`ReportError::Transport`] — 연결 실패, 타임아웃
    /// - [`ReportError::Server`] — 200 이외의 상태 코드
    /// - [`ReportError::PayloadTooLarge`] — 선언된 응답 길이 초과
    /// - [`ReportError::NoBody`] — 성공 응답에 본문 스트림이 없음
    pub async fn execute_at(&self, url: &str, op: &Operation) -> Result<Vec<u8>> {
        let call = CallInfo { url, operation: op };
        self.observer.call_started(&call);

        let started = Instant::now();
        let mut phase = CallPhase::Building;
        let result = self.run(url, op, &mut phase).await;

        let report = CallReport {
            phase: if result.is_ok() { CallPhase::Done } else { phase },
            elapsed: started.elapsed(),
            outcome: result.as_deref(),
        };
        self.observer.call_finished(&call, &report);

        result
    }

    async fn run(&self, url: &str, op: &Operation, phase: &mut CallPhase) -> Result<Vec<u8>> {
        let request = build_request(op)?;

        *phase = CallPhase::Sending;
        let _lease = self.pool.acquire().await?;

        let timeout = self.config.timeout;
        match tokio::time::timeout(timeout, self.exchange(url, &request, phase)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(timeout).into()),
        }
    }

    async fn exchange(
        &self,
        url: &str,
        request: &WireRequest,
        phase: &mut CallPhase,
    ) -> Result<Vec<u8>> {
        let WireResponse {
            status,
            declared_length,
            body,
        } = self.transport.send(url, request).await?;

        *phase = CallPhase::AwaitingResponse;
        if status != 200 {
            // NOTE: read eagerly so the server's diagnostic message is complete.
            // The declared length is not trusted here; the status must survive.
            let body = match body {
                Some(mut body) => read_body_text(body.as_mut(), None).await?,
                None => String::new(),
            };
            return Err(ReportError::Server { status, body });
        }
        let mut body = body.ok_or(ReportError::NoBody)?;

        *phase = CallPhase::Reading;
        let bytes = read_body(body.as_mut(), declared_length).await?;
        warn_if_oversized("response", bytes.len(), self.config.buffer_warn_threshold);

        Ok(bytes)
    }
}
