//! 호출 진단 모듈 — 클라이언트에 주입되는 관찰자
//!
//! [`ReportClient`](crate::client::ReportClient)는 호출 시작/종료를 [`CallObserver`]에 알립니다.
//! 기본 구현 [`TracingObserver`]는 `tracing` 이벤트로 파라미터, 소요 시간(ms), 결과를 기록합니다.
//! 관찰자는 정확성에 영향을 주지 않습니다.

use std::time::Duration;

use tracing::{debug, error, trace};

use crate::error::ReportError;
use crate::types::Operation;

/// 호출이 종료된 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallPhase {
    /// 와이어 요청 생성
    Building,
    /// 연결 할당 및 요청 전송
    Sending,
    /// 상태 코드 확인
    AwaitingResponse,
    /// 응답 본문 수신
    Reading,
    /// 성공 종료
    Done,
}

impl CallPhase {
    /// 로그용 이름
    pub fn as_str(self) -> &'static str {
        match self {
            CallPhase::Building => "building",
            CallPhase::Sending => "sending",
            CallPhase::AwaitingResponse => "awaiting_response",
            CallPhase::Reading => "reading",
            CallPhase::Done => "done",
        }
    }
}

/// 호출 1건의 식별 정보
#[derive(Debug, Clone, Copy)]
pub struct CallInfo<'a> {
    /// 서버 URL
    pub url: &'a str,
    /// 실행할 작업
    pub operation: &'a Operation,
}

/// 호출 1건의 종료 보고
#[derive(Debug)]
pub struct CallReport<'a> {
    /// 종료 상태 (성공이면 [`CallPhase::Done`], 실패면 실패가 발생한 상태)
    pub phase: CallPhase,
    /// 호출 시작부터 종료까지 걸린 시간
    pub elapsed: Duration,
    /// 성공 시 결과 바이트, 실패 시 에러
    pub outcome: std::result::Result<&'a [u8], &'a ReportError>,
}

impl CallReport<'_> {
    /// 소요 시간 (밀리초)
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    /// 성공 여부
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// 호출 시작/종료 이벤트를 받는 관찰자
pub trait CallObserver: Send + Sync {
    /// 요청 생성 전에 호출됩니다.
    fn call_started(&self, call: &CallInfo<'_>);

    /// 호출 future가 완료되면 (성공, 실패, 타임아웃) 정확히 한 번 호출됩니다.
    ///
    /// 완료 전에 future가 drop되어 취소된 호출은 보고되지 않습니다.
    fn call_finished(&self, call: &CallInfo<'_>, report: &CallReport<'_>);
}

/// `tracing` 이벤트로 호출을 기록하는 기본 관찰자
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn call_started(&self, call: &CallInfo<'_>) {
        let op = call.operation;
        debug!(
            operation = op.name(),
            url = call.url,
            payload_bytes = op.payload_len(),
            format = op.format().map(|f| f.token()),
            printer = op.printer(),
            copies = op.copies(),
            "Calling report server"
        );
        if let Some(preview) = op.datasource_preview() {
            trace!(operation = op.name(), datasource = %preview, "Datasource parameter");
        }
    }

    fn call_finished(&self, call: &CallInfo<'_>, report: &CallReport<'_>) {
        let op = call.operation;
        match report.outcome {
            Ok(bytes) => {
                debug!(
                    operation = op.name(),
                    elapsed_ms = report.elapsed_ms(),
                    bytes = bytes.len(),
                    "Report server call succeeded"
                );
                // NOTE: binary artifacts (PDF, images, office formats) are not logged
                if op.is_print() || op.format().is_some_and(|f| f.is_textual()) {
                    trace!(
                        operation = op.name(),
                        result = %String::from_utf8_lossy(bytes),
                        "Report server result"
                    );
                }
            }
            Err(ReportError::Server { status, body }) => {
                error!(
                    operation = op.name(),
                    elapsed_ms = report.elapsed_ms(),
                    status,
                    body = %body,
                    "Report server returned an error"
                );
            }
            Err(e) => {
                error!(
                    operation = op.name(),
                    phase = report.phase.as_str(),
                    elapsed_ms = report.elapsed_ms(),
                    error = %e,
                    "Report server call failed"
                );
            }
        }
    }
}
