//! 리포트 클라이언트의 에러 타입 계층 구조를 정의합니다.
//!
//! 호출자에게 노출되는 모든 에러는 [`ReportError`] enum으로 표현되며,
//! 네트워크 계층의 실패는 [`TransportError`]로 감싸서 전달됩니다.
//! 두 타입 모두 [`thiserror`]를 통해 `Display` 및 `Error` 트레이트가 자동 구현됩니다.

use std::time::Duration;

/// 네트워크 전송 계층 에러
///
/// 연결 실패, HTTP 의미 이하의 프로토콜 위반, 타임아웃을 포괄합니다.
/// HTTP 엔진 에러 변형은 feature `"client"` 활성화 시에만 포함됩니다.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// 호출 전체 타임아웃 초과
    #[error("call timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// HTTP 클라이언트 에러 (reqwest 래핑)
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 표준 I/O 에러 래핑
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 커넥션 풀이 닫혀 연결을 할당받을 수 없음
    #[error("connection pool is closed")]
    PoolClosed,
}

impl TransportError {
    /// 타임아웃으로 분류되는 에러인지 확인합니다.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Timeout(_) => true,
            #[cfg(feature = "client")]
            TransportError::Http(e) => e.is_timeout(),
            TransportError::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            TransportError::PoolClosed => false,
        }
    }
}

/// 리포트 클라이언트의 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// 알 수 없는 내보내기 형식 코드 또는 토큰
    #[error("invalid export format: {value}")]
    InvalidFormat { value: String },

    /// 잘못된 작업 인자 (네트워크 통신 전에 감지)
    #[error("invalid argument `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },

    /// 전송 계층 실패 (연결, 프로토콜, 타임아웃)
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// 리포트 서버가 200 이외의 상태 코드를 반환
    #[error("report server returned status {status}: '{body}'")]
    Server { status: u16, body: String },

    /// 선언된 응답 길이가 단일 버퍼 한도를 초과
    #[error("content too large to be buffered: {length} bytes exceeds maximum {max}")]
    PayloadTooLarge { length: u64, max: u64 },

    /// base64 텍스트 디코딩 실패
    #[error("invalid base64 payload: {0}")]
    Decoding(#[from] base64::DecodeError),

    /// 응답 본문 스트림 자체가 없음
    #[error("response has no body")]
    NoBody,
}

impl ReportError {
    /// 전송 계층 에러(타임아웃 포함)인지 확인합니다.
    pub fn is_transport(&self) -> bool {
        matches!(self, ReportError::Transport(_))
    }

    /// 타임아웃으로 실패했는지 확인합니다.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReportError::Transport(e) if e.is_timeout())
    }

    /// 서버 에러의 HTTP 상태 코드를 반환합니다.
    pub fn status(&self) -> Option<u16> {
        match self {
            ReportError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for ReportError {
    fn from(e: reqwest::Error) -> Self {
        ReportError::Transport(TransportError::Http(e))
    }
}

/// [`ReportError`]를 사용하는 편의 Result 타입 별칭
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = TransportError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "call timed out after 1500 ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: ReportError = TransportError::from(io_err).into();
        assert!(err.is_transport());
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_io_timed_out_is_timeout() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(TransportError::Io(io_err).is_timeout());
    }

    #[test]
    fn test_pool_closed_display() {
        let err = TransportError::PoolClosed;
        assert_eq!(err.to_string(), "connection pool is closed");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_invalid_format_display() {
        let err = ReportError::InvalidFormat {
            value: "12".to_string(),
        };
        assert_eq!(err.to_string(), "invalid export format: 12");
    }

    #[test]
    fn test_validation_display() {
        let err = ReportError::Validation {
            field: "copies",
            reason: "must be non-negative, got -1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid argument `copies`: must be non-negative, got -1"
        );
    }

    #[test]
    fn test_server_error_display_and_status() {
        let err = ReportError::Server {
            status: 500,
            body: "template invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "report server returned status 500: 'template invalid'"
        );
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_payload_too_large_display() {
        let err = ReportError::PayloadTooLarge {
            length: 10,
            max: 5,
        };
        assert_eq!(
            err.to_string(),
            "content too large to be buffered: 10 bytes exceeds maximum 5"
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_timeout_classification_through_report_error() {
        let err = ReportError::from(TransportError::Timeout(Duration::from_secs(1)));
        assert!(err.is_transport());
        assert!(err.is_timeout());
    }

    #[test]
    fn test_no_body_display() {
        assert_eq!(ReportError::NoBody.to_string(), "response has no body");
    }
}
