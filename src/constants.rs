//! 리포트 서버 프로토콜에서 사용하는 폼 필드 이름, 기본값, 임계값 상수를 정의합니다.

use std::time::Duration;

/// HTTP 클라이언트 User-Agent 문자열
pub const USER_AGENT: &str = concat!("repora/", env!("CARGO_PKG_VERSION"));

/// 요청 본문의 Content-Type
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 호출 1회의 전체 타임아웃 기본값 (15분, 리포트 생성 지연 시간 기준)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// 커넥션 풀의 기본 최대 동시 연결 수
pub const DEFAULT_MAX_CONNECTIONS: usize = 20;

/// 경고 없이 허용되는 단일 요청/응답 버퍼 크기 (1 MiB, 경고 전용)
pub const BUFFER_WARN_THRESHOLD: usize = 1024 * 1024;

/// 선언된 길이가 없을 때 응답 버퍼의 초기 용량 (4 KiB)
pub const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// 단일 버퍼로 표현 가능한 최대 바이트 수
pub const MAX_BUFFER_LENGTH: u64 = isize::MAX as u64;

/// 파라미터 로그에 datasource 원문을 출력하는 최대 크기
pub const DATASOURCE_PREVIEW_LIMIT: usize = 20_000;

/// 인쇄 성공 시 서버가 반환하는 확인 페이로드
pub const PRINT_CONFIRMATION: &[u8] = b"true";

/// 폼 필드 이름 상수
///
/// 필드 이름은 서버 프로토콜의 일부이므로 절대 변경하지 않습니다.
pub mod fields {
    /// 리포트 템플릿 (base64)
    pub const TEMPLATE: &str = "template";
    /// 데이터소스 (base64)
    pub const DATASOURCE: &str = "datasource";
    /// 내보내기 형식 토큰
    pub const FORMAT: &str = "format";
    /// 프린터 이름 (빈 문자열이면 인쇄 없이 렌더링만)
    pub const PRINT_TO: &str = "printto";
    /// 인쇄 매수 (10진수 문자열)
    pub const COPIES: &str = "copies";
    /// 준비된 리포트 (base64)
    pub const PREPARED_REPORT: &str = "preparedReport";
    /// 오피스 문서 (base64)
    pub const OFFICE_DOCUMENT: &str = "officeDocument";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_fifteen_minutes() {
        assert_eq!(DEFAULT_TIMEOUT.as_secs(), 900);
    }

    #[test]
    fn test_buffer_warn_threshold() {
        assert_eq!(BUFFER_WARN_THRESHOLD, 1_048_576);
    }

    #[test]
    fn test_initial_buffer_capacity() {
        assert_eq!(INITIAL_BUFFER_CAPACITY, 4096);
    }

    #[test]
    fn test_max_buffer_length_matches_platform() {
        assert_eq!(MAX_BUFFER_LENGTH, isize::MAX as u64);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(fields::TEMPLATE, "template");
        assert_eq!(fields::DATASOURCE, "datasource");
        assert_eq!(fields::FORMAT, "format");
        assert_eq!(fields::PRINT_TO, "printto");
        assert_eq!(fields::COPIES, "copies");
        assert_eq!(fields::PREPARED_REPORT, "preparedReport");
        assert_eq!(fields::OFFICE_DOCUMENT, "officeDocument");
    }

    #[test]
    fn test_user_agent_has_crate_name() {
        assert!(USER_AGENT.starts_with("repora/"));
    }
}
