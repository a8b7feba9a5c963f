//! # repora
//!
//! 리포트 렌더링 서버용 HTTP 클라이언트 라이브러리.
//!
//! 템플릿, 데이터소스, 준비된 리포트, 오피스 문서 같은 바이너리 페이로드를
//! base64 폼 필드로 인코딩하여 서버에 제출하고, 서버가 돌려준 결과물(렌더링된 문서 또는
//! 인쇄 확인 페이로드)을 그대로 반환합니다. 리포트 자체를 해석하거나 조립하지는 않습니다.
//!
//! ## 모듈 구조
//!
//! - [`constants`] — 폼 필드 이름, 기본 타임아웃, 버퍼 임계값
//! - [`error`] — 에러 타입 계층 구조 ([`ReportError`], [`TransportError`])
//! - [`types`] — 공유 타입 정의 ([`ExportFormat`], [`Operation`], [`WireRequest`])
//! - [`codec`] — 페이로드 코덱 + 요청 빌더 ([`build_request`](codec::build_request))
//! - [`wire`] — 응답 본문 수집 ([`read_body`](wire::read_body))
//! - [`transport`] — 전송 트레이트, 커넥션 풀, reqwest 구현 *(feature `"client"` 활성화 시)*
//! - [`diagnostics`] — 호출 관찰자 ([`CallObserver`], [`TracingObserver`])
//! - [`client`] — 작업 실행 ([`ReportClient`])
//!
//! ## 사용 예시
//!
//! ```rust
//! use repora::codec::build_request;
//! use repora::{ExportFormat, Operation};
//!
//! let format = ExportFormat::try_from(1).unwrap();
//! assert_eq!(format, ExportFormat::Pdf);
//!
//! let op = Operation::PrintPrepared {
//!     prepared: b"prepared".to_vec(),
//!     printer: "HP LaserJet".to_string(),
//!     copies: 2,
//! };
//! let req = build_request(&op).unwrap();
//! assert_eq!(req.field_names(), vec!["preparedReport", "printto", "copies"]);
//! assert_eq!(req.get("copies"), Some("2"));
//! ```

pub mod client;
pub mod codec;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod transport;
pub mod types;
pub mod wire;

// NOTE: Selective re-export — only expose commonly used types
pub use client::{ClientConfig, ReportClient};
pub use diagnostics::{CallInfo, CallObserver, CallPhase, CallReport, TracingObserver};
pub use error::{ReportError, Result, TransportError};
#[cfg(feature = "client")]
pub use transport::HttpTransport;
pub use transport::{ConnectionPool, PoolStats, Transport, WireResponse};
pub use types::{ExportFormat, Operation, WireRequest, is_print_confirmation};
