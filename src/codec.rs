//! 프로토콜 코덱 모듈 — 페이로드 텍스트 인코딩 + 요청 빌더
//!
//! ## 페이로드 코덱
//!
//! - [`encode_payload`] — 바이너리 → 표준 base64 텍스트 (패딩 포함, 줄바꿈 없음)
//! - [`decode_payload`] — base64 텍스트 → 바이너리
//!
//! ## 요청 빌더
//!
//! [`build_request`]는 [`Operation`]을 작업별로 고정된 폼 필드 목록으로 변환합니다.
//!
//! | 작업 | 필드 (순서대로) |
//! |---|---|
//! | `BuildReport` | `template`, `datasource`, `format`, `printto`, `copies` |
//! | `PrintWithTemplate` | `template`, `datasource`, `printto`, `copies` |
//! | `PrintPrepared` | `preparedReport`, `printto`, `copies` |
//! | `ConvertPrepared` | `preparedReport`, `format`, `printto`, `copies` |
//! | `ConvertOffice` | `officeDocument`, `format` |

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::constants::fields;
use crate::error::{ReportError, Result};
use crate::types::{Operation, WireRequest};

/// 바이너리 페이로드를 base64 텍스트로 인코딩합니다.
///
/// ```
/// use repora::codec::encode_payload;
///
/// assert_eq!(encode_payload(b"report"), "cmVwb3J0");
/// assert_eq!(encode_payload(b""), "");
/// ```
pub fn encode_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// base64 텍스트를 바이너리 페이로드로 디코딩합니다.
///
/// # 에러
///
/// - [`ReportError::Decoding`] — 알파벳 외 문자, 잘못된 패딩 등
pub fn decode_payload(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text)?)
}

/// 인쇄 매수를 검증하고 10진수 문자열로 변환합니다.
fn render_copies(copies: i32) -> Result<String> {
    if copies < 0 {
        return Err(ReportError::Validation {
            field: fields::COPIES,
            reason: format!("must be non-negative, got {copies}"),
        });
    }
    Ok(copies.to_string())
}

/// 작업을 와이어 요청으로 변환합니다.
///
/// 모든 바이너리 필드는 [`encode_payload`]로 인코딩하고, `copies`는 10진수 문자열,
/// `format`은 대문자 토큰으로 렌더링합니다. I/O는 수행하지 않습니다.
///
/// # 에러
///
/// - [`ReportError::Validation`] — `copies`가 음수인 경우
///
/// # 예시
///
/// ```
/// use repora::codec::build_request;
/// use repora::{ExportFormat, Operation};
///
/// let op = Operation::ConvertOffice {
///     document: b"PK\x03\x04".to_vec(),
///     format: ExportFormat::Pdf,
/// };
/// let req = build_request(&op).unwrap();
/// assert_eq!(req.field_names(), vec!["officeDocument", "format"]);
/// assert_eq!(req.get("format"), Some("PDF"));
/// ```
pub fn build_request(op: &Operation) -> Result<WireRequest> {
    let mut req = WireRequest::new();

    match op {
        Operation::BuildReport {
            template,
            datasource,
            format,
            printer,
            copies,
        } => {
            let copies = render_copies(*copies)?;
            req.push(fields::TEMPLATE, encode_payload(template));
            req.push(fields::DATASOURCE, encode_payload(datasource));
            req.push(fields::FORMAT, format.token());
            req.push(fields::PRINT_TO, printer.as_str());
            req.push(fields::COPIES, copies);
        }
        Operation::PrintWithTemplate {
            template,
            datasource,
            printer,
            copies,
        } => {
            let copies = render_copies(*copies)?;
            req.push(fields::TEMPLATE, encode_payload(template));
            req.push(fields::DATASOURCE, encode_payload(datasource));
            req.push(fields::PRINT_TO, printer.as_str());
            req.push(fields::COPIES, copies);
        }
        Operation::PrintPrepared {
            prepared,
            printer,
            copies,
        } => {
            let copies = render_copies(*copies)?;
            req.push(fields::PREPARED_REPORT, encode_payload(prepared));
            req.push(fields::PRINT_TO, printer.as_str());
            req.push(fields::COPIES, copies);
        }
        Operation::ConvertPrepared {
            prepared,
            format,
            printer,
            copies,
        } => {
            let copies = render_copies(*copies)?;
            req.push(fields::PREPARED_REPORT, encode_payload(prepared));
            req.push(fields::FORMAT, format.token());
            req.push(fields::PRINT_TO, printer.as_str());
            req.push(fields::COPIES, copies);
        }
        Operation::ConvertOffice { document, format } => {
            req.push(fields::OFFICE_DOCUMENT, encode_payload(document));
            req.push(fields::FORMAT, format.token());
        }
    }

    Ok(req)
}
