//! 리포트 서버 프로토콜에서 사용하는 공유 타입 정의입니다.
//!
//! [`ExportFormat`], [`Operation`], [`WireRequest`] 등 코덱, 전송, 클라이언트 모듈 전반에서
//! 공유되는 타입을 정의합니다.

use std::fmt;
use std::str::FromStr;

use crate::constants::{DATASOURCE_PREVIEW_LIMIT, PRINT_CONFIRMATION};
use crate::error::ReportError;

/// 리포트 내보내기 형식
///
/// 각 형식은 고정된 정수 코드(0–11)와 와이어에서 사용하는 대문자 토큰을 가집니다.
/// 코드와 토큰의 대응은 서버 호환성을 위해 절대 변경하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExportFormat {
    /// 서버 고유 준비 리포트 (코드 0)
    Fp3 = 0,
    /// PDF (코드 1)
    Pdf = 1,
    /// HTML (코드 2)
    Html = 2,
    /// RTF (코드 3)
    Rtf = 3,
    /// CSV (코드 4)
    Csv = 4,
    /// 데이터셋 (코드 5)
    Ds = 5,
    /// JPEG 이미지 (코드 6)
    Jpeg = 6,
    /// 일반 텍스트 (코드 7)
    Txt = 7,
    /// Excel (코드 8)
    Xls = 8,
    /// Word 97-2003 (코드 9)
    Doc = 9,
    /// Word OOXML (코드 10)
    Docx = 10,
    /// MHTML 웹 아카이브 (코드 11)
    Mht = 11,
}

impl ExportFormat {
    /// 코드 순서로 정렬된 전체 형식 목록
    pub const ALL: [ExportFormat; 12] = [
        ExportFormat::Fp3,
        ExportFormat::Pdf,
        ExportFormat::Html,
        ExportFormat::Rtf,
        ExportFormat::Csv,
        ExportFormat::Ds,
        ExportFormat::Jpeg,
        ExportFormat::Txt,
        ExportFormat::Xls,
        ExportFormat::Doc,
        ExportFormat::Docx,
        ExportFormat::Mht,
    ];

    /// 정수 코드로부터 형식을 찾습니다.
    ///
    /// # 에러
    ///
    /// - [`ReportError::InvalidFormat`] — 코드가 0–11 범위 밖인 경우
    ///
    /// # 예시
    ///
    /// ```
    /// use repora::ExportFormat;
    ///
    /// let format = ExportFormat::from_code(1).unwrap();
    /// assert_eq!(format, ExportFormat::Pdf);
    /// assert_eq!(format.token(), "PDF");
    /// assert!(ExportFormat::from_code(12).is_err());
    /// ```
    pub fn from_code(code: i32) -> Result<Self, ReportError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| ReportError::InvalidFormat {
                value: code.to_string(),
            })
    }

    /// 정수 코드를 반환합니다.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// 와이어에서 사용하는 대문자 토큰을 반환합니다.
    pub fn token(self) -> &'static str {
        match self {
            ExportFormat::Fp3 => "FP3",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Html => "HTML",
            ExportFormat::Rtf => "RTF",
            ExportFormat::Csv => "CSV",
            ExportFormat::Ds => "DS",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Txt => "TXT",
            ExportFormat::Xls => "XLS",
            ExportFormat::Doc => "DOC",
            ExportFormat::Docx => "DOCX",
            ExportFormat::Mht => "MHT",
        }
    }

    /// 결과물이 사람이 읽을 수 있는 텍스트 계열인지 확인합니다 (결과 로그 출력 여부 판단용).
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            ExportFormat::Html | ExportFormat::Rtf | ExportFormat::Csv | ExportFormat::Txt
        )
    }
}

impl TryFrom<i32> for ExportFormat {
    type Error = ReportError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        ExportFormat::from_code(code)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    /// 정확한 대문자 토큰만 허용합니다 (`"pdf"`는 거부).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.token() == s)
            .ok_or_else(|| ReportError::InvalidFormat {
                value: s.to_string(),
            })
    }
}

/// 리포트 서버에 제출하는 작업
///
/// 작업마다 필요한 인자가 다르며, 각 변형은 고정된 와이어 필드 집합에 대응합니다
/// ([`build_request`](crate::codec::build_request) 참고).
/// `printer`가 빈 문자열이면 실제 인쇄 없이 렌더링만 수행합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// 템플릿 + 데이터소스로 리포트를 생성하여 지정 형식으로 반환
    BuildReport {
        template: Vec<u8>,
        datasource: Vec<u8>,
        format: ExportFormat,
        printer: String,
        copies: i32,
    },
    /// 템플릿 + 데이터소스로 리포트를 생성하여 인쇄
    PrintWithTemplate {
        template: Vec<u8>,
        datasource: Vec<u8>,
        printer: String,
        copies: i32,
    },
    /// 준비된 리포트를 인쇄
    PrintPrepared {
        prepared: Vec<u8>,
        printer: String,
        copies: i32,
    },
    /// 준비된 리포트를 지정 형식으로 변환 (프린터가 있으면 인쇄도 수행)
    ConvertPrepared {
        prepared: Vec<u8>,
        format: ExportFormat,
        printer: String,
        copies: i32,
    },
    /// 오피스 문서를 지정 형식으로 변환
    ConvertOffice {
        document: Vec<u8>,
        format: ExportFormat,
    },
}

impl Operation {
    /// 로그에 사용하는 작업 이름을 반환합니다.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::BuildReport { .. } => "buildReport",
            Operation::PrintWithTemplate { .. } => "printReport",
            Operation::PrintPrepared { .. } => "printPreparedReport",
            Operation::ConvertPrepared { .. } => "convertReport",
            Operation::ConvertOffice { .. } => "convertOfficeDocument",
        }
    }

    /// 결과가 인쇄 확인 페이로드인지 확인합니다.
    pub fn is_print(&self) -> bool {
        matches!(
            self,
            Operation::PrintWithTemplate { .. } | Operation::PrintPrepared { .. }
        )
    }

    /// 요청된 내보내기 형식을 반환합니다 (인쇄 작업은 `None`).
    pub fn format(&self) -> Option<ExportFormat> {
        match self {
            Operation::BuildReport { format, .. }
            | Operation::ConvertPrepared { format, .. }
            | Operation::ConvertOffice { format, .. } => Some(*format),
            Operation::PrintWithTemplate { .. } | Operation::PrintPrepared { .. } => None,
        }
    }

    /// 프린터 이름을 반환합니다 (오피스 변환은 `None`).
    pub fn printer(&self) -> Option<&str> {
        match self {
            Operation::BuildReport { printer, .. }
            | Operation::PrintWithTemplate { printer, .. }
            | Operation::PrintPrepared { printer, .. }
            | Operation::ConvertPrepared { printer, .. } => Some(printer),
            Operation::ConvertOffice { .. } => None,
        }
    }

    /// 인쇄 매수를 반환합니다 (오피스 변환은 `None`).
    pub fn copies(&self) -> Option<i32> {
        match self {
            Operation::BuildReport { copies, .. }
            | Operation::PrintWithTemplate { copies, .. }
            | Operation::PrintPrepared { copies, .. }
            | Operation::ConvertPrepared { copies, .. } => Some(*copies),
            Operation::ConvertOffice { .. } => None,
        }
    }

    /// 바이너리 페이로드 전체 크기 (인코딩 전)
    pub fn payload_len(&self) -> usize {
        match self {
            Operation::BuildReport {
                template,
                datasource,
                ..
            }
            | Operation::PrintWithTemplate {
                template,
                datasource,
                ..
            } => template.len() + datasource.len(),
            Operation::PrintPrepared { prepared, .. }
            | Operation::ConvertPrepared { prepared, .. } => prepared.len(),
            Operation::ConvertOffice { document, .. } => document.len(),
        }
    }

    /// 로그용 datasource 미리보기
    ///
    /// [`DATASOURCE_PREVIEW_LIMIT`] 미만이면 UTF-8 손실 변환 원문을, 이상이면 크기 안내를 반환합니다.
    /// datasource가 없는 작업은 `None`.
    pub fn datasource_preview(&self) -> Option<String> {
        let datasource = match self {
            Operation::BuildReport { datasource, .. }
            | Operation::PrintWithTemplate { datasource, .. } => datasource,
            _ => return None,
        };
        if datasource.len() < DATASOURCE_PREVIEW_LIMIT {
            Some(String::from_utf8_lossy(datasource).into_owned())
        } else {
            Some(format!(
                "...too big to be displayed... {} bytes",
                datasource.len()
            ))
        }
    }
}

/// 와이어 요청 — 순서가 보존되는 (필드 이름, 텍스트 값) 목록
///
/// 필드 집합과 순서는 작업별로 고정되어 있으며, 요청마다 새로 생성되고 호출 후 폐기됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WireRequest {
    fields: Vec<(&'static str, String)>,
}

impl WireRequest {
    /// 빈 요청을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드를 순서대로 추가합니다.
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.push((name, value.into()));
    }

    /// 필드 이름 목록을 순서대로 반환합니다.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    /// 이름으로 필드 값을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 필드 수
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 필드가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `application/x-www-form-urlencoded` 본문으로 렌더링합니다.
    ///
    /// ```
    /// use repora::WireRequest;
    ///
    /// let mut req = WireRequest::new();
    /// req.push("printto", "HP LaserJet");
    /// req.push("copies", "2");
    /// assert_eq!(req.to_form_body(), "printto=HP%20LaserJet&copies=2");
    /// ```
    pub fn to_form_body(&self) -> String {
        let mut body = String::with_capacity(self.encoded_len_hint());
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                body.push('&');
            }
            body.push_str(&urlencoding::encode(name));
            body.push('=');
            body.push_str(&urlencoding::encode(value));
        }
        body
    }

    /// base64 값의 `+`, `/`, `=` 이스케이프를 고려한 대략적인 본문 크기
    fn encoded_len_hint(&self) -> usize {
        self.fields
            .iter()
            .map(|(name, value)| name.len() + value.len() + value.len() / 16 + 2)
            .sum()
    }
}

/// 인쇄 작업 응답이 성공 확인 페이로드(`"true"`)인지 확인합니다.
///
/// 앞뒤 공백은 무시하고, 대소문자는 구분하지 않습니다.
pub fn is_print_confirmation(body: &[u8]) -> bool {
    body.trim_ascii().eq_ignore_ascii_case(PRINT_CONFIRMATION)
}
