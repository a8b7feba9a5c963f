//! 오피스 문서를 리포트 서버로 변환하는 CLI 예제
//!
//! 사용법:
//! ```bash
//! cargo run --example convert_document -- <server_url> <input> <format> <output>
//! ```
//!
//! 예시:
//! ```bash
//! RUST_LOG=repora=debug cargo run --example convert_document -- \
//!     http://192.168.1.10/ReportServerCgi report.docx PDF report.pdf
//! ```

use std::env;
use std::time::Instant;

use repora::{ExportFormat, ReportClient};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// JSON 출력용 요약 구조
#[derive(Debug, Serialize)]
struct OutputData {
    /// 성공 여부
    success: bool,
    /// 메시지 (에러 시 에러 메시지)
    message: String,
    /// 요청한 형식 토큰
    format: Option<String>,
    /// 결과 바이트 수
    bytes: usize,
    /// 소요 시간 (밀리초)
    elapsed_ms: u64,
}

impl OutputData {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            format: None,
            bytes: 0,
            elapsed_ms: 0,
        }
    }
}

fn print_usage() {
    eprintln!("오피스 문서 변환 CLI");
    eprintln!();
    eprintln!("사용법:");
    eprintln!("  cargo run --example convert_document -- <server_url> <input> <format> <output>");
    eprintln!();
    eprintln!("인자:");
    eprintln!("  server_url - 리포트 서버 URL");
    eprintln!("  input      - 변환할 문서 경로");
    eprintln!("  format     - 형식 토큰 (FP3, PDF, HTML, RTF, CSV, DS, JPEG, TXT, XLS, DOC, DOCX, MHT)");
    eprintln!("  output     - 결과 파일 경로");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        print_usage();
        std::process::exit(1);
    }

    let result = convert(&args[1], &args[2], &args[3], &args[4]).await;

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("JSON 직렬화 실패: {}", e);
            std::process::exit(1);
        }
    }

    if !result.success {
        std::process::exit(1);
    }
}

async fn convert(server_url: &str, input: &str, format: &str, output: &str) -> OutputData {
    let format: ExportFormat = match format.parse() {
        Ok(f) => f,
        Err(e) => return OutputData::failure(format!("형식 오류: {}", e)),
    };

    let document = match tokio::fs::read(input).await {
        Ok(d) => d,
        Err(e) => return OutputData::failure(format!("입력 파일 읽기 실패: {}", e)),
    };

    let client = match ReportClient::new(server_url) {
        Ok(c) => c,
        Err(e) => return OutputData::failure(format!("클라이언트 생성 실패: {}", e)),
    };

    let started = Instant::now();
    let artifact = match client.convert_office_document(document, format).await {
        Ok(a) => a,
        Err(e) => return OutputData::failure(format!("변환 실패: {}", e)),
    };
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    if let Err(e) = tokio::fs::write(output, &artifact).await {
        return OutputData::failure(format!("결과 파일 쓰기 실패: {}", e));
    }

    OutputData {
        success: true,
        message: format!("변환 성공: {} → {}", input, output),
        format: Some(format.to_string()),
        bytes: artifact.len(),
        elapsed_ms,
    }
}
