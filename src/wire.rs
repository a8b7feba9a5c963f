//! 응답 본문 I/O 모듈 — 스트리밍 본문을 단일 메모리 버퍼로 수집
//!
//! [`BodySource`]는 청크 단위로 응답 본문을 제공하는 추상화이며,
//! [`read_body`]는 선언된 길이(`Content-Length`)를 기준으로 버퍼를 미리 할당한 뒤
//! 소스가 소진될 때까지 읽어 들입니다.
//!
//! ## 버퍼 크기 규칙
//!
//! - 선언된 길이 > [`MAX_BUFFER_LENGTH`] → 할당/읽기 없이 즉시 [`ReportError::PayloadTooLarge`]
//! - 선언된 길이 > 0 → 해당 크기로 초기 할당
//! - 그 외 → [`INITIAL_BUFFER_CAPACITY`] (4 KiB)

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;

use crate::constants::{INITIAL_BUFFER_CAPACITY, MAX_BUFFER_LENGTH};
use crate::error::{ReportError, Result, TransportError};

/// 청크 단위로 응답 본문을 제공하는 소스
///
/// `Ok(None)`은 본문 끝을 의미합니다.
#[async_trait]
pub trait BodySource: Send {
    /// 다음 청크를 읽습니다.
    async fn next_chunk(&mut self) -> std::result::Result<Option<Bytes>, TransportError>;
}

#[cfg(feature = "client")]
#[async_trait]
impl BodySource for reqwest::Response {
    async fn next_chunk(&mut self) -> std::result::Result<Option<Bytes>, TransportError> {
        Ok(self.chunk().await?)
    }
}

/// 메모리에 보관된 청크 목록을 순서대로 제공하는 본문 소스
///
/// 테스트와 사전 버퍼링된 응답에 사용합니다.
///
/// ```
/// use repora::wire::{MemoryBody, read_body};
///
/// # async fn example() -> repora::Result<()> {
/// let mut body = MemoryBody::from_chunks([b"ab".to_vec(), b"c".to_vec()]);
/// assert_eq!(read_body(&mut body, Some(3)).await?, b"abc");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryBody {
    chunks: VecDeque<Bytes>,
    reads: usize,
}

impl MemoryBody {
    /// 단일 청크 본문을 생성합니다.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self::from_chunks([body.into()])
    }

    /// 여러 청크로 나뉜 본문을 생성합니다.
    pub fn from_chunks<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            reads: 0,
        }
    }

    /// `next_chunk`가 호출된 횟수
    pub fn reads(&self) -> usize {
        self.reads
    }
}

#[async_trait]
impl BodySource for MemoryBody {
    async fn next_chunk(&mut self) -> std::result::Result<Option<Bytes>, TransportError> {
        self.reads += 1;
        Ok(self.chunks.pop_front())
    }
}

/// 선언된 길이를 기준으로 초기 버퍼 용량을 결정합니다.
///
/// # 에러
///
/// - [`ReportError::PayloadTooLarge`] — 선언된 길이가 [`MAX_BUFFER_LENGTH`]를 초과
pub fn initial_capacity(declared_length: Option<u64>) -> Result<usize> {
    match declared_length {
        Some(length) if length > MAX_BUFFER_LENGTH => Err(ReportError::PayloadTooLarge {
            length,
            max: MAX_BUFFER_LENGTH,
        }),
        // NOTE: length <= isize::MAX always fits in usize
        Some(length) if length > 0 => Ok(length as usize),
        _ => Ok(INITIAL_BUFFER_CAPACITY),
    }
}

/// 응답 본문 전체를 단일 버퍼로 읽습니다.
///
/// 본문이 비어 있으면 빈 `Vec`을 반환합니다 (에러 아님).
///
/// # 에러
///
/// - [`ReportError::PayloadTooLarge`] — 선언된 길이 초과 또는 초기 버퍼 할당 실패
/// - [`ReportError::Transport`] — 청크 읽기 중 네트워크 에러
pub async fn read_body(
    body: &mut (dyn BodySource + '_),
    declared_length: Option<u64>,
) -> Result<Vec<u8>> {
    let capacity = initial_capacity(declared_length)?;

    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| ReportError::PayloadTooLarge {
            length: capacity as u64,
            max: MAX_BUFFER_LENGTH,
        })?;

    while let Some(chunk) = body.next_chunk().await? {
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

/// 응답 본문 전체를 텍스트로 읽습니다 (잘못된 UTF-8은 대체 문자로 치환).
///
/// 서버 에러 메시지를 빠짐없이 진단에 포함하기 위해 사용합니다.
pub async fn read_body_text(
    body: &mut (dyn BodySource + '_),
    declared_length: Option<u64>,
) -> Result<String> {
    let bytes = read_body(body, declared_length).await?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
