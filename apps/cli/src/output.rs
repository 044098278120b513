//! # パイプライン出力
//!
//! コマンドレットの結果を標準出力に書き出す。
//!
//! - 自動ページング: 1 アイテム 1 行の JSON（取得したページごとにフラッシュ）
//! - 手動ページング: `{"data": [...], "next_token": ...}` を 1 行
//!
//! 出力先のパイプが閉じられた場合（`head` などで読み手が先に終了した場合）は
//! キャンセルシグナルをセットし、以降の取得を止める。エラーとしては扱わない。

use std::io::{self, Write};

use awscmd_domain::cancellation::CancellationSignal;
use awscmd_infra::InfraError;
use awscmd_shared::{ErrorRecord, PaginatedResponse};
use serde::Serialize;

use crate::error::CliError;

/// パイプラインへの書き込み結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    /// 読み手がいなくなった
    Closed,
}

/// パイプラインの書き込み先
pub struct PipelineWriter<'a> {
    out:          &'a mut dyn Write,
    cancellation: CancellationSignal,
    closed:       bool,
}

impl<'a> PipelineWriter<'a> {
    pub fn new(out: &'a mut dyn Write, cancellation: CancellationSignal) -> Self {
        Self {
            out,
            cancellation,
            closed: false,
        }
    }

    /// 読み手がいなくなったか
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 1 アイテムを 1 行の JSON として書き出す
    pub fn write_item<T: Serialize>(&mut self, item: &T) -> Result<WriteStatus, CliError> {
        self.write_line(item)
    }

    /// 手動ページングの 1 ページを書き出す
    pub fn write_page<T: Serialize>(
        &mut self,
        page: &PaginatedResponse<T>,
    ) -> Result<WriteStatus, CliError> {
        self.write_line(page)?;
        self.flush()
    }

    /// バッファを出力先に送る
    pub fn flush(&mut self) -> Result<WriteStatus, CliError> {
        if self.closed {
            return Ok(WriteStatus::Closed);
        }
        let result = self.out.flush();
        self.handle(result)
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<WriteStatus, CliError> {
        if self.closed {
            return Ok(WriteStatus::Closed);
        }
        let mut line = serde_json::to_vec(value).map_err(InfraError::from)?;
        line.push(b'\n');
        let result = self.out.write_all(&line);
        self.handle(result)
    }

    fn handle(&mut self, result: io::Result<()>) -> Result<WriteStatus, CliError> {
        match result {
            Ok(()) => Ok(WriteStatus::Written),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("出力先のパイプが閉じられたため取得を終了します");
                self.closed = true;
                self.cancellation.cancel();
                Ok(WriteStatus::Closed)
            }
            Err(e) => Err(CliError::Output(e)),
        }
    }
}

/// エラーレコードを 1 行の JSON として書き出す
pub fn write_error_record(out: &mut dyn Write, record: &ErrorRecord) -> io::Result<()> {
    let mut line = serde_json::to_vec(record).map_err(io::Error::other)?;
    line.push(b'\n');
    out.write_all(&line)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    /// 書き込みのたびに BrokenPipe を返す出力先
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// 書き込みのたびに権限エラーを返す出力先
    struct Unwritable;

    impl Write for Unwritable {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_アイテムを1行ずつjsonで書き出す() {
        let mut buf = Vec::new();
        let mut writer = PipelineWriter::new(&mut buf, CancellationSignal::new());

        writer.write_item(&json!({ "Name": "a" })).unwrap();
        writer.write_item(&json!({ "Name": "b" })).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"Name\":\"a\"}\n{\"Name\":\"b\"}\n"
        );
    }

    #[test]
    fn test_ページはdataとnext_tokenを持つ1行になる() {
        let mut buf = Vec::new();
        let mut writer = PipelineWriter::new(&mut buf, CancellationSignal::new());

        writer
            .write_page(&PaginatedResponse {
                data:       vec![1, 2],
                next_token: Some("t1".to_string()),
            })
            .unwrap();

        let line: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(line, json!({ "data": [1, 2], "next_token": "t1" }));
    }

    #[test]
    fn test_パイプが閉じられたらキャンセルを要求する() {
        let signal = CancellationSignal::new();
        let mut out = ClosedPipe;
        let mut writer = PipelineWriter::new(&mut out, signal.clone());

        let status = writer.write_item(&json!(1)).unwrap();

        assert_eq!(status, WriteStatus::Closed);
        assert!(writer.is_closed());
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_パイプ切断以外の書き込みエラーは出力エラーになる() {
        let signal = CancellationSignal::new();
        let mut out = Unwritable;
        let mut writer = PipelineWriter::new(&mut out, signal.clone());

        let result = writer.write_item(&json!(1));

        assert!(matches!(result, Err(CliError::Output(_))));
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn test_エラーレコードを1行で書き出す() {
        let mut buf = Vec::new();

        write_error_record(&mut buf, &ErrorRecord::validation("bad")).unwrap();

        let line: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(line["type"], "validation-error");
        assert!(buf.ends_with(b"\n"));
    }
}
