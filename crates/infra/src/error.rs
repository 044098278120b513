//! # インフラ層エラー定義
//!
//! AWS サービス呼び出しで発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **SDK エラーの文字列化**: AWS SDK のエラー型はオペレーションごとにジェネリクスが異なり
//!   `#[from]` が困難なため、[`InfraError::from_sdk`] でメッセージにマップする
//! - **名前解決エラーの判別**: エラーの `source()` チェーンを辿り、根本原因が DNS の
//!   名前解決失敗であれば [`InfraErrorKind::NameResolution`] に分類してリージョンのヒントを付ける
//! - **SpanTrace 自動捕捉**: `From` 実装や convenience constructor で
//!   エラー生成時の呼び出し経路を自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Service, NameResolution 等）

use std::{error::Error as StdError, fmt};

use aws_sdk_cloudwatch::error::DisplayErrorContext;
use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// 名前解決失敗を示すメッセージ断片（小文字で比較する）
const NAME_RESOLUTION_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname provided",
    "no such host is known",
    "temporary failure in name resolution",
];

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
///
/// ## パターンマッチ
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::NameResolution { region, .. } => { /* ヒント付きで報告 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// AWS サービス呼び出しエラー
    ///
    /// サービスが返したエラー応答、認証エラー、タイムアウトなど。
    #[error("{service} の {operation} が失敗しました: {message}")]
    Service {
        /// サービス名（例: "cloudwatch"）
        service:   &'static str,
        /// オペレーション名（例: "DescribeAlarms"）
        operation: &'static str,
        message:   String,
    },

    /// エンドポイントの名前解決エラー
    ///
    /// 指定リージョンにサービスが存在しない、またはリージョン名の誤りで発生することが多い。
    #[error("{service} のエンドポイントを名前解決できませんでした（リージョン: {region}）: {message}")]
    NameResolution {
        service: &'static str,
        region:  String,
        message: String,
    },

    /// クライアント入力エラー
    ///
    /// ローカル検証をすり抜け、リクエスト構築時に検出された不正な入力。
    #[error("入力エラー: {0}")]
    InvalidInput(String),

    /// シリアライズ/デシリアライズエラー
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 名前解決エラーか
    pub fn is_name_resolution(&self) -> bool {
        matches!(self.kind, InfraErrorKind::NameResolution { .. })
    }

    /// 利用者向けの対処ヒント
    ///
    /// 名前解決エラーの場合のみ、リージョンの確認を促すメッセージを返す。
    pub fn hint(&self) -> Option<String> {
        match &self.kind {
            InfraErrorKind::NameResolution {
                service, region, ..
            } => Some(format!(
                "リージョン {region} で {service} が提供されているか確認してください。\
                 --region / --endpoint-url の指定とネットワーク（DNS）設定も確認してください"
            )),
            _ => None,
        }
    }

    // ===== Convenience constructors =====

    /// SDK のエラーから生成する
    ///
    /// `source()` チェーンのいずれかが名前解決失敗であれば
    /// [`InfraErrorKind::NameResolution`]、それ以外は [`InfraErrorKind::Service`] になる。
    pub fn from_sdk<E>(service: &'static str, operation: &'static str, region: &str, err: &E) -> Self
    where
        E: StdError + 'static,
    {
        let message = DisplayErrorContext(err).to_string();
        let kind = if is_name_resolution_failure(err) {
            InfraErrorKind::NameResolution {
                service,
                region: region.to_string(),
                message,
            }
        } else {
            InfraErrorKind::Service {
                service,
                operation,
                message,
            }
        };
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    /// サービス呼び出しエラーを生成する
    pub fn service(
        service: &'static str,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind:       InfraErrorKind::Service {
                service,
                operation,
                message: message.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 名前解決エラーを生成する
    pub fn name_resolution(
        service: &'static str,
        region: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind:       InfraErrorKind::NameResolution {
                service,
                region: region.into(),
                message: message.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// クライアント入力エラーを生成する
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::InvalidInput(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

/// エラーチェーンに名前解決失敗が含まれるか
fn is_name_resolution_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_lowercase();
        if NAME_RESOLUTION_MARKERS
            .iter()
            .any(|marker| text.contains(marker))
        {
            return true;
        }
        current = e.source();
    }
    false
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl StdError for InfraError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Serialization(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    /// SDK の DispatchFailure を模した入れ子のエラー
    #[derive(Debug, Error)]
    #[error("dispatch failure")]
    struct DispatchFailure {
        #[source]
        source: ConnectError,
    }

    #[derive(Debug, Error)]
    #[error("client error (Connect)")]
    struct ConnectError {
        #[source]
        source: io::Error,
    }

    fn nested(root: io::Error) -> DispatchFailure {
        DispatchFailure {
            source: ConnectError { source: root },
        }
    }

    #[test]
    fn test_from_sdkは入れ子の名前解決失敗を検出する() {
        let err = nested(io::Error::other(
            "dns error: failed to lookup address information: Name or service not known",
        ));

        let infra = InfraError::from_sdk("cloudwatch", "DescribeAlarms", "xx-invalid-1", &err);

        assert!(infra.is_name_resolution());
        match infra.kind() {
            InfraErrorKind::NameResolution {
                service,
                region,
                message,
            } => {
                assert_eq!(*service, "cloudwatch");
                assert_eq!(region, "xx-invalid-1");
                assert!(message.contains("dispatch failure"), "{message}");
            }
            other => panic!("NameResolution を期待したが {other:?}"),
        }
    }

    #[test]
    fn test_名前解決エラーのヒントにリージョンが含まれる() {
        let infra = InfraError::name_resolution("workspaces", "ap-northeast-9", "dns error");

        let hint = infra.hint().unwrap();

        assert!(hint.contains("ap-northeast-9"));
        assert!(hint.contains("workspaces"));
    }

    #[test]
    fn test_from_sdkは名前解決以外をserviceに分類する() {
        let err = nested(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));

        let infra = InfraError::from_sdk("workspaces", "DescribeWorkspaces", "us-east-1", &err);

        assert!(!infra.is_name_resolution());
        assert!(infra.hint().is_none());
        assert!(matches!(
            infra.kind(),
            InfraErrorKind::Service {
                operation: "DescribeWorkspaces",
                ..
            }
        ));
    }

    #[test]
    fn test_serviceのdisplayにオペレーション名が含まれる() {
        let err = InfraError::service("cloudwatch", "ListMetrics", "Throttling");

        assert_eq!(
            err.to_string(),
            "cloudwatch の ListMetrics が失敗しました: Throttling"
        );
    }

    #[test]
    fn test_from_serde_json_errorでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_serialization");
            let _enter = span.enter();

            let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
            let err: InfraError = json_err.into();

            assert!(matches!(err.kind(), InfraErrorKind::Serialization(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_serialization"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_convenience_constructorでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_paginator", operation = "DescribeAlarms");
            let _enter = span.enter();

            let err = InfraError::unexpected("モックの応答が残っていません");

            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_paginator"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }
}
