//! # CLI エラー定義
//!
//! コマンドレットの実行中に発生するエラーと、標準エラー出力に書く
//! [`ErrorRecord`] への変換を定義する。

use awscmd_domain::DomainError;
use awscmd_infra::{InfraError, InfraErrorKind};
use awscmd_shared::{ErrorRecord, event_log::error};
use thiserror::Error;

/// コマンドレットの実行中に発生するエラー
#[derive(Debug, Error)]
pub enum CliError {
    /// サービス呼び出し前に検出した入力エラー
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// サービス呼び出し・レスポンス変換のエラー
    #[error(transparent)]
    Infra(#[from] InfraError),

    /// パイプライン出力の書き込みエラー
    #[error("出力の書き込みに失敗しました: {0}")]
    Output(#[source] std::io::Error),

    /// 環境変数の設定エラー
    #[error("設定エラー: {0}")]
    Config(String),
}

impl CliError {
    /// 標準エラー出力用のレコードに変換する
    pub fn to_error_record(&self) -> ErrorRecord {
        let message = self.to_string();
        match self {
            Self::Domain(_) | Self::Config(_) => ErrorRecord::validation(message),
            Self::Infra(e) => match (e.kind(), e.hint()) {
                (InfraErrorKind::NameResolution { .. }, Some(hint)) => {
                    ErrorRecord::name_resolution(message, hint)
                }
                (InfraErrorKind::Service { .. } | InfraErrorKind::NameResolution { .. }, _) => {
                    ErrorRecord::service(message)
                }
                (InfraErrorKind::InvalidInput(_), _) => ErrorRecord::validation(message),
                _ => ErrorRecord::internal(message),
            },
            Self::Output(_) => ErrorRecord::internal(message),
        }
    }

    /// ログ用のエラーカテゴリ
    pub fn category(&self) -> &'static str {
        match self {
            Self::Domain(_) | Self::Config(_) => error::category::VALIDATION,
            Self::Infra(_) => error::category::EXTERNAL_SERVICE,
            Self::Output(_) => error::category::OUTPUT,
        }
    }

    /// ログ用のエラー種別
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Domain(_) | Self::Config(_) => error::kind::INVALID_PARAMETER,
            Self::Infra(e) => match e.kind() {
                InfraErrorKind::Service { .. } => error::kind::SERVICE_CALL,
                InfraErrorKind::NameResolution { .. } => error::kind::NAME_RESOLUTION,
                InfraErrorKind::InvalidInput(_) => error::kind::INVALID_PARAMETER,
                _ => error::kind::INTERNAL,
            },
            Self::Output(_) => error::kind::WRITE,
        }
    }
}
