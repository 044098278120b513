//! # エラーレコード
//!
//! コマンドレットが失敗したときに標準エラー出力へ書き出す、共通のエラー構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorRecord` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - エラー型からの変換は各アプリの責務（shared に AWS SDK 依存を入れない）
//! - よく使うエラー種別は便利コンストラクタで提供し、種別文字列のハードコードを排除

use serde::{Deserialize, Serialize};

/// パイプラインに渡すエラーオブジェクト
///
/// `type` フィールドで問題の種類を識別し、`hint` には利用者が取るべき対処を入れる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "type")]
    pub error_type: String,
    pub cmdlet:     Option<String>,
    pub message:    String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hint:       Option<String>,
}

impl ErrorRecord {
    /// 汎用コンストラクタ
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            cmdlet:     None,
            message:    message.into(),
            hint:       None,
        }
    }

    /// パラメータ検証エラー（ネットワーク呼び出し前に検出）
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation-error", message)
    }

    /// AWS サービス呼び出しエラー
    pub fn service(message: impl Into<String>) -> Self {
        Self::new("service-error", message)
    }

    /// 名前解決エラー
    pub fn name_resolution(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::new("name-resolution-failure", message).with_hint(hint)
    }

    /// 内部エラー
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal-error", message)
    }

    /// 対処のヒントを付与する
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// 発生元のコマンドレット名を付与する
    pub fn with_cmdlet(mut self, cmdlet: impl Into<String>) -> Self {
        self.cmdlet = Some(cmdlet.into());
        self
    }
}
