//! # CLI 設定
//!
//! 環境変数から CLI 全体の設定を読み込む。
//! 接続先（リージョン、プロファイル、エンドポイント）はグローバルオプションで扱う。
//!
//! | 変数名 | 既定値 | 説明 |
//! |--------|--------|------|
//! | `AWSCMD_MAX_HISTORY` | `10` | セッション履歴の保持件数（`0` で保持しない） |
//! | `LOG_FORMAT` | `pretty` | ログ出力形式（`json` / `pretty`） |

use std::env;

use awscmd_domain::session::DEFAULT_MAX_ENTRIES;
use awscmd_shared::observability::LogFormat;

use crate::error::CliError;

/// CLI 全体の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// セッション履歴の保持件数
    pub max_history: usize,
    /// ログ出力形式
    pub log_format:  LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_ENTRIES,
            log_format:  LogFormat::default(),
        }
    }
}

impl CliConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let max_history = match lookup("AWSCMD_MAX_HISTORY") {
            Some(value) => value.trim().parse().map_err(|_| {
                CliError::Config(format!(
                    "AWSCMD_MAX_HISTORY は 0 以上の整数である必要があります（指定: {value:?}）"
                ))
            })?,
            None => DEFAULT_MAX_ENTRIES,
        };
        let log_format = lookup("LOG_FORMAT")
            .map(|value| LogFormat::parse(&value))
            .unwrap_or_default();

        Ok(Self {
            max_history,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use awscmd_domain::{clock::SystemClock, session::Session};
    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_未設定なら既定値を使う() {
        let config = CliConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_環境変数から履歴件数とログ形式を読む() {
        let config =
            CliConfig::from_lookup(lookup(&[("AWSCMD_MAX_HISTORY", "3"), ("LOG_FORMAT", "json")]))
                .unwrap();

        assert_eq!(config.max_history, 3);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_履歴件数が整数でなければ設定エラーになる() {
        let result = CliConfig::from_lookup(lookup(&[("AWSCMD_MAX_HISTORY", "many")]));

        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_履歴件数の最大値からセッションを作成できる() {
        let config =
            CliConfig::from_lookup(lookup(&[("AWSCMD_MAX_HISTORY", "18446744073709551615")]))
                .unwrap();

        let session = Session::new(config.max_history, Arc::new(SystemClock));

        assert_eq!(config.max_history, usize::MAX);
        assert!(session.last().is_none());
    }
}
