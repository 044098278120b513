//! # ドメイン層エラー定義
//!
//! ネットワーク呼び出しの前に検出できるパラメータ不正を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//! - **パラメータ名は CLI のフラグ名**: 利用者がそのまま修正できるよう `--` 付きで表示する
//!
//! ## 使用例
//!
//! ```rust
//! use awscmd_domain::DomainError;
//!
//! fn validate_ids(ids: &[String], directory_id: Option<&str>) -> Result<(), DomainError> {
//!     if !ids.is_empty() && directory_id.is_some() {
//!         return Err(DomainError::MutuallyExclusive {
//!             first:  "workspace-id",
//!             second: "directory-id",
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_ids(&["ws-1".to_string()], Some("d-1")).is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// いずれもサービス呼び出し前に検出され、呼び出しは一度も行われない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 値の範囲外、件数超過、不正な書式など。
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 必須パラメータの欠落
    #[error("必須パラメータが指定されていません: --{0}")]
    MissingParameter(&'static str),

    /// 排他パラメータの同時指定
    ///
    /// 旧形式と UTC 形式の時刻パラメータ、ID 指定と条件指定など、
    /// どちらか一方しか指定できない組み合わせ。
    #[error("--{first} と --{second} は同時に指定できません")]
    MutuallyExclusive {
        /// 先に評価したパラメータ名
        first:  &'static str,
        /// 後に評価したパラメータ名
        second: &'static str,
    },
}

/// リスト型パラメータの件数上限を検証する
pub(crate) fn ensure_max_len<T>(
    values: &[T],
    max: usize,
    parameter: &'static str,
) -> Result<(), DomainError> {
    if values.len() > max {
        return Err(DomainError::Validation(format!(
            "--{parameter} は {max} 件以内で指定してください（指定: {} 件）",
            values.len()
        )));
    }
    Ok(())
}

/// 排他パラメータが同時に指定されていないことを検証する
pub(crate) fn ensure_exclusive(
    first: (&'static str, bool),
    second: (&'static str, bool),
) -> Result<(), DomainError> {
    if first.1 && second.1 {
        return Err(DomainError::MutuallyExclusive {
            first:  first.0,
            second: second.0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutually_exclusiveのメッセージに両方のフラグ名が含まれる() {
        let err = DomainError::MutuallyExclusive {
            first:  "start-date",
            second: "utc-start-date",
        };

        assert_eq!(
            err.to_string(),
            "--start-date と --utc-start-date は同時に指定できません"
        );
    }

    #[test]
    fn test_ensure_max_lenは上限ちょうどを許容する() {
        let values = vec![0; 25];
        assert!(ensure_max_len(&values, 25, "workspace-id").is_ok());
    }

    #[test]
    fn test_ensure_max_lenは上限超過でvalidationを返す() {
        let values = vec![0; 26];
        let err = ensure_max_len(&values, 25, "workspace-id").unwrap_err();

        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("25 件以内")));
    }

    #[test]
    fn test_ensure_exclusiveは片方のみなら成功する() {
        assert!(ensure_exclusive(("a", true), ("b", false)).is_ok());
        assert!(ensure_exclusive(("a", false), ("b", false)).is_ok());
        assert_eq!(
            ensure_exclusive(("a", true), ("b", true)),
            Err(DomainError::MutuallyExclusive {
                first:  "a",
                second: "b",
            })
        );
    }
}
