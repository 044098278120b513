//! # ページ単位の出力エンベロープ
//!
//! 手動ページングモードで、1 ページ分のアイテムと継続トークンを
//! まとめてパイプラインに渡すための型。

use serde::{Deserialize, Serialize};

/// ページネーション付きレスポンス
///
/// 自動ページングではアイテムを 1 件ずつ出力するのに対し、
/// 手動ページングでは `PaginatedResponse<T>` として 1 ページ + 継続トークンを出力する。
///
/// ## JSON 形式
///
/// ```json
/// {
///   "data": [...],
///   "next_token": "opaque-token-string"
/// }
/// ```
///
/// `next_token` が `null` の場合は最後のページを意味する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data:       Vec<T>,
    pub next_token: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// 後続ページが存在するか
    pub fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_最終ページはnext_tokenがnullでシリアライズされる() {
        let page = PaginatedResponse {
            data:       vec![1, 2, 3],
            next_token: None,
        };

        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json, serde_json::json!({ "data": [1, 2, 3], "next_token": null }));
        assert!(!page.has_more());
    }

    #[test]
    fn test_継続トークンありのページはhas_moreがtrue() {
        let page = PaginatedResponse {
            data:       vec!["a".to_string()],
            next_token: Some("token-1".to_string()),
        };

        assert!(page.has_more());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["next_token"], "token-1");
    }
}
