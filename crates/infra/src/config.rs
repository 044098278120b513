//! # AWS SDK 設定
//!
//! CloudWatch / WorkSpaces クライアントが共有する `aws_config` の読み込み。
//!
//! 認証情報は SDK のデフォルト認証チェーンで解決する:
//! - 環境変数 `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
//! - 共有設定ファイル（`--profile` で選択したプロファイル）
//! - IAM ロール

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// リージョンが解決できなかった場合の表示名
const UNKNOWN_REGION: &str = "(未設定)";

/// SDK 設定の入力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsClientConfig {
    /// リージョン（未指定なら SDK の解決順序に従う）
    pub region:       Option<String>,
    /// 共有設定ファイルのプロファイル名
    pub profile:      Option<String>,
    /// カスタムエンドポイント URL（LocalStack など）
    pub endpoint_url: Option<String>,
}

/// SDK 設定を読み込む
///
/// `region` / `profile` / `endpoint_url` が `Some` の場合のみ上書きする。
pub async fn create_sdk_config(config: &AwsClientConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    let sdk_config = loader.load().await;
    tracing::debug!(
        region = %region_name(&sdk_config),
        custom_endpoint = config.endpoint_url.is_some(),
        "AWS SDK 設定を読み込みました"
    );
    sdk_config
}

/// 解決済みのリージョン名（エラーのヒント表示用）
pub fn region_name(sdk_config: &SdkConfig) -> String {
    sdk_config
        .region()
        .map_or_else(|| UNKNOWN_REGION.to_string(), ToString::to_string)
}
