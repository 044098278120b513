//! # awscmd
//!
//! AWS CloudWatch / WorkSpaces のコマンドレットを実行する CLI。
//!
//! ## 出力
//!
//! | 出力先 | 内容 |
//! |--------|------|
//! | 標準出力 | 結果の JSON（自動ページングは 1 行 1 アイテム、手動ページングは 1 ページ） |
//! | 標準エラー出力 | ログ、失敗時のエラーレコード |
//!
//! ## 終了コード
//!
//! | コード | 意味 |
//! |--------|------|
//! | `0` | 成功（キャンセル・出力先の切断を含む） |
//! | `1` | 検証エラー・サービスエラー |
//! | `2` | 引数の書式エラー |
//!
//! ## 使用例
//!
//! ```bash
//! # 状態が ALARM のアラームを 1 行ずつ出力
//! awscmd get-cw-alarm --state-value ALARM --region ap-northeast-1
//!
//! # 1 ページだけ取得し、続きは next_token で再開
//! awscmd get-wks-workspace --no-auto-iteration --page-size 10
//! awscmd get-wks-workspace --no-auto-iteration --page-size 10 --next-token <TOKEN>
//! ```

use std::{
    io::{self, BufWriter},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context as _;
use awscmd_cli::{
    args::Cli,
    cmdlet::ServiceClients,
    config::CliConfig,
    output::write_error_record,
    run,
};
use awscmd_domain::{cancellation::CancellationSignal, clock::SystemClock, session::Session};
use awscmd_infra::{
    AwsCloudWatchClient,
    AwsWorkSpacesClient,
    config::{create_sdk_config, region_name},
};
use awscmd_shared::observability::{TracingConfig, init_tracing};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let config = CliConfig::from_env().context("設定の読み込みに失敗しました")?;
    init_tracing(&TracingConfig::new("awscmd", config.log_format));

    let cli = Cli::parse();
    let sdk_config = create_sdk_config(&cli.global.client_config()).await;
    tracing::debug!(region = %region_name(&sdk_config), "SDK 設定を読み込みました");

    let cloudwatch = AwsCloudWatchClient::from_sdk_config(&sdk_config);
    let workspaces = AwsWorkSpacesClient::from_sdk_config(&sdk_config);
    let clients = ServiceClients {
        cloudwatch: &cloudwatch,
        workspaces: &workspaces,
    };

    // Ctrl-C で次ページの取得を止める
    let cancellation = CancellationSignal::new();
    let signal = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("中断が要求されました。次のページは取得しません");
            signal.cancel();
        }
    });

    let mut session = Session::new(config.max_history, Arc::new(SystemClock));
    let cmdlet = cli.command.name();
    let mut stdout = BufWriter::new(io::stdout().lock());

    match run(cli.command, clients, &mut session, &mut stdout, cancellation).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            let record = e.to_error_record().with_cmdlet(cmdlet);
            write_error_record(&mut io::stderr().lock(), &record)
                .context("エラーレコードの書き込みに失敗しました")?;
            Ok(ExitCode::FAILURE)
        }
    }
}
