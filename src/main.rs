//! Homework Status Monitor CLI
//!
//! 轮询 Practicum 作业审核状态，状态变化时推送 Telegram 通知

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use homework_status_monitor::{
    ConsoleChannel, HomeworkMonitor, MonitorConfig, NotifyChannel, StatusApiClient,
    TelegramChannel,
};

#[derive(Parser)]
#[command(name = "hsm")]
#[command(about = "Homework Status Monitor - 轮询作业审核状态并推送 Telegram 通知")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 持续监控作业状态并发送通知
    Watch {
        /// 轮询间隔（秒），覆盖配置文件
        #[arg(long, short)]
        interval: Option<u64>,
        /// 起始游标（Unix 时间戳）
        #[arg(long, default_value = "0")]
        from_date: i64,
    },
    /// 执行单次轮询周期
    Check {
        /// 起始游标（Unix 时间戳）
        #[arg(long, default_value = "0")]
        from_date: i64,
        /// 只打印不发送
        #[arg(long)]
        dry_run: bool,
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
    /// 发送一条测试消息验证渠道配置
    SendTest {
        /// 消息内容
        #[arg(default_value = "Homework status monitor: test message")]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("homework_status_monitor=info,hsm=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            interval,
            from_date,
        } => {
            // 缺密钥在进入循环前直接退出
            let config = MonitorConfig::auto_load()?;
            let api = StatusApiClient::new(&config.endpoint, &config.practicum_token)?;
            let channel = Arc::new(TelegramChannel::new(
                &config.telegram_token,
                &config.telegram_chat_id,
            )?);
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(config.poll_interval);

            let mut monitor = HomeworkMonitor::new(api, channel, interval).with_cursor(from_date);
            monitor.run().await?;
        }
        Commands::Check {
            from_date,
            dry_run,
            json,
        } => {
            let config = MonitorConfig::auto_load()?;
            let api = StatusApiClient::new(&config.endpoint, &config.practicum_token)?;
            let channel: Arc<dyn NotifyChannel> = if dry_run {
                Arc::new(ConsoleChannel)
            } else {
                Arc::new(TelegramChannel::new(
                    &config.telegram_token,
                    &config.telegram_chat_id,
                )?)
            };

            let mut monitor =
                HomeworkMonitor::new(api, channel, config.poll_interval).with_cursor(from_date);
            let report = monitor.poll_once().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let cursor_time = chrono::DateTime::from_timestamp(report.cursor, 0)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "本轮发送 {} 条通知，抑制 {} 条重复",
                    report.sent, report.suppressed
                );
                println!("游标推进到 {} ({})", report.cursor, cursor_time);
            }
        }
        Commands::SendTest { message } => {
            let config = MonitorConfig::auto_load()?;
            let channel = TelegramChannel::new(&config.telegram_token, &config.telegram_chat_id)?;
            channel.send(&message).await?;
            println!("测试消息已发送");
        }
    }

    Ok(())
}
