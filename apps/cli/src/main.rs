//! # FR5 CLI
//!
//! FR5 安全控制层的开发者命令行工具。
//!
//! ```bash
//! # 翻译控制器错误码
//! fr5-cli lookup 0 46 -2
//!
//! # 检查配置文件
//! fr5-cli config check --path ./fr5.toml
//!
//! # 在模拟传输层上执行启动序列
//! fr5-cli simulate --error-codes 46 --pose 500,0,100,-180,0,90
//! fr5-cli simulate --fail-at MoveCart
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ConfigCommand, LookupCommand, SimulateCommand};

/// FR5 CLI - 机械臂安全控制层命令行工具
#[derive(Parser, Debug)]
#[command(name = "fr5-cli")]
#[command(about = "Developer CLI for the FR5 robot arm safety facade", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 查询错误码描述
    Lookup {
        #[command(flatten)]
        args: LookupCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 在模拟传输层上执行启动序列和错误查询
    Simulate {
        #[command(flatten)]
        args: SimulateCommand,
    },
}

fn main() -> Result<()> {
    // 日志输出到 stderr，stdout 只留给命令结果
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fr5_cli=info".parse()?)
                .add_directive("fr5_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup { args } => args.execute(),

        Commands::Config(cmd) => cmd.execute(),

        Commands::Simulate { args } => args.execute(),
    }
}
