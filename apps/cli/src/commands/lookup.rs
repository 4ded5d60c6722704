//! 错误码查询命令

use anyhow::{Context, Result};
use clap::Args;
use fr5_client::ErrorCatalog;
use std::path::PathBuf;

/// 错误码查询参数
#[derive(Args, Debug)]
pub struct LookupCommand {
    /// 控制器错误码（可多个）
    #[arg(allow_negative_numbers = true, required_unless_present = "all")]
    pub codes: Vec<i32>,

    /// 列出目录中的所有错误码
    #[arg(long)]
    pub all: bool,

    /// 自定义错误码目录（TOML）
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
}

impl LookupCommand {
    pub fn execute(self) -> Result<()> {
        let catalog = match &self.catalog {
            Some(path) => ErrorCatalog::load(path)
                .with_context(|| format!("加载错误码目录失败: {}", path.display()))?,
            None => ErrorCatalog::builtin()?,
        };

        if self.all {
            for (code, description) in catalog.iter() {
                println!("{:>5}  {}", code, description);
            }
            return Ok(());
        }

        // 先全部查询，任一未知错误码都以非零状态退出
        let mut unknown = Vec::new();
        for code in self.codes {
            match catalog.lookup(code) {
                Ok(record) => println!("{}", record),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    unknown.push(code);
                },
            }
        }

        if !unknown.is_empty() {
            anyhow::bail!("未知错误码: {:?}", unknown);
        }
        Ok(())
    }
}
