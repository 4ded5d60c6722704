//! 配置管理命令
//!
//! 查看、检查和生成 façade 配置文件

use anyhow::{Context, Result};
use clap::Subcommand;
use fr5_client::FacadeConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;

    path.push("fr5");
    path.push("config.toml");
    Ok(path)
}

/// 加载配置：显式路径必须存在，默认路径不存在时使用内置默认值
pub fn load_config(path: Option<&Path>) -> Result<(FacadeConfig, Option<PathBuf>)> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_file()?, false),
    };

    if !explicit && !path.exists() {
        return Ok((FacadeConfig::default(), None));
    }

    let config = FacadeConfig::load(&path)
        .with_context(|| format!("加载配置文件失败: {}", path.display()))?;
    Ok((config, Some(path)))
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示生效的配置（TOML）
    Show {
        /// 配置文件路径（默认使用用户配置目录）
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// 检查配置文件
    Check {
        /// 配置文件路径（默认使用用户配置目录）
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// 写入默认配置
    Init {
        /// 配置文件路径（默认使用用户配置目录）
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// 覆盖已有文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Show { path } => Self::show_(path.as_deref()),

            ConfigCommand::Check { path } => Self::check_(path.as_deref()),

            ConfigCommand::Init { path, force } => Self::init_(path, force),
        }
    }

    fn show_(path: Option<&Path>) -> Result<()> {
        let (config, source) = load_config(path)?;

        match source {
            Some(path) => println!("# {}", path.display()),
            None => println!("# 内置默认配置"),
        }
        print!("{}", config.to_toml_string()?);

        Ok(())
    }

    fn check_(path: Option<&Path>) -> Result<()> {
        let (config, source) = load_config(path)?;

        match source {
            Some(path) => println!("配置文件: {}", path.display()),
            None => println!("配置文件: (未找到，使用内置默认配置)"),
        }
        println!(
            "  安全高度: z < {} -> {}",
            config.safety.min_z, config.safety.clamp_z
        );
        println!(
            "  夹爪: AO{} [{}, {}] open={} close={}",
            config.gripper.channel,
            config.gripper.min,
            config.gripper.max,
            config.gripper.open,
            config.gripper.close
        );
        println!("  安全位姿: {}", config.init.safe_pose());
        println!("✅ 配置有效");

        Ok(())
    }

    fn init_(path: Option<PathBuf>, force: bool) -> Result<()> {
        let path = match path {
            Some(path) => path,
            None => default_config_file()?,
        };

        if path.exists() && !force {
            anyhow::bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("创建配置目录失败")?;
        }
        FacadeConfig::default().save(&path)?;
        println!("✅ 已写入默认配置: {}", path.display());

        Ok(())
    }
}
