//! 模拟运行命令
//!
//! 在 MockTransport 上执行启动序列、可选的运动 / 夹爪指令和一次错误查询，
//! 最后打印观察到的传输层调用序列。

use anyhow::{Context, Result};
use clap::Args;
use fr5_client::{RobotFacade, TransportCall};
use fr5_transport::{MockTransport, Pose, parse_values};
use std::path::PathBuf;
use tracing::info;

use super::config::load_config;

/// 解析原语名称（RPC 名称或变体名称，大小写不敏感）
pub fn parse_call(name: &str) -> Result<TransportCall, String> {
    let name = name.trim();
    TransportCall::ALL
        .into_iter()
        .find(|call| {
            call.rpc_name().eq_ignore_ascii_case(name)
                || format!("{:?}", call).eq_ignore_ascii_case(name)
        })
        .ok_or_else(|| {
            let names: Vec<_> = TransportCall::ALL.iter().map(|c| c.rpc_name()).collect();
            format!("unknown transport call '{}', expected one of: {}", name, names.join(", "))
        })
}

/// 模拟运行参数
#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// 控制器上报的错误码，逗号分隔
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub error_codes: Vec<i32>,

    /// 让指定原语返回失败（如 MoveCart, SetToolAO）
    #[arg(long, value_parser = parse_call)]
    pub fail_at: Option<TransportCall>,

    /// 错误无法通过复位清除
    #[arg(long)]
    pub persistent: bool,

    /// 启动后执行的笛卡尔目标（x,y,z,rx,ry,rz）
    #[arg(long, allow_hyphen_values = true)]
    pub pose: Option<String>,

    /// 启动后执行的关节目标，逗号分隔
    #[arg(long, allow_hyphen_values = true)]
    pub joints: Option<String>,

    /// 启动后设置的夹爪位置
    #[arg(long, allow_negative_numbers = true)]
    pub gripper: Option<i64>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl SimulateCommand {
    pub fn execute(self) -> Result<()> {
        let (config, _) = load_config(self.config.as_deref())?;

        let observer = MockTransport::new();
        if !self.error_codes.is_empty() {
            observer.set_error_codes(self.error_codes.clone());
        }
        observer.set_persistent_fault(self.persistent);
        if let Some(call) = self.fail_at {
            observer.fail_on(call);
        }

        let result = self.run(&observer, config);
        print_calls(&observer);
        result
    }

    fn run(&self, observer: &MockTransport, config: fr5_client::FacadeConfig) -> Result<()> {
        let mut robot =
            RobotFacade::initialize(observer.clone(), config).context("Can not connect to robot!")?;
        println!("✅ 初始化完成: {}", robot.state());

        if let Some(pose) = &self.pose {
            let pose: Pose = pose.parse().context("解析笛卡尔目标失败")?;
            let outcome = robot.move_end(pose)?;
            for advisory in &outcome.advisories {
                println!("⚠️  {}", advisory);
            }
            println!("✅ MoveCart -> {}", outcome.value.pose);
        }

        if let Some(joints) = &self.joints {
            let joints = parse_values(joints).context("解析关节目标失败")?;
            let command = robot.move_joint(&joints)?;
            println!("✅ MoveJ -> {} ({})", command.joints, command.cart_hint);
        }

        if let Some(position) = self.gripper {
            let command = robot.set_gripper(position)?;
            println!("✅ Gripper -> {}", command.value());
        }

        let mut report = robot.detect_errors()?;
        println!("状态: {}", report);
        if !report.healthy {
            info!("Attempting error recovery");
            report = robot.recover()?;
            println!("复位后状态: {}", report);
        }

        if !report.healthy {
            anyhow::bail!("robot still reports errors: {}", report);
        }
        Ok(())
    }
}

fn print_calls(observer: &MockTransport) {
    println!("传输层调用:");
    for (i, call) in observer.calls().iter().enumerate() {
        println!("  {:>2}. {:<18} {:?}", i + 1, call.kind().rpc_name(), call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call() {
        assert_eq!(parse_call("MoveCart"), Ok(TransportCall::MoveCart));
        assert_eq!(parse_call("movej"), Ok(TransportCall::MoveJoint));
        assert_eq!(parse_call("MoveJoint"), Ok(TransportCall::MoveJoint));
        assert_eq!(parse_call(" SetToolAO "), Ok(TransportCall::SetAnalogOutput));
        assert!(parse_call("Teleport").unwrap_err().contains("expected one of"));
    }
}
