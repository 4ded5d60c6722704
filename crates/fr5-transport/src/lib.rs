//! # FR5 Transport Layer
//!
//! 机械臂传输层抽象：控制器 RPC 暴露的原始运动与诊断原语。
//!
//! 本 crate 只定义能力集合（[`RobotTransport`]）和与之交换的数据类型，
//! 不负责建立连接。调用方在外部完成连接后，把已连接的句柄交给上层 façade。
//!
//! ## Feature Flags
//!
//! - `mock` - 启用 [`mock::MockTransport`]，记录所有调用的测试替身
//! - `serde` - 为数据类型派生 `Serialize` / `Deserialize`

use std::fmt;
use thiserror::Error;

pub mod types;

#[cfg(feature = "mock")]
pub mod mock;

pub use types::{AXIS_COUNT, CartMove, JointMove, JointVector, Pose, PoseError, parse_values};

#[cfg(feature = "mock")]
pub use mock::{MockTransport, RecordedCall};

/// 传输层原语（用于错误上下文和调用记录）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCall {
    SetToolCoord,
    MoveCart,
    MoveJoint,
    ForwardKinematics,
    SetAnalogOutput,
    GetErrorCodes,
    ResetAllErrors,
}

impl TransportCall {
    /// 所有原语
    pub const ALL: [TransportCall; 7] = [
        TransportCall::SetToolCoord,
        TransportCall::MoveCart,
        TransportCall::MoveJoint,
        TransportCall::ForwardKinematics,
        TransportCall::SetAnalogOutput,
        TransportCall::GetErrorCodes,
        TransportCall::ResetAllErrors,
    ];

    /// 控制器 RPC 中的原语名称
    pub fn rpc_name(&self) -> &'static str {
        match self {
            TransportCall::SetToolCoord => "SetToolCoord",
            TransportCall::MoveCart => "MoveCart",
            TransportCall::MoveJoint => "MoveJ",
            TransportCall::ForwardKinematics => "GetForwardKin",
            TransportCall::SetAnalogOutput => "SetToolAO",
            TransportCall::GetErrorCodes => "GetRobotErrorCode",
            TransportCall::ResetAllErrors => "ResetAllError",
        }
    }
}

impl fmt::Display for TransportCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rpc_name())
    }
}

/// 传输层错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// 控制器收到指令但返回非零错误码
    #[error("{call} rejected by controller with code {code}")]
    Rejected {
        /// 出错的原语
        call: TransportCall,
        /// 控制器返回码
        code: i32,
    },

    /// 通信链路故障（断连、RPC 异常）
    #[error("Transport link error: {0}")]
    Link(String),

    /// 控制器响应格式不符合约定
    #[error("Malformed response from {call}: {reason}")]
    MalformedResponse {
        call: TransportCall,
        reason: String,
    },
}

impl TransportError {
    /// 创建链路错误
    pub fn link(msg: impl Into<String>) -> Self {
        Self::Link(msg.into())
    }

    /// 是否为链路故障
    ///
    /// 链路故障意味着控制器状态未知，不应假设指令已执行或未执行。
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link(_))
    }

    /// 把控制器返回码转换为 `Result`（0 表示成功）
    ///
    /// 供具体的传输实现使用。
    pub fn check(call: TransportCall, code: i32) -> Result<(), TransportError> {
        if code == 0 {
            Ok(())
        } else {
            Err(TransportError::Rejected { call, code })
        }
    }
}

/// 机械臂传输层能力集合
///
/// 语义：
/// - 所有方法都是阻塞调用，控制器响应（或出错）后才返回
/// - 本层不做重试：运动指令具有物理副作用，重试策略由调用方决定
/// - 实现者持有已建立的连接；连接建立与重连不属于本 trait
pub trait RobotTransport {
    /// 设置工具坐标系
    ///
    /// `index` 为坐标系编号，`offset` 为相对法兰的偏移。
    fn set_tool_coord(
        &mut self,
        index: u8,
        offset: &Pose,
        tool_type: i32,
        install: i32,
    ) -> Result<(), TransportError>;

    /// 笛卡尔空间直线运动
    fn move_cart(&mut self, command: &CartMove) -> Result<(), TransportError>;

    /// 关节空间运动
    fn move_joint(&mut self, command: &JointMove) -> Result<(), TransportError>;

    /// 正运动学
    ///
    /// 返回值第一个元素为状态码，其余为笛卡尔位姿。
    fn forward_kinematics(&mut self, joints: &JointVector) -> Result<Vec<f64>, TransportError>;

    /// 设置工具端模拟量输出
    fn set_analog_output(
        &mut self,
        channel: u8,
        value: f64,
        enable: i32,
    ) -> Result<(), TransportError>;

    /// 查询当前错误码序列（顺序由控制器决定）
    fn error_codes(&mut self) -> Result<Vec<i32>, TransportError>;

    /// 请求清除所有错误
    fn reset_all_errors(&mut self) -> Result<(), TransportError>;
}

impl<T: RobotTransport + ?Sized> RobotTransport for Box<T> {
    fn set_tool_coord(
        &mut self,
        index: u8,
        offset: &Pose,
        tool_type: i32,
        install: i32,
    ) -> Result<(), TransportError> {
        (**self).set_tool_coord(index, offset, tool_type, install)
    }

    fn move_cart(&mut self, command: &CartMove) -> Result<(), TransportError> {
        (**self).move_cart(command)
    }

    fn move_joint(&mut self, command: &JointMove) -> Result<(), TransportError> {
        (**self).move_joint(command)
    }

    fn forward_kinematics(&mut self, joints: &JointVector) -> Result<Vec<f64>, TransportError> {
        (**self).forward_kinematics(joints)
    }

    fn set_analog_output(
        &mut self,
        channel: u8,
        value: f64,
        enable: i32,
    ) -> Result<(), TransportError> {
        (**self).set_analog_output(channel, value, enable)
    }

    fn error_codes(&mut self) -> Result<Vec<i32>, TransportError> {
        (**self).error_codes()
    }

    fn reset_all_errors(&mut self) -> Result<(), TransportError> {
        (**self).reset_all_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_check_return_code() {
        assert!(TransportError::check(TransportCall::MoveCart, 0).is_ok());

        let err = TransportError::check(TransportCall::MoveCart, 14).unwrap_err();
        assert_eq!(
            err,
            TransportError::Rejected {
                call: TransportCall::MoveCart,
                code: 14
            }
        );
    }

    #[test]
    fn test_error_display() {
        let err = TransportError::Rejected {
            call: TransportCall::SetAnalogOutput,
            code: 3,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("SetToolAO"));
        assert!(msg.contains("3"));

        let err = TransportError::link("connection reset");
        assert!(err.is_link());
        assert!(format!("{}", err).contains("connection reset"));
    }

    #[test]
    fn test_rpc_names() {
        assert_eq!(TransportCall::MoveJoint.rpc_name(), "MoveJ");
        assert_eq!(TransportCall::ForwardKinematics.to_string(), "GetForwardKin");

        let names: HashSet<_> = TransportCall::ALL.iter().map(|c| c.rpc_name()).collect();
        assert_eq!(names.len(), TransportCall::ALL.len());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransportError>();
    }
}
