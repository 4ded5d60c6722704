//! 错误类型体系
//!
//! 区分四类失败：
//!
//! - **契约违反**: 输入不合法（关节向量长度、夹爪指令越界、非数值分量），
//!   在本层就地拒绝，不会触达传输层
//! - **传输失败**: 传输层调用本身出错，原样上报，不自动重试
//! - **初始化失败**: 启动序列任一步骤失败，致命，façade 不会被构造出来
//! - **数据完整性**: 错误码目录缺失条目、配置不合法
//!
//! 控制器上报的硬件故障不是错误：它们是 [`ErrorReport`](crate::ErrorReport)
//! 中的非零记录。
//!
//! # 示例
//!
//! ```rust
//! use fr5_client::RobotError;
//!
//! fn handle(err: &RobotError) {
//!     if err.is_fatal() {
//!         eprintln!("机械臂不可用: {}", err);
//!     } else if err.is_contract_violation() {
//!         eprintln!("指令被拒绝 (code {:?}): {}", err.code(), err);
//!     } else {
//!         eprintln!("错误: {}", err);
//!     }
//! }
//! ```

use std::fmt;

use fr5_transport::{PoseError, TransportError};
use thiserror::Error;

/// 关节向量长度不合法时的兼容返回码
pub const INVALID_LENGTH_CODE: i32 = 3;

/// 参数超出范围时的兼容返回码
pub const OUT_OF_RANGE_CODE: i32 = 4;

/// 初始化阶段（用于定位启动失败的位置）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    /// 配置工具坐标系 0 / 1
    ToolFrames,
    /// 移动到安全位姿
    SafePose,
    /// 闭合夹爪
    GripperClose,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::ToolFrames => "tool frame setup",
            InitStage::SafePose => "safe pose move",
            InitStage::GripperClose => "gripper close",
        };
        f.write_str(name)
    }
}

/// 机器人错误类型
#[derive(Debug, Error)]
pub enum RobotError {
    // ==================== 契约违反 ====================
    /// 参数无效（非数值、非有限值、长度不符的位姿）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 关节向量长度不是 6
    #[error("Joint vector has invalid length: expected 6, got {actual}")]
    InvalidJointLength {
        /// 实际长度
        actual: usize,
    },

    /// 夹爪指令超出 [0, 1000]
    #[error("Gripper command {value} is out of range [{min}, {max}]")]
    GripperOutOfRange {
        /// 请求值
        value: i64,
        /// 下限
        min: i64,
        /// 上限
        max: i64,
    },

    // ==================== 传输失败 ====================
    /// 传输层调用失败
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// 正运动学结果不可用
    #[error("Forward kinematics failed: {0}")]
    Kinematics(String),

    // ==================== 初始化失败 ====================
    /// 启动序列失败
    #[error("Initialization failed during {stage}: {source}")]
    Initialization {
        /// 失败的阶段
        stage: InitStage,
        /// 根因
        source: Box<RobotError>,
    },

    // ==================== 数据完整性 ====================
    /// 错误码不在目录中
    #[error("Error code {0} has no catalog entry")]
    UnknownErrorCode(i32),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RobotError {
    /// 是否为契约违反（输入在本层被拒绝，未触达传输层）
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::InvalidJointLength { .. }
                | Self::GripperOutOfRange { .. }
        )
    }

    /// 是否为传输失败
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Kinematics(_))
    }

    /// 是否为致命错误
    ///
    /// 初始化失败意味着工作空间未经验证，机械臂必须视为不可用。
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Initialization { .. })
    }

    /// 兼容的数值返回码
    ///
    /// - 关节向量长度不合法: 3
    /// - 参数超出范围: 4
    /// - 控制器拒绝: 控制器返回码
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::InvalidJointLength { .. } => Some(INVALID_LENGTH_CODE),
            Self::GripperOutOfRange { .. } => Some(OUT_OF_RANGE_CODE),
            Self::Transport(TransportError::Rejected { code, .. }) => Some(*code),
            Self::Initialization { source, .. } => source.code(),
            _ => None,
        }
    }

    /// 初始化失败的阶段
    pub fn init_stage(&self) -> Option<InitStage> {
        match self {
            Self::Initialization { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// 包装为初始化失败
    pub fn during(self, stage: InitStage) -> Self {
        Self::Initialization {
            stage,
            source: Box::new(self),
        }
    }

    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<PoseError> for RobotError {
    fn from(err: PoseError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, RobotError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fr5_transport::TransportCall;

    #[test]
    fn test_error_classification() {
        let err = RobotError::InvalidJointLength { actual: 5 };
        assert!(err.is_contract_violation());
        assert!(!err.is_fatal());
        assert_eq!(err.code(), Some(3));

        let err = RobotError::GripperOutOfRange {
            value: 1001,
            min: 0,
            max: 1000,
        };
        assert!(err.is_contract_violation());
        assert_eq!(err.code(), Some(4));

        let err = RobotError::from(TransportError::link("timeout"));
        assert!(err.is_transport_failure());
        assert!(!err.is_contract_violation());
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_initialization_wrapping() {
        let root = RobotError::from(TransportError::Rejected {
            call: TransportCall::MoveCart,
            code: 14,
        });
        let err = root.during(InitStage::SafePose);

        assert!(err.is_fatal());
        assert_eq!(err.init_stage(), Some(InitStage::SafePose));
        assert_eq!(err.code(), Some(14));

        let msg = format!("{}", err);
        assert!(msg.contains("safe pose move"));
        assert!(msg.contains("MoveCart"));
    }

    #[test]
    fn test_pose_error_conversion() {
        let err: RobotError = PoseError::InvalidLength {
            expected: 6,
            actual: 4,
        }
        .into();
        assert!(matches!(err, RobotError::InvalidArgument(_)));
        assert!(format!("{}", err).contains("got 4"));
    }

    #[test]
    fn test_error_display() {
        let msg = format!(
            "{}",
            RobotError::GripperOutOfRange {
                value: -1,
                min: 0,
                max: 1000
            }
        );
        assert!(msg.contains("-1"));
        assert!(msg.contains("[0, 1000]"));

        let msg = format!("{}", RobotError::UnknownErrorCode(9999));
        assert!(msg.contains("9999"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RobotError>();
    }
}
