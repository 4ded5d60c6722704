//! # FR5 Client
//!
//! FR5 六轴机械臂的安全控制层。
//!
//! 在原始传输层（[`RobotTransport`]）之上提供：
//!
//! - **运动校验** (`motion`): 笛卡尔目标高度下限抬升、关节向量长度检查、
//!   正运动学生成 `MoveJ` 笛卡尔参数
//! - **夹爪控制** (`gripper`): `[0, 1000]` 范围校验后经模拟量输出驱动
//! - **错误监控** (`monitor`): 查询控制器错误码并经目录翻译
//! - **错误码目录** (`catalog`): 内置 / 可替换的错误码描述表
//! - **Façade** (`facade`): 组合以上组件，构造时执行启动序列
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use fr5_client::{FacadeConfig, RobotFacade};
//!
//! let mut robot = RobotFacade::initialize(transport, FacadeConfig::default())?;
//! let outcome = robot.move_end([600, 0, 100, -180, 0, 90])?;
//! assert_eq!(outcome.value.pose.z(), 200.0);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod facade;
pub mod gripper;
pub mod monitor;
pub mod motion;

pub use catalog::{ErrorCatalog, ErrorRecord, NO_ERROR};
pub use config::{
    CLAMP_Z_FLOOR, CartMotionConfig, FacadeConfig, GRIPPER_HIGHEST, GRIPPER_LOWEST, GripperConfig,
    InitConfig, JointMotionConfig, MIN_Z_FLOOR, MotionConfig, SafetyConfig,
};
pub use error::{INVALID_LENGTH_CODE, InitStage, OUT_OF_RANGE_CODE, Result, RobotError};
pub use facade::{DEFAULT_TOOL_FRAME, GRIPPER_TOOL_FRAME, InitState, RobotFacade};
pub use gripper::{GripperCommand, GripperController};
pub use monitor::{ErrorMonitor, ErrorReport};
pub use motion::{Advisory, MotionValidator, Validated};

// 传输层类型（调用方实现 / 构造传输层时使用）
pub use fr5_transport::{
    CartMove, JointMove, JointVector, Pose, PoseError, RobotTransport, TransportCall,
    TransportError,
};

#[cfg(feature = "mock")]
pub use fr5_transport::{MockTransport, RecordedCall};
