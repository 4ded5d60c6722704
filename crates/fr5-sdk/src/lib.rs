//! FR5 SDK - 法奥 FR5 机械臂 Rust SDK
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **传输层** (`fr5-transport`): 控制器 RPC 原语抽象与数据类型
//! - **客户端层** (`fr5-client`): 运动校验、夹爪控制、错误监控和 façade
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use fr5_sdk::prelude::*;
//!
//! fr5_sdk::init_logging();
//! let mut robot = RobotFacade::new(transport)?;
//! robot.move_joint(&[0.0, -90.0, 90.0, -90.0, -90.0, 0.0])?;
//! ```

use tracing_subscriber::EnvFilter;

pub mod prelude;

pub use fr5_client as client;
pub use fr5_transport as transport;

pub use fr5_client::{
    Advisory, ErrorCatalog, ErrorRecord, ErrorReport, FacadeConfig, InitState, Result, RobotError,
    RobotFacade, Validated,
};
pub use fr5_transport::{Pose, RobotTransport, TransportError};

/// 未设置 `RUST_LOG` 时使用的日志过滤规则
pub const DEFAULT_LOG_FILTER: &str = "fr5=info";

/// 初始化日志输出
///
/// 优先读取 `RUST_LOG`，否则使用 [`DEFAULT_LOG_FILTER`]。重复调用无副作用。
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
