//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use fr5_sdk::prelude::*;
//! ```

// Façade 与配置
pub use fr5_client::{FacadeConfig, InitState, RobotFacade};

// 校验结果
pub use fr5_client::{Advisory, GripperCommand, Validated};

// 错误监控
pub use fr5_client::{ErrorCatalog, ErrorRecord, ErrorReport};

// 传输层
pub use fr5_transport::{CartMove, JointMove, JointVector, Pose, RobotTransport};

// 错误类型
pub use fr5_client::{InitStage, RobotError};
pub use fr5_transport::TransportError;

#[cfg(feature = "mock")]
pub use fr5_transport::{MockTransport, RecordedCall};
