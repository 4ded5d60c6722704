//! RobotFacade - 应用层唯一入口
//!
//! 组合运动校验、夹爪控制和错误监控，独占传输层句柄。
//!
//! # 启动序列
//!
//! 构造时同步执行一次，严格按顺序推进：
//!
//! ```text
//! Unconfigured -> ToolFramesSet -> AtSafePose -> GripperClosed -> Ready
//! ```
//!
//! 1. 工具坐标系 0 设为零偏移，工具坐标系 1 设为夹爪偏移
//! 2. 经过校验的笛卡尔运动到安全位姿
//! 3. 闭合夹爪
//!
//! 任何一步失败都会使构造整体失败（`RobotError::Initialization`），
//! 不存在"初始化了一半"的 façade。
//!
//! # 并发
//!
//! 所有操作都是阻塞调用并需要 `&mut self`。多个调用方共享同一台机械臂时，
//! 必须在外部串行化访问（例如 `Mutex<RobotFacade<T>>`）。
//!
//! # 示例
//!
//! ```rust,ignore
//! use fr5_client::{FacadeConfig, RobotFacade};
//!
//! let transport = connect_controller("192.168.1.10")?;
//! let mut robot = RobotFacade::initialize(transport, FacadeConfig::default())?;
//!
//! robot.move_end([600, 0, 300, -180, 0, 90])?;
//! robot.open_gripper()?;
//!
//! let report = robot.detect_errors()?;
//! if !report.healthy {
//!     let report = robot.recover()?;
//! }
//! ```

use std::fmt;

use fr5_transport::{CartMove, JointMove, Pose, RobotTransport};
use tracing::{debug, error, info, warn};

use crate::catalog::{ErrorCatalog, ErrorRecord};
use crate::config::FacadeConfig;
use crate::error::{InitStage, Result, RobotError};
use crate::gripper::{GripperCommand, GripperController};
use crate::monitor::{ErrorMonitor, ErrorReport};
use crate::motion::{MotionValidator, Validated};

/// 默认工具坐标系（无偏移）
pub const DEFAULT_TOOL_FRAME: u8 = 0;

/// 夹爪工具坐标系
pub const GRIPPER_TOOL_FRAME: u8 = 1;

/// 初始化状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Unconfigured,
    ToolFramesSet,
    AtSafePose,
    GripperClosed,
    Ready,
}

impl fmt::Display for InitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 机械臂控制 façade
#[derive(Debug)]
pub struct RobotFacade<T: RobotTransport> {
    transport: T,
    config: FacadeConfig,
    motion: MotionValidator,
    gripper: GripperController,
    monitor: ErrorMonitor,
    state: InitState,
}

impl<T: RobotTransport> RobotFacade<T> {
    /// 使用默认配置和内置错误码目录初始化
    pub fn new(transport: T) -> Result<Self> {
        Self::initialize(transport, FacadeConfig::default())
    }

    /// 使用给定配置和内置错误码目录初始化
    pub fn initialize(transport: T, config: FacadeConfig) -> Result<Self> {
        let catalog = ErrorCatalog::builtin()?;
        Self::initialize_with_catalog(transport, config, catalog)
    }

    /// 使用给定配置和错误码目录初始化
    ///
    /// `transport` 必须已连接。启动序列的任一步失败都返回
    /// `RobotError::Initialization`，此时机械臂的工作空间未经验证，
    /// 调用方应视其为不可用，而不是静默重试。
    ///
    /// # 错误
    ///
    /// - `RobotError::Config`: 配置不合法（不会发出任何传输层调用）
    /// - `RobotError::Initialization`: 启动序列失败
    pub fn initialize_with_catalog(
        transport: T,
        config: FacadeConfig,
        catalog: ErrorCatalog,
    ) -> Result<Self> {
        config.validate()?;

        let mut facade = Self {
            transport,
            motion: MotionValidator::from_config(&config),
            gripper: GripperController::from_config(&config),
            monitor: ErrorMonitor::new(catalog),
            config,
            state: InitState::Unconfigured,
        };

        info!("Robot initializing..");
        facade
            .configure_tool_frames()
            .map_err(|e| Self::abort(InitStage::ToolFrames, e))?;
        facade.advance(InitState::ToolFramesSet);

        let safe_pose = facade.config.init.safe_pose();
        facade
            .dispatch_cart(safe_pose)
            .map_err(|e| Self::abort(InitStage::SafePose, e))?;
        facade.advance(InitState::AtSafePose);

        facade
            .gripper
            .close(&mut facade.transport)
            .map_err(|e| Self::abort(InitStage::GripperClose, e))?;
        facade.advance(InitState::GripperClosed);

        facade.advance(InitState::Ready);
        info!("Robot initialized.");
        Ok(facade)
    }

    fn advance(&mut self, next: InitState) {
        debug!("Init state {} -> {}", self.state, next);
        self.state = next;
    }

    fn abort(stage: InitStage, err: RobotError) -> RobotError {
        error!("Robot initialization aborted during {}: {}", stage, err);
        err.during(stage)
    }

    fn configure_tool_frames(&mut self) -> Result<()> {
        let init = &self.config.init;
        self.transport.set_tool_coord(
            DEFAULT_TOOL_FRAME,
            &Pose::IDENTITY,
            init.tool_type,
            init.install,
        )?;
        self.transport.set_tool_coord(
            GRIPPER_TOOL_FRAME,
            &init.gripper_offset(),
            init.tool_type,
            init.install,
        )?;
        Ok(())
    }

    fn dispatch_cart(&mut self, pose: Pose) -> Result<Validated<CartMove>> {
        let command = self.motion.cart_move(pose)?;
        debug!("MoveCart -> {}", command.value.pose);
        if let Err(e) = self.transport.move_cart(&command.value) {
            warn!("MoveCart to {} failed: {}", command.value.pose, e);
            return Err(e.into());
        }
        Ok(command)
    }

    /// 当前状态（构造成功后恒为 `Ready`）
    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// 传输层句柄（只读）
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 释放 façade，取回传输层句柄
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// 笛卡尔直线运动到目标位姿
    ///
    /// 目标高度低于安全下限时会被抬升后继续执行，返回值中附带
    /// [`Advisory::HeightClamped`](crate::Advisory::HeightClamped)。
    pub fn move_end(&mut self, pose: impl Into<Pose>) -> Result<Validated<CartMove>> {
        self.dispatch_cart(pose.into())
    }

    /// 关节空间运动
    ///
    /// 长度不是 6 的关节向量在本层被拒绝；正运动学失败时不下发运动。
    pub fn move_joint(&mut self, joints: &[f64]) -> Result<JointMove> {
        let command = self.motion.validate_joint(&mut self.transport, joints)?;
        debug!("MoveJ -> {}", command.joints);
        if let Err(e) = self.transport.move_joint(&command) {
            warn!("MoveJ to {} failed: {}", command.joints, e);
            return Err(e.into());
        }
        Ok(command)
    }

    /// 张开夹爪
    pub fn open_gripper(&mut self) -> Result<GripperCommand> {
        self.gripper.open(&mut self.transport)
    }

    /// 闭合夹爪
    pub fn close_gripper(&mut self) -> Result<GripperCommand> {
        self.gripper.close(&mut self.transport)
    }

    /// 设置夹爪位置 `[0, 1000]`
    pub fn set_gripper(&mut self, position: i64) -> Result<GripperCommand> {
        self.gripper.actuate(&mut self.transport, position)
    }

    /// 查询当前错误
    pub fn detect_errors(&mut self) -> Result<ErrorReport> {
        self.monitor.detect_errors(&mut self.transport)
    }

    /// 翻译单个错误码
    pub fn lookup_error(&self, code: i32) -> Result<ErrorRecord> {
        self.monitor.lookup(code)
    }

    /// 请求清除所有错误（需重新查询确认）
    pub fn clear_errors(&mut self) -> Result<()> {
        self.monitor.clear(&mut self.transport)
    }

    /// 清除错误并重新查询
    pub fn recover(&mut self) -> Result<ErrorReport> {
        self.monitor.recover(&mut self.transport)
    }
}
