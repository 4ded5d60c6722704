//! # Façade 配置
//!
//! 安全阈值、夹爪预设、运动参数和启动参数。默认值即机械臂现场使用的标定值，
//! 配置文件中可以只覆盖部分字段：
//!
//! ```toml
//! [safety]
//! min_z = 180.0
//! clamp_z = 200.0
//!
//! [gripper]
//! open = 800
//! close = 100
//!
//! [init]
//! gripper_length = 13.0
//! safe_pose = [600.0, 0.0, 300.0, -180.0, 0.0, 90.0]
//! ```

use std::fs;
use std::path::Path;

use fr5_transport::{AXIS_COUNT, Pose};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RobotError};

/// 安全高度下限的最小值（mm），配置只能收紧
pub const MIN_Z_FLOOR: f64 = 180.0;

/// 抬升高度的最小值（mm）
pub const CLAMP_Z_FLOOR: f64 = 200.0;

/// 夹爪指令允许的最小下限
pub const GRIPPER_LOWEST: i64 = 0;

/// 夹爪指令允许的最大上限
pub const GRIPPER_HIGHEST: i64 = 1000;

/// Façade 配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// 安全限制
    pub safety: SafetyConfig,
    /// 夹爪设置
    pub gripper: GripperConfig,
    /// 运动指令参数
    pub motion: MotionConfig,
    /// 启动序列参数
    pub init: InitConfig,
}

impl FacadeConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FacadeConfig = toml::from_str(content)
            .map_err(|e| RobotError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RobotError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RobotError::config(format!("failed to serialize config: {}", e)))
    }

    /// 保存配置到文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|e| {
            RobotError::config(format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// 校验配置的一致性
    pub fn validate(&self) -> Result<()> {
        self.safety.validate()?;
        self.gripper.validate()?;
        self.motion.validate()?;
        self.init.validate(&self.safety)?;
        Ok(())
    }
}

/// 安全限制
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// 最低允许高度（mm），低于此值的目标会被抬升
    pub min_z: f64,

    /// 抬升后的高度（mm）
    pub clamp_z: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            min_z: MIN_Z_FLOOR,
            clamp_z: CLAMP_Z_FLOOR,
        }
    }
}

impl SafetyConfig {
    fn validate(&self) -> Result<()> {
        if !self.min_z.is_finite() || !self.clamp_z.is_finite() {
            return Err(RobotError::config("safety heights must be finite"));
        }
        if self.min_z < MIN_Z_FLOOR {
            return Err(RobotError::config(format!(
                "safety.min_z ({}) must not be below {}",
                self.min_z, MIN_Z_FLOOR
            )));
        }
        if self.clamp_z < CLAMP_Z_FLOOR {
            return Err(RobotError::config(format!(
                "safety.clamp_z ({}) must not be below {}",
                self.clamp_z, CLAMP_Z_FLOOR
            )));
        }
        // 抬升目标本身必须是安全高度
        if self.clamp_z < self.min_z {
            return Err(RobotError::config(format!(
                "safety.clamp_z ({}) must not be below safety.min_z ({})",
                self.clamp_z, self.min_z
            )));
        }
        Ok(())
    }
}

/// 夹爪设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperConfig {
    /// 模拟量输出通道
    pub channel: u8,
    /// 输出使能标志
    pub enable: i32,
    /// 张开位置
    pub open: i64,
    /// 闭合位置
    pub close: i64,
    /// 指令下限
    pub min: i64,
    /// 指令上限
    pub max: i64,
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            enable: 1,
            open: 800,
            close: 100,
            min: GRIPPER_LOWEST,
            max: GRIPPER_HIGHEST,
        }
    }
}

impl GripperConfig {
    /// 指令是否在允许范围内
    pub fn in_range(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self) -> Result<()> {
        if self.min < GRIPPER_LOWEST || self.max > GRIPPER_HIGHEST {
            return Err(RobotError::config(format!(
                "gripper range [{}, {}] must stay within [{}, {}]",
                self.min, self.max, GRIPPER_LOWEST, GRIPPER_HIGHEST
            )));
        }
        if self.min > self.max {
            return Err(RobotError::config(format!(
                "gripper.min ({}) must not exceed gripper.max ({})",
                self.min, self.max
            )));
        }
        for (name, value) in [("open", self.open), ("close", self.close)] {
            if !self.in_range(value) {
                return Err(RobotError::config(format!(
                    "gripper.{} ({}) is outside [{}, {}]",
                    name, value, self.min, self.max
                )));
            }
        }
        Ok(())
    }
}

/// 运动指令参数
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// 笛卡尔直线运动
    pub cart: CartMotionConfig,
    /// 关节运动
    pub joint: JointMotionConfig,
}

impl MotionConfig {
    fn validate(&self) -> Result<()> {
        let speeds = [
            ("motion.cart.vel", self.cart.vel),
            ("motion.cart.acc", self.cart.acc),
            ("motion.joint.vel", self.joint.vel),
            ("motion.joint.acc_joint", self.joint.acc_joint),
            ("motion.joint.acc_cart", self.joint.acc_cart),
        ];
        for (name, value) in speeds {
            if !(value.is_finite() && value > 0.0) {
                return Err(RobotError::config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// `MoveCart` 固定参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartMotionConfig {
    pub tool: i32,
    pub user: i32,
    pub vel: f64,
    pub acc: f64,
    pub blend_radius: f64,
    pub override_vel: f64,
    pub mode: i32,
}

impl Default for CartMotionConfig {
    fn default() -> Self {
        Self {
            tool: 1,
            user: 0,
            vel: 100.0,
            acc: 100.0,
            blend_radius: 100.0,
            override_vel: -1.0,
            mode: -1,
        }
    }
}

/// `MoveJ` 固定参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointMotionConfig {
    pub tool: i32,
    pub user: i32,
    pub vel: f64,
    pub acc_joint: f64,
    pub acc_cart: f64,
    pub ext_axis: [f64; 4],
    pub override_vel: f64,
    pub blend: i32,
    pub offset: [f64; AXIS_COUNT],
}

impl Default for JointMotionConfig {
    fn default() -> Self {
        Self {
            tool: 1,
            user: 0,
            vel: 100.0,
            acc_joint: 180.0,
            acc_cart: 100.0,
            ext_axis: [0.0; 4],
            override_vel: -1.0,
            blend: 0,
            offset: [1.0; AXIS_COUNT],
        }
    }
}

/// 启动序列参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitConfig {
    /// 夹爪沿工具 z 轴的长度
    pub gripper_length: f64,
    /// 启动后移动到的安全位姿
    pub safe_pose: [f64; AXIS_COUNT],
    /// `SetToolCoord` 工具类型标志
    pub tool_type: i32,
    /// `SetToolCoord` 安装位置标志
    pub install: i32,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            gripper_length: 13.0,
            safe_pose: [600.0, 0.0, 300.0, -180.0, 0.0, 90.0],
            tool_type: 0,
            install: 0,
        }
    }
}

impl InitConfig {
    /// 夹爪工具坐标系偏移
    pub fn gripper_offset(&self) -> Pose {
        Pose::new(0.0, 0.0, self.gripper_length, 0.0, 0.0, 0.0)
    }

    /// 安全位姿
    pub fn safe_pose(&self) -> Pose {
        Pose::from_array(self.safe_pose)
    }

    fn validate(&self, safety: &SafetyConfig) -> Result<()> {
        if !self.gripper_length.is_finite() {
            return Err(RobotError::config("init.gripper_length must be finite"));
        }
        let pose = self.safe_pose();
        if let Some((index, value)) = pose.first_non_finite() {
            return Err(RobotError::config(format!(
                "init.safe_pose[{}] is not finite: {}",
                index, value
            )));
        }
        if pose.z() < safety.min_z {
            return Err(RobotError::config(format!(
                "init.safe_pose z ({}) is below safety.min_z ({})",
                pose.z(),
                safety.min_z
            )));
        }
        Ok(())
    }
}
