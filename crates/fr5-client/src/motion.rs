//! 运动指令校验
//!
//! 在指令下发前做两件事：
//!
//! - **高度保护**: 笛卡尔目标 z 低于安全下限时抬升到安全高度（不报错，附带提示）
//! - **关节数校验**: 关节向量长度必须为 6，否则就地拒绝，不触达传输层
//!
//! 控制器固件不会拒绝过低的目标高度，这里是唯一防止向下碰撞工作台的地方。

use std::fmt;

use fr5_transport::{AXIS_COUNT, CartMove, JointMove, JointVector, Pose, RobotTransport};
use tracing::{debug, warn};

use crate::config::{CartMotionConfig, FacadeConfig, JointMotionConfig, SafetyConfig};
use crate::error::{Result, RobotError};

/// 非致命的校验提示，与调整后的结果一起返回
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    /// 目标高度低于安全下限，已抬升
    HeightClamped {
        /// 请求的 z（mm）
        requested: f64,
        /// 实际下发的 z（mm）
        applied: f64,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::HeightClamped { requested, applied } => write!(
                f,
                "target z {:.3} mm is below the safety floor, raised to {:.3} mm",
                requested, applied
            ),
        }
    }
}

/// 校验后的值及其提示
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    /// 可以安全下发的值
    pub value: T,
    /// 校验过程中产生的提示
    pub advisories: Vec<Advisory>,
}

impl<T> Validated<T> {
    fn unchanged(value: T) -> Self {
        Self {
            value,
            advisories: Vec::new(),
        }
    }

    /// 值是否被校验调整过
    pub fn is_adjusted(&self) -> bool {
        !self.advisories.is_empty()
    }

    /// 转换值，保留提示
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        Validated {
            value: f(self.value),
            advisories: self.advisories,
        }
    }
}

/// 运动指令校验器
#[derive(Debug, Clone)]
pub struct MotionValidator {
    safety: SafetyConfig,
    cart: CartMotionConfig,
    joint: JointMotionConfig,
}

impl MotionValidator {
    pub fn new(safety: SafetyConfig, cart: CartMotionConfig, joint: JointMotionConfig) -> Self {
        Self {
            safety,
            cart,
            joint,
        }
    }

    pub fn from_config(config: &FacadeConfig) -> Self {
        Self::new(
            config.safety.clone(),
            config.motion.cart.clone(),
            config.motion.joint.clone(),
        )
    }

    /// 安全限制
    pub fn safety(&self) -> &SafetyConfig {
        &self.safety
    }

    /// 校验笛卡尔目标
    ///
    /// `z < min_z` 时把 z 改写为 `clamp_z`，其余分量保持不变；
    /// `z >= min_z` 时原样返回。
    ///
    /// # 错误
    ///
    /// - `RobotError::InvalidArgument`: 任一分量为 NaN 或无穷大
    pub fn validate_cartesian(&self, pose: Pose) -> Result<Validated<Pose>> {
        if let Some((index, value)) = pose.first_non_finite() {
            warn!("Rejected cartesian target {}: component {} is {}", pose, index, value);
            return Err(RobotError::InvalidArgument(format!(
                "pose component {} is not finite: {}",
                index, value
            )));
        }

        if pose.z() < self.safety.min_z {
            let advisory = Advisory::HeightClamped {
                requested: pose.z(),
                applied: self.safety.clamp_z,
            };
            warn!("Robot z value {} is dangerous: {}", pose.z(), advisory);
            return Ok(Validated {
                value: pose.with_z(self.safety.clamp_z),
                advisories: vec![advisory],
            });
        }

        Ok(Validated::unchanged(pose))
    }

    /// 校验笛卡尔目标并组装 `MoveCart` 指令
    pub fn cart_move(&self, pose: Pose) -> Result<Validated<CartMove>> {
        let cart = &self.cart;
        Ok(self.validate_cartesian(pose)?.map(|pose| CartMove {
            pose,
            tool: cart.tool,
            user: cart.user,
            vel: cart.vel,
            acc: cart.acc,
            blend_radius: cart.blend_radius,
            override_vel: cart.override_vel,
            mode: cart.mode,
        }))
    }

    /// 校验关节目标并组装 `MoveJ` 指令
    ///
    /// 长度不为 6 时直接拒绝，不调用传输层。长度合法时通过正运动学计算
    /// 目标位姿作为 `MoveJ` 的笛卡尔参数。
    ///
    /// # 错误
    ///
    /// - `RobotError::InvalidJointLength`: 长度不是 6
    /// - `RobotError::InvalidArgument`: 关节角为 NaN 或无穷大
    /// - `RobotError::Transport`: 正运动学调用失败
    /// - `RobotError::Kinematics`: 正运动学状态码非零或结果不完整
    pub fn validate_joint<T>(&self, transport: &mut T, joints: &[f64]) -> Result<JointMove>
    where
        T: RobotTransport + ?Sized,
    {
        let joints = JointVector::try_from(joints).map_err(|_| {
            warn!("Joint vector {:?} has invalid length {}", joints, joints.len());
            RobotError::InvalidJointLength {
                actual: joints.len(),
            }
        })?;

        if let Some((index, value)) = joints.first_non_finite() {
            return Err(RobotError::InvalidArgument(format!(
                "joint {} is not finite: {}",
                index + 1,
                value
            )));
        }

        let raw = transport.forward_kinematics(&joints)?;
        let cart_hint = Self::cart_hint(&raw)?;
        debug!("Forward kinematics {} -> {}", joints, cart_hint);

        let joint = &self.joint;
        Ok(JointMove {
            joints,
            cart_hint,
            tool: joint.tool,
            user: joint.user,
            vel: joint.vel,
            acc_joint: joint.acc_joint,
            acc_cart: joint.acc_cart,
            ext_axis: joint.ext_axis,
            override_vel: joint.override_vel,
            blend: joint.blend,
            offset: joint.offset,
        })
    }

    /// 解析正运动学原始返回：首位为状态码，其后 6 个分量为位姿
    fn cart_hint(raw: &[f64]) -> Result<Pose> {
        let (status, values) = raw
            .split_first()
            .ok_or_else(|| RobotError::Kinematics("empty response".to_string()))?;

        if *status != 0.0 {
            return Err(RobotError::Kinematics(format!(
                "controller reported status {}",
                status
            )));
        }

        if values.len() < AXIS_COUNT {
            return Err(RobotError::Kinematics(format!(
                "expected {} pose components, got {}",
                AXIS_COUNT,
                values.len()
            )));
        }

        let pose = Pose::try_from(&values[..AXIS_COUNT])?;
        if let Some((index, value)) = pose.first_non_finite() {
            return Err(RobotError::Kinematics(format!(
                "pose component {} is not finite: {}",
                index, value
            )));
        }
        Ok(pose)
    }
}

impl Default for MotionValidator {
    fn default() -> Self {
        Self::from_config(&FacadeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fr5_transport::{MockTransport, TransportCall};

    #[test]
    fn test_low_z_is_clamped() {
        let validator = MotionValidator::default();
        let pose = Pose::new(600.0, 10.0, 50.0, -180.0, 0.0, 90.0);

        let validated = validator.validate_cartesian(pose).unwrap();
        assert_eq!(
            validated.value,
            Pose::new(600.0, 10.0, 200.0, -180.0, 0.0, 90.0)
        );
        assert!(validated.is_adjusted());
        assert_eq!(
            validated.advisories,
            vec![Advisory::HeightClamped {
                requested: 50.0,
                applied: 200.0
            }]
        );
    }

    #[test]
    fn test_boundary_is_safe() {
        let validator = MotionValidator::default();
        let pose = Pose::new(600.0, 0.0, 180.0, -180.0, 0.0, 90.0);

        let validated = validator.validate_cartesian(pose).unwrap();
        assert_eq!(validated.value, pose);
        assert!(!validated.is_adjusted());
    }

    #[test]
    fn test_non_finite_pose_rejected() {
        let validator = MotionValidator::default();
        let pose = Pose::new(600.0, f64::NAN, 300.0, -180.0, 0.0, 90.0);

        let err = validator.validate_cartesian(pose).unwrap_err();
        assert!(matches!(err, RobotError::InvalidArgument(_)));
    }

    #[test]
    fn test_cart_move_parameters() {
        let validator = MotionValidator::default();
        let validated = validator
            .cart_move(Pose::from([600, 0, 100, -180, 0, 90]))
            .unwrap();

        let command = validated.value;
        assert_eq!(command.pose.z(), 200.0);
        assert_eq!(command.tool, 1);
        assert_eq!(command.user, 0);
        assert_eq!(command.vel, 100.0);
        assert_eq!(command.acc, 100.0);
        assert_eq!(command.blend_radius, 100.0);
        assert_eq!(command.override_vel, -1.0);
        assert_eq!(command.mode, -1);
        assert_eq!(validated.advisories.len(), 1);
    }

    #[test]
    fn test_joint_length_rejected_without_transport() {
        let validator = MotionValidator::default();
        let mut transport = MockTransport::new();

        let err = validator
            .validate_joint(&mut transport, &[0.0, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, RobotError::InvalidJointLength { actual: 3 }));
        assert_eq!(err.code(), Some(3));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_joint_move_uses_forward_kinematics() {
        let validator = MotionValidator::default();
        let mut transport = MockTransport::new();
        transport.set_fk_response(vec![0.0, 400.0, 50.0, 350.0, 180.0, 0.0, 45.0]);

        let command = validator
            .validate_joint(&mut transport, &[10.0, -90.0, 90.0, -90.0, -90.0, 0.0])
            .unwrap();

        assert_eq!(
            command.cart_hint,
            Pose::new(400.0, 50.0, 350.0, 180.0, 0.0, 45.0)
        );
        assert_eq!(command.acc_joint, 180.0);
        assert_eq!(command.acc_cart, 100.0);
        assert_eq!(command.ext_axis, [0.0; 4]);
        assert_eq!(command.offset, [1.0; 6]);
        assert_eq!(command.blend, 0);
        assert_eq!(transport.call_kinds(), vec![TransportCall::ForwardKinematics]);
    }

    #[test]
    fn test_forward_kinematics_status_checked() {
        let validator = MotionValidator::default();
        let mut transport = MockTransport::new();
        transport.set_fk_response(vec![34.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        let err = validator
            .validate_joint(&mut transport, &[0.0; 6])
            .unwrap_err();
        assert!(matches!(err, RobotError::Kinematics(_)));
        assert!(format!("{}", err).contains("34"));
    }

    #[test]
    fn test_forward_kinematics_short_response() {
        let validator = MotionValidator::default();
        let mut transport = MockTransport::new();
        transport.set_fk_response(vec![0.0, 1.0, 2.0]);

        let err = validator
            .validate_joint(&mut transport, &[0.0; 6])
            .unwrap_err();
        assert!(matches!(err, RobotError::Kinematics(_)));

        transport.set_fk_response(Vec::new());
        let err = validator
            .validate_joint(&mut transport, &[0.0; 6])
            .unwrap_err();
        assert!(matches!(err, RobotError::Kinematics(_)));
    }

    #[test]
    fn test_forward_kinematics_transport_failure() {
        let validator = MotionValidator::default();
        let mut transport = MockTransport::new();
        transport.fail_on(TransportCall::ForwardKinematics);

        let err = validator
            .validate_joint(&mut transport, &[0.0; 6])
            .unwrap_err();
        assert!(err.is_transport_failure());
    }

    #[test]
    fn test_non_finite_joint_rejected() {
        let validator = MotionValidator::default();
        let mut transport = MockTransport::new();

        let err = validator
            .validate_joint(&mut transport, &[0.0, 0.0, f64::INFINITY, 0.0, 0.0, 0.0])
            .unwrap_err();
        assert!(err.is_contract_violation());
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_custom_safety_floor() {
        let mut config = FacadeConfig::default();
        config.safety.min_z = 250.0;
        config.safety.clamp_z = 260.0;
        let validator = MotionValidator::from_config(&config);

        let validated = validator
            .validate_cartesian(Pose::new(0.0, 0.0, 240.0, 0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(validated.value.z(), 260.0);
    }
}
