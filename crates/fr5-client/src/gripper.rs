//! 夹爪控制
//!
//! 夹爪位置由工具端模拟量输出通道比例驱动。逻辑指令范围 `[0, 1000]`，
//! 越界指令直接拒绝（返回码 4），不做静默截断，也不会发出任何传输层调用。

use fr5_transport::RobotTransport;
use tracing::{debug, warn};

use crate::config::{FacadeConfig, GripperConfig};
use crate::error::{Result, RobotError};

/// 已通过范围校验的夹爪指令
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GripperCommand(i64);

impl GripperCommand {
    /// 指令值
    pub fn value(&self) -> i64 {
        self.0
    }

    /// 下发到模拟量通道的数值
    pub fn analog_value(&self) -> f64 {
        self.0 as f64
    }
}

/// 夹爪控制器
#[derive(Debug, Clone)]
pub struct GripperController {
    config: GripperConfig,
}

impl GripperController {
    pub fn new(config: GripperConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &FacadeConfig) -> Self {
        Self::new(config.gripper.clone())
    }

    pub fn config(&self) -> &GripperConfig {
        &self.config
    }

    /// 校验指令范围
    ///
    /// # 错误
    ///
    /// - `RobotError::GripperOutOfRange`: 超出 `[min, max]`
    pub fn command(&self, position: i64) -> Result<GripperCommand> {
        if !self.config.in_range(position) {
            warn!("Gripper control value {} is not valid", position);
            return Err(RobotError::GripperOutOfRange {
                value: position,
                min: self.config.min,
                max: self.config.max,
            });
        }
        Ok(GripperCommand(position))
    }

    /// 驱动夹爪到指定位置
    ///
    /// 一次调用对应一次模拟量输出，传输层失败不重试。
    pub fn actuate<T>(&self, transport: &mut T, position: i64) -> Result<GripperCommand>
    where
        T: RobotTransport + ?Sized,
    {
        let command = self.command(position)?;
        debug!(
            "Gripper -> {} (AO channel {})",
            command.value(),
            self.config.channel
        );
        transport.set_analog_output(
            self.config.channel,
            command.analog_value(),
            self.config.enable,
        )?;
        Ok(command)
    }

    /// 张开夹爪
    pub fn open<T>(&self, transport: &mut T) -> Result<GripperCommand>
    where
        T: RobotTransport + ?Sized,
    {
        self.actuate(transport, self.config.open)
    }

    /// 闭合夹爪
    pub fn close<T>(&self, transport: &mut T) -> Result<GripperCommand>
    where
        T: RobotTransport + ?Sized,
    {
        self.actuate(transport, self.config.close)
    }
}

impl Default for GripperController {
    fn default() -> Self {
        Self::new(GripperConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fr5_transport::{MockTransport, RecordedCall, TransportCall, TransportError};

    #[test]
    fn test_actuate_forwards_value() {
        let gripper = GripperController::default();
        let mut transport = MockTransport::new();

        let command = gripper.actuate(&mut transport, 450).unwrap();
        assert_eq!(command.value(), 450);
        assert_eq!(
            transport.calls(),
            vec![RecordedCall::SetAnalogOutput {
                channel: 0,
                value: 450.0,
                enable: 1
            }]
        );
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let gripper = GripperController::default();
        let mut transport = MockTransport::new();

        assert!(gripper.actuate(&mut transport, 0).is_ok());
        assert!(gripper.actuate(&mut transport, 1000).is_ok());
        assert_eq!(transport.analog_values(), vec![0.0, 1000.0]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let gripper = GripperController::default();
        let mut transport = MockTransport::new();

        for position in [-1, 1001, i64::MIN, i64::MAX] {
            let err = gripper.actuate(&mut transport, position).unwrap_err();
            assert!(matches!(err, RobotError::GripperOutOfRange { .. }));
            assert_eq!(err.code(), Some(4));
        }
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_open_close_presets() {
        let gripper = GripperController::default();
        let mut transport = MockTransport::new();

        gripper.open(&mut transport).unwrap();
        gripper.close(&mut transport).unwrap();
        assert_eq!(transport.analog_values(), vec![800.0, 100.0]);
    }

    #[test]
    fn test_transport_failure_surfaced() {
        let gripper = GripperController::default();
        let mut transport = MockTransport::new();
        transport.fail_with(
            TransportCall::SetAnalogOutput,
            TransportError::link("socket closed"),
        );

        let err = gripper.close(&mut transport).unwrap_err();
        assert!(err.is_transport_failure());
        // 不重试
        assert_eq!(transport.count(TransportCall::SetAnalogOutput), 1);
    }
}
