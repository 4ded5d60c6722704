//! Mock 传输层
//!
//! 不连接硬件，记录每一次调用，并可按原语注入失败。
//! `MockTransport` 的克隆共享同一份内部状态，因此把一个克隆交给 façade 后，
//! 测试代码仍可以通过另一个克隆检查调用记录。

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::{
    CartMove, JointMove, JointVector, Pose, RobotTransport, TransportCall, TransportError,
};

/// 一次被观察到的传输层调用（失败的调用同样会被记录）
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    SetToolCoord {
        index: u8,
        offset: Pose,
        tool_type: i32,
        install: i32,
    },
    MoveCart(CartMove),
    MoveJoint(JointMove),
    ForwardKinematics(JointVector),
    SetAnalogOutput {
        channel: u8,
        value: f64,
        enable: i32,
    },
    GetErrorCodes,
    ResetAllErrors,
}

impl RecordedCall {
    /// 对应的原语类型
    pub fn kind(&self) -> TransportCall {
        match self {
            RecordedCall::SetToolCoord { .. } => TransportCall::SetToolCoord,
            RecordedCall::MoveCart(_) => TransportCall::MoveCart,
            RecordedCall::MoveJoint(_) => TransportCall::MoveJoint,
            RecordedCall::ForwardKinematics(_) => TransportCall::ForwardKinematics,
            RecordedCall::SetAnalogOutput { .. } => TransportCall::SetAnalogOutput,
            RecordedCall::GetErrorCodes => TransportCall::GetErrorCodes,
            RecordedCall::ResetAllErrors => TransportCall::ResetAllErrors,
        }
    }
}

/// 模拟控制器状态
#[derive(Debug)]
struct MockState {
    calls: Vec<RecordedCall>,
    failures: HashMap<TransportCall, TransportError>,
    error_codes: Vec<i32>,
    /// 故障原因仍存在时，复位请求不生效
    persistent_fault: bool,
    fk_response: Vec<f64>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            failures: HashMap::new(),
            error_codes: vec![0],
            persistent_fault: false,
            fk_response: vec![0.0, 600.0, 0.0, 300.0, -180.0, 0.0, 90.0],
        }
    }
}

/// 记录调用的传输层测试替身
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// 创建一个所有调用都成功、无错误码的 mock
    pub fn new() -> Self {
        Self::default()
    }

    /// 让指定原语以控制器拒绝（返回码 -1）失败
    pub fn fail_on(&self, call: TransportCall) {
        self.fail_with(call, TransportError::Rejected { call, code: -1 });
    }

    /// 让指定原语返回给定错误
    pub fn fail_with(&self, call: TransportCall, error: TransportError) {
        self.state.lock().failures.insert(call, error);
    }

    /// 取消指定原语的失败注入
    pub fn succeed_on(&self, call: TransportCall) {
        self.state.lock().failures.remove(&call);
    }

    /// 设置控制器报告的错误码序列
    pub fn set_error_codes(&self, codes: Vec<i32>) {
        self.state.lock().error_codes = codes;
    }

    /// 故障原因持续存在：`reset_all_errors` 成功返回但不清除错误码
    pub fn set_persistent_fault(&self, persistent: bool) {
        self.state.lock().persistent_fault = persistent;
    }

    /// 设置正运动学的原始返回值（含首位状态码）
    pub fn set_fk_response(&self, response: Vec<f64>) {
        self.state.lock().fk_response = response;
    }

    /// 已记录的所有调用
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// 已记录调用的原语序列
    pub fn call_kinds(&self) -> Vec<TransportCall> {
        self.state.lock().calls.iter().map(RecordedCall::kind).collect()
    }

    /// 指定原语被调用的次数
    pub fn count(&self, call: TransportCall) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|recorded| recorded.kind() == call)
            .count()
    }

    /// 所有模拟量输出值（按调用顺序）
    pub fn analog_values(&self) -> Vec<f64> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|recorded| match recorded {
                RecordedCall::SetAnalogOutput { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// 清空调用记录
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// 记录调用并检查失败注入
    fn record(&self, call: RecordedCall) -> Result<(), TransportError> {
        let kind = call.kind();
        trace!("mock transport: {}", kind);
        let mut state = self.state.lock();
        state.calls.push(call);
        match state.failures.get(&kind) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl RobotTransport for MockTransport {
    fn set_tool_coord(
        &mut self,
        index: u8,
        offset: &Pose,
        tool_type: i32,
        install: i32,
    ) -> Result<(), TransportError> {
        self.record(RecordedCall::SetToolCoord {
            index,
            offset: *offset,
            tool_type,
            install,
        })
    }

    fn move_cart(&mut self, command: &CartMove) -> Result<(), TransportError> {
        self.record(RecordedCall::MoveCart(*command))
    }

    fn move_joint(&mut self, command: &JointMove) -> Result<(), TransportError> {
        self.record(RecordedCall::MoveJoint(*command))
    }

    fn forward_kinematics(&mut self, joints: &JointVector) -> Result<Vec<f64>, TransportError> {
        self.record(RecordedCall::ForwardKinematics(*joints))?;
        Ok(self.state.lock().fk_response.clone())
    }

    fn set_analog_output(
        &mut self,
        channel: u8,
        value: f64,
        enable: i32,
    ) -> Result<(), TransportError> {
        self.record(RecordedCall::SetAnalogOutput {
            channel,
            value,
            enable,
        })
    }

    fn error_codes(&mut self) -> Result<Vec<i32>, TransportError> {
        self.record(RecordedCall::GetErrorCodes)?;
        Ok(self.state.lock().error_codes.clone())
    }

    fn reset_all_errors(&mut self) -> Result<(), TransportError> {
        self.record(RecordedCall::ResetAllErrors)?;
        let mut state = self.state.lock();
        if !state.persistent_fault {
            let len = state.error_codes.len().max(1);
            state.error_codes = vec![0; len];
        }
        Ok(())
    }
}
