//! 错误监控
//!
//! 查询控制器错误码并经目录翻译为 [`ErrorRecord`]。记录顺序与控制器返回顺序一致。

use std::fmt;

use fr5_transport::RobotTransport;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{ErrorCatalog, ErrorRecord};
use crate::error::Result;

/// 一次错误查询的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// 所有错误码均为 0
    pub healthy: bool,
    /// 每个错误码对应一条记录（包括 0）
    pub records: Vec<ErrorRecord>,
}

impl ErrorReport {
    /// 由记录构造，健康状态由记录推导
    pub fn from_records(records: Vec<ErrorRecord>) -> Self {
        let healthy = records.iter().all(ErrorRecord::is_ok);
        Self { healthy, records }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// 非零记录（硬件故障）
    pub fn faults(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter().filter(|record| !record.is_ok())
    }

    /// 原始错误码序列
    pub fn codes(&self) -> Vec<i32> {
        self.records.iter().map(|record| record.code).collect()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.healthy {
            return write!(f, "healthy");
        }
        let faults: Vec<String> = self.faults().map(ToString::to_string).collect();
        write!(f, "faulted: {}", faults.join(", "))
    }
}

/// 错误监控器
#[derive(Debug, Clone)]
pub struct ErrorMonitor {
    catalog: ErrorCatalog,
}

impl ErrorMonitor {
    pub fn new(catalog: ErrorCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// 查询并翻译当前错误码
    ///
    /// # 错误
    ///
    /// - `RobotError::Transport`: 查询失败
    /// - `RobotError::UnknownErrorCode`: 控制器上报了目录中不存在的错误码
    pub fn detect_errors<T>(&self, transport: &mut T) -> Result<ErrorReport>
    where
        T: RobotTransport + ?Sized,
    {
        let codes = transport.error_codes()?;
        debug!("Controller error codes: {:?}", codes);

        let records = codes
            .into_iter()
            .map(|code| self.catalog.lookup(code))
            .collect::<Result<Vec<_>>>()?;

        let report = ErrorReport::from_records(records);
        if !report.healthy {
            warn!("Robot reports errors: {}", report);
        }
        Ok(report)
    }

    /// 翻译单个错误码
    pub fn lookup(&self, code: i32) -> Result<ErrorRecord> {
        self.catalog.lookup(code)
    }

    /// 请求清除所有错误
    ///
    /// 这只是请求：故障的物理原因仍存在时错误不会消失，
    /// 需要再次调用 [`detect_errors`](Self::detect_errors) 确认。
    pub fn clear<T>(&self, transport: &mut T) -> Result<()>
    where
        T: RobotTransport + ?Sized,
    {
        transport.reset_all_errors()?;
        info!("Requested reset of all robot errors");
        Ok(())
    }

    /// 清除错误并重新查询
    pub fn recover<T>(&self, transport: &mut T) -> Result<ErrorReport>
    where
        T: RobotTransport + ?Sized,
    {
        self.clear(transport)?;
        let report = self.detect_errors(transport)?;
        if report.healthy {
            info!("Robot errors cleared");
        }
        Ok(report)
    }
}
