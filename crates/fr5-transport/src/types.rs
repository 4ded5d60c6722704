//! 共享数据模型
//!
//! 笛卡尔位姿、关节向量以及运动指令参数。与控制器之间传递的所有数值均为 `f64`，
//! 长度不变量（恰好 6 个分量）由类型本身保证。

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 位姿 / 关节向量的分量个数
pub const AXIS_COUNT: usize = 6;

/// 位姿或关节向量构造失败
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    /// 分量个数不是 6
    #[error("Invalid length: expected {expected} components, got {actual}")]
    InvalidLength {
        /// 期望个数
        expected: usize,
        /// 实际个数
        actual: usize,
    },

    /// 文本分量无法解析为数值
    #[error("Component {index} is not numeric: {token:?}")]
    NonNumeric {
        /// 分量索引
        index: usize,
        /// 原始文本
        token: String,
    },

    /// 分量为 NaN 或无穷大
    #[error("Component {index} is not finite: {value}")]
    NonFinite {
        /// 分量索引
        index: usize,
        /// 实际值
        value: f64,
    },
}

/// 逗号或空白分隔的数值列表
fn parse_components(s: &str) -> Result<Vec<f64>, PoseError> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|_| PoseError::NonNumeric {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}

fn to_fixed(values: &[f64]) -> Result<[f64; AXIS_COUNT], PoseError> {
    <[f64; AXIS_COUNT]>::try_from(values).map_err(|_| PoseError::InvalidLength {
        expected: AXIS_COUNT,
        actual: values.len(),
    })
}

fn first_non_finite(values: &[f64; AXIS_COUNT]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .find(|(_, value)| !value.is_finite())
}

/// 笛卡尔位姿 `[x, y, z, rx, ry, rz]`
///
/// 位置单位为毫米，姿态单位为度（机器人基坐标系）。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose([f64; AXIS_COUNT]);

impl Pose {
    /// 零偏移（单位变换）
    pub const IDENTITY: Self = Pose([0.0; AXIS_COUNT]);

    /// 按分量创建位姿
    pub const fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Pose([x, y, z, rx, ry, rz])
    }

    /// 从定长数组创建
    pub const fn from_array(values: [f64; AXIS_COUNT]) -> Self {
        Pose(values)
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }

    pub fn rx(&self) -> f64 {
        self.0[3]
    }

    pub fn ry(&self) -> f64 {
        self.0[4]
    }

    pub fn rz(&self) -> f64 {
        self.0[5]
    }

    /// 替换 z 分量，其余分量不变
    pub fn with_z(mut self, z: f64) -> Self {
        self.0[2] = z;
        self
    }

    pub fn as_array(&self) -> &[f64; AXIS_COUNT] {
        &self.0
    }

    pub fn to_array(self) -> [f64; AXIS_COUNT] {
        self.0
    }

    /// 第一个非有限分量（NaN / ±inf）
    pub fn first_non_finite(&self) -> Option<(usize, f64)> {
        first_non_finite(&self.0)
    }
}

impl From<[f64; AXIS_COUNT]> for Pose {
    fn from(values: [f64; AXIS_COUNT]) -> Self {
        Pose(values)
    }
}

/// 整数分量按 `f64` 强制转换，便于书写 `[600, 0, 300, -180, 0, 90]`
impl From<[i32; AXIS_COUNT]> for Pose {
    fn from(values: [i32; AXIS_COUNT]) -> Self {
        Pose(values.map(f64::from))
    }
}

impl TryFrom<&[f64]> for Pose {
    type Error = PoseError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        to_fixed(values).map(Pose)
    }
}

impl FromStr for Pose {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = to_fixed(&parse_components(s)?)?;
        if let Some((index, value)) = first_non_finite(&values) {
            return Err(PoseError::NonFinite { index, value });
        }
        Ok(Pose(values))
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, rx, ry, rz] = self.0;
        write!(
            f,
            "[{:.3}, {:.3}, {:.3}, {:.3}, {:.3}, {:.3}]",
            x, y, z, rx, ry, rz
        )
    }
}

/// 关节向量（6 个关节角，单位：度）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointVector([f64; AXIS_COUNT]);

impl JointVector {
    /// 全零关节角
    pub const ZERO: Self = JointVector([0.0; AXIS_COUNT]);

    pub const fn from_array(values: [f64; AXIS_COUNT]) -> Self {
        JointVector(values)
    }

    pub fn as_array(&self) -> &[f64; AXIS_COUNT] {
        &self.0
    }

    pub fn to_array(self) -> [f64; AXIS_COUNT] {
        self.0
    }

    pub fn first_non_finite(&self) -> Option<(usize, f64)> {
        first_non_finite(&self.0)
    }
}

impl From<[f64; AXIS_COUNT]> for JointVector {
    fn from(values: [f64; AXIS_COUNT]) -> Self {
        JointVector(values)
    }
}

impl TryFrom<&[f64]> for JointVector {
    type Error = PoseError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        to_fixed(values).map(JointVector)
    }
}

impl fmt::Display for JointVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [j1, j2, j3, j4, j5, j6] = self.0;
        write!(
            f,
            "[{:.3}, {:.3}, {:.3}, {:.3}, {:.3}, {:.3}]",
            j1, j2, j3, j4, j5, j6
        )
    }
}

/// 解析任意长度的数值列表
///
/// 关节指令的长度检查属于上层的契约校验，这里只负责数值转换。
pub fn parse_values(s: &str) -> Result<Vec<f64>, PoseError> {
    parse_components(s)
}

/// 笛卡尔空间直线运动指令（`MoveCart`）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CartMove {
    /// 目标位姿（已通过安全校验）
    pub pose: Pose,
    /// 工具坐标系编号
    pub tool: i32,
    /// 工件（用户）坐标系编号
    pub user: i32,
    /// 速度百分比
    pub vel: f64,
    /// 加速度百分比
    pub acc: f64,
    /// 过渡半径
    pub blend_radius: f64,
    /// 速度覆盖，-1.0 表示不覆盖
    pub override_vel: f64,
    /// 关节空间构型，-1 表示由控制器求解
    pub mode: i32,
}

/// 关节空间运动指令（`MoveJ`）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointMove {
    /// 目标关节角
    pub joints: JointVector,
    /// 目标关节角对应的笛卡尔位姿（正运动学结果）
    pub cart_hint: Pose,
    pub tool: i32,
    pub user: i32,
    pub vel: f64,
    /// 关节加速度百分比
    pub acc_joint: f64,
    /// 笛卡尔加速度百分比
    pub acc_cart: f64,
    /// 外部轴位置
    pub ext_axis: [f64; 4],
    pub override_vel: f64,
    /// 平滑过渡标志，0 表示阻塞到位
    pub blend: i32,
    /// 位姿偏移
    pub offset: [f64; AXIS_COUNT],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_accessors() {
        let pose = Pose::new(600.0, 0.0, 300.0, -180.0, 0.0, 90.0);
        assert_eq!(pose.x(), 600.0);
        assert_eq!(pose.y(), 0.0);
        assert_eq!(pose.z(), 300.0);
        assert_eq!(pose.rx(), -180.0);
        assert_eq!(pose.ry(), 0.0);
        assert_eq!(pose.rz(), 90.0);
    }

    #[test]
    fn test_pose_from_integers() {
        let pose = Pose::from([600, 0, 300, -180, 0, 90]);
        assert_eq!(pose, Pose::new(600.0, 0.0, 300.0, -180.0, 0.0, 90.0));
    }

    #[test]
    fn test_with_z_leaves_other_components() {
        let pose = Pose::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0).with_z(200.0);
        assert_eq!(pose.to_array(), [1.0, 2.0, 200.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_pose_try_from_slice() {
        let ok = Pose::try_from(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0][..]);
        assert!(ok.is_ok());

        let short = Pose::try_from(&[1.0, 2.0, 3.0][..]);
        assert_eq!(
            short,
            Err(PoseError::InvalidLength {
                expected: 6,
                actual: 3
            })
        );
    }

    #[test]
    fn test_pose_parse() {
        let pose: Pose = "600, 0, 300, -180, 0, 90".parse().unwrap();
        assert_eq!(pose.z(), 300.0);

        let pose: Pose = "600 0 300 -180 0 90".parse().unwrap();
        assert_eq!(pose.rz(), 90.0);
    }

    #[test]
    fn test_pose_parse_non_numeric() {
        let err = "600,0,abc,-180,0,90".parse::<Pose>().unwrap_err();
        assert_eq!(
            err,
            PoseError::NonNumeric {
                index: 2,
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_pose_parse_non_finite() {
        let err = "600,0,NaN,-180,0,90".parse::<Pose>().unwrap_err();
        assert!(matches!(err, PoseError::NonFinite { index: 2, .. }));
    }

    #[test]
    fn test_first_non_finite() {
        let pose = Pose::new(0.0, f64::INFINITY, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(pose.first_non_finite(), Some((1, f64::INFINITY)));
        assert_eq!(Pose::IDENTITY.first_non_finite(), None);
    }

    #[test]
    fn test_parse_values_any_length() {
        assert_eq!(parse_values("1,2,3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(parse_values("").unwrap().is_empty());
    }

    #[test]
    fn test_joint_vector_try_from() {
        let joints = JointVector::try_from(&[0.0; 6][..]).unwrap();
        assert_eq!(joints, JointVector::ZERO);

        let err = JointVector::try_from(&[0.0; 7][..]).unwrap_err();
        assert!(matches!(err, PoseError::InvalidLength { actual: 7, .. }));
    }

    #[test]
    fn test_display() {
        let pose = Pose::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(
            format!("{}", pose),
            "[1.000, 2.000, 3.000, 4.000, 5.000, 6.000]"
        );
    }
}
