//! 错误码目录
//!
//! 控制器错误码到描述文本的静态映射。目录资源是一张 TOML 表，键为字符串形式的
//! 整数错误码。默认目录在编译期嵌入，也可以从文件加载替换。
//!
//! 查不到的错误码不是"未知错误"占位，而是数据完整性故障：
//! [`ErrorCatalog::lookup`] 返回 [`RobotError::UnknownErrorCode`]。

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RobotError};

/// 内置目录资源
const BUILTIN_CATALOG: &str = include_str!("../resources/error_codes.toml");

/// 表示"无错误"的错误码
pub const NO_ERROR: i32 = 0;

/// 错误记录：错误码 + 描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// 控制器错误码
    pub code: i32,
    /// 描述文本
    pub description: String,
}

impl ErrorRecord {
    /// 是否表示无错误
    pub fn is_ok(&self) -> bool {
        self.code == NO_ERROR
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)
    }
}

/// 目录资源文件格式
#[derive(Debug, Deserialize)]
struct CatalogFile {
    errors: BTreeMap<String, String>,
}

/// 错误码目录（只读）
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorCatalog {
    entries: BTreeMap<i32, String>,
}

impl ErrorCatalog {
    /// 内置目录
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// 从 TOML 文本解析
    ///
    /// # 错误
    ///
    /// - 键不是整数
    /// - 同一错误码出现多次（如 `"3"` 和 `"03"`）
    /// - 缺少错误码 0
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| RobotError::config(format!("failed to parse error catalog: {}", e)))?;

        let mut entries = BTreeMap::new();
        for (key, description) in file.errors {
            let code = key.trim().parse::<i32>().map_err(|_| {
                RobotError::config(format!("error catalog key {:?} is not an integer code", key))
            })?;
            if entries.insert(code, description).is_some() {
                return Err(RobotError::config(format!(
                    "error catalog defines code {} more than once",
                    code
                )));
            }
        }

        Self::from_entries(entries)
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RobotError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// 从 (错误码, 描述) 构造
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        let entries: BTreeMap<i32, String> = entries
            .into_iter()
            .map(|(code, description)| (code, description.into()))
            .collect();

        // 健康状态本身也要经过目录映射
        if !entries.contains_key(&NO_ERROR) {
            return Err(RobotError::config("error catalog has no entry for code 0"));
        }

        Ok(Self { entries })
    }

    /// 翻译单个错误码
    pub fn lookup(&self, code: i32) -> Result<ErrorRecord> {
        self.entries
            .get(&code)
            .map(|description| ErrorRecord {
                code,
                description: description.clone(),
            })
            .ok_or(RobotError::UnknownErrorCode(code))
    }

    /// 描述文本（不存在时返回 `None`）
    pub fn description(&self, code: i32) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    pub fn contains(&self, code: i32) -> bool {
        self.entries.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按错误码升序遍历
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.entries
            .iter()
            .map(|(code, description)| (*code, description.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ErrorCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.contains(NO_ERROR));
        assert!(catalog.contains(3));
        assert!(catalog.contains(4));
        assert!(catalog.contains(-1));
    }

    #[test]
    fn test_lookup() {
        let catalog = ErrorCatalog::builtin().unwrap();
        let record = catalog.lookup(0).unwrap();
        assert_eq!(record.code, 0);
        assert_eq!(record.description, "No error");
        assert!(record.is_ok());

        let record = catalog.lookup(4).unwrap();
        assert!(!record.is_ok());
        assert_eq!(format!("{}", record), "[4] Interface parameter value out of range");
    }

    #[test]
    fn test_lookup_unknown_code_fails() {
        let catalog = ErrorCatalog::builtin().unwrap();
        let err = catalog.lookup(123_456).unwrap_err();
        assert!(matches!(err, RobotError::UnknownErrorCode(123_456)));
        assert_eq!(catalog.description(123_456), None);
    }

    #[test]
    fn test_reject_non_integer_key() {
        let err = ErrorCatalog::from_toml_str(
            r#"
            [errors]
            "0" = "ok"
            "E12" = "bad key"
            "#,
        )
        .unwrap_err();
        assert!(format!("{}", err).contains("E12"));
    }

    #[test]
    fn test_reject_duplicate_code() {
        let err = ErrorCatalog::from_toml_str(
            r#"
            [errors]
            "0" = "ok"
            "3" = "three"
            "03" = "three again"
            "#,
        )
        .unwrap_err();
        assert!(format!("{}", err).contains("more than once"));
    }

    #[test]
    fn test_reject_missing_zero() {
        let err = ErrorCatalog::from_entries([(1, "one")]).unwrap_err();
        assert!(matches!(err, RobotError::Config(_)));
    }

    #[test]
    fn test_iter_sorted() {
        let catalog = ErrorCatalog::from_entries([(5, "five"), (0, "ok"), (-2, "neg")]).unwrap();
        let codes: Vec<i32> = catalog.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec![-2, 0, 5]);
        assert_eq!(catalog.len(), 3);
    }
}
