//! 响应校验模块 - 检查远端响应的整体形状
//!
//! 只校验外层结构，不解读单条记录的内容（那是 status 模块的职责）。

use serde_json::Value;

use crate::error::MonitorError;

/// 校验通过的一次轮询响应
#[derive(Debug, Clone)]
pub struct ValidatedResponse {
    /// 原样保留的记录序列（旧的在前）
    pub homeworks: Vec<Value>,
    /// 下一次轮询的游标值
    pub current_date: i64,
}

/// 校验原始响应的形状
///
/// 要求：响应是 JSON 对象，`homeworks` 存在且是数组，
/// `current_date` 存在且是整数（否则没法喂给下一次 `from_date`）。
pub fn validate(raw: &Value) -> Result<ValidatedResponse, MonitorError> {
    let map = raw
        .as_object()
        .ok_or_else(|| MonitorError::ShapeInvalid("response is not a JSON object".to_string()))?;

    let homeworks = map
        .get("homeworks")
        .ok_or_else(|| MonitorError::ShapeInvalid("`homeworks` key is missing".to_string()))?;
    let current_date = map
        .get("current_date")
        .ok_or_else(|| MonitorError::ShapeInvalid("`current_date` key is missing".to_string()))?;

    let homeworks = homeworks
        .as_array()
        .ok_or_else(|| MonitorError::ShapeInvalid("`homeworks` is not an array".to_string()))?;
    let current_date = current_date
        .as_i64()
        .ok_or_else(|| MonitorError::ShapeInvalid("`current_date` is not an integer".to_string()))?;

    Ok(ValidatedResponse {
        homeworks: homeworks.clone(),
        current_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use serde_json::json;

    #[test]
    fn test_valid_response_passes_through() {
        let raw = json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        });
        let validated = validate(&raw).unwrap();

        assert_eq!(validated.homeworks.len(), 1);
        assert_eq!(validated.current_date, 1000);
        // 记录内容原样保留，不做解读
        assert_eq!(validated.homeworks[0]["status"], "approved");
    }

    #[test]
    fn test_empty_homeworks_is_valid() {
        let raw = json!({"homeworks": [], "current_date": 1000});
        let validated = validate(&raw).unwrap();
        assert!(validated.homeworks.is_empty());
    }

    #[test]
    fn test_non_object_is_shape_error() {
        for raw in [json!([1, 2, 3]), json!("text"), json!(42), json!(null)] {
            let err = validate(&raw).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::ShapeInvalid);
        }
    }

    #[test]
    fn test_missing_homeworks_is_shape_error() {
        let raw = json!({"current_date": 1000});
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ShapeInvalid);
    }

    #[test]
    fn test_missing_current_date_is_shape_error() {
        let raw = json!({"homeworks": []});
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ShapeInvalid);
    }

    #[test]
    fn test_homeworks_not_array_is_shape_error() {
        let raw = json!({"homeworks": {"hw1": "approved"}, "current_date": 1000});
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ShapeInvalid);
    }

    #[test]
    fn test_non_integer_cursor_is_shape_error() {
        let raw = json!({"homeworks": [], "current_date": "1000"});
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ShapeInvalid);
    }
}
