use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Uniform success/error envelope returned by every gateway call.
///
/// Serializes as `{"success":true,"data":...}` (with `data` omitted when
/// absent) or `{"success":false,"error":"..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success { data: Option<T> },
    Failure { error: String },
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self::Success { data: Some(data) }
    }

    /// Success with no meaningful payload (e.g. delete).
    pub fn done() -> Self {
        Self::Success { data: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => data.as_ref(),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data } => data,
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success { .. } => None,
        }
    }

    /// Convert to a `Result`, for `?` in callers that want to bail out.
    pub fn into_result(self) -> Result<Option<T>, String> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { error } => Err(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Success { data } => ApiResult::Success { data: data.map(f) },
            Self::Failure { error } => ApiResult::Failure { error },
        }
    }
}

impl<T: Serialize> Serialize for ApiResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { data: Some(data) } => {
                let mut s = serializer.serialize_struct("ApiResult", 2)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("data", data)?;
                s.end()
            }
            Self::Success { data: None } => {
                let mut s = serializer.serialize_struct("ApiResult", 1)?;
                s.serialize_field("success", &true)?;
                s.end()
            }
            Self::Failure { error } => {
                let mut s = serializer.serialize_struct("ApiResult", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_tagged_shape() {
        assert_eq!(
            serde_json::to_value(ApiResult::ok(vec![1, 2])).unwrap(),
            json!({ "success": true, "data": [1, 2] })
        );
        assert_eq!(
            serde_json::to_value(ApiResult::<()>::done()).unwrap(),
            json!({ "success": true })
        );
        assert_eq!(
            serde_json::to_value(ApiResult::<()>::failure("Sensor not found")).unwrap(),
            json!({ "success": false, "error": "Sensor not found" })
        );
    }

    #[test]
    fn accessors() {
        let r = ApiResult::ok(3).map(|n| n * 2);
        assert!(r.is_success());
        assert_eq!(r.data(), Some(&6));
        assert_eq!(r.error(), None);

        let f: ApiResult<i32> = ApiResult::failure("nope");
        assert_eq!(f.error(), Some("nope"));
        assert_eq!(f.into_result(), Err("nope".to_owned()));
    }
}
