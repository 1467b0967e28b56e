//! Response envelope for the (external) HTTP layer.

use serde::Serialize;

/// The `{status, message, data}` envelope the routing layer returns.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let response = ApiResponse::success("Societies fetched", vec![1, 2]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], true);
        assert_eq!(json["message"], "Societies fetched");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn failure_envelope_has_null_data() {
        let response = ApiResponse::<()>::failure("Society not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], false);
        assert!(json["data"].is_null());
    }
}
