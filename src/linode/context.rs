use crate::common::Error;

/// Linode reports every missing object with this code, whatever its kind.
pub const ERROR_CODE_OBJECT_NOT_FOUND: u32 = 5;

/// The resource a single call addresses. It travels with that call only and
/// is consulted when the call fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationContext {
    Zone(String),
    Record(String),
}

/// Turns Linode's generic "object not found" error into the precise
/// not-found error for the resource in `context`. Anything else, or any
/// error without a context, passes through unchanged.
pub fn disambiguate(err: Error, context: Option<&OperationContext>) -> Error {
    match (err, context) {
        (
            Error::ApiError {
                code: ERROR_CODE_OBJECT_NOT_FOUND,
                ..
            },
            Some(OperationContext::Zone(zone_id)),
        ) => Error::ZoneNotFound {
            zone_id: zone_id.clone(),
        },
        (
            Error::ApiError {
                code: ERROR_CODE_OBJECT_NOT_FOUND,
                ..
            },
            Some(OperationContext::Record(record_id)),
        ) => Error::RecordNotFound {
            record_id: record_id.clone(),
        },
        (err, _) => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> Error {
        Error::ApiError {
            code: ERROR_CODE_OBJECT_NOT_FOUND,
            message: "Object not found".into(),
        }
    }

    #[test]
    fn zone_context_yields_zone_not_found() {
        let context = OperationContext::Zone("z1".into());
        match disambiguate(not_found(), Some(&context)) {
            Error::ZoneNotFound { zone_id } => assert_eq!(zone_id, "z1"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn record_context_yields_record_not_found() {
        let context = OperationContext::Record("r1".into());
        match disambiguate(not_found(), Some(&context)) {
            Error::RecordNotFound { record_id } => assert_eq!(record_id, "r1"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn missing_context_passes_error_through() {
        match disambiguate(not_found(), None) {
            Error::ApiError { code, message } => {
                assert_eq!(code, ERROR_CODE_OBJECT_NOT_FOUND);
                assert_eq!(message, "Object not found");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn other_codes_pass_through_with_context() {
        let context = OperationContext::Zone("z1".into());
        let err = Error::ApiError {
            code: 4,
            message: "Authentication failed".into(),
        };
        assert!(matches!(
            disambiguate(err, Some(&context)),
            Error::ApiError { code: 4, .. }
        ));
    }
}
