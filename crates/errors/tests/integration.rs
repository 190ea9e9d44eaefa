//! Integration tests for error types

#[cfg(test)]
mod tests {
    use safeprune_errors::*;

    #[test]
    fn test_error_conversion() {
        let remote_err = RemoteError::Timeout {
            operation: "search".into(),
            timeout_secs: 30,
        };
        let err: Error = remote_err.into();
        assert!(matches!(err, Error::Remote(_)));
        assert!(err.is_timeout());
    }

    #[test]
    fn test_error_display() {
        let err = RemoteError::CommandFailed {
            operation: "search".into(),
            stderr: "HTTP 401".into(),
        };
        assert_eq!(err.to_string(), "search failed: HTTP 401");
    }

    #[test]
    fn test_report_error_is_distinct_and_not_retryable() {
        let err: Error = ReportError::WriteFailed {
            artifact: "cleanup report".into(),
            path: "/readonly/log.json".into(),
            message: "permission denied".into(),
        }
        .into();
        assert!(matches!(err, Error::Report(_)));
        assert!(!err.is_retryable());
        assert_eq!(err.user_code(), Some("report.write_failed"));
        assert!(err.user_hint().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_platform_timeout_counts_as_timeout() {
        let err: Error = PlatformError::ProcessTimedOut {
            command: "gh".into(),
            timeout_secs: 5,
        }
        .into();
        assert!(err.is_timeout());
        assert_eq!(err.user_code(), Some("platform.process_timeout"));
    }
}
