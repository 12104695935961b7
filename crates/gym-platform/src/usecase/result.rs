//! Use Case Result Type
//!
//! A sealed result type for use case execution. Success can only be created
//! through the UnitOfWork, ensuring domain events are always emitted.

use super::error::UseCaseError;

/// Result type for use case execution.
///
/// Similar to `Result<T, E>`, but success construction is crate-private:
/// production code can only obtain a `Success` from `UnitOfWork::commit`,
/// which guarantees the aggregate write, the domain event and the audit log
/// land together.
///
/// ```ignore
/// if command.amount <= 0.0 {
///     return UseCaseResult::failure(UseCaseError::validation(
///         "AMOUNT_NOT_POSITIVE",
///         "Payment amount must be greater than zero",
///     ));
/// }
/// self.unit_of_work.commit(&subscription, event, &command).await
/// ```
pub enum UseCaseResult<T> {
    Success(T),
    Failure(UseCaseError),
}

impl<T> UseCaseResult<T> {
    /// Create a failure result. Public - validation and business rule
    /// checks return failures directly.
    pub fn failure(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }

    /// Create a success result. Crate-private on purpose; go through
    /// `UnitOfWork::commit` in production code.
    pub(crate) fn success(value: T) -> Self {
        UseCaseResult::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UseCaseResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UseCaseResult::Failure(_))
    }

    /// Get the success value, consuming self.
    pub fn unwrap(self) -> T {
        match self {
            UseCaseResult::Success(v) => v,
            UseCaseResult::Failure(e) => panic!("Called unwrap on a Failure: {}", e),
        }
    }

    /// Get the error, consuming self.
    pub fn unwrap_err(self) -> UseCaseError {
        match self {
            UseCaseResult::Success(_) => panic!("Called unwrap_err on a Success"),
            UseCaseResult::Failure(e) => e,
        }
    }

    /// Map the success value.
    pub fn map<U, F>(self, f: F) -> UseCaseResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            UseCaseResult::Success(v) => UseCaseResult::Success(f(v)),
            UseCaseResult::Failure(e) => UseCaseResult::Failure(e),
        }
    }

    /// Convert to a standard Result.
    pub fn into_result(self) -> Result<T, UseCaseError> {
        match self {
            UseCaseResult::Success(v) => Ok(v),
            UseCaseResult::Failure(e) => Err(e),
        }
    }
}

impl<T> From<UseCaseResult<T>> for Result<T, UseCaseError> {
    fn from(result: UseCaseResult<T>) -> Self {
        result.into_result()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UseCaseResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCaseResult::Success(v) => f.debug_tuple("Success").field(v).finish(),
            UseCaseResult::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_result() {
        let result: UseCaseResult<i32> = UseCaseResult::success(7);
        assert!(result.is_success());
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn failure_result() {
        let result: UseCaseResult<i32> =
            UseCaseResult::failure(UseCaseError::validation("CODE", "message"));
        assert!(result.is_failure());
        assert_eq!(result.unwrap_err().code(), "CODE");
    }

    #[test]
    fn map_success() {
        let result: UseCaseResult<i32> = UseCaseResult::success(21);
        assert_eq!(result.map(|v| v * 2).unwrap(), 42);
    }

    #[test]
    fn into_std_result() {
        let result: UseCaseResult<i32> = UseCaseResult::success(1);
        let std_result: Result<i32, UseCaseError> = result.into();
        assert_eq!(std_result.unwrap(), 1);
    }
}
