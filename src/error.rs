use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
        }
    }
}

impl std::error::Error for Error {}
impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} : {}", self.kind, self.context)
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, Serialize, Deserialize,
)]
pub enum ErrorKind {
    /// api error
    #[error("Not Found")]
    NotFound,
    #[error("Rate limited")]
    RateLimit,
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Permission Denied")]
    PermissionDenied,

    /// runtime error
    #[error("Network Error")]
    Network,
    #[error("Browser Error")]
    Browser,
    #[error("Internal Error")]
    Internal,
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: String::new(),
        }
    }
}

pub trait Context {
    type Output;
    fn context(self, c: impl AsRef<str>) -> Self::Output;
}

impl<E> Context for E
where
    E: Into<Error>,
{
    type Output = Error;

    fn context(self, c: impl AsRef<str>) -> Self::Output {
        let mut err: Error = self.into();
        if !err.context.is_empty() {
            err.context.push_str("\n  >");
        }
        err.context.push_str(c.as_ref());
        err
    }
}

impl<T, E> Context for Result<T, E>
where
    E: Into<Error>,
{
    type Output = Result<T>;

    fn context(self, c: impl AsRef<str>) -> Self::Output {
        self.map_err(|err| err.into().context(c))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn context_chain() {
        let err = ErrorKind::NotFound.context("contest 3");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.context, "contest 3");

        let err = err.context("while loading rounds");
        assert_eq!(err.context, "contest 3\n  >while loading rounds");
    }

    #[test]
    fn result_context() {
        let res: Result<(), ErrorKind> = Err(ErrorKind::Network);
        let err = res.context("fetching teams").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.context, "fetching teams");
    }
}
