use thiserror::Error;

pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that!";

#[derive(Error, Debug)]
pub enum QuireError {
    #[error("{0} does not exist.")]
    NotFound(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("{0} already exists.")]
    DuplicateName(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{}", SIGN_IN_REQUIRED)]
    Unauthorized,

    #[error("No archive numbers left for {0}.")]
    ArchiveExhausted(String),

    #[error("Credential store is corrupt: {0}")]
    CorruptStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Editor error: {0}")]
    Editor(String),
}

/// Where a caller should go after an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Back to the document listing.
    Listing,
    /// To the sign-in form.
    SignIn,
    /// Re-render the form that was submitted.
    Form,
}

impl QuireError {
    /// Fatal errors are not recovered into a flash message.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QuireError::CorruptStore(_)
                | QuireError::Io(_)
                | QuireError::Serialization(_)
                | QuireError::Hash(_)
        )
    }

    pub fn next_step(&self) -> NextStep {
        match self {
            QuireError::NotFound(_) => NextStep::Listing,
            QuireError::Unauthorized => NextStep::SignIn,
            _ => NextStep::Form,
        }
    }
}

pub type Result<T> = std::result::Result<T, QuireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_message_is_the_sign_in_prompt() {
        assert_eq!(
            QuireError::Unauthorized.to_string(),
            "You must be signed in to do that!"
        );
    }

    #[test]
    fn not_found_sends_caller_to_listing() {
        let err = QuireError::NotFound("x.txt".into());
        assert_eq!(err.to_string(), "x.txt does not exist.");
        assert_eq!(err.next_step(), NextStep::Listing);
        assert!(!err.is_fatal());
    }

    #[test]
    fn corrupt_store_is_fatal() {
        assert!(QuireError::CorruptStore("bad json".into()).is_fatal());
        assert_eq!(QuireError::Unauthorized.next_step(), NextStep::SignIn);
        assert_eq!(
            QuireError::DuplicateName("a.md".into()).next_step(),
            NextStep::Form
        );
    }

    #[test]
    fn exhausted_archive_is_recoverable() {
        let err = QuireError::ArchiveExhausted("notes".into());
        assert_eq!(err.to_string(), "No archive numbers left for notes.");
        assert!(!err.is_fatal());
    }
}
