//! # Rejection Reasons
//!
//! Input rejection is an outcome, not a failure: validators return `bool` and
//! the pipeline reports which gate closed through `RejectReason`.

use std::fmt;

/// Why the pipeline refused to trust a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Domain is not the link-local discovery domain
    ForeignDomain,
    /// Service type outside the allow-list
    UnsupportedServiceType,
    /// Name empty or longer than 255 characters
    InvalidName,
    /// Attribute set failed the structural or range checks
    InvalidAttributes,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignDomain => write!(f, "Domain is not local"),
            Self::UnsupportedServiceType => write!(f, "Unsupported service type"),
            Self::InvalidName => write!(f, "Invalid device name"),
            Self::InvalidAttributes => write!(f, "Invalid attribute set"),
        }
    }
}
