pub mod checker;
pub mod extract;
pub mod fetch;
pub mod links;
pub mod similarity;
pub mod verifier;

pub use crate::domain::model::{
    Place, Platform, PlatformVerdict, ScoredCandidate, SearchCandidate, VerificationResult,
    VerificationStatus,
};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, ResultExtractor};
pub use crate::utils::error::Result;
