pub mod error;

pub use error::{
    EncodeError, FeedFailure, FetchCause, FetchError, ManifestError, ParseError, PipelineError,
    Result, UnsupportedFormatError,
};
