pub mod extractor;
pub mod fetcher;
pub mod fields;

pub use extractor::extract_nota;
pub use fetcher::{FetchError, PageFetcher, WebDriverFetcher};
