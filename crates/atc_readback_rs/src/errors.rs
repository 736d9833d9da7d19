use thiserror::Error;
#[derive(Error, Debug)]
pub enum Error {
    #[error("Std Io Error!")]
    StdIo(#[from] std::io::Error),
    #[error("Ron config error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Invalid ASR split pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("Aviation Helper")]
    AviationHelper(#[from] aviation_helper_rs::errors::Error),
}
