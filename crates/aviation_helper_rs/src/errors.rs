use thiserror::Error;
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid altitude: {}",.0)]
    InvalidAltitude(u32),
    #[error("Invalid frequency: {}",.0)]
    InvalidFrequency(String),
    #[error("Invalid runway designator: {}",.0)]
    InvalidRunway(String),
    #[error("Invalid squawk code: {}",.0)]
    InvalidSquawk(String),
    #[error("Serde Json (de)serialization failed!")]
    SerdeDeserialize(#[from] serde_json::Error),
    #[error("Std Io Error!")]
    StdIo(#[from] std::io::Error),
}
