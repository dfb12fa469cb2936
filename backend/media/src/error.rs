use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    /// The temporary local copy could not be written or read back.
    #[error("temporary video copy failed: {0}")]
    Io(#[from] std::io::Error),

    /// The decoder could not open the file at all.
    #[error("could not open video: {0}")]
    Decode(String),

    #[error("could not encode frame {index}: {source}")]
    Encode {
        index: u64,
        #[source]
        source: image::ImageError,
    },
}
