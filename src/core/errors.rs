use thiserror::Error;

#[derive(Error, Debug)]
pub enum NutrilensError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("Image error: {0}")]
    Image(Box<image::ImageError>),

    #[error("No usable image selected")]
    InvalidImage,

    #[error("The analysis reply did not match the expected structure: {0}")]
    MalformedResponse(String),

    #[error("The service returned an empty reply")]
    EmptyResponse,

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Suggestion failed: {0}")]
    SuggestionFailed(String),

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),
}

impl From<std::io::Error> for NutrilensError {
    fn from(error: std::io::Error) -> Self {
        NutrilensError::Io(Box::new(error))
    }
}

impl From<image::ImageError> for NutrilensError {
    fn from(error: image::ImageError) -> Self {
        NutrilensError::Image(Box::new(error))
    }
}
