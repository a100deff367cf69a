use std::fmt;

/// Failure while reading a dataset file or decoding an input image.
#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    /// A CSV row could not be turned into a sample; `row` is 1-based.
    Row { row: usize, message: String },
    Empty,
    Image(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(e) => write!(f, "{}", e),
            DatasetError::Row { row, message } => write!(f, "Row {}: {}", row, message),
            DatasetError::Empty => write!(f, "CSV contains no data rows after parsing"),
            DatasetError::Image(msg) => write!(f, "cannot decode image: {}", msg),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        DatasetError::Io(e)
    }
}

impl From<image::ImageError> for DatasetError {
    fn from(e: image::ImageError) -> Self {
        DatasetError::Image(e.to_string())
    }
}
