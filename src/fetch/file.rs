use std::io::Read;
use std::path::Path;

use crate::comment::comment_model::RawComment;
use crate::comment::paste::parse_pasted;
use crate::error::PickerError;

/// Read pasted comments from a text file, or from stdin when `path` is `-`.
pub fn read_pasted(path: &str) -> Result<Vec<RawComment>, PickerError> {
    let content = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| PickerError::io("<stdin>", e))?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| PickerError::io(path, e))?
    };
    Ok(parse_pasted(&content))
}

/// Read a JSON array of raw comments, as written by `save_comments`.
pub fn read_comments_json(path: &str) -> Result<Vec<RawComment>, PickerError> {
    let content = std::fs::read_to_string(path).map_err(|e| PickerError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| PickerError::json(format!("reading {}", path), e))
}

pub fn save_comments(path: &Path, comments: &[RawComment]) -> Result<(), PickerError> {
    let json = serde_json::to_string_pretty(comments)
        .map_err(|e| PickerError::json("serializing comments", e))?;
    std::fs::write(path, json).map_err(|e| PickerError::io(path.display().to_string(), e))
}
