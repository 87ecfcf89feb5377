use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that stop a conversion
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("could not find the keymaps[][MATRIX_ROWS][MATRIX_COLS] array")]
    KeymapsNotFound,

    #[error("no LAYOUT(...) layer found in the keymaps array")]
    NoLayers,

    #[error("unmatched `{open}` at byte {offset}")]
    Unbalanced { open: char, offset: usize },

    #[error("layer {layer}, matrix row {row}, col {col}: unsupported keycode `{keycode}`")]
    UnknownKeycode {
        layer: String,
        row: usize,
        col: usize,
        keycode: String,
    },

    #[error(transparent)]
    Regex(#[from] regex::Error),
}
