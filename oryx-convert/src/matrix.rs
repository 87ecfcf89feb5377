//! The Planck rev6 matrix: the 4x12 grid is wired as 8 rows of 6, left half
//! on rows 0..4 and right half on rows 4..8.

use log::warn;

pub const VISUAL_ROWS: usize = 4;
pub const VISUAL_COLS: usize = 12;
pub const GRID_KEYS: usize = VISUAL_ROWS * VISUAL_COLS;
pub const MATRIX_ROWS: usize = 8;
pub const MATRIX_COLS: usize = 6;

/// Position of the 2u space in a 47-key (MIT) export
const SPACE_INDEX: usize = 41;

pub type Matrix = [[String; MATRIX_COLS]; MATRIX_ROWS];

/// Bring a layer to exactly 48 keys.
///
/// A 47-key layer comes from the MIT layout, its space is doubled. Shorter
/// layers are padded with `KC_NO`, longer ones truncated.
pub fn normalize(layer: &str, keys: &[String]) -> Vec<String> {
    let mut keys = keys.to_vec();
    if keys.len() != GRID_KEYS {
        warn!(
            "Layer {} has {} keys, the Planck grid has {}",
            layer,
            keys.len(),
            GRID_KEYS
        );
    }
    if keys.len() == GRID_KEYS - 1 {
        let space = keys[SPACE_INDEX].clone();
        keys.insert(SPACE_INDEX, space);
    }
    keys.resize(GRID_KEYS, "KC_NO".to_string());
    keys
}

/// Matrix position of the `index`th key of the visual grid
pub fn matrix_position(index: usize) -> (usize, usize) {
    let (row, col) = (index / VISUAL_COLS, index % VISUAL_COLS);
    if col < MATRIX_COLS {
        (row, col)
    } else {
        (row + VISUAL_ROWS, col - MATRIX_COLS)
    }
}

/// Transpose a normalized visual layer into the 8x6 matrix
pub fn transpose(keys: &[String]) -> Matrix {
    let mut matrix: Matrix = std::array::from_fn(|_| std::array::from_fn(|_| "KC_NO".to_string()));
    for (i, key) in keys.iter().take(GRID_KEYS).enumerate() {
        let (row, col) = matrix_position(i);
        matrix[row][col] = key.clone();
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("K{i}")).collect()
    }

    #[test]
    fn test_matrix_position() {
        assert_eq!(matrix_position(0), (0, 0));
        assert_eq!(matrix_position(5), (0, 5));
        assert_eq!(matrix_position(6), (4, 0));
        assert_eq!(matrix_position(11), (4, 5));
        assert_eq!(matrix_position(12), (1, 0));
        assert_eq!(matrix_position(47), (7, 5));
    }

    #[test]
    fn test_mit_layer_doubles_space() {
        let keys = normalize("_BASE", &numbered(47));
        assert_eq!(keys.len(), GRID_KEYS);
        assert_eq!(keys[41], "K41");
        assert_eq!(keys[42], "K41");
        assert_eq!(keys[47], "K46");
    }

    #[test]
    fn test_short_layer_is_padded() {
        let keys = normalize("_BASE", &numbered(10));
        assert_eq!(keys.len(), GRID_KEYS);
        assert_eq!(keys[9], "K9");
        assert!(keys[10..].iter().all(|k| k == "KC_NO"));
        assert_eq!(normalize("_BASE", &numbered(50)).len(), GRID_KEYS);
    }

    #[test]
    fn test_transpose() {
        let matrix = transpose(&numbered(48));
        assert_eq!(matrix[0], ["K0", "K1", "K2", "K3", "K4", "K5"]);
        assert_eq!(matrix[4], ["K6", "K7", "K8", "K9", "K10", "K11"]);
        assert_eq!(matrix[3][0], "K36");
        assert_eq!(matrix[7][5], "K47");
    }
}
