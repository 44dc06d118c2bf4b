use image::{imageops, Rgb, RgbImage};
use log::debug;

use crate::puzzle::PuzzleDefinition;
use crate::search::Assignment;

/// Glyph printed for cells that can't hold a letter.
pub const BLOCK_GLYPH: char = '█';

/// Side length of one grid cell in a rendered image, in pixels.
pub const CELL_SIZE: u32 = 100;

/// Width of the black frame left around the white interior of every fillable cell.
pub const CELL_BORDER: u32 = 2;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SCALE: u32 = 10;

/// Lay the assigned words out on the grid. Cells no assigned word covers are `None`.
pub fn letter_grid(
    definition: &PuzzleDefinition,
    assignment: &Assignment,
) -> Vec<Vec<Option<char>>> {
    let grid = definition.grid();
    let mut letters: Vec<Vec<Option<char>>> = vec![vec![None; grid.width()]; grid.height()];

    for (slot_id, word_id) in assignment.iter() {
        let slot = definition.slot(slot_id);
        let word = definition.word(word_id);

        for ((row, col), &glyph) in slot.cell_coords().zip(&word.glyphs) {
            letters[row][col] = Some(glyph);
        }
    }

    letters
}

/// Turn the given puzzle and assignment into a rendered string, one line per row. Blocks are
/// drawn as `BLOCK_GLYPH` and empty fillable cells as spaces.
pub fn render_grid(definition: &PuzzleDefinition, assignment: &Assignment) -> String {
    let grid = definition.grid();

    letter_grid(definition, assignment)
        .iter()
        .enumerate()
        .map(|(row, letters)| {
            letters
                .iter()
                .enumerate()
                .map(|(col, letter)| {
                    if grid.is_fillable((row, col)) {
                        letter.unwrap_or(' ')
                    } else {
                        BLOCK_GLYPH
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Draw the puzzle as an image: a black canvas with a white, black-framed square for every
/// fillable cell and each assigned letter centred in black inside its square.
pub fn render_image(definition: &PuzzleDefinition, assignment: &Assignment) -> RgbImage {
    let grid = definition.grid();
    let interior_size = CELL_SIZE - 2 * CELL_BORDER;
    let blank_cell = RgbImage::from_pixel(interior_size, interior_size, WHITE);

    let mut image = RgbImage::from_pixel(
        grid.width() as u32 * CELL_SIZE,
        grid.height() as u32 * CELL_SIZE,
        BLACK,
    );

    for (row, letters) in letter_grid(definition, assignment).iter().enumerate() {
        for (col, letter) in letters.iter().enumerate() {
            if !grid.is_fillable((row, col)) {
                continue;
            }

            let left = col as u32 * CELL_SIZE + CELL_BORDER;
            let top = row as u32 * CELL_SIZE + CELL_BORDER;
            imageops::replace(&mut image, &blank_cell, left as i64, top as i64);

            if let Some(letter) = letter {
                draw_glyph(
                    &mut image,
                    *letter,
                    left + (interior_size - GLYPH_WIDTH * GLYPH_SCALE) / 2,
                    top + (interior_size - GLYPH_HEIGHT * GLYPH_SCALE) / 2,
                );
            }
        }
    }

    image
}

fn draw_glyph(image: &mut RgbImage, letter: char, left: u32, top: u32) {
    let bitmap = match glyph_bitmap(letter) {
        Some(bitmap) => bitmap,
        None => {
            debug!(target: "render", "No bitmap for {:?}; leaving its cell blank", letter);
            return;
        }
    };
    let pixel = RgbImage::from_pixel(GLYPH_SCALE, GLYPH_SCALE, BLACK);

    for (glyph_row, bits) in (0u32..).zip(bitmap) {
        for glyph_col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - glyph_col)) == 0 {
                continue;
            }
            let x = left + glyph_col * GLYPH_SCALE;
            let y = top + glyph_row * GLYPH_SCALE;
            imageops::replace(image, &pixel, x as i64, y as i64);
        }
    }
}

/// 5x7 bitmaps, one row per byte, leftmost column in the highest of the low five bits.
fn glyph_bitmap(letter: char) -> Option<[u8; GLYPH_HEIGHT as usize]> {
    let bitmap = match letter.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        _ => return None,
    };
    Some(bitmap)
}
