//! 5x5 LED matrix model - the display collaborator of the simulator.
//!
//! Pure state: applying a [`DisplayOp`] replaces the whole image, like the
//! device's show/clear calls.

use crate::types::{DisplayOp, Glyph};

pub const SIZE: usize = 5;

type Bitmap = [&'static str; SIZE];

const HEART: Bitmap = [".#.#.", "#####", "#####", ".###.", "..#.."];
const YES: Bitmap = [".....", "....#", "...#.", "#.#..", ".#..."];
const NO: Bitmap = ["#...#", ".#.#.", "..#..", ".#.#.", "#...#"];
const SMALL_SQUARE: Bitmap = [".....", ".###.", ".#.#.", ".###.", "....."];
const DIAMOND: Bitmap = ["..#..", ".#.#.", "#...#", ".#.#.", "..#.."];

const DIGITS: [Bitmap; 10] = [
    [".##..", "#..#.", "#..#.", "#..#.", ".##.."],
    ["..#..", ".##..", "..#..", "..#..", ".###."],
    ["###..", "...#.", ".##..", "#....", "####."],
    ["####.", "...#.", "..#..", "#..#.", ".##.."],
    ["..##.", ".#.#.", "#..#.", "#####", "...#."],
    ["#####", "#....", "####.", "....#", "####."],
    ["...#.", "..#..", ".###.", "#...#", ".###."],
    ["#####", "...#.", "..#..", ".#...", "#...."],
    [".###.", "#...#", ".###.", "#...#", ".###."],
    [".###.", "#...#", ".###.", "..#..", ".#..."],
];

fn bitmap(glyph: Glyph) -> &'static Bitmap {
    match glyph {
        Glyph::Heart => &HEART,
        Glyph::Yes => &YES,
        Glyph::No => &NO,
        Glyph::SmallSquare => &SMALL_SQUARE,
        Glyph::Diamond => &DIAMOND,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedMatrix {
    lit: [[bool; SIZE]; SIZE],
    /// Bumped on every change; lets the caller skip redundant redraws.
    version: u64,
}

impl LedMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, op: DisplayOp) {
        match op {
            DisplayOp::Glyph(g) => self.load(bitmap(g)),
            DisplayOp::Digit(d) => self.load(&DIGITS[(d % 10) as usize]),
            DisplayOp::Flash => self.lit = [[true; SIZE]; SIZE],
            DisplayOp::Clear => self.lit = [[false; SIZE]; SIZE],
        }
        self.version += 1;
    }

    fn load(&mut self, rows: &Bitmap) {
        for (y, row) in rows.iter().enumerate() {
            for (x, b) in row.bytes().enumerate().take(SIZE) {
                self.lit[y][x] = b == b'#';
            }
        }
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.lit
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.lit.iter().flatten().filter(|b| **b).count()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
