//! Text display transport: formats free text for the two-line message area of
//! the DIM and splits it into the chunked frame sequence the display
//! controller reassembles.
//!
//! A display sequence is:
//!
//! 1. one "open display" frame on the display-window identifier;
//! 2. `A7 00` followed by the first six characters;
//! 3. a sequence byte (starting at `0x21`) followed by seven characters,
//!    repeated until all 32 characters are out (the last chunk is padded with
//!    spaces);
//! 4. a terminator frame, `0x65` followed by seven spaces.

/// Characters per display line.
pub const LINE_WIDTH: usize = 16;
/// Characters in a formatted message (two lines).
pub const DISPLAY_TEXT_LEN: usize = 2 * LINE_WIDTH;

/// Header of the first message frame.
pub const FIRST_FRAME_HEADER: [u8; 2] = [0xA7, 0x00];
/// Characters carried by the first message frame.
pub const FIRST_CHUNK_LEN: usize = 6;
/// Characters carried by each following frame.
pub const CHUNK_LEN: usize = 7;
/// Sequence byte of the first continuation frame.
pub const FIRST_SEQUENCE: u8 = 0x21;
/// Leading byte of the terminator frame.
pub const TERMINATOR_HEADER: u8 = 0x65;
/// Display-window byte 7 value that opens the text area.
pub const WINDOW_OPEN: u8 = 0x31;
/// Display-window payload that clears the text area.
pub const CLEAR_WINDOW: [u8; 8] = [0xE1, 0xFE, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

pub mod builder;
pub mod layout;
