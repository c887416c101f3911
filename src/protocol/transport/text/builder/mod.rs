//! Frame generator for a text display sequence. Lazily yields the open, data
//! and terminator frames for one formatted message.
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::text::{
    layout::DisplayText, CHUNK_LEN, DISPLAY_TEXT_LEN, FIRST_CHUNK_LEN, FIRST_FRAME_HEADER,
    FIRST_SEQUENCE, TERMINATOR_HEADER, WINDOW_OPEN,
};

/// Frames in a complete sequence: open + first + 4 continuations + terminator.
pub const TEXT_SEQUENCE_FRAMES: usize =
    3 + (DISPLAY_TEXT_LEN - FIRST_CHUNK_LEN).div_ceil(CHUNK_LEN);

#[derive(Debug)]
/// Shared parameters for all frames of one text display sequence.
pub struct TextFrameBuilder<'a> {
    text: &'a DisplayText,
    window_id: CanId,
    message_id: CanId,
    window_payload: [u8; 8],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Open,
    First,
    Continuation,
    Terminator,
    Done,
}

/// Lazy iterator returning frames one by one as they are encoded.
pub struct TextFrameIterator<'a> {
    builder: TextFrameBuilder<'a>,
    stage: Stage,
    chars_sent: usize,
    sequence: u8,
}

impl<'a> Iterator for TextFrameIterator<'a> {
    type Item = CanFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let chars = self.builder.text.as_bytes();
        match self.stage {
            Stage::Open => {
                let mut data = self.builder.window_payload;
                data[7] = WINDOW_OPEN;
                self.stage = Stage::First;
                Some(CanFrame::data_frame(self.builder.window_id, data))
            }
            Stage::First => {
                // Header + six characters.
                let mut data = [0u8; 8];
                data[..2].copy_from_slice(&FIRST_FRAME_HEADER);
                data[2..].copy_from_slice(&chars[..FIRST_CHUNK_LEN]);
                self.chars_sent = FIRST_CHUNK_LEN;
                self.stage = Stage::Continuation;
                Some(CanFrame::data_frame(self.builder.message_id, data))
            }
            Stage::Continuation => {
                // Sequence byte + seven characters, space padded at the end.
                let mut data = [b' '; 8];
                data[0] = self.sequence;
                let bytes_to_copy = CHUNK_LEN.min(DISPLAY_TEXT_LEN - self.chars_sent);
                data[1..1 + bytes_to_copy]
                    .copy_from_slice(&chars[self.chars_sent..self.chars_sent + bytes_to_copy]);

                self.chars_sent += bytes_to_copy;
                self.sequence = self.sequence.wrapping_add(1);
                if self.chars_sent >= DISPLAY_TEXT_LEN {
                    self.stage = Stage::Terminator;
                }
                Some(CanFrame::data_frame(self.builder.message_id, data))
            }
            Stage::Terminator => {
                let mut data = [b' '; 8];
                data[0] = TERMINATOR_HEADER;
                self.stage = Stage::Done;
                Some(CanFrame::data_frame(self.builder.message_id, data))
            }
            Stage::Done => None,
        }
    }
}

impl<'a> TextFrameBuilder<'a> {
    /// Prepare the sequence for `text`.
    ///
    /// `window_payload` is the current display-window slot; the open frame is
    /// that payload with the text area enabled.
    pub fn new(
        text: &'a DisplayText,
        window_id: CanId,
        message_id: CanId,
        window_payload: [u8; 8],
    ) -> Self {
        Self {
            text,
            window_id,
            message_id,
            window_payload,
        }
    }

    /// Start the iteration; each call to `next` yields the next frame.
    pub fn build(self) -> TextFrameIterator<'a> {
        TextFrameIterator {
            builder: self,
            stage: Stage::Open,
            chars_sent: 0,
            sequence: FIRST_SEQUENCE,
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
