//! Tests for the text display frame generator.
use super::*;

const WINDOW: CanId = CanId::extended(0x02A0240E);
const MESSAGE: CanId = CanId::extended(0x1800008);
const WINDOW_DEFAULT: [u8; 8] = [0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x35];

fn frames_for(text: &str) -> ([CanFrame; TEXT_SEQUENCE_FRAMES], usize) {
    let text = DisplayText::format(text);
    let mut frames = [CanFrame::data_frame(MESSAGE, [0; 8]); TEXT_SEQUENCE_FRAMES];
    let mut count = 0;
    for frame in TextFrameBuilder::new(&text, WINDOW, MESSAGE, WINDOW_DEFAULT).build() {
        frames[count] = frame;
        count += 1;
    }
    (frames, count)
}

#[test]
/// A 32-character message always produces seven frames.
fn test_sequence_length() {
    assert_eq!(TEXT_SEQUENCE_FRAMES, 7);
    let (_, count) = frames_for("HELLO");
    assert_eq!(count, 7);
}

#[test]
/// The open frame goes to the window identifier with byte 7 set to 0x31.
fn test_open_frame() {
    let (frames, _) = frames_for("HELLO");
    assert_eq!(frames[0].id, WINDOW);
    assert_eq!(frames[0].data, [0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x31]);
}

#[test]
/// First data frame carries the A7 00 header and six characters.
fn test_first_data_frame() {
    let (frames, _) = frames_for("HELLO WORLD FOO");
    assert_eq!(frames[1].id, MESSAGE);
    assert_eq!(&frames[1].data, b"\xA7\x00HELLO ");
}

#[test]
/// Continuation frames count up from 0x21 and carry seven characters each.
fn test_continuation_frames() {
    let (frames, _) = frames_for("HELLO WORLD FOO BAR BAZ QUX");
    // "HELLO WORLD FOO " + "BAR BAZ QUX     "
    assert_eq!(&frames[2].data, b"\x21WORLD F");
    assert_eq!(&frames[3].data, b"\x22OO BAR ");
    assert_eq!(&frames[4].data, b"\x23BAZ QUX");
    // Last chunk: five characters and two padding spaces.
    assert_eq!(&frames[5].data, b"\x24       ");
}

#[test]
/// The sequence ends with the space-padded 0x65 terminator.
fn test_terminator_frame() {
    let (frames, _) = frames_for("HI");
    assert_eq!(frames[6].id, MESSAGE);
    assert_eq!(&frames[6].data, b"\x65       ");
}
