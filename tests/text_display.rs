//! Text display sequences on the bus: persistent custom text, one-shot
//! messages, clearing, and frame pacing.
mod helpers;

use helpers::running_dim;
use volvo_dim::config::DimConfig;
use volvo_dim::protocol::frames::MessageSlot;
use volvo_dim::protocol::transport::can_frame::CanFrame;
use volvo_dim::protocol::transport::text::{CLEAR_WINDOW, WINDOW_OPEN};

fn spaces_after(header: u8) -> [u8; 8] {
    let mut data = [b' '; 8];
    data[0] = header;
    data
}

fn expected_hello_world() -> Vec<CanFrame> {
    let window = MessageSlot::DisplayWindow.id();
    let message = MessageSlot::DisplayMessage.id();
    vec![
        CanFrame::data_frame(window, [0xC0, 0, 0, 0, 0, 0, 0, WINDOW_OPEN]),
        CanFrame::data_frame(message, [0xA7, 0x00, b'H', b'E', b'L', b'L', b'O', b' ']),
        CanFrame::data_frame(message, [0x21, b'W', b'O', b'R', b'L', b'D', b' ', b' ']),
        CanFrame::data_frame(message, spaces_after(0x22)),
        CanFrame::data_frame(message, spaces_after(0x23)),
        CanFrame::data_frame(message, spaces_after(0x24)),
        CanFrame::data_frame(message, spaces_after(0x65)),
    ]
}

#[tokio::test]
/// Active text follows the periodic slots of every low-priority flush.
async fn test_custom_text_rides_low_tier() {
    let (mut dim, bus, timer, _parking) = running_dim(DimConfig::default(), 1).await;
    dim.set_custom_text("  HELLO   WORLD ");

    dim.simulate().await.unwrap();

    let frames = bus.frames();
    assert_eq!(frames.len(), 14 + 7);
    assert_eq!(frames[11].id, MessageSlot::DisplayWindow.id());
    assert_eq!(frames[11].data[7], WINDOW_OPEN);
    assert_eq!(frames[14..].to_vec(), expected_hello_world());

    // Refreshed on the next flush as well.
    timer.advance(50);
    bus.clear();
    dim.simulate().await.unwrap();
    assert_eq!(bus.frames()[14..].to_vec(), expected_hello_world());
}

#[tokio::test]
/// 40 ms after each text frame, none after the terminator.
async fn test_text_frame_pacing() {
    let (mut dim, bus, timer, _parking) = running_dim(DimConfig::default(), 1).await;
    dim.set_custom_text("HELLO WORLD");

    dim.simulate().await.unwrap();

    let timed = bus.timed_frames();
    let text_times: Vec<u64> = timed[14..].iter().map(|(at_ms, _)| *at_ms).collect();
    let start = text_times[0];
    let expected: Vec<u64> = (0..7).map(|index| start + 40 * index).collect();
    assert_eq!(text_times, expected);
    assert_eq!(timer.now(), start + 240);
}

#[tokio::test]
/// Clearing sends the clear-window frame and stops the refresh.
async fn test_clear_custom_text() {
    let (mut dim, bus, timer, _parking) = running_dim(DimConfig::default(), 1).await;
    dim.set_custom_text("HELLO WORLD");
    dim.simulate().await.unwrap();
    bus.clear();

    dim.clear_custom_text().await.unwrap();

    assert_eq!(
        bus.frames(),
        vec![CanFrame::data_frame(
            MessageSlot::DisplayWindow.id(),
            CLEAR_WINDOW
        )]
    );
    assert!(!dim.vehicle().text_active);

    timer.advance(50);
    bus.clear();
    dim.simulate().await.unwrap();
    let frames = bus.frames();
    assert_eq!(frames.len(), 14);
    assert_eq!(
        frames[11].data,
        MessageSlot::DisplayWindow.default_payload()
    );
}

#[tokio::test]
/// One-shot text goes out right away and is not repeated, but the periodic
/// window frame keeps the text area open.
async fn test_display_text_is_one_shot() {
    let (mut dim, bus, timer, _parking) = running_dim(DimConfig::default(), 1).await;

    dim.display_text("HELLO WORLD").await.unwrap();

    assert_eq!(bus.frames(), expected_hello_world());
    assert!(!dim.vehicle().text_active);

    timer.advance(50);
    bus.clear();
    dim.simulate().await.unwrap();
    let frames = bus.frames();
    assert_eq!(frames.len(), 14);
    assert_eq!(frames[11].id, MessageSlot::DisplayWindow.id());
    assert_eq!(frames[11].data[7], WINDOW_OPEN);
}

#[tokio::test]
/// A word longer than a line is cut when it opens the line.
async fn test_long_word_is_truncated_on_the_wire() {
    let (mut dim, bus, _timer, _parking) = running_dim(DimConfig::default(), 1).await;

    dim.display_text("ABCDEFGHIJKLMNOPQRSTUVWXYZ").await.unwrap();

    let chars: Vec<u8> = bus.frames()[1..6]
        .iter()
        .enumerate()
        .flat_map(|(index, frame)| {
            let skip = if index == 0 { 2 } else { 1 };
            frame.data[skip..].to_vec()
        })
        .collect();
    assert_eq!(&chars[..16], b"ABCDEFGHIJKLMNOP");
    assert!(chars[16..].iter().all(|&c| c == b' '));
}
