/// Test doubles to simulate the CAN controller, the timer and the relay lines
/// during integration tests.
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use volvo_dim::config::DimConfig;
use volvo_dim::protocol::frames::MessageSlot;
use volvo_dim::protocol::simulation::DimController;
use volvo_dim::protocol::transport::{
    can_frame::CanFrame,
    can_id::CanId,
    traits::{
        can_bus::{BusBitrate, CanBus, ControllerClock},
        dim_timer::DimTimer,
        output_line::OutputLine,
    },
};

pub type TestDim = DimController<MockCanBus, MockTimer, StdRng, MockLine>;

#[derive(Clone, Debug, PartialEq)]
#[allow(dead_code)]
/// Everything the mock bus saw, in order.
pub enum BusEvent {
    Begin(BusBitrate, ControllerClock),
    Frame { at_ms: u64, frame: CanFrame },
}

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory CAN controller recording every transmitted frame with the
/// virtual time it was sent at.
pub struct MockCanBus {
    events: Arc<Mutex<Vec<BusEvent>>>,
    clock: Arc<AtomicU64>,
    failing_starts: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Bus sharing the virtual clock of `timer`.
    pub fn new(timer: &MockTimer) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            clock: timer.clock.clone(),
            failing_starts: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Refuse the next `count` start attempts.
    pub fn fail_starts(self, count: u32) -> Self {
        self.failing_starts.store(count, Ordering::SeqCst);
        self
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn begin_calls(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, BusEvent::Begin(..)))
            .count()
    }

    /// Transmitted frames with their send time.
    pub fn timed_frames(&self) -> Vec<(u64, CanFrame)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BusEvent::Frame { at_ms, frame } => Some((at_ms, frame)),
                BusEvent::Begin(..) => None,
            })
            .collect()
    }

    pub fn frames(&self) -> Vec<CanFrame> {
        self.timed_frames()
            .into_iter()
            .map(|(_, frame)| frame)
            .collect()
    }

    pub fn ids(&self) -> Vec<CanId> {
        self.frames().iter().map(|frame| frame.id).collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    async fn begin<'a>(
        &'a mut self,
        bitrate: BusBitrate,
        clock: ControllerClock,
    ) -> Result<(), Self::Error> {
        self.events
            .lock()
            .unwrap()
            .push(BusEvent::Begin(bitrate, clock));
        let remaining = self.failing_starts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_starts.store(remaining - 1, Ordering::SeqCst);
            return Err(());
        }
        Ok(())
    }

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        let at_ms = self.clock.load(Ordering::SeqCst);
        self.events.lock().unwrap().push(BusEvent::Frame {
            at_ms,
            frame: *frame,
        });
        Ok(())
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Virtual clock: delays advance time instantly, so tests are deterministic.
pub struct MockTimer {
    clock: Arc<AtomicU64>,
}

#[allow(dead_code)]
impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward without a delay call, as host work would.
    pub fn advance(&self, millis: u64) {
        self.clock.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn now(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }
}

impl DimTimer for MockTimer {
    async fn delay_ms<'a>(&'a mut self, millis: u32) {
        self.clock.fetch_add(millis as u64, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }

    fn now_ms(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Relay line remembering every level it was driven to.
pub struct MockLine {
    levels: Arc<Mutex<Vec<bool>>>,
}

#[allow(dead_code)]
impl MockLine {
    pub fn levels(&self) -> Vec<bool> {
        self.levels.lock().unwrap().clone()
    }

    pub fn level(&self) -> Option<bool> {
        self.levels().last().copied()
    }
}

impl OutputLine for MockLine {
    type Error = ();

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.lock().unwrap().push(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.lock().unwrap().push(false);
        Ok(())
    }
}

#[allow(dead_code)]
/// Controller wired to fresh mocks. Returns the handles needed to inspect it.
pub fn build_dim(config: DimConfig, seed: u64) -> (TestDim, MockCanBus, MockTimer, MockLine) {
    let timer = MockTimer::new();
    let bus = MockCanBus::new(&timer);
    let parking = MockLine::default();
    let dim = DimController::new(
        bus.clone(),
        timer.clone(),
        StdRng::seed_from_u64(seed),
        parking.clone(),
        config,
    );
    (dim, bus, timer, parking)
}

#[allow(dead_code)]
/// Controller already through `init`, with the boot traffic cleared.
pub async fn running_dim(config: DimConfig, seed: u64) -> (TestDim, MockCanBus, MockTimer, MockLine) {
    let (mut dim, bus, timer, parking) = build_dim(config, seed);
    dim.init().await.expect("init should succeed on a healthy bus");
    bus.clear();
    (dim, bus, timer, parking)
}

#[allow(dead_code)]
/// Slot a frame identifier belongs to.
pub fn slot_of(id: CanId) -> Option<MessageSlot> {
    MessageSlot::ALL.into_iter().find(|slot| slot.id() == id)
}
