//! A simulated serial port, direction pin, and clock for exercising the bus
//! without hardware. Time only moves when the bus sleeps.

use {
    crate::{
        bus::{Bus, Settings},
        channel::{ByteChannel, Delay, LineSettings, Parity},
        direction::DirectionLine,
        raw::{self, RxFifo},
    },
    dxl1_packet::Packet,
    std::{
        cell::{Cell, RefCell},
        collections::VecDeque,
        rc::Rc,
    },
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Event {
    Level(bool),
    Write(Vec<u8>),
    Flush,
    Configure(SimConfig),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event)
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear()
    }

    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn configs(&self) -> Vec<SimConfig> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Configure(config) => Some(config.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub(crate) fn now(&self) -> u64 {
        self.0.get()
    }

    fn advance(&self, us: u64) {
        self.0.set(self.0.get() + us)
    }
}

#[derive(Debug)]
pub(crate) struct SimDelay {
    clock: Clock,
    pub(crate) calls: usize,
}

impl Delay for SimDelay {
    fn delay_us(&mut self, us: u32) {
        self.calls += 1;
        self.clock.advance(u64::from(us))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SimConfig {
    pub(crate) baud_rate: u32,
    pub(crate) data_bits: u8,
    pub(crate) parity: Parity,
    pub(crate) stop_bits: u8,
    pub(crate) rx_linger_us: u32,
}

/// Whatever some other user of the port left configured.
pub(crate) const USER_CONFIG: SimConfig = SimConfig {
    baud_rate: 115_200,
    data_bits: 7,
    parity: Parity::Even,
    stop_bits: 2,
    rx_linger_us: 0,
};

#[derive(Debug)]
pub(crate) struct SimError;

struct Reply {
    delay_us: u64,
    spacing_us: u64,
    bytes: Vec<u8>,
}

pub(crate) struct SimChannel {
    clock: Clock,
    log: Log,
    pub(crate) config: SimConfig,
    pub(crate) refuse_config: bool,
    pub(crate) refuse_bus_config: bool,
    pub(crate) max_write: Option<usize>,
    /// Bytes `available` claims that never actually arrive.
    pub(crate) phantom: usize,
    pub(crate) register_reads: u32,
    incoming: VecDeque<(u64, u8)>,
    replies: VecDeque<Reply>,
    consumed: u32,
}

impl SimChannel {
    /// The next write is answered with `bytes`, arriving `delay_us` later.
    pub(crate) fn reply(&mut self, delay_us: u64, bytes: &[u8]) {
        self.reply_spaced(delay_us, 0, bytes)
    }

    /// Like `reply`, but each byte after the first arrives `spacing_us` after
    /// the one before it.
    pub(crate) fn reply_spaced(&mut self, delay_us: u64, spacing_us: u64, bytes: &[u8]) {
        self.replies.push_back(Reply {
            delay_us,
            spacing_us,
            bytes: bytes.to_vec(),
        })
    }

    /// The next write gets no answer.
    pub(crate) fn silence(&mut self) {
        self.reply(0, &[])
    }

    /// Bytes already sitting in the receive buffer.
    pub(crate) fn stale(&mut self, bytes: &[u8]) {
        let now = self.clock.now();
        self.incoming.extend(bytes.iter().map(|&byte| (now, byte)))
    }

    pub(crate) fn unread(&self) -> usize {
        self.incoming.len()
    }

    fn arrived(&self) -> usize {
        let now = self.clock.now();
        self.incoming
            .iter()
            .take_while(|&&(arrival, _)| arrival <= now)
            .count()
    }

    fn pop_arrived(&mut self) -> Option<u8> {
        let &(arrival, byte) = self.incoming.front()?;
        if arrival > self.clock.now() {
            return None;
        }
        let _ = self.incoming.pop_front();
        self.consumed = self.consumed.wrapping_add(1);
        Some(byte)
    }
}

impl ByteChannel for SimChannel {
    type Config = SimConfig;
    type Error = SimError;

    fn config(&mut self) -> Result<SimConfig, SimError> {
        if self.refuse_config {
            Err(SimError)
        } else {
            Ok(self.config.clone())
        }
    }

    fn configure(&mut self, config: &SimConfig) -> Result<(), SimError> {
        self.log.push(Event::Configure(config.clone()));
        if self.refuse_bus_config && *config != USER_CONFIG {
            return Err(SimError);
        }
        self.config = config.clone();
        Ok(())
    }

    fn bus_config(&self, _current: &SimConfig, settings: &LineSettings) -> SimConfig {
        SimConfig {
            baud_rate: settings.baud_rate,
            data_bits: settings.data_bits,
            parity: settings.parity,
            stop_bits: settings.stop_bits,
            rx_linger_us: settings.rx_linger_us,
        }
    }

    fn flush(&mut self) {
        self.log.push(Event::Flush)
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        let n = self.max_write.map_or(bytes.len(), |max| max.min(bytes.len()));
        self.log.push(Event::Write(bytes[..n].to_vec()));
        if let Some(reply) = self.replies.pop_front() {
            let start = self.clock.now() + reply.delay_us;
            self.incoming.extend(
                reply
                    .bytes
                    .iter()
                    .enumerate()
                    .map(|(i, &byte)| (start + i as u64 * reply.spacing_us, byte)),
            );
        }
        n
    }

    fn available(&mut self) -> usize {
        self.arrived() + self.phantom
    }

    fn read(&mut self, buffer: &mut [u8], _timeout_us: u32) -> usize {
        let mut n = 0;
        for slot in buffer.iter_mut() {
            let Some(byte) = self.pop_arrived() else {
                break;
            };
            *slot = byte;
            n += 1;
        }
        n
    }

    fn pop_raw(&mut self, spin_limit: u32) -> Option<u8> {
        raw::pop(&mut Fifo(self), spin_limit)
    }
}

struct Fifo<'c>(&'c mut SimChannel);

impl RxFifo for Fifo<'_> {
    fn read_pointer(&self) -> u32 {
        self.0.consumed
    }

    fn read_register(&mut self) -> u8 {
        self.0.register_reads += 1;
        self.0.pop_arrived().unwrap_or(0xEE)
    }
}

pub(crate) struct SimLine {
    log: Log,
    pub(crate) level: Option<bool>,
}

impl DirectionLine for SimLine {
    fn set_level(&mut self, high: bool) {
        self.level = Some(high);
        self.log.push(Event::Level(high))
    }
}

pub(crate) type SimBus = Bus<SimChannel, SimLine, SimDelay>;

pub(crate) struct Sim {
    pub(crate) bus: SimBus,
    pub(crate) clock: Clock,
    pub(crate) log: Log,
}

pub(crate) fn sim(settings: Settings) -> Sim {
    let clock = Clock::default();
    let log = Log::default();
    let channel = SimChannel {
        clock: clock.clone(),
        log: log.clone(),
        config: USER_CONFIG,
        refuse_config: false,
        refuse_bus_config: false,
        max_write: None,
        phantom: 0,
        register_reads: 0,
        incoming: VecDeque::new(),
        replies: VecDeque::new(),
        consumed: 0,
    };
    let line = SimLine {
        log: log.clone(),
        level: None,
    };
    let delay = SimDelay {
        clock: clock.clone(),
        calls: 0,
    };
    let bus = Bus::new(channel, line, delay, settings);
    Sim { bus, clock, log }
}

pub(crate) fn default_sim() -> Sim {
    sim(Settings::default())
}

/// A device's status packet, as it would appear on the wire.
pub(crate) fn reply(id: u8, error: u8, parameters: &[u8]) -> Vec<u8> {
    Packet::reply(id, error, parameters)
        .unwrap()
        .encode()
        .as_buffer()
        .to_vec()
}
