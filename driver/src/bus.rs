//! The transaction engine: one request, at most one reply, on a shared
//! half-duplex line.
//!
//! ```text
//! Idle -> Reserved -> Sending -> Receiving -> Idle
//! ```
//!
//! `begin` reserves the serial port and swaps in the bus's frame parameters;
//! dropping the returned [`Transaction`] (or calling [`Transaction::end`])
//! always swaps the original configuration back, however far it got.
//!
//! Nothing here locks. Callers on more than one task must serialize access
//! themselves.

use {
    crate::{
        channel::{ByteChannel, Delay, LineSettings},
        direction::{self, DirectionLine, Polarity, Transmit},
        tap::{NoTap, Tap},
    },
    dxl1_packet::{Packet, Status, constants::HEADER_LEN, packet, stream::Source},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// How many times to sleep and re-check before declaring a timeout.
    pub polls: u16,
    pub poll_interval_us: u32,
    /// Per-byte ceiling on the raw FIFO path.
    pub raw_spin_limit: u32,
    /// Keep transmitting this long after `flush` returns, for UARTs whose
    /// flush returns before the last stop bit is out. Size it on real hardware.
    pub turnaround_us: u32,
}

impl Timing {
    /// About 10 ms per block.
    pub const DEFAULT: Self = Self {
        polls: 100,
        poll_interval_us: 100,
        raw_spin_limit: 10_000,
        turnaround_us: 0,
    };

    /// Saturates at `u32::MAX`.
    #[inline(always)]
    pub const fn deadline_us(&self) -> u32 {
        (self.polls as u32).saturating_mul(self.poll_interval_us)
    }
}

impl Default for Timing {
    #[inline(always)]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where received bytes are read from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceivePath {
    /// The port's ordinary buffered `read`.
    #[default]
    Buffered,
    /// [`ByteChannel::pop_raw`], one byte at a time.
    RawFifo,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// A disabled bus refuses every transaction without touching the port.
    pub enabled: bool,
    pub line: LineSettings,
    pub timing: Timing,
    pub receive: ReceivePath,
    pub polarity: Polarity,
}

impl Settings {
    #[inline]
    pub const fn new(baud_rate: u32) -> Self {
        Self {
            enabled: true,
            line: LineSettings::new(baud_rate),
            timing: Timing::DEFAULT,
            receive: ReceivePath::Buffered,
            polarity: Polarity::ACTIVE_LOW,
        }
    }
}

impl Default for Settings {
    #[inline(always)]
    fn default() -> Self {
        Self::new(LineSettings::default().baud_rate)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Idle,
    Reserved,
    Sending,
    Receiving,
}

/// Something that can carry a request and bring back its reply.
pub trait Transact {
    /// Send `packet` and, unless it was broadcast, overwrite it with a reply
    /// carrying exactly `expected_parameters` parameter bytes.
    fn transact(&mut self, packet: &mut Packet, expected_parameters: u8) -> Status;

    /// Send `packet` without waiting for any reply.
    fn send_only(&mut self, packet: &mut Packet) -> Status;
}

pub struct Bus<C: ByteChannel, D: DirectionLine, W: Delay, T: Tap = NoTap> {
    channel: C,
    direction: D,
    delay: W,
    tap: T,
    settings: Settings,
    phase: Phase,
}

impl<C: ByteChannel, D: DirectionLine, W: Delay> Bus<C, D, W, NoTap> {
    #[inline]
    pub fn new(channel: C, mut direction: D, delay: W, settings: Settings) -> Self {
        let () = direction::listen(&mut direction, settings.polarity);
        Self {
            channel,
            direction,
            delay,
            tap: NoTap,
            settings,
            phase: Phase::Idle,
        }
    }
}

impl<C: ByteChannel, D: DirectionLine, W: Delay, T: Tap> Bus<C, D, W, T> {
    #[inline]
    pub fn with_tap<U: Tap>(self, tap: U) -> Bus<C, D, W, U> {
        let Self {
            channel,
            direction,
            delay,
            tap: _,
            settings,
            phase,
        } = self;
        Bus {
            channel,
            direction,
            delay,
            tap,
            settings,
            phase,
        }
    }

    /// Replace the current tap. `None` leaves it in place.
    #[inline]
    pub fn set_tap(&mut self, tap: Option<T>) {
        if let Some(tap) = tap {
            self.tap = tap;
        }
    }

    #[inline(always)]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
    }

    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Takes effect from the next transaction on.
    #[inline(always)]
    pub fn set_baud_rate(&mut self, baud_rate: u32) {
        self.settings.line.baud_rate = baud_rate;
    }

    #[inline(always)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline(always)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline(always)]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// For configuring the port between transactions.
    #[inline(always)]
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    #[inline(always)]
    pub fn direction(&self) -> &D {
        &self.direction
    }

    #[inline(always)]
    pub fn delay(&self) -> &W {
        &self.delay
    }

    #[inline(always)]
    pub fn tap(&self) -> &T {
        &self.tap
    }

    #[inline]
    pub fn into_parts(self) -> (C, D, W, T) {
        (self.channel, self.direction, self.delay, self.tap)
    }

    /// Throw away whatever an earlier, abandoned exchange left behind.
    #[inline]
    fn drain(&mut self) {
        let mut scratch = [0; 16];
        let mut drained = 0_usize;
        loop {
            let n = self.channel.available().min(scratch.len());
            if n == 0 {
                break;
            }
            let read = self.channel.read(&mut scratch[..n], 0).min(n);
            if read == 0 {
                break;
            }
            let () = self.tap.observe(&scratch[..read]);
            drained += read;
        }
        if drained > 0 {
            trace!("Drained {} stale bytes", drained);
        }
    }

    /// Reserve the port for one transaction.
    #[inline]
    pub fn begin(&mut self) -> Result<Transaction<'_, C, D, W, T>, Status> {
        if !self.settings.enabled {
            warn!("Dynamixel bus disabled; refusing to start a transaction");
            return Err(Status::COM_ERROR | Status::BUS_DISABLED);
        }

        let () = self.channel.flush();
        let () = self.drain();

        let Ok(saved) = self.channel.config() else {
            error!("Couldn't read the serial port's configuration");
            return Err(Status::COM_ERROR | Status::CONFIGURE_FAILED);
        };

        let config = self.channel.bus_config(&saved, &self.settings.line);
        if self.channel.configure(&config).is_err() {
            error!(
                "Couldn't configure the serial port for {} baud",
                self.settings.line.baud_rate
            );
            if self.channel.configure(&saved).is_err() {
                error!("Couldn't restore the serial port's configuration either");
            }
            return Err(Status::COM_ERROR | Status::CONFIGURE_FAILED);
        }

        trace!("Bus reserved at {} baud", self.settings.line.baud_rate);
        self.phase = Phase::Reserved;
        Ok(Transaction { bus: self, saved })
    }

    /// Broadcast one register range to several devices. Nobody replies.
    #[inline]
    pub fn sync_write(
        &mut self,
        address: u8,
        bytes_per_device: u8,
        ids: &[u8],
        data: &[u8],
    ) -> Result<Status, packet::Error> {
        let mut packet = Packet::sync_write(address, bytes_per_device, ids, data)?;
        Ok(self.transact(&mut packet, 0))
    }
}

impl<C: ByteChannel, D: DirectionLine, W: Delay, T: Tap> Transact for Bus<C, D, W, T> {
    #[inline]
    fn transact(&mut self, packet: &mut Packet, expected_parameters: u8) -> Status {
        let mut transaction = match self.begin() {
            Ok(ok) => ok,
            Err(status) => {
                packet.fail(status);
                return status;
            }
        };
        let sent = transaction.send(packet);
        if !sent.is_ok() {
            packet.fail(sent);
            return sent;
        }
        packet.set_status(Status::OK);
        let () = transaction.receive(packet, expected_parameters);
        let () = transaction.end();
        packet.status()
    }

    #[inline]
    fn send_only(&mut self, packet: &mut Packet) -> Status {
        let mut transaction = match self.begin() {
            Ok(ok) => ok,
            Err(status) => {
                packet.fail(status);
                return status;
            }
        };
        let sent = transaction.send(packet);
        let () = transaction.end();
        if sent.is_ok() {
            packet.set_status(sent);
        } else {
            packet.fail(sent);
        }
        sent
    }
}

/// One reserved exchange. The port's original configuration comes back when
/// this is dropped.
pub struct Transaction<'bus, C: ByteChannel, D: DirectionLine, W: Delay, T: Tap> {
    bus: &'bus mut Bus<C, D, W, T>,
    saved: C::Config,
}

impl<C: ByteChannel, D: DirectionLine, W: Delay, T: Tap> Transaction<'_, C, D, W, T> {
    #[inline]
    pub fn send(&mut self, packet: &Packet) -> Status {
        let encoded = packet.encode();
        let buffer = encoded.as_buffer();
        let bus = &mut *self.bus;
        bus.phase = Phase::Sending;
        let written = {
            // Block incoming transmission ONLY WITHIN THIS SCOPE to allow outgoing transmission:
            let _transmit = Transmit::new(&mut bus.direction, bus.settings.polarity);
            let written = bus.channel.write(buffer);
            let () = bus.channel.flush();
            if bus.settings.timing.turnaround_us > 0 {
                let () = bus.delay.delay_us(bus.settings.timing.turnaround_us);
            }
            written
        };
        if written < buffer.len() {
            warn!(
                "Only {} of {} bytes went out to ID {}",
                written,
                buffer.len(),
                packet.id()
            );
            return Status::COM_ERROR;
        }
        trace!("Sent {} bytes to ID {}", buffer.len(), packet.id());
        Status::OK
    }

    /// Wait for and decode the reply to `packet`, in place. Broadcasts return
    /// immediately: nobody answers them.
    #[inline]
    pub fn receive(&mut self, packet: &mut Packet, expected_parameters: u8) {
        if packet.is_broadcast() {
            return;
        }
        let bus = &mut *self.bus;
        bus.phase = Phase::Receiving;
        let mut reader = Reader {
            channel: &mut bus.channel,
            delay: &mut bus.delay,
            tap: &mut bus.tap,
            timing: bus.settings.timing,
            path: bus.settings.receive,
        };
        if !reader.wait_for(HEADER_LEN) {
            warn!("No reply from ID {}", packet.id());
            packet.fail(Status::COM_ERROR | Status::TIMEOUT);
            return;
        }
        let () = packet.receive(&mut reader, expected_parameters);
        let status = packet.status();
        if status.is_ok() {
            trace!("Reply from ID {}: {}", packet.id(), status);
        } else {
            debug!("Reply from ID {}: {}", packet.id(), status);
        }
    }

    #[inline(always)]
    pub fn end(self) {}
}

impl<C: ByteChannel, D: DirectionLine, W: Delay, T: Tap> Drop for Transaction<'_, C, D, W, T> {
    #[inline]
    fn drop(&mut self) {
        if self.bus.channel.configure(&self.saved).is_err() {
            error!("Couldn't restore the serial port's configuration");
        }
        self.bus.phase = Phase::Idle;
    }
}

struct Reader<'bus, C: ByteChannel, W: Delay, T: Tap> {
    channel: &'bus mut C,
    delay: &'bus mut W,
    tap: &'bus mut T,
    timing: Timing,
    path: ReceivePath,
}

impl<C: ByteChannel, W: Delay, T: Tap> Reader<'_, C, W, T> {
    /// Checks once up front and once after each of `timing.polls` sleeps.
    #[inline]
    fn wait_for(&mut self, n: usize) -> bool {
        let mut remaining = self.timing.polls;
        loop {
            if self.channel.available() >= n {
                return true;
            }
            if remaining == 0 {
                return false;
            }
            remaining -= 1;
            let () = self.delay.delay_us(self.timing.poll_interval_us);
        }
    }
}

impl<C: ByteChannel, W: Delay, T: Tap> Source for Reader<'_, C, W, T> {
    #[inline]
    fn fill(&mut self, buffer: &mut [u8]) -> usize {
        if buffer.is_empty() {
            return 0;
        }
        if !self.wait_for(buffer.len()) {
            warn!("Timed out waiting for {} bytes", buffer.len());
            return 0;
        }
        let n = match self.path {
            ReceivePath::Buffered => self.channel.read(buffer, self.timing.deadline_us()),
            ReceivePath::RawFifo => {
                let mut n = 0;
                for slot in buffer.iter_mut() {
                    let Some(byte) = self.channel.pop_raw(self.timing.raw_spin_limit) else {
                        warn!("Receive FIFO stalled after {} bytes", n);
                        break;
                    };
                    *slot = byte;
                    n += 1;
                }
                n
            }
        }
        .min(buffer.len());
        let () = self.tap.observe(&buffer[..n]);
        n
    }
}
