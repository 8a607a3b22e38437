//! Fixed-interval sampling session.
//!
//! A [`Sampler`] owns one bus endpoint, one device codec and one sink. It is driven
//! cooperatively: the caller either polls it with a monotonic millisecond clock
//! ([`Sampler::poll`]) or hands it a delay provider ([`Sampler::run`]). Each tick
//! runs to completion before the next one can start, so the bus handle is never
//! used concurrently.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::accelerometer::Adxl345;
use crate::adc::Mcp3008;
use crate::config::{AccelerometerConfig, AdcConfig, ConfigError};
use crate::error::{Error, OpenError, ProtocolError, Result};
use crate::interface::{BusHandle, BusProvider, Endpoint};
use crate::log::{info, warning};

/// Device codec driven by a [`Sampler`].
pub trait Sensor<H> {
    /// Validated reading straight off the bus.
    type Raw;
    /// Calibrated value handed to the sink.
    type Sample;
    /// Error type of the bus handle.
    type BusError: fmt::Debug;

    /// One-time device setup after the bus is opened. Errors are logged and the
    /// session continues.
    fn initialize(&mut self, handle: &mut H) -> Result<(), Self::BusError>;

    /// Performs one read transaction.
    fn read_raw(&mut self, handle: &mut H) -> Result<Self::Raw, Self::BusError>;

    /// Maps a raw reading to its calibrated value.
    fn calibrate(&self, raw: Self::Raw) -> Self::Sample;
}

/// Receiver of published samples and failures.
///
/// Called synchronously from the tick; implementations should return quickly.
pub trait SampleSink<T> {
    /// A tick produced a valid sample.
    fn on_sample(&mut self, sample: T);

    /// A tick failed; the session stays armed.
    fn on_failure(&mut self, kind: FailureKind, message: fmt::Arguments<'_>);
}

impl<T, S: SampleSink<T> + ?Sized> SampleSink<T> for &mut S {
    fn on_sample(&mut self, sample: T) {
        (**self).on_sample(sample);
    }

    fn on_failure(&mut self, kind: FailureKind, message: fmt::Arguments<'_>) {
        (**self).on_failure(kind, message);
    }
}

/// Classification of a failed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureKind {
    /// The bus transfer itself failed.
    BusIo,
    /// The response violated the expected bit pattern.
    FramingMismatch,
    /// The device had no conversion result yet.
    NotReady,
    /// The configured channel was rejected.
    InvalidChannel,
    /// The bus handle was already released.
    Closed,
}

impl<E> From<&Error<E>> for FailureKind {
    fn from(err: &Error<E>) -> Self {
        match err {
            Error::Interface(_) => Self::BusIo,
            Error::Protocol(ProtocolError::FramingMismatch) => Self::FramingMismatch,
            Error::Protocol(ProtocolError::NotReady) => Self::NotReady,
            Error::InvalidChannel(_) => Self::InvalidChannel,
            Error::Closed => Self::Closed,
        }
    }
}

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No bus handle, no schedule.
    Stopped,
    /// Bus open, ticks scheduled.
    Armed,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// A sample was handed to the sink.
    Published,
    /// A failure was handed to the sink.
    Failed(FailureKind),
}

/// Periodic read-decode-calibrate-publish loop over one bus endpoint.
pub struct Sampler<P: BusProvider, D, S> {
    provider: P,
    device: D,
    sink: S,
    endpoint: Endpoint,
    interval_ms: u32,
    bus: Option<BusHandle<P::Handle>>,
    next_tick_ms: Option<u64>,
}

/// Sampler for an ADXL345 on I2C.
pub type AccelerometerSampler<P, S> = Sampler<P, Adxl345, S>;

/// Sampler for an MCP3008 on SPI.
pub type AdcSampler<P, S> = Sampler<P, Mcp3008, S>;

impl<P: BusProvider, S> Sampler<P, Adxl345, S> {
    /// Builds an accelerometer sampler from a validated configuration.
    pub fn accelerometer(provider: P, config: AccelerometerConfig, sink: S) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            provider,
            Adxl345::new(config.address),
            sink,
            config.endpoint(),
            config.interval_ms,
        ))
    }
}

impl<P: BusProvider, S> Sampler<P, Mcp3008, S> {
    /// Builds an ADC sampler from a validated configuration.
    pub fn adc(provider: P, config: AdcConfig, sink: S) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            provider,
            Mcp3008::new(config.channel).with_framing_mask(config.framing_mask),
            sink,
            config.endpoint(),
            config.interval_ms,
        ))
    }
}

impl<P: BusProvider, D, S> Sampler<P, D, S> {
    // ==================================================================
    // == Construction & Accessors ======================================
    // ==================================================================
    /// Creates a stopped sampler. `interval_ms` must be non-zero.
    pub fn new(provider: P, device: D, sink: S, endpoint: Endpoint, interval_ms: u32) -> Self {
        debug_assert!(interval_ms > 0);
        Self {
            provider,
            device,
            sink,
            endpoint,
            interval_ms,
            bus: None,
            next_tick_ms: None,
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        if self.next_tick_ms.is_some() {
            SessionState::Armed
        } else {
            SessionState::Stopped
        }
    }

    /// Returns `true` while ticks are scheduled.
    pub fn is_armed(&self) -> bool {
        self.state() == SessionState::Armed
    }

    /// Returns `true` while a bus handle is held.
    pub fn is_bus_open(&self) -> bool {
        self.bus.as_ref().is_some_and(BusHandle::is_open)
    }

    /// Tick period in milliseconds.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Endpoint opened on [`start`](Self::start).
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Time of the next scheduled tick, if armed.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.next_tick_ms
    }

    /// Provides shared access to the device codec.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Provides shared access to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Provides mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Provides shared access to the bus provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // ==================================================================
    // == Session Control ===============================================
    // ==================================================================
    /// Disarms the schedule, then releases the bus handle.
    ///
    /// Safe to call when already stopped or never started.
    pub fn stop(&mut self) {
        let was_armed = self.next_tick_ms.take().is_some();

        if let Some(mut bus) = self.bus.take() {
            bus.close(&mut self.provider);
        }

        if was_armed {
            info!("sampling on bus {} stopped", self.endpoint.bus);
        }
    }
}

impl<P, D, S> Sampler<P, D, S>
where
    P: BusProvider,
    D: Sensor<P::Handle>,
    S: SampleSink<D::Sample>,
{
    /// Opens the bus, initializes the device and schedules the first tick at
    /// `now_ms + interval`.
    ///
    /// A running session is stopped first. If the bus cannot be opened the sampler
    /// stays stopped and the error is returned.
    pub fn start(&mut self, now_ms: u64) -> core::result::Result<(), OpenError<P::Error>> {
        self.stop();

        let mut bus = BusHandle::open(&mut self.provider, self.endpoint)?;
        if let Ok(handle) = bus.device_mut::<D::BusError>() {
            // Initialization failures are non-fatal.
            if let Err(err) = self.device.initialize(handle) {
                warning!(
                    "device init on bus {} failed ({:?}), sampling anyway",
                    self.endpoint.bus,
                    FailureKind::from(&err)
                );
            }
        }

        self.bus = Some(bus);
        self.next_tick_ms = Some(now_ms.saturating_add(u64::from(self.interval_ms)));
        info!(
            "sampling on bus {} device {} every {} ms",
            self.endpoint.bus, self.endpoint.address, self.interval_ms
        );
        Ok(())
    }

    /// Runs one tick if one is due at `now_ms`.
    ///
    /// At most one tick runs per call. When the caller falls behind by more than one
    /// interval the missed ticks are dropped and the schedule restarts from `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Option<TickOutcome> {
        let due = self.next_tick_ms?;
        if now_ms < due {
            return None;
        }

        let interval = u64::from(self.interval_ms);
        let mut next = due.saturating_add(interval);
        if next <= now_ms {
            next = now_ms.saturating_add(interval);
        }
        self.next_tick_ms = Some(next);

        self.tick()
    }

    /// Runs one read-decode-calibrate-publish cycle now, if armed.
    ///
    /// Read failures are reported to the sink and never end the session.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.next_tick_ms.is_none() {
            return None;
        }
        let bus = self.bus.as_mut()?;

        let result = bus
            .device_mut::<D::BusError>()
            .and_then(|handle| self.device.read_raw(handle));

        match result {
            Ok(raw) => {
                let sample = self.device.calibrate(raw);
                self.sink.on_sample(sample);
                Some(TickOutcome::Published)
            }
            Err(err) => {
                let kind = FailureKind::from(&err);
                warning!("sampling on bus {} failed this tick", self.endpoint.bus);
                self.sink.on_failure(kind, format_args!("{err}"));
                Some(TickOutcome::Failed(kind))
            }
        }
    }

    /// Blocking runner: alternates a tick and a `delay_ms(interval)` up to `ticks`
    /// times, returning early once the session is stopped.
    ///
    /// Returns the number of ticks executed.
    pub fn run(&mut self, delay: &mut impl DelayNs, ticks: usize) -> usize {
        let mut executed = 0;
        while executed < ticks && self.is_armed() {
            delay.delay_ms(self.interval_ms);
            if self.tick().is_none() {
                break;
            }
            executed += 1;
        }
        executed
    }
}

impl<P: BusProvider, D, S> Drop for Sampler<P, D, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureKind, Sampler, Sensor, SessionState, TickOutcome};
    use crate::accelerometer::Adxl345;
    use crate::adc::Mcp3008;
    use crate::config::{AccelerometerConfig, AdcConfig, ConfigError};
    use crate::error::{Error, ProtocolError, Result};
    use crate::params::AdcChannel;
    use crate::sample::{Acceleration, AdcCode};
    use crate::testing::{
        FakeProvider, RecordingSink, ScriptedSpi, SpiFault, Unavailable, i2c_endpoint, spi_endpoint,
    };
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec;
    use std::vec::Vec;

    fn arm_write() -> I2cTransaction {
        I2cTransaction::write(0x53, vec![0x2D, 0x08])
    }

    fn axis_reads(x: [u8; 2], y: [u8; 2], z: [u8; 2]) -> [I2cTransaction; 3] {
        [
            I2cTransaction::write_read(0x53, vec![0x32], x.to_vec()),
            I2cTransaction::write_read(0x53, vec![0x34], y.to_vec()),
            I2cTransaction::write_read(0x53, vec![0x36], z.to_vec()),
        ]
    }

    fn accelerometer(
        i2c: &I2cMock,
    ) -> Sampler<FakeProvider<I2cMock>, Adxl345, RecordingSink<Acceleration>> {
        Sampler::accelerometer(
            FakeProvider::new(i2c.clone()),
            AccelerometerConfig::default(),
            RecordingSink::new(),
        )
        .unwrap()
    }

    fn adc(spi: &ScriptedSpi) -> Sampler<FakeProvider<ScriptedSpi>, Mcp3008, RecordingSink<AdcCode>> {
        Sampler::adc(FakeProvider::new(spi.clone()), AdcConfig::default(), RecordingSink::new()).unwrap()
    }

    #[test]
    fn start_arms_and_schedules_the_first_tick() {
        let mut i2c = I2cMock::new(&[arm_write()]);
        let mut sampler = accelerometer(&i2c);
        assert_eq!(sampler.state(), SessionState::Stopped);

        sampler.start(1_000).unwrap();

        assert_eq!(sampler.state(), SessionState::Armed);
        assert_eq!(sampler.next_deadline_ms(), Some(1_300));
        assert_eq!(sampler.provider().endpoints, [i2c_endpoint()]);
        assert_eq!(sampler.poll(1_299), None);

        sampler.stop();
        i2c.done();
    }

    #[test]
    fn ticks_publish_calibrated_acceleration() {
        let mut expectations = vec![arm_write()];
        expectations.extend(axis_reads([0x00, 0x01], [0x80, 0xFF], [0x00, 0x00]));
        let mut i2c = I2cMock::new(&expectations);
        let mut sampler = accelerometer(&i2c);

        sampler.start(0).unwrap();
        assert_eq!(sampler.poll(300), Some(TickOutcome::Published));
        sampler.stop();

        assert_eq!(sampler.sink().samples, [Acceleration { x: 1.0, y: -0.5, z: 0.0 }]);
        assert!(sampler.sink().failures.is_empty());
        i2c.done();
    }

    #[test]
    fn failed_arm_write_does_not_abort_the_session() {
        let mut expectations = vec![arm_write().with_error(ErrorKind::Other)];
        expectations.extend(axis_reads([0x00, 0x00], [0x00, 0x00], [0x00, 0x01]));
        let mut i2c = I2cMock::new(&expectations);
        let mut sampler = accelerometer(&i2c);

        sampler.start(0).unwrap();
        assert!(sampler.is_armed());
        assert_eq!(sampler.tick(), Some(TickOutcome::Published));
        assert!(sampler.sink().failures.is_empty());

        sampler.stop();
        i2c.done();
    }

    /// Device whose initialization always fails; reads succeed.
    struct NoInit {
        init_calls: usize,
    }

    impl Sensor<ScriptedSpi> for NoInit {
        type Raw = u16;
        type Sample = u16;
        type BusError = SpiFault;

        fn initialize(&mut self, _handle: &mut ScriptedSpi) -> Result<(), SpiFault> {
            self.init_calls += 1;
            Err(Error::Protocol(ProtocolError::NotReady))
        }

        fn read_raw(&mut self, _handle: &mut ScriptedSpi) -> Result<u16, SpiFault> {
            Ok(42)
        }

        fn calibrate(&self, raw: u16) -> u16 {
            raw
        }
    }

    #[test]
    fn failed_initialize_is_logged_and_sampling_continues() {
        let spi = ScriptedSpi::new();
        let mut sampler = Sampler::new(
            FakeProvider::new(spi),
            NoInit { init_calls: 0 },
            RecordingSink::new(),
            spi_endpoint(),
            50,
        );

        assert!(sampler.start(0).is_ok());
        assert_eq!(sampler.device().init_calls, 1);
        assert!(sampler.is_armed());
        assert!(sampler.sink().failures.is_empty());

        assert_eq!(sampler.poll(50), Some(TickOutcome::Published));
        assert_eq!(sampler.sink().samples, [42]);
        sampler.stop();
    }

    #[test]
    fn bus_error_is_reported_and_next_tick_recovers() {
        let mut expectations = vec![
            arm_write(),
            I2cTransaction::write_read(0x53, vec![0x32], vec![0x00, 0x00]).with_error(ErrorKind::Other),
        ];
        expectations.extend(axis_reads([0x00, 0x01], [0x00, 0x01], [0x00, 0x01]));
        let mut i2c = I2cMock::new(&expectations);
        let mut sampler = accelerometer(&i2c);

        sampler.start(0).unwrap();
        assert_eq!(sampler.poll(300), Some(TickOutcome::Failed(FailureKind::BusIo)));
        assert!(sampler.is_armed());
        assert_eq!(sampler.poll(600), Some(TickOutcome::Published));
        sampler.stop();

        let sink = sampler.sink();
        assert_eq!(sink.failures.len(), 1);
        assert_eq!(sink.failures[0].0, FailureKind::BusIo);
        assert!(sink.failures[0].1.starts_with("bus transfer failed"));
        assert_eq!(sink.samples, [Acceleration { x: 1.0, y: 1.0, z: 1.0 }]);
        i2c.done();
    }

    #[test]
    fn stop_before_first_tick_issues_no_transfer() {
        let mut i2c = I2cMock::new(&[arm_write()]);
        let mut sampler = accelerometer(&i2c);

        sampler.start(0).unwrap();
        sampler.stop();

        assert_eq!(sampler.poll(300), None);
        assert_eq!(sampler.poll(10_000), None);
        assert_eq!(sampler.tick(), None);
        assert!(sampler.sink().samples.is_empty());
        i2c.done();
    }

    #[test]
    fn stop_twice_closes_the_handle_once() {
        let spi = ScriptedSpi::new();
        let mut sampler = adc(&spi);

        sampler.start(0).unwrap();
        sampler.stop();
        sampler.stop();

        assert!(!sampler.is_bus_open());
        assert_eq!(sampler.provider().opened, 1);
        assert_eq!(sampler.provider().closed, 1);
        assert_eq!(sampler.state(), SessionState::Stopped);
    }

    #[test]
    fn stop_without_start_is_a_no_op() {
        let spi = ScriptedSpi::new();
        let mut sampler = adc(&spi);

        sampler.stop();

        assert_eq!(sampler.provider().opened, 0);
        assert_eq!(sampler.provider().closed, 0);
        assert!(spi.requests().is_empty());
    }

    #[test]
    fn open_failure_leaves_the_sampler_stopped() {
        let mut sampler = Sampler::adc(
            FakeProvider::failing(ScriptedSpi::new()),
            AdcConfig::default(),
            RecordingSink::<AdcCode>::new(),
        )
        .unwrap();

        let err = sampler.start(0).unwrap_err();

        assert_eq!(err.source, Unavailable);
        assert_eq!((err.bus, err.address), (0, 0));
        assert_eq!(sampler.state(), SessionState::Stopped);
        assert_eq!(sampler.poll(50), None);
    }

    #[test]
    fn adc_protocol_failures_keep_the_loop_running() {
        let mut spi = ScriptedSpi::new();
        spi.push_frame([0x00, 0x04, 0x00]);
        spi.push_fault();
        spi.push_frame([0x00, 0x02, 0x34]);
        let mut sampler = adc(&spi);

        sampler.start(0).unwrap();
        let outcomes: Vec<_> = [50, 100, 150].into_iter().filter_map(|t| sampler.poll(t)).collect();
        sampler.stop();

        assert_eq!(
            outcomes,
            [
                TickOutcome::Failed(FailureKind::NotReady),
                TickOutcome::Failed(FailureKind::BusIo),
                TickOutcome::Published,
            ]
        );
        assert_eq!(sampler.sink().samples, [564]);
        assert_eq!(spi.requests(), [[0x01, 0x80, 0x00]; 3]);
    }

    #[test]
    fn strict_framing_reports_framing_mismatch() {
        let mut spi = ScriptedSpi::new();
        spi.push_frame([0x10, 0x00, 0x00]);
        let config = AdcConfig::new().channel(AdcChannel::Ch7).framing_mask(0xFF).build();
        let mut sampler = Sampler::adc(FakeProvider::new(spi.clone()), config, RecordingSink::new()).unwrap();

        sampler.start(0).unwrap();
        assert_eq!(sampler.tick(), Some(TickOutcome::Failed(FailureKind::FramingMismatch)));
        sampler.stop();

        assert_eq!(sampler.sink().failures[0].1, "response framing mismatch");
        assert_eq!(spi.requests(), [[0x01, 0xF0, 0x00]]);
    }

    #[test]
    fn late_polls_do_not_replay_missed_ticks() {
        let mut spi = ScriptedSpi::new();
        spi.push_frame([0x00, 0x00, 0x01]);
        spi.push_frame([0x00, 0x00, 0x02]);
        let mut sampler = adc(&spi);

        sampler.start(0).unwrap();
        assert_eq!(sampler.poll(1_000), Some(TickOutcome::Published));
        assert_eq!(sampler.next_deadline_ms(), Some(1_050));
        assert_eq!(sampler.poll(1_000), None);
        assert_eq!(sampler.poll(1_050), Some(TickOutcome::Published));
        assert_eq!(sampler.next_deadline_ms(), Some(1_100));
        sampler.stop();

        assert_eq!(sampler.sink().samples, [1, 2]);
    }

    #[test]
    fn restart_closes_the_previous_handle_first() {
        let spi = ScriptedSpi::new();
        let mut sampler = adc(&spi);

        sampler.start(0).unwrap();
        sampler.start(10).unwrap();

        assert_eq!(sampler.provider().opened, 2);
        assert_eq!(sampler.provider().closed, 1);
        assert_eq!(sampler.next_deadline_ms(), Some(60));
        sampler.stop();
        assert_eq!(sampler.provider().closed, 2);
    }

    #[test]
    fn run_ticks_until_the_budget_is_spent() {
        let mut spi = ScriptedSpi::new();
        for code in [10u8, 20, 30] {
            spi.push_frame([0x00, 0x00, code]);
        }
        let mut sampler = adc(&spi);

        assert_eq!(sampler.run(&mut NoopDelay::new(), 3), 0);

        sampler.start(0).unwrap();
        assert_eq!(sampler.run(&mut NoopDelay::new(), 3), 3);
        sampler.stop();

        assert_eq!(sampler.sink().samples, [10, 20, 30]);
    }

    #[test]
    fn dropping_an_armed_sampler_releases_the_bus() {
        let spi = ScriptedSpi::new();
        let mut provider = FakeProvider::new(spi.clone());
        {
            let mut sampler = Sampler::new(
                &mut provider,
                Mcp3008::default(),
                RecordingSink::<AdcCode>::new(),
                spi_endpoint(),
                50,
            );
            sampler.start(0).unwrap();
        }

        assert_eq!(provider.opened, 1);
        assert_eq!(provider.closed, 1);
    }

    #[test]
    fn sink_can_be_borrowed() {
        let mut spi = ScriptedSpi::new();
        spi.push_frame([0x00, 0x01, 0x00]);
        let mut sink = RecordingSink::<AdcCode>::new();
        {
            let mut sampler = Sampler::adc(FakeProvider::new(spi.clone()), AdcConfig::default(), &mut sink).unwrap();
            sampler.start(0).unwrap();
            assert_eq!(sampler.tick(), Some(TickOutcome::Published));
        }

        assert_eq!(sink.samples, [256]);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = AdcConfig::new().interval_ms(0).build();
        let result = Sampler::adc(FakeProvider::new(ScriptedSpi::new()), config, RecordingSink::<AdcCode>::new());
        assert!(matches!(result, Err(ConfigError::ZeroInterval)));
    }
}
