//! Shared fakes for unit tests.

use core::cell::RefCell;
use core::fmt;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_hal::spi::{self, ErrorType, Operation, SpiDevice};

use crate::interface::{BusProvider, BusSettings, Endpoint};
use crate::params::{BitOrder, I2cSpeed, SpiMode};
use crate::sampler::{FailureKind, SampleSink};

pub fn i2c_endpoint() -> Endpoint {
    Endpoint {
        bus: 1,
        address: 0x53,
        settings: BusSettings::I2c {
            speed: I2cSpeed::Standard,
        },
    }
}

pub fn spi_endpoint() -> Endpoint {
    Endpoint {
        bus: 0,
        address: 0,
        settings: BusSettings::Spi {
            clock_hz: 3_600_000,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            bits_per_word: 8,
        },
    }
}

/// Hands out clones of one handle and counts open/close calls.
pub struct FakeProvider<H> {
    handle: H,
    fail_open: bool,
    pub opened: usize,
    pub closed: usize,
    pub endpoints: Vec<Endpoint>,
}

impl<H: Clone> FakeProvider<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            fail_open: false,
            opened: 0,
            closed: 0,
            endpoints: Vec::new(),
        }
    }

    pub fn failing(handle: H) -> Self {
        Self {
            fail_open: true,
            ..Self::new(handle)
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened > self.closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unavailable;

impl<H: Clone> BusProvider for FakeProvider<H> {
    type Handle = H;
    type Error = Unavailable;

    fn open(&mut self, endpoint: &Endpoint) -> Result<H, Unavailable> {
        self.endpoints.push(*endpoint);
        if self.fail_open {
            return Err(Unavailable);
        }
        self.opened += 1;
        Ok(self.handle.clone())
    }

    fn close(&mut self, handle: H) {
        assert!(self.is_open(), "close without a matching open");
        self.closed += 1;
        drop(handle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiFault;

impl spi::Error for SpiFault {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

enum Reply {
    Frame([u8; 3]),
    Fault,
}

#[derive(Default)]
struct SpiScript {
    replies: VecDeque<Reply>,
    requests: Vec<[u8; 3]>,
}

/// `SpiDevice` that answers 3-byte transfers from a script. Clones share state.
#[derive(Clone, Default)]
pub struct ScriptedSpi {
    script: Rc<RefCell<SpiScript>>,
}

impl ScriptedSpi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, frame: [u8; 3]) {
        self.script.borrow_mut().replies.push_back(Reply::Frame(frame));
    }

    pub fn push_fault(&mut self) {
        self.script.borrow_mut().replies.push_back(Reply::Fault);
    }

    pub fn requests(&self) -> Vec<[u8; 3]> {
        self.script.borrow().requests.clone()
    }
}

impl ErrorType for ScriptedSpi {
    type Error = SpiFault;
}

impl SpiDevice for ScriptedSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut script = self.script.borrow_mut();
        for operation in operations.iter_mut() {
            match operation {
                Operation::Transfer(read, write) => {
                    let request: [u8; 3] = (*write).try_into().expect("3-byte request");
                    script.requests.push(request);
                    match script.replies.pop_front().expect("unexpected SPI transfer") {
                        Reply::Frame(frame) => read.copy_from_slice(&frame),
                        Reply::Fault => return Err(SpiFault),
                    }
                }
                _ => panic!("only full-duplex transfers are expected"),
            }
        }
        Ok(())
    }
}

/// Sink that records everything it is handed.
pub struct RecordingSink<T> {
    pub samples: Vec<T>,
    pub failures: Vec<(FailureKind, String)>,
}

impl<T> RecordingSink<T> {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> SampleSink<T> for RecordingSink<T> {
    fn on_sample(&mut self, sample: T) {
        self.samples.push(sample);
    }

    fn on_failure(&mut self, kind: FailureKind, message: fmt::Arguments<'_>) {
        self.failures.push((kind, message.to_string()));
    }
}
