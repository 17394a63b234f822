// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Minimal polled driver for the 16550 compatible UARTs, used as the log sink.

use crate::mmio::Mmio;
use core::fmt;

/// Base address of UART A.
pub const UART_A_BASE: usize = 0x7000_6000;

const THR: usize = 0x00;
const LSR: usize = 0x14;

/// Transmit holding register empty.
const LSR_THRE: u32 = 1 << 5;

/// A UART which has already been set up by the boot ROM or an earlier stage.
pub struct Uart<M: Mmio> {
    mmio: M,
    base: usize,
}

impl<M: Mmio> Uart<M> {
    /// Creates a driver for the UART at `base`.
    pub const fn new(mmio: M, base: usize) -> Self {
        Self { mmio, base }
    }

    fn putc(&mut self, c: u8) {
        while self.mmio.read32(self.base + LSR) & LSR_THRE == 0 {}
        self.mmio.write32(self.base + THR, c.into());
    }
}

impl<M: Mmio> fmt::Write for Uart<M> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.bytes() {
            if c == b'\n' {
                self.putc(b'\r');
            }
            self.putc(c);
        }
        Ok(())
    }
}
