// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

macro_rules! select_platform {
    (platform = $condition:literal, $mod:ident::$plat_impl:ident) => {
        #[cfg(platform = $condition)]
        mod $mod;

        #[cfg(platform = $condition)]
        pub use $mod::$plat_impl as PlatformImpl;
    };
    (test, $mod:ident::$plat_impl:ident) => {
        #[cfg(test)]
        pub mod $mod;

        #[cfg(test)]
        pub use $mod::$plat_impl as PlatformImpl;
    };
}

select_platform!(platform = "tegra210", tegra210::Tegra210);
select_platform!(test, test::TestPlatform);

use crate::{
    context::ContextManager,
    fuse::Fuses,
    interrupt::{InterruptController, InterruptHandler},
    logger::LogSink,
    mmio::Mmio,
    security_engine::SecurityEngine,
    soc::{flow::FlowController, mc::Carveouts},
    sysregs::SystemRegisters,
};

/// Type alias for convenience, to avoid having to use the complicated type name everywhere.
pub type LogSinkImpl = <PlatformImpl as Platform>::LogSinkImpl;

/// The security engine driver of the platform being built for.
pub type SecurityEngineImpl = <PlatformImpl as Platform>::SecurityEngineImpl;

/// The hooks implemented by all platforms.
///
/// # Safety
///
/// `core_position` must be a naked function which doesn't access the stack or any other memory,
/// only clobbers x0 and x1, and returns a unique index less than `CORE_COUNT` for each core.
pub unsafe trait Platform: Sized {
    /// The number of CPU cores.
    const CORE_COUNT: usize;

    /// The handler for the activity monitor interrupt.
    const ACTIVITY_MONITOR_HANDLER: InterruptHandler;

    /// Platform dependent LogSink implementation type for Logger.
    type LogSinkImpl: LogSink;

    /// Register access used for everything the boot sequence programs directly.
    type MmioImpl: Mmio;
    /// Fuse and config item reader.
    type FusesImpl: Fuses;
    /// Security engine driver.
    type SecurityEngineImpl: SecurityEngine;
    /// Memory carveout driver.
    type CarveoutsImpl: Carveouts;
    /// Interrupt controller driver.
    type InterruptControllerImpl: InterruptController;
    /// Flow controller driver.
    type FlowControllerImpl: FlowController;
    /// Per-core context storage.
    type ContextManagerImpl: ContextManager;
    /// The current core's system registers.
    type SystemRegistersImpl: SystemRegisters;

    /// Initialises the logger.
    ///
    /// Any logs sent before this is called will be ignored.
    fn init_logger();

    /// Returns handles to all the hardware the boot sequence drives.
    ///
    /// # Safety
    ///
    /// The returned handles alias the same devices every time, so at most one `Hardware` may be
    /// live at once, and only on the core currently running the boot sequence.
    unsafe fn hardware() -> Hardware<Self>;

    /// Returns the physical address at which cores enter the secure monitor when they leave reset.
    fn warmboot_entry_address() -> usize;

    /// Given a valid MPIDR value, returns the corresponding linear core index.
    ///
    /// The implementation must never return the same index for two different valid MPIDR values,
    /// and must never return a value greater than or equal to the corresponding
    /// `Platform::CORE_COUNT`.
    ///
    /// For an invalid MPIDR value no guarantees are made about the return value.
    extern "C" fn core_position(mpidr: u64) -> usize;
}

/// Everything the lockdown and the per-core initialisation act on.
pub struct Hardware<P: Platform> {
    pub mmio: P::MmioImpl,
    pub fuses: P::FusesImpl,
    pub security_engine: P::SecurityEngineImpl,
    pub carveouts: P::CarveoutsImpl,
    pub gic: P::InterruptControllerImpl,
    pub flow: P::FlowControllerImpl,
    pub context: P::ContextManagerImpl,
    pub sysregs: P::SystemRegistersImpl,
}

/// The hardware of the platform being built for.
pub type HardwareImpl = Hardware<PlatformImpl>;
