// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Routing of the interrupts the secure monitor handles itself.

use arm_gic::{IntId, Trigger};

/// A function called by the interrupt controller driver when an interrupt it was registered for
/// fires.
pub type InterruptHandler = extern "C" fn();

/// Security engine operation completed.
pub const SECURITY_ENGINE_INTID: IntId = IntId::spi(58);
/// Activity monitor.
pub const ACTIVITY_MONITOR_INTID: IntId = IntId::spi(45);
/// Private interrupt used to signal between cores.
pub const CROSS_CORE_INTID: IntId = IntId::ppi(12);

/// GICv2 interrupt group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InterruptGroup {
    /// Secure, signalled as FIQ.
    Group0,
    /// Non-secure, signalled as IRQ.
    Group1,
}

/// The interrupt controller driver.
pub trait InterruptController {
    /// Sets the priority of the given interrupt. 0x00 is the highest priority, 0xFF the lowest.
    fn set_priority(&mut self, int_id: IntId, priority: u8);

    /// Assigns the given interrupt to a group.
    fn set_group(&mut self, int_id: IntId, group: InterruptGroup);

    /// Enables or disables forwarding of the given interrupt.
    fn set_enabled(&mut self, int_id: IntId, enabled: bool);

    /// Sets the mask of cores the given shared interrupt is delivered to.
    fn set_cpu_mask(&mut self, int_id: IntId, mask: u8);

    /// Sets whether the given interrupt is edge or level triggered.
    fn set_trigger(&mut self, int_id: IntId, trigger: Trigger);

    /// Registers the function to call when the given interrupt fires.
    fn register_handler(&mut self, int_id: IntId, handler: InterruptHandler);

    /// Initialises the current core's CPU interface and banked interrupt state.
    fn init_current_core(&mut self);
}

/// The configuration of a single shared interrupt.
#[derive(Clone, Copy, Debug)]
pub struct InterruptConfig {
    /// Interrupt priority.
    /// 0x00 is highest priority, 0xFF is the lowest.
    pub priority: u8,
    /// Interrupt group that this interrupt should belong to.
    pub group: InterruptGroup,
    /// Mask of the cores to deliver the interrupt to.
    pub cpu_mask: u8,
    /// To specify whether this interrupt should be edge or level triggered.
    pub trigger: Trigger,
}

impl InterruptConfig {
    /// Highest priority secure interrupt delivered to core 3 only.
    pub const SECURE_ON_CORE3: Self = Self {
        priority: 0,
        group: InterruptGroup::Group0,
        cpu_mask: 1 << 3,
        trigger: Trigger::Level,
    };
}

/// Configures and enables a shared interrupt.
pub fn configure_shared(gic: &mut impl InterruptController, int_id: IntId, config: InterruptConfig) {
    gic.set_priority(int_id, config.priority);
    gic.set_group(int_id, config.group);
    gic.set_enabled(int_id, true);
    gic.set_cpu_mask(int_id, config.cpu_mask);
    gic.set_trigger(int_id, config.trigger);
}

/// Configures and enables a private interrupt of the current core as a highest priority secure
/// interrupt. Targeting and trigger mode of private interrupts are fixed.
pub fn configure_private_secure(gic: &mut impl InterruptController, int_id: IntId) {
    gic.set_priority(int_id, 0);
    gic.set_group(int_id, InterruptGroup::Group0);
    gic.set_enabled(int_id, true);
}
