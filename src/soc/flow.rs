// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Flow controller.

use crate::mmio::Mmio;

const FLOW_CTLR_BASE: usize = 0x6000_7000;

pub const FLOW_DBG_QUAL: usize = FLOW_CTLR_BASE + 0x050;
pub const BPMP_CLUSTER_CONTROL: usize = FLOW_CTLR_BASE + 0x098;

const ACTIVE_CLUSTER_LOCK: u32 = 1 << 2;
const FIQ2CCPLEX_ENABLE: u32 = 1 << 28;

/// The part of the flow controller driver which manages per-core power state.
pub trait FlowController {
    /// Clears the given core's CSR and pending flow controller events.
    fn clear_events(&mut self, core_index: usize);
}

/// Locks the active CPU cluster and routes FIQs to the CCPLEX, fixing the cluster's operating mode
/// for the rest of boot.
pub fn lock_active_cluster(mmio: &mut impl Mmio) {
    mmio.write32(BPMP_CLUSTER_CONTROL, ACTIVE_CLUSTER_LOCK);
    mmio.write32(FLOW_DBG_QUAL, FIQ2CCPLEX_ENABLE);
}
