// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

/// The number of bytes of stack space to reserve for each core.
#[cfg_attr(test, allow(unused))]
const STACK_SIZE: usize = 0x2000;

#[cfg(all(target_arch = "aarch64", not(test)))]
mod asm {
    use super::*;
    use crate::platform::{Platform, PlatformImpl};
    use core::arch::global_asm;

    global_asm!(
        // Points the stack pointer at the top of the current core's stack. Only clobbers x0, x1, x2,
        // x9 and x30, so it may be called before anything has been saved.
        ".global secmon_set_my_stack",
        ".type secmon_set_my_stack, %function",
        "secmon_set_my_stack:",
            "mov	x9, x30",
            "mrs	x0, mpidr_el1",
            "bl	{core_position}",
            "adrp	x2, (secmon_stacks + {STACK_SIZE})",
            "add	x2, x2, :lo12:(secmon_stacks + {STACK_SIZE})",
            "mov	x1, #{STACK_SIZE}",
            "madd	x0, x0, x1, x2",
            "mov	sp, x0",
            "ret	x9",
        ".size secmon_set_my_stack, . - secmon_set_my_stack",

        ".pushsection .bss.stacks, \"aw\", %nobits",
        ".balign 16",
        "secmon_stacks:",
        ".space ({CORE_COUNT} * {STACK_SIZE}), 0",
        ".popsection",

        STACK_SIZE = const STACK_SIZE,
        CORE_COUNT = const PlatformImpl::CORE_COUNT,
        core_position = sym PlatformImpl::core_position,
    );
}
