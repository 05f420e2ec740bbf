// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Convolution kernels used when gridding: the anti-aliasing function and the
//! w-projection kernels.

mod anti_aliasing;
mod error;
mod spheroidal;
mod w;

pub use anti_aliasing::anti_aliasing_function;
pub use error::{KernelError, SpheroidalError};
pub use spheroidal::{prolate_characteristic_value, prolate_spheroidal_angular};
pub use w::{w_kernel, w_phase_screen, WScreenPolicy};
