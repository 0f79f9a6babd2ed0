// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A fixed-capacity, insertion-ordered map which behaves like a FIFO ring buffer keyed by
//! unique identifiers.
//!
//! - [`cache::RingMap`]: the single-threaded map. Pushing past capacity evicts the oldest
//!   entry, and pushing an existing key updates its value in place.
//! - [`cache::SharedRingMap`]: the same operations guarded by one readers-writer lock.
//! - [`config::RingMapConfig`]: capacity and logging configuration, parsed from a spec
//!   string, the `CIRCLEMAP_CONFIG` environment variable, or any serde format.
//!
//! Library code logs through the `log` facade; no logger is installed here.

#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]

pub mod cache;
pub mod config;
