// SPDX-FileCopyrightText: Copyright (c) 2024-2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Source of randomness for the converters.
///
/// Passed into every conversion so that a run is reproducible from its seed, and so that tests
/// can swap in a fixed sequence.
pub trait Sampler {
    /// Draw from a normal distribution with the given `mean` and `stddev`, never returning
    /// less than `lower`.
    fn bounded_normal(&mut self, mean: f64, stddev: f64, lower: f64) -> f64;

    /// Pick an index in `0..len`; `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
}

/// [`Sampler`] backed by a seeded [`StdRng`]
#[derive(Debug, Clone)]
pub struct SeededSampler {
    rng: StdRng,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        SeededSampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for SeededSampler {
    fn bounded_normal(&mut self, mean: f64, stddev: f64, lower: f64) -> f64 {
        let value = match Normal::new(mean, stddev) {
            Ok(normal) if stddev > 0.0 => normal.sample(&mut self.rng),
            _ => mean,
        };
        value.max(lower)
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
