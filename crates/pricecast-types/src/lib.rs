// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of PriceCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

pub mod pricing;
pub mod regions;
pub mod timestamp;

pub use pricing::{CurrentPrice, Horizon, PricePoint, Snapshot};
pub use regions::{DEFAULT_API_URL, DEFAULT_REGION_ID, REGIONS, is_known_region, region_name};
pub use timestamp::parse_timestamp;
