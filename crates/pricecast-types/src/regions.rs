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

/// Forecast service used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const DEFAULT_REGION_ID: &str = "DE";

/// Regions served by the forecast service (id, display name)
pub const REGIONS: &[(&str, &str)] = &[
    ("DE", "Germany (National Average)"),
    ("DE-BY", "Bavaria (Bayern)"),
    ("DE-BW", "Baden-Württemberg"),
    ("DE-NW", "North Rhine-Westphalia (NRW)"),
    ("DE-NI", "Lower Saxony (Niedersachsen)"),
    ("DE-HE", "Hesse (Hessen)"),
    ("DE-BE", "Berlin & Brandenburg"),
    ("DE-HH", "Hamburg & Schleswig-Holstein"),
];

pub fn region_name(id: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(region_id, _)| *region_id == id)
        .map(|(_, name)| *name)
}

pub fn is_known_region(id: &str) -> bool {
    region_name(id).is_some()
}
