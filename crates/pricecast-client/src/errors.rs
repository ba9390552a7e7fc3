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

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("forecast API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("region not found: {0}")]
    RegionNotFound(String),

    #[error("invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("API validation failed: {0}")]
    Validation(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
