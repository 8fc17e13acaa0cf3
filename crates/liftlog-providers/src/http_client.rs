// ABOUTME: Shared HTTP client with connection pooling for training API calls
// ABOUTME: Initialized once with configured timeouts, falling back to defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use liftlog_core::constants::fetch::{CONNECT_TIMEOUT_SECS, FETCH_TIMEOUT_SECS};
use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Timeouts (request, connect) in seconds for the shared client
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Set the shared client's timeouts
///
/// Only the first call has an effect, and only if made before [`shared_client`] is first used.
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_secs, connect_timeout_secs));
}

/// Pooled HTTP client used by every remote session source
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = client_timeouts();

        ClientBuilder::new()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Timeouts (request, connect) in seconds the shared client is built with
#[must_use]
pub fn client_timeouts() -> (u64, u64) {
    CLIENT_TIMEOUTS
        .get()
        .copied()
        .unwrap_or((FETCH_TIMEOUT_SECS, CONNECT_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_initialization_wins() {
        initialize_shared_client(4, 2);
        initialize_shared_client(60, 30);

        assert_eq!(client_timeouts(), (4, 2));
        let _client = shared_client();
    }
}
