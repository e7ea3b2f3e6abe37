//! Port numbers: operator input validation and local port allocation

use crate::errors::{KubedevError, Result};
use std::net::{Ipv4Addr, TcpListener};

pub const PORT_RANGE_MESSAGE: &str = "Port must be a number between 1 and 65535";

/// Accept a positive integer no larger than 65535
pub fn validate_port(input: &str) -> std::result::Result<u16, String> {
    match input.trim().parse::<u32>() {
        Ok(port) if (1..=u16::MAX as u32).contains(&port) => Ok(port as u16),
        _ => Err(PORT_RANGE_MESSAGE.to_string()),
    }
}

/// First loopback port at or above `start` that can be bound right now
pub fn find_free_port(start: u16) -> Result<u16> {
    (start.max(1)..=u16::MAX)
        .find(|port| is_port_free(*port))
        .ok_or_else(|| {
            KubedevError::Argument(format!("no free local port at or above {}", start))
        })
}

fn is_port_free(port: u16) -> bool {
    // The listener is dropped immediately, releasing the port
    TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_ok()
}
