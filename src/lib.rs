//! DDNS-Netlink: interface address monitor
//!
//! A library for watching one network interface for new addresses over
//! rtnetlink and forwarding each change to stdout or an HTTP endpoint.

pub mod config;
pub mod monitor;
pub mod netlink;
pub mod network;
pub mod reactor;
pub mod sink;
pub mod webhook;

#[cfg(test)]
mod test_fixtures;
