//! Listener Config

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Args;

/// Where the proxy accepts connections.
#[derive(Debug, Args)]
pub struct ListenConfig {
    /// Interface to listen on
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 8787)]
    pub port: u16,
}

impl ListenConfig {
    /// Address to bind.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
