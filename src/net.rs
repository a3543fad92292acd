// src/net.rs

// CIDR network entries and the lists they belong to

// dependencies
use std::fmt;
use std::net::Ipv4Addr;

/// Which of the two static address lists an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListType {
    Allow,
    Deny,
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ListType::Allow => f.write_str("allow list"),
            ListType::Deny => f.write_str("deny list"),
        }
    }
}

/// Mask with `prefix_len` leading one-bits. Lengths above 32 saturate.
pub fn prefix_mask(prefix_len: u8) -> u32 {
    match prefix_len.min(32) {
        0 => 0,
        len => u32::MAX << (32 - u32::from(len)),
    }
}

/// An IPv4 network: a base address and a prefix length.
///
/// The stored address is always the canonical base of the network, never a
/// host inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Net {
    address: u32,
    prefix_len: u8,
}

impl Net {
    /// Build the network containing `address` with the given prefix.
    pub fn new(address: u32, prefix_len: u8) -> Self {
        let prefix_len = prefix_len.min(32);
        Self {
            address: address & prefix_mask(prefix_len),
            prefix_len,
        }
    }

    pub fn from_ipv4(address: Ipv4Addr, prefix_len: u8) -> Self {
        Self::new(u32::from(address), prefix_len)
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn contains(&self, address: u32) -> bool {
        address & prefix_mask(self.prefix_len) == self.address
    }

    /// Lower the prefix length to `prefix_len` if that is broader than the
    /// current one. Returns whether the entry changed.
    pub fn widen(&mut self, prefix_len: u8) -> bool {
        if prefix_len >= self.prefix_len {
            return false;
        }
        *self = Net::new(self.address, prefix_len);
        true
    }
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.address), self.prefix_len)
    }
}
