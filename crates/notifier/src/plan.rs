//! Order in which SMTP connection strategies are tried.

use std::fmt;

/// Conventional implicit-TLS (SMTPS) port.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Conventional upgrade-TLS (submission) port.
pub const STARTTLS_PORT: u16 = 587;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS from the first byte of the connection.
    Implicit,
    /// Plaintext greeting, then `STARTTLS`.
    StartTls,
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsMode::Implicit => write!(f, "implicit-tls"),
            TlsMode::StartTls => write!(f, "starttls"),
        }
    }
}

/// One connection strategy: a TLS mode on a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub mode: TlsMode,
    pub port: u16,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on port {}", self.mode, self.port)
    }
}

/// Strategies to try, in order, for the configured port.
///
/// - Port 465: implicit TLS on 465, then STARTTLS on 587.
/// - Any other port: STARTTLS on that port, then implicit TLS on that same port.
pub fn delivery_plan(port: u16) -> Vec<Attempt> {
    if port == IMPLICIT_TLS_PORT {
        vec![
            Attempt {
                mode: TlsMode::Implicit,
                port,
            },
            Attempt {
                mode: TlsMode::StartTls,
                port: STARTTLS_PORT,
            },
        ]
    } else {
        vec![
            Attempt {
                mode: TlsMode::StartTls,
                port,
            },
            Attempt {
                mode: TlsMode::Implicit,
                port,
            },
        ]
    }
}
