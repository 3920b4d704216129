use crate::error::ConfigError;
use std::fmt;

/// The Redis endpoint polled by this process
#[derive(Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    /// Instance name used in the collectd plugin instance (`redis-<name>`)
    pub name: String,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl InstanceIdentity {
    /// Parse `<name>:<host>:<port>[:<password>]`
    ///
    /// Name and host may contain ASCII letters, digits, `_`, `.` and `-`; the
    /// port must be 1..=65535 without leading zeros; the password, if any, is
    /// letters, digits and `_`.
    pub fn parse(conn: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidConnectionString(conn.to_string());

        let parts: Vec<&str> = conn.split(':').collect();
        let (name, host, port, password) = match parts.as_slice() {
            [name, host, port] => (*name, *host, *port, None),
            [name, host, port, password] => (*name, *host, *port, Some(*password)),
            _ => return Err(invalid()),
        };

        if !is_identifier(name) || !is_identifier(host) {
            return Err(invalid());
        }
        if port.starts_with('0') || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let port: u16 = port.parse().map_err(|_| invalid())?;
        if port == 0 {
            return Err(invalid());
        }
        if let Some(pw) = password {
            if pw.is_empty() || !pw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                return Err(invalid());
            }
        }

        Ok(InstanceIdentity {
            name: name.to_string(),
            host: host.to_string(),
            port,
            password: password.map(str::to_string),
        })
    }

    /// `redis://` URL for the client
    pub fn redis_url(&self) -> String {
        match &self.password {
            Some(pw) => format!("redis://:{}@{}:{}/", pw, self.host, self.port),
            None => format!("redis://{}:{}/", self.host, self.port),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

// Keep the password out of logs.
impl fmt::Debug for InstanceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceIdentity")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl fmt::Display for InstanceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_password() {
        let instance = InstanceIdentity::parse("cache:redis.local:6379").unwrap();
        assert_eq!(instance.name, "cache");
        assert_eq!(instance.host, "redis.local");
        assert_eq!(instance.port, 6379);
        assert_eq!(instance.password, None);
        assert_eq!(instance.redis_url(), "redis://redis.local:6379/");
    }

    #[test]
    fn test_parse_with_password() {
        let instance = InstanceIdentity::parse("sessions:10.0.0.7:6380:s3cret_pw").unwrap();
        assert_eq!(instance.password.as_deref(), Some("s3cret_pw"));
        assert_eq!(instance.redis_url(), "redis://:s3cret_pw@10.0.0.7:6380/");
    }

    #[test]
    fn test_rejects_bad_connection_strings() {
        for conn in [
            "",
            "cache",
            "cache:host",
            "cache:host:0",
            "cache:host:65536",
            "cache:host:06379",
            "cache:host:port",
            ":host:6379",
            "cache::6379",
            "ca che:host:6379",
            "cache:host:6379:",
            "cache:host:6379:p@ss",
            "cache:host:6379:pw:extra",
        ] {
            assert!(InstanceIdentity::parse(conn).is_err(), "accepted {:?}", conn);
        }
    }

    #[test]
    fn test_port_bounds() {
        assert_eq!(InstanceIdentity::parse("a:b:1").unwrap().port, 1);
        assert_eq!(InstanceIdentity::parse("a:b:65535").unwrap().port, 65535);
    }

    #[test]
    fn test_debug_hides_password() {
        let instance = InstanceIdentity::parse("cache:localhost:6379:hunter2").unwrap();
        let debug = format!("{:?}", instance);
        assert!(!debug.contains("hunter2"));
        assert!(!instance.to_string().contains("hunter2"));
    }
}
