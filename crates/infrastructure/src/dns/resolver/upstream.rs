use async_trait::async_trait;
use ferrous_lookup_application::ports::{DnsAnswer, DnsResolver};
use ferrous_lookup_domain::config::ResolverConfig;
use ferrous_lookup_domain::{DnsQuery, DomainError};
use hickory_proto::op::ResponseCode;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::dns::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use crate::dns::transport::Transport;

const DEFAULT_DNS_PORT: u16 = 53;

/// Resolves queries against a fixed list of upstream servers, in order.
///
/// NXDOMAIN and empty NOERROR answers are final. Server-side failures
/// (SERVFAIL, REFUSED, ...) and transport errors move on to the next
/// server.
pub struct UpstreamResolver {
    servers: Vec<SocketAddr>,
    timeout: Duration,
    tcp_fallback: bool,
}

impl UpstreamResolver {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration, tcp_fallback: bool) -> Self {
        Self {
            servers,
            timeout,
            tcp_fallback,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self, DomainError> {
        let servers = config
            .upstream_servers
            .iter()
            .map(|s| parse_server(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            servers,
            Duration::from_millis(config.query_timeout_ms),
            config.tcp_fallback,
        ))
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    async fn query_server(
        &self,
        server: SocketAddr,
        query: &DnsQuery,
        domain: &str,
    ) -> Result<DnsResponse, DomainError> {
        let start = Instant::now();
        let (id, query_bytes) = MessageBuilder::build_query(domain, query.record_type)?;

        let udp = Transport::udp(server);
        let response = udp.send(&query_bytes, self.timeout).await?;
        debug!(
            server = %server,
            protocol = response.protocol_used,
            bytes = response.bytes.len(),
            "Upstream response received"
        );
        let parsed = Self::parse_checked(&response.bytes, id, query)?;

        if !(parsed.truncated && self.tcp_fallback) {
            return Ok(parsed);
        }

        debug!(server = %server, "Response truncated (TC bit), retrying via TCP");

        let remaining = self
            .timeout
            .checked_sub(start.elapsed())
            .unwrap_or(Duration::from_millis(500));

        let tcp = Transport::tcp(server);
        let response = tcp.send(&query_bytes, remaining).await?;
        debug!(
            server = %server,
            protocol = tcp.protocol_name(),
            bytes = response.bytes.len(),
            "Fallback response received"
        );
        Self::parse_checked(&response.bytes, id, query)
    }

    fn parse_checked(bytes: &[u8], id: u16, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        let parsed = ResponseParser::parse(bytes, query.record_type)?;
        if parsed.id != id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response id {} does not match query id {}",
                parsed.id, id
            )));
        }
        Ok(parsed)
    }
}

#[async_trait]
impl DnsResolver for UpstreamResolver {
    #[instrument(skip(self), fields(query = %query))]
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsAnswer, DomainError> {
        let domain = query.normalized_domain();
        let mut last_transport_error: Option<DomainError> = None;
        let mut failed_rcodes: Vec<&'static str> = Vec::new();

        for &server in &self.servers {
            let response = match self.query_server(server, query, &domain).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(server = %server, error = %e, "Upstream query failed");
                    last_transport_error = Some(e);
                    continue;
                }
            };

            match response.rcode {
                ResponseCode::NXDomain => {
                    return Err(DomainError::NxDomain(query.to_string()));
                }
                ResponseCode::NoError if response.records.is_empty() => {
                    return Err(DomainError::NoAnswer(query.to_string()));
                }
                ResponseCode::NoError => {
                    debug!(
                        server = %server,
                        records = response.records.len(),
                        "Upstream answered"
                    );
                    return Ok(response.into_answer());
                }
                rcode => {
                    let status = ResponseParser::rcode_to_status(rcode);
                    warn!(server = %server, rcode = status, "Upstream refused to answer");
                    failed_rcodes.push(status);
                }
            }
        }

        if !failed_rcodes.is_empty() {
            return Err(DomainError::NoNameservers(format!(
                "{}: {}",
                query,
                failed_rcodes.join(", ")
            )));
        }

        Err(last_transport_error.unwrap_or_else(|| {
            DomainError::NoNameservers(format!("{}: no upstream servers configured", query))
        }))
    }
}

/// `ip:port`, `[v6]:port`, or a bare address on port 53.
pub fn parse_server(server: &str) -> Result<SocketAddr, DomainError> {
    let server = server.trim();
    server
        .parse::<SocketAddr>()
        .or_else(|_| {
            server
                .parse::<IpAddr>()
                .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        })
        .map_err(|_| {
            DomainError::Transport(format!("Invalid upstream server address '{}'", server))
        })
}
