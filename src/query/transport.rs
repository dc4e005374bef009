//! Wire-level DNS exchange
//!
//! Builds queries and moves raw messages over UDP, falling back to TCP when
//! a response comes back truncated. Parsing and typed record access are
//! delegated to hickory-proto.

use crate::error::{DnssecToolkitError, Result};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

/// Build a DNS query with EDNS0 (DO bit set) for the given name and type.
///
/// `recursion_desired` distinguishes resolver queries (RD=1) from
/// authoritative queries (RD=0).
pub fn build_query(
    name: &Name,
    rtype: RecordType,
    recursion_desired: bool,
    udp_payload: u16,
) -> Message {
    let mut message = Message::new();
    message
        .set_id(rand::random::<u16>())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(recursion_desired)
        .add_query(Query::query(name.clone(), rtype));

    let mut edns = Edns::new();
    edns.set_max_payload(udp_payload);
    edns.set_version(0);
    edns.set_dnssec_ok(true);
    message.set_edns(edns);

    message
}

/// Exchange a query with a single server.
///
/// Returns the parsed response together with its wire bytes so callers can
/// cache exactly what was received. Timeouts and I/O failures surface as
/// errors; the caller decides whether to retry against another server.
pub async fn exchange(
    server: SocketAddr,
    request: &Message,
    timeout: Duration,
) -> Result<(Message, Vec<u8>)> {
    let wire_query = request.to_vec()?;

    let wire = udp_exchange(server, &wire_query, request.id(), timeout).await?;
    let response = Message::from_vec(&wire)?;
    if !response.truncated() {
        return Ok((response, wire));
    }

    tracing::debug!("response from {} truncated, retrying over TCP", server);
    let wire = tcp_exchange(server, &wire_query, timeout).await?;
    let response = Message::from_vec(&wire)?;
    Ok((response, wire))
}

async fn udp_exchange(
    server: SocketAddr,
    wire_query: &[u8],
    id: u16,
    timeout: Duration,
) -> Result<Vec<u8>> {
    let bind_addr = if server.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.send_to(wire_query, server).await?;

    let receive = async {
        let mut buf = vec![0u8; 4096];
        loop {
            let (len, from) = socket.recv_from(&mut buf).await?;
            if from.ip() != server.ip() || len < 12 {
                continue;
            }
            // Discard stray responses to earlier queries
            if u16::from_be_bytes([buf[0], buf[1]]) != id {
                continue;
            }
            return Ok(buf[..len].to_vec());
        }
    };

    tokio::time::timeout(timeout, receive)
        .await
        .map_err(|_| DnssecToolkitError::Timeout(timeout.as_secs()))?
}

async fn tcp_exchange(
    server: SocketAddr,
    wire_query: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>> {
    let exchange = async {
        let mut stream = TcpStream::connect(server).await?;

        let len = u16::try_from(wire_query.len())
            .map_err(|_| DnssecToolkitError::Dns("query exceeds 64 KiB".to_string()))?;
        stream.write_all(&len.to_be_bytes()).await?;
        stream.write_all(wire_query).await?;

        let mut len_buf = [0u8; 2];
        stream.read_exact(&mut len_buf).await?;
        let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len_buf))];
        stream.read_exact(&mut buf).await?;
        Ok(buf)
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| DnssecToolkitError::Timeout(timeout.as_secs()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_sets_edns_and_do_bit() {
        let name = Name::from_ascii("example.com.").unwrap();
        let query = build_query(&name, RecordType::DNSKEY, true, 4096);

        assert!(query.recursion_desired());
        let edns = query.edns().expect("EDNS0 must be present");
        assert_eq!(edns.max_payload(), 4096);
        assert!(edns.dnssec_ok());
    }

    #[test]
    fn test_build_query_authoritative_clears_rd() {
        let name = Name::from_ascii("example.com.").unwrap();
        let query = build_query(&name, RecordType::ANY, false, 4096);
        assert!(!query.recursion_desired());
        assert_eq!(query.queries().len(), 1);
        assert_eq!(query.queries()[0].query_type(), RecordType::ANY);
    }

    #[test]
    fn test_query_wire_roundtrip() {
        let name = Name::from_ascii("example.com.").unwrap();
        let query = build_query(&name, RecordType::DS, true, 4096);
        let wire = query.to_vec().unwrap();
        let parsed = Message::from_vec(&wire).unwrap();
        assert_eq!(parsed.id(), query.id());
        assert_eq!(parsed.queries()[0].name(), &name);
    }
}
