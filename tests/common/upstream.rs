use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, TXT};
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// Behaviour of the whole server, independent of the question.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Answer from the zone: NXDOMAIN for unknown names, empty NOERROR when
    /// the name exists without records of the asked type
    Authoritative,
    ServFail,
    Silent,
}

/// UDP-only upstream serving a small static zone.
pub struct MockUpstream {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn start(zone: Zone) -> Self {
        Self::start_with_mode(zone, Mode::Authoritative).await
    }

    pub async fn start_with_mode(zone: Zone, mode: Mode) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = socket.local_addr().expect("mock upstream address");

        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);
                        if let Some(response) = answer(&buf[..len], &zone, mode) {
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Number of queries received so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Records keyed by lowercase owner name without the root dot.
#[derive(Clone, Default)]
pub struct Zone {
    records: HashMap<String, Vec<(u32, RData)>>,
}

impl Zone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, owner: &str, ttl: u32, rdata: RData) -> Self {
        self.records
            .entry(owner.to_ascii_lowercase())
            .or_default()
            .push((ttl, rdata));
        self
    }

    pub fn a(self, owner: &str, ttl: u32, ip: &str) -> Self {
        self.with(owner, ttl, RData::A(A(ip.parse().expect("ipv4"))))
    }

    pub fn aaaa(self, owner: &str, ttl: u32, ip: &str) -> Self {
        self.with(owner, ttl, RData::AAAA(AAAA(ip.parse().expect("ipv6"))))
    }

    pub fn cname(self, owner: &str, ttl: u32, target: &str) -> Self {
        self.with(owner, ttl, RData::CNAME(CNAME(name(target))))
    }

    pub fn mx(self, owner: &str, ttl: u32, preference: u16, exchange: &str) -> Self {
        self.with(owner, ttl, RData::MX(MX::new(preference, name(exchange))))
    }

    pub fn txt(self, owner: &str, ttl: u32, fragments: &[&str]) -> Self {
        let fragments = fragments.iter().map(|f| f.to_string()).collect();
        self.with(owner, ttl, RData::TXT(TXT::new(fragments)))
    }
}

fn name(text: &str) -> Name {
    Name::from_str(text).expect("valid name")
}

fn answer(query: &[u8], zone: &Zone, mode: Mode) -> Option<Vec<u8>> {
    if mode == Mode::Silent {
        return None;
    }

    let request = Message::from_vec(query).ok()?;
    let question = request.queries().first()?.clone();

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(true);
    response.set_recursion_available(true);
    response.add_query(question.clone());

    if mode == Mode::ServFail {
        response.set_response_code(ResponseCode::ServFail);
    } else {
        let owner = question
            .name()
            .to_utf8()
            .trim_end_matches('.')
            .to_ascii_lowercase();

        match zone.records.get(&owner) {
            None => {
                response.set_response_code(ResponseCode::NXDomain);
            }
            Some(records) => {
                for (ttl, rdata) in records {
                    if rdata.record_type() == question.query_type() {
                        response.add_answer(Record::from_rdata(
                            question.name().clone(),
                            *ttl,
                            rdata.clone(),
                        ));
                    }
                }
            }
        }
    }

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    response.emit(&mut encoder).ok()?;
    Some(buf)
}
