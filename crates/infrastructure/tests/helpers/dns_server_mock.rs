#![allow(dead_code)]
use compactdenial_domain::{TypeBitmapWindow, NXNAME_TYPE};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

const NSEC: u16 = 47;
const RRSIG: u16 = 46;
const TXT: u16 = 16;

/// What the mock puts into its response.
#[derive(Debug, Clone)]
pub struct MockAnswer {
    pub rcode: u8,
    pub authenticated: bool,
    pub truncated: bool,
    pub with_address: bool,
    pub nsec_types: Option<Vec<u16>>,
    /// Send a reply with the wrong id before the real one.
    pub decoy_first: bool,
    /// Owner, in uncompressed wire form, of an extra TXT authority record.
    pub extra_txt_owner: Option<Vec<u8>>,
}

impl MockAnswer {
    pub fn nodata() -> Self {
        Self {
            rcode: 0,
            authenticated: false,
            truncated: false,
            with_address: false,
            nsec_types: None,
            decoy_first: false,
            extra_txt_owner: None,
        }
    }

    pub fn compact_nxdomain() -> Self {
        Self::nodata().nsec(&[RRSIG, NSEC, NXNAME_TYPE])
    }

    pub fn empty_non_terminal() -> Self {
        Self::nodata().nsec(&[RRSIG, NSEC])
    }

    pub fn address() -> Self {
        Self {
            with_address: true,
            ..Self::nodata()
        }
    }

    pub fn rcode(rcode: u8) -> Self {
        Self {
            rcode,
            ..Self::nodata()
        }
    }

    pub fn nsec(mut self, types: &[u16]) -> Self {
        self.nsec_types = Some(types.to_vec());
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    pub fn with_extra_txt(mut self, owner_wire: &[u8]) -> Self {
        self.extra_txt_owner = Some(owner_wire.to_vec());
        self
    }

    pub fn with_decoy(mut self) -> Self {
        self.decoy_first = true;
        self
    }
}

pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Vec<u8>>>>,
    shutdown_tx: Vec<oneshot::Sender<()>>,
}

impl MockDnsServer {
    /// UDP only, on an ephemeral loopback port.
    pub async fn start(answer: MockAnswer) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));

        let mut server = Self {
            addr,
            received,
            shutdown_tx: Vec::new(),
        };
        server.spawn_udp(socket, answer);
        Ok(server)
    }

    /// UDP and TCP on the same port, each with its own answer.
    pub async fn start_with_tcp(
        udp_answer: MockAnswer,
        tcp_answer: MockAnswer,
    ) -> Result<Self, std::io::Error> {
        let mut server = Self::start(udp_answer).await?;
        let listener = TcpListener::bind(server.addr).await?;
        server.spawn_tcp(listener, tcp_answer);
        Ok(server)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Raw queries received so far, over either transport.
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().unwrap().clone()
    }

    fn spawn_udp(&mut self, socket: UdpSocket, answer: MockAnswer) {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let received = Arc::clone(&self.received);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let query = buf[..len].to_vec();
                            received.lock().unwrap().push(query.clone());

                            if answer.decoy_first {
                                let mut decoy = build_response(&query, &answer);
                                decoy[0] ^= 0xFF;
                                let _ = socket.send_to(&decoy, peer).await;
                            }
                            let response = build_response(&query, &answer);
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        self.shutdown_tx.push(shutdown_tx);
    }

    fn spawn_tcp(&mut self, listener: TcpListener, answer: MockAnswer) {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let received = Arc::clone(&self.received);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = listener.accept() => {
                        let Ok((mut stream, _)) = result else { continue };

                        let mut len_buf = [0u8; 2];
                        if stream.read_exact(&mut len_buf).await.is_err() {
                            continue;
                        }
                        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                        if stream.read_exact(&mut query).await.is_err() {
                            continue;
                        }
                        received.lock().unwrap().push(query.clone());

                        let response = build_response(&query, &answer);
                        let _ = stream.write_all(&(response.len() as u16).to_be_bytes()).await;
                        let _ = stream.write_all(&response).await;
                    }
                }
            }
        });

        self.shutdown_tx.push(shutdown_tx);
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        for tx in self.shutdown_tx.drain(..) {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// End of the question section: header plus QNAME, QTYPE and QCLASS.
fn question_end(query: &[u8]) -> usize {
    let mut pos = 12;
    while pos < query.len() && query[pos] != 0 {
        pos += query[pos] as usize + 1;
    }
    (pos + 5).min(query.len())
}

/// Answer `query` by hand, the way a signing server would lay it out.
pub fn build_response(query: &[u8], answer: &MockAnswer) -> Vec<u8> {
    if query.len() < 12 {
        return vec![];
    }

    let question_end = question_end(query);
    let qname = &query[12..question_end - 4];
    let mut response = Vec::with_capacity(512);

    response.extend_from_slice(&query[0..2]);

    let mut flags_hi = 0x80 | (query[2] & 0x01);
    if answer.truncated {
        flags_hi |= 0x02;
    }
    let mut flags_lo = 0x80 | (answer.rcode & 0x0F);
    if answer.authenticated {
        flags_lo |= 0x20;
    }
    response.push(flags_hi);
    response.push(flags_lo);

    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&[0x00, u8::from(answer.with_address)]);
    let authority_count =
        u8::from(answer.nsec_types.is_some()) + u8::from(answer.extra_txt_owner.is_some());
    response.extend_from_slice(&[0x00, authority_count]);
    response.extend_from_slice(&[0x00, 0x00]);

    response.extend_from_slice(&query[12..question_end]);

    if answer.with_address {
        response.extend_from_slice(&[
            0xc0, 0x0c,
            0x00, 0x01,
            0x00, 0x01,
            0x00, 0x00, 0x00, 0x3c,
            0x00, 0x04,
            192, 0, 2, 1,
        ]);
    }

    if let Some(types) = &answer.nsec_types {
        let mut rdata = vec![0x01, 0x00];
        rdata.extend_from_slice(qname);
        for window in TypeBitmapWindow::from_types(types.iter().copied()) {
            rdata.push(window.window);
            rdata.push(window.bitmap.len() as u8);
            rdata.extend_from_slice(&window.bitmap);
        }

        response.extend_from_slice(&[0xc0, 0x0c]);
        response.extend_from_slice(&NSEC.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&3600u32.to_be_bytes());
        response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        response.extend_from_slice(&rdata);
    }

    if let Some(owner) = &answer.extra_txt_owner {
        response.extend_from_slice(owner);
        response.extend_from_slice(&TXT.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&3600u32.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x04, 0x03, b'f', b'o', b'o']);
    }

    response
}
