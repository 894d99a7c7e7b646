#![allow(dead_code)]

use async_trait::async_trait;
use compactdenial_application::ports::{DnsQuerier, QueryResponse};
use compactdenial_domain::{
    DnsQuery, DnsResponseMessage, DomainError, DomainName, NsecData, QueryConfig, RecordData,
    RecordSet, RecordType, ResponseCode, TypeBitmapWindow, NXNAME_TYPE,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

pub const RESOLVER: &str = "192.0.2.53:53";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Recursive { name: String, config: QueryConfig },
    Server { name: String, server: SocketAddr },
}

#[derive(Clone, Default)]
pub struct MockDnsQuerier {
    responses: Arc<RwLock<HashMap<String, DnsResponseMessage>>>,
    errors: Arc<RwLock<HashMap<String, DomainError>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl MockDnsQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, name: &str, message: DnsResponseMessage) {
        self.responses
            .write()
            .unwrap()
            .insert(canonical(name), message);
    }

    pub fn set_error(&self, name: &str, error: DomainError) {
        self.errors.write().unwrap().insert(canonical(name), error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }

    fn answer(&self, query: &DnsQuery, server: SocketAddr) -> Result<QueryResponse, DomainError> {
        let key = query.name.as_str().to_string();
        if let Some(error) = self.errors.read().unwrap().get(&key) {
            return Err(error.clone());
        }
        let message = self
            .responses
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| DomainError::NoNameservers(format!("no mock response for {}", key)))?;

        Ok(QueryResponse {
            message,
            wire: Vec::<u8>::new().into(),
            server,
            protocol_used: "UDP",
        })
    }
}

#[async_trait]
impl DnsQuerier for MockDnsQuerier {
    async fn resolve_via_recursive(
        &self,
        query: &DnsQuery,
        config: &QueryConfig,
    ) -> Result<QueryResponse, DomainError> {
        self.calls.write().unwrap().push(RecordedCall::Recursive {
            name: query.name.as_str().to_string(),
            config: config.clone(),
        });
        self.answer(query, RESOLVER.parse().unwrap())
    }

    async fn resolve_via_server(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        _config: &QueryConfig,
    ) -> Result<QueryResponse, DomainError> {
        self.calls.write().unwrap().push(RecordedCall::Server {
            name: query.name.as_str().to_string(),
            server,
        });
        self.answer(query, server)
    }
}

fn canonical(name: &str) -> String {
    DomainName::parse(name).unwrap().as_str().to_string()
}

pub fn nsec_message(owner: &str, types: &[u16], authenticated: bool) -> DnsResponseMessage {
    let owner_name = DomainName::parse(owner).unwrap();
    let next = DomainName::parse(&format!("\\000.{}", owner)).unwrap();
    DnsResponseMessage::new(ResponseCode::NoError)
        .authenticated(authenticated)
        .with_authority(
            RecordSet::new(owner_name, RecordType::NSEC).with_record(RecordData::Nsec(
                NsecData::new(next, TypeBitmapWindow::from_types(types.iter().copied())),
            )),
        )
}

pub fn compact_nxdomain(owner: &str) -> DnsResponseMessage {
    nsec_message(owner, &[46, 47, NXNAME_TYPE], true)
}
