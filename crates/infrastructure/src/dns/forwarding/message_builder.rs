//! DNS query construction
//!
//! The header and question are built with `hickory-proto`; the EDNS0 OPT
//! pseudo-record is appended by hand so the CO flag, which hickory has no
//! accessor for, can sit next to DO in the extended flags.

use super::record_type_map::RecordTypeMapper;
use compactdenial_domain::{DnsQuery, DomainError, QueryConfig, EDNS_FLAG_CO};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

const OPT_RR_TYPE: u16 = 41;
const EDNS_FLAG_DO: u16 = 0x8000;
const ARCOUNT_OFFSET: usize = 10;

/// Header and EDNS flags for one outgoing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFlags {
    pub recursion_desired: bool,
    pub authentic_data: bool,
    pub dnssec_ok: bool,
    pub compact_ok: bool,
    pub udp_payload: u16,
}

impl QueryFlags {
    /// RD=1, AD=1, DO=1: ask a validating resolver and request the AD bit.
    pub fn recursive(config: &QueryConfig) -> Self {
        Self {
            recursion_desired: true,
            authentic_data: true,
            dnssec_ok: true,
            compact_ok: config.compact_ok,
            udp_payload: config.udp_payload,
        }
    }

    /// RD=0, DO=1: ask an authoritative server directly.
    pub fn direct(config: &QueryConfig) -> Self {
        Self {
            recursion_desired: false,
            authentic_data: false,
            dnssec_ok: true,
            compact_ok: config.compact_ok,
            udp_payload: config.udp_payload,
        }
    }

    fn edns_flags(&self) -> u16 {
        let mut flags = 0;
        if self.dnssec_ok {
            flags |= EDNS_FLAG_DO;
        }
        if self.compact_ok {
            flags |= EDNS_FLAG_CO;
        }
        flags
    }
}

pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a query in wire format and return it with its random id.
    pub fn build_query(
        query: &DnsQuery,
        flags: &QueryFlags,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Name::from_str(&query.name.to_fqdn()).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", query.name, e))
        })?;

        let mut question = Query::new();
        question.set_name(name);
        question.set_query_type(RecordTypeMapper::to_hickory(&query.record_type));
        question.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(flags.recursion_desired);
        message.set_authentic_data(flags.authentic_data);
        message.add_query(question);

        let mut bytes = Self::serialize_message(&message)?;
        Self::append_opt(&mut bytes, flags);
        Ok((id, bytes))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }

    /// Append an OPT record (RFC 6891 §6.1.2) and bump ARCOUNT.
    fn append_opt(bytes: &mut Vec<u8>, flags: &QueryFlags) {
        let arcount = u16::from_be_bytes([bytes[ARCOUNT_OFFSET], bytes[ARCOUNT_OFFSET + 1]]) + 1;
        bytes[ARCOUNT_OFFSET..ARCOUNT_OFFSET + 2].copy_from_slice(&arcount.to_be_bytes());

        bytes.push(0); // root owner
        bytes.extend_from_slice(&OPT_RR_TYPE.to_be_bytes());
        bytes.extend_from_slice(&flags.udp_payload.to_be_bytes());
        bytes.push(0); // extended rcode
        bytes.push(0); // version
        bytes.extend_from_slice(&flags.edns_flags().to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes()); // rdlen
    }
}
