use std::io::Read;

use anyhow::{anyhow, Result};
use axum::http::HeaderMap;
use flate2::read::GzDecoder;

use backend_domain::{IngestEnvelope, RuntimeConfig, Transaction};

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Decodes an ingest body (optionally gzip) into transactions. A
/// merchant_id on the envelope is inherited by transactions that left
/// theirs empty.
pub fn parse_transactions(headers: &HeaderMap, body: &[u8]) -> Result<Vec<Transaction>> {
    let content = maybe_gunzip(headers, body)?;
    let mut envelope: IngestEnvelope = serde_json::from_str(&content)?;
    if envelope.schema_version.trim() != "v1" {
        return Err(anyhow!(
            "unsupported schema_version '{}', expected 'v1'",
            envelope.schema_version
        ));
    }
    if let Some(merchant_id) = envelope.merchant_id.clone() {
        for transaction in &mut envelope.transactions {
            if transaction.merchant_id.trim().is_empty() {
                transaction.merchant_id = merchant_id.clone();
            }
        }
    }
    Ok(envelope.transactions)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("") == "gzip" {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
