use core::convert::TryInto;

use base64::{engine::general_purpose::STANDARD, Engine};
use commons::*;
use concordium_cis1::*;
use concordium_std::*;

use crate::constants::*;

/// Build the token ID for a counter index: the four big-endian bytes of
/// the index.
pub fn token_id_from_index(index: u32) -> ContractTokenId {
    TokenIdVec(index.to_be_bytes().to_vec())
}

/// Decode a token ID back to its counter index. Returns `None` for IDs
/// that were not produced by `token_id_from_index`.
pub fn token_index(token_id: &ContractTokenId) -> Option<u32> {
    let bytes: [u8; 4] = token_id.0.as_slice().try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

/// Extract the account behind a sender address.
pub fn get_account_address(address: Address) -> ContractResult<AccountAddress> {
    match address {
        Address::Account(account) => Ok(account),
        Address::Contract(_) => Err(CustomContractError::OnlyAccountAddress.into()),
    }
}

/// Render the URI for a token: a small JSON object carrying the collection
/// name with the token index, the fixed collection description and the
/// stored image reference, base64 encoded behind the data URI scheme
/// marker. The metadata string is embedded as-is.
pub fn build_token_uri(collection_name: &str, index: u32, image: &str) -> String {
    let mut json = String::from("{\"name\":\"");
    json.push_str(collection_name);
    json.push_str(" #");
    json.push_str(&index.to_string());
    json.push_str("\",\"description\":\"");
    json.push_str(COLLECTION_DESCRIPTION);
    json.push_str("\",\"image\":\"");
    json.push_str(image);
    json.push_str("\"}");

    let mut uri = String::from(TOKEN_URI_SCHEME);
    uri.push_str(&STANDARD.encode(json));
    uri
}

/// CIS-1 metadata event pointing at the rendered data URI.
pub fn token_metadata_event(token_id: ContractTokenId, uri: String) -> Cis1Event<ContractTokenId> {
    Cis1Event::TokenMetadata(TokenMetadataEvent {
        token_id,
        metadata_url: MetadataUrl { url: uri, hash: None },
    })
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn token_id_round_trip() {
        for index in [0u32, 1, 7, 255, 256, 65_536, u32::MAX] {
            let token_id = token_id_from_index(index);
            claim_eq!(token_id.0.len(), 4, "Token IDs are always 4 bytes");
            claim_eq!(token_index(&token_id), Some(index));
        }
    }

    #[concordium_test]
    fn malformed_token_id_rejected() {
        claim_eq!(token_index(&TokenIdVec(Vec::new())), None);
        claim_eq!(token_index(&TokenIdVec(vec![0, 0, 1])), None);
        claim_eq!(token_index(&TokenIdVec(vec![0, 0, 0, 0, 1])), None);
    }

    #[concordium_test]
    fn token_uri_encoding() {
        let uri = build_token_uri("Gallery", 3, "ipfs://image-3");
        claim!(
            uri.starts_with(TOKEN_URI_SCHEME),
            "URI should carry the data URI scheme marker"
        );

        let payload = STANDARD
            .decode(&uri[TOKEN_URI_SCHEME.len()..])
            .expect_report("URI payload should be valid base64");
        let json = String::from_utf8(payload).expect_report("URI payload should be UTF-8");
        claim_eq!(
            json,
            "{\"name\":\"Gallery #3\",\"description\":\"A token from the fixed price \
             marketplace collection\",\"image\":\"ipfs://image-3\"}"
        );
    }

    #[concordium_test]
    fn token_uri_deterministic() {
        claim_eq!(
            build_token_uri("Gallery", 0, "ipfs://image-0"),
            build_token_uri("Gallery", 0, "ipfs://image-0")
        );
    }
}
