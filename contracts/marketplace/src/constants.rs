use concordium_std::*;

/// The account reserved as the unreachable "zero" identity. Minting or
/// transferring to it is rejected.
pub const ZERO_ADDRESS: AccountAddress = AccountAddress([0u8; 32]);

/// Scheme marker prefixed to every rendered token URI.
pub const TOKEN_URI_SCHEME: &str = "data:application/json;base64,";

/// Fixed description embedded in every rendered token URI.
pub const COLLECTION_DESCRIPTION: &str = "A token from the fixed price marketplace collection";
