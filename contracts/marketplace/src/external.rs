use commons::*;
use concordium_std::*;

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct InitParams {
    /// Collection name, embedded in rendered token URIs.
    pub name: String,
    /// Collection symbol.
    pub symbol: String,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct MintParams {
    /// Opaque metadata stored with the new token, e.g. an image reference.
    pub metadata: String,
    /// Account receiving the new token.
    pub recipient: AccountAddress,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct ListParams {
    /// Token to list for sale.
    pub token_id: ContractTokenId,
    /// Asking price, must be strictly positive.
    pub price: Amount,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct BuyParams {
    /// Token to purchase.
    pub token_id: ContractTokenId,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct TransferOwnershipParams {
    /// Token to hand over.
    pub token_id: ContractTokenId,
    /// Account receiving the token. This is a peer to peer ownership move,
    /// unrelated to any administrative role transfer.
    pub new_owner: AccountAddress,
}
